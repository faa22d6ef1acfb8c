//! 帧调度系统
//!
//! 提供每帧 tick 的时间来源与驱动循环。
//!
//! ## 功能特性
//!
//! - `FrameClock`：把宿主提供的单调毫秒时间戳换算为秒
//! - `FrameSource`：宿主的 "请求下一帧" 原语
//! - `run_frames`：协作式单线程帧循环，直到宿主结束
//!
//! 帧循环没有取消原语，唯一的停止方式是 `FrameSource` 不再产出时间戳。

use bevy_ecs::prelude::*;
use std::time::{Duration, Instant};

/// 帧时钟 (ECS Resource)
///
/// 调度器唯一的跨帧状态。`elapsed_seconds` 单调不减。
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameClock {
    /// 自宿主时钟原点起的秒数
    pub elapsed_seconds: f64,
    /// 与上一帧的间隔（秒），首帧为 0
    pub delta_seconds: f32,
    /// 已执行的帧数
    pub frame: u64,
    /// 上一帧的原始时间戳（毫秒）
    pub last_timestamp_ms: Option<f64>,
}

impl FrameClock {
    /// 推进时钟
    ///
    /// 时间戳回退时保持 `elapsed_seconds` 不变，delta 记为 0。
    pub fn advance(&mut self, timestamp_ms: f64) {
        let seconds = timestamp_ms / 1000.0;

        match self.last_timestamp_ms {
            Some(last) if timestamp_ms < last => {
                tracing::warn!(
                    target: "scene",
                    "Frame timestamp went backwards ({} ms < {} ms), holding clock",
                    timestamp_ms,
                    last
                );
                self.delta_seconds = 0.0;
            }
            Some(_) => {
                self.delta_seconds = (seconds - self.elapsed_seconds).max(0.0) as f32;
                self.elapsed_seconds = seconds.max(self.elapsed_seconds);
                self.last_timestamp_ms = Some(timestamp_ms);
            }
            None => {
                self.delta_seconds = 0.0;
                self.elapsed_seconds = seconds;
                self.last_timestamp_ms = Some(timestamp_ms);
            }
        }

        self.frame += 1;
    }
}

/// 下一帧请求原语
///
/// 每次调用阻塞到下一次显示刷新，并返回单调时间戳（毫秒）。
/// 宿主结束（窗口关闭、进程退出）时返回 `None`。
pub trait FrameSource {
    fn request_next_frame(&mut self) -> Option<f64>;
}

/// 按目标帧率节拍的帧源
///
/// 使用 `Instant` 作为单调时钟，可选帧数上限。
pub struct PacedFrameSource {
    origin: Instant,
    frame_interval: Duration,
    next_deadline: Instant,
    remaining: Option<u64>,
}

impl PacedFrameSource {
    /// 创建帧源
    ///
    /// # 参数
    /// - `target_fps`: 目标帧率，0 表示不节拍（尽快产出）
    /// - `max_frames`: 帧数上限，`None` 表示一直运行
    pub fn new(target_fps: u32, max_frames: Option<u64>) -> Self {
        let frame_interval = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / target_fps as f64)
        };
        let origin = Instant::now();

        Self {
            origin,
            frame_interval,
            next_deadline: origin,
            remaining: max_frames,
        }
    }
}

impl FrameSource for PacedFrameSource {
    fn request_next_frame(&mut self) -> Option<f64> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        let now = Instant::now();
        if self.next_deadline > now {
            std::thread::sleep(self.next_deadline - now);
        }
        // 落后太多时不追帧，从当前时刻重新对齐
        self.next_deadline = Instant::now().max(self.next_deadline) + self.frame_interval;

        Some(self.origin.elapsed().as_secs_f64() * 1000.0)
    }
}

/// 固定步长的合成帧源
///
/// 不读取真实时钟，用于测试与离线运行。
#[derive(Debug, Clone)]
pub struct FixedStepFrameSource {
    next_timestamp_ms: f64,
    step_ms: f64,
    remaining: u64,
}

impl FixedStepFrameSource {
    pub fn new(start_ms: f64, step_ms: f64, frames: u64) -> Self {
        Self {
            next_timestamp_ms: start_ms,
            step_ms,
            remaining: frames,
        }
    }

    /// 60 FPS 节拍，从 0 开始
    pub fn sixty_hz(frames: u64) -> Self {
        Self::new(0.0, 1000.0 / 60.0, frames)
    }
}

impl FrameSource for FixedStepFrameSource {
    fn request_next_frame(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let ts = self.next_timestamp_ms;
        self.next_timestamp_ms += self.step_ms;
        Some(ts)
    }
}

/// 可被帧循环驱动的对象
pub trait FrameTarget {
    fn on_frame(&mut self, timestamp_ms: f64);
}

/// 运行帧循环
///
/// 每次 `request_next_frame` 产出时间戳就执行一次 tick，不跳帧、不合并。
///
/// # 返回
///
/// 返回执行的帧数。
pub fn run_frames<T, S>(target: &mut T, source: &mut S) -> u64
where
    T: FrameTarget + ?Sized,
    S: FrameSource + ?Sized,
{
    let mut frames = 0u64;
    while let Some(timestamp_ms) = source.request_next_frame() {
        target.on_frame(timestamp_ms);
        frames += 1;
    }
    tracing::debug!(target: "scene", "Frame source ended after {} frames", frames);
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_converts_millis_to_seconds() {
        let mut clock = FrameClock::default();
        clock.advance(1500.0);
        assert_eq!(clock.elapsed_seconds, 1.5);
        assert_eq!(clock.delta_seconds, 0.0);
        assert_eq!(clock.frame, 1);

        clock.advance(2000.0);
        assert_eq!(clock.elapsed_seconds, 2.0);
        assert!((clock.delta_seconds - 0.5).abs() < 1e-6);
        assert_eq!(clock.frame, 2);
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut clock = FrameClock::default();
        clock.advance(3000.0);
        clock.advance(1000.0);
        assert_eq!(clock.elapsed_seconds, 3.0);
        assert_eq!(clock.delta_seconds, 0.0);
        assert_eq!(clock.last_timestamp_ms, Some(3000.0));
    }

    #[test]
    fn test_fixed_step_source() {
        let mut source = FixedStepFrameSource::new(10.0, 5.0, 3);
        assert_eq!(source.request_next_frame(), Some(10.0));
        assert_eq!(source.request_next_frame(), Some(15.0));
        assert_eq!(source.request_next_frame(), Some(20.0));
        assert_eq!(source.request_next_frame(), None);
    }

    #[test]
    fn test_paced_source_is_monotonic_and_bounded() {
        let mut source = PacedFrameSource::new(0, Some(4));
        let mut last = -1.0;
        let mut count = 0;
        while let Some(ts) = source.request_next_frame() {
            assert!(ts >= last);
            last = ts;
            count += 1;
        }
        assert_eq!(count, 4);
    }

    struct Counter(Vec<f64>);

    impl FrameTarget for Counter {
        fn on_frame(&mut self, timestamp_ms: f64) {
            self.0.push(timestamp_ms);
        }
    }

    #[test]
    fn test_run_frames_ticks_every_frame() {
        let mut counter = Counter(Vec::new());
        let frames = run_frames(&mut counter, &mut FixedStepFrameSource::new(0.0, 16.0, 5));
        assert_eq!(frames, 5);
        assert_eq!(counter.0, vec![0.0, 16.0, 32.0, 48.0, 64.0]);
    }
}
