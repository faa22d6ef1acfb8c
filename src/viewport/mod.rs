//! 视口同步模块
//!
//! 每帧在任何场景修改之前检查可绘制表面尺寸，变化时同步调整绘制缓冲与相机宽高比，
//! 使同一帧就以正确的投影绘制。没有防抖：每个像素的变化都会立即触发重算。

use crate::backend::SceneBackend;
use crate::core::error::{SceneError, SceneResult};
use bevy_ecs::prelude::*;

/// 视口状态 (ECS Resource)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportState {
    /// 上一次同步到后端的尺寸，首帧前未知
    pub last_size: Option<(u32, u32)>,
    /// 当前宽高比
    pub aspect: Option<f32>,
    /// 累计重算次数
    pub resize_count: u64,
    /// 累计表面不可用的帧数
    pub unavailable_ticks: u64,
}

/// 单帧同步结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportOutcome {
    Unchanged,
    Resized { width: u32, height: u32, aspect: f32 },
    /// 表面无法报告有效尺寸，本帧跳过，下帧重试
    Unavailable,
}

impl ViewportOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, ViewportOutcome::Resized { .. })
    }
}

/// 视口服务
pub struct ViewportService;

impl ViewportService {
    /// 尺寸是否与上次同步的不同
    pub fn check_resize(current: (u32, u32), last: Option<(u32, u32)>) -> bool {
        last != Some(current)
    }

    /// 读取表面尺寸
    ///
    /// # 错误
    ///
    /// 表面无法报告尺寸或任一维为 0 时返回 `SceneError::ViewportUnavailable`。
    pub fn measure<B: SceneBackend + ?Sized>(backend: &B) -> SceneResult<(u32, u32)> {
        match backend.drawable_size() {
            Some((width, height)) if width > 0 && height > 0 => Ok((width, height)),
            Some((width, height)) => Err(SceneError::ViewportUnavailable { width, height }),
            None => Err(SceneError::ViewportUnavailable {
                width: 0,
                height: 0,
            }),
        }
    }

    /// 同步一帧
    pub fn synchronize<B: SceneBackend + ?Sized>(
        state: &mut ViewportState,
        backend: &mut B,
    ) -> ViewportOutcome {
        let (width, height) = match Self::measure(backend) {
            Ok(size) => size,
            Err(e) => {
                state.unavailable_ticks += 1;
                tracing::debug!(target: "viewport", "Skipping viewport sync: {}", e);
                return ViewportOutcome::Unavailable;
            }
        };

        if !Self::check_resize((width, height), state.last_size) {
            return ViewportOutcome::Unchanged;
        }

        let aspect = width as f32 / height as f32;
        backend.set_drawable_size(width, height);
        backend.set_camera_aspect(aspect);

        state.last_size = Some((width, height));
        state.aspect = Some(aspect);
        state.resize_count += 1;

        tracing::debug!(
            target: "viewport",
            "Viewport resized to {}x{} (aspect {:.3})",
            width,
            height,
            aspect
        );

        ViewportOutcome::Resized {
            width,
            height,
            aspect,
        }
    }
}
