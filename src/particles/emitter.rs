//! 粒子池配置与组件
//!
//! 粒子池是固定容量的点集合，每个粒子沿漂移轴匀速移动，越过回收边界后重生。

use crate::core::error::{ConfigurationError, ConfigurationResult};
use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// 轴与区间
// ============================================================================

/// 空间坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// 分量下标（x=0, y=1, z=2）
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// 闭区间 `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

impl AxisRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// 以 `center` 为中心、宽度为 `extent` 的区间
    pub fn centered(center: f32, extent: f32) -> Self {
        Self::new(center - extent * 0.5, center + extent * 0.5)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// 均匀采样；区间退化为一点时直接返回该点
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// 生成区域：每个轴独立的均匀分布
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRegion {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl SpawnRegion {
    pub const fn new(x: AxisRange, y: AxisRange, z: AxisRange) -> Self {
        Self { x, y, z }
    }

    pub fn range(&self, axis: Axis) -> AxisRange {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// 各轴独立采样一个位置
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(self.x.sample(rng), self.y.sample(rng), self.z.sample(rng))
    }

    pub fn contains(&self, position: Vec3) -> bool {
        self.x.contains(position.x) && self.y.contains(position.y) && self.z.contains(position.z)
    }
}

// ============================================================================
// 策略
// ============================================================================

/// 回收策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecyclePolicy {
    /// 只把漂移轴重置为固定值，其余两轴保持不变
    FullRespawn { reset_to: f32 },
    /// 三个轴全部从生成区域重新采样
    FullRerandomize,
}

impl Default for RecyclePolicy {
    fn default() -> Self {
        Self::FullRerandomize
    }
}

/// 漂移步长的计量方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriftMode {
    /// 每帧固定增量，速度随刷新率变化
    #[default]
    PerTick,
    /// 按秒计的速度，乘以帧间隔
    PerSecond,
}

/// 粒子外观（只传递给后端）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleStyle {
    /// 线性 RGB
    pub color: [f32; 3],
    pub size: f32,
    pub opacity: f32,
}

crate::impl_default!(ParticleStyle {
    color: [1.0, 1.0, 1.0],
    size: 1.0,
    opacity: 0.8,
});

// ============================================================================
// 粒子系统配置
// ============================================================================

/// 粒子系统配置
///
/// 静态数据，创建时校验一次；校验失败的配置不会生成粒子池。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSystemConfig {
    /// 名称（日志用）
    #[serde(default = "default_name")]
    pub name: String,
    /// 粒子数量
    pub count: usize,
    /// 漂移轴
    #[serde(default)]
    pub drift_axis: Axis,
    /// 漂移速率（负数下落，正数上升）
    pub drift_rate: f32,
    #[serde(default)]
    pub drift_mode: DriftMode,
    /// 下落时的回收下界
    #[serde(default)]
    pub recycle_boundary_low: Option<f32>,
    /// 上升时的回收上界
    #[serde(default)]
    pub recycle_boundary_high: Option<f32>,
    pub spawn_region: SpawnRegion,
    #[serde(default)]
    pub recycle_policy: RecyclePolicy,
    /// 随机种子，缺省时从系统熵初始化
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub style: ParticleStyle,
}

fn default_name() -> String {
    "particles".to_string()
}

impl ParticleSystemConfig {
    /// 向下漂移的粒子系统（雪）
    pub fn falling(count: usize, rate: f32, low: f32, spawn_region: SpawnRegion) -> Self {
        Self {
            name: default_name(),
            count,
            drift_axis: Axis::Y,
            drift_rate: -rate.abs(),
            drift_mode: DriftMode::PerTick,
            recycle_boundary_low: Some(low),
            recycle_boundary_high: None,
            spawn_region,
            recycle_policy: RecyclePolicy::FullRerandomize,
            seed: None,
            style: ParticleStyle::default(),
        }
    }

    /// 向上漂移的粒子系统（火星）
    pub fn rising(count: usize, rate: f32, high: f32, spawn_region: SpawnRegion) -> Self {
        Self {
            drift_rate: rate.abs(),
            recycle_boundary_low: None,
            recycle_boundary_high: Some(high),
            ..Self::falling(count, rate, 0.0, spawn_region)
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.drift_axis = axis;
        self
    }

    pub fn with_policy(mut self, policy: RecyclePolicy) -> Self {
        self.recycle_policy = policy;
        self
    }

    pub fn with_drift_mode(mut self, mode: DriftMode) -> Self {
        self.drift_mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_style(mut self, style: ParticleStyle) -> Self {
        self.style = style;
        self
    }

    /// 本帧漂移量
    pub fn drift_step(&self, delta_seconds: f32) -> f32 {
        match self.drift_mode {
            DriftMode::PerTick => self.drift_rate,
            DriftMode::PerSecond => self.drift_rate * delta_seconds,
        }
    }

    /// 漂移分量是否落在回收区（边界包含在回收区内）
    pub fn in_recycle_zone(&self, value: f32) -> bool {
        if self.drift_rate < 0.0 {
            self.recycle_boundary_low.map_or(false, |low| value <= low)
        } else if self.drift_rate > 0.0 {
            self.recycle_boundary_high.map_or(false, |high| value >= high)
        } else {
            false
        }
    }

    /// 校验配置
    pub fn validate(&self) -> ConfigurationResult<()> {
        if self.count == 0 {
            return Err(ConfigurationError::EmptyPool);
        }

        if !self.drift_rate.is_finite() {
            return Err(ConfigurationError::NonFinite("drift_rate"));
        }
        if self.recycle_boundary_low.map_or(false, |v| !v.is_finite()) {
            return Err(ConfigurationError::NonFinite("recycle_boundary_low"));
        }
        if self.recycle_boundary_high.map_or(false, |v| !v.is_finite()) {
            return Err(ConfigurationError::NonFinite("recycle_boundary_high"));
        }

        for axis in Axis::ALL {
            let range = self.spawn_region.range(axis);
            if !range.min.is_finite() || !range.max.is_finite() {
                return Err(ConfigurationError::NonFinite("spawn_region"));
            }
            if range.min > range.max {
                return Err(ConfigurationError::DegenerateSpawnRegion {
                    axis,
                    min: range.min,
                    max: range.max,
                });
            }
            // 区间宽度溢出时无法均匀采样
            if !(range.max - range.min).is_finite() {
                return Err(ConfigurationError::SpawnRangeTooWide {
                    axis,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        if let (Some(low), Some(high)) = (self.recycle_boundary_low, self.recycle_boundary_high) {
            if low >= high {
                return Err(ConfigurationError::InvertedRecycleBounds { low, high });
            }
        }

        if self.drift_rate < 0.0 && self.recycle_boundary_low.is_none() {
            return Err(ConfigurationError::MissingRecycleBoundary {
                rate: self.drift_rate,
                side: "low",
            });
        }
        if self.drift_rate > 0.0 && self.recycle_boundary_high.is_none() {
            return Err(ConfigurationError::MissingRecycleBoundary {
                rate: self.drift_rate,
                side: "high",
            });
        }

        // 新生成或重生的粒子不能立即落入回收区
        let drift_range = self.spawn_region.range(self.drift_axis);
        for edge in [drift_range.min, drift_range.max] {
            if self.in_recycle_zone(edge) {
                return Err(ConfigurationError::RespawnOutOfBounds {
                    axis: self.drift_axis,
                    value: edge,
                });
            }
        }
        if let RecyclePolicy::FullRespawn { reset_to } = self.recycle_policy {
            if !reset_to.is_finite() {
                return Err(ConfigurationError::NonFinite("reset_to"));
            }
            if !drift_range.contains(reset_to) || self.in_recycle_zone(reset_to) {
                return Err(ConfigurationError::RespawnOutOfBounds {
                    axis: self.drift_axis,
                    value: reset_to,
                });
            }
        }

        Ok(())
    }
}

// ============================================================================
// 粒子池组件
// ============================================================================

/// 粒子系统句柄
///
/// 由场景上下文在创建粒子系统时返回，用于查询与后端上传。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleSystemHandle(pub(crate) Entity);

impl ParticleSystemHandle {
    pub fn entity(&self) -> Entity {
        self.0
    }
}

/// 粒子池组件
///
/// 纯数据：位置缓冲、私有随机数发生器与上传标记。行为见 [`super::ParticleService`]。
/// 缓冲长度在创建后固定，粒子身份即其槽位下标。
#[derive(Component)]
pub struct ParticlePool {
    pub(crate) config: ParticleSystemConfig,
    pub(crate) positions: Vec<Vec3>,
    pub(crate) rng: StdRng,
    pub(crate) needs_upload: bool,
    pub(crate) recycled_total: u64,
}

impl ParticlePool {
    pub fn config(&self) -> &ParticleSystemConfig {
        &self.config
    }

    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// 扁平的 `[x, y, z, x, y, z, ...]` 视图，长度为 `count * 3`
    pub fn positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn particles(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn particle(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    /// 缓冲是否需要上传到后端
    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    /// 累计回收次数
    pub fn recycled_total(&self) -> u64 {
        self.recycled_total
    }
}

impl fmt::Debug for ParticlePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticlePool")
            .field("name", &self.config.name)
            .field("count", &self.positions.len())
            .field("needs_upload", &self.needs_upload)
            .field("recycled_total", &self.recycled_total)
            .finish()
    }
}
