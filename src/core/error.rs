//! 统一错误处理模块
//!
//! 提供场景核心范围内的错误类型定义
//!
//! ## 错误类型分层
//!
//! - **配置错误** (`ConfigurationError`): 粒子系统创建时的参数校验失败，永远不会在 tick 中出现
//! - **场景错误** (`SceneError`): 场景上下文对外暴露的错误
//! - **后端错误** (`BackendError`): 场景图后端（渲染器）报告的错误
//!
//! 配置文件的读取/解析错误见 [`crate::config::ConfigError`]。

use crate::particles::{Axis, ParticleSystemHandle};
use thiserror::Error;

/// 粒子系统配置错误
///
/// 在 `create_particle_system` 时返回，错误的配置不会被部分应用。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Particle count must be greater than zero")]
    EmptyPool,

    #[error("Recycle boundaries are inverted: low {low} >= high {high}")]
    InvertedRecycleBounds { low: f32, high: f32 },

    #[error("Spawn region on axis {axis} is degenerate: min {min} > max {max}")]
    DegenerateSpawnRegion { axis: Axis, min: f32, max: f32 },

    #[error("Spawn region on axis {axis} is too wide to sample: [{min}, {max}]")]
    SpawnRangeTooWide { axis: Axis, min: f32, max: f32 },

    #[error("Drift rate {rate} needs a {side} recycle boundary")]
    MissingRecycleBoundary { rate: f32, side: &'static str },

    #[error("Respawn value {value} on axis {axis} lies inside the recycle zone or outside the spawn region")]
    RespawnOutOfBounds { axis: Axis, value: f32 },

    #[error("Value for `{0}` must be finite")]
    NonFinite(&'static str),
}

/// 场景图后端错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Render failed: {0}")]
    Render(String),

    #[error("Surface lost")]
    SurfaceLost,
}

/// 场景核心错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Viewport unavailable: drawable surface reports {width}x{height}")]
    ViewportUnavailable { width: u32, height: u32 },

    #[error("Unknown particle system: {0:?}")]
    UnknownParticleSystem(ParticleSystemHandle),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// 结果类型别名
pub type SceneResult<T> = Result<T, SceneError>;
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
pub type BackendResult<T> = Result<T, BackendError>;
