//! 粒子池模块
//!
//! 固定容量的点粒子池，每帧沿漂移轴推进，越过回收边界的粒子在同一帧内重生。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Particle Pool                        │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Create                                               │
//! │     - 校验配置                                            │
//! │     - 从生成区域均匀填充 count 个位置                      │
//! │                                                          │
//! │  2. Advance (每帧)                                        │
//! │     - 漂移轴分量 += drift_rate（或 drift_rate * dt）       │
//! │     - 越界粒子按回收策略重生                               │
//! │     - 标记缓冲待上传                                       │
//! │                                                          │
//! │  3. Upload                                               │
//! │     - 场景上下文把只读切片交给后端                         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```
//! use snowscape::particles::{AxisRange, ParticleService, ParticleSystemConfig, SpawnRegion};
//!
//! let region = SpawnRegion::new(
//!     AxisRange::new(-25.0, 25.0),
//!     AxisRange::new(20.0, 70.0),
//!     AxisRange::new(-25.0, 25.0),
//! );
//! let mut pool = ParticleService::create(ParticleSystemConfig::falling(500, 0.1, 0.0, region)).unwrap();
//! ParticleService::advance(&mut pool, 1.0 / 60.0);
//! assert_eq!(pool.positions().len(), 1500);
//! ```

pub mod emitter;
pub mod service;
pub mod system;

pub use emitter::{
    Axis, AxisRange, DriftMode, ParticlePool, ParticleStyle, ParticleSystemConfig,
    ParticleSystemHandle, RecyclePolicy, SpawnRegion,
};
pub use service::{drift_positions, AdvanceStats, ParticleService};
pub use system::particle_advance_system;
