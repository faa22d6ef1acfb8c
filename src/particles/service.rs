//! 粒子服务层
//!
//! 遵循贫血模型，将粒子池的推进与回收逻辑封装在Service中：
//! - `ParticlePool` (Component): 纯数据结构
//! - `ParticleService` (Service): 封装业务逻辑
//! - `particle_advance_system` (System): 调度编排

use super::emitter::{ParticlePool, ParticleSystemConfig, RecyclePolicy};
use crate::core::error::ConfigurationResult;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 单次推进的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceStats {
    /// 推进的粒子数
    pub advanced: usize,
    /// 本次回收的粒子数
    pub recycled: usize,
}

/// 粒子服务 - 封装粒子池业务逻辑
pub struct ParticleService;

impl ParticleService {
    /// 创建粒子池
    ///
    /// 校验配置后从生成区域随机填充全部槽位。新池标记为待上传。
    ///
    /// # 错误
    ///
    /// 配置不合法时返回 [`crate::core::error::ConfigurationError`]。
    pub fn create(config: ParticleSystemConfig) -> ConfigurationResult<ParticlePool> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let positions: Vec<Vec3> = (0..config.count)
            .map(|_| config.spawn_region.sample(&mut rng))
            .collect();

        tracing::debug!(
            target: "particles",
            "Created particle pool '{}' with {} particles",
            config.name,
            positions.len()
        );

        Ok(ParticlePool {
            config,
            positions,
            rng,
            needs_upload: true,
            recycled_total: 0,
        })
    }

    /// 推进一帧
    ///
    /// 线性时间，不重新分配缓冲。只有回收事件会消耗随机数。
    pub fn advance(pool: &mut ParticlePool, delta_seconds: f32) -> AdvanceStats {
        let step = pool.config.drift_step(delta_seconds);
        let ParticlePool {
            config,
            positions,
            rng,
            needs_upload,
            recycled_total,
        } = pool;

        let recycled = drift_positions(positions, config, step, rng);
        *recycled_total += recycled as u64;
        *needs_upload = true;

        AdvanceStats {
            advanced: positions.len(),
            recycled,
        }
    }

    /// 强制回收单个粒子
    ///
    /// 只修改 `index` 槽位。下标越界时返回 `false`。
    pub fn recycle(pool: &mut ParticlePool, index: usize) -> bool {
        let ParticlePool {
            config,
            positions,
            rng,
            needs_upload,
            recycled_total,
        } = pool;

        match positions.get_mut(index) {
            Some(position) => {
                respawn(position, config, rng);
                *recycled_total += 1;
                *needs_upload = true;
                true
            }
            None => false,
        }
    }

    /// 把单个粒子放到指定位置
    ///
    /// 下标越界时返回 `false`。
    pub fn place(pool: &mut ParticlePool, index: usize, position: Vec3) -> bool {
        match pool.positions.get_mut(index) {
            Some(slot) => {
                *slot = position;
                pool.needs_upload = true;
                true
            }
            None => false,
        }
    }

    /// 读取并清除上传标记
    pub fn take_upload(pool: &mut ParticlePool) -> bool {
        std::mem::replace(&mut pool.needs_upload, false)
    }
}

/// 沿漂移轴推进一组粒子，并就地回收越界粒子
///
/// 回收在同一次调用内完成，返回回收数量。空切片是合法的空操作。
pub fn drift_positions<R: Rng + ?Sized>(
    positions: &mut [Vec3],
    config: &ParticleSystemConfig,
    step: f32,
    rng: &mut R,
) -> usize {
    let axis = config.drift_axis.index();
    let mut recycled = 0;

    for position in positions.iter_mut() {
        position[axis] += step;
        if config.in_recycle_zone(position[axis]) {
            respawn(position, config, rng);
            recycled += 1;
        }
    }

    recycled
}

fn respawn<R: Rng + ?Sized>(position: &mut Vec3, config: &ParticleSystemConfig, rng: &mut R) {
    match config.recycle_policy {
        RecyclePolicy::FullRespawn { reset_to } => {
            position[config.drift_axis.index()] = reset_to;
        }
        RecyclePolicy::FullRerandomize => {
            *position = config.spawn_region.sample(rng);
        }
    }
}
