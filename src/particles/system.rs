//! 粒子ECS系统

use super::emitter::ParticlePool;
use super::service::ParticleService;
use crate::core::scheduler::FrameClock;
use bevy_ecs::prelude::*;

/// 粒子推进系统 - 每帧推进所有粒子池并标记为待上传
pub fn particle_advance_system(clock: Res<FrameClock>, mut pools: Query<&mut ParticlePool>) {
    for mut pool in pools.iter_mut() {
        let stats = ParticleService::advance(&mut pool, clock.delta_seconds);
        if stats.recycled > 0 {
            tracing::trace!(
                target: "particles",
                "Pool '{}' recycled {} of {} particles on frame {}",
                pool.config().name,
                stats.recycled,
                stats.advanced,
                clock.frame
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::{AxisRange, ParticleSystemConfig, SpawnRegion};

    #[test]
    fn test_system_advances_every_pool() {
        let mut world = World::new();
        world.insert_resource(FrameClock::default());

        let region = SpawnRegion::new(
            AxisRange::new(0.0, 1.0),
            AxisRange::new(50.0, 60.0),
            AxisRange::new(0.0, 1.0),
        );
        let mut ids = Vec::new();
        for seed in 0..3 {
            let config = ParticleSystemConfig::falling(10, 2.0, 0.0, region).with_seed(seed);
            let mut pool = ParticleService::create(config).unwrap();
            ParticleService::take_upload(&mut pool);
            ids.push(world.spawn(pool).id());
        }
        let before: Vec<Vec<f32>> = ids
            .iter()
            .map(|id| world.get::<ParticlePool>(*id).unwrap().positions().to_vec())
            .collect();

        let mut schedule = Schedule::default();
        schedule.add_systems(particle_advance_system);
        schedule.run(&mut world);

        for (id, old) in ids.iter().zip(before) {
            let pool = world.get::<ParticlePool>(*id).unwrap();
            assert!(pool.needs_upload());
            for (i, (a, b)) in old.iter().zip(pool.positions()).enumerate() {
                if i % 3 == 1 {
                    assert_eq!(*b, a - 2.0);
                } else {
                    assert_eq!(a, b);
                }
            }
        }
    }
}
