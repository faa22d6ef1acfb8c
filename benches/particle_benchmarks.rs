//! 粒子池性能基准测试
//!
//! 测试单帧推进、回收与完整场景 tick 的开销

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use snowscape::backend::HeadlessBackend;
use snowscape::particles::{
    AxisRange, ParticleService, ParticleSystemConfig, RecyclePolicy, SpawnRegion,
};
use snowscape::scene::{SceneContext, ScenePreset};
use std::hint::black_box;

fn snow(count: usize) -> ParticleSystemConfig {
    ParticleSystemConfig::falling(
        count,
        0.1,
        0.0,
        SpawnRegion::new(
            AxisRange::new(-100.0, 100.0),
            AxisRange::new(20.0, 200.0),
            AxisRange::new(-100.0, 100.0),
        ),
    )
    .with_seed(0x5eed)
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_advance");

    for count in [1_000usize, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let mut pool = ParticleService::create(snow(count)).unwrap();
            b.iter(|| black_box(ParticleService::advance(&mut pool, 1.0 / 60.0)));
        });
    }

    group.finish();
}

fn bench_recycle_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_recycle");

    let policies = [
        ("full_rerandomize", RecyclePolicy::FullRerandomize),
        ("full_respawn", RecyclePolicy::FullRespawn { reset_to: 200.0 }),
    ];
    for (name, policy) in policies {
        group.bench_function(name, |b| {
            let mut pool = ParticleService::create(snow(10_000).with_policy(policy)).unwrap();
            let mut index = 0;
            b.iter(|| {
                index = (index + 1) % pool.count();
                black_box(ParticleService::recycle(&mut pool, index))
            });
        });
    }

    group.finish();
}

fn bench_scene_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_tick");

    for preset in ScenePreset::ALL {
        group.bench_function(preset.name(), |b| {
            let config = preset.config();
            let mut scene = SceneContext::from_config(&config, HeadlessBackend::default()).unwrap();
            let mut timestamp = 0.0;
            b.iter(|| {
                timestamp += 1000.0 / 60.0;
                black_box(scene.tick(timestamp))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_advance, bench_recycle_policies, bench_scene_tick);
criterion_main!(benches);
