//! 场景帧循环集成测试

use snowscape::backend::HeadlessBackend;
use snowscape::core::scheduler::{run_frames, FixedStepFrameSource, FrameSource};
use snowscape::particles::{AxisRange, ParticleSystemConfig, RecyclePolicy, SpawnRegion};
use snowscape::scene::{SceneContext, ScenePreset};
use snowscape::viewport::ViewportOutcome;

fn snow() -> ParticleSystemConfig {
    ParticleSystemConfig::falling(
        500,
        0.1,
        0.0,
        SpawnRegion::new(
            AxisRange::new(-25.0, 25.0),
            AxisRange::new(20.0, 70.0),
            AxisRange::new(-25.0, 25.0),
        ),
    )
    .with_policy(RecyclePolicy::FullRerandomize)
}

#[test]
fn test_snow_never_observed_below_ground() {
    let mut scene = SceneContext::new("snow", HeadlessBackend::default());
    let handle = scene.create_particle_system(snow()).unwrap();
    let mut source = FixedStepFrameSource::sixty_hz(1000);

    let mut recycled_seen = false;
    while let Some(ts) = source.request_next_frame() {
        let report = scene.tick(ts);
        assert_eq!(report.uploads, 1);

        let positions = scene.positions(handle).unwrap();
        assert_eq!(positions.len(), 500 * 3);
        for (i, y) in positions.iter().skip(1).step_by(3).enumerate() {
            assert!(*y > 0.0, "frame {}: particle {} at y = {}", report.frame, i, y);
        }

        // 上传的副本与核心缓冲一致
        let uploaded = &scene.backend().particle_buffer(handle).unwrap().positions;
        assert_eq!(uploaded.as_slice(), positions);

        recycled_seen |= scene.particle_pool(handle).unwrap().recycled_total() > 0;
    }

    // 1000 帧下落 100 个单位，必然发生过回收
    assert!(recycled_seen);
    assert_eq!(scene.clock().frame, 1000);
}

#[test]
fn test_resize_is_applied_once_per_change() {
    let mut scene = SceneContext::new("resize", HeadlessBackend::new(800, 600));

    let first = scene.tick(0.0);
    assert_eq!(
        first.viewport,
        ViewportOutcome::Resized {
            width: 800,
            height: 600,
            aspect: 800.0 / 600.0
        }
    );
    assert_eq!(scene.tick(16.0).viewport, ViewportOutcome::Unchanged);
    assert_eq!(scene.backend().aspect_updates(), 1);

    scene.backend_mut().resize_display(1024, 512);
    assert!(scene.tick(32.0).viewport.changed());
    assert_eq!(scene.backend().camera().aspect(), 2.0);
    assert_eq!(scene.backend().current_drawable_size(), (1024, 512));
    assert_eq!(scene.viewport().resize_count, 2);
}

#[test]
fn test_unavailable_viewport_keeps_simulating() {
    let mut scene = SceneContext::new("hidden", HeadlessBackend::new(800, 0));
    let handle = scene.create_particle_system(snow().with_seed(5)).unwrap();
    let before = scene.positions(handle).unwrap().to_vec();

    let report = scene.tick(0.0);
    assert_eq!(report.viewport, ViewportOutcome::Unavailable);
    assert!(report.rendered);
    assert_ne!(scene.positions(handle).unwrap(), before.as_slice());

    scene.backend_mut().resize_display(800, 400);
    assert!(scene.tick(16.0).viewport.changed());
    assert_eq!(scene.viewport().unavailable_ticks, 1);
}

#[test]
fn test_render_errors_are_survived() {
    let mut scene = SceneContext::new("flaky", HeadlessBackend::default());
    scene.create_particle_system(snow()).unwrap();
    scene.backend_mut().fail_next_renders(3);

    let frames = run_frames(&mut scene, &mut FixedStepFrameSource::sixty_hz(10));
    assert_eq!(frames, 10);
    assert_eq!(scene.clock().frame, 10);
    assert_eq!(scene.backend().frames_rendered(), 7);
}

#[test]
fn test_presets_run() {
    for preset in ScenePreset::ALL {
        let config = preset.config();
        let mut scene = SceneContext::from_config(&config, HeadlessBackend::default()).unwrap();
        let frames = run_frames(&mut scene, &mut FixedStepFrameSource::sixty_hz(300));
        assert_eq!(frames, 300);

        let handles = scene.particle_handles();
        assert_eq!(handles.len(), config.particle_systems.len());
        for handle in handles {
            let pool = scene.particle_pool(handle).unwrap();
            assert_eq!(pool.positions().len(), pool.count() * 3);
        }
        assert_eq!(scene.backend().node_count(), config.nodes.len());
    }
}

#[test]
fn test_light_orbits_with_elapsed_time() {
    let config = ScenePreset::EmberSnow.config();
    let mut scene = SceneContext::from_config(&config, HeadlessBackend::default()).unwrap();
    let sun = config
        .nodes
        .iter()
        .position(|node| node.orbit.is_some())
        .unwrap();
    let sun = snowscape::animation::NodeId(sun as u32);

    scene.tick(0.0);
    scene.tick(std::f64::consts::FRAC_PI_2 * 1000.0);

    let transform = scene.backend().node(sun).unwrap().transform;
    assert!(transform.position.x.abs() < 1e-4);
    assert!((transform.position.y - 10.0).abs() < 1e-4);
    assert_eq!(transform.position.z, 30.0);
}

#[test]
fn test_contexts_are_isolated() {
    let mut a = SceneContext::new("a", HeadlessBackend::default());
    let mut b = SceneContext::new("b", HeadlessBackend::default());
    let ha = a.create_particle_system(snow().with_seed(1)).unwrap();
    let hb = b.create_particle_system(snow().with_seed(1)).unwrap();

    run_frames(&mut a, &mut FixedStepFrameSource::sixty_hz(50));
    assert_eq!(a.clock().frame, 50);
    assert_eq!(b.clock().frame, 0);
    assert_ne!(a.positions(ha).unwrap(), b.positions(hb).unwrap());
}
