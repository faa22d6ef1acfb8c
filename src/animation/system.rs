//! 动画ECS系统

use super::service::AnimationService;
use super::{NodeTransform, Orbit, Spin};
use crate::core::scheduler::FrameClock;
use bevy_ecs::prelude::*;

/// 自转系统 - 每帧固定增量
pub fn spin_system(mut query: Query<(&Spin, &mut NodeTransform)>) {
    for (spin, mut transform) in query.iter_mut() {
        AnimationService::spin(&mut transform, spin);
    }
}

/// 轨道系统 - 按帧时钟的经过时间定位
pub fn orbit_system(clock: Res<FrameClock>, mut query: Query<(&Orbit, &mut NodeTransform)>) {
    for (orbit, mut transform) in query.iter_mut() {
        AnimationService::orbit(&mut transform, orbit, clock.elapsed_seconds);
    }
}
