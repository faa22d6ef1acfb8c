//! 动画服务层
//!
//! 遵循贫血模型，将动画业务逻辑封装在Service中

use super::{NodeTransform, Orbit, Spin};

/// 动画服务 - 封装动画业务逻辑
pub struct AnimationService;

impl AnimationService {
    /// 应用一帧自转增量
    pub fn spin(transform: &mut NodeTransform, spin: &Spin) {
        transform.rotation += spin.per_tick;
    }

    /// 按经过时间放置轨道位置
    ///
    /// 只写 x/y 分量，z 保留节点初始值。
    pub fn orbit(transform: &mut NodeTransform, orbit: &Orbit, elapsed_seconds: f64) {
        let angle = elapsed_seconds * orbit.angular_speed as f64;
        let radius = orbit.radius as f64;
        transform.position.x = (radius * angle.cos()) as f32;
        transform.position.y = (radius * angle.sin()) as f32;
    }
}
