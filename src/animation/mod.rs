//! 确定性动画模块
//!
//! 两类动画器，每帧由调度器在粒子推进之前执行：
//! - `Spin`：每帧固定的欧拉角增量（与刷新率耦合）
//! - `Orbit`：按真实经过时间计算的圆周位置

pub mod service;
pub mod system;

use bevy_ecs::prelude::*;
use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

pub use service::AnimationService;
pub use system::{orbit_system, spin_system};

/// 场景节点标识（场景描述中节点的序号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// 场景节点组件
#[derive(Component, Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
}

/// 节点变换
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeTransform {
    pub position: Vec3,
    /// XYZ 顺序的欧拉角（弧度）
    pub rotation: Vec3,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

impl NodeTransform {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.quat(), self.position)
    }
}

/// 自转动画器：每帧把 `per_tick` 加到欧拉角上
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spin {
    pub per_tick: Vec3,
}

/// 轨道动画器：`x = r·cos(ωt)`，`y = r·sin(ωt)`，z 保持不变
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub radius: f32,
    /// 角速度（弧度/秒）
    #[serde(default = "default_angular_speed")]
    pub angular_speed: f32,
}

fn default_angular_speed() -> f32 {
    1.0
}

impl Orbit {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            angular_speed: default_angular_speed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform_matrix() {
        let t = NodeTransform::default();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_transform_matrix_translates() {
        let t = NodeTransform::new(Vec3::new(2.0, 10.0, 0.0), Vec3::ZERO);
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(2.0, 10.0, 0.0));
    }
}
