//! 场景描述
//!
//! 相机、背景、雾、网格/光源节点与粒子系统都是静态配置数据，
//! 由场景上下文在初始化时一次性交给后端。

use crate::animation::{NodeTransform, Orbit, Spin};
use crate::impl_default;
use crate::particles::ParticleSystemConfig;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// 相机配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// 垂直视角（度）
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl_default!(CameraConfig {
    fov_y_degrees: 55.0,
    near: 0.1,
    far: 100.0,
    position: Vec3::new(0.0, 5.0, 25.0),
});

/// 线性雾
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FogConfig {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

/// 场景环境：相机、背景与雾
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEnvironment {
    #[serde(default)]
    pub camera: CameraConfig,
    pub background: [f32; 3],
    #[serde(default)]
    pub fog: Option<FogConfig>,
}

impl_default!(SceneEnvironment {
    camera: CameraConfig::default(),
    background: [0.0, 0.0, 0.0],
    fog: None,
});

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Cube { size: f32 },
    Sphere { radius: f32 },
    Plane { width: f32, height: f32 },
    DirectionalLight { color: [f32; 3], intensity: f32 },
    AmbientLight { color: [f32; 3], intensity: f32 },
}

/// 材质描述
///
/// 纹理路径由后端异步加载，核心从不等待加载完成。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialConfig {
    #[serde(default)]
    pub color: Option<[f32; 3]>,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub normal_map: Option<String>,
    #[serde(default)]
    pub texture_repeat: Option<[f32; 2]>,
    #[serde(default)]
    pub double_sided: bool,
}

/// 节点描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default = "zero")]
    pub position: Vec3,
    #[serde(default = "zero")]
    pub rotation: Vec3,
    #[serde(default)]
    pub material: Option<MaterialConfig>,
    #[serde(default)]
    pub spin: Option<Spin>,
    #[serde(default)]
    pub orbit: Option<Orbit>,
}

fn zero() -> Vec3 {
    Vec3::ZERO
}

impl NodeDescriptor {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            material: None,
            spin: None,
            orbit: None,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_material(mut self, material: MaterialConfig) -> Self {
        self.material = Some(material);
        self
    }

    pub fn spinning(mut self, per_tick: Vec3) -> Self {
        self.spin = Some(Spin { per_tick });
        self
    }

    pub fn orbiting(mut self, orbit: Orbit) -> Self {
        self.orbit = Some(orbit);
        self
    }

    pub fn transform(&self) -> NodeTransform {
        NodeTransform::new(self.position, self.rotation)
    }
}

/// 完整场景描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub name: String,
    #[serde(default)]
    pub environment: SceneEnvironment,
    #[serde(default)]
    pub nodes: Vec<NodeDescriptor>,
    #[serde(default)]
    pub particle_systems: Vec<ParticleSystemConfig>,
}

impl SceneConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            environment: SceneEnvironment::default(),
            nodes: Vec::new(),
            particle_systems: Vec::new(),
        }
    }
}
