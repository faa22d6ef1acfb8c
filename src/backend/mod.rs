//! 场景图后端抽象
//!
//! 核心只通过这一窄接口与真正持有 3D 对象、相机和绘制调用的后端交互。
//!
//! ## 设计目标
//!
//! - 核心独占粒子缓冲的写权限，后端只在 `upload_particles` 调用期间获得只读切片
//! - 视口尺寸与相机宽高比由核心推送，后端负责重算投影
//! - 纹理等资源加载是后端自己的事，核心从不等待

pub mod camera;
pub mod headless;

use crate::animation::{NodeId, NodeTransform};
use crate::core::error::BackendResult;
use crate::particles::{ParticleStyle, ParticleSystemHandle};
use crate::scene::description::{NodeDescriptor, SceneEnvironment};

pub use camera::PerspectiveCamera;
pub use headless::HeadlessBackend;

/// 场景图后端
pub trait SceneBackend {
    /// 可绘制表面的显示尺寸；无法报告时返回 `None`
    fn drawable_size(&self) -> Option<(u32, u32)>;

    /// 把绘制缓冲调整为指定尺寸
    fn set_drawable_size(&mut self, width: u32, height: u32);

    /// 设置相机宽高比并重算投影矩阵
    fn set_camera_aspect(&mut self, aspect: f32);

    /// 应用相机、背景与雾
    fn configure_environment(&mut self, environment: &SceneEnvironment);

    /// 创建静态节点（网格或光源）
    fn spawn_node(&mut self, id: NodeId, descriptor: &NodeDescriptor);

    /// 同步动画节点的变换
    fn update_node(&mut self, id: NodeId, transform: &NodeTransform);

    /// 登记粒子缓冲（创建时调用一次）
    fn register_particles(
        &mut self,
        handle: ParticleSystemHandle,
        count: usize,
        style: &ParticleStyle,
    );

    /// 上传被标记为脏的粒子位置，`positions` 长度为 `count * 3`
    fn upload_particles(&mut self, handle: ParticleSystemHandle, positions: &[f32]);

    /// 绘制当前状态
    fn render(&mut self) -> BackendResult<()>;
}
