//! 无窗口后端
//!
//! 在内存中保存场景状态，不做真实绘制。用于命令行运行、基准测试和集成测试。

use super::camera::PerspectiveCamera;
use super::SceneBackend;
use crate::animation::{NodeId, NodeTransform};
use crate::core::error::{BackendError, BackendResult};
use crate::particles::{ParticleStyle, ParticleSystemHandle};
use crate::scene::description::{NodeDescriptor, SceneEnvironment};
use glam::Vec3;
use std::collections::HashMap;

/// 后端中的节点
#[derive(Debug, Clone)]
pub struct HeadlessNode {
    pub descriptor: NodeDescriptor,
    pub transform: NodeTransform,
}

/// 后端中的粒子缓冲副本
#[derive(Debug, Clone)]
pub struct ParticleBuffer {
    pub style: ParticleStyle,
    pub positions: Vec<f32>,
    pub uploads: u64,
}

impl ParticleBuffer {
    /// 缓冲的包围盒（最小点，最大点）
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self
            .positions
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]));
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// 无窗口后端
#[derive(Debug)]
pub struct HeadlessBackend {
    display_size: Option<(u32, u32)>,
    drawable_size: (u32, u32),
    camera: PerspectiveCamera,
    environment: SceneEnvironment,
    nodes: HashMap<NodeId, HeadlessNode>,
    particles: HashMap<ParticleSystemHandle, ParticleBuffer>,
    frames_rendered: u64,
    aspect_updates: u64,
    pending_failures: u32,
}

impl HeadlessBackend {
    /// 创建指定显示尺寸的后端
    ///
    /// 绘制缓冲初始为 300x150，与显示尺寸不同，首帧会触发一次同步。
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            display_size: Some((width, height)),
            drawable_size: (300, 150),
            camera: PerspectiveCamera::default(),
            environment: SceneEnvironment::default(),
            nodes: HashMap::new(),
            particles: HashMap::new(),
            frames_rendered: 0,
            aspect_updates: 0,
            pending_failures: 0,
        }
    }

    /// 宿主改变显示尺寸（窗口缩放）
    pub fn resize_display(&mut self, width: u32, height: u32) {
        self.display_size = Some((width, height));
    }

    /// 表面脱离显示（无法报告尺寸）
    pub fn detach_display(&mut self) {
        self.display_size = None;
    }

    /// 让接下来 `count` 次绘制失败
    pub fn fail_next_renders(&mut self, count: u32) {
        self.pending_failures = count;
    }

    pub fn current_drawable_size(&self) -> (u32, u32) {
        self.drawable_size
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn environment(&self) -> &SceneEnvironment {
        &self.environment
    }

    pub fn node(&self, id: NodeId) -> Option<&HeadlessNode> {
        self.nodes.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn particle_buffer(&self, handle: ParticleSystemHandle) -> Option<&ParticleBuffer> {
        self.particles.get(&handle)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn aspect_updates(&self) -> u64 {
        self.aspect_updates
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

impl SceneBackend for HeadlessBackend {
    fn drawable_size(&self) -> Option<(u32, u32)> {
        self.display_size
    }

    fn set_drawable_size(&mut self, width: u32, height: u32) {
        self.drawable_size = (width, height);
    }

    fn set_camera_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
        self.aspect_updates += 1;
    }

    fn configure_environment(&mut self, environment: &SceneEnvironment) {
        self.camera = PerspectiveCamera::from_config(&environment.camera, self.camera.aspect());
        self.environment = environment.clone();
    }

    fn spawn_node(&mut self, id: NodeId, descriptor: &NodeDescriptor) {
        self.nodes.insert(
            id,
            HeadlessNode {
                descriptor: descriptor.clone(),
                transform: descriptor.transform(),
            },
        );
    }

    fn update_node(&mut self, id: NodeId, transform: &NodeTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.transform = *transform;
        } else {
            tracing::warn!(target: "scene", "Update for unknown node {:?}", id);
        }
    }

    fn register_particles(
        &mut self,
        handle: ParticleSystemHandle,
        count: usize,
        style: &ParticleStyle,
    ) {
        self.particles.insert(
            handle,
            ParticleBuffer {
                style: *style,
                positions: vec![0.0; count * 3],
                uploads: 0,
            },
        );
    }

    fn upload_particles(&mut self, handle: ParticleSystemHandle, positions: &[f32]) {
        if let Some(buffer) = self.particles.get_mut(&handle) {
            buffer.positions.clear();
            buffer.positions.extend_from_slice(positions);
            buffer.uploads += 1;
        } else {
            tracing::warn!(target: "scene", "Upload for unregistered particle system {:?}", handle);
        }
    }

    fn render(&mut self) -> BackendResult<()> {
        if self.pending_failures > 0 {
            self.pending_failures -= 1;
            return Err(BackendError::SurfaceLost);
        }
        self.frames_rendered += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::description::NodeKind;

    #[test]
    fn test_aspect_update_recomputes_projection() {
        let mut backend = HeadlessBackend::new(800, 600);
        let before = backend.camera().projection();
        backend.set_camera_aspect(2.0);
        assert_eq!(backend.aspect_updates(), 1);
        assert_ne!(backend.camera().projection(), before);
    }

    #[test]
    fn test_detached_display_reports_no_size() {
        let mut backend = HeadlessBackend::new(800, 600);
        assert_eq!(backend.drawable_size(), Some((800, 600)));
        backend.detach_display();
        assert_eq!(backend.drawable_size(), None);
    }

    #[test]
    fn test_nodes_receive_updates() {
        let mut backend = HeadlessBackend::default();
        let descriptor = NodeDescriptor::new("cube", NodeKind::Cube { size: 4.0 })
            .at(Vec3::new(2.0, 10.0, 0.0));
        backend.spawn_node(NodeId(0), &descriptor);
        assert_eq!(
            backend.node(NodeId(0)).unwrap().transform.position,
            Vec3::new(2.0, 10.0, 0.0)
        );

        let moved = NodeTransform::new(Vec3::ONE, Vec3::ZERO);
        backend.update_node(NodeId(0), &moved);
        assert_eq!(backend.node(NodeId(0)).unwrap().transform, moved);
    }

    #[test]
    fn test_render_failures_are_counted_down() {
        let mut backend = HeadlessBackend::default();
        backend.fail_next_renders(2);
        assert!(backend.render().is_err());
        assert!(backend.render().is_err());
        assert!(backend.render().is_ok());
        assert_eq!(backend.frames_rendered(), 1);
    }

    #[test]
    fn test_buffer_bounds() {
        let buffer = ParticleBuffer {
            style: ParticleStyle::default(),
            positions: vec![0.0, 1.0, 2.0, -1.0, 5.0, 0.5],
            uploads: 1,
        };
        assert_eq!(
            buffer.bounds(),
            Some((Vec3::new(-1.0, 1.0, 0.5), Vec3::new(0.0, 5.0, 2.0)))
        );
    }
}
