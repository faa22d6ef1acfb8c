//! 场景上下文
//!
//! `SceneContext` 独占一个场景的全部可变状态：ECS 世界、每帧调度和后端。
//! 同一进程中的两个上下文互不共享任何缓冲或时钟。
//!
//! ## 每帧流程
//!
//! 1. 帧时钟：毫秒时间戳换算为秒
//! 2. 视口同步（先于任何场景修改）
//! 3. 动画器（自转、轨道）
//! 4. 粒子池推进
//! 5. 上传脏缓冲、推送动画节点变换
//! 6. 绘制

pub mod description;
pub mod presets;

use crate::animation::{orbit_system, spin_system, NodeId, NodeTransform, Orbit, SceneNode, Spin};
use crate::backend::SceneBackend;
use crate::core::error::{SceneError, SceneResult};
use crate::core::scheduler::{FrameClock, FrameTarget};
use crate::particles::{
    particle_advance_system, ParticlePool, ParticleService, ParticleSystemConfig,
    ParticleSystemHandle,
};
use crate::viewport::{ViewportOutcome, ViewportService, ViewportState};
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use glam::Vec3;
use std::collections::HashMap;

pub use description::{NodeDescriptor, NodeKind, SceneConfig, SceneEnvironment};
pub use presets::ScenePreset;

/// 单帧执行报告
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub frame: u64,
    pub elapsed_seconds: f64,
    pub viewport: ViewportOutcome,
    /// 本帧上传的粒子缓冲数
    pub uploads: usize,
    /// 后端是否成功绘制
    pub rendered: bool,
}

/// 场景上下文
pub struct SceneContext<B: SceneBackend> {
    name: String,
    world: World,
    schedule: Schedule,
    backend: B,
    nodes: HashMap<NodeId, Entity>,
    next_node_id: u32,
}

impl<B: SceneBackend> SceneContext<B> {
    /// 创建空场景
    pub fn new(name: impl Into<String>, backend: B) -> Self {
        let mut world = World::new();
        world.insert_resource(FrameClock::default());
        world.insert_resource(ViewportState::default());

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems((spin_system, orbit_system, particle_advance_system).chain());

        Self {
            name: name.into(),
            world,
            schedule,
            backend,
            nodes: HashMap::new(),
            next_node_id: 0,
        }
    }

    /// 按场景描述创建
    ///
    /// 所有粒子系统配置先整体校验，任何一个不合法都不会触碰后端。
    pub fn from_config(config: &SceneConfig, backend: B) -> SceneResult<Self> {
        for system in &config.particle_systems {
            system.validate()?;
        }

        let mut context = Self::new(config.name.clone(), backend);
        context.backend.configure_environment(&config.environment);
        for descriptor in &config.nodes {
            context.spawn_node(descriptor);
        }
        for system in &config.particle_systems {
            context.create_particle_system(system.clone())?;
        }

        tracing::info!(
            target: "scene",
            "Scene '{}' initialized: {} nodes, {} particle systems",
            context.name,
            config.nodes.len(),
            config.particle_systems.len()
        );
        Ok(context)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 创建粒子系统
    ///
    /// # 错误
    ///
    /// 配置不合法时返回 `SceneError::Configuration`，场景保持不变。
    pub fn create_particle_system(
        &mut self,
        config: ParticleSystemConfig,
    ) -> SceneResult<ParticleSystemHandle> {
        let pool = ParticleService::create(config)?;
        let count = pool.count();
        let style = pool.config().style;
        let name = pool.config().name.clone();

        let handle = ParticleSystemHandle(self.world.spawn(pool).id());
        self.backend.register_particles(handle, count, &style);

        tracing::info!(
            target: "scene",
            "Particle system '{}' created with {} particles",
            name,
            count
        );
        Ok(handle)
    }

    /// 创建节点；带 `spin`/`orbit` 的节点成为动画节点
    pub fn spawn_node(&mut self, descriptor: &NodeDescriptor) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;

        let mut entity = self.world.spawn((
            SceneNode {
                id,
                name: descriptor.name.clone(),
            },
            descriptor.transform(),
        ));
        if let Some(spin) = descriptor.spin {
            entity.insert(spin);
        }
        if let Some(orbit) = descriptor.orbit {
            entity.insert(orbit);
        }
        let entity = entity.id();

        self.nodes.insert(id, entity);
        self.backend.spawn_node(id, descriptor);
        id
    }

    /// 执行一帧
    pub fn tick(&mut self, timestamp_ms: f64) -> TickReport {
        let clock = {
            let mut clock = self.world.resource_mut::<FrameClock>();
            clock.advance(timestamp_ms);
            *clock
        };

        let viewport = {
            let mut state = self.world.resource_mut::<ViewportState>();
            ViewportService::synchronize(&mut state, &mut self.backend)
        };

        self.schedule.run(&mut self.world);

        let uploads = self.upload_dirty_buffers();
        self.push_animated_nodes();

        let rendered = match self.backend.render() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(target: "scene", "Frame {} not rendered: {}", clock.frame, e);
                false
            }
        };

        if clock.frame % 600 == 0 {
            tracing::debug!(
                target: "scene",
                "Scene '{}' frame {} at {:.2}s",
                self.name,
                clock.frame,
                clock.elapsed_seconds
            );
        }

        TickReport {
            frame: clock.frame,
            elapsed_seconds: clock.elapsed_seconds,
            viewport,
            uploads,
            rendered,
        }
    }

    /// 后端在调用期间只读借用缓冲
    fn upload_dirty_buffers(&mut self) -> usize {
        let mut uploads = 0;
        let mut pools = self.world.query::<(Entity, &mut ParticlePool)>();
        for (entity, mut pool) in pools.iter_mut(&mut self.world) {
            if ParticleService::take_upload(&mut pool) {
                self.backend
                    .upload_particles(ParticleSystemHandle(entity), pool.positions());
                uploads += 1;
            }
        }
        uploads
    }

    fn push_animated_nodes(&mut self) {
        let mut nodes = self
            .world
            .query_filtered::<(&SceneNode, &NodeTransform), Or<(With<Spin>, With<Orbit>)>>();
        for (node, transform) in nodes.iter(&self.world) {
            self.backend.update_node(node.id, transform);
        }
    }

    pub fn particle_pool(&self, handle: ParticleSystemHandle) -> SceneResult<&ParticlePool> {
        self.world
            .get::<ParticlePool>(handle.0)
            .ok_or(SceneError::UnknownParticleSystem(handle))
    }

    /// 粒子位置的扁平视图，长度为 `count * 3`
    pub fn positions(&self, handle: ParticleSystemHandle) -> SceneResult<&[f32]> {
        self.particle_pool(handle).map(ParticlePool::positions)
    }

    pub fn particle_handles(&mut self) -> Vec<ParticleSystemHandle> {
        let mut pools = self.world.query_filtered::<Entity, With<ParticlePool>>();
        pools
            .iter(&self.world)
            .map(ParticleSystemHandle)
            .collect()
    }

    /// 把单个粒子放到指定位置，下标越界时返回 `Ok(false)`
    pub fn place_particle(
        &mut self,
        handle: ParticleSystemHandle,
        index: usize,
        position: Vec3,
    ) -> SceneResult<bool> {
        let mut pool = self
            .world
            .get_mut::<ParticlePool>(handle.0)
            .ok_or(SceneError::UnknownParticleSystem(handle))?;
        Ok(ParticleService::place(&mut pool, index, position))
    }

    /// 强制回收单个粒子，下标越界时返回 `Ok(false)`
    pub fn recycle_particle(
        &mut self,
        handle: ParticleSystemHandle,
        index: usize,
    ) -> SceneResult<bool> {
        let mut pool = self
            .world
            .get_mut::<ParticlePool>(handle.0)
            .ok_or(SceneError::UnknownParticleSystem(handle))?;
        Ok(ParticleService::recycle(&mut pool, index))
    }

    pub fn node_transform(&self, id: NodeId) -> Option<NodeTransform> {
        let entity = self.nodes.get(&id)?;
        self.world.get::<NodeTransform>(*entity).copied()
    }

    pub fn clock(&self) -> FrameClock {
        *self.world.resource::<FrameClock>()
    }

    pub fn viewport(&self) -> ViewportState {
        *self.world.resource::<ViewportState>()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: SceneBackend> FrameTarget for SceneContext<B> {
    fn on_frame(&mut self, timestamp_ms: f64) {
        self.tick(timestamp_ms);
    }
}
