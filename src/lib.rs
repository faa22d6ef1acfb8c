//! # Snowscape
//!
//! A small real-time particle scene core: snowfall, embers and a handful of
//! animated meshes driven at display refresh rate.
//!
//! ## Features
//!
//! - **Particle Pools**: fixed-size pools that drift along one axis and recycle in place
//! - **Viewport Sync**: drawable surface and camera aspect kept in step with the display
//! - **Frame Scheduler**: one ordered tick per display refresh, no overlap
//! - **Scene Presets**: `snowfall` and `ember-snow`, or any scene described in TOML/JSON
//! - **Headless Backend**: in-memory scene graph for the CLI, tests and benchmarks
//!
//! ## Architecture Design
//!
//! This crate follows the **Anemic Domain Model (贫血模型)** pattern:
//! - **State (Component/Resource)**: Pure data structures storing per-frame state
//! - **Service**: Business logic encapsulation with static methods
//! - **System**: ECS systems for orchestration and scheduling
//!
//! ### Example
//!
//! ```rust
//! use snowscape::backend::HeadlessBackend;
//! use snowscape::core::scheduler::{run_frames, FixedStepFrameSource};
//! use snowscape::scene::{SceneContext, ScenePreset};
//!
//! let config = ScenePreset::EmberSnow.config();
//! let mut scene = SceneContext::from_config(&config, HeadlessBackend::default()).unwrap();
//!
//! let frames = run_frames(&mut scene, &mut FixedStepFrameSource::sixty_hz(120));
//! assert_eq!(frames, 120);
//! assert_eq!(scene.backend().frames_rendered(), 120);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Errors, macros and the frame clock
//! - [`particles`]: Particle pools
//! - [`viewport`]: Viewport synchronization
//! - [`animation`]: Deterministic spin/orbit animators
//! - [`backend`]: Scene graph backend boundary
//! - [`scene`]: Scene context, description and presets
//! - [`config`]: File and environment configuration

/// Core functionality: errors, macros and frame scheduling
#[macro_use]
pub mod core;
/// Particle pools
pub mod particles;
/// Viewport synchronization
pub mod viewport;
/// Deterministic node animators
pub mod animation;
/// Scene graph backend abstraction
pub mod backend;
/// Scene context, description and presets
pub mod scene;
/// Configuration system
pub mod config;
/// Command line host
pub mod app;
