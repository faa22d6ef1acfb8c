//! 命令行宿主
//!
//! 加载配置、初始化日志，然后用无窗口后端按目标帧率驱动场景。

use crate::backend::HeadlessBackend;
use crate::config::{AppConfig, ConfigError, LoggingConfig};
use crate::core::error::SceneError;
use crate::core::scheduler::{run_frames, PacedFrameSource};
use crate::scene::SceneContext;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// 宿主错误
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration failed: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene failed: {0}")]
    Scene(#[from] SceneError),
}

pub type AppResult<T> = Result<T, AppError>;

/// 运行宿主，第一个命令行参数为可选的配置文件路径
pub fn run() -> AppResult<()> {
    let config = load_config(std::env::args_os().nth(1).map(PathBuf::from))?;
    initialize_logging(&config.logging);
    run_with_config(&config)
}

/// 读取配置并应用环境变量覆盖
pub fn load_config(path: Option<PathBuf>) -> AppResult<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load_or_default(),
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// 初始化日志系统
///
/// `RUST_LOG` 存在时以其为准，否则使用配置中的级别。
fn initialize_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(logging.level.as_filter()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 按配置构建场景并运行到帧源结束
pub fn run_with_config(config: &AppConfig) -> AppResult<()> {
    let scene = config.scene.resolve();
    let backend = HeadlessBackend::new(config.run.viewport_width, config.run.viewport_height);
    let mut context = SceneContext::from_config(&scene, backend)?;
    let mut source = PacedFrameSource::new(config.run.target_fps, config.run.max_frames);

    tracing::info!(
        target: "app",
        "Running scene '{}' at {} fps ({})",
        context.name(),
        config.run.target_fps,
        config
            .run
            .max_frames
            .map_or_else(|| "unlimited".to_string(), |n| format!("{} frames", n))
    );

    let started = Instant::now();
    let frames = run_frames(&mut context, &mut source);
    let wall = started.elapsed();

    let clock = context.clock();
    let viewport = context.viewport();
    tracing::info!(
        target: "app",
        "Finished after {} frames ({:.2}s scene time, {:.2?} wall), {} rendered, {} resizes",
        frames,
        clock.elapsed_seconds,
        wall,
        context.backend().frames_rendered(),
        viewport.resize_count
    );

    for handle in context.particle_handles() {
        let pool = context.particle_pool(handle)?;
        tracing::info!(
            target: "app",
            "Particle system '{}': {} particles, {} recycled",
            pool.config().name,
            pool.count(),
            pool.recycled_total()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneSource;
    use crate::scene::ScenePreset;

    #[test]
    fn test_run_with_config_stops_at_frame_limit() {
        let mut config = AppConfig::default();
        config.scene = SceneSource::Preset(ScenePreset::EmberSnow);
        config.run.target_fps = 1000;
        config.run.max_frames = Some(5);
        assert!(run_with_config(&config).is_ok());
    }

    #[test]
    fn test_load_config_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snowscape.toml");
        std::fs::write(&path, "scene = \"ember-snow\"\n[run]\ntarget_fps = 30\n").unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.scene, SceneSource::Preset(ScenePreset::EmberSnow));
    }

    #[test]
    fn test_load_config_missing_path() {
        let err = load_config(Some(PathBuf::from("/nonexistent/snowscape.toml"))).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::File(_))));
    }
}
