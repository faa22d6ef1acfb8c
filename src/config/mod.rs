/// 统一配置系统
///
/// 提供TOML/JSON配置文件和环境变量覆盖
use crate::core::error::ConfigurationError;
use crate::impl_default;
use crate::scene::{SceneConfig, ScenePreset};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod run;

pub use run::RunConfig;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    File(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    Parse(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    Validation(String),
    /// 场景中的粒子系统配置不合法
    #[error("Invalid particle system in scene: {0}")]
    Scene(#[from] ConfigurationError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 场景来源：预设名或内联场景描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneSource {
    Preset(ScenePreset),
    Inline(Box<SceneConfig>),
}

impl Default for SceneSource {
    fn default() -> Self {
        SceneSource::Preset(ScenePreset::Snowfall)
    }
}

impl SceneSource {
    /// 展开为完整的场景描述
    pub fn resolve(&self) -> SceneConfig {
        match self {
            SceneSource::Preset(preset) => preset.config(),
            SceneSource::Inline(config) => (**config).clone(),
        }
    }
}

/// 应用主配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 场景
    #[serde(default)]
    pub scene: SceneSource,

    /// 运行配置
    #[serde(default)]
    pub run: RunConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 按扩展名选择格式，`.json` 以外一律按TOML解析
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// 用任意键值来源覆盖配置，无法解析的值记录警告后忽略
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("SNOWSCAPE_SCENE") {
            match val.parse::<ScenePreset>() {
                Ok(preset) => self.scene = SceneSource::Preset(preset),
                Err(e) => tracing::warn!(target: "config", "Ignoring SNOWSCAPE_SCENE: {}", e),
            }
        }

        override_value(&lookup, "SNOWSCAPE_TARGET_FPS", &mut self.run.target_fps);
        override_value(&lookup, "SNOWSCAPE_VIEWPORT_WIDTH", &mut self.run.viewport_width);
        override_value(&lookup, "SNOWSCAPE_VIEWPORT_HEIGHT", &mut self.run.viewport_height);

        if let Some(val) = lookup("SNOWSCAPE_MAX_FRAMES") {
            match val.trim().parse::<u64>() {
                Ok(0) => self.run.max_frames = None,
                Ok(frames) => self.run.max_frames = Some(frames),
                Err(_) => tracing::warn!(
                    target: "config",
                    "Ignoring SNOWSCAPE_MAX_FRAMES: '{}' is not a frame count",
                    val
                ),
            }
        }
    }

    /// 验证配置，包括内联场景中的每个粒子系统
    pub fn validate(&self) -> ConfigResult<()> {
        self.run.validate()?;
        if let SceneSource::Inline(scene) = &self.scene {
            for system in &scene.particle_systems {
                system.validate()?;
            }
        }
        Ok(())
    }

    /// 候选配置文件，按查找顺序排列
    ///
    /// 1. ./snowscape.toml
    /// 2. ./snowscape.json
    /// 3. ~/.config/snowscape/config.toml
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("snowscape.toml"),
            PathBuf::from("snowscape.json"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("snowscape").join("config.toml"));
        }
        paths
    }

    /// 自动查找并加载配置文件，找不到时使用默认配置
    ///
    /// 存在但无法解析的文件会记录警告并跳过。
    pub fn load_or_default() -> Self {
        for path in Self::search_paths() {
            if !path.is_file() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    tracing::info!(target: "config", "Loaded config from {:?}", path);
                    return config;
                }
                Err(e) => {
                    tracing::warn!(target: "config", "Skipping {:?}: {}", path, e);
                }
            }
        }

        tracing::info!(target: "config", "Using default configuration");
        Self::default()
    }
}

fn override_value<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(val) = lookup(key) {
        match val.trim().parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!(target: "config", "Ignoring {}: '{}' is invalid", key, val),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 存在时以其为准
    pub level: LogLevel,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// `EnvFilter` 指令形式
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
