use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 运行配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// 目标帧率
    pub target_fps: u32,

    /// 最多运行的帧数，`None` 表示一直运行
    pub max_frames: Option<u64>,

    /// 无窗口后端的显示尺寸
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl_default!(RunConfig {
    target_fps: 60,
    max_frames: None,
    viewport_width: 1280,
    viewport_height: 720,
});

impl RunConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.target_fps == 0 || self.target_fps > 1000 {
            return Err(ConfigError::Validation(format!(
                "Invalid target FPS: {}",
                self.target_fps
            )));
        }
        // 尺寸为 0 是允许的：视口同步会每帧跳过，不会崩溃
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_fps_bounds() {
        let mut config = RunConfig::default();
        assert!(config.validate().is_ok());

        config.target_fps = 0;
        assert!(config.validate().is_err());
        config.target_fps = 1001;
        assert!(config.validate().is_err());
        config.target_fps = 1000;
        assert!(config.validate().is_ok());
    }
}
