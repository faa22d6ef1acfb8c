//! 核心模块
//!
//! 包含场景核心的基础设施：
//! - `error` - 错误类型定义
//! - `scheduler` - 帧时钟与帧循环
//! - `macros` - 配置结构体样板宏

pub mod error;
pub mod scheduler;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{
    BackendError, BackendResult, ConfigurationError, ConfigurationResult, SceneError, SceneResult,
};

// 重新导出调度类型
pub use scheduler::{
    run_frames, FixedStepFrameSource, FrameClock, FrameSource, FrameTarget, PacedFrameSource,
};
