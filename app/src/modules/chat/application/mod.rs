// Chat Application Layer - 应用层
// ChatStore 维护会话历史；send 命令负责一次完整的发送/接收流程

pub mod commands;
pub mod store;

pub use commands::*;
pub use store::*;

use std::time::Duration;
use thiserror::Error;

use super::domain::HistoryError;
use super::ports::LLMError;
use crate::infrastructure::UiContextClosed;

/// 应用层错误类型
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("History error: {0}")]
    HistoryError(#[from] HistoryError),

    #[error("LLM error: {0}")]
    LLMError(#[from] LLMError),

    #[error("UI context error: {0}")]
    UiContextClosed(#[from] UiContextClosed),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// 发送流程设置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// 追加用户消息与追加占位消息之间的装饰性停顿
    pub animation_delay: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            animation_delay: Duration::from_millis(300),
        }
    }
}
