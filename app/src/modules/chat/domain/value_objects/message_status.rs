use serde::{Deserialize, Serialize};

/// 消息状态
///
/// Sent 消息始终为 `Delivered`。
/// Received 消息只允许单向迁移：`Pending` -> `Resolved` | `Failed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MessageStatus {
    /// 已发送（用户消息）
    Delivered,
    /// 等待远端响应的占位消息
    Pending,
    /// 已收到响应
    Resolved,
    /// 远端调用失败
    Failed { reason: String },
}

impl MessageStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, MessageStatus::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MessageStatus::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageStatus::Delivered => "delivered",
            MessageStatus::Pending => "pending",
            MessageStatus::Resolved => "resolved",
            MessageStatus::Failed { .. } => "failed",
        }
    }
}
