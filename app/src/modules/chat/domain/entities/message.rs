use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::super::value_objects::{BubbleRole, MessageId, MessageStatus};

/// 占位消息的哨兵内容
pub const LOADING_SENTINEL: &str = "loading";

/// 远端调用失败后替换哨兵的内容
pub const FAILED_CONTENT: &str = "No response. The request failed.";

/// 状态迁移错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Message {id} is not pending (status: {status})")]
    NotPending { id: MessageId, status: &'static str },
}

/// 聊天消息实体
///
/// `id` 和 `role` 创建后不再变化；`content` 只能在占位消息解析时被替换一次
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    id: MessageId,
    role: BubbleRole,
    content: String,
    status: MessageStatus,
    created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// 创建用户消息
    pub fn new_sent(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: BubbleRole::Sent,
            content: content.into(),
            status: MessageStatus::Delivered,
            created_at: Utc::now(),
        }
    }

    /// 创建等待响应的占位消息
    pub fn new_placeholder() -> Self {
        Self {
            id: MessageId::new(),
            role: BubbleRole::Received,
            content: LOADING_SENTINEL.to_string(),
            status: MessageStatus::Pending,
            created_at: Utc::now(),
        }
    }

    // Getters
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> BubbleRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> &MessageStatus {
        &self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// 用响应文本替换哨兵内容
    pub fn resolve(&mut self, content: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure_pending()?;
        self.content = content.into();
        self.status = MessageStatus::Resolved;
        Ok(())
    }

    /// 标记为失败，哨兵内容替换为失败提示
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure_pending()?;
        self.content = FAILED_CONTENT.to_string();
        self.status = MessageStatus::Failed {
            reason: reason.into(),
        };
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), TransitionError> {
        if self.status.is_pending() {
            Ok(())
        } else {
            Err(TransitionError::NotPending {
                id: self.id,
                status: self.status.label(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sent_message() {
        let msg = ChatMessage::new_sent("Hello");

        assert_eq!(msg.role(), BubbleRole::Sent);
        assert_eq!(msg.content(), "Hello");
        assert_eq!(msg.status(), &MessageStatus::Delivered);
        assert!(!msg.is_pending());
    }

    #[test]
    fn test_placeholder_uses_sentinel() {
        let msg = ChatMessage::new_placeholder();

        assert_eq!(msg.role(), BubbleRole::Received);
        assert_eq!(msg.content(), LOADING_SENTINEL);
        assert!(msg.is_pending());
    }

    #[test]
    fn test_resolve_replaces_content_once() {
        let mut msg = ChatMessage::new_placeholder();
        let id = msg.id();

        msg.resolve("Hi there!").unwrap();
        assert_eq!(msg.content(), "Hi there!");
        assert_eq!(msg.status(), &MessageStatus::Resolved);
        assert_eq!(msg.id(), id);
        assert_eq!(msg.role(), BubbleRole::Received);

        let second = msg.resolve("again");
        assert_eq!(
            second,
            Err(TransitionError::NotPending {
                id,
                status: "resolved"
            })
        );
        assert_eq!(msg.content(), "Hi there!");
    }

    #[test]
    fn test_fail_keeps_reason() {
        let mut msg = ChatMessage::new_placeholder();
        msg.fail("quota exceeded").unwrap();

        assert_eq!(msg.content(), FAILED_CONTENT);
        assert_eq!(
            msg.status(),
            &MessageStatus::Failed {
                reason: "quota exceeded".to_string()
            }
        );
        assert!(msg.resolve("late").is_err());
    }

    #[test]
    fn test_sent_message_cannot_be_resolved() {
        let mut msg = ChatMessage::new_sent("Hello");
        assert!(msg.resolve("overwrite").is_err());
        assert!(msg.fail("nope").is_err());
        assert_eq!(msg.content(), "Hello");
    }
}
