use std::collections::HashMap;
use thiserror::Error;

use super::message::{ChatMessage, TransitionError};
use super::super::value_objects::MessageId;

/// 历史记录错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// 会话历史
///
/// 按插入顺序保存消息（即显示顺序，最早的在前）。
/// 只允许追加，以及对占位消息按 ID 原地替换一次内容
#[derive(Debug, Clone, Default)]
pub struct History {
    messages: Vec<ChatMessage>,
    /// 消息 ID -> 下标
    index: HashMap<MessageId, usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加消息
    pub fn push(&mut self, message: ChatMessage) {
        self.index.insert(message.id(), self.messages.len());
        self.messages.push(message);
    }

    /// 解析占位消息
    pub fn resolve(
        &mut self,
        id: MessageId,
        content: impl Into<String>,
    ) -> Result<&ChatMessage, HistoryError> {
        let message = self.get_mut(id)?;
        message.resolve(content)?;
        Ok(message)
    }

    /// 将占位消息标记为失败
    pub fn fail(
        &mut self,
        id: MessageId,
        reason: impl Into<String>,
    ) -> Result<&ChatMessage, HistoryError> {
        let message = self.get_mut(id)?;
        message.fail(reason)?;
        Ok(message)
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.index.get(&id).map(|&i| &self.messages[i])
    }

    fn get_mut(&mut self, id: MessageId) -> Result<&mut ChatMessage, HistoryError> {
        let i = *self
            .index
            .get(&id)
            .ok_or(HistoryError::MessageNotFound(id))?;
        Ok(&mut self.messages[i])
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_pending()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::domain::entities::LOADING_SENTINEL;
    use crate::modules::chat::domain::value_objects::BubbleRole;

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut history = History::new();
        history.push(ChatMessage::new_sent("first"));
        history.push(ChatMessage::new_sent("second"));

        let contents: Vec<&str> = history.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(history.last().unwrap().content(), "second");
    }

    #[test]
    fn test_resolve_targets_placeholder_by_id() {
        let mut history = History::new();
        let first = ChatMessage::new_placeholder();
        let first_id = first.id();
        history.push(ChatMessage::new_sent("A"));
        history.push(first);
        history.push(ChatMessage::new_sent("B"));
        history.push(ChatMessage::new_placeholder());

        history.resolve(first_id, "answer A").unwrap();

        assert_eq!(history.get(first_id).unwrap().content(), "answer A");
        assert_eq!(history.as_slice()[1].id(), first_id);
        let last = history.last().unwrap();
        assert_eq!(last.role(), BubbleRole::Received);
        assert_eq!(last.content(), LOADING_SENTINEL);
        assert_eq!(history.as_slice()[2].content(), "B");
        assert_eq!(history.pending_count(), 1);
    }

    #[test]
    fn test_resolve_unknown_id() {
        let mut history = History::new();
        let missing = MessageId::new();

        let result = history.resolve(missing, "text");
        assert_eq!(result.unwrap_err(), HistoryError::MessageNotFound(missing));
    }

    #[test]
    fn test_fail_after_resolve_is_rejected() {
        let mut history = History::new();
        let placeholder = ChatMessage::new_placeholder();
        let id = placeholder.id();
        history.push(placeholder);

        history.resolve(id, "").unwrap();
        let err = history.fail(id, "late failure").unwrap_err();

        assert!(matches!(err, HistoryError::Transition(_)));
        assert_eq!(history.get(id).unwrap().content(), "");
    }
}
