use serde::Serialize;
use tokio::sync::broadcast;

use crate::modules::chat::domain::{BubbleRole, MessageId};

/// 事件通道容量
const EVENT_CHANNEL_CAPACITY: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AppEvent {
    MessageAppended {
        message_id: MessageId,
        role: BubbleRole,
    },
    MessageResolved {
        message_id: MessageId,
    },
    MessageFailed {
        message_id: MessageId,
        error: String,
    },
}

impl AppEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::MessageAppended { .. } => "chat:appended",
            AppEvent::MessageResolved { .. } => "chat:resolved",
            AppEvent::MessageFailed { .. } => "chat:failed",
        }
    }
}

pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: AppEvent) {
        match &event {
            AppEvent::MessageFailed { message_id, error } => {
                tracing::warn!("[EventBus] {} {}: {}", event.name(), message_id, error);
            }
            _ => tracing::debug!("[EventBus] Publishing event: {:?}", event),
        }
        // 没有订阅者时发送失败，忽略即可
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
