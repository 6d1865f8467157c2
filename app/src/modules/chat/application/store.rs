use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{ApplicationError, ChatSettings, SendMessageCommand, SendMessageJob, SendReceipt};
use crate::infrastructure::{AppEvent, EventBus, UiHandle};
use crate::modules::chat::domain::{ChatMessage, History, MessageId};
use crate::modules::chat::ports::{GeneratedText, LLMError, LLMPort};

/// 历史快照，订阅者在每次修改后收到最新版本
pub type HistorySnapshot = Arc<[ChatMessage]>;

/// 聊天状态容器
///
/// 持有会话历史和唯一的远端调用句柄。只存在于 UI 上下文中，
/// 后台发送任务通过 `UiHandle` 投递修改
pub struct ChatStore {
    history: History,
    snapshot: watch::Sender<HistorySnapshot>,
    llm: Arc<dyn LLMPort>,
    ui: UiHandle<ChatStore>,
    event_bus: Arc<EventBus>,
    settings: ChatSettings,
    /// 尚未解析的发送数量（含仍在停顿中、占位消息还未追加的发送）
    in_flight: usize,
}

impl ChatStore {
    pub fn new(
        llm: Arc<dyn LLMPort>,
        ui: UiHandle<ChatStore>,
        event_bus: Arc<EventBus>,
        settings: ChatSettings,
    ) -> Self {
        let (snapshot, _) = watch::channel(HistorySnapshot::from(Vec::new()));
        Self {
            history: History::new(),
            snapshot,
            llm,
            ui,
            event_bus,
            settings,
            in_flight: 0,
        }
    }

    /// 发送一条消息
    ///
    /// 用户消息在返回前已追加到历史；占位消息和响应由后台任务稍后投递
    pub fn send(&mut self, text: impl Into<String>) -> Result<SendReceipt, ApplicationError> {
        let command = SendMessageCommand::new(text);
        command.validate()?;

        if tokio::runtime::Handle::try_current().is_err() {
            return Err(ApplicationError::InternalError(
                "send requires a running tokio runtime".to_string(),
            ));
        }

        let sent = ChatMessage::new_sent(command.content.clone());
        let placeholder = ChatMessage::new_placeholder();
        let receipt = SendReceipt {
            sent_id: sent.id(),
            placeholder_id: placeholder.id(),
        };

        info!("Sending message {}", receipt.sent_id);
        self.append(sent);
        self.in_flight += 1;

        SendMessageJob::new(
            command.content,
            placeholder,
            self.llm.clone(),
            self.ui.clone(),
            self.settings.animation_delay,
        )
        .spawn();

        Ok(receipt)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// 订阅历史快照
    pub fn subscribe(&self) -> watch::Receiver<HistorySnapshot> {
        self.snapshot.subscribe()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// 追加消息并通知观察者
    pub(crate) fn append(&mut self, message: ChatMessage) {
        let event = AppEvent::MessageAppended {
            message_id: message.id(),
            role: message.role(),
        };
        self.history.push(message);
        self.publish();
        self.event_bus.publish(event);
    }

    /// 按 ID 解析占位消息
    pub(crate) fn settle(&mut self, id: MessageId, outcome: Result<GeneratedText, LLMError>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        let event = match self.apply_outcome(id, outcome) {
            Ok(event) => event,
            Err(e) => {
                warn!("Could not settle placeholder {}: {}", id, e);
                return;
            }
        };

        self.publish();
        self.event_bus.publish(event);
    }

    fn apply_outcome(
        &mut self,
        id: MessageId,
        outcome: Result<GeneratedText, LLMError>,
    ) -> Result<AppEvent, ApplicationError> {
        match outcome {
            Ok(generated) => {
                if let Some(usage) = generated.usage {
                    debug!(
                        "Completion for {} used {} tokens ({} prompt, {} completion)",
                        id, usage.total_tokens, usage.prompt_tokens, usage.completion_tokens
                    );
                }
                self.history.resolve(id, generated.into_text())?;
                Ok(AppEvent::MessageResolved { message_id: id })
            }
            Err(error) => {
                let reason = error.to_string();
                self.history.fail(id, reason.clone())?;
                Ok(AppEvent::MessageFailed {
                    message_id: id,
                    error: reason,
                })
            }
        }
    }

    fn publish(&self) {
        self.snapshot
            .send_replace(HistorySnapshot::from(self.history.as_slice()));
    }
}
