use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::super::{ApplicationError, ChatStore};
use crate::infrastructure::UiHandle;
use crate::modules::chat::domain::{ChatMessage, MessageId};
use crate::modules::chat::ports::{LLMError, LLMPort};

/// 发送消息命令
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// 用户消息内容，同时作为 prompt
    pub content: String,
}

impl SendMessageCommand {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// 空字符串被拒绝；只含空白的文本视为非空
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.content.is_empty() {
            return Err(ApplicationError::ValidationError(
                "Message content cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// 发送回执
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReceipt {
    /// 已追加的用户消息
    pub sent_id: MessageId,
    /// 稍后追加、并由本次发送解析的占位消息
    pub placeholder_id: MessageId,
}

/// 一次发送的后台任务
///
/// 负责停顿、追加占位消息、调用远端服务并解析占位消息。
/// 对历史的所有修改都投递到 UI 上下文执行
pub(crate) struct SendMessageJob {
    prompt: String,
    placeholder: ChatMessage,
    llm: Arc<dyn LLMPort>,
    ui: UiHandle<ChatStore>,
    delay: Duration,
}

impl SendMessageJob {
    pub(crate) fn new(
        prompt: String,
        placeholder: ChatMessage,
        llm: Arc<dyn LLMPort>,
        ui: UiHandle<ChatStore>,
        delay: Duration,
    ) -> Self {
        Self {
            prompt,
            placeholder,
            llm,
            ui,
            delay,
        }
    }

    /// 在运行时上启动任务
    ///
    /// 任务提前结束或 panic 时，占位消息仍会被标记为失败，
    /// 发送计数也会随之减少
    pub(crate) fn spawn(self) {
        let placeholder_id = self.placeholder.id();
        let ui = self.ui.clone();
        let job = tokio::spawn(self.run());

        tokio::spawn(async move {
            let reason = match job.await {
                Ok(Ok(())) => return,
                Ok(Err(e)) => e.to_string(),
                Err(e) => format!("send task aborted: {}", e),
            };
            warn!("Send job for {} ended early: {}", placeholder_id, reason);

            let outcome = Err(LLMError::ProviderNotAvailable(reason));
            if ui
                .dispatch(move |store| store.settle(placeholder_id, outcome))
                .is_err()
            {
                debug!("UI context closed, dropping settle for {}", placeholder_id);
            }
        });
    }

    async fn run(self) -> Result<(), ApplicationError> {
        let placeholder_id = self.placeholder.id();

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let placeholder = self.placeholder;
        self.ui
            .dispatch(move |store| store.append(placeholder))?;

        debug!(
            "Requesting completion from {} ({}) for {}",
            self.llm.provider_id(),
            self.llm.model(),
            placeholder_id
        );
        let outcome = self.llm.generate_text(&self.prompt).await;

        self.ui
            .dispatch(move |store| store.settle(placeholder_id, outcome))?;

        Ok(())
    }
}
