// Chat Module - 聊天模块
//
// 六边形架构：
// - domain: 领域层，消息实体、历史记录和值对象
// - ports: 端口层，远端生成服务的抽象接口
// - infrastructure: 基础设施层，Gemini / 模拟适配器
// - application: 应用层，ChatStore 和发送命令

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型
pub use application::{
    ApplicationError, ChatSettings, ChatStore, HistorySnapshot, SendMessageCommand, SendReceipt,
};

pub use domain::{
    BubbleRole, ChatMessage, History, HistoryError, MessageId, MessageStatus, FAILED_CONTENT,
    LOADING_SENTINEL,
};

pub use infrastructure::{create_llm_port, GeminiAdapter, MockLLMAdapter};

pub use ports::{
    FinishReason, GeneratedText, LLMError, LLMPort, LLMProviderConfig, ProviderType, TokenUsage,
};

use std::sync::Arc;

use crate::infrastructure::{EventBus, UiContext};

/// Chat 模块容器
///
/// 管理模块内的依赖注入，最终产出运行在 UI 上下文中的 ChatStore
pub struct ChatModule {
    llm: Arc<dyn LLMPort>,
    event_bus: Arc<EventBus>,
    settings: ChatSettings,
}

impl ChatModule {
    /// 使用已有的远端调用句柄创建
    pub fn new(llm: Arc<dyn LLMPort>, event_bus: Arc<EventBus>, settings: ChatSettings) -> Self {
        Self {
            llm,
            event_bus,
            settings,
        }
    }

    /// 根据提供商配置创建（远端句柄只在这里创建一次）
    pub fn from_provider_config(
        config: &LLMProviderConfig,
        event_bus: Arc<EventBus>,
        settings: ChatSettings,
    ) -> Result<Self, ApplicationError> {
        let llm = create_llm_port(config)?;
        Ok(Self::new(llm, event_bus, settings))
    }

    /// 获取远端调用句柄
    pub fn llm(&self) -> &Arc<dyn LLMPort> {
        &self.llm
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// 构建 UI 上下文，ChatStore 由它独占
    pub fn into_ui_context(self) -> UiContext<ChatStore> {
        let Self {
            llm,
            event_bus,
            settings,
        } = self;
        UiContext::new(move |ui| ChatStore::new(llm, ui, event_bus, settings))
    }
}
