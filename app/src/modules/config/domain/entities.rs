// Config Domain Entities
//
// 配置领域实体定义

use serde::{Deserialize, Serialize};

pub const PROVIDER_GEMINI: &str = "gemini";
pub const PROVIDER_MOCK: &str = "mock";

/// LLM 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LLMConfig {
    /// gemini | mock
    pub provider: String,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: PROVIDER_GEMINI.to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-pro".to_string(),
            timeout_secs: 60,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

/// 聊天配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatConfig {
    /// 用户消息与占位消息之间的动画停顿（毫秒）
    pub animation_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            animation_delay_ms: 300,
        }
    }
}

/// 终端视图配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewConfig {
    /// 可见的最多消息数，超出部分滚动出视口
    pub max_visible_messages: usize,
    /// 气泡宽度（字符）
    pub bubble_width: usize,
    pub color: bool,
    /// 每次重绘前清屏
    pub clear_screen: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            max_visible_messages: 50,
            bubble_width: 48,
            color: true,
            clear_screen: true,
        }
    }
}

/// 应用配置聚合根
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub llm: LLMConfig,
    pub chat: ChatConfig,
    pub view: ViewConfig,
}

impl AppConfig {
    /// 创建新的默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 用外部提供的 API Key 覆盖配置值（空值忽略）
    pub fn override_api_key(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = key;
        }
    }

    /// 验证配置是否有效
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.llm.provider != PROVIDER_GEMINI && self.llm.provider != PROVIDER_MOCK {
            errors.push(format!("Unknown LLM provider: {}", self.llm.provider));
        }
        if self.llm.model.trim().is_empty() {
            errors.push("Model name cannot be empty".to_string());
        }
        if !self.llm.base_url.starts_with("http://") && !self.llm.base_url.starts_with("https://")
        {
            errors.push(format!("Invalid base URL: {}", self.llm.base_url));
        }
        if self.llm.timeout_secs == 0 || self.llm.timeout_secs > 600 {
            errors.push("Timeout must be between 1 and 600 seconds".to_string());
        }
        if let Some(temperature) = self.llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                errors.push("Temperature must be between 0.0 and 2.0".to_string());
            }
        }
        if self.chat.animation_delay_ms > 5_000 {
            errors.push("Animation delay must not exceed 5000 ms".to_string());
        }
        if self.view.max_visible_messages == 0 {
            errors.push("At least one message must be visible".to_string());
        }
        if self.view.bubble_width < 10 || self.view.bubble_width > 200 {
            errors.push("Bubble width must be between 10 and 200".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
