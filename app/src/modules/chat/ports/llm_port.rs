use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// LLM 错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LLMError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitError { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Prompt blocked: {0}")]
    PromptBlocked(String),

    #[error("Response stopped early: {0}")]
    ResponseStoppedEarly(String),

    #[error("Provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// LLM 提供商类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Gemini,
    Mock,
}

/// 结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other,
}

/// Token 使用统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// 生成结果
///
/// `text` 为 `None` 表示服务没有返回任何文本，调用方按空字符串处理
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedText {
    pub text: Option<String>,
    pub finish_reason: Option<FinishReason>,
    pub usage: Option<TokenUsage>,
}

impl GeneratedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            finish_reason: Some(FinishReason::Stop),
            usage: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            text: None,
            finish_reason: None,
            usage: None,
        }
    }

    /// 取出文本，缺失时为空字符串
    pub fn into_text(self) -> String {
        self.text.unwrap_or_default()
    }
}

/// LLM 服务端口
///
/// 远端生成服务的唯一抽象；实现必须允许并发调用
#[async_trait]
pub trait LLMPort: Send + Sync {
    /// 获取提供商 ID
    fn provider_id(&self) -> &str;

    /// 当前使用的模型
    fn model(&self) -> &str;

    /// 以 `prompt` 发起一次生成请求
    async fn generate_text(&self, prompt: &str) -> Result<GeneratedText, LLMError>;
}

/// LLM 提供商配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LLMProviderConfig {
    pub provider_type: ProviderType,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Default for LLMProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::Gemini,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-pro".to_string(),
            timeout_secs: 60,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_text_becomes_empty() {
        assert_eq!(GeneratedText::empty().into_text(), "");
        assert_eq!(GeneratedText::new("Hi").into_text(), "Hi");
    }

    #[test]
    fn test_provider_type_serde() {
        let json = serde_json::to_string(&ProviderType::Gemini).unwrap();
        assert_eq!(json, "\"gemini\"");
        let parsed: ProviderType = serde_json::from_str("\"mock\"").unwrap();
        assert_eq!(parsed, ProviderType::Mock);
    }
}
