use async_trait::async_trait;

use crate::modules::chat::ports::{GeneratedText, LLMError, LLMPort, TokenUsage};

/// 模拟 LLM 适配器
///
/// 用于离线运行或未配置 API Key 时的回退，原样回显用户输入
pub struct MockLLMAdapter;

impl MockLLMAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockLLMAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMPort for MockLLMAdapter {
    fn provider_id(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate_text(&self, prompt: &str) -> Result<GeneratedText, LLMError> {
        let content = format!(
            "You said: \"{}\"\n(This is a simulated reply. Set GEMINI_API_KEY to talk to Gemini.)",
            prompt
        );
        let completion_tokens = content.split_whitespace().count() as u32;
        let prompt_tokens = prompt.split_whitespace().count() as u32;

        Ok(GeneratedText {
            usage: Some(TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
            ..GeneratedText::new(content)
        })
    }
}
