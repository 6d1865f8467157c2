use std::sync::Arc;
use tracing::{info, warn};

use crate::modules::chat::ports::{LLMError, LLMPort, LLMProviderConfig, ProviderType};

use super::{GeminiAdapter, MockLLMAdapter};

/// 根据配置创建适配器
///
/// 适配器只在启动时创建一次，之后所有发送共享同一个实例。
/// Gemini 未配置 API Key 时回退到模拟适配器
pub fn create_llm_port(config: &LLMProviderConfig) -> Result<Arc<dyn LLMPort>, LLMError> {
    match config.provider_type {
        ProviderType::Gemini if config.api_key.trim().is_empty() => {
            warn!("No Gemini API key configured, falling back to mock provider");
            Ok(Arc::new(MockLLMAdapter::new()))
        }
        ProviderType::Gemini => {
            info!(
                "Using Gemini provider: model={}, base_url={}",
                config.model, config.base_url
            );
            Ok(Arc::new(GeminiAdapter::new(config.clone())?))
        }
        ProviderType::Mock => {
            info!("Using mock provider");
            Ok(Arc::new(MockLLMAdapter::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_with_key() {
        let config = LLMProviderConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        };

        let port = create_llm_port(&config).unwrap();
        assert_eq!(port.provider_id(), "gemini");
        assert_eq!(port.model(), "gemini-pro");
    }

    #[test]
    fn test_missing_key_falls_back_to_mock() {
        let config = LLMProviderConfig::default();

        let port = create_llm_port(&config).unwrap();
        assert_eq!(port.provider_id(), "mock");
    }

    #[test]
    fn test_explicit_mock() {
        let config = LLMProviderConfig {
            provider_type: ProviderType::Mock,
            api_key: "ignored".to_string(),
            ..Default::default()
        };

        let port = create_llm_port(&config).unwrap();
        assert_eq!(port.provider_id(), "mock");
    }
}
