// Gemini 适配器
//
// 调用 Generative Language API 的 generateContent 接口（非流式）

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::modules::chat::ports::{
    FinishReason, GeneratedText, LLMError, LLMPort, LLMProviderConfig, TokenUsage,
};

/// 429 响应未携带 Retry-After 时的默认等待时间
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Gemini API 适配器
pub struct GeminiAdapter {
    client: Client,
    config: LLMProviderConfig,
}

impl GeminiAdapter {
    /// 创建新的 Gemini 适配器
    pub fn new(config: LLMProviderConfig) -> Result<Self, LLMError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取 API URL
    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// 转换为 Gemini 请求格式
    fn to_gemini_request(&self, prompt: &str) -> GenerateContentRequest {
        let generation_config =
            if self.config.temperature.is_some() || self.config.max_output_tokens.is_some() {
                Some(GenerationConfig {
                    temperature: self.config.temperature,
                    max_output_tokens: self.config.max_output_tokens,
                })
            } else {
                None
            };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config,
        }
    }

    /// 将非 2xx 响应映射为错误
    fn map_error_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> LLMError {
        let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status.as_u16() {
            401 | 403 => LLMError::AuthenticationError(message),
            429 => LLMError::RateLimitError {
                retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            },
            _ => LLMError::ApiError {
                code: status.as_str().to_string(),
                message,
            },
        }
    }

    /// 从响应中提取文本
    ///
    /// 取第一个候选的全部文本片段；没有候选或没有文本片段时返回 `None`
    fn extract_text(response: GenerateContentResponse) -> Result<GeneratedText, LLMError> {
        let usage = response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        let Some(candidate) = response.candidates.into_iter().next() else {
            if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(LLMError::PromptBlocked(reason));
            }
            return Ok(GeneratedText {
                text: None,
                finish_reason: None,
                usage,
            });
        };

        let finish_reason = candidate.finish_reason.as_deref().map(parse_finish_reason);
        if let Some(FinishReason::Safety | FinishReason::Recitation) = finish_reason {
            return Err(LLMError::ResponseStoppedEarly(
                candidate.finish_reason.unwrap_or_default(),
            ));
        }

        let parts: Vec<String> = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        let text = if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        };

        Ok(GeneratedText {
            text,
            finish_reason,
            usage,
        })
    }
}

fn parse_finish_reason(raw: &str) -> FinishReason {
    match raw {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" => FinishReason::Safety,
        "RECITATION" => FinishReason::Recitation,
        _ => FinishReason::Other,
    }
}

#[async_trait]
impl LLMPort for GeminiAdapter {
    fn provider_id(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate_text(&self, prompt: &str) -> Result<GeneratedText, LLMError> {
        let request = self.to_gemini_request(prompt);

        debug!(
            "Sending Gemini generateContent request: model={}, prompt_chars={}",
            self.config.model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error: {} - {}", status, error_text);
            return Err(Self::map_error_status(status, retry_after, &error_text));
        }

        let gemini_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LLMError::InvalidResponse(e.to_string()))?;

        Self::extract_text(gemini_response)
    }
}

// Gemini API 类型定义

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<GeneratedText, LLMError> {
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        GeminiAdapter::extract_text(response)
    }

    #[test]
    fn test_extract_joins_text_parts() {
        let result = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hi "},{"text":"there!"}]},"finishReason":"STOP"}],
               "usageMetadata":{"promptTokenCount":2,"candidatesTokenCount":3,"totalTokenCount":5}}"#,
        )
        .unwrap();

        assert_eq!(result.text.as_deref(), Some("Hi there!"));
        assert_eq!(result.finish_reason, Some(FinishReason::Stop));
        assert_eq!(result.usage.unwrap().total_tokens, 5);
    }

    #[test]
    fn test_extract_without_candidates_is_none() {
        let result = parse(r#"{"candidates":[]}"#).unwrap();
        assert!(result.text.is_none());

        let result = parse(r#"{}"#).unwrap();
        assert!(result.text.is_none());
    }

    #[test]
    fn test_extract_without_text_parts_is_none() {
        let result =
            parse(r#"{"candidates":[{"content":{"parts":[{}]},"finishReason":"STOP"}]}"#).unwrap();
        assert!(result.text.is_none());
    }

    #[test]
    fn test_blocked_prompt() {
        let err = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap_err();
        assert_eq!(err, LLMError::PromptBlocked("SAFETY".to_string()));
    }

    #[test]
    fn test_safety_stop_is_error() {
        let err = parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap_err();
        assert_eq!(err, LLMError::ResponseStoppedEarly("SAFETY".to_string()));
    }

    #[test]
    fn test_map_error_status() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;

        assert_eq!(
            GeminiAdapter::map_error_status(StatusCode::FORBIDDEN, None, body),
            LLMError::AuthenticationError("API key not valid".to_string())
        );
        assert_eq!(
            GeminiAdapter::map_error_status(StatusCode::TOO_MANY_REQUESTS, Some(7), ""),
            LLMError::RateLimitError {
                retry_after_secs: 7
            }
        );
        assert_eq!(
            GeminiAdapter::map_error_status(StatusCode::INTERNAL_SERVER_ERROR, None, "boom"),
            LLMError::ApiError {
                code: "500".to_string(),
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_request_shape() {
        let adapter = GeminiAdapter::new(LLMProviderConfig {
            api_key: "k".to_string(),
            max_output_tokens: Some(64),
            ..Default::default()
        })
        .unwrap();

        let json = serde_json::to_value(adapter.to_gemini_request("Hello")).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 64);
        assert!(json["generationConfig"].get("temperature").is_none());
        assert_eq!(
            adapter.api_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }
}
