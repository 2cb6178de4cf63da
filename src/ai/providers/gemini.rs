use crate::ai::http::shared_client;
use crate::ai::provider::{AIProvider, ProviderConfig, StreamResponse};
use crate::ai::stream::map_sse_stream;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API key 请求头
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Generative AI 请求
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

/// Gemini 内容
#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

/// Gemini 部分
#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

/// Gemini 生成配置
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: i32,
}

impl Default for GeminiGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_output_tokens: 8192,
        }
    }
}

/// Gemini 响应
///
/// 提示词被安全策略拦截时 `candidates` 可能缺失。
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// Gemini 候选
#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
}

/// Gemini 内容响应
#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

/// Gemini 部分响应
#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

/// Gemini 错误响应
#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GeminiResponse {
    /// 拼接第一个候选的全部文本部分
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        Some(text)
    }
}

/// 从 Gemini SSE JSON 中提取内容
fn extract_gemini_content(json_str: &str) -> Option<String> {
    serde_json::from_str::<GeminiResponse>(json_str)
        .ok()
        .and_then(GeminiResponse::into_text)
}

/// 从错误响应体中提取可读信息
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<GeminiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

/// Gemini (Google) AI 提供商
///
/// 使用 Google Generative AI API，model 嵌入 URL 路径。
/// 默认 URL 前缀: https://generativelanguage.googleapis.com/v1beta
/// 环境变量: AI_REVIEW_GEMINI_API_KEY，通过 `x-goog-api-key` 请求头发送
pub struct GeminiProvider {
    client: &'static reqwest::Client,
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GeminiProvider {
    pub fn new() -> Self {
        Self {
            client: shared_client(),
        }
    }

    /// 构建 Gemini API URL
    ///
    /// URL 格式: {base_url}/models/{model}:{action}，API key 通过请求头发送，不出现在 URL 中。
    fn build_url(&self, config: &ProviderConfig, stream: bool) -> String {
        let action = if stream {
            "streamGenerateContent?alt=sse"
        } else {
            "generateContent"
        };

        format!(
            "{}/models/{}:{}",
            config.api_url.trim_end_matches('/'),
            config.model,
            action
        )
    }

    async fn send_request(
        &self,
        prompt: &str,
        config: &ProviderConfig,
        stream: bool,
    ) -> Result<reqwest::Response> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Gemini API key is required"))?;
        let url = self.build_url(config, stream);

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig::default(),
        };

        tracing::debug!(model = %config.model, stream, "sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .timeout(Duration::from_secs(config.timeout_secs))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Gemini request failed: {}", e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Gemini request failed: {} - {}",
                status,
                extract_error_message(&text)
            );
        }

        Ok(response)
    }
}

#[async_trait]
impl AIProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str, config: &ProviderConfig) -> Result<String> {
        let response = self.send_request(prompt, config, false).await?;
        let api_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Invalid Gemini response: {}", e.without_url()))?;

        Ok(api_response.into_text().unwrap_or_default())
    }

    async fn stream_generate(
        &self,
        prompt: &str,
        config: &ProviderConfig,
    ) -> Result<StreamResponse> {
        let response = self.send_request(prompt, config, true).await?;
        let stream = response.bytes_stream();
        let mapped_stream = map_sse_stream(stream, extract_gemini_content);

        Ok(Box::pin(mapped_stream))
    }
}
