use anyhow::Result;
use async_trait::async_trait;
use futures_util::Stream;
use std::pin::Pin;

/// 默认 Gemini 模型
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-04-17";
/// 默认 Gemini API 前缀
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// AI 提供商配置
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
    pub stream: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: String::from(DEFAULT_GEMINI_MODEL),
            api_key: None,
            api_url: String::from(DEFAULT_GEMINI_URL),
            timeout_secs: 60,
            stream: false,
        }
    }
}

/// 流式响应类型
pub type StreamResponse = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// AI 提供商接口
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// 提供商名称
    fn name(&self) -> &str;

    /// 生成响应（非流式）
    async fn generate(&self, prompt: &str, config: &ProviderConfig) -> Result<String>;

    /// 生成响应（流式）
    async fn stream_generate(
        &self,
        prompt: &str,
        config: &ProviderConfig,
    ) -> Result<StreamResponse>;
}

/// AI 提供商工厂
pub struct ProviderFactory;

impl ProviderFactory {
    /// 根据名称创建提供商
    pub fn create(name: &str) -> Result<Box<dyn AIProvider>> {
        use crate::ai::providers::GeminiProvider;

        match name.to_lowercase().as_str() {
            "gemini" => Ok(Box::new(GeminiProvider::new())),
            _ => anyhow::bail!("Unknown AI provider: {}", name),
        }
    }

    /// 获取所有支持的提供商列表
    pub fn list_providers() -> Vec<&'static str> {
        vec!["gemini"]
    }
}
