use anyhow::Result;
use std::sync::Arc;

pub mod http;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod stream;

pub use prompt::{PromptBuilder, PromptTemplate};
pub use provider::{AIProvider, ProviderConfig, ProviderFactory, StreamResponse};

/// AI 服务：提供商 + 调用配置
pub struct AIService {
    provider: Arc<dyn AIProvider>,
    config: ProviderConfig,
}

impl AIService {
    /// 创建新的 AI 服务实例
    pub fn new(provider: Arc<dyn AIProvider>, config: ProviderConfig) -> Self {
        Self { provider, config }
    }

    /// 根据提供商名称创建
    pub fn from_name(name: &str, config: ProviderConfig) -> Result<Self> {
        let provider: Arc<dyn AIProvider> = Arc::from(ProviderFactory::create(name)?);
        Ok(Self::new(provider, config))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// 发送提示词并返回完整的响应文本
    ///
    /// 流式模式下每收到一段内容调用一次 `on_chunk`，最终仍返回拼接后的全文。
    pub async fn complete<F>(&self, prompt: &str, on_chunk: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        if self.config.stream {
            let stream = self.provider.stream_generate(prompt, &self.config).await?;
            stream::collect_stream(stream, on_chunk).await
        } else {
            self.provider.generate(prompt, &self.config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures_util::stream;

    struct MockProvider;

    #[async_trait]
    impl AIProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(&self, _prompt: &str, _config: &ProviderConfig) -> Result<String> {
            Ok("full response".to_string())
        }

        async fn stream_generate(
            &self,
            _prompt: &str,
            _config: &ProviderConfig,
        ) -> Result<StreamResponse> {
            let chunks: Vec<Result<String>> = vec![Ok("streamed ".to_string()), Ok("response".to_string())];
            Ok(Box::pin(stream::iter(chunks)))
        }
    }

    #[tokio::test]
    async fn test_complete_non_stream() {
        let service = AIService::new(Arc::new(MockProvider), ProviderConfig::default());
        let text = service.complete("prompt", |_| {}).await.unwrap();

        assert_eq!(text, "full response");
        assert_eq!(service.provider_name(), "mock");
    }

    #[tokio::test]
    async fn test_complete_stream() {
        let config = ProviderConfig {
            stream: true,
            ..ProviderConfig::default()
        };
        let service = AIService::new(Arc::new(MockProvider), config);

        let mut chunks = 0;
        let text = service.complete("prompt", |_| chunks += 1).await.unwrap();

        assert_eq!(text, "streamed response");
        assert_eq!(chunks, 2);
    }

    #[test]
    fn test_from_name_unknown_provider() {
        assert!(AIService::from_name("unknown", ProviderConfig::default()).is_err());
    }
}
