pub mod interpreter;
pub mod result;

pub use interpreter::{interpret, ResponseInterpreter};
pub use result::{Advisory, Interpretation, ReviewRequest, ReviewResult};

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::ai::{AIService, PromptBuilder};
use crate::infrastructure::error::ReviewError;
use crate::languages::LanguageOption;

/// 一次完整审查的输出
#[derive(Debug, Clone, Serialize)]
pub struct CompletedReview {
    pub result: ReviewResult,
    pub advisory: Option<Advisory>,
    pub provider: String,
    pub model: String,
    pub duration_ms: u64,
}

/// 代码审查服务：校验请求 → 构建提示词 → 调用 AI → 解析响应
pub struct CodeReviewService {
    ai: AIService,
    prompt_builder: PromptBuilder,
    interpreter: ResponseInterpreter,
}

impl CodeReviewService {
    pub fn new(ai: AIService, prompt_builder: PromptBuilder) -> Self {
        Self {
            ai,
            prompt_builder,
            interpreter: ResponseInterpreter::new(),
        }
    }

    /// 校验请求，返回对应的语言选项
    pub fn validate(request: &ReviewRequest) -> Result<&'static LanguageOption, ReviewError> {
        if request.source_code.trim().is_empty() {
            return Err(ReviewError::validation(
                "Please enter some code to review.",
                Some("source_code"),
            ));
        }

        LanguageOption::find(&request.language_hint).ok_or_else(|| {
            ReviewError::validation(
                format!(
                    "Unsupported language: {} (supported: {})",
                    request.language_hint,
                    LanguageOption::supported_values().join(", ")
                ),
                Some("language_hint"),
            )
        })
    }

    /// 执行代码审查
    pub async fn review(&self, request: &ReviewRequest) -> Result<CompletedReview, ReviewError> {
        self.review_with_progress(request, |_| {}).await
    }

    /// 执行代码审查，流式模式下通过 `on_chunk` 回报进度
    pub async fn review_with_progress<F>(
        &self,
        request: &ReviewRequest,
        on_chunk: F,
    ) -> Result<CompletedReview, ReviewError>
    where
        F: FnMut(&str),
    {
        let language = Self::validate(request)?;
        let provider = self.ai.provider_name().to_string();
        let model = self.ai.config().model.clone();

        let prompt = self
            .prompt_builder
            .build_review_prompt(&request.source_code, language)
            .map_err(|e| ReviewError::Prompt {
                message: e.to_string(),
            })?;

        info!(provider = %provider, model = %model, language = language.value, "requesting code review");
        let start = Instant::now();

        let raw_text = self.ai.complete(&prompt, on_chunk).await.map_err(|e| {
            warn!(provider = %provider, error = %e, "code review request failed");
            ReviewError::ai_service(&provider, &e)
        })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(duration_ms, response_len = raw_text.len(), "received model response");

        let Interpretation { result, advisory } =
            self.interpreter.interpret(&raw_text, language.value);

        if let Some(advisory) = advisory {
            warn!(advisory = ?advisory, "{}", advisory);
        }

        Ok(CompletedReview {
            result,
            advisory,
            provider,
            model,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AIProvider, PromptTemplate, ProviderConfig, StreamResponse};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct MockProvider {
        response: Result<String, String>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl AIProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(&self, prompt: &str, _config: &ProviderConfig) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.response.clone().map_err(|e| anyhow::anyhow!(e))
        }

        async fn stream_generate(
            &self,
            _prompt: &str,
            _config: &ProviderConfig,
        ) -> Result<StreamResponse> {
            anyhow::bail!("streaming not supported by mock")
        }
    }

    fn service(response: Result<String, String>) -> (CodeReviewService, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let provider = MockProvider {
            response,
            prompts: prompts.clone(),
        };
        let ai = AIService::new(Arc::new(provider), ProviderConfig::default());
        let builder = PromptBuilder::with_template(PromptTemplate::new(
            "review",
            "Review {{language}} ({{language_lowercase}}):\n{{code}}",
        ));
        (CodeReviewService::new(ai, builder), prompts)
    }

    #[tokio::test]
    async fn test_review_success() {
        let (service, prompts) = service(Ok(
            "<REVIEW_FEEDBACK_START>Use snake_case.<REVIEW_FEEDBACK_END>\n\
             <REVISED_CODE_START language=\"python\">my_var = 1</REVISED_CODE_END>"
                .to_string(),
        ));

        let review = service
            .review(&ReviewRequest::new("myVar = 1", "Python"))
            .await
            .unwrap();

        assert_eq!(review.result.feedback, "Use snake_case.");
        assert_eq!(review.result.revised_code, "my_var = 1");
        assert_eq!(review.result.language, "python");
        assert!(review.advisory.is_none());
        assert_eq!(review.provider, "mock");

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], "Review Python (python):\nmyVar = 1");
    }

    #[tokio::test]
    async fn test_review_rejects_blank_code_without_calling_provider() {
        let (service, prompts) = service(Ok("unused".to_string()));

        let err = service
            .review(&ReviewRequest::new("   \n", "rust"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Please enter some code to review.");
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_review_rejects_unknown_language() {
        let (service, _) = service(Ok("unused".to_string()));

        let err = service
            .review(&ReviewRequest::new("code", "cobol"))
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::Validation { .. }));
        assert!(err.to_string().contains("cobol"));
    }

    #[tokio::test]
    async fn test_review_propagates_provider_failure() {
        let (service, _) = service(Err("Gemini request failed: 403 Forbidden".to_string()));

        let err = service
            .review(&ReviewRequest::new("let x = 1;", "rust"))
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::AIService { .. }));
        assert!(err.to_string().contains("403 Forbidden"));
    }

    #[tokio::test]
    async fn test_review_empty_response_is_soft_failure() {
        let (service, _) = service(Ok(String::new()));

        let review = service
            .review(&ReviewRequest::new("let x = 1;", "rust"))
            .await
            .unwrap();

        assert_eq!(review.advisory, Some(Advisory::EmptyResponse));
        assert!(!review.result.feedback.is_empty());
        assert_eq!(review.result.language, "rust");
    }
}
