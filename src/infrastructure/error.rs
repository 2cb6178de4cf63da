use thiserror::Error;

/// 审查错误类型
///
/// 只包含阻断审查的硬错误；解析不完整属于软性提示，见 `review::Advisory`。
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("{message}")]
    Validation { message: String, field: Option<String> },

    #[error("配置错误: {message}")]
    Configuration { message: String },

    #[error("提示词错误: {message}")]
    Prompt { message: String },

    #[error("AI 服务错误: {provider} - {message}")]
    AIService { provider: String, message: String },
}

impl ReviewError {
    /// 创建校验错误
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        ReviewError::Validation {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        ReviewError::Configuration {
            message: message.into(),
        }
    }

    /// 创建 AI 服务错误
    pub fn ai_service(provider: impl Into<String>, error: &anyhow::Error) -> Self {
        ReviewError::AIService {
            provider: provider.into(),
            message: format!("{:#}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let error = ReviewError::validation("Please enter some code to review.", Some("source_code"));
        assert_eq!(error.to_string(), "Please enter some code to review.");
        match error {
            ReviewError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("source_code")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_ai_service_error_keeps_context_chain() {
        let cause = anyhow::anyhow!("403 Forbidden").context("Gemini request failed");
        let error = ReviewError::ai_service("gemini", &cause);

        assert_eq!(
            error.to_string(),
            "AI 服务错误: gemini - Gemini request failed: 403 Forbidden"
        );
    }

    #[test]
    fn test_config_error() {
        let error = ReviewError::config("Gemini API key is required");
        assert_eq!(error.to_string(), "配置错误: Gemini API key is required");
    }
}
