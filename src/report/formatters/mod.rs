pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

use crate::review::CompletedReview;
use anyhow::Result;

/// 审查结果格式化器 trait
pub trait ReportFormatter: Send + Sync {
    /// 格式化审查结果
    fn format(&self, review: &CompletedReview) -> Result<String>;

    /// 获取格式化器名称
    fn name(&self) -> &str;

    /// 获取支持的文件扩展名
    fn file_extension(&self) -> &str;
}

/// 根据名称获取格式化器
pub fn formatter_for(name: &str) -> Result<Box<dyn ReportFormatter>> {
    match name.to_lowercase().as_str() {
        "text" | "txt" => Ok(Box::new(TextFormatter::new())),
        "markdown" | "md" => Ok(Box::new(MarkdownFormatter::new())),
        "json" => Ok(Box::new(JsonFormatter::new())),
        other => anyhow::bail!("Unsupported output format: {} (supported: text, markdown, json)", other),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::review::{Advisory, CompletedReview, ReviewResult};

    pub fn sample_review(advisory: Option<Advisory>) -> CompletedReview {
        CompletedReview {
            result: ReviewResult {
                feedback: "- Use descriptive names.".to_string(),
                revised_code: "total = sum(values)".to_string(),
                language: "python".to_string(),
            },
            advisory,
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            duration_ms: 1234,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_for() {
        assert_eq!(formatter_for("text").unwrap().name(), "text");
        assert_eq!(formatter_for("MD").unwrap().file_extension(), "md");
        assert_eq!(formatter_for("json").unwrap().file_extension(), "json");
        assert!(formatter_for("html").is_err());
    }
}
