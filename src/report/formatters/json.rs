use super::ReportFormatter;
use crate::review::CompletedReview;
use anyhow::Result;

/// JSON 格式化器
#[derive(Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// 创建新的 JSON 格式化器
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, review: &CompletedReview) -> Result<String> {
        Ok(serde_json::to_string_pretty(review)?)
    }

    fn name(&self) -> &str {
        "json"
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
