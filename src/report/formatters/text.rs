use super::ReportFormatter;
use crate::review::CompletedReview;
use anyhow::Result;

/// 文本格式化器
pub struct TextFormatter {
    width: usize,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFormatter {
    /// 创建新的文本格式化器
    pub fn new() -> Self {
        Self { width: 60 }
    }

    /// 生成分隔线
    fn separator(&self) -> String {
        "=".repeat(self.width)
    }

    /// 生成子分隔线
    fn sub_separator(&self) -> String {
        "-".repeat(self.width)
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, review: &CompletedReview) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.separator());
        output.push_str("\n代码审查结果\n");
        output.push_str(&self.separator());
        output.push('\n');

        output.push_str("\n审查反馈\n");
        output.push_str(&self.sub_separator());
        output.push('\n');
        output.push_str(&review.result.feedback);
        output.push_str("\n\n");

        output.push_str(&format!("修订后的代码 ({})\n", review.result.language));
        output.push_str(&self.sub_separator());
        output.push('\n');
        output.push_str(&review.result.revised_code);
        output.push_str("\n\n");

        output.push_str(&self.sub_separator());
        output.push('\n');
        output.push_str(&format!(
            "{} / {} · {} ms\n",
            review.provider, review.model, review.duration_ms
        ));

        Ok(output)
    }

    fn name(&self) -> &str {
        "text"
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::formatters::test_support::sample_review;

    #[test]
    fn test_text_format_contains_sections() {
        let output = TextFormatter::new().format(&sample_review(None)).unwrap();

        assert!(output.contains("审查反馈\n"));
        assert!(output.contains("- Use descriptive names."));
        assert!(output.contains("修订后的代码 (python)"));
        assert!(output.contains("total = sum(values)"));
        assert!(output.contains("gemini / gemini-2.0-flash · 1234 ms"));
    }
}
