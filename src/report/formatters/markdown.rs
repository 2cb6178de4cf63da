use super::ReportFormatter;
use crate::review::CompletedReview;
use anyhow::Result;

/// Markdown 格式化器
#[derive(Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// 创建新的 Markdown 格式化器
    pub fn new() -> Self {
        Self
    }

    /// 选择不会与代码内容冲突的围栏
    fn fence_for(code: &str) -> String {
        let mut longest = 0;
        let mut current = 0;
        for ch in code.chars() {
            if ch == '`' {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }
        "`".repeat(longest.max(2) + 1)
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, review: &CompletedReview) -> Result<String> {
        let fence = Self::fence_for(&review.result.revised_code);
        let mut output = String::new();

        output.push_str("# 代码审查结果\n\n");

        if let Some(advisory) = &review.advisory {
            output.push_str(&format!("> ⚠️ {}\n\n", advisory));
        }

        output.push_str("## 审查反馈\n\n");
        output.push_str(&review.result.feedback);
        output.push_str("\n\n");

        output.push_str("## 修订后的代码\n\n");
        output.push_str(&format!(
            "{}{}\n{}\n{}\n\n",
            fence, review.result.language, review.result.revised_code, fence
        ));

        output.push_str(&format!(
            "---\n\n*{} / {} · {} ms*\n",
            review.provider, review.model, review.duration_ms
        ));

        Ok(output)
    }

    fn name(&self) -> &str {
        "markdown"
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::formatters::test_support::sample_review;
    use crate::review::Advisory;

    #[test]
    fn test_markdown_format() {
        let output = MarkdownFormatter::new().format(&sample_review(None)).unwrap();

        assert!(output.starts_with("# 代码审查结果"));
        assert!(output.contains("```python\ntotal = sum(values)\n```"));
        assert!(!output.contains("⚠️"));
    }

    #[test]
    fn test_markdown_format_with_advisory() {
        let output = MarkdownFormatter::new()
            .format(&sample_review(Some(Advisory::MissingCode)))
            .unwrap();

        assert!(output.contains("> ⚠️ no revised code block was identified"));
    }

    #[test]
    fn test_fence_longer_than_code_backticks() {
        assert_eq!(MarkdownFormatter::fence_for("plain"), "```");
        assert_eq!(MarkdownFormatter::fence_for("a ```b``` c"), "````");
    }
}
