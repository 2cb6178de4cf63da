use serde::{Deserialize, Serialize};
use std::fmt;

/// 代码审查请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// 待审查的源代码
    pub source_code: String,

    /// 语言标识（见 `SUPPORTED_LANGUAGES`）
    pub language_hint: String,
}

impl ReviewRequest {
    pub fn new(source_code: impl Into<String>, language_hint: impl Into<String>) -> Self {
        Self {
            source_code: source_code.into(),
            language_hint: language_hint.into(),
        }
    }
}

/// 审查结果：反馈、修订后的代码和检测到的语言
///
/// `feedback` 与 `revised_code` 永远不为空，缺失时以占位文本表示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub feedback: String,
    pub revised_code: String,
    pub language: String,
}

/// 解析过程中的软性提示，不阻断结果展示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// 模型返回了空响应（通常是网络或 API Key 问题）
    EmptyResponse,
    /// 有响应内容，但无法区分反馈和代码
    Unsegmented,
    /// 找到了代码，但没有识别出反馈
    MissingFeedback,
    /// 找到了反馈，但没有识别出修订后的代码
    MissingCode,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::EmptyResponse => {
                "empty response from model; check the network connection and API key"
            }
            Advisory::Unsegmented => {
                "could not separate feedback from code; showing raw response as feedback"
            }
            Advisory::MissingFeedback => "no feedback section was identified in the model response",
            Advisory::MissingCode => "no revised code block was identified in the model response",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// 解释器输出：结果 + 可选提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub result: ReviewResult,
    pub advisory: Option<Advisory>,
}

impl Interpretation {
    /// 是否为结构完整的解析结果
    pub fn is_clean(&self) -> bool {
        self.advisory.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_display() {
        assert!(Advisory::EmptyResponse.to_string().starts_with("empty response from model"));
        assert_eq!(
            Advisory::Unsegmented.to_string(),
            "could not separate feedback from code; showing raw response as feedback"
        );
    }

    #[test]
    fn test_advisory_serialization() {
        let json = serde_json::to_string(&Advisory::MissingCode).unwrap();
        assert_eq!(json, "\"missing_code\"");
    }

    #[test]
    fn test_interpretation_is_clean() {
        let interpretation = Interpretation {
            result: ReviewResult {
                feedback: "ok".to_string(),
                revised_code: "x".to_string(),
                language: "rust".to_string(),
            },
            advisory: None,
        };
        assert!(interpretation.is_clean());
    }
}
