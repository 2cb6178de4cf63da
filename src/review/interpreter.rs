use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::review::result::{Advisory, Interpretation, ReviewResult};

/// 反馈起始标记
pub const FEEDBACK_START_TAG: &str = "<REVIEW_FEEDBACK_START>";
/// 反馈结束标记
pub const FEEDBACK_END_TAG: &str = "<REVIEW_FEEDBACK_END>";
/// 修订代码结束标记
pub const REVISED_CODE_END_TAG: &str = "</REVISED_CODE_END>";

/// 反馈和代码都无法识别时的代码占位文本
pub const NO_DISTINCT_CODE_PLACEHOLDER: &str =
    "// Could not identify a separate revised code block.";
/// 未识别出反馈时的占位文本
pub const NO_FEEDBACK_PLACEHOLDER: &str =
    "No specific feedback text was identified, or feedback parsing failed.";
/// 模型返回空字符串时展示的反馈
pub const EMPTY_RESPONSE_FEEDBACK: &str = "(the model returned an empty response)";

/// 修订代码起始标记，可带 language="..." 属性
static REVISED_CODE_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<REVISED_CODE_START(?:\s+language="([^"]+)")?>"#)
        .expect("Failed to compile revised code start regex")
});

/// Markdown 代码块：```lang\n...\n```
static MARKDOWN_CODE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```([A-Za-z0-9_]*)\s*\n((?s:.*?))\n```")
        .expect("Failed to compile markdown code block regex")
});

/// 修订代码的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSource {
    /// 来自 `<REVISED_CODE_START>` 标记，记录起始标记的位置
    Tagged { tag_start: usize },
    /// 来自 Markdown 代码块
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ExtractedCode {
    body: String,
    source: CodeSource,
}

/// 级联解析的中间状态，每个阶段只填充仍为空的字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Extraction {
    feedback: Option<String>,
    code: Option<ExtractedCode>,
    language: Option<String>,
}

type Stage = fn(&str, Extraction) -> Extraction;

/// 按顺序执行的解析阶段：从结构最明确的标记到最宽松的位置推断
const STAGES: [(&str, Stage); 4] = [
    ("tagged_feedback", extract_tagged_feedback),
    ("tagged_code", extract_tagged_code),
    ("markdown_code", extract_markdown_code),
    ("pre_code_feedback", extract_pre_code_feedback),
];

/// 模型响应解释器
///
/// 将模型返回的原始文本拆分为反馈、修订代码和语言标识。
/// 纯函数，永不失败：无法识别的部分以占位文本补齐，并附带 [`Advisory`]。
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseInterpreter;

impl ResponseInterpreter {
    pub fn new() -> Self {
        Self
    }

    /// 解析模型响应
    pub fn interpret(&self, raw_text: &str, language_hint: &str) -> Interpretation {
        interpret(raw_text, language_hint)
    }
}

/// 解析模型响应，见 [`ResponseInterpreter`]
pub fn interpret(raw_text: &str, language_hint: &str) -> Interpretation {
    let extraction = STAGES
        .iter()
        .fold(Extraction::default(), |acc, (name, stage)| {
            let next = stage(raw_text, acc.clone());
            if next != acc {
                debug!(stage = *name, "response interpreter stage matched");
            }
            next
        });

    resolve(raw_text, language_hint, extraction)
}

/// 去除首尾空白，空串视为未找到
fn non_empty_trimmed(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 代码前的文本作为反馈，但孤立的反馈标记本身不算
fn leading_feedback(raw_text: &str, end: usize) -> Option<String> {
    non_empty_trimmed(&raw_text[..end])
        .filter(|text| text != FEEDBACK_START_TAG && text != FEEDBACK_END_TAG)
}

fn extract_tagged_feedback(raw_text: &str, mut acc: Extraction) -> Extraction {
    if acc.feedback.is_some() {
        return acc;
    }

    if let (Some(start), Some(end)) = (
        raw_text.find(FEEDBACK_START_TAG),
        raw_text.find(FEEDBACK_END_TAG),
    ) {
        let content_start = start + FEEDBACK_START_TAG.len();
        if end >= content_start {
            acc.feedback = non_empty_trimmed(&raw_text[content_start..end]);
        }
    }

    acc
}

fn extract_tagged_code(raw_text: &str, mut acc: Extraction) -> Extraction {
    let Some(caps) = REVISED_CODE_START.captures(raw_text) else {
        return acc;
    };
    let Some(open) = caps.get(0) else {
        return acc;
    };

    if let Some(language) = caps.get(1).and_then(|m| non_empty_trimmed(m.as_str())) {
        acc.language = Some(language.to_lowercase());
    }

    if acc.code.is_none() {
        if let Some(end) = raw_text.find(REVISED_CODE_END_TAG) {
            if end >= open.end() {
                acc.code = non_empty_trimmed(&raw_text[open.end()..end]).map(|body| {
                    ExtractedCode {
                        body,
                        source: CodeSource::Tagged {
                            tag_start: open.start(),
                        },
                    }
                });
            }
        }
    }

    acc
}

fn extract_markdown_code(raw_text: &str, mut acc: Extraction) -> Extraction {
    if acc.code.is_some() {
        return acc;
    }

    let Some(caps) = MARKDOWN_CODE_BLOCK.captures(raw_text) else {
        return acc;
    };
    let (Some(block), Some(body)) = (caps.get(0), caps.get(2)) else {
        return acc;
    };
    if body.as_str().is_empty() {
        return acc;
    }

    acc.code = non_empty_trimmed(body.as_str()).map(|body| ExtractedCode {
        body,
        source: CodeSource::Markdown,
    });

    if let Some(language) = caps.get(1).and_then(|m| non_empty_trimmed(m.as_str())) {
        acc.language = Some(language.to_lowercase());
    }

    if acc.feedback.is_none() && block.start() > 0 {
        acc.feedback = leading_feedback(raw_text, block.start());
    }

    acc
}

fn extract_pre_code_feedback(raw_text: &str, mut acc: Extraction) -> Extraction {
    if acc.feedback.is_some() {
        return acc;
    }

    // Markdown 代码块前的文本已在上一阶段处理
    if let Some(ExtractedCode {
        source: CodeSource::Tagged { tag_start },
        ..
    }) = acc.code
    {
        if tag_start > 0 {
            acc.feedback = leading_feedback(raw_text, tag_start);
        }
    }

    acc
}

fn resolve(raw_text: &str, language_hint: &str, extraction: Extraction) -> Interpretation {
    let language = extraction
        .language
        .unwrap_or_else(|| language_hint.to_lowercase());
    let code = extraction.code.map(|code| code.body);

    let (feedback, revised_code, advisory) = match (extraction.feedback, code) {
        (Some(feedback), Some(code)) => (feedback, code, None),
        (Some(feedback), None) => {
            let placeholder = format!("// No revised code block was identified for {}.", language);
            (feedback, placeholder, Some(Advisory::MissingCode))
        }
        (None, Some(code)) => (
            NO_FEEDBACK_PLACEHOLDER.to_string(),
            code,
            Some(Advisory::MissingFeedback),
        ),
        (None, None) => {
            let advisory = if raw_text.trim().is_empty() {
                Advisory::EmptyResponse
            } else {
                Advisory::Unsegmented
            };
            let feedback = if raw_text.is_empty() {
                EMPTY_RESPONSE_FEEDBACK.to_string()
            } else {
                raw_text.to_string()
            };
            (
                feedback,
                NO_DISTINCT_CODE_PLACEHOLDER.to_string(),
                Some(advisory),
            )
        }
    };

    Interpretation {
        result: ReviewResult {
            feedback,
            revised_code,
            language,
        },
        advisory,
    }
}
