use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::languages::LanguageOption;

/// 内置审查提示词模板，编译时读取 review-prompt.txt
const DEFAULT_REVIEW_TEMPLATE: &str = include_str!("../../review-prompt.txt");

/// 自定义模板路径的环境变量
pub const PROMPT_PATH_ENV: &str = "AI_REVIEW_PROMPT_PATH";

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("Failed to compile prompt variable regex"));

/// 提示词模板
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub template: String,
    pub variables: Vec<String>,
}

impl PromptTemplate {
    /// 创建新的模板
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        let template_str = template.into();
        let variables = Self::extract_variables(&template_str);

        Self {
            name: name.into(),
            template: template_str,
            variables,
        }
    }

    /// 从模板中提取变量（去重，保持出现顺序）
    fn extract_variables(template: &str) -> Vec<String> {
        let mut variables: Vec<String> = Vec::new();
        for cap in VARIABLE_PATTERN.captures_iter(template) {
            let name = cap[1].to_string();
            if !variables.contains(&name) {
                variables.push(name);
            }
        }
        variables
    }

    /// 渲染模板
    ///
    /// 单次替换所有占位符，代码中出现的 `{{...}}` 不会被再次展开。
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String> {
        if let Some(missing) = self.variables.iter().find(|var| !values.contains_key(*var)) {
            anyhow::bail!("Missing variable: {}", missing);
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.template, |cap: &Captures| {
            values
                .get(&cap[1])
                .cloned()
                .unwrap_or_else(|| cap[0].to_string())
        });

        Ok(rendered.into_owned())
    }
}

/// 提示词构建器
pub struct PromptBuilder {
    review_template: PromptTemplate,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    /// 使用内置模板，或 `AI_REVIEW_PROMPT_PATH` 指向的自定义模板
    pub fn new() -> Self {
        Self {
            review_template: load_review_template(),
        }
    }

    /// 使用指定模板
    pub fn with_template(template: PromptTemplate) -> Self {
        Self {
            review_template: template,
        }
    }

    /// 构建代码审查提示词
    pub fn build_review_prompt(&self, code: &str, language: &LanguageOption) -> Result<String> {
        let mut values = HashMap::new();
        values.insert("language".to_string(), language.label.to_string());
        values.insert("language_lowercase".to_string(), language.value.to_lowercase());
        values.insert("code".to_string(), code.to_string());

        self.review_template.render(&values)
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.review_template
    }
}

/// 加载审查模板：自定义文件读取失败时回退到内置模板
fn load_review_template() -> PromptTemplate {
    if let Ok(path) = env::var(PROMPT_PATH_ENV) {
        if Path::new(&path).exists() {
            match fs::read_to_string(&path) {
                Ok(content) => {
                    tracing::debug!(path = %path, "using custom review prompt template");
                    return PromptTemplate::new("review", content);
                }
                Err(e) => {
                    tracing::warn!("无法读取提示词文件 {}: {}，使用内置模板", path, e);
                }
            }
        } else {
            tracing::warn!("提示词文件 {} 不存在，使用内置模板", path);
        }
    }

    PromptTemplate::new("review", DEFAULT_REVIEW_TEMPLATE)
}
