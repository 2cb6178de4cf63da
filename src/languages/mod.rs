use serde::Serialize;

/// 可选的审查语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    /// 语言标识，同时用作 Markdown 代码块的语言标签
    pub value: &'static str,
    /// 展示名称
    pub label: &'static str,
}

/// 支持的语言列表，第一项为默认语言
pub const SUPPORTED_LANGUAGES: &[LanguageOption] = &[
    LanguageOption { value: "javascript", label: "JavaScript" },
    LanguageOption { value: "typescript", label: "TypeScript" },
    LanguageOption { value: "python", label: "Python" },
    LanguageOption { value: "java", label: "Java" },
    LanguageOption { value: "csharp", label: "C#" },
    LanguageOption { value: "cpp", label: "C++" },
    LanguageOption { value: "go", label: "Go" },
    LanguageOption { value: "ruby", label: "Ruby" },
    LanguageOption { value: "php", label: "PHP" },
    LanguageOption { value: "html", label: "HTML" },
    LanguageOption { value: "css", label: "CSS" },
    LanguageOption { value: "sql", label: "SQL" },
    LanguageOption { value: "rust", label: "Rust" },
    LanguageOption { value: "kotlin", label: "Kotlin" },
    LanguageOption { value: "swift", label: "Swift" },
    LanguageOption { value: "markdown", label: "Markdown" },
    LanguageOption { value: "json", label: "JSON" },
    LanguageOption { value: "yaml", label: "YAML" },
    LanguageOption { value: "shell", label: "Shell/Bash" },
    LanguageOption { value: "plaintext", label: "Plain Text" },
];

impl LanguageOption {
    /// 默认语言
    pub fn default_language() -> &'static LanguageOption {
        &SUPPORTED_LANGUAGES[0]
    }

    /// 按标识查找（大小写不敏感）
    pub fn find(value: &str) -> Option<&'static LanguageOption> {
        let value = value.trim();
        SUPPORTED_LANGUAGES
            .iter()
            .find(|lang| lang.value.eq_ignore_ascii_case(value))
    }

    /// 根据文件扩展名推断语言
    pub fn from_file_path(path: &str) -> Option<&'static LanguageOption> {
        let extension = std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let value = match extension.as_str() {
            "js" | "jsx" | "mjs" | "cjs" => "javascript",
            "ts" | "tsx" => "typescript",
            "py" => "python",
            "java" => "java",
            "cs" => "csharp",
            "cpp" | "cc" | "cxx" | "hpp" | "h" => "cpp",
            "go" => "go",
            "rb" => "ruby",
            "php" => "php",
            "html" | "htm" => "html",
            "css" => "css",
            "sql" => "sql",
            "rs" => "rust",
            "kt" | "kts" => "kotlin",
            "swift" => "swift",
            "md" => "markdown",
            "json" => "json",
            "yaml" | "yml" => "yaml",
            "sh" | "bash" | "zsh" => "shell",
            "txt" => "plaintext",
            _ => return None,
        };

        Self::find(value)
    }

    /// 所有支持的语言标识，用于错误提示
    pub fn supported_values() -> Vec<&'static str> {
        SUPPORTED_LANGUAGES.iter().map(|lang| lang.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language() {
        assert_eq!(LanguageOption::default_language().value, "javascript");
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let lang = LanguageOption::find("Python").unwrap();
        assert_eq!(lang.label, "Python");
        assert_eq!(LanguageOption::find(" csharp ").unwrap().label, "C#");
        assert!(LanguageOption::find("cobol").is_none());
    }

    #[test]
    fn test_from_file_path() {
        assert_eq!(LanguageOption::from_file_path("src/main.rs").unwrap().value, "rust");
        assert_eq!(LanguageOption::from_file_path("app/App.TSX").unwrap().value, "typescript");
        assert_eq!(LanguageOption::from_file_path("deploy.yml").unwrap().value, "yaml");
        assert!(LanguageOption::from_file_path("Makefile").is_none());
    }

    #[test]
    fn test_supported_values() {
        let values = LanguageOption::supported_values();
        assert_eq!(values.len(), 20);
        assert_eq!(values.last(), Some(&"plaintext"));
    }
}
