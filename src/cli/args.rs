use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    name = "ai-code-review",
    version,
    about = "AI 代码审查工具 - 提交代码片段，获取审查意见和修订后的代码",
    long_about = "ai-code-review 将代码片段发送给 AI 模型（默认 Google Gemini），并把模型的回复拆分为审查反馈、修订后的代码和语言标识。代码可以来自文件或标准输入。"
)]
pub struct Args {
    /// 待审查的代码文件，不指定时从标准输入读取
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<String>,

    /// 代码语言（如 python、rust），不指定时根据文件扩展名推断
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// AI provider to use (currently only gemini)
    #[arg(short = 'P', long, default_value = "")] // 空字符串表示未指定
    pub provider: String,

    /// Model to use (default depends on provider)
    #[arg(short, long, default_value = "")] // 空字符串表示未指定
    pub model: String,

    /// API key，优先级高于环境变量
    #[arg(long = "api-key", value_name = "KEY")]
    pub api_key: Option<String>,

    /// 输出格式：text、markdown 或 json
    #[arg(long, default_value = "text")]
    pub format: String,

    /// 将审查结果写入文件而不是标准输出
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// 使用流式响应，实时显示模型输出
    #[arg(short, long, default_value_t = false)]
    pub stream: bool,

    /// 请求超时时间（秒）
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// 列出支持的语言
    #[arg(long = "list-languages", default_value_t = false)]
    pub list_languages: bool,

    /// 日志格式：compact、pretty 或 json
    #[arg(long = "log-format", default_value = "compact")]
    pub log_format: String,

    /// 日志写入文件而不是标准错误
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// 输出调试日志
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default() {
        let args = Args::parse_from(["ai-code-review"]);
        assert!(args.file.is_none());
        assert!(args.language.is_none());
        assert_eq!(args.provider, "");
        assert_eq!(args.model, "");
        assert_eq!(args.format, "text");
        assert_eq!(args.log_format, "compact");
        assert!(!args.stream);
        assert!(!args.list_languages);
        assert!(!args.debug);
    }

    #[test]
    fn test_args_with_values() {
        let args = Args::parse_from([
            "ai-code-review",
            "--file",
            "src/app.py",
            "--language",
            "python",
            "--provider",
            "gemini",
            "--model",
            "gemini-2.0-flash",
            "--api-key",
            "secret",
            "--format",
            "json",
            "--output",
            "review.json",
            "--timeout",
            "90",
            "--stream",
            "--debug",
        ]);
        assert_eq!(args.file.as_deref(), Some("src/app.py"));
        assert_eq!(args.language.as_deref(), Some("python"));
        assert_eq!(args.provider, "gemini");
        assert_eq!(args.model, "gemini-2.0-flash");
        assert_eq!(args.api_key.as_deref(), Some("secret"));
        assert_eq!(args.format, "json");
        assert_eq!(args.output.as_deref(), Some("review.json"));
        assert_eq!(args.timeout, Some(90));
        assert!(args.stream);
        assert!(args.debug);
    }

    #[test]
    fn test_args_short_flags() {
        let args = Args::parse_from(["ai-code-review", "-f", "main.rs", "-l", "rust", "-P", "gemini", "-s", "-d"]);
        assert_eq!(args.file.as_deref(), Some("main.rs"));
        assert_eq!(args.language.as_deref(), Some("rust"));
        assert_eq!(args.provider, "gemini");
        assert!(args.stream);
        assert!(args.debug);
    }
}
