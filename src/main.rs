use ai_code_review::cli::Args;
use ai_code_review::config::Config;
use ai_code_review::ai::{AIService, PromptBuilder};
use ai_code_review::infrastructure::logging::{setup_logging, LogFormat, LogOutput, LoggingConfig};
use ai_code_review::languages::{LanguageOption, SUPPORTED_LANGUAGES};
use ai_code_review::report::formatter_for;
use ai_code_review::review::{CodeReviewService, ReviewRequest};
use anyhow::Context;
use clap::Parser;
use std::io::{self, Read};

fn init_logging(args: &Args, config: &Config) -> anyhow::Result<()> {
    let mut logging = if config.debug {
        LoggingConfig::debug()
    } else {
        LoggingConfig::default()
    };
    logging.format = LogFormat::parse(&args.log_format)?;
    if let Some(path) = &args.log_file {
        logging.output = LogOutput::File(path.clone());
    }
    setup_logging(logging)
}

/// 读取待审查的代码：指定文件或标准输入
fn read_source(args: &Args) -> anyhow::Result<String> {
    match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("无法读取文件: {}", path)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("无法从标准输入读取代码")?;
            Ok(buffer)
        }
    }
}

/// 确定代码语言：命令行参数 > 文件扩展名 > 默认语言
fn resolve_language(args: &Args) -> String {
    if let Some(language) = &args.language {
        return language.clone();
    }

    args.file
        .as_deref()
        .and_then(LanguageOption::from_file_path)
        .unwrap_or_else(LanguageOption::default_language)
        .value
        .to_string()
}

fn print_languages() {
    println!("支持的语言:");
    for lang in SUPPORTED_LANGUAGES {
        println!("  {:<12} {}", lang.value, lang.label);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::new();
    config.update_from_args(&args);

    init_logging(&args, &config)?;
    for warning in config.take_warnings() {
        tracing::warn!("{}", warning);
    }

    if args.list_languages {
        print_languages();
        return Ok(());
    }

    config.validate()?;
    let formatter = formatter_for(&args.format)?;

    let source = read_source(&args)?;
    let request = ReviewRequest::new(source, resolve_language(&args));

    let ai = AIService::from_name(&config.provider, config.provider_config())?;
    let service = CodeReviewService::new(ai, PromptBuilder::new());

    let review = if config.stream {
        let review = service
            .review_with_progress(&request, |chunk| eprint!("{}", chunk))
            .await;
        eprintln!();
        review?
    } else {
        eprintln!("🤖 正在审查代码，请稍候...");
        service.review(&request).await?
    };

    if let Some(advisory) = &review.advisory {
        eprintln!("⚠️  {}", advisory);
    }

    let formatted = formatter.format(&review)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &formatted).with_context(|| format!("无法写入文件: {}", path))?;
            eprintln!("✅ 审查结果已保存到: {}", path);
        }
        None => println!("{}", formatted),
    }

    Ok(())
}
