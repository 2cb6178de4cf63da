use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing::{Level, Subscriber};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    pub output: LogOutput,
    pub include_file_location: bool,
    pub include_span_events: bool,
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
            include_file_location: false,
            include_span_events: false,
            filter: None,
        }
    }
}

impl LoggingConfig {
    /// 调试模式：输出 debug 级别日志和源码位置
    pub fn debug() -> Self {
        Self {
            level: Level::DEBUG,
            include_file_location: true,
            ..Self::default()
        }
    }
}

/// 日志格式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读的格式
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("Unsupported log format: {}", other),
        }
    }
}

/// 日志输出目标
///
/// 标准输出留给审查结果，日志只写到标准错误或文件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    /// 标准错误
    Stderr,
    /// 文件（追加写入）
    File(String),
}

/// 构建过滤器：`RUST_LOG` 优先，其次是配置中的级别
fn build_env_filter(config: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    let filter = match &config.filter {
        Some(filter) => EnvFilter::try_new(filter)?,
        None => EnvFilter::from_default_env()
            .add_directive(format!("ai_code_review={}", config.level).parse()?),
    };
    Ok(filter)
}

/// 设置日志系统
///
/// 重复初始化时返回错误而不是 panic。
pub fn setup_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = build_env_filter(&config)?;

    match &config.output {
        LogOutput::Stderr => {
            let fmt_layer = create_fmt_layer(&config, io::stderr);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogOutput::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let fmt_layer = create_fmt_layer(&config, Mutex::new(file));
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}

fn create_fmt_layer<S, W>(config: &LoggingConfig, make_writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let ansi = matches!(config.output, LogOutput::Stderr);

    let mut layer = fmt::layer()
        .with_writer(make_writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true);

    if config.include_file_location {
        layer = layer.with_file(true).with_line_number(true);
    }

    if config.include_span_events {
        layer = layer.with_span_events(FmtSpan::CLOSE);
    }

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}
