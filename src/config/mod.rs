use std::env;
use std::path::PathBuf;

use crate::ai::provider::{ProviderConfig, ProviderFactory, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL};
use crate::infrastructure::error::ReviewError;

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: String,
    /// 为空时使用提供商的默认模型
    pub model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_url: String,
    pub timeout_secs: u64,
    pub stream: bool,
    pub debug: bool,
    /// 加载过程中发现的问题，此时日志系统尚未初始化
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: String::new(),
            gemini_api_key: None,
            gemini_url: DEFAULT_GEMINI_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            stream: false,
            debug: false,
            warnings: Vec::new(),
        }
    }
}

/// 解析布尔型环境变量
fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// 读取非空环境变量
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config::default();

        // 加载配置文件
        #[cfg(not(test))]
        config.load_from_env_file();
        // 加载环境变量（覆盖配置文件）
        config.load_from_env();

        config
    }

    pub fn load_from_env_file(&mut self) {
        // 尝试从用户主目录加载
        if let Ok(home) = env::var("HOME") {
            let user_env_path = PathBuf::from(home).join(".ai-review").join(".env");
            if user_env_path.exists() {
                dotenvy::from_path(user_env_path).ok();
            }
        }

        // 尝试从当前目录加载
        dotenvy::dotenv().ok();
    }

    pub fn load_from_env(&mut self) {
        if let Some(provider) = non_empty_var("AI_REVIEW_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = non_empty_var("AI_REVIEW_MODEL") {
            self.model = model;
        }
        // 兼容通用的 GEMINI_API_KEY / API_KEY
        if let Some(api_key) = non_empty_var("AI_REVIEW_GEMINI_API_KEY")
            .or_else(|| non_empty_var("GEMINI_API_KEY"))
            .or_else(|| non_empty_var("API_KEY"))
        {
            self.gemini_api_key = Some(api_key);
        }
        if let Some(url) = non_empty_var("AI_REVIEW_GEMINI_URL") {
            self.gemini_url = url;
        }
        if let Some(timeout) = non_empty_var("AI_REVIEW_TIMEOUT") {
            match timeout.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => self
                    .warnings
                    .push(format!("忽略无效的 AI_REVIEW_TIMEOUT: {}", timeout)),
            }
        }
        if let Some(stream) = non_empty_var("AI_REVIEW_STREAM") {
            self.stream = parse_bool(&stream);
        }
        if let Some(debug) = non_empty_var("AI_REVIEW_DEBUG") {
            self.debug = parse_bool(&debug);
        }
    }

    pub fn update_from_args(&mut self, args: &crate::cli::args::Args) {
        // 命令行参数优先级最高
        if !args.provider.is_empty() {
            self.provider = args.provider.clone();
        }
        if !args.model.is_empty() {
            self.model = args.model.clone();
        }
        if let Some(api_key) = args.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            self.gemini_api_key = Some(api_key.clone());
        }
        if let Some(timeout) = args.timeout.filter(|t| *t > 0) {
            self.timeout_secs = timeout;
        }
        if args.stream {
            self.stream = true;
        }
        if args.debug {
            self.debug = true;
        }
    }

    pub fn validate(&self) -> Result<(), ReviewError> {
        if !ProviderFactory::list_providers().contains(&self.provider.to_lowercase().as_str()) {
            return Err(ReviewError::config(format!(
                "Unsupported provider: {} (supported: {})",
                self.provider,
                ProviderFactory::list_providers().join(", ")
            )));
        }
        if self.gemini_api_key.is_none() {
            return Err(ReviewError::config(
                "Gemini API key is required but not set. Please set AI_REVIEW_GEMINI_API_KEY environment variable, add it to a .env file, or pass --api-key",
            ));
        }
        Ok(())
    }

    /// 取出加载配置时产生的警告，日志系统初始化后再输出
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// 生成提供商的调用配置
    pub fn provider_config(&self) -> ProviderConfig {
        let model = if self.model.is_empty() {
            DEFAULT_GEMINI_MODEL.to_string()
        } else {
            self.model.clone()
        };

        ProviderConfig {
            model,
            api_key: self.gemini_api_key.clone(),
            api_url: self.gemini_url.clone(),
            timeout_secs: self.timeout_secs,
            stream: self.stream,
        }
    }
}
