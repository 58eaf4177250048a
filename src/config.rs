use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{GradeError, Result};

/// 程序配置
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 批改服务地址（结果中的标注图路径也基于此地址解析）
    pub backend_base_url: String,
    /// 轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 标注图保存目录
    pub annotated_output_dir: String,
    /// 批改记录文件
    pub report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 1000,
            request_timeout_secs: 30,
            annotated_output_dir: "annotated".to_string(),
            report_file: "grades.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取，缺失或无法解析时使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取，再用环境变量覆盖
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GradeError::file(path.display().to_string(), e.to_string()))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| GradeError::Config(format!("无法解析 {}: {}", path.display(), e)))?;
        Ok(config.with_env_overrides())
    }

    /// 解析 TOML 文本，缺少的字段取默认值
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            backend_base_url: std::env::var("GRADER_BASE_URL").unwrap_or(self.backend_base_url),
            poll_interval_ms: std::env::var("GRADER_POLL_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.poll_interval_ms),
            request_timeout_secs: std::env::var("GRADER_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            annotated_output_dir: std::env::var("GRADER_ANNOTATED_DIR").unwrap_or(self.annotated_output_dir),
            report_file: std::env::var("GRADER_REPORT_FILE").unwrap_or(self.report_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.backend_base_url).map_err(|e| {
            GradeError::Config(format!("无效的服务地址 '{}': {}", self.backend_base_url, e))
        })?;
        if self.poll_interval_ms == 0 {
            return Err(GradeError::Config("轮询间隔必须大于 0".to_string()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
