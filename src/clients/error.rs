//! 批改服务接口错误

use serde::Deserialize;
use thiserror::Error;

#[derive(Deserialize)]
struct RawError {
    #[serde(alias = "error")]
    message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败或响应体无法解析
    #[error("请求失败: {0}")]
    Request(#[from] reqwest::Error),

    /// 服务返回非 2xx
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// 无法拼出请求地址
    #[error("无效的地址 '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// 从非 2xx 响应构造错误，尽量取出 JSON 中的 message 字段
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "无法读取响应内容".to_string());

        ApiError::Http {
            status,
            message: extract_message(&body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidUrl { .. } => None,
        }
    }
}

fn extract_message(body: &str) -> String {
    match serde_json::from_str::<RawError>(body) {
        Ok(raw) => raw.message,
        Err(_) => body.trim().to_string(),
    }
}
