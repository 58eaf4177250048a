//! 批改服务 HTTP 客户端
//!
//! 封装所有与批改服务接口相关的调用逻辑
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use tracing::debug;

use crate::clients::{ApiError, GradingBackend};
use crate::config::Config;
use crate::models::{GradingResult, ImageFile, JobId, JobStatus, SubmitResponse};

/// 批改服务客户端
pub struct GradeClient {
    client: Client,
    base_url: Url,
    base_url_raw: String,
}

impl GradeClient {
    /// 创建新的批改服务客户端
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_timeout(&config.backend_base_url, config.request_timeout())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: parsed,
            base_url_raw: base_url.to_string(),
        })
    }

    /// 拼接接口地址
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|e| ApiError::InvalidUrl {
            url: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// 非 2xx 响应转为错误
    async fn check(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_response(response).await)
        }
    }

    async fn submit_inner(&self, image: &ImageFile) -> Result<JobId, ApiError> {
        let url = self.endpoint("/api/grade")?;
        debug!(
            "上传图片: {} ({}, {} 字节)",
            image.file_name,
            image.mime_type,
            image.bytes.len()
        );

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)?;
        let form = Form::new().part("file", part);

        let response = self.client.post(url).multipart(form).send().await?;
        let body: SubmitResponse = Self::check(response).await?.json().await?;

        debug!("上传成功，任务 ID: {}", body.job_id);
        Ok(body.job_id)
    }

    async fn job_status_inner(&self, job_id: &JobId) -> Result<JobStatus, ApiError> {
        let url = self.endpoint(&format!("/api/grade/{}", job_id))?;
        let response = self.client.get(url).send().await?;
        let status: JobStatus = Self::check(response).await?.json().await?;

        debug!("任务 {} 状态: {} ({}%)", job_id, status.phase, status.progress);
        Ok(status)
    }

    async fn fetch_results_inner(&self, job_id: &JobId) -> Result<GradingResult, ApiError> {
        let url = self.endpoint(&format!("/api/results/{}", job_id))?;
        let response = self.client.get(url).send().await?;
        let result = Self::check(response).await?.json().await?;
        Ok(result)
    }

    async fn fetch_image_inner(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.client.get(url).send().await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

impl GradingBackend for GradeClient {
    fn base_url(&self) -> &str {
        &self.base_url_raw
    }

    fn submit<'a>(&'a self, image: &'a ImageFile) -> BoxFuture<'a, Result<JobId, ApiError>> {
        self.submit_inner(image).boxed()
    }

    fn job_status<'a>(&'a self, job_id: &'a JobId) -> BoxFuture<'a, Result<JobStatus, ApiError>> {
        self.job_status_inner(job_id).boxed()
    }

    fn fetch_results<'a>(
        &'a self,
        job_id: &'a JobId,
    ) -> BoxFuture<'a, Result<GradingResult, ApiError>> {
        self.fetch_results_inner(job_id).boxed()
    }

    fn fetch_image<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ApiError>> {
        self.fetch_image_inner(url).boxed()
    }
}
