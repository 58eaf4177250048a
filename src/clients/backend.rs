//! 批改服务抽象
//!
//! 控制器和轮询器只依赖这个 trait，便于替换为测试用的实现

use futures::future::BoxFuture;

use crate::clients::ApiError;
use crate::models::{GradingResult, ImageFile, JobId, JobStatus};

/// 批改服务
///
/// 职责：
/// - 上传图片，拿到任务 ID
/// - 查询任务状态
/// - 获取批改结果和标注图
/// - 不关心状态机，不重试
pub trait GradingBackend: Send + Sync + 'static {
    /// 服务地址，标注图路径基于此地址解析
    fn base_url(&self) -> &str;

    /// `POST /api/grade`
    fn submit<'a>(&'a self, image: &'a ImageFile) -> BoxFuture<'a, Result<JobId, ApiError>>;

    /// `GET /api/grade/{jobId}`
    fn job_status<'a>(&'a self, job_id: &'a JobId) -> BoxFuture<'a, Result<JobStatus, ApiError>>;

    /// `GET /api/results/{jobId}`
    fn fetch_results<'a>(
        &'a self,
        job_id: &'a JobId,
    ) -> BoxFuture<'a, Result<GradingResult, ApiError>>;

    /// 下载标注图（参数为已解析的完整地址）
    fn fetch_image<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ApiError>>;
}
