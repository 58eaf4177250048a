use std::fmt;

use thiserror::Error;

use crate::clients::ApiError;

/// 工作流失败类别
///
/// 四类失败的处理方式完全相同：提示用户并回到上传状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// 上传图片失败（网络错误或非 2xx）
    Submission,
    /// 查询任务状态失败
    Poll,
    /// 后端报告任务失败
    JobFailed,
    /// 获取批改结果失败
    ResultsFetch,
}

impl FailureKind {
    /// 提示框标题
    pub fn alert_text(self) -> &'static str {
        match self {
            FailureKind::Submission => "Failed to upload image",
            FailureKind::Poll => "Failed to check grading status",
            FailureKind::JobFailed => "Grading failed",
            FailureKind::ResultsFetch => "Failed to load grading results",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alert_text())
    }
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum GradeError {
    /// 上传失败
    #[error("上传失败: {0}")]
    Submission(#[source] ApiError),

    /// 轮询失败
    #[error("轮询任务 {job_id} 失败: {source}")]
    Poll {
        job_id: String,
        #[source]
        source: ApiError,
    },

    /// 轮询循环意外退出
    #[error("任务 {job_id} 的轮询意外中断")]
    PollInterrupted { job_id: String },

    /// 后端报告任务失败
    #[error("任务 {job_id} 执行失败: {message}")]
    JobFailed { job_id: String, message: String },

    /// 获取结果失败
    #[error("获取任务 {job_id} 的结果失败: {source}")]
    ResultsFetch {
        job_id: String,
        #[source]
        source: ApiError,
    },

    /// 当前状态不允许该操作
    #[error("状态 {from} 下不允许操作: {action}")]
    InvalidTransition { from: &'static str, action: &'static str },

    /// 标注图地址无法解析
    #[error("无法解析标注图地址 '{url}': {reason}")]
    InvalidImageUrl { url: String, reason: String },

    /// 文件错误
    #[error("文件错误 ({path}): {message}")]
    File { path: String, message: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

impl GradeError {
    /// 归类为工作流失败（其余错误返回 None）
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            GradeError::Submission(_) => Some(FailureKind::Submission),
            GradeError::Poll { .. } | GradeError::PollInterrupted { .. } => {
                Some(FailureKind::Poll)
            }
            GradeError::JobFailed { .. } => Some(FailureKind::JobFailed),
            GradeError::ResultsFetch { .. } => Some(FailureKind::ResultsFetch),
            _ => None,
        }
    }

    /// 创建文件错误
    pub fn file(path: impl Into<String>, message: impl Into<String>) -> Self {
        GradeError::File {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, GradeError>;
