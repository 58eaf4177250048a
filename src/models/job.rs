use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 后端分配的任务 ID
///
/// 接口可能返回字符串或数字，统一保存为字符串
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Visitor;

        struct JobIdVisitor;

        impl<'de> Visitor<'de> for JobIdVisitor {
            type Value = JobId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer job id")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(JobId::new(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(JobId::new(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(JobId::new(value.to_string()))
            }
        }

        deserializer.deserialize_any(JobIdVisitor)
    }
}

/// 任务阶段（名称由后端给出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobPhase {
    Queued,
    Processing,
    Done,
    Failed,
    /// 未识别的阶段名，按非终态处理
    Other(String),
}

impl JobPhase {
    /// `done` 或 `failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Done | JobPhase::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobPhase::Queued => "queued",
            JobPhase::Processing => "processing",
            JobPhase::Done => "done",
            JobPhase::Failed => "failed",
            JobPhase::Other(name) => name,
        }
    }
}

impl From<String> for JobPhase {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => JobPhase::Queued,
            "processing" => JobPhase::Processing,
            "done" => JobPhase::Done,
            "failed" => JobPhase::Failed,
            _ => JobPhase::Other(value),
        }
    }
}

impl From<JobPhase> for String {
    fn from(phase: JobPhase) -> Self {
        phase.as_str().to_string()
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `POST /api/grade` 的响应
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    #[serde(rename = "jobId")]
    pub job_id: JobId,
}

/// `GET /api/grade/{jobId}` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(rename = "status")]
    pub phase: JobPhase,
    #[serde(default, deserialize_with = "deserialize_progress")]
    pub progress: u8,
    #[serde(default)]
    pub message: String,
}

impl JobStatus {
    pub fn new(phase: JobPhase, progress: u8, message: impl Into<String>) -> Self {
        Self {
            phase,
            progress: progress.min(100),
            message: message.into(),
        }
    }
}

/// 进度可能是数字或数字字符串，统一截断到 0-100
fn deserialize_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;

    struct ProgressVisitor;

    impl<'de> Visitor<'de> for ProgressVisitor {
        type Value = u8;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or numeric string between 0 and 100")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if value.is_nan() {
                return Ok(0);
            }
            Ok(value.clamp(0.0, 100.0).round() as u8)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.clamp(0, 100) as u8)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.min(100) as u8)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value
                .trim()
                .parse::<f64>()
                .map_err(E::custom)
                .and_then(|v| self.visit_f64(v))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0)
        }
    }

    deserializer.deserialize_any(ProgressVisitor)
}

/// 正在处理的任务
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub phase: JobPhase,
    pub progress: u8,
    pub message: String,
    pub submitted_at: DateTime<Local>,
}

impl Job {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            phase: JobPhase::Queued,
            progress: 0,
            message: String::new(),
            submitted_at: Local::now(),
        }
    }

    /// 以最新一次轮询结果为准，不做平滑
    pub fn apply(&mut self, status: &JobStatus) {
        self.phase = status.phase.clone();
        self.progress = status.progress;
        self.message = status.message.clone();
    }
}
