//! 测试用的批改服务：按脚本返回响应，并记录调用次数
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use proof_grade_client::{
    ApiError, GradingBackend, GradingResult, ImageFile, Issue, JobId, JobPhase, JobStatus,
};

pub const BASE_URL: &str = "http://127.0.0.1:5000";
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

enum Reply<T> {
    Ok(T),
    Err(u16, String),
}

impl<T: Clone> Reply<T> {
    fn to_result(&self) -> Result<T, ApiError> {
        match self {
            Reply::Ok(v) => Ok(v.clone()),
            Reply::Err(status, message) => Err(ApiError::Http {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

#[derive(Default)]
pub struct ScriptedBackend {
    submissions: Mutex<VecDeque<Reply<JobId>>>,
    statuses: Mutex<HashMap<String, VecDeque<Reply<JobStatus>>>>,
    results: Mutex<HashMap<String, Reply<GradingResult>>>,
    status_delay: Duration,
    image_failure: Option<(u16, String)>,
    submit_count: AtomicUsize,
    poll_counts: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    image_requests: Mutex<Vec<String>>,
    uploaded: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_ok(self, job_id: &str) -> Self {
        self.submissions.lock().unwrap().push_back(Reply::Ok(JobId::new(job_id)));
        self
    }

    pub fn submit_err(self, status: u16, message: &str) -> Self {
        self.submissions
            .lock()
            .unwrap()
            .push_back(Reply::Err(status, message.to_string()));
        self
    }

    pub fn status(self, job_id: &str, phase: JobPhase, progress: u8, message: &str) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_default()
            .push_back(Reply::Ok(JobStatus::new(phase, progress, message)));
        self
    }

    pub fn status_err(self, job_id: &str, status: u16, message: &str) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_default()
            .push_back(Reply::Err(status, message.to_string()));
        self
    }

    pub fn results(self, job_id: &str, result: GradingResult) -> Self {
        self.results
            .lock()
            .unwrap()
            .insert(job_id.to_string(), Reply::Ok(result));
        self
    }

    pub fn results_err(self, job_id: &str, status: u16, message: &str) -> Self {
        self.results
            .lock()
            .unwrap()
            .insert(job_id.to_string(), Reply::Err(status, message.to_string()));
        self
    }

    /// 标注图下载一律失败
    pub fn image_err(mut self, status: u16, message: &str) -> Self {
        self.image_failure = Some((status, message.to_string()));
        self
    }

    /// 每次状态查询的耗时
    pub fn with_status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = delay;
        self
    }

    pub fn submit_count(&self) -> usize {
        self.submit_count.load(Ordering::SeqCst)
    }

    pub fn poll_count(&self, job_id: &str) -> usize {
        self.poll_counts
            .lock()
            .unwrap()
            .get(job_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn image_requests(&self) -> Vec<String> {
        self.image_requests.lock().unwrap().clone()
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    fn next_status(&self, job_id: &JobId) -> Result<JobStatus, ApiError> {
        *self
            .poll_counts
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_insert(0) += 1;

        let mut statuses = self.statuses.lock().unwrap();
        match statuses.get_mut(job_id.as_str()).and_then(|q| q.pop_front()) {
            Some(reply) => reply.to_result(),
            // 脚本用完后任务一直处于处理中
            None => Ok(JobStatus::new(JobPhase::Processing, 50, "still grading")),
        }
    }
}

impl GradingBackend for ScriptedBackend {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    fn submit<'a>(&'a self, image: &'a ImageFile) -> BoxFuture<'a, Result<JobId, ApiError>> {
        async move {
            self.submit_count.fetch_add(1, Ordering::SeqCst);
            self.uploaded.lock().unwrap().push(image.file_name.clone());
            match self.submissions.lock().unwrap().pop_front() {
                Some(reply) => reply.to_result(),
                None => Err(ApiError::Http {
                    status: 500,
                    message: "no scripted submission".to_string(),
                }),
            }
        }
        .boxed()
    }

    fn job_status<'a>(&'a self, job_id: &'a JobId) -> BoxFuture<'a, Result<JobStatus, ApiError>> {
        async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.status_delay.is_zero() {
                tokio::time::sleep(self.status_delay).await;
            }
            let status = self.next_status(job_id);

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            status
        }
        .boxed()
    }

    fn fetch_results<'a>(
        &'a self,
        job_id: &'a JobId,
    ) -> BoxFuture<'a, Result<GradingResult, ApiError>> {
        async move {
            match self.results.lock().unwrap().get(job_id.as_str()) {
                Some(reply) => reply.to_result(),
                None => Err(ApiError::Http {
                    status: 404,
                    message: "job not found".to_string(),
                }),
            }
        }
        .boxed()
    }

    fn fetch_image<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ApiError>> {
        async move {
            self.image_requests.lock().unwrap().push(url.to_string());
            match &self.image_failure {
                Some((status, message)) => Err(ApiError::Http {
                    status: *status,
                    message: message.clone(),
                }),
                None => Ok(vec![0xFF, 0xD8, 0xFF, 0xE0]),
            }
        }
        .boxed()
    }
}

pub fn png(name: &str) -> ImageFile {
    ImageFile::new(name, "image/png", b"\x89PNG\r\n\x1a\nproof".to_vec())
}

pub fn b_plus_result() -> GradingResult {
    GradingResult {
        total_grade: "B+".to_string(),
        issues: vec![Issue {
            number: 1,
            description: "missing base case".to_string(),
        }],
        annotated_image: "/static/annotated/x.jpg".to_string(),
    }
}

/// 等待若干个轮询间隔
pub async fn wait_intervals(n: u32) {
    tokio::time::sleep(POLL_INTERVAL * n).await;
}
