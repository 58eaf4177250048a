//! 任务状态轮询 - 业务能力层
//!
//! 只负责"按固定间隔查询一个任务"，不关心状态机
//!
//! ## 约束
//! - 固定间隔，无退避、无抖动
//! - 上一次请求完成前不会发出下一次（错过的 tick 直接丢弃）
//! - 遇到终态或错误立即停止
//! - `PollHandle` 被取消或 drop 后不再发出任何请求

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::clients::{ApiError, GradingBackend};
use crate::models::{JobId, JobPhase, JobStatus};

/// 轮询事件通道容量
const EVENT_BUFFER: usize = 16;

/// 轮询器上报的事件
#[derive(Debug)]
pub enum PollEvent {
    /// 非终态，更新进度
    Progress(JobStatus),
    /// 任务完成
    Done(JobStatus),
    /// 后端报告失败
    Failed(JobStatus),
    /// 请求失败
    Error(ApiError),
}

impl PollEvent {
    fn from_status(status: JobStatus) -> Self {
        match status.phase {
            JobPhase::Done => PollEvent::Done(status),
            JobPhase::Failed => PollEvent::Failed(status),
            _ => PollEvent::Progress(status),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollEvent::Progress(_))
    }
}

/// 一个正在运行的轮询循环
#[derive(Debug)]
pub struct PollHandle {
    job_id: JobId,
    events: mpsc::Receiver<PollEvent>,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// 等待下一个事件；循环结束后返回 None
    pub async fn next_event(&mut self) -> Option<PollEvent> {
        self.events.recv().await
    }

    /// 循环是否已经退出
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// 停止轮询
    pub fn cancel(self) {
        debug!("停止轮询任务 {}", self.job_id);
        // Drop 负责 abort
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
        self.task.abort();
    }
}

/// 状态轮询器
pub struct StatusPoller {
    backend: Arc<dyn GradingBackend>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(backend: Arc<dyn GradingBackend>, interval: Duration) -> Self {
        Self { backend, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 为一个任务启动轮询循环（第一次查询在一个间隔之后）
    pub fn spawn(&self, job_id: JobId) -> PollHandle {
        let (event_tx, events) = mpsc::channel(EVENT_BUFFER);
        let (cancel, cancel_rx) = watch::channel(false);

        let task = tokio::spawn(poll_loop(
            self.backend.clone(),
            job_id.clone(),
            self.interval,
            event_tx,
            cancel_rx,
        ));

        PollHandle {
            job_id,
            events,
            cancel,
            task,
        }
    }
}

async fn poll_loop(
    backend: Arc<dyn GradingBackend>,
    job_id: JobId,
    period: Duration,
    events: mpsc::Sender<PollEvent>,
    mut cancel: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.changed() => break,
            _ = ticker.tick() => {}
        }

        let response = tokio::select! {
            _ = cancel.changed() => break,
            response = backend.job_status(&job_id) => response,
        };

        let event = match response {
            Ok(status) => PollEvent::from_status(status),
            Err(e) => {
                warn!("查询任务 {} 状态失败: {}", job_id, e);
                PollEvent::Error(e)
            }
        };
        let terminal = event.is_terminal();

        if events.send(event).await.is_err() {
            // 接收方已丢弃
            break;
        }
        if terminal {
            break;
        }
    }

    debug!("任务 {} 的轮询循环已退出", job_id);
}
