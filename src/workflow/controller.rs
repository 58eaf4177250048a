//! 页面状态控制器 - 流程层
//!
//! 核心职责：按 upload → processing → results 的顺序推进一次批改
//!
//! 失败处理：
//! 1. 上传失败、轮询失败、任务失败、结果获取失败一律提示并回到 upload
//! 2. 不自动重试
//! 3. 离开 processing 时立即停止轮询

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::clients::GradingBackend;
use crate::error::{FailureKind, GradeError, Result};
use crate::models::{GradingResult, ImageFile, Job, JobId};
use crate::services::poller::{PollEvent, PollHandle, StatusPoller};
use crate::utils::logging;
use crate::workflow::view_state::{ViewPhase, ViewState};

/// 需要展示给用户的失败提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: FailureKind,
    pub message: String,
}

impl Notification {
    fn from_error(kind: FailureKind, err: &GradeError) -> Self {
        Self {
            kind,
            message: format!("{}: {}", kind.alert_text(), err),
        }
    }
}

/// 页面状态控制器
///
/// - 唯一持有 Job 和 GradingResult
/// - 同一时间最多一个轮询循环
/// - 被 drop 时正在运行的轮询随之停止
pub struct ViewStateController {
    backend: Arc<dyn GradingBackend>,
    poller: StatusPoller,
    state: ViewState,
    poll: Option<PollHandle>,
    notifications: Vec<Notification>,
}

impl ViewStateController {
    pub fn new(backend: Arc<dyn GradingBackend>, poll_interval: Duration) -> Self {
        Self {
            poller: StatusPoller::new(backend.clone(), poll_interval),
            backend,
            state: ViewState::Upload,
            poll: None,
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn phase(&self) -> ViewPhase {
        self.state.phase()
    }

    pub fn is_processing(&self) -> bool {
        self.phase() == ViewPhase::Processing
    }

    pub fn job(&self) -> Option<&Job> {
        self.state.job()
    }

    pub fn result(&self) -> Option<&GradingResult> {
        self.state.result()
    }

    /// 是否有仍在运行的轮询循环
    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// 用户选择了文件：上传并开始轮询
    ///
    /// 只能在 upload 状态调用。上传失败时记录提示并停留在 upload
    pub async fn select_file(&mut self, file: ImageFile) -> Result<ViewPhase> {
        if !self.phase().can_transition_to(ViewPhase::Processing) {
            return Err(GradeError::InvalidTransition {
                from: self.phase().name(),
                action: "select_file",
            });
        }

        // 不允许残留旧的轮询循环
        self.stop_polling();

        info!("📤 正在上传 {} ...", file.file_name);
        match self.backend.submit(&file).await {
            Ok(job_id) => {
                info!("✓ 上传成功，任务 ID: {}", job_id);
                self.poll = Some(self.poller.spawn(job_id.clone()));
                self.enter(ViewState::Processing(Job::new(job_id)));
                Ok(self.phase())
            }
            Err(e) => {
                self.fail(FailureKind::Submission, GradeError::Submission(e));
                Ok(ViewPhase::Upload)
            }
        }
    }

    /// 处理一个轮询事件，返回处理后的阶段
    ///
    /// 不在 processing 状态时直接返回当前阶段
    pub async fn step(&mut self) -> ViewPhase {
        let job_id = match &self.state {
            ViewState::Processing(job) => job.id.clone(),
            _ => return self.phase(),
        };

        let event = match self.poll.as_mut() {
            Some(handle) => handle.next_event().await,
            None => None,
        };

        match event {
            Some(PollEvent::Progress(status)) => {
                if let ViewState::Processing(job) = &mut self.state {
                    job.apply(&status);
                    logging::log_progress(&job.id, job.progress, &job.message);
                }
            }
            Some(PollEvent::Done(status)) => {
                if let ViewState::Processing(job) = &mut self.state {
                    job.apply(&status);
                }
                self.stop_polling();
                self.load_results(job_id).await;
            }
            Some(PollEvent::Failed(status)) => {
                let message = if status.message.is_empty() {
                    "后端未给出原因".to_string()
                } else {
                    status.message
                };
                self.fail(
                    FailureKind::JobFailed,
                    GradeError::JobFailed {
                        job_id: job_id.to_string(),
                        message,
                    },
                );
            }
            Some(PollEvent::Error(source)) => {
                self.fail(
                    FailureKind::Poll,
                    GradeError::Poll {
                        job_id: job_id.to_string(),
                        source,
                    },
                );
            }
            None => {
                self.fail(
                    FailureKind::Poll,
                    GradeError::PollInterrupted {
                        job_id: job_id.to_string(),
                    },
                );
            }
        }

        self.phase()
    }

    /// 一直处理轮询事件，直到离开 processing
    pub async fn run_until_settled(&mut self) -> ViewPhase {
        while self.is_processing() {
            self.step().await;
        }
        self.phase()
    }

    /// 回到 upload（"再批改一张"），丢弃任务和结果
    pub fn reset(&mut self) -> ViewPhase {
        let previous = self.phase();
        self.stop_polling();
        if previous != ViewPhase::Upload {
            self.enter(ViewState::Upload);
        }
        if previous == ViewPhase::Processing {
            warn!("⚠️ 处理中被重置，已停止轮询");
        }
        previous
    }

    async fn load_results(&mut self, job_id: JobId) {
        info!("📥 批改完成，正在获取结果...");
        match self.backend.fetch_results(&job_id).await {
            Ok(result) => {
                info!(
                    "✓ 获取结果成功: 等级 {}，问题 {} 个",
                    result.total_grade,
                    result.issues.len()
                );
                self.enter(ViewState::Results(result));
            }
            Err(source) => {
                self.fail(
                    FailureKind::ResultsFetch,
                    GradeError::ResultsFetch {
                        job_id: job_id.to_string(),
                        source,
                    },
                );
            }
        }
    }

    fn stop_polling(&mut self) {
        if let Some(handle) = self.poll.take() {
            handle.cancel();
        }
    }

    fn fail(&mut self, kind: FailureKind, err: GradeError) {
        error!("❌ {}", err);
        self.stop_polling();
        self.notifications.push(Notification::from_error(kind, &err));
        if self.phase() != ViewPhase::Upload {
            self.enter(ViewState::Upload);
        }
    }

    /// 按转换表切换状态，不允许的转换被拒绝并保持原状态
    fn enter(&mut self, next: ViewState) {
        let from = self.phase();
        let to = next.phase();
        if !from.can_transition_to(to) {
            warn!("⚠️ 拒绝状态转换: {} → {}", from, to);
            return;
        }

        debug!("状态转换: {} → {}", from, to);
        self.state = next;
    }
}
