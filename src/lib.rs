//! # Proof Grade Client
//!
//! 证明题批改服务的客户端：上传图片 → 轮询任务 → 展示等级、问题列表和标注图
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 与批改服务通信，只暴露能力
//! - `GradingBackend` - 上传 / 查询状态 / 获取结果 / 下载标注图
//! - `GradeClient` - 基于 reqwest 的实现
//!
//! ### ② 业务能力层（Services）
//! - `UploadComponent` - 校验 MIME 类型，处理中禁用
//! - `StatusPoller` - 固定间隔轮询，可取消
//! - `results_renderer` - 等级档位、问题列表、标注图地址
//! - `ReportWriter` - 写批改记录
//!
//! ### ③ 流程层（Workflow）
//! - `ViewStateController` - upload → processing → results 状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 命令行入口使用的完整流程

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ApiError, GradeClient, GradingBackend};
pub use config::Config;
pub use error::{FailureKind, GradeError, Result};
pub use models::{GradingResult, ImageFile, Issue, Job, JobId, JobPhase, JobStatus};
pub use orchestrator::{App, GradeOutcome};
pub use workflow::{Notification, ViewPhase, ViewState, ViewStateController};
