//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (读取文件、输出结果)
//!     ↓
//! workflow::ViewStateController (upload → processing → results)
//!     ↓
//! services (能力层：upload / poller / results_renderer / report_writer)
//!     ↓
//! clients (基础设施：GradingBackend)
//! ```

pub mod app;

pub use app::{App, GradeOutcome};
