//! 页面状态
//!
//! 任务只存在于 `Processing` 中，结果只存在于 `Results` 中

use std::fmt;

use crate::models::{GradingResult, Job};

/// 当前阶段（不带数据）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPhase {
    Upload,
    Processing,
    Results,
}

impl ViewPhase {
    pub fn name(self) -> &'static str {
        match self {
            ViewPhase::Upload => "upload",
            ViewPhase::Processing => "processing",
            ViewPhase::Results => "results",
        }
    }

    /// 允许的状态转换
    ///
    /// upload → processing；processing → results | upload；results → upload
    pub fn can_transition_to(self, next: ViewPhase) -> bool {
        matches!(
            (self, next),
            (ViewPhase::Upload, ViewPhase::Processing)
                | (ViewPhase::Processing, ViewPhase::Results)
                | (ViewPhase::Processing, ViewPhase::Upload)
                | (ViewPhase::Results, ViewPhase::Upload)
        )
    }
}

impl fmt::Display for ViewPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 页面状态
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Upload,
    Processing(Job),
    Results(GradingResult),
}

impl ViewState {
    pub fn phase(&self) -> ViewPhase {
        match self {
            ViewState::Upload => ViewPhase::Upload,
            ViewState::Processing(_) => ViewPhase::Processing,
            ViewState::Results(_) => ViewPhase::Results,
        }
    }

    pub fn job(&self) -> Option<&Job> {
        match self {
            ViewState::Processing(job) => Some(job),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&GradingResult> {
        match self {
            ViewState::Results(result) => Some(result),
            _ => None,
        }
    }
}
