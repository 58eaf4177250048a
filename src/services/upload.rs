//! 上传组件 - 业务能力层
//!
//! 只负责"选择一张图片"能力：校验 MIME 类型后交给上层

use tracing::debug;

use crate::models::ImageFile;

/// 一次用户操作
#[derive(Debug, Clone)]
pub enum UploadInteraction {
    /// 拖放（可能带多个文件，只取第一个）
    Drop(Vec<ImageFile>),
    /// 通过文件选择框选取
    Pick(ImageFile),
}

/// 处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// 已交给上层
    Selected,
    /// 非图片或没有文件，静默忽略
    Ignored,
    /// 正在处理，交互被禁用
    Disabled,
}

/// 上传组件
///
/// 职责：
/// - 每次交互最多回调一次
/// - 只接受 `image/` 开头的文件
/// - 处理中拒绝一切交互
#[derive(Debug, Default)]
pub struct UploadComponent {
    is_processing: bool,
}

impl UploadComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_processing(&mut self, is_processing: bool) {
        self.is_processing = is_processing;
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// 处理一次交互
    pub fn handle<F>(&self, interaction: UploadInteraction, on_file_select: F) -> UploadOutcome
    where
        F: FnOnce(ImageFile),
    {
        if self.is_processing {
            return UploadOutcome::Disabled;
        }

        let file = match interaction {
            UploadInteraction::Drop(files) => files.into_iter().next(),
            UploadInteraction::Pick(file) => Some(file),
        };

        match file {
            Some(file) if file.is_image() => {
                on_file_select(file);
                UploadOutcome::Selected
            }
            Some(file) => {
                debug!("忽略非图片文件: {} ({})", file.file_name, file.mime_type);
                UploadOutcome::Ignored
            }
            None => UploadOutcome::Ignored,
        }
    }
}
