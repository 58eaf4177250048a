//! 批改记录写入服务 - 业务能力层
//!
//! 只负责"把一次批改结果追加到记录文件"能力，不关心流程

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::services::results_renderer::RenderedResults;

/// 批改记录写入服务
pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.report_file_path
    }

    /// 文件不存在时写入表头
    pub fn init(&self) -> Result<()> {
        if Path::new(&self.report_file_path).exists() {
            return Ok(());
        }

        let header = format!(
            "{}\n批改记录 - {}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        std::fs::write(&self.report_file_path, header)
            .with_context(|| format!("无法创建批改记录文件: {}", self.report_file_path))?;
        Ok(())
    }

    /// 追加一条记录
    ///
    /// # 参数
    /// - `file_name`: 上传的文件名
    /// - `rendered`: 渲染后的批改结果
    /// - `saved_image`: 本地保存的标注图路径（下载失败时为 None）
    pub async fn write(
        &self,
        file_name: &str,
        rendered: &RenderedResults,
        saved_image: Option<&Path>,
    ) -> Result<()> {
        debug!("写入批改记录: {} | 等级 {}", file_name, rendered.grade);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)
            .with_context(|| format!("无法打开批改记录文件: {}", self.report_file_path))?;

        let line = format!(
            "{} | 文件 {} | 等级 {} | 问题 {} | 标注图 {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            file_name,
            rendered.grade,
            rendered.issue_count(),
            saved_image
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| rendered.annotated_image_url.clone()),
        );

        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
