//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、创建批改服务客户端、准备批改记录文件
//! 2. **选择文件**：读取图片，交给上传组件校验
//! 3. **驱动状态机**：上传 → 轮询 → 结果
//! 4. **输出结果**：渲染到终端、保存标注图、写批改记录
//! 5. **再批改一张**：结束后重置控制器

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{error, info, warn};

use crate::clients::{GradeClient, GradingBackend};
use crate::config::Config;
use crate::models::ImageFile;
use crate::services::results_renderer::{self, RenderedResults};
use crate::services::{ReportWriter, UploadComponent, UploadInteraction, UploadOutcome};
use crate::utils::{files, logging};
use crate::workflow::{Notification, ViewPhase, ViewStateController};

/// 一次批改的结果
#[derive(Debug)]
pub enum GradeOutcome {
    /// 批改完成
    Graded {
        rendered: RenderedResults,
        saved_image: Option<PathBuf>,
    },
    /// 文件不是图片，未上传
    Rejected,
    /// 流程失败，已回到上传状态
    Failed(Vec<Notification>),
}

impl GradeOutcome {
    pub fn is_graded(&self) -> bool {
        matches!(self, GradeOutcome::Graded { .. })
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    backend: Arc<dyn GradingBackend>,
    upload: UploadComponent,
    controller: ViewStateController,
    report_writer: ReportWriter,
}

impl App {
    /// 初始化应用（使用 HTTP 批改服务）
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        let client = GradeClient::new(&config).context("无法创建批改服务客户端")?;
        Self::with_backend(config, Arc::new(client))
    }

    /// 使用指定的批改服务初始化
    pub fn with_backend(config: Config, backend: Arc<dyn GradingBackend>) -> Result<Self> {
        logging::log_startup(&config);

        let report_writer = ReportWriter::new(config.report_file.clone());
        report_writer.init()?;

        let controller = ViewStateController::new(backend.clone(), config.poll_interval());

        Ok(Self {
            config,
            backend,
            upload: UploadComponent::new(),
            controller,
            report_writer,
        })
    }

    pub fn controller(&self) -> &ViewStateController {
        &self.controller
    }

    /// 批改磁盘上的一张图片
    pub async fn run(&mut self, image_path: &Path) -> Result<GradeOutcome> {
        let file = ImageFile::load(image_path).await?;
        self.grade(file).await
    }

    /// 批改一张图片
    pub async fn grade(&mut self, file: ImageFile) -> Result<GradeOutcome> {
        self.upload.set_processing(self.controller.is_processing());

        let mut selected = None;
        let outcome = self
            .upload
            .handle(UploadInteraction::Pick(file.clone()), |f| selected = Some(f));

        let selected = match (outcome, selected) {
            (UploadOutcome::Selected, Some(f)) => f,
            (UploadOutcome::Disabled, _) => anyhow::bail!("正在批改中，暂不接受新文件"),
            _ => {
                warn!(
                    "⚠️ {} 不是图片文件 ({})，已忽略",
                    file.file_name, file.mime_type
                );
                return Ok(GradeOutcome::Rejected);
            }
        };

        let file_name = selected.file_name.clone();
        self.upload.set_processing(true);
        let phase = match self.controller.select_file(selected).await {
            Ok(ViewPhase::Processing) => self.controller.run_until_settled().await,
            Ok(phase) => phase,
            Err(e) => {
                self.upload.set_processing(self.controller.is_processing());
                return Err(e.into());
            }
        };
        self.upload.set_processing(false);

        match phase {
            ViewPhase::Results => self.present_results(&file_name).await,
            _ => {
                let notifications = self.controller.take_notifications();
                for n in &notifications {
                    error!("🚫 {}", n.message);
                }
                Ok(GradeOutcome::Failed(notifications))
            }
        }
    }

    /// 先回到上传状态，再输出结果
    ///
    /// 渲染或写记录失败时控制器也已重置，下一张图片可以照常上传
    async fn present_results(&mut self, file_name: &str) -> Result<GradeOutcome> {
        let result = self.controller.result().cloned();
        // 再批改一张
        self.controller.reset();
        let result = result.context("结果状态下缺少批改结果")?;

        let rendered = results_renderer::render(&result, self.backend.base_url())?;
        println!("{}", rendered);

        let saved_image = match self.save_annotated_image(&rendered.annotated_image_url).await {
            Ok(path) => {
                info!("🖼️ 标注图已保存: {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("⚠️ 标注图下载失败: {:#}", e);
                None
            }
        };

        self.report_writer
            .write(file_name, &rendered, saved_image.as_deref())
            .await?;

        logging::print_final_summary(
            file_name,
            &rendered.grade,
            rendered.issue_count(),
            self.report_writer.path(),
        );

        Ok(GradeOutcome::Graded {
            rendered,
            saved_image,
        })
    }

    async fn save_annotated_image(&self, url: &str) -> Result<PathBuf> {
        let bytes = self
            .backend
            .fetch_image(url)
            .await
            .with_context(|| format!("无法下载 {}", url))?;

        let dir = PathBuf::from(&self.config.annotated_output_dir);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("无法创建目录: {}", dir.display()))?;

        let path = dir.join(format!(
            "{}_{}",
            files::unique_prefix(),
            files::annotated_file_name(url)
        ));
        fs::write(&path, bytes)
            .await
            .with_context(|| format!("无法写入: {}", path.display()))?;

        Ok(path)
    }
}
