//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::JobId;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 info，详细模式下为 debug
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 证明题批改客户端");
    info!("🌐 批改服务: {}", config.backend_base_url);
    info!("⏱️ 轮询间隔: {} ms", config.poll_interval_ms);
    info!("{}", "=".repeat(60));
}

/// 记录轮询进度
pub fn log_progress(job_id: &JobId, progress: u8, message: &str) {
    let filled = usize::from(progress) / 5;
    info!(
        "[任务 {}] ⏳ [{}{}] {:>3}% {}",
        job_id,
        "█".repeat(filled),
        "░".repeat(20 - filled),
        progress,
        truncate_text(message, 60)
    );
}

/// 打印批改完成信息
///
/// # 参数
/// - `file_name`: 上传的文件名
/// - `grade`: 总评等级
/// - `issue_count`: 问题数量
/// - `report_file`: 批改记录文件路径
pub fn print_final_summary(file_name: &str, grade: &str, issue_count: usize, report_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 批改完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 文件: {}", file_name);
    info!("🏅 等级: {}", grade);
    info!("📝 问题: {} 个", issue_count);
    info!("{}", "=".repeat(60));
    info!("\n批改记录已保存至: {}", report_file);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
