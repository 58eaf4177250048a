use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use proof_grade_client::utils::logging;
use proof_grade_client::{App, Config};

/// 上传证明题图片并等待批改结果
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 待批改的图片
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// TOML 配置文件（环境变量仍可覆盖）
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env(),
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let mut app = App::initialize(config).await?;
    let outcome = app.run(&cli.image).await?;

    if !outcome.is_graded() {
        std::process::exit(1);
    }

    Ok(())
}
