mod args;

use anyhow::Result;
use args::Args;
use clap::Parser;
use web_insight::utils::logging;
use web_insight::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.display().to_string();
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).run(&args.url, args.json).await?;

    Ok(())
}
