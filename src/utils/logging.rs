/// 日志工具模块
///
/// 提供日志初始化和运行信息输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按是否开启详细日志选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）时忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `url`: 目标 URL
/// - `model_name`: 使用的模型
pub fn log_startup(url: &str, model_name: &str) {
    info!("{}", "=".repeat(60));
    info!("🤖 AI Web Scraper 启动");
    info!("🔗 目标: {}", url);
    info!("🧠 模型: {}", model_name);
    info!("{}", "=".repeat(60));
}

/// 记录运行完成信息
///
/// # 参数
/// - `report_path`: 报告保存路径（生成失败时为 None）
pub fn log_run_complete(report_path: Option<&str>) {
    info!("\n{}", "=".repeat(60));
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    match report_path {
        Some(path) => info!("📥 报告已保存至: {}", path),
        None => info!("⚠️ 本次运行未生成报告"),
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_chars() {
        assert_eq!(truncate_text("抓取页面内容", 2), "抓取...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
