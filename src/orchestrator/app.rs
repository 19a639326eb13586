//! 应用入口 - 编排层
//!
//! 1. **初始化**：创建 LLM 客户端和模型句柄，只做一次
//! 2. **运行**：委托 RunFlow 完成抓取、分析和报告
//! 3. **输出**：终端面板或 JSON，报告写入输出目录

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::Report;
use crate::services::{Analyzer, LlmService, ModelSet, PageFetcher, ReportWriter};
use crate::utils::logging::{log_run_complete, log_startup};
use crate::workflow::{render_panels, RunFlow, RunOutput};

/// 应用主结构
pub struct App {
    config: Config,
    model_name: String,
    flow: RunFlow,
}

impl App {
    /// 初始化应用
    ///
    /// 模型句柄在这里创建一次，之后整个运行期间复用
    pub fn initialize(config: Config) -> Self {
        let llm = Arc::new(LlmService::new(&config));
        let model_name = llm.model_name().to_string();
        let models = ModelSet::from_llm(llm);

        let flow = RunFlow::new(
            Box::new(PageFetcher::new(&config)),
            Analyzer::new(models),
            ReportWriter::new(),
        );

        Self::with_flow(config, model_name, flow)
    }

    /// 使用自定义流程创建应用
    pub fn with_flow(config: Config, model_name: impl Into<String>, flow: RunFlow) -> Self {
        Self {
            config,
            model_name: model_name.into(),
            flow,
        }
    }

    /// 运行一次：抓取 → 分析 → 展示 → 保存报告
    ///
    /// 抓取失败时返回错误；报告失败只提示，不影响已展示的结果
    pub async fn run(&self, url: &str, as_json: bool) -> Result<()> {
        log_startup(url, &self.model_name);

        let output = match self.flow.run(url).await {
            Ok(output) => output,
            Err(AppError::Scrape(reason)) => {
                eprintln!("Scraping failed: {}", reason);
                return Err(AppError::Scrape(reason).into());
            }
            Err(e) => return Err(e.into()),
        };

        if as_json {
            println!("{}", to_json(&output)?);
        } else {
            print!("{}", render_panels(&output.page, &output.analysis, output.has_text));
        }

        let saved = match &output.report {
            Ok(report) => match save_report(report, Path::new(&self.config.output_dir)).await {
                Ok(path) => Some(path),
                Err(e) => {
                    error!("❌ 报告保存失败: {}", e);
                    eprintln!("Failed to generate report: {}", e);
                    None
                }
            },
            Err(e) => {
                eprintln!("Failed to generate report: {}", e);
                None
            }
        };

        let saved = saved.map(|p| p.display().to_string());
        log_run_complete(saved.as_deref());
        Ok(())
    }
}

/// 把报告写入输出目录，返回文件路径
pub async fn save_report(report: &Report, output_dir: &Path) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| AppError::io(output_dir.display().to_string(), e))?;

    let path = output_dir.join(report.file_name());
    tokio::fs::write(&path, report.bytes())
        .await
        .map_err(|e| AppError::io(path.display().to_string(), e))?;

    info!("📥 报告已写入 {} ({} 字节)", path.display(), report.bytes().len());
    Ok(path)
}

fn to_json(output: &RunOutput) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({
        "page": output.page,
        "analysis": output.analysis,
    }))
}
