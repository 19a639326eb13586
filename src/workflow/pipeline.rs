//! 单次运行流程 - 流程层
//!
//! 流程顺序：
//! 1. 抓取页面（失败则终止，不做分析）
//! 2. 分析段落文本（无文本时使用占位结果）
//! 3. 生成报告（失败不影响前两步结果的展示）

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult, ReportError};
use crate::models::{AnalysisResult, FetchOutcome, PageRecord, Report};
use crate::services::{Analyzer, PageFetcher, ReportWriter};

/// 页面来源
///
/// 生产环境为浏览器抓取，测试中可替换为固定页面
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        PageFetcher::fetch(self, url).await
    }
}

/// 一次运行的全部产物
#[derive(Debug)]
pub struct RunOutput {
    pub url: String,
    pub page: PageRecord,
    /// 页面是否包含可分析的段落文本
    pub has_text: bool,
    pub analysis: AnalysisResult,
    pub report: Result<Report, ReportError>,
}

/// 运行流程
///
/// - 编排 抓取 → 分析 → 报告
/// - 不持有任何跨运行的可变状态
pub struct RunFlow {
    source: Box<dyn PageSource>,
    analyzer: Analyzer,
    reporter: ReportWriter,
}

impl RunFlow {
    pub fn new(source: Box<dyn PageSource>, analyzer: Analyzer, reporter: ReportWriter) -> Self {
        Self {
            source,
            analyzer,
            reporter,
        }
    }

    pub async fn run(&self, url: &str) -> AppResult<RunOutput> {
        info!("🔍 正在抓取并分析...");

        let page = self.source.fetch(url).await.into_result().map_err(|e| {
            error!("❌ 抓取失败: {}", e);
            AppError::Scrape(e)
        })?;

        let full_text = page.full_text();
        let has_text = !full_text.is_empty();
        let analysis = if has_text {
            self.analyzer.analyze(&full_text).await
        } else {
            warn!("⚠️ 页面没有可分析的文本内容");
            AnalysisResult::no_content()
        };

        let report = self.reporter.render(&page, &analysis, url);
        if let Err(e) = &report {
            error!("❌ 报告生成失败: {}", e);
        }

        Ok(RunOutput {
            url: url.to_string(),
            page,
            has_text,
            analysis,
            report,
        })
    }
}
