//! # Web Insight
//!
//! 抓取网页、分析文本并生成 PDF 报告的命令行工具
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - `BrowserSession`，一次抓取一个无头浏览器会话，任何出口都会释放
//! - `infrastructure/` - `JsExecutor`，唯一的 page owner，提供 goto / eval / html 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `PageFetcher` + `parse_page` - 抓取并解析页面为 `PageRecord`
//! - `Analyzer` - 摘要、情感、关键词、主题、分类，模型通过 `ModelSet` 注入
//! - `ReportWriter` - 把结果排成 PDF
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - `RunFlow`：抓取 → 分析 → 报告；`render_panels`：终端展示
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - `App`，初始化模型、执行运行、保存报告
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::BrowserSession;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::JsExecutor;
pub use models::{AnalysisResult, FetchOutcome, PageRecord, Report};
pub use orchestrator::App;
pub use services::{Analyzer, ModelSet, PageFetcher, ReportWriter};
pub use workflow::{PageSource, RunFlow, RunOutput};
