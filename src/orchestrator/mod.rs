//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 管理应用生命周期：初始化模型与服务、执行一次运行、输出结果并保存报告。
//!
//! ## 层次关系
//!
//! ```text
//! app (一次命令行调用)
//!     ↓
//! workflow::RunFlow (抓取 → 分析 → 报告)
//!     ↓
//! services (能力层：fetch / analyze / report)
//!     ↓
//! infrastructure + browser (JsExecutor / BrowserSession)
//! ```
//!
//! 只有本层接触终端输出和文件系统

pub mod app;

pub use app::{save_report, App};
