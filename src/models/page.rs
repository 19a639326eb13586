//! 页面抓取结果
//!
//! 所有字段都带默认值，缺字段的记录依然可以被展示和渲染

use serde::{Deserialize, Serialize};

/// 页面 meta 信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMetadata {
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub viewport: Option<String>,
}

/// 基础无障碍统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Accessibility {
    /// 带非空 alt 文本的图片数量
    pub alt_tags: usize,
    /// 图片总数
    pub total_images: usize,
    /// 带 role 属性的元素数量
    pub aria_roles: usize,
}

/// 单次抓取得到的页面结构化记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRecord {
    pub title: Option<String>,
    pub metadata: PageMetadata,
    /// h1-h4，按文档顺序
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    /// 仅保留 http(s) 绝对链接
    pub links: Vec<String>,
    /// 表格的原始 HTML
    pub tables: Vec<String>,
    pub accessibility: Accessibility,
}

impl PageRecord {
    /// 拼接所有段落文本，作为分析输入
    pub fn full_text(&self) -> String {
        self.paragraphs.join(" ").trim().to_string()
    }
}

/// 抓取结果：页面记录或错误记录
///
/// 序列化后与页面记录同形，或为 `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchOutcome {
    Error { error: String },
    Page(PageRecord),
}

impl FetchOutcome {
    /// 从任意错误构造错误记录，保证消息非空
    pub fn from_error(err: impl std::fmt::Display) -> Self {
        let mut error = err.to_string();
        if error.trim().is_empty() {
            error = "unknown scraping error".to_string();
        }
        FetchOutcome::Error { error }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchOutcome::Error { .. })
    }

    /// 转换为 Result，错误记录变为 Err(消息)
    pub fn into_result(self) -> Result<PageRecord, String> {
        match self {
            FetchOutcome::Page(page) => Ok(page),
            FetchOutcome::Error { error } => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_record_serializes_flat() {
        let outcome = FetchOutcome::from_error("net::ERR_NAME_NOT_RESOLVED");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, serde_json::json!({"error": "net::ERR_NAME_NOT_RESOLVED"}));
    }

    #[test]
    fn blank_error_message_is_replaced() {
        match FetchOutcome::from_error("  ") {
            FetchOutcome::Error { error } => assert!(!error.trim().is_empty()),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn incomplete_record_deserializes_with_defaults() {
        let outcome: FetchOutcome =
            serde_json::from_str(r#"{"title": "Example", "paragraphs": ["Hi there"]}"#).unwrap();
        let page = outcome.into_result().unwrap();
        assert_eq!(page.title.as_deref(), Some("Example"));
        assert_eq!(page.metadata, PageMetadata::default());
        assert_eq!(page.accessibility, Accessibility::default());
        assert_eq!(page.full_text(), "Hi there");
    }
}
