//! 页面抓取服务 - 业务能力层
//!
//! 只负责"打开一个 URL 并得到 PageRecord"，失败时返回错误记录而不是错误

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info};
use url::Url;

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::BrowserError;
use crate::infrastructure::JsExecutor;
use crate::models::{FetchOutcome, PageRecord};
use crate::services::page_parser::parse_page;

/// 页面抓取服务
///
/// 每次调用都启动一个新的浏览器会话，调用结束时释放
pub struct PageFetcher {
    config: Config,
}

impl PageFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 抓取单个页面，不重试
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        info!("🌐 开始抓取: {}", url);

        if let Err(e) = validate_url(url) {
            error!("抓取失败: {}", e);
            return FetchOutcome::from_error(e);
        }

        let session = match BrowserSession::launch(&self.config).await {
            Ok(session) => session,
            Err(e) => {
                error!("抓取失败: {}", e);
                return FetchOutcome::from_error(e);
            }
        };

        // 无论成功与否都要释放会话
        let result = self.scrape(&session, url).await;
        session.close().await;

        match result {
            Ok(page) => {
                info!(
                    "✓ 抓取完成: {} 个标题, {} 个段落, {} 个链接",
                    page.headings.len(),
                    page.paragraphs.len(),
                    page.links.len()
                );
                FetchOutcome::Page(page)
            }
            Err(e) => {
                error!("抓取失败: {}", e);
                FetchOutcome::from_error(e)
            }
        }
    }

    async fn scrape(&self, session: &BrowserSession, url: &str) -> Result<PageRecord, BrowserError> {
        let page = session.new_stealth_page(&self.config.user_agent).await?;
        let executor = JsExecutor::new(page);

        executor.goto(url).await?;
        debug!("页面已加载，等待 {} ms 渲染动态内容", self.config.render_wait_ms);
        sleep(Duration::from_millis(self.config.render_wait_ms)).await;

        let webdriver_visible: bool = executor
            .eval_as("navigator.webdriver === true")
            .await
            .unwrap_or(false);
        debug!("navigator.webdriver 可见: {}", webdriver_visible);

        let html = executor.html().await?;
        debug!("页面源码长度: {} 字符", html.len());

        Ok(parse_page(&html))
    }
}

/// 只接受 http(s) 绝对 URL
fn validate_url(raw: &str) -> Result<Url, BrowserError> {
    let invalid = |reason: String| BrowserError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("不支持的协议: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_url("https://example.com/page").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn rejects_relative_and_other_schemes() {
        assert!(validate_url("example.com").is_err());
        assert!(validate_url("").is_err());
        assert!(validate_url("ftp://example.com/file").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
    }
}
