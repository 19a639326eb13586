use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::BrowserError;

/// 隐藏 `navigator.webdriver`，在每个新文档加载前执行
const HIDE_WEBDRIVER_JS: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

/// 反自动化检测的启动参数（不包含默认的 --enable-automation）
const STEALTH_ARGS: [&str; 5] = [
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--remote-debugging-port=0",
];

static ACTIVE_SESSIONS: AtomicUsize = AtomicUsize::new(0);

/// 当前仍未释放的浏览器会话数量
pub fn active_sessions() -> usize {
    ACTIVE_SESSIONS.load(Ordering::SeqCst)
}

/// 浏览器会话
///
/// 持有 Browser 以及后台事件处理任务：
/// - 优先通过 `close()` 显式关闭
/// - 未显式关闭时由 Drop 在后台关闭，保证任何退出路径都会释放
pub struct BrowserSession {
    browser: Option<Browser>,
    handler_task: Option<JoinHandle<()>>,
    runtime_handle: tokio::runtime::Handle,
}

impl BrowserSession {
    /// 启动带反检测配置的无头浏览器
    pub async fn launch(config: &Config) -> Result<Self, BrowserError> {
        info!("🚀 启动无头浏览器...");

        let browser_config = build_browser_config(config)?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            error!("启动无头浏览器失败: {}", e);
            BrowserError::LaunchFailed { source: e }
        })?;
        ACTIVE_SESSIONS.fetch_add(1, Ordering::SeqCst);
        debug!("无头浏览器启动成功");

        // 在后台处理浏览器事件
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser: Some(browser),
            handler_task: Some(handler_task),
            runtime_handle: tokio::runtime::Handle::current(),
        })
    }

    /// 创建已注入反检测脚本和 User-Agent 的空白页面
    pub async fn new_stealth_page(&self, user_agent: &str) -> Result<Page, BrowserError> {
        let browser = self.browser.as_ref().ok_or_else(|| {
            BrowserError::ConfigurationFailed("浏览器会话已关闭".to_string())
        })?;

        // 添加短暂延迟以等待浏览器状态同步
        sleep(tokio::time::Duration::from_millis(300)).await;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed { source: e })?;

        page.set_user_agent(user_agent)
            .await
            .map_err(|e| BrowserError::ScriptExecutionFailed { source: e })?;
        page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(
            HIDE_WEBDRIVER_JS,
        ))
        .await
        .map_err(|e| BrowserError::ScriptExecutionFailed { source: e })?;

        debug!("页面创建成功，已注入反检测脚本");
        Ok(page)
    }

    /// 关闭浏览器并结束事件处理任务
    pub async fn close(mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("关闭浏览器失败: {}", e);
            }
            if let Err(e) = browser.wait().await {
                warn!("等待浏览器进程退出失败: {}", e);
            }
            ACTIVE_SESSIONS.fetch_sub(1, Ordering::SeqCst);
            debug!("浏览器会话已释放");
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let handler_task = self.handler_task.take();
        if let Some(mut browser) = self.browser.take() {
            ACTIVE_SESSIONS.fetch_sub(1, Ordering::SeqCst);
            self.runtime_handle.spawn(async move {
                if let Err(e) = browser.close().await {
                    warn!("后台关闭浏览器失败: {}", e);
                }
                let _ = browser.wait().await;
                if let Some(task) = handler_task {
                    task.abort();
                }
            });
        } else if let Some(task) = handler_task {
            task.abort();
        }
    }
}

/// 构建浏览器启动配置
fn build_browser_config(config: &Config) -> Result<BrowserConfig, BrowserError> {
    let mut builder = BrowserConfig::builder()
        .disable_default_args()
        .no_sandbox()
        .args(STEALTH_ARGS.to_vec())
        .arg(format!("--user-agent={}", config.user_agent));

    builder = if config.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };

    if let Some(executable) = &config.chrome_executable {
        debug!("使用指定的浏览器: {}", executable);
        builder = builder.chrome_executable(Path::new(executable));
    }

    builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        BrowserError::ConfigurationFailed(e)
    })
}
