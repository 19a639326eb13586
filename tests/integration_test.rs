use std::sync::Arc;

use async_trait::async_trait;
use lopdf::Document;
use web_insight::browser::active_sessions;
use web_insight::error::{AnalysisError, AppError};
use web_insight::models::{Classification, Sentiment, SentimentLabel};
use web_insight::orchestrator::save_report;
use web_insight::services::{parse_page, SentimentModel, Summarizer, ZeroShotClassifier};
use web_insight::{
    Analyzer, App, Config, FetchOutcome, ModelSet, PageFetcher, PageSource, ReportWriter, RunFlow,
};

const EXAMPLE_HTML: &str = r#"<html>
<head><title>Example</title></head>
<body>
  <p>This is a test page about technology and business.</p>
  <a href="https://example.com/about">About</a>
</body>
</html>"#;

/// 返回固定 HTML 的页面来源
struct StaticPage(&'static str);

#[async_trait]
impl PageSource for StaticPage {
    async fn fetch(&self, _url: &str) -> FetchOutcome {
        FetchOutcome::Page(parse_page(self.0))
    }
}

/// 总是失败的页面来源
struct Unreachable;

#[async_trait]
impl PageSource for Unreachable {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        FetchOutcome::from_error(format!("net::ERR_NAME_NOT_RESOLVED at {}", url))
    }
}

/// 离线模型：结果固定，不访问网络
struct OfflineModels;

#[async_trait]
impl Summarizer for OfflineModels {
    async fn summarize(&self, text: &str, _min: usize, _max: usize) -> Result<String, AnalysisError> {
        Ok(text.split_whitespace().take(5).collect::<Vec<_>>().join(" "))
    }
}

#[async_trait]
impl SentimentModel for OfflineModels {
    async fn sentiment(&self, _text: &str) -> Result<Sentiment, AnalysisError> {
        Ok(Sentiment::new(SentimentLabel::Positive, 0.75))
    }
}

#[async_trait]
impl ZeroShotClassifier for OfflineModels {
    async fn classify(&self, _text: &str, labels: &[&str]) -> Result<Classification, AnalysisError> {
        Ok(Classification {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            scores: vec![1.0 / labels.len() as f64; labels.len()],
        })
    }
}

fn offline_flow(source: impl PageSource + 'static) -> RunFlow {
    let models = Arc::new(OfflineModels);
    RunFlow::new(
        Box::new(source),
        Analyzer::new(ModelSet {
            summarizer: models.clone(),
            sentiment: models.clone(),
            classifier: models,
        }),
        ReportWriter::new(),
    )
}

#[tokio::test]
async fn example_page_end_to_end() {
    let output = offline_flow(StaticPage(EXAMPLE_HTML))
        .run("https://example.com")
        .await
        .expect("运行应该成功");

    let page = &output.page;
    assert_eq!(page.title.as_deref(), Some("Example"));
    assert_eq!(
        page.paragraphs,
        vec!["This is a test page about technology and business."]
    );
    assert_eq!(page.links, vec!["https://example.com/about"]);
    assert_eq!(page.accessibility.alt_tags, 0);
    assert_eq!(page.accessibility.total_images, 0);
    assert_eq!(page.accessibility.aria_roles, 0);

    let analysis = &output.analysis;
    assert!(output.has_text);
    assert!(!analysis.summary.is_empty());
    assert!(matches!(
        analysis.sentiment.label,
        SentimentLabel::Positive | SentimentLabel::Negative | SentimentLabel::Neutral
    ));
    for word in ["test", "page", "technology", "business"] {
        assert_eq!(analysis.keyword_density.get(word), Some(1), "{}", word);
    }
    // 同频按首次出现排序
    let words: Vec<&str> = analysis.keyword_density.iter().map(|(w, _)| w).collect();
    let position = |w: &str| words.iter().position(|x| *x == w);
    assert!(position("test") < position("page"));
    assert!(position("technology") < position("business"));

    let report = output.report.as_ref().expect("报告应该生成成功");
    assert!(!report.bytes().is_empty());
    let doc = Document::load_mem(report.bytes()).expect("应该是合法 PDF");
    assert!(!doc.get_pages().is_empty());
}

#[tokio::test]
async fn page_without_paragraphs_uses_no_content_placeholder() {
    let output = offline_flow(StaticPage("<html><head><title>Empty</title></head></html>"))
        .run("https://example.com/empty")
        .await
        .unwrap();

    assert!(!output.has_text);
    assert_eq!(output.analysis.summary, "No content available");
    assert_eq!(output.analysis.topics, vec!["No topics available"]);
    assert!(output.report.is_ok());
}

#[tokio::test]
async fn scrape_error_stops_the_run() {
    let result = offline_flow(Unreachable).run("https://unreachable.invalid").await;

    match result {
        Err(AppError::Scrape(reason)) => assert!(reason.contains("ERR_NAME_NOT_RESOLVED")),
        other => panic!("应该返回抓取错误, 实际: {:?}", other.map(|o| o.url)),
    }
}

#[tokio::test]
async fn app_run_reports_scrape_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: dir.path().display().to_string(),
        ..Config::default()
    };
    let app = App::with_flow(config, "offline", offline_flow(Unreachable));

    assert!(app.run("https://unreachable.invalid", false).await.is_err());
    // 抓取失败时不写报告
    assert!(!dir.path().join("ai_analysis_report.pdf").exists());
}

#[tokio::test]
async fn app_run_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: dir.path().display().to_string(),
        ..Config::default()
    };
    let app = App::with_flow(config, "offline", offline_flow(StaticPage(EXAMPLE_HTML)));

    app.run("https://example.com", true).await.unwrap();

    let bytes = std::fs::read(dir.path().join("ai_analysis_report.pdf")).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn save_report_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let first = web_insight::Report::new(b"old".to_vec());
    let second = web_insight::Report::new(b"new".to_vec());

    save_report(&first, dir.path()).await.unwrap();
    let path = save_report(&second, dir.path()).await.unwrap();

    assert_eq!(std::fs::read(path).unwrap(), b"new");
}

#[tokio::test]
async fn invalid_url_fails_without_launching_browser() {
    let fetcher = PageFetcher::new(&Config::default());

    let outcome = fetcher.fetch("not a url").await;

    assert!(outcome.is_error());
    match outcome {
        FetchOutcome::Error { error } => assert!(!error.is_empty()),
        FetchOutcome::Page(_) => unreachable!(),
    }
    assert_eq!(active_sessions(), 0);
}

#[tokio::test]
#[ignore] // 需要本地 Chrome：cargo test -- --ignored
async fn unreachable_host_returns_error_record() {
    let fetcher = PageFetcher::new(&Config::default());

    let outcome = fetcher.fetch("https://nonexistent.invalid").await;

    assert!(outcome.is_error());
    assert_eq!(active_sessions(), 0, "浏览器会话应该已释放");
}
