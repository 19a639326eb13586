//! 文本分析服务 - 业务能力层
//!
//! 四项子分析互相独立：每项返回 `Result<_, AnalysisError>`，
//! 失败时只把该字段降级为占位结果，不影响其他字段

use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::models::{AnalysisResult, Classification, KeywordDensity, Sentiment};
use crate::services::keywords::keyword_density;
use crate::services::nlp::ModelSet;
use crate::services::topics::{extract_topics, TOPICS_UNAVAILABLE};
use crate::utils::logging::truncate_text;

/// 送入模型的最大字符数
pub const MAX_ANALYSIS_CHARS: usize = 2000;
/// 摘要长度下限（词）
pub const SUMMARY_MIN_LENGTH: usize = 50;
/// 摘要长度上限（词）
pub const SUMMARY_MAX_LENGTH: usize = 150;
/// 文本需超过该字符数才生成摘要
const SUMMARY_MIN_CHARS: usize = 50;
/// 文本需超过该词数才做情感分析
const SENTIMENT_MIN_TOKENS: usize = 3;
/// 文本需超过该词数才做分类
const CLASSIFICATION_MIN_TOKENS: usize = 5;

pub const CATEGORIES: [&str; 6] = [
    "Technology",
    "Business",
    "Entertainment",
    "Health",
    "Education",
    "News",
];

pub const SUMMARY_TOO_SHORT: &str = "Text too short for summarization";
pub const SUMMARY_UNAVAILABLE: &str = "Summary not available";

/// 文本分析器
///
/// 模型句柄在启动时创建并注入，分析器本身不持有任何全局状态
pub struct Analyzer {
    models: ModelSet,
}

impl Analyzer {
    pub fn new(models: ModelSet) -> Self {
        Self { models }
    }

    /// 分析文本，永不失败
    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        let clean_text = normalize_whitespace(text);
        if clean_text.is_empty() {
            info!("文本为空，跳过模型分析");
            return AnalysisResult::empty_text();
        }

        let short_text = truncate_chars(&clean_text, MAX_ANALYSIS_CHARS);
        let token_count = short_text.split_whitespace().count();
        info!(
            "🧠 开始分析: {} 字符 (截断后 {}), {} 个词",
            clean_text.chars().count(),
            short_text.chars().count(),
            token_count
        );
        debug!("分析文本预览: {}", truncate_text(short_text, 80));

        let summary = self.summary(short_text).await.unwrap_or_else(|e| {
            warn!("摘要生成失败: {}", e);
            SUMMARY_UNAVAILABLE.to_string()
        });

        let sentiment = self.sentiment(short_text, token_count).await.unwrap_or_else(|e| {
            warn!("情感分析失败: {}", e);
            Sentiment::neutral()
        });

        let keyword_density = self.keywords(&clean_text);

        let classification = self
            .classification(short_text, token_count)
            .await
            .unwrap_or_else(|e| {
                warn!("内容分类失败: {}", e);
                Classification::not_available()
            });

        let topics = self.topics(&clean_text).unwrap_or_else(|e| {
            warn!("主题建模跳过: {}", e);
            vec![TOPICS_UNAVAILABLE.to_string()]
        });

        info!("✓ 分析完成");

        AnalysisResult {
            summary,
            sentiment,
            topics,
            keyword_density,
            classification,
        }
    }

    async fn summary(&self, short_text: &str) -> Result<String, AnalysisError> {
        if short_text.chars().count() <= SUMMARY_MIN_CHARS {
            return Ok(SUMMARY_TOO_SHORT.to_string());
        }
        self.models
            .summarizer
            .summarize(short_text, SUMMARY_MIN_LENGTH, SUMMARY_MAX_LENGTH)
            .await
    }

    async fn sentiment(&self, short_text: &str, token_count: usize) -> Result<Sentiment, AnalysisError> {
        if token_count <= SENTIMENT_MIN_TOKENS {
            return Ok(Sentiment::neutral());
        }
        self.models.sentiment.sentiment(short_text).await
    }

    fn keywords(&self, clean_text: &str) -> KeywordDensity {
        keyword_density(clean_text)
    }

    async fn classification(
        &self,
        short_text: &str,
        token_count: usize,
    ) -> Result<Classification, AnalysisError> {
        if token_count <= CLASSIFICATION_MIN_TOKENS {
            return Ok(Classification::not_available());
        }
        self.models.classifier.classify(short_text, &CATEGORIES).await
    }

    fn topics(&self, clean_text: &str) -> Result<Vec<String>, AnalysisError> {
        extract_topics(clean_text)
    }
}

/// 连续空白压缩为单个空格并去掉首尾空白
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 按字符截断，保证不切断 UTF-8 字符
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
