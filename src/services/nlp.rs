//! 模型能力接口
//!
//! 分析器只依赖这里的三个 trait，启动时注入具体实现：
//! - 生产环境：基于 `LlmService` 的实现
//! - 测试：固定输出的替身

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AnalysisError;
use crate::models::{Classification, Sentiment, SentimentLabel};
use crate::services::llm_service::LlmService;

/// 摘要模型
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// 生成长度介于 `min_length` 与 `max_length` 个词之间的摘要
    async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, AnalysisError>;
}

/// 情感分析模型
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn sentiment(&self, text: &str) -> Result<Sentiment, AnalysisError>;
}

/// 零样本分类模型（单标签）
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// 返回的标签按分数降序排列
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Classification, AnalysisError>;
}

/// 启动时创建的一组模型句柄
#[derive(Clone)]
pub struct ModelSet {
    pub summarizer: Arc<dyn Summarizer>,
    pub sentiment: Arc<dyn SentimentModel>,
    pub classifier: Arc<dyn ZeroShotClassifier>,
}

impl ModelSet {
    /// 三种能力共用同一个 LLM 客户端
    pub fn from_llm(llm: Arc<LlmService>) -> Self {
        Self {
            summarizer: Arc::new(LlmSummarizer::new(llm.clone())),
            sentiment: Arc::new(LlmSentiment::new(llm.clone())),
            classifier: Arc::new(LlmZeroShot::new(llm)),
        }
    }
}

// ========== 基于 LLM 的实现 ==========

pub struct LlmSummarizer {
    llm: Arc<LlmService>,
}

impl LlmSummarizer {
    pub fn new(llm: Arc<LlmService>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, AnalysisError> {
        let system = "You are an extractive-abstractive news summarizer. \
                      Reply with the summary text only, no preamble.";
        let user = format!(
            "Summarize the following text in {} to {} words.\n\n{}",
            min_length, max_length, text
        );

        let reply = self.llm.send_to_llm(&user, Some(system)).await?;
        if reply.is_empty() {
            return Err(AnalysisError::invalid_output(reply, "摘要为空"));
        }
        Ok(limit_words(&reply, max_length))
    }
}

pub struct LlmSentiment {
    llm: Arc<LlmService>,
}

impl LlmSentiment {
    pub fn new(llm: Arc<LlmService>) -> Self {
        Self { llm }
    }
}

#[derive(Debug, Deserialize)]
struct SentimentReply {
    label: String,
    score: f64,
}

#[async_trait]
impl SentimentModel for LlmSentiment {
    async fn sentiment(&self, text: &str) -> Result<Sentiment, AnalysisError> {
        let system = "You are a binary sentiment classifier. Reply with JSON only: \
                      {\"label\": \"POSITIVE\" | \"NEGATIVE\", \"score\": <confidence between 0 and 1>}";
        let reply: SentimentReply = self.llm.send_for_json(text, Some(system)).await?;
        sentiment_from_reply(reply)
    }
}

fn sentiment_from_reply(reply: SentimentReply) -> Result<Sentiment, AnalysisError> {
    let label = SentimentLabel::parse(&reply.label)
        .ok_or_else(|| AnalysisError::invalid_output(&reply.label, "未知的情感标签"))?;
    Ok(Sentiment::new(label, reply.score))
}

pub struct LlmZeroShot {
    llm: Arc<LlmService>,
}

impl LlmZeroShot {
    pub fn new(llm: Arc<LlmService>) -> Self {
        Self { llm }
    }
}

#[derive(Debug, Deserialize)]
struct ClassificationReply {
    scores: HashMap<String, f64>,
}

#[async_trait]
impl ZeroShotClassifier for LlmZeroShot {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Classification, AnalysisError> {
        let system = "You are a zero-shot topic classifier. Exactly one label applies. \
                      Reply with JSON only: {\"scores\": {\"<label>\": <probability>, ...}} \
                      covering every candidate label.";
        let user = format!(
            "Candidate labels: {}\n\nText:\n{}",
            candidate_labels.join(", "),
            text
        );
        let reply: ClassificationReply = self.llm.send_for_json(&user, Some(system)).await?;
        classification_from_scores(&reply.scores, candidate_labels)
    }
}

/// 只保留候选标签，归一化为和为 1 的单标签分布，按分数降序
fn classification_from_scores(
    scores: &HashMap<String, f64>,
    candidate_labels: &[&str],
) -> Result<Classification, AnalysisError> {
    let mut ranked: Vec<(String, f64)> = candidate_labels
        .iter()
        .map(|label| {
            let score = scores
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(label))
                .map(|(_, v)| *v)
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(0.0);
            (label.to_string(), score)
        })
        .collect();

    let total: f64 = ranked.iter().map(|(_, s)| s).sum();
    if total <= 0.0 {
        return Err(AnalysisError::invalid_output(
            format!("{:?}", scores),
            "没有任何候选标签得分",
        ));
    }

    // 稳定排序，同分保持候选顺序
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(Classification {
        labels: ranked.iter().map(|(l, _)| l.clone()).collect(),
        scores: ranked.iter().map(|(_, s)| s / total).collect(),
    })
}

fn limit_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        words.join(" ")
    } else {
        words[..max_words].join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 3] = ["Technology", "Business", "News"];

    #[test]
    fn classification_is_normalized_and_sorted() {
        let scores = HashMap::from([
            ("technology".to_string(), 3.0),
            ("Business".to_string(), 1.0),
            ("Sports".to_string(), 9.0),
        ]);
        let result = classification_from_scores(&scores, &LABELS).unwrap();

        assert_eq!(result.labels, vec!["Technology", "Business", "News"]);
        assert!((result.scores[0] - 0.75).abs() < 1e-9);
        assert!((result.scores[1] - 0.25).abs() < 1e-9);
        assert_eq!(result.scores[2], 0.0);
    }

    #[test]
    fn classification_without_scores_is_an_error() {
        let scores = HashMap::from([("Sports".to_string(), 1.0)]);
        assert!(classification_from_scores(&scores, &LABELS).is_err());
    }

    #[test]
    fn sentiment_reply_with_unknown_label_is_an_error() {
        let reply = SentimentReply {
            label: "MIXED".to_string(),
            score: 0.5,
        };
        assert!(sentiment_from_reply(reply).is_err());
    }

    #[test]
    fn summaries_are_capped_in_words() {
        assert_eq!(limit_words("one  two\nthree four", 3), "one two three");
        assert_eq!(limit_words("short one", 150), "short one");
    }
}
