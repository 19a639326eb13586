//! 文本分析结果

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// 情感标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }

    /// 宽松解析模型返回的标签（大小写、LABEL_0/1 等形式）
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" | "POS" | "LABEL_1" => Some(SentimentLabel::Positive),
            "NEGATIVE" | "NEG" | "LABEL_0" => Some(SentimentLabel::Negative),
            "NEUTRAL" | "NEU" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 情感分析结果，score 取值 [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

impl Sentiment {
    pub fn new(label: SentimentLabel, score: f64) -> Self {
        let score = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { label, score }
    }

    /// 文本过短或分析失败时使用的中性默认值
    pub fn neutral() -> Self {
        Self::new(SentimentLabel::Neutral, 1.0)
    }
}

/// 单标签分类结果，labels 与 scores 一一对应，按分数降序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl Classification {
    /// 未分类占位
    pub fn not_available() -> Self {
        Self {
            labels: vec!["N/A".to_string()],
            scores: vec![0.0],
        }
    }

    /// 最可能的标签及其分数，缺失时退化为 N/A
    pub fn top(&self) -> (&str, f64) {
        let label = self.labels.first().map(String::as_str).unwrap_or("N/A");
        let score = self.scores.first().copied().unwrap_or(0.0);
        (label, score)
    }
}

/// 关键词频次表，保持插入顺序（频次降序，同频按首次出现）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordDensity(Vec<(String, usize)>);

impl KeywordDensity {
    pub fn new(entries: Vec<(String, usize)>) -> Self {
        Self(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(word, count)| (word.as_str(), *count))
    }

    pub fn get(&self, word: &str) -> Option<usize> {
        self.0.iter().find(|(w, _)| w == word).map(|(_, c)| *c)
    }

    pub fn max_count(&self) -> usize {
        self.0.iter().map(|(_, c)| *c).max().unwrap_or(0)
    }
}

impl Serialize for KeywordDensity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (word, count) in &self.0 {
            map.serialize_entry(word, count)?;
        }
        map.end()
    }
}

/// 分析结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub sentiment: Sentiment,
    pub topics: Vec<String>,
    pub keyword_density: KeywordDensity,
    pub classification: Classification,
}

impl AnalysisResult {
    /// 规范化后文本为空时的固定结果
    pub fn empty_text() -> Self {
        Self::placeholder("No text content available for analysis")
    }

    /// 页面没有任何段落时展示层使用的结果
    pub fn no_content() -> Self {
        Self::placeholder("No content available")
    }

    fn placeholder(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            sentiment: Sentiment::neutral(),
            topics: vec!["No topics available".to_string()],
            keyword_density: KeywordDensity::default(),
            classification: Classification::not_available(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_density_serializes_in_order() {
        let density = KeywordDensity::new(vec![
            ("zeta".to_string(), 3),
            ("alpha".to_string(), 1),
        ]);
        let json = serde_json::to_string(&density).unwrap();
        assert_eq!(json, r#"{"zeta":3,"alpha":1}"#);
    }

    #[test]
    fn sentiment_score_is_clamped() {
        assert_eq!(Sentiment::new(SentimentLabel::Positive, 1.7).score, 1.0);
        assert_eq!(Sentiment::new(SentimentLabel::Negative, -0.2).score, 0.0);
        assert_eq!(Sentiment::new(SentimentLabel::Neutral, f64::NAN).score, 0.0);
    }

    #[test]
    fn sentiment_label_parsing() {
        assert_eq!(SentimentLabel::parse("positive"), Some(SentimentLabel::Positive));
        assert_eq!(SentimentLabel::parse(" NEGATIVE "), Some(SentimentLabel::Negative));
        assert_eq!(SentimentLabel::parse("mixed"), None);
    }

    #[test]
    fn empty_classification_top_falls_back() {
        let empty = Classification {
            labels: vec![],
            scores: vec![],
        };
        assert_eq!(empty.top(), ("N/A", 0.0));
    }
}
