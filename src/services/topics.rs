//! 主题提取
//!
//! 单文档词袋 + LDA（collapsed Gibbs 采样，固定随机种子）

use std::collections::HashMap;
use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

use crate::error::AnalysisError;
use crate::services::stopwords::is_stop_word;

/// 词表上限
pub const MAX_FEATURES: usize = 500;
/// 主题数上限
pub const MAX_TOPICS: usize = 3;
/// 每个主题展示的词数
pub const WORDS_PER_TOPIC: usize = 5;
/// 少于该数量的特征词时不做建模
pub const MIN_FEATURES: usize = 6;

pub const INSUFFICIENT_CONTENT: &str = "Insufficient content for topic modeling";
pub const TOPICS_UNAVAILABLE: &str = "Topic modeling not available for this content";

const RANDOM_SEED: u64 = 42;
const GIBBS_ITERATIONS: usize = 200;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("static regex is valid"));

/// 单文档词袋
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagOfWords {
    /// 按字母序排列的特征词
    pub vocabulary: Vec<String>,
    /// 与 vocabulary 对应的词频
    pub counts: Vec<usize>,
}

impl BagOfWords {
    /// 分词、转小写、去停用词，只保留出现最多的 `MAX_FEATURES` 个词
    pub fn fit(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let mut freq: HashMap<&str, usize> = HashMap::new();
        for m in TOKEN_RE.find_iter(&lowered) {
            let word = m.as_str();
            if !is_stop_word(word) {
                *freq.entry(word).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked.truncate(MAX_FEATURES);
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        Self {
            vocabulary: ranked.iter().map(|(w, _)| w.to_string()).collect(),
            counts: ranked.iter().map(|(_, c)| *c).collect(),
        }
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }
}

/// LDA 拟合结果：每个主题对每个特征词的权重
#[derive(Debug, Clone)]
pub struct TopicModel {
    pub components: Vec<Vec<f64>>,
}

impl TopicModel {
    /// 对单个文档拟合 `n_topics` 个主题，先验均为 1/n_topics
    pub fn fit(bow: &BagOfWords, n_topics: usize, seed: u64) -> Result<Self, AnalysisError> {
        let n_words = bow.n_features();
        if n_topics == 0 || n_words == 0 {
            return Err(AnalysisError::TopicModel(format!(
                "无效的模型规模: {} 个主题, {} 个特征",
                n_topics, n_words
            )));
        }

        let tokens: Vec<usize> = bow
            .counts
            .iter()
            .enumerate()
            .flat_map(|(w, &c)| std::iter::repeat(w).take(c))
            .collect();

        let alpha = 1.0 / n_topics as f64;
        let beta = 1.0 / n_topics as f64;
        let v_beta = n_words as f64 * beta;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut topic_word = vec![vec![0usize; n_words]; n_topics];
        let mut topic_total = vec![0usize; n_topics];
        let mut doc_topic = vec![0usize; n_topics];
        let mut assignment: Vec<usize> = Vec::with_capacity(tokens.len());

        for &w in &tokens {
            let k = rng.gen_range(0..n_topics);
            assignment.push(k);
            topic_word[k][w] += 1;
            topic_total[k] += 1;
            doc_topic[k] += 1;
        }

        let mut weights = vec![0.0f64; n_topics];
        for _ in 0..GIBBS_ITERATIONS {
            for (i, &w) in tokens.iter().enumerate() {
                let old = assignment[i];
                topic_word[old][w] -= 1;
                topic_total[old] -= 1;
                doc_topic[old] -= 1;

                let mut total = 0.0;
                for k in 0..n_topics {
                    let p = (doc_topic[k] as f64 + alpha) * (topic_word[k][w] as f64 + beta)
                        / (topic_total[k] as f64 + v_beta);
                    total += p;
                    weights[k] = total;
                }

                let target = rng.gen::<f64>() * total;
                let new = weights
                    .iter()
                    .position(|&cumulative| target < cumulative)
                    .unwrap_or(n_topics - 1);

                assignment[i] = new;
                topic_word[new][w] += 1;
                topic_total[new] += 1;
                doc_topic[new] += 1;
            }
        }

        let components = topic_word
            .into_iter()
            .map(|row| row.into_iter().map(|c| c as f64 + beta).collect())
            .collect();

        Ok(Self { components })
    }

    /// 每个主题权重最高的 `n` 个词（同权重按字母序）
    pub fn top_words<'a>(&self, vocabulary: &'a [String], n: usize) -> Vec<Vec<&'a str>> {
        self.components
            .iter()
            .map(|row| {
                let mut order: Vec<usize> = (0..row.len()).collect();
                order.sort_by(|&a, &b| row[b].total_cmp(&row[a]).then(a.cmp(&b)));
                order
                    .into_iter()
                    .take(n)
                    .map(|i| vocabulary[i].as_str())
                    .collect()
            })
            .collect()
    }
}

/// 提取主题，返回可读的 "Topic N: w1, w2, ..." 行
///
/// 特征词不足时返回固定提示，不会尝试建模
pub fn extract_topics(text: &str) -> Result<Vec<String>, AnalysisError> {
    let bow = BagOfWords::fit(text);
    if bow.n_features() < MIN_FEATURES {
        return Ok(vec![INSUFFICIENT_CONTENT.to_string()]);
    }

    let n_topics = MAX_TOPICS.min(bow.n_features());
    let model = TopicModel::fit(&bow, n_topics, RANDOM_SEED)?;

    Ok(model
        .top_words(&bow.vocabulary, WORDS_PER_TOPIC)
        .into_iter()
        .enumerate()
        .map(|(idx, words)| format!("Topic {}: {}", idx + 1, words.join(", ")))
        .collect())
}
