//! 关键词密度统计

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::KeywordDensity;

/// 保留的关键词数量
pub const TOP_KEYWORDS: usize = 10;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w{3,}\b").expect("static regex is valid"));

/// 统计长度不少于 3 的词频，返回频次最高的前 10 个
///
/// 同频的词按首次出现的顺序排列
pub fn keyword_density(text: &str) -> KeywordDensity {
    let lowered = text.to_lowercase();

    // 词 -> (频次, 首次出现序号)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, m) in WORD_RE.find_iter(&lowered).enumerate() {
        counts.entry(m.as_str()).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    KeywordDensity::new(
        ranked
            .into_iter()
            .take(TOP_KEYWORDS)
            .map(|(word, count, _)| (word.to_string(), count))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_follow_first_occurrence() {
        let density = keyword_density("This is a test page about technology and business.");
        let words: Vec<&str> = density.iter().map(|(w, _)| w).collect();
        assert_eq!(
            words,
            vec!["this", "test", "page", "about", "technology", "and", "business"]
        );
        for word in ["test", "page", "technology", "business"] {
            assert_eq!(density.get(word), Some(1));
        }
    }

    #[test]
    fn short_words_are_ignored() {
        let density = keyword_density("a an be it is of on to the");
        assert_eq!(density.len(), 1);
        assert_eq!(density.get("the"), Some(1));
    }

    #[test]
    fn counts_are_case_insensitive_and_descending() {
        let density = keyword_density("Rust rust RUST crate crate cargo");
        let entries: Vec<(&str, usize)> = density.iter().collect();
        assert_eq!(entries, vec![("rust", 3), ("crate", 2), ("cargo", 1)]);
    }

    #[test]
    fn at_most_ten_entries() {
        let text = (0..30)
            .map(|i| format!("word{:02}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let density = keyword_density(&text);
        assert_eq!(density.len(), TOP_KEYWORDS);
        assert_eq!(density.iter().next(), Some(("word00", 1)));
    }

    #[test]
    fn empty_text_has_no_keywords() {
        assert!(keyword_density("").is_empty());
    }
}
