//! 终端展示
//!
//! 把一次运行的结果排成三个面板：页面信息、内容结构、AI 分析

use std::fmt::Write;

use crate::models::{AnalysisResult, PageRecord};

const PREVIEW_ITEMS: usize = 5;
const PREVIEW_TABLES: usize = 2;
const BAR_WIDTH: usize = 40;

/// 渲染全部面板
pub fn render_panels(page: &PageRecord, analysis: &AnalysisResult, has_text: bool) -> String {
    let mut out = String::new();
    page_information(&mut out, page);
    content_structure(&mut out, page);
    if !has_text {
        out.push_str("⚠️ No text content found for analysis\n\n");
    }
    ai_analysis(&mut out, analysis);
    out
}

fn panel(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(60));
}

fn subheader(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n## {}", title);
}

fn list_or(out: &mut String, items: &[String], limit: usize, empty: &str) {
    if items.is_empty() {
        let _ = writeln!(out, "{}", empty);
        return;
    }
    for item in items.iter().take(limit) {
        let _ = writeln!(out, "- {}", item);
    }
}

fn page_information(out: &mut String, page: &PageRecord) {
    panel(out, "📄 Page Information");

    subheader(out, "Title");
    let _ = writeln!(out, "{}", page.title.as_deref().unwrap_or("No title found"));

    subheader(out, "Metadata");
    let metadata = serde_json::to_string_pretty(&page.metadata).unwrap_or_default();
    let _ = writeln!(out, "{}", metadata);

    subheader(out, "Accessibility Info");
    let acc = &page.accessibility;
    let _ = writeln!(
        out,
        "Images with alt text: {}/{}",
        acc.alt_tags, acc.total_images
    );
    let _ = writeln!(out, "ARIA roles found: {}\n", acc.aria_roles);
}

fn content_structure(out: &mut String, page: &PageRecord) {
    panel(out, "📑 Content Structure");

    subheader(out, "Headings");
    list_or(out, &page.headings, usize::MAX, "No headings found");

    subheader(out, "Paragraphs (first 5)");
    list_or(out, &page.paragraphs, PREVIEW_ITEMS, "No paragraphs found");

    subheader(out, "Tables");
    if page.tables.is_empty() {
        let _ = writeln!(out, "No tables found");
    } else {
        let _ = writeln!(out, "Found {} tables", page.tables.len());
        for (i, table) in page.tables.iter().take(PREVIEW_TABLES).enumerate() {
            let _ = writeln!(out, "Table {}:\n{}", i + 1, table);
        }
    }

    subheader(out, "Links (first 5)");
    list_or(out, &page.links, PREVIEW_ITEMS, "No links found");
    out.push('\n');
}

fn ai_analysis(out: &mut String, analysis: &AnalysisResult) {
    panel(out, "🧠 AI Analysis");

    subheader(out, "Summary");
    let _ = writeln!(out, "{}", analysis.summary);

    subheader(out, "Sentiment");
    let _ = writeln!(
        out,
        "Label: {}, Confidence: {:.2}",
        analysis.sentiment.label, analysis.sentiment.score
    );

    subheader(out, "📊 Keyword Density");
    if analysis.keyword_density.is_empty() {
        let _ = writeln!(out, "No keywords available");
    } else {
        let max = analysis.keyword_density.max_count().max(1);
        let width = analysis
            .keyword_density
            .iter()
            .map(|(w, _)| w.chars().count())
            .max()
            .unwrap_or(0);
        for (word, count) in analysis.keyword_density.iter() {
            let bar = (count * BAR_WIDTH).div_ceil(max);
            let _ = writeln!(out, "{:<width$} {} {}", word, "█".repeat(bar), count);
        }
    }

    subheader(out, "🧩 Detected Topics");
    for topic in &analysis.topics {
        let _ = writeln!(out, "- {}", topic);
    }

    subheader(out, "📌 Content Classification");
    let (label, score) = analysis.classification.top();
    let _ = writeln!(
        out,
        "This content is most likely about: {} (Confidence: {:.2})",
        label, score
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeywordDensity;

    #[test]
    fn empty_page_shows_fallbacks() {
        let text = render_panels(&PageRecord::default(), &AnalysisResult::no_content(), false);

        assert!(text.contains("No title found"));
        assert!(text.contains("No headings found"));
        assert!(text.contains("No paragraphs found"));
        assert!(text.contains("No tables found"));
        assert!(text.contains("No links found"));
        assert!(text.contains("No text content found for analysis"));
        assert!(text.contains("No keywords available"));
        assert!(text.contains("This content is most likely about: N/A (Confidence: 0.00)"));
    }

    #[test]
    fn previews_are_limited() {
        let page = PageRecord {
            paragraphs: (0..8).map(|i| format!("para {}", i)).collect(),
            tables: vec!["<table>1</table>".into(), "<table>2</table>".into(), "<table>3</table>".into()],
            ..PageRecord::default()
        };
        let text = render_panels(&page, &AnalysisResult::no_content(), true);

        assert!(text.contains("- para 4"));
        assert!(!text.contains("- para 5"));
        assert!(text.contains("Found 3 tables"));
        assert!(text.contains("<table>2</table>"));
        assert!(!text.contains("<table>3</table>"));
    }

    #[test]
    fn keyword_bars_scale_to_the_top_count() {
        let mut analysis = AnalysisResult::no_content();
        analysis.keyword_density =
            KeywordDensity::new(vec![("rust".to_string(), 4), ("cargo".to_string(), 1)]);
        let text = render_panels(&PageRecord::default(), &analysis, true);

        assert!(text.contains(&format!("rust  {} 4", "█".repeat(BAR_WIDTH))));
        assert!(text.contains(&format!("cargo {} 1", "█".repeat(BAR_WIDTH / 4))));
    }
}
