//! 报告生成服务 - 业务能力层
//!
//! 纯格式化：把 PageRecord + AnalysisResult 排成固定顺序的 PDF，不做任何计算

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::error::ReportError;
use crate::models::{AnalysisResult, PageRecord, Report};
use crate::services::pdf_layout::{Align, DocumentInfo, FontStyle, PdfWriter};

const REPORT_TITLE: &str = "AI Web Analysis Report";
const LINE: f32 = 18.0;
const SECTION: f32 = 22.0;
const LABEL_WIDTH: f32 = 100.0;

/// 报告生成服务
#[derive(Debug, Default)]
pub struct ReportWriter;

impl ReportWriter {
    pub fn new() -> Self {
        Self
    }

    /// 以当前时间作为生成时间渲染报告
    pub fn render(
        &self,
        page: &PageRecord,
        analysis: &AnalysisResult,
        url: &str,
    ) -> Result<Report, ReportError> {
        self.render_at(page, analysis, url, Local::now())
    }

    /// 渲染报告，生成时间由调用方指定
    pub fn render_at(
        &self,
        page: &PageRecord,
        analysis: &AnalysisResult,
        url: &str,
        generated_at: DateTime<Local>,
    ) -> Result<Report, ReportError> {
        info!("📄 正在生成 PDF 报告...");
        let mut pdf = PdfWriter::new();

        // 页眉
        pdf.set_font(FontStyle::Bold, 16.0);
        pdf.cell(0.0, SECTION, REPORT_TITLE, Align::Center, true);
        pdf.set_font(FontStyle::Regular, 12.0);
        pdf.cell(
            0.0,
            LINE,
            &format!("Generated on: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
            Align::Center,
            true,
        );
        pdf.multi_cell(LINE, &format!("URL: {}", url));
        pdf.ln(LINE);

        // 网站元数据
        section(&mut pdf, "Website Metadata");
        let metadata = &page.metadata;
        pdf.multi_cell(
            LINE,
            &format!("Title: {}", page.title.as_deref().unwrap_or("No title")),
        );
        pdf.multi_cell(
            LINE,
            &format!("Description: {}", metadata.description.as_deref().unwrap_or("")),
        );
        pdf.multi_cell(
            LINE,
            &format!("Keywords: {}", metadata.keywords.as_deref().unwrap_or("")),
        );
        pdf.ln(LINE / 2.0);

        // 内容统计
        section(&mut pdf, "Content Analysis");
        for (label, count) in [
            ("Headings", page.headings.len()),
            ("Paragraphs", page.paragraphs.len()),
            ("Tables", page.tables.len()),
            ("Links", page.links.len()),
        ] {
            pdf.cell(0.0, LINE, &format!("{} Found: {}", label, count), Align::Left, true);
        }
        pdf.ln(LINE / 2.0);

        // AI 分析
        section(&mut pdf, "AI Analysis");
        label(&mut pdf, "Summary:");
        pdf.multi_cell(LINE, &analysis.summary);
        pdf.ln(LINE / 4.0);

        label(&mut pdf, "Sentiment:");
        pdf.multi_cell(
            LINE,
            &format!(
                "{} (Confidence: {:.2})",
                analysis.sentiment.label, analysis.sentiment.score
            ),
        );

        let (top_label, top_score) = analysis.classification.top();
        label(&mut pdf, "Classification:");
        pdf.multi_cell(LINE, &format!("{} (Score: {:.2})", top_label, top_score));
        pdf.ln(LINE / 2.0);

        // 主题与关键词
        section(&mut pdf, "Content Topics");
        for topic in &analysis.topics {
            pdf.multi_cell(LINE, topic);
        }
        pdf.ln(LINE / 2.0);

        section(&mut pdf, "Top Keywords");
        for (keyword, freq) in analysis.keyword_density.iter() {
            pdf.multi_cell(LINE, &format!("- {}: {} occurrences", keyword, freq));
        }

        // 无障碍
        pdf.ln(LINE);
        section(&mut pdf, "Accessibility Score");
        let acc = &page.accessibility;
        pdf.cell(
            0.0,
            LINE,
            &format!("Images with alt text: {}/{}", acc.alt_tags, acc.total_images),
            Align::Left,
            true,
        );
        pdf.cell(
            0.0,
            LINE,
            &format!("ARIA roles found: {}", acc.aria_roles),
            Align::Left,
            true,
        );

        let page_count = pdf.page_count();
        let bytes = pdf.finish(&DocumentInfo {
            title: REPORT_TITLE.to_string(),
            producer: concat!("web-insight ", env!("CARGO_PKG_VERSION")).to_string(),
            creation_date: generated_at.format("D:%Y%m%d%H%M%S").to_string(),
        })?;

        debug!("报告共 {} 页, {} 字节", page_count, bytes.len());
        info!("✓ 报告生成完成");
        Ok(Report::new(bytes))
    }
}

fn section(pdf: &mut PdfWriter, title: &str) {
    pdf.set_font(FontStyle::Bold, 14.0);
    pdf.cell(0.0, SECTION, title, Align::Left, true);
    pdf.set_font(FontStyle::Regular, 12.0);
}

/// 加粗标签，光标停在标签右侧
fn label(pdf: &mut PdfWriter, text: &str) {
    pdf.set_font(FontStyle::Bold, 12.0);
    pdf.cell(LABEL_WIDTH, LINE, text, Align::Left, false);
    pdf.set_font(FontStyle::Regular, 12.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, KeywordDensity, Sentiment};
    use lopdf::Document;

    fn analysis(topics: usize) -> AnalysisResult {
        AnalysisResult {
            summary: "A short summary.".to_string(),
            sentiment: Sentiment::neutral(),
            topics: (0..topics).map(|i| format!("Topic {}: a, b, c, d, e", i + 1)).collect(),
            keyword_density: KeywordDensity::new(vec![("page".to_string(), 2)]),
            classification: Classification {
                labels: vec![],
                scores: vec![],
            },
        }
    }

    #[test]
    fn renders_record_without_optional_fields() {
        let report = ReportWriter::new()
            .render(&PageRecord::default(), &analysis(1), "https://example.com")
            .unwrap();

        assert_eq!(report.file_name(), "ai_analysis_report.pdf");
        assert_eq!(report.mime_type(), "application/pdf");
        let doc = Document::load_mem(report.bytes()).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn long_reports_span_several_pages() {
        let report = ReportWriter::new()
            .render(&PageRecord::default(), &analysis(80), "https://example.com")
            .unwrap();
        let doc = Document::load_mem(report.bytes()).unwrap();
        assert!(doc.get_pages().len() >= 2);
    }

    #[test]
    fn non_latin_text_does_not_fail() {
        let page = PageRecord {
            title: Some("示例页面 — Ünïcode".to_string()),
            ..PageRecord::default()
        };
        let report = ReportWriter::new().render(&page, &analysis(1), "https://例子.com");
        assert!(report.is_ok());
    }
}
