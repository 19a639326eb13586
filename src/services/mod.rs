pub mod analyzer;
pub mod keywords;
pub mod llm_service;
pub mod nlp;
pub mod page_fetcher;
pub mod page_parser;
pub mod pdf_layout;
pub mod report_writer;
pub mod stopwords;
pub mod topics;

pub use analyzer::Analyzer;
pub use llm_service::LlmService;
pub use nlp::{ModelSet, SentimentModel, Summarizer, ZeroShotClassifier};
pub use page_fetcher::PageFetcher;
pub use page_parser::parse_page;
pub use report_writer::ReportWriter;
