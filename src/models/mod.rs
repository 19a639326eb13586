pub mod analysis;
pub mod page;
pub mod report;

pub use analysis::{AnalysisResult, Classification, KeywordDensity, Sentiment, SentimentLabel};
pub use page::{Accessibility, FetchOutcome, PageMetadata, PageRecord};
pub use report::{Report, REPORT_FILE_NAME, REPORT_MIME_TYPE};
