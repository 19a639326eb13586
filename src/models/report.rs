//! PDF 报告产物

/// 下载文件名
pub const REPORT_FILE_NAME: &str = "ai_analysis_report.pdf";
/// 报告 MIME 类型
pub const REPORT_MIME_TYPE: &str = "application/pdf";

/// 渲染完成的报告，生成后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    bytes: Vec<u8>,
}

impl Report {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn file_name(&self) -> &'static str {
        REPORT_FILE_NAME
    }

    pub fn mime_type(&self) -> &'static str {
        REPORT_MIME_TYPE
    }
}
