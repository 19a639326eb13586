//! 简单的流式 PDF 排版
//!
//! A4 纵向，内置 Helvetica 字体（WinAnsi 编码），自动换行与分页。
//! 只提供报告需要的能力：单行单元格、多行文本、空行。

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat};

use crate::error::ReportError;

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 28.35;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Helvetica 字宽（1/1000 em），ASCII 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722, 722, 667,
    611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500,
    222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold 字宽（1/1000 em），ASCII 32..=126
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, 975, 722, 722, 722, 722, 667,
    611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556,
    278, 889, 611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// 非 ASCII 字符的近似字宽
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// 文档信息字典内容
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub producer: String,
    /// PDF 日期格式，如 `D:20240101120000`
    pub creation_date: String,
}

/// 流式 PDF 写入器，坐标以左上角为原点（单位 pt）
pub struct PdfWriter {
    pages: Vec<Vec<Operation>>,
    x: f32,
    y: f32,
    style: FontStyle,
    size: f32,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    /// 创建只有一页的空文档
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            x: MARGIN,
            y: MARGIN,
            style: FontStyle::Regular,
            size: 12.0,
        }
    }

    pub fn set_font(&mut self, style: FontStyle, size: f32) {
        self.style = style;
        self.size = size;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 换行并下移 `h`
    pub fn ln(&mut self, h: f32) {
        self.x = MARGIN;
        self.y += h;
    }

    /// 单行单元格
    ///
    /// `width` 为 0 时延伸到右边距；`new_line` 为 false 时光标停在单元格右侧
    pub fn cell(&mut self, width: f32, h: f32, text: &str, align: Align, new_line: bool) {
        let width = if width <= 0.0 {
            PAGE_WIDTH - MARGIN - self.x
        } else {
            width
        };
        self.ensure_space(h);

        let encoded = encode_win_ansi(text);
        let text_width = self.text_width(&encoded);
        let offset = match align {
            Align::Left => 0.0,
            Align::Center => ((width - text_width) / 2.0).max(0.0),
        };
        self.draw_text(self.x + offset, self.y, h, encoded);

        if new_line {
            self.ln(h);
        } else {
            self.x += width;
        }
    }

    /// 自动换行的多行文本，从当前 x 延伸到右边距，结束后回到行首
    pub fn multi_cell(&mut self, h: f32, text: &str) {
        let start_x = self.x;
        let max_width = PAGE_WIDTH - MARGIN - start_x;
        let lines = self.wrap(&encode_win_ansi(text), max_width);

        for line in lines {
            self.ensure_space(h);
            self.draw_text(start_x, self.y, h, line);
            self.y += h;
        }
        self.x = MARGIN;
    }

    /// 按当前字体计算编码后文本的宽度（pt）
    fn text_width(&self, encoded: &[u8]) -> f32 {
        let table = match self.style {
            FontStyle::Regular => &HELVETICA_WIDTHS,
            FontStyle::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        let units: u32 = encoded
            .iter()
            .map(|&b| match b {
                32..=126 => u32::from(table[usize::from(b - 32)]),
                _ => u32::from(FALLBACK_WIDTH),
            })
            .sum();
        units as f32 * self.size / 1000.0
    }

    /// 按词换行，超长的词按字符拆开；空文本保留一行
    fn wrap(&self, encoded: &[u8], max_width: f32) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        let mut current: Vec<u8> = Vec::new();

        for word in encoded.split(|&b| b == b' ').filter(|w| !w.is_empty()) {
            let candidate = if current.is_empty() {
                word.to_vec()
            } else {
                [current.as_slice(), b" ", word].concat()
            };
            if self.text_width(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            // 单词本身超宽时按字符切分
            for &b in word {
                current.push(b);
                if current.len() > 1 && self.text_width(&current) > max_width {
                    current.pop();
                    lines.push(std::mem::replace(&mut current, vec![b]));
                }
            }
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn ensure_space(&mut self, h: f32) {
        if self.y + h > PAGE_HEIGHT - MARGIN {
            self.pages.push(Vec::new());
            self.y = MARGIN;
        }
    }

    fn draw_text(&mut self, x: f32, y: f32, h: f32, encoded: Vec<u8>) {
        if encoded.is_empty() {
            return;
        }
        let font = match self.style {
            FontStyle::Regular => REGULAR_FONT,
            FontStyle::Bold => BOLD_FONT,
        };
        // 基线大致位于单元格垂直居中处
        let baseline = PAGE_HEIGHT - (y + h / 2.0 + self.size * 0.3);
        let ops = [
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), self.size.into()]),
            Operation::new("Td", vec![x.into(), baseline.into()]),
            Operation::new("Tj", vec![Object::String(encoded, StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ];
        if let Some(page) = self.pages.last_mut() {
            page.extend(ops);
        }
    }

    /// 生成 PDF 字节流
    pub fn finish(self, info: &DocumentInfo) -> Result<Vec<u8>, ReportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations }
                .encode()
                .map_err(|e| ReportError::Encode(e.to_string()))?;
            let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(PAGE_WIDTH),
                    Object::Real(PAGE_HEIGHT),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(&info.title), StringFormat::Literal),
            "Producer" => Object::String(encode_win_ansi(&info.producer), StringFormat::Literal),
            "CreationDate" => Object::String(info.creation_date.clone().into_bytes(), StringFormat::Literal),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ReportError::Serialize(e.to_string()))?;
        Ok(bytes)
    }
}

/// 编码为 WinAnsi；控制字符变为空格，无法编码的字符替换为 `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => b' ',
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> DocumentInfo {
        DocumentInfo {
            title: "Layout test".to_string(),
            producer: "web-insight".to_string(),
            creation_date: "D:20240101000000".to_string(),
        }
    }

    #[test]
    fn encodes_latin1_and_replaces_the_rest() {
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(encode_win_ansi("a\tb"), b"a b".to_vec());
        assert_eq!(encode_win_ansi("中"), b"?".to_vec());
        assert_eq!(encode_win_ansi("“x”"), vec![0x93, b'x', 0x94]);
    }

    #[test]
    fn wraps_long_text_within_margins() {
        let writer = PdfWriter::new();
        let max = PAGE_WIDTH - 2.0 * MARGIN;
        let text = "lorem ipsum dolor sit amet ".repeat(40);
        let lines = writer.wrap(&encode_win_ansi(&text), max);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(writer.text_width(line) <= max);
        }
    }

    #[test]
    fn splits_words_wider_than_a_line() {
        let writer = PdfWriter::new();
        let url = format!("https://example.com/{}", "x".repeat(300));
        let lines = writer.wrap(&encode_win_ansi(&url), 200.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), url.into_bytes());
    }

    #[test]
    fn breaks_pages_when_full() {
        let mut writer = PdfWriter::new();
        for i in 0..120 {
            writer.cell(0.0, 16.0, &format!("line {}", i), Align::Left, true);
        }
        assert!(writer.page_count() >= 3);
    }

    #[test]
    fn output_is_a_loadable_pdf() {
        let mut writer = PdfWriter::new();
        writer.set_font(FontStyle::Bold, 16.0);
        writer.cell(0.0, 20.0, "Heading", Align::Center, true);
        writer.set_font(FontStyle::Regular, 12.0);
        writer.multi_cell(16.0, "Body text");

        let bytes = writer.finish(&info()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
