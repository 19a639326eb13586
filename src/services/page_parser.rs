//! 页面解析 - 业务能力层
//!
//! 只负责把 HTML 源码解析为 PageRecord，不接触浏览器

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::models::{Accessibility, PageMetadata, PageRecord};

struct Selectors {
    title: Selector,
    description: Selector,
    keywords: Selector,
    viewport: Selector,
    headings: Selector,
    paragraphs: Selector,
    links: Selector,
    tables: Selector,
    images: Selector,
    roles: Selector,
}

static SELECTORS: LazyLock<Selectors> = LazyLock::new(|| Selectors {
    title: css("title"),
    description: css(r#"meta[name="description"]"#),
    keywords: css(r#"meta[name="keywords"]"#),
    viewport: css(r#"meta[name="viewport"]"#),
    headings: css("h1, h2, h3, h4"),
    paragraphs: css("p"),
    links: css("a[href]"),
    tables: css("table"),
    images: css("img"),
    roles: css("[role]"),
});

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selectors are valid CSS")
}

/// 解析 HTML 源码为页面记录
pub fn parse_page(html: &str) -> PageRecord {
    let document = Html::parse_document(html);
    let s = &*SELECTORS;

    let title = document
        .select(&s.title)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());

    let metadata = PageMetadata {
        description: meta_content(&document, &s.description),
        keywords: meta_content(&document, &s.keywords),
        viewport: meta_content(&document, &s.viewport),
    };

    // 选择器按文档顺序返回，h1-h4 自然交错
    let headings = document.select(&s.headings).map(element_text).collect();
    let paragraphs = document.select(&s.paragraphs).map(element_text).collect();

    let links = document
        .select(&s.links)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.starts_with("http"))
        .map(str::to_string)
        .collect();

    let tables = document.select(&s.tables).map(|t| t.html()).collect();

    let mut accessibility = Accessibility::default();
    for img in document.select(&s.images) {
        accessibility.total_images += 1;
        if img
            .value()
            .attr("alt")
            .is_some_and(|alt| !alt.trim().is_empty())
        {
            accessibility.alt_tags += 1;
        }
    }
    accessibility.aria_roles = document.select(&s.roles).count();

    PageRecord {
        title,
        metadata,
        headings,
        paragraphs,
        links,
        tables,
        accessibility,
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title> Example </title>
  <meta name="description" content="A sample page">
  <meta name="viewport" content="width=device-width">
</head>
<body>
  <h1>Main heading</h1>
  <p>This is a test page about technology and business.</p>
  <a href="https://example.org/about">About</a>
</body>
</html>"#;

    #[test]
    fn parses_example_page() {
        let page = parse_page(EXAMPLE_PAGE);

        assert_eq!(page.title.as_deref(), Some("Example"));
        assert_eq!(page.metadata.description.as_deref(), Some("A sample page"));
        assert_eq!(page.metadata.keywords, None);
        assert_eq!(page.metadata.viewport.as_deref(), Some("width=device-width"));
        assert_eq!(page.headings, vec!["Main heading"]);
        assert_eq!(
            page.paragraphs,
            vec!["This is a test page about technology and business."]
        );
        assert_eq!(page.links, vec!["https://example.org/about"]);
        assert!(page.tables.is_empty());
        assert_eq!(
            page.accessibility,
            Accessibility {
                alt_tags: 0,
                total_images: 0,
                aria_roles: 0
            }
        );
    }

    #[test]
    fn headings_keep_document_order_across_levels() {
        let page = parse_page(
            "<h2>second</h2><h1> first </h1><h4>fourth</h4><h5>ignored</h5><h3>third</h3>",
        );
        assert_eq!(page.headings, vec!["second", "first", "fourth", "third"]);
    }

    #[test]
    fn only_absolute_http_links_are_kept() {
        let page = parse_page(
            r##"<a href="/relative">a</a>
                <a href="#frag">b</a>
                <a href="mailto:me@example.com">c</a>
                <a href="http://plain.example">d</a>
                <a href="https://secure.example/x">e</a>
                <a>no href</a>"##,
        );
        assert_eq!(
            page.links,
            vec!["http://plain.example", "https://secure.example/x"]
        );
    }

    #[test]
    fn counts_accessibility_attributes() {
        let page = parse_page(
            r#"<img src="a.png" alt="Logo">
               <img src="b.png" alt="   ">
               <img src="c.png">
               <nav role="navigation"></nav>
               <div role="main"><img src="d.png" alt="chart" role="img"></div>"#,
        );
        assert_eq!(page.accessibility.total_images, 4);
        assert_eq!(page.accessibility.alt_tags, 2);
        assert_eq!(page.accessibility.aria_roles, 3);
    }

    #[test]
    fn tables_are_kept_as_markup() {
        let page = parse_page("<table><tr><td>1</td></tr></table><p>after</p>");
        assert_eq!(page.tables.len(), 1);
        assert!(page.tables[0].starts_with("<table>"));
        assert!(page.tables[0].contains("<td>1</td>"));
    }

    #[test]
    fn missing_title_is_absent() {
        let page = parse_page("<p>body only</p>");
        assert_eq!(page.title, None);
        assert_eq!(page.metadata, PageMetadata::default());
    }
}
