//! Pagination discovery
//!
//! Reads the pagination region of the root listing page and turns it into
//! the list of pages to crawl.

use crate::ScrapeError;
use scraper::{Html, Selector};
use url::Url;

/// Container holding the links to the other listing pages
pub const PAGINATION_SELECTOR: &str = ".items.pages-items";

/// Extracts every page URL to crawl from the root page
///
/// # Discovery Rules
///
/// - The pagination region must exist; a missing region means the layout
///   changed and is a hard failure, not an empty list.
/// - Every `a[href]` inside the region is returned in document order.
/// - Relative targets are resolved against `root_url`.
/// - `root_url` itself is appended last, since the root page lists products too.
/// - Duplicates are kept.
///
/// # Example
///
/// ```
/// use pascal_scraper::crawler::discover;
/// use scraper::Html;
///
/// let html = r#"<ul class="items pages-items"><li><a href="?p=2">2</a></li></ul>"#;
/// let document = Html::parse_document(html);
/// let urls = discover(&document, "https://shop.example.com/list.html").unwrap();
/// assert_eq!(
///     urls,
///     vec![
///         "https://shop.example.com/list.html?p=2".to_string(),
///         "https://shop.example.com/list.html".to_string(),
///     ]
/// );
/// ```
pub fn discover(document: &Html, root_url: &str) -> Result<Vec<String>, ScrapeError> {
    let region_selector = Selector::parse(PAGINATION_SELECTOR).map_err(|e| ScrapeError::Discovery {
        url: root_url.to_string(),
        reason: format!("invalid pagination selector: {}", e),
    })?;
    let link_selector = Selector::parse("a[href]").map_err(|e| ScrapeError::Discovery {
        url: root_url.to_string(),
        reason: format!("invalid link selector: {}", e),
    })?;

    let region = document
        .select(&region_selector)
        .next()
        .ok_or_else(|| ScrapeError::Discovery {
            url: root_url.to_string(),
            reason: format!("pagination region '{}' not found", PAGINATION_SELECTOR),
        })?;

    let base = Url::parse(root_url).ok();

    let mut urls: Vec<String> = region
        .select(&link_selector)
        .filter_map(|link| link.value().attr("href"))
        .map(|href| resolve_link(href, base.as_ref()))
        .collect();

    urls.push(root_url.to_string());

    Ok(urls)
}

/// Resolves a link href against the root page
///
/// Falls back to the raw href when there is no usable base.
fn resolve_link(href: &str, base: Option<&Url>) -> String {
    let href = href.trim();

    match base.map(|base| base.join(href)) {
        Some(Ok(absolute)) => absolute.to_string(),
        _ => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "https://shop.example.com/esthetique/fond-de-teint.html";

    #[test]
    fn test_links_in_document_order_then_root() {
        let html = r#"
            <html><body>
            <ul class="items pages-items">
                <li><a href="https://shop.example.com/esthetique/fond-de-teint.html?p=2">2</a></li>
                <li><a href="https://shop.example.com/esthetique/fond-de-teint.html?p=3">3</a></li>
            </ul>
            </body></html>
        "#;
        let document = Html::parse_document(html);

        let urls = discover(&document, ROOT).unwrap();

        assert_eq!(
            urls,
            vec![
                format!("{}?p=2", ROOT),
                format!("{}?p=3", ROOT),
                ROOT.to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_region_is_failure() {
        let html = r#"<html><body><a href="/elsewhere">x</a></body></html>"#;
        let document = Html::parse_document(html);

        let result = discover(&document, ROOT);

        assert!(matches!(result, Err(ScrapeError::Discovery { .. })));
    }

    #[test]
    fn test_empty_region_yields_only_root() {
        let html = r#"<div class="items pages-items"></div>"#;
        let document = Html::parse_document(html);

        let urls = discover(&document, ROOT).unwrap();

        assert_eq!(urls, vec![ROOT.to_string()]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let html = r#"
            <div class="items pages-items">
                <a href="?p=2">2</a><a href="?p=2">next</a>
            </div>
        "#;
        let document = Html::parse_document(html);

        let urls = discover(&document, ROOT).unwrap();

        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], urls[1]);
    }

    #[test]
    fn test_root_relative_links_resolved() {
        let html = r#"<div class="items pages-items"><a href="/esthetique/fond-de-teint.html?p=4">4</a></div>"#;
        let document = Html::parse_document(html);

        let urls = discover(&document, ROOT).unwrap();

        assert_eq!(urls[0], format!("{}?p=4", ROOT));
    }

    #[test]
    fn test_anchors_without_href_skipped() {
        let html = r#"<div class="items pages-items"><a>current</a><a href="?p=2">2</a></div>"#;
        let document = Html::parse_document(html);

        let urls = discover(&document, ROOT).unwrap();

        assert_eq!(urls, vec![format!("{}?p=2", ROOT), ROOT.to_string()]);
    }
}
