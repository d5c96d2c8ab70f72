//! HTML parser for extracting links from fetched pages
//!
//! Links are resolved against the page URL and split into internal
//! (same host as the page) and external sets. When pagination handling is
//! enabled, "next page" links are collected as internal links too.

use crate::crawler::fetcher::RenderConfig;
use crate::url::same_host;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Links extracted from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Absolute links on the page's own host, in document order
    pub internal_links: Vec<String>,

    /// Absolute links to other hosts, in document order
    pub external_links: Vec<String>,
}

/// Parses HTML content and extracts its links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
/// - `<link rel="canonical" href="...">`
/// - with `handle_pagination`: `<link rel="next">`, `<a rel="next">` and
///   elements matching `next_selector`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs and fragment-only hrefs
/// - Anything that does not resolve to http(s)
///
/// # Example
///
/// ```
/// use sitewalk::crawler::{parse_html, RenderConfig};
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><a href="https://other.org/">Other</a>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let page = parse_html(html, &base, &RenderConfig::default());
/// assert_eq!(page.internal_links, vec!["https://example.com/about"]);
/// assert_eq!(page.external_links, vec!["https://other.org/"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url, render: &RenderConfig) -> ParsedPage {
    let document = Html::parse_document(html);

    let mut page = ParsedPage::default();
    let mut seen = HashSet::new();

    let mut push = |link: Url| {
        if !seen.insert(link.to_string()) {
            return;
        }
        if same_host(&link, base_url) {
            page.internal_links.push(link.into());
        } else {
            page.external_links.push(link.into());
        }
    };

    for element in select_all(&document, "a[href]") {
        if element.value().attr("download").is_some() {
            continue;
        }
        if let Some(link) = href_of(&element, base_url) {
            push(link);
        }
    }

    for element in select_all(&document, "link[rel='canonical'][href]") {
        if let Some(link) = href_of(&element, base_url) {
            push(link);
        }
    }

    if render.handle_pagination {
        for link in pagination_links(&document, base_url, render.next_selector.as_deref()) {
            push(link);
        }
    }

    page
}

/// Collects "next page" links
fn pagination_links(document: &Html, base_url: &Url, next_selector: Option<&str>) -> Vec<Url> {
    let mut links: Vec<Url> = select_all(document, "link[rel='next'][href], a[rel='next'][href]")
        .filter_map(|element| href_of(&element, base_url))
        .collect();

    if let Some(selector) = next_selector {
        // A match may carry the link itself or wrap an anchor
        for element in select_all(document, selector) {
            let found = href_of(&element, base_url)
                .or_else(|| {
                    element
                        .value()
                        .attr("data-href")
                        .and_then(|href| resolve_link(href, base_url))
                })
                .or_else(|| {
                    select_all_in(&element, "a[href]").find_map(|inner| href_of(&inner, base_url))
                });
            if let Some(link) = found {
                links.push(link);
            }
        }
    }

    links
}

fn select_all<'a>(document: &'a Html, selector: &str) -> impl Iterator<Item = ElementRef<'a>> {
    let parsed = Selector::parse(selector).ok();
    parsed
        .into_iter()
        .flat_map(move |s| document.select(&s).collect::<Vec<_>>())
}

fn select_all_in<'a>(
    element: &ElementRef<'a>,
    selector: &str,
) -> impl Iterator<Item = ElementRef<'a>> {
    let element = *element;
    Selector::parse(selector)
        .ok()
        .into_iter()
        .flat_map(move |s| element.select(&s).collect::<Vec<_>>())
}

fn href_of(element: &ElementRef<'_>, base_url: &Url) -> Option<Url> {
    element
        .value()
        .attr("href")
        .and_then(|href| resolve_link(href, base_url))
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None for special schemes, fragment-only links and anything
/// that fails to resolve.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    matches!(absolute.scheme(), "http" | "https").then_some(absolute)
}
