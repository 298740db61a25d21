//! Parses an HTML byte stream and returns the raw `href` values of anchor
//! elements matching a selection policy (§4.1).
//!
//! The reference selects nodes with an XPath expression
//! (`//a[@href[not(contains(.,'http')) ...]]`) evaluated by
//! `antchfx/htmlquery`. Rust's XPath-over-HTML ecosystem is thin compared to
//! its CSS-selector one (`scraper`, used by the pack's `dIB59-seo`), so the
//! policy is split in two: a CSS selector picks the candidate elements, and
//! an `ExtractPolicy` predicate filters their `href` values in Rust. This
//! preserves the exact exclusion semantics of the default policy, including
//! its documented imprecision (§4.1, §9).

use super::error::ExtractError;
use scraper::{Html, Selector};

/// A selection policy: a CSS selector for candidate elements, plus a
/// predicate over each candidate's `href` value.
pub struct ExtractPolicy {
    selector: Selector,
    accept: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

impl ExtractPolicy {
    pub fn new(
        selector: &str,
        accept: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            selector: Selector::parse(selector).expect("invalid CSS selector"),
            accept: Box::new(accept),
        }
    }

    /// Default on-site policy: every `<a>` whose `href` does not contain
    /// `http`, `mailto:`, or `tel:`.
    pub fn default_on_site() -> Self {
        Self::new("a[href]", |href| {
            !href.contains("http") && !href.contains("mailto:") && !href.contains("tel:")
        })
    }
}

/// Reads `body` to EOF (it is consumed entirely; there is no separate
/// close step needed for an in-memory `&str` as there would be for a
/// `ReadCloser`), parses it as HTML, and returns matching `href` values in
/// document order, duplicates preserved.
pub fn extract(body: &str, policy: &ExtractPolicy) -> Result<Vec<String>, ExtractError> {
    // `scraper::Html::parse_document` never fails outright (html5ever is
    // error-tolerant), but guards against degenerate inputs the way the
    // reference's `htmlquery.Parse` can.
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let document = Html::parse_document(body);
    let hrefs = document
        .select(&policy.selector)
        .filter_map(|node| node.value().attr("href"))
        .filter(|href| (policy.accept)(href))
        .map(str::to_string)
        .collect();

    Ok(hrefs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_hrefs_in_document_order() {
        let html = r#"<html>
            <div>
                <a href='test'>test</a>
                <div>
                    <a href='test2'>some link</a>
                </div>
            </div>
        </html>"#;

        let policy = ExtractPolicy::default_on_site();
        let result = extract(html, &policy).unwrap();
        assert_eq!(result, vec!["test".to_string(), "test2".to_string()]);
    }

    #[test]
    fn no_anchors_returns_empty() {
        let html = "<html><div>test</div></html>";
        let policy = ExtractPolicy::default_on_site();
        let result = extract(html, &policy).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn default_policy_excludes_off_site_and_non_http_schemes() {
        let html = r#"<html>
            <a href='/on-site'>a</a>
            <a href='http://other.example/off-site'>b</a>
            <a href='mailto:someone@example.com'>c</a>
            <a href='tel:+15551234'>d</a>
        </html>"#;

        let policy = ExtractPolicy::default_on_site();
        let result = extract(html, &policy).unwrap();
        assert_eq!(result, vec!["/on-site".to_string()]);
    }
}
