//! Pure function turning a raw `href` into a path fetchable against a base
//! URL (§4.2).
//!
//! Grounded in `processLink` in
//! `examples/original_source/src/crawler/linkCrawler.go`, branch for
//! branch. Branch 4 ("absolute, same scheme, different host") is preserved
//! bit-for-bit even though it is almost certainly a bug in the reference
//! (see SPEC_FULL.md / DESIGN.md): a faithful reimplementation keeps it,
//! a corrected one would skip the link entirely.

/// Precondition: `link` is non-empty. The engine filters empty strings and
/// pure fragments before calling this (§4.4); violating the precondition
/// panics rather than silently doing the wrong thing.
pub fn canonicalize(link: &str, current_relative: &str, base: &str) -> String {
    assert!(!link.is_empty(), "canonicalize called with empty link");

    // 1. Fragment on the current page.
    if link.starts_with('#') {
        return format!("{current_relative}{link}");
    }

    // 2. Exactly the root.
    if link == base {
        return String::new();
    }

    // 3. Fully-qualified same-site URL.
    if link.contains(base) {
        return link.to_string();
    }

    // 4. Absolute, same scheme, different host: strip everything from the
    // first '/' onward, per the reference. Nonsensical but preserved.
    if let Some(scheme_end) = base.find("//") {
        let scheme_prefix = &base[..scheme_end + 2];
        if link.contains(scheme_prefix) {
            if let Some(slash) = link.find('/') {
                return link[..slash].to_string();
            }
            return link.to_string();
        }
    }

    // 5. Absolute path.
    if link.starts_with('/') {
        return link.to_string();
    }

    // 6. Relative to the referring page.
    format!("{current_relative}/{link}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_appends_to_current_relative() {
        assert_eq!(canonicalize("#section", "/test1", "http://x"), "/test1#section");
    }

    #[test]
    fn exact_base_returns_root() {
        assert_eq!(canonicalize("http://x", "/test1", "http://x"), "");
    }

    #[test]
    fn same_site_absolute_url_is_returned_unchanged() {
        assert_eq!(
            canonicalize("http://x/test2", "/test1", "http://x"),
            "http://x/test2"
        );
    }

    #[test]
    fn off_host_same_scheme_strips_path() {
        assert_eq!(
            canonicalize("http://other.example/page", "/test1", "http://x"),
            "http://other.example"
        );
    }

    #[test]
    fn absolute_path_returned_unchanged() {
        assert_eq!(canonicalize("/test3", "/test1", "http://x"), "/test3");
    }

    #[test]
    fn relative_link_joins_current_relative() {
        assert_eq!(canonicalize("test", "/test1", "http://x"), "/test1/test");
    }

    #[test]
    fn relative_link_from_root_joins_empty_relative() {
        assert_eq!(canonicalize("test", "", "http://x"), "/test");
    }

    #[test]
    #[should_panic]
    fn empty_link_panics() {
        canonicalize("", "/test1", "http://x");
    }

    #[test]
    fn canonicalize_is_idempotent_when_reapplied() {
        let base = "http://x";
        let first = canonicalize("/test1", "", base);
        let second = canonicalize("test2", &first, base);
        let refed = canonicalize("test2", &first, base);
        assert_eq!(second, refed);
    }
}
