use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// A document URL in canonical form.
///
/// Lowercase host, query parameters sorted by key, no fragment, and no
/// trailing slash except on the root path. Normalizing an already
/// normalized value returns it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    /// Normalizes `raw`. Input that does not parse as an absolute URL is kept verbatim.
    pub fn new(raw: &str) -> Self {
        normalize_url(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes a document URL for cache addressing.
///
/// Malformed input degrades to exact-match caching: the original string is
/// returned unchanged instead of an error.
pub fn normalize_url(raw: &str) -> NormalizedUrl {
    match Url::parse(raw.trim()) {
        Ok(url) => NormalizedUrl(normalize_parsed(url)),
        Err(e) => {
            debug!(url = raw, error = %e, "URL did not parse, using it verbatim");
            NormalizedUrl(raw.to_string())
        }
    }
}

fn normalize_parsed(mut url: Url) -> String {
    url.set_fragment(None);

    if let Some(host) = url.host_str() {
        let lower = host.to_lowercase();
        if lower != host {
            // Special schemes already lowercase during parsing; this covers the rest.
            let _ = url.set_host(Some(&lower));
        }
    }

    if url.query().is_some() {
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        if pairs.is_empty() {
            url.set_query(None);
        } else {
            // Stable sort: repeated keys keep their relative order.
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
    }

    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(if trimmed.is_empty() { "/" } else { &trimmed });
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_host() {
        assert_eq!(
            normalize_url("https://Docs.Example.COM/Guide").as_str(),
            "https://docs.example.com/Guide"
        );
    }

    #[test]
    fn test_path_case_is_preserved() {
        assert_ne!(
            normalize_url("https://example.com/Guide"),
            normalize_url("https://example.com/guide")
        );
    }

    #[test]
    fn test_sorts_query_parameters() {
        assert_eq!(
            normalize_url("https://example.com/a?b=2&a=1&c=3").as_str(),
            "https://example.com/a?a=1&b=2&c=3"
        );
    }

    #[test]
    fn test_repeated_keys_keep_relative_order() {
        assert_eq!(
            normalize_url("https://example.com/?z=1&tag=b&tag=a").as_str(),
            "https://example.com/?tag=b&tag=a&z=1"
        );
    }

    #[test]
    fn test_drops_fragment() {
        assert_eq!(
            normalize_url("https://example.com/guide#install").as_str(),
            "https://example.com/guide"
        );
    }

    #[test]
    fn test_strips_trailing_slash() {
        assert_eq!(
            normalize_url("https://example.com/guide/").as_str(),
            "https://example.com/guide"
        );
        assert_eq!(
            normalize_url("https://example.com/guide///").as_str(),
            "https://example.com/guide"
        );
    }

    #[test]
    fn test_root_keeps_slash() {
        assert_eq!(
            normalize_url("https://example.com").as_str(),
            "https://example.com/"
        );
        assert_eq!(
            normalize_url("https://example.com/").as_str(),
            "https://example.com/"
        );
    }

    #[test]
    fn test_empty_query_is_dropped() {
        assert_eq!(
            normalize_url("https://example.com/a?").as_str(),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_combined_variations_collapse() {
        let a = normalize_url("https://Example.com/a/?b=2&a=1#frag");
        let b = normalize_url("https://example.com/a?a=1&b=2");
        assert_eq!(a, b);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://Example.com/a/?b=2&a=1",
            "https://example.com/",
            "http://EXAMPLE.org/x//?q=a%20b&a",
            "https://docs.example.com/guide/?x=1",
            "not a url",
            "",
        ];

        for input in inputs {
            let once = normalize_url(input);
            let twice = normalize_url(once.as_str());
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_malformed_input_is_returned_unchanged() {
        assert_eq!(normalize_url("not a url").as_str(), "not a url");
        assert_eq!(normalize_url("/relative/path/").as_str(), "/relative/path/");
        assert_eq!(normalize_url("").as_str(), "");
    }
}
