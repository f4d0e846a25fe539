//! Link classification for copied text.

use reqwest::Url;

/// Whether trimmed text parses as an absolute `http`/`https` URL with a
/// non-empty host.
///
/// This is the only gate in front of the enrichment pipeline; anything else
/// (relative URLs, other schemes, prose that merely contains a URL) is plain
/// text.
#[must_use]
pub fn is_http_link(text: &str) -> bool {
    let Ok(url) = Url::parse(text.trim()) else {
        return false;
    };
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}
