//! Browser identity presented to the price site.

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, REFERER, USER_AGENT,
};

pub(super) const DESKTOP_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:126.0) Gecko/20100101 Firefox/126.0",
];

/// Picks one of the desktop user agents at random.
pub(super) fn random_user_agent() -> &'static str {
    let i = rand::random_range(0..DESKTOP_USER_AGENTS.len());
    DESKTOP_USER_AGENTS[i]
}

/// Full header set a desktop browser sends on a top-level navigation.
pub(super) fn browser_headers(user_agent: &str, referer: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(
        "upgrade-insecure-requests",
        HeaderValue::from_static("1"),
    );
    if let Ok(ua) = HeaderValue::from_str(user_agent) {
        headers.insert(USER_AGENT, ua);
    }
    if let Ok(referer) = HeaderValue::from_str(referer) {
        headers.insert(REFERER, referer);
    }
    headers
}

/// Extracts the scheme+host origin from a page URL.
///
/// Given `"https://bg.fuelo.net/?lang=en"`, returns `"https://bg.fuelo.net"`.
pub(super) fn extract_origin(url: &reqwest::Url) -> String {
    url.origin().ascii_serialization()
}
