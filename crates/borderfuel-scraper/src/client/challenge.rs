//! Detection of anti-bot interstitials served with a 2xx status.

/// Returns `true` when `body` looks like a Cloudflare-style challenge page
/// rather than real content.
pub(super) fn looks_like_bot_challenge(body: &str) -> bool {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return true;
    }
    let lowered = trimmed.to_ascii_lowercase();
    lowered.contains("attention required! | cloudflare")
        || lowered.contains("/cdn-cgi/challenge-platform/")
        || lowered.contains("<title>just a moment...</title>")
        || lowered.contains("cf-chl-")
}
