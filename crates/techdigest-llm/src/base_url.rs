use reqwest::Url;

use crate::error::LlmError;

/// Parse `base` and join `endpoint` onto it, keeping any path prefix.
pub(crate) fn endpoint_url(base: &str, endpoint: &str) -> Result<Url, LlmError> {
    // Exactly one trailing slash so `join` appends instead of replacing
    // the last path segment.
    let normalised = format!("{}/", base.trim_end_matches('/'));
    Url::parse(&normalised)
        .and_then(|url| url.join(endpoint))
        .map_err(|e| LlmError::InvalidBaseUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })
}
