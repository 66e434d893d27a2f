//! Opaque path tokens for resolved links.
//!
//! Tokens are base64 with the URL-safe alphabet and no padding, so they only
//! ever contain `[A-Za-z0-9_-]`. There is no secrecy or integrity here:
//! decoding re-checks the result against the allow-list instead.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::domain::{AllowList, AppError, ResolvedLink};

pub fn encode(link: &str) -> String {
    URL_SAFE_NO_PAD.encode(link.as_bytes())
}

/// Decode a token that arrived in a client-supplied path.
///
/// Standard-alphabet tokens (`+`, `/`, `=`) are accepted too.
pub fn decode(token: &str, allow_list: &AllowList) -> Result<ResolvedLink, AppError> {
    let normalized: String = token
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();

    let bytes = URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|_| AppError::MalformedToken)?;
    let link = String::from_utf8(bytes).map_err(|_| AppError::MalformedToken)?;

    if !allow_list.is_trusted(&link) {
        return Err(AppError::MalformedToken);
    }

    Ok(ResolvedLink::new(link))
}
