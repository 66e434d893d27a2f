use url::Url;

/// Used when neither the upstream headers nor the URL path name the file.
pub const DEFAULT_FILENAME: &str = "download";

/// Sanitize filename so it can sit inside a quoted header parameter.
/// Only characters that would break the quoting are replaced.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Extracts the filename from a raw Content-Disposition header value.
///
/// `filename*=UTF-8''...` wins over `filename=` when both are present.
/// Quote characters around a plain `filename=` value are stripped.
pub fn parse_content_disposition_filename(header_value: &str) -> Option<String> {
    let mut plain: Option<String> = None;

    for param in split_params(header_value) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();

        if name == "filename*" {
            if let Some(decoded) = decode_ext_value(value).filter(|v| !v.is_empty()) {
                return Some(decoded);
            }
        } else if name == "filename" {
            let unquoted = value.trim_matches(|c| c == '"' || c == '\'');
            if !unquoted.is_empty() {
                plain = Some(unquoted.to_string());
            }
        }
    }

    plain
}

// Split on `;` outside quoted-strings, so `filename="a; b.mp4"` stays whole.
fn split_params(header_value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in header_value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(&header_value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&header_value[start..]);
    params
}

// RFC 5987 ext-value: charset'language'percent-encoded
fn decode_ext_value(value: &str) -> Option<String> {
    let (charset, rest) = value.split_once('\'')?;
    let (_language, encoded) = rest.split_once('\'')?;
    if !charset.eq_ignore_ascii_case("utf-8") {
        return None;
    }
    urlencoding::decode(encoded).ok().map(|s| s.into_owned())
}

/// Last non-empty path segment of `url`, percent-decoded.
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.rev().find(|s| !s.is_empty())?;
    let decoded = urlencoding::decode_binary(segment.as_bytes());
    Some(String::from_utf8_lossy(&decoded).into_owned())
}

/// Content-Disposition header first, then the URL path, then the default.
pub fn derive_filename(content_disposition: Option<&str>, url: &str) -> String {
    content_disposition
        .and_then(parse_content_disposition_filename)
        .or_else(|| filename_from_url(url))
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// Build the `Content-Disposition` value sent to the client.
///
/// Non-ASCII names get an ASCII fallback plus an RFC 5987 `filename*`.
pub fn attachment_header(filename: &str) -> String {
    if filename.is_ascii() {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}
