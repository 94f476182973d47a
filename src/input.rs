use crate::errors::OperationError;

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Drops surrounding whitespace and one leading `http://` or `https://`.
pub fn strip_scheme(raw: &str) -> &str {
    let trimmed = raw.trim();
    for scheme in SCHEMES {
        if let Some(prefix) = trimmed.get(..scheme.len())
            && prefix.eq_ignore_ascii_case(scheme)
        {
            return &trimmed[scheme.len()..];
        }
    }
    trimmed
}

/// Turns what the user typed into the fully qualified url sent upstream.
pub fn normalize_target(raw: &str) -> Result<String, OperationError> {
    let rest = strip_scheme(raw);
    if rest.trim().is_empty() {
        return Err(OperationError::EMPTY_URL);
    }
    Ok(format!("http://{rest}"))
}
