//! Token normalization.
//!
//! A token byte is an ASCII letter or digit. Every other byte,
//! including all non-ASCII bytes, separates tokens.

/// Check if `byte` can be part of a token.
#[inline]
pub fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
}

/// Normalize a run of bytes into a token.
///
/// Keeps ASCII alphanumerics, lowercased, and drops everything else.
/// Returns `None` when nothing survives; such runs are never indexed.
///
/// # Example
///
/// ```
/// use invidx::core::indexer::normalize;
///
/// assert_eq!(normalize(b"WoRlD!"), Some("world".to_string()));
/// assert_eq!(normalize(b"--"), None);
/// ```
pub fn normalize(word: &[u8]) -> Option<String> {
    let token: String = word
        .iter()
        .filter(|b| is_token_byte(**b))
        .map(|b| b.to_ascii_lowercase() as char)
        .collect();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Split `text` into normalized tokens, in order of appearance.
///
/// Duplicates are kept; callers that need sets deduplicate.
pub fn tokens(text: &[u8]) -> impl Iterator<Item = String> + '_ {
    text.split(|b| !is_token_byte(*b)).filter_map(normalize)
}
