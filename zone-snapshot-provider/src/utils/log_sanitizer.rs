//! Log sanitization utilities
//!
//! Response bodies and canonical requests can be large (a full page of
//! record sets) and may echo TXT values; only a prefix is logged.

/// Maximum number of bytes to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Truncate a string for safe logging.
///
/// Strings within the limit are returned unchanged. Longer ones are cut at the
/// last character boundary before `TRUNCATE_LIMIT` bytes and suffixed with the
/// total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= TRUNCATE_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}
