//! Log sanitization utilities
//!
//! Response bodies can carry account details and request bodies carry
//! credentials, so nothing reaches a log line unbounded or unmasked.

/// Maximum number of bytes of a payload included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Secrets shorter than this are masked completely.
const MASK_MIN_LEN: usize = 8;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a payload for logging.
///
/// Strings within the limit are returned unchanged; longer ones keep the
/// first `TRUNCATE_LIMIT` bytes and note the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a credential for logging, keeping two characters at each end of
/// long values so operators can tell keys apart.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() < MASK_MIN_LEN {
        return "***".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}***{tail}")
}
