//! Shared utility functions used across multiple modules.

use std::sync::atomic::{AtomicI64, Ordering};

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Current Unix timestamp in milliseconds, strictly increasing per process.
///
/// Modification stamps must never move backward, so a wall clock that jumps
/// back (NTP correction, suspend/resume) is clamped to one past the last
/// issued stamp.
pub fn now_ms() -> i64 {
    let wall = chrono::Utc::now().timestamp_millis();
    let mut prev = LAST_STAMP.load(Ordering::Acquire);
    loop {
        let next = wall.max(prev + 1);
        match LAST_STAMP.compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => return next,
            Err(actual) => prev = actual,
        }
    }
}

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_ms_is_strictly_increasing() {
        let first = now_ms();
        let second = now_ms();
        let third = now_ms();
        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
    }

    #[test]
    fn normalize_text_option_trims_value() {
        assert_eq!(
            normalize_text_option(Some(" https://example.com ".to_string())),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn is_http_url_accepts_valid_schemes() {
        assert!(is_http_url("http://localhost"));
        assert!(is_http_url("https://example.com"));
        assert!(!is_http_url("ws://example.com"));
        assert!(!is_http_url("example.com"));
    }
}
