//! Listing, pagination and search helpers for the media browser.
//!
//! Lives in `core` so the repository layer and handlers agree on the same
//! bounds and escaping rules.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default page size for list endpoints (matches the dashboard's page size).
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum page size for list endpoints.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Longest search term accepted, in characters.
pub const MAX_SEARCH_TERM_LEN: usize = 200;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Search terms
// ---------------------------------------------------------------------------

/// Normalize a free-text search term.
///
/// - Trims and collapses internal whitespace to single spaces.
/// - Truncates to [`MAX_SEARCH_TERM_LEN`] characters.
///
/// Returns `None` when nothing usable remains.
///
/// # Examples
///
/// ```
/// use studio_core::search::sanitize_search_term;
/// assert_eq!(sanitize_search_term("  red   fox "), Some("red fox".to_string()));
/// assert_eq!(sanitize_search_term("   "), None);
/// ```
pub fn sanitize_search_term(term: &str) -> Option<String> {
    let collapsed = term.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(MAX_SEARCH_TERM_LEN).collect())
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build a `%term%` pattern for a contains-style `ILIKE` search.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT), 50);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(1000), 50, 200), 200);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(0), 50, 200), 1);
        assert_eq!(clamp_limit(Some(-3), 50, 200), 1);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(Some(-10)), 0);
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(25)), 25);
    }

    #[test]
    fn sanitize_truncates_long_terms() {
        let term = "a".repeat(MAX_SEARCH_TERM_LEN + 50);
        let out = sanitize_search_term(&term).unwrap();
        assert_eq!(out.len(), MAX_SEARCH_TERM_LEN);
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn contains_pattern_wraps_term() {
        assert_eq!(contains_pattern("fox"), "%fox%");
        assert_eq!(contains_pattern("5%"), "%5\\%%");
    }
}
