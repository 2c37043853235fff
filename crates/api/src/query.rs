//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handlers via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Media browser parameters (`?limit=&offset=&search=`).
#[derive(Debug, Deserialize)]
pub struct MediaListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
}

/// Optional media type filter (`?media_type=image`).
#[derive(Debug, Deserialize)]
pub struct MediaTypeParams {
    pub media_type: Option<String>,
}
