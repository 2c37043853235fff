//! Persona field limits and avatar upload rules.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

/// Maximum persona name length in characters (after trimming).
pub const MAX_NAME_LEN: usize = 100;

/// Maximum persona description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Largest accepted avatar upload (10 MiB).
pub const MAX_AVATAR_BYTES: usize = 10 * 1024 * 1024;

/// Accepted avatar file extensions (lowercase).
pub const AVATAR_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Object storage folder for persona avatars.
pub const AVATAR_FOLDER: &str = "personas";

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate a persona name. Returns the trimmed name on success.
pub fn validate_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Persona name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Persona name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a persona description. Returns the trimmed description.
pub fn validate_description(description: &str) -> Result<String, CoreError> {
    let trimmed = description.trim();
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Persona description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Avatar uploads
// ---------------------------------------------------------------------------

/// Lowercased extension of `filename`, or an empty string when it has none.
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// Check an uploaded avatar. Returns the normalized extension.
pub fn validate_avatar_upload(filename: &str, size: usize) -> Result<String, CoreError> {
    if size == 0 {
        return Err(CoreError::Validation("Avatar file is empty".into()));
    }
    if size > MAX_AVATAR_BYTES {
        return Err(CoreError::Validation(format!(
            "Avatar file exceeds {} MiB",
            MAX_AVATAR_BYTES / (1024 * 1024)
        )));
    }
    let ext = file_extension(filename);
    if !AVATAR_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "Unsupported avatar format '.{ext}'. Supported: {}",
            AVATAR_EXTENSIONS.join(", ")
        )));
    }
    Ok(ext)
}

/// MIME type for a known image extension.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
