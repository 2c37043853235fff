//! Media types, generation styles and stored-prompt rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Longest prompt persisted alongside a media row.
pub const MAX_STORED_PROMPT_CHARS: usize = 500;

/// Maximum style label length.
pub const MAX_STYLE_LEN: usize = 64;

/// Style used when a request leaves it out.
pub const DEFAULT_STYLE: &str = "photorealistic";

/// Object storage folder for mirrored generations.
pub const GENERATED_FOLDER: &str = "generated";

/// Kind of generated artifact, matching the `media.media_type` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Database value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Parse the database value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(CoreError::Validation(format!(
                "Unknown media type '{other}'. Must be one of: image, video"
            ))),
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate and normalize a style label.
///
/// Styles are lowercased; only ASCII letters, digits, `_` and `-` are allowed.
pub fn validate_style(style: &str) -> Result<String, CoreError> {
    let normalized = style.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(CoreError::Validation("Style must not be empty".into()));
    }
    if normalized.len() > MAX_STYLE_LEN {
        return Err(CoreError::Validation(format!(
            "Style must be at most {MAX_STYLE_LEN} characters"
        )));
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(CoreError::Validation(format!(
            "Invalid style '{normalized}'. Use letters, digits, '_' or '-'"
        )));
    }
    Ok(normalized)
}

/// Truncate `text` to at most `max_chars` characters, never splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Prompt as stored on a media row.
pub fn truncate_prompt(prompt: &str) -> &str {
    truncate_chars(prompt, MAX_STORED_PROMPT_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_round_trips_through_name() {
        for ty in [MediaType::Image, MediaType::Video] {
            assert_eq!(MediaType::from_name(ty.as_str()).unwrap(), ty);
        }
        assert!(MediaType::from_name("audio").is_err());
    }

    #[test]
    fn media_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaType::Video).unwrap(), "\"video\"");
    }

    #[test]
    fn style_is_normalized() {
        assert_eq!(validate_style("  Water-Color ").unwrap(), "water-color");
        assert_eq!(validate_style("comic_book").unwrap(), "comic_book");
    }

    #[test]
    fn style_rejects_bad_input() {
        assert!(validate_style("").is_err());
        assert!(validate_style("oil paint").is_err());
        assert!(validate_style(&"a".repeat(MAX_STYLE_LEN + 1)).is_err());
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_prompt("short"), "short");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "ü".repeat(MAX_STORED_PROMPT_CHARS + 10);
        let cut = truncate_prompt(&text);
        assert_eq!(cut.chars().count(), MAX_STORED_PROMPT_CHARS);
    }
}
