//! Prompt construction for the generation pipeline and parsing of LLM output.
//!
//! The LLM is asked for a JSON array of short visual concepts. Models do not
//! always comply, so [`parse_concepts`] also accepts numbered or bulleted
//! lists and code-fenced JSON.

use std::sync::LazyLock;

use regex::Regex;

use crate::media::truncate_chars;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum concepts rendered per article.
pub const MAX_CONCEPTS: usize = 6;

/// Concepts requested from the LLM when the caller does not say.
pub const DEFAULT_CONCEPT_COUNT: usize = 3;

/// Article text beyond this many characters is dropped before prompting.
pub const MAX_ARTICLE_PROMPT_CHARS: usize = 12_000;

/// Longest single concept kept, in characters.
pub const MAX_CONCEPT_CHARS: usize = 300;

/// Leading list markers: `1.`, `2)`, `-`, `*`, `•`.
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s*").expect("valid list marker regex"));

/// Persona details that flavour prompts.
#[derive(Debug, Clone, Copy)]
pub struct PersonaVoice<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Clamp a requested concept count into `1..=MAX_CONCEPTS`.
pub fn clamp_concept_count(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_CONCEPT_COUNT)
        .clamp(1, MAX_CONCEPTS)
}

/// Article text as fed to the LLM.
pub fn truncate_article(text: &str) -> &str {
    truncate_chars(text, MAX_ARTICLE_PROMPT_CHARS)
}

/// Prompt asking the LLM for `count` visual concepts describing `article`.
pub fn concept_extraction_prompt(
    article: &str,
    count: usize,
    persona: Option<PersonaVoice<'_>>,
) -> String {
    let mut prompt = format!(
        "Read the article below and propose {count} distinct visual concepts that \
         would make compelling illustrations for it. Each concept is one sentence \
         describing a concrete scene. Respond with a JSON array of {count} strings \
         and nothing else.\n"
    );
    if let Some(p) = persona {
        prompt.push_str(&format!(
            "\nThe images will be published by the persona \"{}\": {}\n\
             Choose concepts that fit this persona.\n",
            p.name, p.description
        ));
    }
    prompt.push_str("\nArticle:\n");
    prompt.push_str(truncate_article(article));
    prompt
}

/// Image-model prompt for a single concept.
pub fn image_prompt(concept: &str, style: &str, persona: Option<PersonaVoice<'_>>) -> String {
    let style = style.replace(['_', '-'], " ");
    match persona {
        Some(p) if !p.description.is_empty() => format!(
            "{concept}. Style: {style}. Featuring {}, {}.",
            p.name, p.description
        ),
        Some(p) => format!("{concept}. Style: {style}. Featuring {}.", p.name),
        None => format!("{concept}. Style: {style}."),
    }
}

/// Prompt asking the LLM to write an article about `topic`.
pub fn compose_article_prompt(topic: &str, persona: Option<PersonaVoice<'_>>) -> String {
    match persona {
        Some(p) => format!(
            "You are {}. {}\n\nWrite a short article (300-500 words) in your own voice \
             about the following topic. Return only the article text.\n\nTopic: {topic}",
            p.name, p.description
        ),
        None => format!(
            "Write a short article (300-500 words) about the following topic. \
             Return only the article text.\n\nTopic: {topic}"
        ),
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Extract concepts from raw LLM output.
///
/// Tries a JSON string array first (optionally inside a ``` fence), then
/// falls back to one concept per non-empty line with list markers removed.
/// Concepts are trimmed, de-duplicated case-insensitively and capped at
/// `limit`.
pub fn parse_concepts(raw: &str, limit: usize) -> Vec<String> {
    let candidates = parse_json_array(raw).unwrap_or_else(|| parse_lines(raw));

    let mut seen = std::collections::HashSet::new();
    let mut concepts = Vec::new();
    for candidate in candidates {
        let trimmed = candidate.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            continue;
        }
        let concept = truncate_chars(trimmed, MAX_CONCEPT_CHARS).to_string();
        if seen.insert(concept.to_lowercase()) {
            concepts.push(concept);
        }
        if concepts.len() == limit {
            break;
        }
    }
    concepts
}

fn parse_json_array(raw: &str) -> Option<Vec<String>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }
    let values: Vec<serde_json::Value> = serde_json::from_str(&raw[start..=end]).ok()?;
    Some(
        values
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Object(map) => map
                    .get("concept")
                    .and_then(|c| c.as_str())
                    .map(str::to_string),
                _ => None,
            })
            .collect(),
    )
}

fn parse_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("```"))
        .map(|l| LIST_MARKER.replace(l, "").into_owned())
        .collect()
}
