use serde::{Deserialize, Serialize};

/// Tokens shorter than this are not considered keywords.
pub const MIN_KEYWORD_CHARS: usize = 2;

/// Self description a user may attach to a matching request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Short free-form introduction
    pub bio: String,
    /// What the user wants to talk about
    pub purpose: String,
    /// Keywords used by the server for similarity matching
    pub keywords: Vec<String>,
}

impl Profile {
    /// Builds a profile from raw form input, extracting keywords from the free-text field.
    pub fn from_input(bio: &str, purpose: &str, keywords: &str) -> Self {
        Profile {
            bio: bio.trim().to_string(),
            purpose: purpose.trim().to_string(),
            keywords: extract_keywords(keywords),
        }
    }
}

/// Splits free text on whitespace and keeps every distinct token that is at least
/// [MIN_KEYWORD_CHARS] characters long, in order of first appearance.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();

    for token in text.split_whitespace().map(str::trim) {
        if token.chars().count() < MIN_KEYWORD_CHARS {
            continue;
        }

        if !keywords.iter().any(|keyword| keyword == token) {
            keywords.push(token.to_string());
        }
    }

    keywords
}
