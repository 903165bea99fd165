use anyhow::{Result, anyhow};
use isolang::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

// Language utilities for DeepL language codes
//
// DeepL codes are upper-case ISO 639-1 codes with an optional region
// variant ("DE", "EN-GB", "PT-BR", "ZH-HANS"). Everything that keys on a
// language code goes through `normalize_code` first so lookups are exact.

/// Normalize a language code to the trimmed upper-case form used as a key
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Split a code into its primary subtag, e.g. "EN-GB" -> "en"
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Validate that a code has an ISO 639-1 primary subtag
pub fn validate_language_code(code: &str) -> Result<()> {
    let primary = primary_subtag(code);
    if primary.len() == 2 && Language::from_639_1(&primary).is_some() {
        return Ok(());
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Get the English language name for a DeepL code
pub fn get_language_name(code: &str) -> Result<String> {
    let primary = primary_subtag(code);
    let lang = Language::from_639_1(&primary)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}

/// Direction of a capability set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Languages accepted as `source_lang`
    Source,
    /// Languages accepted as `target_lang`
    Target,
}

impl Direction {
    /// Both directions, source first
    pub const ALL: [Direction; 2] = [Direction::Source, Direction::Target];

    /// Value of the `type` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "source" => Ok(Self::Source),
            "target" => Ok(Self::Target),
            _ => Err(anyhow!("Invalid language direction: {}", s)),
        }
    }
}

/// Source/target language pair, the key for glossary lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Source language code (normalized)
    pub source: String,
    /// Target language code (normalized)
    pub target: String,
}

impl LanguagePair {
    /// Create a pair, normalizing both codes
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: normalize_code(source),
            target: normalize_code(target),
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
