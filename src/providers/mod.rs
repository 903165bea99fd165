/*!
 * Provider implementations for the DeepL API.
 *
 * This module contains:
 * - `DeeplApi`: the trait every backend implements
 * - `deepl`: the HTTP client talking to the real API
 * - `mock`: a scripted in-process backend for tests
 * - `client`: `ProviderClient`, which applies the failure contract
 *   (notifications, logging) on top of any backend
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::language_utils::{Direction, LanguagePair};
use crate::translation::request::ProviderPayload;

/// One language advertised by `/v2/languages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityEntry {
    /// Language code, e.g. "DE" or "EN-GB"
    pub language: String,
    /// English display name
    #[serde(default)]
    pub name: String,
    /// Whether the `formality` parameter is honored (target languages only)
    #[serde(default)]
    pub supports_formality: bool,
}

impl CapabilityEntry {
    pub fn new(language: impl Into<String>, supports_formality: bool) -> Self {
        Self {
            language: language.into(),
            name: String::new(),
            supports_formality,
        }
    }
}

/// One translated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Source language detected by the provider
    #[serde(default)]
    pub detected_source_language: Option<String>,
    /// Translated text
    pub text: String,
}

/// Decoded translate response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    /// Translations, one per `text` field sent
    #[serde(default)]
    pub translations: Vec<Translation>,
}

impl TranslationResponse {
    /// Text of the first translation, if any
    pub fn first_text(&self) -> Option<&str> {
        self.translations.first().map(|t| t.text.as_str())
    }

    /// Whether the provider returned no translations
    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }
}

/// Glossary as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteGlossary {
    /// Opaque glossary id
    pub glossary_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub source_lang: String,
    #[serde(default)]
    pub target_lang: String,
    #[serde(default)]
    pub creation_time: String,
    #[serde(default)]
    pub entry_count: u64,
}

impl std::fmt::Display for RemoteGlossary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' ({} -> {}, {} entries, created {})",
            self.glossary_id,
            self.name,
            self.source_lang.to_uppercase(),
            self.target_lang.to_uppercase(),
            self.entry_count,
            self.creation_time
        )
    }
}

/// Body of `GET /v2/glossaries`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryListing {
    #[serde(default)]
    pub glossaries: Vec<RemoteGlossary>,
}

/// Body of `POST /v2/glossaries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryCreateRequest {
    pub name: String,
    pub source_lang: String,
    pub target_lang: String,
    /// Tab-separated source/target terms, one pair per line
    pub entries: String,
    pub entries_format: String,
}

impl GlossaryCreateRequest {
    /// Create a TSV glossary request for a pair
    pub fn tsv(name: impl Into<String>, pair: &LanguagePair, entries: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_lang: pair.source.clone(),
            target_lang: pair.target.clone(),
            entries: entries.into(),
            entries_format: "tsv".to_string(),
        }
    }
}

/// Operations the translation layer needs from the provider
#[async_trait]
pub trait DeeplApi: Send + Sync + Debug {
    /// Translate a form payload
    async fn translate(&self, payload: &ProviderPayload) -> Result<TranslationResponse, ProviderError>;

    /// Languages supported in one direction
    async fn fetch_languages(&self, direction: Direction) -> Result<Vec<CapabilityEntry>, ProviderError>;

    /// All glossaries stored with the provider
    async fn list_glossaries(&self) -> Result<GlossaryListing, ProviderError>;

    /// Delete one glossary
    async fn delete_glossary(&self, glossary_id: &str) -> Result<(), ProviderError>;

    /// Create a glossary
    async fn create_glossary(&self, request: &GlossaryCreateRequest) -> Result<RemoteGlossary, ProviderError>;
}

pub mod client;
pub mod deepl;
pub mod mock;

pub use client::ProviderClient;
pub use deepl::DeeplClient;
pub use mock::MockDeepl;
