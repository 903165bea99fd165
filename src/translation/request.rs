/*!
 * Translation request shaping.
 *
 * `TranslationRequestBuilder` turns content and a language pair into the
 * form fields the translate endpoint expects. Whether a glossary or a
 * formality field is attached depends on the local registry and on the
 * cached capability metadata, never on a failed lookup.
 */

use anyhow::Result;
use log::debug;
use std::fmt;
use std::sync::Arc;

use crate::language_utils::{normalize_code, LanguagePair};
use crate::translation::cache::CapabilityCache;
use crate::translation::registry::GlossaryRegistry;

/// Tag handling mode sent with every request
pub const TAG_HANDLING: &str = "xml";

/// Ordered form fields of a translate request
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderPayload {
    fields: Vec<(&'static str, String)>,
}

impl ProviderPayload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, keeping insertion order
    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.fields.push((key, value.into()));
    }

    /// Value of the first field named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a field named `key` is present
    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| *k == key)
    }

    /// Field names in order
    pub fn keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(k, _)| *k).collect()
    }

    /// Canonical `application/x-www-form-urlencoded` body
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.fields {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Byte length of the encoded body, for the `Content-Length` header
    pub fn content_length(&self) -> usize {
        self.encode().len()
    }

    /// Encoded body together with its byte length
    pub fn to_body(&self) -> (String, usize) {
        let body = self.encode();
        let length = body.len();
        (body, length)
    }
}

// The auth key must never end up in logs
impl fmt::Debug for ProviderPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.fields {
            if *key == "auth_key" {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

/// Builds translate payloads from registry and capability state
pub struct TranslationRequestBuilder {
    /// DeepL authentication key
    api_key: String,
    /// Operator formality preference
    formality: Option<String>,
    /// Glossary lookups
    registry: Arc<GlossaryRegistry>,
    /// Formality capability lookups
    capabilities: Arc<CapabilityCache>,
}

impl TranslationRequestBuilder {
    /// Create a builder; an empty formality string disables the field
    pub fn new(
        api_key: impl Into<String>,
        formality: Option<String>,
        registry: Arc<GlossaryRegistry>,
        capabilities: Arc<CapabilityCache>,
    ) -> Self {
        let formality = formality
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        Self {
            api_key: api_key.into(),
            formality,
            registry,
            capabilities,
        }
    }

    /// Build the payload for one piece of content
    pub async fn build(
        &self,
        content: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<ProviderPayload> {
        let pair = LanguagePair::new(source_language, target_language);

        let mut payload = ProviderPayload::new();
        payload.push("auth_key", self.api_key.clone());
        payload.push("text", content);
        payload.push("source_lang", source_language.trim());
        payload.push("target_lang", target_language.trim());
        payload.push("tag_handling", TAG_HANDLING);

        if let Some(glossary_id) = self.registry.find_glossary_id(&pair).await? {
            debug!("Using glossary {} for {}", glossary_id, pair);
            payload.push("glossary_id", glossary_id);
        }

        if let Some(formality) = &self.formality {
            let formality_languages = self.capabilities.formality_supported().await;
            if formality_languages.contains(&normalize_code(target_language)) {
                payload.push("formality", formality.clone());
            } else {
                debug!(
                    "Target {} does not support formality, skipping '{}'",
                    pair.target, formality
                );
            }
        }

        Ok(payload)
    }
}
