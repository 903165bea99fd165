/*!
 * Core translation service implementation.
 *
 * `TranslationService` is what callers use to translate a piece of content.
 * It never fails: anything that prevents a translation (unsupported target,
 * local state errors, provider failures, an empty answer) is reported as a
 * `TranslationOutcome::Skipped` carrying the original content.
 */

use futures::future::join_all;
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::language_utils::Direction;
use crate::providers::ProviderClient;
use crate::translation::cache::CapabilityCache;
use crate::translation::request::TranslationRequestBuilder;

/// Why content was returned untranslated
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Nothing to translate
    EmptyContent,
    /// The target is not in the provider's target language list
    UnsupportedTargetLanguage(String),
    /// Registry or cache access failed while building the request
    LocalState(String),
    /// The provider call failed
    Provider(ProviderError),
    /// The provider answered without any translation
    EmptyResult,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyContent => write!(f, "empty content"),
            SkipReason::UnsupportedTargetLanguage(code) => {
                write!(f, "target language {} is not supported", code)
            }
            SkipReason::LocalState(msg) => write!(f, "local state error: {}", msg),
            SkipReason::Provider(e) => write!(f, "{}", e),
            SkipReason::EmptyResult => write!(f, "provider returned no translation"),
        }
    }
}

/// Result of translating one piece of content
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    Translated {
        text: String,
        detected_source_language: Option<String>,
    },
    Skipped {
        original: String,
        reason: SkipReason,
    },
}

impl TranslationOutcome {
    /// The text to show: the translation, or the original when skipped
    pub fn text(&self) -> &str {
        match self {
            TranslationOutcome::Translated { text, .. } => text,
            TranslationOutcome::Skipped { original, .. } => original,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            TranslationOutcome::Translated { text, .. } => text,
            TranslationOutcome::Skipped { original, .. } => original,
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, TranslationOutcome::Translated { .. })
    }
}

/// Translation entry point
pub struct TranslationService {
    builder: TranslationRequestBuilder,
    capabilities: Arc<CapabilityCache>,
    provider: Arc<ProviderClient>,
}

impl TranslationService {
    pub fn new(
        builder: TranslationRequestBuilder,
        capabilities: Arc<CapabilityCache>,
        provider: Arc<ProviderClient>,
    ) -> Self {
        Self {
            builder,
            capabilities,
            provider,
        }
    }

    /// Translate `content` from `source_language` to `target_language`
    pub async fn translate(
        &self,
        content: &str,
        target_language: &str,
        source_language: &str,
    ) -> TranslationOutcome {
        let skip = |reason: SkipReason| {
            debug!("Skipping translation to {}: {}", target_language, reason);
            TranslationOutcome::Skipped {
                original: content.to_string(),
                reason,
            }
        };

        if content.trim().is_empty() {
            return skip(SkipReason::EmptyContent);
        }

        if !self.capabilities.supports(Direction::Target, target_language).await {
            return skip(SkipReason::UnsupportedTargetLanguage(
                target_language.trim().to_uppercase(),
            ));
        }

        let payload = match self.builder.build(content, target_language, source_language).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to build translation request: {:#}", e);
                return skip(SkipReason::LocalState(format!("{:#}", e)));
            }
        };

        let response = match self.provider.send(&payload).await {
            Ok(response) => response,
            Err(e) => return skip(SkipReason::Provider(e)),
        };

        match response.translations.into_iter().next() {
            Some(translation) => TranslationOutcome::Translated {
                text: translation.text,
                detected_source_language: translation.detected_source_language,
            },
            None => skip(SkipReason::EmptyResult),
        }
    }

    /// Translate several fragments concurrently, keeping their order
    pub async fn translate_many(
        &self,
        contents: &[String],
        target_language: &str,
        source_language: &str,
    ) -> Vec<TranslationOutcome> {
        let futures = contents
            .iter()
            .map(|content| self.translate(content, target_language, source_language));
        join_all(futures).await
    }
}
