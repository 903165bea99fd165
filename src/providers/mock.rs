/*!
 * Scripted in-process DeepL backend for testing.
 *
 * `MockDeepl` answers every `DeeplApi` call from state configured by the
 * test, counts the calls it receives and records translate payloads:
 * - `with_languages()` / `fail_languages()` script the capability endpoint
 * - `with_translation()` / `fail_translate()` script the translate endpoint
 * - `with_glossaries()` / `fail_listing()` / `fail_delete()` script glossary calls
 * - `with_delay()` slows every call down, for concurrency tests
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils::Direction;
use crate::providers::{
    CapabilityEntry, DeeplApi, GlossaryCreateRequest, GlossaryListing, RemoteGlossary, Translation,
    TranslationResponse,
};
use crate::translation::request::ProviderPayload;

/// Scripted DeepL backend
#[derive(Debug, Default)]
pub struct MockDeepl {
    languages: Mutex<HashMap<Direction, Result<Vec<CapabilityEntry>, ProviderError>>>,
    translations: Mutex<HashMap<String, String>>,
    translate_error: Mutex<Option<ProviderError>>,
    empty_translations: Mutex<bool>,
    glossaries: Mutex<Vec<RemoteGlossary>>,
    listing_error: Mutex<Option<ProviderError>>,
    delete_failures: Mutex<HashSet<String>>,
    deleted: Mutex<Vec<String>>,
    payloads: Mutex<Vec<ProviderPayload>>,
    delay: Mutex<Option<Duration>>,
    language_calls: AtomicUsize,
    translate_calls: AtomicUsize,
    listing_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    create_calls: AtomicUsize,
    next_glossary: AtomicUsize,
}

impl MockDeepl {
    /// Create a backend with no languages, no glossaries and echoing translations
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the capability list for a direction
    pub fn with_languages(self, direction: Direction, entries: Vec<CapabilityEntry>) -> Self {
        self.languages.lock().insert(direction, Ok(entries));
        self
    }

    /// Make the capability endpoint fail for a direction
    pub fn fail_languages(&self, direction: Direction, error: ProviderError) {
        self.languages.lock().insert(direction, Err(error));
    }

    /// Replace the capability list for a direction after construction
    pub fn set_languages(&self, direction: Direction, entries: Vec<CapabilityEntry>) {
        self.languages.lock().insert(direction, Ok(entries));
    }

    /// Answer `text` with `translated`
    pub fn with_translation(self, text: impl Into<String>, translated: impl Into<String>) -> Self {
        self.translations.lock().insert(text.into(), translated.into());
        self
    }

    /// Make every translate call fail
    pub fn fail_translate(&self, error: ProviderError) {
        *self.translate_error.lock() = Some(error);
    }

    /// Make every translate call succeed with no translations
    pub fn return_empty_translations(&self) {
        *self.empty_translations.lock() = true;
    }

    /// Seed the remote glossary listing
    pub fn with_glossaries(self, glossaries: Vec<RemoteGlossary>) -> Self {
        *self.glossaries.lock() = glossaries;
        self
    }

    /// Make the glossary listing fail
    pub fn fail_listing(&self, error: ProviderError) {
        *self.listing_error.lock() = Some(error);
    }

    /// Make deleting `glossary_id` fail
    pub fn fail_delete(&self, glossary_id: impl Into<String>) {
        self.delete_failures.lock().insert(glossary_id.into());
    }

    /// Delay every call
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock() = Some(delay);
        self
    }

    /// Glossaries still present remotely
    pub fn remote_glossaries(&self) -> Vec<RemoteGlossary> {
        self.glossaries.lock().clone()
    }

    /// Ids of successfully deleted glossaries, in call order
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().clone()
    }

    /// Translate payloads received, in call order
    pub fn payloads(&self) -> Vec<ProviderPayload> {
        self.payloads.lock().clone()
    }

    pub fn language_calls(&self) -> usize {
        self.language_calls.load(Ordering::SeqCst)
    }

    pub fn translate_calls(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Build a listing entry for tests
    pub fn remote_glossary(glossary_id: &str, source_lang: &str, target_lang: &str) -> RemoteGlossary {
        RemoteGlossary {
            glossary_id: glossary_id.to_string(),
            name: format!("{} {}-{}", glossary_id, source_lang, target_lang),
            ready: true,
            source_lang: source_lang.to_lowercase(),
            target_lang: target_lang.to_lowercase(),
            creation_time: "2024-01-01T00:00:00.000Z".to_string(),
            entry_count: 1,
        }
    }
}

#[async_trait]
impl DeeplApi for MockDeepl {
    async fn translate(&self, payload: &ProviderPayload) -> Result<TranslationResponse, ProviderError> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().push(payload.clone());
        self.pause().await;

        if let Some(error) = self.translate_error.lock().clone() {
            return Err(error);
        }
        if *self.empty_translations.lock() {
            return Ok(TranslationResponse::default());
        }

        let text = payload.get("text").unwrap_or_default();
        let translated = self
            .translations
            .lock()
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", payload.get("target_lang").unwrap_or_default(), text));

        Ok(TranslationResponse {
            translations: vec![Translation {
                detected_source_language: payload.get("source_lang").map(str::to_string),
                text: translated,
            }],
        })
    }

    async fn fetch_languages(&self, direction: Direction) -> Result<Vec<CapabilityEntry>, ProviderError> {
        self.language_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        self.languages
            .lock()
            .get(&direction)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_glossaries(&self) -> Result<GlossaryListing, ProviderError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        if let Some(error) = self.listing_error.lock().clone() {
            return Err(error);
        }
        Ok(GlossaryListing {
            glossaries: self.glossaries.lock().clone(),
        })
    }

    async fn delete_glossary(&self, glossary_id: &str) -> Result<(), ProviderError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        if self.delete_failures.lock().contains(glossary_id) {
            return Err(ProviderError::ConnectionError(format!(
                "connection reset while deleting {}",
                glossary_id
            )));
        }

        let mut glossaries = self.glossaries.lock();
        let before = glossaries.len();
        glossaries.retain(|g| g.glossary_id != glossary_id);
        if glossaries.len() == before {
            return Err(ProviderError::from_status(404, "Not found"));
        }
        self.deleted.lock().push(glossary_id.to_string());
        Ok(())
    }

    async fn create_glossary(&self, request: &GlossaryCreateRequest) -> Result<RemoteGlossary, ProviderError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        let id = format!("mock-glossary-{}", self.next_glossary.fetch_add(1, Ordering::SeqCst) + 1);
        let glossary = RemoteGlossary {
            glossary_id: id,
            name: request.name.clone(),
            ready: true,
            source_lang: request.source_lang.to_lowercase(),
            target_lang: request.target_lang.to_lowercase(),
            creation_time: chrono::Utc::now().to_rfc3339(),
            entry_count: request.entries.lines().filter(|l| !l.trim().is_empty()).count() as u64,
        };
        self.glossaries.lock().push(glossary.clone());
        Ok(glossary)
    }
}
