/*!
 * Failure contract around a `DeeplApi` backend.
 *
 * Every call returns a `Result` and never panics. Requests the provider
 * rejects (4xx class) are additionally reported to the user through the
 * configured `Notifier`, carrying the provider's message.
 */

use log::{info, warn};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::language_utils::Direction;
use crate::notifications::{LogNotifier, Notification, Notifier};
use crate::providers::{
    CapabilityEntry, DeeplApi, GlossaryCreateRequest, RemoteGlossary, TranslationResponse,
};
use crate::translation::request::ProviderPayload;

/// Provider access shared by the cache, the request path and the lifecycle manager
#[derive(Clone)]
pub struct ProviderClient {
    api: Arc<dyn DeeplApi>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl ProviderClient {
    /// Wrap a backend, reporting rejections through `notifier`
    pub fn new(api: Arc<dyn DeeplApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Wrap a backend, reporting rejections to the log
    pub fn with_log_notifier(api: Arc<dyn DeeplApi>) -> Self {
        Self::new(api, Arc::new(LogNotifier))
    }

    /// Send a translate payload
    ///
    /// An `Ok` with no translations is a valid, empty answer; a body that
    /// could not be decoded is `Err(ProviderError::Decode)`.
    pub async fn send(&self, payload: &ProviderPayload) -> Result<TranslationResponse, ProviderError> {
        match self.api.translate(payload).await {
            Ok(response) => Ok(response),
            Err(e) => {
                if e.is_client_error() {
                    self.notifier
                        .notify(Notification::info(e.to_string()).with_title("DeepL rejected the request"));
                }
                warn!("Translation request failed: {}", e);
                Err(e)
            }
        }
    }

    /// Fetch the capability list for one direction
    pub async fn fetch_languages(&self, direction: Direction) -> Result<Vec<CapabilityEntry>, ProviderError> {
        let result = self.api.fetch_languages(direction).await;
        match &result {
            Ok(entries) => info!("Fetched {} {} languages from DeepL", entries.len(), direction),
            Err(e) => warn!("Failed to fetch {} languages: {}", direction, e),
        }
        result
    }

    /// List all remote glossaries
    pub async fn list_glossaries(&self) -> Result<Vec<RemoteGlossary>, ProviderError> {
        let listing = self.api.list_glossaries().await?;
        Ok(listing.glossaries)
    }

    /// Delete one remote glossary
    pub async fn delete_glossary(&self, glossary_id: &str) -> Result<(), ProviderError> {
        self.api.delete_glossary(glossary_id).await
    }

    /// Create a remote glossary
    pub async fn create_glossary(&self, request: &GlossaryCreateRequest) -> Result<RemoteGlossary, ProviderError> {
        self.api.create_glossary(request).await
    }
}
