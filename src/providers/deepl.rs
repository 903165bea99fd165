use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::app_config::Config;
use crate::errors::ProviderError;
use crate::language_utils::Direction;
use crate::providers::{
    CapabilityEntry, DeeplApi, GlossaryCreateRequest, GlossaryListing, RemoteGlossary,
    TranslationResponse,
};
use crate::translation::request::ProviderPayload;

/// DeepL client for interacting with the DeepL REST API
pub struct DeeplClient {
    /// HTTP client for API requests
    client: Client,
    /// Translate endpoint as configured
    api_url: Url,
    /// API key for authentication
    api_key: String,
    /// Request timeout in seconds
    timeout_secs: u64,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

impl std::fmt::Debug for DeeplClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeeplClient")
            .field("api_url", &self.api_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl DeeplClient {
    /// Create a new client for a translate endpoint
    pub fn new(
        api_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid API URL '{}': {}", api_url, e)))?;

        if api_url.host_str().is_none() {
            return Err(ProviderError::RequestFailed(format!(
                "API URL has no host: {}",
                api_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url,
            api_key: api_key.into(),
            timeout_secs: timeout.as_secs(),
            max_retries: 0,
            backoff_base_ms: 500,
        })
    }

    /// Create a client from application configuration
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Ok(Self::new(&config.api_url, config.api_key.clone(), config.timeout())?
            .with_retries(config.retry_count, config.retry_backoff_ms))
    }

    /// Retry transport failures and 5xx responses
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Scheme, host and port of the configured endpoint
    pub fn api_origin(&self) -> String {
        self.api_url.origin().ascii_serialization()
    }

    /// `{origin}/v2/languages?type={direction}`
    pub fn languages_url(&self, direction: Direction) -> String {
        format!("{}/v2/languages?type={}", self.api_origin(), direction)
    }

    /// `{origin}/v2/glossaries`
    pub fn glossaries_url(&self) -> String {
        format!("{}/v2/glossaries", self.api_origin())
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    fn map_transport_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else {
            ProviderError::from(error)
        }
    }

    /// Send a request, retrying transient failures with exponential backoff
    ///
    /// `build` is called once per attempt because a `RequestBuilder` is
    /// consumed by `send`. Non-success statuses come back as errors with the
    /// response body as message.
    async fn execute<F>(&self, build: F) -> Result<Response, ProviderError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            let error = match build().send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());
                    ProviderError::from_status(status.as_u16(), error_text)
                }
                Err(e) => self.map_transport_error(e),
            };

            if !error.is_retryable() || attempt >= self.max_retries {
                error!("DeepL API request failed: {}", error);
                return Err(error);
            }

            let backoff = self.backoff_base_ms.saturating_mul(1 << attempt.min(16));
            warn!(
                "DeepL API request failed ({}), retrying in {} ms (attempt {}/{})",
                error,
                backoff,
                attempt + 1,
                self.max_retries
            );
            tokio::time::sleep(Duration::from_millis(backoff)).await;
            attempt += 1;
        }
    }

    /// Read the body and decode it, keeping decode failures distinct
    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, ProviderError> {
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        serde_json::from_str::<T>(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            error!("Failed to decode DeepL response: {}. Body: {}", e, preview);
            ProviderError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl DeeplApi for DeeplClient {
    async fn translate(&self, payload: &ProviderPayload) -> Result<TranslationResponse, ProviderError> {
        let (body, content_length) = payload.to_body();
        debug!("POST {} ({} bytes)", self.api_url, content_length);

        let response = self
            .execute(|| {
                self.client
                    .post(self.api_url.clone())
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .header(header::CONTENT_LENGTH, content_length)
                    .body(body.clone())
            })
            .await?;

        self.decode(response).await
    }

    async fn fetch_languages(&self, direction: Direction) -> Result<Vec<CapabilityEntry>, ProviderError> {
        let url = self.languages_url(direction);
        debug!("GET {}", url);

        let response = self
            .execute(|| {
                self.client
                    .get(&url)
                    .header(header::AUTHORIZATION, self.auth_header())
            })
            .await?;

        self.decode(response).await
    }

    async fn list_glossaries(&self) -> Result<GlossaryListing, ProviderError> {
        let url = self.glossaries_url();
        debug!("GET {}", url);

        let response = self
            .execute(|| {
                self.client
                    .get(&url)
                    .header(header::AUTHORIZATION, self.auth_header())
            })
            .await?;

        self.decode(response).await
    }

    async fn delete_glossary(&self, glossary_id: &str) -> Result<(), ProviderError> {
        let mut url = Url::parse(&self.glossaries_url())
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::RequestFailed("API URL cannot be a base".to_string()))?
            .push(glossary_id);
        debug!("DELETE {}", url);

        self.execute(|| {
            self.client
                .delete(url.clone())
                .header(header::AUTHORIZATION, self.auth_header())
        })
        .await?;

        Ok(())
    }

    async fn create_glossary(&self, request: &GlossaryCreateRequest) -> Result<RemoteGlossary, ProviderError> {
        let url = self.glossaries_url();
        debug!("POST {} ({} -> {})", url, request.source_lang, request.target_lang);

        let response = self
            .execute(|| {
                self.client
                    .post(&url)
                    .header(header::AUTHORIZATION, self.auth_header())
                    .json(request)
            })
            .await?;

        self.decode(response).await
    }
}
