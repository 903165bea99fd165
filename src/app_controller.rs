use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::sync::Arc;

use crate::app_config::Config;
use crate::database::{DatabaseConnection, GlossaryRecord, Repository};
use crate::errors::LifecycleError;
use crate::language_utils::{Direction, LanguagePair};
use crate::notifications::{LogNotifier, Notifier};
use crate::providers::{CapabilityEntry, DeeplApi, DeeplClient, ProviderClient, RemoteGlossary};
use crate::translation::{
    CapabilityCache, GlossaryLifecycleManager, GlossaryRegistry, PurgeReport,
    TranslationOutcome, TranslationRequestBuilder, TranslationService,
};

/// Wires configuration, storage and the provider into the translation components
pub struct Controller {
    config: Config,
    repository: Repository,
    registry: Arc<GlossaryRegistry>,
    capabilities: Arc<CapabilityCache>,
    service: TranslationService,
    lifecycle: GlossaryLifecycleManager,
}

impl Controller {
    /// Build a controller talking to the configured DeepL endpoint
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let api = DeeplClient::from_config(&config).context("Failed to create DeepL client")?;
        let db = match &config.database_path {
            Some(path) => DatabaseConnection::new(path)?,
            None => DatabaseConnection::new_default()?,
        };
        debug!("Using database at {}", db.path().display());
        match db.stats() {
            Ok(stats) => debug!("{}", stats),
            Err(e) => warn!("Failed to read database statistics: {:#}", e),
        }

        Ok(Self::with_parts(
            config,
            Arc::new(api),
            Repository::new(db),
            Arc::new(LogNotifier),
        ))
    }

    /// Build a controller from explicit collaborators
    pub fn with_parts(
        config: Config,
        api: Arc<dyn DeeplApi>,
        repository: Repository,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let provider = Arc::new(ProviderClient::new(api, notifier));
        let registry = Arc::new(GlossaryRegistry::new(repository.clone()));
        let capabilities = Arc::new(
            CapabilityCache::new(provider.clone(), Arc::new(repository.clone()))
                .with_ttl(config.capability_ttl()),
        );
        let builder = TranslationRequestBuilder::new(
            config.api_key.clone(),
            config.formality().map(str::to_string),
            registry.clone(),
            capabilities.clone(),
        );
        let service = TranslationService::new(builder, capabilities.clone(), provider.clone());
        let lifecycle = GlossaryLifecycleManager::new(provider, registry.clone());

        Self {
            config,
            repository,
            registry,
            capabilities,
            service,
            lifecycle,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn translate(&self, content: &str, target_language: &str, source_language: &str) -> TranslationOutcome {
        info!("Translating {} characters {} -> {}", content.chars().count(), source_language, target_language);
        self.service.translate(content, target_language, source_language).await
    }

    pub async fn translate_many(
        &self,
        contents: &[String],
        target_language: &str,
        source_language: &str,
    ) -> Vec<TranslationOutcome> {
        self.service
            .translate_many(contents, target_language, source_language)
            .await
    }

    /// Supported languages for a direction, served from the capability cache
    pub async fn languages(&self, direction: Direction) -> Vec<CapabilityEntry> {
        self.capabilities.get_capabilities(direction).await
    }

    /// Drop the cached language list so the next call refetches
    pub async fn refresh_languages(&self, direction: Direction) -> Result<()> {
        self.capabilities.invalidate(direction).await?;
        Ok(())
    }

    /// Remove expired cache rows, returns how many were removed
    pub async fn prune_cache(&self) -> Result<usize> {
        let removed = self
            .repository
            .purge_expired_cache(chrono::Utc::now().timestamp())
            .await?;
        if removed > 0 {
            debug!("Removed {} expired cache entries", removed);
        }
        Ok(removed)
    }

    pub async fn remote_glossaries(&self) -> Result<Vec<RemoteGlossary>, LifecycleError> {
        self.lifecycle.list_remote().await
    }

    pub async fn local_glossaries(&self) -> Result<Vec<GlossaryRecord>> {
        self.registry.list_all().await
    }

    pub async fn purge_glossaries(&self) -> Result<PurgeReport, LifecycleError> {
        self.lifecycle.purge_all().await
    }

    pub async fn create_glossary(
        &self,
        pair: &LanguagePair,
        name: &str,
        entries: &str,
    ) -> Result<GlossaryRecord, LifecycleError> {
        self.lifecycle.provision(pair, name, entries).await
    }
}
