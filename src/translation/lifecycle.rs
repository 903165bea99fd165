/*!
 * Remote glossary lifecycle.
 *
 * `purge_all` tears down every glossary stored with the provider and then
 * clears the local registry. The local registry is only cleared once every
 * remote delete succeeded; otherwise it would forget glossaries that still
 * exist remotely. `provision` creates a glossary for a pair and records it,
 * one in-flight creation per pair.
 */

use log::{info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::GlossaryRecord;
use crate::errors::{LifecycleError, ProviderError};
use crate::language_utils::LanguagePair;
use crate::providers::{GlossaryCreateRequest, ProviderClient, RemoteGlossary};
use crate::translation::concurrency::KeyedLocks;
use crate::translation::registry::GlossaryRegistry;

/// A remote delete that did not go through
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteFailure {
    pub glossary_id: String,
    pub error: ProviderError,
}

/// Outcome of a purge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurgeReport {
    /// Glossaries returned by the listing, in listing order
    pub glossaries: Vec<RemoteGlossary>,
    /// Ids deleted remotely
    pub deleted: Vec<String>,
    /// Deletes that failed
    pub failures: Vec<DeleteFailure>,
    /// Local records removed by the truncation
    pub local_records_removed: usize,
    /// Whether the local registry was cleared
    pub registry_truncated: bool,
}

impl PurgeReport {
    pub fn found(&self) -> usize {
        self.glossaries.len()
    }

    /// Every listed glossary was deleted and the registry cleared
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && (self.registry_truncated || self.glossaries.is_empty())
    }
}

/// Coordinates remote glossaries with the local registry
pub struct GlossaryLifecycleManager {
    provider: Arc<ProviderClient>,
    registry: Arc<GlossaryRegistry>,
    pair_locks: KeyedLocks<LanguagePair>,
    /// Held shared by provisioning and exclusively by a purge
    teardown: RwLock<()>,
}

impl GlossaryLifecycleManager {
    pub fn new(provider: Arc<ProviderClient>, registry: Arc<GlossaryRegistry>) -> Self {
        Self {
            provider,
            registry,
            pair_locks: KeyedLocks::new(),
            teardown: RwLock::new(()),
        }
    }

    /// Glossaries currently stored with the provider
    pub async fn list_remote(&self) -> Result<Vec<RemoteGlossary>, LifecycleError> {
        self.provider
            .list_glossaries()
            .await
            .map_err(LifecycleError::Listing)
    }

    /// Delete every remote glossary, then clear the local registry
    ///
    /// A failed listing returns an error before anything is deleted. An
    /// empty listing is a no-op that leaves the registry alone. If any
    /// delete fails, the registry is kept and the failures are reported.
    pub async fn purge_all(&self) -> Result<PurgeReport, LifecycleError> {
        let _teardown = self.teardown.write().await;

        let glossaries = self.list_remote().await?;
        let mut report = PurgeReport::default();

        if glossaries.is_empty() {
            info!("No remote glossaries found, nothing to purge");
            return Ok(report);
        }

        info!("Purging {} remote glossaries", glossaries.len());
        for glossary in &glossaries {
            info!("{}", glossary);
            match self.provider.delete_glossary(&glossary.glossary_id).await {
                Ok(()) => report.deleted.push(glossary.glossary_id.clone()),
                Err(error) => {
                    warn!("Failed to delete glossary {}: {}", glossary.glossary_id, error);
                    report.failures.push(DeleteFailure {
                        glossary_id: glossary.glossary_id.clone(),
                        error,
                    });
                }
            }
        }
        report.glossaries = glossaries;

        if report.failures.is_empty() {
            report.local_records_removed = self.registry.truncate_all().await?;
            report.registry_truncated = true;
        } else {
            warn!(
                "{} of {} deletes failed, keeping local glossary registry",
                report.failures.len(),
                report.found()
            );
        }

        Ok(report)
    }

    /// Create a glossary for a pair from TSV entries and register it
    ///
    /// If the pair already has a registered glossary it is returned as is.
    /// Concurrent calls for the same pair create at most one glossary.
    pub async fn provision(
        &self,
        pair: &LanguagePair,
        name: &str,
        entries: &str,
    ) -> Result<GlossaryRecord, LifecycleError> {
        validate_entries(pair, entries)?;

        let _teardown = self.teardown.read().await;
        let _pair = self.pair_locks.lock(pair).await;

        if let Some(existing) = self.registered(pair).await? {
            info!("Glossary {} already registered for {}", existing.glossary_id, pair);
            return Ok(existing);
        }

        let request = GlossaryCreateRequest::tsv(name, pair, entries.trim());
        let created = self
            .provider
            .create_glossary(&request)
            .await
            .map_err(|source| LifecycleError::Provisioning {
                pair: pair.to_string(),
                source,
            })?;

        let record = GlossaryRecord::new(pair, created.glossary_id, created.name);
        self.registry.register(&record).await?;
        info!("Provisioned glossary {} for {}", record.glossary_id, pair);

        Ok(record)
    }

    async fn registered(&self, pair: &LanguagePair) -> Result<Option<GlossaryRecord>, LifecycleError> {
        if self.registry.find_glossary_id(pair).await?.is_none() {
            return Ok(None);
        }
        let records = self.registry.list_all().await?;
        Ok(records.into_iter().find(|record| record.pair() == *pair))
    }
}

/// Check TSV glossary entries: one `source<TAB>target` term per line
fn validate_entries(pair: &LanguagePair, entries: &str) -> Result<(), LifecycleError> {
    if pair.source == pair.target {
        return Err(LifecycleError::InvalidEntries(format!(
            "source and target language are both {}",
            pair.source
        )));
    }

    let mut count = 0;
    for (index, line) in entries.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 2 || fields.iter().any(|f| f.trim().is_empty()) {
            return Err(LifecycleError::InvalidEntries(format!(
                "line {} must be 'source<TAB>target'",
                index + 1
            )));
        }
        count += 1;
    }

    if count == 0 {
        return Err(LifecycleError::InvalidEntries("no entries".to_string()));
    }
    Ok(())
}
