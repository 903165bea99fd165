/*!
 * Local glossary registry.
 *
 * Maps a (source, target) language pair to the id of a glossary that was
 * provisioned on the provider. Lookups are exact: a glossary registered for
 * EN -> DE is never used for DE -> EN.
 */

use anyhow::{Context, Result};
use log::{debug, info};

use crate::database::{GlossaryRecord, Repository};
use crate::language_utils::LanguagePair;

/// Glossary id lookups backed by the `glossary_sync` table
#[derive(Clone)]
pub struct GlossaryRegistry {
    repository: Repository,
}

impl GlossaryRegistry {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Registry over a fresh in-memory database
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Repository::new_in_memory()?))
    }

    /// Glossary id registered for exactly this pair
    ///
    /// A record with an empty id counts as no glossary.
    pub async fn find_glossary_id(&self, pair: &LanguagePair) -> Result<Option<String>> {
        let id = self
            .repository
            .get_glossary_id(&pair.source, &pair.target)
            .await
            .with_context(|| format!("Failed to look up glossary for {}", pair))?;

        Ok(id.filter(|id| !id.trim().is_empty()))
    }

    /// Record a glossary, replacing any previous one for the same pair
    pub async fn register(&self, record: &GlossaryRecord) -> Result<()> {
        self.repository
            .upsert_glossary(record)
            .await
            .with_context(|| format!("Failed to register glossary {}", record.glossary_id))?;
        debug!("Registered glossary {} for {}", record.glossary_id, record.pair());
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<GlossaryRecord>> {
        self.repository.list_glossaries().await
    }

    /// Remove every local record
    pub async fn truncate_all(&self) -> Result<usize> {
        let removed = self
            .repository
            .truncate_glossaries()
            .await
            .context("Failed to truncate glossary registry")?;
        info!("Cleared {} local glossary records", removed);
        Ok(removed)
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.list_all().await?.len())
    }
}
