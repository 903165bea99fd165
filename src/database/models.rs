/*!
 * Database entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};

use crate::language_utils::LanguagePair;

/// Local record of a glossary provisioned on the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryRecord {
    /// Row ID (None for new records)
    pub id: Option<i64>,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Opaque id assigned by the provider
    pub glossary_id: String,
    /// Display name used when the glossary was created
    pub name: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl GlossaryRecord {
    /// Create a new glossary record for a pair
    pub fn new(pair: &LanguagePair, glossary_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            source_language: pair.source.clone(),
            target_language: pair.target.clone(),
            glossary_id: glossary_id.into(),
            name: name.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// The pair this record is keyed on
    pub fn pair(&self) -> LanguagePair {
        LanguagePair::new(&self.source_language, &self.target_language)
    }
}

/// Generic cache row keyed by identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntryRecord {
    /// Cache identifier
    pub identifier: String,
    /// Serialized payload
    pub payload: String,
    /// Expiry as unix seconds
    pub expires_at: i64,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl CacheEntryRecord {
    /// Create a new cache row
    pub fn new(identifier: impl Into<String>, payload: impl Into<String>, expires_at: i64) -> Self {
        Self {
            identifier: identifier.into(),
            payload: payload.into(),
            expires_at,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether the row is still valid at `now` (unix seconds)
    pub fn is_fresh(&self, now: i64) -> bool {
        now < self.expires_at
    }
}
