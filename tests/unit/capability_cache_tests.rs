/*!
 * Tests for the capability cache over the SQLite store
 */

use anyhow::Result;
use chrono::Duration;
use std::sync::Arc;
use tempfile::TempDir;

use deepl_bridge::app_config::Config;
use deepl_bridge::database::{CacheEntryRecord, DatabaseConnection, Repository};
use deepl_bridge::language_utils::Direction;
use deepl_bridge::providers::{CapabilityEntry, MockDeepl, ProviderClient};
use deepl_bridge::notifications::MemoryNotifier;
use deepl_bridge::translation::cache::{CacheLookup, CapabilityCache, Clock, ManualClock};
use deepl_bridge::Controller;

fn cache_over(repository: Repository, mock: Arc<MockDeepl>, clock: Arc<ManualClock>) -> CapabilityCache {
    let provider = Arc::new(ProviderClient::with_log_notifier(mock));
    CapabilityCache::new(provider, Arc::new(repository)).with_clock(clock)
}

#[tokio::test]
async fn test_getCapabilities_withOnDiskStore_shouldSurviveRestart() -> Result<()> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("bridge.db");
    let clock = Arc::new(ManualClock::default());
    let mock = Arc::new(
        MockDeepl::new().with_languages(Direction::Target, vec![CapabilityEntry::new("DE", true)]),
    );

    let first = cache_over(Repository::new(DatabaseConnection::new(&db_path)?), mock.clone(), clock.clone());
    assert_eq!(first.get_capabilities(Direction::Target).await.len(), 1);
    drop(first);

    let second = cache_over(Repository::new(DatabaseConnection::new(&db_path)?), mock.clone(), clock);
    let entries = second.get_capabilities(Direction::Target).await;

    assert_eq!(entries, vec![CapabilityEntry::new("DE", true)]);
    assert_eq!(mock.language_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_lookup_withExpiredRow_shouldMiss() -> Result<()> {
    let clock = Arc::new(ManualClock::default());
    let mock = Arc::new(MockDeepl::new().with_languages(Direction::Source, Vec::new()));
    let cache = cache_over(Repository::new_in_memory()?, mock, clock.clone())
        .with_ttl(Duration::minutes(5));

    cache.get_capabilities(Direction::Source).await;
    assert_eq!(cache.lookup(Direction::Source).await, CacheLookup::Hit(Vec::new()));

    clock.advance(Duration::minutes(5));
    assert_eq!(cache.lookup(Direction::Source).await, CacheLookup::Miss);
    Ok(())
}

#[tokio::test]
async fn test_getCapabilities_withCorruptRow_shouldRefetch() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    let clock = Arc::new(ManualClock::default());
    let mock = Arc::new(
        MockDeepl::new().with_languages(Direction::Target, vec![CapabilityEntry::new("FR", true)]),
    );
    let identifier = CapabilityCache::cache_identifier(Direction::Target);
    let expires_at = (clock.now() + Duration::hours(1)).timestamp();
    repository
        .set_cache_entry(&CacheEntryRecord::new(identifier, "{broken", expires_at))
        .await?;

    let cache = cache_over(repository, mock.clone(), clock);
    let entries = cache.get_capabilities(Direction::Target).await;

    assert_eq!(entries.len(), 1);
    assert_eq!(mock.language_calls(), 1);
    Ok(())
}

#[test]
fn test_pruneCache_shouldRemoveOnlyExpiredRows() {
    let result = tokio_test::block_on(async {
        let repository = Repository::new_in_memory()?;
        let now = chrono::Utc::now().timestamp();
        repository
            .set_cache_entry(&CacheEntryRecord::new("stale", "[]", now - 60))
            .await?;
        repository
            .set_cache_entry(&CacheEntryRecord::new("fresh", "[]", now + 3_600))
            .await?;

        let config = Config {
            api_key: "abc".to_string(),
            ..Config::default()
        };
        let controller = Controller::with_parts(
            config,
            Arc::new(MockDeepl::new()),
            repository.clone(),
            Arc::new(MemoryNotifier::new()),
        );

        let removed = controller.prune_cache().await?;
        let fresh = repository.get_cache_entry("fresh").await?;
        Ok::<_, anyhow::Error>((removed, fresh))
    });

    let (removed, fresh) = result.expect("Pruning failed");
    assert_eq!(removed, 1);
    assert!(fresh.is_some());
}
