/*!
 * Tests for configuration loading and saving
 */

use anyhow::Result;
use deepl_bridge::app_config::{Config, LogLevel, MAX_CAPABILITY_TTL_SECS};
use tempfile::TempDir;

#[test]
fn test_save_thenFromFile_shouldPreserveSettings() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");

    let config = Config {
        api_key: "abc:fx".to_string(),
        formality: "prefer_less".to_string(),
        capability_ttl_secs: 600,
        log_level: LogLevel::Debug,
        ..Config::default()
    };
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.api_key, "abc:fx");
    assert_eq!(loaded.formality(), Some("prefer_less"));
    assert_eq!(loaded.capability_ttl().num_seconds(), 600);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert!(loaded.validate().is_ok());
    Ok(())
}

#[test]
fn test_fromFile_withMissingFile_shouldMentionPath() {
    let result = Config::from_file("/nonexistent/deepl-bridge/conf.json");
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("conf.json"), "unexpected error: {}", message);
}

#[test]
fn test_fromFile_withInvalidJson_shouldFail() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withUrlWithoutHost_shouldFail() {
    let config = Config {
        api_url: "mailto:translate@example.com".to_string(),
        api_key: "abc".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroTimeout_shouldFail() {
    let config = Config {
        api_key: "abc".to_string(),
        timeout_secs: 0,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_default_shouldUseDayLongCapabilityTtl() {
    let config = Config::default();
    assert_eq!(config.capability_ttl().num_hours(), 24);
    assert_eq!(config.timeout().as_secs(), 30);
    assert!(config.database_path.is_none());
}

#[test]
fn test_validate_withHugeCapabilityTtl_shouldFail() {
    let config = Config {
        api_key: "abc".to_string(),
        capability_ttl_secs: 10_000_000_000_000,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_capabilityTtl_withOutOfRangeSeconds_shouldClampInsteadOfPanicking() {
    let config = Config {
        capability_ttl_secs: u64::MAX / 2,
        ..Config::default()
    };
    assert_eq!(
        config.capability_ttl().num_seconds() as u64,
        MAX_CAPABILITY_TTL_SECS
    );
}
