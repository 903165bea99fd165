/*!
 * Tests for language code utilities
 */

use deepl_bridge::language_utils::{normalize_code, Direction, LanguagePair};

#[test]
fn test_normalizeCode_shouldTrimAndUppercase() {
    assert_eq!(normalize_code(" en-gb "), "EN-GB");
    assert_eq!(normalize_code("de"), "DE");
}

#[test]
fn test_direction_serde_shouldUseLowercaseNames() {
    assert_eq!(serde_json::to_string(&Direction::Target).unwrap(), "\"target\"");
    let parsed: Direction = serde_json::from_str("\"source\"").unwrap();
    assert_eq!(parsed, Direction::Source);
}

#[test]
fn test_direction_all_shouldListSourceFirst() {
    assert_eq!(Direction::ALL, [Direction::Source, Direction::Target]);
    assert!("sideways".parse::<Direction>().is_err());
}

#[test]
fn test_languagePair_display_shouldShowDirection() {
    assert_eq!(LanguagePair::new("en", "pt-br").to_string(), "EN -> PT-BR");
}
