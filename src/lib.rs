/*!
 * # deepl-bridge
 *
 * A Rust library that puts the DeepL translation API behind a small,
 * failure-tolerant interface.
 *
 * ## Features
 *
 * - Translate content with the configured formality and per-pair glossaries
 * - Cache the provider's supported-language lists for 24 hours
 * - Skip translations to unsupported targets and return the original content
 * - Tear down and provision remote glossaries, keeping a local registry in sync
 * - Retry transient transport failures with exponential backoff
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Wiring of all components from a `Config`
 * - `database`: SQLite persistence for glossary records and cache entries
 * - `translation`: Request shaping, caching and glossary lifecycle:
 *   - `translation::core`: `TranslationService`
 *   - `translation::request`: `TranslationRequestBuilder`
 *   - `translation::cache`: `CapabilityCache`
 *   - `translation::registry`: `GlossaryRegistry`
 *   - `translation::lifecycle`: `GlossaryLifecycleManager`
 * - `providers`: DeepL API access:
 *   - `providers::deepl`: reqwest client
 *   - `providers::client`: `ProviderClient` failure contract
 *   - `providers::mock`: scripted backend for tests
 * - `notifications`: User-facing notifications
 * - `language_utils`: Language code utilities
 * - `errors`: Custom error types for the application
 */

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod language_utils;
pub mod notifications;
pub mod providers;
pub mod translation;

pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, LifecycleError, ProviderError};
pub use language_utils::{get_language_name, Direction, LanguagePair};
pub use translation::{SkipReason, TranslationOutcome, TranslationService};
