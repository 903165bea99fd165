/*!
 * DeepL translation integration.
 *
 * This module contains everything between "translate this content" and the
 * DeepL API. It is split into several submodules:
 *
 * - `core`: `TranslationService`, the entry point that never fails
 * - `request`: payload shaping (`TranslationRequestBuilder`)
 * - `cache`: capability metadata cache with expiry
 * - `registry`: local (source, target) -> glossary id mapping
 * - `lifecycle`: remote glossary purge and provisioning
 * - `concurrency`: per-key locks shared by the above
 */

pub use self::cache::{CacheLookup, CacheStore, CapabilityCache, MemoryCacheStore};
pub use self::core::{SkipReason, TranslationOutcome, TranslationService};
pub use self::lifecycle::{GlossaryLifecycleManager, PurgeReport};
pub use self::registry::GlossaryRegistry;
pub use self::request::{ProviderPayload, TranslationRequestBuilder};

pub mod cache;
pub mod concurrency;
pub mod core;
pub mod lifecycle;
pub mod registry;
pub mod request;
