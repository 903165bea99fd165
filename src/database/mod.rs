/*!
 * Database module for the local sync state.
 *
 * This module provides SQLite-based persistence for:
 * - The glossary-id-by-language-pair table
 * - The identifier-keyed cache store used for language capabilities
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{CacheEntryRecord, GlossaryRecord};
pub use repository::Repository;
