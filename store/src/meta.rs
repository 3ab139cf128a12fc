//! Metadata storage trait.

use crate::StoreError;

/// Trait for storing database metadata (schema version, bookkeeping).
///
/// This is a generic key-value store for internal bookkeeping that doesn't
/// belong in the governance tables.
pub trait MetaStore {
    /// Store a metadata value.
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a metadata value, `None` if absent.
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Get the current database schema version. Zero for a fresh database.
    fn get_schema_version(&self) -> Result<u32, StoreError>;

    /// Set the database schema version.
    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
