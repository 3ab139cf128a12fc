//! LMDB storage backend for fundgov.
//!
//! Implements the storage traits from `fundgov-store` using the `heed` LMDB
//! bindings. Each table maps to one LMDB database inside a single
//! environment, so a governance batch commits in one write transaction.

pub mod environment;
pub mod error;
pub mod governance;
pub mod meta;
pub mod migration;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use governance::LmdbGovernanceStore;
pub use meta::LmdbMetaStore;
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
