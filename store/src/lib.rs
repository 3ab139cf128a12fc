//! Abstract storage traits for fundgov.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.
//!
//! Values cross this boundary as opaque bytes; the governance crate owns the
//! encoding. Mutations are grouped into a [`GovernanceBatch`] and committed
//! atomically, so an operation either lands completely or not at all.

pub mod batch;
pub mod error;
pub mod governance;
pub mod meta;

pub use batch::{BatchOp, GovernanceBatch};
pub use error::StoreError;
pub use governance::GovernanceStore;
pub use meta::MetaStore;
