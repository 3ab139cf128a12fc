//! Database schema versioning.
//!
//! Tracks a monotonically increasing schema version in the meta store and
//! runs sequential migration steps to bring an older database up to date.

use fundgov_store::MetaStore;

use crate::LmdbError;

/// The schema version that the current code expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

pub struct Migrator;

impl Migrator {
    /// Check the stored schema version and run any needed migrations.
    ///
    /// Version 0 means a fresh database. A version above
    /// [`CURRENT_SCHEMA_VERSION`] was written by newer code and is refused.
    pub fn run(meta_store: &impl MetaStore) -> Result<(), LmdbError> {
        let current = stored_version(meta_store)?;

        if current == CURRENT_SCHEMA_VERSION {
            tracing::debug!(version = current, "database schema is up to date");
            return Ok(());
        }
        if current > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::SchemaTooNew {
                found: current,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        for version in current..CURRENT_SCHEMA_VERSION {
            tracing::info!(from = version, to = version + 1, "running migration");
            run_migration(version, version + 1)?;
        }

        meta_store
            .set_schema_version(CURRENT_SCHEMA_VERSION)
            .map_err(|e| LmdbError::Heed(e.to_string()))?;

        tracing::info!(version = CURRENT_SCHEMA_VERSION, "migration complete");
        Ok(())
    }

    /// Verify the schema without migrating, for read-only access.
    pub fn check(meta_store: &impl MetaStore) -> Result<(), LmdbError> {
        let found = stored_version(meta_store)?;
        match found {
            v if v == CURRENT_SCHEMA_VERSION => Ok(()),
            v if v > CURRENT_SCHEMA_VERSION => Err(LmdbError::SchemaTooNew {
                found,
                supported: CURRENT_SCHEMA_VERSION,
            }),
            _ => Err(LmdbError::SchemaOutdated {
                found,
                supported: CURRENT_SCHEMA_VERSION,
            }),
        }
    }
}

fn stored_version(meta_store: &impl MetaStore) -> Result<u32, LmdbError> {
    meta_store
        .get_schema_version()
        .map_err(|e| LmdbError::Serialization(e.to_string()))
}

fn run_migration(from: u32, to: u32) -> Result<(), LmdbError> {
    match (from, to) {
        // Initial schema: params, proposals, ballots, disbursements, meta.
        (0, 1) => Ok(()),
        _ => Err(LmdbError::Heed(format!("unknown migration: {from} -> {to}"))),
    }
}
