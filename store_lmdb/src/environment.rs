//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvFlags, EnvOpenOptions};

use crate::governance::LmdbGovernanceStore;
use crate::meta::LmdbMetaStore;
use crate::migration::Migrator;
use crate::LmdbError;

const MAX_DBS: u32 = 8;

pub(crate) const PARAMS_DB: &str = "params";
pub(crate) const PROPOSALS_DB: &str = "proposals";
pub(crate) const BALLOTS_DB: &str = "ballots";
pub(crate) const DISBURSEMENTS_DB: &str = "disbursements";
pub(crate) const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    params_db: Database<Bytes, Bytes>,
    proposals_db: Database<Bytes, Bytes>,
    /// Keyed by `proposal ++ 0x00 ++ voter`.
    ballots_db: Database<Bytes, Bytes>,
    disbursements_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an environment at `path` and bring its schema up to
    /// date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process for this path,
        // which is the requirement heed places on `open`.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let params_db = env.create_database(&mut wtxn, Some(PARAMS_DB))?;
        let proposals_db = env.create_database(&mut wtxn, Some(PROPOSALS_DB))?;
        let ballots_db = env.create_database(&mut wtxn, Some(BALLOTS_DB))?;
        let disbursements_db = env.create_database(&mut wtxn, Some(DISBURSEMENTS_DB))?;
        let meta_db = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        let environment = Self {
            env: Arc::new(env),
            params_db,
            proposals_db,
            ballots_db,
            disbursements_db,
            meta_db,
        };
        Migrator::run(&environment.meta_store())?;

        tracing::info!(path = %path.display(), map_size, "LMDB environment opened");
        Ok(environment)
    }

    /// Open an existing environment without write access.
    ///
    /// Every table must already exist and the schema must be current.
    pub fn open_read_only(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        // SAFETY: as in `open`. The read-only flag only restricts access.
        let env = unsafe {
            let mut options = EnvOpenOptions::new();
            options
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .flags(EnvFlags::READ_ONLY);
            options.open(path)?
        };

        let rtxn = env.read_txn()?;
        let open = |name: &'static str| -> Result<Database<Bytes, Bytes>, LmdbError> {
            env.open_database(&rtxn, Some(name))?
                .ok_or(LmdbError::MissingDatabase(name))
        };
        let params_db = open(PARAMS_DB)?;
        let proposals_db = open(PROPOSALS_DB)?;
        let ballots_db = open(BALLOTS_DB)?;
        let disbursements_db = open(DISBURSEMENTS_DB)?;
        let meta_db = open(META_DB)?;
        // Handles opened in a read transaction are only valid after it commits.
        rtxn.commit()?;

        let environment = Self {
            env: Arc::new(env),
            params_db,
            proposals_db,
            ballots_db,
            disbursements_db,
            meta_db,
        };
        Migrator::check(&environment.meta_store())?;

        tracing::debug!(path = %path.display(), "LMDB environment opened read-only");
        Ok(environment)
    }

    /// Close the environment and wait until LMDB has released it.
    ///
    /// heed keeps every opened path in a process-wide registry, so dropping
    /// the environment is not enough to reopen the same path with other
    /// flags (read-only after read-write, for instance). All stores handed
    /// out by [`Self::governance_store`] and [`Self::meta_store`] must be
    /// dropped first.
    pub fn close(self) -> Result<(), LmdbError> {
        let env = Arc::try_unwrap(self.env)
            .map_err(|shared| LmdbError::EnvironmentInUse(Arc::strong_count(&shared) - 1))?;
        let path = env.path().to_path_buf();
        env.prepare_for_closing().wait();
        tracing::debug!(path = %path.display(), "LMDB environment closed");
        Ok(())
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn governance_store(&self) -> LmdbGovernanceStore {
        LmdbGovernanceStore {
            env: Arc::clone(&self.env),
            params_db: self.params_db,
            proposals_db: self.proposals_db,
            ballots_db: self.ballots_db,
            disbursements_db: self.disbursements_db,
        }
    }

    pub fn meta_store(&self) -> LmdbMetaStore {
        LmdbMetaStore {
            env: Arc::clone(&self.env),
            meta_db: self.meta_db,
        }
    }
}
