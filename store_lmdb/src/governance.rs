//! LMDB implementation of GovernanceStore.
//!
//! Proposals and disbursements are keyed by name. Ballots use the composite
//! key `proposal ++ 0x00 ++ voter`, so one proposal's ballots form a
//! contiguous, prefix-scannable range ordered by voter.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use fundgov_store::governance::ballot_prefix;
use fundgov_store::{GovernanceBatch, GovernanceStore, StoreError};
use fundgov_types::Name;

use crate::write_batch::WriteBatch;
use crate::LmdbError;

pub(crate) const PARAMS_KEY: &[u8] = b"params";

#[derive(Clone)]
pub struct LmdbGovernanceStore {
    pub(crate) env: Arc<Env>,
    pub(crate) params_db: Database<Bytes, Bytes>,
    pub(crate) proposals_db: Database<Bytes, Bytes>,
    pub(crate) ballots_db: Database<Bytes, Bytes>,
    pub(crate) disbursements_db: Database<Bytes, Bytes>,
}

impl LmdbGovernanceStore {
    fn get(&self, db: Database<Bytes, Bytes>, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = db.get(&rtxn, key).map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }

    fn values(&self, db: Database<Bytes, Bytes>) -> Result<Vec<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            results.push(val.to_vec());
        }
        Ok(results)
    }
}

impl GovernanceStore for LmdbGovernanceStore {
    fn get_params(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(self.params_db, PARAMS_KEY)
    }

    fn get_proposal(&self, name: &Name) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(self.proposals_db, name.as_bytes())
    }

    fn list_proposals(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        self.values(self.proposals_db)
    }

    fn get_ballot(&self, proposal: &Name, voter: &Name) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(self.ballots_db, &fundgov_store::governance::ballot_key(proposal, voter))
    }

    fn get_ballots(&self, proposal: &Name) -> Result<Vec<Vec<u8>>, StoreError> {
        let prefix = ballot_prefix(proposal);
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in self
            .ballots_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?
        {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            results.push(val.to_vec());
        }
        Ok(results)
    }

    fn get_disbursement(&self, proposal: &Name) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(self.disbursements_db, proposal.as_bytes())
    }

    fn list_disbursements(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        self.values(self.disbursements_db)
    }

    fn commit(&self, batch: GovernanceBatch) -> Result<(), StoreError> {
        let ops = batch.len();
        let mut write = WriteBatch::new(self)?;
        for op in batch.into_ops() {
            write.apply(op)?;
        }
        write.commit()?;
        tracing::trace!(ops, "governance batch committed");
        Ok(())
    }
}
