//! Applies a [`GovernanceBatch`] inside a single LMDB write transaction.
//!
//! If the batch is dropped without calling [`WriteBatch::commit`], or any
//! operation fails, the underlying transaction is aborted and nothing is
//! written.

use heed::RwTxn;

use fundgov_store::governance::{ballot_key, ballot_prefix};
use fundgov_store::BatchOp;
use fundgov_types::Name;

use crate::governance::{LmdbGovernanceStore, PARAMS_KEY};
use crate::LmdbError;

pub struct WriteBatch<'a> {
    txn: RwTxn<'a>,
    store: &'a LmdbGovernanceStore,
}

impl<'a> WriteBatch<'a> {
    pub(crate) fn new(store: &'a LmdbGovernanceStore) -> Result<Self, LmdbError> {
        let txn = store.env.write_txn()?;
        Ok(Self { txn, store })
    }

    pub fn apply(&mut self, op: BatchOp) -> Result<(), LmdbError> {
        match op {
            BatchOp::PutParams(data) => {
                self.store.params_db.put(&mut self.txn, PARAMS_KEY, &data)?;
            }
            BatchOp::PutProposal { name, data } => {
                self.store
                    .proposals_db
                    .put(&mut self.txn, name.as_bytes(), &data)?;
            }
            BatchOp::DeleteProposal { name } => {
                self.store.proposals_db.delete(&mut self.txn, name.as_bytes())?;
            }
            BatchOp::PutBallot {
                proposal,
                voter,
                data,
            } => {
                let key = ballot_key(&proposal, &voter);
                self.store.ballots_db.put(&mut self.txn, &key, &data)?;
            }
            BatchOp::DeleteBallots { proposal } => self.delete_ballots(&proposal)?,
            BatchOp::PutDisbursement { proposal, data } => {
                self.store
                    .disbursements_db
                    .put(&mut self.txn, proposal.as_bytes(), &data)?;
            }
        }
        Ok(())
    }

    fn delete_ballots(&mut self, proposal: &Name) -> Result<(), LmdbError> {
        let prefix = ballot_prefix(proposal);
        let keys = self
            .store
            .ballots_db
            .prefix_iter(&self.txn, &prefix)?
            .map(|entry| entry.map(|(key, _)| key.to_vec()))
            .collect::<Result<Vec<_>, _>>()?;
        for key in keys {
            self.store.ballots_db.delete(&mut self.txn, &key)?;
        }
        Ok(())
    }

    pub fn commit(self) -> Result<(), LmdbError> {
        self.txn.commit()?;
        Ok(())
    }
}
