//! Nullable store: thread-safe in-memory storage for testing.

use fundgov_store::{BatchOp, GovernanceBatch, GovernanceStore, MetaStore, StoreError};
use fundgov_types::Name;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

const SCHEMA_VERSION_KEY: &str = "schema_version";

#[derive(Default)]
struct Tables {
    params: Option<Vec<u8>>,
    proposals: BTreeMap<Name, Vec<u8>>,
    ballots: BTreeMap<(Name, Name), Vec<u8>>,
    disbursements: BTreeMap<Name, Vec<u8>>,
    meta: HashMap<String, Vec<u8>>,
    commits: u64,
    /// Commits still allowed to succeed before one is rejected.
    fail_in: Option<u64>,
}

/// An in-memory governance store for testing.
///
/// All tables sit behind one lock, so a batch is applied in a single
/// critical section. [`NullStore::fail_next_commit`] and
/// [`NullStore::fail_commit_after`] make a chosen commit fail without
/// applying anything.
#[derive(Default)]
pub struct NullStore {
    tables: Mutex<Tables>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next commit with a backend error.
    pub fn fail_next_commit(&self) {
        self.fail_commit_after(0);
    }

    /// Let `successes` more commits through, then reject the one after.
    pub fn fail_commit_after(&self, successes: u64) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.fail_in = Some(successes);
        }
    }

    /// Number of batches applied so far.
    pub fn commit_count(&self) -> u64 {
        self.tables.lock().map(|t| t.commits).unwrap_or(0)
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("null store lock poisoned".into()))
    }
}

impl GovernanceStore for NullStore {
    fn get_params(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables()?.params.clone())
    }

    fn get_proposal(&self, name: &Name) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables()?.proposals.get(name).cloned())
    }

    fn list_proposals(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        Ok(self.tables()?.proposals.values().cloned().collect())
    }

    fn get_ballot(&self, proposal: &Name, voter: &Name) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .tables()?
            .ballots
            .get(&(proposal.clone(), voter.clone()))
            .cloned())
    }

    fn get_ballots(&self, proposal: &Name) -> Result<Vec<Vec<u8>>, StoreError> {
        Ok(self
            .tables()?
            .ballots
            .iter()
            .filter(|((p, _), _)| p == proposal)
            .map(|(_, data)| data.clone())
            .collect())
    }

    fn get_disbursement(&self, proposal: &Name) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables()?.disbursements.get(proposal).cloned())
    }

    fn list_disbursements(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        Ok(self.tables()?.disbursements.values().cloned().collect())
    }

    fn commit(&self, batch: GovernanceBatch) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        match tables.fail_in {
            Some(0) => {
                tables.fail_in = None;
                return Err(StoreError::Backend("injected commit failure".into()));
            }
            Some(n) => tables.fail_in = Some(n - 1),
            None => {}
        }

        for op in batch.into_ops() {
            match op {
                BatchOp::PutParams(data) => tables.params = Some(data),
                BatchOp::PutProposal { name, data } => {
                    tables.proposals.insert(name, data);
                }
                BatchOp::DeleteProposal { name } => {
                    tables.proposals.remove(&name);
                }
                BatchOp::PutBallot {
                    proposal,
                    voter,
                    data,
                } => {
                    tables.ballots.insert((proposal, voter), data);
                }
                BatchOp::DeleteBallots { proposal } => {
                    tables.ballots.retain(|(p, _), _| *p != proposal);
                }
                BatchOp::PutDisbursement { proposal, data } => {
                    tables.disbursements.insert(proposal, data);
                }
            }
        }
        tables.commits += 1;
        Ok(())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.tables()?.meta.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables()?.meta.get(key).cloned())
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        match self.get_meta(SCHEMA_VERSION_KEY)? {
            None => Ok(0),
            Some(bytes) => {
                let raw: [u8; 4] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| StoreError::Corruption("schema version is not 4 bytes".into()))?;
                Ok(u32::from_be_bytes(raw))
            }
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.put_meta(SCHEMA_VERSION_KEY, &version.to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    #[test]
    fn batch_applies_in_order() {
        let store = NullStore::new();
        let mut batch = GovernanceBatch::new();
        batch
            .put_proposal(&name("grant1"), vec![1])
            .put_ballot(&name("grant1"), &name("alice"), vec![2])
            .put_ballot(&name("grant10"), &name("alice"), vec![3]);
        store.commit(batch).unwrap();

        assert_eq!(store.get_proposal(&name("grant1")).unwrap(), Some(vec![1]));
        assert_eq!(store.get_ballots(&name("grant1")).unwrap(), vec![vec![2]]);

        let mut batch = GovernanceBatch::new();
        batch.delete_proposal(&name("grant1")).delete_ballots(&name("grant1"));
        store.commit(batch).unwrap();

        assert_eq!(store.get_proposal(&name("grant1")).unwrap(), None);
        assert!(store.get_ballots(&name("grant1")).unwrap().is_empty());
        assert_eq!(store.get_ballots(&name("grant10")).unwrap(), vec![vec![3]]);
        assert_eq!(store.commit_count(), 2);
    }

    #[test]
    fn injected_failure_applies_nothing() {
        let store = NullStore::new();
        store.fail_next_commit();

        let mut batch = GovernanceBatch::new();
        batch.put_params(vec![9]).put_proposal(&name("grant1"), vec![1]);
        assert!(store.commit(batch.clone()).is_err());
        assert_eq!(store.get_params().unwrap(), None);
        assert!(store.list_proposals().unwrap().is_empty());

        store.commit(batch).unwrap();
        assert_eq!(store.get_params().unwrap(), Some(vec![9]));
    }

    #[test]
    fn failure_can_be_scheduled_after_successes() {
        let store = NullStore::new();
        store.fail_commit_after(2);

        let mut batch = GovernanceBatch::new();
        batch.put_params(vec![1]);
        store.commit(batch.clone()).unwrap();
        store.commit(batch.clone()).unwrap();
        assert!(store.commit(batch.clone()).is_err());
        store.commit(batch).unwrap();
        assert_eq!(store.commit_count(), 3);
    }

    #[test]
    fn schema_version_defaults_to_zero() {
        let store = NullStore::new();
        assert_eq!(store.get_schema_version().unwrap(), 0);
        store.set_schema_version(3).unwrap();
        assert_eq!(store.get_schema_version().unwrap(), 3);
    }
}
