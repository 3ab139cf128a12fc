//! Governance storage trait.

use crate::batch::GovernanceBatch;
use crate::StoreError;
use fundgov_types::Name;
use std::sync::Arc;

/// Trait for storing governance state: the parameter singleton, proposals,
/// per-proposal ballots and the disbursement outbox.
///
/// Reads go straight to the backend. All writes go through [`commit`], which
/// must apply the batch atomically.
///
/// [`commit`]: GovernanceStore::commit
pub trait GovernanceStore {
    /// Get the parameter record, `None` if it was never set.
    fn get_params(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Get a proposal by name.
    fn get_proposal(&self, name: &Name) -> Result<Option<Vec<u8>>, StoreError>;

    /// List every stored proposal, ordered by name.
    fn list_proposals(&self) -> Result<Vec<Vec<u8>>, StoreError>;

    /// Get a specific voter's ballot on a proposal.
    fn get_ballot(&self, proposal: &Name, voter: &Name) -> Result<Option<Vec<u8>>, StoreError>;

    /// Get all ballots for a proposal, ordered by voter name.
    fn get_ballots(&self, proposal: &Name) -> Result<Vec<Vec<u8>>, StoreError>;

    /// Get the disbursement intent recorded for a proposal.
    fn get_disbursement(&self, proposal: &Name) -> Result<Option<Vec<u8>>, StoreError>;

    /// List every disbursement intent, ordered by proposal name.
    fn list_disbursements(&self) -> Result<Vec<Vec<u8>>, StoreError>;

    /// Apply every operation in `batch`, or none of them.
    fn commit(&self, batch: GovernanceBatch) -> Result<(), StoreError>;
}

impl<T: GovernanceStore + ?Sized> GovernanceStore for Arc<T> {
    fn get_params(&self) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_params()
    }

    fn get_proposal(&self, name: &Name) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_proposal(name)
    }

    fn list_proposals(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        (**self).list_proposals()
    }

    fn get_ballot(&self, proposal: &Name, voter: &Name) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_ballot(proposal, voter)
    }

    fn get_ballots(&self, proposal: &Name) -> Result<Vec<Vec<u8>>, StoreError> {
        (**self).get_ballots(proposal)
    }

    fn get_disbursement(&self, proposal: &Name) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_disbursement(proposal)
    }

    fn list_disbursements(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        (**self).list_disbursements()
    }

    fn commit(&self, batch: GovernanceBatch) -> Result<(), StoreError> {
        (**self).commit(batch)
    }
}

/// Composite key for a ballot: `proposal ++ 0x00 ++ voter`.
///
/// Names never contain a NUL byte, so the separator keeps one proposal's
/// ballots contiguous and prefix-scannable.
pub fn ballot_key(proposal: &Name, voter: &Name) -> Vec<u8> {
    let mut key = ballot_prefix(proposal);
    key.extend_from_slice(voter.as_bytes());
    key
}

/// Prefix shared by every ballot key of `proposal`.
pub fn ballot_prefix(proposal: &Name) -> Vec<u8> {
    let mut key = Vec::with_capacity(proposal.as_bytes().len() + 1 + Name::MAX_LEN);
    key.extend_from_slice(proposal.as_bytes());
    key.push(0);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ballot_prefix_does_not_match_longer_proposal_names() {
        let short = Name::new("grant").unwrap();
        let long = Name::new("grant2").unwrap();
        let voter = Name::new("alice").unwrap();

        let key = ballot_key(&long, &voter);
        assert!(!key.starts_with(&ballot_prefix(&short)));
        assert!(ballot_key(&short, &voter).starts_with(&ballot_prefix(&short)));
    }
}
