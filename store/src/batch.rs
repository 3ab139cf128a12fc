//! Atomic write sets for the governance store.
//!
//! A [`GovernanceBatch`] records every mutation an operation wants to make.
//! Nothing touches storage until [`GovernanceStore::commit`] applies the
//! whole batch in one transaction.
//!
//! ```ignore
//! let mut batch = GovernanceBatch::new();
//! batch.put_ballot(&proposal, &voter, ballot_bytes);
//! batch.put_proposal(&proposal, proposal_bytes);
//! store.commit(batch)?;
//! ```
//!
//! [`GovernanceStore::commit`]: crate::GovernanceStore::commit

use fundgov_types::Name;

/// A single mutation inside a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOp {
    PutParams(Vec<u8>),
    PutProposal { name: Name, data: Vec<u8> },
    DeleteProposal { name: Name },
    PutBallot { proposal: Name, voter: Name, data: Vec<u8> },
    /// Remove every ballot recorded for a proposal.
    DeleteBallots { proposal: Name },
    PutDisbursement { proposal: Name, data: Vec<u8> },
}

/// An ordered set of mutations committed atomically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GovernanceBatch {
    ops: Vec<BatchOp>,
}

impl GovernanceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_params(&mut self, data: Vec<u8>) -> &mut Self {
        self.ops.push(BatchOp::PutParams(data));
        self
    }

    pub fn put_proposal(&mut self, name: &Name, data: Vec<u8>) -> &mut Self {
        self.ops.push(BatchOp::PutProposal {
            name: name.clone(),
            data,
        });
        self
    }

    pub fn delete_proposal(&mut self, name: &Name) -> &mut Self {
        self.ops.push(BatchOp::DeleteProposal { name: name.clone() });
        self
    }

    pub fn put_ballot(&mut self, proposal: &Name, voter: &Name, data: Vec<u8>) -> &mut Self {
        self.ops.push(BatchOp::PutBallot {
            proposal: proposal.clone(),
            voter: voter.clone(),
            data,
        });
        self
    }

    pub fn delete_ballots(&mut self, proposal: &Name) -> &mut Self {
        self.ops.push(BatchOp::DeleteBallots {
            proposal: proposal.clone(),
        });
        self
    }

    pub fn put_disbursement(&mut self, proposal: &Name, data: Vec<u8>) -> &mut Self {
        self.ops.push(BatchOp::PutDisbursement {
            proposal: proposal.clone(),
            data,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    #[test]
    fn batch_preserves_order() {
        let mut batch = GovernanceBatch::new();
        batch
            .put_ballot(&name("grant1"), &name("alice"), vec![1])
            .put_proposal(&name("grant1"), vec![2]);

        assert_eq!(batch.len(), 2);
        assert!(matches!(batch.ops()[0], BatchOp::PutBallot { .. }));
        assert!(matches!(batch.ops()[1], BatchOp::PutProposal { .. }));
    }
}
