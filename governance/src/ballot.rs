//! Ballots and the per-proposal ballot box.

use crate::error::{GovernanceError, Result};
use crate::tally::VoteTotals;
use fundgov_types::{Name, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which side a ballot supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteDirection {
    For,
    Against,
}

impl VoteDirection {
    pub fn is_for(self) -> bool {
        self == Self::For
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::For => "for",
            Self::Against => "against",
        })
    }
}

/// When a ballot's weight is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightPolicy {
    /// Weight is the voter's balance when the ballot was cast.
    SnapshotAtCast,
    /// Weight is re-read from the ledger whenever the proposal is tallied,
    /// so voting power reflects holdings at the close of voting.
    #[default]
    ResampleAtTally,
}

/// One voter's weighted choice on one proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub voter: Name,
    pub direction: VoteDirection,
    /// Token balance in raw units, as last measured.
    pub weight: u128,
    pub cast_on: Timestamp,
}

/// All ballots cast on a single proposal, keyed by voter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BallotBox {
    proposal: Name,
    ballots: BTreeMap<Name, Ballot>,
}

impl BallotBox {
    pub fn new(proposal: Name) -> Self {
        Self {
            proposal,
            ballots: BTreeMap::new(),
        }
    }

    /// Rebuild a box from stored ballots.
    pub fn from_ballots(proposal: Name, ballots: impl IntoIterator<Item = Ballot>) -> Self {
        Self {
            proposal,
            ballots: ballots.into_iter().map(|b| (b.voter.clone(), b)).collect(),
        }
    }

    pub fn proposal(&self) -> &Name {
        &self.proposal
    }

    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    pub fn get(&self, voter: &Name) -> Option<&Ballot> {
        self.ballots.get(voter)
    }

    pub fn ballots(&self) -> impl Iterator<Item = &Ballot> {
        self.ballots.values()
    }

    /// Record a ballot. A voter gets exactly one ballot per proposal.
    pub fn cast(&mut self, ballot: Ballot) -> Result<&Ballot> {
        use std::collections::btree_map::Entry;
        match self.ballots.entry(ballot.voter.clone()) {
            Entry::Occupied(_) => Err(GovernanceError::AlreadyVoted {
                voter: ballot.voter,
                proposal: self.proposal.clone(),
            }),
            Entry::Vacant(slot) => Ok(slot.insert(ballot)),
        }
    }

    /// Re-measure every ballot's weight with `weigh` and return the voters
    /// whose weight changed.
    ///
    /// `weigh` is consulted for every ballot before anything is modified, so
    /// a failure leaves the box untouched.
    pub fn resample<F>(&mut self, mut weigh: F) -> Result<Vec<Name>>
    where
        F: FnMut(&Name) -> Result<u128>,
    {
        let fresh = self
            .ballots
            .keys()
            .map(|voter| weigh(voter).map(|w| (voter.clone(), w)))
            .collect::<Result<Vec<_>>>()?;

        let mut changed = Vec::new();
        for (voter, weight) in fresh {
            if let Some(ballot) = self.ballots.get_mut(&voter) {
                if ballot.weight != weight {
                    ballot.weight = weight;
                    changed.push(voter);
                }
            }
        }
        Ok(changed)
    }

    /// Sum the recorded weights per side.
    pub fn totals(&self) -> Result<VoteTotals> {
        let mut totals = VoteTotals::default();
        for ballot in self.ballots.values() {
            totals.add(ballot.direction.is_for(), ballot.weight)?;
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn ballot(voter: &str, direction: VoteDirection, weight: u128) -> Ballot {
        Ballot {
            voter: name(voter),
            direction,
            weight,
            cast_on: Timestamp::new(100),
        }
    }

    #[test]
    fn one_ballot_per_voter() {
        let mut bb = BallotBox::new(name("grant1"));
        bb.cast(ballot("alice", VoteDirection::For, 10)).unwrap();
        let err = bb.cast(ballot("alice", VoteDirection::Against, 99)).unwrap_err();

        assert!(matches!(err, GovernanceError::AlreadyVoted { .. }));
        assert_eq!(bb.len(), 1);
        assert_eq!(bb.get(&name("alice")).unwrap().direction, VoteDirection::For);
    }

    #[test]
    fn totals_sum_each_side() {
        let bb = BallotBox::from_ballots(
            name("grant1"),
            vec![
                ballot("alice", VoteDirection::For, 300),
                ballot("bob", VoteDirection::For, 200),
                ballot("carol", VoteDirection::Against, 100),
            ],
        );
        let totals = bb.totals().unwrap();
        assert_eq!(totals.votes_for, 500);
        assert_eq!(totals.votes_against, 100);
    }

    #[test]
    fn resample_replaces_weights() {
        let mut bb = BallotBox::from_ballots(
            name("grant1"),
            vec![
                ballot("alice", VoteDirection::For, 300),
                ballot("bob", VoteDirection::Against, 200),
            ],
        );
        let balances: HashMap<Name, u128> = [(name("alice"), 0), (name("bob"), 200)].into();

        let changed = bb.resample(|voter| Ok(balances[voter])).unwrap();

        assert_eq!(changed, vec![name("alice")]);
        let totals = bb.totals().unwrap();
        assert_eq!(totals.votes_for, 0);
        assert_eq!(totals.votes_against, 200);
    }

    #[test]
    fn failed_resample_leaves_box_untouched() {
        let mut bb = BallotBox::from_ballots(
            name("grant1"),
            vec![
                ballot("alice", VoteDirection::For, 300),
                ballot("bob", VoteDirection::Against, 200),
            ],
        );
        let before = bb.clone();

        let result = bb.resample(|voter| {
            if voter.as_str() == "bob" {
                Err(GovernanceError::Overflow("test"))
            } else {
                Ok(1)
            }
        });

        assert!(result.is_err());
        assert_eq!(bb, before);
    }

    #[test]
    fn weight_policy_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: WeightPolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"snapshot_at_cast\"").unwrap();
        assert_eq!(w.policy, WeightPolicy::SnapshotAtCast);
        assert_eq!(WeightPolicy::default(), WeightPolicy::ResampleAtTally);
    }
}
