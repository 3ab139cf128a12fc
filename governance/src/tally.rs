//! Tally and threshold engine.
//!
//! Pure integer arithmetic, no floating point. A proposal succeeds when
//!
//! ```text
//! votes_for * 100 >= vote_threshold * total_supply   (threshold met)
//! votes_for > votes_against                           (strict majority)
//! ```
//!
//! The threshold check is the exact rational comparison
//! `votes_for / total_supply >= vote_threshold / 100`, so there is no rounding
//! at the boundary. The reported participation is rounded down to whole basis
//! points and is informational only.

use crate::error::{GovernanceError, Result};
use crate::proposal::ProposalStatus;
use serde::{Deserialize, Serialize};

/// Basis points in 100%.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Aggregated weighted votes for one proposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTotals {
    pub votes_for: u128,
    pub votes_against: u128,
}

impl VoteTotals {
    /// Add `weight` to one side, failing on overflow.
    pub fn add(&mut self, in_favor: bool, weight: u128) -> Result<()> {
        let side = if in_favor {
            &mut self.votes_for
        } else {
            &mut self.votes_against
        };
        *side = side
            .checked_add(weight)
            .ok_or(GovernanceError::Overflow("aggregating vote weight"))?;
        Ok(())
    }
}

/// Everything the tally engine derived, kept for events and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyOutcome {
    pub totals: VoteTotals,
    pub total_supply: u128,
    /// `votes_for / total_supply` in basis points, rounded down.
    pub participation_bps: u128,
    pub meets_threshold: bool,
    pub has_majority: bool,
    pub verdict: ProposalStatus,
}

/// Evaluate totals against the supply and a percentage threshold.
///
/// A zero supply is an error, never an automatic pass or fail.
pub fn evaluate(totals: VoteTotals, total_supply: u128, vote_threshold: u8) -> Result<TallyOutcome> {
    if total_supply == 0 {
        return Err(GovernanceError::ZeroSupply);
    }

    let scaled_for = totals
        .votes_for
        .checked_mul(100)
        .ok_or(GovernanceError::Overflow("scaling votes for threshold"))?;
    let required = (vote_threshold as u128)
        .checked_mul(total_supply)
        .ok_or(GovernanceError::Overflow("scaling supply for threshold"))?;
    let meets_threshold = scaled_for >= required;
    let has_majority = totals.votes_for > totals.votes_against;

    let participation_bps = totals
        .votes_for
        .checked_mul(BPS_DENOMINATOR)
        .map(|v| v / total_supply)
        .ok_or(GovernanceError::Overflow("computing participation"))?;

    let verdict = if meets_threshold && has_majority {
        ProposalStatus::Succeeded
    } else {
        ProposalStatus::Defeated
    };

    Ok(TallyOutcome {
        totals,
        total_supply,
        participation_bps,
        meets_threshold,
        has_majority,
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(votes_for: u128, votes_against: u128) -> VoteTotals {
        VoteTotals {
            votes_for,
            votes_against,
        }
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let outcome = evaluate(totals(500, 100), 1_000, 50).unwrap();
        assert!(outcome.meets_threshold);
        assert!(outcome.has_majority);
        assert_eq!(outcome.participation_bps, 5_000);
        assert_eq!(outcome.verdict, ProposalStatus::Succeeded);

        let outcome = evaluate(totals(499, 100), 1_000, 50).unwrap();
        assert!(!outcome.meets_threshold);
        assert_eq!(outcome.verdict, ProposalStatus::Defeated);
    }

    #[test]
    fn tie_is_defeated() {
        let outcome = evaluate(totals(600, 600), 1_000, 40).unwrap();
        assert!(outcome.meets_threshold);
        assert!(!outcome.has_majority);
        assert_eq!(outcome.verdict, ProposalStatus::Defeated);
    }

    #[test]
    fn zero_supply_is_an_error() {
        let err = evaluate(totals(1, 0), 0, 10).unwrap_err();
        assert!(matches!(err, GovernanceError::ZeroSupply));
        assert_eq!(err.kind(), crate::ErrorKind::Arithmetic);
    }

    #[test]
    fn no_rounding_near_boundary() {
        // 1/3 of supply against a 33% threshold: exact comparison passes,
        // while the reported figure rounds down.
        let outcome = evaluate(totals(1, 0), 3, 33).unwrap();
        assert!(outcome.meets_threshold);
        assert_eq!(outcome.participation_bps, 3_333);

        let outcome = evaluate(totals(1, 0), 3, 34).unwrap();
        assert!(!outcome.meets_threshold);
    }

    #[test]
    fn zero_threshold_needs_only_majority() {
        let outcome = evaluate(totals(1, 0), 1_000_000, 0).unwrap();
        assert_eq!(outcome.verdict, ProposalStatus::Succeeded);
        let outcome = evaluate(totals(0, 0), 1_000_000, 0).unwrap();
        assert_eq!(outcome.verdict, ProposalStatus::Defeated);
    }

    #[test]
    fn aggregation_overflow_is_reported() {
        let mut t = totals(u128::MAX, 0);
        assert!(t.add(true, 1).is_err());
        assert!(t.add(false, 1).is_ok());
        assert_eq!(t.votes_against, 1);
    }

    #[test]
    fn huge_votes_overflow_instead_of_wrapping() {
        let err = evaluate(totals(u128::MAX, 0), 1, 50).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Arithmetic);
    }
}
