//! Funding proposals and their lifecycle.

use crate::error::{GovernanceError, Result};
use crate::tally::VoteTotals;
use fundgov_types::{Asset, GovernanceParams, Name, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a proposal.
///
/// ```text
/// Draft ──fee──> Active ──finalize──> Succeeded ──approve──> Completed
///                   │                     └──────reject────> Canceled
///                   └─────finalize──> Defeated
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Created, waiting for the listing fee.
    Draft,
    /// Fee paid, accepting ballots until `expires_on`.
    Active,
    /// Passed threshold and majority; waiting for the approver.
    Succeeded,
    /// Failed threshold or majority.
    Defeated,
    /// Approver declined to fund a succeeded proposal.
    Canceled,
    /// Approved; the disbursement intent is in the outbox.
    Completed,
}

impl ProposalStatus {
    pub const ALL: [ProposalStatus; 6] = [
        Self::Draft,
        Self::Active,
        Self::Succeeded,
        Self::Defeated,
        Self::Canceled,
        Self::Completed,
    ];

    /// The complete transition function. Anything not listed is illegal.
    pub fn can_transition_to(self, next: ProposalStatus) -> bool {
        use ProposalStatus::*;
        matches!(
            (self, next),
            (Draft, Active)
                | (Active, Succeeded)
                | (Active, Defeated)
                | (Succeeded, Completed)
                | (Succeeded, Canceled)
        )
    }

    /// No transition leaves a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Defeated | Self::Canceled | Self::Completed)
    }

    /// Position along the lifecycle; every legal transition strictly increases it.
    pub fn rank(self) -> u8 {
        match self {
            Self::Draft => 0,
            Self::Active => 1,
            Self::Succeeded | Self::Defeated => 2,
            Self::Canceled | Self::Completed => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Succeeded => "succeeded",
            Self::Defeated => "defeated",
            Self::Canceled => "canceled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown proposal status '{s}'"))
    }
}

/// Caller-supplied content of a new proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProposal {
    pub creator: Name,
    pub receiver: Name,
    pub name: Name,
    pub title: String,
    pub detail: String,
    pub amount: Asset,
    pub url: String,
}

/// A funding request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique key, fixed at creation.
    pub name: Name,
    pub creator: Name,
    /// Account that receives the funds on approval.
    pub receiver: Name,
    pub title: String,
    pub detail: String,
    /// Requested funding, fixed at creation.
    pub amount: Asset,
    pub url: String,
    pub created_on: Timestamp,
    /// [`Timestamp::EPOCH`] until the proposal is activated.
    pub expires_on: Timestamp,
    pub votes_for: u128,
    pub votes_against: u128,
    pub status: ProposalStatus,
}

impl Proposal {
    /// A fresh draft with zero vote totals.
    pub fn draft(new: NewProposal, now: Timestamp) -> Self {
        Self {
            name: new.name,
            creator: new.creator,
            receiver: new.receiver,
            title: new.title,
            detail: new.detail,
            amount: new.amount,
            url: new.url,
            created_on: now,
            expires_on: Timestamp::EPOCH,
            votes_for: 0,
            votes_against: 0,
            status: ProposalStatus::Draft,
        }
    }

    /// Move to `next`, rejecting anything the transition table does not list.
    pub fn transition(&mut self, next: ProposalStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(GovernanceError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Fail with `InvalidStatus` unless the proposal is in `expected`.
    pub fn ensure_status(&self, expected: ProposalStatus, action: &'static str) -> Result<()> {
        if self.status != expected {
            return Err(GovernanceError::InvalidStatus {
                proposal: self.name.clone(),
                status: self.status,
                action,
            });
        }
        Ok(())
    }

    /// Draft → Active, opening the voting window at `now`.
    pub fn activate(&mut self, params: &GovernanceParams, now: Timestamp) -> Result<()> {
        self.ensure_status(ProposalStatus::Draft, "activate")?;
        self.transition(ProposalStatus::Active)?;
        self.expires_on = now.plus_days(params.voting_period_days);
        Ok(())
    }

    /// Ballots are accepted strictly before `expires_on`.
    pub fn is_voting_open(&self, now: Timestamp) -> bool {
        self.status == ProposalStatus::Active && now < self.expires_on
    }

    /// Fail unless the proposal is active and its window is still open.
    pub fn ensure_voting_open(&self, now: Timestamp) -> Result<()> {
        self.ensure_status(ProposalStatus::Active, "vote on")?;
        if now >= self.expires_on {
            return Err(GovernanceError::VotingClosed {
                proposal: self.name.clone(),
                expires_on: self.expires_on,
            });
        }
        Ok(())
    }

    /// Fail unless the proposal is active and its window has closed.
    pub fn ensure_voting_closed(&self, now: Timestamp) -> Result<()> {
        self.ensure_status(ProposalStatus::Active, "finalize")?;
        if now < self.expires_on {
            return Err(GovernanceError::VotingStillOpen {
                proposal: self.name.clone(),
                expires_on: self.expires_on,
            });
        }
        Ok(())
    }

    pub fn record_totals(&mut self, totals: VoteTotals) {
        self.votes_for = totals.votes_for;
        self.votes_against = totals.votes_against;
    }

    pub fn totals(&self) -> VoteTotals {
        VoteTotals {
            votes_for: self.votes_for,
            votes_against: self.votes_against,
        }
    }
}
