//! Payment memo routing.
//!
//! Incoming transfers to the governance account are classified by memo
//! prefix. `payment:<proposal>` pays a listing fee; donations and general
//! funding are accepted without touching any proposal. Anything else is
//! refused so that stray transfers bounce instead of vanishing.

use crate::error::{GovernanceError, Result};
use fundgov_types::{Name, Timestamp};

/// Prefix of a listing-fee payment; the proposal name follows it.
pub const PAYMENT_PREFIX: &str = "payment:";
/// Prefix of a donation to the treasury.
pub const DONATION_PREFIX: &str = "donation";
/// Prefix of a general funding transfer.
pub const FUNDING_PREFIX: &str = "funding";
/// Older spelling of [`FUNDING_PREFIX`], still accepted.
pub const LEGACY_FUNDING_PREFIX: &str = "founding";

/// What an incoming transfer is for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentMemo {
    /// Listing fee for the named proposal.
    ProposalFee(Name),
    Donation,
    Funding,
}

impl PaymentMemo {
    pub fn parse(memo: &str) -> Result<Self> {
        if let Some(target) = memo.strip_prefix(PAYMENT_PREFIX) {
            return Ok(Self::ProposalFee(Name::new(target)?));
        }
        if memo.starts_with(DONATION_PREFIX) {
            return Ok(Self::Donation);
        }
        if memo.starts_with(FUNDING_PREFIX) || memo.starts_with(LEGACY_FUNDING_PREFIX) {
            return Ok(Self::Funding);
        }
        Err(GovernanceError::InvalidMemo(memo.to_string()))
    }
}

/// What `on_value_received` did with a transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Not addressed to the governance account, or sent by it.
    Ignored,
    /// Listing fee accepted; the proposal is open for voting.
    Activated { proposal: Name, expires_on: Timestamp },
    Donation,
    Funding,
}
