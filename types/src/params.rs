//! Governance parameters: the singleton record every operation consults.

use crate::asset::{Asset, Symbol};
use crate::name::Name;
use serde::{Deserialize, Serialize};

/// The active governance configuration.
///
/// Replaced wholesale by the administrator; there are no partial updates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Treasury account that approved disbursements are drawn from.
    pub funding_account: Name,

    /// Percentage (0–100) of total supply that must vote in favour.
    pub vote_threshold: u8,

    /// Length of the voting window, counted from activation.
    pub voting_period_days: u32,

    /// Balance a creator must hold to submit a proposal.
    pub minimum_proposer_balance: Asset,

    /// Exact payment that moves a proposal from draft to active voting.
    pub listing_fee: Asset,

    /// Account authorized to finalize, approve and reject proposals.
    pub approver: Name,
}

impl GovernanceParams {
    /// Upper bound for `vote_threshold`.
    pub const MAX_VOTE_THRESHOLD: u8 = 100;

    /// The zero-value record returned before the administrator has
    /// configured anything.
    ///
    /// Both identities point at the governance account itself, the threshold
    /// and voting period are zero, and both monetary fields are zero amounts
    /// of the supported token.
    pub fn unconfigured(governance_account: &Name, symbol: &Symbol) -> Self {
        Self {
            funding_account: governance_account.clone(),
            vote_threshold: 0,
            voting_period_days: 0,
            minimum_proposer_balance: Asset::zero(symbol.clone()),
            listing_fee: Asset::zero(symbol.clone()),
            approver: governance_account.clone(),
        }
    }
}
