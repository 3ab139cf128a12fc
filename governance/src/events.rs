//! Domain events queued by the engine for whoever drives it.

use crate::ballot::VoteDirection;
use crate::proposal::ProposalStatus;
use crate::tally::TallyOutcome;
use fundgov_types::{Asset, Name, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GovernanceEvent {
    /// The administrator replaced the parameter record.
    ParamsUpdated,
    ProposalCreated { proposal: Name, creator: Name },
    /// Listing fee received; voting is open until `expires_on`.
    ProposalActivated { proposal: Name, expires_on: Timestamp },
    BallotCast {
        proposal: Name,
        voter: Name,
        direction: VoteDirection,
        weight: u128,
    },
    /// Voting closed and the tally decided the outcome.
    ProposalFinalized { proposal: Name, outcome: TallyOutcome },
    /// Approved; a disbursement intent is waiting in the outbox.
    ProposalApproved { proposal: Name, amount: Asset },
    ProposalRejected { proposal: Name },
    ProposalRemoved { proposal: Name, status: ProposalStatus },
    /// The ledger accepted the queued transfer.
    DisbursementDelivered { proposal: Name, amount: Asset },
    /// An operator put a delivered intent back in the queue.
    DisbursementRequeued { proposal: Name },
    /// Incoming donation or general funding.
    FundsReceived { from: Name, quantity: Asset },
}
