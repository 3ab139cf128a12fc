//! Funding-proposal governance.
//!
//! Account holders submit funding requests and pay a listing fee to open
//! them for voting. Token holders vote with their balance as weight; after
//! the voting period the approver finalizes the tally and, for proposals that
//! passed, approves or rejects the disbursement from the treasury.
//!
//! ```text
//! Draft ──fee──> Active ──finalize──> Succeeded ──approve──> Completed
//!                   │                     └──────reject────> Canceled
//!                   └─────finalize──> Defeated
//! ```
//!
//! [`GovernanceEngine`] is the entry point. It reads and writes through a
//! [`fundgov_store::GovernanceStore`] and queries balances through a
//! [`fundgov_ledger::TokenLedger`]. Approval only queues a disbursement; a
//! separate delivery step hands it to the ledger.

pub mod auth;
pub mod ballot;
mod codec;
pub mod config;
pub mod disbursement;
pub mod engine;
pub mod error;
pub mod events;
pub mod memo;
pub mod params;
pub mod proposal;
pub mod reader;
pub mod tally;

pub use auth::AuthContext;
pub use ballot::{Ballot, BallotBox, VoteDirection, WeightPolicy};
pub use config::EngineConfig;
pub use disbursement::{DeliveryReport, DeliveryStatus, DisbursementIntent};
pub use engine::GovernanceEngine;
pub use error::{ErrorKind, GovernanceError, Result};
pub use events::GovernanceEvent;
pub use memo::{PaymentMemo, PaymentOutcome};
pub use proposal::{NewProposal, Proposal, ProposalStatus};
pub use reader::GovernanceReader;
pub use tally::{evaluate, TallyOutcome, VoteTotals};
