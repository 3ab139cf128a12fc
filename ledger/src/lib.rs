//! Token ledger interface.
//!
//! The governance engine never holds token balances. It asks an external
//! ledger for balances and total supply, and hands it transfer instructions
//! when a proposal is funded. This crate defines that seam.

pub mod error;
pub mod ledger;
pub mod transfer;

pub use error::LedgerError;
pub use ledger::TokenLedger;
pub use transfer::TransferInstruction;
