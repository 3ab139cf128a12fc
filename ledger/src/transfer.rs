//! Outbound transfer instructions.

use fundgov_types::{Asset, Name};
use serde::{Deserialize, Serialize};

/// "Move `quantity` from `from` to `to`", with a human-readable memo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInstruction {
    pub from: Name,
    pub to: Name,
    pub quantity: Asset,
    pub memo: String,
}
