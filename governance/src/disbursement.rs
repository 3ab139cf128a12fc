//! Disbursement outbox.
//!
//! Approving a proposal records a [`DisbursementIntent`] in the same write as
//! the status change. Delivery to the ledger is a separate step that flips
//! each intent from `Pending` to `Delivered` exactly once.

use crate::proposal::Proposal;
use fundgov_ledger::TransferInstruction;
use fundgov_types::{Name, Timestamp};
use serde::{Deserialize, Serialize};

/// Memo prefix of outbound funding transfers.
pub const FUNDING_MEMO_PREFIX: &str = "funding for ";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Pending,
    Delivered { at: Timestamp },
}

/// One queued treasury transfer, keyed by proposal name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisbursementIntent {
    pub proposal: Name,
    pub instruction: TransferInstruction,
    pub status: DeliveryStatus,
    pub created_on: Timestamp,
}

impl DisbursementIntent {
    /// Transfer of the requested amount from the treasury to the receiver.
    pub fn for_proposal(proposal: &Proposal, funding_account: &Name, now: Timestamp) -> Self {
        Self {
            proposal: proposal.name.clone(),
            instruction: TransferInstruction {
                from: funding_account.clone(),
                to: proposal.receiver.clone(),
                quantity: proposal.amount.clone(),
                memo: format!("{FUNDING_MEMO_PREFIX}{}", proposal.title),
            },
            status: DeliveryStatus::Pending,
            created_on: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == DeliveryStatus::Pending
    }

    pub fn mark_delivered(&mut self, at: Timestamp) {
        self.status = DeliveryStatus::Delivered { at };
    }
}

/// Result of one delivery pass over the outbox.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub delivered: Vec<Name>,
    /// Intents the ledger refused, with the reason. They stay pending.
    pub failed: Vec<(Name, String)>,
}

impl DeliveryReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::NewProposal;
    use fundgov_types::{Asset, Symbol};

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    #[test]
    fn intent_pays_receiver_from_treasury() {
        let proposal = Proposal::draft(
            NewProposal {
                creator: name("alice"),
                receiver: name("bob"),
                name: name("grant1"),
                title: "Docs sprint".into(),
                detail: String::new(),
                amount: Asset::new(5_000_000, Symbol::new("XPR", 4).unwrap()),
                url: String::new(),
            },
            Timestamp::new(10),
        );

        let mut intent = DisbursementIntent::for_proposal(&proposal, &name("treasury"), Timestamp::new(99));

        assert_eq!(intent.instruction.from, name("treasury"));
        assert_eq!(intent.instruction.to, name("bob"));
        assert_eq!(intent.instruction.quantity, proposal.amount);
        assert_eq!(intent.instruction.memo, "funding for Docs sprint");
        assert!(intent.is_pending());

        intent.mark_delivered(Timestamp::new(120));
        assert_eq!(intent.status, DeliveryStatus::Delivered { at: Timestamp::new(120) });
    }
}
