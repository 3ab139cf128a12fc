//! The ledger trait the governance engine depends on.

use crate::error::LedgerError;
use crate::transfer::TransferInstruction;
use fundgov_types::{Asset, Name, Symbol};
use std::sync::Arc;

/// Read access to token balances plus a one-way transfer channel.
pub trait TokenLedger {
    /// Current spendable balance of `account` in `symbol`.
    ///
    /// Accounts holding none of the token report a zero asset, not an error.
    fn balance_of(&self, account: &Name, symbol: &Symbol) -> Result<Asset, LedgerError>;

    /// Total circulating supply of `symbol`.
    fn total_supply(&self, symbol: &Symbol) -> Result<Asset, LedgerError>;

    /// Hand a transfer instruction to the ledger.
    ///
    /// `Ok` means the instruction was accepted for delivery, not that the
    /// funds have moved.
    fn transfer(&self, instruction: &TransferInstruction) -> Result<(), LedgerError>;
}

impl<T: TokenLedger + ?Sized> TokenLedger for Arc<T> {
    fn balance_of(&self, account: &Name, symbol: &Symbol) -> Result<Asset, LedgerError> {
        (**self).balance_of(account, symbol)
    }

    fn total_supply(&self, symbol: &Symbol) -> Result<Asset, LedgerError> {
        (**self).total_supply(symbol)
    }

    fn transfer(&self, instruction: &TransferInstruction) -> Result<(), LedgerError> {
        (**self).transfer(instruction)
    }
}
