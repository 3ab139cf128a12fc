//! Nullable token ledger: scripted balances and a transfer log.

use fundgov_ledger::{LedgerError, TokenLedger, TransferInstruction};
use fundgov_types::{Asset, Name, Symbol};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct LedgerState {
    balances: HashMap<Name, u128>,
    supply: u128,
    transfers: Vec<TransferInstruction>,
    fail_queries: bool,
    fail_transfers: bool,
}

/// An in-memory single-token ledger for testing.
///
/// Balances and supply are set directly; transfers are recorded but never
/// move balances, matching the engine's view of the ledger as external.
pub struct NullLedger {
    symbol: Symbol,
    state: Mutex<LedgerState>,
}

impl NullLedger {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            state: Mutex::new(LedgerState::default()),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_balance(&self, account: &Name, amount: u128) {
        self.state().balances.insert(account.clone(), amount);
    }

    pub fn set_supply(&self, amount: u128) {
        self.state().supply = amount;
    }

    /// Every instruction accepted so far, in order.
    pub fn transfers(&self) -> Vec<TransferInstruction> {
        self.state().transfers.clone()
    }

    /// Make balance and supply queries fail until switched back.
    pub fn fail_queries(&self, fail: bool) {
        self.state().fail_queries = fail;
    }

    /// Make transfers fail until switched back.
    pub fn fail_transfers(&self, fail: bool) {
        self.state().fail_transfers = fail;
    }

    fn check_symbol(&self, symbol: &Symbol) -> Result<(), LedgerError> {
        if symbol == &self.symbol {
            Ok(())
        } else {
            Err(LedgerError::UnknownToken(symbol.to_string()))
        }
    }
}

impl TokenLedger for NullLedger {
    fn balance_of(&self, account: &Name, symbol: &Symbol) -> Result<Asset, LedgerError> {
        self.check_symbol(symbol)?;
        let state = self.state();
        if state.fail_queries {
            return Err(LedgerError::Unavailable("balance query disabled".into()));
        }
        let amount = state.balances.get(account).copied().unwrap_or(0);
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    fn total_supply(&self, symbol: &Symbol) -> Result<Asset, LedgerError> {
        self.check_symbol(symbol)?;
        let state = self.state();
        if state.fail_queries {
            return Err(LedgerError::Unavailable("supply query disabled".into()));
        }
        Ok(Asset::new(state.supply, self.symbol.clone()))
    }

    fn transfer(&self, instruction: &TransferInstruction) -> Result<(), LedgerError> {
        self.check_symbol(&instruction.quantity.symbol)?;
        let mut state = self.state();
        if state.fail_transfers {
            return Err(LedgerError::Rejected(format!(
                "transfer to {} refused",
                instruction.to
            )));
        }
        state.transfers.push(instruction.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xpr() -> Symbol {
        Symbol::new("XPR", 4).unwrap()
    }

    #[test]
    fn unknown_accounts_hold_zero() {
        let ledger = NullLedger::new(xpr());
        let alice = Name::new("alice").unwrap();
        assert!(ledger.balance_of(&alice, &xpr()).unwrap().is_zero());

        ledger.set_balance(&alice, 42);
        assert_eq!(ledger.balance_of(&alice, &xpr()).unwrap().amount, 42);
    }

    #[test]
    fn foreign_symbol_is_unknown_token() {
        let ledger = NullLedger::new(xpr());
        let eos = Symbol::new("EOS", 4).unwrap();
        assert!(matches!(
            ledger.total_supply(&eos),
            Err(LedgerError::UnknownToken(_))
        ));
    }

    #[test]
    fn failed_transfers_are_not_recorded() {
        let ledger = NullLedger::new(xpr());
        let instruction = TransferInstruction {
            from: Name::new("treasury").unwrap(),
            to: Name::new("bob").unwrap(),
            quantity: Asset::new(10, xpr()),
            memo: "funding for x".into(),
        };
        ledger.fail_transfers(true);
        assert!(ledger.transfer(&instruction).is_err());
        ledger.fail_transfers(false);
        ledger.transfer(&instruction).unwrap();
        assert_eq!(ledger.transfers(), vec![instruction]);
    }
}
