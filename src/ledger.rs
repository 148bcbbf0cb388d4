//! The external ledger boundary: position balances and collateral transfers.
//!
//! The engine consumes these as fallible, abort-on-failure capabilities and
//! implements neither transfer bookkeeping nor receiver-acceptance
//! handshakes. The in-memory implementations back the engine's test suite
//! and serve as defaults via [`crate::ConditionalTokens::in_memory`].

use dashmap::DashMap;

use crate::error::Error;
use crate::types::{Address, PositionId, U256};
use crate::Result;

/// Mint/burn/balance capability over positions.
///
/// Implementations must reject burns beyond the held balance and mints that
/// would overflow it; the engine treats any error as aborting the whole
/// operation.
pub trait PositionLedger {
    /// Credits `amount` of `position_id` to `account`.
    fn mint(&self, account: Address, position_id: PositionId, amount: U256) -> Result<()>;

    /// Debits `amount` of `position_id` from `account`.
    fn burn(&self, account: Address, position_id: PositionId, amount: U256) -> Result<()>;

    /// Current balance; zero for unknown positions.
    fn balance_of(&self, account: Address, position_id: PositionId) -> U256;
}

/// Collateral-token transfer capability, keyed by token address.
///
/// A `false` return means the token refused the transfer (insufficient
/// balance or allowance); the engine surfaces it as
/// [`Error::TransferFailed`].
pub trait CollateralAdapter {
    /// Moves `amount` of `token` from `from` to `to`, drawing on `from`'s
    /// allowance for `to`.
    #[must_use]
    fn transfer_from(&self, token: Address, from: Address, to: Address, amount: U256) -> bool;

    /// Moves `amount` of `token` out of `from`'s own balance to `to`.
    #[must_use]
    fn transfer(&self, token: Address, from: Address, to: Address, amount: U256) -> bool;
}

/// In-memory position ledger.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    balances: DashMap<(Address, PositionId), U256>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PositionLedger for MemoryLedger {
    fn mint(&self, account: Address, position_id: PositionId, amount: U256) -> Result<()> {
        let mut balance = self.balances.entry((account, position_id)).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(Error::BalanceOverflow { position_id })?;
        Ok(())
    }

    fn burn(&self, account: Address, position_id: PositionId, amount: U256) -> Result<()> {
        let mut balance = self.balances.entry((account, position_id)).or_default();
        *balance = balance
            .checked_sub(amount)
            .ok_or(Error::InsufficientBalance {
                position_id,
                requested: amount,
                available: *balance,
            })?;
        Ok(())
    }

    fn balance_of(&self, account: Address, position_id: PositionId) -> U256 {
        self.balances
            .get(&(account, position_id))
            .map_or(U256::ZERO, |b| *b)
    }
}

/// In-memory multi-token collateral bank with ERC20-style allowances.
#[derive(Debug, Default)]
pub struct MemoryCollateral {
    /// (token, holder) -> balance
    balances: DashMap<(Address, Address), U256>,
    /// (token, owner, spender) -> allowance
    allowances: DashMap<(Address, Address, Address), U256>,
}

impl MemoryCollateral {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` of `token` to `account` out of thin air.
    pub fn fund(&self, token: Address, account: Address, amount: U256) {
        let mut balance = self.balances.entry((token, account)).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Sets `spender`'s allowance over `owner`'s `token` balance.
    pub fn approve(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((token, owner, spender), amount);
    }

    #[must_use]
    pub fn balance_of(&self, token: Address, account: Address) -> U256 {
        self.balances
            .get(&(token, account))
            .map_or(U256::ZERO, |b| *b)
    }

    #[must_use]
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .map_or(U256::ZERO, |a| *a)
    }

    fn move_balance(&self, token: Address, from: Address, to: Address, amount: U256) -> bool {
        {
            let mut source = self.balances.entry((token, from)).or_default();
            match source.checked_sub(amount) {
                Some(remaining) => *source = remaining,
                None => return false,
            }
        }
        let credited = {
            let mut dest = self.balances.entry((token, to)).or_default();
            match dest.checked_add(amount) {
                Some(total) => {
                    *dest = total;
                    true
                }
                None => false,
            }
        };
        if !credited {
            // Undo the debit; the sender still holds the tokens.
            let mut source = self.balances.entry((token, from)).or_default();
            *source = source.saturating_add(amount);
        }
        credited
    }
}

impl CollateralAdapter for MemoryCollateral {
    fn transfer_from(&self, token: Address, from: Address, to: Address, amount: U256) -> bool {
        {
            let mut allowance = self.allowances.entry((token, from, to)).or_default();
            match allowance.checked_sub(amount) {
                Some(remaining) => *allowance = remaining,
                None => return false,
            }
        }
        if self.move_balance(token, from, to, amount) {
            true
        } else {
            // Restore the allowance consumed above.
            let mut allowance = self.allowances.entry((token, from, to)).or_default();
            *allowance = allowance.saturating_add(amount);
            false
        }
    }

    fn transfer(&self, token: Address, from: Address, to: Address, amount: U256) -> bool {
        self.move_balance(token, from, to, amount)
    }
}
