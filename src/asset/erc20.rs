use crate::error::AssetError;
use alloy::primitives::{Address, U256, map::HashMap};

/// Balance and allowance bookkeeping shared by all token implementations.
#[derive(Debug, Clone, Default)]
pub struct Erc20Ledger {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    total_supply: U256,
}

impl Erc20Ledger {
    /// Creates a ledger whose entire `supply` is held by `owner`.
    pub fn with_supply(owner: Address, supply: U256) -> Self {
        let mut balances = HashMap::default();
        if !supply.is_zero() {
            balances.insert(owner, supply);
        }
        Self { balances, allowances: HashMap::default(), total_supply: supply }
    }

    /// Returns the total supply.
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Returns the balance of `account`.
    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// Returns the allowance of `spender` over the tokens of `owner`.
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).copied().unwrap_or_default()
    }

    /// Sets the allowance of `spender` over the tokens of `owner`.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((owner, spender), amount);
    }

    /// Moves `amount` from `from` to `to`.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), AssetError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(AssetError::InsufficientBalance {
                account: from,
                available,
                required: amount,
            });
        }
        self.balances.insert(from, available - amount);
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`.
    ///
    /// Both the allowance and the balance are checked before anything is written.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), AssetError> {
        let allowance = self.allowance(from, spender);
        if allowance < amount {
            return Err(AssetError::InsufficientAllowance {
                owner: from,
                spender,
                available: allowance,
                required: amount,
            });
        }
        self.transfer(from, to, amount)?;
        if allowance != U256::MAX {
            self.allowances.insert((from, spender), allowance - amount);
        }
        Ok(())
    }

    /// Creates `amount` tokens for `to`.
    pub fn mint(&mut self, to: Address, amount: U256) -> Result<(), AssetError> {
        self.total_supply =
            self.total_supply.checked_add(amount).ok_or(AssetError::SupplyOverflow)?;
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }

    /// Destroys `amount` tokens of `from`.
    pub fn burn(&mut self, from: Address, amount: U256) -> Result<(), AssetError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(AssetError::InsufficientBalance {
                account: from,
                available,
                required: amount,
            });
        }
        self.balances.insert(from, available - amount);
        self.total_supply -= amount;
        Ok(())
    }
}
