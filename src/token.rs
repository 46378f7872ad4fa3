//! Fungible token ledgers and the transfer capability the pool consumes.

use std::collections::HashMap;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::SwapError;

/// Balance and allowance book of a single fungible token.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct FungibleLedger {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    total_supply: u64,
    balances: HashMap<Pubkey, u64>,
    allowances: HashMap<(Pubkey, Pubkey), u64>,
}

impl FungibleLedger {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub fn balance_of(&self, owner: &Pubkey) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u64 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Sum over every holder. Equal to `total_supply` at all times.
    pub fn holders_total(&self) -> u128 {
        self.balances.values().map(|&balance| balance as u128).sum()
    }

    pub fn approve(&mut self, owner: &Pubkey, spender: &Pubkey, amount: u64) {
        if amount == 0 {
            self.allowances.remove(&(*owner, *spender));
        } else {
            self.allowances.insert((*owner, *spender), amount);
        }
    }

    pub fn mint(&mut self, to: &Pubkey, amount: u64) -> Result<(), SwapError> {
        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(SwapError::Overflow)?;
        // cannot overflow once the supply did not
        let balance = self.balance_of(to) + amount;

        self.total_supply = total_supply;
        self.set_balance(to, balance);

        Ok(())
    }

    pub fn burn(&mut self, from: &Pubkey, amount: u64) -> Result<(), SwapError> {
        let balance = self
            .balance_of(from)
            .checked_sub(amount)
            .ok_or(SwapError::InsufficientBalance)?;

        self.total_supply -= amount;
        self.set_balance(from, balance);

        Ok(())
    }

    pub fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), SwapError> {
        let from_balance = self
            .balance_of(from)
            .checked_sub(amount)
            .ok_or(SwapError::InsufficientBalance)?;

        if from == to {
            return Ok(());
        }

        let to_balance = self.balance_of(to) + amount;

        self.set_balance(from, from_balance);
        self.set_balance(to, to_balance);

        Ok(())
    }

    /// Moves `amount` out of `from` on behalf of `spender`, consuming allowance.
    /// An owner spending its own balance needs no allowance.
    pub fn transfer_from(
        &mut self,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), SwapError> {
        if spender == from {
            return self.transfer(from, to, amount);
        }

        let remaining = self
            .allowance(from, spender)
            .checked_sub(amount)
            .ok_or(SwapError::InsufficientAllowance)?;

        self.transfer(from, to, amount)?;
        self.approve(from, spender, remaining);

        Ok(())
    }

    fn set_balance(&mut self, owner: &Pubkey, balance: u64) {
        if balance == 0 {
            self.balances.remove(owner);
        } else {
            self.balances.insert(*owner, balance);
        }
    }
}

/// Token movement the pool relies on. Implementations settle synchronously:
/// a call either completes or fails without side effects.
pub trait TokenTransfer {
    fn balance_of(&self, token: &Pubkey, owner: &Pubkey) -> Result<u64, SwapError>;

    fn allowance(&self, token: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> Result<u64, SwapError>;

    fn transfer(
        &mut self,
        token: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), SwapError>;

    fn transfer_from(
        &mut self,
        token: &Pubkey,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), SwapError>;

    /// Whether `spender` may pull `amount` of `token` from `owner` right now.
    fn can_pull(
        &self,
        token: &Pubkey,
        spender: &Pubkey,
        owner: &Pubkey,
        amount: u64,
    ) -> Result<(), SwapError> {
        if self.balance_of(token, owner)? < amount {
            return Err(SwapError::InsufficientBalance);
        }
        if spender != owner && self.allowance(token, owner, spender)? < amount {
            return Err(SwapError::InsufficientAllowance);
        }

        Ok(())
    }
}

/// In-memory bank of independently owned token ledgers, keyed by token address.
#[derive(Debug, Default, Clone)]
pub struct TokenRegistry {
    ledgers: HashMap<Pubkey, FungibleLedger>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new token under a fresh address and returns that address.
    pub fn create_token(&mut self, name: &str, symbol: &str, decimals: u8) -> Pubkey {
        let address = Pubkey::new_unique();
        self.ledgers
            .insert(address, FungibleLedger::new(name, symbol, decimals));
        address
    }

    pub fn token(&self, token: &Pubkey) -> Result<&FungibleLedger, SwapError> {
        self.ledgers.get(token).ok_or(SwapError::UnknownToken)
    }

    fn token_mut(&mut self, token: &Pubkey) -> Result<&mut FungibleLedger, SwapError> {
        self.ledgers.get_mut(token).ok_or(SwapError::UnknownToken)
    }

    pub fn mint(&mut self, token: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), SwapError> {
        self.token_mut(token)?.mint(to, amount)
    }

    pub fn approve(
        &mut self,
        token: &Pubkey,
        owner: &Pubkey,
        spender: &Pubkey,
        amount: u64,
    ) -> Result<(), SwapError> {
        self.token_mut(token)?.approve(owner, spender, amount);
        Ok(())
    }
}

impl TokenTransfer for TokenRegistry {
    fn balance_of(&self, token: &Pubkey, owner: &Pubkey) -> Result<u64, SwapError> {
        Ok(self.token(token)?.balance_of(owner))
    }

    fn allowance(
        &self,
        token: &Pubkey,
        owner: &Pubkey,
        spender: &Pubkey,
    ) -> Result<u64, SwapError> {
        Ok(self.token(token)?.allowance(owner, spender))
    }

    fn transfer(
        &mut self,
        token: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), SwapError> {
        self.token_mut(token)?.transfer(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: &Pubkey,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), SwapError> {
        self.token_mut(token)?.transfer_from(spender, from, to, amount)
    }
}

/// Registry wrapper whose movements of one token fail after every balance
/// and allowance check has passed.
#[cfg(test)]
pub(crate) struct FailingTransfers {
    pub inner: TokenRegistry,
    pub failing: Option<Pubkey>,
}

#[cfg(test)]
impl FailingTransfers {
    pub fn new(inner: TokenRegistry) -> Self {
        Self { inner, failing: None }
    }

    fn check(&self, token: &Pubkey) -> Result<(), SwapError> {
        match self.failing {
            Some(failing) if failing == *token => Err(SwapError::InsufficientBalance),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
impl TokenTransfer for FailingTransfers {
    fn balance_of(&self, token: &Pubkey, owner: &Pubkey) -> Result<u64, SwapError> {
        self.inner.balance_of(token, owner)
    }

    fn allowance(
        &self,
        token: &Pubkey,
        owner: &Pubkey,
        spender: &Pubkey,
    ) -> Result<u64, SwapError> {
        self.inner.allowance(token, owner, spender)
    }

    fn transfer(
        &mut self,
        token: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), SwapError> {
        self.check(token)?;
        self.inner.transfer(token, from, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: &Pubkey,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), SwapError> {
        self.check(token)?;
        self.inner.transfer_from(token, spender, from, to, amount)
    }
}
