use solana_program::pubkey::Pubkey;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::SwapError;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStatus {
    /// No liquidity was ever added; the token pair is still open.
    Uninitialized,
    /// Token pair fixed. Reserves may have been drained back to zero.
    Active,
}

/// Reserve ledger of the pool.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub status: PoolStatus,
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub total_shares: u64,
}

impl Default for PoolState {
    fn default() -> Self {
        Self {
            status: PoolStatus::Uninitialized,
            token_a: Pubkey::default(),
            token_b: Pubkey::default(),
            reserve_a: 0,
            reserve_b: 0,
            total_shares: 0,
        }
    }
}

/// Which side of the pool a caller-supplied token sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl PoolState {
    pub const SPACE: usize =
        1        // status
        + 32     // token_a pubkey
        + 32     // token_b pubkey
        + 8      // reserve_a
        + 8      // reserve_b
        + 8;     // total_shares

    pub fn is_active(&self) -> bool {
        self.status == PoolStatus::Active
    }

    /// No reserves and no shares outstanding.
    pub fn is_empty(&self) -> bool {
        self.reserve_a == 0 && self.reserve_b == 0 && self.total_shares == 0
    }

    pub fn side_of(&self, token: &Pubkey) -> Option<Side> {
        if !self.is_active() {
            return None;
        }

        if *token == self.token_a {
            Some(Side::A)
        } else if *token == self.token_b {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Resolves an ordered pair against the fixed pool pair. The pair may come
    /// in either order but must name both pool tokens.
    pub fn orient(&self, first: &Pubkey, second: &Pubkey) -> Option<Side> {
        match (self.side_of(first), self.side_of(second)) {
            (Some(Side::A), Some(Side::B)) => Some(Side::A),
            (Some(Side::B), Some(Side::A)) => Some(Side::B),
            _ => None,
        }
    }

    pub fn reserve(&self, side: Side) -> u64 {
        match side {
            Side::A => self.reserve_a,
            Side::B => self.reserve_b,
        }
    }

    /// `(reserve_in, reserve_out)` for a swap direction.
    pub fn reserves_for(
        &self,
        token_in: &Pubkey,
        token_out: &Pubkey,
    ) -> Result<(u64, u64), SwapError> {
        match self.orient(token_in, token_out) {
            Some(Side::A) => Ok((self.reserve_a, self.reserve_b)),
            Some(Side::B) => Ok((self.reserve_b, self.reserve_a)),
            None => Err(SwapError::InvalidToken),
        }
    }

    /// Fixes the token pair. Only the first call has any effect.
    pub(crate) fn activate(&mut self, token_a: Pubkey, token_b: Pubkey) {
        if self.is_active() {
            return;
        }

        self.status = PoolStatus::Active;
        self.token_a = token_a;
        self.token_b = token_b;
    }

    pub(crate) fn deposit(
        &mut self,
        amount_a: u64,
        amount_b: u64,
        shares: u64,
    ) -> Result<(), SwapError> {
        let reserve_a = self.reserve_a.checked_add(amount_a).ok_or(SwapError::Overflow)?;
        let reserve_b = self.reserve_b.checked_add(amount_b).ok_or(SwapError::Overflow)?;
        let total_shares = self.total_shares.checked_add(shares).ok_or(SwapError::Overflow)?;

        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.total_shares = total_shares;

        Ok(())
    }

    pub(crate) fn withdraw(
        &mut self,
        amount_a: u64,
        amount_b: u64,
        shares: u64,
    ) -> Result<(), SwapError> {
        let reserve_a = self.reserve_a.checked_sub(amount_a).ok_or(SwapError::Overflow)?;
        let reserve_b = self.reserve_b.checked_sub(amount_b).ok_or(SwapError::Overflow)?;
        let total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or(SwapError::InsufficientShares)?;

        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.total_shares = total_shares;

        Ok(())
    }

    pub(crate) fn apply_swap(
        &mut self,
        side_in: Side,
        amount_in: u64,
        amount_out: u64,
    ) -> Result<(), SwapError> {
        let (reserve_in, reserve_out) = match side_in {
            Side::A => (self.reserve_a, self.reserve_b),
            Side::B => (self.reserve_b, self.reserve_a),
        };

        let reserve_in = reserve_in.checked_add(amount_in).ok_or(SwapError::Overflow)?;
        let reserve_out = reserve_out.checked_sub(amount_out).ok_or(SwapError::Overflow)?;

        match side_in {
            Side::A => {
                self.reserve_a = reserve_in;
                self.reserve_b = reserve_out;
            }
            Side::B => {
                self.reserve_b = reserve_in;
                self.reserve_a = reserve_out;
            }
        }

        Ok(())
    }
}
