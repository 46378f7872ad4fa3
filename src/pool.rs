//! The SimpleSwap pool: reserve ledger, share token and pricing queries.
//!
//! Liquidity and swap operations live in `liquidity` and `swap`.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::{
    config::SwapConfig,
    error::SwapError,
    math,
    state::{PoolState, PoolStatus},
    token::FungibleLedger,
};

pub const POOL_SEED: &[u8] = b"pool";

pub fn pool_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[POOL_SEED], program_id).0
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct SimpleSwap {
    /// Holds the pool's token balances and pulls deposits as spender.
    pub(crate) address: Pubkey,
    pub(crate) state: PoolState,
    pub(crate) shares: FungibleLedger,
}

impl SimpleSwap {
    pub fn new(address: Pubkey, config: &SwapConfig) -> Self {
        Self {
            address,
            state: PoolState::default(),
            shares: FungibleLedger::new(
                config.share_name.as_str(),
                config.share_symbol.as_str(),
                config.share_decimals,
            ),
        }
    }

    pub fn for_program(program_id: &Pubkey, config: &SwapConfig) -> Self {
        Self::new(pool_address(program_id), config)
    }

    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(data).map_err(|_| ProgramError::InvalidAccountData)
    }

    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        borsh::to_vec(self).map_err(|_| ProgramError::InvalidAccountData)
    }

    pub fn address(&self) -> &Pubkey {
        &self.address
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn status(&self) -> PoolStatus {
        self.state.status
    }

    pub fn tokens(&self) -> Option<(Pubkey, Pubkey)> {
        self.state
            .is_active()
            .then_some((self.state.token_a, self.state.token_b))
    }

    pub fn reserves(&self) -> (u64, u64) {
        (self.state.reserve_a, self.state.reserve_b)
    }

    pub fn reserves_for(
        &self,
        token_in: &Pubkey,
        token_out: &Pubkey,
    ) -> Result<(u64, u64), SwapError> {
        self.state.reserves_for(token_in, token_out)
    }

    /// Spot price of `token_in` in units of `token_out`, scaled by `math::SCALE`.
    pub fn get_price(&self, token_in: &Pubkey, token_out: &Pubkey) -> Result<u128, SwapError> {
        if !self.state.is_active() {
            return Err(SwapError::EmptyPool);
        }

        let (reserve_in, reserve_out) = self.state.reserves_for(token_in, token_out)?;
        math::spot_price(reserve_in, reserve_out)
    }

    pub fn get_amount_out(
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> Result<u64, SwapError> {
        math::amount_out(amount_in, reserve_in, reserve_out)
    }

    pub fn name(&self) -> &str {
        &self.shares.name
    }

    pub fn symbol(&self) -> &str {
        &self.shares.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.shares.decimals
    }

    pub fn total_supply(&self) -> u64 {
        self.shares.total_supply()
    }

    pub fn balance_of(&self, holder: &Pubkey) -> u64 {
        self.shares.balance_of(holder)
    }

    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u64 {
        self.shares.allowance(owner, spender)
    }

    pub fn approve(&mut self, owner: &Pubkey, spender: &Pubkey, amount: u64) {
        self.shares.approve(owner, spender, amount);
    }

    pub fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<(), SwapError> {
        self.shares.transfer(from, to, amount)
    }

    pub fn transfer_from(
        &mut self,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), SwapError> {
        self.shares.transfer_from(spender, from, to, amount)
    }

    /// Share supply matches the ledger total and the holders' sum, and
    /// reserves and supply are zero or positive together.
    pub fn is_consistent(&self) -> bool {
        let supply = self.shares.total_supply();
        let all_zero = self.state.is_empty();
        let all_positive =
            self.state.reserve_a > 0 && self.state.reserve_b > 0 && self.state.total_shares > 0;

        supply == self.state.total_shares
            && self.shares.holders_total() == supply as u128
            && (all_zero || all_positive)
    }
}
