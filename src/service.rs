//! Shared access to one pool and its token bank.
//!
//! Mutations hold the write lock for the whole call, so every caller sees a
//! consistent pre-state and commits atomically. Queries share the read lock.

use std::sync::Arc;

use solana_program::{program_error::ProgramError, pubkey::Pubkey};
use tokio::sync::RwLock;

use crate::{
    error::SwapError,
    instruction::SwapInstruction,
    liquidity::{LiquidityDeposit, LiquidityWithdrawal},
    pool::SimpleSwap,
    processor::{self, InstructionOutcome},
    swap::SwapOutcome,
    token::{TokenRegistry, TokenTransfer},
};

#[derive(Debug)]
pub struct Exchange<T = TokenRegistry> {
    pub pool: SimpleSwap,
    pub tokens: T,
}

#[derive(Debug)]
pub struct SharedSwap<T = TokenRegistry> {
    inner: Arc<RwLock<Exchange<T>>>,
}

impl<T> Clone for SharedSwap<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: TokenTransfer> SharedSwap<T> {
    pub fn new(pool: SimpleSwap, tokens: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Exchange { pool, tokens })),
        }
    }

    /// Decodes and runs an encoded instruction for `caller`.
    pub async fn submit(
        &self,
        caller: &Pubkey,
        instruction_data: &[u8],
    ) -> Result<InstructionOutcome, ProgramError> {
        let instruction = SwapInstruction::unpack(instruction_data)?;

        if instruction.is_query() {
            let exchange = self.inner.read().await;
            return processor::process_query(&exchange.pool, instruction);
        }

        let mut exchange = self.inner.write().await;
        let Exchange { pool, tokens } = &mut *exchange;
        processor::execute(pool, tokens, caller, instruction)
    }

    pub async fn add_liquidity(
        &self,
        caller: &Pubkey,
        token_a: &Pubkey,
        token_b: &Pubkey,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<LiquidityDeposit, SwapError> {
        let mut exchange = self.inner.write().await;
        let Exchange { pool, tokens } = &mut *exchange;
        pool.add_liquidity(tokens, caller, token_a, token_b, amount_a, amount_b)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn remove_liquidity(
        &self,
        caller: &Pubkey,
        token_a: &Pubkey,
        token_b: &Pubkey,
        shares: u64,
        amount_a_min: u64,
        amount_b_min: u64,
    ) -> Result<LiquidityWithdrawal, SwapError> {
        let mut exchange = self.inner.write().await;
        let Exchange { pool, tokens } = &mut *exchange;
        pool.remove_liquidity(tokens, caller, token_a, token_b, shares, amount_a_min, amount_b_min)
    }

    pub async fn swap_exact_tokens_for_tokens(
        &self,
        caller: &Pubkey,
        amount_in: u64,
        amount_out_min: u64,
        path: &[Pubkey],
    ) -> Result<SwapOutcome, SwapError> {
        let mut exchange = self.inner.write().await;
        let Exchange { pool, tokens } = &mut *exchange;
        pool.swap_exact_tokens_for_tokens(tokens, caller, amount_in, amount_out_min, path)
    }

    pub async fn get_price(
        &self,
        token_in: &Pubkey,
        token_out: &Pubkey,
    ) -> Result<u128, SwapError> {
        self.inner.read().await.pool.get_price(token_in, token_out)
    }

    pub async fn reserves(&self) -> (u64, u64) {
        self.inner.read().await.pool.reserves()
    }

    pub async fn share_balance(&self, holder: &Pubkey) -> u64 {
        self.inner.read().await.pool.balance_of(holder)
    }

    pub async fn token_balance(&self, token: &Pubkey, owner: &Pubkey) -> Result<u64, SwapError> {
        self.inner.read().await.tokens.balance_of(token, owner)
    }

    /// Runs `f` against a consistent snapshot under the read lock.
    pub async fn read<R>(&self, f: impl FnOnce(&Exchange<T>) -> R) -> R {
        f(&*self.inner.read().await)
    }

    /// Runs `f` with exclusive access, e.g. to mint on the token bank.
    pub async fn write<R>(&self, f: impl FnOnce(&mut Exchange<T>) -> R) -> R {
        f(&mut *self.inner.write().await)
    }
}
