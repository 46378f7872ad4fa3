use solana_program::{msg, pubkey::Pubkey};

use crate::{
    error::SwapError,
    math,
    pool::SimpleSwap,
    state::Side,
    token::TokenTransfer,
};

/// Amounts are reported in the caller's pair order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityDeposit {
    pub amount_a: u64,
    pub amount_b: u64,
    pub shares: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityWithdrawal {
    pub amount_a: u64,
    pub amount_b: u64,
}

impl SimpleSwap {
    /// Deposits up to `amount_a`/`amount_b` and mints shares to `caller`.
    ///
    /// The first deposit into an empty pool fixes the pair (once) and mints
    /// `sqrt(amount_a * amount_b)` shares. Later deposits keep the reserve
    /// ratio: the desired amounts act as maxima and the complementary amount
    /// is derived from the current reserves.
    pub fn add_liquidity<T: TokenTransfer + ?Sized>(
        &mut self,
        tokens: &mut T,
        caller: &Pubkey,
        token_a: &Pubkey,
        token_b: &Pubkey,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<LiquidityDeposit, SwapError> {
        if token_a == token_b {
            return Err(SwapError::IdenticalTokens);
        }

        if amount_a == 0 || amount_b == 0 {
            return Err(SwapError::InvalidAmount);
        }

        // caller order -> pool order
        let side = if self.state.is_active() {
            self.state
                .orient(token_a, token_b)
                .ok_or(SwapError::TokenMismatch)?
        } else {
            Side::A
        };

        let (desired_a, desired_b) = match side {
            Side::A => (amount_a, amount_b),
            Side::B => (amount_b, amount_a),
        };

        let (take_a, take_b, shares) = if self.state.total_shares == 0 {
            (desired_a, desired_b, math::initial_shares(desired_a, desired_b)?)
        } else {
            let reserve_a = self.state.reserve_a;
            let reserve_b = self.state.reserve_b;

            let b_needed = math::quote(desired_a, reserve_a, reserve_b)?;
            let (take_a, take_b) = if b_needed <= desired_b {
                (desired_a, b_needed)
            } else {
                (math::quote(desired_b, reserve_b, reserve_a)?, desired_b)
            };

            let shares = math::proportional_shares(
                take_a,
                take_b,
                reserve_a,
                reserve_b,
                self.state.total_shares,
            )?;

            (take_a, take_b, shares)
        };

        if take_a == 0 || take_b == 0 || shares == 0 {
            return Err(SwapError::InsufficientLiquidityMinted);
        }

        let mut next = self.state.clone();
        match side {
            Side::A => next.activate(*token_a, *token_b),
            Side::B => next.activate(*token_b, *token_a),
        }
        next.deposit(take_a, take_b, shares)?;

        let mut next_shares = self.shares.clone();
        next_shares.mint(caller, shares)?;

        let (pool_token_a, pool_token_b) = (next.token_a, next.token_b);

        tokens.can_pull(&pool_token_a, &self.address, caller, take_a)?;
        tokens.can_pull(&pool_token_b, &self.address, caller, take_b)?;

        tokens.transfer_from(&pool_token_a, &self.address, caller, &self.address, take_a)?;
        if let Err(err) =
            tokens.transfer_from(&pool_token_b, &self.address, caller, &self.address, take_b)
        {
            tokens.transfer(&pool_token_a, &self.address, caller, take_a)?;
            return Err(err);
        }

        self.state = next;
        self.shares = next_shares;

        msg!(
            "add_liquidity: {} deposited {}/{} and received {} shares",
            caller,
            take_a,
            take_b,
            shares
        );

        let (amount_a, amount_b) = match side {
            Side::A => (take_a, take_b),
            Side::B => (take_b, take_a),
        };

        Ok(LiquidityDeposit {
            amount_a,
            amount_b,
            shares,
        })
    }

    /// Burns `share_amount` of the caller's shares and pays out the
    /// proportional part of both reserves.
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity<T: TokenTransfer + ?Sized>(
        &mut self,
        tokens: &mut T,
        caller: &Pubkey,
        token_a: &Pubkey,
        token_b: &Pubkey,
        share_amount: u64,
        amount_a_min: u64,
        amount_b_min: u64,
    ) -> Result<LiquidityWithdrawal, SwapError> {
        if share_amount == 0 {
            return Err(SwapError::InvalidAmount);
        }

        if self.state.total_shares == 0 {
            return Err(SwapError::EmptyPool);
        }

        let side = self
            .state
            .orient(token_a, token_b)
            .ok_or(SwapError::TokenMismatch)?;

        if self.shares.balance_of(caller) < share_amount {
            return Err(SwapError::InsufficientShares);
        }

        let total_shares = self.state.total_shares;
        let a_out = math::redemption(share_amount, self.state.reserve_a, total_shares)?;
        let b_out = math::redemption(share_amount, self.state.reserve_b, total_shares)?;

        let (amount_a, amount_b) = match side {
            Side::A => (a_out, b_out),
            Side::B => (b_out, a_out),
        };

        if amount_a < amount_a_min || amount_b < amount_b_min {
            return Err(SwapError::SlippageExceeded);
        }

        let mut next = self.state.clone();
        next.withdraw(a_out, b_out, share_amount)?;

        let (pool_token_a, pool_token_b) = (self.state.token_a, self.state.token_b);

        if tokens.balance_of(&pool_token_a, &self.address)? < a_out
            || tokens.balance_of(&pool_token_b, &self.address)? < b_out
        {
            return Err(SwapError::InsufficientBalance);
        }

        let mut next_shares = self.shares.clone();
        next_shares.burn(caller, share_amount)?;

        tokens.transfer(&pool_token_a, &self.address, caller, a_out)?;
        if let Err(err) = tokens.transfer(&pool_token_b, &self.address, caller, b_out) {
            tokens.transfer(&pool_token_a, caller, &self.address, a_out)?;
            return Err(err);
        }

        self.state = next;
        self.shares = next_shares;

        msg!(
            "remove_liquidity: {} burned {} shares for {}/{}",
            caller,
            share_amount,
            a_out,
            b_out
        );

        Ok(LiquidityWithdrawal { amount_a, amount_b })
    }
}
