use solana_program::{msg, pubkey::Pubkey};

use crate::{error::SwapError, math, pool::SimpleSwap, token::TokenTransfer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    pub amount_in: u64,
    pub amount_out: u64,
}

impl SimpleSwap {
    /// Sells exactly `amount_in` of `path[0]` for `path[1]`.
    pub fn swap_exact_tokens_for_tokens<T: TokenTransfer + ?Sized>(
        &mut self,
        tokens: &mut T,
        caller: &Pubkey,
        amount_in: u64,
        amount_out_min: u64,
        path: &[Pubkey],
    ) -> Result<SwapOutcome, SwapError> {
        let [token_in, token_out] = path else {
            return Err(SwapError::InvalidPath);
        };

        let side_in = self
            .state
            .orient(token_in, token_out)
            .ok_or(SwapError::InvalidPath)?;

        let reserve_in = self.state.reserve(side_in);
        let reserve_out = self.state.reserve(side_in.other());

        if reserve_in == 0 || reserve_out == 0 {
            return Err(SwapError::EmptyPool);
        }

        let amount_out = math::amount_out(amount_in, reserve_in, reserve_out)?;

        if amount_out < amount_out_min {
            return Err(SwapError::SlippageExceeded);
        }

        let mut next = self.state.clone();
        next.apply_swap(side_in, amount_in, amount_out)?;

        tokens.can_pull(token_in, &self.address, caller, amount_in)?;
        if tokens.balance_of(token_out, &self.address)? < amount_out {
            return Err(SwapError::InsufficientBalance);
        }

        tokens.transfer_from(token_in, &self.address, caller, &self.address, amount_in)?;
        if let Err(err) = tokens.transfer(token_out, &self.address, caller, amount_out) {
            tokens.transfer(token_in, &self.address, caller, amount_in)?;
            return Err(err);
        }

        self.state = next;

        msg!(
            "swap: {} sold {} of {} for {} of {}",
            caller,
            amount_in,
            token_in,
            amount_out,
            token_out
        );

        Ok(SwapOutcome {
            amount_in,
            amount_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        config::SwapConfig,
        math::SCALE,
        token::{FailingTransfers, TokenRegistry},
    };

    fn pool_with_reserves(a: u64, b: u64) -> (SimpleSwap, TokenRegistry, Pubkey, Pubkey, Pubkey) {
        let mut tokens = TokenRegistry::new();
        let token_a = tokens.create_token("Man One", "MAN1", 18);
        let token_b = tokens.create_token("Man Two", "MAN2", 18);
        let mut pool = SimpleSwap::new(Pubkey::new_unique(), &SwapConfig::default());

        let user = Pubkey::new_unique();
        for token in [token_a, token_b] {
            tokens.mint(&token, &user, 1_000).unwrap();
            tokens.approve(&token, &user, pool.address(), u64::MAX).unwrap();
        }
        pool.add_liquidity(&mut tokens, &user, &token_a, &token_b, a, b)
            .unwrap();

        (pool, tokens, token_a, token_b, user)
    }

    #[test]
    fn swap_a_for_b() {
        let (mut pool, mut tokens, token_a, token_b, user) = pool_with_reserves(10, 5);

        let outcome = pool
            .swap_exact_tokens_for_tokens(&mut tokens, &user, 10, 0, &[token_a, token_b])
            .unwrap();

        assert_eq!(outcome, SwapOutcome { amount_in: 10, amount_out: 2 });
        assert_eq!(pool.reserves(), (20, 3));
        assert_eq!(tokens.balance_of(&token_a, &user), Ok(980));
        assert_eq!(tokens.balance_of(&token_b, &user), Ok(997));
        assert_eq!(tokens.balance_of(&token_b, pool.address()), Ok(3));
        assert!(pool.is_consistent());
    }

    #[test]
    fn swap_b_for_a() {
        let (mut pool, mut tokens, token_a, token_b, user) = pool_with_reserves(10, 5);

        let outcome = pool
            .swap_exact_tokens_for_tokens(&mut tokens, &user, 5, 5, &[token_b, token_a])
            .unwrap();

        assert_eq!(outcome.amount_out, 5);
        assert_eq!(pool.reserves(), (5, 10));
    }

    #[test]
    fn swap_moves_price() {
        let (mut pool, mut tokens, token_a, token_b, user) = pool_with_reserves(10, 5);
        assert_eq!(pool.get_price(&token_a, &token_b), Ok(SCALE / 2));
        assert_eq!(pool.get_price(&token_a, &token_b), Ok(SCALE / 2));

        pool.swap_exact_tokens_for_tokens(&mut tokens, &user, 10, 0, &[token_a, token_b])
            .unwrap();

        assert_eq!(pool.get_price(&token_a, &token_b), Ok(3 * SCALE / 20));
    }

    #[test]
    fn rejects_bad_paths() {
        let (mut pool, mut tokens, token_a, token_b, user) = pool_with_reserves(10, 5);
        let other = tokens.create_token("Other", "OTH", 18);

        for path in [
            vec![],
            vec![token_a],
            vec![token_a, token_a],
            vec![token_a, other],
            vec![token_a, token_b, token_a],
        ] {
            assert_eq!(
                pool.swap_exact_tokens_for_tokens(&mut tokens, &user, 10, 0, &path),
                Err(SwapError::InvalidPath)
            );
        }
        assert_eq!(pool.reserves(), (10, 5));
    }

    #[test]
    fn slippage_guard_leaves_state() {
        let (mut pool, mut tokens, token_a, token_b, user) = pool_with_reserves(10, 5);

        assert_eq!(
            pool.swap_exact_tokens_for_tokens(&mut tokens, &user, 10, 3, &[token_a, token_b]),
            Err(SwapError::SlippageExceeded)
        );
        assert_eq!(pool.reserves(), (10, 5));
        assert_eq!(tokens.balance_of(&token_a, &user), Ok(990));
    }

    #[test]
    fn zero_input_is_invalid() {
        let (mut pool, mut tokens, token_a, token_b, user) = pool_with_reserves(10, 5);

        assert_eq!(
            pool.swap_exact_tokens_for_tokens(&mut tokens, &user, 0, 0, &[token_a, token_b]),
            Err(SwapError::InvalidAmount)
        );
    }

    #[test]
    fn unfunded_caller_cannot_swap() {
        let (mut pool, mut tokens, token_a, token_b, _) = pool_with_reserves(10, 5);
        let stranger = Pubkey::new_unique();

        assert_eq!(
            pool.swap_exact_tokens_for_tokens(&mut tokens, &stranger, 10, 0, &[token_a, token_b]),
            Err(SwapError::InsufficientBalance)
        );
        assert_eq!(pool.reserves(), (10, 5));
    }

    #[test]
    fn uninitialized_pool_has_no_path() {
        let mut tokens = TokenRegistry::new();
        let token_a = tokens.create_token("Man One", "MAN1", 18);
        let token_b = tokens.create_token("Man Two", "MAN2", 18);
        let mut pool = SimpleSwap::new(Pubkey::new_unique(), &SwapConfig::default());

        assert_eq!(
            pool.swap_exact_tokens_for_tokens(
                &mut tokens,
                &Pubkey::new_unique(),
                1,
                0,
                &[token_a, token_b]
            ),
            Err(SwapError::InvalidPath)
        );
    }

    #[test]
    fn failed_payout_returns_the_input() {
        let (mut pool, tokens, token_a, token_b, user) = pool_with_reserves(10, 5);
        let before = pool.clone();
        let mut tokens = FailingTransfers::new(tokens);
        tokens.failing = Some(token_b);

        assert_eq!(
            pool.swap_exact_tokens_for_tokens(&mut tokens, &user, 10, 0, &[token_a, token_b]),
            Err(SwapError::InsufficientBalance)
        );
        assert_eq!(pool, before);
        assert!(pool.is_consistent());
        assert_eq!(tokens.inner.balance_of(&token_a, &user), Ok(990));
        assert_eq!(tokens.inner.balance_of(&token_a, pool.address()), Ok(10));
        assert_eq!(tokens.inner.balance_of(&token_b, pool.address()), Ok(5));
    }
}
