use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    instruction::SwapInstruction,
    liquidity::{LiquidityDeposit, LiquidityWithdrawal},
    pool::SimpleSwap,
    swap::SwapOutcome,
    token::TokenTransfer,
};

/// Typed result of a processed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionOutcome {
    Deposited(LiquidityDeposit),
    Withdrawn(LiquidityWithdrawal),
    Swapped(SwapOutcome),
    Price(u128),
    AmountOut(u64),
    Done,
}

pub fn process_instruction<T: TokenTransfer + ?Sized>(
    pool: &mut SimpleSwap,
    tokens: &mut T,
    caller: &Pubkey,
    instruction_data: &[u8],
) -> Result<InstructionOutcome, ProgramError> {
    let instruction = SwapInstruction::unpack(instruction_data)?;

    execute(pool, tokens, caller, instruction)
}

pub fn execute<T: TokenTransfer + ?Sized>(
    pool: &mut SimpleSwap,
    tokens: &mut T,
    caller: &Pubkey,
    instruction: SwapInstruction,
) -> Result<InstructionOutcome, ProgramError> {
    match instruction {
        SwapInstruction::AddLiquidity { token_a, token_b, amount_a, amount_b } => {
            let deposit =
                pool.add_liquidity(tokens, caller, &token_a, &token_b, amount_a, amount_b)?;
            Ok(InstructionOutcome::Deposited(deposit))
        },
        SwapInstruction::RemoveLiquidity {
            token_a,
            token_b,
            shares,
            amount_a_min,
            amount_b_min,
        } => {
            let withdrawal = pool.remove_liquidity(
                tokens,
                caller,
                &token_a,
                &token_b,
                shares,
                amount_a_min,
                amount_b_min,
            )?;
            Ok(InstructionOutcome::Withdrawn(withdrawal))
        },
        SwapInstruction::SwapExactTokensForTokens { amount_in, amount_out_min, path } => {
            let outcome = pool.swap_exact_tokens_for_tokens(
                tokens,
                caller,
                amount_in,
                amount_out_min,
                &path,
            )?;
            Ok(InstructionOutcome::Swapped(outcome))
        },
        SwapInstruction::Approve { spender, amount } => {
            msg!("approve: {} allows {} to spend {} shares", caller, spender, amount);
            pool.approve(caller, &spender, amount);
            Ok(InstructionOutcome::Done)
        },
        SwapInstruction::Transfer { to, amount } => {
            pool.transfer(caller, &to, amount)?;
            Ok(InstructionOutcome::Done)
        },
        SwapInstruction::TransferFrom { from, to, amount } => {
            pool.transfer_from(caller, &from, &to, amount)?;
            Ok(InstructionOutcome::Done)
        },
        SwapInstruction::GetPrice { .. } | SwapInstruction::GetAmountOut { .. } => {
            process_query(pool, instruction)
        },
    }
}

/// Answers a read-only instruction without touching pool state.
pub fn process_query(
    pool: &SimpleSwap,
    instruction: SwapInstruction,
) -> Result<InstructionOutcome, ProgramError> {
    match instruction {
        SwapInstruction::GetPrice { token_in, token_out } => {
            Ok(InstructionOutcome::Price(pool.get_price(&token_in, &token_out)?))
        },
        SwapInstruction::GetAmountOut { amount_in, reserve_in, reserve_out } => {
            let amount_out = SimpleSwap::get_amount_out(amount_in, reserve_in, reserve_out)?;
            Ok(InstructionOutcome::AmountOut(amount_out))
        },
        _ => Err(ProgramError::InvalidInstructionData),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{config::SwapConfig, error::SwapError, math::SCALE, token::TokenRegistry};

    fn setup() -> (SimpleSwap, TokenRegistry, Pubkey, Pubkey, Pubkey) {
        let mut tokens = TokenRegistry::new();
        let token_a = tokens.create_token("Man One", "MAN1", 18);
        let token_b = tokens.create_token("Man Two", "MAN2", 18);
        let pool = SimpleSwap::for_program(&Pubkey::new_unique(), &SwapConfig::default());

        let user = Pubkey::new_unique();
        for token in [token_a, token_b] {
            tokens.mint(&token, &user, 10_000).unwrap();
            tokens.approve(&token, &user, pool.address(), 10_000).unwrap();
        }

        (pool, tokens, token_a, token_b, user)
    }

    #[test]
    fn processes_a_full_session() {
        let (mut pool, mut tokens, token_a, token_b, user) = setup();

        let data =
            SwapInstruction::AddLiquidity { token_a, token_b, amount_a: 10, amount_b: 5 }.pack();
        assert_eq!(
            process_instruction(&mut pool, &mut tokens, &user, &data).unwrap(),
            InstructionOutcome::Deposited(LiquidityDeposit { amount_a: 10, amount_b: 5, shares: 7 })
        );

        let data = SwapInstruction::GetPrice { token_in: token_a, token_out: token_b }.pack();
        assert_eq!(
            process_instruction(&mut pool, &mut tokens, &user, &data).unwrap(),
            InstructionOutcome::Price(SCALE / 2)
        );

        let data = SwapInstruction::SwapExactTokensForTokens {
            amount_in: 10,
            amount_out_min: 2,
            path: vec![token_a, token_b],
        }
        .pack();
        assert_eq!(
            process_instruction(&mut pool, &mut tokens, &user, &data).unwrap(),
            InstructionOutcome::Swapped(SwapOutcome { amount_in: 10, amount_out: 2 })
        );

        let data = SwapInstruction::RemoveLiquidity {
            token_a,
            token_b,
            shares: 7,
            amount_a_min: 20,
            amount_b_min: 3,
        }
        .pack();
        assert_eq!(
            process_instruction(&mut pool, &mut tokens, &user, &data).unwrap(),
            InstructionOutcome::Withdrawn(LiquidityWithdrawal { amount_a: 20, amount_b: 3 })
        );
        assert!(pool.is_consistent());
    }

    #[test]
    fn domain_errors_become_custom_codes() {
        let (mut pool, mut tokens, token_a, _, user) = setup();

        let data = SwapInstruction::SwapExactTokensForTokens {
            amount_in: 1,
            amount_out_min: 0,
            path: vec![token_a],
        }
        .pack();

        assert_eq!(
            process_instruction(&mut pool, &mut tokens, &user, &data),
            Err(SwapError::InvalidPath.into())
        );
    }

    #[test]
    fn amount_out_query_needs_no_pool_state() {
        let (mut pool, mut tokens, _, _, user) = setup();

        let data =
            SwapInstruction::GetAmountOut { amount_in: 10, reserve_in: 2, reserve_out: 4 }.pack();

        assert_eq!(
            process_instruction(&mut pool, &mut tokens, &user, &data).unwrap(),
            InstructionOutcome::AmountOut(3)
        );
    }

    #[test]
    fn share_token_instructions() {
        let (mut pool, mut tokens, token_a, token_b, user) = setup();
        let spender = Pubkey::new_unique();
        let receiver = Pubkey::new_unique();

        let data =
            SwapInstruction::AddLiquidity { token_a, token_b, amount_a: 100, amount_b: 100 }.pack();
        process_instruction(&mut pool, &mut tokens, &user, &data).unwrap();

        let data = SwapInstruction::Approve { spender, amount: 30 }.pack();
        process_instruction(&mut pool, &mut tokens, &user, &data).unwrap();
        assert_eq!(pool.allowance(&user, &spender), 30);

        let data = SwapInstruction::TransferFrom { from: user, to: receiver, amount: 40 }.pack();
        assert_eq!(
            process_instruction(&mut pool, &mut tokens, &spender, &data),
            Err(SwapError::InsufficientAllowance.into())
        );

        let data = SwapInstruction::TransferFrom { from: user, to: receiver, amount: 30 }.pack();
        process_instruction(&mut pool, &mut tokens, &spender, &data).unwrap();

        let data = SwapInstruction::Transfer { to: receiver, amount: 70 }.pack();
        process_instruction(&mut pool, &mut tokens, &user, &data).unwrap();

        assert_eq!(pool.balance_of(&receiver), 100);
        assert_eq!(pool.balance_of(&user), 0);
        assert!(pool.is_consistent());
    }

    #[test]
    fn pool_survives_pack_and_unpack() {
        let (mut pool, mut tokens, token_a, token_b, user) = setup();
        let data =
            SwapInstruction::AddLiquidity { token_a, token_b, amount_a: 10, amount_b: 5 }.pack();
        process_instruction(&mut pool, &mut tokens, &user, &data).unwrap();

        let restored = SimpleSwap::unpack(&pool.pack().unwrap()).unwrap();

        assert_eq!(restored, pool);
        assert_eq!(SimpleSwap::unpack(&[1, 2, 3]), Err(ProgramError::InvalidAccountData));
    }
}
