use thiserror::Error;

use solana_program::program_error::ProgramError;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    // Error 0
    #[error("Token pair does not match the pool pair")]
    InvalidToken,
    // Error 1
    #[error("Pool has no reserves")]
    EmptyPool,
    // Error 2
    #[error("Amount must be greater than zero")]
    InvalidAmount,
    // Error 3
    #[error("Share balance is lower than the amount to burn")]
    InsufficientShares,
    // Error 4
    #[error("Slippage tolerance exceeded: output amount is below the minimum specified")]
    SlippageExceeded,
    // Error 5
    #[error("Swap path must be the two pool tokens")]
    InvalidPath,
    // Error 6
    #[error("Supplied tokens do not match the tokens fixed at pool creation")]
    TokenMismatch,
    // Error 7
    #[error("Pool tokens must be different")]
    IdenticalTokens,
    // Error 8
    #[error("Deposit is too small to mint any shares")]
    InsufficientLiquidityMinted,
    // Error 9
    #[error("Insufficient token balance")]
    InsufficientBalance,
    // Error 10
    #[error("Insufficient allowance")]
    InsufficientAllowance,
    // Error 11
    #[error("Token is not registered")]
    UnknownToken,
    // Error 12
    #[error("Arithmetic overflow")]
    Overflow,
}

impl From<SwapError> for ProgramError {
    fn from(error: SwapError) -> Self {
        ProgramError::Custom(error as u32)
    }
}
