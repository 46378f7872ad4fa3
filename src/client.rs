//! Front-end session over a shared pool.
//!
//! A session moves through `Disconnected -> Connected -> TransactionPending ->
//! Settled`, and every transaction reports a typed receipt or error.

use solana_program::{msg, pubkey::Pubkey};
use thiserror::Error;

use crate::{
    config::SwapConfig,
    error::SwapError,
    liquidity::{LiquidityDeposit, LiquidityWithdrawal},
    service::SharedSwap,
    swap::SwapOutcome,
    token::TokenTransfer,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("No account connected")]
    NotConnected,
    #[error("Another transaction is still pending")]
    TransactionPending,
    #[error("Token is not part of this pool: {0}")]
    UnknownPoolToken(Pubkey),
    #[error(transparent)]
    Swap(#[from] SwapError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Funding,
    AddLiquidity,
    RemoveLiquidity,
    Swap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    /// Faucet mint of both pool tokens plus pool approval.
    Funded { amount: u64 },
    Deposited(LiquidityDeposit),
    Withdrawn(LiquidityWithdrawal),
    Swapped(SwapOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected { account: Pubkey },
    TransactionPending { account: Pubkey, kind: TransactionKind },
    Settled { account: Pubkey, receipt: Receipt },
}

/// A dropped transaction future leaves the session in `TransactionPending`;
/// `disconnect` resets it.
pub struct SwapSession {
    swap: SharedSwap,
    config: SwapConfig,
    token_a: Pubkey,
    token_b: Pubkey,
    state: SessionState,
    last_price: Option<u128>,
}

impl SwapSession {
    pub fn new(swap: SharedSwap, config: SwapConfig, token_a: Pubkey, token_b: Pubkey) -> Self {
        Self {
            swap,
            config,
            token_a,
            token_b,
            state: SessionState::Disconnected,
            last_price: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn account(&self) -> Option<Pubkey> {
        match self.state {
            SessionState::Disconnected => None,
            SessionState::Connected { account }
            | SessionState::TransactionPending { account, .. }
            | SessionState::Settled { account, .. } => Some(account),
        }
    }

    /// Last price shown to the user, `None` while the pool has no reserves.
    pub fn last_price(&self) -> Option<u128> {
        self.last_price
    }

    pub async fn connect(&mut self, account: Pubkey) -> Result<Option<u128>, ClientError> {
        if matches!(self.state, SessionState::TransactionPending { .. }) {
            return Err(ClientError::TransactionPending);
        }

        self.state = SessionState::Connected { account };
        msg!("session: connected {}", account);

        self.refresh_price().await
    }

    pub fn disconnect(&mut self) {
        self.state = SessionState::Disconnected;
    }

    /// Re-reads the spot price of token A in token B.
    pub async fn refresh_price(&mut self) -> Result<Option<u128>, ClientError> {
        self.last_price = match self.swap.get_price(&self.token_a, &self.token_b).await {
            Ok(price) => Some(price),
            Err(SwapError::EmptyPool) => None,
            Err(err) => return Err(err.into()),
        };

        Ok(self.last_price)
    }

    /// Mints test tokens and approves the pool when the account holds none of
    /// either pool token. Returns `None` when the account was already funded.
    pub async fn ensure_funded(&mut self) -> Result<Option<Receipt>, ClientError> {
        let account = self.begin(TransactionKind::Funding)?;
        let (token_a, token_b) = (self.token_a, self.token_b);
        let amount = self.config.faucet_amount;
        let allowance = self.config.approve_amount;

        let result = self
            .swap
            .write(|exchange| -> Result<Option<Receipt>, SwapError> {
                // an unreadable balance counts as unfunded
                let balance_a = exchange.tokens.balance_of(&token_a, &account).unwrap_or(0);
                let balance_b = exchange.tokens.balance_of(&token_b, &account).unwrap_or(0);
                if balance_a > 0 || balance_b > 0 {
                    return Ok(None);
                }

                let pool = *exchange.pool.address();
                for token in [token_a, token_b] {
                    exchange.tokens.mint(&token, &account, amount)?;
                    exchange.tokens.approve(&token, &account, &pool, allowance)?;
                }

                Ok(Some(Receipt::Funded { amount }))
            })
            .await;

        match result {
            Ok(Some(receipt)) => Ok(Some(self.settle(account, receipt))),
            Ok(None) => {
                self.state = SessionState::Connected { account };
                Ok(None)
            }
            Err(err) => Err(self.fail(account, err)),
        }
    }

    /// Sells `amount_in` of `token_in` for the other pool token.
    pub async fn swap(
        &mut self,
        token_in: Pubkey,
        amount_in: u64,
        amount_out_min: u64,
    ) -> Result<Receipt, ClientError> {
        let token_out = if token_in == self.token_a {
            self.token_b
        } else if token_in == self.token_b {
            self.token_a
        } else {
            return Err(ClientError::UnknownPoolToken(token_in));
        };

        let account = self.begin(TransactionKind::Swap)?;
        let result = self
            .swap
            .swap_exact_tokens_for_tokens(
                &account,
                amount_in,
                amount_out_min,
                &[token_in, token_out],
            )
            .await;

        match result {
            Ok(outcome) => {
                let receipt = self.settle(account, Receipt::Swapped(outcome));
                self.refresh_price().await?;
                Ok(receipt)
            }
            Err(err) => Err(self.fail(account, err)),
        }
    }

    pub async fn add_liquidity(
        &mut self,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<Receipt, ClientError> {
        let account = self.begin(TransactionKind::AddLiquidity)?;
        let result = self
            .swap
            .add_liquidity(&account, &self.token_a, &self.token_b, amount_a, amount_b)
            .await;

        match result {
            Ok(deposit) => {
                let receipt = self.settle(account, Receipt::Deposited(deposit));
                self.refresh_price().await?;
                Ok(receipt)
            }
            Err(err) => Err(self.fail(account, err)),
        }
    }

    pub async fn remove_liquidity(
        &mut self,
        shares: u64,
        amount_a_min: u64,
        amount_b_min: u64,
    ) -> Result<Receipt, ClientError> {
        let account = self.begin(TransactionKind::RemoveLiquidity)?;
        let result = self
            .swap
            .remove_liquidity(
                &account,
                &self.token_a,
                &self.token_b,
                shares,
                amount_a_min,
                amount_b_min,
            )
            .await;

        match result {
            Ok(withdrawal) => {
                let receipt = self.settle(account, Receipt::Withdrawn(withdrawal));
                self.refresh_price().await?;
                Ok(receipt)
            }
            Err(err) => Err(self.fail(account, err)),
        }
    }

    fn begin(&mut self, kind: TransactionKind) -> Result<Pubkey, ClientError> {
        let account = match self.state {
            SessionState::Disconnected => return Err(ClientError::NotConnected),
            SessionState::TransactionPending { .. } => return Err(ClientError::TransactionPending),
            SessionState::Connected { account } | SessionState::Settled { account, .. } => account,
        };

        self.state = SessionState::TransactionPending { account, kind };
        Ok(account)
    }

    fn settle(&mut self, account: Pubkey, receipt: Receipt) -> Receipt {
        msg!("session: {} settled {:?}", account, receipt);
        self.state = SessionState::Settled { account, receipt };
        receipt
    }

    fn fail(&mut self, account: Pubkey, err: SwapError) -> ClientError {
        msg!("session: {} transaction failed: {}", account, err);
        self.state = SessionState::Connected { account };
        err.into()
    }
}
