use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use borsh::{BorshDeserialize, BorshSerialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapInstruction {
    AddLiquidity {
        token_a: Pubkey,
        token_b: Pubkey,
        amount_a: u64,
        amount_b: u64,
    },
    RemoveLiquidity {
        token_a: Pubkey,
        token_b: Pubkey,
        shares: u64,
        amount_a_min: u64,
        amount_b_min: u64,
    },
    SwapExactTokensForTokens {
        amount_in: u64,
        amount_out_min: u64,
        path: Vec<Pubkey>,
    },
    Approve {
        spender: Pubkey,
        amount: u64,
    },
    Transfer {
        to: Pubkey,
        amount: u64,
    },
    TransferFrom {
        from: Pubkey,
        to: Pubkey,
        amount: u64,
    },
    GetPrice {
        token_in: Pubkey,
        token_out: Pubkey,
    },
    GetAmountOut {
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
    },
}

impl SwapInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        let (&discriminator, rest) = input.split_first()
            .ok_or(ProgramError::InvalidInstructionData)?;

        Ok(
            match discriminator {
                0 => {
                    let payload = AddLiquidityPayload::try_from_slice(rest)
                        .map_err(|_| ProgramError::InvalidInstructionData)?;

                    Self::AddLiquidity {
                        token_a: payload.token_a,
                        token_b: payload.token_b,
                        amount_a: payload.amount_a,
                        amount_b: payload.amount_b,
                    }
                },
                1 => {
                    let payload = RemoveLiquidityPayload::try_from_slice(rest)
                        .map_err(|_| ProgramError::InvalidInstructionData)?;

                    Self::RemoveLiquidity {
                        token_a: payload.token_a,
                        token_b: payload.token_b,
                        shares: payload.shares,
                        amount_a_min: payload.amount_a_min,
                        amount_b_min: payload.amount_b_min,
                    }
                },
                2 => {
                    let payload = SwapPayload::try_from_slice(rest)
                        .map_err(|_| ProgramError::InvalidInstructionData)?;

                    Self::SwapExactTokensForTokens {
                        amount_in: payload.amount_in,
                        amount_out_min: payload.amount_out_min,
                        path: payload.path,
                    }
                },
                3 => {
                    let payload = ApprovePayload::try_from_slice(rest)
                        .map_err(|_| ProgramError::InvalidInstructionData)?;

                    Self::Approve {
                        spender: payload.spender,
                        amount: payload.amount,
                    }
                },
                4 => {
                    let payload = TransferPayload::try_from_slice(rest)
                        .map_err(|_| ProgramError::InvalidInstructionData)?;

                    Self::Transfer {
                        to: payload.to,
                        amount: payload.amount,
                    }
                },
                5 => {
                    let payload = TransferFromPayload::try_from_slice(rest)
                        .map_err(|_| ProgramError::InvalidInstructionData)?;

                    Self::TransferFrom {
                        from: payload.from,
                        to: payload.to,
                        amount: payload.amount,
                    }
                },
                6 => {
                    let payload = GetPricePayload::try_from_slice(rest)
                        .map_err(|_| ProgramError::InvalidInstructionData)?;

                    Self::GetPrice {
                        token_in: payload.token_in,
                        token_out: payload.token_out,
                    }
                },
                7 => {
                    let payload = GetAmountOutPayload::try_from_slice(rest)
                        .map_err(|_| ProgramError::InvalidInstructionData)?;

                    Self::GetAmountOut {
                        amount_in: payload.amount_in,
                        reserve_in: payload.reserve_in,
                        reserve_out: payload.reserve_out,
                    }
                },

                _ => return Err(ProgramError::InvalidInstructionData)
            }
        )
    }

    /// Encodes the instruction as discriminator byte + borsh payload.
    pub fn pack(&self) -> Vec<u8> {
        let (discriminator, payload) = match self.clone() {
            Self::AddLiquidity { token_a, token_b, amount_a, amount_b } => (
                0,
                borsh::to_vec(&AddLiquidityPayload { token_a, token_b, amount_a, amount_b }),
            ),
            Self::RemoveLiquidity { token_a, token_b, shares, amount_a_min, amount_b_min } => (
                1,
                borsh::to_vec(&RemoveLiquidityPayload {
                    token_a,
                    token_b,
                    shares,
                    amount_a_min,
                    amount_b_min,
                }),
            ),
            Self::SwapExactTokensForTokens { amount_in, amount_out_min, path } => (
                2,
                borsh::to_vec(&SwapPayload { amount_in, amount_out_min, path }),
            ),
            Self::Approve { spender, amount } => (
                3,
                borsh::to_vec(&ApprovePayload { spender, amount }),
            ),
            Self::Transfer { to, amount } => (
                4,
                borsh::to_vec(&TransferPayload { to, amount }),
            ),
            Self::TransferFrom { from, to, amount } => (
                5,
                borsh::to_vec(&TransferFromPayload { from, to, amount }),
            ),
            Self::GetPrice { token_in, token_out } => (
                6,
                borsh::to_vec(&GetPricePayload { token_in, token_out }),
            ),
            Self::GetAmountOut { amount_in, reserve_in, reserve_out } => (
                7,
                borsh::to_vec(&GetAmountOutPayload { amount_in, reserve_in, reserve_out }),
            ),
        };

        let mut data = vec![discriminator];
        // writing into a Vec cannot fail
        data.extend(payload.unwrap_or_default());
        data
    }

    /// Whether the instruction only reads pool state.
    pub fn is_query(&self) -> bool {
        matches!(self, Self::GetPrice { .. } | Self::GetAmountOut { .. })
    }
}

#[derive(BorshSerialize, BorshDeserialize)]
struct AddLiquidityPayload {
    token_a: Pubkey,
    token_b: Pubkey,
    amount_a: u64,
    amount_b: u64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct RemoveLiquidityPayload {
    token_a: Pubkey,
    token_b: Pubkey,
    shares: u64,
    amount_a_min: u64,
    amount_b_min: u64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct SwapPayload {
    amount_in: u64,
    amount_out_min: u64,
    path: Vec<Pubkey>,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct ApprovePayload {
    spender: Pubkey,
    amount: u64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct TransferPayload {
    to: Pubkey,
    amount: u64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct TransferFromPayload {
    from: Pubkey,
    to: Pubkey,
    amount: u64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct GetPricePayload {
    token_in: Pubkey,
    token_out: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct GetAmountOutPayload {
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
}
