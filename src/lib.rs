pub mod client;
pub mod config;
pub mod error;
pub mod instruction;
pub mod liquidity;
pub mod math;
pub mod pool;
pub mod processor;
pub mod service;
pub mod state;
pub mod swap;
pub mod token;

pub use error::SwapError;
pub use instruction::SwapInstruction;
pub use pool::{pool_address, SimpleSwap};
pub use processor::{process_instruction, InstructionOutcome};
pub use service::SharedSwap;
pub use token::{FungibleLedger, TokenRegistry, TokenTransfer};
