//! On-chain program interaction module for the Candy Machine.
//!
//! Addresses, account decoding, instruction builders and the mint
//! transaction assembly pipeline. Nothing in this module performs I/O.

pub mod accounts;
pub mod builder;
pub mod constants;
pub mod instructions;
pub mod pda;
pub mod types;

// Re-export commonly used items
pub use accounts::{
    account_discriminator, instruction_discriminator, CandyMachineAccount, CandyMachineData,
    CollectionPdaAccount, IdlAccount,
};
pub use builder::{build_mint_plan, MintContext, MintPlan};
pub use constants::*;
pub use instructions::*;
pub use pda::*;
pub use types::*;
