//! # Candy Machine SDK
//!
//! A Rust SDK for minting NFTs from a Metaplex Candy Machine (v2).
//!
//! ## Architecture
//!
//! 1. **Program**: Constants, PDAs, account decoding, instruction builders and
//!    the pure mint assembly pipeline (no I/O)
//! 2. **Network**: The `Network` trait the SDK talks to a cluster through,
//!    with a Solana RPC + pubsub implementation (feature `solana-rpc`)
//! 3. **Transactions**: Batch signing, ordered submission and confirmation
//!    watching
//! 4. **Client**: `CandyMachineClient`, tying the layers together
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use candy_machine_sdk::prelude::*;
//!
//! let client = CandyMachineClient::builder()
//!     .rpc_url(DEVNET_RPC_URL)
//!     .ws_url(DEVNET_WS_URL)
//!     .candy_machine(candy_machine)
//!     .build()?;
//!
//! let state = client.fetch_mint_state().await?;
//! println!("{} items remaining", state.items_remaining());
//!
//! let receipt = client.mint_one_token(&payer, &state).await?;
//! println!("Minted {}", receipt.mint);
//! ```

// ── Layer 1: Program ─────────────────────────────────────────────────────────

/// On-chain program interaction: constants, PDAs, accounts, instructions.
pub mod program;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: Network ─────────────────────────────────────────────────────────

/// The `Network` trait and its Solana implementation.
pub mod rpc;

// ── Layer 3: Transactions ────────────────────────────────────────────────────

/// Batch signing, submission and confirmation.
pub mod tx;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `CandyMachineClient`: the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Program types
    pub use crate::program::{
        CandyMachineAccount, CollectionLink, CollectionPdaAccount, EndSettingType, EndSettings,
        GatekeeperConfig, HiddenSettings, IdlAccount, MintContext, MintPlan, MintState, Pda,
        WhitelistMintMode, WhitelistMintSettings, CANDY_MACHINE_PROGRAM_ID,
    };

    // Errors
    pub use crate::error::{SdkError, SdkResult};

    // Network
    pub use crate::network::{DEFAULT_RPC_URL, DEFAULT_WS_URL, DEVNET_RPC_URL, DEVNET_WS_URL};
    pub use crate::rpc::{
        Network, SignatureNotification, SignatureStatus, SignatureSubscription, SubscriptionId,
    };
    #[cfg(feature = "solana-rpc")]
    pub use crate::rpc::SolanaNetwork;

    // Transactions
    pub use crate::tx::{
        ConfirmationConfig, ConfirmationState, MintReceipt, SubmissionResult, TransactionBatch,
    };

    // Client
    pub use crate::client::{CandyMachineClient, CandyMachineClientBuilder};
}
