//! Error types for the Candy Machine SDK.

use solana_pubkey::Pubkey;
use solana_signature::Signature;
use thiserror::Error;

/// SDK-specific errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// A PDA seed is longer than the runtime allows, or there are too many seeds.
    #[error("Seed too long: {seeds} seeds, longest {longest} bytes (max {max_seeds} seeds of {max_len} bytes)", max_seeds = crate::program::constants::MAX_SEEDS - 1, max_len = crate::program::constants::MAX_SEED_LEN)]
    SeedTooLong { seeds: usize, longest: usize },

    /// No bump seed produced an off-curve address
    #[error("No viable bump seed for program {0}")]
    NoViableBump(Pubkey),

    /// The program has no published IDL account
    #[error("IDL not found for program {0}")]
    IdlNotFound(Pubkey),

    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Invalid account discriminator
    #[error("Invalid account discriminator: expected {expected}, got {actual}")]
    InvalidDiscriminator {
        expected: String,
        actual: String,
    },

    /// Invalid data length
    #[error("Invalid data length: expected {expected}, got {actual}")]
    InvalidDataLength {
        expected: usize,
        actual: usize,
    },

    /// Malformed account data
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// An SPL instruction builder rejected its arguments
    #[error("Instruction error: {0}")]
    Instruction(String),

    /// Signing a transaction failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// RPC client error
    #[cfg(feature = "solana-rpc")]
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    /// Network error reported by a `Network` implementation
    #[error("Network error: {0}")]
    Network(String),

    /// Signature subscription could not be established
    #[error("Subscription error: {0}")]
    Subscription(String),

    /// The network refused or failed to relay a transaction
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// The transaction executed and the program rejected it
    #[error("Transaction {signature} rejected: {error}")]
    Rejected { signature: Signature, error: String },

    /// No terminal status was observed before the deadline.
    ///
    /// The outcome is unknown: the transaction may still land.
    #[error("Transaction {signature} not confirmed before the deadline; outcome unknown")]
    TimedOut { signature: Signature },

    /// Client misconfiguration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Quantity must be at least one
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(usize),

    /// Arithmetic overflow
    #[error("Arithmetic overflow")]
    Overflow,
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;
