//! Constants for the Candy Machine program and the programs it composes with.
//!
//! This module contains program IDs, PDA seeds, Anchor names and size
//! constants matching the on-chain programs exactly.

use solana_pubkey::Pubkey;
use std::str::FromStr;

// ============================================================================
// Program IDs
// ============================================================================

lazy_static::lazy_static! {
    /// Candy Machine v2 Program ID
    pub static ref CANDY_MACHINE_PROGRAM_ID: Pubkey = Pubkey::from_str("cndy3Z4yapfJBmL3ShUp5exZKqR3z33thTzeNMm2gRZ").unwrap();

    /// Token Metadata Program ID
    pub static ref TOKEN_METADATA_PROGRAM_ID: Pubkey = Pubkey::from_str("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s").unwrap();

    /// Civic Gateway Program ID (gatekeeper network tokens)
    pub static ref GATEWAY_PROGRAM_ID: Pubkey = Pubkey::from_str("gatem74V238djXdzWnJf94Wo1DcnuGkfijbf3AuBhfs").unwrap();
}

/// SPL Token Program ID
pub const TOKEN_PROGRAM_ID: Pubkey = spl_token::ID;

/// Associated Token Account Program ID
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = spl_associated_token_account::ID;

/// System Program ID
pub const SYSTEM_PROGRAM_ID: Pubkey = solana_sdk_ids::system_program::ID;

/// Rent Sysvar ID
pub const RENT_SYSVAR_ID: Pubkey = solana_sdk_ids::sysvar::rent::ID;

/// Clock Sysvar ID
pub const CLOCK_SYSVAR_ID: Pubkey = solana_sdk_ids::sysvar::clock::ID;

/// SlotHashes Sysvar ID (the program reads it as `recent_blockhashes`)
pub const SLOT_HASHES_SYSVAR_ID: Pubkey = solana_sdk_ids::sysvar::slot_hashes::ID;

/// Instructions Sysvar ID
pub const INSTRUCTIONS_SYSVAR_ID: Pubkey = solana_sdk_ids::sysvar::instructions::ID;

// ============================================================================
// Anchor Names
// ============================================================================

/// Anchor instruction names, hashed into 8-byte discriminators.
pub mod instruction {
    pub const MINT_NFT: &str = "mint_nft";
}

/// Anchor account type names, hashed into 8-byte discriminators.
pub mod account {
    pub const CANDY_MACHINE: &str = "CandyMachine";
    pub const COLLECTION_PDA: &str = "CollectionPDA";
    pub const IDL_ACCOUNT: &str = "IdlAccount";
}

/// Seed used by Anchor for the program's IDL account.
pub const IDL_SEED: &str = "anchor:idl";

// ============================================================================
// PDA Seeds
// ============================================================================

/// Token metadata PDA prefix
pub const METADATA_SEED: &[u8] = b"metadata";
/// Master edition PDA suffix
pub const EDITION_SEED: &[u8] = b"edition";
/// Collection authority record PDA marker
pub const COLLECTION_AUTHORITY_SEED: &[u8] = b"collection_authority";
/// Candy machine creator PDA seed
pub const CANDY_MACHINE_CREATOR_SEED: &[u8] = b"candy_machine";
/// Candy machine collection PDA seed
pub const COLLECTION_SEED: &[u8] = b"collection";
/// Gateway token PDA marker
pub const GATEWAY_SEED: &[u8] = b"gateway";
/// Gateway network expire feature seed
pub const EXPIRE_SEED: &[u8] = b"expire";
/// Gateway token index (always zero for candy machine mints)
pub const GATEWAY_TOKEN_INDEX: [u8; 8] = [0; 8];

// ============================================================================
// Derivation Limits
// ============================================================================

/// Maximum length of a single PDA seed
pub const MAX_SEED_LEN: usize = 32;
/// Maximum number of seeds, including the bump
pub const MAX_SEEDS: usize = 16;

// ============================================================================
// Account Sizes
// ============================================================================

/// SPL mint account size in bytes
pub const MINT_SIZE: usize = 82;
/// Anchor account discriminator size in bytes
pub const DISCRIMINATOR_SIZE: usize = 8;
/// Collection PDA account size in bytes
pub const COLLECTION_PDA_SIZE: usize = 8 + 32 + 32;

/// Decimals of an NFT mint
pub const NFT_DECIMALS: u8 = 0;
/// Supply minted to the payer
pub const NFT_AMOUNT: u64 = 1;
