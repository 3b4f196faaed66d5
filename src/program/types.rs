//! Type definitions for the Candy Machine program.
//!
//! This module contains the configuration enums and settings structs stored
//! in the candy machine account, and the read-only [`MintState`] snapshot the
//! mint builder works from.

use borsh::BorshDeserialize;
use chrono::{DateTime, Utc};
use solana_pubkey::Pubkey;

use crate::error::SdkError;

// ============================================================================
// Enums
// ============================================================================

/// How the end of a sale is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EndSettingType {
    /// Sale ends at a unix timestamp
    Date = 0,
    /// Sale ends after a number of mints
    Amount = 1,
}

impl TryFrom<u8> for EndSettingType {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EndSettingType::Date),
            1 => Ok(EndSettingType::Amount),
            _ => Err(SdkError::Deserialization(format!(
                "Invalid end setting type: {}",
                value
            ))),
        }
    }
}

/// Whitelist token handling on mint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum WhitelistMintMode {
    /// One whitelist token is burned per mint
    BurnEveryTime = 0,
    /// The whitelist token is only checked
    NeverBurn = 1,
}

impl TryFrom<u8> for WhitelistMintMode {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WhitelistMintMode::BurnEveryTime),
            1 => Ok(WhitelistMintMode::NeverBurn),
            _ => Err(SdkError::Deserialization(format!(
                "Invalid whitelist mint mode: {}",
                value
            ))),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Gatekeeper (captcha / identity) requirement
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize)]
pub struct GatekeeperConfig {
    /// Gatekeeper network the payer must hold a token for
    pub gatekeeper_network: Pubkey,
    /// Whether the network token expires after one mint
    pub expire_on_use: bool,
}

/// End of sale condition
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize)]
pub struct EndSettings {
    pub end_setting_type: EndSettingType,
    /// Timestamp or mint count, depending on `end_setting_type`
    pub number: u64,
}

/// Whitelist token requirement
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize)]
pub struct WhitelistMintSettings {
    pub mode: WhitelistMintMode,
    /// Whitelist token mint
    pub mint: Pubkey,
    /// Whether whitelist holders may mint before the go-live date
    pub presale: bool,
    /// Price for whitelist holders, if discounted
    pub discount_price: Option<u64>,
}

/// Hidden settings (single shared URI revealed later)
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize)]
pub struct HiddenSettings {
    pub name: String,
    pub uri: String,
    pub hash: [u8; 32],
}

/// A verified or unverified creator entry
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    pub share: u8,
}

// ============================================================================
// Mint State
// ============================================================================

/// Read-only snapshot of a candy machine's configuration.
///
/// The mint builder only branches on whether the optional settings are
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintState {
    /// Candy machine account address
    pub candy_machine: Pubkey,
    /// Candy machine authority
    pub authority: Pubkey,
    /// Treasury receiving the mint price
    pub treasury: Pubkey,
    /// SPL token used for payment; native SOL when absent
    pub token_mint: Option<Pubkey>,
    /// Price in lamports or in `token_mint` base units
    pub price: u64,
    pub items_available: u64,
    pub items_redeemed: u64,
    /// Unix timestamp when public minting opens
    pub go_live_date: Option<i64>,
    pub gatekeeper: Option<GatekeeperConfig>,
    pub end_settings: Option<EndSettings>,
    pub whitelist_mint_settings: Option<WhitelistMintSettings>,
    pub hidden_settings: Option<HiddenSettings>,
}

impl MintState {
    /// Items still available for minting.
    pub fn items_remaining(&self) -> u64 {
        self.items_available.saturating_sub(self.items_redeemed)
    }

    /// Whether every item has been minted.
    pub fn is_sold_out(&self) -> bool {
        self.items_remaining() == 0
    }

    /// Go-live date as a UTC datetime.
    pub fn go_live_at(&self) -> Option<DateTime<Utc>> {
        self.go_live_date
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
    }
}

/// Collection linkage found on-chain for a candy machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionLink {
    /// Collection PDA of the candy machine
    pub pda: Pubkey,
    /// Collection NFT mint
    pub mint: Pubkey,
}
