//! Account structures and deserialization for the Candy Machine program.
//!
//! Accounts are Anchor accounts: an 8-byte discriminator
//! (`sha256("account:<Name>")[..8]`) followed by Borsh-encoded fields.

use borsh::BorshDeserialize;
use sha2::{Digest, Sha256};
use solana_pubkey::Pubkey;

use crate::error::{SdkError, SdkResult};
use crate::program::constants::{account, DISCRIMINATOR_SIZE};
use crate::program::types::{
    Creator, EndSettings, GatekeeperConfig, HiddenSettings, MintState, WhitelistMintSettings,
};

/// Anchor discriminator for an account type.
pub fn account_discriminator(name: &str) -> [u8; 8] {
    sighash("account", name)
}

/// Anchor discriminator for an instruction.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    sighash("global", name)
}

fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("{}:{}", namespace, name).as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

fn check_discriminator(data: &[u8], name: &str) -> SdkResult<()> {
    if data.len() < DISCRIMINATOR_SIZE {
        return Err(SdkError::InvalidDataLength {
            expected: DISCRIMINATOR_SIZE,
            actual: data.len(),
        });
    }

    let expected = account_discriminator(name);
    if data[..DISCRIMINATOR_SIZE] != expected {
        return Err(SdkError::InvalidDiscriminator {
            expected: hex::encode(expected),
            actual: hex::encode(&data[..DISCRIMINATOR_SIZE]),
        });
    }
    Ok(())
}

/// Check the discriminator, then Borsh-decode the fields after it.
///
/// Trailing bytes are allowed: Anchor accounts are allocated with padding
/// and the candy machine stores its config lines after the data struct.
fn decode<T: BorshDeserialize>(data: &[u8], name: &str) -> SdkResult<T> {
    check_discriminator(data, name)?;
    let mut body = &data[DISCRIMINATOR_SIZE..];
    T::deserialize(&mut body).map_err(|e| SdkError::Deserialization(e.to_string()))
}

// ============================================================================
// Candy Machine Account
// ============================================================================

/// Candy machine configuration data
#[derive(Debug, Clone, BorshDeserialize)]
pub struct CandyMachineData {
    pub uuid: String,
    pub price: u64,
    pub symbol: String,
    pub seller_fee_basis_points: u16,
    pub max_supply: u64,
    pub is_mutable: bool,
    pub retain_authority: bool,
    pub go_live_date: Option<i64>,
    pub end_settings: Option<EndSettings>,
    pub creators: Vec<Creator>,
    pub hidden_settings: Option<HiddenSettings>,
    pub whitelist_mint_settings: Option<WhitelistMintSettings>,
    pub items_available: u64,
    pub gatekeeper: Option<GatekeeperConfig>,
}

/// Candy machine account
///
/// Layout (Borsh, after the discriminator):
/// - authority (32)
/// - wallet (32)
/// - token_mint (Option<Pubkey>)
/// - items_redeemed (u64)
/// - data (CandyMachineData)
#[derive(Debug, Clone, BorshDeserialize)]
pub struct CandyMachineAccount {
    pub authority: Pubkey,
    /// Treasury wallet
    pub wallet: Pubkey,
    pub token_mint: Option<Pubkey>,
    pub items_redeemed: u64,
    pub data: CandyMachineData,
}

impl CandyMachineAccount {
    /// Deserialize from account data
    pub fn deserialize(data: &[u8]) -> SdkResult<Self> {
        decode(data, account::CANDY_MACHINE)
    }

    /// Check if account data has the candy machine discriminator
    pub fn is_candy_machine_account(data: &[u8]) -> bool {
        data.len() >= DISCRIMINATOR_SIZE
            && data[..DISCRIMINATOR_SIZE] == account_discriminator(account::CANDY_MACHINE)
    }

    /// Snapshot the fields the mint builder needs.
    pub fn into_mint_state(self, candy_machine: Pubkey) -> MintState {
        MintState {
            candy_machine,
            authority: self.authority,
            treasury: self.wallet,
            token_mint: self.token_mint,
            price: self.data.price,
            items_available: self.data.items_available,
            items_redeemed: self.items_redeemed,
            go_live_date: self.data.go_live_date,
            gatekeeper: self.data.gatekeeper,
            end_settings: self.data.end_settings,
            whitelist_mint_settings: self.data.whitelist_mint_settings,
            hidden_settings: self.data.hidden_settings,
        }
    }
}

// ============================================================================
// Collection PDA Account (72 bytes)
// ============================================================================

/// Collection PDA account - links a candy machine to a collection mint
///
/// Layout:
/// - [0..8]   discriminator (8 bytes)
/// - [8..40]  mint (32 bytes)
/// - [40..72] candy_machine (32 bytes)
#[derive(Debug, Clone, BorshDeserialize)]
pub struct CollectionPdaAccount {
    pub mint: Pubkey,
    pub candy_machine: Pubkey,
}

impl CollectionPdaAccount {
    /// Deserialize from account data
    pub fn deserialize(data: &[u8]) -> SdkResult<Self> {
        decode(data, account::COLLECTION_PDA)
    }
}

// ============================================================================
// IDL Account
// ============================================================================

/// Anchor IDL account
///
/// Layout:
/// - [0..8]   discriminator (8 bytes)
/// - [8..40]  authority (32 bytes)
/// - [40..44] data length (u32)
/// - [44..]   zlib-compressed IDL JSON
#[derive(Debug, Clone, BorshDeserialize)]
pub struct IdlAccount {
    pub authority: Pubkey,
    /// Compressed IDL bytes
    pub data: Vec<u8>,
}

impl IdlAccount {
    /// Deserialize from account data
    pub fn deserialize(data: &[u8]) -> SdkResult<Self> {
        decode(data, account::IDL_ACCOUNT)
    }
}
