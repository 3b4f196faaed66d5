//! PDA (Program Derived Address) derivation functions.
//!
//! Every named derivation is a fixed seed template over [`derive`], which
//! validates seed limits before searching for a bump.

use solana_pubkey::Pubkey;

use crate::error::{SdkError, SdkResult};
use crate::program::constants::{
    ASSOCIATED_TOKEN_PROGRAM_ID, CANDY_MACHINE_CREATOR_SEED, CANDY_MACHINE_PROGRAM_ID,
    COLLECTION_AUTHORITY_SEED, COLLECTION_SEED, EDITION_SEED, EXPIRE_SEED, GATEWAY_PROGRAM_ID,
    GATEWAY_SEED, GATEWAY_TOKEN_INDEX, IDL_SEED, MAX_SEEDS, MAX_SEED_LEN, METADATA_SEED,
    TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID,
};

/// Derive a program address and its bump from `seeds`.
///
/// Fails with [`SdkError::SeedTooLong`] when a seed exceeds 32 bytes or when
/// more than 15 seeds are given (the bump takes the last slot).
pub fn derive(program_id: &Pubkey, seeds: &[&[u8]]) -> SdkResult<(Pubkey, u8)> {
    let longest = seeds.iter().map(|s| s.len()).max().unwrap_or(0);
    if seeds.len() >= MAX_SEEDS || longest > MAX_SEED_LEN {
        return Err(SdkError::SeedTooLong {
            seeds: seeds.len(),
            longest,
        });
    }

    Pubkey::try_find_program_address(seeds, program_id)
        .ok_or(SdkError::NoViableBump(*program_id))
}

/// Get the associated token account for an owner and mint.
///
/// Seeds: [owner, token_program, mint] under the associated token program
pub fn get_token_wallet(owner: &Pubkey, mint: &Pubkey) -> SdkResult<(Pubkey, u8)> {
    derive(
        &ASSOCIATED_TOKEN_PROGRAM_ID,
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
    )
}

/// Get the Metadata PDA for a mint.
///
/// Seeds: ["metadata", token_metadata_program, mint]
pub fn get_metadata_pda(mint: &Pubkey) -> SdkResult<(Pubkey, u8)> {
    derive(
        &TOKEN_METADATA_PROGRAM_ID,
        &[METADATA_SEED, TOKEN_METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
    )
}

/// Get the Master Edition PDA for a mint.
///
/// Seeds: ["metadata", token_metadata_program, mint, "edition"]
pub fn get_master_edition_pda(mint: &Pubkey) -> SdkResult<(Pubkey, u8)> {
    derive(
        &TOKEN_METADATA_PROGRAM_ID,
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
    )
}

/// Get the Candy Machine creator PDA (the program's signing authority).
///
/// Seeds: ["candy_machine", candy_machine]
pub fn get_candy_machine_creator_pda(
    candy_machine: &Pubkey,
    program_id: &Pubkey,
) -> SdkResult<(Pubkey, u8)> {
    derive(program_id, &[CANDY_MACHINE_CREATOR_SEED, candy_machine.as_ref()])
}

/// Get the Collection PDA of a candy machine.
///
/// Seeds: ["collection", candy_machine]
pub fn get_collection_pda(candy_machine: &Pubkey, program_id: &Pubkey) -> SdkResult<(Pubkey, u8)> {
    derive(program_id, &[COLLECTION_SEED, candy_machine.as_ref()])
}

/// Get the Collection Authority Record PDA.
///
/// Seeds: ["metadata", token_metadata_program, mint, "collection_authority", authority]
pub fn get_collection_authority_record_pda(
    mint: &Pubkey,
    authority: &Pubkey,
) -> SdkResult<(Pubkey, u8)> {
    derive(
        &TOKEN_METADATA_PROGRAM_ID,
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
            COLLECTION_AUTHORITY_SEED,
            authority.as_ref(),
        ],
    )
}

/// Get the gatekeeper network token of a wallet.
///
/// Seeds: [wallet, "gateway", [0; 8], gatekeeper_network]
pub fn get_network_token_pda(wallet: &Pubkey, network: &Pubkey) -> SdkResult<(Pubkey, u8)> {
    derive(
        &GATEWAY_PROGRAM_ID,
        &[
            wallet.as_ref(),
            GATEWAY_SEED,
            &GATEWAY_TOKEN_INDEX,
            network.as_ref(),
        ],
    )
}

/// Get the expire-feature address of a gatekeeper network.
///
/// Seeds: [gatekeeper_network, "expire"]
pub fn get_network_expire_pda(network: &Pubkey) -> SdkResult<(Pubkey, u8)> {
    derive(&GATEWAY_PROGRAM_ID, &[network.as_ref(), EXPIRE_SEED])
}

/// Get the Anchor IDL account address of a program.
///
/// `create_with_seed(find_program_address([], program), "anchor:idl", program)`
pub fn get_idl_address(program_id: &Pubkey) -> SdkResult<Pubkey> {
    let (base, _) = derive(program_id, &[])?;
    Pubkey::create_with_seed(&base, IDL_SEED, program_id)
        .map_err(|e| SdkError::Deserialization(format!("IDL address: {}", e)))
}

/// Collection of all PDA derivation functions for convenient access.
pub struct Pda;

impl Pda {
    /// Get the associated token account.
    pub fn token_wallet(owner: &Pubkey, mint: &Pubkey) -> SdkResult<(Pubkey, u8)> {
        get_token_wallet(owner, mint)
    }

    /// Get the Metadata PDA.
    pub fn metadata(mint: &Pubkey) -> SdkResult<(Pubkey, u8)> {
        get_metadata_pda(mint)
    }

    /// Get the Master Edition PDA.
    pub fn master_edition(mint: &Pubkey) -> SdkResult<(Pubkey, u8)> {
        get_master_edition_pda(mint)
    }

    /// Get the Candy Machine creator PDA for the default program.
    pub fn creator(candy_machine: &Pubkey) -> SdkResult<(Pubkey, u8)> {
        get_candy_machine_creator_pda(candy_machine, &CANDY_MACHINE_PROGRAM_ID)
    }

    /// Get the Collection PDA for the default program.
    pub fn collection(candy_machine: &Pubkey) -> SdkResult<(Pubkey, u8)> {
        get_collection_pda(candy_machine, &CANDY_MACHINE_PROGRAM_ID)
    }

    /// Get the Collection Authority Record PDA.
    pub fn collection_authority_record(
        mint: &Pubkey,
        authority: &Pubkey,
    ) -> SdkResult<(Pubkey, u8)> {
        get_collection_authority_record_pda(mint, authority)
    }

    /// Get the gatekeeper network token.
    pub fn network_token(wallet: &Pubkey, network: &Pubkey) -> SdkResult<(Pubkey, u8)> {
        get_network_token_pda(wallet, network)
    }

    /// Get the gatekeeper network expire address.
    pub fn network_expire(network: &Pubkey) -> SdkResult<(Pubkey, u8)> {
        get_network_expire_pda(network)
    }
}
