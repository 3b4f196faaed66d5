//! Instruction builders for the Candy Machine mint flow.
//!
//! Wraps the SPL token, associated token account and system program builders
//! the mint flow composes with, and builds the candy machine's own
//! `mint_nft` instruction.

use nonempty::NonEmpty;
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;
use solana_system_interface::instruction as system_instruction;

use crate::error::{SdkError, SdkResult};
use crate::program::accounts::instruction_discriminator;
use crate::program::constants::{
    instruction, CLOCK_SYSVAR_ID, INSTRUCTIONS_SYSVAR_ID, MINT_SIZE, NFT_AMOUNT, NFT_DECIMALS,
    RENT_SYSVAR_ID, SLOT_HASHES_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Create an account meta for a signer+writable account.
pub(crate) fn signer_mut(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new(pubkey, true)
}

/// Create an account meta for a read-only signer.
pub(crate) fn signer(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new_readonly(pubkey, true)
}

/// Create an account meta for a writable account.
pub(crate) fn writable(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new(pubkey, false)
}

/// Create an account meta for a read-only account.
pub(crate) fn readonly(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new_readonly(pubkey, false)
}

fn spl_error(e: impl std::fmt::Display) -> SdkError {
    SdkError::Instruction(e.to_string())
}

// ============================================================================
// Token Instructions
// ============================================================================

/// Build a system `create_account` for a new SPL mint.
pub fn build_create_mint_account_ix(payer: &Pubkey, mint: &Pubkey, lamports: u64) -> Instruction {
    system_instruction::create_account(payer, mint, lamports, MINT_SIZE as u64, &TOKEN_PROGRAM_ID)
}

/// Build `InitializeMint` for an NFT mint.
///
/// Zero decimals, `authority` is both mint and freeze authority.
pub fn build_initialize_mint_ix(mint: &Pubkey, authority: &Pubkey) -> SdkResult<Instruction> {
    spl_token::instruction::initialize_mint(
        &TOKEN_PROGRAM_ID,
        mint,
        authority,
        Some(authority),
        NFT_DECIMALS,
    )
    .map_err(spl_error)
}

/// Build the associated token account creation for `owner`.
pub fn build_create_token_account_ix(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    spl_associated_token_account::instruction::create_associated_token_account(
        payer,
        owner,
        mint,
        &TOKEN_PROGRAM_ID,
    )
}

/// Build `MintTo` of a single NFT unit.
pub fn build_mint_to_ix(
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
) -> SdkResult<Instruction> {
    spl_token::instruction::mint_to(&TOKEN_PROGRAM_ID, mint, destination, authority, &[], NFT_AMOUNT)
        .map_err(spl_error)
}

/// Build `Approve` granting `delegate` the right to move `amount` from `source`.
pub fn build_approve_ix(
    source: &Pubkey,
    delegate: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> SdkResult<Instruction> {
    spl_token::instruction::approve(&TOKEN_PROGRAM_ID, source, delegate, owner, &[], amount)
        .map_err(spl_error)
}

/// Build `Revoke` clearing any delegate on `source`.
pub fn build_revoke_ix(source: &Pubkey, owner: &Pubkey) -> SdkResult<Instruction> {
    spl_token::instruction::revoke(&TOKEN_PROGRAM_ID, source, owner, &[]).map_err(spl_error)
}

// ============================================================================
// Candy Machine Instructions
// ============================================================================

/// Fixed accounts of `mint_nft`.
#[derive(Debug, Clone, Copy)]
pub struct MintNftAccounts {
    pub candy_machine: Pubkey,
    pub creator: Pubkey,
    pub payer: Pubkey,
    pub treasury: Pubkey,
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub master_edition: Pubkey,
}

/// Number of fixed accounts taken by `mint_nft`.
pub const MINT_NFT_ACCOUNT_COUNT: usize = 16;

/// Build the `mint_nft` instruction.
///
/// Accounts:
/// 0. candy_machine (mut)
/// 1. candy_machine_creator (readonly) - creator PDA
/// 2. payer (signer, mut)
/// 3. wallet (mut) - treasury
/// 4. metadata (mut)
/// 5. mint (mut)
/// 6. mint_authority (signer) - payer
/// 7. update_authority (signer) - payer
/// 8. master_edition (mut)
/// 9. token_metadata_program
/// 10. token_program
/// 11. system_program
/// 12. rent
/// 13. clock
/// 14. recent_blockhashes (slot hashes)
/// 15. instruction_sysvar_account
/// 16+ remaining accounts, in the order the builder collected them
///
/// Data: [discriminator (8), creator_bump (1)]
pub fn build_mint_nft_ix(
    accounts: &MintNftAccounts,
    creator_bump: u8,
    remaining: Option<NonEmpty<AccountMeta>>,
    program_id: &Pubkey,
) -> Instruction {
    let mut keys = Vec::with_capacity(
        MINT_NFT_ACCOUNT_COUNT + remaining.as_ref().map_or(0, |r| r.len()),
    );
    keys.extend([
        writable(accounts.candy_machine),
        readonly(accounts.creator),
        signer_mut(accounts.payer),
        writable(accounts.treasury),
        writable(accounts.metadata),
        writable(accounts.mint),
        signer(accounts.payer),
        signer(accounts.payer),
        writable(accounts.master_edition),
        readonly(*TOKEN_METADATA_PROGRAM_ID),
        readonly(TOKEN_PROGRAM_ID),
        readonly(SYSTEM_PROGRAM_ID),
        readonly(RENT_SYSVAR_ID),
        readonly(CLOCK_SYSVAR_ID),
        readonly(SLOT_HASHES_SYSVAR_ID),
        readonly(INSTRUCTIONS_SYSVAR_ID),
    ]);
    if let Some(remaining) = remaining {
        keys.extend(remaining);
    }

    let mut data = Vec::with_capacity(9);
    data.extend_from_slice(&instruction_discriminator(instruction::MINT_NFT));
    data.push(creator_bump);

    Instruction {
        program_id: *program_id,
        accounts: keys,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::constants::CANDY_MACHINE_PROGRAM_ID;

    fn accounts() -> MintNftAccounts {
        MintNftAccounts {
            candy_machine: Pubkey::new_from_array([1; 32]),
            creator: Pubkey::new_from_array([2; 32]),
            payer: Pubkey::new_from_array([3; 32]),
            treasury: Pubkey::new_from_array([4; 32]),
            mint: Pubkey::new_from_array([5; 32]),
            metadata: Pubkey::new_from_array([6; 32]),
            master_edition: Pubkey::new_from_array([7; 32]),
        }
    }

    #[test]
    fn test_mint_nft_fixed_accounts() {
        let ix = build_mint_nft_ix(&accounts(), 254, None, &CANDY_MACHINE_PROGRAM_ID);

        assert_eq!(ix.program_id, *CANDY_MACHINE_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), MINT_NFT_ACCOUNT_COUNT);
        assert!(ix.accounts[0].is_writable && !ix.accounts[0].is_signer);
        assert!(ix.accounts[2].is_signer && ix.accounts[2].is_writable);
        assert_eq!(ix.accounts[4].pubkey, accounts().metadata);
        assert_eq!(ix.accounts[5].pubkey, accounts().mint);
        assert!(ix.accounts[6].is_signer && !ix.accounts[6].is_writable);
        assert_eq!(ix.accounts[15].pubkey, INSTRUCTIONS_SYSVAR_ID);
    }

    #[test]
    fn test_mint_nft_data() {
        let ix = build_mint_nft_ix(&accounts(), 7, None, &CANDY_MACHINE_PROGRAM_ID);

        assert_eq!(ix.data.len(), 9);
        assert_eq!(&ix.data[..8], &instruction_discriminator("mint_nft"));
        assert_eq!(ix.data[8], 7);
    }

    #[test]
    fn test_mint_nft_remaining_accounts_appended() {
        let extra = Pubkey::new_from_array([9; 32]);
        let remaining = NonEmpty::from_vec(vec![writable(extra), readonly(extra)]);

        let ix = build_mint_nft_ix(&accounts(), 1, remaining, &CANDY_MACHINE_PROGRAM_ID);

        assert_eq!(ix.accounts.len(), MINT_NFT_ACCOUNT_COUNT + 2);
        assert_eq!(ix.accounts[16], writable(extra));
        assert_eq!(ix.accounts[17], readonly(extra));
    }

    #[test]
    fn test_token_instructions_target_token_program() {
        let mint = Pubkey::new_from_array([1; 32]);
        let owner = Pubkey::new_from_array([2; 32]);
        let ata = Pubkey::new_from_array([3; 32]);

        let create = build_create_mint_account_ix(&owner, &mint, 1_461_600);
        assert_eq!(create.program_id, SYSTEM_PROGRAM_ID);

        for ix in [
            build_initialize_mint_ix(&mint, &owner).unwrap(),
            build_mint_to_ix(&mint, &ata, &owner).unwrap(),
            build_approve_ix(&ata, &mint, &owner, 10).unwrap(),
            build_revoke_ix(&ata, &owner).unwrap(),
        ] {
            assert_eq!(ix.program_id, TOKEN_PROGRAM_ID);
        }
    }
}
