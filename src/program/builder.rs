//! Mint transaction assembly.
//!
//! A mint is built by folding a fixed sequence of pure steps over a
//! [`MintPlan`]. Each step reads the immutable [`MintState`] and the chain
//! facts in [`MintContext`] and extends the plan. Nothing here touches the
//! network: the client gathers the facts first.

use nonempty::NonEmpty;
use solana_instruction::{AccountMeta, Instruction};
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;

use crate::error::SdkResult;
use crate::program::constants::GATEWAY_PROGRAM_ID;
use crate::program::instructions::{
    build_approve_ix, build_create_mint_account_ix, build_create_token_account_ix,
    build_initialize_mint_ix, build_mint_nft_ix, build_mint_to_ix, build_revoke_ix, readonly,
    signer, writable, MintNftAccounts,
};
use crate::program::pda::{
    get_candy_machine_creator_pda, get_collection_authority_record_pda, get_master_edition_pda,
    get_metadata_pda, get_network_expire_pda, get_network_token_pda, get_token_wallet,
};
use crate::program::types::{CollectionLink, MintState, WhitelistMintMode};
use crate::tx::TransactionBatch;

/// Chain facts gathered before building.
#[derive(Debug, Clone)]
pub struct MintContext {
    /// Fee payer, mint authority and NFT recipient
    pub payer: Pubkey,
    /// Candy machine program
    pub program_id: Pubkey,
    /// Rent-exempt lamports for a mint account
    pub mint_rent: u64,
    /// Whether the payer's whitelist token account exists
    pub whitelist_token_exists: bool,
    pub collection: Option<CollectionLink>,
}

/// Accumulator threaded through the build steps.
pub struct MintPlan {
    /// Address of the NFT mint being created
    pub mint: Pubkey,
    /// Main batch instructions, in order
    pub instructions: Vec<Instruction>,
    /// Extra accounts appended to `mint_nft`
    pub remaining_accounts: Vec<AccountMeta>,
    /// Throwaway keypairs signing the main batch
    pub signers: Vec<Keypair>,
    /// Revokes sent after the main batch
    pub cleanup: Vec<Instruction>,
}

impl MintPlan {
    /// Fresh plan owning a newly generated mint keypair.
    pub fn start() -> Self {
        let mint = Keypair::new();
        Self {
            mint: mint.pubkey(),
            instructions: Vec::new(),
            remaining_accounts: Vec::new(),
            signers: vec![mint],
            cleanup: Vec::new(),
        }
    }

    /// The `mint_nft` instruction, once the plan is complete.
    pub fn mint_instruction(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// Split into the main batch and the cleanup batch.
    ///
    /// Cleanup only needs the payer's signature.
    pub fn into_batches(self) -> (TransactionBatch, TransactionBatch) {
        (
            TransactionBatch::new(self.instructions, self.signers),
            TransactionBatch::new(self.cleanup, Vec::new()),
        )
    }
}

impl std::fmt::Debug for MintPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MintPlan")
            .field("mint", &self.mint)
            .field("instructions", &self.instructions.len())
            .field("remaining_accounts", &self.remaining_accounts)
            .field("signers", &self.signers.len())
            .field("cleanup", &self.cleanup.len())
            .finish()
    }
}

type Step = fn(MintPlan, &MintState, &MintContext) -> SdkResult<MintPlan>;

const STEPS: [Step; 6] = [
    base_step,
    gatekeeper_step,
    whitelist_step,
    payment_token_step,
    collection_step,
    mint_nft_step,
];

/// Build the complete mint plan for one NFT.
pub fn build_mint_plan(state: &MintState, ctx: &MintContext) -> SdkResult<MintPlan> {
    STEPS
        .iter()
        .try_fold(MintPlan::start(), |plan, step| step(plan, state, ctx))
}

// ============================================================================
// Steps
// ============================================================================

/// Create the mint, the payer's token account, and mint one unit into it.
fn base_step(mut plan: MintPlan, _state: &MintState, ctx: &MintContext) -> SdkResult<MintPlan> {
    let (token_account, _) = get_token_wallet(&ctx.payer, &plan.mint)?;

    plan.instructions.extend([
        build_create_mint_account_ix(&ctx.payer, &plan.mint, ctx.mint_rent),
        build_initialize_mint_ix(&plan.mint, &ctx.payer)?,
        build_create_token_account_ix(&ctx.payer, &ctx.payer, &plan.mint),
        build_mint_to_ix(&plan.mint, &token_account, &ctx.payer)?,
    ]);
    Ok(plan)
}

fn gatekeeper_step(mut plan: MintPlan, state: &MintState, ctx: &MintContext) -> SdkResult<MintPlan> {
    let Some(gatekeeper) = &state.gatekeeper else {
        return Ok(plan);
    };

    let (network_token, _) = get_network_token_pda(&ctx.payer, &gatekeeper.gatekeeper_network)?;
    plan.remaining_accounts.push(writable(network_token));

    if gatekeeper.expire_on_use {
        let (expire, _) = get_network_expire_pda(&gatekeeper.gatekeeper_network)?;
        plan.remaining_accounts
            .extend([readonly(*GATEWAY_PROGRAM_ID), readonly(expire)]);
    }
    Ok(plan)
}

fn whitelist_step(mut plan: MintPlan, state: &MintState, ctx: &MintContext) -> SdkResult<MintPlan> {
    let Some(whitelist) = &state.whitelist_mint_settings else {
        return Ok(plan);
    };

    let (whitelist_token, _) = get_token_wallet(&ctx.payer, &whitelist.mint)?;
    plan.remaining_accounts.push(writable(whitelist_token));

    if whitelist.mode == WhitelistMintMode::BurnEveryTime {
        let delegate = Keypair::new();
        plan.remaining_accounts
            .extend([writable(whitelist.mint), signer(delegate.pubkey())]);

        // Approve/revoke would fail against an account that does not exist.
        if ctx.whitelist_token_exists {
            plan.instructions.push(build_approve_ix(
                &whitelist_token,
                &delegate.pubkey(),
                &ctx.payer,
                1,
            )?);
            plan.cleanup
                .push(build_revoke_ix(&whitelist_token, &ctx.payer)?);
        }
        plan.signers.push(delegate);
    }
    Ok(plan)
}

fn payment_token_step(
    mut plan: MintPlan,
    state: &MintState,
    ctx: &MintContext,
) -> SdkResult<MintPlan> {
    let Some(token_mint) = state.token_mint else {
        return Ok(plan);
    };

    let delegate = Keypair::new();
    let (paying_account, _) = get_token_wallet(&ctx.payer, &token_mint)?;

    plan.remaining_accounts
        .extend([writable(paying_account), signer(delegate.pubkey())]);
    plan.instructions.push(build_approve_ix(
        &paying_account,
        &delegate.pubkey(),
        &ctx.payer,
        state.price,
    )?);
    plan.cleanup.push(build_revoke_ix(&paying_account, &ctx.payer)?);
    plan.signers.push(delegate);
    Ok(plan)
}

fn collection_step(mut plan: MintPlan, _state: &MintState, ctx: &MintContext) -> SdkResult<MintPlan> {
    let Some(collection) = ctx.collection else {
        return Ok(plan);
    };

    let (metadata, _) = get_metadata_pda(&collection.mint)?;
    let (master_edition, _) = get_master_edition_pda(&collection.mint)?;
    let (authority_record, _) =
        get_collection_authority_record_pda(&collection.mint, &collection.pda)?;

    plan.remaining_accounts.extend([
        writable(collection.pda),
        readonly(collection.mint),
        writable(metadata),
        readonly(master_edition),
        readonly(authority_record),
    ]);
    Ok(plan)
}

fn mint_nft_step(mut plan: MintPlan, state: &MintState, ctx: &MintContext) -> SdkResult<MintPlan> {
    let (creator, creator_bump) =
        get_candy_machine_creator_pda(&state.candy_machine, &ctx.program_id)?;
    let (metadata, _) = get_metadata_pda(&plan.mint)?;
    let (master_edition, _) = get_master_edition_pda(&plan.mint)?;

    let accounts = MintNftAccounts {
        candy_machine: state.candy_machine,
        creator,
        payer: ctx.payer,
        treasury: state.treasury,
        mint: plan.mint,
        metadata,
        master_edition,
    };
    let remaining = NonEmpty::from_vec(plan.remaining_accounts.clone());

    plan.instructions.push(build_mint_nft_ix(
        &accounts,
        creator_bump,
        remaining,
        &ctx.program_id,
    ));
    Ok(plan)
}
