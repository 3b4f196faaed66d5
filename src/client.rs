//! High-level client: `CandyMachineClient` and its builder.
//!
//! The client gathers the chain facts a mint needs, runs the pure builder
//! pipeline, and submits the resulting batches through a [`Network`].

use std::sync::Arc;

use solana_commitment_config::CommitmentConfig;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;

use crate::error::{SdkError, SdkResult};
use crate::program::accounts::{CandyMachineAccount, CollectionPdaAccount, IdlAccount};
use crate::program::builder::{build_mint_plan, MintContext, MintPlan};
use crate::program::constants::{CANDY_MACHINE_PROGRAM_ID, MINT_SIZE};
use crate::program::pda::{
    get_candy_machine_creator_pda, get_collection_pda, get_idl_address, get_network_expire_pda,
    get_network_token_pda, get_token_wallet,
};
use crate::program::types::{CollectionLink, MintState, WhitelistMintMode};
use crate::rpc::Network;
use crate::tx::confirm::{await_confirmation, ConfirmationConfig, SubmissionResult};
use crate::tx::submit::{submit_mint, MintReceipt};

/// Client for minting from one candy machine.
#[derive(Clone)]
pub struct CandyMachineClient {
    network: Arc<dyn Network>,
    candy_machine: Pubkey,
    program_id: Pubkey,
    confirmation: ConfirmationConfig,
}

impl CandyMachineClient {
    /// Create a client over the Solana RPC and pubsub endpoints.
    #[cfg(feature = "solana-rpc")]
    pub fn new(rpc_url: &str, ws_url: &str, candy_machine: Pubkey) -> Self {
        let confirmation = ConfirmationConfig::default();
        Self {
            network: Arc::new(crate::rpc::SolanaNetwork::new(
                rpc_url,
                ws_url,
                confirmation.commitment,
            )),
            candy_machine,
            program_id: *CANDY_MACHINE_PROGRAM_ID,
            confirmation,
        }
    }

    /// Create a client over a custom network implementation.
    pub fn with_network(network: Arc<dyn Network>, candy_machine: Pubkey) -> Self {
        Self {
            network,
            candy_machine,
            program_id: *CANDY_MACHINE_PROGRAM_ID,
            confirmation: ConfirmationConfig::default(),
        }
    }

    pub fn builder() -> CandyMachineClientBuilder {
        CandyMachineClientBuilder::default()
    }

    pub fn candy_machine(&self) -> &Pubkey {
        &self.candy_machine
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn network(&self) -> &dyn Network {
        &*self.network
    }

    pub fn confirmation_config(&self) -> &ConfirmationConfig {
        &self.confirmation
    }

    // ── PDAs ─────────────────────────────────────────────────────────────

    /// Creator PDA of this candy machine.
    pub fn get_creator_pda(&self) -> SdkResult<(Pubkey, u8)> {
        get_candy_machine_creator_pda(&self.candy_machine, &self.program_id)
    }

    /// Collection PDA of this candy machine.
    pub fn get_collection_pda(&self) -> SdkResult<(Pubkey, u8)> {
        get_collection_pda(&self.candy_machine, &self.program_id)
    }

    /// Anchor IDL account address of the program.
    pub fn get_idl_address(&self) -> SdkResult<Pubkey> {
        get_idl_address(&self.program_id)
    }

    // ── Account fetchers ─────────────────────────────────────────────────

    /// Fetch the program's published IDL.
    pub async fn fetch_idl(&self) -> SdkResult<IdlAccount> {
        let address = get_idl_address(&self.program_id)?;
        let data = self
            .network
            .get_account_data(&address)
            .await?
            .ok_or(SdkError::IdlNotFound(self.program_id))?;
        IdlAccount::deserialize(&data)
    }

    /// Fetch and decode the candy machine.
    ///
    /// Fails with `IdlNotFound` if the program has no IDL published.
    pub async fn fetch_mint_state(&self) -> SdkResult<MintState> {
        self.fetch_idl().await?;

        let data = self
            .network
            .get_account_data(&self.candy_machine)
            .await?
            .ok_or_else(|| {
                SdkError::AccountNotFound(format!("Candy machine: {}", self.candy_machine))
            })?;
        Ok(CandyMachineAccount::deserialize(&data)?.into_mint_state(self.candy_machine))
    }

    /// Look up the collection linked to this candy machine.
    ///
    /// Best-effort: any failure is logged and yields `None`.
    pub async fn fetch_collection(&self) -> Option<CollectionLink> {
        match self.get_collection_pda() {
            Ok((pda, _)) => self.lookup_collection(pda).await,
            Err(e) => {
                tracing::warn!("Collection PDA derivation failed: {}", e);
                None
            }
        }
    }

    async fn lookup_collection(&self, pda: Pubkey) -> Option<CollectionLink> {
        match self.network.get_account_data(&pda).await {
            Ok(Some(data)) => match CollectionPdaAccount::deserialize(&data) {
                Ok(account) => Some(CollectionLink {
                    pda,
                    mint: account.mint,
                }),
                Err(e) => {
                    tracing::warn!(
                        "Collection PDA {} is malformed, minting without collection: {}",
                        pda,
                        e
                    );
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("No collection set for candy machine {}", self.candy_machine);
                None
            }
            Err(e) => {
                tracing::warn!("Collection lookup failed, minting without collection: {}", e);
                None
            }
        }
    }

    // ── Minting ──────────────────────────────────────────────────────────

    /// Gather chain facts and build the mint plan for one NFT.
    ///
    /// Every address that does not depend on the new mint is derived before
    /// the first network read, so a bad state never reaches the network.
    pub async fn build_mint(&self, payer: &Pubkey, state: &MintState) -> SdkResult<MintPlan> {
        if state.candy_machine != self.candy_machine {
            return Err(SdkError::Config(format!(
                "mint state is for candy machine {}, client is bound to {}",
                state.candy_machine, self.candy_machine
            )));
        }

        self.get_creator_pda()?;
        let (collection_pda, _) = self.get_collection_pda()?;
        if let Some(gatekeeper) = &state.gatekeeper {
            get_network_token_pda(payer, &gatekeeper.gatekeeper_network)?;
            get_network_expire_pda(&gatekeeper.gatekeeper_network)?;
        }
        if let Some(token_mint) = &state.token_mint {
            get_token_wallet(payer, token_mint)?;
        }
        let whitelist_token = match &state.whitelist_mint_settings {
            Some(whitelist) => {
                let (token, _) = get_token_wallet(payer, &whitelist.mint)?;
                (whitelist.mode == WhitelistMintMode::BurnEveryTime).then_some(token)
            }
            None => None,
        };

        let mint_rent = self
            .network
            .get_minimum_balance_for_rent_exemption(MINT_SIZE)
            .await?;

        let whitelist_token_exists = match whitelist_token {
            Some(token) => self.network.get_account_data(&token).await?.is_some(),
            None => false,
        };

        let ctx = MintContext {
            payer: *payer,
            program_id: self.program_id,
            mint_rent,
            whitelist_token_exists,
            collection: self.lookup_collection(collection_pda).await,
        };
        build_mint_plan(state, &ctx)
    }

    /// Mint one NFT and wait for confirmation.
    pub async fn mint_one_token<S: Signer + Sync>(
        &self,
        payer: &S,
        state: &MintState,
    ) -> SdkResult<MintReceipt> {
        let plan = self.build_mint(&payer.pubkey(), state).await?;
        tracing::info!(
            "Minting {} from candy machine {}",
            plan.mint,
            self.candy_machine
        );
        submit_mint(&*self.network, payer, plan, &self.confirmation).await
    }

    /// Mint `quantity` NFTs one after another.
    ///
    /// Each mint is independent with its own fresh signers. Stops at the
    /// first failure; earlier mints are not undone.
    pub async fn mint_multiple_tokens<S: Signer + Sync>(
        &self,
        payer: &S,
        state: &MintState,
        quantity: usize,
    ) -> SdkResult<Vec<MintReceipt>> {
        if quantity == 0 {
            return Err(SdkError::InvalidQuantity(quantity));
        }

        let mut receipts = Vec::with_capacity(quantity);
        for _ in 0..quantity {
            receipts.push(self.mint_one_token(payer, state).await?);
        }
        Ok(receipts)
    }

    /// Watch an already submitted transaction.
    pub async fn await_confirmation(&self, signature: &Signature) -> SubmissionResult {
        await_confirmation(&*self.network, signature, &self.confirmation).await
    }
}

// ── Builder ─────────────────────────────────────────────────────────────────

pub struct CandyMachineClientBuilder {
    rpc_url: String,
    ws_url: String,
    program_id: Pubkey,
    candy_machine: Option<Pubkey>,
    commitment: Option<CommitmentConfig>,
    confirmation: ConfirmationConfig,
    network: Option<Arc<dyn Network>>,
}

impl Default for CandyMachineClientBuilder {
    fn default() -> Self {
        Self {
            rpc_url: crate::network::DEFAULT_RPC_URL.to_string(),
            ws_url: crate::network::DEFAULT_WS_URL.to_string(),
            program_id: *CANDY_MACHINE_PROGRAM_ID,
            candy_machine: None,
            commitment: None,
            confirmation: ConfirmationConfig::default(),
            network: None,
        }
    }
}

impl CandyMachineClientBuilder {
    pub fn rpc_url(mut self, url: &str) -> Self {
        self.rpc_url = url.to_string();
        self
    }

    pub fn ws_url(mut self, url: &str) -> Self {
        self.ws_url = url.to_string();
        self
    }

    pub fn program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn candy_machine(mut self, candy_machine: Pubkey) -> Self {
        self.candy_machine = Some(candy_machine);
        self
    }

    /// Commitment for RPC reads and confirmation.
    pub fn commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = Some(commitment);
        self
    }

    pub fn confirmation(mut self, config: ConfirmationConfig) -> Self {
        self.confirmation = config;
        self
    }

    /// Use a custom network instead of the RPC endpoints.
    pub fn network(mut self, network: Arc<dyn Network>) -> Self {
        self.network = Some(network);
        self
    }

    pub fn build(self) -> SdkResult<CandyMachineClient> {
        let candy_machine = self
            .candy_machine
            .ok_or_else(|| SdkError::Config("candy machine address not set".to_string()))?;

        let mut confirmation = self.confirmation.clone();
        if let Some(commitment) = self.commitment {
            confirmation.commitment = commitment;
        }

        let network = match self.network {
            Some(network) => network,
            None => self.default_network(confirmation.commitment)?,
        };

        Ok(CandyMachineClient {
            network,
            candy_machine,
            program_id: self.program_id,
            confirmation,
        })
    }

    #[cfg(feature = "solana-rpc")]
    fn default_network(&self, commitment: CommitmentConfig) -> SdkResult<Arc<dyn Network>> {
        Ok(Arc::new(crate::rpc::SolanaNetwork::new(
            &self.rpc_url,
            &self.ws_url,
            commitment,
        )))
    }

    #[cfg(not(feature = "solana-rpc"))]
    fn default_network(&self, _commitment: CommitmentConfig) -> SdkResult<Arc<dyn Network>> {
        Err(SdkError::Config(format!(
            "no network set and the `solana-rpc` feature is disabled ({})",
            self.rpc_url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_builder_requires_candy_machine() {
        let result = CandyMachineClient::builder().build();
        assert!(matches!(result, Err(SdkError::Config(_))));
    }

    #[cfg(feature = "solana-rpc")]
    #[test]
    fn test_builder_defaults() {
        let candy_machine = Pubkey::new_from_array([3; 32]);
        let client = CandyMachineClient::builder()
            .candy_machine(candy_machine)
            .build()
            .unwrap();

        assert_eq!(client.candy_machine(), &candy_machine);
        assert_eq!(client.program_id(), &*CANDY_MACHINE_PROGRAM_ID);
        assert_eq!(client.confirmation_config().timeout, Duration::from_secs(60));
    }

    #[cfg(feature = "solana-rpc")]
    #[test]
    fn test_builder_commitment_overrides_confirmation() {
        let client = CandyMachineClient::builder()
            .rpc_url(crate::network::DEVNET_RPC_URL)
            .ws_url(crate::network::DEVNET_WS_URL)
            .candy_machine(Pubkey::new_from_array([3; 32]))
            .confirmation(ConfirmationConfig::default().with_timeout(Duration::from_secs(5)))
            .commitment(CommitmentConfig::finalized())
            .build()
            .unwrap();

        let config = client.confirmation_config();
        assert_eq!(config.commitment, CommitmentConfig::finalized());
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[cfg(feature = "solana-rpc")]
    #[test]
    fn test_pda_accessors_use_program_id() {
        let candy_machine = Pubkey::new_from_array([3; 32]);
        let program_id = Pubkey::new_from_array([4; 32]);
        let client = CandyMachineClient::builder()
            .candy_machine(candy_machine)
            .program_id(program_id)
            .build()
            .unwrap();

        assert_eq!(
            client.get_collection_pda().unwrap(),
            get_collection_pda(&candy_machine, &program_id).unwrap()
        );
        assert_eq!(
            client.get_creator_pda().unwrap(),
            get_candy_machine_creator_pda(&candy_machine, &program_id).unwrap()
        );
    }
}
