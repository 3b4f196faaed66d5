//! Network seam.
//!
//! Everything the SDK needs from a Solana cluster goes through [`Network`].
//! The production implementation is [`SolanaNetwork`] (feature
//! `solana-rpc`); tests plug in scripted implementations.

#[cfg(feature = "solana-rpc")]
pub mod solana;

#[cfg(feature = "solana-rpc")]
pub use solana::SolanaNetwork;

use async_trait::async_trait;
use solana_commitment_config::CommitmentConfig;
use solana_hash::Hash;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction::Transaction;
use tokio::sync::oneshot;

use crate::error::SdkResult;

/// Identifier of a live signature subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Processing status of a signature as reported by `getSignatureStatuses`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    pub slot: u64,
    /// `None` once the block is rooted
    pub confirmations: Option<usize>,
    /// Program or runtime error, if the transaction failed
    pub err: Option<String>,
    pub finalized: bool,
}

/// Push notification for a processed signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureNotification {
    pub slot: u64,
    pub err: Option<String>,
}

/// A live subscription: its id and the channel its single notification
/// arrives on.
#[derive(Debug)]
pub struct SignatureSubscription {
    pub id: SubscriptionId,
    pub notification: oneshot::Receiver<SignatureNotification>,
}

/// The cluster operations the SDK depends on.
#[async_trait]
pub trait Network: Send + Sync {
    async fn get_latest_blockhash(&self) -> SdkResult<Hash>;

    async fn get_minimum_balance_for_rent_exemption(&self, size: usize) -> SdkResult<u64>;

    /// Raw account data, or `None` if the account does not exist.
    async fn get_account_data(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>>;

    async fn send_transaction(&self, transaction: &Transaction) -> SdkResult<Signature>;

    /// One entry per requested signature; `None` when the cluster has no
    /// record of it yet.
    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> SdkResult<Vec<Option<SignatureStatus>>>;

    /// Subscribe to the processing result of `signature`.
    async fn subscribe_signature(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> SdkResult<SignatureSubscription>;

    /// Tear down a subscription. Unknown or already removed ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Unsubscribes exactly once when dropped.
pub struct SubscriptionGuard<'a> {
    network: &'a dyn Network,
    id: SubscriptionId,
}

impl<'a> SubscriptionGuard<'a> {
    pub fn new(network: &'a dyn Network, id: SubscriptionId) -> Self {
        Self { network, id }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for SubscriptionGuard<'_> {
    fn drop(&mut self) {
        tracing::debug!("Unsubscribing signature subscription {}", self.id.0);
        self.network.unsubscribe(self.id);
    }
}
