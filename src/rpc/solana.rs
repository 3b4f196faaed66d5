//! [`Network`] over the Solana JSON-RPC and pubsub clients.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::StreamExt;
use solana_client::nonblocking::pubsub_client::PubsubClient;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSignatureSubscribeConfig;
use solana_client::rpc_response::RpcSignatureResult;
use solana_commitment_config::CommitmentConfig;
use solana_hash::Hash;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction::Transaction;
use tokio::sync::{oneshot, OnceCell};

use crate::error::{SdkError, SdkResult};
use crate::rpc::{
    Network, SignatureNotification, SignatureStatus, SignatureSubscription, SubscriptionId,
};

/// Production network adapter.
///
/// The pubsub connection is opened on the first subscription and shared by
/// all later ones. Every subscription runs in its own task, which always
/// unsubscribes from the node before exiting.
pub struct SolanaNetwork {
    rpc_client: Arc<RpcClient>,
    ws_url: String,
    pubsub: OnceCell<Arc<PubsubClient>>,
    subscriptions: DashMap<SubscriptionId, oneshot::Sender<()>>,
    next_id: AtomicU64,
}

impl SolanaNetwork {
    /// Create an adapter with its own RPC client.
    pub fn new(rpc_url: &str, ws_url: &str, commitment: CommitmentConfig) -> Self {
        Self::from_rpc_client(
            Arc::new(RpcClient::new_with_commitment(rpc_url.to_string(), commitment)),
            ws_url,
        )
    }

    /// Create an adapter around an existing RPC client.
    pub fn from_rpc_client(rpc_client: Arc<RpcClient>, ws_url: &str) -> Self {
        Self {
            rpc_client,
            ws_url: ws_url.to_string(),
            pubsub: OnceCell::new(),
            subscriptions: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn rpc_client(&self) -> &RpcClient {
        &self.rpc_client
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Number of subscriptions not yet torn down.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Reserve a subscription slot. The slot is released when the returned
    /// guard drops unless it has been disarmed.
    fn register(&self) -> (PendingSubscription<'_>, oneshot::Receiver<()>) {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.subscriptions.insert(id, cancel_tx);
        (
            PendingSubscription {
                network: self,
                id: Some(id),
            },
            cancel_rx,
        )
    }

    async fn pubsub(&self) -> SdkResult<Arc<PubsubClient>> {
        let client = self
            .pubsub
            .get_or_try_init(|| async {
                tracing::info!("Connecting to pubsub endpoint: {}", self.ws_url);
                PubsubClient::new(self.ws_url.as_str())
                    .await
                    .map(Arc::new)
                    .map_err(|e| SdkError::Subscription(e.to_string()))
            })
            .await?;
        Ok(client.clone())
    }
}

/// A registered subscription that has not been handed to the caller yet.
///
/// Dropping it (including when the `subscribe_signature` future itself is
/// dropped mid-await) cancels the subscription task and frees the slot.
struct PendingSubscription<'a> {
    network: &'a SolanaNetwork,
    id: Option<SubscriptionId>,
}

impl PendingSubscription<'_> {
    fn disarm(mut self) -> Option<SubscriptionId> {
        self.id.take()
    }
}

impl Drop for PendingSubscription<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            tracing::debug!("Releasing unfinished signature subscription {}", id.0);
            self.network.unsubscribe(id);
        }
    }
}

#[async_trait]
impl Network for SolanaNetwork {
    async fn get_latest_blockhash(&self) -> SdkResult<Hash> {
        Ok(self.rpc_client.get_latest_blockhash().await?)
    }

    async fn get_minimum_balance_for_rent_exemption(&self, size: usize) -> SdkResult<u64> {
        Ok(self
            .rpc_client
            .get_minimum_balance_for_rent_exemption(size)
            .await?)
    }

    async fn get_account_data(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>> {
        let response = self
            .rpc_client
            .get_account_with_commitment(address, self.rpc_client.commitment())
            .await?;
        Ok(response.value.map(|account| account.data))
    }

    async fn send_transaction(&self, transaction: &Transaction) -> SdkResult<Signature> {
        self.rpc_client
            .send_transaction(transaction)
            .await
            .map_err(|e| SdkError::SubmissionFailed(e.to_string()))
    }

    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> SdkResult<Vec<Option<SignatureStatus>>> {
        let response = self.rpc_client.get_signature_statuses(signatures).await?;
        Ok(response
            .value
            .into_iter()
            .map(|status| {
                status.map(|s| SignatureStatus {
                    slot: s.slot,
                    finalized: s.confirmations.is_none(),
                    confirmations: s.confirmations,
                    err: s.err.map(|e| format!("{:?}", e)),
                })
            })
            .collect())
    }

    async fn subscribe_signature(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> SdkResult<SignatureSubscription> {
        let pubsub = self.pubsub().await?;
        let signature = *signature;

        let (pending, cancel_rx) = self.register();
        let (ready_tx, ready_rx) = oneshot::channel::<SdkResult<()>>();
        let (notify_tx, notify_rx) = oneshot::channel();

        tokio::spawn(async move {
            let config = RpcSignatureSubscribeConfig {
                commitment: Some(commitment),
                enable_received_notification: Some(false),
            };
            let (mut notifications, unsubscribe) =
                match pubsub.signature_subscribe(&signature, Some(config)).await {
                    Ok(subscription) => subscription,
                    Err(e) => {
                        let _ = ready_tx.send(Err(SdkError::Subscription(e.to_string())));
                        return;
                    }
                };
            let _ = ready_tx.send(Ok(()));

            let forward = async {
                while let Some(response) = notifications.next().await {
                    if let RpcSignatureResult::ProcessedSignature(result) = response.value {
                        let _ = notify_tx.send(SignatureNotification {
                            slot: response.context.slot,
                            err: result.err.map(|e| format!("{:?}", e)),
                        });
                        return;
                    }
                }
                tracing::debug!("Signature stream for {} ended", signature);
            };

            tokio::select! {
                _ = cancel_rx => {}
                _ = forward => {}
            }
            unsubscribe().await;
        });

        match ready_rx.await {
            Ok(Ok(())) => match pending.disarm() {
                Some(id) => Ok(SignatureSubscription {
                    id,
                    notification: notify_rx,
                }),
                None => Err(SdkError::Subscription(
                    "subscription slot already released".to_string(),
                )),
            },
            Ok(Err(e)) => Err(e),
            Err(_) => Err(SdkError::Subscription(
                "subscription task exited before it was ready".to_string(),
            )),
        }
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Some((_, cancel)) = self.subscriptions.remove(&id) {
            let _ = cancel.send(());
        }
    }
}
