//! Ordered submission of transaction batches.

use futures_util::future::join_all;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;

use crate::error::{SdkError, SdkResult};
use crate::program::builder::MintPlan;
use crate::rpc::Network;
use crate::tx::batch::TransactionBatch;
use crate::tx::confirm::{await_confirmation, ConfirmationConfig, SubmissionResult};

/// Outcome of a successful mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    /// The new NFT mint
    pub mint: Pubkey,
    /// Confirmed transactions, main batch first
    pub signatures: Vec<Signature>,
}

fn submission_error(e: SdkError) -> SdkError {
    match e {
        SdkError::SubmissionFailed(_) => e,
        other => SdkError::SubmissionFailed(other.to_string()),
    }
}

/// Sign and send `batches`, returning the signatures that were accepted.
///
/// Empty batches are dropped. All remaining batches are signed against one
/// blockhash before anything is sent, then sent strictly in order. Only the
/// first batch is load-bearing: if it fails to send, the rest are still
/// dispatched best-effort and `SubmissionFailed` is returned. Later send
/// failures are logged and leave no signature.
pub async fn send_batches(
    network: &dyn Network,
    payer: &(dyn Signer + Sync),
    batches: Vec<TransactionBatch>,
) -> SdkResult<Vec<Signature>> {
    let batches: Vec<TransactionBatch> = batches.into_iter().filter(|b| !b.is_empty()).collect();
    if batches.is_empty() {
        return Ok(Vec::new());
    }

    let blockhash = network.get_latest_blockhash().await?;
    let transactions = batches
        .into_iter()
        .map(|batch| batch.sign(payer, blockhash))
        .collect::<SdkResult<Vec<_>>>()?;

    let mut sent = Vec::with_capacity(transactions.len());
    let mut primary_failure = None;
    for (index, tx) in transactions.iter().enumerate() {
        match network.send_transaction(tx).await {
            Ok(signature) => {
                tracing::info!(
                    "Submitted transaction {} ({} instructions)",
                    signature,
                    tx.message.instructions.len()
                );
                sent.push(signature);
            }
            Err(e) if index == 0 => {
                tracing::warn!("Primary transaction failed to send: {}", e);
                primary_failure = Some(submission_error(e));
            }
            Err(e) => {
                tracing::warn!("Follow-up transaction {} failed to send: {}", index, e);
            }
        }
    }
    match primary_failure {
        Some(e) => Err(e),
        None => Ok(sent),
    }
}

/// Sign, send and watch `batches`.
///
/// Sending follows [`send_batches`]. Every sent transaction is watched
/// concurrently; results come back in send order.
pub async fn submit_batches(
    network: &dyn Network,
    payer: &(dyn Signer + Sync),
    batches: Vec<TransactionBatch>,
    config: &ConfirmationConfig,
) -> SdkResult<Vec<SubmissionResult>> {
    let sent = send_batches(network, payer, batches).await?;
    Ok(join_all(
        sent.iter()
            .map(|signature| await_confirmation(network, signature, config)),
    )
    .await)
}

/// Submit a mint plan: the main batch, then its cleanup batch.
///
/// The mint succeeds iff the main transaction confirms. Cleanup watchers run
/// alongside the main one but are only awaited once the main transaction
/// has confirmed; a failed mint returns as soon as its outcome is known.
/// Cleanup outcomes are logged and never fail the mint.
pub async fn submit_mint(
    network: &dyn Network,
    payer: &(dyn Signer + Sync),
    plan: MintPlan,
    config: &ConfirmationConfig,
) -> SdkResult<MintReceipt> {
    let mint = plan.mint;
    let (main, cleanup) = plan.into_batches();

    let sent = send_batches(network, payer, vec![main, cleanup]).await?;
    let (main_signature, cleanup_signatures) = match sent.split_first() {
        Some((first, rest)) => (*first, rest),
        None => return Err(SdkError::SubmissionFailed("nothing to submit".to_string())),
    };

    let main_watch = await_confirmation(network, &main_signature, config);
    let cleanup_watch = join_all(
        cleanup_signatures
            .iter()
            .map(|signature| await_confirmation(network, signature, config)),
    );
    tokio::pin!(main_watch);
    tokio::pin!(cleanup_watch);

    let (main_result, cleanup_results) = tokio::select! {
        biased;
        result = &mut main_watch => (result, None),
        results = &mut cleanup_watch => (main_watch.as_mut().await, Some(results)),
    };

    let main_signature = main_result.into_result()?;
    let cleanup_results = match cleanup_results {
        Some(results) => results,
        None => cleanup_watch.as_mut().await,
    };

    let mut signatures = vec![main_signature];
    for result in cleanup_results {
        match result {
            SubmissionResult::Confirmed { signature, .. } => signatures.push(signature),
            other => tracing::warn!(
                "Cleanup transaction {} did not confirm: {:?}",
                other.signature(),
                other
            ),
        }
    }

    Ok(MintReceipt { mint, signatures })
}
