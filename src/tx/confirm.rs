//! Transaction confirmation watching.
//!
//! [`await_confirmation`] races a push subscription against optional status
//! polling under a hard deadline. Whichever path reaches a terminal state
//! first wins; the subscription is torn down on every exit path.

use std::time::Duration;

use futures_util::future;
use solana_commitment_config::CommitmentConfig;
use solana_signature::Signature;
use tokio::sync::oneshot;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::error::{SdkError, SdkResult};
use crate::rpc::{Network, SignatureNotification, SignatureStatus, SubscriptionGuard};

// ── Config ──────────────────────────────────────────────────────────────────

/// Configuration for confirmation watching.
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    /// Hard deadline for reaching a terminal state.
    pub timeout: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Whether to poll statuses alongside the push subscription.
    pub polling_enabled: bool,
    /// Commitment requested from the subscription.
    pub commitment: CommitmentConfig,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(2),
            polling_enabled: true,
            commitment: CommitmentConfig::confirmed(),
        }
    }
}

impl ConfirmationConfig {
    /// Push notifications only, no polling.
    pub fn push_only() -> Self {
        Self {
            polling_enabled: false,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }
}

// ── State ───────────────────────────────────────────────────────────────────

/// Confirmation state of one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationState {
    Pending,
    Confirmed { slot: u64 },
    Rejected { error: String },
    TimedOut,
}

impl ConfirmationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConfirmationState::Pending)
    }
}

/// Single authoritative setter of a [`ConfirmationState`].
///
/// Only the first terminal transition is accepted.
#[derive(Debug)]
pub struct ConfirmationTracker {
    state: ConfirmationState,
}

impl Default for ConfirmationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmationTracker {
    pub fn new() -> Self {
        Self {
            state: ConfirmationState::Pending,
        }
    }

    pub fn state(&self) -> &ConfirmationState {
        &self.state
    }

    /// Apply a transition. Returns whether it was accepted.
    pub fn settle(&mut self, next: ConfirmationState) -> bool {
        if self.state.is_terminal() || !next.is_terminal() {
            return false;
        }
        self.state = next;
        true
    }

    pub fn into_result(self, signature: Signature) -> SubmissionResult {
        match self.state {
            ConfirmationState::Confirmed { slot } => SubmissionResult::Confirmed { signature, slot },
            ConfirmationState::Rejected { error } => SubmissionResult::Rejected { signature, error },
            ConfirmationState::Pending | ConfirmationState::TimedOut => {
                SubmissionResult::TimedOut { signature }
            }
        }
    }
}

/// Final outcome of one submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Confirmed { signature: Signature, slot: u64 },
    Rejected { signature: Signature, error: String },
    /// No terminal status before the deadline; the transaction may still land.
    TimedOut { signature: Signature },
}

impl SubmissionResult {
    pub fn signature(&self) -> &Signature {
        match self {
            SubmissionResult::Confirmed { signature, .. }
            | SubmissionResult::Rejected { signature, .. }
            | SubmissionResult::TimedOut { signature } => signature,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmissionResult::Confirmed { .. })
    }

    /// Confirmed signature, or the matching error.
    pub fn into_result(self) -> SdkResult<Signature> {
        match self {
            SubmissionResult::Confirmed { signature, .. } => Ok(signature),
            SubmissionResult::Rejected { signature, error } => {
                Err(SdkError::Rejected { signature, error })
            }
            SubmissionResult::TimedOut { signature } => Err(SdkError::TimedOut { signature }),
        }
    }
}

// ── Watcher ─────────────────────────────────────────────────────────────────

/// Interpret a polled status. `None` is inconclusive.
pub fn classify_status(status: &SignatureStatus) -> Option<ConfirmationState> {
    if let Some(error) = &status.err {
        return Some(ConfirmationState::Rejected {
            error: error.clone(),
        });
    }
    if status.finalized || status.confirmations.is_some_and(|c| c > 0) {
        return Some(ConfirmationState::Confirmed { slot: status.slot });
    }
    None
}

fn classify_notification(notification: SignatureNotification) -> ConfirmationState {
    match notification.err {
        None => ConfirmationState::Confirmed {
            slot: notification.slot,
        },
        Some(error) => ConfirmationState::Rejected { error },
    }
}

enum Event {
    Push(Option<SignatureNotification>),
    Tick,
    Deadline,
}

async fn next_push(
    push: &mut Option<oneshot::Receiver<SignatureNotification>>,
) -> Option<SignatureNotification> {
    match push {
        Some(receiver) => receiver.await.ok(),
        None => future::pending().await,
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending().await,
    }
}

/// Poll the status once. Errors are logged and treated as inconclusive.
async fn poll_status(
    network: &dyn Network,
    signature: &Signature,
    deadline: Instant,
) -> Option<ConfirmationState> {
    let statuses =
        match tokio::time::timeout_at(deadline, network.get_signature_statuses(&[*signature])).await
        {
            Ok(Ok(statuses)) => statuses,
            Ok(Err(e)) => {
                tracing::warn!("Status poll for {} failed: {}", signature, e);
                return None;
            }
            Err(_) => return None,
        };

    match statuses.into_iter().next().flatten() {
        Some(status) => {
            let state = classify_status(&status);
            if state.is_none() {
                tracing::debug!(
                    "Signature {} processed at slot {} but not yet confirmed",
                    signature,
                    status.slot
                );
            }
            state
        }
        None => {
            tracing::debug!("Signature {} not yet known to the cluster", signature);
            None
        }
    }
}

/// Wait until `signature` is confirmed, rejected, or the deadline passes.
pub async fn await_confirmation(
    network: &dyn Network,
    signature: &Signature,
    config: &ConfirmationConfig,
) -> SubmissionResult {
    let deadline = Instant::now() + config.timeout;
    let mut tracker = ConfirmationTracker::new();

    let subscription = tokio::time::timeout_at(
        deadline,
        network.subscribe_signature(signature, config.commitment),
    )
    .await;
    let (_guard, mut push) = match subscription {
        Ok(Ok(subscription)) => (
            Some(SubscriptionGuard::new(network, subscription.id)),
            Some(subscription.notification),
        ),
        Ok(Err(e)) => {
            tracing::warn!(
                "Subscription for {} failed, falling back to polling: {}",
                signature,
                e
            );
            (None, None)
        }
        Err(_) => (None, None),
    };

    let mut ticker = config.polling_enabled.then(|| {
        let mut interval =
            tokio::time::interval_at(Instant::now() + config.poll_interval, config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });
    let sleep = tokio::time::sleep_until(deadline);
    tokio::pin!(sleep);

    while !tracker.state().is_terminal() {
        let event = tokio::select! {
            biased;
            notification = next_push(&mut push) => Event::Push(notification),
            _ = &mut sleep => Event::Deadline,
            _ = next_tick(&mut ticker) => Event::Tick,
        };

        match event {
            Event::Push(Some(notification)) => {
                tracker.settle(classify_notification(notification));
            }
            Event::Push(None) => {
                tracing::debug!("Notification channel for {} closed", signature);
                push = None;
            }
            Event::Tick => {
                if let Some(state) = poll_status(network, signature, deadline).await {
                    tracker.settle(state);
                }
            }
            Event::Deadline => {
                tracker.settle(ConfirmationState::TimedOut);
            }
        }
    }

    let result = tracker.into_result(*signature);
    match &result {
        SubmissionResult::Confirmed { slot, .. } => {
            tracing::info!("Transaction {} confirmed at slot {}", signature, slot)
        }
        SubmissionResult::Rejected { error, .. } => {
            tracing::info!("Transaction {} rejected: {}", signature, error)
        }
        SubmissionResult::TimedOut { .. } => tracing::info!(
            "Transaction {} not confirmed within {:?}",
            signature,
            config.timeout
        ),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(confirmations: Option<usize>, err: Option<&str>, finalized: bool) -> SignatureStatus {
        SignatureStatus {
            slot: 99,
            confirmations,
            err: err.map(str::to_string),
            finalized,
        }
    }

    #[test]
    fn test_confirmation_config_default() {
        let config = ConfirmationConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert!(config.polling_enabled);
        assert_eq!(config.commitment, CommitmentConfig::confirmed());
    }

    #[test]
    fn test_push_only_disables_polling() {
        let config = ConfirmationConfig::push_only().with_timeout(Duration::from_secs(5));
        assert!(!config.polling_enabled);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_tracker_first_terminal_wins() {
        let mut tracker = ConfirmationTracker::new();

        assert!(!tracker.settle(ConfirmationState::Pending));
        assert!(tracker.settle(ConfirmationState::Confirmed { slot: 5 }));
        assert!(!tracker.settle(ConfirmationState::Rejected {
            error: "late".to_string()
        }));
        assert!(!tracker.settle(ConfirmationState::TimedOut));

        assert_eq!(tracker.state(), &ConfirmationState::Confirmed { slot: 5 });
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(&status(Some(0), None, false)), None);
        assert_eq!(
            classify_status(&status(Some(1), None, false)),
            Some(ConfirmationState::Confirmed { slot: 99 })
        );
        assert_eq!(
            classify_status(&status(None, None, true)),
            Some(ConfirmationState::Confirmed { slot: 99 })
        );
        assert_eq!(
            classify_status(&status(Some(0), Some("InstructionError"), false)),
            Some(ConfirmationState::Rejected {
                error: "InstructionError".to_string()
            })
        );
    }

    #[test]
    fn test_classify_notification() {
        let confirmed = classify_notification(SignatureNotification { slot: 7, err: None });
        assert_eq!(confirmed, ConfirmationState::Confirmed { slot: 7 });

        let rejected = classify_notification(SignatureNotification {
            slot: 7,
            err: Some("custom program error: 0x1".to_string()),
        });
        assert!(matches!(rejected, ConfirmationState::Rejected { .. }));
    }

    #[test]
    fn test_submission_result_into_result() {
        let signature = Signature::default();

        let ok = SubmissionResult::Confirmed { signature, slot: 1 }.into_result();
        assert_eq!(ok.unwrap(), signature);

        let rejected = SubmissionResult::Rejected {
            signature,
            error: "boom".to_string(),
        };
        assert_eq!(rejected.signature(), &signature);
        assert!(matches!(
            rejected.into_result(),
            Err(SdkError::Rejected { .. })
        ));

        let timed_out = SubmissionResult::TimedOut { signature };
        assert!(!timed_out.is_confirmed());
        assert!(matches!(
            timed_out.into_result(),
            Err(SdkError::TimedOut { .. })
        ));
    }
}
