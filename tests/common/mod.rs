//! Scripted in-memory `Network` for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use candy_machine_sdk::error::{SdkError, SdkResult};
use candy_machine_sdk::program::{account, account_discriminator, get_idl_address};
use candy_machine_sdk::rpc::{
    Network, SignatureNotification, SignatureStatus, SignatureSubscription, SubscriptionId,
};
use solana_commitment_config::CommitmentConfig;
use solana_hash::Hash;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::Transaction;
use tokio::sync::oneshot;

pub const MINT_RENT: u64 = 1_461_600;

pub fn unique_pubkey() -> Pubkey {
    Keypair::new().pubkey()
}

/// How a signature subscription behaves.
#[derive(Debug, Clone)]
pub enum Push {
    /// Deliver a notification right away
    Notify { slot: u64, err: Option<String> },
    /// Stay silent until unsubscribed
    Silent,
    /// Close the channel without a notification
    Close,
    /// Refuse to subscribe
    Fail,
}

impl Push {
    pub fn confirmed(slot: u64) -> Self {
        Push::Notify { slot, err: None }
    }

    pub fn rejected(error: &str) -> Self {
        Push::Notify {
            slot: 1,
            err: Some(error.to_string()),
        }
    }
}

/// One scripted answer to `get_signature_statuses`.
#[derive(Debug, Clone)]
pub enum StatusReply {
    Unknown,
    Status(SignatureStatus),
    Error,
}

impl StatusReply {
    pub fn confirmations(slot: u64, confirmations: usize) -> Self {
        StatusReply::Status(SignatureStatus {
            slot,
            confirmations: Some(confirmations),
            err: None,
            finalized: false,
        })
    }

    pub fn finalized(slot: u64) -> Self {
        StatusReply::Status(SignatureStatus {
            slot,
            confirmations: None,
            err: None,
            finalized: true,
        })
    }

    pub fn failed(slot: u64, error: &str) -> Self {
        StatusReply::Status(SignatureStatus {
            slot,
            confirmations: Some(0),
            err: Some(error.to_string()),
            finalized: false,
        })
    }
}

pub struct MockNetwork {
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    pushes: Mutex<VecDeque<Push>>,
    default_push: Mutex<Push>,
    statuses: Mutex<VecDeque<StatusReply>>,
    failing_sends: Mutex<HashSet<usize>>,
    sent: Mutex<Vec<Transaction>>,
    held: Mutex<HashMap<SubscriptionId, oneshot::Sender<SignatureNotification>>>,
    next_id: AtomicU64,
    pub subscribe_calls: AtomicUsize,
    pub unsubscribe_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub read_calls: AtomicUsize,
}

impl Default for MockNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNetwork {
    /// Every subscription confirms immediately unless scripted otherwise.
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            pushes: Mutex::new(VecDeque::new()),
            default_push: Mutex::new(Push::confirmed(100)),
            statuses: Mutex::new(VecDeque::new()),
            failing_sends: Mutex::new(HashSet::new()),
            sent: Mutex::new(Vec::new()),
            held: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            subscribe_calls: AtomicUsize::new(0),
            unsubscribe_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            read_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(address, data);
    }

    /// Behaviour of the next subscriptions, in order.
    pub fn script_pushes(&self, pushes: impl IntoIterator<Item = Push>) {
        self.pushes.lock().unwrap().extend(pushes);
    }

    /// Behaviour once the scripted pushes run out.
    pub fn set_default_push(&self, push: Push) {
        *self.default_push.lock().unwrap() = push;
    }

    /// Answers to successive status polls. `Unknown` once exhausted.
    pub fn script_statuses(&self, replies: impl IntoIterator<Item = StatusReply>) {
        self.statuses.lock().unwrap().extend(replies);
    }

    /// Make the `index`-th send attempt (0-based) fail.
    pub fn fail_send(&self, index: usize) {
        self.failing_sends.lock().unwrap().insert(index);
    }

    /// Every transaction a send was attempted for, in order.
    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    pub fn unsubscribes(&self) -> usize {
        self.unsubscribe_calls.load(Ordering::SeqCst)
    }

    pub fn status_polls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Account and rent reads issued so far.
    pub fn reads(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn get_latest_blockhash(&self) -> SdkResult<Hash> {
        Ok(Hash::default())
    }

    async fn get_minimum_balance_for_rent_exemption(&self, _size: usize) -> SdkResult<u64> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        Ok(MINT_RENT)
    }

    async fn get_account_data(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn send_transaction(&self, transaction: &Transaction) -> SdkResult<Signature> {
        let mut sent = self.sent.lock().unwrap();
        let index = sent.len();
        sent.push(transaction.clone());

        if self.failing_sends.lock().unwrap().contains(&index) {
            return Err(SdkError::Network("node refused transaction".to_string()));
        }
        Ok(transaction.signatures[0])
    }

    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> SdkResult<Vec<Option<SignatureStatus>>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(StatusReply::Unknown);

        match reply {
            StatusReply::Unknown => Ok(vec![None; signatures.len()]),
            StatusReply::Status(status) => Ok(vec![Some(status); signatures.len()]),
            StatusReply::Error => Err(SdkError::Network("connection reset".to_string())),
        }
    }

    async fn subscribe_signature(
        &self,
        _signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> SdkResult<SignatureSubscription> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        let push = self
            .pushes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_push.lock().unwrap().clone());

        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, notification) = oneshot::channel();
        match push {
            Push::Notify { slot, err } => {
                let _ = sender.send(SignatureNotification { slot, err });
            }
            Push::Silent => {
                self.held.lock().unwrap().insert(id, sender);
            }
            Push::Close => drop(sender),
            Push::Fail => {
                return Err(SdkError::Subscription("pubsub unavailable".to_string()));
            }
        }
        Ok(SignatureSubscription { id, notification })
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.unsubscribe_calls.fetch_add(1, Ordering::SeqCst);
        self.held.lock().unwrap().remove(&id);
    }
}

// ── Account fixtures ────────────────────────────────────────────────────────

fn push_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

/// Candy machine account contents, encoded in the on-chain layout.
#[derive(Debug, Clone)]
pub struct CandyMachineFixture {
    pub authority: Pubkey,
    pub wallet: Pubkey,
    pub token_mint: Option<Pubkey>,
    pub items_redeemed: u64,
    pub price: u64,
    pub items_available: u64,
    pub go_live_date: Option<i64>,
    /// (mode, whitelist mint)
    pub whitelist: Option<(u8, Pubkey)>,
    /// (gatekeeper network, expire on use)
    pub gatekeeper: Option<(Pubkey, bool)>,
}

impl Default for CandyMachineFixture {
    fn default() -> Self {
        Self {
            authority: unique_pubkey(),
            wallet: unique_pubkey(),
            token_mint: None,
            items_redeemed: 2,
            price: 1_000_000_000,
            items_available: 10,
            go_live_date: Some(1_650_000_000),
            whitelist: None,
            gatekeeper: None,
        }
    }
}

impl CandyMachineFixture {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = account_discriminator(account::CANDY_MACHINE).to_vec();
        buf.extend_from_slice(self.authority.as_ref());
        buf.extend_from_slice(self.wallet.as_ref());
        match self.token_mint {
            Some(mint) => {
                buf.push(1);
                buf.extend_from_slice(mint.as_ref());
            }
            None => buf.push(0),
        }
        buf.extend_from_slice(&self.items_redeemed.to_le_bytes());

        push_string(&mut buf, "fixture");
        buf.extend_from_slice(&self.price.to_le_bytes());
        push_string(&mut buf, "FIX");
        buf.extend_from_slice(&500u16.to_le_bytes());
        buf.extend_from_slice(&0u64.to_le_bytes());
        buf.push(1);
        buf.push(1);
        match self.go_live_date {
            Some(date) => {
                buf.push(1);
                buf.extend_from_slice(&date.to_le_bytes());
            }
            None => buf.push(0),
        }
        buf.push(0);
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.push(0);
        match self.whitelist {
            Some((mode, mint)) => {
                buf.push(1);
                buf.push(mode);
                buf.extend_from_slice(mint.as_ref());
                buf.push(0);
                buf.push(0);
            }
            None => buf.push(0),
        }
        buf.extend_from_slice(&self.items_available.to_le_bytes());
        match self.gatekeeper {
            Some((network, expire_on_use)) => {
                buf.push(1);
                buf.extend_from_slice(network.as_ref());
                buf.push(expire_on_use as u8);
            }
            None => buf.push(0),
        }
        buf
    }
}

pub fn idl_account_data() -> Vec<u8> {
    let mut buf = account_discriminator(account::IDL_ACCOUNT).to_vec();
    buf.extend_from_slice(unique_pubkey().as_ref());
    buf.extend_from_slice(&4u32.to_le_bytes());
    buf.extend_from_slice(&[0x78, 0x9c, 0x03, 0x00]);
    buf
}

pub fn collection_account_data(mint: &Pubkey, candy_machine: &Pubkey) -> Vec<u8> {
    let mut buf = account_discriminator(account::COLLECTION_PDA).to_vec();
    buf.extend_from_slice(mint.as_ref());
    buf.extend_from_slice(candy_machine.as_ref());
    buf
}

/// Publish the candy machine program's IDL on `network`.
pub fn publish_idl(network: &MockNetwork, program_id: &Pubkey) {
    let address = get_idl_address(program_id).unwrap();
    network.set_account(address, idl_account_data());
}
