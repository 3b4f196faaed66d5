//! Transaction signing, submission and confirmation.

pub mod batch;
pub mod confirm;
pub mod submit;

pub use batch::TransactionBatch;
pub use confirm::{
    await_confirmation, classify_status, ConfirmationConfig, ConfirmationState,
    ConfirmationTracker, SubmissionResult,
};
pub use submit::{send_batches, submit_batches, submit_mint, MintReceipt};
