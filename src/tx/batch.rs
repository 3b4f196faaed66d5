//! Instruction batches and their signing.

use solana_hash::Hash;
use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_signer::Signer;
use solana_transaction::Transaction;

use crate::error::{SdkError, SdkResult};

/// Ordered instructions destined for one atomic transaction, with the
/// throwaway keypairs that must sign it besides the payer.
///
/// The batch owns its signers. Signing consumes the batch, so a throwaway
/// keypair can never end up in a second transaction.
pub struct TransactionBatch {
    instructions: Vec<Instruction>,
    signers: Vec<Keypair>,
}

impl TransactionBatch {
    pub fn new(instructions: Vec<Instruction>, signers: Vec<Keypair>) -> Self {
        Self {
            instructions,
            signers,
        }
    }

    /// A batch with no instructions is never submitted.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of keypairs besides the payer.
    pub fn signer_count(&self) -> usize {
        self.signers.len()
    }

    /// Build and sign the transaction with `payer` as fee payer.
    pub fn sign(self, payer: &dyn Signer, blockhash: Hash) -> SdkResult<Transaction> {
        let mut tx = Transaction::new_with_payer(&self.instructions, Some(&payer.pubkey()));

        let mut signers: Vec<&dyn Signer> = Vec::with_capacity(self.signers.len() + 1);
        signers.push(payer);
        signers.extend(self.signers.iter().map(|k| k as &dyn Signer));

        tx.try_sign(&signers, blockhash)
            .map_err(|e| SdkError::Signing(e.to_string()))?;
        Ok(tx)
    }
}

impl std::fmt::Debug for TransactionBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionBatch")
            .field("instructions", &self.instructions.len())
            .field(
                "signers",
                &self.signers.iter().map(|k| k.pubkey()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_instruction::AccountMeta;
    use solana_pubkey::Pubkey;

    fn ix_requiring(signer: &Keypair) -> Instruction {
        Instruction {
            program_id: Pubkey::new_from_array([42; 32]),
            accounts: vec![AccountMeta::new_readonly(signer.pubkey(), true)],
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_sign_with_throwaway_signer() {
        let payer = Keypair::new();
        let throwaway = Keypair::new();
        let batch = TransactionBatch::new(vec![ix_requiring(&throwaway)], vec![throwaway]);

        assert_eq!(batch.signer_count(), 1);
        let tx = batch.sign(&payer, Hash::default()).unwrap();

        assert_eq!(tx.signatures.len(), 2);
        assert!(tx.is_signed());
        assert_eq!(tx.message.account_keys[0], payer.pubkey());
    }

    #[test]
    fn test_sign_missing_signer_fails() {
        let payer = Keypair::new();
        let absent = Keypair::new();
        let batch = TransactionBatch::new(vec![ix_requiring(&absent)], Vec::new());

        let result = batch.sign(&payer, Hash::default());
        assert!(matches!(result, Err(SdkError::Signing(_))));
    }

    #[test]
    fn test_empty_batch() {
        let batch = TransactionBatch::new(Vec::new(), Vec::new());
        assert!(batch.is_empty());
        assert!(batch.instructions().is_empty());
    }
}
