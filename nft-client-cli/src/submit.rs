//! Boundary with the ledger: transaction submission, confirmation, balances.
//!
//! The traits are what the workflow service consumes. [`DryRunSubmitter`]
//! is the in-process implementation: it records each transaction, reports it
//! confirmed, and keeps balances in memory.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Mutex;

use base58::ToBase58;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use nft_client_core::encode::InstructionPayload;
use nft_client_core::types::{AccountRef, Address, ProgramId};

use crate::hex::hex_encode;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// `None` for negative, non-finite or out-of-range amounts.
pub fn sol_to_lamports(sol: f64) -> Option<u64> {
    if !sol.is_finite() || sol < 0.0 {
        return None;
    }
    let lamports = (sol * LAMPORTS_PER_SOL as f64).round();
    if lamports > u64::MAX as f64 {
        return None;
    }
    Some(lamports as u64)
}

/// Transaction identifier returned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Pending,
}

/// Collaborator failures. Passed through unchanged; no retry here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Insufficient funds: have {available} lamports, need {required}")]
    InsufficientFunds {
        available: u64,
        required: u64,
    },

    #[error("Unknown transaction {0}")]
    UnknownTransaction(Signature),
}

pub trait TransactionSubmitter {
    /// Sign with the configured fee payer and send one instruction.
    fn submit(
        &self,
        program_id: &ProgramId,
        accounts: &[AccountRef],
        payload: InstructionPayload,
    ) -> impl Future<Output = Result<Signature, SubmitError>> + Send;

    fn confirm(&self, signature: &Signature) -> impl Future<Output = Result<Confirmation, SubmitError>> + Send;
}

pub trait BalanceProvider {
    /// Balance in lamports.
    fn balance(&self, address: &Address) -> impl Future<Output = Result<u64, SubmitError>> + Send;

    fn request_airdrop(
        &self,
        address: &Address,
        lamports: u64,
    ) -> impl Future<Output = Result<Signature, SubmitError>> + Send;
}

/// A transaction accepted by the dry-run ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTransaction {
    pub signature: Signature,
    pub program_id: ProgramId,
    pub accounts: Vec<AccountRef>,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
struct Ledger {
    transactions: Vec<RecordedTransaction>,
    balances: HashMap<Address, u64>,
    nonce: u64,
}

impl Ledger {
    fn next_signature(&mut self, parts: &[&[u8]]) -> Signature {
        let mut hasher = Sha256::new();
        hasher.update(self.nonce.to_le_bytes());
        for part in parts {
            hasher.update(part);
        }
        self.nonce += 1;
        let digest: [u8; 32] = hasher.finalize().into();
        Signature::new(digest.to_base58())
    }
}

#[derive(Debug)]
pub struct DryRunSubmitter {
    rpc_url: String,
    ledger: Mutex<Ledger>,
}

impl DryRunSubmitter {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ledger: Mutex::new(Ledger::default()),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Transactions recorded so far, oldest first.
    pub fn transactions(&self) -> Result<Vec<RecordedTransaction>, SubmitError> {
        Ok(self.lock()?.transactions.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Ledger>, SubmitError> {
        self.ledger
            .lock()
            .map_err(|_| SubmitError::Network("dry-run ledger poisoned".to_string()))
    }
}

impl TransactionSubmitter for DryRunSubmitter {
    async fn submit(
        &self,
        program_id: &ProgramId,
        accounts: &[AccountRef],
        payload: InstructionPayload,
    ) -> Result<Signature, SubmitError> {
        let mut ledger = self.lock()?;
        let data = payload.into_bytes();
        let signature = ledger.next_signature(&[program_id.as_ref(), &data]);
        info!(
            rpc = %self.rpc_url,
            %program_id,
            accounts = accounts.len(),
            data = %hex_encode(&data),
            %signature,
            "dry-run transaction recorded"
        );
        ledger.transactions.push(RecordedTransaction {
            signature: signature.clone(),
            program_id: *program_id,
            accounts: accounts.to_vec(),
            data,
        });
        Ok(signature)
    }

    async fn confirm(&self, signature: &Signature) -> Result<Confirmation, SubmitError> {
        let ledger = self.lock()?;
        if ledger.transactions.iter().any(|tx| &tx.signature == signature) {
            Ok(Confirmation::Confirmed)
        } else {
            Err(SubmitError::UnknownTransaction(signature.clone()))
        }
    }
}

impl BalanceProvider for DryRunSubmitter {
    async fn balance(&self, address: &Address) -> Result<u64, SubmitError> {
        Ok(self.lock()?.balances.get(address).copied().unwrap_or(0))
    }

    async fn request_airdrop(&self, address: &Address, lamports: u64) -> Result<Signature, SubmitError> {
        let mut ledger = self.lock()?;
        let balance = ledger.balances.entry(*address).or_insert(0);
        *balance = balance
            .checked_add(lamports)
            .ok_or_else(|| SubmitError::Rejected("balance overflow".to_string()))?;
        let signature = ledger.next_signature(&[address.as_ref(), &lamports.to_le_bytes()]);
        info!(%address, lamports, %signature, "dry-run airdrop");
        Ok(signature)
    }
}
