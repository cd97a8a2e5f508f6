//! Collaborators the builder depends on.
//!
//! Fee estimation and prevout listing usually talk to a node; key lookup may
//! reach a hardware signer. The builder calls each provider sequentially and
//! never retries, so timeouts and cancellation belong to the implementation.

use std::sync::Arc;

use async_trait::async_trait;
use bitcoin::Amount;
use chain_dfi::{Script, Vin};
use crypto_utils::hash::hash160;
use crypto_utils::EllipticPair;

use crate::error::TxnBuilderError;

/// An unspent output the wallet can sign for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prevout {
    /// Transaction id in display order.
    pub txid: String,
    /// Output index within that transaction.
    pub vout: u32,
    pub value: Amount,
    /// Locking script of the output.
    pub script: Script,
    /// `0` for native coin outputs.
    pub token_id: u32,
}

impl Prevout {
    pub fn to_vin(&self, sequence: u32) -> Vin {
        Vin {
            sequence,
            ..Vin::new(self.txid.clone(), self.vout)
        }
    }
}

/// Source of the current fee rate, in coin per 1000 vbytes.
#[async_trait]
pub trait FeeRateProvider: Send + Sync {
    async fn estimate(&self) -> Result<f64, TxnBuilderError>;
}

#[async_trait]
pub trait PrevoutProvider: Send + Sync {
    /// Every prevout currently spendable by the wallet.
    async fn all(&self) -> Result<Vec<Prevout>, TxnBuilderError>;

    /// Prevouts summing to at least `min_balance`.
    async fn collect(&self, min_balance: Amount) -> Result<Vec<Prevout>, TxnBuilderError>;
}

#[async_trait]
pub trait EllipticPairProvider: Send + Sync {
    /// Script that change and account operations are attributed to.
    async fn script(&self) -> Result<Script, TxnBuilderError>;

    /// Key able to sign for `prevout`.
    async fn get(&self, prevout: &Prevout) -> Result<Arc<dyn EllipticPair>, TxnBuilderError>;
}

/// P2WPKH script locking to `pubkey`.
pub fn p2wpkh_script(pubkey: &[u8; 33]) -> Script {
    Script::p2wpkh(&hash160(pubkey))
}

/// A fixed fee rate.
#[derive(Debug, Clone, Copy)]
pub struct StaticFeeRate(pub f64);

#[async_trait]
impl FeeRateProvider for StaticFeeRate {
    async fn estimate(&self) -> Result<f64, TxnBuilderError> {
        Ok(self.0)
    }
}

/// Prevouts held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrevoutProvider {
    prevouts: Vec<Prevout>,
}

impl MemoryPrevoutProvider {
    pub fn new(prevouts: Vec<Prevout>) -> Self {
        Self { prevouts }
    }
}

#[async_trait]
impl PrevoutProvider for MemoryPrevoutProvider {
    async fn all(&self) -> Result<Vec<Prevout>, TxnBuilderError> {
        Ok(self.prevouts.clone())
    }

    async fn collect(&self, min_balance: Amount) -> Result<Vec<Prevout>, TxnBuilderError> {
        let mut sorted = self.prevouts.clone();
        sorted.sort_by(|a, b| b.value.cmp(&a.value));

        let mut total = Amount::ZERO;
        let mut selected = Vec::new();
        for prevout in sorted {
            if total >= min_balance {
                break;
            }
            total = total
                .checked_add(prevout.value)
                .ok_or(TxnBuilderError::AmountOverflow)?;
            selected.push(prevout);
        }

        if total < min_balance {
            return Err(TxnBuilderError::InsufficientBalance {
                required: min_balance,
                available: total,
            });
        }
        Ok(selected)
    }
}

/// Signs every prevout with one key.
pub struct SingleKeyProvider {
    pair: Arc<dyn EllipticPair>,
}

impl SingleKeyProvider {
    pub fn new(pair: Arc<dyn EllipticPair>) -> Self {
        Self { pair }
    }
}

#[async_trait]
impl EllipticPairProvider for SingleKeyProvider {
    async fn script(&self) -> Result<Script, TxnBuilderError> {
        Ok(p2wpkh_script(&self.pair.public_key()?))
    }

    async fn get(&self, _prevout: &Prevout) -> Result<Arc<dyn EllipticPair>, TxnBuilderError> {
        Ok(Arc::clone(&self.pair))
    }
}
