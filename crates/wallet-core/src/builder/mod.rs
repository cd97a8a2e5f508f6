//! P2WPKH transaction builder.
//!
//! A build asks the fee provider for a rate, lists prevouts, selects the
//! largest ones until the outputs and fee are covered, returns the rest as
//! change and signs every input. Nothing is retried; the first failing check
//! or provider call ends the build.

mod operations;

use std::sync::Arc;

use bitcoin::Amount;
use chain_dfi::dftx::DfTxData;
use chain_dfi::{DfTx, Script, Transaction, TransactionSegWit, Vout};
use crypto_utils::EllipticPair;
use tracing::{debug, warn};

use crate::config::TxnBuilderOptions;
use crate::error::TxnBuilderError;
use crate::fee::{calculate_fee, check_fee_rate, estimate_vsize, sat_per_kvb};
use crate::provider::{EllipticPairProvider, FeeRateProvider, Prevout, PrevoutProvider};
use crate::signer;

/// Builds signed segwit transactions from injected providers.
pub struct TxnBuilder<F, P, E> {
    fee: F,
    prevouts: P,
    pairs: E,
    options: TxnBuilderOptions,
}

/// Prevouts chosen for a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selection {
    pub prevouts: Vec<Prevout>,
    pub total: Amount,
    pub fee: Amount,
}

impl<F, P, E> TxnBuilder<F, P, E>
where
    F: FeeRateProvider,
    P: PrevoutProvider,
    E: EllipticPairProvider,
{
    pub fn new(fee: F, prevouts: P, pairs: E) -> Self {
        Self {
            fee,
            prevouts,
            pairs,
            options: TxnBuilderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TxnBuilderOptions) -> Result<Self, TxnBuilderError> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn options(&self) -> &TxnBuilderOptions {
        &self.options
    }

    /// The key provider's own script, the usual change destination.
    pub async fn wallet_script(&self) -> Result<Script, TxnBuilderError> {
        self.pairs.script().await
    }

    /// Build a transaction carrying `dftx` in an `OP_RETURN` output.
    ///
    /// A non-zero `spend` is paid to the recipient the payload names:
    /// `AccountToUtxos` pays its `from` script, `UtxosToAccount` carries the
    /// value on the DfTx output itself. Other payloads cannot take a spend.
    pub async fn build_custom_tx(
        &self,
        dftx: DfTx,
        change_script: &Script,
        spend: Option<Amount>,
    ) -> Result<TransactionSegWit, TxnBuilderError> {
        let outputs = payload_outputs(dftx, spend.unwrap_or(Amount::ZERO))?;
        self.assemble(outputs, change_script).await
    }

    /// Pay `amount` to `to`, returning change to `change_script`.
    pub async fn send(
        &self,
        amount: Amount,
        to: &Script,
        change_script: &Script,
    ) -> Result<TransactionSegWit, TxnBuilderError> {
        self.assemble(vec![Vout::new(amount, to.clone())], change_script)
            .await
    }

    /// Sweep every native prevout to `to`, less the fee.
    pub async fn send_all(&self, to: &Script) -> Result<TransactionSegWit, TxnBuilderError> {
        let sat_per_kvb = self.fee_rate().await?;
        let prevouts = self.spendable().await?;
        let total = sum(prevouts.iter().map(|p| p.value))?;

        let mut tx = self.unsigned(&prevouts, vec![Vout::new(Amount::ZERO, to.clone())]);
        let fee = calculate_fee(sat_per_kvb, estimate_vsize(&tx)?)?;
        if total <= fee {
            return Err(TxnBuilderError::InsufficientBalance {
                required: fee,
                available: total,
            });
        }
        tx.vout[0].value = total - fee;
        debug!(inputs = prevouts.len(), %total, %fee, "sweeping prevouts");

        self.sign(tx, prevouts).await
    }

    async fn assemble(
        &self,
        outputs: Vec<Vout>,
        change_script: &Script,
    ) -> Result<TransactionSegWit, TxnBuilderError> {
        let sat_per_kvb = self.fee_rate().await?;
        let prevouts = self.spendable().await?;
        let spend = sum(outputs.iter().map(|o| o.value))?;

        let selection = self.select(prevouts, &outputs, change_script, spend, sat_per_kvb)?;
        debug!(
            inputs = selection.prevouts.len(),
            total = %selection.total,
            fee = %selection.fee,
            "selected prevouts"
        );

        let change = selection
            .total
            .checked_sub(spend)
            .and_then(|v| v.checked_sub(selection.fee))
            .ok_or(TxnBuilderError::AmountOverflow)?;
        let mut outputs = outputs;
        if change > Amount::ZERO {
            outputs.push(Vout::new(change, change_script.clone()));
        }

        let tx = self.unsigned(&selection.prevouts, outputs);
        self.sign(tx, selection.prevouts).await
    }

    /// Largest-first selection. Each prefix is priced with the change output
    /// included, and the first prefix that covers `spend` plus its fee wins.
    fn select(
        &self,
        mut prevouts: Vec<Prevout>,
        outputs: &[Vout],
        change_script: &Script,
        spend: Amount,
        sat_per_kvb: u64,
    ) -> Result<Selection, TxnBuilderError> {
        prevouts.sort_by(|a, b| b.value.cmp(&a.value));

        let mut priced = outputs.to_vec();
        priced.push(Vout::new(Amount::ZERO, change_script.clone()));

        let mut total = Amount::ZERO;
        let mut required = spend;
        for count in 1..=prevouts.len() {
            total = total
                .checked_add(prevouts[count - 1].value)
                .ok_or(TxnBuilderError::AmountOverflow)?;
            let tx = self.unsigned(&prevouts[..count], priced.clone());
            let fee = calculate_fee(sat_per_kvb, estimate_vsize(&tx)?)?;
            required = spend
                .checked_add(fee)
                .ok_or(TxnBuilderError::AmountOverflow)?;
            if total >= required {
                prevouts.truncate(count);
                return Ok(Selection {
                    prevouts,
                    total,
                    fee,
                });
            }
        }

        warn!(%required, available = %total, "prevouts do not cover outputs and fee");
        Err(TxnBuilderError::InsufficientBalance {
            required,
            available: total,
        })
    }

    async fn fee_rate(&self) -> Result<u64, TxnBuilderError> {
        let rate = self.fee.estimate().await?;
        if let Err(err) = check_fee_rate(rate, self.options.max_fee_rate) {
            warn!(rate, max = self.options.max_fee_rate, "rejected fee rate");
            return Err(err);
        }
        debug!(rate, "fee rate");
        Ok(sat_per_kvb(rate))
    }

    /// Native-coin prevouts; token outputs are never spent for fees.
    async fn spendable(&self) -> Result<Vec<Prevout>, TxnBuilderError> {
        let prevouts: Vec<Prevout> = self
            .prevouts
            .all()
            .await?
            .into_iter()
            .filter(|p| p.token_id == 0)
            .collect();
        if prevouts.is_empty() {
            return Err(TxnBuilderError::NoPrevouts);
        }
        Ok(prevouts)
    }

    fn unsigned(&self, prevouts: &[Prevout], vout: Vec<Vout>) -> Transaction {
        Transaction {
            version: self.options.version,
            vin: prevouts
                .iter()
                .map(|p| p.to_vin(self.options.sequence))
                .collect(),
            vout,
            lock_time: self.options.lock_time,
        }
    }

    async fn sign(
        &self,
        tx: Transaction,
        prevouts: Vec<Prevout>,
    ) -> Result<TransactionSegWit, TxnBuilderError> {
        let mut pairs: Vec<Arc<dyn EllipticPair>> = Vec::with_capacity(prevouts.len());
        for prevout in &prevouts {
            pairs.push(self.pairs.get(prevout).await?);
        }

        let signed = signer::sign(tx, &prevouts, &pairs)?;
        let txid = signed.txid()?;
        debug!(%txid, inputs = signed.vin.len(), "built transaction");
        Ok(signed)
    }
}

/// Outputs for `dftx`: the `OP_RETURN` carrier, plus a value output when the
/// payload routes `spend` to a script of its own.
fn payload_outputs(dftx: DfTx, spend: Amount) -> Result<Vec<Vout>, TxnBuilderError> {
    match &dftx.data {
        DfTxData::UtxosToAccount(_) => Ok(vec![Vout::new(spend, Script::op_return_dftx(dftx))]),
        DfTxData::AccountToUtxos(payload) => {
            let recipient = payload.from.clone();
            let mut outputs = vec![Vout::new(Amount::ZERO, Script::op_return_dftx(dftx))];
            if spend > Amount::ZERO {
                outputs.push(Vout::new(spend, recipient));
            }
            Ok(outputs)
        }
        _ if spend > Amount::ZERO => Err(TxnBuilderError::NoSpendRecipient(dftx.name())),
        _ => Ok(vec![Vout::new(Amount::ZERO, Script::op_return_dftx(dftx))]),
    }
}

fn sum(mut values: impl Iterator<Item = Amount>) -> Result<Amount, TxnBuilderError> {
    values.try_fold(Amount::ZERO, |acc, v| {
        acc.checked_add(v).ok_or(TxnBuilderError::AmountOverflow)
    })
}
