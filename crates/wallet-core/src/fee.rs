use bitcoin::Amount;
use chain_dfi::{Transaction, TransactionSegWit};

use crate::error::TxnBuilderError;
use crate::signer::placeholder_witness;

/// Satoshi per coin.
pub const COIN: u64 = 100_000_000;

/// Highest accepted fee rate in coin per 1000 vbytes.
pub const DEFAULT_MAX_FEE_RATE: f64 = 0.001;

/// Reject fee rates that are NaN, negative or above `max`.
pub fn check_fee_rate(rate: f64, max: f64) -> Result<(), TxnBuilderError> {
    if rate.is_nan() {
        return Err(TxnBuilderError::FeeRateNaN);
    }
    if rate < 0.0 {
        return Err(TxnBuilderError::NegativeFeeRate(rate));
    }
    if rate > max {
        return Err(TxnBuilderError::FeeRateTooHigh { rate, max });
    }
    Ok(())
}

/// Convert a checked coin/kvB rate to whole satoshi per 1000 vbytes.
pub fn sat_per_kvb(rate: f64) -> u64 {
    (rate * COIN as f64).round() as u64
}

/// Fee for `vsize` vbytes, rounded up to the next satoshi.
pub fn calculate_fee(sat_per_kvb: u64, vsize: usize) -> Result<Amount, TxnBuilderError> {
    let numerator = sat_per_kvb
        .checked_mul(vsize as u64)
        .ok_or(TxnBuilderError::AmountOverflow)?;
    Ok(Amount::from_sat(numerator.div_ceil(1000)))
}

/// Virtual size of `tx` once every input carries a P2WPKH witness.
pub fn estimate_vsize(tx: &Transaction) -> Result<usize, TxnBuilderError> {
    let witness = vec![placeholder_witness(); tx.vin.len()];
    let segwit = TransactionSegWit::from_parts(tx.clone(), witness)?;
    Ok(segwit.vsize()?)
}
