//! End-to-end builds against in-memory providers:
//! providers -> select -> assemble -> sign -> decode and verify.

use std::sync::Arc;

use async_trait::async_trait;
use bitcoin::Amount;
use chain_dfi::dftx::{
    AccountToUtxos, DfTxData, MaxPrice, PoolSwap, ScriptBalances, TokenBalance, UtxosToAccount,
};
use chain_dfi::{Composable, Script, Transaction, TransactionSegWit, WitnessProgram};
use crypto_utils::elliptic::verify_der;
use crypto_utils::hash::hash160;
use crypto_utils::{EllipticPair, Secp256k1Pair};
use wallet_core::fee::{calculate_fee, estimate_vsize, sat_per_kvb};
use wallet_core::provider::p2wpkh_script;
use wallet_core::*;

const RATE: f64 = 0.00001;

fn coins(value: f64) -> Amount {
    Amount::from_sat((value * COIN as f64).round() as u64)
}

fn fixed_key() -> Arc<Secp256k1Pair> {
    let mut secret = [0u8; 32];
    secret[31] = 42;
    Arc::new(Secp256k1Pair::from_secret_bytes(&secret).unwrap())
}

fn prevouts_for(script: &Script, values: &[Amount]) -> Vec<Prevout> {
    values
        .iter()
        .enumerate()
        .map(|(n, value)| Prevout {
            txid: hex::encode([n as u8 + 0x10; 32]),
            vout: n as u32,
            value: *value,
            script: script.clone(),
            token_id: 0,
        })
        .collect()
}

fn wallet<F: FeeRateProvider>(
    fee: F,
    values: &[Amount],
) -> (TxnBuilder<F, MemoryPrevoutProvider, SingleKeyProvider>, Script, Vec<Prevout>) {
    let pair = fixed_key();
    let script = p2wpkh_script(&pair.public_key().unwrap());
    let prevouts = prevouts_for(&script, values);
    let builder = TxnBuilder::new(
        fee,
        MemoryPrevoutProvider::new(prevouts.clone()),
        SingleKeyProvider::new(pair),
    );
    (builder, script, prevouts)
}

fn spent_value(tx: &TransactionSegWit, prevouts: &[Prevout]) -> Amount {
    tx.vin
        .iter()
        .map(|vin| {
            prevouts
                .iter()
                .find(|p| p.txid == vin.txid && p.vout == vin.index)
                .unwrap()
                .value
        })
        .sum()
}

fn expected_fee(tx: &TransactionSegWit, rate: f64) -> Amount {
    let vsize = estimate_vsize(&tx.to_transaction()).unwrap();
    calculate_fee(sat_per_kvb(rate), vsize).unwrap()
}

fn assert_signatures_verify(tx: &TransactionSegWit, prevouts: &[Prevout]) {
    let unsigned = tx.to_transaction();
    assert_eq!(tx.witness.len(), tx.vin.len());
    for (index, (vin, witness)) in tx.vin.iter().zip(&tx.witness).enumerate() {
        let prevout = prevouts
            .iter()
            .find(|p| p.txid == vin.txid && p.vout == vin.index)
            .unwrap();
        let sig = &witness.scripts[0].data;
        let pubkey: [u8; 33] = witness.scripts[1].data.as_slice().try_into().unwrap();
        assert_eq!(*sig.last().unwrap(), 0x01);

        let digest = WitnessProgram::new(&unsigned, index, &hash160(&pubkey), prevout.value)
            .unwrap()
            .hash()
            .unwrap();
        assert!(verify_der(&pubkey, &digest, &sig[..sig.len() - 1]).unwrap());
    }
}

// ─── Providers with failure modes ────────────────────────────────────

struct FailingFeeRate;

#[async_trait]
impl FeeRateProvider for FailingFeeRate {
    async fn estimate(&self) -> Result<f64, TxnBuilderError> {
        Err(TxnBuilderError::Provider("node unreachable".into()))
    }
}

/// Hands out a fresh random key for every prevout.
struct RandomKeyProvider {
    script: Script,
}

#[async_trait]
impl EllipticPairProvider for RandomKeyProvider {
    async fn script(&self) -> Result<Script, TxnBuilderError> {
        Ok(self.script.clone())
    }

    async fn get(&self, _prevout: &Prevout) -> Result<Arc<dyn EllipticPair>, TxnBuilderError> {
        Ok(Arc::new(Secp256k1Pair::random()))
    }
}

// ─── Account conversion ──────────────────────────────────────────────

#[tokio::test]
async fn account_to_utxos_from_ten_coins() {
    let (builder, script, prevouts) = wallet(StaticFeeRate(RATE), &[coins(10.0)]);
    let payload = AccountToUtxos {
        from: script.clone(),
        balances: vec![TokenBalance::new(0, coins(2.34))],
        minting_outputs_start: 0,
    };

    let tx = builder.account_to_utxos(payload, &script).await.unwrap();

    assert_eq!(tx.vin.len(), 1);
    assert_eq!(tx.vout.len(), 3);
    let dftx = tx.vout[0].script.dftx().unwrap();
    assert_eq!(tx.vout[0].value, Amount::ZERO);
    match &dftx.data {
        DfTxData::AccountToUtxos(data) => assert_eq!(data.minting_outputs_start, 1),
        other => panic!("unexpected payload {other:?}"),
    }

    assert_eq!(tx.vout[1].value, coins(2.34));
    assert_eq!(tx.vout[1].script, script);

    let change = tx.vout[2].value;
    assert_eq!(tx.vout[2].script, script);
    assert!(change < coins(10.0 - 2.34));
    assert!(change > coins(10.0 - 2.34 - 0.001));

    assert_eq!(
        spent_value(&tx, &prevouts),
        tx.to_transaction().total_out().unwrap() + expected_fee(&tx, RATE)
    );
    assert_signatures_verify(&tx, &prevouts);
}

#[tokio::test]
async fn utxos_to_account_carries_value_on_dftx_output() {
    let (builder, script, prevouts) = wallet(StaticFeeRate(RATE), &[coins(1.0)]);
    let payload = UtxosToAccount {
        to: vec![ScriptBalances {
            script: script.clone(),
            balances: vec![TokenBalance::new(0, coins(0.5))],
        }],
    };

    let tx = builder.utxos_to_account(payload, &script).await.unwrap();

    assert_eq!(tx.vout.len(), 2);
    assert!(tx.vout[0].script.dftx().is_some());
    assert_eq!(tx.vout[0].value, coins(0.5));
    assert_eq!(
        spent_value(&tx, &prevouts),
        coins(0.5) + tx.vout[1].value + expected_fee(&tx, RATE)
    );
}

#[tokio::test]
async fn pool_swap_rejects_explicit_spend() {
    let (builder, script, _) = wallet(StaticFeeRate(RATE), &[coins(1.0)]);
    let swap = PoolSwap {
        from_script: script.clone(),
        from_token_id: 0,
        from_amount: coins(0.1),
        to_script: script.clone(),
        to_token_id: 1,
        max_price: MaxPrice::UNBOUNDED,
    };

    let err = builder
        .build_custom_tx(chain_dfi::DfTx::new(swap.clone()), &script, Some(coins(0.1)))
        .await
        .unwrap_err();
    assert!(matches!(err, TxnBuilderError::NoSpendRecipient(_)));

    let tx = builder.pool_swap(swap, &script).await.unwrap();
    assert_eq!(tx.vout[0].value, Amount::ZERO);
    assert_eq!(tx.vout.len(), 2);
}

// ─── Selection and conservation ──────────────────────────────────────

#[tokio::test]
async fn selects_only_what_is_needed() {
    let values = [coins(1.0), coins(5.0), coins(3.0)];
    let to = Script::p2wpkh(&[0x77; 20]);

    let (builder, change, prevouts) = wallet(StaticFeeRate(RATE), &values);
    let tx = builder.send(coins(4.0), &to, &change).await.unwrap();
    assert_eq!(tx.vin.len(), 1);
    assert_eq!(spent_value(&tx, &prevouts), coins(5.0));

    let tx = builder.send(coins(6.0), &to, &change).await.unwrap();
    assert_eq!(tx.vin.len(), 2);
    assert_eq!(spent_value(&tx, &prevouts), coins(8.0));
    assert_eq!(
        spent_value(&tx, &prevouts),
        coins(6.0) + tx.vout[1].value + expected_fee(&tx, RATE)
    );
    assert_signatures_verify(&tx, &prevouts);
}

#[tokio::test]
async fn spends_everything_when_needed() {
    let values = [coins(1.0), coins(2.0)];
    let (builder, change, prevouts) = wallet(StaticFeeRate(RATE), &values);
    let tx = builder
        .send(coins(2.9), &Script::p2wpkh(&[0x77; 20]), &change)
        .await
        .unwrap();
    assert_eq!(tx.vin.len(), 2);
    assert_eq!(
        spent_value(&tx, &prevouts),
        tx.to_transaction().total_out().unwrap() + expected_fee(&tx, RATE)
    );
}

#[tokio::test]
async fn insufficient_balance() {
    let (builder, change, _) = wallet(StaticFeeRate(RATE), &[coins(1.0), coins(2.0)]);
    let err = builder
        .send(coins(3.0), &Script::p2wpkh(&[0x77; 20]), &change)
        .await
        .unwrap_err();
    assert!(matches!(err, TxnBuilderError::InsufficientBalance { .. }));
    assert_eq!(err.to_string(), "not enough balance after combing all prevouts");
}

#[tokio::test]
async fn no_prevouts() {
    let (builder, change, _) = wallet(StaticFeeRate(RATE), &[]);
    let err = builder
        .send(coins(1.0), &Script::p2wpkh(&[0x77; 20]), &change)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "no prevouts available to create a transaction");
}

#[tokio::test]
async fn token_prevouts_are_not_spent() {
    let pair = fixed_key();
    let script = p2wpkh_script(&pair.public_key().unwrap());
    let mut prevouts = prevouts_for(&script, &[coins(1.0)]);
    prevouts[0].token_id = 3;
    let builder = TxnBuilder::new(
        StaticFeeRate(RATE),
        MemoryPrevoutProvider::new(prevouts),
        SingleKeyProvider::new(pair),
    );
    let err = builder.send_all(&script).await.unwrap_err();
    assert!(matches!(err, TxnBuilderError::NoPrevouts));
}

// ─── Fee rate checks ─────────────────────────────────────────────────

#[tokio::test]
async fn nan_fee_rate() {
    let (builder, change, _) = wallet(StaticFeeRate(f64::NAN), &[coins(1.0)]);
    let err = builder
        .send(coins(0.1), &Script::p2wpkh(&[0x77; 20]), &change)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "fee rate is NaN");
}

#[tokio::test]
async fn fee_rate_above_ceiling() {
    let (builder, change, _) = wallet(StaticFeeRate(0.00101), &[coins(1.0)]);
    let err = builder
        .send(coins(0.1), &Script::p2wpkh(&[0x77; 20]), &change)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "attempting to use a fee rate higher than MAX_FEE_RATE of 0.001 is not allowed"
    );
}

#[tokio::test]
async fn ceiling_follows_options() {
    let (builder, change, _) = wallet(StaticFeeRate(0.002), &[coins(1.0)]);
    let builder = builder
        .with_options(TxnBuilderOptions::from_json(r#"{"maxFeeRate": 0.005}"#).unwrap())
        .unwrap();
    let tx = builder
        .send(coins(0.1), &Script::p2wpkh(&[0x77; 20]), &change)
        .await
        .unwrap();
    assert_eq!(tx.vout.len(), 2);
}

#[tokio::test]
async fn provider_failure_propagates() {
    let (builder, change, _) = wallet(FailingFeeRate, &[coins(1.0)]);
    let err = builder
        .send(coins(0.1), &Script::p2wpkh(&[0x77; 20]), &change)
        .await
        .unwrap_err();
    assert!(matches!(err, TxnBuilderError::Provider(_)));
}

// ─── Signing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn mismatched_key_is_rejected() {
    let pair = fixed_key();
    let script = p2wpkh_script(&pair.public_key().unwrap());
    let builder = TxnBuilder::new(
        StaticFeeRate(RATE),
        MemoryPrevoutProvider::new(prevouts_for(&script, &[coins(1.0)])),
        RandomKeyProvider {
            script: script.clone(),
        },
    );
    let err = builder
        .send(coins(0.1), &Script::p2wpkh(&[0x77; 20]), &script)
        .await
        .unwrap_err();
    assert!(matches!(err, TxnBuilderError::SigningMismatch { index: 0, .. }));
}

#[tokio::test]
async fn built_transaction_decodes_with_stable_txid() {
    let (builder, change, _) = wallet(StaticFeeRate(RATE), &[coins(1.0), coins(2.0)]);
    let tx = builder
        .send(coins(2.5), &Script::p2wpkh(&[0x77; 20]), &change)
        .await
        .unwrap();

    let bytes = tx.to_bytes().unwrap();
    let decoded = TransactionSegWit::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, tx);
    assert_eq!(decoded.txid().unwrap(), tx.txid().unwrap());

    let legacy = Transaction::from_bytes(&tx.to_transaction().to_bytes().unwrap()).unwrap();
    assert_eq!(legacy.txid().unwrap(), tx.txid().unwrap());
    assert_ne!(tx.wtxid().unwrap(), tx.txid().unwrap());
}

#[tokio::test]
async fn options_shape_the_transaction() {
    let (builder, change, _) = wallet(StaticFeeRate(RATE), &[coins(1.0)]);
    let options = TxnBuilderOptions {
        version: 2,
        sequence: 0xffff_fffd,
        lock_time: 500,
        ..Default::default()
    };
    let builder = builder.with_options(options).unwrap();
    let tx = builder
        .send(coins(0.1), &Script::p2wpkh(&[0x77; 20]), &change)
        .await
        .unwrap();
    assert_eq!(tx.version, 2);
    assert_eq!(tx.lock_time, 500);
    assert!(tx.vin.iter().all(|vin| vin.sequence == 0xffff_fffd));
}
