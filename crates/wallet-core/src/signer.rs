use std::sync::Arc;

use chain_dfi::{Transaction, TransactionSegWit, Witness, WitnessProgram, SIGHASH_ALL};
use crypto_utils::hash::hash160;
use crypto_utils::EllipticPair;
use tracing::trace;

use crate::error::TxnBuilderError;
use crate::provider::Prevout;

/// Upper bound of a DER signature plus the sighash byte.
const MAX_SIGNATURE_LEN: usize = 73;
const PUBKEY_LEN: usize = 33;

/// A witness of the same size as a real P2WPKH one, for fee estimation.
pub fn placeholder_witness() -> Witness {
    Witness::new(vec![vec![0u8; MAX_SIGNATURE_LEN], vec![0u8; PUBKEY_LEN]])
}

/// Sign input `index` of `tx`, which spends `prevout`, with `pair`.
///
/// Returns the witness `[signature || SIGHASH_ALL, pubkey]`.
pub fn sign_input(
    tx: &Transaction,
    index: usize,
    prevout: &Prevout,
    pair: &dyn EllipticPair,
) -> Result<Witness, TxnBuilderError> {
    let pubkey = pair.public_key()?;
    let pubkey_hash = hash160(&pubkey);

    match prevout.script.p2wpkh_hash() {
        Some(hash) if hash == pubkey_hash => {}
        Some(_) => {
            return Err(TxnBuilderError::SigningMismatch {
                index,
                reason: "key does not match the prevout script".into(),
            })
        }
        None => {
            return Err(TxnBuilderError::SigningMismatch {
                index,
                reason: "prevout script is not P2WPKH".into(),
            })
        }
    }

    let program = WitnessProgram::new(tx, index, &pubkey_hash, prevout.value)?;
    let digest = program.hash()?;
    let mut signature = pair.sign(&digest)?;
    signature.push(SIGHASH_ALL as u8);
    trace!(index, txid = %prevout.txid, vout = prevout.vout, "signed input");

    Ok(Witness::new(vec![signature, pubkey.to_vec()]))
}

/// Sign every input of `tx`. `prevouts` and `pairs` are in input order.
pub fn sign(
    tx: Transaction,
    prevouts: &[Prevout],
    pairs: &[Arc<dyn EllipticPair>],
) -> Result<TransactionSegWit, TxnBuilderError> {
    if prevouts.len() != tx.vin.len() || pairs.len() != tx.vin.len() {
        return Err(TxnBuilderError::SigningMismatch {
            index: prevouts.len().min(pairs.len()),
            reason: format!(
                "{} inputs but {} prevouts and {} keys",
                tx.vin.len(),
                prevouts.len(),
                pairs.len()
            ),
        });
    }

    let witness = prevouts
        .iter()
        .zip(pairs)
        .enumerate()
        .map(|(index, (prevout, pair))| sign_input(&tx, index, prevout, pair.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TransactionSegWit::from_parts(tx, witness)?)
}
