//! BIP143 signature preimage for P2WPKH inputs.

use bitcoin::Amount;
use crypto_utils::hash::dsha256;

use crate::buffer::{composable, Bytes, Composable, Composer, Hex, Satoshi, Single, UInt32};
use crate::error::CodecError;
use crate::script::Script;
use crate::transaction::Transaction;

pub const SIGHASH_ALL: u32 = 0x01;

composable! {
    /// The message an input signature commits to, in wire order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct WitnessProgram {
        pub version: u32 => UInt32,
        pub hash_prevouts: [u8; 32] => Bytes<32>,
        pub hash_sequence: [u8; 32] => Bytes<32>,
        pub outpoint_txid: String => Hex<32>,
        pub outpoint_index: u32 => UInt32,
        /// `p2pkh(pubkey_hash)`, not the empty witness script.
        pub script_code: Script => Single,
        /// Value of the output being spent.
        pub value: Amount => Satoshi,
        pub sequence: u32 => UInt32,
        pub hash_outputs: [u8; 32] => Bytes<32>,
        pub lock_time: u32 => UInt32,
        pub hash_type: u32 => UInt32,
    }
}

impl WitnessProgram {
    /// Build the preimage for input `index` of `tx`, spending `value` locked
    /// to `pubkey_hash`.
    pub fn new(
        tx: &Transaction,
        index: usize,
        pubkey_hash: &[u8; 20],
        value: Amount,
    ) -> Result<Self, CodecError> {
        let vin = tx.vin.get(index).ok_or(CodecError::InputIndex {
            index,
            count: tx.vin.len(),
        })?;

        let mut prevouts = Vec::with_capacity(tx.vin.len() * 36);
        let mut sequences = Vec::with_capacity(tx.vin.len() * 4);
        for input in &tx.vin {
            Hex::<32>::write(&input.txid, &mut prevouts)
                .map_err(|e| e.in_field("WitnessProgram", "hash_prevouts"))?;
            UInt32::write(&input.index, &mut prevouts)?;
            UInt32::write(&input.sequence, &mut sequences)?;
        }

        let mut outputs = Vec::new();
        for out in &tx.vout {
            out.write_versioned(tx.version, &mut outputs)
                .map_err(|e| e.in_field("WitnessProgram", "hash_outputs"))?;
        }

        Ok(Self {
            version: tx.version,
            hash_prevouts: dsha256(&prevouts),
            hash_sequence: dsha256(&sequences),
            outpoint_txid: vin.txid.clone(),
            outpoint_index: vin.index,
            script_code: Script::p2pkh(pubkey_hash),
            value,
            sequence: vin.sequence,
            hash_outputs: dsha256(&outputs),
            lock_time: tx.lock_time,
            hash_type: SIGHASH_ALL,
        })
    }

    /// The 32-byte digest to sign.
    pub fn hash(&self) -> Result<[u8; 32], CodecError> {
        Ok(dsha256(&self.to_bytes()?))
    }
}
