//! Transaction wire structures.

pub mod vin;
pub mod vout;
pub mod witness;

use bitcoin::Amount;
use crypto_utils::hash::dsha256;

use crate::buffer::{
    read_array, write_array, BufferReader, Composable, Composer, Single, UInt32, UInt8,
    VarUIntArray,
};
use crate::error::CodecError;

pub use vin::Vin;
pub use vout::{Vout, VoutV2, VoutV4};
pub use witness::{Witness, WitnessScript};

/// First version whose outputs carry a token id.
pub const TOKENS_MIN_VERSION: u32 = 4;
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;
pub const SEGWIT_MARKER: u8 = 0x00;
pub const SEGWIT_FLAG: u8 = 0x01;

fn read_vouts(version: u32, buf: &mut BufferReader<'_>) -> Result<Vec<Vout>, CodecError> {
    if version < TOKENS_MIN_VERSION {
        VarUIntArray::<VoutV2>::read(buf)
    } else {
        VarUIntArray::<VoutV4>::read(buf)
    }
}

fn write_vouts(version: u32, vout: &Vec<Vout>, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    if version < TOKENS_MIN_VERSION {
        VarUIntArray::<VoutV2>::write(vout, buf)
    } else {
        VarUIntArray::<VoutV4>::write(vout, buf)
    }
}

/// Hash of the serialized bytes, reversed for display.
fn display_hash(bytes: &[u8]) -> String {
    let mut hash = dsha256(bytes);
    hash.reverse();
    hex::encode(hash)
}

/// A transaction without witness data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub vin: Vec<Vin>,
    pub vout: Vec<Vout>,
    pub lock_time: u32,
}

impl Transaction {
    /// Double SHA-256 of the serialization, big-endian hex.
    pub fn txid(&self) -> Result<String, CodecError> {
        Ok(display_hash(&self.to_bytes()?))
    }

    pub fn weight(&self) -> Result<usize, CodecError> {
        Ok(self.to_bytes()?.len() * 4)
    }

    pub fn vsize(&self) -> Result<usize, CodecError> {
        Ok(self.to_bytes()?.len())
    }

    /// Sum of every output value.
    pub fn total_out(&self) -> Result<Amount, CodecError> {
        self.vout
            .iter()
            .try_fold(Amount::ZERO, |sum, out| sum.checked_add(out.value))
            .ok_or(CodecError::AmountOverflow)
    }
}

impl Composable for Transaction {
    fn from_buffer(buf: &mut BufferReader<'_>) -> Result<Self, CodecError> {
        let version: u32 =
            UInt32::read(buf).map_err(|e| e.in_field("Transaction", "version"))?;
        let vin: Vec<Vin> =
            VarUIntArray::<Single>::read(buf).map_err(|e| e.in_field("Transaction", "vin"))?;
        let vout = read_vouts(version, buf).map_err(|e| e.in_field("Transaction", "vout"))?;
        let lock_time: u32 =
            UInt32::read(buf).map_err(|e| e.in_field("Transaction", "lock_time"))?;
        Ok(Self {
            version,
            vin,
            vout,
            lock_time,
        })
    }

    fn to_buffer(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        UInt32::write(&self.version, buf)?;
        VarUIntArray::<Single>::write(&self.vin, buf)
            .map_err(|e| e.in_field("Transaction", "vin"))?;
        write_vouts(self.version, &self.vout, buf)
            .map_err(|e| e.in_field("Transaction", "vout"))?;
        UInt32::write(&self.lock_time, buf)
    }
}

/// A transaction with the segregated witness layout.
///
/// `witness` holds one entry per input; the count is not on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSegWit {
    pub version: u32,
    pub marker: u8,
    pub flag: u8,
    pub vin: Vec<Vin>,
    pub vout: Vec<Vout>,
    pub witness: Vec<Witness>,
    pub lock_time: u32,
}

impl TransactionSegWit {
    /// Attach `witness` to `tx`; there must be exactly one per input.
    pub fn from_parts(tx: Transaction, witness: Vec<Witness>) -> Result<Self, CodecError> {
        check_witness_count(tx.vin.len(), witness.len())?;
        Ok(Self {
            version: tx.version,
            marker: SEGWIT_MARKER,
            flag: SEGWIT_FLAG,
            vin: tx.vin,
            vout: tx.vout,
            witness,
            lock_time: tx.lock_time,
        })
    }

    /// The non-witness view. This is what the txid commits to.
    pub fn to_transaction(&self) -> Transaction {
        Transaction {
            version: self.version,
            vin: self.vin.clone(),
            vout: self.vout.clone(),
            lock_time: self.lock_time,
        }
    }

    pub fn txid(&self) -> Result<String, CodecError> {
        self.to_transaction().txid()
    }

    /// Hash of the full serialization including witness data.
    pub fn wtxid(&self) -> Result<String, CodecError> {
        Ok(display_hash(&self.to_bytes()?))
    }

    /// Base size × 3 + total size.
    pub fn weight(&self) -> Result<usize, CodecError> {
        let base = self.to_transaction().to_bytes()?.len();
        let total = self.to_bytes()?.len();
        Ok(base * 3 + total)
    }

    pub fn vsize(&self) -> Result<usize, CodecError> {
        Ok(self.weight()?.div_ceil(4))
    }

    fn check_marker(&self) -> Result<(), CodecError> {
        check_marker_byte("marker", SEGWIT_MARKER, self.marker)?;
        check_marker_byte("flag", SEGWIT_FLAG, self.flag)
    }
}

fn check_marker_byte(field: &'static str, expected: u8, actual: u8) -> Result<(), CodecError> {
    if actual != expected {
        return Err(CodecError::InvalidMarker {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_witness_count(vin: usize, witness: usize) -> Result<(), CodecError> {
    if vin != witness {
        return Err(CodecError::WitnessCount { vin, witness });
    }
    Ok(())
}

impl Composable for TransactionSegWit {
    fn from_buffer(buf: &mut BufferReader<'_>) -> Result<Self, CodecError> {
        let version: u32 =
            UInt32::read(buf).map_err(|e| e.in_field("TransactionSegWit", "version"))?;
        let marker: u8 = UInt8::read(buf)
            .and_then(|m| check_marker_byte("marker", SEGWIT_MARKER, m).map(|_| m))
            .map_err(|e| e.in_field("TransactionSegWit", "marker"))?;
        let flag: u8 = UInt8::read(buf)
            .and_then(|f| check_marker_byte("flag", SEGWIT_FLAG, f).map(|_| f))
            .map_err(|e| e.in_field("TransactionSegWit", "flag"))?;
        let vin: Vec<Vin> = VarUIntArray::<Single>::read(buf)
            .map_err(|e| e.in_field("TransactionSegWit", "vin"))?;
        let vout =
            read_vouts(version, buf).map_err(|e| e.in_field("TransactionSegWit", "vout"))?;
        let witness = read_array::<Witness, Single>(buf, vin.len())
            .map_err(|e| e.in_field("TransactionSegWit", "witness"))?;
        let lock_time: u32 =
            UInt32::read(buf).map_err(|e| e.in_field("TransactionSegWit", "lock_time"))?;
        Ok(Self {
            version,
            marker,
            flag,
            vin,
            vout,
            witness,
            lock_time,
        })
    }

    fn to_buffer(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        self.check_marker()?;
        check_witness_count(self.vin.len(), self.witness.len())?;
        UInt32::write(&self.version, buf)?;
        buf.push(self.marker);
        buf.push(self.flag);
        VarUIntArray::<Single>::write(&self.vin, buf)
            .map_err(|e| e.in_field("TransactionSegWit", "vin"))?;
        write_vouts(self.version, &self.vout, buf)
            .map_err(|e| e.in_field("TransactionSegWit", "vout"))?;
        write_array::<Witness, Single>(&self.witness, self.vin.len(), buf)
            .map_err(|e| e.in_field("TransactionSegWit", "witness"))?;
        UInt32::write(&self.lock_time, buf)
    }
}

/// Either transaction layout, told apart by the marker after the version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTransaction {
    Legacy(Transaction),
    SegWit(TransactionSegWit),
}

impl RawTransaction {
    pub fn txid(&self) -> Result<String, CodecError> {
        match self {
            RawTransaction::Legacy(tx) => tx.txid(),
            RawTransaction::SegWit(tx) => tx.txid(),
        }
    }

    pub fn to_transaction(&self) -> Transaction {
        match self {
            RawTransaction::Legacy(tx) => tx.clone(),
            RawTransaction::SegWit(tx) => tx.to_transaction(),
        }
    }
}

impl Composable for RawTransaction {
    fn from_buffer(buf: &mut BufferReader<'_>) -> Result<Self, CodecError> {
        // A legacy transaction never has zero inputs, so a 0x00 after the
        // version is the segwit marker.
        let segwit = matches!(buf.peek_bytes(5), Some(bytes) if bytes[4] == SEGWIT_MARKER);
        if segwit {
            TransactionSegWit::from_buffer(buf).map(RawTransaction::SegWit)
        } else {
            Transaction::from_buffer(buf).map(RawTransaction::Legacy)
        }
    }

    fn to_buffer(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        match self {
            RawTransaction::Legacy(tx) => tx.to_buffer(buf),
            RawTransaction::SegWit(tx) => tx.to_buffer(buf),
        }
    }
}

impl From<Transaction> for RawTransaction {
    fn from(tx: Transaction) -> Self {
        RawTransaction::Legacy(tx)
    }
}

impl From<TransactionSegWit> for RawTransaction {
    fn from(tx: TransactionSegWit) -> Self {
        RawTransaction::SegWit(tx)
    }
}
