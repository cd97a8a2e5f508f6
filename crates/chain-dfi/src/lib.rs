//! Wire codec for DeFiChain transactions.
//!
//! Every structure is declared once as an ordered list of field composers
//! ([`buffer`]); the same list drives decoding and encoding. On top of that
//! sit the script model, the custom transaction (DfTx) registry, the legacy
//! and segwit transaction layouts, and the BIP143 signing preimage.

pub mod buffer;
pub mod dftx;
pub mod error;
pub mod script;
pub mod sighash;
pub mod transaction;

pub use buffer::{BufferReader, Composable, Composer};
pub use dftx::{DfTx, DfTxData, DFTX_SIGNATURE};
pub use error::CodecError;
pub use script::{OpCode, Script};
pub use sighash::{WitnessProgram, SIGHASH_ALL};
pub use transaction::{
    RawTransaction, Transaction, TransactionSegWit, Vin, Vout, Witness, WitnessScript,
    TOKENS_MIN_VERSION,
};
