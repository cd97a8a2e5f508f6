//! Transaction building on top of the `chain-dfi` codec.
//!
//! [`TxnBuilder`] turns a DfTx payload (or a plain payment) into a signed
//! segwit transaction. It never talks to a node or a key store directly;
//! fee rates, spendable prevouts and signing keys come from the provider
//! traits in [`provider`].

pub mod builder;
pub mod config;
pub mod error;
pub mod fee;
pub mod provider;
pub mod signer;

// ─── Re-exports ──────────────────────────────────────────────────────

pub use builder::TxnBuilder;
pub use config::TxnBuilderOptions;
pub use error::TxnBuilderError;
pub use fee::{COIN, DEFAULT_MAX_FEE_RATE};
pub use provider::{
    EllipticPairProvider, FeeRateProvider, MemoryPrevoutProvider, Prevout, PrevoutProvider,
    SingleKeyProvider, StaticFeeRate,
};
