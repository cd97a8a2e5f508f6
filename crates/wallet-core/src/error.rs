use bitcoin::Amount;
use chain_dfi::CodecError;
use crypto_utils::CryptoError;
use thiserror::Error;

/// Transaction building errors.
///
/// Messages are stable; callers may match on them to tell, for example, an
/// empty wallet from an underfunded one.
#[derive(Debug, Error)]
pub enum TxnBuilderError {
    #[error("fee rate is NaN")]
    FeeRateNaN,

    #[error("fee rate cannot be negative: {0}")]
    NegativeFeeRate(f64),

    #[error("attempting to use a fee rate higher than MAX_FEE_RATE of {max} is not allowed")]
    FeeRateTooHigh { rate: f64, max: f64 },

    #[error("no prevouts available to create a transaction")]
    NoPrevouts,

    #[error("not enough balance after combing all prevouts")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("unable to sign input {index}: {reason}")]
    SigningMismatch { index: usize, reason: String },

    #[error("{0} does not name a recipient for a value output")]
    NoSpendRecipient(&'static str),

    #[error("provider failed: {0}")]
    Provider(String),

    #[error("invalid builder options: {0}")]
    InvalidOptions(String),

    #[error("amount overflow")]
    AmountOverflow,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
