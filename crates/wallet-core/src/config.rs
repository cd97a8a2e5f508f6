use chain_dfi::transaction::{SEQUENCE_FINAL, TOKENS_MIN_VERSION};
use serde::{Deserialize, Serialize};

use crate::error::TxnBuilderError;
use crate::fee::DEFAULT_MAX_FEE_RATE;

/// Builder settings. Every field has a default, so a partial JSON object is
/// a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TxnBuilderOptions {
    /// Transaction version; `4` and above use token-aware outputs.
    pub version: u32,
    /// Sequence set on every input.
    pub sequence: u32,
    pub lock_time: u32,
    /// Ceiling for the provider's fee rate, in coin per 1000 vbytes.
    pub max_fee_rate: f64,
}

impl Default for TxnBuilderOptions {
    fn default() -> Self {
        Self {
            version: TOKENS_MIN_VERSION,
            sequence: SEQUENCE_FINAL,
            lock_time: 0,
            max_fee_rate: DEFAULT_MAX_FEE_RATE,
        }
    }
}

impl TxnBuilderOptions {
    pub fn from_json(json: &str) -> Result<Self, TxnBuilderError> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| TxnBuilderError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), TxnBuilderError> {
        if !self.max_fee_rate.is_finite() || self.max_fee_rate <= 0.0 {
            return Err(TxnBuilderError::InvalidOptions(format!(
                "max fee rate must be a positive number, got {}",
                self.max_fee_rate
            )));
        }
        if self.version == 0 {
            return Err(TxnBuilderError::InvalidOptions(
                "transaction version must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
