use thiserror::Error;

/// Wire encoding and decoding errors.
///
/// Errors raised while composing a structure are wrapped in
/// [`CodecError::Field`] with the `Structure.field` path that failed; use
/// [`CodecError::root_cause`] to match on the underlying violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("{kind} out of range: expected {min} to {max}, received {value}")]
    Range {
        kind: &'static str,
        min: String,
        max: String,
        value: String,
    },

    #[error("non-canonical varuint: {value} encoded in {size} bytes")]
    NonCanonicalVarUInt { value: u64, size: usize },

    #[error("hex length mismatch: expected {expected} characters, received {actual}")]
    HexLength { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid utf-8 string: {0}")]
    InvalidUtf8(String),

    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),

    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("{0} trailing bytes after decode")]
    TrailingBytes(usize),

    #[error("array length mismatch: expected {expected} elements, received {actual}")]
    ArrayLength { expected: usize, actual: usize },

    #[error("DfTx signature mismatch: expected {expected:#010x}, received {actual:#010x}")]
    SignatureMismatch { expected: u32, actual: u32 },

    #[error("segwit {field} mismatch: expected {expected:#04x}, received {actual:#04x}")]
    InvalidMarker {
        field: &'static str,
        expected: u8,
        actual: u8,
    },

    #[error("witness count mismatch: expected {vin} to match vin, received {witness}")]
    WitnessCount { vin: usize, witness: usize },

    #[error("governance value does not match key {0}")]
    GovernanceKey(String),

    #[error("DfTx type {0:#04x} is registered and cannot be written as unmapped")]
    RegisteredAsUnmapped(u8),

    #[error("element decoded without consuming input")]
    NoProgress,

    #[error("legacy vout cannot carry token id {0}")]
    LegacyTokenId(u32),

    #[error("push data of {len} bytes does not fit opcode {op:#04x}")]
    InvalidPush { op: u8, len: usize },

    #[error("input index {index} out of range for {count} inputs")]
    InputIndex { index: usize, count: usize },

    #[error("amount overflow")]
    AmountOverflow,

    #[error("{path}: {source}")]
    Field {
        path: String,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Wrap this error with the structure and field it was raised from.
    pub fn in_field(self, structure: &str, field: &str) -> Self {
        CodecError::Field {
            path: format!("{structure}.{field}"),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every field path stripped.
    pub fn root_cause(&self) -> &CodecError {
        let mut current = self;
        while let CodecError::Field { source, .. } = current {
            current = source;
        }
        current
    }

    pub(crate) fn range(
        kind: &'static str,
        min: impl ToString,
        max: impl ToString,
        value: impl ToString,
    ) -> Self {
        CodecError::Range {
            kind,
            min: min.to_string(),
            max: max.to_string(),
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_range() {
        let err = CodecError::range("uint8", 0, 255, 256);
        assert_eq!(
            err.to_string(),
            "uint8 out of range: expected 0 to 255, received 256"
        );
    }

    #[test]
    fn display_hex_length() {
        let err = CodecError::HexLength {
            expected: 64,
            actual: 62,
        };
        assert_eq!(
            err.to_string(),
            "hex length mismatch: expected 64 characters, received 62"
        );
    }

    #[test]
    fn display_signature_mismatch() {
        let err = CodecError::SignatureMismatch {
            expected: 0x44665478,
            actual: 0x44665479,
        };
        assert_eq!(
            err.to_string(),
            "DfTx signature mismatch: expected 0x44665478, received 0x44665479"
        );
    }

    #[test]
    fn field_path_prefixes_message() {
        let err = CodecError::TrailingBytes(2)
            .in_field("Vin", "script")
            .in_field("Transaction", "vin");
        assert_eq!(
            err.to_string(),
            "Transaction.vin: Vin.script: 2 trailing bytes after decode"
        );
    }

    #[test]
    fn root_cause_strips_paths() {
        let err = CodecError::LegacyTokenId(7).in_field("Transaction", "vout");
        assert_eq!(err.root_cause(), &CodecError::LegacyTokenId(7));
    }

    #[test]
    fn root_cause_of_plain_error_is_itself() {
        let err = CodecError::AmountOverflow;
        assert_eq!(err.root_cause(), &err);
    }
}
