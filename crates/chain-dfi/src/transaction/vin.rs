use crate::buffer::{composable, Hex, Single, UInt32};
use crate::script::Script;

use super::SEQUENCE_FINAL;

composable! {
    /// A transaction input.
    ///
    /// `txid` is displayed big-endian and stored reversed on the wire.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Vin {
        pub txid: String => Hex<32>,
        pub index: u32 => UInt32,
        /// Empty for witness inputs.
        pub script: Script => Single,
        pub sequence: u32 => UInt32,
    }
}

impl Vin {
    /// An unsigned input spending `txid:index` with a final sequence.
    pub fn new(txid: impl Into<String>, index: u32) -> Self {
        Self {
            txid: txid.into(),
            index,
            script: Script::empty(),
            sequence: SEQUENCE_FINAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Composable;
    use crate::error::CodecError;

    #[test]
    fn vin_layout() {
        let txid = format!("{}01", "00".repeat(31));
        let vin = Vin::new(txid.clone(), 1);
        let hex_str = vin.to_hex().unwrap();
        assert_eq!(
            hex_str,
            format!("01{}0100000000ffffffff", "00".repeat(31))
        );
        let decoded = Vin::from_hex(&hex_str).unwrap();
        assert_eq!(decoded.txid, txid);
        assert_eq!(decoded, vin);
    }

    #[test]
    fn vin_rejects_short_txid() {
        let vin = Vin::new("abcd", 0);
        let err = vin.to_hex().unwrap_err();
        assert_eq!(err.to_string(), "Vin.txid: hex length mismatch: expected 64 characters, received 4");
        assert!(matches!(err.root_cause(), CodecError::HexLength { .. }));
    }
}
