use bitcoin::Amount;

use crate::buffer::{composable, BigUInt64, Hex, Satoshi, Single, UInt8, VarUIntArray, VarUIntUtf8};
use crate::script::Script;

composable! {
    /// A token/currency feed an oracle reports on, e.g. `TSLA/USD`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CurrencyPair {
        pub token: String => VarUIntUtf8,
        pub currency: String => VarUIntUtf8,
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TokenAmount {
        pub currency: String => VarUIntUtf8,
        pub amount: Amount => Satoshi,
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TokenPrice {
        pub token: String => VarUIntUtf8,
        pub prices: Vec<TokenAmount> => VarUIntArray<Single>,
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AppointOracle {
        pub script: Script => Single,
        pub weightage: u8 => UInt8,
        pub price_feeds: Vec<CurrencyPair> => VarUIntArray<Single>,
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RemoveOracle {
        pub oracle_id: String => Hex<32>,
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UpdateOracle {
        pub oracle_id: String => Hex<32>,
        pub script: Script => Single,
        pub weightage: u8 => UInt8,
        pub price_feeds: Vec<CurrencyPair> => VarUIntArray<Single>,
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SetOracleData {
        pub oracle_id: String => Hex<32>,
        /// Seconds since the unix epoch.
        pub timestamp: u64 => BigUInt64,
        pub tokens: Vec<TokenPrice> => VarUIntArray<Single>,
    }
}

impl CurrencyPair {
    pub fn new(token: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            currency: currency.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Composable;
    use crate::dftx::{DfTx, DfTxData};

    fn oracle_id() -> String {
        format!("{}ff", "00".repeat(31))
    }

    #[test]
    fn appoint_oracle_layout() {
        let appoint = AppointOracle {
            script: Script::empty(),
            weightage: 1,
            price_feeds: vec![CurrencyPair::new("TSLA", "USD")],
        };
        assert_eq!(appoint.to_hex().unwrap(), "0001010454534c4103555344");
    }

    #[test]
    fn remove_oracle_is_reversed_id() {
        let remove = RemoveOracle { oracle_id: oracle_id() };
        let hex_str = remove.to_hex().unwrap();
        assert_eq!(hex_str, format!("ff{}", "00".repeat(31)));
        assert_eq!(RemoveOracle::from_hex(&hex_str).unwrap(), remove);
    }

    #[test]
    fn update_oracle_round_trip() {
        let update = UpdateOracle {
            oracle_id: oracle_id(),
            script: Script::p2wpkh(&[0x55; 20]),
            weightage: 100,
            price_feeds: vec![
                CurrencyPair::new("TSLA", "USD"),
                CurrencyPair::new("AAPL", "EUR"),
            ],
        };
        let dftx = DfTx::new(update.clone());
        let decoded = DfTx::from_bytes(&dftx.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.data, DfTxData::UpdateOracle(update));
    }

    #[test]
    fn set_oracle_data_layout() {
        let data = SetOracleData {
            oracle_id: oracle_id(),
            timestamp: 1_600_000_000,
            tokens: vec![TokenPrice {
                token: "TSLA".into(),
                prices: vec![TokenAmount {
                    currency: "USD".into(),
                    amount: Amount::from_sat(43_500_000_000),
                }],
            }],
        };
        let hex_str = data.to_hex().unwrap();
        assert_eq!(
            hex_str,
            format!(
                "ff{}00105e5f00000000010454534c4101035553440053cd200a000000",
                "00".repeat(31)
            )
        );
        assert_eq!(SetOracleData::from_hex(&hex_str).unwrap(), data);
    }

    #[test]
    fn remove_oracle_truncated_id() {
        let err = RemoveOracle::from_hex(&"00".repeat(31)).unwrap_err();
        assert!(err.to_string().starts_with("RemoveOracle.oracle_id:"));
    }
}
