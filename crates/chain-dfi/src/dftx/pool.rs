use bitcoin::Amount;

use super::{ScriptBalances, TokenBalance};
use crate::buffer::{
    composable, BigUInt64, Bool8, Optional, Satoshi, Single, VarUInt, VarUIntArray, VarUIntUtf8,
};
use crate::script::Script;

composable! {
    /// Price ceiling of a swap as `integer + fraction / 10^8`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MaxPrice {
        pub integer: u64 => BigUInt64,
        pub fraction: u64 => BigUInt64,
    }
}

impl MaxPrice {
    /// No price limit.
    pub const UNBOUNDED: MaxPrice = MaxPrice {
        integer: i64::MAX as u64,
        fraction: i64::MAX as u64,
    };
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PoolSwap {
        pub from_script: Script => Single,
        pub from_token_id: u32 => VarUInt,
        pub from_amount: Amount => Satoshi,
        pub to_script: Script => Single,
        pub to_token_id: u32 => VarUInt,
        pub max_price: MaxPrice => Single,
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PoolAddLiquidity {
        pub from: Vec<ScriptBalances> => VarUIntArray<Single>,
        pub share_address: Script => Single,
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PoolRemoveLiquidity {
        pub script: Script => Single,
        pub token_id: u32 => VarUInt,
        pub amount: Amount => Satoshi,
    }
}

composable! {
    /// Creates a liquidity pool for a token pair.
    ///
    /// `custom_rewards` is a later addition to the layout and is only present
    /// when bytes remain after the pair symbol.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PoolCreatePair {
        pub token_a: u32 => VarUInt,
        pub token_b: u32 => VarUInt,
        pub commission: Amount => Satoshi,
        pub owner_address: Script => Single,
        pub status: bool => Bool8,
        pub pair_symbol: String => VarUIntUtf8,
        pub custom_rewards: Option<Vec<TokenBalance>> => Optional<VarUIntArray<Single>>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Composable;
    use crate::dftx::{DfTx, DfTxData};
    use crate::error::CodecError;

    const P2SH_HASH: &str = "c34ca9c2d49a0b01a4aa8a4c5f9f5dc4b4b3c4a1";

    fn p2sh() -> Script {
        let hash: [u8; 20] = hex::decode(P2SH_HASH).unwrap().try_into().unwrap();
        Script::p2sh(&hash)
    }

    fn swap() -> PoolSwap {
        PoolSwap {
            from_script: p2sh(),
            from_token_id: 0,
            from_amount: Amount::from_sat(150 * 100_000_000),
            to_script: p2sh(),
            to_token_id: 2,
            max_price: MaxPrice::UNBOUNDED,
        }
    }

    #[test]
    fn pool_swap_layout() {
        let script_hex = format!("17a914{P2SH_HASH}87");
        let expected = format!(
            "{script_hex}0000d6117e03000000{script_hex}02ffffffffffffff7fffffffffffffff7f"
        );
        assert_eq!(swap().to_hex().unwrap(), expected);
        assert_eq!(PoolSwap::from_hex(&expected).unwrap(), swap());
    }

    #[test]
    fn pool_swap_in_dftx() {
        let dftx = DfTx::new(swap());
        let bytes = dftx.to_bytes().unwrap();
        assert_eq!(&bytes[..5], b"DfTxs");
        assert_eq!(DfTx::from_bytes(&bytes).unwrap().data, DfTxData::PoolSwap(swap()));
    }

    #[test]
    fn pool_swap_truncated_price() {
        let mut bytes = swap().to_bytes().unwrap();
        bytes.truncate(bytes.len() - 4);
        let err = PoolSwap::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().starts_with("PoolSwap.max_price: MaxPrice.fraction:"));
    }

    #[test]
    fn add_liquidity_round_trip() {
        let add = PoolAddLiquidity {
            from: vec![ScriptBalances {
                script: p2sh(),
                balances: vec![
                    TokenBalance::new(0, Amount::from_sat(1_000)),
                    TokenBalance::new(1, Amount::from_sat(2_000)),
                ],
            }],
            share_address: p2sh(),
        };
        let bytes = add.to_bytes().unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(PoolAddLiquidity::from_bytes(&bytes).unwrap(), add);
    }

    #[test]
    fn remove_liquidity_layout() {
        let remove = PoolRemoveLiquidity {
            script: Script::empty(),
            token_id: 1000,
            amount: Amount::from_sat(1),
        };
        assert_eq!(remove.to_hex().unwrap(), "00fde8030100000000000000");
    }

    #[test]
    fn create_pair_without_rewards() {
        let pair = PoolCreatePair {
            token_a: 0,
            token_b: 1,
            commission: Amount::from_sat(2_000_000),
            owner_address: Script::empty(),
            status: true,
            pair_symbol: "DFI-BTC".into(),
            custom_rewards: None,
        };
        let hex_str = pair.to_hex().unwrap();
        assert_eq!(hex_str, "000180841e00000000000001074446492d425443");
        assert_eq!(PoolCreatePair::from_hex(&hex_str).unwrap(), pair);
    }

    #[test]
    fn create_pair_with_rewards() {
        let pair = PoolCreatePair {
            token_a: 0,
            token_b: 1,
            commission: Amount::ZERO,
            owner_address: Script::empty(),
            status: false,
            pair_symbol: String::new(),
            custom_rewards: Some(vec![TokenBalance::new(0, Amount::from_sat(5))]),
        };
        let bytes = pair.to_bytes().unwrap();
        assert_eq!(PoolCreatePair::from_bytes(&bytes).unwrap(), pair);
    }

    #[test]
    fn create_pair_invalid_status() {
        let err = PoolCreatePair::from_hex("0001000000000000000000020100").unwrap_err();
        assert_eq!(err.root_cause(), &CodecError::InvalidBool(2));
    }
}
