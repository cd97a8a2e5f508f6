//! Governance variables.
//!
//! Each variable is a UTF-8 key followed by a value whose layout depends on
//! the key. Keys this crate does not know swallow the rest of the payload as
//! opaque hex so they still re-encode byte for byte.

use bitcoin::Amount;

use crate::buffer::{
    composable, BufferReader, Composable, Composer, Remaining, RemainingHex, Satoshi, Single,
    UInt32, VarUIntArray, VarUIntUtf8,
};
use crate::error::CodecError;

pub const LP_DAILY_DFI_REWARD: &str = "LP_DAILY_DFI_REWARD";
pub const LP_SPLITS: &str = "LP_SPLITS";

composable! {
    /// Share of the liquidity reward paid to one pool.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LpSplit {
        pub token_id: u32 => UInt32,
        pub value: Amount => Satoshi,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GovernanceValue {
    LpDailyDfiReward(Amount),
    LpSplits(Vec<LpSplit>),
    /// Value bytes of an unknown key, wire order.
    Unmapped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceVar {
    pub key: String,
    pub value: GovernanceValue,
}

impl GovernanceVar {
    pub fn lp_daily_dfi_reward(amount: Amount) -> Self {
        Self {
            key: LP_DAILY_DFI_REWARD.into(),
            value: GovernanceValue::LpDailyDfiReward(amount),
        }
    }

    pub fn lp_splits(splits: Vec<LpSplit>) -> Self {
        Self {
            key: LP_SPLITS.into(),
            value: GovernanceValue::LpSplits(splits),
        }
    }

    fn key_matches_value(&self) -> bool {
        match &self.value {
            GovernanceValue::LpDailyDfiReward(_) => self.key == LP_DAILY_DFI_REWARD,
            GovernanceValue::LpSplits(_) => self.key == LP_SPLITS,
            GovernanceValue::Unmapped(_) => {
                self.key != LP_DAILY_DFI_REWARD && self.key != LP_SPLITS
            }
        }
    }
}

impl Composable for GovernanceVar {
    fn from_buffer(buf: &mut BufferReader<'_>) -> Result<Self, CodecError> {
        let key = VarUIntUtf8::read(buf).map_err(|e| e.in_field("GovernanceVar", "key"))?;
        let value = match key.as_str() {
            LP_DAILY_DFI_REWARD => Satoshi::read(buf).map(GovernanceValue::LpDailyDfiReward),
            LP_SPLITS => VarUIntArray::<Single>::read(buf).map(GovernanceValue::LpSplits),
            _ => RemainingHex::read(buf).map(GovernanceValue::Unmapped),
        }
        .map_err(|e| e.in_field("GovernanceVar", "value"))?;
        Ok(Self { key, value })
    }

    fn to_buffer(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        if !self.key_matches_value() {
            return Err(CodecError::GovernanceKey(self.key.clone()));
        }
        VarUIntUtf8::write(&self.key, buf).map_err(|e| e.in_field("GovernanceVar", "key"))?;
        match &self.value {
            GovernanceValue::LpDailyDfiReward(amount) => Satoshi::write(amount, buf),
            GovernanceValue::LpSplits(splits) => VarUIntArray::<Single>::write(splits, buf),
            GovernanceValue::Unmapped(hex_str) => RemainingHex::write(hex_str, buf),
        }
        .map_err(|e| e.in_field("GovernanceVar", "value"))
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SetGovernance {
        pub governance_vars: Vec<GovernanceVar> => Remaining<Single>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_reward_layout() {
        let set = SetGovernance {
            governance_vars: vec![GovernanceVar::lp_daily_dfi_reward(Amount::from_sat(
                1_000_000_000,
            ))],
        };
        let hex_str = set.to_hex().unwrap();
        assert_eq!(
            hex_str,
            format!("13{}00ca9a3b00000000", hex::encode(LP_DAILY_DFI_REWARD))
        );
        assert_eq!(SetGovernance::from_hex(&hex_str).unwrap(), set);
    }

    #[test]
    fn splits_layout() {
        let set = SetGovernance {
            governance_vars: vec![GovernanceVar::lp_splits(vec![
                LpSplit {
                    token_id: 2,
                    value: Amount::from_sat(20_000_000),
                },
                LpSplit {
                    token_id: 3,
                    value: Amount::from_sat(80_000_000),
                },
            ])],
        };
        let hex_str = set.to_hex().unwrap();
        assert_eq!(
            hex_str,
            format!(
                "09{}0202000000002d310100000000030000000000b4c40400000000",
                hex::encode(LP_SPLITS)
            )
        );
        assert_eq!(SetGovernance::from_hex(&hex_str).unwrap(), set);
    }

    #[test]
    fn multiple_vars_until_end() {
        let set = SetGovernance {
            governance_vars: vec![
                GovernanceVar::lp_daily_dfi_reward(Amount::from_sat(1)),
                GovernanceVar::lp_splits(vec![]),
            ],
        };
        let bytes = set.to_bytes().unwrap();
        assert_eq!(SetGovernance::from_bytes(&bytes).unwrap(), set);
    }

    #[test]
    fn unknown_key_keeps_rest_as_hex() {
        let hex_str = format!("{}{}", "03414243", "deadbeef");
        let set = SetGovernance::from_hex(&hex_str).unwrap();
        assert_eq!(
            set.governance_vars,
            vec![GovernanceVar {
                key: "ABC".into(),
                value: GovernanceValue::Unmapped("deadbeef".into()),
            }]
        );
        assert_eq!(set.to_hex().unwrap(), hex_str);
    }

    #[test]
    fn empty_payload_has_no_vars() {
        assert!(SetGovernance::from_hex("").unwrap().governance_vars.is_empty());
    }

    #[test]
    fn mismatched_key_is_rejected() {
        let var = GovernanceVar {
            key: LP_SPLITS.into(),
            value: GovernanceValue::LpDailyDfiReward(Amount::ONE_SAT),
        };
        assert!(var.to_hex().is_err());
    }
}
