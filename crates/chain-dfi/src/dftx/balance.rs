use bitcoin::Amount;

use crate::buffer::{composable, Satoshi, Single, UInt32, VarUIntArray};
use crate::script::Script;

composable! {
    /// An amount of one token.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TokenBalance {
        pub token: u32 => UInt32,
        pub amount: Amount => Satoshi,
    }
}

composable! {
    /// An owner script paired with the token amounts it sends or receives.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ScriptBalances {
        pub script: Script => Single,
        pub balances: Vec<TokenBalance> => VarUIntArray<Single>,
    }
}

impl TokenBalance {
    pub fn new(token: u32, amount: Amount) -> Self {
        Self { token, amount }
    }
}
