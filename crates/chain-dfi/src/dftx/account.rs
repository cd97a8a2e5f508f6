//! Transfers between UTXOs and token accounts.

use super::{ScriptBalances, TokenBalance};
use crate::buffer::{composable, Single, UInt32, VarUIntArray};
use crate::script::Script;

composable! {
    /// Converts UTXO value into account balances. The converted value rides
    /// on the output that carries this DfTx.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UtxosToAccount {
        pub to: Vec<ScriptBalances> => VarUIntArray<Single>,
    }
}

composable! {
    /// Converts account balances back into UTXOs, minted starting at output
    /// `minting_outputs_start`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AccountToUtxos {
        pub from: Script => Single,
        pub balances: Vec<TokenBalance> => VarUIntArray<Single>,
        pub minting_outputs_start: u32 => UInt32,
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AccountToAccount {
        pub from: Script => Single,
        pub to: Vec<ScriptBalances> => VarUIntArray<Single>,
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AnyAccountToAccount {
        pub from: Vec<ScriptBalances> => VarUIntArray<Single>,
        pub to: Vec<ScriptBalances> => VarUIntArray<Single>,
    }
}
