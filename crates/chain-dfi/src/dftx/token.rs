use super::TokenBalance;
use crate::buffer::{composable, BigUInt64, Bool8, Hex, Single, UInt8, VarUIntArray, VarUIntUtf8};

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TokenMint {
        pub balances: Vec<TokenBalance> => VarUIntArray<Single>,
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TokenCreate {
        pub symbol: String => VarUIntUtf8,
        pub name: String => VarUIntUtf8,
        pub decimal: u8 => UInt8,
        pub limit: u64 => BigUInt64,
        /// Bit set of [`TokenCreate::MINTABLE`], [`TokenCreate::TRADEABLE`]
        /// and [`TokenCreate::DAT`].
        pub flags: u8 => UInt8,
    }
}

impl TokenCreate {
    pub const MINTABLE: u8 = 0x01;
    pub const TRADEABLE: u8 = 0x02;
    pub const DAT: u8 = 0x04;

    pub fn is_mintable(&self) -> bool {
        self.flags & Self::MINTABLE != 0
    }

    pub fn is_tradeable(&self) -> bool {
        self.flags & Self::TRADEABLE != 0
    }

    pub fn is_dat(&self) -> bool {
        self.flags & Self::DAT != 0
    }
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TokenUpdate {
        pub creation_tx: String => Hex<32>,
        pub is_dat: bool => Bool8,
    }
}

composable! {
    /// Replaces every property of an existing token.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TokenUpdateAny {
        pub creation_tx: String => Hex<32>,
        pub token: TokenCreate => Single,
    }
}
