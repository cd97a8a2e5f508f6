use crate::buffer::{composable, Bytes, Hex, Optional, UInt16, UInt8};

composable! {
    /// Registers a masternode. `timelock` is the optional lock period in
    /// years, appended by later protocol versions.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CreateMasternode {
        /// `0x01` for P2PKH operators, `0x04` for P2WPKH operators.
        pub operator_type: u8 => UInt8,
        pub operator_pub_key_hash: [u8; 20] => Bytes<20>,
        pub timelock: Option<u16> => Optional<UInt16>,
    }
}

impl CreateMasternode {
    pub const OPERATOR_P2PKH: u8 = 0x01;
    pub const OPERATOR_P2WPKH: u8 = 0x04;
}

composable! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ResignMasternode {
        pub node_id: String => Hex<32>,
    }
}
