//! Custom transactions carried in `OP_RETURN` outputs.
//!
//! Wire layout: 4-byte big-endian signature (`"DfTx"`), 1-byte type, then
//! the type's payload, which runs to the end of the enclosing push.

pub mod account;
pub mod balance;
pub mod governance;
pub mod masternode;
pub mod oracle;
pub mod pool;
pub mod token;

use tracing::trace;

use crate::buffer::{BufferReader, Composable, Composer, RemainingHex};
use crate::error::CodecError;

pub use account::{AccountToAccount, AccountToUtxos, AnyAccountToAccount, UtxosToAccount};
pub use balance::{ScriptBalances, TokenBalance};
pub use governance::{GovernanceValue, GovernanceVar, LpSplit, SetGovernance};
pub use masternode::{CreateMasternode, ResignMasternode};
pub use oracle::{
    AppointOracle, CurrencyPair, RemoveOracle, SetOracleData, TokenAmount, TokenPrice,
    UpdateOracle,
};
pub use pool::{
    MaxPrice, PoolAddLiquidity, PoolCreatePair, PoolRemoveLiquidity, PoolSwap,
};
pub use token::{TokenCreate, TokenMint, TokenUpdate, TokenUpdateAny};

/// `"DfTx"` read as a big-endian u32.
pub const DFTX_SIGNATURE: u32 = 0x4466_5478;

/// Payload of a type byte with no registry entry, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmapped {
    pub r#type: u8,
    /// Remaining payload bytes, wire order.
    pub hex: String,
}

macro_rules! dftx_registry {
    ($($variant:ident($payload:ty) = $code:literal => $name:literal),+ $(,)?) => {
        /// A decoded custom transaction payload.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum DfTxData {
            $($variant($payload),)+
            Unmapped(Unmapped),
        }

        /// Every mapped type byte with its diagnostic name.
        pub const REGISTRY: &[(u8, &str)] = &[$(($code, $name)),+];

        impl DfTxData {
            pub fn r#type(&self) -> u8 {
                match self {
                    $(DfTxData::$variant(_) => $code,)+
                    DfTxData::Unmapped(unmapped) => unmapped.r#type,
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(DfTxData::$variant(_) => $name,)+
                    DfTxData::Unmapped(_) => "OP_DEFI_TX_UNMAPPED",
                }
            }

            fn read_payload(r#type: u8, buf: &mut BufferReader<'_>) -> Result<Self, CodecError> {
                match r#type {
                    $($code => <$payload as Composable>::from_buffer(buf).map(DfTxData::$variant),)+
                    _ => {
                        trace!(dftx_type = r#type, remaining = buf.remaining(), "decoding unmapped DfTx");
                        Ok(DfTxData::Unmapped(Unmapped {
                            r#type,
                            hex: RemainingHex::read(buf)?,
                        }))
                    }
                }
            }

            fn write_payload(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
                match self {
                    $(DfTxData::$variant(payload) => payload.to_buffer(buf),)+
                    DfTxData::Unmapped(unmapped) => {
                        if REGISTRY.iter().any(|(code, _)| *code == unmapped.r#type) {
                            return Err(CodecError::RegisteredAsUnmapped(unmapped.r#type));
                        }
                        RemainingHex::write(&unmapped.hex, buf)
                    }
                }
            }
        }

        $(
            impl From<$payload> for DfTxData {
                fn from(payload: $payload) -> Self {
                    DfTxData::$variant(payload)
                }
            }
        )+
    };
}

dftx_registry! {
    PoolSwap(PoolSwap) = b's' => "OP_DEFI_TX_POOL_SWAP",
    PoolAddLiquidity(PoolAddLiquidity) = b'l' => "OP_DEFI_TX_POOL_ADD_LIQUIDITY",
    PoolRemoveLiquidity(PoolRemoveLiquidity) = b'r' => "OP_DEFI_TX_POOL_REMOVE_LIQUIDITY",
    PoolCreatePair(PoolCreatePair) = b'p' => "OP_DEFI_TX_POOL_CREATE_PAIR",
    TokenMint(TokenMint) = b'M' => "OP_DEFI_TX_TOKEN_MINT",
    TokenCreate(TokenCreate) = b'T' => "OP_DEFI_TX_TOKEN_CREATE",
    TokenUpdate(TokenUpdate) = b'N' => "OP_DEFI_TX_TOKEN_UPDATE",
    TokenUpdateAny(TokenUpdateAny) = b'n' => "OP_DEFI_TX_TOKEN_UPDATE_ANY",
    UtxosToAccount(UtxosToAccount) = b'U' => "OP_DEFI_TX_UTXOS_TO_ACCOUNT",
    AccountToUtxos(AccountToUtxos) = b'b' => "OP_DEFI_TX_ACCOUNT_TO_UTXOS",
    AccountToAccount(AccountToAccount) = b'B' => "OP_DEFI_TX_ACCOUNT_TO_ACCOUNT",
    AnyAccountToAccount(AnyAccountToAccount) = b'a' => "OP_DEFI_TX_ANY_ACCOUNT_TO_ACCOUNT",
    AppointOracle(AppointOracle) = b'o' => "OP_DEFI_TX_APPOINT_ORACLE",
    RemoveOracle(RemoveOracle) = b'h' => "OP_DEFI_TX_REMOVE_ORACLE",
    UpdateOracle(UpdateOracle) = b't' => "OP_DEFI_TX_UPDATE_ORACLE",
    SetOracleData(SetOracleData) = b'y' => "OP_DEFI_TX_SET_ORACLE_DATA",
    CreateMasternode(CreateMasternode) = b'C' => "OP_DEFI_TX_CREATE_MASTER_NODE",
    ResignMasternode(ResignMasternode) = b'R' => "OP_DEFI_TX_RESIGN_MASTER_NODE",
    SetGovernance(SetGovernance) = b'G' => "OP_DEFI_TX_SET_GOVERNANCE",
}

/// A custom transaction: signature, type byte and payload.
///
/// The signature is stored so that a mutated value is caught on encode
/// rather than silently rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfTx {
    pub signature: u32,
    pub data: DfTxData,
}

impl DfTx {
    pub fn new(data: impl Into<DfTxData>) -> Self {
        Self {
            signature: DFTX_SIGNATURE,
            data: data.into(),
        }
    }

    pub fn r#type(&self) -> u8 {
        self.data.r#type()
    }

    pub fn name(&self) -> &'static str {
        self.data.name()
    }

    fn check_signature(signature: u32) -> Result<(), CodecError> {
        if signature != DFTX_SIGNATURE {
            return Err(CodecError::SignatureMismatch {
                expected: DFTX_SIGNATURE,
                actual: signature,
            });
        }
        Ok(())
    }
}

impl Composable for DfTx {
    fn from_buffer(buf: &mut BufferReader<'_>) -> Result<Self, CodecError> {
        let signature = u32::from_be_bytes(buf.read_fixed()?);
        Self::check_signature(signature)?;
        let r#type = buf.read_u8()?;
        let data = DfTxData::read_payload(r#type, buf)?;
        Ok(Self { signature, data })
    }

    fn to_buffer(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        Self::check_signature(self.signature)?;
        buf.extend_from_slice(&self.signature.to_be_bytes());
        buf.push(self.r#type());
        self.data.write_payload(buf)
    }
}
