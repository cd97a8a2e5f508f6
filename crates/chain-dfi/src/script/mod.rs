//! Script and opcode model.
//!
//! A [`Script`] is an ordered stack of [`OpCode`]s. On the wire it is a
//! VarUInt-length-prefixed byte string; inside that string each opcode is
//! one byte, optionally followed by pushed data.

pub mod opcodes;
pub mod push;

use std::fmt;

use tracing::trace;

use crate::buffer::{varuint, BufferReader, Composable};
use crate::dftx::{DfTx, DFTX_SIGNATURE};
use crate::error::CodecError;

pub use opcodes::StaticCode;
pub use push::{Endian, PushData};

/// One element of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpCode {
    /// A named opcode from the static table.
    Static(StaticCode),
    /// Raw pushed bytes.
    PushData(PushData),
    /// A DfTx carried in the push that follows `OP_RETURN`.
    DfTx(Box<DfTx>),
    /// A byte with no table entry, echoed back unchanged.
    Unmapped(u8),
}

impl OpCode {
    pub const OP_0: OpCode = OpCode::Static(StaticCode::Op0);
    pub const OP_RETURN: OpCode = OpCode::Static(StaticCode::OpReturn);
    pub const OP_DUP: OpCode = OpCode::Static(StaticCode::OpDup);
    pub const OP_HASH160: OpCode = OpCode::Static(StaticCode::OpHash160);
    pub const OP_EQUAL: OpCode = OpCode::Static(StaticCode::OpEqual);
    pub const OP_EQUALVERIFY: OpCode = OpCode::Static(StaticCode::OpEqualVerify);
    pub const OP_CHECKSIG: OpCode = OpCode::Static(StaticCode::OpCheckSig);

    pub fn push(data: impl Into<Vec<u8>>) -> Self {
        OpCode::PushData(PushData::new(data.into()))
    }

    /// Serialize this opcode into `buf`.
    pub fn to_buffer(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        match self {
            OpCode::Static(code) => {
                buf.push(code.code());
                Ok(())
            }
            OpCode::PushData(push) => push.write(buf),
            OpCode::DfTx(dftx) => PushData::new(dftx.to_bytes()?).write(buf),
            OpCode::Unmapped(code) => {
                buf.push(*code);
                Ok(())
            }
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpCode::Static(code) => f.write_str(code.name()),
            OpCode::PushData(push) => f.write_str(&hex::encode(push.data())),
            OpCode::DfTx(dftx) => write!(f, "{}", dftx.name()),
            OpCode::Unmapped(code) => write!(f, "OP_UNKNOWN_{code:#04x}"),
        }
    }
}

/// Decode raw script bytes (no length prefix) into opcodes.
///
/// A push directly after `OP_RETURN` that starts with the DfTx signature is
/// decoded as a DfTx when its payload decodes in full; otherwise it stays a
/// plain push.
pub fn to_opcodes(bytes: &[u8]) -> Result<Vec<OpCode>, CodecError> {
    let mut buf = BufferReader::new(bytes);
    let mut stack = Vec::new();

    while !buf.is_empty() {
        let code = buf.read_u8()?;
        let opcode = match code {
            0x01..=opcodes::OP_PUSHDATA4 => {
                let push = PushData::read(code, &mut buf)?;
                let after_return = stack.last() == Some(&OpCode::OP_RETURN);
                if after_return && push.data().starts_with(&DFTX_SIGNATURE.to_be_bytes()) {
                    match DfTx::from_bytes(push.data()) {
                        Ok(dftx) => OpCode::DfTx(Box::new(dftx)),
                        Err(err) => {
                            trace!(error = %err, "signature-prefixed push kept as data");
                            OpCode::PushData(push)
                        }
                    }
                } else {
                    OpCode::PushData(push)
                }
            }
            _ => match StaticCode::from_code(code) {
                Some(static_code) => OpCode::Static(static_code),
                None => OpCode::Unmapped(code),
            },
        };
        stack.push(opcode);
    }

    Ok(stack)
}

/// Concatenate the serialization of each opcode.
pub fn to_buffer(opcodes: &[OpCode], buf: &mut Vec<u8>) -> Result<(), CodecError> {
    opcodes.iter().try_for_each(|op| op.to_buffer(buf))
}

/// An ordered stack of opcodes. An empty stack is a valid script.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    pub stack: Vec<OpCode>,
}

impl Script {
    pub fn new(stack: Vec<OpCode>) -> Self {
        Self { stack }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Parse unprefixed script bytes.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(Self {
            stack: to_opcodes(bytes)?,
        })
    }

    /// Script bytes without the length prefix.
    pub fn to_raw(&self) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        to_buffer(&self.stack, &mut buf)?;
        Ok(buf)
    }

    /// `OP_0 <20-byte key hash>`
    pub fn p2wpkh(pubkey_hash: &[u8; 20]) -> Self {
        Self::new(vec![OpCode::OP_0, OpCode::push(pubkey_hash.to_vec())])
    }

    /// `OP_DUP OP_HASH160 <20-byte key hash> OP_EQUALVERIFY OP_CHECKSIG`
    ///
    /// Also the BIP143 scriptCode for a P2WPKH input.
    pub fn p2pkh(pubkey_hash: &[u8; 20]) -> Self {
        Self::new(vec![
            OpCode::OP_DUP,
            OpCode::OP_HASH160,
            OpCode::push(pubkey_hash.to_vec()),
            OpCode::OP_EQUALVERIFY,
            OpCode::OP_CHECKSIG,
        ])
    }

    /// `OP_HASH160 <20-byte script hash> OP_EQUAL`
    pub fn p2sh(script_hash: &[u8; 20]) -> Self {
        Self::new(vec![
            OpCode::OP_HASH160,
            OpCode::push(script_hash.to_vec()),
            OpCode::OP_EQUAL,
        ])
    }

    /// `OP_RETURN <dftx>`
    pub fn op_return_dftx(dftx: DfTx) -> Self {
        Self::new(vec![OpCode::OP_RETURN, OpCode::DfTx(Box::new(dftx))])
    }

    /// The key hash if this is a P2WPKH script.
    pub fn p2wpkh_hash(&self) -> Option<[u8; 20]> {
        match self.stack.as_slice() {
            [OpCode::Static(StaticCode::Op0), OpCode::PushData(push)] => {
                push.data().try_into().ok()
            }
            _ => None,
        }
    }

    /// The key hash if this is a P2PKH script.
    pub fn p2pkh_hash(&self) -> Option<[u8; 20]> {
        match self.stack.as_slice() {
            [OpCode::Static(StaticCode::OpDup), OpCode::Static(StaticCode::OpHash160), OpCode::PushData(push), OpCode::Static(StaticCode::OpEqualVerify), OpCode::Static(StaticCode::OpCheckSig)] => {
                push.data().try_into().ok()
            }
            _ => None,
        }
    }

    /// The embedded DfTx if this is an `OP_RETURN <dftx>` script.
    pub fn dftx(&self) -> Option<&DfTx> {
        match self.stack.as_slice() {
            [OpCode::Static(StaticCode::OpReturn), OpCode::DfTx(dftx)] => Some(dftx),
            _ => None,
        }
    }
}

impl Composable for Script {
    fn from_buffer(buf: &mut BufferReader<'_>) -> Result<Self, CodecError> {
        let len = varuint::read(buf)? as usize;
        Self::from_raw(buf.read_bytes(len)?)
    }

    fn to_buffer(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        let raw = self.to_raw()?;
        varuint::write(raw.len() as u64, buf)?;
        buf.extend_from_slice(&raw);
        Ok(())
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.stack.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}
