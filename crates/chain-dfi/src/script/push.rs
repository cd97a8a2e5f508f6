use super::opcodes::{MAX_DIRECT_PUSH, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};
use crate::buffer::BufferReader;
use crate::error::CodecError;

/// Byte order the hex form of a push is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Hex is in wire order.
    #[default]
    Little,
    /// Hex is the reversed wire bytes, the way hashes are displayed.
    Big,
}

/// A data push: the pushed bytes plus the opcode that carried them.
///
/// The carrying opcode is kept so that non-minimal pushes re-encode
/// byte-for-byte. Equality compares the opcode and the bytes; the endian tag
/// only affects [`PushData::hex`].
#[derive(Debug, Clone, Eq)]
pub struct PushData {
    op: u8,
    data: Vec<u8>,
    endian: Endian,
}

impl PartialEq for PushData {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op && self.data == other.data
    }
}

impl PushData {
    /// Push `data` with the smallest opcode that fits it.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            op: minimal_op(data.len()),
            data,
            endian: Endian::Little,
        }
    }

    /// Parse hex expressed in `endian` order.
    pub fn from_hex(hex_str: &str, endian: Endian) -> Result<Self, CodecError> {
        let mut data =
            hex::decode(hex_str).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
        if endian == Endian::Big {
            data.reverse();
        }
        let mut push = Self::new(data);
        push.endian = endian;
        Ok(push)
    }

    pub fn op(&self) -> u8 {
        self.op
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Hex of the pushed bytes in this push's endian order.
    pub fn hex(&self) -> String {
        match self.endian {
            Endian::Little => hex::encode(&self.data),
            Endian::Big => {
                let mut reversed = self.data.clone();
                reversed.reverse();
                hex::encode(reversed)
            }
        }
    }

    /// Decode the length prefix for `op` (already consumed) and the data.
    pub(crate) fn read(op: u8, buf: &mut BufferReader<'_>) -> Result<Self, CodecError> {
        let len = match op {
            1..=MAX_DIRECT_PUSH => op as usize,
            OP_PUSHDATA1 => buf.read_u8()? as usize,
            OP_PUSHDATA2 => u16::from_le_bytes(buf.read_fixed()?) as usize,
            OP_PUSHDATA4 => u32::from_le_bytes(buf.read_fixed()?) as usize,
            _ => return Err(CodecError::InvalidPush { op, len: 0 }),
        };
        Ok(Self {
            op,
            data: buf.read_bytes(len)?.to_vec(),
            endian: Endian::Little,
        })
    }

    pub(crate) fn write(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        let len = self.data.len();
        let invalid = || CodecError::InvalidPush { op: self.op, len };
        buf.push(self.op);
        match self.op {
            1..=MAX_DIRECT_PUSH if len == self.op as usize => {}
            OP_PUSHDATA1 => buf.push(u8::try_from(len).map_err(|_| invalid())?),
            OP_PUSHDATA2 => {
                let len = u16::try_from(len).map_err(|_| invalid())?;
                buf.extend_from_slice(&len.to_le_bytes());
            }
            OP_PUSHDATA4 => {
                let len = u32::try_from(len).map_err(|_| invalid())?;
                buf.extend_from_slice(&len.to_le_bytes());
            }
            _ => return Err(invalid()),
        }
        buf.extend_from_slice(&self.data);
        Ok(())
    }
}

/// Smallest push opcode able to carry `len` bytes.
pub(crate) fn minimal_op(len: usize) -> u8 {
    if len <= MAX_DIRECT_PUSH as usize {
        len as u8
    } else if len <= 0xff {
        OP_PUSHDATA1
    } else if len <= 0xffff {
        OP_PUSHDATA2
    } else {
        OP_PUSHDATA4
    }
}
