//! VarUInt: the self-describing length prefix used throughout the wire
//! format.
//!
//! | value range          | bytes | layout               |
//! |----------------------|-------|----------------------|
//! | `0x00..=0xfc`        | 1     | value                |
//! | `0xfd..=0xffff`      | 3     | `0xfd` + u16 LE      |
//! | `0x10000..=0xffffffff` | 5   | `0xfe` + u32 LE      |
//! | larger               | 9     | `0xff` + u64 LE      |
//!
//! Values are capped at `2^53 - 1` so they stay exact in consumers that hold
//! numbers as IEEE doubles; anything larger is a range error in both
//! directions.

use super::BufferReader;
use crate::error::CodecError;

/// Largest value a VarUInt may carry (`2^53 - 1`).
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Read one VarUInt from the cursor.
pub fn read(buf: &mut BufferReader<'_>) -> Result<u64, CodecError> {
    let (value, size) = match buf.read_u8()? {
        0xfd => (u16::from_le_bytes(buf.read_fixed()?) as u64, 3),
        0xfe => (u32::from_le_bytes(buf.read_fixed()?) as u64, 5),
        0xff => (u64::from_le_bytes(buf.read_fixed()?), 9),
        b => (b as u64, 1),
    };
    if value > MAX_SAFE_INTEGER {
        return Err(CodecError::range("varuint", 0, MAX_SAFE_INTEGER, value));
    }
    if encoded_len(value) != size {
        return Err(CodecError::NonCanonicalVarUInt { value, size });
    }
    Ok(value)
}

/// Append `value` using the shortest prefix.
pub fn write(value: u64, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    if value > MAX_SAFE_INTEGER {
        return Err(CodecError::range("varuint", 0, MAX_SAFE_INTEGER, value));
    }
    match encoded_len(value) {
        1 => buf.push(value as u8),
        3 => {
            buf.push(0xfd);
            buf.extend_from_slice(&(value as u16).to_le_bytes());
        }
        5 => {
            buf.push(0xfe);
            buf.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }
    Ok(())
}

/// Decode a VarUInt at the start of `bytes`, returning the value and the
/// number of bytes consumed.
pub fn decode(bytes: &[u8]) -> Result<(u64, usize), CodecError> {
    let mut buf = BufferReader::new(bytes);
    let value = read(&mut buf)?;
    Ok((value, buf.position()))
}

pub fn encode(value: u64) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(encoded_len(value));
    write(value, &mut buf)?;
    Ok(buf)
}

/// Wire size of `value`: 1, 3, 5 or 9.
pub fn encoded_len(value: u64) -> usize {
    if value < 0xfd {
        1
    } else if value <= 0xffff {
        3
    } else if value <= 0xffff_ffff {
        5
    } else {
        9
    }
}
