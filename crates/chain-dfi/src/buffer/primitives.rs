//! Primitive field composers.
//!
//! Integer composers are generic over the in-memory field type: the field is
//! converted to the wire width on encode and back on decode, and a value that
//! does not fit either way is a [`CodecError::Range`].

use std::fmt::Display;
use std::marker::PhantomData;

use bitcoin::Amount;

use super::{varuint, BufferReader, Composable, Composer};
use crate::error::CodecError;

macro_rules! fixed_width {
    ($(#[$meta:meta])* $name:ident, $wire:ty, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl<T> Composer<T> for $name
        where
            T: Copy + Display + TryFrom<$wire> + TryInto<$wire>,
        {
            fn read(buf: &mut BufferReader<'_>) -> Result<T, CodecError> {
                let wire = <$wire>::from_le_bytes(buf.read_fixed()?);
                T::try_from(wire).map_err(|_| {
                    CodecError::range($kind, <$wire>::MIN, <$wire>::MAX, wire)
                })
            }

            fn write(value: &T, buf: &mut Vec<u8>) -> Result<(), CodecError> {
                let wire: $wire = (*value).try_into().map_err(|_| {
                    CodecError::range($kind, <$wire>::MIN, <$wire>::MAX, value)
                })?;
                buf.extend_from_slice(&wire.to_le_bytes());
                Ok(())
            }
        }
    };
}

fixed_width!(
    /// 1-byte unsigned integer.
    UInt8, u8, "uint8"
);
fixed_width!(
    /// 2-byte little-endian unsigned integer.
    UInt16, u16, "uint16"
);
fixed_width!(
    /// 4-byte little-endian unsigned integer.
    UInt32, u32, "uint32"
);
fixed_width!(
    /// 4-byte little-endian signed integer.
    Int32, i32, "int32"
);
fixed_width!(
    /// 8-byte little-endian unsigned integer. Wider fields (`u128`) are
    /// range checked against `[0, 2^64)`.
    BigUInt64, u64, "uint64"
);

/// [VarUInt](super::varuint) encoded integer.
#[derive(Debug, Clone, Copy)]
pub struct VarUInt;

impl<T> Composer<T> for VarUInt
where
    T: Copy + Display + TryFrom<u64> + TryInto<u64>,
{
    fn read(buf: &mut BufferReader<'_>) -> Result<T, CodecError> {
        let wire = varuint::read(buf)?;
        T::try_from(wire)
            .map_err(|_| CodecError::range("varuint", 0, varuint::MAX_SAFE_INTEGER, wire))
    }

    fn write(value: &T, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        let wire: u64 = (*value)
            .try_into()
            .map_err(|_| CodecError::range("varuint", 0, varuint::MAX_SAFE_INTEGER, value))?;
        varuint::write(wire, buf)
    }
}

/// Fixed-point amount with 8 decimal places, stored as the 8-byte LE
/// integer `value * 10^8`.
#[derive(Debug, Clone, Copy)]
pub struct Satoshi;

impl Composer<Amount> for Satoshi {
    fn read(buf: &mut BufferReader<'_>) -> Result<Amount, CodecError> {
        Ok(Amount::from_sat(u64::from_le_bytes(buf.read_fixed()?)))
    }

    fn write(value: &Amount, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        buf.extend_from_slice(&value.to_sat().to_le_bytes());
        Ok(())
    }
}

/// `N` wire bytes exposed as a byte-reversed hex string.
///
/// Hashes (txids, oracle ids, masternode ids) travel little-endian and are
/// displayed big-endian; this is the one place that flip happens.
#[derive(Debug, Clone, Copy)]
pub struct Hex<const N: usize>;

impl<const N: usize> Composer<String> for Hex<N> {
    fn read(buf: &mut BufferReader<'_>) -> Result<String, CodecError> {
        let mut bytes = buf.read_bytes(N)?.to_vec();
        bytes.reverse();
        Ok(hex::encode(bytes))
    }

    fn write(value: &String, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        if value.len() != N * 2 {
            return Err(CodecError::HexLength {
                expected: N * 2,
                actual: value.len(),
            });
        }
        let mut bytes = hex::decode(value).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
        bytes.reverse();
        buf.extend_from_slice(&bytes);
        Ok(())
    }
}

/// `N` raw bytes, wire order preserved.
#[derive(Debug, Clone, Copy)]
pub struct Bytes<const N: usize>;

impl<const N: usize> Composer<[u8; N]> for Bytes<N> {
    fn read(buf: &mut BufferReader<'_>) -> Result<[u8; N], CodecError> {
        buf.read_fixed()
    }

    fn write(value: &[u8; N], buf: &mut Vec<u8>) -> Result<(), CodecError> {
        buf.extend_from_slice(value);
        Ok(())
    }
}

/// Single-byte boolean; only `0x00` and `0x01` are accepted.
#[derive(Debug, Clone, Copy)]
pub struct Bool8;

impl Composer<bool> for Bool8 {
    fn read(buf: &mut BufferReader<'_>) -> Result<bool, CodecError> {
        match buf.read_u8()? {
            0x00 => Ok(false),
            0x01 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }

    fn write(value: &bool, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        buf.push(u8::from(*value));
        Ok(())
    }
}

/// VarUInt length followed by that many raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct VarUIntBytes;

impl Composer<Vec<u8>> for VarUIntBytes {
    fn read(buf: &mut BufferReader<'_>) -> Result<Vec<u8>, CodecError> {
        let len = varuint::read(buf)? as usize;
        Ok(buf.read_bytes(len)?.to_vec())
    }

    fn write(value: &Vec<u8>, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        varuint::write(value.len() as u64, buf)?;
        buf.extend_from_slice(value);
        Ok(())
    }
}

/// VarUInt length followed by UTF-8 text.
#[derive(Debug, Clone, Copy)]
pub struct VarUIntUtf8;

impl Composer<String> for VarUIntUtf8 {
    fn read(buf: &mut BufferReader<'_>) -> Result<String, CodecError> {
        let bytes = VarUIntBytes::read(buf)?;
        String::from_utf8(bytes).map_err(|e| CodecError::InvalidUtf8(e.to_string()))
    }

    fn write(value: &String, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        varuint::write(value.len() as u64, buf)?;
        buf.extend_from_slice(value.as_bytes());
        Ok(())
    }
}

/// Delegates to a nested [`Composable`] structure.
#[derive(Debug, Clone, Copy)]
pub struct Single;

impl<T: Composable> Composer<T> for Single {
    fn read(buf: &mut BufferReader<'_>) -> Result<T, CodecError> {
        T::from_buffer(buf)
    }

    fn write(value: &T, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        value.to_buffer(buf)
    }
}

/// VarUInt element count followed by that many `C` elements.
#[derive(Debug, Clone, Copy)]
pub struct VarUIntArray<C>(PhantomData<C>);

impl<T, C: Composer<T>> Composer<Vec<T>> for VarUIntArray<C> {
    fn read(buf: &mut BufferReader<'_>) -> Result<Vec<T>, CodecError> {
        let count = varuint::read(buf)? as usize;
        read_array::<T, C>(buf, count)
    }

    fn write(value: &Vec<T>, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        varuint::write(value.len() as u64, buf)?;
        write_array::<T, C>(value, value.len(), buf)
    }
}

/// `C` elements repeated until the enclosing buffer is exhausted.
#[derive(Debug, Clone, Copy)]
pub struct Remaining<C>(PhantomData<C>);

impl<T, C: Composer<T>> Composer<Vec<T>> for Remaining<C> {
    fn read(buf: &mut BufferReader<'_>) -> Result<Vec<T>, CodecError> {
        let mut items = Vec::new();
        while !buf.is_empty() {
            let start = buf.position();
            items.push(C::read(buf)?);
            if buf.position() == start {
                return Err(CodecError::NoProgress);
            }
        }
        Ok(items)
    }

    fn write(value: &Vec<T>, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        value.iter().try_for_each(|item| C::write(item, buf))
    }
}

/// The rest of the enclosing buffer as plain (unreversed) hex.
#[derive(Debug, Clone, Copy)]
pub struct RemainingHex;

impl Composer<String> for RemainingHex {
    fn read(buf: &mut BufferReader<'_>) -> Result<String, CodecError> {
        Ok(hex::encode(buf.read_to_end()))
    }

    fn write(value: &String, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        let bytes = hex::decode(value).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
        buf.extend_from_slice(&bytes);
        Ok(())
    }
}

/// A trailing `C` that is present only when bytes remain.
#[derive(Debug, Clone, Copy)]
pub struct Optional<C>(PhantomData<C>);

impl<T, C: Composer<T>> Composer<Option<T>> for Optional<C> {
    fn read(buf: &mut BufferReader<'_>) -> Result<Option<T>, CodecError> {
        if buf.is_empty() {
            return Ok(None);
        }
        C::read(buf).map(Some)
    }

    fn write(value: &Option<T>, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        match value {
            Some(inner) => C::write(inner, buf),
            None => Ok(()),
        }
    }
}

/// Read `count` elements whose count is known from elsewhere in the
/// structure rather than prefixed on the wire.
pub fn read_array<T, C: Composer<T>>(
    buf: &mut BufferReader<'_>,
    count: usize,
) -> Result<Vec<T>, CodecError> {
    // Every element takes at least one byte; cap the allocation by what is left.
    let mut items = Vec::with_capacity(count.min(buf.remaining()));
    for _ in 0..count {
        items.push(C::read(buf)?);
    }
    Ok(items)
}

/// Write `items`, which must hold exactly `count` elements.
pub fn write_array<T, C: Composer<T>>(
    items: &[T],
    count: usize,
    buf: &mut Vec<u8>,
) -> Result<(), CodecError> {
    if items.len() != count {
        return Err(CodecError::ArrayLength {
            expected: count,
            actual: items.len(),
        });
    }
    items.iter().try_for_each(|item| C::write(item, buf))
}
