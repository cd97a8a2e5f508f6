//! Composable buffer framework.
//!
//! Every wire structure is described once, as an ordered list of field
//! composers. The same list drives both [`Composable::from_buffer`] and
//! [`Composable::to_buffer`], so the list order is the wire order in both
//! directions. Structures declared with [`composable!`] get this for free;
//! version-gated structures implement [`Composable`] by hand with the same
//! primitives.

pub mod primitives;
pub mod varuint;

use crate::error::CodecError;

pub use primitives::*;

/// Cursor over a borrowed byte slice. Decoding consumes it linearly.
#[derive(Debug)]
pub struct BufferReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BufferReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consume exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if n > self.remaining() {
            return Err(CodecError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Look at the next `n` bytes without consuming them.
    pub fn peek_bytes(&self, n: usize) -> Option<&'a [u8]> {
        self.data.get(self.pos..self.pos + n)
    }

    /// Consume everything left in the buffer.
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }
}

/// A structure with a complete wire representation.
pub trait Composable: Sized {
    fn from_buffer(buf: &mut BufferReader<'_>) -> Result<Self, CodecError>;

    fn to_buffer(&self, buf: &mut Vec<u8>) -> Result<(), CodecError>;

    /// Decode from `bytes`, requiring every byte to be consumed.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut buf = BufferReader::new(bytes);
        let value = Self::from_buffer(&mut buf)?;
        if !buf.is_empty() {
            return Err(CodecError::TrailingBytes(buf.remaining()));
        }
        Ok(value)
    }

    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        self.to_buffer(&mut buf)?;
        Ok(buf)
    }

    fn from_hex(hex: &str) -> Result<Self, CodecError> {
        let bytes = hex::decode(hex).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    fn to_hex(&self) -> Result<String, CodecError> {
        Ok(hex::encode(self.to_bytes()?))
    }
}

/// A stateless codec for one field of type `T`.
///
/// Implemented by the zero-sized marker types in [`primitives`]; a field's
/// composer is named in the [`composable!`] declaration of its structure.
pub trait Composer<T> {
    fn read(buf: &mut BufferReader<'_>) -> Result<T, CodecError>;

    fn write(value: &T, buf: &mut Vec<u8>) -> Result<(), CodecError>;
}

/// Declare a struct together with its [`Composable`] implementation.
///
/// Each field is written `name: Type => Composer`. Decoding reads every field
/// into a local in declaration order and builds the struct once at the end;
/// encoding writes the fields in the same order.
///
/// ```ignore
/// composable! {
///     #[derive(Debug, Clone, PartialEq, Eq)]
///     pub struct TokenBalance {
///         pub token: u32 => UInt32,
///         pub amount: Amount => Satoshi,
///     }
/// }
/// ```
macro_rules! composable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $composer:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )+
        }

        impl $crate::buffer::Composable for $name {
            fn from_buffer(
                buf: &mut $crate::buffer::BufferReader<'_>,
            ) -> ::std::result::Result<Self, $crate::error::CodecError> {
                $(
                    let $field = <$composer as $crate::buffer::Composer<$ty>>::read(buf)
                        .map_err(|e| e.in_field(stringify!($name), stringify!($field)))?;
                )+
                Ok(Self { $($field),+ })
            }

            fn to_buffer(
                &self,
                buf: &mut ::std::vec::Vec<u8>,
            ) -> ::std::result::Result<(), $crate::error::CodecError> {
                $(
                    <$composer as $crate::buffer::Composer<$ty>>::write(&self.$field, buf)
                        .map_err(|e| e.in_field(stringify!($name), stringify!($field)))?;
                )+
                Ok(())
            }
        }
    };
}

pub(crate) use composable;
