//! Transaction outputs.
//!
//! The in-memory [`Vout`] is the same for every version; the wire layout is
//! not. Transactions below [`TOKENS_MIN_VERSION`](super::TOKENS_MIN_VERSION)
//! use [`VoutV2`], later ones [`VoutV4`].

use bitcoin::Amount;

use crate::buffer::{BufferReader, Composable, Composer, Satoshi, VarUInt};
use crate::error::CodecError;
use crate::script::Script;

use super::TOKENS_MIN_VERSION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vout {
    pub value: Amount,
    pub script: Script,
    /// `0` is the native coin.
    pub token_id: u32,
}

impl Vout {
    pub fn new(value: Amount, script: Script) -> Self {
        Self {
            value,
            script,
            token_id: 0,
        }
    }

    /// Write this output with the layout `version` selects.
    pub fn write_versioned(&self, version: u32, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        if version < TOKENS_MIN_VERSION {
            VoutV2::write(self, buf)
        } else {
            VoutV4::write(self, buf)
        }
    }

    pub fn read_versioned(version: u32, buf: &mut BufferReader<'_>) -> Result<Self, CodecError> {
        if version < TOKENS_MIN_VERSION {
            VoutV2::read(buf)
        } else {
            VoutV4::read(buf)
        }
    }
}

/// Legacy layout: value, script. The token is implicitly `0`.
#[derive(Debug, Clone, Copy)]
pub struct VoutV2;

impl Composer<Vout> for VoutV2 {
    fn read(buf: &mut BufferReader<'_>) -> Result<Vout, CodecError> {
        let value = Satoshi::read(buf).map_err(|e| e.in_field("Vout", "value"))?;
        let script = Script::from_buffer(buf).map_err(|e| e.in_field("Vout", "script"))?;
        Ok(Vout::new(value, script))
    }

    fn write(vout: &Vout, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        if vout.token_id != 0 {
            return Err(CodecError::LegacyTokenId(vout.token_id).in_field("Vout", "token_id"));
        }
        Satoshi::write(&vout.value, buf).map_err(|e| e.in_field("Vout", "value"))?;
        vout.script
            .to_buffer(buf)
            .map_err(|e| e.in_field("Vout", "script"))
    }
}

/// Token-aware layout: value, script, VarUInt token id.
#[derive(Debug, Clone, Copy)]
pub struct VoutV4;

impl Composer<Vout> for VoutV4 {
    fn read(buf: &mut BufferReader<'_>) -> Result<Vout, CodecError> {
        let mut vout = VoutV2::read(buf)?;
        vout.token_id = VarUInt::read(buf).map_err(|e| e.in_field("Vout", "token_id"))?;
        Ok(vout)
    }

    fn write(vout: &Vout, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        Satoshi::write(&vout.value, buf).map_err(|e| e.in_field("Vout", "value"))?;
        vout.script
            .to_buffer(buf)
            .map_err(|e| e.in_field("Vout", "script"))?;
        VarUInt::write(&vout.token_id, buf).map_err(|e| e.in_field("Vout", "token_id"))
    }
}
