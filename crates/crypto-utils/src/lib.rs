//! # crypto-utils
//!
//! Hash functions and the secp256k1 signing contract used to authorise
//! DeFi transaction inputs.

pub mod elliptic;
pub mod error;
pub mod hash;

pub use elliptic::{EllipticPair, Secp256k1Pair};
pub use error::CryptoError;
