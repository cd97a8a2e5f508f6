use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand_core::OsRng;
use zeroize::Zeroize;

use crate::error::CryptoError;

/// A signing key able to authorise inputs.
///
/// Implementations may live outside the process (hardware wallets, remote
/// signers); the builder only relies on this contract.
pub trait EllipticPair: Send + Sync {
    /// 33-byte compressed SEC1 public key.
    fn public_key(&self) -> Result<[u8; 33], CryptoError>;

    /// Sign a 32-byte digest, returning a DER-encoded low-S ECDSA signature.
    fn sign(&self, hash: &[u8; 32]) -> Result<Vec<u8>, CryptoError>;

    /// Verify a DER-encoded signature over `hash` against this key.
    fn verify(&self, hash: &[u8; 32], der: &[u8]) -> Result<bool, CryptoError>;
}

/// In-memory secp256k1 key pair backed by `k256`.
pub struct Secp256k1Pair {
    signing_key: SigningKey,
}

impl Secp256k1Pair {
    /// Build a pair from a 32-byte secret scalar. The caller's copy is left
    /// untouched; the local copy is zeroized.
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Result<Self, CryptoError> {
        let mut bytes = *secret;
        let result = SigningKey::from_bytes((&bytes).into())
            .map_err(|e| CryptoError::InvalidPrivateKey(format!("invalid secp256k1 key: {e}")));
        bytes.zeroize();
        Ok(Self {
            signing_key: result?,
        })
    }

    /// Generate a fresh key from the OS random source.
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }
}

impl std::fmt::Debug for Secp256k1Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pubkey = self
            .public_key()
            .map(hex::encode)
            .unwrap_or_else(|_| "<invalid>".into());
        f.debug_struct("Secp256k1Pair")
            .field("public_key", &pubkey)
            .finish_non_exhaustive()
    }
}

impl EllipticPair for Secp256k1Pair {
    fn public_key(&self) -> Result<[u8; 33], CryptoError> {
        self.signing_key
            .verifying_key()
            .to_sec1_bytes()
            .as_ref()
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKey("expected 33-byte compressed key".into()))
    }

    fn sign(&self, hash: &[u8; 32]) -> Result<Vec<u8>, CryptoError> {
        let sig: Signature = self
            .signing_key
            .sign_prehash(hash)
            .map_err(|e| CryptoError::SigningFailed(format!("ECDSA signing failed: {e}")))?;
        // Consensus policy only relays low-S signatures.
        let sig = sig.normalize_s().unwrap_or(sig);
        Ok(sig.to_der().as_bytes().to_vec())
    }

    fn verify(&self, hash: &[u8; 32], der: &[u8]) -> Result<bool, CryptoError> {
        verify_der(&self.public_key()?, hash, der)
    }
}

/// Verify a DER signature over `hash` for a compressed public key.
pub fn verify_der(pubkey: &[u8; 33], hash: &[u8; 32], der: &[u8]) -> Result<bool, CryptoError> {
    let verifying_key = VerifyingKey::from_sec1_bytes(pubkey)
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
    let signature =
        Signature::from_der(der).map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    Ok(verifying_key.verify_prehash(hash, &signature).is_ok())
}
