//! Key and initialization-vector material.
//!
//! Both secrets are exactly one block wide. Material supplied as a longer
//! byte string is accepted and truncated to its first 16 bytes, which keeps
//! configurations written for the existing save server working unchanged.

use crate::block::{BLOCK_SIZE, KEY_SIZE};
use crate::error::{CipherError, CipherResult};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-128 key.
///
/// The key is zeroized when dropped and never printed by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey {
    bytes: [u8; KEY_SIZE],
}

impl CipherKey {
    /// Creates a key from exactly 16 bytes.
    #[must_use]
    pub fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates a key from configuration material.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 16 bytes are supplied.
    pub fn from_material(material: &[u8]) -> CipherResult<Self> {
        first_block("key", material).map(Self::new)
    }

    /// Returns the key bytes.
    ///
    /// Don't log or serialize the result.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// CBC initialization vector.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct InitVector {
    bytes: [u8; BLOCK_SIZE],
}

impl InitVector {
    /// Creates an IV from exactly 16 bytes.
    #[must_use]
    pub fn new(bytes: [u8; BLOCK_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates an IV from configuration material.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 16 bytes are supplied.
    pub fn from_material(material: &[u8]) -> CipherResult<Self> {
        first_block("iv", material).map(Self::new)
    }

    /// Returns the IV bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for InitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitVector")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

fn first_block(what: &'static str, material: &[u8]) -> CipherResult<[u8; BLOCK_SIZE]> {
    if material.len() < BLOCK_SIZE {
        return Err(CipherError::material_too_short(
            what,
            BLOCK_SIZE,
            material.len(),
        ));
    }
    if material.len() > BLOCK_SIZE {
        tracing::warn!(
            what,
            supplied = material.len(),
            "secret material longer than {BLOCK_SIZE} bytes; trailing bytes ignored"
        );
    }

    let mut bytes = [0u8; BLOCK_SIZE];
    bytes.copy_from_slice(&material[..BLOCK_SIZE]);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_material_accepted() {
        let key = CipherKey::from_material(b"1a2b3c4d5e6f7g8h").unwrap();
        assert_eq!(key.as_bytes(), b"1a2b3c4d5e6f7g8h");
    }

    #[test]
    fn short_material_rejected() {
        let err = CipherKey::from_material(b"too short").unwrap_err();
        assert_eq!(err, CipherError::material_too_short("key", 16, 9));

        let err = InitVector::from_material(b"").unwrap_err();
        assert_eq!(err, CipherError::material_too_short("iv", 16, 0));
    }

    #[test]
    fn long_material_truncated() {
        let iv = InitVector::from_material(b"#this_is_not_key_and_more").unwrap();
        assert_eq!(iv.as_bytes(), b"#this_is_not_key");
    }

    #[test]
    fn debug_is_redacted() {
        let key = CipherKey::new(*b"super-secret-key");
        let debug = format!("{key:?}");
        assert!(!debug.contains("super"));
        assert!(debug.contains("REDACTED"));
    }
}
