//! Encrypt-then-base64 tokens.

use crate::error::{CodecError, CodecResult};
use base64::{engine::general_purpose, Engine as _};
use savesync_cipher::{CbcCipher, CipherKey, InitVector};

/// Turns byte strings into transport-safe encrypted tokens and back.
///
/// `encode` zero-pads and CBC-encrypts, then base64-encodes the raw
/// ciphertext. `decode` reverses both steps over the full decoded length and
/// returns the padded plaintext as-is; see [`trim_zero_padding`].
///
/// Every token produced by one codec shares the same key and IV.
#[derive(Debug, Clone)]
pub struct Codec {
    cipher: CbcCipher,
}

impl Codec {
    /// Creates a codec from a key and IV.
    #[must_use]
    pub fn new(key: &CipherKey, iv: InitVector) -> Self {
        Self {
            cipher: CbcCipher::new(key, iv),
        }
    }

    /// Creates a codec from raw configuration material.
    ///
    /// # Errors
    ///
    /// Returns an error if either secret is shorter than 16 bytes.
    pub fn from_material(key: &[u8], iv: &[u8]) -> CodecResult<Self> {
        let key = CipherKey::from_material(key)?;
        let iv = InitVector::from_material(iv)?;
        Ok(Self::new(&key, iv))
    }

    /// Encrypts `plaintext` and returns its base64 token.
    #[must_use]
    pub fn encode(&self, plaintext: &[u8]) -> String {
        general_purpose::STANDARD.encode(self.cipher.encrypt(plaintext))
    }

    /// Decodes a token back to the zero-padded plaintext.
    ///
    /// # Errors
    ///
    /// Returns an error if `token` is not valid base64.
    pub fn decode(&self, token: &str) -> CodecResult<Vec<u8>> {
        let ciphertext = general_purpose::STANDARD
            .decode(token)
            .map_err(|e| CodecError::invalid_base64(e.to_string()))?;
        Ok(self.cipher.decrypt(&ciphertext))
    }

    /// Decodes a token carrying text, stripping the zero padding.
    ///
    /// # Errors
    ///
    /// Returns an error if `token` is not valid base64 or the plaintext is
    /// not UTF-8.
    pub fn decode_text(&self, token: &str) -> CodecResult<String> {
        let mut plain = self.decode(token)?;
        let len = trim_zero_padding(&plain).len();
        plain.truncate(len);
        String::from_utf8(plain).map_err(|_| CodecError::InvalidUtf8)
    }
}

/// Strips trailing NUL bytes left by zero padding.
///
/// Only sound for payloads that cannot legitimately end in NUL.
#[must_use]
pub fn trim_zero_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codec() -> Codec {
        Codec::from_material(b"1a2b3c4d5e6f7g8h", b"#this_is_not_key").unwrap()
    }

    #[test]
    fn token_is_base64_of_whole_blocks() {
        let token = codec().encode(b"test001");
        let raw = general_purpose::STANDARD.decode(&token).unwrap();
        assert_eq!(raw.len(), 16);
    }

    #[test]
    fn empty_plaintext() {
        let codec = codec();
        assert_eq!(codec.encode(b""), "");
        assert!(codec.decode("").unwrap().is_empty());
        assert_eq!(codec.decode_text("").unwrap(), "");
    }

    #[test]
    fn decode_keeps_padding() {
        let codec = codec();
        let plain = codec.decode(&codec.encode(b"{}")).unwrap();
        assert_eq!(plain.len(), 16);
        assert_eq!(&plain[..2], b"{}");
    }

    #[test]
    fn decode_text_strips_padding() {
        let codec = codec();
        let text = "{\"Str3\":\"123 456#789+0-=.\"}";
        assert_eq!(codec.decode_text(&codec.encode(text.as_bytes())).unwrap(), text);
    }

    #[test]
    fn invalid_base64_rejected() {
        let err = codec().decode("not base64!").unwrap_err();
        assert!(matches!(err, CodecError::InvalidBase64 { .. }));
    }

    #[test]
    fn short_material_rejected() {
        let err = Codec::from_material(b"short", b"#this_is_not_key").unwrap_err();
        assert!(matches!(err, CodecError::KeyMaterial(_)));
    }

    #[test]
    fn different_iv_changes_token() {
        let a = Codec::from_material(b"1a2b3c4d5e6f7g8h", b"0000000000000000").unwrap();
        let b = Codec::from_material(b"1a2b3c4d5e6f7g8h", b"0000000000000001").unwrap();
        assert_ne!(a.encode(b"same"), b.encode(b"same"));
    }

    #[test]
    fn trim_padding() {
        assert_eq!(trim_zero_padding(b"abc\0\0\0"), b"abc");
        assert_eq!(trim_zero_padding(b"\0\0"), b"");
        assert_eq!(trim_zero_padding(b"a\0b"), b"a\0b");
        assert_eq!(trim_zero_padding(b""), b"");
    }

    proptest! {
        #[test]
        fn roundtrip_with_known_length(data in proptest::collection::vec(any::<u8>(), 0..300)) {
            let codec = codec();
            let decoded = codec.decode(&codec.encode(&data)).unwrap();
            prop_assert!(decoded.len() >= data.len());
            prop_assert_eq!(&decoded[..data.len()], &data[..]);
        }
    }
}
