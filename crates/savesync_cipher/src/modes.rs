//! ECB and CBC modes over arbitrary-length buffers.
//!
//! ## Zero padding
//!
//! A final partial plaintext block is padded on the right with zero bytes,
//! so ciphertext length is always the plaintext length rounded up to a whole
//! number of blocks. No length marker is recorded: decryption returns the
//! padded plaintext and the consumer must tolerate (or strip) trailing NUL
//! bytes. This is only safe for payloads that never end in a NUL byte, such
//! as JSON text.
//!
//! A ciphertext whose length is not a multiple of 16 is never produced here.
//! If one is supplied anyway, the trailing fragment is zero-extended,
//! decrypted, and cut back to its original length so output length always
//! equals input length.

use crate::block::{decrypt_block, encrypt_block, RoundKeys, BLOCK_SIZE};
use crate::key::{CipherKey, InitVector};

/// Returns the ciphertext length produced for `len` plaintext bytes.
#[must_use]
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Encrypts `data` block by block, zero-padding the final block.
#[must_use]
pub fn ecb_encrypt(keys: &RoundKeys, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(padded_len(data.len()));
    for chunk in data.chunks(BLOCK_SIZE) {
        out.extend_from_slice(&encrypt_block(keys, &zero_padded(chunk)));
    }
    out
}

/// Decrypts `data` block by block.
#[must_use]
pub fn ecb_decrypt(keys: &RoundKeys, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.chunks(BLOCK_SIZE) {
        let plain = decrypt_block(keys, &zero_padded(chunk));
        out.extend_from_slice(&plain[..chunk.len()]);
    }
    out
}

/// Encrypts `data` in CBC mode, zero-padding the final block.
///
/// The chain register starts at `iv` and takes the value of each ciphertext
/// block before the next block is processed.
#[must_use]
pub fn cbc_encrypt(keys: &RoundKeys, iv: &[u8; BLOCK_SIZE], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(padded_len(data.len()));
    let mut chain = *iv;

    for chunk in data.chunks(BLOCK_SIZE) {
        let mut block = zero_padded(chunk);
        xor_in_place(&mut block, &chain);
        chain = encrypt_block(keys, &block);
        out.extend_from_slice(&chain);
    }

    out
}

/// Decrypts `data` in CBC mode.
///
/// The chain register takes the ciphertext block just read, not the
/// decrypted value.
#[must_use]
pub fn cbc_decrypt(keys: &RoundKeys, iv: &[u8; BLOCK_SIZE], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut chain = *iv;

    for chunk in data.chunks(BLOCK_SIZE) {
        let block = zero_padded(chunk);
        let mut plain = decrypt_block(keys, &block);
        xor_in_place(&mut plain, &chain);
        out.extend_from_slice(&plain[..chunk.len()]);
        chain = block;
    }

    out
}

/// A key schedule bound to a fixed IV.
///
/// Every message uses the same IV; nothing is rotated between calls. That
/// matches what the remote save server expects and is not a general-purpose
/// construction for multi-message CBC.
#[derive(Clone)]
pub struct CbcCipher {
    keys: RoundKeys,
    iv: InitVector,
}

impl CbcCipher {
    /// Expands `key` and binds it to `iv`.
    #[must_use]
    pub fn new(key: &CipherKey, iv: InitVector) -> Self {
        Self {
            keys: RoundKeys::expand(key.as_bytes()),
            iv,
        }
    }

    /// Encrypts `data`; output length is [`padded_len`] of the input.
    #[must_use]
    pub fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        cbc_encrypt(&self.keys, self.iv.as_bytes(), data)
    }

    /// Decrypts `data`; output length equals input length.
    #[must_use]
    pub fn decrypt(&self, data: &[u8]) -> Vec<u8> {
        cbc_decrypt(&self.keys, self.iv.as_bytes(), data)
    }
}

impl std::fmt::Debug for CbcCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CbcCipher").finish_non_exhaustive()
    }
}

fn zero_padded(chunk: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    block[..chunk.len()].copy_from_slice(chunk);
    block
}

fn xor_in_place(block: &mut [u8; BLOCK_SIZE], other: &[u8; BLOCK_SIZE]) {
    for (byte, mask) in block.iter_mut().zip(other) {
        *byte ^= mask;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::KEY_SIZE;
    use proptest::prelude::*;

    fn test_cipher() -> CbcCipher {
        CbcCipher::new(
            &CipherKey::new(*b"1a2b3c4d5e6f7g8h"),
            InitVector::new(*b"#this_is_not_key"),
        )
    }

    #[test]
    fn padded_lengths() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(1), 16);
        assert_eq!(padded_len(16), 16);
        assert_eq!(padded_len(17), 32);
    }

    #[test]
    fn empty_input_produces_empty_output() {
        let cipher = test_cipher();
        assert!(cipher.encrypt(b"").is_empty());
        assert!(cipher.decrypt(b"").is_empty());
    }

    #[test]
    fn partial_block_is_zero_padded() {
        let cipher = test_cipher();
        let ciphertext = cipher.encrypt(b"{\"a\":1}");
        assert_eq!(ciphertext.len(), 16);

        let plain = cipher.decrypt(&ciphertext);
        assert_eq!(&plain[..7], b"{\"a\":1}");
        assert!(plain[7..].iter().all(|b| *b == 0));
    }

    #[test]
    fn padding_matches_explicit_zeros() {
        let cipher = test_cipher();
        let mut explicit = b"hello".to_vec();
        explicit.resize(16, 0);
        assert_eq!(cipher.encrypt(b"hello"), cipher.encrypt(&explicit));
    }

    #[test]
    fn identical_blocks_differ_under_cbc_but_not_ecb() {
        let keys = RoundKeys::expand(&[0x11; KEY_SIZE]);
        let data = [0x42u8; 32];

        let ecb = ecb_encrypt(&keys, &data);
        assert_eq!(ecb[..16], ecb[16..]);

        let cbc = cbc_encrypt(&keys, &[0u8; BLOCK_SIZE], &data);
        assert_ne!(cbc[..16], cbc[16..]);
    }

    #[test]
    fn truncated_ciphertext_keeps_input_length() {
        let cipher = test_cipher();
        let ciphertext = cipher.encrypt(&[7u8; 40]);
        let plain = cipher.decrypt(&ciphertext[..37]);
        assert_eq!(plain.len(), 37);
        assert_eq!(&plain[..32], &[7u8; 32]);
    }

    #[test]
    fn schedule_shared_across_threads() {
        let keys = RoundKeys::expand(&[0x5a; KEY_SIZE]);
        let iv = [0x0f; BLOCK_SIZE];
        let expected: Vec<Vec<u8>> = (0..8u8)
            .map(|i| cbc_encrypt(&keys, &iv, &[i; 100]))
            .collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8u8)
                .map(|i| {
                    let keys = &keys;
                    scope.spawn(move || {
                        let mut last = Vec::new();
                        for _ in 0..50 {
                            last = cbc_encrypt(keys, &iv, &[i; 100]);
                            assert_eq!(cbc_decrypt(keys, &iv, &last)[..100], [i; 100]);
                        }
                        last
                    })
                })
                .collect();

            for (i, handle) in handles.into_iter().enumerate() {
                assert_eq!(handle.join().unwrap(), expected[i]);
            }
        });
    }

    proptest! {
        #[test]
        fn cbc_roundtrip_up_to_padding(
            data in proptest::collection::vec(any::<u8>(), 0..200),
            key in any::<[u8; 16]>(),
            iv in any::<[u8; 16]>(),
        ) {
            let keys = RoundKeys::expand(&key);
            let ciphertext = cbc_encrypt(&keys, &iv, &data);
            prop_assert_eq!(ciphertext.len(), padded_len(data.len()));

            let plain = cbc_decrypt(&keys, &iv, &ciphertext);
            prop_assert_eq!(&plain[..data.len()], &data[..]);
            prop_assert!(plain[data.len()..].iter().all(|b| *b == 0));
        }

        #[test]
        fn ecb_roundtrip_up_to_padding(
            data in proptest::collection::vec(any::<u8>(), 0..200),
            key in any::<[u8; 16]>(),
        ) {
            let keys = RoundKeys::expand(&key);
            let plain = ecb_decrypt(&keys, &ecb_encrypt(&keys, &data));
            prop_assert_eq!(&plain[..data.len()], &data[..]);
        }
    }
}
