//! # SaveSync Cipher
//!
//! AES-128 implemented from first principles, with ECB and CBC modes.
//!
//! This crate provides:
//! - Rijndael key expansion ([`RoundKeys`])
//! - Single-block encryption and decryption
//! - ECB and CBC over arbitrary-length input with zero padding
//! - Zeroizing key and IV containers
//!
//! ## Usage
//!
//! ```
//! use savesync_cipher::{CbcCipher, CipherKey, InitVector};
//!
//! let key = CipherKey::from_material(b"1a2b3c4d5e6f7g8h").unwrap();
//! let iv = InitVector::from_material(b"#this_is_not_key").unwrap();
//! let cipher = CbcCipher::new(&key, iv);
//!
//! let ciphertext = cipher.encrypt(b"{\"level\":3}");
//! assert_eq!(ciphertext.len(), 16);
//!
//! let plaintext = cipher.decrypt(&ciphertext);
//! assert_eq!(&plaintext[..11], b"{\"level\":3}");
//! ```
//!
//! There is no global state: a schedule is a plain value that can be shared
//! across threads, and each block call owns its own working state.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod error;
mod key;
mod modes;
mod tables;

pub use block::{decrypt_block, encrypt_block, RoundKeys, BLOCK_SIZE, KEY_SIZE, ROUND_KEYS_SIZE};
pub use error::{CipherError, CipherResult};
pub use key::{CipherKey, InitVector};
pub use modes::{cbc_decrypt, cbc_encrypt, ecb_decrypt, ecb_encrypt, padded_len, CbcCipher};
