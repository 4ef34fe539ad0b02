//! Encode and decode commands.

use crate::SecretArgs;
use savesync_codec::{Codec, CodecResult};

fn codec(secrets: &SecretArgs) -> CodecResult<Codec> {
    Codec::from_material(secrets.key.as_bytes(), secrets.iv.as_bytes())
}

/// Encrypts `text` and returns the token.
pub fn encode(secrets: &SecretArgs, text: &str) -> CodecResult<String> {
    Ok(codec(secrets)?.encode(text.as_bytes()))
}

/// Decrypts `token` and returns the text without zero padding.
pub fn decode(secrets: &SecretArgs, token: &str) -> CodecResult<String> {
    codec(secrets)?.decode_text(token.trim())
}
