//! Server public key codec.
//!
//! VAPID public keys are distributed as URL-safe base64; the platform
//! subscribe call wants raw bytes. Decoding happens before any
//! platform call so a malformed key is reported as a configuration
//! fault instead of a hung or rejected subscribe.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::KeyError;

/// Decode a URL-safe base64 server public key into raw bytes.
///
/// Pads the input to a multiple of four characters, substitutes the
/// URL-safe alphabet back to standard base64, then decodes. Pure and
/// total over well-formed input.
pub fn decode_vapid_key(key: &str) -> Result<Vec<u8>, KeyError> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(KeyError::InvalidKeyFormat("key is empty".to_string()));
    }

    let mut standard = trimmed.replace('-', "+").replace('_', "/");
    let padding = (4 - standard.len() % 4) % 4;
    for _ in 0..padding {
        standard.push('=');
    }

    STANDARD
        .decode(standard.as_bytes())
        .map_err(|err| KeyError::InvalidKeyFormat(err.to_string()))
}
