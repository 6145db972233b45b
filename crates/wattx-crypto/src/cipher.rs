//! AES-256-GCM message encryption and the nonce‖ciphertext wire packing
//!
//! Packed format (binary, before base64url):
//! ```text
//! [12 bytes: random nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! The nonce has a fixed length, so it is concatenated without a length prefix.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use wattx_core::{WattxError, WattxResult};

use crate::codec;
use crate::keys::SecretKey;
use crate::{NONCE_SIZE, TAG_SIZE};

/// Output of one encryption: the nonce it used and ciphertext‖tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

/// Encrypt a UTF-8 message under `key` with a fresh random nonce.
pub fn encrypt(plaintext: &str, key: &SecretKey) -> WattxResult<Sealed> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| WattxError::Random(format!("nonce generation: {e}")))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| WattxError::Encryption(format!("AES-256-GCM: {e}")))?;

    Ok(Sealed { nonce, ciphertext })
}

/// Verify and decrypt, returning the message as text.
///
/// Every failure is `Decryption`; nothing is returned unless the tag verifies
/// and the plaintext is valid UTF-8.
pub fn decrypt(
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
    key: &SecretKey,
) -> WattxResult<String> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| WattxError::Decryption)?;

    String::from_utf8(plaintext).map_err(|e| {
        e.into_bytes().zeroize();
        WattxError::Decryption
    })
}

/// `nonce ‖ ciphertext`
pub fn pack(sealed: &Sealed) -> Vec<u8> {
    let mut packed = Vec::with_capacity(NONCE_SIZE + sealed.ciphertext.len());
    packed.extend_from_slice(&sealed.nonce);
    packed.extend_from_slice(&sealed.ciphertext);
    packed
}

/// Split packed bytes into nonce (first 12 bytes) and ciphertext‖tag.
pub fn unpack(packed: &[u8]) -> WattxResult<Sealed> {
    if packed.len() < NONCE_SIZE + TAG_SIZE {
        tracing::debug!(len = packed.len(), "packed data shorter than nonce + tag");
        return Err(WattxError::Decryption);
    }

    let (nonce_bytes, ciphertext) = packed.split_at(NONCE_SIZE);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(nonce_bytes);

    Ok(Sealed {
        nonce,
        ciphertext: ciphertext.to_vec(),
    })
}

/// Encrypt → pack → base64url. The result is the `d` link field.
pub fn seal_text(plaintext: &str, key: &SecretKey) -> WattxResult<String> {
    let sealed = encrypt(plaintext, key)?;
    Ok(codec::encode(&pack(&sealed)))
}

/// base64url → unpack → decrypt. Inverse of [`seal_text`].
pub fn open_text(data: &str, key: &SecretKey) -> WattxResult<String> {
    let packed = codec::decode(data)?;
    let sealed = unpack(&packed)?;
    decrypt(&sealed.nonce, &sealed.ciphertext, key)
}
