//! Per-message secret keys: generation, export to link text, import from link text

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use wattx_core::{WattxError, WattxResult};

use crate::codec;
use crate::KEY_SIZE;

/// A single-use 256-bit AES key. Zeroized on drop.
pub struct SecretKey {
    bytes: [u8; KEY_SIZE],
}

impl SecretKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Raw key bytes as unpadded base64url, ready for the `k` link field.
    pub fn export(&self) -> String {
        codec::encode(&self.bytes)
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh 256-bit key from the OS CSPRNG.
pub fn generate_key() -> WattxResult<SecretKey> {
    let mut bytes = [0u8; KEY_SIZE];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| WattxError::Random(format!("key generation: {e}")))?;
    Ok(SecretKey::from_bytes(bytes))
}

/// Import a key from its base64url text form.
///
/// Fails with `KeyImport` for malformed text or anything other than 32 bytes.
pub fn import_key(text: &str) -> WattxResult<SecretKey> {
    let mut raw = codec::decode(text).map_err(|e| WattxError::KeyImport(e.to_string()))?;

    if raw.len() != KEY_SIZE {
        let len = raw.len();
        raw.zeroize();
        return Err(WattxError::KeyImport(format!(
            "key has wrong size: {len} bytes (expected {KEY_SIZE})"
        )));
    }

    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(&raw);
    raw.zeroize();

    Ok(SecretKey::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        let k1 = generate_key().unwrap();
        let k2 = generate_key().unwrap();
        assert_ne!(k1.as_bytes(), k2.as_bytes(), "random keys must differ");
    }

    #[test]
    fn test_export_import_roundtrip() {
        let key = generate_key().unwrap();
        let text = key.export();

        // 32 bytes -> 43 unpadded base64 characters
        assert_eq!(text.len(), 43);

        let imported = import_key(&text).unwrap();
        assert_eq!(imported.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_import_wrong_length() {
        let short = codec::encode(&[7u8; 16]);
        let result = import_key(&short);
        assert!(matches!(result, Err(WattxError::KeyImport(_))));

        let long = codec::encode(&[7u8; 33]);
        assert!(matches!(import_key(&long), Err(WattxError::KeyImport(_))));
    }

    #[test]
    fn test_import_malformed_text() {
        let result = import_key("not a key!");
        assert!(matches!(result, Err(WattxError::KeyImport(_))));
    }

    #[test]
    fn test_debug_redacts() {
        let key = SecretKey::from_bytes([0x41u8; KEY_SIZE]);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("65"));
    }
}
