//! wattx-crypto: client-side encryption for WATTxSecret links
//!
//! Pipeline: plaintext → AES-256-GCM (fresh key, fresh nonce) → nonce‖ciphertext → base64url
//!
//! ```text
//! Secret Key (256-bit, OS CSPRNG, one per message)
//!   └── AEAD: AES-256-GCM (key=secret_key, nonce=random_96bit, no AAD)
//!       wire: [12 bytes: nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! Both the key and the packed ciphertext travel as unpadded base64url text so
//! they can sit in a URL fragment without percent-encoding.

pub mod cipher;
pub mod codec;
pub mod keys;

pub use cipher::{decrypt, encrypt, open_text, pack, seal_text, unpack, Sealed};
pub use keys::{generate_key, import_key, SecretKey};

/// Size of an AES-256 key in bytes
pub const KEY_SIZE: usize = 32;

/// Size of an AES-GCM nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;
