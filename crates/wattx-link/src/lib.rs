//! wattx-link: the shareable-link half of WATTxSecret
//!
//! A link carries everything needed to read a secret in its URL fragment:
//!
//! ```text
//! <origin+path>#k=<key b64url>&d=<nonce‖ciphertext b64url>&e=<expiry ms>&v=<views>
//! ```
//!
//! The fragment never reaches a server, so the link itself is the capability.
//! [`envelope`] layers the expiry policy on top of [`link`].

pub mod envelope;
pub mod link;

pub use envelope::{now_ms, open, open_link, seal, OpenError, Revealed, SealOptions, SealedLink};
pub use link::{assemble, fragment_of, parse_fragment, parse_link, try_parse_fragment, Envelope};

/// Milliseconds in one day of expiry
pub const DAY_MS: i64 = 86_400_000;
