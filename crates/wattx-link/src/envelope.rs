//! Self-destructing envelope policy
//!
//! Encode side is one pipeline: fresh key → encrypt → pack → base64url →
//! expiry → link. Decode side moves a parsed [`Envelope`] to exactly one of
//! three terminal outcomes:
//!
//! ```text
//! PENDING ──(now >= expiry)──────────────▶ EXPIRED          OpenError::Expired
//!    │
//!    ├──(key import / decode / AEAD fails)▶ DECRYPT_FAILED   OpenError::Invalid
//!    │
//!    └──(tag verifies, UTF-8 ok)─────────▶ REVEALED         Revealed
//! ```
//!
//! The expiry check always runs first, so an expired link is never decrypted.
//! Every other failure collapses into `Invalid` without saying which step
//! failed.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use wattx_core::{WattxError, WattxResult};
use wattx_crypto::{generate_key, import_key, open_text, seal_text};

use crate::link::{assemble, parse_link, Envelope};
use crate::DAY_MS;

/// Encoder knobs.
#[derive(Debug, Clone)]
pub struct SealOptions {
    pub expiry_days: u32,
    pub views: u32,
    /// Reject links longer than this many bytes
    pub max_link_len: Option<usize>,
}

impl Default for SealOptions {
    fn default() -> Self {
        Self {
            expiry_days: 7,
            views: 1,
            max_link_len: Some(8000),
        }
    }
}

/// A freshly produced link plus the metadata it embeds.
#[derive(Debug, Clone, Serialize)]
pub struct SealedLink {
    pub link: String,
    pub expiry_ms: i64,
    pub views: u32,
}

/// A successfully decrypted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revealed {
    pub plaintext: String,
    pub expiry_ms: i64,
    pub views: u32,
}

/// The two failures a decoding party is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenError {
    #[error("message expired")]
    Expired { expiry_ms: i64 },

    #[error("invalid or corrupted link")]
    Invalid,
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// `now_ms + days * 86_400_000`, checked.
pub fn expiry_after(now_ms: i64, days: u32) -> WattxResult<i64> {
    i64::from(days)
        .checked_mul(DAY_MS)
        .and_then(|span| now_ms.checked_add(span))
        .ok_or_else(|| WattxError::InvalidExpiry(format!("{days} days from {now_ms} overflows")))
}

/// Encrypt `message` under a fresh key and assemble the shareable link.
///
/// Zero views and zero days are rejected.
pub fn seal(
    base_url: &str,
    message: &str,
    opts: &SealOptions,
    now_ms: i64,
) -> WattxResult<SealedLink> {
    if opts.views == 0 {
        return Err(WattxError::InvalidViews(opts.views));
    }
    if opts.expiry_days == 0 {
        return Err(WattxError::InvalidExpiry("expiry must be at least 1 day".into()));
    }

    let key = generate_key()?;
    let data = seal_text(message, &key)?;
    let expiry_ms = expiry_after(now_ms, opts.expiry_days)?;

    let link = assemble(base_url, &key.export(), &data, expiry_ms, opts.views);

    if let Some(max) = opts.max_link_len {
        if link.len() > max {
            return Err(WattxError::LinkTooLong {
                len: link.len(),
                max,
            });
        }
    }

    info!(
        expiry_ms,
        views = opts.views,
        link_len = link.len(),
        "sealed message"
    );

    Ok(SealedLink {
        link,
        expiry_ms,
        views: opts.views,
    })
}

/// Run the decode-side policy on a parsed envelope.
pub fn open(envelope: &Envelope, now_ms: i64) -> Result<Revealed, OpenError> {
    if now_ms >= envelope.expiry_ms {
        debug!(expiry_ms = envelope.expiry_ms, now_ms, "envelope expired");
        return Err(OpenError::Expired {
            expiry_ms: envelope.expiry_ms,
        });
    }

    let plaintext = reveal(envelope).map_err(|_| OpenError::Invalid)?;

    Ok(Revealed {
        plaintext,
        expiry_ms: envelope.expiry_ms,
        views: envelope.views,
    })
}

/// Parse a link (or bare fragment) and open it.
pub fn open_link(link: &str, now_ms: i64) -> Result<Revealed, OpenError> {
    let envelope = parse_link(link).ok_or(OpenError::Invalid)?;
    open(&envelope, now_ms)
}

fn reveal(envelope: &Envelope) -> WattxResult<String> {
    let key = import_key(&envelope.key)?;
    open_text(&envelope.data, &key)
}
