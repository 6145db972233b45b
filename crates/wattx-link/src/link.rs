//! Link assembly and fragment parsing
//!
//! Fields are written in `k, d, e, v` order but read in any order. Values are
//! never percent-encoded: `k`/`d` come from the base64url alphabet and `e`/`v`
//! are decimal integers.

use std::collections::HashMap;

use wattx_core::{WattxError, WattxResult};

/// The four fields carried in a link fragment.
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Secret key, base64url
    pub key: String,
    /// nonce‖ciphertext, base64url
    pub data: String,
    /// Absolute expiry, Unix epoch milliseconds
    pub expiry_ms: i64,
    /// Informational view count; nothing enforces it
    pub views: u32,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("key", &"[REDACTED]")
            .field("data_len", &self.data.len())
            .field("expiry_ms", &self.expiry_ms)
            .field("views", &self.views)
            .finish()
    }
}

/// Build `<base_url without fragment>#k=..&d=..&e=..&v=..`.
pub fn assemble(
    base_url: &str,
    key_text: &str,
    data_text: &str,
    expiry_ms: i64,
    views: u32,
) -> String {
    let base = base_url.split('#').next().unwrap_or_default();
    format!("{base}#k={key_text}&d={data_text}&e={expiry_ms}&v={views}")
}

/// Everything after the first `#`, or `""` when the link has no fragment.
pub fn fragment_of(link: &str) -> &str {
    link.split_once('#').map(|(_, fragment)| fragment).unwrap_or_default()
}

/// Parse a full link, or a bare fragment when the input has no `#`.
pub fn parse_link(link: &str) -> Option<Envelope> {
    if link.contains('#') {
        parse_fragment(fragment_of(link))
    } else {
        parse_fragment(link)
    }
}

/// Parse a fragment (leading `#` optional) into an [`Envelope`].
///
/// Returns `None` when there is no payload, when `k`, `d` or `e` is missing
/// or empty, or when `e`/`v` is not a base-10 integer. An empty `v` counts as
/// absent. Segments without `=` or with an empty name are skipped; a repeated
/// name keeps its last value.
pub fn parse_fragment(fragment: &str) -> Option<Envelope> {
    match try_parse_fragment(fragment) {
        Ok(envelope) => Some(envelope),
        Err(e) => {
            tracing::debug!(error = %e, "fragment rejected");
            None
        }
    }
}

/// Like [`parse_fragment`], but says which field was wrong.
pub fn try_parse_fragment(fragment: &str) -> WattxResult<Envelope> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    if fragment.is_empty() {
        return Err(WattxError::LinkParse("empty fragment".into()));
    }

    let mut params: HashMap<&str, &str> = HashMap::new();
    for part in fragment.split('&') {
        match part.split_once('=') {
            Some((name, value)) if !name.is_empty() => {
                params.insert(name, value);
            }
            _ => {}
        }
    }

    let required = |name: &str| {
        params
            .get(name)
            .copied()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| WattxError::LinkParse(format!("missing field {name}")))
    };

    let key = required("k")?;
    let data = required("d")?;
    let expiry_ms = required("e")?
        .parse::<i64>()
        .map_err(|e| WattxError::LinkParse(format!("field e: {e}")))?;
    let views = match params.get("v").copied().filter(|v| !v.is_empty()) {
        None => 1,
        Some(v) => v
            .parse::<u32>()
            .map_err(|e| WattxError::LinkParse(format!("field v: {e}")))?,
    };

    Ok(Envelope {
        key: key.to_string(),
        data: data.to_string(),
        expiry_ms,
        views,
    })
}
