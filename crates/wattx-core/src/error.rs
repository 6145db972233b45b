use thiserror::Error;

pub type WattxResult<T> = Result<T, WattxError>;

#[derive(Debug, Error)]
pub enum WattxError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("key import error: {0}")]
    KeyImport(String),

    /// Deliberately carries no detail: wrong key, tampered data and
    /// non-UTF-8 plaintext all look the same to the caller.
    #[error("decryption failed")]
    Decryption,

    #[error("link parse error: {0}")]
    LinkParse(String),

    #[error("random source failure: {0}")]
    Random(String),

    #[error("encryption error: {0}")]
    Encryption(String),

    #[error("invalid expiry: {0}")]
    InvalidExpiry(String),

    #[error("invalid view count: {0} (must be at least 1)")]
    InvalidViews(u32),

    #[error("link too long: {len} bytes (maximum {max})")]
    LinkTooLong { len: usize, max: usize },

    #[error("message is empty")]
    EmptyMessage,

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
