use serde::{Deserialize, Serialize};

use crate::error::{WattxError, WattxResult};

/// Longest expiry a link may be sealed with, in days
pub const MAX_EXPIRY_DAYS: u32 = 365;

/// Largest view count a link may carry
pub const MAX_VIEWS: u32 = 100;

/// Top-level CLI configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WattxConfig {
    pub link: LinkConfig,
    pub defaults: DefaultsConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Page that hosts the decoder; any fragment on it is replaced
    pub base_url: String,
    /// Longest link `seal` will produce (0 = unlimited)
    pub max_length: usize,
}

/// Values used when `seal` is run without `--days` / `--views`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub expiry_days: u32,
    pub views: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Pause before printing a revealed message, in milliseconds
    pub reveal_delay_ms: u64,
    /// Warn when the base URL is not served over a secure origin
    pub warn_insecure_base_url: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".into(),
            max_length: 8000,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            expiry_days: 7,
            views: 1,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 0,
            warn_insecure_base_url: true,
        }
    }
}

impl WattxConfig {
    /// Parse a TOML document; missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> WattxResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| WattxError::Config(format!("parsing TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WattxResult<()> {
        if self.link.base_url.trim().is_empty() {
            return Err(WattxError::Config("link.base_url must not be empty".into()));
        }
        if !(1..=MAX_VIEWS).contains(&self.defaults.views) {
            return Err(WattxError::Config(format!(
                "defaults.views must be in 1..={MAX_VIEWS}, got {}",
                self.defaults.views
            )));
        }
        if !(1..=MAX_EXPIRY_DAYS).contains(&self.defaults.expiry_days) {
            return Err(WattxError::Config(format!(
                "defaults.expiry_days must be in 1..={MAX_EXPIRY_DAYS}, got {}",
                self.defaults.expiry_days
            )));
        }
        if self.link.max_length == 0 {
            tracing::debug!("link.max_length = 0, link length check disabled");
        }
        Ok(())
    }

    /// `Some(limit)` unless the length check is disabled.
    pub fn max_link_len(&self) -> Option<usize> {
        (self.link.max_length > 0).then_some(self.link.max_length)
    }
}
