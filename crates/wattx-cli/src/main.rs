//! wattx: WATTxSecret command-line interface
//!
//! Commands:
//!   seal [MESSAGE]        - encrypt a message (arg or stdin) into an expiring link
//!   open <LINK>           - decrypt a link or bare fragment
//!   template <NAME>       - print a message skeleton to fill in
//!   config show           - display the active configuration

mod display;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use wattx_core::config::{WattxConfig, MAX_EXPIRY_DAYS, MAX_VIEWS};
use wattx_core::WattxError;
use wattx_link::{OpenError, SealOptions};

use display::Template;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "wattx",
    version,
    about = "Self-destructing secret links",
    long_about = "wattx: encrypt a short message locally into a single link that carries \
                  its own key, and open such links. Nothing is stored anywhere but the link."
)]
struct Cli {
    /// Path to config.toml
    #[arg(long, short = 'c', env = "WATTX_CONFIG", default_value = "~/.config/wattx/config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WATTX_LOG", default_value = "warn")]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "WATTX_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a message into a shareable link
    ///
    /// The message is read from stdin when not given as an argument.
    /// Surrounding whitespace is trimmed; an empty message is rejected.
    Seal {
        /// Message text
        message: Option<String>,
        /// Days until the link expires (default: config defaults.expiry_days)
        #[arg(
            long,
            short = 'd',
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_EXPIRY_DAYS))
        )]
        days: Option<u32>,
        /// View count shown to the recipient (informational only)
        #[arg(
            long,
            short = 'v',
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_VIEWS))
        )]
        views: Option<u32>,
        /// Page that will open the link (overrides config link.base_url)
        #[arg(long, short = 'b')]
        base_url: Option<String>,
        /// Print the link and its metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decrypt a link (or the fragment after '#')
    Open {
        link: String,
        /// Print the message and its metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a message template to fill in before sealing
    Template {
        #[arg(value_enum)]
        name: Template,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log, &cli.log_format);

    let config_path = expand_tilde(&cli.config);
    let config = load_config(&config_path).await?;

    match cli.command {
        Commands::Seal { message, days, views, base_url, json } => {
            cmd_seal(&config, message, days, views, base_url.as_deref(), json).await
        }
        Commands::Open { link, json } => cmd_open(&config, &link, json).await,
        Commands::Template { name } => {
            println!("{}", name.body());
            Ok(())
        }
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &config_path),
    }
}

async fn load_config(path: &Path) -> Result<WattxConfig> {
    if path.exists() {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config: {}", path.display()))?;
        WattxConfig::from_toml_str(&content)
            .with_context(|| format!("parsing config: {}", path.display()))
    } else {
        debug!(path = %path.display(), "config file not found, using defaults");
        Ok(WattxConfig::default())
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the link or the message; logs go to stderr
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_default();
        PathBuf::from(format!("{home}/{rest}"))
    } else {
        path.to_path_buf()
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn cmd_seal(
    config: &WattxConfig,
    message: Option<String>,
    days: Option<u32>,
    views: Option<u32>,
    base_url: Option<&str>,
    json: bool,
) -> Result<()> {
    let raw = match message {
        Some(m) => m,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("reading message from stdin")?;
            buf
        }
    };
    let message = prepare_message(&raw)?;

    let base_url = base_url.unwrap_or(&config.link.base_url);
    if config.display.warn_insecure_base_url && !display::is_secure_origin(base_url) {
        warn!(
            base_url,
            "base URL is not a secure origin; the link may be exposed in transit"
        );
    }

    let opts = SealOptions {
        expiry_days: days.unwrap_or(config.defaults.expiry_days),
        views: views.unwrap_or(config.defaults.views),
        max_link_len: config.max_link_len(),
    };

    let sealed = wattx_link::seal(base_url, message, &opts, wattx_link::now_ms()).map_err(|e| {
        if matches!(e, WattxError::LinkTooLong { .. }) {
            anyhow::anyhow!("{e}: message is too long to encode in a URL, please shorten it")
        } else {
            anyhow::Error::new(e).context("encryption failed")
        }
    })?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&sealed).context("serializing sealed link to JSON")?;
        println!("{rendered}");
    } else {
        println!("{}", sealed.link);
        eprintln!("Expires: {}", display::format_expiry(sealed.expiry_ms));
    }
    Ok(())
}

async fn cmd_open(config: &WattxConfig, link: &str, json: bool) -> Result<()> {
    if config.display.reveal_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.display.reveal_delay_ms)).await;
    }

    let revealed = match wattx_link::open_link(link.trim(), wattx_link::now_ms()) {
        Ok(revealed) => revealed,
        Err(OpenError::Expired { expiry_ms }) => {
            info!(expiry_ms, "refusing to open expired link");
            anyhow::bail!(
                "Message Expired: this secret message has expired ({}) and can no longer be viewed",
                display::format_expiry(expiry_ms)
            )
        }
        Err(OpenError::Invalid) => {
            anyhow::bail!(
                "Decryption Failed: invalid or corrupted link. The message could not be decrypted."
            )
        }
    };

    if json {
        let rendered =
            serde_json::to_string_pretty(&revealed).context("serializing message to JSON")?;
        println!("{rendered}");
    } else {
        println!("{}", revealed.plaintext);
        eprintln!("{}", display::reveal_meta(revealed.expiry_ms, revealed.views));
    }
    Ok(())
}

fn cmd_config_show(config: &WattxConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}

/// Trim surrounding whitespace and reject an empty message.
fn prepare_message(raw: &str) -> Result<&str, WattxError> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(WattxError::EmptyMessage);
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_message_trims() {
        assert_eq!(prepare_message("  hello \n").unwrap(), "hello");
    }

    #[test]
    fn test_prepare_message_rejects_blank() {
        assert!(matches!(prepare_message(" \n\t "), Err(WattxError::EmptyMessage)));
        assert!(matches!(prepare_message(""), Err(WattxError::EmptyMessage)));
    }

    #[test]
    fn test_expand_tilde() {
        let home = std::env::var("HOME").unwrap_or_default();
        assert_eq!(
            expand_tilde(Path::new("~/.config/wattx/config.toml")),
            PathBuf::from(format!("{home}/.config/wattx/config.toml"))
        );
        assert_eq!(
            expand_tilde(Path::new("/etc/wattx.toml")),
            PathBuf::from("/etc/wattx.toml")
        );
    }

    #[tokio::test]
    async fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).await.unwrap();
        assert_eq!(config.link.max_length, 8000);
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nexpiry_days = 2\n").unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.defaults.expiry_days, 2);
        assert_eq!(config.defaults.views, 1);
    }

    #[tokio::test]
    async fn test_load_config_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nviews = 0\n").unwrap();

        assert!(load_config(&path).await.is_err());
    }

    #[test]
    fn test_cli_parses_seal() {
        let cli =
            Cli::try_parse_from(["wattx", "seal", "hi", "--days", "3", "--views", "2"]).unwrap();
        match cli.command {
            Commands::Seal { message, days, views, .. } => {
                assert_eq!(message.as_deref(), Some("hi"));
                assert_eq!(days, Some(3));
                assert_eq!(views, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_views() {
        assert!(Cli::try_parse_from(["wattx", "seal", "hi", "--views", "0"]).is_err());
    }

    #[test]
    fn test_cli_days_bounds_match_config() {
        assert!(Cli::try_parse_from(["wattx", "seal", "hi", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["wattx", "seal", "hi", "--days", "366"]).is_err());
        assert!(Cli::try_parse_from(["wattx", "seal", "hi", "--days", "365"]).is_ok());
    }
}
