//! Presentation helpers: dates, view counts, templates, origin checks

use chrono::TimeZone;
use clap::ValueEnum;

/// Message skeletons for common kinds of secret
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Template {
    /// Username / password / URL / notes
    Credentials,
    /// Card number / expiry / CVV / name / billing address
    Creditcard,
}

impl Template {
    pub fn body(self) -> &'static str {
        match self {
            Template::Credentials => "Username: \nPassword: \nURL: \nNotes: ",
            Template::Creditcard => {
                "Card Number: \nExpiry: \nCVV: \nName: \nBilling Address: "
            }
        }
    }
}

/// Expiry in the local timezone, e.g. "November 14, 2023 22:13".
pub fn format_expiry(expiry_ms: i64) -> String {
    format_expiry_in(expiry_ms, &chrono::Local)
}

pub fn format_expiry_in<Tz: TimeZone>(expiry_ms: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match chrono::DateTime::from_timestamp_millis(expiry_ms) {
        Some(utc) => utc.with_timezone(tz).format("%B %-d, %Y %H:%M").to_string(),
        None => format!("{expiry_ms} ms since epoch"),
    }
}

pub fn views_text(views: u32) -> String {
    if views == 1 {
        "1 view".to_string()
    } else {
        format!("{views} views")
    }
}

/// `Expires: <date> · N views allowed`
pub fn reveal_meta(expiry_ms: i64, views: u32) -> String {
    format!(
        "Expires: {} \u{00B7} {} allowed",
        format_expiry(expiry_ms),
        views_text(views)
    )
}

/// True for https, file, and loopback origins.
pub fn is_secure_origin(base_url: &str) -> bool {
    let lower = base_url.trim().to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("file:") {
        return true;
    }

    let Some((_, rest)) = lower.split_once("://") else {
        return false;
    };
    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = if host_port.starts_with('[') {
        host_port.split(']').next().map(|h| &h[1..]).unwrap_or_default()
    } else {
        host_port.split(':').next().unwrap_or_default()
    };

    matches!(host, "localhost" | "127.0.0.1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_expiry_utc() {
        assert_eq!(
            format_expiry_in(1_700_000_000_000, &chrono::Utc),
            "November 14, 2023 22:13"
        );
    }

    #[test]
    fn test_format_expiry_out_of_range() {
        assert_eq!(
            format_expiry_in(i64::MAX, &chrono::Utc),
            format!("{} ms since epoch", i64::MAX)
        );
    }

    #[test]
    fn test_views_text() {
        assert_eq!(views_text(1), "1 view");
        assert_eq!(views_text(0), "0 views");
        assert_eq!(views_text(3), "3 views");
    }

    #[test]
    fn test_reveal_meta_shape() {
        let meta = reveal_meta(1_700_000_000_000, 2);
        assert!(meta.starts_with("Expires: "));
        assert!(meta.ends_with(" \u{00B7} 2 views allowed"));
    }

    #[test]
    fn test_templates() {
        assert!(Template::Credentials.body().starts_with("Username: \nPassword: "));
        assert!(Template::Creditcard.body().contains("CVV: "));
    }

    #[test]
    fn test_secure_origins() {
        assert!(is_secure_origin("https://secret.example.org/"));
        assert!(is_secure_origin("HTTPS://Secret.Example.org/"));
        assert!(is_secure_origin("file:///home/me/wattx/index.html"));
        assert!(is_secure_origin("http://localhost:8080/"));
        assert!(is_secure_origin("http://127.0.0.1/app#old"));
    }

    #[test]
    fn test_userinfo_is_not_the_host() {
        assert!(is_secure_origin("http://user@localhost/"));
        assert!(is_secure_origin("http://user:pw@127.0.0.1:8080/s"));
        assert!(!is_secure_origin("http://localhost@evil.test/"));
    }

    #[test]
    fn test_insecure_origins() {
        assert!(!is_secure_origin("http://secret.example.org/"));
        assert!(!is_secure_origin("http://localhost.evil.test/"));
        assert!(!is_secure_origin("ftp://10.0.0.1/"));
        assert!(!is_secure_origin("not a url"));
    }
}
