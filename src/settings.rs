// src/settings.rs
// =============================================================================
// Run settings, resolved once from the CLI and never changed afterwards.
//
// The CLI hands us raw strings for the numeric options. Anything that doesn't
// parse as a non-negative integer falls back to its default:
//   range -> 300 seconds, delay -> 500 ms, purge -> 0
// =============================================================================

use std::time::Duration;

use url::Url;

use crate::cli::Cli;
use crate::error::{Result, WarmError};
use crate::urls;

pub const DEFAULT_RANGE_SECS: u64 = 300;
pub const DEFAULT_DELAY_MS: u64 = 500;

// Which sitemap URLs are in scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMode {
    /// Every URL in the sitemap
    All,
    /// Only URLs whose lastmod is at most this many seconds old
    NewerThan(u64),
}

// What gets a PURGE request before being warmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PurgeLevel {
    None = 0,
    Pages = 1,
    PagesAndImages = 2,
}

impl PurgeLevel {
    fn from_number(n: u64) -> Self {
        match n {
            0 => PurgeLevel::None,
            1 => PurgeLevel::Pages,
            _ => PurgeLevel::PagesAndImages,
        }
    }
}

// Which variants to warm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantFlags {
    pub images: bool,
    pub css: bool,
    pub js: bool,
    pub brotli: bool,
    pub gzip: bool,
    pub deflate: bool,
    pub webp: bool,
    pub avif: bool,
}

impl Default for VariantFlags {
    fn default() -> Self {
        Self {
            images: true,
            css: true,
            js: true,
            brotli: true,
            gzip: true,
            deflate: true,
            webp: true,
            avif: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub sitemap_url: Url,
    /// scheme://host[:port] of the sitemap, used to resolve relative assets
    pub domain: Url,
    pub scope: ScopeMode,
    pub delay: Duration,
    pub purge: PurgeLevel,
    pub flags: VariantFlags,
    /// Extra headers in the order they were given, names lowercased
    pub custom_headers: Vec<(String, String)>,
    pub origin: Option<Url>,
    pub timeout: Duration,
}

impl Settings {
    // Builds settings for a sitemap with every default applied
    //
    // Mostly useful in tests; the binary goes through from_cli().
    pub fn for_sitemap(sitemap_url: Url) -> Self {
        Self {
            domain: urls::domain_of(&sitemap_url),
            sitemap_url,
            scope: ScopeMode::NewerThan(DEFAULT_RANGE_SECS),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            purge: PurgeLevel::None,
            flags: VariantFlags::default(),
            custom_headers: Vec::new(),
            origin: None,
            timeout: Duration::from_secs(30),
        }
    }

    // Resolves the CLI arguments into settings
    //
    // Errors only for things we can't guess around: an invalid sitemap URL,
    // an invalid --origin, or a malformed --header.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let sitemap_url = urls::resolve_sitemap_url(&cli.sitemap)?;

        let scope = if cli.all {
            ScopeMode::All
        } else {
            ScopeMode::NewerThan(parse_or_default(&cli.range, DEFAULT_RANGE_SECS))
        };

        let origin = match cli.origin.trim() {
            "" => None,
            raw => Some(Url::parse(raw).map_err(|e| WarmError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })?),
        };

        let custom_headers = cli
            .headers
            .iter()
            .map(|raw| parse_header(raw))
            .collect::<Result<Vec<_>>>()?;

        let mut settings = Self::for_sitemap(sitemap_url);
        settings.scope = scope;
        settings.delay = Duration::from_millis(parse_or_default(&cli.delay, DEFAULT_DELAY_MS));
        settings.purge = PurgeLevel::from_number(parse_or_default(&cli.purge, 0));
        settings.flags = VariantFlags {
            images: cli.images,
            css: cli.css,
            js: cli.js,
            brotli: cli.brotli,
            gzip: cli.gzip,
            deflate: cli.deflate,
            webp: cli.webp,
            avif: cli.avif,
        };
        settings.custom_headers = custom_headers;
        settings.origin = origin;
        settings.timeout = Duration::from_secs(cli.timeout.max(1));
        Ok(settings)
    }
}

// Parses a non-negative integer, falling back to `default` on anything else
//
// Zero also falls back: a zero range or delay is never what the user meant.
pub fn parse_or_default(raw: &str, default: u64) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => default,
        Ok(n) => n,
    }
}

// Splits "name: value" or "name=value" into a lowercased name and a value
fn parse_header(raw: &str) -> Result<(String, String)> {
    let split_at = raw
        .find(|c| c == ':' || c == '=')
        .ok_or_else(|| WarmError::InvalidHeader(raw.to_string()))?;

    let name = raw[..split_at].trim();
    let value = raw[split_at + 1..].trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(WarmError::InvalidHeader(raw.to_string()));
    }

    Ok((name.to_ascii_lowercase(), value.to_string()))
}

// Formats a number of seconds the way a human would say it
//
// Examples: 45 -> "45 seconds", 300 -> "5 minutes", 7200 -> "2 hours"
pub fn humanize_secs(secs: u64) -> String {
    let (value, unit) = match secs {
        s if s >= 86_400 => (s / 86_400, "day"),
        s if s >= 3_600 => (s / 3_600, "hour"),
        s if s >= 60 => (s / 60, "minute"),
        s => (s, "second"),
    };

    if value == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["sitemap-warmer", "https://example.com/sitemap.xml"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_cli(&cli(&[])).unwrap();
        assert_eq!(settings.scope, ScopeMode::NewerThan(300));
        assert_eq!(settings.delay, Duration::from_millis(500));
        assert_eq!(settings.purge, PurgeLevel::None);
        assert_eq!(settings.flags, VariantFlags::default());
        assert_eq!(settings.domain.as_str(), "https://example.com/");
        assert!(settings.origin.is_none());
    }

    #[test]
    fn test_non_numeric_falls_back() {
        let settings =
            Settings::from_cli(&cli(&["--delay", "fast", "--range", "soon", "-p", "x"])).unwrap();
        assert_eq!(settings.delay, Duration::from_millis(500));
        assert_eq!(settings.scope, ScopeMode::NewerThan(300));
        assert_eq!(settings.purge, PurgeLevel::None);
    }

    #[test]
    fn test_negative_falls_back() {
        assert_eq!(parse_or_default("-20", 500), 500);
        assert_eq!(parse_or_default(" 42 ", 500), 42);
        assert_eq!(parse_or_default("0", 300), 300);
    }

    #[test]
    fn test_all_overrides_range() {
        let settings = Settings::from_cli(&cli(&["--all", "--range", "60"])).unwrap();
        assert_eq!(settings.scope, ScopeMode::All);
    }

    #[test]
    fn test_purge_levels() {
        assert_eq!(
            Settings::from_cli(&cli(&["-p", "1"])).unwrap().purge,
            PurgeLevel::Pages
        );
        assert_eq!(
            Settings::from_cli(&cli(&["-p", "2"])).unwrap().purge,
            PurgeLevel::PagesAndImages
        );
        // Clamped
        assert_eq!(
            Settings::from_cli(&cli(&["-p", "9"])).unwrap().purge,
            PurgeLevel::PagesAndImages
        );
    }

    #[test]
    fn test_headers_and_origin() {
        let settings = Settings::from_cli(&cli(&[
            "-H",
            "Authorization: Bearer secret",
            "-H",
            "X-Env=staging",
            "--origin",
            "http://10.0.0.5:8080",
        ]))
        .unwrap();

        assert_eq!(
            settings.custom_headers,
            vec![
                ("authorization".to_string(), "Bearer secret".to_string()),
                ("x-env".to_string(), "staging".to_string()),
            ]
        );
        assert_eq!(settings.origin.unwrap().as_str(), "http://10.0.0.5:8080/");
    }

    #[test]
    fn test_bad_header_is_an_error() {
        assert!(Settings::from_cli(&cli(&["-H", "no-separator"])).is_err());
        assert!(Settings::from_cli(&cli(&["-H", ": value"])).is_err());
    }

    #[test]
    fn test_errors_name_the_bad_input() {
        let err = Settings::from_cli(&cli(&["-H", "no-separator"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid header 'no-separator', expected NAME:VALUE"
        );

        let err = Settings::from_cli(&cli(&["--origin", "not a url"])).unwrap_err();
        assert!(err.to_string().starts_with("invalid URL 'not a url'"), "{}", err);
    }

    #[test]
    fn test_humanize_secs() {
        assert_eq!(humanize_secs(45), "45 seconds");
        assert_eq!(humanize_secs(60), "1 minute");
        assert_eq!(humanize_secs(300), "5 minutes");
        assert_eq!(humanize_secs(7200), "2 hours");
        assert_eq!(humanize_secs(86_400), "1 day");
    }
}
