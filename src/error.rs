// src/error.rs
// =============================================================================
// Error types for the warmer.
//
// Only a handful of these are fatal (bad sitemap URL, sitemap unavailable).
// Everything that happens while warming a single URL is logged by the
// orchestrator and swallowed, so these errors never stop a run midway.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: automatic conversion so the ? operator works on reqwest errors
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarmError {
    /// The sitemap URL (or an asset URL) could not be parsed
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A --header value that isn't NAME:VALUE or NAME=VALUE
    #[error("invalid header '{0}', expected NAME:VALUE")]
    InvalidHeader(String),

    /// The sitemap answered with a non-2xx status
    #[error("sitemap {url} returned HTTP {status}")]
    SitemapStatus { url: String, status: u16 },

    #[error("could not parse sitemap: {0}")]
    SitemapParse(String),

    #[error("sitemap index nesting deeper than {0} levels")]
    SitemapDepth(u8),

    /// Network-level failure (DNS, connect, timeout, body decode...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, WarmError>;
