// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is a single command: point it at a sitemap (or just a domain) and it
// warms the cache. Every knob below maps onto a field of `Settings`.
//
// Numeric options (range, delay, purge) are kept as Strings on purpose:
// a typo like `--delay fast` should fall back to the default instead of
// aborting, so the real parsing happens in settings.rs.
//
// Rust concepts:
// - Derive macros: clap generates the parser from this struct
// - ArgAction::Set: lets a bool flag take an explicit value (--gzip false)
// - Vec<String> args: repeatable options (-H a:1 -H b:2)
// =============================================================================

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-warmer",
    version = "0.1.0",
    about = "Warm up CDN and reverse-proxy caches from a sitemap",
    long_about = "sitemap-warmer reads a sitemap, then requests every recently modified page, \
                  its images and its CSS/JS assets once per compression and image format variant \
                  so your cache is primed before real visitors arrive."
)]
pub struct Cli {
    /// Sitemap URL or domain (e.g., example.com or https://example.com/sitemap.xml)
    ///
    /// A bare domain is resolved to <domain>/sitemap.xml
    pub sitemap: String,

    /// Only warm up URLs with lastmod newer than this many seconds
    #[arg(short, long, default_value = "300", env = "WARMER_RANGE")]
    pub range: String,

    /// Delay in milliseconds after each warm-up request
    ///
    /// On low-end hosting keep this value higher
    #[arg(short, long, default_value = "500", env = "WARMER_DELAY")]
    pub delay: String,

    /// Ignore --range and warm up every URL in the sitemap
    #[arg(short, long)]
    pub all: bool,

    /// Warm up images listed in the sitemap
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub images: bool,

    /// Warm up stylesheets found in page HTML
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub css: bool,

    /// Warm up scripts found in page HTML
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub js: bool,

    /// Warm up the Brotli-compressed variant
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub brotli: bool,

    /// Warm up the Gzip-compressed variant
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub gzip: bool,

    /// Warm up the Deflate-compressed variant
    ///
    /// CSS/JS discovery reads the body of this variant, so disabling it
    /// also disables asset discovery
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub deflate: bool,

    /// Warm up the WebP variant of images
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub webp: bool,

    /// Warm up the AVIF variant of images
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub avif: bool,

    /// Purge before warming: 0 = never, 1 = pages and assets, 2 = also images
    #[arg(short, long, default_value = "0", env = "WARMER_PURGE")]
    pub purge: String,

    /// Extra header sent with every request (repeatable)
    ///
    /// Example: -H 'authorization: Bearer secret_token'
    #[arg(short = 'H', long = "header", alias = "headers", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// Replace the scheme and host of every sitemap URL with this origin
    ///
    /// Example: --origin https://origin.example.com
    #[arg(long, default_value = "", env = "WARMER_ORIGIN")]
    pub origin: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Only log phase changes and the summary, not every request
    #[arg(short, long, alias = "quite")]
    pub quiet: bool,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
