// src/lib.rs
// =============================================================================
// sitemap-warmer as a library.
//
// The binary (src/main.rs) is a thin wrapper: parse the CLI, read the
// sitemap, hand it to `warmer::Warmer`. Everything lives here so it can be
// unit tested and reused.
//
// Modules:
// - cli: command-line definition (clap)
// - settings: CLI -> resolved run settings
// - urls: sitemap URL resolution, asset URL normalization, --origin
// - sitemap: fetch + parse sitemap.xml, scope filter
// - warmer: variants, asset discovery, transport, the warm-up loop
// - error / logging: ambient plumbing
// =============================================================================

pub mod cli;
pub mod error;
pub mod logging;
pub mod settings;
pub mod sitemap;
pub mod urls;
pub mod warmer;

pub use error::{Result, WarmError};
pub use settings::Settings;
