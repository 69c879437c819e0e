// src/warmer/mod.rs
// =============================================================================
// This module contains the cache warm-up logic.
//
// Submodules:
// - variants: which Accept-Encoding / Accept values to request
// - assets: finds CSS and JS references in page HTML
// - transport: sends GET/PURGE requests (reqwest)
// - orchestrator: the loop tying it all together
//
// This file re-exports the public API so callers can write
// `warmer::Warmer` instead of `warmer::orchestrator::Warmer`.
// =============================================================================

mod assets;
mod orchestrator;
mod transport;
mod variants;

pub use assets::{AssetExtractor, AssetFlags, HtmlAssetExtractor};
pub use orchestrator::{Phase, WarmSummary, Warmer};
pub use transport::{header_map, HttpTransport, Method, RequestOutcome, Transport};
pub use variants::{accept_variants, encoding_variants};
