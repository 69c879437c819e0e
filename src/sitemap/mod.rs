// src/sitemap/mod.rs
// =============================================================================
// Everything about reading the sitemap.
//
// Submodules:
// - parse: sitemap XML -> SitemapEntry list (quick-xml)
// - fetch: pre-check + download, following sitemap index files
// - index: the page list with its "recently modified" filter
// =============================================================================

mod fetch;
mod index;
mod parse;

pub use fetch::{fetch_sitemap, precheck};
pub use index::{PageRecord, SitemapIndex};
pub use parse::{parse_sitemap, SitemapDocument, SitemapEntry};
