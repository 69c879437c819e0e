// src/warmer/assets.rs
// =============================================================================
// Finds the CSS and JS files a page pulls in.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (built on html5ever, Mozilla's HTML parser)
// - Never fails: broken markup is repaired the way a browser would
// - Supports CSS selectors for finding elements
//
// Extraction sits behind the `AssetExtractor` trait so the orchestrator
// doesn't care which HTML parser is used.
//
// Rust concepts:
// - Traits: a shared interface the orchestrator can call without knowing
//   the concrete type
// - HashSet + Vec: uniqueness with a stable (first-seen) order
// =============================================================================

use std::collections::HashSet;

use scraper::{Html, Selector};

// Which asset kinds to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetFlags {
    pub js: bool,
    pub css: bool,
}

impl AssetFlags {
    pub fn any(&self) -> bool {
        self.js || self.css
    }
}

pub trait AssetExtractor: Send + Sync {
    // Returns asset references as written in the HTML (possibly relative),
    // unique and in document order
    fn extract(&self, html: &str, flags: AssetFlags) -> Vec<String>;
}

pub struct HtmlAssetExtractor {
    scripts: Selector,
    links: Selector,
}

impl HtmlAssetExtractor {
    pub fn new() -> Self {
        // Both selectors are constants and known to be valid, so a parse
        // failure here is a programmer error
        Self {
            scripts: Selector::parse("script[src]").expect("valid script selector"),
            links: Selector::parse("link[rel][href]").expect("valid link selector"),
        }
    }
}

impl Default for HtmlAssetExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetExtractor for HtmlAssetExtractor {
    fn extract(&self, html: &str, flags: AssetFlags) -> Vec<String> {
        let mut found = Vec::new();
        if !flags.any() {
            return found;
        }

        let document = Html::parse_document(html);
        let mut seen = HashSet::new();
        let mut push = |value: &str| {
            let value = value.trim();
            if !value.is_empty() && seen.insert(value.to_string()) {
                found.push(value.to_string());
            }
        };

        if flags.js {
            for element in document.select(&self.scripts) {
                if let Some(src) = element.value().attr("src") {
                    push(src);
                }
            }
        }

        if flags.css {
            for element in document.select(&self.links) {
                let link = element.value();
                if let (Some(rel), Some(href)) = (link.attr("rel"), link.attr("href")) {
                    if is_stylesheet(rel) {
                        push(href);
                    }
                }
            }
        }

        found
    }
}

// rel is a space-separated token list: rel="preload stylesheet" counts
fn is_stylesheet(rel: &str) -> bool {
    rel.split_ascii_whitespace()
        .any(|token| token.eq_ignore_ascii_case("stylesheet"))
}

// Insertion-ordered set of discovered asset URLs
//
// The same stylesheet linked from 100 pages is stored (and warmed) once.
#[derive(Debug, Default, Clone)]
pub struct AssetSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl AssetSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns true when the asset wasn't known yet
    pub fn insert(&mut self, asset: String) -> bool {
        if self.seen.contains(&asset) {
            return false;
        }
        self.seen.insert(asset.clone());
        self.order.push(asset);
        true
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, assets: I) {
        for asset in assets {
            self.insert(asset);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why both a Vec and a HashSet in AssetSet?
//    - HashSet answers "seen it already?" quickly but has no order
//    - Vec keeps the order assets were discovered in
//    - Together: unique and ordered, like an insertion-ordered set
//
// 2. Why is AssetExtractor a trait with Send + Sync?
//    - The Warmer stores it as Arc<dyn AssetExtractor> inside async code
//    - Send + Sync means it can be shared across threads safely
//
// 3. Why .expect() on Selector::parse?
//    - The selectors are string constants; if they parse once, they always do
//    - A typo would panic in the first test run, not in production
// -----------------------------------------------------------------------------
