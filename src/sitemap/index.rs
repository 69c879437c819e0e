// src/sitemap/index.rs
// =============================================================================
// The in-memory list of pages (and their images) read from the sitemap.
//
// Pages keep sitemap order and are unique by URL: when a URL shows up twice
// (common with sitemap indexes), the first position wins and the images of
// the later entry are appended.
//
// Scope filter: a page is in scope when we warm everything, or when its
// lastmod is at most `newer_than` seconds old. Pages without a lastmod can
// only be warmed with --all.
// =============================================================================

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::warn;
use url::Url;

use super::parse::SitemapEntry;
use crate::settings::ScopeMode;

#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub url: Url,
    pub last_modified: Option<DateTime<Utc>>,
    pub images: Vec<Url>,
}

impl PageRecord {
    pub fn new(url: Url, last_modified: Option<DateTime<Utc>>) -> Self {
        Self {
            url,
            last_modified,
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<Url>) -> Self {
        self.images = images;
        self
    }

    // Whether this page should be warmed at time `now`
    pub fn in_scope(&self, scope: ScopeMode, now: DateTime<Utc>) -> bool {
        match scope {
            ScopeMode::All => true,
            ScopeMode::NewerThan(secs) => match self.last_modified {
                // Future timestamps (clock skew) count as fresh
                // Ranges past i64::MAX seconds just mean "everything dated"
                Some(modified) => {
                    (now - modified).num_seconds() <= i64::try_from(secs).unwrap_or(i64::MAX)
                }
                None => false,
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct SitemapIndex {
    pages: Vec<PageRecord>,
    // url -> position in `pages`
    positions: HashMap<Url, usize>,
}

impl SitemapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // Builds an index from raw parser output, dropping unparseable URLs
    pub fn from_entries(entries: Vec<SitemapEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            let url = match Url::parse(&entry.loc) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Skipping invalid sitemap URL {}: {}", entry.loc, e);
                    continue;
                }
            };

            let images = entry
                .images
                .iter()
                .filter_map(|raw| match url.join(raw) {
                    Ok(image) => Some(image),
                    Err(e) => {
                        warn!("Skipping invalid image URL {}: {}", raw, e);
                        None
                    }
                })
                .collect();

            index.add_page(PageRecord::new(url, entry.last_modified).with_images(images));
        }
        index
    }

    pub fn add_page(&mut self, page: PageRecord) {
        match self.positions.get(&page.url) {
            Some(&pos) => self.pages[pos].images.extend(page.images),
            None => {
                self.positions.insert(page.url.clone(), self.pages.len());
                self.pages.push(page);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    // In-scope pages, in sitemap order
    pub fn pages_in_scope(&self, scope: ScopeMode, now: DateTime<Utc>) -> Vec<&PageRecord> {
        self.pages
            .iter()
            .filter(|page| page.in_scope(scope, now))
            .collect()
    }

    // Images of in-scope pages, flattened in sitemap order
    pub fn images_in_scope(&self, scope: ScopeMode, now: DateTime<Utc>) -> Vec<&Url> {
        self.pages
            .iter()
            .filter(|page| page.in_scope(scope, now))
            .flat_map(|page| page.images.iter())
            .collect()
    }
}
