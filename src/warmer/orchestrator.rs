// src/warmer/orchestrator.rs
// =============================================================================
// The warm-up loop.
//
// How it works:
// 1. Pages: every in-scope sitemap URL, once per Accept-Encoding variant.
//    The body of the "deflate" response is parsed for <script src> and
//    <link rel="stylesheet"> references, which go into the asset set.
// 2. Images: every image of those pages, once per Accept variant.
// 3. Assets: every discovered asset, warmed like a page. The asset set is
//    snapshotted first, so assets found while warming assets are not warmed.
//
// Phases: Idle -> WarmingPages -> WarmingImages -> WarmingAssets -> Done
// (or Idle -> Done when no URL is in scope).
//
// One request at a time. After each GET we sleep `delay`; after each PURGE
// we sleep a fixed 100ms. A failed request is logged and skipped, it never
// stops the run.
// =============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::assets::{AssetExtractor, AssetFlags, AssetSet, HtmlAssetExtractor};
use super::transport::{merge_headers, Method, Transport};
use super::variants::{accept_variants, encoding_variants, Variant, ACCEPT_ENCODING_DEFLATE};
use crate::settings::{humanize_secs, PurgeLevel, ScopeMode, Settings};
use crate::sitemap::SitemapIndex;
use crate::urls;

/// Pause between a PURGE and the first warm-up request for the same URL
pub const PURGE_PAUSE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    WarmingPages,
    WarmingImages,
    WarmingAssets,
    Done,
}

// Counts printed at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WarmSummary {
    pub pages: usize,
    pub images: usize,
    pub assets: usize,
    /// GET and PURGE requests sent
    pub requests: usize,
    /// Requests that errored or came back non-2xx
    pub failed_requests: usize,
}

impl fmt::Display for WarmSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            plural(self.pages, "URL"),
            plural(self.images, "image"),
            plural(self.assets, "asset")
        )
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

pub struct Warmer {
    settings: Settings,
    transport: Arc<dyn Transport>,
    extractor: Arc<dyn AssetExtractor>,
    encodings: Vec<Variant>,
    accepts: Vec<Variant>,
    assets: AssetSet,
    phase: Phase,
    summary: WarmSummary,
}

impl Warmer {
    pub fn new(settings: Settings, transport: Arc<dyn Transport>) -> Self {
        Self {
            encodings: encoding_variants(&settings.flags),
            accepts: accept_variants(&settings.flags),
            settings,
            transport,
            extractor: Arc::new(HtmlAssetExtractor::new()),
            assets: AssetSet::new(),
            phase: Phase::Idle,
            summary: WarmSummary::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn AssetExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    // Assets discovered so far, in first-seen order, as written in the HTML
    pub fn assets(&self) -> &[String] {
        self.assets.as_slice()
    }

    // Warms every in-scope URL of `index`; `now` is used for the lastmod filter
    //
    // Always runs to completion and returns the summary, even if every
    // single request failed.
    pub async fn run(&mut self, index: &SitemapIndex, now: DateTime<Utc>) -> WarmSummary {
        self.assets = AssetSet::new();
        self.summary = WarmSummary::default();
        self.phase = Phase::Idle;

        let scope = self.settings.scope;
        let origin = self.settings.origin.as_ref();

        let pages: Vec<Url> = index
            .pages_in_scope(scope, now)
            .into_iter()
            .map(|page| urls::apply_origin(&page.url, origin))
            .collect();

        if pages.is_empty() {
            info!("📫 No URLs need to warm up. You might want to use --range or --all.");
            self.enter(Phase::Done);
            return self.summary.clone();
        }

        let images: Vec<Url> = if self.settings.flags.images {
            index
                .images_in_scope(scope, now)
                .into_iter()
                .map(|image| urls::apply_origin(image, origin))
                .collect()
        } else {
            Vec::new()
        };

        match scope {
            ScopeMode::All => info!("✅ Prepare warming all {} URL(s)", pages.len()),
            ScopeMode::NewerThan(secs) => info!(
                "✅ Prepare warming {} URL(s) newer than {}s ({})",
                pages.len(),
                secs,
                humanize_secs(secs)
            ),
        }

        self.enter(Phase::WarmingPages);
        for url in &pages {
            self.warm_site(url).await;
            self.summary.pages += 1;
        }

        self.enter(Phase::WarmingImages);
        if !images.is_empty() {
            info!("📷 Warming up {} image(s)", images.len());
        }
        for url in &images {
            self.warm_image(url).await;
            self.summary.images += 1;
        }

        self.enter(Phase::WarmingAssets);
        info!("📫 Warming up all site's assets, stay tuned!");
        // Fixed snapshot: whatever the asset pass itself discovers waits for the next run
        let snapshot = self.assets.as_slice().to_vec();
        for raw in &snapshot {
            // Relative references resolve against the sitemap's host
            let url = match urls::normalize_url(raw, &self.settings.domain) {
                // Third-party assets (CDNs) keep their own host
                Some(url) => urls::apply_origin_on_site(
                    &url,
                    &self.settings.domain,
                    self.settings.origin.as_ref(),
                ),
                None => {
                    // javascript:, data:, junk... skipped and not counted
                    debug!("Skipping asset {}", raw);
                    continue;
                }
            };
            self.warm_site(&url).await;
            self.summary.assets += 1;
        }

        self.enter(Phase::Done);
        info!(
            "📫 Done! Warmed up {} ({} request(s), {} failed). Have fun!",
            self.summary, self.summary.requests, self.summary.failed_requests
        );
        self.summary.clone()
    }

    fn enter(&mut self, phase: Phase) {
        debug!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn asset_flags(&self) -> AssetFlags {
        AssetFlags {
            js: self.settings.flags.js,
            css: self.settings.flags.css,
        }
    }

    // Purges (when enabled) and warms a page or asset
    async fn warm_site(&mut self, url: &Url) {
        debug!("🚀 Warming {}", url);
        if self.settings.purge >= PurgeLevel::Pages {
            self.purge(url).await;
        }

        let flags = self.asset_flags();
        for (name, value) in self.encodings.clone() {
            // Only one copy of the HTML is needed for asset discovery
            let read_body = value == ACCEPT_ENCODING_DEFLATE && flags.any();
            let variant = [("accept-encoding".to_string(), value.to_string())];
            let headers = merge_headers(&[self.settings.custom_headers.as_slice(), &variant[..]]);

            if let Some(body) = self.fetch(url, name, &headers, read_body).await {
                let found = self.extractor.extract(&body, flags);
                if !found.is_empty() {
                    debug!("  🔎 {} asset(s) referenced by {}", found.len(), url);
                }
                self.assets.extend(found);
            }
            sleep(self.settings.delay).await;
        }
    }

    // Purges (when enabled) and warms an image
    async fn warm_image(&mut self, url: &Url) {
        debug!("🚀📷 Warming {}", url);
        if self.settings.purge >= PurgeLevel::PagesAndImages {
            self.purge(url).await;
        }

        for (name, value) in self.accepts.clone() {
            let variant = [("accept".to_string(), value.to_string())];
            let headers = merge_headers(&[self.settings.custom_headers.as_slice(), &variant[..]]);
            self.fetch(url, name, &headers, false).await;
            sleep(self.settings.delay).await;
        }
    }

    async fn purge(&mut self, url: &Url) {
        debug!("  ⚡️ Purging {}", url);
        self.summary.requests += 1;

        let result = self
            .transport
            .request(Method::Purge, url, &self.settings.custom_headers, false)
            .await;

        match result {
            Ok(outcome) if outcome.is_success() => {}
            Ok(outcome) => {
                warn!("  ⚠️ Purge of {} returned HTTP {}", url, outcome.status);
                self.summary.failed_requests += 1;
            }
            Err(e) => {
                warn!("  ⚠️ Purge of {} failed: {}", url, e);
                self.summary.failed_requests += 1;
            }
        }

        sleep(PURGE_PAUSE).await;
    }

    // Sends one warm-up GET; returns the body when it was asked for
    async fn fetch(
        &mut self,
        url: &Url,
        variant: &str,
        headers: &[(String, String)],
        read_body: bool,
    ) -> Option<String> {
        debug!("  ⚡️ Warming {} [{}]", url, variant);
        self.summary.requests += 1;

        let result = self
            .transport
            .request(Method::Get, url, headers, read_body)
            .await;

        match result {
            Ok(outcome) => {
                if !outcome.is_success() {
                    warn!("  ⚠️ {} [{}] returned HTTP {}", url, variant, outcome.status);
                    self.summary.failed_requests += 1;
                }
                outcome.body
            }
            Err(e) => {
                warn!("  ⚠️ {} [{}] failed: {}", url, variant, e);
                self.summary.failed_requests += 1;
                None
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn Transport>?
//    - dyn Transport is a trait object: "anything that implements Transport"
//    - Arc lets the Warmer and the caller share it (tests keep a handle to
//      the fake to inspect what was sent)
//    - Swapping reqwest for a recorder needs no change in this file
//
// 2. Why .clone() on self.encodings before looping?
//    - The loop body calls &mut self methods (fetch, assets.extend)
//    - Iterating self.encodings directly would hold a borrow of self
//    - The variant lists are a handful of static strings, so the copy is tiny
//
// 3. What does tokio::time::sleep do in tests?
//    - With #[tokio::test(start_paused = true)] the clock is virtual
//    - sleep() advances it instantly, so a 500ms delay costs no real time
//    - Instant::now() still reports the virtual time, which lets tests
//      check the spacing between requests
//
// 4. Why does run() return a summary instead of a Result?
//    - Every per-request failure is logged and counted, never returned
//    - The only way to "fail" a warm-up is to not start it (see main.rs)
// -----------------------------------------------------------------------------
