// src/sitemap/fetch.rs
// =============================================================================
// Downloads the sitemap.
//
// - precheck(): one GET with the user's headers. Anything but 2xx stops the
//   run before a single warm-up request is sent.
// - fetch_sitemap(): downloads and parses the sitemap. Sitemap index files
//   are followed (children in order, one at a time) up to MAX_INDEX_DEPTH.
//   A child that fails is logged and skipped, the rest still count.
// =============================================================================

use std::future::Future;
use std::pin::Pin;

use futures::stream::{self, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::parse::{parse_sitemap, SitemapDocument, SitemapEntry};
use crate::error::{Result, WarmError};
use crate::warmer::header_map;

/// Nesting limit for sitemap index files
pub const MAX_INDEX_DEPTH: u8 = 2;

/// Children read from a single sitemap index
pub const MAX_CHILD_SITEMAPS: usize = 50;

pub async fn precheck(client: &Client, url: &Url, headers: &[(String, String)]) -> Result<()> {
    let response = client
        .get(url.clone())
        .headers(header_map(headers))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(WarmError::SitemapStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}

pub async fn fetch_sitemap(
    client: &Client,
    url: &Url,
    headers: &[(String, String)],
) -> Result<Vec<SitemapEntry>> {
    fetch_recursive(client.clone(), url.clone(), header_map(headers), 0).await
}

// Boxed so the future can call itself for child sitemaps
fn fetch_recursive(
    client: Client,
    url: Url,
    headers: HeaderMap,
    depth: u8,
) -> Pin<Box<dyn Future<Output = Result<Vec<SitemapEntry>>> + Send>> {
    Box::pin(async move {
        if depth > MAX_INDEX_DEPTH {
            return Err(WarmError::SitemapDepth(MAX_INDEX_DEPTH));
        }

        debug!("Fetching sitemap {} (depth {})", url, depth);

        let response = client
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WarmError::SitemapStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let xml = response.text().await?;

        match parse_sitemap(&xml)? {
            SitemapDocument::Pages(entries) => {
                debug!("{} URL(s) in {}", entries.len(), url);
                Ok(entries)
            }
            SitemapDocument::Index(children) => {
                let children: Vec<Url> = children
                    .iter()
                    .filter_map(|loc| url.join(loc).ok())
                    .take(MAX_CHILD_SITEMAPS)
                    .collect();

                debug!("{} child sitemap(s) in {}", children.len(), url);

                let results: Vec<(Url, Result<Vec<SitemapEntry>>)> = stream::iter(children)
                    .then(|child| {
                        let fut =
                            fetch_recursive(client.clone(), child.clone(), headers.clone(), depth + 1);
                        async move { (child, fut.await) }
                    })
                    .collect()
                    .await;

                let mut entries = Vec::new();
                for (child, result) in results {
                    match result {
                        Ok(child_entries) => entries.extend(child_entries),
                        Err(e) => warn!("Skipping child sitemap {}: {}", child, e),
                    }
                }
                Ok(entries)
            }
        }
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Box::pin for the recursive fetch?
//    - An async fn's future contains the futures it awaits
//    - A recursive one would contain itself, so its size is infinite
//    - Boxing puts the inner future on the heap and breaks the cycle
//
// 2. What does stream::iter(...).then(...) do?
//    - Turns the child list into a stream and runs one fetch per item
//    - then() waits for each future before starting the next one
//    - So child sitemaps are read in the order the index lists them
// -----------------------------------------------------------------------------
