// src/warmer/transport.rs
// =============================================================================
// Sends the actual GET and PURGE requests.
//
// Every request carries three header layers, later layers winning:
//   1. cache busting: cache-control/pragma no-cache and our user agent
//   2. the user's --header values
//   3. the variant header for this request (accept-encoding or accept)
// The orchestrator merges 2 and 3; the transport puts 1 underneath.
//
// The response body is only downloaded when the caller asks for it. Warm-up
// responses are thrown away, so there's no reason to pull e.g. a 2 MB page
// three times when only one copy gets parsed.
//
// Image GETs and PURGEs carry no variant header of their own. reqwest (with
// its `deflate` feature) then adds `accept-encoding: deflate` by itself, so
// those requests still ask for deflate on the wire.
//
// Rust concepts:
// - async-trait: async methods in a trait, so tests can swap in a fake
// - merge_headers: a later layer replaces an earlier value of the same name,
//   which is what gives us layering; the HeaderMap only sees unique names
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use tracing::warn;
use url::Url;

use crate::error::Result;

pub const USER_AGENT: &str = concat!(
    "sitemap-warmer/",
    env!("CARGO_PKG_VERSION"),
    " - Cache Warmer"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Purge,
}

impl Method {
    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            // "PURGE" is a valid method token, this can't fail
            Method::Purge => {
                reqwest::Method::from_bytes(b"PURGE").expect("PURGE is a valid HTTP method")
            }
        }
    }
}

// What came back from one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub status: u16,
    /// Only Some when the body was requested
    pub body: Option<String>,
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        url: &Url,
        headers: &[(String, String)],
        read_body: bool,
    ) -> Result<RequestOutcome>;
}

// The headers sent with every warm-up or purge request
pub fn base_headers() -> Vec<(String, String)> {
    vec![
        ("cache-control".to_string(), "no-cache".to_string()),
        ("pragma".to_string(), "no-cache".to_string()),
        ("user-agent".to_string(), USER_AGENT.to_string()),
    ]
}

// Merges header layers; a later layer replaces an earlier value of the same
// (case-insensitive) name. Names come out lowercased, in first-seen order.
pub fn merge_headers(layers: &[&[(String, String)]]) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = Vec::new();
    for layer in layers {
        for (name, value) in layer.iter() {
            let name = name.to_ascii_lowercase();
            match merged.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = value.clone(),
                None => merged.push((name, value.clone())),
            }
        }
    }
    merged
}

// Converts header pairs into a reqwest HeaderMap
//
// Pairs that aren't valid HTTP headers are logged and dropped.
pub fn header_map(headers: &[(String, String)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let parsed = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        );
        match parsed {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => warn!("Ignoring invalid header {}: {}", name, value),
        }
    }
    map
}

// The reqwest-backed transport used by the binary
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }

    // Shared with the sitemap fetcher so both use one connection pool
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        url: &Url,
        headers: &[(String, String)],
        read_body: bool,
    ) -> Result<RequestOutcome> {
        let headers = merge_headers(&[base_headers().as_slice(), headers]);

        let response = self
            .client
            .request(method.to_reqwest(), url.clone())
            .headers(header_map(&headers))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = if read_body {
            Some(response.text().await?)
        } else {
            None
        };

        Ok(RequestOutcome { status, body })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is #[async_trait]?
//    - Traits couldn't always have async fn usable as trait objects
//    - The macro rewrites them to return Pin<Box<dyn Future + Send>>
//    - That is what lets the orchestrator hold an Arc<dyn Transport>
//
// 2. Why is a non-2xx status Ok(...) and not Err(...)?
//    - The request did reach the server, it just didn't like it
//    - Callers decide what counts as a failure (RequestOutcome::is_success)
//    - Err is kept for transport problems: DNS, refused connection, timeout
// -----------------------------------------------------------------------------
