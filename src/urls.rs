// src/urls.rs
// =============================================================================
// URL helpers shared by the settings resolver and the warmer.
//
// - resolve_sitemap_url: turns "example.com" into "https://example.com/sitemap.xml"
// - normalize_url: resolves asset references found in HTML against the site
// - apply_origin: swaps the public host for an origin server (--origin)
// - domain_of: "https://example.com:8080/a/b" -> "https://example.com:8080"
// =============================================================================

use url::Url;

use crate::error::{Result, WarmError};

// Resolves what the user typed into the sitemap URL we should fetch
//
// Examples:
//   "example.com"                       -> https://example.com/sitemap.xml
//   "http://example.com/"               -> http://example.com/sitemap.xml
//   "https://example.com/post-sitemap.xml" -> unchanged
pub fn resolve_sitemap_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&with_scheme).map_err(|e| WarmError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !is_http(&url) || url.host_str().is_none() {
        return Err(WarmError::InvalidUrl {
            url: raw.to_string(),
            reason: "expected an http(s) URL with a host".to_string(),
        });
    }

    if url.path() == "/" {
        return url.join("/sitemap.xml").map_err(|e| WarmError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        });
    }

    Ok(url)
}

// Resolves a possibly-relative reference against `base`
//
// Returns None for anything we can't (or shouldn't) request:
// javascript:, data:, mailto:, bare fragments, unparseable junk.
pub fn normalize_url(raw: &str, base: &Url) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let url = base.join(raw).ok()?;
    if is_http(&url) && url.host_str().is_some() {
        Some(url)
    } else {
        None
    }
}

// Replaces scheme, host and port of `url` with those of `origin`
//
// Path, query and fragment are kept. With no origin the URL comes back as is.
pub fn apply_origin(url: &Url, origin: Option<&Url>) -> Url {
    let origin = match origin {
        Some(origin) => origin,
        None => return url.clone(),
    };

    let mut rewritten = origin.clone();
    rewritten.set_path(url.path());
    rewritten.set_query(url.query());
    rewritten.set_fragment(url.fragment());
    rewritten
}

// Like apply_origin, but only for URLs served by `domain`
//
// Assets can live anywhere (a CDN, a font host...). Only the ones on our own
// host are fetched from the origin; third-party URLs are left alone.
pub fn apply_origin_on_site(url: &Url, domain: &Url, origin: Option<&Url>) -> Url {
    if is_same_host(url, domain) {
        apply_origin(url, origin)
    } else {
        url.clone()
    }
}

// Same host and explicit port; the scheme is ignored, so an http:// asset on
// an https:// site still counts as on-site
pub fn is_same_host(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}

// The "scheme://host[:port]" part of a URL, as a Url with path "/"
pub fn domain_of(url: &Url) -> Url {
    let mut domain = url.clone();
    domain.set_path("/");
    domain.set_query(None);
    domain.set_fragment(None);
    domain
}

fn is_http(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_domain_gets_sitemap_path() {
        let url = resolve_sitemap_url("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/sitemap.xml");
    }

    #[test]
    fn test_explicit_sitemap_kept() {
        let url = resolve_sitemap_url("http://example.com/post-sitemap.xml").unwrap();
        assert_eq!(url.as_str(), "http://example.com/post-sitemap.xml");
    }

    #[test]
    fn test_invalid_sitemap_url() {
        assert!(resolve_sitemap_url("http://").is_err());
        assert!(resolve_sitemap_url("ftp://example.com/sitemap.xml").is_err());
        assert!(resolve_sitemap_url("not a url at all").is_err());
    }

    #[test]
    fn test_normalize_relative_asset() {
        let base = Url::parse("https://example.com/").unwrap();
        let url = normalize_url("/app.js", &base).unwrap();
        assert_eq!(url.as_str(), "https://example.com/app.js");

        let url = normalize_url("//cdn.example.net/lib.js", &base).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.net/lib.js");
    }

    #[test]
    fn test_normalize_rejects_non_http() {
        let base = Url::parse("https://example.com/").unwrap();
        assert_eq!(normalize_url("javascript:void(0)", &base), None);
        assert_eq!(normalize_url("data:text/css,body{}", &base), None);
        assert_eq!(normalize_url("#top", &base), None);
        assert_eq!(normalize_url("   ", &base), None);
        assert_eq!(normalize_url("http://[::1", &base), None);
    }

    #[test]
    fn test_apply_origin() {
        let url = Url::parse("https://example.com/blog/post?page=2").unwrap();
        let origin = Url::parse("http://10.0.0.5:8080").unwrap();

        let rewritten = apply_origin(&url, Some(&origin));
        assert_eq!(rewritten.as_str(), "http://10.0.0.5:8080/blog/post?page=2");

        assert_eq!(apply_origin(&url, None), url);
    }

    #[test]
    fn test_apply_origin_on_site_leaves_third_parties() {
        let domain = Url::parse("https://example.com/").unwrap();
        let origin = Url::parse("http://10.0.0.5:8080").unwrap();

        let own = Url::parse("http://example.com/app.js").unwrap();
        assert_eq!(
            apply_origin_on_site(&own, &domain, Some(&origin)).as_str(),
            "http://10.0.0.5:8080/app.js"
        );

        let cdn = Url::parse("https://cdn.jsdelivr.net/npm/lib.js").unwrap();
        assert_eq!(apply_origin_on_site(&cdn, &domain, Some(&origin)), cdn);

        // Another port is another site
        let other_port = Url::parse("https://example.com:8443/x.css").unwrap();
        assert_eq!(apply_origin_on_site(&other_port, &domain, Some(&origin)), other_port);
    }

    #[test]
    fn test_domain_of() {
        let url = Url::parse("https://example.com:8443/a/sitemap.xml?x=1").unwrap();
        assert_eq!(domain_of(&url).as_str(), "https://example.com:8443/");
    }
}
