// src/warmer/variants.rs
// =============================================================================
// Builds the list of request variants to send for each URL.
//
// A CDN usually keys its cache on Accept-Encoding (pages, CSS, JS) and on
// Accept (images, for WebP/AVIF negotiation). To warm every cache entry we
// send one request per variant, in the order returned here.
// =============================================================================

use crate::settings::VariantFlags;

pub const ACCEPT_ENCODING_BR: &str = "gzip, deflate, br";
pub const ACCEPT_ENCODING_GZIP: &str = "gzip, deflate";
pub const ACCEPT_ENCODING_DEFLATE: &str = "deflate";

pub const ACCEPT_AVIF: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";
pub const ACCEPT_WEBP: &str = "image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";
pub const ACCEPT_DEFAULT: &str = "image/apng,image/svg+xml,image/*,*/*;q=0.8";

/// A named header value, e.g. ("br", "gzip, deflate, br")
pub type Variant = (&'static str, &'static str);

// Accept-Encoding variants for pages and assets
//
// Empty when every compression flag is off: pages then get no requests.
pub fn encoding_variants(flags: &VariantFlags) -> Vec<Variant> {
    let mut variants = Vec::new();
    if flags.brotli {
        variants.push(("br", ACCEPT_ENCODING_BR));
    }
    if flags.gzip {
        variants.push(("gzip", ACCEPT_ENCODING_GZIP));
    }
    if flags.deflate {
        variants.push(("deflate", ACCEPT_ENCODING_DEFLATE));
    }
    variants
}

// Accept variants for images
//
// Always ends with "default": AVIF/WebP only add requests on top of it.
pub fn accept_variants(flags: &VariantFlags) -> Vec<Variant> {
    let mut variants = Vec::new();
    if flags.avif {
        variants.push(("avif", ACCEPT_AVIF));
    }
    if flags.webp {
        variants.push(("webp", ACCEPT_WEBP));
    }
    variants.push(("default", ACCEPT_DEFAULT));
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_flags() -> VariantFlags {
        VariantFlags {
            images: false,
            css: false,
            js: false,
            brotli: false,
            gzip: false,
            deflate: false,
            webp: false,
            avif: false,
        }
    }

    #[test]
    fn test_all_encodings_in_order() {
        let names: Vec<_> = encoding_variants(&VariantFlags::default())
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["br", "gzip", "deflate"]);
    }

    #[test]
    fn test_no_encodings() {
        assert!(encoding_variants(&no_flags()).is_empty());
    }

    #[test]
    fn test_single_encoding() {
        let flags = VariantFlags {
            gzip: true,
            ..no_flags()
        };
        assert_eq!(encoding_variants(&flags), vec![("gzip", "gzip, deflate")]);
    }

    #[test]
    fn test_accept_always_has_default() {
        assert_eq!(accept_variants(&no_flags()), vec![("default", ACCEPT_DEFAULT)]);

        let all = accept_variants(&VariantFlags::default());
        assert_eq!(
            all,
            vec![("avif", ACCEPT_AVIF), ("webp", ACCEPT_WEBP), ("default", ACCEPT_DEFAULT)]
        );
    }
}
