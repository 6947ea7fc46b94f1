//! Outbound header sanitization.
//!
//! Inbound headers are merged over the configured defaults field-by-field,
//! except for a fixed exclusion set of hop-by-hop and recomputed fields that
//! must never be copied from the client: `connection`, `host` and
//! `content-length`, plus `accept-encoding` when caching is enabled (cached
//! bodies are stored un-negotiated so every later client receives valid
//! bytes). After merging, `connection: close` is forced so the upstream never
//! keeps the connection open ambiguously.

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Merge configured defaults with the inbound request headers.
///
/// `content-length` is recomputed later by the pipeline once the final
/// upstream body is known.
pub fn sanitize(defaults: &HeaderMap, inbound: &HeaderMap, caching: bool) -> HeaderMap {
    let mut merged = defaults.clone();

    // Inbound values replace defaults wholesale, including multi-valued
    // headers, so clear before appending.
    for name in inbound.keys() {
        if !is_excluded(name, caching) {
            merged.remove(name);
        }
    }
    for (name, value) in inbound {
        if !is_excluded(name, caching) {
            merged.append(name.clone(), value.clone());
        }
    }

    merged.insert(header::CONNECTION, HeaderValue::from_static("close"));
    merged
}

fn is_excluded(name: &HeaderName, caching: bool) -> bool {
    name == header::CONNECTION
        || name == header::HOST
        || name == header::CONTENT_LENGTH
        || (caching && name == header::ACCEPT_ENCODING)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                name.parse::<HeaderName>().unwrap(),
                value.parse::<HeaderValue>().unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_excluded_headers_never_forwarded() {
        let inbound = headers(&[
            ("connection", "keep-alive"),
            ("host", "client.example.com"),
            ("content-length", "42"),
            ("x-trace", "abc"),
        ]);
        let merged = sanitize(&HeaderMap::new(), &inbound, false);

        assert_eq!(merged.get("connection").unwrap(), "close");
        assert!(merged.get("host").is_none());
        assert!(merged.get("content-length").is_none());
        assert_eq!(merged.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn test_inbound_overrides_defaults() {
        let defaults = headers(&[("x-api-key", "default"), ("x-static", "kept")]);
        let inbound = headers(&[("x-api-key", "from-client")]);
        let merged = sanitize(&defaults, &inbound, false);

        assert_eq!(merged.get("x-api-key").unwrap(), "from-client");
        assert_eq!(merged.get("x-static").unwrap(), "kept");
    }

    #[test]
    fn test_connection_close_always_set() {
        let merged = sanitize(&HeaderMap::new(), &HeaderMap::new(), false);
        assert_eq!(merged.get("connection").unwrap(), "close");
    }

    #[test]
    fn test_accept_encoding_stripped_only_when_caching() {
        let inbound = headers(&[("accept-encoding", "gzip")]);

        let plain = sanitize(&HeaderMap::new(), &inbound, false);
        assert_eq!(plain.get("accept-encoding").unwrap(), "gzip");

        let caching = sanitize(&HeaderMap::new(), &inbound, true);
        assert!(caching.get("accept-encoding").is_none());
    }

    #[test]
    fn test_multi_valued_header_replaces_default() {
        let defaults = headers(&[("x-tag", "default")]);
        let inbound = headers(&[("x-tag", "one"), ("x-tag", "two")]);
        let merged = sanitize(&defaults, &inbound, false);

        let values: Vec<_> = merged.get_all("x-tag").iter().collect();
        assert_eq!(values, vec!["one", "two"]);
    }
}
