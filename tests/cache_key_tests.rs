// Cache fingerprint property tests

use http_relay::cache::cache_key;
use proptest::prelude::*;

fn method() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("GET".to_string()),
        Just("POST".to_string()),
        Just("PUT".to_string()),
        Just("PATCH".to_string()),
        Just("DELETE".to_string()),
    ]
}

fn path() -> impl Strategy<Value = String> {
    "/[a-zA-Z0-9/_.+-]{0,40}"
}

fn body() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..256)
}

proptest! {
    #[test]
    fn distinct_triples_never_collide(
        m1 in method(), p1 in path(), b1 in body(),
        m2 in method(), p2 in path(), b2 in body(),
    ) {
        prop_assume!((&m1, &p1, &b1) != (&m2, &p2, &b2));
        prop_assert_ne!(cache_key(&m1, &p1, &b1), cache_key(&m2, &p2, &b2));
    }

    #[test]
    fn key_is_deterministic(m in method(), p in path(), b in body()) {
        prop_assert_eq!(cache_key(&m, &p, &b), cache_key(&m, &p, &b));
    }

    #[test]
    fn key_is_fixed_width_hex(m in method(), p in path(), b in body()) {
        let key = cache_key(&m, &p, &b);
        prop_assert_eq!(key.len(), 64);
        prop_assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[test]
fn test_join_style_collisions_do_not_occur() {
    // A separator-joined string key would collide when components share the
    // separator character; the digest over delimited byte streams must not.
    assert_ne!(
        cache_key("GET", "/a+b", b"c"),
        cache_key("GET", "/a", b"b+c")
    );
    assert_ne!(cache_key("GET", "/ab", b""), cache_key("GETa", "b", b""));
}
