//! Behavioural tests for the pseudonym generators and the regex anonymizer

use palosa::core::transform::apply_derived_fields;
use palosa::domain::{CategorySettings, DerivedField, FileCategory, Settings};
use palosa::pseudonymization::{
    bytes_to_ip, ip_to_bytes, pseudo_content_regex, resolve_patterns, CryptoPan, Pseudonymizer,
    EMAIL_PATTERN, IPV4_PATTERN,
};
use regex::Regex;
use secrecy::SecretString;
use serde_json::json;

fn pseudonymizer(key: &str) -> Pseudonymizer {
    Pseudonymizer::new(&SecretString::new(key.to_string())).unwrap()
}

#[test]
fn test_generic_pseudonyms_are_deterministic_and_distinct() {
    let p = pseudonymizer("determinism-key");

    let a = p.pseudonym("Alice");
    assert_eq!(a, p.pseudonym("Alice"));
    assert_ne!(a, p.pseudonym("Bob"));
    assert_eq!(a.len(), 16);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    assert_ne!(a, pseudonymizer("another-key").pseudonym("Alice"));
}

#[test]
fn test_email_keeps_top_level_domain() {
    let p = pseudonymizer("email-key");
    let out = p.pseudonymize_email("max@test.com");

    assert_ne!(out, "max@test.com");
    assert!(Regex::new(r"@.*\.com$").unwrap().is_match(&out));
}

#[test]
fn test_ip_byte_conversion() {
    assert_eq!(bytes_to_ip(ip_to_bytes("192.168.0.1").unwrap()), "192.168.0.1");
    assert!(ip_to_bytes("192.168.0").is_err());
}

#[test]
fn test_cryptopan_prefix_preservation() {
    let cp = CryptoPan::from_secret("prefix-key");
    let pairs = [
        ("10.20.30.40", "10.20.30.41", 31),
        ("10.20.30.40", "10.20.99.1", 16),
        ("172.16.0.1", "172.31.255.255", 12),
    ];

    for (a, b, shared_bits) in pairs {
        let x = u32::from_be_bytes(ip_to_bytes(a).unwrap());
        let y = u32::from_be_bytes(ip_to_bytes(b).unwrap());
        assert!((x ^ y).leading_zeros() >= shared_bits);

        let ax = cp.anonymize_u32(x);
        let ay = cp.anonymize_u32(y);
        assert_eq!((ax ^ ay).leading_zeros(), (x ^ y).leading_zeros(), "{a} / {b}");
    }
}

#[test]
fn test_regex_anonymization_is_non_destructive() {
    let p = pseudonymizer("regex-key");
    let input = "IP: 192.168.1.1 Email: test@example.com";

    let out = pseudo_content_regex(&p, input, &[IPV4_PATTERN, EMAIL_PATTERN]).unwrap();

    assert!(!out.contains("192.168.1.1"));
    assert!(!out.contains("test@example.com"));
    assert!(out.starts_with("IP: "));
    assert!(out.contains(" Email: "));
}

#[test]
fn test_derived_field_joins_paths() {
    let mut doc = json!({"nested": {"a": "foo", "b": "bar"}});
    let mut derived = indexmap::IndexMap::new();
    derived.insert(
        "mergedField".to_string(),
        DerivedField::new(["nested.a", "nested.b"], "-"),
    );

    apply_derived_fields(&mut doc, &derived);

    assert_eq!(doc["mergedField"], "foo-bar");
}

#[test]
fn test_pattern_resolution_gating() {
    assert!(resolve_patterns(&Settings::default(), FileCategory::Log).is_empty());

    let settings = Settings {
        log_settings: Some(CategorySettings::with_options(["E-Mail"])),
        regex_settings: Some(CategorySettings::with_patterns(["abc"])),
        ..Default::default()
    };
    let patterns = resolve_patterns(&settings, FileCategory::Log);
    assert!(patterns.iter().any(|p| p == EMAIL_PATTERN));
    assert!(patterns.iter().any(|p| p == "abc"));
}
