//! Keyed pseudonym generation
//!
//! [`Pseudonymizer`] owns the secret-derived state for a run: an HMAC-SHA256
//! instance for generic values and a [`CryptoPan`] instance for IPv4 addresses.
//! It is built once from the configured key and shared by reference.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use sha2::Sha256;

use super::cryptopan::{bytes_to_ip, ip_to_bytes, CryptoPan};
use super::validate::{is_email_address, is_ipv4_address};
use crate::domain::{PalosaError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Number of HMAC output bytes kept in a generic pseudonym
const PSEUDONYM_BYTES: usize = 8;

/// Deterministic pseudonym generator for one secret key
#[derive(Clone)]
pub struct Pseudonymizer {
    mac: HmacSha256,
    cryptopan: CryptoPan,
}

impl Pseudonymizer {
    /// Creates a generator from the configured secret
    ///
    /// # Errors
    ///
    /// Returns [`PalosaError::Configuration`] when the key is empty.
    pub fn new(key: &SecretString) -> Result<Self> {
        Self::from_key_str(key.expose_secret())
    }

    pub(crate) fn from_key_str(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(PalosaError::Configuration(
                "Pseudonymization key must not be empty".to_string(),
            ));
        }

        let mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|e| PalosaError::Configuration(format!("Invalid pseudonymization key: {e}")))?;

        Ok(Self {
            mac,
            cryptopan: CryptoPan::from_secret(key),
        })
    }

    /// Generic pseudonym: lowercase hex of the first 8 bytes of HMAC-SHA256
    pub fn pseudonym(&self, value: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        let digest = mac.finalize().into_bytes();

        digest[..PSEUDONYM_BYTES]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// Format-preserving email pseudonym
    ///
    /// `local@host.tld` becomes `p(local)@p(host).tld`. Without an `@` the whole
    /// string gets a generic pseudonym; a domain without a dot is pseudonymized
    /// whole and no TLD is kept.
    pub fn pseudonymize_email(&self, email: &str) -> String {
        let Some((local, domain)) = email.split_once('@') else {
            return self.pseudonym(email);
        };

        match domain.rsplit_once('.') {
            Some((host, tld)) => format!(
                "{}@{}.{}",
                self.pseudonym(local),
                self.pseudonym(host),
                tld
            ),
            None => format!("{}@{}", self.pseudonym(local), self.pseudonym(domain)),
        }
    }

    /// Prefix-preserving IPv4 pseudonym
    pub fn pseudonymize_ip(&self, ip: &str) -> Result<String> {
        let bytes = ip_to_bytes(ip)?;
        Ok(bytes_to_ip(self.cryptopan.anonymize_bytes(bytes)))
    }

    /// Classifies a string and applies the matching strategy
    ///
    /// IPv4 addresses are checked first, then emails, then everything else
    /// gets a generic pseudonym.
    pub fn pseudonymize_str(&self, value: &str) -> Result<String> {
        if is_ipv4_address(value) {
            self.pseudonymize_ip(value)
        } else if is_email_address(value) {
            Ok(self.pseudonymize_email(value))
        } else {
            Ok(self.pseudonym(value))
        }
    }

    /// Pseudonymizes a JSON value in place of a source field
    ///
    /// Strings are classified; other values are coerced to text first (numbers
    /// and booleans by their literal form, objects and arrays as compact JSON)
    /// and receive a generic pseudonym.
    pub fn pseudonymize_value(&self, value: &Value) -> Result<Value> {
        let replaced = match value {
            Value::String(s) => self.pseudonymize_str(s)?,
            Value::Number(n) => self.pseudonym(&n.to_string()),
            Value::Bool(b) => self.pseudonym(&b.to_string()),
            Value::Null => return Ok(Value::Null),
            Value::Array(_) | Value::Object(_) => self.pseudonym(&serde_json::to_string(value)?),
        };
        Ok(Value::String(replaced))
    }
}

impl std::fmt::Debug for Pseudonymizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pseudonymizer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pseudonymizer() -> Pseudonymizer {
        Pseudonymizer::from_key_str("test-secret-key").unwrap()
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = Pseudonymizer::new(&SecretString::new(String::new())).unwrap_err();
        assert!(matches!(err, PalosaError::Configuration(_)));
    }

    #[test]
    fn test_pseudonym_is_deterministic() {
        let p = pseudonymizer();
        assert_eq!(p.pseudonym("alice"), p.pseudonym("alice"));
        assert_ne!(p.pseudonym("alice"), p.pseudonym("bob"));
    }

    #[test]
    fn test_pseudonym_shape() {
        let token = pseudonymizer().pseudonym("value");
        assert_eq!(token.len(), 16);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_pseudonym_depends_on_key() {
        let a = Pseudonymizer::from_key_str("key-a").unwrap();
        let b = Pseudonymizer::from_key_str("key-b").unwrap();
        assert_ne!(a.pseudonym("same"), b.pseudonym("same"));
    }

    #[test]
    fn test_email_keeps_tld() {
        let p = pseudonymizer();
        let out = p.pseudonymize_email("max@test.com");
        assert_ne!(out, "max@test.com");
        assert!(out.ends_with(".com"));
        let (local, domain) = out.split_once('@').unwrap();
        assert_eq!(local, p.pseudonym("max"));
        assert_eq!(domain, format!("{}.com", p.pseudonym("test")));
    }

    #[test]
    fn test_email_with_subdomain() {
        let p = pseudonymizer();
        let out = p.pseudonymize_email("a@mail.example.org");
        assert_eq!(out, format!("{}@{}.org", p.pseudonym("a"), p.pseudonym("mail.example")));
    }

    #[test]
    fn test_malformed_email() {
        let p = pseudonymizer();
        assert_eq!(p.pseudonymize_email("no-at-sign"), p.pseudonym("no-at-sign"));
        assert_eq!(
            p.pseudonymize_email("root@localhost"),
            format!("{}@{}", p.pseudonym("root"), p.pseudonym("localhost"))
        );
    }

    #[test]
    fn test_ip_stays_dotted_quad() {
        let p = pseudonymizer();
        let out = p.pseudonymize_ip("192.168.1.1").unwrap();
        assert!(is_ipv4_address(&out));
        assert_eq!(out, p.pseudonymize_ip("192.168.1.1").unwrap());
    }

    #[test]
    fn test_classification_order() {
        let p = pseudonymizer();
        assert_eq!(
            p.pseudonymize_str("10.0.0.1").unwrap(),
            p.pseudonymize_ip("10.0.0.1").unwrap()
        );
        assert_eq!(
            p.pseudonymize_str("x@y.de").unwrap(),
            p.pseudonymize_email("x@y.de")
        );
        assert_eq!(p.pseudonymize_str("abc").unwrap(), p.pseudonym("abc"));
    }

    #[test]
    fn test_value_coercion() {
        let p = pseudonymizer();
        assert_eq!(p.pseudonymize_value(&json!(42)).unwrap(), json!(p.pseudonym("42")));
        assert_eq!(p.pseudonymize_value(&json!(true)).unwrap(), json!(p.pseudonym("true")));
        assert_eq!(
            p.pseudonymize_value(&json!({"a": 1})).unwrap(),
            json!(p.pseudonym(r#"{"a":1}"#))
        );
        assert_eq!(p.pseudonymize_value(&Value::Null).unwrap(), Value::Null);
    }
}
