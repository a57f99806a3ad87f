//! Pseudonymization primitives for PALoSA
//!
//! - [`generator`]: keyed generic, email and IPv4 pseudonyms ([`Pseudonymizer`])
//! - [`cryptopan`]: prefix-preserving IPv4 mapping
//! - [`patterns`]: built-in patterns and per-category pattern resolution
//! - [`content`]: ordered regex passes over free text
//! - [`validate`]: IPv4 and email classification
//!
//! # Usage
//!
//! ```rust
//! use palosa::pseudonymization::{pseudo_content_regex, Pseudonymizer, IPV4_PATTERN};
//! use secrecy::SecretString;
//!
//! # fn example() -> palosa::domain::Result<()> {
//! let pseudonymizer = Pseudonymizer::new(&SecretString::new("my-key".to_string()))?;
//! let out = pseudo_content_regex(&pseudonymizer, "client 10.0.0.7 connected", &[IPV4_PATTERN])?;
//! assert!(!out.contains("10.0.0.7"));
//! # Ok(())
//! # }
//! ```

pub mod content;
pub mod cryptopan;
pub mod generator;
pub mod patterns;
pub mod validate;

pub use content::{pseudo_content_regex, ContentAnonymizer};
pub use cryptopan::{bytes_to_ip, ip_to_bytes, CryptoPan};
pub use generator::Pseudonymizer;
pub use patterns::{builtin_pattern, resolve_patterns, EMAIL_PATTERN, IPV4_PATTERN};
pub use validate::{is_email_address, is_ipv4_address};
