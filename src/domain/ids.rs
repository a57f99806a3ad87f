//! Session identifier with path-safety validation
//!
//! Session identifiers end up as directory names under the uploads, output and
//! download roots, so they must be a single, non-traversing path component.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Session identifier newtype wrapper
///
/// # Examples
///
/// ```
/// use palosa::domain::ids::SessionId;
/// use std::str::FromStr;
///
/// let id = SessionId::from_str("b3c1f0d2-session").unwrap();
/// assert_eq!(id.as_str(), "b3c1f0d2-session");
/// assert!(SessionId::from_str("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new SessionId from a string
    ///
    /// Returns `Err` when the identifier is empty, contains a path separator,
    /// or is a relative directory reference.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Session ID cannot be empty".to_string());
        }
        if id.contains('/') || id.contains('\\') || id.contains('\0') {
            return Err(format!("Session ID must not contain path separators: {id}"));
        }
        if id == "." || id == ".." || id.contains("..") {
            return Err(format!("Session ID must not reference parent directories: {id}"));
        }
        Ok(Self(id))
    }

    /// Allocates a fresh random session identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the session ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
