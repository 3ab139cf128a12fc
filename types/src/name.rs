//! Account and proposal names.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A human-readable identifier for a ledger account or a proposal.
///
/// Names are 1 to 32 characters drawn from `[a-z0-9._-]` and must start with
/// a letter or digit. The rules are checked on construction and on
/// deserialization, so every `Name` in the system is well-formed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    /// Maximum length of a name in bytes.
    pub const MAX_LEN: usize = 32;

    /// Create a name, validating its characters and length.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        validate(&s)?;
        Ok(Self(s))
    }

    /// Return the raw name string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes, used as storage keys.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

fn validate(s: &str) -> Result<(), TypesError> {
    let invalid = |reason| TypesError::InvalidName {
        name: s.to_string(),
        reason,
    };
    if s.is_empty() {
        return Err(invalid("name is empty"));
    }
    if s.len() > Name::MAX_LEN {
        return Err(invalid("name is longer than 32 characters"));
    }
    let first = s.as_bytes()[0];
    if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
        return Err(invalid("name must start with a letter or digit"));
    }
    if !s
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'.' | b'_' | b'-'))
    {
        return Err(invalid("name may only contain a-z, 0-9, '.', '_' and '-'"));
    }
    Ok(())
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Name {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Name {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_names() {
        for raw in ["alice", "treasury.fund", "p-2024_q3", "7seas", "a"] {
            assert!(Name::new(raw).is_ok(), "{raw} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(Name::new("").is_err());
        assert!(Name::new("Alice").is_err());
        assert!(Name::new(".hidden").is_err());
        assert!(Name::new("has space").is_err());
        assert!(Name::new("a".repeat(33)).is_err());
        assert!(Name::new("a".repeat(32)).is_ok());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<Name, _> = bincode::deserialize(&bincode::serialize("bob").unwrap());
        assert_eq!(ok.unwrap().as_str(), "bob");

        let bad: Result<Name, _> = bincode::deserialize(&bincode::serialize("B O B").unwrap());
        assert!(bad.is_err());
    }
}
