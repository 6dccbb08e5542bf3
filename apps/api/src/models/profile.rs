use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_PROFILE_ID_LEN: usize = 64;

#[derive(Debug, Error, PartialEq)]
pub enum ProfileIdError {
    #[error("profile id cannot be empty")]
    Empty,

    #[error("profile id exceeds {MAX_PROFILE_ID_LEN} characters")]
    TooLong,

    #[error("profile id may only contain ASCII letters, digits, '_' and '-': {0}")]
    InvalidCharacter(String),
}

/// Identifies whose templates an operation reads or writes.
///
/// The id doubles as a file-name prefix in the template store, so it is restricted to a
/// filesystem-safe alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileId(String);

impl ProfileId {
    pub fn parse(raw: &str) -> Result<Self, ProfileIdError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ProfileIdError::Empty);
        }
        if raw.len() > MAX_PROFILE_ID_LEN {
            return Err(ProfileIdError::TooLong);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ProfileIdError::InvalidCharacter(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProfileId {
    type Error = ProfileIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProfileId> for String {
    fn from(id: ProfileId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_default_profile() {
        let id = ProfileId::parse("default_user").unwrap();
        assert_eq!(id.as_str(), "default_user");
        assert_eq!(id.to_string(), "default_user");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(ProfileId::parse("  jane-doe ").unwrap().as_str(), "jane-doe");
    }

    #[test]
    fn test_rejects_path_components() {
        assert!(matches!(
            ProfileId::parse("../etc"),
            Err(ProfileIdError::InvalidCharacter(_))
        ));
        assert!(matches!(
            ProfileId::parse("a/b"),
            Err(ProfileIdError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn test_rejects_empty_and_long_ids() {
        assert_eq!(ProfileId::parse("   "), Err(ProfileIdError::Empty));
        assert_eq!(ProfileId::parse(&"x".repeat(65)), Err(ProfileIdError::TooLong));
    }

    #[test]
    fn test_deserializes_through_validation() {
        let ok: ProfileId = serde_json::from_str(r#""alice""#).unwrap();
        assert_eq!(ok.as_str(), "alice");
        assert!(serde_json::from_str::<ProfileId>(r#""al ice""#).is_err());
    }
}
