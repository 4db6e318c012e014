use std::fmt::Display;

use serde_aux::field_attributes::deserialize_default_from_null;

use crate::{
    errors::{ConversionError, DeserializationError},
    id::{GroupId, UserId},
};

#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(try_from = "String", into = "String")]
/// Represents a username and is constrained to not be an empty string
pub struct Username(String);

impl Username {
    pub const MAX_LENGTH: usize = 150;
}

impl TryFrom<String> for Username {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Username {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who is logged in, as reported by the authentication service on login and
/// by the current user endpoint
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub username: Username,
    /// Missing or `null` groups are read as no groups
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub groups: Vec<GroupId>,
}

impl Identity {
    pub fn new(id: UserId, username: Username, groups: Vec<GroupId>) -> Self {
        Self {
            id,
            username,
            groups,
        }
    }

    /// Format used when persisting the identity
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(value: &str) -> Result<Self, DeserializationError> {
        serde_json::from_str(value).map_err(|e| DeserializationError::new("identity", e))
    }
}
