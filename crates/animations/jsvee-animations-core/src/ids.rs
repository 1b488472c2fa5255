//! Animation identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Non-empty string key under which an animation definition is registered.
///
/// The token is otherwise opaque: whitespace, dots and quotes are all kept
/// verbatim, matching whatever the markup's `data-id` attribute carries.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnimationId(String);

impl AnimationId {
    pub fn new(raw: impl Into<String>) -> Result<Self, RegistryError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(RegistryError::EmptyAnimationId);
        }
        Ok(Self(raw))
    }

    /// Accepts an optional attribute value, treating absent and empty alike.
    pub fn from_attribute(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| Self::new(v).ok())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AnimationId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AnimationId {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for AnimationId {
    type Error = RegistryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnimationId> for String {
    fn from(id: AnimationId) -> Self {
        id.0
    }
}

impl AsRef<str> for AnimationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets the registry map be queried with a plain `&str`.
impl Borrow<str> for AnimationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
