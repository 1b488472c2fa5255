//! Animation bundles: many definitions loaded from one JSON document.

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::RegistryError;
use crate::ids::AnimationId;
use crate::module::AnimationModule;
use crate::registry::AnimationRegistry;

/// Animation definitions shipped as one JSON document, registered as a unit.
///
/// Accepted shapes:
/// - an object keyed by id: `{ "swap": { "steps": [...] } }`
/// - an ordered list: `[{ "name": "swap", "data": { ... } }]`. Entries are
///   registered in list order, so a repeated name ends up with its last entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationBundle {
    name: String,
    entries: Vec<(AnimationId, JsonValue)>,
}

impl AnimationBundle {
    pub fn from_json(name: impl Into<String>, s: &str) -> Result<Self, RegistryError> {
        let raw: RawBundle =
            serde_json::from_str(s).map_err(|e| RegistryError::InvalidBundle(e.to_string()))?;

        let entries = match raw {
            RawBundle::Entries(list) => list
                .into_iter()
                .enumerate()
                .map(|(i, e)| {
                    AnimationId::new(e.name)
                        .map(|id| (id, e.data))
                        .map_err(|_| RegistryError::InvalidBundle(format!("entry {i} has an empty name")))
                })
                .collect::<Result<Vec<_>, _>>()?,
            RawBundle::Map(map) => map
                .into_iter()
                .map(|(k, v)| {
                    AnimationId::new(k)
                        .map(|id| (id, v))
                        .map_err(|_| RegistryError::InvalidBundle("empty animation name".into()))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Self {
            name: name.into(),
            entries,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[(AnimationId, JsonValue)] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a bundle named `"bundle"`. See [`AnimationBundle::from_json`].
pub fn parse_animation_bundle_json(s: &str) -> Result<AnimationBundle, RegistryError> {
    AnimationBundle::from_json("bundle", s)
}

impl AnimationModule<JsonValue> for AnimationBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn register_into(&self, registry: &mut AnimationRegistry<JsonValue>) -> Result<usize, RegistryError> {
        registry.extend(self.entries.iter().cloned());
        Ok(self.entries.len())
    }
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBundle {
    Entries(Vec<RawEntry>),
    Map(Map<String, JsonValue>),
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    data: JsonValue,
}
