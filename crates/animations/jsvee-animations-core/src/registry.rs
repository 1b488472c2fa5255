//! Animation registry: id -> opaque definition.

use hashbrown::HashMap;

use crate::error::RegistryError;
use crate::ids::AnimationId;

/// Flat mapping from [`AnimationId`] to a definition owned by whoever
/// registered it.
///
/// The registry never inspects `D`. Keys are unique and the last registration
/// under an id wins; there is no removal.
#[derive(Debug, Clone)]
pub struct AnimationRegistry<D> {
    items: HashMap<AnimationId, D>,
}

impl<D> Default for AnimationRegistry<D> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
        }
    }
}

impl<D> AnimationRegistry<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the definition for `id`. Returns the displaced
    /// definition, if any.
    pub fn register(&mut self, id: AnimationId, definition: D) -> Option<D> {
        let previous = self.items.insert(id, definition);
        if previous.is_some() {
            log::debug!("animation definition replaced by a later registration");
        }
        previous
    }

    /// Validate a raw id, then [`register`](Self::register).
    pub fn register_str(&mut self, id: &str, definition: D) -> Result<Option<D>, RegistryError> {
        let id = AnimationId::new(id)?;
        Ok(self.register(id, definition))
    }

    /// Definition registered under `id`, or `None`. Unknown and empty ids are
    /// ordinary misses.
    #[inline]
    pub fn get_animation(&self, id: &str) -> Option<&D> {
        self.items.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&AnimationId> {
        let mut ids: Vec<&AnimationId> = self.items.keys().collect();
        ids.sort();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnimationId, &D)> {
        self.items.iter()
    }
}

impl<D> Extend<(AnimationId, D)> for AnimationRegistry<D> {
    fn extend<T: IntoIterator<Item = (AnimationId, D)>>(&mut self, iter: T) {
        for (id, definition) in iter {
            self.register(id, definition);
        }
    }
}
