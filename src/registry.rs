//! Fixed set of interactive parts.
//!
//! The registry is filled once by the scene builder and never grows or
//! shrinks afterwards, so a [`PartId`] is simply the index of a part in
//! [`PartRegistry::parts`]. Alongside the parts it tracks which of them are
//! *hover-active*: exploded by the pointer and not yet told to reassemble.

use std::collections::HashSet;

use crate::part::{Part, PartDesc, PartId};

/// Ordered storage of every part in the scene.
#[derive(Debug, Clone, Default)]
pub struct PartRegistry {
    parts: Vec<Part>,
    hover_active: HashSet<PartId>,
}

impl PartRegistry {
    /// Build a registry, assigning ids in iteration order.
    pub fn new(descs: impl IntoIterator<Item = PartDesc>) -> Self {
        let parts = descs
            .into_iter()
            .enumerate()
            .map(|(index, desc)| Part::from_desc(PartId(index), desc))
            .collect();

        Self {
            parts,
            hover_active: HashSet::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// All parts in id order.
    #[inline]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub(crate) fn parts_mut(&mut self) -> &mut [Part] {
        &mut self.parts
    }

    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id.0)
    }

    pub(crate) fn part_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.parts.get_mut(id.0)
    }

    /// Whether `id` was exploded by hover and has not been released yet.
    #[inline]
    pub fn is_hover_active(&self, id: PartId) -> bool {
        self.hover_active.contains(&id)
    }

    /// Hover-active parts in id order.
    pub fn hover_active(&self) -> Vec<PartId> {
        let mut ids: Vec<PartId> = self.hover_active.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn mark_hover_active(&mut self, id: PartId) {
        self.hover_active.insert(id);
    }

    pub(crate) fn clear_hover_active(&mut self, id: PartId) -> bool {
        self.hover_active.remove(&id)
    }

    /// Number of particles alive across every part.
    pub fn live_particles(&self) -> usize {
        self.parts.iter().map(|part| part.particles().len()).sum()
    }

    /// Parts currently blown apart.
    pub fn exploded_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|part| part.is_exploded())
    }
}
