//! # Renderable Registry
//!
//! Ordered collection of [`RenderableDescriptor`]s for one scan pass, plus
//! the render-method overrides the caller keys by backing entity.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ids::{EntityId, MaskId};
use crate::render::RenderMethod;
use crate::renderable::{Category, RenderableDescriptor};

/// Size constraints applied to neuron fragments before a scan.
///
/// Only fragments are filtered. Compartments, samples and sets always stay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryFilter {
    /// Fragments with fewer voxels are dropped.
    pub min_voxel_count: Option<u64>,
    /// At most this many fragments are kept, largest first.
    pub max_fragment_count: Option<usize>,
}

impl RegistryFilter {
    /// Filter that keeps everything.
    pub const NONE: Self = Self {
        min_voxel_count: None,
        max_fragment_count: None,
    };

    /// Returns true if the filter cannot drop anything.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.min_voxel_count.is_none() && self.max_fragment_count.is_none()
    }
}

/// Renderables of one scan pass.
#[derive(Debug, Clone, Default)]
pub struct RenderableRegistry {
    /// Descriptors in caller order.
    renderables: Vec<RenderableDescriptor>,
    /// Mask id to position in `renderables`.
    by_mask: HashMap<MaskId, usize>,
    /// Render-method overrides keyed by backing entity.
    method_overrides: HashMap<EntityId, RenderMethod>,
}

impl RenderableRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from descriptors. Later duplicates replace earlier ones.
    #[must_use]
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = RenderableDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.add(descriptor);
        }
        registry
    }

    /// Adds a descriptor.
    ///
    /// Returns the descriptor it replaced if the mask id was already present.
    pub fn add(&mut self, descriptor: RenderableDescriptor) -> Option<RenderableDescriptor> {
        if let Some(&index) = self.by_mask.get(&descriptor.single_mask_id) {
            return Some(std::mem::replace(&mut self.renderables[index], descriptor));
        }
        self.by_mask.insert(descriptor.single_mask_id, self.renderables.len());
        self.renderables.push(descriptor);
        None
    }

    /// Looks up a descriptor by single-mask id.
    #[must_use]
    pub fn get(&self, id: MaskId) -> Option<&RenderableDescriptor> {
        self.by_mask.get(&id).map(|&index| &self.renderables[index])
    }

    /// Iterates descriptors in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &RenderableDescriptor> {
        self.renderables.iter()
    }

    /// Number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    /// Returns true if the registry holds no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }

    /// Overrides the render method of every renderable backed by `entity`.
    pub fn set_method_override(&mut self, entity: EntityId, method: RenderMethod) {
        self.method_overrides.insert(entity, method);
    }

    /// Removes an override, returning it.
    pub fn clear_method_override(&mut self, entity: EntityId) -> Option<RenderMethod> {
        self.method_overrides.remove(&entity)
    }

    /// Override for `entity`, if any.
    #[must_use]
    pub fn method_override(&self, entity: EntityId) -> Option<RenderMethod> {
        self.method_overrides.get(&entity).copied()
    }

    /// Highest single-mask id in use.
    #[must_use]
    pub fn last_used_mask_id(&self) -> Option<MaskId> {
        self.renderables.iter().map(|r| r.single_mask_id).max()
    }

    /// First id the interner may hand out for composites.
    ///
    /// `None` when the single masks already occupy the top of the id space.
    #[must_use]
    pub fn first_allocatable_id(&self) -> Option<MaskId> {
        match self.last_used_mask_id() {
            None => Some(MaskId::new(1)),
            Some(last) => last.raw().checked_add(1).map(MaskId::new),
        }
    }

    /// Drops neuron fragments that do not pass `filter`.
    ///
    /// Returns the number of descriptors removed.
    pub fn apply_filter(&mut self, filter: RegistryFilter) -> usize {
        if filter.is_unconstrained() {
            return 0;
        }
        let before = self.renderables.len();
        let is_fragment = |r: &RenderableDescriptor| r.category == Some(Category::NeuronFragment);

        if let Some(min) = filter.min_voxel_count {
            self.renderables.retain(|r| !is_fragment(r) || r.voxel_count >= min);
        }

        if let Some(max) = filter.max_fragment_count {
            let mut sizes: Vec<(u64, MaskId)> = self
                .renderables
                .iter()
                .filter(|r| is_fragment(r))
                .map(|r| (r.voxel_count, r.single_mask_id))
                .collect();
            if sizes.len() > max {
                sizes.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
                let cutoff: std::collections::HashSet<MaskId> =
                    sizes[max..].iter().map(|&(_, id)| id).collect();
                self.renderables.retain(|r| !cutoff.contains(&r.single_mask_id));
            }
        }

        self.reindex();
        before - self.renderables.len()
    }

    /// Orders descriptors by render priority, winners first.
    pub fn sort_by_priority(&mut self) {
        self.renderables.sort_by(RenderableDescriptor::cmp_priority);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.by_mask = self
            .renderables
            .iter()
            .enumerate()
            .map(|(index, r)| (r.single_mask_id, index))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(id: u16, voxels: u64) -> RenderableDescriptor {
        RenderableDescriptor::fragment(MaskId(id), EntityId(u64::from(id)), voxels)
    }

    #[test]
    fn test_add_and_replace() {
        let mut registry = RenderableRegistry::new();
        assert!(registry.add(fragment(1, 10)).is_none());
        let replaced = registry.add(fragment(1, 20)).unwrap();
        assert_eq!(replaced.voxel_count, 10);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(MaskId(1)).unwrap().voxel_count, 20);
    }

    #[test]
    fn test_first_allocatable_id() {
        let mut registry = RenderableRegistry::new();
        assert_eq!(registry.first_allocatable_id(), Some(MaskId(1)));
        registry.add(fragment(4, 1));
        registry.add(fragment(9, 1));
        assert_eq!(registry.first_allocatable_id(), Some(MaskId(10)));
        registry.add(fragment(u16::MAX, 1));
        assert_eq!(registry.first_allocatable_id(), None);
    }

    #[test]
    fn test_filter_keeps_largest_fragments() {
        let mut registry = RenderableRegistry::from_descriptors([
            fragment(1, 5),
            fragment(2, 500),
            fragment(3, 50),
            fragment(4, 5000),
            RenderableDescriptor::compartment(MaskId(5), EntityId(5), 1),
        ]);
        let removed = registry.apply_filter(RegistryFilter {
            min_voxel_count: Some(10),
            max_fragment_count: Some(2),
        });
        assert_eq!(removed, 2);
        assert!(registry.get(MaskId(1)).is_none());
        assert!(registry.get(MaskId(3)).is_none());
        assert!(registry.get(MaskId(2)).is_some());
        assert!(registry.get(MaskId(4)).is_some());
        // Compartments are never filtered, even below the size floor.
        assert!(registry.get(MaskId(5)).is_some());
    }

    #[test]
    fn test_sort_by_priority_keeps_lookup_valid() {
        let mut registry = RenderableRegistry::from_descriptors([
            RenderableDescriptor::compartment(MaskId(1), EntityId(1), 100),
            fragment(2, 10),
            fragment(3, 30),
        ]);
        registry.sort_by_priority();
        let order: Vec<u16> = registry.iter().map(|r| r.single_mask_id.raw()).collect();
        assert_eq!(order, vec![3, 2, 1]);
        assert_eq!(registry.get(MaskId(1)).unwrap().voxel_count, 100);
    }

    #[test]
    fn test_method_overrides() {
        let mut registry = RenderableRegistry::new();
        registry.set_method_override(EntityId(7), RenderMethod::NonRendering);
        assert_eq!(registry.method_override(EntityId(7)), Some(RenderMethod::NonRendering));
        assert_eq!(registry.clear_method_override(EntityId(7)), Some(RenderMethod::NonRendering));
        assert_eq!(registry.method_override(EntityId(7)), None);
    }
}
