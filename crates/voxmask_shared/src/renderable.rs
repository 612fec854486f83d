//! # Renderable Descriptors
//!
//! One descriptor per object the viewer combines into the label volume:
//! neuron fragments, reference channels, compartments, compartment sets.
//! Descriptors are created once per scan pass and are not mutated while a
//! render map is being built.

use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};

use crate::ids::{EntityId, MaskId};
use crate::render::{RenderMethod, Rgb};

/// Object category. Decides who wins a shared voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Segmented neuron fragment.
    NeuronFragment,
    /// Anatomical compartment.
    Compartment,
    /// Whole sample (reference channel).
    Sample,
    /// Set of compartments.
    CompartmentSet,
}

impl Category {
    /// Rank used when no category is known. Loses to every real category.
    pub const DEFAULT_RANK: u8 = 11;

    /// Priority rank. Lower rank wins.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::NeuronFragment => 1,
            Self::Compartment => 3,
            Self::Sample => 9,
            Self::CompartmentSet => 10,
        }
    }

    /// Rank of an optional category, falling back to [`Self::DEFAULT_RANK`].
    #[inline]
    #[must_use]
    pub fn rank_of(category: Option<Self>) -> u8 {
        category.map_or(Self::DEFAULT_RANK, Self::rank)
    }
}

/// Caller-chosen color for a renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExplicitColor {
    /// Color.
    pub color: Rgb,
    /// Render method carried with the color.
    pub method: RenderMethod,
}

impl ExplicitColor {
    /// Creates an explicit color.
    #[must_use]
    pub const fn new(color: Rgb, method: RenderMethod) -> Self {
        Self { color, method }
    }
}

/// Everything the interner and renderer need to know about one renderable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderableDescriptor {
    /// Single-mask id, unique within a registry.
    pub single_mask_id: MaskId,
    /// Category, if the loader could determine one.
    pub category: Option<Category>,
    /// Number of voxels. Only used to break priority ties.
    pub voxel_count: u64,
    /// Backing domain object. `None` marks a pass-through channel.
    pub backing_entity: Option<EntityId>,
    /// Explicit color set by the caller.
    pub explicit_color: Option<ExplicitColor>,
    /// Keeps the descriptor out of the shader lookup table entirely.
    pub shader_excluded: bool,
}

impl RenderableDescriptor {
    /// Creates a descriptor with no backing entity, no color and no category.
    #[must_use]
    pub const fn new(single_mask_id: MaskId) -> Self {
        Self {
            single_mask_id,
            category: None,
            voxel_count: 0,
            backing_entity: None,
            explicit_color: None,
            shader_excluded: false,
        }
    }

    /// Creates a neuron fragment backed by `entity`.
    #[must_use]
    pub fn fragment(single_mask_id: MaskId, entity: EntityId, voxel_count: u64) -> Self {
        Self::new(single_mask_id)
            .with_category(Category::NeuronFragment)
            .with_entity(entity)
            .with_voxel_count(voxel_count)
    }

    /// Creates a compartment backed by `entity`.
    #[must_use]
    pub fn compartment(single_mask_id: MaskId, entity: EntityId, voxel_count: u64) -> Self {
        Self::new(single_mask_id)
            .with_category(Category::Compartment)
            .with_entity(entity)
            .with_voxel_count(voxel_count)
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the backing entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.backing_entity = Some(entity);
        self
    }

    /// Sets the voxel count.
    #[must_use]
    pub fn with_voxel_count(mut self, voxel_count: u64) -> Self {
        self.voxel_count = voxel_count;
        self
    }

    /// Sets an explicit color and method.
    #[must_use]
    pub fn with_color(mut self, color: Rgb, method: RenderMethod) -> Self {
        self.explicit_color = Some(ExplicitColor::new(color, method));
        self
    }

    /// Marks the descriptor as not used by the shader.
    #[must_use]
    pub fn excluded_from_shader(mut self) -> Self {
        self.shader_excluded = true;
        self
    }

    /// Priority rank of this descriptor's category.
    #[inline]
    #[must_use]
    pub fn rank(&self) -> u8 {
        Category::rank_of(self.category)
    }

    /// Compares two descriptors by render priority.
    ///
    /// `Ordering::Less` means `self` wins. Lower rank first, then larger
    /// voxel count, then the smaller mask id so ties never depend on
    /// iteration order.
    #[must_use]
    pub fn cmp_priority(&self, other: &Self) -> Ordering {
        self.priority_key().cmp(&other.priority_key())
    }

    fn priority_key(&self) -> (u8, Reverse<u64>, MaskId) {
        (self.rank(), Reverse(self.voxel_count), self.single_mask_id)
    }
}
