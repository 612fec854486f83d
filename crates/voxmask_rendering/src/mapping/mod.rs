//! # Render-Map Builder
//!
//! Decides, for every id that can appear in the label volume, which color
//! and render method the shader applies.
//!
//! ## Algorithm
//!
//! 1. **Single masks**: explicit color if the caller set one, otherwise the
//!    auto palette with `Fragment` (backed) or `PassThrough` (reference
//!    channel). A backing-entity override replaces the method only.
//!    Shader-excluded renderables get no entry at all.
//! 2. **Composites**: copy the entry of the highest-priority constituent
//!    that has an entry and renders. No such constituent, no entry.
//!
//! Priority is category rank first (fragment 1, compartment 3, sample 9,
//! compartment set 10), then the larger voxel count.
//!
//! The build reads its inputs and nothing else. Same inputs, same mapping.

mod texture;

pub use texture::{GpuRenderEntry, FULL_TABLE_LEN, TEXEL_SIZE};

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use voxmask_shared::{MaskId, RenderEntry, RenderMethod, RenderableDescriptor, RenderableRegistry};

use crate::integration::CompositeReader;
use crate::palette::AutoPalette;

/// Counters from one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingStats {
    /// Single masks with an entry.
    pub single_entries: usize,
    /// Composites with an entry.
    pub composite_entries: usize,
    /// Composites left out because no constituent renders.
    pub composites_omitted: usize,
    /// Renderables left out because they are shader-excluded.
    pub excluded_renderables: usize,
}

/// Id to render entry table produced by [`RenderMapBuilder::build_mapping`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderMapping {
    entries: BTreeMap<MaskId, RenderEntry>,
    stats: MappingStats,
}

impl RenderMapping {
    /// Entry for `id`, if mapped.
    #[must_use]
    pub fn get(&self, id: MaskId) -> Option<RenderEntry> {
        self.entries.get(&id).copied()
    }

    /// Returns true if `id` has an entry.
    #[must_use]
    pub fn contains(&self, id: MaskId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of mapped ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mapped ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (MaskId, RenderEntry)> + '_ {
        self.entries.iter().map(|(&id, &entry)| (id, entry))
    }

    /// Counters from the build that produced this mapping.
    #[must_use]
    pub fn stats(&self) -> MappingStats {
        self.stats
    }

    /// Smallest texture length that covers every mapped id.
    #[must_use]
    pub fn texture_len(&self) -> usize {
        self.entries.keys().next_back().map_or(0, |id| id.index() + 1)
    }

    /// Dense texel table of `len` entries. Unmapped ids get [`GpuRenderEntry::UNMAPPED`].
    ///
    /// Ids at or beyond `len` are dropped.
    #[must_use]
    pub fn to_texture(&self, len: usize) -> Vec<GpuRenderEntry> {
        let mut table = vec![GpuRenderEntry::UNMAPPED; len];
        for (&id, &entry) in self.entries.range(..) {
            match table.get_mut(id.index()) {
                Some(texel) => *texel = GpuRenderEntry::from_entry(entry),
                None => break,
            }
        }
        table
    }

    /// Dense table covering the whole 16-bit id space.
    #[must_use]
    pub fn to_full_texture(&self) -> Vec<GpuRenderEntry> {
        self.to_texture(FULL_TABLE_LEN)
    }

    /// Raw bytes of [`Self::to_texture`], ready for upload.
    #[must_use]
    pub fn texture_bytes(&self, len: usize) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_texture(len)).to_vec()
    }
}

/// Builds [`RenderMapping`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderMapBuilder {
    palette: AutoPalette,
}

impl RenderMapBuilder {
    /// Creates a builder with the default palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with a custom auto palette.
    #[must_use]
    pub const fn with_palette(palette: AutoPalette) -> Self {
        Self { palette }
    }

    /// Builds the id to render entry table.
    ///
    /// Reads `registry` and `composites` only. Must not run while a scan is
    /// still resolving voxels on the same interner.
    #[must_use]
    pub fn build_mapping<R>(&self, registry: &RenderableRegistry, composites: &R) -> RenderMapping
    where
        R: CompositeReader + ?Sized,
    {
        let mut stats = MappingStats::default();
        let mut entries: BTreeMap<MaskId, RenderEntry> = BTreeMap::new();

        for descriptor in registry.iter() {
            if descriptor.shader_excluded {
                stats.excluded_renderables += 1;
                continue;
            }
            entries.insert(descriptor.single_mask_id, self.single_entry(registry, descriptor));
        }
        stats.single_entries = entries.len();

        let mut resolved: Vec<(MaskId, RenderEntry)> = Vec::new();
        composites.for_each_composite(|id, constituents| {
            match Self::winning_entry(registry, &entries, constituents) {
                Some(entry) => resolved.push((id, entry)),
                None => {
                    stats.composites_omitted += 1;
                    tracing::trace!("Composite {} has no rendering constituent", id);
                }
            }
        });

        for (id, entry) in resolved {
            if let Entry::Vacant(slot) = entries.entry(id) {
                slot.insert(entry);
                stats.composite_entries += 1;
            } else {
                tracing::warn!("Composite id {} collides with a single mask id; single mask kept", id);
            }
        }

        tracing::debug!(
            "Render mapping built: {} single, {} composite, {} composites omitted, {} excluded",
            stats.single_entries,
            stats.composite_entries,
            stats.composites_omitted,
            stats.excluded_renderables
        );

        RenderMapping { entries, stats }
    }

    fn single_entry(&self, registry: &RenderableRegistry, descriptor: &RenderableDescriptor) -> RenderEntry {
        let mut entry = match descriptor.explicit_color {
            Some(explicit) => RenderEntry::new(explicit.color, explicit.method),
            None => {
                let method = if descriptor.backing_entity.is_some() {
                    RenderMethod::Fragment
                } else {
                    RenderMethod::PassThrough
                };
                RenderEntry::new(self.palette.color_for(descriptor.single_mask_id), method)
            }
        };
        if let Some(method) = descriptor
            .backing_entity
            .and_then(|entity| registry.method_override(entity))
        {
            entry.method = method;
        }
        entry
    }

    /// Entry of the highest-priority rendering constituent.
    fn winning_entry(
        registry: &RenderableRegistry,
        entries: &BTreeMap<MaskId, RenderEntry>,
        constituents: &[MaskId],
    ) -> Option<RenderEntry> {
        constituents
            .iter()
            .filter_map(|id| {
                let entry = entries.get(id)?;
                if !entry.method.is_rendering() {
                    return None;
                }
                Some((registry.get(*id)?, *entry))
            })
            .min_by(|a, b| a.0.cmp_priority(b.0))
            .map(|(_, entry)| entry)
    }
}
