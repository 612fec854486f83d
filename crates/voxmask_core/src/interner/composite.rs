//! Composite masks and interner statistics.

use voxmask_shared::MaskId;

use super::key::CombinationKey;

/// One interned combination of single masks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeMask {
    /// Id written into the label volume.
    pub id: MaskId,
    /// Single-mask ids this composite stands for. Never composite ids.
    pub constituents: CombinationKey,
    /// Voxels currently holding `id`.
    pub ref_count: u32,
}

impl CompositeMask {
    /// Number of single masks represented.
    #[inline]
    #[must_use]
    pub fn expansion_count(&self) -> usize {
        self.constituents.len()
    }
}

/// Counters describing one scan pass.
///
/// The board reads these after a load to tell the user that some overlaps
/// could not be represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InternerStats {
    /// Composites created since the last reset.
    pub composites_created: u64,
    /// Composites whose ref count dropped to zero.
    pub composites_retired: u64,
    /// Allocations served from the retired pool.
    pub ids_recycled: u64,
    /// `resolve` calls that found the id space exhausted.
    pub exhaustion_events: u64,
    /// `resolve` calls whose combination exceeded the constituent limit.
    pub max_depth_exceeded: u64,
    /// Composites with a non-zero ref count.
    pub live_composites: usize,
    /// Ids waiting in the retired pool.
    pub retired_pool: usize,
    /// Next value of the sequential counter.
    pub next_counter: u32,
}

impl InternerStats {
    /// Returns true if at least one overlap could not get an id.
    #[must_use]
    pub const fn masks_exhausted(&self) -> bool {
        self.exhaustion_events > 0
    }

    /// Returns true if any overlap was dropped, for either reason.
    #[must_use]
    pub const fn has_dropped_overlaps(&self) -> bool {
        self.exhaustion_events > 0 || self.max_depth_exceeded > 0
    }
}
