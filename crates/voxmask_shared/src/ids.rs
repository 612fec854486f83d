//! # Mask and Entity Identifiers
//!
//! Every voxel of the label volume holds one 16-bit mask id. The id space is
//! shared: the caller hands out single-mask ids from the bottom, the interner
//! allocates composite ids above them.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Total number of ids a 16-bit label channel can address.
pub const ID_SPACE_SIZE: u32 = 65_536;

/// Value returned by raw resolution when the id space is exhausted.
pub const EXHAUSTED_SENTINEL: i32 = -1;

/// Id stored in one voxel of the label volume (16-bit).
///
/// Either a single mask (one renderable) or a composite mask (an interned
/// set of single masks). The type itself does not know which; only the
/// interner does.
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MaskId(pub u16);

impl MaskId {
    /// Empty voxel.
    pub const EMPTY: Self = Self(0);

    /// Largest id the label channel can hold.
    pub const MAX: Self = Self(u16::MAX);

    /// Creates a mask id.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Index into a dense per-id table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Converts a signed scanner value, rejecting anything outside the id space.
    #[inline]
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        u16::try_from(raw).ok().map(Self)
    }

    /// Converts an allocation counter value, rejecting values past the id space.
    #[inline]
    #[must_use]
    pub fn from_counter(counter: u32) -> Option<Self> {
        u16::try_from(counter).ok().map(Self)
    }
}

impl From<u16> for MaskId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl From<MaskId> for i32 {
    fn from(id: MaskId) -> Self {
        i32::from(id.0)
    }
}

impl fmt::Display for MaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id of the domain object backing a renderable.
///
/// Render-method overrides are keyed by this id, not by mask id, because the
/// caller re-numbers masks on every load while entities stay put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Creates an entity id.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}
