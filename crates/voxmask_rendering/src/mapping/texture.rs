//! GPU lookup texture layout.
//!
//! One RGBA8 texel per mask id, uploaded as a 1-D texture:
//! - Bytes 0-2: color (R, G, B)
//! - Byte 3: render method code (NOT alpha)
//!
//! Full 16-bit table: 65,536 × 4 bytes = 256KB.

use bytemuck::{Pod, Zeroable};
use voxmask_shared::{RenderEntry, ID_SPACE_SIZE};

/// Size of one texel in bytes.
pub const TEXEL_SIZE: usize = 4;

/// Texel count of a table covering the whole id space.
pub const FULL_TABLE_LEN: usize = ID_SPACE_SIZE as usize;

/// One texel of the lookup texture.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct GpuRenderEntry(pub [u8; TEXEL_SIZE]);

impl GpuRenderEntry {
    /// Texel for ids without a mapping: black, not rendered.
    pub const UNMAPPED: Self = Self(RenderEntry::UNMAPPED.to_texel());

    /// Packs an entry.
    #[inline]
    #[must_use]
    pub const fn from_entry(entry: RenderEntry) -> Self {
        Self(entry.to_texel())
    }
}

impl From<RenderEntry> for GpuRenderEntry {
    fn from(entry: RenderEntry) -> Self {
        Self::from_entry(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texel_size() {
        assert_eq!(std::mem::size_of::<GpuRenderEntry>(), TEXEL_SIZE);
        assert_eq!(FULL_TABLE_LEN * TEXEL_SIZE, 262_144); // 256KB
    }

    #[test]
    fn test_unmapped_is_zero() {
        assert_eq!(GpuRenderEntry::UNMAPPED, GpuRenderEntry::zeroed());
    }
}
