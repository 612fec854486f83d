//! Automatic colors for renderables without an explicit one.

use voxmask_shared::{MaskId, Rgb};

/// Number of automatic colors.
pub const AUTO_PALETTE_SIZE: usize = 8;

/// Fixed palette indexed by `single_mask_id mod 8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPalette {
    /// Palette colors.
    pub colors: [Rgb; AUTO_PALETTE_SIZE],
}

impl AutoPalette {
    /// Default fragment colors.
    pub const DEFAULT: Self = Self {
        colors: [
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(255, 255, 0),
            Rgb::new(255, 0, 255),
            Rgb::new(0, 255, 255),
            Rgb::new(255, 128, 0),
            Rgb::new(128, 0, 255),
        ],
    };

    /// Color for a single mask.
    #[inline]
    #[must_use]
    pub const fn color_for(&self, id: MaskId) -> Rgb {
        self.colors[id.index() % AUTO_PALETTE_SIZE]
    }
}

impl Default for AutoPalette {
    fn default() -> Self {
        Self::DEFAULT
    }
}
