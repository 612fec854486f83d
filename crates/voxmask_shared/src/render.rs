//! Render methods and colors as the shader sees them.
//!
//! The shader reads one RGBA8 texel per mask id. The fourth byte is NOT
//! alpha: it is the render method code. On the CPU side the two are kept
//! apart in [`RenderEntry`] and only packed at upload time.

use serde::{Deserialize, Serialize};

/// How the shader composites the voxels of one mask id.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMethod {
    /// Voxels are not drawn.
    #[default]
    NonRendering = 0,
    /// Signal blended with the mask color.
    Fragment = 1,
    /// Raw signal, mask color ignored (reference channels).
    PassThrough = 2,
    /// Solid compartment shading.
    Compartment = 3,
}

impl RenderMethod {
    /// Byte code written into the fourth texel channel.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a texel byte. Unknown codes are treated as non-rendering.
    #[inline]
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Fragment,
            2 => Self::PassThrough,
            3 => Self::Compartment,
            _ => Self::NonRendering,
        }
    }

    /// Returns true if the shader draws anything for this method.
    #[inline]
    #[must_use]
    pub const fn is_rendering(self) -> bool {
        !matches!(self, Self::NonRendering)
    }
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a color.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Color plus render method for one mask id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderEntry {
    /// Mask color.
    pub color: Rgb,
    /// Render method code.
    pub method: RenderMethod,
}

impl RenderEntry {
    /// Entry the shader uses for ids without a mapping.
    pub const UNMAPPED: Self = Self::new(Rgb::BLACK, RenderMethod::NonRendering);

    /// Creates an entry.
    #[inline]
    #[must_use]
    pub const fn new(color: Rgb, method: RenderMethod) -> Self {
        Self { color, method }
    }

    /// Packs the entry into the 4-byte texel layout.
    #[inline]
    #[must_use]
    pub const fn to_texel(self) -> [u8; 4] {
        [self.color.r, self.color.g, self.color.b, self.method.code()]
    }
}
