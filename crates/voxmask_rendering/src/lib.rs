//! # VOXMASK Rendering
//!
//! Turns a scanned label volume into the lookup table the shader samples:
//! one color and one render method per mask id.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    MAPPING PIPELINE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Registry ──► Single entries ──┐                             │
//! │                                ├──► RenderMapping ──► Texels │
//! │  Interner ──► Composites ──────┘   (priority winner)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - Neuron fragments outrank compartments, which outrank whole samples
//! - Shader-excluded renderables never appear in the table
//! - Building never mutates the interner or the registry

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod integration;
pub mod mapping;
pub mod palette;

pub use integration::{CompositeReader, MockCompositeReader};
pub use mapping::{GpuRenderEntry, MappingStats, RenderMapBuilder, RenderMapping, TEXEL_SIZE};
pub use palette::{AutoPalette, AUTO_PALETTE_SIZE};
