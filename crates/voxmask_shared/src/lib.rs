//! # VOXMASK Shared
//!
//! Plain data shared by the mask interner and the render-map builder:
//! mask ids, render methods, renderable descriptors, the renderable
//! registry and the settings file.
//!
//! ## RULE
//!
//! This crate must NEVER depend on:
//! - a GPU crate
//! - a lock
//!
//! The interner owns its lock in `voxmask_core`, the GPU table layout
//! lives in `voxmask_rendering`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod registry;
pub mod render;
pub mod renderable;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use ids::{EntityId, MaskId, EXHAUSTED_SENTINEL, ID_SPACE_SIZE};
pub use registry::{RegistryFilter, RenderableRegistry};
pub use render::{RenderEntry, RenderMethod, Rgb};
pub use renderable::{Category, ExplicitColor, RenderableDescriptor};
pub use settings::{InternerConfig, VoxmaskSettings};
