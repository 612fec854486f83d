//! # VOXMASK Core
//!
//! Composite mask interning for 16-bit label volumes.
//!
//! Several segmented objects can cover the same voxel, but the voxel holds
//! one id. The [`MaskInterner`] maps each distinct set of overlapping single
//! masks to one reusable composite id, counts how many voxels hold it, and
//! recycles the id once no voxel does.
//!
//! ## Architecture Rules
//!
//! 1. **Flat composites** - a composite lists single masks only, never other composites
//! 2. **Canonical keys** - the same set always resolves to the same live id
//! 3. **No panics on exhaustion** - a spent id space is reported, not raised
//!
//! ## Example
//!
//! ```rust
//! use voxmask_core::MaskInterner;
//! use voxmask_shared::{InternerConfig, MaskId};
//!
//! let interner = MaskInterner::with_config(InternerConfig::starting_at(MaskId(10)));
//! let ab = interner.resolve(MaskId(1), MaskId(2)).unwrap();
//! let abc = interner.resolve(MaskId(3), ab).unwrap();
//! assert_eq!(interner.expansion_count(abc), 3);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod interner;

pub use interner::{CombinationKey, CompositeMask, InternerStats, MaskInterner};
