//! # Interner Integration Layer
//!
//! ```text
//! ┌──────────────┐  resolve()   ┌───────────────┐  CompositeReader  ┌──────────────────┐
//! │ Volume scan  │ ───────────► │ MaskInterner  │ ────────────────► │ RenderMapBuilder │ ──► GPU
//! └──────────────┘              └───────────────┘      (read)       └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. We only READ interner state (never resolve, never reset)
//! 2. The scan finishes before the mapping is built

mod core_adapter;
pub mod reader;

pub use reader::{CompositeReader, MockCompositeReader};
