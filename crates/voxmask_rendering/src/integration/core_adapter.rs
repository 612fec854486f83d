//! Core Adapter - reads live composites straight out of `voxmask_core`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let interner = MaskInterner::new();
//! // ... scan completes ...
//! let mapping = RenderMapBuilder::new().build_mapping(&registry, &interner);
//! ```
//!
//! The interner lock is held for the whole visit. Do not build a mapping
//! while a scan is still resolving voxels on the same interner.

use voxmask_core::MaskInterner;
use voxmask_shared::MaskId;

use super::reader::CompositeReader;

impl CompositeReader for MaskInterner {
    fn for_each_composite<F>(&self, mut f: F)
    where
        F: FnMut(MaskId, &[MaskId]),
    {
        MaskInterner::for_each_composite(self, |composite| {
            f(composite.id, composite.constituents.ids());
        });
    }
}
