//! Composite Reader - the only way the builder sees interner state.

use voxmask_shared::MaskId;

/// Read access to live composites.
///
/// Implemented for [`voxmask_core::MaskInterner`]; tests use
/// [`MockCompositeReader`].
pub trait CompositeReader {
    /// Calls `f` with every live composite id and its single-mask constituents.
    fn for_each_composite<F>(&self, f: F)
    where
        F: FnMut(MaskId, &[MaskId]);
}

/// Fixed list of composites for testing (without an interner).
#[derive(Debug, Clone, Default)]
pub struct MockCompositeReader {
    /// Composites: (id, constituents).
    pub composites: Vec<(MaskId, Vec<MaskId>)>,
}

impl MockCompositeReader {
    /// Creates an empty reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a composite.
    #[must_use]
    pub fn with(mut self, id: MaskId, constituents: &[MaskId]) -> Self {
        self.composites.push((id, constituents.to_vec()));
        self
    }
}

impl CompositeReader for MockCompositeReader {
    fn for_each_composite<F>(&self, mut f: F)
    where
        F: FnMut(MaskId, &[MaskId]),
    {
        for (id, constituents) in &self.composites {
            f(*id, constituents);
        }
    }
}
