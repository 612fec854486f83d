//! Canonical combination keys.
//!
//! A key is the sorted, deduplicated set of single-mask ids covering a
//! voxel. Two voxels covered by the same objects produce equal keys no
//! matter in which order the objects were discovered.

use std::fmt;

use voxmask_shared::MaskId;

/// Sorted, deduplicated set of single-mask ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CombinationKey(Box<[MaskId]>);

impl CombinationKey {
    /// Builds a key from ids in any order, with or without duplicates.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = MaskId>) -> Self {
        let mut ids: Vec<MaskId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids.into_boxed_slice())
    }

    /// Returns a new key holding `self ∪ extra`.
    ///
    /// Linear in the combined length; both sides are already sorted.
    #[must_use]
    pub fn merged(&self, extra: &[MaskId]) -> Self {
        let mut out = Vec::with_capacity(self.0.len() + extra.len());
        out.extend_from_slice(&self.0);
        for &id in extra {
            if let Err(pos) = out.binary_search(&id) {
                out.insert(pos, id);
            }
        }
        Self(out.into_boxed_slice())
    }

    /// Returns true if `id` is part of the set.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: MaskId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    /// Returns true if every id in `ids` is part of the set.
    #[must_use]
    pub fn contains_all(&self, ids: &[MaskId]) -> bool {
        ids.iter().all(|&id| self.contains(id))
    }

    /// Ids in ascending order.
    #[inline]
    #[must_use]
    pub fn ids(&self) -> &[MaskId] {
        &self.0
    }

    /// Number of ids.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Space-joined ascending ids, e.g. `"3 7 12"`.
impl fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for id in self.0.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{id}")?;
            first = false;
        }
        Ok(())
    }
}
