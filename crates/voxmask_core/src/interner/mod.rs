//! # Mask Interner
//!
//! Turns "this voxel already holds `current`, and also belongs to
//! `discovered`" into the one id the voxel should hold from now on.
//!
//! ## Id layout
//!
//! ```text
//! 0 ............ first-1 | first ................................ limit-1
//! caller's single masks  | composites: counter →   (then retired pool)
//! ```
//!
//! The counter hands out fresh ids until it reaches the limit. After that,
//! only ids whose composite was retired (ref count zero) can be reused.
//! When both are gone the id space is exhausted and `resolve` returns
//! `None` (raw: `-1`); the caller keeps the voxel's previous value.
//!
//! ## Thread Safety
//!
//! Scanners may call `resolve` from several worker threads. The counter and
//! the retired pool are global, so every call takes the one interner lock.
//! Critical sections are a few hash map operations.

mod composite;
mod key;

pub use composite::{CompositeMask, InternerStats};
pub use key::CombinationKey;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::slice;

use voxmask_shared::{InternerConfig, MaskId, EXHAUSTED_SENTINEL};

/// Thread-safe composite mask interner.
///
/// # Example
///
/// ```rust
/// use voxmask_core::MaskInterner;
/// use voxmask_shared::MaskId;
///
/// let interner = MaskInterner::new();
/// interner.configure(MaskId(100));
///
/// // Voxel holds 3, object 7 also covers it.
/// let both = interner.resolve(MaskId(7), MaskId(3)).unwrap();
/// assert_eq!(both, MaskId(100));
/// assert_eq!(interner.expansion_count(both), 2);
/// ```
pub struct MaskInterner {
    state: Mutex<InternerState>,
}

impl MaskInterner {
    /// Creates an interner with the default config (composites from id 1).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(InternerConfig::default())
    }

    /// Creates an interner with explicit limits.
    #[must_use]
    pub fn with_config(config: InternerConfig) -> Self {
        Self {
            state: Mutex::new(InternerState::new(config)),
        }
    }

    /// Sets the first id composites may use and starts a fresh pass.
    ///
    /// Must be called before scanning, with an id above every single mask.
    /// Live composites and the retired pool are dropped, as by [`Self::reset`],
    /// so no id below or above the new counter can still be in use.
    pub fn configure(&self, first_allocatable_id: MaskId) {
        let mut state = self.state.lock();
        let config = InternerConfig {
            first_allocatable_id: first_allocatable_id.raw(),
            ..state.config
        };
        let dropped = state.composites.len();
        *state = InternerState::new(config);
        tracing::debug!(
            "Mask interner configured: first composite id {}, limit {}, {} live composites dropped",
            first_allocatable_id,
            config.id_space_limit,
            dropped
        );
    }

    /// Drops every composite and the retired pool.
    ///
    /// The counter restarts at the configured first id.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        let config = state.config;
        let dropped = state.composites.len();
        *state = InternerState::new(config);
        tracing::debug!("Mask interner reset: {} live composites dropped", dropped);
    }

    /// Resolves the id a voxel should hold after `discovered` is found in it.
    ///
    /// Returns `None` when the id space is exhausted; the voxel should keep
    /// `current` in that case. Unknown ids are treated as single masks.
    #[must_use]
    pub fn resolve(&self, discovered: MaskId, current: MaskId) -> Option<MaskId> {
        self.state.lock().resolve(discovered, current)
    }

    /// Raw form of [`Self::resolve`] for scanners storing signed labels.
    ///
    /// Returns [`EXHAUSTED_SENTINEL`] (`-1`) when the id space is exhausted.
    /// A `discovered` value outside the id space leaves `current` unchanged;
    /// a `current` value outside it is overwritten by `discovered`.
    #[must_use]
    pub fn resolve_raw(&self, discovered: i32, current: i32) -> i32 {
        let Some(discovered_id) = MaskId::from_raw(discovered) else {
            return current;
        };
        let Some(current_id) = MaskId::from_raw(current) else {
            return discovered;
        };
        self.resolve(discovered_id, current_id)
            .map_or(EXHAUSTED_SENTINEL, i32::from)
    }

    /// Number of single masks `id` stands for. 1 for anything not a live composite.
    #[must_use]
    pub fn expansion_count(&self, id: MaskId) -> usize {
        self.state
            .lock()
            .composites
            .get(&id)
            .map_or(1, CompositeMask::expansion_count)
    }

    /// Returns true if `id` is a live composite.
    #[must_use]
    pub fn is_composite(&self, id: MaskId) -> bool {
        self.state.lock().composites.contains_key(&id)
    }

    /// Copy of the live composite `id`, if any.
    #[must_use]
    pub fn composite(&self, id: MaskId) -> Option<CompositeMask> {
        self.state.lock().composites.get(&id).cloned()
    }

    /// Id currently interned for exactly this set of single masks.
    #[must_use]
    pub fn lookup(&self, constituents: &[MaskId]) -> Option<MaskId> {
        let key = CombinationKey::from_ids(constituents.iter().copied());
        self.state.lock().by_key.get(&key).copied()
    }

    /// Copies of all live composites, ordered by id.
    #[must_use]
    pub fn live_composites(&self) -> Vec<CompositeMask> {
        let mut live: Vec<CompositeMask> = self.state.lock().composites.values().cloned().collect();
        live.sort_unstable_by_key(|c| c.id);
        live
    }

    /// Visits every live composite while holding the lock. Order is unspecified.
    ///
    /// Do not call back into the interner from `f`.
    pub fn for_each_composite<F>(&self, mut f: F)
    where
        F: FnMut(&CompositeMask),
    {
        let state = self.state.lock();
        for composite in state.composites.values() {
            f(composite);
        }
    }

    /// Number of live composites.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.state.lock().composites.len()
    }

    /// Number of ids waiting in the retired pool.
    #[must_use]
    pub fn retired_count(&self) -> usize {
        self.state.lock().retired.len()
    }

    /// Id the next new combination would get. `None` once the space is spent.
    #[must_use]
    pub fn next_allocatable(&self) -> Option<MaskId> {
        let state = self.state.lock();
        if state.next_counter < state.config.id_space_limit {
            MaskId::from_counter(state.next_counter)
        } else {
            state.retired.last().copied()
        }
    }

    /// Current limits.
    #[must_use]
    pub fn config(&self) -> InternerConfig {
        self.state.lock().config
    }

    /// Every single mask sharing at least one voxel with `id`, ascending.
    ///
    /// Union of the constituents of all live composites containing `id`,
    /// without `id` itself. Empty for masks that never overlapped.
    #[must_use]
    pub fn overlapping_masks(&self, id: MaskId) -> Vec<MaskId> {
        let state = self.state.lock();
        let mut overlapping: Vec<MaskId> = state
            .composites
            .values()
            .filter(|c| c.constituents.contains(id))
            .flat_map(|c| c.constituents.ids().iter().copied())
            .filter(|&other| other != id)
            .collect();
        overlapping.sort_unstable();
        overlapping.dedup();
        overlapping
    }

    /// Logs every live composite at debug level, ordered by id.
    pub fn dump_composites(&self) {
        let live = self.live_composites();
        tracing::debug!("Mask interner holds {} live composites", live.len());
        for composite in &live {
            tracing::debug!(
                "  composite {} = [{}] ref_count {}",
                composite.id,
                composite.constituents,
                composite.ref_count
            );
        }
    }

    /// Counters since the last reset.
    #[must_use]
    pub fn stats(&self) -> InternerStats {
        let state = self.state.lock();
        InternerStats {
            live_composites: state.composites.len(),
            retired_pool: state.retired.len(),
            next_counter: state.next_counter,
            ..state.stats
        }
    }
}

impl Default for MaskInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything behind the interner lock.
struct InternerState {
    config: InternerConfig,
    /// Next sequential id. Reaches `config.id_space_limit` when spent.
    next_counter: u32,
    /// Live composites by id.
    composites: HashMap<MaskId, CompositeMask>,
    /// Live composites by canonical key.
    by_key: HashMap<CombinationKey, MaskId>,
    /// Ids of retired composites, reused once the counter is spent.
    retired: Vec<MaskId>,
    /// Set after the first exhaustion warning of this pass.
    exhaustion_reported: bool,
    stats: InternerStats,
}

impl InternerState {
    fn new(config: InternerConfig) -> Self {
        Self {
            config,
            next_counter: u32::from(config.first_allocatable_id),
            composites: HashMap::new(),
            by_key: HashMap::new(),
            retired: Vec::new(),
            exhaustion_reported: false,
            stats: InternerStats::default(),
        }
    }

    fn resolve(&mut self, discovered: MaskId, current: MaskId) -> Option<MaskId> {
        let (key, current_is_composite) = {
            // A composite handed in as `discovered` is flattened into its
            // single masks, so keys never nest.
            let incoming: &[MaskId] = match self.composites.get(&discovered) {
                Some(found) => found.constituents.ids(),
                None => slice::from_ref(&discovered),
            };

            match self.composites.get(&current) {
                Some(held) if held.constituents.contains_all(incoming) => return Some(current),
                Some(held) => (held.constituents.merged(incoming), true),
                None => {
                    let key = CombinationKey::from_ids(incoming.iter().copied().chain([current]));
                    if key.len() < 2 {
                        // `discovered == current`: nothing to combine.
                        return Some(current);
                    }
                    (key, false)
                }
            }
        };

        if let Some(max) = self.config.max_constituents {
            if key.len() > max {
                self.stats.max_depth_exceeded += 1;
                tracing::trace!("Combination [{}] exceeds {} constituents", key, max);
                return Some(current);
            }
        }

        if let Some(&hit) = self.by_key.get(&key) {
            if current_is_composite {
                self.release(current);
            }
            if let Some(existing) = self.composites.get_mut(&hit) {
                existing.ref_count += 1;
            }
            return Some(hit);
        }

        // Decide before touching `current`: on exhaustion the voxel keeps
        // its old id, so its ref count must stay as it is.
        let frees_current = current_is_composite
            && self.composites.get(&current).is_some_and(|held| held.ref_count == 1);
        if !self.can_allocate() && !frees_current {
            self.report_exhausted(&key);
            return None;
        }

        if current_is_composite {
            self.release(current);
        }

        let Some(id) = self.allocate() else {
            self.report_exhausted(&key);
            return None;
        };

        debug_assert!(
            key.ids().iter().all(|c| !self.composites.contains_key(c)),
            "composite constituents must be single masks"
        );

        self.by_key.insert(key.clone(), id);
        self.composites.insert(
            id,
            CompositeMask {
                id,
                constituents: key,
                ref_count: 1,
            },
        );
        self.stats.composites_created += 1;
        Some(id)
    }

    /// Drops one voxel reference from `id`, retiring it at zero.
    ///
    /// Retirement purges the key entry as well, so a recycled id can never
    /// be reached through its previous combination.
    fn release(&mut self, id: MaskId) {
        let Some(held) = self.composites.get_mut(&id) else {
            return;
        };
        held.ref_count = held.ref_count.saturating_sub(1);
        if held.ref_count > 0 {
            return;
        }
        if let Some(retired) = self.composites.remove(&id) {
            if self.by_key.get(&retired.constituents) == Some(&id) {
                self.by_key.remove(&retired.constituents);
            }
        }
        self.retired.push(id);
        self.stats.composites_retired += 1;
    }

    fn can_allocate(&self) -> bool {
        self.next_counter < self.config.id_space_limit || !self.retired.is_empty()
    }

    /// Next fresh id, else a recycled one.
    fn allocate(&mut self) -> Option<MaskId> {
        if self.next_counter < self.config.id_space_limit {
            if let Some(id) = MaskId::from_counter(self.next_counter) {
                self.next_counter += 1;
                return Some(id);
            }
        }
        let id = self.retired.pop()?;
        self.stats.ids_recycled += 1;
        Some(id)
    }

    fn report_exhausted(&mut self, key: &CombinationKey) {
        self.stats.exhaustion_events += 1;
        if !self.exhaustion_reported {
            self.exhaustion_reported = true;
            tracing::warn!(
                "Mask id space exhausted at {} (first composite id {}); combination [{}] left unresolved",
                self.config.id_space_limit,
                self.config.first_allocatable_id,
                key
            );
        }
    }
}
