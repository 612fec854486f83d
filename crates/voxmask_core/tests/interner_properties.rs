//! # Interner Property Tests
//!
//! Drives the interner the way a volume scan does and checks the
//! properties the label volume relies on:
//!
//! 1. **Idempotence**: re-resolving a known combination creates nothing new
//! 2. **Commutativity**: discovery order never changes the final id
//! 3. **Conservation**: ref counts plus plain voxels account for every discovery
//! 4. **Recycling / Exhaustion**: behavior at the top of the 16-bit id space
//!
//! Run with: cargo test -p voxmask_core --test interner_properties

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use voxmask_core::MaskInterner;
use voxmask_shared::{InternerConfig, MaskId, ID_SPACE_SIZE};

/// Minimal label volume: 0 is empty, anything else is a mask id.
struct LabelVolume {
    voxels: Vec<u16>,
}

impl LabelVolume {
    fn new(len: usize) -> Self {
        Self { voxels: vec![0; len] }
    }

    /// What a scanner does when `object` is found in voxel `index`.
    fn discover(&mut self, interner: &MaskInterner, index: usize, object: MaskId) {
        let current = self.voxels[index];
        if current == 0 {
            self.voxels[index] = object.raw();
        } else if let Some(id) = interner.resolve(object, MaskId(current)) {
            self.voxels[index] = id.raw();
        }
    }
}

fn interner_from(first: u16) -> MaskInterner {
    MaskInterner::with_config(InternerConfig::starting_at(MaskId(first)))
}

// ============================================================================
// IDEMPOTENCE & COMMUTATIVITY
// ============================================================================

#[test]
fn test_idempotent_reresolve() {
    let interner = interner_from(1000);
    let abc = {
        let ab = interner.resolve(MaskId(2), MaskId(1)).unwrap();
        interner.resolve(MaskId(3), ab).unwrap()
    };
    let live_before = interner.live_count();

    for object in [1, 2, 3] {
        assert_eq!(interner.resolve(MaskId(object), abc), Some(abc));
    }
    assert_eq!(interner.live_count(), live_before);
    assert_eq!(interner.composite(abc).unwrap().ref_count, 1);
}

#[test]
fn test_every_permutation_gives_same_id() {
    let permutations: [[u16; 3]; 6] = [
        [1, 2, 3],
        [1, 3, 2],
        [2, 1, 3],
        [2, 3, 1],
        [3, 1, 2],
        [3, 2, 1],
    ];

    let interner = interner_from(1000);
    let mut volume = LabelVolume::new(permutations.len());
    for (voxel, order) in permutations.iter().enumerate() {
        for &object in order {
            volume.discover(&interner, voxel, MaskId(object));
        }
    }

    let first = volume.voxels[0];
    assert!(volume.voxels.iter().all(|&v| v == first));
    let composite = interner.composite(MaskId(first)).unwrap();
    assert_eq!(composite.ref_count, 6);
    assert_eq!(interner.lookup(&[MaskId(3), MaskId(1), MaskId(2)]), Some(MaskId(first)));
}

// ============================================================================
// CONSERVATION
// ============================================================================

#[test]
fn test_reference_conservation() {
    const VOXELS: usize = 20_000;
    const OBJECTS: u16 = 12;

    let interner = interner_from(OBJECTS + 1);
    let mut volume = LabelVolume::new(VOXELS);
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut discovered: HashMap<u16, u64> = HashMap::new();

    for voxel in 0..VOXELS {
        let mut objects: Vec<u16> = (1..=OBJECTS).filter(|_| rng.gen_range(0..4) == 0).collect();
        objects.shuffle(&mut rng);
        for object in objects {
            volume.discover(&interner, voxel, MaskId(object));
            *discovered.entry(object).or_default() += 1;
        }
    }

    let live = interner.live_composites();
    assert!(!live.is_empty());
    for object in 1..=OBJECTS {
        let plain = volume.voxels.iter().filter(|&&v| v == object).count() as u64;
        let shared: u64 = live
            .iter()
            .filter(|c| c.constituents.contains(MaskId(object)))
            .map(|c| u64::from(c.ref_count))
            .sum();
        assert_eq!(
            plain + shared,
            discovered.get(&object).copied().unwrap_or(0),
            "object {object} lost track of voxels"
        );
    }

    // Every composite id in the volume is live and its ref count matches.
    let mut held: HashMap<u16, u32> = HashMap::new();
    for &v in &volume.voxels {
        if v > OBJECTS {
            *held.entry(v).or_default() += 1;
        }
    }
    assert_eq!(held.len(), live.len());
    for composite in &live {
        assert_eq!(held.get(&composite.id.raw()).copied(), Some(composite.ref_count));
        assert!(composite.constituents.ids().iter().all(|c| c.raw() <= OBJECTS));
    }
}

// ============================================================================
// RECYCLING & EXHAUSTION
// ============================================================================

#[test]
fn test_recycling_at_capacity() {
    let first = u16::try_from(ID_SPACE_SIZE - 2).unwrap();
    let interner = interner_from(first);

    let x = interner.resolve(MaskId(2), MaskId(1)).unwrap();
    let y = interner.resolve(MaskId(3), MaskId(1)).unwrap();
    assert_eq!((x.raw(), y.raw()), (65_534, 65_535));
    assert_eq!(interner.stats().next_counter, ID_SPACE_SIZE);

    // x's only voxel grows to {1,2,3}; x's id is retired and reused at once.
    let z = interner.resolve(MaskId(3), x).unwrap();
    assert_eq!(z, x);

    // y's voxel joins the existing {1,2,3}; y retires with nothing taking it.
    assert_eq!(interner.resolve(MaskId(2), y), Some(z));
    assert_eq!(interner.retired_count(), 1);

    // The next new combination takes y's id instead of running past 65535.
    let w = interner.resolve(MaskId(5), MaskId(4)).unwrap();
    assert_eq!(w, y);
    assert_eq!(interner.stats().next_counter, ID_SPACE_SIZE);

    // Nothing left anywhere.
    assert_eq!(interner.resolve(MaskId(7), MaskId(6)), None);
    assert_eq!(interner.resolve_raw(7, 6), -1);
    assert!(interner.stats().masks_exhausted());
}

#[test]
fn test_exhaustion_leaves_voxel_untouched() {
    let first = u16::try_from(ID_SPACE_SIZE - 1).unwrap();
    let interner = interner_from(first);
    let mut volume = LabelVolume::new(3);

    volume.discover(&interner, 0, MaskId(1));
    volume.discover(&interner, 0, MaskId(2));
    volume.discover(&interner, 1, MaskId(1));
    volume.discover(&interner, 1, MaskId(2));
    volume.discover(&interner, 2, MaskId(3));
    volume.discover(&interner, 2, MaskId(4));

    assert_eq!(volume.voxels[0], 65_535);
    assert_eq!(volume.voxels[1], 65_535);
    assert_eq!(volume.voxels[2], 3, "exhausted voxel keeps its previous id");
    assert_eq!(interner.composite(MaskId(65_535)).unwrap().ref_count, 2);
}

// ============================================================================
// CONCURRENT SCAN
// ============================================================================

#[test]
fn test_concurrent_regions_agree() {
    const THREADS: u64 = 8;
    const VOXELS_PER_THREAD: usize = 2_000;
    const OBJECTS: u16 = 6;

    let interner = Arc::new(interner_from(OBJECTS + 1));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let interner = Arc::clone(&interner);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(t);
                let mut region = LabelVolume::new(VOXELS_PER_THREAD);
                let mut sets = Vec::with_capacity(VOXELS_PER_THREAD);
                for voxel in 0..VOXELS_PER_THREAD {
                    let mut objects: Vec<u16> = (1..=OBJECTS).filter(|_| rng.gen_range(0..3) == 0).collect();
                    objects.shuffle(&mut rng);
                    for &object in &objects {
                        region.discover(&interner, voxel, MaskId(object));
                    }
                    objects.sort_unstable();
                    sets.push(objects);
                }
                (region.voxels, sets)
            })
        })
        .collect();

    let mut id_for_set: HashMap<Vec<u16>, u16> = HashMap::new();
    let mut held: HashMap<u16, u32> = HashMap::new();
    for handle in handles {
        let (voxels, sets) = handle.join().unwrap();
        for (value, set) in voxels.into_iter().zip(sets) {
            if set.len() < 2 {
                continue;
            }
            let expected = *id_for_set.entry(set).or_insert(value);
            assert_eq!(value, expected, "same object set must share one id across threads");
            *held.entry(value).or_default() += 1;
        }
    }

    assert_eq!(interner.live_count(), held.len());
    for (id, count) in held {
        assert_eq!(interner.composite(MaskId(id)).unwrap().ref_count, count);
    }
}
