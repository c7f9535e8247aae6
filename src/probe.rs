//! Slot index functions.
//!
//! Two distinct operations map a hash to a slot:
//!
//! - [`locate_chain_head`] is the primary index `hash & mask`. Lookups,
//!   updates, insertions and deletions only ever look there.
//! - [`find_free_slot_for_migration`] walks the perturbed [`ProbeSeq`] and
//!   picks the slot that receives a chain head while the slot array is
//!   rebuilt.

/// Multiplier of the probe recurrence.
const PROBE_MULTIPLIER: u64 = 5;

/// Right shift applied to the perturbation source after every probe.
const PERTURB_SHIFT: u32 = 5;

/// Probes after which any 64-bit perturbation source has been shifted to
/// zero. From then on the recurrence is `5 * index + 1`, which has full
/// period over any power-of-two table of at least 4 slots.
const PERTURB_STEPS: usize = (u64::BITS / PERTURB_SHIFT) as usize + 1;

/// Returns the primary slot index for `hash` in a table with `mask`.
#[inline(always)]
pub fn locate_chain_head(hash: u64, mask: usize) -> usize {
    (hash & mask as u64) as usize
}

/// The perturbed probe sequence for a hash over a power-of-two table.
///
/// The first index is the primary index `hash & mask`. Every subsequent
/// index is `(5 * index + perturb + 1) & mask`, after which `perturb` is
/// shifted right by 5 bits. `perturb` starts as the full hash, so high hash
/// bits feed into early probes before the sequence settles into a full
/// period walk of the table.
///
/// The sequence never ends; callers bound it.
///
/// ```rust
/// use probe_table::probe::ProbeSeq;
///
/// let probes: Vec<usize> = ProbeSeq::new(0, 7).take(8).collect();
/// assert_eq!(probes, [0, 1, 6, 7, 4, 5, 2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct ProbeSeq {
    index: u64,
    perturb: u64,
    mask: u64,
    started: bool,
}

impl ProbeSeq {
    /// Starts the probe sequence for `hash` in a table whose mask is `mask`.
    ///
    /// `mask` must be one less than a power of two.
    pub fn new(hash: u64, mask: usize) -> Self {
        debug_assert!(mask.wrapping_add(1).is_power_of_two());
        let mask = mask as u64;
        Self {
            index: hash & mask,
            perturb: hash,
            mask,
            started: false,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if !self.started {
            self.started = true;
            return Some(self.index as usize);
        }

        let next = PROBE_MULTIPLIER
            .wrapping_mul(self.index)
            .wrapping_add(self.perturb)
            .wrapping_add(1);
        self.index = next & self.mask;
        self.perturb >>= PERTURB_SHIFT;

        Some(self.index as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl core::iter::FusedIterator for ProbeSeq {}

/// Returns the first empty slot on the probe sequence of `hash`.
///
/// `slots.len()` must be a power of two of at least 4. Returns `None` only
/// when every slot is occupied.
pub fn find_free_slot_for_migration<T>(slots: &[Option<T>], hash: u64) -> Option<usize> {
    debug_assert!(slots.len().is_power_of_two() && slots.len() >= 4);
    ProbeSeq::new(hash, slots.len() - 1)
        .take(slots.len() + PERTURB_STEPS)
        .find(|&index| slots[index].is_none())
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn first_probe_is_primary_index() {
        let hash = 0xDEAD_BEEF_u64;
        assert_eq!(ProbeSeq::new(hash, 31).next(), Some(locate_chain_head(hash, 31)));
        assert_eq!(locate_chain_head(hash, 31), (0xDEAD_BEEF_u64 & 31) as usize);
    }

    #[test]
    fn follows_perturbed_recurrence() {
        let hash = 0x0123_4567_89AB_CDEF_u64;
        let mask = 63u64;

        let mut expected = Vec::new();
        let mut index = hash & mask;
        let mut perturb = hash;
        expected.push(index as usize);
        for _ in 0..20 {
            index = (5u64.wrapping_mul(index).wrapping_add(perturb).wrapping_add(1)) & mask;
            expected.push(index as usize);
            perturb >>= 5;
        }

        let probes: Vec<usize> = ProbeSeq::new(hash, mask as usize).take(21).collect();
        assert_eq!(probes, expected);
    }

    #[test]
    fn wraps_at_u64_boundary() {
        let probes: Vec<usize> = ProbeSeq::new(u64::MAX, 7).take(3).collect();
        // 5 * 7 + u64::MAX + 1 wraps to 35.
        assert_eq!(probes[0], 7);
        assert_eq!(probes[1], 35 & 7);
    }

    #[test]
    fn visits_every_slot_once_perturbation_is_spent() {
        let mut rng = SmallRng::seed_from_u64(0x5EED);
        for size in [8usize, 32, 128, 1024] {
            let hash: u64 = rng.random();
            let mut seen = vec![false; size];
            for index in ProbeSeq::new(hash, size - 1).skip(PERTURB_STEPS).take(size) {
                seen[index] = true;
            }
            assert!(seen.iter().all(|&s| s), "size {size}, hash {hash:#x}");
        }
    }

    #[test]
    fn free_slot_prefers_primary_index() {
        let slots: Vec<Option<()>> = vec![None; 16];
        assert_eq!(find_free_slot_for_migration(&slots, 0xABCD), Some(0xD));
    }

    #[test]
    fn free_slot_skips_occupied_slots() {
        let mut slots: Vec<Option<()>> = vec![Some(()); 32];
        slots[19] = None;
        for hash in [0u64, 19, 0xFFFF_FFFF_FFFF_FFFF, 0x8000_0000_0000_0013] {
            assert_eq!(find_free_slot_for_migration(&slots, hash), Some(19));
        }

        let mut slots: Vec<Option<()>> = vec![None; 8];
        slots[0] = Some(());
        // Second probe for hash 0 is 5 * 0 + 0 + 1.
        assert_eq!(find_free_slot_for_migration(&slots, 0), Some(1));
    }

    #[test]
    fn full_table_has_no_free_slot() {
        let slots: Vec<Option<()>> = vec![Some(()); 8];
        assert_eq!(find_free_slot_for_migration(&slots, 42), None);
    }
}
