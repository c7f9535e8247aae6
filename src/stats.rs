use alloc::vec;
use alloc::vec::Vec;

use crate::probing_table::ProbingTable;

/// Chain and slot statistics for a [`ProbingTable`].
///
/// Only available with the `stats` feature.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    /// Number of entries in the table
    pub entries: usize,
    /// Number of slots in the slot array
    pub slot_count: usize,
    /// Number of slots holding a chain
    pub occupied_slots: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Entries per slot (entries / slot_count)
    pub load_factor: f64,
    /// `chain_histogram[n]` is the number of slots whose chain has `n`
    /// entries, including `n == 0`
    pub chain_histogram: Vec<usize>,
}

impl ChainStats {
    /// Mean length of the non-empty chains.
    pub fn mean_chain_length(&self) -> f64 {
        if self.occupied_slots == 0 {
            0.0
        } else {
            self.entries as f64 / self.occupied_slots as f64
        }
    }

    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Probing Table Chain Statistics ===");
        println!(
            "Population: {} entries in {} slots ({:.2}% load)",
            self.entries,
            self.slot_count,
            self.load_factor * 100.0
        );
        println!(
            "Slot Usage: {}/{} occupied ({:.2}% utilization)",
            self.occupied_slots,
            self.slot_count,
            if self.slot_count == 0 {
                0.0
            } else {
                self.occupied_slots as f64 / self.slot_count as f64 * 100.0
            }
        );
        println!(
            "Chains: longest {}, mean {:.2}",
            self.longest_chain,
            self.mean_chain_length()
        );
        println!("Chain length histogram:");
        for (length, slots) in self.chain_histogram.iter().enumerate() {
            if *slots > 0 {
                println!("  {length:>3}: {slots}");
            }
        }
    }
}

impl<K, V, H> ProbingTable<K, V, H> {
    /// Collects chain and slot statistics.
    pub fn chain_stats(&self) -> ChainStats {
        let mut chain_histogram = vec![0usize; 1];
        let mut occupied_slots = 0;
        let mut entries = 0;

        for slot in self.slots() {
            let length = slot.as_deref().map_or(0, |head| head.chain().count());
            if length > 0 {
                occupied_slots += 1;
            }
            entries += length;
            if chain_histogram.len() <= length {
                chain_histogram.resize(length + 1, 0);
            }
            chain_histogram[length] += 1;
        }

        ChainStats {
            entries,
            slot_count: self.slot_count(),
            occupied_slots,
            longest_chain: chain_histogram.len() - 1,
            load_factor: entries as f64 / self.slot_count() as f64,
            chain_histogram,
        }
    }
}
