#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

mod absent;
mod config;
mod error;

/// Caller-supplied key hashing.
///
/// The table never hashes keys on its own: a [`KeyHasher`] is injected at
/// construction. Closures, signed hash functions and [`core::hash::BuildHasher`]s
/// are all adapted here.
pub mod hasher;

pub mod probe;

/// The [`ProbingTable`] container and its iterators.
pub mod probing_table;

#[cfg(any(test, feature = "stats"))]
mod stats;

#[cfg(test)]
mod test_logger;

pub use absent::Absent;
pub use config::DEFAULT_LOAD_FACTOR;
pub use config::GROWTH_FACTOR;
pub use config::MIN_SLOTS;
pub use config::TableConfig;
pub use error::TableError;
pub use hasher::KeyHasher;
pub use probing_table::ProbingTable;
#[cfg(any(test, feature = "stats"))]
pub use stats::ChainStats;
