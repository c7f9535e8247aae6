/// Smallest slot array a table is ever created with.
pub const MIN_SLOTS: usize = 8;

/// Occupancy ratio above which the table grows.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.7;

/// Factor by which the slot array grows.
pub const GROWTH_FACTOR: usize = 4;

/// Construction parameters for a [`ProbingTable`](crate::ProbingTable).
///
/// ```rust
/// use probe_table::TableConfig;
///
/// let config = TableConfig::new().with_initial_size(100).with_load_factor(0.5);
/// assert_eq!(config.initial_size(), 128);
/// assert_eq!(config.load_factor(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    initial_size: usize,
    load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_size: MIN_SLOTS,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    /// Returns the default configuration: 8 slots, load factor 0.7.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial number of slots.
    ///
    /// The size is rounded up to a power of two, and to at least
    /// [`MIN_SLOTS`].
    ///
    /// # Panics
    ///
    /// Panics if the rounded size overflows `usize`.
    pub fn with_initial_size(mut self, slots: usize) -> Self {
        self.initial_size = slots
            .max(MIN_SLOTS)
            .checked_next_power_of_two()
            .expect("slot count overflow");
        self
    }

    /// Sets the load factor.
    ///
    /// # Panics
    ///
    /// Panics unless `0.0 < load_factor <= 1.0`.
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        assert!(
            load_factor > 0.0 && load_factor <= 1.0,
            "load factor must be in (0, 1], got {load_factor}"
        );
        self.load_factor = load_factor;
        self
    }

    /// Initial number of slots.
    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    /// Occupancy ratio above which the table grows.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }
}

/// Largest entry count a table of `slots` slots holds without growing.
///
/// `count > floor(slots * load_factor)` holds exactly when
/// `count > slots * load_factor` for integral `count`.
#[inline]
pub(crate) fn max_count(slots: usize, load_factor: f64) -> usize {
    (slots as f64 * load_factor) as usize
}
