use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;
use core::iter::FusedIterator;
use core::mem;

use log::debug;
use log::trace;

use crate::absent::Absent;
use crate::config::GROWTH_FACTOR;
use crate::config::TableConfig;
use crate::config::max_count;
use crate::error::TableError;
use crate::hasher::KeyHasher;
use crate::probe::find_free_slot_for_migration;
use crate::probe::locate_chain_head;

/// One stored association, owning the rest of its chain.
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Computed once on insertion, reused by every growth.
    pub(crate) hash: u64,
    pub(crate) next: Option<Box<Entry<K, V>>>,
}

impl<K, V> Entry<K, V> {
    /// Iterates over this entry and every entry chained behind it.
    pub(crate) fn chain(&self) -> impl Iterator<Item = &Entry<K, V>> {
        core::iter::successors(Some(self), |entry| entry.next.as_deref())
    }
}

type Slot<K, V> = Option<Box<Entry<K, V>>>;

fn empty_slots<K, V>(size: usize) -> Vec<Slot<K, V>> {
    let mut slots = Vec::with_capacity(size);
    slots.resize_with(size, || None);
    slots
}

/// Relinks `entries` into a chain, preserving their order.
fn link<K, V>(entries: Vec<Box<Entry<K, V>>>) -> Slot<K, V> {
    entries.into_iter().rev().fold(None, |next, mut entry| {
        entry.next = next;
        Some(entry)
    })
}

/// An associative array of chained slots.
///
/// Every entry lives in the chain rooted at its primary slot,
/// `hash & (slot_count - 1)`. Colliding keys are appended to the chain.
/// When an insertion of a new key finds more than `slot_count *
/// load_factor` entries, the slot array quadruples and every chain is moved
/// to the slot picked by the perturbed probe sequence of its head's cached
/// hash (see [`probe`](crate::probe)).
///
/// Keys and values must not be [`Absent`]. Hashing is supplied by the
/// caller through a [`KeyHasher`].
///
/// The table is not synchronized. Iterators borrow the table, so it cannot
/// be mutated while one is alive.
///
/// ## Example
///
/// ```rust
/// use probe_table::ProbingTable;
/// use probe_table::TableError;
///
/// fn hash_letter(key: &&str) -> u64 {
///     key.bytes().fold(0u64, |h, b| h.wrapping_mul(31).wrapping_add(b as u64))
/// }
///
/// let mut table: ProbingTable<&str, i32, _> = ProbingTable::new(hash_letter);
/// assert_eq!(table.set("a", 1), Ok(1));
/// assert_eq!(table.set("b", 2), Ok(2));
/// assert_eq!(table.get(&"a"), Ok(&1));
/// assert_eq!(table.delete(&"b"), Ok(1));
/// assert_eq!(table.get(&"b"), Err(TableError::KeyNotFound));
/// ```
pub struct ProbingTable<K, V, H> {
    slots: Vec<Slot<K, V>>,
    mask: usize,
    count: usize,
    max_count: usize,
    load_factor: f64,
    hasher: H,
}

impl<K, V, H> ProbingTable<K, V, H> {
    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots, always a power of two.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the occupancy ratio above which the table grows.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Returns the table's hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Removes every entry. The slot array keeps its size.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            let mut cursor = slot.take();
            while let Some(mut entry) = cursor {
                cursor = entry.next.take();
            }
        }
        self.count = 0;
    }

    /// Iterates over `(key, value)` pairs in slot order, then chain order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            chain: None,
            remaining: self.count,
        }
    }

    /// Iterates over keys in slot order, then chain order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Iterates over values in slot order, then chain order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn slots(&self) -> &[Option<Box<Entry<K, V>>>] {
        &self.slots
    }
}

impl<K, V, H> ProbingTable<K, V, H>
where
    K: Absent + Eq,
    V: Absent,
    H: KeyHasher<K>,
{
    /// Creates an empty table with 8 slots and a load factor of 0.7.
    pub fn new(hasher: H) -> Self {
        Self::with_config(TableConfig::default(), hasher)
    }

    /// Creates an empty table from `config`.
    ///
    /// ```rust
    /// use probe_table::ProbingTable;
    /// use probe_table::TableConfig;
    ///
    /// let table: ProbingTable<u64, u64, _> =
    ///     ProbingTable::with_config(TableConfig::new().with_initial_size(64), |k: &u64| *k);
    /// assert_eq!(table.slot_count(), 64);
    /// ```
    pub fn with_config(config: TableConfig, hasher: H) -> Self {
        let size = config.initial_size();
        Self {
            slots: empty_slots(size),
            mask: size - 1,
            count: 0,
            max_count: max_count(size, config.load_factor()),
            load_factor: config.load_factor(),
            hasher,
        }
    }

    /// Returns whether `key` is stored in the table.
    ///
    /// Fails with [`TableError::InvalidKey`] if `key` is absent.
    pub fn contains(&self, key: &K) -> Result<bool, TableError> {
        let hash = self.hash_of(key)?;
        Ok(self.find_entry(hash, key).is_some())
    }

    /// Returns the value stored for `key`.
    ///
    /// Fails with [`TableError::InvalidKey`] if `key` is absent and with
    /// [`TableError::KeyNotFound`] if it is not stored.
    pub fn get(&self, key: &K) -> Result<&V, TableError> {
        let hash = self.hash_of(key)?;
        self.find_entry(hash, key)
            .map(|entry| &entry.value)
            .ok_or(TableError::KeyNotFound)
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// Fails like [`get`](Self::get).
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V, TableError> {
        let hash = self.hash_of(key)?;
        self.find_entry_mut(hash, key)
            .map(|entry| &mut entry.value)
            .ok_or(TableError::KeyNotFound)
    }

    /// Stores `value` for `key` and returns the new entry count.
    ///
    /// An existing key has its value replaced in place. A new key is appended
    /// to the chain at its primary slot, growing the table first if it holds
    /// more than `slot_count * load_factor` entries.
    ///
    /// Fails with [`TableError::InvalidKey`] or [`TableError::InvalidValue`]
    /// if either is absent, leaving the table untouched.
    pub fn set(&mut self, key: K, value: V) -> Result<usize, TableError> {
        let hash = self.hash_of(&key)?;
        if value.is_absent() {
            return Err(TableError::InvalidValue);
        }

        if let Some(entry) = self.find_entry_mut(hash, &key) {
            entry.value = value;
            return Ok(self.count);
        }

        if self.count > self.max_count {
            self.grow();
        }

        let mut tail = &mut self.slots[locate_chain_head(hash, self.mask)];
        while let Some(entry) = tail {
            tail = &mut entry.next;
        }
        *tail = Some(Box::new(Entry {
            key,
            value,
            hash,
            next: None,
        }));

        self.count += 1;
        Ok(self.count)
    }

    /// Removes `key` and returns its value.
    ///
    /// Fails with [`TableError::InvalidKey`] if `key` is absent and with
    /// [`TableError::KeyNotFound`] if it is not stored.
    pub fn remove(&mut self, key: &K) -> Result<V, TableError> {
        let hash = self.hash_of(key)?;

        let mut link = &mut self.slots[locate_chain_head(hash, self.mask)];
        while link
            .as_ref()
            .is_some_and(|entry| !(entry.hash == hash && entry.key == *key))
        {
            link = &mut link.as_mut().unwrap().next;
        }

        let Some(mut removed) = link.take() else {
            return Err(TableError::KeyNotFound);
        };
        *link = removed.next.take();
        self.count -= 1;

        Ok(removed.value)
    }

    /// Removes `key` and returns the new entry count.
    ///
    /// Fails like [`remove`](Self::remove).
    pub fn delete(&mut self, key: &K) -> Result<usize, TableError> {
        self.remove(key)?;
        Ok(self.count)
    }

    #[inline]
    fn hash_of(&self, key: &K) -> Result<u64, TableError> {
        if key.is_absent() {
            return Err(TableError::InvalidKey);
        }
        Ok(self.hasher.hash_key(key))
    }

    fn find_entry(&self, hash: u64, key: &K) -> Option<&Entry<K, V>> {
        self.slots[locate_chain_head(hash, self.mask)]
            .as_deref()?
            .chain()
            .find(|entry| entry.hash == hash && entry.key == *key)
    }

    fn find_entry_mut(&mut self, hash: u64, key: &K) -> Option<&mut Entry<K, V>> {
        let mut cursor = self.slots[locate_chain_head(hash, self.mask)].as_deref_mut();
        while let Some(entry) = cursor {
            if entry.hash == hash && entry.key == *key {
                return Some(entry);
            }
            cursor = entry.next.as_deref_mut();
        }
        None
    }

    /// Quadruples the slot array and migrates every chain into it.
    fn grow(&mut self) {
        let old_size = self.slots.len();
        let new_size = old_size
            .checked_mul(GROWTH_FACTOR)
            .expect("slot count overflow");

        let old_slots = mem::replace(&mut self.slots, empty_slots(new_size));
        self.mask = new_size - 1;
        self.max_count = max_count(new_size, self.load_factor);

        for head in old_slots.into_iter().flatten() {
            self.migrate_chain(head);
        }

        debug!(
            "grew slot array from {} to {} slots ({} entries)",
            old_size, new_size, self.count
        );
    }

    /// Moves one old chain into the new slot array.
    ///
    /// The chain moves whole when all of its entries share a primary index
    /// under the new mask. Otherwise it is split, in order, into one chain per
    /// new primary index so every entry stays reachable from its primary slot.
    fn migrate_chain(&mut self, head: Box<Entry<K, V>>) {
        let primary = locate_chain_head(head.hash, self.mask);
        if head
            .chain()
            .all(|entry| locate_chain_head(entry.hash, self.mask) == primary)
        {
            self.place_chain(head);
            return;
        }

        let mut groups: Vec<(usize, Vec<Box<Entry<K, V>>>)> = Vec::with_capacity(GROWTH_FACTOR);
        let mut cursor = Some(head);
        while let Some(mut entry) = cursor {
            cursor = entry.next.take();
            let index = locate_chain_head(entry.hash, self.mask);
            match groups.iter_mut().find(|(group, _)| *group == index) {
                Some((_, members)) => members.push(entry),
                None => groups.push((index, vec![entry])),
            }
        }

        trace!(
            "split chain from slot {} into {} chains",
            primary & (self.slots.len() / GROWTH_FACTOR - 1),
            groups.len()
        );

        for (_, members) in groups {
            if let Some(chain) = link(members) {
                self.place_chain(chain);
            }
        }
    }

    fn place_chain(&mut self, chain: Box<Entry<K, V>>) {
        // Each old slot owns the GROWTH_FACTOR new slots congruent to it, so a
        // chain's primary slot is still empty when the chain arrives.
        let index = find_free_slot_for_migration(&self.slots, chain.hash)
            .expect("migration target array has a free slot");
        debug_assert_eq!(index, locate_chain_head(chain.hash, self.mask));
        self.slots[index] = Some(chain);
    }
}

impl<K, V, H> Default for ProbingTable<K, V, H>
where
    K: Absent + Eq,
    V: Absent,
    H: KeyHasher<K> + Default,
{
    fn default() -> Self {
        Self::new(H::default())
    }
}

impl<K, V, H> Drop for ProbingTable<K, V, H> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V, H> Clone for ProbingTable<K, V, H>
where
    K: Clone,
    V: Clone,
    H: Clone,
{
    fn clone(&self) -> Self {
        let slots = self
            .slots
            .iter()
            .map(|slot| {
                let entries = slot
                    .as_deref()
                    .into_iter()
                    .flat_map(|head| head.chain())
                    .map(|entry| {
                        Box::new(Entry {
                            key: entry.key.clone(),
                            value: entry.value.clone(),
                            hash: entry.hash,
                            next: None,
                        })
                    })
                    .collect();
                link(entries)
            })
            .collect();

        Self {
            slots,
            mask: self.mask,
            count: self.count,
            max_count: self.max_count,
            load_factor: self.load_factor,
            hasher: self.hasher.clone(),
        }
    }
}

impl<K: Debug, V: Debug, H> Debug for ProbingTable<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Renders `{key: value, ...}` in slot order, then chain order.
///
/// The order changes as the table grows; the output is for diagnostics only.
impl<K: Display, V: Display, H> Display for ProbingTable<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

impl<'a, K, V, H> IntoIterator for &'a ProbingTable<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`ProbingTable`].
///
/// Created by [`ProbingTable::iter`].
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    chain: Option<&'a Entry<K, V>>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            chain: self.chain,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain {
                self.chain = entry.next.as_deref();
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            self.chain = self.slots.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a [`ProbingTable`].
///
/// Created by [`ProbingTable::keys`].
#[derive(Clone)]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`ProbingTable`].
///
/// Created by [`ProbingTable::values`].
#[derive(Clone)]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}
