use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Error;

/// Percentage of occupied slots above which the next insertion doubles the
/// table first.
const MAX_LOAD_PERCENT: u128 = 66;

/// Number of slots a table starts with when no size is requested.
pub const DEFAULT_INITIAL_SIZE: usize = 8;

#[inline(always)]
fn over_load_factor(populated: usize, capacity: usize) -> bool {
    populated as u128 * 100 > capacity as u128 * MAX_LOAD_PERCENT
}

#[inline(always)]
fn home_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

/// State of a single cell in the backing array.
///
/// `Empty` ends a lookup. `Tombstone` marks a removed entry: lookups continue
/// past it and insertions of new keys may reuse it.
#[derive(Clone)]
enum Slot<T> {
    Empty,
    Tombstone,
    Occupied { hash: u64, value: T },
}

fn empty_slots<T>(capacity: usize) -> Vec<Slot<T>> {
    core::iter::repeat_with(|| Slot::Empty)
        .take(capacity)
        .collect()
}

/// Outcome of an insertion probe.
enum Probe {
    Occupied(usize),
    Vacant(usize),
}

/// Statistics about the table's occupancy and probe lengths.
///
/// Available with the `stats` feature.
#[cfg(feature = "stats")]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries
    pub populated: usize,
    /// Number of slots in the backing array
    pub capacity: usize,
    /// Number of slots holding a tombstone
    pub tombstones: usize,
    /// Number of slots never filled since the last resize or clear
    pub empty_slots: usize,
    /// populated / capacity
    pub load_factor: f64,
    /// Largest distance of a live entry from its home slot
    pub longest_probe: usize,
    /// Mean distance of live entries from their home slot
    pub mean_probe: f64,
}

#[cfg(feature = "stats")]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} occupied, {} tombstones, {} empty",
            self.populated, self.tombstones, self.empty_slots
        );
        println!(
            "Probe length: {} max, {:.2} mean",
            self.longest_probe, self.mean_probe
        );
    }
}

/// Number of live entries found at each distance from their home slot.
///
/// Available with the `stats` feature.
#[cfg(feature = "stats")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// `counts[d]` is the number of entries stored `d` slots past their home.
    pub counts: Vec<usize>,
}

#[cfg(feature = "stats")]
impl ProbeHistogram {
    /// Print one line per probe distance with a proportional bar.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let total: usize = self.counts.iter().sum();
        println!("=== Probe Length Histogram ({} entries) ===", total);
        for (distance, &count) in self.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let share = count as f64 / total.max(1) as f64;
            let bar = "#".repeat((share * 50.0).ceil() as usize);
            println!("{:>4}: {:>8} ({:>6.2}%) {}", distance, count, share * 100.0, bar);
        }
    }
}

/// An open-addressing hash table using linear probing and tombstones.
///
/// `HashTable<T>` stores values of type `T` in a flat array of slots. Like
/// the map and set built on top of it, it never hashes anything itself:
/// every operation takes the hash of the value's key and an equality
/// predicate that recognizes the value.
///
/// The hash is cached next to each value, so growing the table never needs to
/// call back into a hasher.
///
/// ## Growth
///
/// Before each insertion attempt, if more than 66% of the slots are live the
/// table doubles and re-places every live entry, dropping all tombstones.
/// [`clear`] shrinks the table back to its initial size.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use probe_hash::hash_table::Entry;
/// # use probe_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::with_capacity(8);
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123)? {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// assert_eq!(table.find(hash, |p| p.id == 123).map(|p| p.name.as_str()), Some("Alice"));
/// # Ok::<(), probe_hash::Error>(())
/// ```
///
/// [`clear`]: HashTable::clear
#[derive(Clone)]
pub struct HashTable<T> {
    slots: Vec<Slot<T>>,
    populated: usize,
    initial_size: usize,
}

impl<T> Debug for HashTable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .field("initial_size", &self.initial_size)
            .field(
                "slots",
                &self
                    .slots
                    .chunks(16)
                    .map(|row| {
                        row.iter()
                            .map(|slot| match slot {
                                Slot::Empty => "..".to_string(),
                                Slot::Tombstone => "xx".to_string(),
                                Slot::Occupied { hash, .. } => format!("{:02x}", hash >> 56),
                            })
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T> Default for HashTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HashTable<T> {
    /// Creates an empty table with [`DEFAULT_INITIAL_SIZE`] slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_SIZE)
    }

    /// Creates an empty table with exactly `initial_size` slots.
    ///
    /// `initial_size` is also the size the table returns to on [`clear`]. A
    /// size of zero is raised to one so that probing always has a slot to
    /// start from.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 100);
    /// assert_eq!(table.initial_size(), 100);
    /// ```
    ///
    /// [`clear`]: HashTable::clear
    pub fn with_capacity(initial_size: usize) -> Self {
        let initial_size = initial_size.max(1);
        Self {
            slots: empty_slots(initial_size),
            populated: 0,
            initial_size,
        }
    }

    /// Returns an iterator over all live values in backing-array order.
    ///
    /// The order reflects hashing and resizing, not insertion order, and is
    /// not stable across mutations.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(8);
    /// table.entry(3, |&v: &u64| v == 30)?.or_insert(30);
    /// table.entry(1, |&v: &u64| v == 10)?.or_insert(10);
    ///
    /// let values: Vec<u64> = table.iter().copied().collect();
    /// assert_eq!(values, [10, 30]);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns `true` if the table contains no live values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of live values in the table.
    ///
    /// Tombstones are not counted.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the size the table was created with and returns to on clear.
    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    /// Returns the number of slots currently holding a tombstone.
    pub fn tombstones(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Tombstone))
            .count()
    }

    /// Removes all values and shrinks the table back to its initial size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(2);
    /// for n in 0..10u64 {
    ///     table.entry(n, |&v: &u64| v == n)?.or_insert(n);
    /// }
    /// assert!(table.capacity() > 2);
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 2);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn clear(&mut self) {
        tracing::trace!(
            populated = self.populated,
            capacity = self.slots.len(),
            initial_size = self.initial_size,
            "clearing hash table"
        );
        self.slots = empty_slots(self.initial_size);
        self.populated = 0;
    }

    /// Returns the index of the slot holding the value matching `eq`.
    ///
    /// The probe starts at `hash % capacity`, skips tombstones, and stops at
    /// the first empty slot or after visiting every slot.
    pub fn find_index(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<usize> {
        let capacity = self.slots.len();
        let home = home_index(hash, capacity);
        for step in 0..capacity {
            let index = (home + step) % capacity;
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied {
                    hash: stored,
                    value,
                } if *stored == hash && eq(value) => return Some(index),
                _ => {}
            }
        }

        None
    }

    /// Returns a reference to the value matching `eq`, if present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(8);
    /// table.entry(42, |&v: &u64| v == 42)?.or_insert(42);
    ///
    /// assert_eq!(table.find(42, |&v| v == 42), Some(&42));
    /// assert_eq!(table.find(7, |&v| v == 7), None);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&T> {
        let index = self.find_index(hash, eq)?;
        match &self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the value matching `eq`, if present.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&mut T> {
        let index = self.find_index(hash, eq)?;
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Removes and returns the value matching `eq`, leaving a tombstone in its
    /// slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no value matches.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::Error;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(8);
    /// table.entry(42, |&v: &u64| v == 42)?.or_insert(42);
    ///
    /// assert_eq!(table.remove(42, |&v| v == 42), Ok(42));
    /// assert_eq!(table.remove(42, |&v| v == 42), Err(Error::KeyNotFound));
    /// assert_eq!(table.tombstones(), 1);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Result<T, Error> {
        let index = self.find_index(hash, eq).ok_or(Error::KeyNotFound)?;
        Ok(self.take(index))
    }

    /// Removes the value matching `eq` if present. Returns whether a value was
    /// removed; absence is not an error.
    pub fn discard(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> bool {
        match self.find_index(hash, eq) {
            Some(index) => {
                self.take(index);
                true
            }
            None => false,
        }
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// If the table is more than 66% full it is doubled before probing, even if
    /// the value turns out to be present already.
    ///
    /// The returned [`Entry`] is `Occupied` when a live value matches and
    /// `Vacant` otherwise. A vacant entry points at the first empty slot of
    /// the probe when no tombstone precedes it, and at the first tombstone of
    /// the probe otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConsistencyViolation`] if the probe visits every slot
    /// without finding a match, an empty slot, or a tombstone. The load factor
    /// bound rules this out unless the table's bookkeeping is corrupt.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use probe_hash::hash_table::Entry;
    /// # use probe_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(8);
    /// let hash = hash_str("hello");
    ///
    /// match table.entry(hash, |s: &String| s == "hello")? {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         entry.get_mut().push('!');
    ///     }
    /// }
    ///
    /// table
    ///     .entry(hash, |s: &String| s == "hello")?
    ///     .or_insert("unused".to_string());
    /// assert_eq!(table.len(), 1);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Result<Entry<'_, T>, Error> {
        self.maybe_resize();
        match self.probe(hash, eq)? {
            Probe::Occupied(index) => Ok(Entry::Occupied(OccupiedEntry { table: self, index })),
            Probe::Vacant(index) => Ok(Entry::Vacant(VacantEntry {
                table: self,
                index,
                hash,
            })),
        }
    }

    fn probe(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Result<Probe, Error> {
        let capacity = self.slots.len();
        let home = home_index(hash, capacity);
        let mut first_deleted = None;

        for step in 0..capacity {
            let index = (home + step) % capacity;
            match &self.slots[index] {
                Slot::Empty if first_deleted.is_none() => return Ok(Probe::Vacant(index)),
                Slot::Empty => {}
                Slot::Tombstone => {
                    if first_deleted.is_none() {
                        first_deleted = Some(index);
                    }
                }
                Slot::Occupied {
                    hash: stored,
                    value,
                } => {
                    if *stored == hash && eq(value) {
                        return Ok(Probe::Occupied(index));
                    }
                }
            }
        }

        match first_deleted {
            Some(index) => Ok(Probe::Vacant(index)),
            None => {
                let error = Error::ConsistencyViolation {
                    capacity,
                    len: self.populated,
                };
                tracing::error!(capacity, populated = self.populated, "{error}");
                Err(error)
            }
        }
    }

    fn take(&mut self, index: usize) -> T {
        match core::mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.populated -= 1;
                value
            }
            _ => unreachable!("slot {index} was located as occupied"),
        }
    }

    fn maybe_resize(&mut self) {
        if over_load_factor(self.populated, self.slots.len()) {
            self.resize();
        }
    }

    /// Doubles the backing array and re-places every live entry by its cached
    /// hash. Tombstones are dropped.
    fn resize(&mut self) {
        let old_capacity = self.slots.len();
        let new_capacity = old_capacity
            .checked_mul(2)
            .expect("hash table capacity overflow");
        let old_slots = core::mem::replace(&mut self.slots, empty_slots(new_capacity));

        self.populated = 0;
        for slot in old_slots {
            if let Slot::Occupied { hash, value } = slot {
                let index = self.first_empty(hash);
                self.slots[index] = Slot::Occupied { hash, value };
                self.populated += 1;
            }
        }

        tracing::debug!(
            old_capacity,
            new_capacity,
            populated = self.populated,
            "resized hash table"
        );
    }

    fn first_empty(&self, hash: u64) -> usize {
        let capacity = self.slots.len();
        let home = home_index(hash, capacity);
        for step in 0..capacity {
            let index = (home + step) % capacity;
            if matches!(self.slots[index], Slot::Empty) {
                return index;
            }
        }

        unreachable!("a freshly doubled table always has an empty slot")
    }

    /// Returns how many live entries sit at each distance from their home
    /// slot.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let capacity = self.slots.len();
        let mut counts = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied { hash, .. } = slot {
                let distance = (index + capacity - home_index(*hash, capacity)) % capacity;
                if counts.len() <= distance {
                    counts.resize(distance + 1, 0);
                }
                counts[distance] += 1;
            }
        }
        ProbeHistogram { counts }
    }

    /// Returns occupancy and probe-length statistics for the table.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let total_distance: usize = histogram
            .counts
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();
        let tombstones = self.tombstones();

        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            tombstones,
            empty_slots: self.capacity() - self.populated - tombstones,
            load_factor: self.populated as f64 / self.capacity() as f64,
            longest_probe: histogram.counts.len().saturating_sub(1),
            mean_probe: if self.populated == 0 {
                0.0
            } else {
                total_distance as f64 / self.populated as f64
            },
        }
    }
}

impl<T> IntoIterator for HashTable<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_iter(),
            remaining: self.populated,
        }
    }
}

impl<'a, T> IntoIterator for &'a HashTable<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single slot of the table, which is either vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, T> {
    /// No live value matched; inserting will fill the slot.
    Vacant(VacantEntry<'a, T>),
    /// A live value matched.
    Occupied(OccupiedEntry<'a, T>),
}

impl<'a, T> Entry<'a, T> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A view into a vacant slot of the table.
pub struct VacantEntry<'a, T> {
    table: &'a mut HashTable<T>,
    index: usize,
    hash: u64,
}

impl<'a, T> VacantEntry<'a, T> {
    /// Returns the index of the slot this entry will fill.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Stores `value` in the slot and returns a mutable reference to it.
    pub fn insert(self, value: T) -> &'a mut T {
        self.table.populated += 1;
        let slot = &mut self.table.slots[self.index];
        *slot = Slot::Occupied {
            hash: self.hash,
            value,
        };
        match slot {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("slot was just filled"),
        }
    }
}

/// A view into an occupied slot of the table.
pub struct OccupiedEntry<'a, T> {
    table: &'a mut HashTable<T>,
    index: usize,
}

impl<'a, T> OccupiedEntry<'a, T> {
    /// Returns the index of the slot holding the value.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &T {
        match &self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry points at a live slot"),
        }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut T {
        match &mut self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry points at a live slot"),
        }
    }

    /// Converts the entry into a mutable reference to its value.
    pub fn into_mut(self) -> &'a mut T {
        match &mut self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry points at a live slot"),
        }
    }

    /// Removes the value, leaving a tombstone behind.
    pub fn remove(self) -> T {
        self.table.take(self.index)
    }
}

/// An iterator over the live values of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, T> {
    slots: core::slice::Iter<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// An owning iterator over the live values of a [`HashTable`].
pub struct IntoIter<T> {
    slots: alloc::vec::IntoIter<Slot<T>>,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
