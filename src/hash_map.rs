use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::ops::BitAnd;
use core::ops::BitOr;
use core::ops::BitXor;
use core::ops::Index;
use core::ops::IndexMut;
use core::ops::Sub;

use crate::DefaultHashBuilder;
use crate::error::Error;
use crate::hash_table;
use crate::hash_table::DEFAULT_INITIAL_SIZE;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::set_algebra::SetAlgebra;

/// Something [`HashMap::update`] can read a key-value pair from.
///
/// Tuples and two-element arrays are always pairs. `None`, and slices or
/// vectors whose length is not two, are not pairs and are skipped.
pub trait IntoPair<K, V> {
    /// Returns the pair, or `None` if `self` does not hold one.
    fn into_pair(self) -> Option<(K, V)>;
}

impl<K, V> IntoPair<K, V> for (K, V) {
    fn into_pair(self) -> Option<(K, V)> {
        Some(self)
    }
}

impl<K, V> IntoPair<K, V> for Option<(K, V)> {
    fn into_pair(self) -> Option<(K, V)> {
        self
    }
}

impl<T> IntoPair<T, T> for [T; 2] {
    fn into_pair(self) -> Option<(T, T)> {
        let [key, value] = self;
        Some((key, value))
    }
}

impl<T: Clone> IntoPair<T, T> for &[T] {
    fn into_pair(self) -> Option<(T, T)> {
        match self {
            [key, value] => Some((key.clone(), value.clone())),
            _ => None,
        }
    }
}

impl<T> IntoPair<T, T> for Vec<T> {
    fn into_pair(mut self) -> Option<(T, T)> {
        if self.len() != 2 {
            return None;
        }
        let value = self.pop()?;
        let key = self.pop()?;
        Some((key, value))
    }
}

/// A hash map implemented using the linear-probing HashTable as the
/// underlying storage.
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash keys. Equal keys must
/// hash equally.
///
/// Iteration follows the backing array, which reflects hashing and resizing
/// rather than insertion order.
///
/// # Equality
///
/// Two maps compare equal when they have the same number of entries and every
/// key of the left map is a key of the right map. **Values are not
/// compared**:
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// # use probe_hash::HashMap;
/// #
/// let left: HashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
/// let right: HashMap<&str, i32> = [("a", 10), ("b", 20)].into_iter().collect();
/// assert!(left == right);
/// # }
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug + Hash + Eq,
    V: Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.keys().all(|key| other.contains_key(key))
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash map with the given hasher builder and the default
    /// initial size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 8);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_INITIAL_SIZE, hash_builder)
    }

    /// Creates a new hash map with exactly `initial_size` slots and the given
    /// hasher builder. The map returns to `initial_size` slots on [`clear`].
    ///
    /// [`clear`]: HashMap::clear
    pub fn with_capacity_and_hasher(initial_size: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(initial_size),
            hash_builder,
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the backing table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of slots the map was created with.
    pub fn initial_size(&self) -> usize {
        self.table.initial_size()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all entries and shrinks the map back to its initial size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// # use probe_hash::HashMap;
    /// #
    /// let mut map = HashMap::with_capacity(4);
    /// for i in 0..100 {
    ///     map.insert(i, i);
    /// }
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 4);
    /// # }
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConsistencyViolation`] if the table has no slot left
    /// for a new key.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key)? {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Ok(Some(old_value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                Ok(None)
            }
        }
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    /// If the map did have this key present, the value is updated, and the old
    /// value is returned.
    ///
    /// # Panics
    ///
    /// Panics if the table reports [`Error::ConsistencyViolation`]; use
    /// [`try_insert`](HashMap::try_insert) to observe it instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(old_value) => old_value,
            Err(error) => panic!("{error}"),
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find_mut(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the value for `key`, or `default` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// # use probe_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("present", 1);
    /// assert_eq!(*map.get_or(&"present", &-1), 1);
    /// assert_eq!(*map.get_or(&"missing", &-1), -1);
    /// # }
    /// ```
    pub fn get_or<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// Returns the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn try_get(&self, key: &K) -> Result<&V, Error> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key from the map, returning its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// # use probe_hash::Error;
    /// # use probe_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("a", 1);
    /// assert_eq!(map.remove(&"a"), Ok(1));
    /// assert_eq!(map.remove(&"a"), Err(Error::KeyNotFound));
    /// # }
    /// ```
    pub fn remove(&mut self, key: &K) -> Result<V, Error> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn remove_entry(&mut self, key: &K) -> Result<(K, V), Error> {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Removes a key from the map if present. Returns whether an entry was
    /// removed; a missing key is not an error.
    pub fn discard(&mut self, key: &K) -> bool {
        let hash = self.hash_builder.hash_one(key);
        self.table.discard(hash, |(k, _)| k == key)
    }

    /// Inserts every pair `source` yields, skipping items that are not pairs.
    ///
    /// A source is anything iterable whose items implement [`IntoPair`]: an
    /// owned `HashMap`, tuples, two-element arrays, or slices and vectors
    /// (kept only when they hold exactly two elements).
    ///
    /// # Panics
    ///
    /// Panics if an insertion reports [`Error::ConsistencyViolation`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// # use probe_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.update([("a", "1"), ("b", "2")]);
    /// map.update(vec![vec!["c", "3"], vec!["skipped"], vec!["d", "4"]]);
    ///
    /// assert_eq!(map.len(), 4);
    /// assert_eq!(map.get(&"c"), Some(&"3"));
    /// assert!(!map.contains_key(&"skipped"));
    /// # }
    /// ```
    pub fn update<I>(&mut self, source: I)
    where
        I: IntoIterator,
        I::Item: IntoPair<K, V>,
    {
        for (key, value) in source.into_iter().filter_map(|item| item.into_pair()) {
            self.insert(key, value);
        }
    }

    /// Runs [`update`] on each source in order, so later sources win on
    /// shared keys.
    ///
    /// # Panics
    ///
    /// Panics if an insertion reports [`Error::ConsistencyViolation`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// # use probe_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.update_all([vec![("a", 1), ("b", 2)], vec![("b", 20)], vec![]]);
    ///
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map[&"b"], 20);
    /// # }
    /// ```
    ///
    /// [`update`]: HashMap::update
    pub fn update_all<I>(&mut self, sources: I)
    where
        I: IntoIterator,
        I::Item: IntoIterator,
        <I::Item as IntoIterator>::Item: IntoPair<K, V>,
    {
        for source in sources {
            self.update(source);
        }
    }

    /// Inserts a clone of every entry of `other`, overwriting values for keys
    /// present in both.
    pub fn merge<S2>(&mut self, other: &HashMap<K, V, S2>)
    where
        K: Clone,
        V: Clone,
        S2: BuildHasher,
    {
        self.update(other.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Returns a new map with the same initial size and hasher builder, built
    /// by replaying every entry of `self` through [`update`].
    ///
    /// Unlike `clone`, the copy starts from the initial size and grows as the
    /// entries go in, so its capacity and iteration order may differ.
    ///
    /// [`update`]: HashMap::update
    pub fn copy(&self) -> Self
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        let mut copy = Self::with_capacity_and_hasher(
            self.table.initial_size(),
            self.hash_builder.clone(),
        );
        copy.merge(self);
        copy
    }

    /// Returns an iterator over the key-value pairs of the map.
    ///
    /// The iterator can be recreated at any time; mutating the map invalidates
    /// any ordering observed before.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.table.iter(),
        }
    }
}

#[cfg(any(feature = "std", feature = "foldhash"))]
impl<K, V> HashMap<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    /// Creates a new hash map with the default hasher builder and initial
    /// size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// #
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates a new hash map with exactly `initial_size` slots using the
    /// default hasher builder.
    pub fn with_capacity(initial_size: usize) -> Self {
        Self::with_capacity_and_hasher(initial_size, DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> Index<&K> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics with [`Error::KeyNotFound`] if the key is absent.
    fn index(&self, key: &K) -> &V {
        match self.try_get(key) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<K, V, S> IndexMut<&K> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// # Panics
    ///
    /// Panics with [`Error::KeyNotFound`] if the key is absent. Use
    /// [`insert`](HashMap::insert) to add new keys.
    fn index_mut(&mut self, key: &K) -> &mut V {
        match self.get_mut(key) {
            Some(value) => value,
            None => panic!("{}", Error::KeyNotFound),
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.update(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.update(iter);
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> SetAlgebra for HashMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    type Item = (K, V);
    type Key = K;

    fn key_of(item: &(K, V)) -> &K {
        &item.0
    }

    fn items(&self) -> impl Iterator<Item = &(K, V)> {
        self.table.iter()
    }

    fn contains_key(&self, key: &K) -> bool {
        HashMap::contains_key(self, key)
    }

    fn empty_like(&self) -> Self {
        Self::with_capacity_and_hasher(self.table.initial_size(), self.hash_builder.clone())
    }

    fn copy(&self) -> Self {
        HashMap::copy(self)
    }

    fn add_item(&mut self, (key, value): &(K, V)) {
        self.insert(key.clone(), value.clone());
    }
}

macro_rules! map_operator {
    ($trait:ident, $method:ident, $operation:ident) => {
        impl<K, V, S> $trait<&HashMap<K, V, S>> for &HashMap<K, V, S>
        where
            K: Hash + Eq + Clone,
            V: Clone,
            S: BuildHasher + Clone,
        {
            type Output = HashMap<K, V, S>;

            fn $method(self, rhs: &HashMap<K, V, S>) -> HashMap<K, V, S> {
                SetAlgebra::$operation(self, &[rhs])
            }
        }
    };
}

map_operator!(BitOr, bitor, union);
map_operator!(BitAnd, bitand, intersection);
map_operator!(Sub, sub, difference);
map_operator!(BitXor, bitxor, symmetric_difference);

/// An iterator over the entries of a [`HashMap`].
pub struct Iter<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`HashMap`].
pub struct Values<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// An owning iterator over the entries of a [`HashMap`].
pub struct IntoIter<K, V> {
    inner: hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
