use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::ops::BitAnd;
use core::ops::BitOr;
use core::ops::BitXor;
use core::ops::Sub;

use crate::DefaultHashBuilder;
use crate::error::Error;
use crate::hash_table;
use crate::hash_table::DEFAULT_INITIAL_SIZE;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;
use crate::set_algebra::SetAlgebra;

/// A hash set implemented using the linear-probing HashTable as the
/// underlying storage.
///
/// `HashSet<T, S>` stores values of type `T` where `T` implements `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash values.
///
/// The set operations (`|`, `&`, `-`, `^` and the [`SetAlgebra`] methods)
/// never modify their operands. The relation tests (`is_subset` and friends)
/// also accept a [`HashMap`](crate::HashMap), whose keys are compared.
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug + Hash + Eq,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash set with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::hash::RandomState;
    ///
    /// use probe_hash::hash_set::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_hasher(RandomState::new());
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), 8);
    /// # }
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_INITIAL_SIZE, hash_builder)
    }

    /// Creates a new hash set with exactly `initial_size` slots and the given
    /// hasher builder.
    pub fn with_capacity_and_hasher(initial_size: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(initial_size),
            hash_builder,
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the backing table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of slots the set was created with.
    pub fn initial_size(&self) -> usize {
        self.table.initial_size()
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Clears the set and shrinks it back to its initial size.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Adds a value to the set, returning whether it was newly inserted.
    ///
    /// An equal value already in the set is left in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConsistencyViolation`] if the table has no slot left
    /// for a new value.
    pub fn try_insert(&mut self, value: T) -> Result<bool, Error> {
        let hash = self.hash_builder.hash_one(&value);
        match self.table.entry(hash, |v| v == &value)? {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(true)
            }
        }
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted.
    ///
    /// # Panics
    ///
    /// Panics if the table reports [`Error::ConsistencyViolation`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        match self.try_insert(value) {
            Ok(inserted) => inserted,
            Err(error) => panic!("{error}"),
        }
    }

    /// Returns `true` if the set contains the value.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| v == value)
    }

    /// Removes a value from the set, returning the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the value is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::Error;
    /// use probe_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), Ok(2));
    /// assert_eq!(set.remove(&2), Err(Error::KeyNotFound));
    /// # }
    /// ```
    pub fn remove(&mut self, value: &T) -> Result<T, Error> {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |v| v == value)
    }

    /// Removes a value from the set if present, returning whether it was.
    pub fn discard(&mut self, value: &T) -> bool {
        let hash = self.hash_builder.hash_one(value);
        self.table.discard(hash, |v| v == value)
    }

    /// Returns a new set with the same initial size and hasher builder holding
    /// every value of `self`.
    pub fn copy(&self) -> Self
    where
        T: Clone,
        S: Clone,
    {
        let mut copy = Self::with_capacity_and_hasher(
            self.table.initial_size(),
            self.hash_builder.clone(),
        );
        copy.extend(self.iter().cloned());
        copy
    }

    /// Returns an iterator over the values in the set.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }
}

#[cfg(any(feature = "std", feature = "foldhash"))]
impl<T> HashSet<T, DefaultHashBuilder>
where
    T: Hash + Eq,
{
    /// Creates a new hash set with the default hasher builder and initial
    /// size.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates a new hash set with exactly `initial_size` slots using the
    /// default hasher builder.
    pub fn with_capacity(initial_size: usize) -> Self {
        Self::with_capacity_and_hasher(initial_size, DefaultHashBuilder::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = hash_table::IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> SetAlgebra for HashSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    type Item = T;
    type Key = T;

    fn key_of(item: &T) -> &T {
        item
    }

    fn items(&self) -> impl Iterator<Item = &T> {
        self.table.iter()
    }

    fn contains_key(&self, key: &T) -> bool {
        self.contains(key)
    }

    fn empty_like(&self) -> Self {
        Self::with_capacity_and_hasher(self.table.initial_size(), self.hash_builder.clone())
    }

    fn copy(&self) -> Self {
        HashSet::copy(self)
    }

    fn add_item(&mut self, item: &T) {
        self.insert(item.clone());
    }
}

macro_rules! set_operator {
    ($trait:ident, $method:ident, $operation:ident) => {
        impl<T, S> $trait<&HashSet<T, S>> for &HashSet<T, S>
        where
            T: Hash + Eq + Clone,
            S: BuildHasher + Clone,
        {
            type Output = HashSet<T, S>;

            fn $method(self, rhs: &HashSet<T, S>) -> HashSet<T, S> {
                SetAlgebra::$operation(self, &[rhs])
            }
        }
    };
}

set_operator!(BitOr, bitor, union);
set_operator!(BitAnd, bitand, intersection);
set_operator!(Sub, sub, difference);
set_operator!(BitXor, bitxor, symmetric_difference);

/// An iterator over the values of a [`HashSet`].
pub struct Iter<'a, T> {
    inner: hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::HashMap;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap(),
                k2: rng.try_next_u64().unwrap(),
            }
        }
    }

    type SipSet<T> = HashSet<T, SipHashBuilder>;

    fn set_of(values: &[i32]) -> SipSet<i32> {
        values.iter().copied().collect()
    }

    fn sorted(set: &SipSet<i32>) -> Vec<i32> {
        let mut values: Vec<i32> = set.iter().copied().collect();
        values.sort();
        values
    }

    #[test]
    fn test_insert_contains_remove() {
        let mut set: SipSet<String> = HashSet::default();
        assert!(set.insert("a".to_string()));
        assert!(!set.insert("a".to_string()));
        assert!(set.insert("b".to_string()));
        assert_eq!(set.len(), 2);

        assert!(set.contains(&"a".to_string()));
        assert_eq!(set.get(&"b".to_string()), Some(&"b".to_string()));
        assert!(!set.contains(&"c".to_string()));

        assert_eq!(set.remove(&"a".to_string()), Ok("a".to_string()));
        assert_eq!(set.remove(&"a".to_string()), Err(Error::KeyNotFound));
        assert!(!set.discard(&"z".to_string()));
        assert!(set.discard(&"b".to_string()));
        assert!(set.is_empty());
    }

    #[test]
    fn test_try_insert() {
        let mut set: SipSet<u8> = HashSet::default();
        assert_eq!(set.try_insert(1), Ok(true));
        assert_eq!(set.try_insert(1), Ok(false));
    }

    #[test]
    fn test_growth_and_clear() {
        let mut set: SipSet<u32> = HashSet::with_capacity_and_hasher(8, SipHashBuilder::default());
        for i in 0..1000 {
            set.insert(i);
        }
        assert_eq!(set.len(), 1000);
        assert!(set.capacity() >= 1000);
        for i in 0..1000 {
            assert!(set.contains(&i));
        }

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 8);
    }

    #[test]
    fn test_union_intersection_difference() {
        let a = set_of(&[1, 2, 3, 4]);
        let b = set_of(&[3, 4, 5, 6]);

        assert_eq!(sorted(&(&a | &b)), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(sorted(&(&a & &b)), vec![3, 4]);
        assert_eq!(sorted(&(&a - &b)), vec![1, 2]);
        assert_eq!(sorted(&(&a ^ &b)), vec![1, 2, 5, 6]);

        // Operands are untouched.
        assert_eq!(sorted(&a), vec![1, 2, 3, 4]);
        assert_eq!(sorted(&b), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_many_operands() {
        let a = set_of(&[1, 2, 3, 4, 5]);
        let b = set_of(&[2, 3, 4]);
        let c = set_of(&[3, 4, 9]);

        assert_eq!(sorted(&a.union(&[&b, &c])), vec![1, 2, 3, 4, 5, 9]);
        assert_eq!(sorted(&a.intersection(&[&b, &c])), vec![3, 4]);
        assert_eq!(sorted(&a.difference(&[&b, &c])), vec![1, 5]);
        // ((a ^ b) ^ c) = {1, 5} ^ {3, 4, 9}
        assert_eq!(
            sorted(&a.symmetric_difference(&[&b, &c])),
            vec![1, 3, 4, 5, 9]
        );
    }

    #[test]
    fn test_no_operands() {
        let a = set_of(&[1, 2]);
        let none: [&SipSet<i32>; 0] = [];

        assert_eq!(a.union(&none), a);
        assert_eq!(a.intersection(&none), a);
        assert_eq!(a.difference(&none), a);
        assert_eq!(a.symmetric_difference(&none), a);
    }

    #[test]
    fn test_relations() {
        let a = set_of(&[1, 2]);
        let b = set_of(&[1, 2, 3]);
        let c = set_of(&[7]);
        let empty = set_of(&[]);

        assert!(a.is_subset(&b));
        assert!(!b.is_subset(&a));
        assert!(b.is_superset(&a));
        assert!(a.is_disjoint(&c));
        assert!(!a.is_disjoint(&b));
        assert!(empty.is_subset(&a));
        assert!(empty.is_disjoint(&empty));
    }

    #[test]
    fn test_relations_against_map_keys() {
        let set = set_of(&[1, 2]);
        let mut map: HashMap<i32, &str, SipHashBuilder> = HashMap::default();
        map.insert(1, "one");
        map.insert(2, "two");
        map.insert(3, "three");

        assert!(set.is_subset(&map));
        assert!(!set.is_superset(&map));
        assert_eq!(sorted(&set.intersection(&[&map])), vec![1, 2]);
        assert!(set.difference(&[&map]).is_empty());
    }

    #[test]
    fn test_copy_and_equality() {
        let mut a = set_of(&[1, 2, 3]);
        let copy = a.copy();
        assert_eq!(a, copy);
        assert_eq!(copy.initial_size(), a.initial_size());

        a.insert(4);
        assert_ne!(a, copy);
        assert_eq!(copy.len(), 3);
    }

    #[test]
    fn test_into_iter_and_debug() {
        let mut set: SipSet<i32> = HashSet::default();
        set.insert(5);
        assert_eq!(format!("{:?}", set), "{5}");

        let mut borrowed = 0;
        for value in &set {
            borrowed += *value;
        }
        assert_eq!(borrowed, 5);

        let owned: Vec<i32> = set.into_iter().collect();
        assert_eq!(owned, vec![5]);
    }
}
