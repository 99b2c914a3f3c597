//! The operations only use the primitives a collection provides through
//! [`SetAlgebra`]: membership by key, iteration, copying, and adding an item.
//! They never reach into table slots.
//!
//! For a [`HashSet`](crate::HashSet) an item is the element itself. For a
//! [`HashMap`](crate::HashMap) an item is a `(key, value)` pair and
//! membership is by key, so a set can be intersected with a map's keys.

/// Set operations built on membership and iteration.
///
/// Implementors supply the primitives; the operations are provided. No
/// operation mutates `self` or any operand.
///
/// # Panics
///
/// Operations that build a new collection insert into it and panic if the
/// collection reports [`Error::ConsistencyViolation`](crate::Error).
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use probe_hash::HashSet;
/// use probe_hash::SetAlgebra;
///
/// let a: HashSet<i32> = [1, 2, 3, 4].into_iter().collect();
/// let b: HashSet<i32> = [3, 4, 5, 6].into_iter().collect();
///
/// let both = a.intersection(&[&b]);
/// let expected: HashSet<i32> = [3, 4].into_iter().collect();
/// assert_eq!(both, expected);
/// assert!(both.is_subset(&a));
/// assert!(a.union(&[&b]).is_superset(&b));
/// # }
/// ```
pub trait SetAlgebra: Sized {
    /// What membership is decided by.
    type Key;
    /// What the collection stores and copies between collections.
    type Item;

    /// Returns the key of a stored item.
    fn key_of(item: &Self::Item) -> &Self::Key;

    /// Iterates over the stored items.
    fn items(&self) -> impl Iterator<Item = &Self::Item>;

    /// Returns `true` if an item with this key is present.
    fn contains_key(&self, key: &Self::Key) -> bool;

    /// Returns an empty collection configured like `self`.
    fn empty_like(&self) -> Self;

    /// Returns a new collection holding the same items as `self`.
    fn copy(&self) -> Self;

    /// Adds a copy of `item`, replacing the item with the same key if present.
    fn add_item(&mut self, item: &Self::Item);

    /// Returns a copy of `self` with every item of every collection in
    /// `others` added, in order. For maps, later sources win on shared keys.
    fn union<O>(&self, others: &[&O]) -> Self
    where
        O: SetAlgebra<Key = Self::Key, Item = Self::Item>,
    {
        let mut result = self.copy();
        for other in others {
            for item in other.items() {
                result.add_item(item);
            }
        }
        result
    }

    /// Returns the items of `self` whose key is present in every collection
    /// in `others`.
    fn intersection<O>(&self, others: &[&O]) -> Self
    where
        O: SetAlgebra<Key = Self::Key>,
    {
        let mut result = self.empty_like();
        for item in self.items() {
            let key = Self::key_of(item);
            if others.iter().all(|other| other.contains_key(key)) {
                result.add_item(item);
            }
        }
        result
    }

    /// Returns the items of `self` whose key is present in none of `others`.
    fn difference<O>(&self, others: &[&O]) -> Self
    where
        O: SetAlgebra<Key = Self::Key>,
    {
        let mut result = self.empty_like();
        for item in self.items() {
            let key = Self::key_of(item);
            if !others.iter().any(|other| other.contains_key(key)) {
                result.add_item(item);
            }
        }
        result
    }

    /// Folds `(acc - other) | (other - acc)` over `others` from left to right,
    /// starting from a copy of `self`.
    fn symmetric_difference<O>(&self, others: &[&O]) -> Self
    where
        O: SetAlgebra<Key = Self::Key, Item = Self::Item>,
    {
        let mut result = self.copy();
        for &other in others {
            let left = result.difference(&[other]);
            let right = other.difference(&[&result]);
            result = left.union(&[&right]);
        }
        result
    }

    /// Returns `true` if every key of `self` is present in `other`.
    fn is_subset<O>(&self, other: &O) -> bool
    where
        O: SetAlgebra<Key = Self::Key>,
    {
        self.items()
            .all(|item| other.contains_key(Self::key_of(item)))
    }

    /// Returns `true` if every key of `other` is present in `self`.
    fn is_superset<O>(&self, other: &O) -> bool
    where
        O: SetAlgebra<Key = Self::Key>,
    {
        other
            .items()
            .all(|item| self.contains_key(O::key_of(item)))
    }

    /// Returns `true` if no key of `self` is present in `other`.
    fn is_disjoint<O>(&self, other: &O) -> bool
    where
        O: SetAlgebra<Key = Self::Key>,
    {
        !self
            .items()
            .any(|item| other.contains_key(Self::key_of(item)))
    }
}
