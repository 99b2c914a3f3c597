#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Error kinds shared by the table and its views.
pub mod error;

/// A HashMap implementation over the linear-probing table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a key-value map interface with configurable hashers.
pub mod hash_map;

/// The open-addressing table underneath the map and set.
///
/// The table is keyed by caller-supplied hashes and equality predicates, so
/// it can be used directly when neither view fits.
pub mod hash_table;

/// A hash set implementation over the linear-probing table.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers.
pub mod hash_set;

/// Union, intersection, difference and relation tests over anything with
/// membership and iteration.
pub mod set_algebra;

pub use error::Error;
pub use hash_map::HashMap;
pub use hash_map::IntoPair;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use set_algebra::SetAlgebra;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hasher builder used by `HashMap::new` and `HashSet::new`.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hasher builder used by `HashMap::new` and `HashSet::new`.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Uninhabited placeholder: without `std` or `foldhash` there is no
        /// default hasher, and maps and sets must be built with
        /// `with_hasher`.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}
