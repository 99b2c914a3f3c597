use std::collections::BTreeSet;
use std::hash::BuildHasherDefault;
use std::hash::Hasher;
use std::hash::RandomState;

use probe_hash::Error;
use probe_hash::HashMap;
use probe_hash::HashSet;
use probe_hash::SetAlgebra;

/// Hashes a `u64` to itself so tests can pick home slots.
#[derive(Default)]
struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = (self.0 << 8) | byte as u64;
        }
    }

    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
}

type Identity = BuildHasherDefault<IdentityHasher>;

fn sorted<T: Ord + Copy>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    values.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

#[test]
fn growth_from_eight_slots_keeps_every_key() {
    let mut map = HashMap::with_capacity_and_hasher(8, RandomState::new());
    let mut capacities = Vec::new();
    for key in 1..=12 {
        map.insert(key, key * 100);
        capacities.push(map.capacity());
    }

    assert_eq!(map.len(), 12);
    // Doubles before the 7th insert (6/8) and again before the 12th (11/16).
    assert_eq!(capacities[5], 8);
    assert_eq!(capacities[6], 16);
    assert_eq!(capacities[10], 16);
    assert_eq!(capacities[11], 32);
    for key in 1..=12 {
        assert_eq!(map.get(&key), Some(&(key * 100)));
    }
}

#[test]
fn set_operations_on_overlapping_sets() {
    let a: HashSet<i32, RandomState> = [1, 2, 3, 4].into_iter().collect();
    let b: HashSet<i32, RandomState> = [3, 4, 5, 6].into_iter().collect();

    assert_eq!(sorted(a.union(&[&b]).iter().copied()), [1, 2, 3, 4, 5, 6]);
    assert_eq!(sorted(a.intersection(&[&b]).iter().copied()), [3, 4]);
    assert_eq!(sorted(a.difference(&[&b]).iter().copied()), [1, 2]);
    assert_eq!(
        sorted(a.symmetric_difference(&[&b]).iter().copied()),
        [1, 2, 5, 6]
    );
}

#[test]
fn discard_is_lenient_and_remove_is_strict() {
    let mut map = HashMap::with_hasher(RandomState::new());
    map.update([("a", 1), ("b", 2)]);

    assert!(!map.discard(&"z"));
    assert_eq!(map.len(), 2);

    assert_eq!(map.remove(&"a"), Ok(1));
    assert_eq!(map.remove(&"a"), Err(Error::KeyNotFound));
    assert_eq!(map.len(), 1);
}

#[test]
fn get_with_default_does_not_fail() {
    let map: HashMap<&str, i32, RandomState> = HashMap::with_hasher(RandomState::new());
    assert_eq!(*map.get_or(&"missing", &-1), -1);
    assert_eq!(map.try_get(&"missing"), Err(Error::KeyNotFound));
}

#[test]
fn new_key_reuses_tombstone_on_its_probe_path() {
    let mut map: HashMap<u64, &str, Identity> = HashMap::default();
    // 1, 9 and 17 share home slot 1 of 8.
    map.insert(1, "one");
    map.insert(9, "nine");
    map.remove(&1).unwrap();

    // 9 is still reachable past the tombstone in slot 1.
    assert_eq!(map.get(&9), Some(&"nine"));

    map.insert(17, "seventeen");
    assert_eq!(map.capacity(), 8);
    // Backing-array order shows 17 took slot 1 ahead of 9 in slot 2.
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [17, 9]);
}

#[test]
fn overwrite_keeps_slot_when_tombstone_precedes_it() {
    let mut map: HashMap<u64, i32, Identity> = HashMap::default();
    map.insert(2, 0);
    map.insert(10, 0);
    map.insert(18, 0);
    map.remove(&2).unwrap();

    assert_eq!(map.insert(18, 5), Some(0));
    assert_eq!(map.len(), 2);
    assert_eq!(map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(), [(10, 0), (18, 5)]);
}

#[test]
fn clear_forgets_growth() {
    let mut set: HashSet<u64, Identity> = HashSet::with_capacity_and_hasher(2, Identity::default());
    set.extend(0..50);
    assert!(set.capacity() >= 76);

    set.clear();
    assert_eq!(set.capacity(), 2);
    assert!(set.insert(7));
    assert!(set.contains(&7));
}

#[test]
fn map_equality_only_compares_keys() {
    let left: HashMap<&str, i32, RandomState> =
        [("a", 1), ("b", 2)].into_iter().collect();
    let right: HashMap<&str, i32, RandomState> =
        [("a", -1), ("b", -2)].into_iter().collect();
    let shorter: HashMap<&str, i32, RandomState> = [("a", 1)].into_iter().collect();

    assert!(left == right);
    assert!(left != shorter);
}

#[test]
fn sets_and_maps_share_relations() {
    let mut inventory = HashMap::with_hasher(RandomState::new());
    inventory.update(vec![vec!["apples", "3"], vec!["pears", "0"]]);
    let wanted: HashSet<&str, RandomState> = ["apples", "plums"].into_iter().collect();

    let stocked = wanted.intersection(&[&inventory]);
    assert_eq!(stocked.iter().copied().collect::<Vec<_>>(), ["apples"]);

    let missing = wanted.difference(&[&inventory]);
    assert_eq!(missing.iter().copied().collect::<Vec<_>>(), ["plums"]);
    assert!(!wanted.is_subset(&inventory));
    assert!(stocked.is_subset(&inventory));
}

#[test]
fn map_union_takes_later_values() {
    let base: HashMap<&str, i32, RandomState> = [("a", 1), ("b", 2)].into_iter().collect();
    let first: HashMap<&str, i32, RandomState> = [("b", 20), ("c", 30)].into_iter().collect();
    let second: HashMap<&str, i32, RandomState> = [("c", 300)].into_iter().collect();

    let merged = base.union(&[&first, &second]);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[&"a"], 1);
    assert_eq!(merged[&"b"], 20);
    assert_eq!(merged[&"c"], 300);
    assert_eq!(base[&"b"], 2);
}
