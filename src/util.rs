//! Generic collection helpers: shuffling, index access and slicing over
//! insertion-ordered maps.

use std::hash::Hash;

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;

/// Fisher-Yates shuffle in place.
pub fn shuffle<T>(items: &mut [T]) {
    items.shuffle(&mut rand::rng());
}

/// A copy of `map` with its entries in random order. Insertion order is the
/// only thing that changes; keys and values are untouched.
pub fn shuffled_map<K, V>(map: &IndexMap<K, V>) -> IndexMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone,
{
    let mut keys: Vec<&K> = map.keys().collect();
    shuffle(&mut keys);
    keys.into_iter()
        .filter_map(|key| map.get_key_value(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Key at position `index` in insertion order.
pub fn key_at<'a, K, V>(map: &'a IndexMap<K, V>, index: usize) -> Option<&'a K> {
    map.get_index(index).map(|(key, _)| key)
}

/// Entries whose positions fall in `from..=to` (both bounds inclusive).
pub fn slice_map<K, V>(map: &IndexMap<K, V>, from: usize, to: usize) -> IndexMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone,
{
    map.iter()
        .enumerate()
        .filter(|(index, _)| *index >= from && *index <= to)
        .map(|(_, (key, value))| (key.clone(), value.clone()))
        .collect()
}

/// Random integer in `min..=max`.
pub fn random_between(min: i64, max: i64) -> i64 {
    rand::rng().random_range(min..=max)
}
