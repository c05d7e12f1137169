//! Insertion-ordered containers.
//!
//! Several queries break ties by encounter order, so anything that gets
//! iterated is stored in a `Vec` with a hash index on the side.

use std::collections::HashMap;
use std::hash::Hash;

/// Explicit identity of an entity, used wherever set or map semantics apply.
pub trait Keyed {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;
}

/// Iterator over the values of an [`OrderedMap`], in insertion order.
pub type Values<'a, K, V> = std::iter::Map<std::slice::Iter<'a, (K, V)>, fn(&'a (K, V)) -> &'a V>;

#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    positions: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.positions.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = *self.positions.get(key)?;
        Some(&mut self.entries[i].1)
    }

    /// Returns the value for `key`, inserting `default()` at the end first if
    /// the key is new. The flag is true when the value was just inserted.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, default: F) -> (&mut V, bool) {
        let (index, inserted) = match self.positions.get(&key) {
            Some(&i) => (i, false),
            None => {
                let i = self.entries.len();
                self.positions.insert(key.clone(), i);
                self.entries.push((key, default()));
                (i, true)
            }
        };
        (&mut self.entries[index].1, inserted)
    }

    /// Inserts only if the key is absent. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> bool {
        if self.positions.contains_key(&key) {
            return false;
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values<'a>(&'a self) -> Values<'a, K, V> {
        let value: fn(&'a (K, V)) -> &'a V = |(_, v)| v;
        self.entries.iter().map(value)
    }
}

impl<K: Eq + Hash + Clone, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// Order matters: two maps holding the same pairs in different order differ.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// Set of plain values in first-inserted order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedSet<T> {
    inner: OrderedMap<T, ()>,
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    pub fn new() -> Self {
        Self {
            inner: OrderedMap::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> bool {
        self.inner.insert_if_absent(value, ())
    }

    pub fn contains(&self, value: &T) -> bool {
        self.inner.contains_key(value)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inner.keys()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Eq + Hash + Clone> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// Set of entities deduplicated by [`Keyed::key`]. The first entity inserted
/// for a key is kept; later ones with the same key are dropped.
#[derive(Debug, Clone)]
pub struct KeyedSet<T: Keyed> {
    items: OrderedMap<T::Key, T>,
}

impl<T: Keyed> KeyedSet<T> {
    pub fn new() -> Self {
        Self {
            items: OrderedMap::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> bool {
        self.items.insert_if_absent(item.key(), item)
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.get(key)
    }

    pub fn contains_key(&self, key: &T::Key) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }
}

impl<T: Keyed> Default for KeyedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> FromIterator<T> for KeyedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

// Set equality: same keys, and equal full values under each key. Insertion
// order is ignored.
impl<T: Keyed + PartialEq> PartialEq for KeyedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|item| other.get(&item.key()).is_some_and(|o| o == item))
    }
}
