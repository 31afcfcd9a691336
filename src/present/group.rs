use std::hash::{Hash, Hasher};

/// A key with an ordered run of values.
///
/// Used for every grouping the presentation layer needs (one chart
/// category and its items, for instance). Identity is the key alone:
/// two groups with the same key compare equal regardless of their values.
#[derive(Debug, Clone)]
pub struct Group<K, V> {
    pub key: K,
    pub values: Vec<V>,
}

impl<K, V> Group<K, V> {
    pub fn new(key: K, values: Vec<V>) -> Self {
        Self { key, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: PartialEq, V> PartialEq for Group<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Group<K, V> {}

impl<K: Hash, V> Hash for Group<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}
