//! Map from a key to a list of items.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Single-threaded multimap keeping items per key in insertion order.
#[derive(Debug, Clone)]
pub struct MultiMap<K, E> {
    map: HashMap<K, Vec<E>>,
}

impl<K, E> MultiMap<K, E>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Appends `item` to the list at `key`, creating the list if needed.
    pub fn put(&mut self, key: K, item: E) {
        self.map.entry(key).or_default().push(item);
    }

    /// Replaces the list at `key` with `items`.
    pub fn put_all(&mut self, key: K, items: Vec<E>) {
        self.map.insert(key, items);
    }

    pub fn get(&self, key: &K) -> Option<&[E]> {
        self.map.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns true if the list at `key` holds `item`.
    pub fn contains_key_value(&self, key: &K, item: &E) -> bool
    where
        E: PartialEq,
    {
        self.map
            .get(key)
            .is_some_and(|items| items.contains(item))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, E> Default for MultiMap<K, E>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

// Two maps are equal when every key holds the same list in the same order.
impl<K, E> PartialEq for MultiMap<K, E>
where
    K: Hash + Eq,
    E: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K, E> Eq for MultiMap<K, E>
where
    K: Hash + Eq,
    E: Eq,
{
}

impl<K, E> fmt::Display for MultiMap<K, E>
where
    K: fmt::Display,
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, items)) in self.map.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}=[", key)?;
            for (j, item) in items.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, "]")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_put_appends_in_order() {
        let mut map = MultiMap::new();
        map.put("fruit", "apple");
        map.put("fruit", "pear");

        assert_eq!(map.get(&"fruit"), Some(&["apple", "pear"][..]));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_put_all_replaces_list() {
        let mut map = MultiMap::new();
        map.put("fruit", "apple");
        map.put_all("fruit", vec!["kiwi"]);

        assert_eq!(map.get(&"fruit"), Some(&["kiwi"][..]));
    }

    #[test]
    fn test_get_missing_key() {
        let map: MultiMap<&str, i32> = MultiMap::new();
        assert_eq!(map.get(&"nothing"), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_contains() {
        let mut map = MultiMap::new();
        map.put(1, "one");

        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
        assert!(map.contains_key_value(&1, &"one"));
        assert!(!map.contains_key_value(&1, &"uno"));
        assert!(!map.contains_key_value(&2, &"one"));
    }

    #[test]
    fn test_keys() {
        let mut map = MultiMap::new();
        map.put("a", 1);
        map.put("b", 2);
        map.put("a", 3);

        let keys: HashSet<_> = map.keys().copied().collect();
        assert_eq!(keys, HashSet::from(["a", "b"]));
    }

    #[test]
    fn test_equality_ignores_key_order_but_not_item_order() {
        let mut left = MultiMap::new();
        left.put("a", 1);
        left.put("b", 2);
        left.put("a", 3);

        let mut right = MultiMap::new();
        right.put("b", 2);
        right.put_all("a", vec![1, 3]);
        assert_eq!(left, right);

        right.put_all("a", vec![3, 1]);
        assert_ne!(left, right);
    }

    #[test]
    fn test_display() {
        let mut map = MultiMap::new();
        map.put("a", 1);
        map.put("a", 2);

        assert_eq!(map.to_string(), "{a=[1, 2]}");
    }
}
