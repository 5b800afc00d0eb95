// (c) Copyright 2025 Helsing GmbH. All rights reserved.
use super::tree::{self, Link, OnEqual};
use std::{borrow::Borrow, fmt, iter::FusedIterator};

/// A persistent map ordered by key.
///
/// Like [`OrderedSet`](super::OrderedSet), every modification returns a new map that shares all
/// untouched structure with the old one. Unlike it, keys are unique: inserting an existing key
/// replaces its value.
///
/// ```rust
/// # use docset::SortedMap;
/// let v1 = SortedMap::new().insert("b", 2).insert("a", 1);
/// let v2 = v1.insert("a", 10).remove("b");
///
/// assert_eq!(v1.get("a"), Some(&1));
/// assert_eq!(v1.len(), 2);
/// assert_eq!(v2.get("a"), Some(&10));
/// assert_eq!(v2.get("b"), None);
/// ```
pub struct SortedMap<K, V> {
    root: Link<(K, V)>,
}

// NOTE: manual impls so we don't require that K: Clone or V: Clone.
impl<K, V> Clone for SortedMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<K, V> Default for SortedMap<K, V> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<K, V> SortedMap<K, V> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        tree::len(&self.root)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        tree::first(&self.root).map(|(k, v)| (k, v))
    }

    /// Returns the entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        tree::last(&self.root).map(|(k, v)| (k, v))
    }

    /// Returns an iterator over the entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: tree::Iter::new(&self.root),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, v)| v)
    }

    /// Returns true if `self` and `other` are handles to the very same version of a map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        tree::ptr_eq(&self.root, &other.root)
    }
}

impl<K, V> SortedMap<K, V>
where
    K: Ord,
{
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::find(&self.root, &|(k, _): &(K, V)| key.cmp(k.borrow())).map(|(k, v)| (k, v))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).is_some()
    }

    /// Returns the position of `key` in ascending key order.
    pub fn rank<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::rank(&self.root, &|(k, _): &(K, V)| key.cmp(k.borrow()))
    }

    /// Returns a new map in which `key` maps to `value`, replacing any previous value.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self
    where
        K: Clone,
        V: Clone,
    {
        let root = tree::insert(
            &self.root,
            (key, value),
            &|(a, _): &(K, V), (b, _): &(K, V)| a.cmp(b),
            OnEqual::Replace,
        );
        Self { root: Some(root) }
    }

    /// Returns a new map without `key`.
    ///
    /// If `key` is absent, the returned map is `self` (see [`Self::ptr_eq`]).
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q> + Clone,
        V: Clone,
        Q: Ord + ?Sized,
    {
        match self.remove_entry(key) {
            Some((map, _, _)) => map,
            None => self.clone(),
        }
    }

    /// Returns a new map without `key`, along with the removed entry, or `None` if `key` is
    /// absent.
    pub fn remove_entry<Q>(&self, key: &Q) -> Option<(Self, K, V)>
    where
        K: Borrow<Q> + Clone,
        V: Clone,
        Q: Ord + ?Sized,
    {
        let (root, (k, v)) = tree::remove(&self.root, &|(k, _): &(K, V)| key.cmp(k.borrow()))?;
        Some((Self { root }, k, v))
    }
}

impl<K, V> FromIterator<(K, V)> for SortedMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (k, v)| map.insert(k, v))
    }
}

impl<K, V> fmt::Debug for SortedMap<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> PartialEq for SortedMap<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V> Eq for SortedMap<K, V>
where
    K: Eq,
    V: Eq,
{
}

impl<'a, K, V> IntoIterator for &'a SortedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "serde")]
impl<K, V> ::serde::Serialize for SortedMap<K, V>
where
    K: ::serde::Serialize,
    V: ::serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ::serde::Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

/// An iterator over the entries of a [`SortedMap`], in ascending key order.
pub struct Iter<'a, K, V> {
    inner: tree::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
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

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn insert_replaces() {
        let map = SortedMap::new().insert(1, "one").insert(2, "two");
        let map = map.insert(1, "uno");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&"uno"));
        assert_eq!(map.rank(&2), Some(1));
    }

    #[test]
    fn remove_entry() {
        let map: SortedMap<_, _> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        let (rest, key, value) = map.remove_entry("b").unwrap();
        assert_eq!((key, value), ("b", 2));
        assert_eq!(rest.keys().copied().collect::<Vec<_>>(), ["a", "c"]);
        assert!(map.remove_entry("z").is_none());
        assert!(map.remove("z").ptr_eq(&map));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn borrowed_lookups() {
        let map = SortedMap::new()
            .insert(String::from("rooms"), 1)
            .insert(String::from("users"), 2);
        assert!(map.contains_key("rooms"));
        assert_eq!(map.get("users"), Some(&2));
        assert_eq!(map.first(), Some((&String::from("rooms"), &1)));
        assert_eq!(map.last(), Some((&String::from("users"), &2)));
        assert_eq!(map.values().rev().copied().collect::<Vec<_>>(), [2, 1]);
    }

    #[test]
    fn debug_is_a_map() {
        let map: SortedMap<_, _> = [(2, 'b'), (1, 'a')].into_iter().collect();
        insta::assert_snapshot!(format!("{map:?}"), @"{1: 'a', 2: 'b'}");
    }

    #[quickcheck]
    fn qc_matches_btreemap(ops: Vec<(bool, u8, u16)>) {
        let mut model = BTreeMap::new();
        let mut map = SortedMap::new();
        for (insert, k, v) in ops {
            if insert {
                model.insert(k, v);
                map = map.insert(k, v);
            } else {
                model.remove(&k);
                map = map.remove(&k);
            }
        }
        assert_eq!(
            map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
            model.into_iter().collect::<Vec<_>>()
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_as_map() {
        let map: SortedMap<String, u32> = [("b".to_owned(), 2), ("a".to_owned(), 1)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"a":1,"b":2}"#);
        let entries: BTreeMap<String, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(entries.into_iter().collect::<SortedMap<_, _>>(), map);
    }

}
