// (c) Copyright 2025 Helsing GmbH. All rights reserved.
use super::tree::{self, Iter, Link, OnEqual};
use crate::comparator::{Comparator, Natural};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A persistent, comparator-ordered collection.
///
/// `OrderedSet` is immutable: [`insert`](Self::insert) and [`remove`](Self::remove) return a
/// _new_ set and leave `self` untouched. The two share every part of the underlying tree that
/// the operation did not touch, so a derived set costs O(log n) new nodes rather than a copy,
/// and both remain valid for as long as anybody holds them.
///
/// Despite its name, the set does **not** deduplicate. Inserting a value that compares equal to
/// an existing element adds a second entry right after the existing one(s). Callers that need
/// uniqueness (such as [`DocumentSet`](crate::DocumentSet)) remove the equal element first.
///
/// The comparator is fixed at construction and shared (via [`Arc`]) by every set derived from
/// this one.
///
/// ```rust
/// # use docset::OrderedSet;
/// let empty = OrderedSet::<u32>::default();
/// let one = empty.insert(7);
/// let two = one.insert(3);
///
/// assert!(empty.is_empty());
/// assert_eq!(one.iter().collect::<Vec<_>>(), [&7]);
/// assert_eq!(two.iter().collect::<Vec<_>>(), [&3, &7]);
/// assert_eq!(two.index_of(&7), Some(1));
/// ```
pub struct OrderedSet<T, C = Natural> {
    root: Link<T>,
    comparator: Arc<C>,
}

// NOTE: manual impl so we don't require that T: Clone or C: Clone (which derive(Clone) would)
impl<T, C> Clone for OrderedSet<T, C> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            comparator: Arc::clone(&self.comparator),
        }
    }
}

impl<T, C> Default for OrderedSet<T, C>
where
    C: Default,
{
    fn default() -> Self {
        Self {
            root: None,
            comparator: Arc::new(C::default()),
        }
    }
}

impl<T, C> OrderedSet<T, C> {
    /// Returns the number of elements in the set.
    #[inline]
    pub fn len(&self) -> usize {
        tree::len(&self.root)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the comparator this set is ordered by.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the smallest element.
    pub fn first(&self) -> Option<&T> {
        tree::first(&self.root)
    }

    /// Returns the largest element.
    pub fn last(&self) -> Option<&T> {
        tree::last(&self.root)
    }

    /// Returns the element at position `index` in ascending order.
    pub fn get(&self, index: usize) -> Option<&T> {
        tree::select(&self.root, index)
    }

    /// Returns an iterator over the elements in ascending order.
    ///
    /// Every call starts a fresh traversal; the set itself is never consumed.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }

    /// Returns true if `self` and `other` are handles to the very same version of a set.
    ///
    /// This is a cheap, conservative check: sets with equal contents built independently are
    /// not `ptr_eq`.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        tree::ptr_eq(&self.root, &other.root) && Arc::ptr_eq(&self.comparator, &other.comparator)
    }
}

impl<T, C> OrderedSet<T, C>
where
    C: Comparator<T>,
{
    /// Creates an empty set ordered by `comparator`.
    #[doc(alias = "empty")]
    pub fn new(comparator: C) -> Self {
        Self::with_shared_comparator(Arc::new(comparator))
    }

    /// Creates an empty set ordered by an already shared `comparator`.
    pub fn with_shared_comparator(comparator: Arc<C>) -> Self {
        Self {
            root: None,
            comparator,
        }
    }

    /// Creates a set ordered by `comparator` holding all elements of `iter`.
    pub fn from_iter_with<I>(comparator: C, iter: I) -> Self
    where
        T: Clone,
        I: IntoIterator<Item = T>,
    {
        iter.into_iter()
            .fold(Self::new(comparator), |set, value| set.insert(value))
    }

    fn probe<'v>(&'v self, value: &'v T) -> impl Fn(&T) -> Ordering + 'v {
        move |element| self.comparator.compare(value, element)
    }

    /// Returns true if the set holds an element that compares equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Returns the stored element that compares equal to `value`.
    ///
    /// If there are several, which one is returned is unspecified.
    pub fn find(&self, value: &T) -> Option<&T> {
        tree::find(&self.root, &self.probe(value))
    }

    /// Returns the rank of the first element that compares equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        tree::rank(&self.root, &self.probe(value))
    }

    /// Returns an iterator over the elements that do not compare less than `value`, in
    /// ascending order.
    pub fn iter_from(&self, value: &T) -> Iter<'_, T> {
        Iter::seek(&self.root, &self.probe(value))
    }

    /// Returns an iterator over the elements that compare greater than `value`, in ascending
    /// order.
    pub fn iter_after(&self, value: &T) -> Iter<'_, T> {
        Iter::seek(&self.root, &|element: &T| {
            match self.comparator.compare(value, element) {
                Ordering::Less => Ordering::Less,
                Ordering::Equal | Ordering::Greater => Ordering::Greater,
            }
        })
    }

    /// Returns a new set that additionally holds `value`.
    ///
    /// Values that compare equal to existing elements are added as additional entries.
    #[must_use]
    pub fn insert(&self, value: T) -> Self
    where
        T: Clone,
    {
        let root = tree::insert(
            &self.root,
            value,
            &|a: &T, b: &T| self.comparator.compare(a, b),
            OnEqual::Keep,
        );
        Self {
            root: Some(root),
            comparator: Arc::clone(&self.comparator),
        }
    }

    /// Returns a new set without one element that compares equal to `value`.
    ///
    /// If there is no such element, the returned set is `self` (see [`Self::ptr_eq`]).
    #[must_use]
    pub fn remove(&self, value: &T) -> Self
    where
        T: Clone,
    {
        self.try_remove(value).unwrap_or_else(|| self.clone())
    }

    /// Like [`Self::remove`], but returns `None` if no element compares equal to `value`.
    pub fn try_remove(&self, value: &T) -> Option<Self>
    where
        T: Clone,
    {
        let (root, _) = tree::remove(&self.root, &self.probe(value))?;
        Some(Self {
            root,
            comparator: Arc::clone(&self.comparator),
        })
    }

    #[cfg(test)]
    pub(crate) fn assert_well_formed(&self)
    where
        T: fmt::Debug,
    {
        tree::assert_well_formed(&self.root, &|a: &T, b: &T| self.comparator.compare(a, b));
    }
}

impl<'a, T, C> IntoIterator for &'a OrderedSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> fmt::Debug for OrderedSet<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Sets are equal if they hold equal elements in the same order, whatever their comparators.
impl<T, C1, C2> PartialEq<OrderedSet<T, C2>> for OrderedSet<T, C1>
where
    T: PartialEq,
{
    fn eq(&self, other: &OrderedSet<T, C2>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, C> Eq for OrderedSet<T, C> where T: Eq {}

impl<T, C> Hash for OrderedSet<T, C>
where
    T: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for element in self {
            element.hash(state);
        }
    }
}

#[cfg(feature = "serde")]
impl<T, C> ::serde::Serialize for OrderedSet<T, C>
where
    T: ::serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ::serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::Reversed;

    #[test]
    fn empty_set() {
        let set = OrderedSet::<u32>::new(Natural);
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert_eq!(set.first(), None);
        assert_eq!(set.last(), None);
        assert_eq!(set.get(0), None);
        assert_eq!(set.index_of(&1), None);
        assert!(!set.contains(&1));
        assert_eq!(set.iter().next(), None);
    }

    #[test]
    fn insert_is_persistent() {
        let a = OrderedSet::<u32>::default().insert(2).insert(1);
        let b = a.insert(3);
        let c = b.remove(&1);

        assert_eq!(a.iter().copied().collect::<Vec<_>>(), [1, 2]);
        assert_eq!(b.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(c.iter().copied().collect::<Vec<_>>(), [2, 3]);
        assert_eq!(b.first(), Some(&1));
        assert_eq!(b.last(), Some(&3));
        assert_eq!(c.first(), Some(&2));
    }

    #[test]
    fn remove_missing_returns_same_set() {
        let set = OrderedSet::<u32>::default().insert(1).insert(2);
        let same = set.remove(&5);
        assert!(same.ptr_eq(&set));
        assert!(set.try_remove(&5).is_none());
        assert!(!set.remove(&1).ptr_eq(&set));
    }

    #[test]
    fn equal_elements_are_not_deduplicated() {
        // compares by the first field only
        let set = OrderedSet::new(|a: &(u8, char), b: &(u8, char)| a.0.cmp(&b.0))
            .insert((1, 'a'))
            .insert((2, 'b'))
            .insert((1, 'c'));
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.iter().copied().collect::<Vec<_>>(),
            [(1, 'a'), (1, 'c'), (2, 'b')]
        );
        assert_eq!(set.index_of(&(1, 'z')), Some(0));
        assert_eq!(set.index_of(&(2, 'z')), Some(2));

        let set = set.remove(&(1, 'z'));
        assert_eq!(set.len(), 2);
        assert_eq!(set.index_of(&(2, 'z')), Some(1));
    }

    #[test]
    fn custom_order() {
        let set = OrderedSet::from_iter_with(Reversed(Natural), [3, 1, 4, 1, 5, 9, 2, 6]);
        assert_eq!(
            set.iter().copied().collect::<Vec<_>>(),
            [9, 6, 5, 4, 3, 2, 1, 1]
        );
        assert_eq!(set.first(), Some(&9));
        assert_eq!(set.index_of(&4), Some(3));
        assert_eq!(set.get(3), Some(&4));
        assert_eq!(set.iter_from(&4).copied().collect::<Vec<_>>(), [4, 3, 2, 1, 1]);
        assert_eq!(set.iter_after(&4).copied().collect::<Vec<_>>(), [3, 2, 1, 1]);
        assert_eq!(set.iter_after(&1).next(), None);
    }

    #[test]
    fn equality_ignores_comparator() {
        let natural = OrderedSet::from_iter_with(Natural, [1, 2, 3]);
        let closure = OrderedSet::from_iter_with(|a: &i32, b: &i32| a.cmp(b), [3, 2, 1]);
        let reversed = OrderedSet::from_iter_with(Reversed(Natural), [1, 2, 3]);
        assert_eq!(natural, closure);
        assert_ne!(natural, reversed);
        assert_ne!(natural, natural.insert(4));
    }

    #[test]
    fn debug_lists_elements_in_order() {
        let set = OrderedSet::from_iter_with(Natural, ["b", "c", "a"]);
        insta::assert_snapshot!(format!("{set:?}"), @r#"["a", "b", "c"]"#);
    }

    #[test]
    fn sharable_across_threads() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        let set = OrderedSet::from_iter_with(Natural, 0..100u32);
        assert_send_sync(&set);
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let set = set.clone();
                std::thread::spawn(move || set.insert(1000 + i).len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 101);
        }
        assert_eq!(set.len(), 100);
    }

    #[quickcheck]
    fn qc_rank_and_select_agree(values: Vec<u16>) {
        let set = OrderedSet::from_iter_with(Natural, values);
        set.assert_well_formed();
        for (i, value) in set.iter().enumerate() {
            assert_eq!(set.get(i), Some(value));
            let rank = set.index_of(value).unwrap();
            assert!(rank <= i);
            assert_eq!(set.get(rank), Some(value));
        }
    }

    #[quickcheck]
    fn qc_old_versions_are_unchanged(values: Vec<u8>, extra: Vec<u8>) {
        let base = OrderedSet::from_iter_with(Natural, values);
        let before: Vec<_> = base.iter().copied().collect();
        let mut derived = base.clone();
        for (i, v) in extra.into_iter().enumerate() {
            derived = if i % 2 == 0 {
                derived.insert(v)
            } else {
                derived.remove(&v)
            };
        }
        derived.assert_well_formed();
        assert_eq!(base.iter().copied().collect::<Vec<_>>(), before);
        assert_eq!(base.len(), before.len());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_as_sequence() {
        let set = OrderedSet::from_iter_with(Reversed(Natural), [2, 3, 1, 3]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[3,3,2,1]");
        let values: Vec<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(OrderedSet::from_iter_with(Reversed(Natural), values), set);
    }

}
