// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! # Persistent AVL tree
//!
//! This module provides the balanced binary search tree that backs both
//! [`OrderedSet`](super::OrderedSet) and [`SortedMap`](super::SortedMap).
//!
//! Nodes are immutable once built and are shared between versions through [`Arc`]. Every
//! modifying operation copies only the nodes on the path from the root to the modified
//! position and links the untouched subtrees of the old version into the new one. Retaining an
//! old version therefore costs O(log n) nodes per derived version, not a full copy.
//!
//! The tree is height-balanced (AVL) and every node also records the number of elements in its
//! subtree, which gives O(log n) rank and select-by-rank.
//!
//! The tree does not know how its elements are ordered. Lookups take a _probe_: a closure that
//! reports where the element being searched for lies relative to the element of the node it
//! is handed (`target.cmp(node)`, in other words). Insertion takes a comparator over elements.

use std::{cmp::Ordering, sync::Arc};

mod iter;
pub use iter::Iter;

pub(crate) type Link<T> = Option<Arc<Node<T>>>;

pub(crate) struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
    /// Height of the subtree rooted at this node. Leaves have height 1.
    height: u8,
    /// Number of elements in the subtree rooted at this node.
    len: usize,
}

/// What [`insert`] does when it meets an element that compares equal to the inserted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnEqual {
    /// Keep the existing element and place the new one after it.
    Keep,
    /// Replace the existing element in place.
    Replace,
}

#[inline]
pub(crate) fn height<T>(link: &Link<T>) -> u8 {
    link.as_ref().map_or(0, |node| node.height)
}

#[inline]
pub(crate) fn len<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.len)
}

/// Returns true if both links point at the very same node (or are both empty).
pub(crate) fn ptr_eq<T>(a: &Link<T>, b: &Link<T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

fn node<T>(value: T, left: Link<T>, right: Link<T>) -> Arc<Node<T>> {
    let height = height(&left).max(height(&right)) + 1;
    let len = len(&left) + len(&right) + 1;
    Arc::new(Node {
        value,
        left,
        right,
        height,
        len,
    })
}

/// Builds a node from `value` and two subtrees whose heights differ by at most two, rotating
/// as needed to restore the AVL balance.
fn balance<T: Clone>(value: T, left: Link<T>, right: Link<T>) -> Arc<Node<T>> {
    let (hl, hr) = (height(&left), height(&right));
    if hl > hr + 1 {
        if let Some(l) = left.as_deref() {
            return match l.right.as_deref() {
                // left-right case
                Some(lr) if height(&l.right) > height(&l.left) => node(
                    lr.value.clone(),
                    Some(node(l.value.clone(), l.left.clone(), lr.left.clone())),
                    Some(node(value, lr.right.clone(), right)),
                ),
                _ => node(
                    l.value.clone(),
                    l.left.clone(),
                    Some(node(value, l.right.clone(), right)),
                ),
            };
        }
    } else if hr > hl + 1 {
        if let Some(r) = right.as_deref() {
            return match r.left.as_deref() {
                // right-left case
                Some(rl) if height(&r.left) > height(&r.right) => node(
                    rl.value.clone(),
                    Some(node(value, left, rl.left.clone())),
                    Some(node(r.value.clone(), rl.right.clone(), r.right.clone())),
                ),
                _ => node(
                    r.value.clone(),
                    Some(node(value, left, r.left.clone())),
                    r.right.clone(),
                ),
            };
        }
    }
    node(value, left, right)
}

/// Returns a new root with `value` inserted at the position given by `cmp`.
pub(crate) fn insert<T, F>(link: &Link<T>, value: T, cmp: &F, on_equal: OnEqual) -> Arc<Node<T>>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering + ?Sized,
{
    let Some(n) = link else {
        return node(value, None, None);
    };
    match cmp(&value, &n.value) {
        Ordering::Equal if on_equal == OnEqual::Replace => Arc::new(Node {
            value,
            left: n.left.clone(),
            right: n.right.clone(),
            height: n.height,
            len: n.len,
        }),
        Ordering::Less => balance(
            n.value.clone(),
            Some(insert(&n.left, value, cmp, on_equal)),
            n.right.clone(),
        ),
        Ordering::Equal | Ordering::Greater => balance(
            n.value.clone(),
            n.left.clone(),
            Some(insert(&n.right, value, cmp, on_equal)),
        ),
    }
}

/// Removes one element for which `probe` returns [`Ordering::Equal`].
///
/// Returns the new root along with the removed element, or `None` if no element matched, in
/// which case the original tree is still the current one.
pub(crate) fn remove<T, P>(link: &Link<T>, probe: &P) -> Option<(Link<T>, T)>
where
    T: Clone,
    P: Fn(&T) -> Ordering + ?Sized,
{
    let n = link.as_ref()?;
    match probe(&n.value) {
        Ordering::Less => {
            let (left, removed) = remove(&n.left, probe)?;
            Some((Some(balance(n.value.clone(), left, n.right.clone())), removed))
        }
        Ordering::Greater => {
            let (right, removed) = remove(&n.right, probe)?;
            Some((Some(balance(n.value.clone(), n.left.clone(), right)), removed))
        }
        Ordering::Equal => Some((unlink(n), n.value.clone())),
    }
}

/// Joins the two subtrees of `n`, dropping `n` itself.
fn unlink<T: Clone>(n: &Node<T>) -> Link<T> {
    match (&n.left, &n.right) {
        (None, right) => right.clone(),
        (left, None) => left.clone(),
        (left, Some(right)) => {
            let (rest, successor) = remove_first(right);
            Some(balance(successor, left.clone(), rest))
        }
    }
}

fn remove_first<T: Clone>(n: &Node<T>) -> (Link<T>, T) {
    match &n.left {
        None => (n.right.clone(), n.value.clone()),
        Some(left) => {
            let (rest, first) = remove_first(left);
            (Some(balance(n.value.clone(), rest, n.right.clone())), first)
        }
    }
}

/// Returns some element for which `probe` returns [`Ordering::Equal`].
pub(crate) fn find<'a, T, P>(mut link: &'a Link<T>, probe: &P) -> Option<&'a T>
where
    P: Fn(&T) -> Ordering + ?Sized,
{
    while let Some(n) = link {
        match probe(&n.value) {
            Ordering::Less => link = &n.left,
            Ordering::Greater => link = &n.right,
            Ordering::Equal => return Some(&n.value),
        }
    }
    None
}

/// Returns the rank of the first element for which `probe` returns [`Ordering::Equal`].
pub(crate) fn rank<T, P>(mut link: &Link<T>, probe: &P) -> Option<usize>
where
    P: Fn(&T) -> Ordering + ?Sized,
{
    let mut skipped = 0;
    let mut found = None;
    while let Some(n) = link {
        match probe(&n.value) {
            Ordering::Less => link = &n.left,
            Ordering::Greater => {
                skipped += len(&n.left) + 1;
                link = &n.right;
            }
            Ordering::Equal => {
                // equal elements are contiguous in order, so keep looking left for an earlier one
                found = Some(skipped + len(&n.left));
                link = &n.left;
            }
        }
    }
    found
}

/// Returns the element with the given rank.
pub(crate) fn select<T>(mut link: &Link<T>, mut index: usize) -> Option<&T> {
    while let Some(n) = link {
        let left = len(&n.left);
        match index.cmp(&left) {
            Ordering::Less => link = &n.left,
            Ordering::Equal => return Some(&n.value),
            Ordering::Greater => {
                index -= left + 1;
                link = &n.right;
            }
        }
    }
    None
}

pub(crate) fn first<T>(link: &Link<T>) -> Option<&T> {
    let mut n = link.as_deref()?;
    while let Some(left) = n.left.as_deref() {
        n = left;
    }
    Some(&n.value)
}

pub(crate) fn last<T>(link: &Link<T>) -> Option<&T> {
    let mut n = link.as_deref()?;
    while let Some(right) = n.right.as_deref() {
        n = right;
    }
    Some(&n.value)
}

/// Asserts that `link` is a well-formed AVL tree ordered by `cmp`.
#[cfg(test)]
pub(crate) fn assert_well_formed<T, F>(link: &Link<T>, cmp: &F)
where
    T: std::fmt::Debug,
    F: Fn(&T, &T) -> Ordering + ?Sized,
{
    fn walk<T>(link: &Link<T>) -> (u8, usize) {
        let Some(n) = link else {
            return (0, 0);
        };
        let (hl, ll) = walk(&n.left);
        let (hr, lr) = walk(&n.right);
        assert!(hl.abs_diff(hr) <= 1, "unbalanced: {hl} vs {hr}");
        assert_eq!(n.height, hl.max(hr) + 1, "stale height");
        assert_eq!(n.len, ll + lr + 1, "stale len");
        (n.height, n.len)
    }
    walk(link);

    let elements: Vec<_> = Iter::new(link).collect();
    for pair in elements.windows(2) {
        assert_ne!(
            cmp(pair[0], pair[1]),
            Ordering::Greater,
            "out of order: {:?} before {:?}",
            pair[0],
            pair[1]
        );
    }
}
