// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Ordering strategies for persistent collections.
//!
//! A [`Comparator`] is injected when a collection is created and then shared by every
//! collection derived from it. Any `Fn(&T, &T) -> Ordering` is a comparator, so most callers
//! can simply pass a closure:
//!
//! ```rust
//! # use docset::OrderedSet;
//! let set = OrderedSet::new(|a: &i32, b: &i32| b.cmp(a))
//!     .insert(1)
//!     .insert(3)
//!     .insert(2);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
//! ```
use crate::Document;
use std::cmp::Ordering;

/// A total order over values of type `T`.
///
/// Implementations must be consistent: the same pair of values has to compare the same way
/// for as long as any collection built with the comparator is alive. Collections rely on this
/// to find elements they inserted earlier.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> Comparator<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Orders values by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<T> Comparator<T> for Natural
where
    T: Ord + ?Sized,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Orders [`Document`]s by their key.
///
/// This is the order of a query without any explicit ordering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ByKey;

impl<D> Comparator<D> for ByKey
where
    D: Document + ?Sized,
{
    #[inline]
    fn compare(&self, a: &D, b: &D) -> Ordering {
        a.key().cmp(b.key())
    }
}

/// Inverts the order of the wrapped comparator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Reversed<C>(pub C);

impl<T, C> Comparator<T> for Reversed<C>
where
    T: ?Sized,
    C: Comparator<T>,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}
