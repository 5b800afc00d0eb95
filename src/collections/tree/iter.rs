// (c) Copyright 2025 Helsing GmbH. All rights reserved.
use super::{Link, Node, len};
use smallvec::SmallVec;
use std::{cmp::Ordering, fmt, iter::FusedIterator};

// An AVL tree of height 32 holds several million elements, so traversal stacks almost never
// spill to the heap.
type Stack<'a, T> = SmallVec<[&'a Node<T>; 32]>;

/// An in-order iterator over the elements of a persistent tree.
///
/// The iterator borrows the tree; it never consumes or modifies it, so iterating again simply
/// means asking the collection for a new iterator.
pub struct Iter<'a, T> {
    /// Nodes still to be yielded from the front, with their right subtrees.
    front: Stack<'a, T>,
    /// Nodes still to be yielded from the back, with their left subtrees.
    back: Stack<'a, T>,
    /// The number of elements not yet yielded from either end.
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: &'a Link<T>) -> Self {
        let mut iter = Self {
            front: SmallVec::new(),
            back: SmallVec::new(),
            remaining: len(root),
        };
        iter.descend_left(root.as_deref());
        iter.descend_right(root.as_deref());
        iter
    }

    /// Creates an iterator that starts at the first element for which `probe` does not return
    /// [`Ordering::Greater`].
    pub(crate) fn seek<P>(root: &'a Link<T>, probe: &P) -> Self
    where
        P: Fn(&T) -> Ordering + ?Sized,
    {
        let mut front = SmallVec::new();
        let mut skipped = 0;
        let mut link = root.as_deref();
        while let Some(n) = link {
            if probe(&n.value) == Ordering::Greater {
                skipped += len(&n.left) + 1;
                link = n.right.as_deref();
            } else {
                front.push(n);
                link = n.left.as_deref();
            }
        }
        let mut iter = Self {
            front,
            back: SmallVec::new(),
            remaining: len(root) - skipped,
        };
        iter.descend_right(root.as_deref());
        iter
    }

    fn descend_left(&mut self, mut link: Option<&'a Node<T>>) {
        while let Some(n) = link {
            self.front.push(n);
            link = n.left.as_deref();
        }
    }

    fn descend_right(&mut self, mut link: Option<&'a Node<T>>) {
        while let Some(n) = link {
            self.back.push(n);
            link = n.right.as_deref();
        }
    }
}

// NOTE: manual impl so we don't require that T: Clone (which derive(Clone) would)
impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T> fmt::Debug for Iter<'_, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let n = self.front.pop()?;
        self.remaining -= 1;
        self.descend_left(n.right.as_deref());
        Some(&n.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let n = self.back.pop()?;
        self.remaining -= 1;
        self.descend_right(n.left.as_deref());
        Some(&n.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
