// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! # Document Sets
//!
//! A [`DocumentSet`] is the immutable result set of a query: a collection of [`Document`]s with
//! unique keys, kept in the order of a query-specific [`Comparator`].
//!
//! Internally it holds two persistent views over the same documents:
//!
//! - an **index** from key to document, answering "which document has this key?", and
//! - an **ordered view**, answering "what comes first?" and "where is this document?".
//!
//! Both views always hold exactly the same documents, and every key appears at most once. Adding
//! a document whose key is already present _replaces_ the old document, even if the two
//! documents sort to different positions.
//!
//! Derived sets share structure with the set they were derived from. A query listener typically
//! keeps the previous result around, derives the next one document by document, and then diffs
//! the two: both stay fully usable.
//!
//! ```rust
//! # use docset::{ByKey, Document, DocumentKey, DocumentSet, doc_key};
//! # #[derive(Debug, PartialEq)]
//! # struct Message { key: DocumentKey, text: &'static str }
//! # impl Document for Message {
//! #     type Key = DocumentKey;
//! #     fn key(&self) -> &DocumentKey { &self.key }
//! # }
//! let before = DocumentSet::new(ByKey)
//!     .adding_document(Message { key: doc_key!("messages/b"), text: "hi" })
//!     .adding_document(Message { key: doc_key!("messages/a"), text: "hello" });
//! let after = before.removing_key(&doc_key!("messages/a"));
//!
//! assert_eq!(before.len(), 2);
//! assert_eq!(before.first().map(|m| m.text), Some("hello"));
//! assert_eq!(after.first().map(|m| m.text), Some("hi"));
//! assert_eq!(after.index_of_key(&doc_key!("messages/b")), Some(0));
//! ```

mod integrity;
pub use integrity::IntegrityError;

use crate::{
    Comparator, Document, FINGERPRINT_HASHER,
    collections::{Iter, OrderedSet, SortedMap},
    comparator::ByKey,
};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};
use tracing::{error, trace};

/// Orders documents by a user comparator, falling back to their keys.
///
/// Keys are unique within a [`DocumentSet`], so under this order no two of its documents compare
/// equal. That lets the ordered view find the exact document the index points at, even when the
/// user comparator considers several documents equivalent.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct KeyTieBreak<C>(pub(crate) C);

impl<D, C> Comparator<Arc<D>> for KeyTieBreak<C>
where
    D: Document,
    C: Comparator<D>,
{
    #[inline]
    fn compare(&self, a: &Arc<D>, b: &Arc<D>) -> Ordering {
        self.0
            .compare(&**a, &**b)
            .then_with(|| a.key().cmp(b.key()))
    }
}

/// An immutable set of documents with unique keys, ordered by a [`Comparator`].
///
/// See the [module documentation](self) for an overview.
pub struct DocumentSet<D, C = ByKey>
where
    D: Document,
{
    index: SortedMap<D::Key, Arc<D>>,
    ordered: OrderedSet<Arc<D>, KeyTieBreak<C>>,
}

// NOTE: manual impl so we don't require that D: Clone or C: Clone (which derive(Clone) would)
impl<D, C> Clone for DocumentSet<D, C>
where
    D: Document,
{
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            ordered: self.ordered.clone(),
        }
    }
}

impl<D, C> Default for DocumentSet<D, C>
where
    D: Document,
    C: Default,
{
    fn default() -> Self {
        Self {
            index: SortedMap::new(),
            ordered: OrderedSet::default(),
        }
    }
}

impl<D, C> DocumentSet<D, C>
where
    D: Document,
{
    /// Returns the number of documents in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the comparator the set is ordered by.
    pub fn comparator(&self) -> &C {
        &self.ordered.comparator().0
    }

    pub fn contains_key(&self, key: &D::Key) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the document stored under `key`.
    #[doc(alias = "document_for_key")]
    pub fn document(&self, key: &D::Key) -> Option<&Arc<D>> {
        self.index.get(key)
    }

    /// Returns the first document in comparator order.
    pub fn first(&self) -> Option<&Arc<D>> {
        self.ordered.first()
    }

    /// Returns the last document in comparator order.
    pub fn last(&self) -> Option<&Arc<D>> {
        self.ordered.last()
    }

    /// Returns the document at position `rank` in comparator order.
    pub fn document_at(&self, rank: usize) -> Option<&Arc<D>> {
        self.ordered.get(rank)
    }

    /// Returns an iterator over the documents in comparator order.
    ///
    /// The set is not consumed, so this can be called any number of times.
    pub fn iter(&self) -> Iter<'_, Arc<D>> {
        self.ordered.iter()
    }

    /// Same as [`Self::iter`].
    pub fn documents(&self) -> Iter<'_, Arc<D>> {
        self.iter()
    }

    /// Collects the documents into a vector, in comparator order.
    #[doc(alias = "to_sequence")]
    pub fn to_vec(&self) -> Vec<Arc<D>> {
        self.iter().cloned().collect()
    }

    /// Returns true if `self` and `other` are handles to the very same version of a set.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.index.ptr_eq(&other.index) && self.ordered.ptr_eq(&other.ordered)
    }

    /// Folds the documents, in order, into a single hash value.
    ///
    /// Each document is hashed with a fixed-seed hasher and combined as `h * 31 + hash`,
    /// starting from zero. Equal sets always have equal fingerprints, independently of the
    /// process they were computed in.
    pub fn fingerprint(&self) -> u64
    where
        D: Hash,
    {
        self.iter().fold(0, |h: u64, document| {
            h.wrapping_mul(31)
                .wrapping_add(FINGERPRINT_HASHER.hash_one(&**document))
        })
    }
}

impl<D, C> DocumentSet<D, C>
where
    D: Document,
    C: Comparator<D>,
{
    /// Creates an empty set ordered by `comparator`.
    #[doc(alias = "empty")]
    pub fn new(comparator: C) -> Self {
        Self {
            index: SortedMap::new(),
            ordered: OrderedSet::new(KeyTieBreak(comparator)),
        }
    }

    /// Creates a set ordered by `comparator` holding `documents`.
    ///
    /// Of several documents with the same key, the last one wins.
    pub fn from_documents<I>(comparator: C, documents: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<D>>,
    {
        documents
            .into_iter()
            .fold(Self::new(comparator), |set, document| {
                set.adding_document(document)
            })
    }

    /// Returns the position of the document with the given key in comparator order.
    ///
    /// # Panics
    ///
    /// If the key is indexed but its document is missing from the ordered view. That can only
    /// happen if the comparator is not a consistent total order.
    pub fn index_of_key(&self, key: &D::Key) -> Option<usize> {
        let document = self.index.get(key)?;
        let Some(rank) = self.ordered.index_of(document) else {
            error!(?key, "document is indexed but missing from the ordered view");
            panic!("document set is inconsistent: {key:?} is indexed but not ordered");
        };
        Some(rank)
    }

    /// Returns an iterator over the documents that come after the one stored under `key`.
    ///
    /// Returns `None` if there is no document with that key.
    pub fn iter_after_key(&self, key: &D::Key) -> Option<Iter<'_, Arc<D>>> {
        let document = self.index.get(key)?;
        Some(self.ordered.iter_after(document))
    }

    /// Returns a new set that holds `document`.
    ///
    /// If the set already holds a document with the same key, that document is replaced.
    #[must_use]
    pub fn adding_document(&self, document: impl Into<Arc<D>>) -> Self {
        let document = document.into();
        let without = self.removing_key(document.key());
        let index = without
            .index
            .insert(document.key().clone(), Arc::clone(&document));
        let ordered = without.ordered.insert(Arc::clone(&document));
        debug_assert_eq!(index.len(), ordered.len());

        let set = Self { index, ordered };
        trace!(
            key = ?document.key(),
            rank = ?set.ordered.index_of(&document),
            "added document"
        );
        set
    }

    /// Like [`Self::adding_document`], but returns `self` unchanged when given `None`.
    #[must_use]
    pub fn adding<T>(&self, document: Option<T>) -> Self
    where
        T: Into<Arc<D>>,
    {
        match document {
            Some(document) => self.adding_document(document),
            None => self.clone(),
        }
    }

    /// Returns a new set without the document stored under `key`.
    ///
    /// If there is no such document, the returned set is `self` (see [`Self::ptr_eq`]).
    ///
    /// # Panics
    ///
    /// If the key is indexed but its document is missing from the ordered view. That can only
    /// happen if the comparator is not a consistent total order.
    #[must_use]
    pub fn removing_key(&self, key: &D::Key) -> Self {
        let Some((index, _, document)) = self.index.remove_entry(key) else {
            return self.clone();
        };
        let Some(ordered) = self.ordered.try_remove(&document) else {
            error!(?key, "document is indexed but missing from the ordered view");
            panic!("document set is inconsistent: {key:?} is indexed but not ordered");
        };
        debug_assert_eq!(index.len(), ordered.len());
        trace!(?key, "removed document");
        Self { index, ordered }
    }
}

impl<'a, D, C> IntoIterator for &'a DocumentSet<D, C>
where
    D: Document,
{
    type Item = &'a Arc<D>;
    type IntoIter = Iter<'a, Arc<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<D, C> fmt::Debug for DocumentSet<D, C>
where
    D: Document + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Sets are equal if they hold equal documents in the same order, whatever their comparators.
impl<D, C1, C2> PartialEq<DocumentSet<D, C2>> for DocumentSet<D, C1>
where
    D: Document + PartialEq,
{
    fn eq(&self, other: &DocumentSet<D, C2>) -> bool {
        self.ordered == other.ordered
    }
}

impl<D, C> Eq for DocumentSet<D, C> where D: Document + Eq {}

impl<D, C> Hash for DocumentSet<D, C>
where
    D: Document + Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint());
    }
}

#[cfg(feature = "serde")]
impl<D, C> ::serde::Serialize for DocumentSet<D, C>
where
    D: Document + ::serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ::serde::Serializer,
    {
        serializer.collect_seq(self.iter().map(|document| &**document))
    }
}
