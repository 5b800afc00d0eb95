// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Consistency checks between the two views of a [`DocumentSet`].

use super::DocumentSet;
use crate::{Comparator, Document};
use std::{cmp::Ordering, error, fmt, sync::Arc};

/// Describes how the key index and the ordered view of a [`DocumentSet`] disagree.
///
/// A well-behaved [`DocumentSet`] can never produce this error. Seeing one means either a bug in
/// this crate or a [`Comparator`] that does not implement a consistent total order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError<K> {
    /// The two views hold a different number of documents.
    SizeMismatch { indexed: usize, ordered: usize },
    /// The index stores a document under a key other than the document's own.
    MisfiledDocument { indexed_as: K, key: K },
    /// A document in the index cannot be found in the ordered view.
    Unordered { key: K },
    /// Two neighbouring documents in the ordered view are not in strictly ascending order.
    OutOfOrder { before: K, after: K },
}

impl<K> fmt::Display for IntegrityError<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { indexed, ordered } => write!(
                f,
                "{indexed} documents are indexed by key but {ordered} are ordered"
            ),
            Self::MisfiledDocument { indexed_as, key } => {
                write!(f, "document {key:?} is indexed as {indexed_as:?}")
            }
            Self::Unordered { key } => {
                write!(f, "document {key:?} is indexed but missing from the ordered view")
            }
            Self::OutOfOrder { before, after } => {
                write!(f, "document {before:?} is ordered before {after:?}")
            }
        }
    }
}

impl<K> error::Error for IntegrityError<K> where K: fmt::Debug {}

impl<D, C> DocumentSet<D, C>
where
    D: Document,
    C: Comparator<D>,
{
    /// Checks that the key index and the ordered view of this set agree with each other.
    ///
    /// This walks the whole set and is meant for tests and debugging, not for routine use.
    pub fn validate(&self) -> Result<(), IntegrityError<D::Key>> {
        let (indexed, ordered) = (self.index.len(), self.ordered.len());
        if indexed != ordered {
            return Err(IntegrityError::SizeMismatch { indexed, ordered });
        }

        for (key, document) in &self.index {
            if key != document.key() {
                return Err(IntegrityError::MisfiledDocument {
                    indexed_as: key.clone(),
                    key: document.key().clone(),
                });
            }
            match self.ordered.find(document) {
                Some(found) if Arc::ptr_eq(found, document) => {}
                _ => return Err(IntegrityError::Unordered { key: key.clone() }),
            }
        }

        // with equal sizes and every indexed document present, strict ordering rules out
        // any extra entries in the ordered view
        let mut documents = self.ordered.iter();
        if let Some(mut previous) = documents.next() {
            for document in documents {
                if self.ordered.comparator().compare(previous, document) != Ordering::Less {
                    return Err(IntegrityError::OutOfOrder {
                        before: previous.key().clone(),
                        after: document.key().clone(),
                    });
                }
                previous = document;
            }
        }
        Ok(())
    }
}
