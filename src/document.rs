// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Documents as seen by a [`DocumentSet`](crate::DocumentSet).
//!
//! Documents are owned elsewhere (typically by a local cache) and are only ever read here. All
//! this crate needs from a document is its key, through the [`Document`] trait. Equality and
//! hashing of a [`DocumentSet`](crate::DocumentSet) additionally use the document's own
//! [`PartialEq`] and [`Hash`](std::hash::Hash) implementations, which should compare the key
//! _and_ the contents.
//!
//! [`DocumentKey`] is a ready-made key type for slash-separated document paths. Any other
//! totally ordered type works as well.

mod key;
pub use key::{DocumentKey, InvalidKey};

use std::{fmt, sync::Arc};

/// A value identified by a unique, totally ordered key.
///
/// ```rust
/// # use docset::{Document, DocumentKey, doc_key};
/// #[derive(Debug, PartialEq)]
/// struct Room {
///     key: DocumentKey,
///     topic: String,
/// }
///
/// impl Document for Room {
///     type Key = DocumentKey;
///
///     fn key(&self) -> &DocumentKey {
///         &self.key
///     }
/// }
///
/// let room = Room { key: doc_key!("rooms/eros"), topic: "love".into() };
/// assert_eq!(room.key().document_id(), "eros");
/// ```
pub trait Document {
    /// The type identifying a document.
    ///
    /// Two documents with equal keys are versions of the same logical document.
    type Key: Ord + Clone + fmt::Debug;

    fn key(&self) -> &Self::Key;
}

impl<D> Document for Box<D>
where
    D: Document + ?Sized,
{
    type Key = D::Key;

    fn key(&self) -> &Self::Key {
        (**self).key()
    }
}

impl<D> Document for Arc<D>
where
    D: Document + ?Sized,
{
    type Key = D::Key;

    fn key(&self) -> &Self::Key {
        (**self).key()
    }
}
