// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! # docset: Persistent Ordered Document Sets
//!
//! This crate provides the immutable collections a document database client needs to maintain
//! the result sets of live queries. A query's current result is a [`DocumentSet`]: documents
//! with unique keys, sorted by the query's ordering. Whenever a document changes, the client
//! derives the next result from the previous one and diffs the two to produce change events.
//!
//! Every collection in this crate is **persistent**: an operation that "modifies" a collection
//! returns a new one and leaves the original untouched. The new and the old version share all
//! the structure the operation did not need to touch, so deriving a new version costs O(log n)
//! rather than a copy, and both versions can be read for as long as anyone holds them.
//!
//! ## Building Blocks
//!
//! - [`OrderedSet`]: an ordered collection with an injected [`Comparator`], supporting rank
//!   queries ("what is the index of this element?") and selection by rank.
//! - [`SortedMap`]: a persistent map with unique keys, ordered by the keys' [`Ord`].
//! - [`DocumentSet`]: a [`SortedMap`] from key to document plus an [`OrderedSet`] of the same
//!   documents, kept in sync.
//!
//! Documents are anything implementing [`Document`]. [`DocumentKey`] is a ready-made key type
//! for slash-separated paths such as `rooms/eros/messages/1`.
//!
//! ## Comparators
//!
//! A [`Comparator`] is fixed when a collection is created and shared by every collection derived
//! from it. Closures work out of the box; [`Natural`], [`ByKey`] and [`Reversed`] cover the common
//! cases. A [`DocumentSet`] breaks ties between documents the comparator considers equal by
//! their key, so every document in it has exactly one position.
//!
//! ```rust
//! use docset::{Document, DocumentKey, DocumentSet, doc_key};
//!
//! #[derive(Debug, PartialEq, Hash)]
//! struct Message {
//!     key: DocumentKey,
//!     sent_at: u64,
//! }
//!
//! impl Document for Message {
//!     type Key = DocumentKey;
//!
//!     fn key(&self) -> &DocumentKey {
//!         &self.key
//!     }
//! }
//!
//! // newest first
//! let by_time = |a: &Message, b: &Message| b.sent_at.cmp(&a.sent_at);
//!
//! let v1 = DocumentSet::new(by_time)
//!     .adding_document(Message { key: doc_key!("messages/a"), sent_at: 10 })
//!     .adding_document(Message { key: doc_key!("messages/b"), sent_at: 20 });
//! // an edit moves "messages/a" to the front
//! let v2 = v1.adding_document(Message { key: doc_key!("messages/a"), sent_at: 30 });
//!
//! assert_eq!(v1.index_of_key(&doc_key!("messages/a")), Some(1));
//! assert_eq!(v2.index_of_key(&doc_key!("messages/a")), Some(0));
//! assert_eq!(v2.len(), 2);
//! assert_ne!(v1, v2);
//! ```
//!
//! ## Concurrency
//!
//! Collections are plain values without interior mutability. Their nodes are shared through
//! [`Arc`](std::sync::Arc), so a collection is [`Send`] and [`Sync`] whenever its contents and
//! comparator are, and any number of threads can read the same version at once.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `trace` for every document added to or removed from a
//! [`DocumentSet`], and `error` right before panicking on an internal inconsistency. It never
//! installs a subscriber itself.
//!
//! ## Features
//!
//! - `serde`: Implements `serde::Serialize` for all collections, and `Serialize` plus
//!   `Deserialize` for [`DocumentKey`].
//! - `arbitrary`: Implements `quickcheck::Arbitrary` for [`DocumentKey`], useful for
//!   property-based testing.
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

use ahash::RandomState;

// Use a constant seed so that fingerprints agree across processes.
pub(crate) const FINGERPRINT_HASHER: RandomState = RandomState::with_seeds(48, 1516, 23, 42);

pub mod collections;
pub use collections::{OrderedSet, SortedMap};
pub mod comparator;
pub use comparator::{ByKey, Comparator, Natural, Reversed};
pub mod document;
pub use document::{Document, DocumentKey, InvalidKey};
pub mod document_set;
pub use document_set::{DocumentSet, IntegrityError};
mod macros;

#[cfg(test)]
mod test_util;
