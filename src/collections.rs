// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! # Persistent Collections
//!
//! This module provides the immutable, structurally shared collections that a
//! [`DocumentSet`](crate::DocumentSet) is built from:
//!
//! - **[`OrderedSet`]**: elements ordered by an injected [`Comparator`](crate::Comparator),
//!   with rank and select-by-rank. Comparator-equal elements are kept side by side rather
//!   than deduplicated.
//! - **[`SortedMap`]**: a map with unique keys, ordered by the keys' [`Ord`].
//!
//! Both are thin layers over the same persistent AVL tree. "Modifying" a collection returns a
//! new handle; the old handle keeps observing exactly what it observed before, and the two share
//! every node the modification did not need to touch. Cloning a handle is O(1).
//!
//! Nodes are reference counted with [`Arc`](std::sync::Arc), so collections are `Send` and
//! `Sync` whenever their contents (and comparator) are, and shared structure is freed once the
//! last version referencing it is dropped.

pub mod ordered_set;
pub mod sorted_map;
mod tree;

pub use ordered_set::OrderedSet;
pub use sorted_map::SortedMap;
pub use tree::Iter;
