// (c) Copyright 2025 Helsing GmbH. All rights reserved.
/// Convenience macro for creating a [`DocumentKey`](crate::DocumentKey) from a path literal.
///
/// NOTE! This panics if the path is not a valid document path, so it is mostly useful for tests
/// and for paths known at compile time. Use
/// [`DocumentKey::from_path`](crate::DocumentKey::from_path) for anything else.
///
/// ```rust
/// # use docset::doc_key;
/// let key = doc_key!("rooms/eros/messages/1");
/// assert_eq!(key.document_id(), "1");
/// ```
#[macro_export]
macro_rules! doc_key {
    ($path:expr) => {
        match $crate::DocumentKey::from_path($path) {
            ::std::result::Result::Ok(key) => key,
            ::std::result::Result::Err(e) => ::std::panic!("{e}"),
        }
    };
}

/// Convenience macro for creating a [`DocumentSet`](crate::DocumentSet) from a list of
/// documents.
///
/// The comparator comes first, separated by a `;`. Without it, documents are ordered by key.
///
/// ```rust
/// # use docset::{Document, DocumentKey, Reversed, ByKey, doc_key, document_set};
/// # #[derive(Debug, PartialEq)]
/// # struct Room(DocumentKey);
/// # impl Document for Room {
/// #     type Key = DocumentKey;
/// #     fn key(&self) -> &DocumentKey { &self.0 }
/// # }
/// let rooms = document_set![Room(doc_key!("rooms/b")), Room(doc_key!("rooms/a"))];
/// assert_eq!(rooms.first().map(|r| r.0.document_id()), Some("a"));
///
/// let reversed = document_set![Reversed(ByKey); Room(doc_key!("rooms/b")), Room(doc_key!("rooms/a"))];
/// assert_eq!(reversed.first().map(|r| r.0.document_id()), Some("b"));
/// assert_ne!(rooms, reversed);
/// ```
#[macro_export]
macro_rules! document_set {
    () => {
        $crate::DocumentSet::new($crate::ByKey)
    };
    ($cmp:expr; $($doc:expr),* $(,)?) => {
        $crate::DocumentSet::new($cmp)$(.adding_document($doc))*
    };
    ($($doc:expr),* $(,)?) => {
        $crate::document_set![$crate::ByKey; $($doc),*]
    };
}
