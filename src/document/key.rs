// (c) Copyright 2025 Helsing GmbH. All rights reserved.
use std::{fmt, str::FromStr, sync::Arc};

/// The slash-separated path of a document, such as `rooms/eros/messages/1`.
///
/// A path alternates between collection ids and document ids, so it always has an even,
/// non-zero number of segments. Keys are ordered segment by segment, which groups documents by
/// collection.
///
/// The segments are held in a shared slice, so cloning a key is cheap.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentKey(Arc<[Box<str>]>);

impl DocumentKey {
    /// Parses a slash-separated document path.
    pub fn from_path(path: &str) -> Result<Self, InvalidKey> {
        Self::from_segments(path.split('/')).map_err(|e| InvalidKey {
            path: path.to_owned(),
            ..e
        })
    }

    /// Creates a key from its individual path segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, InvalidKey>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<Box<str>> = segments.into_iter().map(|s| s.as_ref().into()).collect();
        let invalid = |reason| InvalidKey {
            path: segments.join("/"),
            reason,
        };
        if segments.is_empty() || segments.iter().all(|s| s.is_empty()) {
            return Err(invalid("path is empty"));
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid("path has an empty segment"));
        }
        if segments.iter().any(|s| s.contains('/')) {
            return Err(invalid("segment contains '/'"));
        }
        if segments.len() % 2 != 0 {
            return Err(invalid("path does not point at a document"));
        }
        Ok(Self(segments.into()))
    }

    /// Returns the path segments, alternating collection and document ids.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &str> + DoubleEndedIterator {
        self.0.iter().map(|s| &**s)
    }

    /// Returns the id of the document within its collection, ie the last path segment.
    pub fn document_id(&self) -> &str {
        // never empty, see from_segments
        &self.0[self.0.len() - 1]
    }

    /// Returns the path of the collection that holds the document.
    pub fn collection_path(&self) -> String {
        self.0[..self.0.len() - 1].join("/")
    }

    /// Returns true if the document lives directly in the collection at `path`.
    pub fn has_collection_path(&self, path: &str) -> bool {
        let parent = &self.0[..self.0.len() - 1];
        path.split('/').eq(parent.iter().map(|s| &**s))
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = self.segments();
        if let Some(first) = segments.next() {
            f.write_str(first)?;
        }
        for segment in segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl FromStr for DocumentKey {
    type Err = InvalidKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s)
    }
}

impl TryFrom<&str> for DocumentKey {
    type Error = InvalidKey;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_path(value)
    }
}

/// The error returned when a [`DocumentKey`] cannot be built from a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidKey {
    path: String,
    reason: &'static str,
}

impl InvalidKey {
    /// Returns the path that was rejected.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a short description of why the path was rejected.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

impl fmt::Display for InvalidKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid document key {:?}: {}", self.path, self.reason)
    }
}

impl std::error::Error for InvalidKey {}

#[cfg(feature = "serde")]
impl ::serde::Serialize for DocumentKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ::serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> ::serde::Deserialize<'de> for DocumentKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: ::serde::Deserializer<'de>,
    {
        let path = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::from_path(&path).map_err(::serde::de::Error::custom)
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl quickcheck::Arbitrary for DocumentKey {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        // Few distinct ids, so that generated keys collide often.
        let pick = |g: &mut quickcheck::Gen, from: &[&'static str]| {
            from[usize::arbitrary(g) % from.len()]
        };
        let mut segments = vec![
            pick(g, &["rooms", "users", "messages"]),
            pick(g, &["a", "b", "c", "d", "eros", "zeta"]),
        ];
        if u8::arbitrary(g) < 32 {
            segments.extend(["messages", pick(g, &["1", "2"])]);
        }
        // always an even number of valid segments
        Self(segments.into_iter().map(Box::from).collect())
    }
}
