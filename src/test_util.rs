// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Helpers shared by the unit tests of this crate.

use crate::{Document, DocumentKey};
use quickcheck::{Arbitrary, Gen};
use std::{collections::BTreeSet, fmt};

/// A minimal document: a key plus a version, which some tests order by.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub(crate) struct TestDoc {
    pub(crate) key: DocumentKey,
    pub(crate) version: u64,
}

impl TestDoc {
    pub(crate) fn new(path: &str, version: u64) -> Self {
        Self {
            key: DocumentKey::from_path(path).expect("test document paths are valid"),
            version,
        }
    }
}

impl Document for TestDoc {
    type Key = DocumentKey;

    fn key(&self) -> &DocumentKey {
        &self.key
    }
}

impl fmt::Debug for TestDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.key, self.version)
    }
}

impl Arbitrary for TestDoc {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            key: DocumentKey::arbitrary(g),
            // few versions, so that comparator ties are common
            version: u64::from(u8::arbitrary(g) % 8),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Op {
    Add(TestDoc),
    Remove(DocumentKey),
}

/// A sequence of additions and removals to apply to a document set.
///
/// Generation keeps track of the keys that are present at each step, so that most removals hit
/// an existing document and most additions of known keys are replacements.
#[derive(Clone, Debug)]
pub(crate) struct Ops(pub(crate) Vec<Op>);

impl Arbitrary for Ops {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut present = BTreeSet::new();
        let len = usize::arbitrary(g) % (g.size() * 2 + 1);
        let mut ops = Vec::with_capacity(len);
        for _ in 0..len {
            let remove = !present.is_empty() && u8::arbitrary(g) < 80;
            if remove {
                let key = if bool::arbitrary(g) {
                    // an existing key
                    let keys: Vec<&DocumentKey> = present.iter().collect();
                    (*g.choose(&keys).expect("present is not empty")).clone()
                } else {
                    DocumentKey::arbitrary(g)
                };
                present.remove(&key);
                ops.push(Op::Remove(key));
            } else {
                let doc = TestDoc::arbitrary(g);
                present.insert(doc.key.clone());
                ops.push(Op::Add(doc));
            }
        }
        Self(ops)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        // any prefix or suffix of a valid sequence is still valid
        let ops = self.0.clone();
        let halves = (ops.len() > 1).then(|| {
            let mid = ops.len() / 2;
            [Self(ops[..mid].to_vec()), Self(ops[mid..].to_vec())]
        });
        let shorter = (!ops.is_empty()).then(|| Self(ops[..ops.len() - 1].to_vec()));
        Box::new(halves.into_iter().flatten().chain(shorter))
    }
}

/// Installs a subscriber that routes `tracing` events to the test output.
///
/// Set `RUST_LOG=docset=trace` to see what a failing test did.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
