// (c) Copyright 2025 Helsing GmbH. All rights reserved.
use docset::{ByKey, Document, DocumentKey, DocumentSet, Natural, OrderedSet};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{cmp::Ordering, hint::black_box};
use tango_bench::{IntoBenchmarks, benchmark_fn, tango_benchmarks, tango_main};

#[derive(Debug, PartialEq, Hash)]
struct Doc {
    key: DocumentKey,
    score: u32,
}

impl Document for Doc {
    type Key = DocumentKey;

    fn key(&self) -> &DocumentKey {
        &self.key
    }
}

fn key(i: usize) -> DocumentKey {
    DocumentKey::from_segments(["items", &format!("{i:06}")]).unwrap()
}

fn by_score(a: &Doc, b: &Doc) -> Ordering {
    a.score.cmp(&b.score)
}

type Scored = DocumentSet<Doc, fn(&Doc, &Doc) -> Ordering>;

fn scored_set(n: usize) -> Scored {
    let mut rng = StdRng::seed_from_u64(42);
    DocumentSet::from_documents(
        by_score as fn(&Doc, &Doc) -> Ordering,
        (0..n).map(|i| Doc {
            key: key(i),
            score: rng.random_range(0..1000),
        }),
    )
}

fn ordered_set_benchmarks() -> impl IntoBenchmarks {
    let set: &'static _ = Box::leak(Box::new(OrderedSet::from_iter_with(
        Natural,
        (0..1024u32).map(|i| i * 2),
    )));
    [
        benchmark_fn("ordered-set::insert", move |b| {
            b.iter(move || black_box(set).insert(black_box(777)))
        }),
        benchmark_fn("ordered-set::remove", move |b| {
            b.iter(move || black_box(set).remove(black_box(&778)))
        }),
        benchmark_fn("ordered-set::index_of", move |b| {
            b.iter(move || black_box(set).index_of(black_box(&1500)))
        }),
        benchmark_fn("ordered-set::iter", move |b| {
            b.iter(move || black_box(set).iter().copied().sum::<u32>())
        }),
    ]
}

fn document_set_benchmarks() -> impl IntoBenchmarks {
    let scored: &'static Scored = Box::leak(Box::new(scored_set(1024)));
    let by_key: &'static _ = Box::leak(Box::new(DocumentSet::from_documents(
        ByKey,
        (0..1024).map(|i| Doc {
            key: key(i),
            score: 0,
        }),
    )));
    let existing = key(512);
    let missing = key(4096);
    [
        benchmark_fn("document-set::add_new", move |b| {
            b.iter(move || {
                black_box(scored).adding_document(Doc {
                    key: key(2048),
                    score: 500,
                })
            })
        }),
        benchmark_fn("document-set::replace", move |b| {
            b.iter(move || {
                black_box(scored).adding_document(Doc {
                    key: key(512),
                    score: 999,
                })
            })
        }),
        benchmark_fn("document-set::remove", {
            let existing = existing.clone();
            move |b| {
                let existing = existing.clone();
                b.iter(move || black_box(scored).removing_key(black_box(&existing)))
            }
        }),
        benchmark_fn("document-set::remove_missing", move |b| {
            let missing = missing.clone();
            b.iter(move || black_box(scored).removing_key(black_box(&missing)))
        }),
        benchmark_fn("document-set::index_of_key", move |b| {
            let existing = existing.clone();
            b.iter(move || black_box(scored).index_of_key(black_box(&existing)))
        }),
        benchmark_fn("document-set::fingerprint", move |b| {
            b.iter(move || black_box(by_key).fingerprint())
        }),
        benchmark_fn("document-set::eq", move |b| {
            let other = by_key.clone();
            b.iter(move || black_box(by_key) == black_box(&other))
        }),
    ]
}

tango_benchmarks!(ordered_set_benchmarks(), document_set_benchmarks());
tango_main!();
