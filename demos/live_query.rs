// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! A toy live query: keeps the newest messages of a room sorted by time, and prints change
//! events by diffing each result against the previous one.
//!
//! Run with `RUST_LOG=docset=trace cargo run --example live_query` to also see the events the
//! document sets emit.

use docset::{Document, DocumentKey, DocumentSet};
use std::{cmp::Ordering, sync::Arc};

#[derive(Debug, PartialEq, Hash)]
struct Message {
    key: DocumentKey,
    sent_at: u64,
    text: String,
}

impl Document for Message {
    type Key = DocumentKey;

    fn key(&self) -> &DocumentKey {
        &self.key
    }
}

enum Change {
    Put(Message),
    Delete(DocumentKey),
}

enum Event<'a> {
    Added { rank: usize, doc: &'a Message },
    Modified { from: usize, to: usize, doc: &'a Message },
    Removed { rank: usize, key: &'a DocumentKey },
}

fn newest_first(a: &Message, b: &Message) -> Ordering {
    b.sent_at.cmp(&a.sent_at)
}

type View = DocumentSet<Message, fn(&Message, &Message) -> Ordering>;

/// Computes what changed between two results of the same query.
fn diff<'a>(old: &'a View, new: &'a View) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    for doc in old {
        if !new.contains_key(doc.key()) {
            if let Some(rank) = old.index_of_key(doc.key()) {
                events.push(Event::Removed {
                    rank,
                    key: doc.key(),
                });
            }
        }
    }
    for doc in new {
        let Some(to) = new.index_of_key(doc.key()) else {
            continue;
        };
        match old.document(doc.key()) {
            None => events.push(Event::Added { rank: to, doc }),
            Some(previous) if !Arc::ptr_eq(previous, doc) => {
                let from = old.index_of_key(doc.key()).unwrap_or(to);
                events.push(Event::Modified { from, to, doc });
            }
            Some(_) => {}
        }
    }
    events
}

fn key(id: &str) -> Result<DocumentKey, docset::InvalidKey> {
    DocumentKey::from_segments(["rooms", "eros", "messages", id])
}

fn message(id: &str, sent_at: u64, text: &str) -> Result<Message, docset::InvalidKey> {
    Ok(Message {
        key: key(id)?,
        sent_at,
        text: text.to_owned(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let batches = vec![
        vec![
            Change::Put(message("1", 100, "hello")?),
            Change::Put(message("2", 110, "hi there")?),
        ],
        vec![Change::Put(message("3", 120, "anyone around?")?)],
        vec![
            // edited, which bumps the message to the top
            Change::Put(message("1", 130, "hello (edited)")?),
            Change::Delete(key("2")?),
        ],
        vec![Change::Delete(key("404")?)],
    ];

    let mut current = View::new(newest_first);
    for (i, batch) in batches.into_iter().enumerate() {
        let next = batch
            .into_iter()
            .fold(current.clone(), |view, change| match change {
                Change::Put(message) => view.adding_document(message),
                Change::Delete(key) => view.removing_key(&key),
            });
        println!("snapshot {i}:");
        if next == current {
            println!("  no changes");
        }
        for event in diff(&current, &next) {
            match event {
                Event::Added { rank, doc } => println!("  added {} at {rank}", doc.key),
                Event::Modified { from, to, doc } => {
                    println!("  modified {} ({from} -> {to})", doc.key)
                }
                Event::Removed { rank, key } => println!("  removed {key} from {rank}"),
            }
        }
        for message in &next {
            println!("    {} {:>4} {}", message.key, message.sent_at, message.text);
        }
        current = next;
    }
    println!("fingerprint: {:016x}", current.fingerprint());
    Ok(())
}
