// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::entry::{MetaKey, MetadataEntry};
use rustc_hash::FxHashMap;

/// Buffer of metadata mutations staged by one write session
///
/// Keeps insertion order. A repeated `put` or `delete` for the same key
/// overwrites the staged entry in place, so at most one entry per key is
/// emitted into the fragment (the last write within a session wins).
#[derive(Default)]
pub struct StagedMetadata {
    entries: Vec<MetadataEntry>,
    slots: FxHashMap<MetaKey, usize>,
}

impl StagedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages an entry, replacing any previously staged entry for its key.
    pub fn stage(&mut self, entry: MetadataEntry) {
        match self.slots.get(&entry.key) {
            Some(&slot) => {
                #[expect(clippy::expect_used, reason = "slots always point into entries")]
                let existing = self.entries.get_mut(slot).expect("staged slot out of bounds");
                *existing = entry;
            }
            None => {
                self.slots.insert(entry.key.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the buffer, yielding entries in insertion order.
    pub fn into_entries(self) -> Vec<MetadataEntry> {
        self.entries
    }
}
