// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    entry::{MetaKey, MetadataEntry, MetadataValue, TypedValue},
    Error,
};
use std::collections::BTreeMap;

/// Point-in-time view of an array's metadata
///
/// Built once at session open by folding fragments oldest-first: a later
/// entry shadows an earlier one for the same key, and a tombstone removes
/// the key. Read-only afterwards; `reopen` builds a fresh snapshot.
pub struct Snapshot {
    items: BTreeMap<MetaKey, TypedValue>,

    /// Keys in lexicographic raw-byte order, for enumeration by position
    index: Vec<MetaKey>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: BTreeMap::new(),
            index: Vec::new(),
        }
    }

    /// Folds decoded fragments, oldest first, into a snapshot.
    #[must_use]
    pub fn fold<I: IntoIterator<Item = Vec<MetadataEntry>>>(fragments: I) -> Self {
        let mut items = BTreeMap::new();

        for fragment in fragments {
            for entry in fragment {
                match entry.value {
                    MetadataValue::Value(value) => {
                        items.insert(entry.key, value);
                    }
                    MetadataValue::Tombstone => {
                        items.remove(&entry.key);
                    }
                }
            }
        }

        let index = items.keys().cloned().collect();

        Self { items, index }
    }

    /// Looks up the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&TypedValue> {
        self.items.get(key)
    }

    /// Number of live keys.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.items.len() as u64
    }

    /// Returns `true` if the snapshot holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the entry at position `index` in lexicographic key order.
    ///
    /// # Errors
    ///
    /// Fails with `OutOfRange` if `index` is at or past [`Snapshot::len`].
    pub fn get_at_index(&self, index: u64) -> crate::Result<(&MetaKey, &TypedValue)> {
        let key = usize::try_from(index)
            .ok()
            .and_then(|i| self.index.get(i))
            .ok_or(Error::OutOfRange((index, self.len())))?;

        #[expect(clippy::expect_used, reason = "the index only holds live keys")]
        let value = self.items.get(key.as_ref()).expect("indexed key is live");

        Ok((key, value))
    }

    /// Iterates entries in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&MetaKey, &TypedValue)> {
        self.items.iter()
    }

    /// Materializes the snapshot as fragment entries in key order.
    ///
    /// Contains no tombstones: a consolidated fragment has nothing below
    /// it to delete from.
    #[must_use]
    pub fn to_entries(&self) -> Vec<MetadataEntry> {
        self.items
            .iter()
            .map(|(key, value)| MetadataEntry {
                key: key.clone(),
                value: MetadataValue::Value(value.clone()),
            })
            .collect()
    }
}
