// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    array::METADATA_FOLDER,
    crypto::{self, EncryptionKey},
    fragment::{self, FragmentName},
    snapshot::Snapshot,
    time,
    vfs::Vfs,
};
use std::path::Path;

/// Fuses all metadata fragments of the array at `path` into one.
///
/// Runs outside any open session. The merged fragment holds the folded
/// snapshot in lexicographic key order with no tombstones, is published
/// before any predecessor is unlinked, and is named by the consolidation
/// timestamp so it orders with everything it replaces. Consolidating with
/// no intervening writes is idempotent.
///
/// # Errors
///
/// Fails with `EncryptionMismatch` if the array is encrypted; use
/// [`consolidate_metadata_with_key`] instead.
pub fn consolidate_metadata(vfs: &dyn Vfs, path: &Path) -> crate::Result<()> {
    consolidate_inner(vfs, path, None)
}

/// Like [`consolidate_metadata`], for encrypted arrays.
///
/// The merged fragment is sealed with the same key that decrypted its
/// predecessors, so the whole metadata directory stays ciphertext.
pub fn consolidate_metadata_with_key(
    vfs: &dyn Vfs,
    path: &Path,
    key: &EncryptionKey,
) -> crate::Result<()> {
    consolidate_inner(vfs, path, Some(key))
}

fn consolidate_inner(
    vfs: &dyn Vfs,
    path: &Path,
    key: Option<&EncryptionKey>,
) -> crate::Result<()> {
    let dir = path.join(METADATA_FOLDER);
    let cutoff = time::now_millis();

    let predecessors: Vec<FragmentName> = fragment::list_fragments(vfs, &dir)?
        .into_iter()
        .filter(|name| name.timestamp <= cutoff)
        .collect();

    if predecessors.is_empty() {
        return Ok(());
    }

    log::debug!(
        "Consolidating {} metadata fragments at timestamp {cutoff}",
        predecessors.len(),
    );

    let mut decoded = Vec::with_capacity(predecessors.len());
    for name in &predecessors {
        decoded.push(fragment::load_fragment(vfs, &dir, name, key)?);
    }
    let snapshot = Snapshot::fold(decoded);

    let blob = fragment::encode_fragment(&snapshot.to_entries())?;
    let blob = match key {
        Some(key) => crypto::seal(key, &blob)?,
        None => blob,
    };

    let name = FragmentName::generate(cutoff);
    fragment::write_fragment(vfs, &dir, &name, &blob)?;

    // The merged fragment is durable at this point; a fragment published
    // after the listing above is never unlinked
    for old in &predecessors {
        log::trace!("Unlinking consolidated fragment {old}");
        vfs.remove_file(&dir.join(old.to_string()))?;
    }

    Ok(())
}
