// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod name;

pub use name::FragmentName;

use crate::{
    coding::{Decode, DecodeError, Encode},
    crypto::{self, EncryptionKey},
    entry::MetadataEntry,
    vfs::Vfs,
    Error,
};
use std::{io::Cursor, path::Path};

/// Serializes entries into a single fragment blob.
///
/// Entries appear in the given order; within one session that is the
/// insertion order of the originating mutations.
pub fn encode_fragment(entries: &[MetadataEntry]) -> crate::Result<Vec<u8>> {
    let mut bytes = Vec::new();

    for entry in entries {
        entry.encode_into(&mut bytes)?;
    }

    Ok(bytes)
}

/// Deserializes a fragment blob into its ordered entries.
///
/// There is no fragment header; the blob is a plain concatenation of
/// entries, so decoding runs until the blob is exhausted. Truncation,
/// unknown type tags and trailing garbage all fail.
pub fn decode_fragment(bytes: &[u8]) -> Result<Vec<MetadataEntry>, DecodeError> {
    let mut reader = Cursor::new(bytes);
    let mut entries = Vec::new();

    while (reader.position() as usize) < bytes.len() {
        entries.push(MetadataEntry::decode_from(&mut reader)?);
    }

    Ok(entries)
}

/// Lists fragment names under `dir`, oldest first.
///
/// A missing directory reads as empty. Entries not produced by the
/// fragment writer are skipped.
pub fn list_fragments(vfs: &dyn Vfs, dir: &Path) -> crate::Result<Vec<FragmentName>> {
    if !vfs.file_exists(dir)? {
        return Ok(Vec::new());
    }

    let mut names: Vec<FragmentName> = vfs
        .list_dir(dir)?
        .iter()
        .filter_map(|name| FragmentName::parse(name))
        .collect();

    names.sort();
    Ok(names)
}

/// Reads and decodes one fragment, decrypting when a key is attached.
///
/// Because the on-disk format has no header, ciphertext cannot be told
/// apart from corruption without a key; an unkeyed decode failure is
/// therefore reported as `EncryptionMismatch`. With a key, a failed tag
/// verification is `EncryptionMismatch` (wrong key, or the array is not
/// encrypted) and a post-decryption decode failure is a corrupt fragment.
pub fn load_fragment(
    vfs: &dyn Vfs,
    dir: &Path,
    name: &FragmentName,
    key: Option<&EncryptionKey>,
) -> crate::Result<Vec<MetadataEntry>> {
    let raw = vfs.read_file(&dir.join(name.to_string()))?;

    match key {
        Some(key) => {
            let plaintext = crypto::open(key, &raw).map_err(|e| match e {
                Error::AuthenticationFailed => {
                    Error::EncryptionMismatch("wrong encryption key, or the array is not encrypted")
                }
                e => e,
            })?;

            decode_fragment(&plaintext).map_err(Into::into)
        }
        None => decode_fragment(&raw).map_err(|_| {
            Error::EncryptionMismatch(
                "fragment is not readable without an encryption key (encrypted or corrupt)",
            )
        }),
    }
}

/// Atomically publishes a fragment blob under its final name.
///
/// The blob goes to a dot-prefixed temp name first and is renamed into
/// place; readers only ever observe the complete file. The temp file is
/// unlinked if publishing fails, leaving the directory unchanged.
pub fn write_fragment(
    vfs: &dyn Vfs,
    dir: &Path,
    name: &FragmentName,
    blob: &[u8],
) -> crate::Result<()> {
    vfs.create_dir(dir)?;

    let final_path = dir.join(name.to_string());
    let temp_path = dir.join(format!(".{}.tmp", name.suffix));

    log::debug!("Writing metadata fragment to {final_path:?}");

    vfs.write_file(&temp_path, blob)?;

    if let Err(e) = vfs.rename(&temp_path, &final_path) {
        // The temp name never matches the fragment name pattern, but it
        // must not survive a failed close
        if let Err(e) = vfs.remove_file(&temp_path) {
            log::warn!("Failed to clean up temp fragment {temp_path:?}: {e}");
        }

        return Err(e.into());
    }

    Ok(())
}
