// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    crypto::{self, EncryptionKey},
    entry::{MetaKey, MetadataEntry, TypedValue},
    fragment::{self, FragmentName},
    snapshot::Snapshot,
    staged::StagedMetadata,
    time,
    value_type::Datatype,
    vfs::{StdVfs, Vfs},
    Error,
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Name of the metadata directory inside an array
pub const METADATA_FOLDER: &str = "__meta";

/// Session open mode
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Queries only
    Read,

    /// Mutations only
    Write,
}

struct OpenState {
    mode: Mode,

    /// Open time in milliseconds; names the fragment on a write commit,
    /// bounds the visible fragments on read
    timestamp: u64,

    key: Option<EncryptionKey>,

    /// Materialized read view; empty for write sessions
    snapshot: Snapshot,

    /// Staged mutations; empty for read sessions
    staged: StagedMetadata,
}

/// Handle to one array's metadata
///
/// A session brackets operations between `open` and `close` and is bound
/// to a mode: read sessions query a snapshot frozen at open time, write
/// sessions stage mutations that are committed as one fragment on close.
///
/// A handle must not be shared across threads without external
/// synchronization; run concurrent sessions on separate handles instead.
pub struct Array {
    path: PathBuf,
    vfs: Arc<dyn Vfs>,
    state: Option<OpenState>,
}

impl Array {
    /// Allocates a handle for the array at `path`, using the local
    /// filesystem. No I/O happens until the first open.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self::with_vfs(path, Arc::new(StdVfs))
    }

    /// Allocates a handle bound to a specific storage backend.
    #[must_use]
    pub fn with_vfs<P: Into<PathBuf>>(path: P, vfs: Arc<dyn Vfs>) -> Self {
        Self {
            path: path.into(),
            vfs,
            state: None,
        }
    }

    /// Path this handle was allocated for.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` while a session is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    /// Mode of the current session, if open.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.state.as_ref().map(|state| state.mode)
    }

    /// Timestamp the current session was opened at, if open.
    #[must_use]
    pub fn timestamp(&self) -> Option<u64> {
        self.state.as_ref().map(|state| state.timestamp)
    }

    fn metadata_dir(&self) -> PathBuf {
        self.path.join(METADATA_FOLDER)
    }

    /// Opens a session at the current wall-clock timestamp.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidMode` if a session is already open.
    pub fn open(&mut self, mode: Mode) -> crate::Result<()> {
        self.open_inner(mode, time::now_millis(), None)
    }

    /// Opens a read session showing the array as of `timestamp_ms`.
    ///
    /// Fragments with a strictly greater timestamp are excluded even if
    /// present on disk.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` for write mode.
    pub fn open_at(&mut self, mode: Mode, timestamp_ms: u64) -> crate::Result<()> {
        if mode == Mode::Write {
            return Err(Error::InvalidArgument(
                "open_at is only valid for read sessions",
            ));
        }

        self.open_inner(mode, timestamp_ms, None)
    }

    /// Opens a session with an encryption key attached to all fragment I/O.
    ///
    /// # Errors
    ///
    /// Fails with `EncryptionMismatch` if the on-disk fragments were not
    /// produced with this key.
    pub fn open_with_key(&mut self, mode: Mode, key: EncryptionKey) -> crate::Result<()> {
        self.open_inner(mode, time::now_millis(), Some(key))
    }

    fn open_inner(
        &mut self,
        mode: Mode,
        timestamp: u64,
        key: Option<EncryptionKey>,
    ) -> crate::Result<()> {
        if self.state.is_some() {
            return Err(Error::InvalidMode("array is already open"));
        }

        let snapshot = match mode {
            Mode::Read => {
                build_snapshot(&*self.vfs, &self.metadata_dir(), timestamp, key.as_ref())?
            }
            Mode::Write => Snapshot::empty(),
        };

        self.state = Some(OpenState {
            mode,
            timestamp,
            key,
            snapshot,
            staged: StagedMetadata::new(),
        });

        Ok(())
    }

    /// Discards the current read snapshot and refolds at a fresh timestamp.
    ///
    /// Fragments published since the session was opened become visible;
    /// values previously borrowed from the session are invalidated.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidMode` if no session is open, and with
    /// `InvalidArgument` for write sessions.
    pub fn reopen(&mut self) -> crate::Result<()> {
        let dir = self.metadata_dir();

        let state = self
            .state
            .as_mut()
            .ok_or(Error::InvalidMode("array is not open"))?;

        if state.mode != Mode::Read {
            return Err(Error::InvalidArgument(
                "reopen is only valid for read sessions",
            ));
        }

        let timestamp = time::now_millis();
        state.snapshot = build_snapshot(&*self.vfs, &dir, timestamp, state.key.as_ref())?;
        state.timestamp = timestamp;

        Ok(())
    }

    /// Closes the session.
    ///
    /// A write session with staged mutations serializes them as one
    /// fragment, named by the session's open timestamp, and publishes it
    /// atomically. A write session with nothing staged writes no fragment.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidMode` if no session is open. On any I/O failure
    /// the on-disk state is unchanged.
    pub fn close(&mut self) -> crate::Result<()> {
        let Some(state) = self.state.take() else {
            return Err(Error::InvalidMode("array is not open"));
        };

        if state.mode == Mode::Write && !state.staged.is_empty() {
            let entries = state.staged.into_entries();
            let blob = fragment::encode_fragment(&entries)?;

            let blob = match &state.key {
                Some(key) => crypto::seal(key, &blob)?,
                None => blob,
            };

            let name = FragmentName::generate(state.timestamp);
            fragment::write_fragment(&*self.vfs, &self.metadata_dir(), &name, &blob)?;
        }

        Ok(())
    }

    /// Stages `count` elements of `datatype` under `key`.
    ///
    /// Overwrites any entry staged for the same key in this session.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidMode` unless a write session is open, and with
    /// `InvalidArgument` if the key is empty, `count` is zero, `datatype`
    /// is [`Datatype::Any`], or `payload` is not `count * size` bytes.
    pub fn put_metadata(
        &mut self,
        key: &str,
        datatype: Datatype,
        count: u32,
        payload: &[u8],
    ) -> crate::Result<()> {
        let state = self.write_state()?;

        if key.is_empty() {
            return Err(Error::InvalidArgument("metadata key must not be empty"));
        }
        if !datatype.is_storable() {
            return Err(Error::InvalidArgument(
                "Any is not a storable metadata type",
            ));
        }
        if count == 0 {
            return Err(Error::InvalidArgument("metadata count must be positive"));
        }
        if payload.len() as u64 != u64::from(count) * datatype.size() as u64 {
            return Err(Error::InvalidArgument(
                "payload length must equal count times element size",
            ));
        }

        state
            .staged
            .stage(MetadataEntry::new_value(key, datatype, count, payload));

        Ok(())
    }

    /// Stages deletion of `key`.
    ///
    /// Succeeds even if the key does not exist; the tombstone is dropped
    /// as a no-op during consolidation if nothing below it references the
    /// key.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidMode` unless a write session is open, and with
    /// `InvalidArgument` for an empty key.
    pub fn delete_metadata(&mut self, key: &str) -> crate::Result<()> {
        let state = self.write_state()?;

        if key.is_empty() {
            return Err(Error::InvalidArgument("metadata key must not be empty"));
        }

        state.staged.stage(MetadataEntry::new_tombstone(key));

        Ok(())
    }

    /// Looks up the metadata value stored under `key`.
    ///
    /// Returns `None` if the key is absent from the snapshot. The
    /// reference is valid until the session is closed or reopened.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidMode` unless a read session is open.
    pub fn metadata(&self, key: &str) -> crate::Result<Option<&TypedValue>> {
        Ok(self.read_state()?.snapshot.get(key.as_bytes()))
    }

    /// Reports whether `key` exists, and its stored element type.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidMode` unless a read session is open.
    pub fn has_metadata_key(&self, key: &str) -> crate::Result<Option<Datatype>> {
        Ok(self
            .read_state()?
            .snapshot
            .get(key.as_bytes())
            .map(|value| value.datatype))
    }

    /// Number of metadata keys visible in the snapshot.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidMode` unless a read session is open.
    pub fn metadata_num(&self) -> crate::Result<u64> {
        Ok(self.read_state()?.snapshot.len())
    }

    /// Returns the key and value at `index` in lexicographic raw-byte key
    /// order. Stable across repeated calls on the same snapshot.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidMode` unless a read session is open, and with
    /// `OutOfRange` if `index` is at or past [`Array::metadata_num`].
    pub fn metadata_at_index(&self, index: u64) -> crate::Result<(&MetaKey, &TypedValue)> {
        self.read_state()?.snapshot.get_at_index(index)
    }

    fn write_state(&mut self) -> crate::Result<&mut OpenState> {
        let state = self
            .state
            .as_mut()
            .ok_or(Error::InvalidMode("array is not open"))?;

        if state.mode != Mode::Write {
            return Err(Error::InvalidMode("operation requires a write session"));
        }

        Ok(state)
    }

    fn read_state(&self) -> crate::Result<&OpenState> {
        let state = self
            .state
            .as_ref()
            .ok_or(Error::InvalidMode("array is not open"))?;

        if state.mode != Mode::Read {
            return Err(Error::InvalidMode("operation requires a read session"));
        }

        Ok(state)
    }
}

/// Lists, filters, loads and folds the fragments visible at `timestamp`.
fn build_snapshot(
    vfs: &dyn Vfs,
    dir: &Path,
    timestamp: u64,
    key: Option<&EncryptionKey>,
) -> crate::Result<Snapshot> {
    let names = fragment::list_fragments(vfs, dir)?;

    let mut decoded = Vec::new();
    for name in names.iter().filter(|name| name.timestamp <= timestamp) {
        decoded.push(fragment::load_fragment(vfs, dir, name, key)?);
    }

    log::trace!(
        "Folding {} metadata fragments at timestamp {timestamp}",
        decoded.len(),
    );

    Ok(Snapshot::fold(decoded))
}
