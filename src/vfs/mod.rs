// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem abstraction for pluggable storage backends.
//!
//! The metadata core performs all durable I/O through [`Vfs`]. Local
//! filesystems implement `rename` natively; object stores may emulate it,
//! as long as `write_file` publishes complete objects atomically (a reader
//! must never observe a partial file under its final name).

mod memory;
mod std_fs;

pub use memory::MemoryVfs;
pub use std_fs::StdVfs;

use std::{io, path::Path};

/// Capability interface over a storage backend
pub trait Vfs: Send + Sync {
    /// Creates a directory and all missing parents.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Lists the file names inside a directory.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    /// Reads an entire file into memory.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Creates or replaces a file with the given contents.
    ///
    /// The contents are durable once this returns.
    fn write_file(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// Moves a file to a new name.
    ///
    /// Atomic where the backend supports it.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Removes a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Checks whether a path exists.
    fn file_exists(&self, path: &Path) -> io::Result<bool>;
}
