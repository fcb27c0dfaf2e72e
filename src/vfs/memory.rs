// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::Vfs;
use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
    sync::RwLock,
};

/// In-memory backend that behaves like an object store
///
/// `rename` is emulated by copy-then-delete, mirroring backends without a
/// native rename. Mostly useful for tests.
#[derive(Debug, Default)]
pub struct MemoryVfs {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: RwLock<BTreeSet<PathBuf>>,
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no such file: {path:?}"))
}

impl Vfs for MemoryVfs {
    fn create_dir(&self, path: &Path) -> io::Result<()> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut dirs = self.dirs.write().expect("lock is poisoned");

        let mut dir = path;
        loop {
            dirs.insert(dir.to_path_buf());

            match dir.parent() {
                Some(parent) if parent != Path::new("") => dir = parent,
                _ => break,
            }
        }

        Ok(())
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let files = self.files.read().expect("lock is poisoned");

        Ok(files
            .keys()
            .filter(|file| file.parent() == Some(path))
            .filter_map(|file| file.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let files = self.files.read().expect("lock is poisoned");

        files.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut files = self.files.write().expect("lock is poisoned");

        files.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut files = self.files.write().expect("lock is poisoned");

        let data = files.remove(from).ok_or_else(|| not_found(from))?;
        files.insert(to.to_path_buf(), data);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut files = self.files.write().expect("lock is poisoned");

        files.remove(path).map(|_| ()).ok_or_else(|| not_found(path))
    }

    fn file_exists(&self, path: &Path) -> io::Result<bool> {
        {
            #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
            let files = self.files.read().expect("lock is poisoned");

            if files.contains_key(path) {
                return Ok(true);
            }
        }

        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let dirs = self.dirs.read().expect("lock is poisoned");

        Ok(dirs.contains(path))
    }
}
