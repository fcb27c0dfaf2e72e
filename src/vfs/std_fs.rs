// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::Vfs;
use std::{
    fs,
    io::{self, Write},
    path::Path,
};

/// `std::fs`-backed filesystem implementation
///
/// Serves both POSIX and Windows; file replacement goes through a sibling
/// temp file so a crash never leaves a partial file under the final name.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdVfs;

impl Vfs for StdVfs {
    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|entry| entry.file_name().to_string_lossy().into_owned()))
            .collect()
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let folder = path
            .parent()
            .ok_or_else(|| io::Error::other("path has no parent directory"))?;

        let mut temp_file = tempfile::NamedTempFile::new_in(folder)?;
        temp_file.write_all(data)?;
        temp_file.flush()?;
        temp_file.as_file_mut().sync_all()?;
        temp_file.persist(path).map_err(|e| e.error)?;

        sync_dir(folder)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)?;

        match to.parent() {
            Some(folder) => sync_dir(folder),
            None => Ok(()),
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn file_exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }
}

/// Makes a fragment publish (temp-file persist or rename) durable by
/// syncing its directory entry. Windows has no directory handles to sync,
/// so the publish relies on the data sync alone there.
fn sync_dir(folder: &Path) -> io::Result<()> {
    if cfg!(target_os = "windows") {
        return Ok(());
    }

    fs::File::open(folder)?.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn std_vfs_write_then_read() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let vfs = StdVfs;

        let path = dir.path().join("blob");
        vfs.write_file(&path, b"content")?;
        assert_eq!(b"content", &*vfs.read_file(&path)?);

        // Replace is atomic at the final name
        vfs.write_file(&path, b"newcontent")?;
        assert_eq!(b"newcontent", &*vfs.read_file(&path)?);

        Ok(())
    }

    #[test]
    fn std_vfs_rename_and_list() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let vfs = StdVfs;

        vfs.write_file(&dir.path().join(".tmp"), b"x")?;
        vfs.rename(&dir.path().join(".tmp"), &dir.path().join("final"))?;

        assert!(!vfs.file_exists(&dir.path().join(".tmp"))?);
        assert!(vfs.file_exists(&dir.path().join("final"))?);

        let names = vfs.list_dir(dir.path())?;
        assert_eq!(vec!["final".to_string()], names);

        Ok(())
    }
}
