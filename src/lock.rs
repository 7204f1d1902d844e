// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped exclusive lock on the log file.
//!
//! The file is the only thing shared across processes, and advisory `flock`
//! is the only arbitration between them. A [`LockedFile`] exists only while
//! the lock is held: dropping it unlocks and closes, on the error path too.
//!
//! `flock` locks belong to the open file description, so two handles opened
//! by two threads of one process contend the same way two processes do.

use crate::error::{Error, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// An open log file whose exclusive lock we hold.
#[derive(Debug)]
pub struct LockedFile {
    file: File,
}

impl LockedFile {
    /**
    Opens `path` for append (creating it readable and writable by everyone)
    and tries to lock it without waiting.

    Returns `Ok(None)` when someone else holds the lock.
    */
    pub fn try_acquire(path: &Path) -> Result<Option<Self>> {
        let file = open_shared(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { file })),
            Err(e) if is_contended(&e) => Ok(None),
            Err(e) => Err(Error::Lock(e)),
        }
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Writes one complete line.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.file.write_all(line.as_bytes()).map_err(Error::Write)
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            crate::console::narrate(&format!("ERROR releasing file lock: {e}"));
        }
    }
}

fn open_shared(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }
    options.open(path)
}

fn is_contended(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_handle_is_refused_until_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lock.log");

        let held = LockedFile::try_acquire(&path).unwrap();
        assert!(held.is_some());
        assert!(LockedFile::try_acquire(&path).unwrap().is_none());

        drop(held);
        assert!(LockedFile::try_acquire(&path).unwrap().is_some());
    }

    #[test]
    fn creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.log");
        let mut locked = LockedFile::try_acquire(&path).unwrap().unwrap();
        locked.write_line("hello\r\n").unwrap();
        drop(locked);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\r\n");
    }

    #[test]
    fn missing_directory_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("x.log");
        assert!(matches!(
            LockedFile::try_acquire(&path),
            Err(Error::Open { .. })
        ));
    }
}
