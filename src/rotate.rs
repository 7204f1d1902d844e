// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keeps the shared log bounded.
//!
//! Called by the write path right after the lock is taken and before anything
//! is written. When the file has grown past [`RotationLimits::max`], only the
//! last [`RotationLimits::keep`] bytes survive. Older history is lost; the
//! targets have little storage to spare.
//!
//! The cut is byte-based and may land mid-line. A partial first line is the
//! only artifact.

use crate::config::RotationLimits;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

/// What [`maybe_rotate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// The file was within bounds.
    Unchanged,
    /// The file now holds exactly its former last `kept` bytes.
    Rotated { kept: u64 },
    /// The file was left empty, by an empty tail read or a failed one.
    Emptied,
    /// Rotation failed before the file was cut; its content was not touched.
    Failed,
}

/**
Truncates `file` to its most recent bytes if it is too large.

Must only be called while holding the file's exclusive lock. If reading the
tail fails the file is still truncated, and the read error is returned: an
empty log is preferred over one with a torn splice of old and new content.
*/
pub fn maybe_rotate(file: &mut File, limits: RotationLimits) -> Result<Rotation> {
    let size = file.metadata().map_err(Error::Rotate)?.len();
    if size <= limits.max() {
        return Ok(Rotation::Unchanged);
    }

    let tail = read_tail(file, limits.keep());
    file.set_len(0).map_err(Error::Rotate)?;
    let tail = tail.map_err(Error::Rotate)?;
    if tail.is_empty() {
        return Ok(Rotation::Emptied);
    }
    // append mode puts this at offset 0 of the now-empty file
    file.write_all(&tail).map_err(Error::Rotate)?;
    Ok(Rotation::Rotated {
        kept: tail.len() as u64,
    })
}

/// What an `Err` from [`maybe_rotate`] left behind in `file`.
pub(crate) fn after_failure(file: &File) -> Rotation {
    match file.metadata() {
        Ok(meta) if meta.len() == 0 => Rotation::Emptied,
        _ => Rotation::Failed,
    }
}

fn read_tail(file: &mut File, keep: u64) -> std::io::Result<Vec<u8>> {
    file.seek(SeekFrom::End(-(keep as i64)))?;
    let mut tail = Vec::with_capacity(keep as usize);
    (&mut *file).take(keep).read_to_end(&mut tail)?;
    Ok(tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;

    fn open(path: &std::path::Path) -> File {
        OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)
            .unwrap()
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn small_file_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.log");
        std::fs::write(&path, pattern(65535)).unwrap();
        let mut file = open(&path);
        assert_eq!(
            maybe_rotate(&mut file, RotationLimits::default()).unwrap(),
            Rotation::Unchanged
        );
        assert_eq!(std::fs::read(&path).unwrap().len(), 65535);
    }

    #[test]
    fn large_file_keeps_its_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.log");
        let content = pattern(70000);
        std::fs::write(&path, &content).unwrap();
        let mut file = open(&path);

        assert_eq!(
            maybe_rotate(&mut file, RotationLimits::default()).unwrap(),
            Rotation::Rotated { kept: 32767 }
        );
        file.write_all(b"next\r\n").unwrap();

        let after = std::fs::read(&path).unwrap();
        assert_eq!(&after[..32767], &content[70000 - 32767..]);
        assert_eq!(&after[32767..], b"next\r\n");

        // a second pass on the now-small file does nothing
        assert_eq!(
            maybe_rotate(&mut file, RotationLimits::default()).unwrap(),
            Rotation::Unchanged
        );
    }

    #[test]
    fn custom_limits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.log");
        std::fs::write(&path, b"0123456789abcdef").unwrap();
        let mut file = open(&path);
        let limits = RotationLimits::new(10, 4).unwrap();
        assert_eq!(
            maybe_rotate(&mut file, limits).unwrap(),
            Rotation::Rotated { kept: 4 }
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"cdef");
    }

    #[test]
    fn unreadable_tail_leaves_the_file_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("append-only.log");
        std::fs::write(&path, pattern(70000)).unwrap();
        // no read access, so the tail cannot be saved
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();

        let err = maybe_rotate(&mut file, RotationLimits::default()).unwrap_err();
        assert!(matches!(err, Error::Rotate(_)), "{err}");
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
        assert_eq!(after_failure(&file), Rotation::Emptied);
    }

    #[test]
    fn failed_truncate_leaves_the_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("read-only.log");
        let content = pattern(70000);
        std::fs::write(&path, &content).unwrap();
        // no write access, so the file cannot be cut
        let mut file = File::open(&path).unwrap();

        let err = maybe_rotate(&mut file, RotationLimits::default()).unwrap_err();
        assert!(matches!(err, Error::Rotate(_)), "{err}");
        assert_eq!(std::fs::read(&path).unwrap(), content);
        assert_eq!(after_failure(&file), Rotation::Failed);
    }
}
