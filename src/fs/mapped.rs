//! Read-only memory-mapped file view
//!
//! The view exposes the whole file as a `&[u8]` backed directly by the page
//! cache. Nothing is copied; pages are faulted in on first access.

use crate::error::{DigestError, IoResultExt, Result};
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::ops::{Deref, Index};
use std::path::{Path, PathBuf};

/// Zero-copy, read-only view over an entire file.
///
/// The mapping lives exactly as long as the value. `close` consumes the
/// view, so reading after close or closing twice does not compile. Share
/// it across threads through an `Arc`; the mapping is released when the
/// last holder lets go.
pub struct MappedView {
    path: PathBuf,
    /// `None` for zero-length files, which cannot be mapped portably
    map: Option<Mmap>,
}

impl MappedView {
    /// Map `path` read-only
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_path(path)?;
        let metadata = file.metadata().with_path(path)?;
        if metadata.is_dir() {
            return Err(DigestError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "is a directory"),
            ));
        }
        let size = metadata.len();

        if size == 0 {
            tracing::debug!("{} is empty, using an unmapped view", path.display());
            return Ok(Self {
                path: path.to_path_buf(),
                map: None,
            });
        }

        if usize::try_from(size).is_err() {
            return Err(DigestError::io(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file is larger than the address space",
                ),
            ));
        }

        // SAFETY: the file is opened read-only and the map is never written.
        // A concurrent truncation by another process can still raise SIGBUS;
        // that is inherent to file mappings and not a memory-safety issue
        // within this process' own accesses.
        let map = unsafe { MmapOptions::new().map(&file) }.with_path(path)?;

        #[cfg(unix)]
        if let Err(e) = map.advise(memmap2::Advice::Sequential) {
            tracing::debug!("madvise(SEQUENTIAL) failed for {}: {}", path.display(), e);
        }

        tracing::debug!(
            "Mapped {} ({})",
            path.display(),
            humansize::format_size(size, humansize::BINARY)
        );

        Ok(Self {
            path: path.to_path_buf(),
            map: Some(map),
        })
    }

    /// Path the view was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes in the view, equal to the file size at open time
    pub fn len(&self) -> usize {
        self.map.as_ref().map_or(0, |m| m.len())
    }

    /// Whether the mapped file is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The whole file as a byte slice
    pub fn as_slice(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }

    /// Byte at `index`, or `None` past the end
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_slice().get(index).copied()
    }

    /// Release the mapping
    pub fn close(self) {
        tracing::debug!("Unmapping {}", self.path.display());
        drop(self);
    }
}

impl Deref for MappedView {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for MappedView {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Index<usize> for MappedView {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.as_slice()[index]
    }
}

impl std::fmt::Debug for MappedView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedView")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::{BufReader, Read};
    use tempfile::TempDir;

    fn buffered_read(path: &Path) -> Vec<u8> {
        let mut reader = BufReader::with_capacity(4096, File::open(path).unwrap());
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_view_matches_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        let content: Vec<u8> = (0..100_000).map(|i| (i % 253) as u8).collect();
        std::fs::write(&path, &content).unwrap();

        let view = MappedView::open(&path).unwrap();
        assert_eq!(view.len(), content.len());
        assert_eq!(view.len() as u64, std::fs::metadata(&path).unwrap().len());
        assert_eq!(view[0], content[0]);
        assert_eq!(view[99_999], content[99_999]);
        assert_eq!(view.get(100_000), None);
        assert_eq!(view.path(), path.as_path());
        view.close();
    }

    #[test]
    fn test_empty_file_yields_empty_view() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();

        let view = MappedView::open(&path).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.as_slice(), &[] as &[u8]);
        assert_eq!(view.get(0), None);
        view.close();
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = MappedView::open(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, DigestError::NotFound(_)));
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = MappedView::open(dir.path()).unwrap_err();
        assert!(matches!(err, DigestError::Io { .. }));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_view_equals_buffered_reads(
            content in proptest::collection::vec(any::<u8>(), 0..20_000),
        ) {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("prop.bin");
            std::fs::write(&path, &content).unwrap();

            let view = MappedView::open(&path).unwrap();
            let read = buffered_read(&path);
            prop_assert_eq!(view.len(), read.len());
            for (i, byte) in read.iter().enumerate() {
                prop_assert_eq!(view[i], *byte);
            }
        }
    }
}
