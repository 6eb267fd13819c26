//! Synchronous streaming digest
//!
//! Reads the file sequentially in fixed 64 KiB chunks on the calling thread
//! and feeds each chunk to the hash engine. Blocking I/O, no concurrency.

use crate::error::{DigestError, IoResultExt, Result};
use crate::hash::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Read size for the streaming path
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Drives the hash engine from buffered sequential reads
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamingRunner;

impl StreamingRunner {
    /// Create a new runner
    pub fn new() -> Self {
        Self
    }

    /// Digest the file at `path`
    pub fn hash_file(&self, path: &Path) -> Result<Digest> {
        let file = File::open(path).with_path(path)?;
        if file.metadata().with_path(path)?.is_dir() {
            return Err(DigestError::io(
                path,
                std::io::Error::new(ErrorKind::InvalidInput, "is a directory"),
            ));
        }
        tracing::debug!("Streaming {} in {} byte chunks", path.display(), CHUNK_SIZE);

        self.hash_reader(file).with_path(path)
    }

    /// Digest everything `reader` yields until end of stream.
    ///
    /// Any read error other than `Interrupted` aborts the run; no partial
    /// digest is produced.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> std::io::Result<Digest> {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            hasher.update(&buffer[..bytes_read]);
        }

        tracing::trace!("Streamed {} bytes", hasher.bytes_processed());
        Ok(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;
    use std::io::{self, Cursor};
    use tempfile::TempDir;

    /// Yields the inner data in odd-sized reads, with an interruption and
    /// optionally a hard failure part way through.
    struct FlakyReader {
        inner: Cursor<Vec<u8>>,
        calls: usize,
        fail_at: Option<usize>,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls == 2 {
                return Err(io::Error::new(ErrorKind::Interrupted, "signal"));
            }
            if Some(self.calls) == self.fail_at {
                return Err(io::Error::new(ErrorKind::Other, "device went away"));
            }
            let limit = buf.len().min(1000 + self.calls * 7);
            self.inner.read(&mut buf[..limit])
        }
    }

    #[test]
    fn test_hash_file_matches_one_shot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        // Crosses several chunk boundaries and ends mid-block.
        let content: Vec<u8> = (0..CHUNK_SIZE * 3 + 77).map(|i| (i % 241) as u8).collect();
        std::fs::write(&path, &content).unwrap();

        let digest = StreamingRunner::new().hash_file(&path).unwrap();
        assert_eq!(digest, sha256(&content));
    }

    #[test]
    fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();

        let digest = StreamingRunner::new().hash_file(&path).unwrap();
        assert_eq!(
            digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = StreamingRunner::new()
            .hash_file(&dir.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, DigestError::NotFound(_)));
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let content: Vec<u8> = (0..50_000).map(|i| (i % 199) as u8).collect();
        let reader = FlakyReader {
            inner: Cursor::new(content.clone()),
            calls: 0,
            fail_at: None,
        };

        let digest = StreamingRunner::new().hash_reader(reader).unwrap();
        assert_eq!(digest, sha256(&content));
    }

    #[test]
    fn test_read_failure_aborts() {
        let reader = FlakyReader {
            inner: Cursor::new(vec![7u8; 50_000]),
            calls: 0,
            fail_at: Some(5),
        };

        let err = StreamingRunner::new().hash_reader(reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[test]
    fn test_deterministic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, vec![0x5au8; 200_000]).unwrap();

        let runner = StreamingRunner::new();
        assert_eq!(runner.hash_file(&path).unwrap(), runner.hash_file(&path).unwrap());
    }
}
