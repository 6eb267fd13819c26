//! Incremental SHA-256 (FIPS 180-4)
//!
//! A pure, I/O-free state machine. Input may arrive in slices of any length;
//! the digest only depends on the concatenated bytes, never on how they were
//! split across `update` calls.

use super::Digest;
use std::io;

/// Size of one compression block in bytes
pub const BLOCK_LEN: usize = 64;

/// Offset of the 64-bit message length inside the final block
const LENGTH_OFFSET: usize = 56;

/// Initial hash values
const H0: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Round constants
const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

#[inline]
fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

#[inline]
fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

#[inline]
fn big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline]
fn big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline]
fn small_sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline]
fn small_sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

/// Compress one 64-byte block into the working words.
///
/// Words are assembled from the block with explicit shifts so the result
/// does not depend on the host byte order.
pub fn transform(state: &mut [u32; 8], block: &[u8; BLOCK_LEN]) {
    let mut w = [0u32; 64];
    for (i, bytes) in block.chunks_exact(4).enumerate() {
        w[i] = (u32::from(bytes[0]) << 24)
            | (u32::from(bytes[1]) << 16)
            | (u32::from(bytes[2]) << 8)
            | u32::from(bytes[3]);
    }
    for i in 16..64 {
        w[i] = small_sigma1(w[i - 2])
            .wrapping_add(w[i - 7])
            .wrapping_add(small_sigma0(w[i - 15]))
            .wrapping_add(w[i - 16]);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for i in 0..64 {
        let t1 = h
            .wrapping_add(big_sigma1(e))
            .wrapping_add(ch(e, f, g))
            .wrapping_add(K[i])
            .wrapping_add(w[i]);
        let t2 = big_sigma0(a).wrapping_add(maj(a, b, c));
        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (word, value) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *word = word.wrapping_add(value);
    }
}

/// Incremental SHA-256 hash state
///
/// Invariant: `occupancy < BLOCK_LEN` between calls. The bit counter wraps
/// modulo 2^64, which only matters for inputs of 2^61 bytes or more.
#[derive(Clone)]
pub struct Sha256 {
    /// Current digest words
    words: [u32; 8],
    /// Pending input not yet compressed
    block: [u8; BLOCK_LEN],
    /// Number of valid bytes in `block`
    occupancy: usize,
    /// Bits consumed by completed blocks
    bit_len: u64,
}

impl Sha256 {
    /// Create an initialized hash state
    pub fn new() -> Self {
        let mut state = Self {
            words: [0; 8],
            block: [0; BLOCK_LEN],
            occupancy: 0,
            bit_len: 0,
        };
        state.initialize();
        state
    }

    /// Reset to the standard initial values, discarding any buffered input
    pub fn initialize(&mut self) {
        self.words = H0;
        self.occupancy = 0;
        self.bit_len = 0;
    }

    /// Absorb more input
    pub fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let take = (BLOCK_LEN - self.occupancy).min(data.len());
            self.block[self.occupancy..self.occupancy + take].copy_from_slice(&data[..take]);
            self.occupancy += take;
            data = &data[take..];

            if self.occupancy == BLOCK_LEN {
                transform(&mut self.words, &self.block);
                self.bit_len = self.bit_len.wrapping_add(512);
                self.occupancy = 0;
            }
        }
        debug_assert!(self.occupancy < BLOCK_LEN);
    }

    /// Total number of bytes absorbed so far
    pub fn bytes_processed(&self) -> u64 {
        (self.bit_len / 8).wrapping_add(self.occupancy as u64)
    }

    /// Apply the final padding and produce the digest.
    ///
    /// Consumes the state, so a state can only be finalized once.
    pub fn finalize(mut self) -> Digest {
        let occupancy = self.occupancy;
        self.block[occupancy] = 0x80;

        if occupancy < LENGTH_OFFSET {
            self.block[occupancy + 1..LENGTH_OFFSET].fill(0);
        } else {
            // No room for the length: flush this block and pad a fresh one.
            self.block[occupancy + 1..].fill(0);
            transform(&mut self.words, &self.block);
            self.block[..LENGTH_OFFSET].fill(0);
        }

        self.bit_len = self.bit_len.wrapping_add(occupancy as u64 * 8);
        self.block[LENGTH_OFFSET..].copy_from_slice(&self.bit_len.to_be_bytes());
        transform(&mut self.words, &self.block);

        let mut out = [0u8; Digest::LEN];
        for (bytes, word) in out.chunks_exact_mut(4).zip(self.words) {
            bytes.copy_from_slice(&word.to_be_bytes());
        }
        Digest::new(out)
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Sha256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sha256")
            .field("bytes_processed", &self.bytes_processed())
            .finish_non_exhaustive()
    }
}

impl io::Write for Sha256 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hash a byte slice in one call
pub fn sha256(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference(data: &[u8]) -> [u8; 32] {
        use sha2::Digest as _;
        let out = sha2::Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&out);
        bytes
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            sha256(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            sha256(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq").to_hex(),
            "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1"
        );
    }

    #[test]
    fn test_million_a() {
        let data = vec![b'a'; 1_000_000];
        assert_eq!(
            sha256(&data).to_hex(),
            "cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0"
        );
    }

    #[test]
    fn test_padding_boundaries() {
        // Both finalize branches, plus lengths straddling multi-block edges.
        let mut lengths = vec![0, 1, 55, 56, 57, 62, 63, 64, 65, 119, 120, 121];
        for blocks in 1..=4 {
            let base = blocks * BLOCK_LEN;
            lengths.extend([base - 1, base, base + 1, base + 55, base + 56, base + 63]);
        }

        for len in lengths {
            let data = pattern(len);
            assert_eq!(sha256(&data).as_bytes(), &reference(&data), "length {len}");
        }
    }

    #[test]
    fn test_stale_block_bytes_do_not_leak() {
        // 60 bytes of 0xff sit in the block before the final transform; the
        // length block must be zeroed rather than reuse them.
        let data = [0xffu8; 60];
        assert_eq!(sha256(&data).as_bytes(), &reference(&data));
    }

    #[test]
    fn test_initialize_resets_state() {
        let mut hasher = Sha256::new();
        hasher.update(b"discarded input");
        hasher.initialize();
        hasher.update(b"abc");
        assert_eq!(hasher.finalize(), sha256(b"abc"));
    }

    #[test]
    fn test_bytes_processed() {
        let mut hasher = Sha256::new();
        hasher.update(&[0u8; 100]);
        assert_eq!(hasher.bytes_processed(), 100);
        hasher.update(&[0u8; 28]);
        assert_eq!(hasher.bytes_processed(), 128);
    }

    #[test]
    fn test_io_write() {
        let data = pattern(10_000);
        let mut hasher = Sha256::new();
        std::io::copy(&mut data.as_slice(), &mut hasher).unwrap();
        assert_eq!(hasher.finalize(), sha256(&data));
    }

    proptest! {
        #[test]
        fn prop_matches_reference(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let digest = sha256(&data);
            prop_assert_eq!(digest.as_bytes(), &reference(&data));
        }

        #[test]
        fn prop_chunking_invariant(
            data in proptest::collection::vec(any::<u8>(), 0..4096),
            steps in proptest::collection::vec(1usize..200, 1..32),
        ) {
            let expected = sha256(&data);

            let mut hasher = Sha256::new();
            hasher.update(&[]);
            let mut offset = 0;
            let mut i = 0;
            while offset < data.len() {
                let end = (offset + steps[i % steps.len()]).min(data.len());
                hasher.update(&data[offset..end]);
                offset = end;
                i += 1;
            }

            let digest = hasher.finalize();
            prop_assert_eq!(digest.as_bytes().len(), Digest::LEN);
            prop_assert_eq!(digest, expected);
        }
    }
}
