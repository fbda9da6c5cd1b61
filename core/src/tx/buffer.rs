// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Chunk reassembly buffer
//!
//! Transaction chunks are appended to a fixed-capacity buffer holding only
//! the bytes not yet consumed by the parser, reads either return the
//! requested bytes in full or leave the cursor untouched.
//! Every consumed byte is fed through a running SHA-256 digest.

use byteorder::{ByteOrder, LittleEndian};
use heapless::Vec;
use sha2::{Digest, Sha256};

use crate::apdu::MAX_APDU_DATA;

/// Largest field read atomically (a compressed group public key)
pub const MAX_FIELD_LEN: usize = 33;

/// Buffer capacity, one full chunk plus a partially received field
pub const BUFFER_CAPACITY: usize = 512;

static_assertions::const_assert!(BUFFER_CAPACITY >= MAX_APDU_DATA + MAX_FIELD_LEN);

/// Buffer read errors
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ReadError {
    /// Insufficient data, more chunks expected
    NeedMoreData,
    /// Insufficient data, final chunk already received
    UnexpectedEnd,
    /// Variable length integer not minimally encoded
    NonCanonical,
    /// Chunk exceeds buffer capacity
    Overflow,
}

/// Chunk reassembly buffer with a read cursor over unconsumed bytes
#[derive(Clone, Debug)]
pub struct ChunkBuffer {
    data: Vec<u8, BUFFER_CAPACITY>,
    cursor: usize,
    last: bool,
    consumed: usize,
    hasher: Sha256,
}

impl Default for ChunkBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            cursor: 0,
            last: false,
            consumed: 0,
            hasher: Sha256::new(),
        }
    }

    /// Append a chunk, compacting previously consumed bytes
    pub fn feed(&mut self, chunk: &[u8], is_last: bool) -> Result<(), ReadError> {
        if self.cursor > 0 {
            let n = self.data.len();
            self.data.copy_within(self.cursor..n, 0);
            self.data.truncate(n - self.cursor);
            self.cursor = 0;
        }

        self.data
            .extend_from_slice(chunk)
            .map_err(|_| ReadError::Overflow)?;
        self.last = is_last;

        Ok(())
    }

    /// Number of buffered bytes not yet consumed
    pub fn available(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Whether the final chunk has been received
    pub fn is_last(&self) -> bool {
        self.last
    }

    /// Total number of bytes consumed (and hashed)
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Digest over all bytes consumed so far
    pub fn digest(&self) -> [u8; 32] {
        self.hasher.clone().finalize().into()
    }

    /// Read exactly `n` bytes
    pub fn read_exact(&mut self, n: usize) -> Result<&[u8], ReadError> {
        if self.available() < n {
            return Err(self.shortfall());
        }

        Ok(self.consume(n))
    }

    /// Read up to `max` bytes, returning at least one byte where `max > 0`
    pub fn read_up_to(&mut self, max: usize) -> Result<&[u8], ReadError> {
        let n = self.available().min(max);
        if n == 0 && max > 0 {
            return Err(self.shortfall());
        }

        Ok(self.consume(n))
    }

    /// Read a fixed size array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut a = [0u8; N];
        a.copy_from_slice(self.read_exact(N)?);
        Ok(a)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.read_exact(1).map(|b| b[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        self.read_exact(4).map(LittleEndian::read_u32)
    }

    pub fn read_i64(&mut self) -> Result<i64, ReadError> {
        self.read_exact(8).map(LittleEndian::read_i64)
    }

    /// Read a variable length integer
    ///
    /// Values below `0xfd` are a single byte, `0xfd`, `0xfe` and `0xff`
    /// prefix a 2, 4 or 8 byte little-endian value respectively.
    /// Prefixed values that would fit a shorter form are rejected.
    pub fn read_varint(&mut self) -> Result<u64, ReadError> {
        let marker = match self.data.get(self.cursor) {
            Some(v) => *v,
            None => return Err(self.shortfall()),
        };

        let (width, min) = match marker {
            0xfd => (2, 0xfd),
            0xfe => (4, 0x1_0000),
            0xff => (8, 0x1_0000_0000),
            v => {
                self.consume(1);
                return Ok(v as u64);
            }
        };

        if self.available() < 1 + width {
            return Err(self.shortfall());
        }

        let v = LittleEndian::read_uint(&self.data[self.cursor + 1..], width);
        if v < min {
            return Err(ReadError::NonCanonical);
        }

        self.consume(1 + width);

        Ok(v)
    }

    /// Drop all buffered bytes without hashing
    pub fn discard(&mut self) -> usize {
        let n = self.available();
        self.data.clear();
        self.cursor = 0;
        n
    }

    fn shortfall(&self) -> ReadError {
        match self.last {
            true => ReadError::UnexpectedEnd,
            false => ReadError::NeedMoreData,
        }
    }

    fn consume(&mut self, n: usize) -> &[u8] {
        let start = self.cursor;
        let d = &self.data[start..][..n];

        self.hasher.update(d);
        self.cursor += n;
        self.consumed += n;

        &self.data[start..][..n]
    }
}
