//! stream/buffer.rs
//! Growable byte queue shared by the stream adapters.

use std::io::{self, Read};

/// Bytes waiting to be consumed, front to back.
///
/// Consumed bytes are only reclaimed by `compact`, so `readable` stays a
/// cheap slice between refills.
#[derive(Debug, Default)]
pub struct StreamBuffer {
    data: Vec<u8>,
    /// Start of the unconsumed bytes.
    read_pos: usize,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            read_pos: 0,
        }
    }

    /// Number of bytes not yet consumed.
    #[inline]
    pub fn available(&self) -> usize {
        self.data.len() - self.read_pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read_pos >= self.data.len()
    }

    #[inline]
    pub fn readable(&self) -> &[u8] {
        &self.data[self.read_pos..]
    }

    /// Consume `n` bytes from the front; clamped to what is available.
    #[inline]
    pub fn consume(&mut self, n: usize) {
        self.read_pos = (self.read_pos + n).min(self.data.len());
        if self.read_pos == self.data.len() {
            self.clear();
        }
    }

    /// Drop all bytes; capacity is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
        self.read_pos = 0;
    }

    /// Move the unconsumed bytes to the front.
    pub fn compact(&mut self) {
        if self.read_pos > 0 {
            self.data.drain(..self.read_pos);
            self.read_pos = 0;
        }
    }

    /// Direct access for appending, e.g. as the output of a codec call.
    /// The unconsumed region starts at the current read position.
    #[inline]
    pub fn tail_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    /// Pull at most `max` bytes from `source`, retrying on `Interrupted`.
    ///
    /// Returns the number of bytes appended; 0 means the source is exhausted.
    pub fn fill_from<R: Read>(&mut self, source: &mut R, max: usize) -> io::Result<usize> {
        self.compact();
        let start = self.data.len();
        self.data.resize(start + max, 0);
        loop {
            match source.read(&mut self.data[start..]) {
                Ok(n) => {
                    self.data.truncate(start + n);
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.data.truncate(start);
                    return Err(e);
                }
            }
        }
    }

    /// Copy as much as fits into `dst` and consume it.
    pub fn read_into(&mut self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.available());
        if n > 0 {
            dst[..n].copy_from_slice(&self.data[self.read_pos..self.read_pos + n]);
            self.consume(n);
        }
        n
    }
}
