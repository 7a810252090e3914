//! stream/reader.rs
//! `Read` adapter that decompresses a zlib stream pulled from a source.

use std::io::{self, Read};

use log::debug;

use crate::compression::{Chunk, Decompressor, Format};
use crate::constants::READ_CHUNK_SIZE;
use crate::stream::buffer::StreamBuffer;
use crate::telemetry::CodecCounters;
use crate::types::CompressionError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ReaderState {
    Active,
    EndOfStream,
    Closed,
}

/// Reads compressed bytes from `R` and yields the decompressed bytes.
///
/// Decoded output that does not fit the caller's buffer is kept and handed
/// out by the following reads. `Ok(0)` means the end-of-stream marker was
/// reached and everything before it was delivered.
pub struct ZlibReader<R: Read> {
    source: R,
    decoder: Decompressor,
    /// Compressed bytes read from the source but not yet consumed.
    input: StreamBuffer,
    /// Decoded bytes not yet delivered.
    pending: StreamBuffer,
    state: ReaderState,
    /// The last decoder call could not progress with the buffered input.
    stalled: bool,
    /// At least one byte came from the current source, so the decoder may be mid-stream.
    seen_input: bool,
}

impl<R: Read> ZlibReader<R> {
    pub fn new(source: R) -> Result<Self, CompressionError> {
        Self::with_format(source, Format::Zlib)
    }

    pub fn with_format(source: R, format: Format) -> Result<Self, CompressionError> {
        Ok(Self {
            source,
            decoder: Decompressor::with_format(format)?,
            input: StreamBuffer::with_capacity(READ_CHUNK_SIZE),
            pending: StreamBuffer::new(),
            state: ReaderState::Active,
            stalled: false,
            seen_input: false,
        })
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    pub fn counters(&self) -> CodecCounters {
        self.decoder.counters()
    }

    pub fn is_closed(&self) -> bool {
        self.state == ReaderState::Closed
    }

    fn ensure_open(&self) -> Result<(), CompressionError> {
        crate::types::ensure_open(self.is_closed())
    }

    /// Decompress one complete stream held in memory, appending to `out`.
    ///
    /// Independent of the source. Any stream the reader is partway through is
    /// discarded, and reads report end-of-stream until the next `reset`.
    /// Spare capacity already reserved in `out` is used as the size hint.
    /// Returns the number of bytes appended.
    pub fn read_buffer(&mut self, compressed: &[u8], out: &mut Vec<u8>) -> Result<usize, CompressionError> {
        self.ensure_open()?;
        self.abandon_stream()?;
        let room = out.capacity() - out.len();
        let size_hint = (room > 0).then_some(room);
        let processed = self.decoder.decompress_complete_into(compressed, size_hint, out)?;
        Ok(processed.produced)
    }

    /// Owning variant of `read_buffer`.
    pub fn read_bytes(&mut self, compressed: &[u8]) -> Result<Vec<u8>, CompressionError> {
        self.ensure_open()?;
        self.abandon_stream()?;
        let Chunk { output, .. } = self.decoder.decompress(compressed)?;
        Ok(output)
    }

    /// Rebind to a new source, dropping buffered input and undelivered output.
    /// The decoder keeps whatever stream state it has.
    pub fn reset(&mut self, source: R) -> Result<R, CompressionError> {
        self.ensure_open()?;
        self.clear();
        Ok(std::mem::replace(&mut self.source, source))
    }

    /// `reset` plus a fresh decoder stream.
    pub fn reset_stream(&mut self, source: R) -> Result<R, CompressionError> {
        self.ensure_open()?;
        self.decoder.reset()?;
        self.clear();
        debug!("reader rebound to a new stream");
        Ok(std::mem::replace(&mut self.source, source))
    }

    /// Release the decoder. Reads and resets fail with `Closed` afterwards.
    pub fn close(&mut self) -> Result<(), CompressionError> {
        self.ensure_open()?;
        self.input.clear();
        self.pending.clear();
        self.state = ReaderState::Closed;
        self.decoder.close()
    }

    fn clear(&mut self) {
        self.input.clear();
        self.pending.clear();
        self.state = ReaderState::Active;
        self.stalled = false;
        self.seen_input = false;
    }

    fn abandon_stream(&mut self) -> Result<(), CompressionError> {
        if self.seen_input && self.state == ReaderState::Active {
            self.decoder.reset()?;
        }
        self.input.clear();
        self.pending.clear();
        self.state = ReaderState::EndOfStream;
        self.stalled = false;
        Ok(())
    }

    /// Decode until there is output to hand out or the stream ended.
    fn refill(&mut self) -> Result<(), CompressionError> {
        while self.pending.is_empty() && self.state == ReaderState::Active {
            if self.input.is_empty() || self.stalled {
                let n = self.input.fill_from(&mut self.source, READ_CHUNK_SIZE)?;
                if n == 0 {
                    // zero bytes is not a stream either
                    return Err(CompressionError::UnexpectedEof);
                }
                self.seen_input = true;
            }

            let processed = self
                .decoder
                .decompress_chunk_into(self.input.readable(), self.pending.tail_mut())?;
            self.input.consume(processed.consumed);
            self.stalled = processed.consumed == 0 && processed.produced == 0;

            if processed.completed {
                self.state = ReaderState::EndOfStream;
            }
        }
        Ok(())
    }
}

impl<R: Read> Read for ZlibReader<R> {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;
        if dst.is_empty() {
            return Ok(0);
        }
        self.refill()?;
        Ok(self.pending.read_into(dst))
    }
}
