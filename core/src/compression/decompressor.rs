//! compression/decompressor.rs
//! Decompressing façade over the stream processor.
//!
//! Two modes:
//! - chunked: native state persists across calls until the end-of-stream marker;
//! - complete: one finish-mode pass with a fixed output capacity, retried with
//!   a larger capacity when the output does not fit.

use log::debug;

use crate::compression::config::Format;
use crate::compression::processor::{ProcessOutcome, Processed, StreamProcessor};
use crate::constants::{ASSUMED_COMPRESSION_FACTOR, MAX_COMPLETE_ATTEMPTS, OUTPUT_WINDOW_INCREMENT};
use crate::native::{FlushMode, NativeHandle};
use crate::telemetry::CodecCounters;
use crate::types::{ensure_open, CompressionError};

/// Output of one decompression call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chunk {
    /// Input bytes consumed. Bytes after the end-of-stream marker are never consumed.
    pub consumed: usize,
    pub output: Vec<u8>,
    /// The end-of-stream marker was reached.
    pub completed: bool,
}

pub struct Decompressor {
    processor: StreamProcessor,
    format: Format,
}

impl Decompressor {
    /// Zlib-framed decompressor.
    pub fn new() -> Result<Self, CompressionError> {
        Self::with_format(Format::Zlib)
    }

    pub fn with_format(format: Format) -> Result<Self, CompressionError> {
        let handle = NativeHandle::inflate(format.window_bits())?;
        debug!("decompressor ready: format={format:?}");
        Ok(Self {
            processor: StreamProcessor::new(handle),
            format,
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn is_closed(&self) -> bool {
        self.processor.is_closed()
    }

    pub fn counters(&self) -> CodecCounters {
        self.processor.counters()
    }

    /// Feed the next piece of a stream and collect everything it decodes to.
    ///
    /// # Errors
    /// - `NoInput` for an empty slice.
    /// - `Process` for corrupt data; call `reset` before reusing the decompressor.
    pub fn decompress_chunk(&mut self, input: &[u8]) -> Result<Chunk, CompressionError> {
        ensure_open(self.is_closed())?;
        let mut output = Vec::new();
        match self.decompress_chunk_into(input, &mut output) {
            Ok(processed) => Ok(Chunk {
                consumed: processed.consumed,
                output,
                completed: processed.completed,
            }),
            Err(err) => Err(err.with_output(output)),
        }
    }

    /// Like `decompress_chunk`, appending to `out`.
    pub fn decompress_chunk_into(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<Processed, CompressionError> {
        ensure_open(self.is_closed())?;
        if input.is_empty() {
            return Err(CompressionError::NoInput);
        }
        self.processor.process(input, out, FlushMode::Sync, |s| {
            !s.completed && (s.input_remaining() || s.output_filled)
        })
    }

    /// Decompress one whole stream held in `input`.
    pub fn decompress(&mut self, input: &[u8]) -> Result<Chunk, CompressionError> {
        self.decompress_complete(input, None)
    }

    /// Decompress one whole stream, starting with `size_hint` bytes of output room.
    ///
    /// Without a hint the room is estimated from the input length. Each retry
    /// starts the stream over with twice the room.
    pub fn decompress_complete(&mut self, input: &[u8], size_hint: Option<usize>) -> Result<Chunk, CompressionError> {
        ensure_open(self.is_closed())?;
        let mut output = Vec::new();
        match self.decompress_complete_into(input, size_hint, &mut output) {
            Ok(processed) => Ok(Chunk {
                consumed: processed.consumed,
                output,
                completed: processed.completed,
            }),
            Err(err) => Err(err.with_output(output)),
        }
    }

    /// Like `decompress_complete`, appending to `out`. Output of abandoned
    /// attempts is truncated away.
    pub fn decompress_complete_into(
        &mut self,
        input: &[u8],
        size_hint: Option<usize>,
        out: &mut Vec<u8>,
    ) -> Result<Processed, CompressionError> {
        ensure_open(self.is_closed())?;
        if input.is_empty() {
            return Err(CompressionError::NoInput);
        }

        let start = out.len();
        let mut capacity = match size_hint {
            Some(hint) => hint.max(1),
            None => input
                .len()
                .saturating_mul(ASSUMED_COMPRESSION_FACTOR)
                .max(OUTPUT_WINDOW_INCREMENT),
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self
                .processor
                .process_once(input, out, FlushMode::Finish, capacity, |s| !s.completed)?
            {
                ProcessOutcome::Done(processed) => return Ok(processed),
                ProcessOutcome::Retry { suggested_capacity } => {
                    out.truncate(start);
                    self.processor.reset()?;
                    self.processor.record_retry();
                    if attempts >= MAX_COMPLETE_ATTEMPTS {
                        return Err(CompressionError::OutputLimit { attempts, capacity });
                    }
                    debug!("attempt {attempts}: {capacity} bytes not enough, retrying with {suggested_capacity}");
                    capacity = suggested_capacity;
                }
            }
        }
    }

    /// Discard any partially decoded stream and rearm for a new one.
    pub fn reset(&mut self) -> Result<(), CompressionError> {
        self.processor.reset()
    }

    /// Release the native handle. A second call fails with `Closed`.
    pub fn close(&mut self) -> Result<(), CompressionError> {
        self.processor.close()
    }
}
