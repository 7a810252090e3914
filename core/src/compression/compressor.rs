//! compression/compressor.rs
//! Compressing façade over the stream processor.

use log::debug;

use crate::compression::config::{CodecConfig, CompressionLevel};
use crate::compression::processor::{Processed, StreamProcessor};
use crate::constants::ASSUMED_COMPRESSION_FACTOR;
use crate::native::{FlushMode, NativeHandle};
use crate::telemetry::CodecCounters;
use crate::types::{ensure_open, CompressionError};

/// Streaming zlib compressor.
///
/// - `compress` produces one complete stream per call.
/// - `compress_chunk` keeps a stream open across calls; `reset` or `close` terminates it.
pub struct Compressor {
    processor: StreamProcessor,
    config: CodecConfig,
    /// A stream was started by `compress_chunk` and not yet terminated.
    stream_open: bool,
}

impl Compressor {
    /// Open a native compressing stream.
    ///
    /// # Errors
    /// - `CompressionError::Init` if zlib rejects the parameters or cannot allocate.
    pub fn new(config: CodecConfig) -> Result<Self, CompressionError> {
        let handle = NativeHandle::deflate(config.deflate_params())?;
        debug!(
            "compressor ready: level={} strategy={:?} format={:?}",
            config.level().get(),
            config.strategy(),
            config.format()
        );
        Ok(Self {
            processor: StreamProcessor::new(handle),
            config,
            stream_open: false,
        })
    }

    /// Default configuration with the given raw level.
    pub fn with_level(level: i32) -> Result<Self, CompressionError> {
        Self::new(CodecConfig::default().with_level(CompressionLevel::new(level)?))
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.processor.is_closed()
    }

    pub fn counters(&self) -> CodecCounters {
        self.processor.counters()
    }

    /// `compress_chunk` started a stream that is not terminated yet.
    pub fn is_stream_open(&self) -> bool {
        self.stream_open
    }

    /// Compress `input` into a complete, terminated stream.
    ///
    /// Anything buffered by earlier `compress_chunk` calls becomes part of this stream.
    pub fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        ensure_open(self.is_closed())?;
        let mut out = Vec::with_capacity(input.len() / ASSUMED_COMPRESSION_FACTOR);
        match self.compress_into(input, &mut out) {
            Ok(_) => Ok(out),
            Err(err) => Err(err.with_output(out)),
        }
    }

    /// Like `compress`, appending to `out`. Returns the number of bytes appended.
    pub fn compress_into(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<usize, CompressionError> {
        ensure_open(self.is_closed())?;
        let processed = self.finish_into(input, out)?;
        Ok(processed.produced)
    }

    /// Compress `input` and flush, leaving the stream open.
    ///
    /// Everything passed so far can be decoded by the receiver once these bytes
    /// arrive. Empty input only flushes.
    pub fn compress_chunk(&mut self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        ensure_open(self.is_closed())?;
        let mut out = Vec::new();
        self.processor.process(input, &mut out, FlushMode::Sync, |s| {
            s.calls == 0 || s.input_remaining() || s.output_filled
        })?;
        self.stream_open = true;
        Ok(out)
    }

    /// Emit whatever the open stream still holds. No-op without an open stream.
    pub fn flush(&mut self) -> Result<Vec<u8>, CompressionError> {
        ensure_open(self.is_closed())?;
        if !self.stream_open {
            return Ok(Vec::new());
        }
        self.compress_chunk(&[])
    }

    /// Terminate the open stream (if any) and rearm for a new one.
    /// Returns the final bytes of the terminated stream.
    pub fn reset(&mut self) -> Result<Vec<u8>, CompressionError> {
        ensure_open(self.is_closed())?;
        if self.stream_open {
            return self.finish_stream();
        }
        self.processor.reset()?;
        Ok(Vec::new())
    }

    /// Terminate the open stream (if any) and release the native handle.
    ///
    /// The handle is released even when finishing fails.
    pub fn close(&mut self) -> Result<Vec<u8>, CompressionError> {
        ensure_open(self.is_closed())?;
        let finished = if self.stream_open {
            self.finish_stream()
        } else {
            Ok(Vec::new())
        };
        self.stream_open = false;
        let closed = self.processor.close();

        match (finished, closed) {
            (Ok(out), Ok(())) => Ok(out),
            (Ok(out), Err(err)) => Err(err.with_output(out)),
            (Err(err), _) => Err(err),
        }
    }

    fn finish_stream(&mut self) -> Result<Vec<u8>, CompressionError> {
        let mut out = Vec::new();
        match self.finish_into(&[], &mut out) {
            Ok(_) => Ok(out),
            Err(err) => Err(err.with_output(out)),
        }
    }

    fn finish_into(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<Processed, CompressionError> {
        let direction = self.processor.direction();
        let result = self
            .processor
            .process(input, out, FlushMode::Finish, |s| !s.completed)
            .and_then(|processed| processed.ensure_completed(direction));
        if matches!(result, Ok(_) | Err(CompressionError::Reset { .. })) {
            self.stream_open = false;
        }
        result
    }
}
