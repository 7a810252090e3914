//! stream/writer.rs
//! `Write` adapter that compresses everything written into a zlib stream.

use std::io::{self, Write};

use log::{debug, warn};

use crate::compression::{CodecConfig, CompressionLevel, Compressor};
use crate::telemetry::CodecCounters;
use crate::types::{ensure_open, CompressionError};

/// Compresses written bytes and forwards them to `W`.
///
/// Each `write` is flushed through the codec, so the sink can decode
/// everything written so far. `close` (or drop) terminates the stream.
pub struct ZlibWriter<W: Write> {
    sink: W,
    encoder: Compressor,
}

impl<W: Write> ZlibWriter<W> {
    pub fn new(sink: W) -> Result<Self, CompressionError> {
        Self::with_config(sink, CodecConfig::default())
    }

    pub fn with_level(sink: W, level: i32) -> Result<Self, CompressionError> {
        Self::with_config(sink, CodecConfig::default().with_level(CompressionLevel::new(level)?))
    }

    pub fn with_config(sink: W, config: CodecConfig) -> Result<Self, CompressionError> {
        Ok(Self {
            sink,
            encoder: Compressor::new(config)?,
        })
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Writing to the sink directly corrupts the stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn counters(&self) -> CodecCounters {
        self.encoder.counters()
    }

    pub fn is_closed(&self) -> bool {
        self.encoder.is_closed()
    }

    /// Terminate the stream, flush the sink and release the encoder.
    /// A second call fails with `Closed`.
    pub fn close(&mut self) -> Result<(), CompressionError> {
        ensure_open(self.is_closed())?;
        let finished = self.finish_stream();
        let closed = self.encoder.close();
        finished?;
        match closed {
            Ok(tail) => self.sink.write_all(&tail)?,
            Err(err) => {
                if let Some(tail) = err.recovered_output() {
                    self.sink.write_all(tail)?;
                }
                return Err(err);
            }
        }
        self.sink.flush()?;
        Ok(())
    }

    /// Terminate the current stream into the current sink, then bind `sink`.
    ///
    /// The next write starts a new logical stream, whichever sink it goes to.
    /// If nothing was written since the last stream ended, the old sink
    /// receives no bytes.
    pub fn reset(&mut self, sink: W) -> Result<W, CompressionError> {
        ensure_open(self.is_closed())?;
        if self.encoder.is_stream_open() {
            self.finish_stream()?;
        }
        self.sink.flush()?;
        debug!("writer rebound to a new stream");
        Ok(std::mem::replace(&mut self.sink, sink))
    }

    /// One-shot: compress `data` into a complete stream returned to the caller.
    ///
    /// The sink is not written, except that a chunked stream left open by
    /// earlier writes is finished into it first.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        ensure_open(self.is_closed())?;
        if data.is_empty() {
            return Err(CompressionError::NoInput);
        }
        if self.encoder.is_stream_open() {
            self.finish_stream()?;
        }
        self.encoder.compress(data)
    }

    /// Write the rest of the current stream, end marker included, and rearm the encoder.
    fn finish_stream(&mut self) -> Result<(), CompressionError> {
        let tail = if self.encoder.is_stream_open() {
            self.encoder.reset()?
        } else {
            // Nothing written yet: still emit a valid, empty stream.
            self.encoder.compress(&[])?
        };
        self.sink.write_all(&tail)?;
        Ok(())
    }
}

impl<W: Write> Write for ZlibWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        ensure_open(self.is_closed())?;
        if data.is_empty() {
            return Err(CompressionError::NoInput.into());
        }
        let out = self.encoder.compress_chunk(data)?;
        self.sink.write_all(&out)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        ensure_open(self.is_closed())?;
        let out = self.encoder.flush()?;
        self.sink.write_all(&out)?;
        self.sink.flush()
    }
}

impl<W: Write> Drop for ZlibWriter<W> {
    fn drop(&mut self) {
        if self.is_closed() {
            return;
        }
        // Best effort: the stream should still end with its marker.
        if let Err(err) = self.close() {
            warn!("zlib writer dropped without a clean close: {err}");
        }
    }
}
