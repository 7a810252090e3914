//! compression/mod.rs
//! Streaming zlib compression and decompression over a native handle.
//!
//! Notes:
//! - One `StreamProcessor` owns one native handle and drives it with bounded calls.
//! - `Compressor` and `Decompressor` pick the flush mode and the stopping condition.
//! - Configuration is validated when it is built, never on first use.

pub mod buffer;
pub mod config;
pub mod compressor;
pub mod decompressor;
pub mod processor;

pub use buffer::*;
pub use config::*;
pub use compressor::*;
pub use decompressor::*;
pub use processor::*;

use crate::types::CompressionError;

/// Compress `data` into one complete zlib stream at `level`.
pub fn compress(data: &[u8], level: i32) -> Result<Vec<u8>, CompressionError> {
    let mut compressor = Compressor::with_level(level)?;
    let out = compressor.compress(data)?;
    compressor.close()?;
    Ok(out)
}

/// Decompress one complete zlib stream. Bytes after its end marker are ignored.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut decompressor = Decompressor::new()?;
    let chunk = decompressor.decompress(data)?;
    decompressor.close()?;
    Ok(chunk.output)
}
