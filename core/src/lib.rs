//! zflate-core
//!
//! Streaming zlib/deflate/gzip compression over the native zlib library.
//! Bounded native calls, growable output buffers, `Read`/`Write` adapters.

// Shared and top level
pub mod constants;
pub mod types;

// Native boundary; the only module with unsafe code
pub mod native;

pub mod compression;
pub mod telemetry;

// Stream adapters
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{
        compress, decompress, Chunk, CodecConfig, CompressionLevel, Compressor, Decompressor, Format,
        Strategy,
    };
    pub use crate::stream::{ZlibReader, ZlibWriter};
    pub use crate::telemetry::CodecCounters;
    pub use crate::types::{CompressionError, NativeFault};
}
