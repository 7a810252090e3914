//! constants.rs
//! Buffer sizing and retry constants shared by the processor and the adapters.

/// Minimum spare output capacity ensured before every native call (8 KiB).
/// Amortizes call overhead; it is not an estimate of the final output size.
pub const OUTPUT_WINDOW_INCREMENT: usize = 8 * 1024;

/// Assumed ratio between decompressed and compressed sizes.
/// Used to size the first output buffer when nothing better is known.
pub const ASSUMED_COMPRESSION_FACTOR: usize = 7;

/// Upper bound on single-shot decompression attempts before giving up.
pub const MAX_COMPLETE_ATTEMPTS: usize = 16;

/// Bytes pulled from a reader's source per refill (32 KiB).
pub const READ_CHUNK_SIZE: usize = 32 * 1024;

/// Largest window the codec accepts in a single call (`uInt` lengths).
pub const MAX_NATIVE_WINDOW: usize = u32::MAX as usize;

/// Compression level bounds and sentinels.
pub mod levels {
    pub const NO_COMPRESSION: i32 = 0;
    pub const BEST_SPEED: i32 = 1;
    pub const BEST_COMPRESSION: i32 = 9;
    /// Let the codec pick its default level (currently 6).
    pub const DEFAULT: i32 = -1;
    /// Entropy coding only, no match finding.
    pub const HUFFMAN_ONLY: i32 = -2;
}

/// Native window bits per wrapper format (32 KiB window).
pub mod window_bits {
    pub const ZLIB: i32 = 15;
    pub const RAW: i32 = -15;
    pub const GZIP: i32 = 15 + 16;
}

/// Memory level bounds for the compressor's internal state.
pub const MIN_MEM_LEVEL: i32 = 1;
pub const MAX_MEM_LEVEL: i32 = 9;
pub const DEFAULT_MEM_LEVEL: i32 = 8;
