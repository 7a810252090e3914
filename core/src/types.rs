use std::fmt;
use std::io;

use thiserror::Error;

/// Which way a native stream codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Compress,
    Decompress,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Compress => f.write_str("deflate"),
            Direction::Decompress => f.write_str("inflate"),
        }
    }
}

/// Failure reported by the native codec, as far as zlib distinguishes them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum NativeFault {
    #[error("inconsistent internal stream state")]
    InconsistentState,
    #[error("malformed or corrupt input data")]
    MalformedData,
    #[error("codec ran out of memory")]
    OutOfMemory,
    #[error("incompatible codec library version")]
    VersionMismatch,
    #[error("stream requires a preset dictionary")]
    NeedDictionary,
    #[error("input ended before the end-of-stream marker")]
    Truncated,
    #[error("unknown codec status {0}")]
    Unknown(i32),
}

/// Unified error for the codec handles, façades and adapters.
/// - Usage errors are checked up front by every public operation.
/// - Lifecycle errors that happen after output was produced carry that output.
#[derive(Debug, Error)]
pub enum CompressionError {
    /// An operation that needs at least one input byte got none.
    #[error("no input provided: please provide at least 1 byte")]
    NoInput,

    /// The stream was closed and must not be used any more.
    #[error("stream is already closed")]
    Closed,

    #[error("invalid compression level {0}")]
    InvalidLevel(i32),

    #[error("invalid compression strategy {0}")]
    InvalidStrategy(i32),

    #[error("invalid memory level {0}")]
    InvalidMemLevel(i32),

    #[error("invalid stream format {0}")]
    InvalidFormat(u8),

    #[error("{direction} stream could not be initialized: {fault}")]
    Init { direction: Direction, fault: NativeFault },

    /// Closing failed. Bytes finalized before the failure are kept in `output`.
    #[error("stream could not be closed cleanly: {fault} ({} bytes recovered)", .output.len())]
    Close { fault: NativeFault, output: Vec<u8> },

    /// Rearming failed after a completed stream. The produced data is still valid.
    #[error("stream could not be reset: {fault} ({} bytes recovered)", .output.len())]
    Reset {
        fault: NativeFault,
        consumed: usize,
        output: Vec<u8>,
    },

    #[error("{direction} stream error: {fault}")]
    Process { direction: Direction, fault: NativeFault },

    #[error("decompressed output did not fit after {attempts} attempts (last capacity {capacity} bytes)")]
    OutputLimit { attempts: usize, capacity: usize },

    #[error("compressed source ended before the end-of-stream marker")]
    UnexpectedEof,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CompressionError {
    /// Output that was produced before a lifecycle failure, if any.
    pub fn recovered_output(&self) -> Option<&[u8]> {
        match self {
            CompressionError::Close { output, .. } | CompressionError::Reset { output, .. } => {
                Some(output)
            }
            _ => None,
        }
    }

    /// Consume the error and keep the recovered output.
    pub fn into_recovered_output(self) -> Option<Vec<u8>> {
        match self {
            CompressionError::Close { output, .. } | CompressionError::Reset { output, .. } => {
                Some(output)
            }
            _ => None,
        }
    }

    /// Attach output produced by an owning façade to a lifecycle error.
    /// Any other variant is returned unchanged and `produced` is dropped.
    pub fn with_output(self, produced: Vec<u8>) -> Self {
        match self {
            CompressionError::Close { fault, .. } => CompressionError::Close { fault, output: produced },
            CompressionError::Reset { fault, consumed, .. } => CompressionError::Reset {
                fault,
                consumed,
                output: produced,
            },
            other => other,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            CompressionError::NoInput
                | CompressionError::Closed
                | CompressionError::InvalidLevel(_)
                | CompressionError::InvalidStrategy(_)
                | CompressionError::InvalidMemLevel(_)
                | CompressionError::InvalidFormat(_)
        )
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self {
            CompressionError::NoInput
            | CompressionError::InvalidLevel(_)
            | CompressionError::InvalidStrategy(_)
            | CompressionError::InvalidMemLevel(_)
            | CompressionError::InvalidFormat(_) => io::ErrorKind::InvalidInput,
            CompressionError::Process { fault: NativeFault::OutOfMemory, .. } => {
                io::ErrorKind::OutOfMemory
            }
            CompressionError::Process { .. } => io::ErrorKind::InvalidData,
            CompressionError::UnexpectedEof => io::ErrorKind::UnexpectedEof,
            _ => io::ErrorKind::Other,
        }
    }
}

impl From<CompressionError> for io::Error {
    fn from(e: CompressionError) -> Self {
        match e {
            CompressionError::Io(inner) => inner,
            other => io::Error::new(other.io_kind(), other),
        }
    }
}

pub(crate) fn ensure_open(closed: bool) -> Result<(), CompressionError> {
    if closed {
        return Err(CompressionError::Closed);
    }
    Ok(())
}
