//! native/types.rs
//! Flush modes, per-call status and fault mapping for zlib return codes.

use std::os::raw::c_int;

use libz_sys as z;

use crate::types::NativeFault;

/// Per-call hint controlling how much output the codec must emit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlushMode {
    /// Emit everything so far, aligned to a byte boundary; the stream stays open.
    Sync,
    /// Terminate the stream (compress) or decode it in one go (decompress).
    Finish,
}

impl FlushMode {
    pub(crate) fn as_native(self) -> c_int {
        match self {
            FlushMode::Sync => z::Z_SYNC_FLUSH,
            FlushMode::Finish => z::Z_FINISH,
        }
    }
}

/// Non-fatal outcome of a single native call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NativeStatus {
    /// Progress was made and more may follow.
    Ok,
    /// The logical stream is fully terminated.
    StreamEnd,
    /// No progress was possible (`Z_BUF_ERROR`): more input or more output space is needed.
    Stalled,
}

/// What one bounded native call did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub status: NativeStatus,
    pub consumed: usize,
    pub produced: usize,
    /// Size of the output window that was offered.
    pub window: usize,
}

impl Step {
    /// The output window was used up completely.
    pub fn filled_window(&self) -> bool {
        self.produced == self.window
    }

    pub fn is_idle(&self) -> bool {
        self.consumed == 0 && self.produced == 0
    }
}

pub(crate) fn status_from_code(code: c_int) -> Result<NativeStatus, NativeFault> {
    match code {
        z::Z_OK => Ok(NativeStatus::Ok),
        z::Z_STREAM_END => Ok(NativeStatus::StreamEnd),
        z::Z_BUF_ERROR => Ok(NativeStatus::Stalled),
        other => Err(fault_from_code(other)),
    }
}

pub(crate) fn fault_from_code(code: c_int) -> NativeFault {
    match code {
        z::Z_STREAM_ERROR => NativeFault::InconsistentState,
        z::Z_DATA_ERROR => NativeFault::MalformedData,
        z::Z_MEM_ERROR => NativeFault::OutOfMemory,
        z::Z_VERSION_ERROR => NativeFault::VersionMismatch,
        z::Z_NEED_DICT => NativeFault::NeedDictionary,
        other => NativeFault::Unknown(other),
    }
}

/// Raw, already-validated parameters for `deflateInit2`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeflateParams {
    pub level: c_int,
    pub window_bits: c_int,
    pub mem_level: c_int,
    pub strategy: c_int,
}
