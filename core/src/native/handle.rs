//! native/handle.rs
//! Owned zlib stream. This is the only place that hands raw addresses to the codec.

use std::mem;
use std::os::raw::c_int;
use std::ptr;

use libz_sys as z;
use log::{debug, trace};

use crate::constants::MAX_NATIVE_WINDOW;
use crate::native::alloc::{zalloc, zfree};
use crate::native::types::{fault_from_code, status_from_code, DeflateParams, FlushMode, Step};
use crate::types::{CompressionError, Direction};

const STREAM_SIZE: c_int = mem::size_of::<z::z_stream>() as c_int;

/// One native codec stream, compress or decompress.
///
/// The `z_stream` is boxed because zlib keeps a pointer back to it after init.
/// `None` means the handle was closed; every operation checks it first.
pub struct NativeHandle {
    stream: Option<Box<z::z_stream>>,
    direction: Direction,
}

// SAFETY: the stream state is owned exclusively by this handle and zlib keeps no
// thread-local state; moving it to another thread is fine. It is not `Sync`.
unsafe impl Send for NativeHandle {}

impl NativeHandle {
    /// Initialize a compressing stream.
    pub fn deflate(params: DeflateParams) -> Result<Self, CompressionError> {
        let mut stream = Box::new(blank_stream());
        // SAFETY: `stream` is a fresh, boxed z_stream with valid allocator callbacks.
        let code = unsafe {
            z::deflateInit2_(
                &mut *stream,
                params.level,
                z::Z_DEFLATED,
                params.window_bits,
                params.mem_level,
                params.strategy,
                z::zlibVersion(),
                STREAM_SIZE,
            )
        };
        Self::from_init(stream, Direction::Compress, code)
    }

    /// Initialize a decompressing stream.
    pub fn inflate(window_bits: c_int) -> Result<Self, CompressionError> {
        let mut stream = Box::new(blank_stream());
        // SAFETY: as in `deflate`.
        let code = unsafe { z::inflateInit2_(&mut *stream, window_bits, z::zlibVersion(), STREAM_SIZE) };
        Self::from_init(stream, Direction::Decompress, code)
    }

    fn from_init(
        stream: Box<z::z_stream>,
        direction: Direction,
        code: c_int,
    ) -> Result<Self, CompressionError> {
        if code != z::Z_OK {
            // zlib frees its own state when init fails
            return Err(CompressionError::Init {
                direction,
                fault: fault_from_code(code),
            });
        }
        debug!("{direction} stream initialized");
        Ok(Self {
            stream: Some(stream),
            direction,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// One bounded native call.
    ///
    /// The input window is `input` and the output window is the spare capacity of
    /// `output`; both are clamped to the codec's 32-bit lengths. Produced bytes are
    /// appended to `output`. A native failure leaves `output` unchanged.
    pub fn process(
        &mut self,
        input: &[u8],
        output: &mut Vec<u8>,
        flush: FlushMode,
    ) -> Result<Step, CompressionError> {
        let direction = self.direction;
        let stream = self.stream.as_deref_mut().ok_or(CompressionError::Closed)?;

        let avail_in = input.len().min(MAX_NATIVE_WINDOW);
        let spare = output.spare_capacity_mut();
        let window = spare.len().min(MAX_NATIVE_WINDOW);

        // An empty slice still yields a non-null, aligned pointer; zlib never reads it.
        stream.next_in = input.as_ptr() as *mut z::Bytef;
        stream.avail_in = avail_in as z::uInt;
        stream.next_out = spare.as_mut_ptr().cast::<z::Bytef>();
        stream.avail_out = window as z::uInt;

        // SAFETY: the windows point into live slices that outlive the call. zlib reads
        // at most `avail_in` bytes and writes at most `avail_out` bytes, and the stream
        // was initialized for `direction`.
        let code = unsafe {
            match direction {
                Direction::Compress => z::deflate(stream, flush.as_native()),
                Direction::Decompress => z::inflate(stream, flush.as_native()),
            }
        };

        let consumed = avail_in - stream.avail_in as usize;
        let produced = window - stream.avail_out as usize;

        stream.next_in = ptr::null_mut();
        stream.avail_in = 0;
        stream.next_out = ptr::null_mut();
        stream.avail_out = 0;

        let status =
            status_from_code(code).map_err(|fault| CompressionError::Process { direction, fault })?;

        // SAFETY: zlib initialized exactly `produced` bytes at the start of the spare
        // capacity, and `produced <= window <= capacity - len`.
        unsafe { output.set_len(output.len() + produced) };

        trace!(
            "{direction} call flush={flush:?} status={status:?} in={consumed}/{avail_in} out={produced}/{window}"
        );
        Ok(Step {
            status,
            consumed,
            produced,
            window,
        })
    }

    /// Clear the algorithm state for a new logical stream, keeping the allocation.
    pub fn reset(&mut self) -> Result<(), CompressionError> {
        let direction = self.direction;
        let stream = self.stream.as_deref_mut().ok_or(CompressionError::Closed)?;
        // SAFETY: `stream` was initialized for `direction` and is not closed.
        let code = unsafe {
            match direction {
                Direction::Compress => z::deflateReset(stream),
                Direction::Decompress => z::inflateReset(stream),
            }
        };
        if code != z::Z_OK {
            return Err(CompressionError::Reset {
                fault: fault_from_code(code),
                consumed: 0,
                output: Vec::new(),
            });
        }
        debug!("{direction} stream reset");
        Ok(())
    }

    /// Release the native state. A second call fails with `Closed`.
    pub fn close(&mut self) -> Result<(), CompressionError> {
        let mut stream = self.stream.take().ok_or(CompressionError::Closed)?;
        let code = end_stream(&mut stream, self.direction);
        debug!("{} stream closed", self.direction);
        if code != z::Z_OK {
            return Err(CompressionError::Close {
                fault: fault_from_code(code),
                output: Vec::new(),
            });
        }
        Ok(())
    }
}

impl Drop for NativeHandle {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let code = end_stream(&mut stream, self.direction);
            debug!("{} stream released on drop (status {code})", self.direction);
        }
    }
}

fn end_stream(stream: &mut z::z_stream, direction: Direction) -> c_int {
    // SAFETY: callers pass a stream taken out of an open handle, so it was initialized
    // for `direction` and is ended exactly once.
    unsafe {
        match direction {
            Direction::Compress => z::deflateEnd(stream),
            Direction::Decompress => z::inflateEnd(stream),
        }
    }
}

fn blank_stream() -> z::z_stream {
    z::z_stream {
        next_in: ptr::null_mut(),
        avail_in: 0,
        total_in: 0,
        next_out: ptr::null_mut(),
        avail_out: 0,
        total_out: 0,
        msg: ptr::null_mut(),
        state: ptr::null_mut(),
        zalloc,
        zfree,
        opaque: ptr::null_mut(),
        data_type: 0,
        adler: 0,
        reserved: 0,
    }
}
