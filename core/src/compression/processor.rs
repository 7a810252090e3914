//! compression/processor.rs
//! Drive loop turning one bounded native call into "process this whole input"
//! or "process until the predicate says stop".
//!
//! Design notes:
//! - Growable mode ensures a window increment of spare capacity before every call.
//! - Fixed mode reserves the capacity once and never grows; running out of room is
//!   reported as `ProcessOutcome::Retry`, not as an error.
//! - A completed session rearms the handle; a failed rearm still reports how much
//!   was consumed, and the produced bytes stay in the caller's buffer.

use log::{debug, warn};

use crate::compression::buffer::{grow, spare};
use crate::constants::OUTPUT_WINDOW_INCREMENT;
use crate::native::{FlushMode, NativeHandle, NativeStatus, Step};
use crate::telemetry::CodecCounters;
use crate::types::{ensure_open, CompressionError, Direction, NativeFault};

/// Progress of one drive loop. Handed to the continuation predicate before every call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub input_len: usize,
    /// Bytes of input consumed so far; never exceeds `input_len`.
    pub input_offset: usize,
    /// Logical length of the output buffer.
    pub output_offset: usize,
    pub completed: bool,
    pub calls: usize,
    /// The last call used up its whole output window, so more output may be pending.
    pub output_filled: bool,
}

impl Session {
    fn new(input_len: usize, output_offset: usize) -> Self {
        Self {
            input_len,
            output_offset,
            ..Self::default()
        }
    }

    pub fn input_remaining(&self) -> bool {
        self.input_offset < self.input_len
    }

    fn apply(&mut self, step: &Step, output_len: usize) {
        self.calls += 1;
        self.input_offset += step.consumed;
        self.output_offset = output_len;
        self.output_filled = step.filled_window();
        if step.status == NativeStatus::StreamEnd {
            self.completed = true;
        }
    }
}

/// Result of a drive loop that ran to its stopping condition.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Processed {
    /// Input bytes consumed. Less than the input length means only a prefix was used.
    pub consumed: usize,
    /// Bytes appended to the output buffer.
    pub produced: usize,
    /// The end-of-stream marker was reached (decompress) or written (compress).
    pub completed: bool,
}

impl Processed {
    /// Fail unless the end-of-stream marker was reached.
    ///
    /// A finish-mode loop can stop on `Stalled` without completing; that must
    /// not be reported as a terminated stream.
    pub fn ensure_completed(self, direction: Direction) -> Result<Self, CompressionError> {
        if self.completed {
            return Ok(self);
        }
        Err(CompressionError::Process {
            direction,
            fault: NativeFault::InconsistentState,
        })
    }
}

/// Outcome of a fixed-capacity drive loop. Failures travel in the `Err` arm.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    Done(Processed),
    /// The output did not fit; start over with a fresh stream and this much room.
    Retry { suggested_capacity: usize },
}

/// Owns one native handle and drives it call by call.
pub struct StreamProcessor {
    handle: NativeHandle,
    counters: CodecCounters,
}

impl StreamProcessor {
    pub fn new(handle: NativeHandle) -> Self {
        Self {
            handle,
            counters: CodecCounters::default(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.handle.direction()
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    pub fn counters(&self) -> CodecCounters {
        self.counters
    }

    /// Drive the handle with a growable output buffer until `keep_going` says stop.
    pub fn process<P>(
        &mut self,
        input: &[u8],
        output: &mut Vec<u8>,
        flush: FlushMode,
        keep_going: P,
    ) -> Result<Processed, CompressionError>
    where
        P: FnMut(&Session) -> bool,
    {
        ensure_open(self.is_closed())?;
        let start = output.len();
        let session = self.run(input, output, flush, None, keep_going)?;
        self.settle(session, start)
    }

    /// Drive the handle once with exactly `capacity` bytes of output room.
    pub fn process_once<P>(
        &mut self,
        input: &[u8],
        output: &mut Vec<u8>,
        flush: FlushMode,
        capacity: usize,
        keep_going: P,
    ) -> Result<ProcessOutcome, CompressionError>
    where
        P: FnMut(&Session) -> bool,
    {
        ensure_open(self.is_closed())?;
        let start = output.len();
        output.reserve_exact(capacity);
        let session = self.run(input, output, flush, Some(capacity), keep_going)?;

        if !session.completed {
            if session.output_filled || spare(output) == 0 {
                let suggested_capacity = capacity.saturating_mul(2).max(OUTPUT_WINDOW_INCREMENT);
                debug!(
                    "{} output of {capacity} bytes too small, suggesting {suggested_capacity}",
                    self.direction()
                );
                return Ok(ProcessOutcome::Retry { suggested_capacity });
            }
            return Err(CompressionError::Process {
                direction: self.direction(),
                fault: NativeFault::Truncated,
            });
        }

        self.settle(session, start).map(ProcessOutcome::Done)
    }

    fn run<P>(
        &mut self,
        input: &[u8],
        output: &mut Vec<u8>,
        flush: FlushMode,
        fixed: Option<usize>,
        mut keep_going: P,
    ) -> Result<Session, CompressionError>
    where
        P: FnMut(&Session) -> bool,
    {
        let mut session = Session::new(input.len(), output.len());

        while keep_going(&session) {
            match fixed {
                None => grow(output, OUTPUT_WINDOW_INCREMENT),
                Some(_) if spare(output) == 0 => break,
                Some(_) => {}
            }

            let step = self.handle.process(&input[session.input_offset..], output, flush)?;
            self.counters.add_call(step.consumed, step.produced);
            session.apply(&step, output.len());

            match step.status {
                NativeStatus::StreamEnd => {}
                NativeStatus::Ok if step.is_idle() => break,
                NativeStatus::Ok => {}
                NativeStatus::Stalled => break,
            }
        }

        Ok(session)
    }

    fn settle(&mut self, session: Session, start: usize) -> Result<Processed, CompressionError> {
        let processed = Processed {
            consumed: session.input_offset,
            produced: session.output_offset - start,
            completed: session.completed,
        };

        if session.completed {
            self.counters.add_completed();
            if let Err(err) = self.reset() {
                warn!(
                    "{} stream finished ({} bytes out) but could not be rearmed: {err}",
                    self.direction(),
                    processed.produced
                );
                return Err(match err {
                    CompressionError::Reset { fault, .. } => CompressionError::Reset {
                        fault,
                        consumed: processed.consumed,
                        output: Vec::new(),
                    },
                    other => other,
                });
            }
        }

        Ok(processed)
    }

    /// Rearm the handle for a new logical stream.
    pub fn reset(&mut self) -> Result<(), CompressionError> {
        ensure_open(self.is_closed())?;
        self.handle.reset()?;
        self.counters.add_reset();
        Ok(())
    }

    pub fn record_retry(&mut self) {
        self.counters.add_retry();
    }

    /// Release the native handle. A second call fails with `Closed`.
    pub fn close(&mut self) -> Result<(), CompressionError> {
        self.handle.close()
    }
}
