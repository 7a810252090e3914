//! telemetry/counters.rs
//! Cumulative counters kept by every stream processor.
//!
//! Summary: native calls, bytes in and out, completed streams, resets and
//! single-shot retries, accumulated over the lifetime of one native handle.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Deterministic counters collected while driving a native handle.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecCounters {
    pub native_calls: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub streams_completed: u64,
    pub resets: u64,
    pub retries: u64,
}

impl CodecCounters {
    /// Record one bounded native call.
    pub fn add_call(&mut self, consumed: usize, produced: usize) {
        self.native_calls += 1;
        self.bytes_in += consumed as u64;
        self.bytes_out += produced as u64;
    }

    pub fn add_completed(&mut self) {
        self.streams_completed += 1;
    }

    pub fn add_reset(&mut self) {
        self.resets += 1;
    }

    pub fn add_retry(&mut self) {
        self.retries += 1;
    }

    /// `bytes_out / bytes_in`, or 0.0 before any input was seen.
    pub fn ratio(&self) -> f64 {
        if self.bytes_in == 0 {
            return 0.0;
        }
        self.bytes_out as f64 / self.bytes_in as f64
    }

    pub fn merge(&mut self, other: &CodecCounters) {
        *self += *other;
    }
}

impl AddAssign for CodecCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.native_calls      += rhs.native_calls;
        self.bytes_in          += rhs.bytes_in;
        self.bytes_out         += rhs.bytes_out;
        self.streams_completed += rhs.streams_completed;
        self.resets            += rhs.resets;
        self.retries           += rhs.retries;
    }
}
