//! telemetry/mod.rs
//! Per-handle counters, readable from every façade and adapter.

pub mod counters;

pub use counters::*;
