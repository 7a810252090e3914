//! native/mod.rs
//! Boundary to the zlib codec engine.
//!
//! Everything that touches raw addresses lives in `handle.rs` and `alloc.rs`;
//! the rest of the crate only sees slices, `Vec`s and `Step` results.

mod alloc;
pub mod handle;
pub mod types;

pub use handle::NativeHandle;
pub use types::{DeflateParams, FlushMode, NativeStatus, Step};
