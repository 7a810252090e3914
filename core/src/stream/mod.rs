//! stream/mod.rs
//! `Read`/`Write` adapters around the codec façades.

pub mod buffer;
pub mod reader;
pub mod writer;

pub use buffer::StreamBuffer;
pub use reader::ZlibReader;
pub use writer::ZlibWriter;
