//! compression/buffer.rs
//! Output buffer growth.

/// Make sure `buf` has room for at least `min_additional` more bytes.
///
/// Existing bytes are kept; `Vec`'s amortized doubling bounds the number of
/// reallocations for large outputs. Works on an empty, unallocated buffer.
pub fn grow(buf: &mut Vec<u8>, min_additional: usize) {
    if buf.capacity() - buf.len() >= min_additional {
        return;
    }
    buf.reserve(min_additional);
}

/// Spare capacity after the logical end of `buf`.
#[inline]
pub fn spare(buf: &Vec<u8>) -> usize {
    buf.capacity() - buf.len()
}
