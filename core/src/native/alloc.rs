//! native/alloc.rs
//! zalloc/zfree callbacks backed by Rust's global allocator.
//!
//! Each block is prefixed with its total size so `zfree` can rebuild the layout.

use std::alloc::{self, Layout};
use std::mem;
use std::ptr;

use libz_sys::{uInt, voidpf};

const ALIGN: usize = mem::align_of::<usize>();
const HEADER: usize = mem::size_of::<usize>();

fn align_up(size: usize, align: usize) -> Option<usize> {
    size.checked_add(align - 1).map(|padded| padded & !(align - 1))
}

pub(crate) extern "C" fn zalloc(_opaque: voidpf, items: uInt, item_size: uInt) -> voidpf {
    let size = match (items as usize)
        .checked_mul(item_size as usize)
        .and_then(|size| align_up(size, ALIGN))
        .and_then(|size| size.checked_add(HEADER))
    {
        Some(size) => size,
        None => return ptr::null_mut(),
    };

    let layout = match Layout::from_size_align(size, ALIGN) {
        Ok(layout) => layout,
        Err(_) => return ptr::null_mut(),
    };

    // SAFETY: `layout` has a non-zero size (at least HEADER bytes).
    unsafe {
        let base = alloc::alloc(layout) as *mut usize;
        if base.is_null() {
            return ptr::null_mut();
        }
        *base = size;
        base.add(1) as voidpf
    }
}

pub(crate) extern "C" fn zfree(_opaque: voidpf, address: voidpf) {
    if address.is_null() {
        return;
    }
    // SAFETY: `address` came from `zalloc`, so the size header sits right before it
    // and the layout it describes was valid when allocated.
    unsafe {
        let base = (address as *mut usize).sub(1);
        let size = *base;
        let layout = Layout::from_size_align_unchecked(size, ALIGN);
        alloc::dealloc(base as *mut u8, layout);
    }
}
