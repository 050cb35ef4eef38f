use std::cell::Cell;

use proj_sys::PJ;

use crate::{Error, Result};

/// Owns one engine reference to a native object.
///
/// The pointer is destroyed exactly once: either through an explicit
/// [`RawObject::release`] or when the value drops. A release makes the handle
/// permanently empty, later accesses report [`Error::NullHandle`] instead of
/// touching freed memory.
pub(crate) struct RawObject {
    ptr: Cell<*mut PJ>,
}

impl RawObject {
    /// Takes ownership of a non null pointer returned by the engine.
    pub fn adopt(ptr: *mut PJ) -> Self {
        debug_assert!(!ptr.is_null());
        RawObject { ptr: Cell::new(ptr) }
    }

    pub fn get(&self) -> Result<*mut PJ> {
        let ptr = self.ptr.get();
        if ptr.is_null() { Err(Error::NullHandle) } else { Ok(ptr) }
    }

    /// The pointer value for identity probes and diagnostics, 0 after release.
    pub fn address(&self) -> usize {
        self.ptr.get() as usize
    }

    /// Destroys the native reference. Further calls are no-ops.
    pub fn release(&self) {
        let ptr = self.ptr.replace(std::ptr::null_mut());
        if !ptr.is_null() {
            unsafe { proj_sys::proj_destroy(ptr) };
        }
    }

    /// Moves ownership of the pointer out, leaving the handle empty.
    pub fn take(&self) -> *mut PJ {
        self.ptr.replace(std::ptr::null_mut())
    }
}

impl Drop for RawObject {
    fn drop(&mut self) {
        self.release();
    }
}
