use std::ffi::{CStr, CString};

use proj_sys::{PJ, PJ_CONTEXT, PROJ_STRING_LIST};

use crate::{Error, Result};

pub(crate) mod experimental;

/// Version information of the linked engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineVersion {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
    pub release: String,
}

impl std::fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The version of the PROJ engine this crate is linked against.
pub fn engine_version() -> EngineVersion {
    let info = unsafe { proj_sys::proj_info() };
    EngineVersion {
        major: info.major,
        minor: info.minor,
        patch: info.patch,
        release: opt_string(info.release).unwrap_or_default(),
    }
}

pub(crate) fn raw_string_to_string(raw_ptr: *const std::os::raw::c_char) -> String {
    let c_str = unsafe { CStr::from_ptr(raw_ptr) };
    c_str.to_string_lossy().into_owned()
}

/// Copies an engine owned string, `None` for null or empty.
pub(crate) fn opt_string(raw_ptr: *const std::os::raw::c_char) -> Option<String> {
    if raw_ptr.is_null() {
        return None;
    }

    let s = raw_string_to_string(raw_ptr);
    if s.is_empty() { None } else { Some(s) }
}

pub(crate) fn last_error_message(ctx: *mut PJ_CONTEXT) -> String {
    let errno = unsafe { proj_sys::proj_context_errno(ctx) };
    if errno == 0 {
        return String::from("no detail reported by the engine");
    }

    let msg = unsafe { proj_sys::proj_context_errno_string(ctx, errno) };
    opt_string(msg).unwrap_or_else(|| format!("engine error code {errno}"))
}

pub(crate) fn check_pointer(ctx: *mut PJ_CONTEXT, ptr: *mut PJ, method_name: &'static str) -> Result<*mut PJ> {
    if ptr.is_null() {
        Err(Error::Runtime(format!("{}: {}", method_name, last_error_message(ctx))))
    } else {
        Ok(ptr)
    }
}

/// Consumes an engine string list, copying the entries.
pub(crate) fn string_list_to_vec(list: PROJ_STRING_LIST) -> Vec<String> {
    let mut result = Vec::new();
    if list.is_null() {
        return result;
    }

    unsafe {
        let mut entry = list;
        while !(*entry).is_null() {
            result.push(raw_string_to_string(*entry));
            entry = entry.add(1);
        }
        proj_sys::proj_string_list_destroy(list);
    }

    result
}

/// Null terminated array of C strings for the engine calls that take string lists.
pub(crate) struct StringList {
    _storage: Vec<CString>,
    ptrs: Vec<*const std::os::raw::c_char>,
}

impl StringList {
    pub fn new(entries: &[String]) -> Result<Self> {
        let storage = entries
            .iter()
            .map(|entry| CString::new(entry.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut ptrs: Vec<*const std::os::raw::c_char> = storage.iter().map(|s| s.as_ptr()).collect();
        ptrs.push(std::ptr::null());
        Ok(StringList { _storage: storage, ptrs })
    }

    pub fn as_ptr(&self) -> *const *const std::os::raw::c_char {
        self.ptrs.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_of_linked_engine() {
        let version = engine_version();
        assert!(version.major >= 8);
        assert!(!version.release.is_empty());
        assert_eq!(version.to_string(), format!("{}.{}.{}", version.major, version.minor, version.patch));
    }

    #[test]
    fn string_list_is_null_terminated() {
        let list = StringList::new(&[String::from("MULTILINE=NO")]).expect("valid option");
        unsafe {
            assert!(!(*list.as_ptr()).is_null());
            assert!((*list.as_ptr().add(1)).is_null());
        }
    }
}
