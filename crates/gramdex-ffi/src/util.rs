//! Pointer and C string helpers shared by the exported functions.
//!
//! Strings returned to C are allocated with `CString::into_raw` and must come
//! back through [`free_cstring`]. Null pointers are always tolerated.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::slice;

/// Allocate a C string for `s`, substituting `fallback` if `s` holds a NUL.
#[inline]
pub fn cstring_or_fallback(s: &str, fallback: &'static str) -> *mut c_char {
    CString::new(s)
        .or_else(|_| CString::new(fallback))
        .unwrap_or_default()
        .into_raw()
}

/// Release a string produced by [`cstring_or_fallback`].
///
/// # Safety
/// `ptr` must come from `CString::into_raw` or be null.
#[inline]
pub unsafe fn free_cstring(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// Borrow a NUL-terminated UTF-8 string.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated buffer that outlives `'a`.
pub unsafe fn borrow_str<'a>(ptr: *const c_char) -> Result<&'a str, &'static str> {
    if ptr.is_null() {
        return Err("null pointer");
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| "invalid UTF-8")
}

/// Copy an array of `len` C strings into owned Rust strings.
///
/// # Safety
/// `arr` must point to `len` string pointers, or be null when `len` is 0.
pub unsafe fn copy_string_array(arr: *const *const c_char, len: usize) -> Result<Vec<String>, String> {
    if len == 0 {
        return Ok(Vec::new());
    }
    if arr.is_null() {
        return Err("null sentence array".to_string());
    }

    let ptrs = unsafe { slice::from_raw_parts(arr, len) };
    let mut out = Vec::new();
    out.try_reserve_exact(len).map_err(|e| e.to_string())?;
    for (i, &ptr) in ptrs.iter().enumerate() {
        match unsafe { borrow_str(ptr) } {
            Ok(s) => out.push(s.to_owned()),
            Err(reason) => return Err(format!("{} at index {}", reason, i)),
        }
    }
    Ok(out)
}

/// Result structs carrying `success` and an owned `error_msg`.
pub trait FfiResult: Sized {
    /// Message used when the real one cannot be represented as a C string.
    const ERROR_FALLBACK: &'static str;

    /// Build the failed variant around an already allocated message.
    fn with_error(error_msg: *mut c_char) -> Self;

    #[inline]
    fn error(msg: &str) -> Self {
        Self::with_error(cstring_or_fallback(msg, Self::ERROR_FALLBACK))
    }
}
