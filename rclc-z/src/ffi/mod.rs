//! C ABI over the facade.
//!
//! Handles are opaque to C: they are obtained from the `*_alloc` helpers
//! and passed back by pointer. A null pointer where a handle or string is
//! required yields `RCL_RET_INVALID_ARGUMENT` before anything is touched.

#![allow(improper_ctypes_definitions)]
#![allow(non_upper_case_globals)]

pub mod init;
pub mod node;
pub mod publisher;
pub mod qos;
pub mod subscription;
pub mod timer;

use std::ffi::{CStr, c_char, c_int};

use crate::ret::{RclError, Result, RetCode, rcl_ret_t};

#[unsafe(no_mangle)]
pub static rcl_ret_ok: rcl_ret_t = RetCode::Ok as rcl_ret_t;
#[unsafe(no_mangle)]
pub static rcl_ret_error: rcl_ret_t = RetCode::Error as rcl_ret_t;
#[unsafe(no_mangle)]
pub static rcl_ret_timeout: rcl_ret_t = RetCode::Timeout as rcl_ret_t;
#[unsafe(no_mangle)]
pub static rcl_ret_unsupported: rcl_ret_t = RetCode::Unsupported as rcl_ret_t;

pub(crate) trait BorrowPtr<'a, T> {
    /// # Safety
    /// The pointer must be null or point to a live `T`.
    unsafe fn borrow_ptr(self, what: &str) -> Result<&'a T>;
}

pub(crate) trait BorrowMutPtr<'a, T> {
    /// # Safety
    /// The pointer must be null or point to a live `T` with no other borrow.
    unsafe fn borrow_mut_ptr(self, what: &str) -> Result<&'a mut T>;

    /// # Safety
    /// The pointer must be null or come from `Box::into_raw`.
    unsafe fn own_ptr(self, what: &str) -> Result<Box<T>>;
}

fn null_pointer(what: &str) -> RclError {
    RclError::invalid_argument(format!("{what} is null"))
}

impl<'a, T> BorrowPtr<'a, T> for *const T {
    unsafe fn borrow_ptr(self, what: &str) -> Result<&'a T> {
        unsafe { self.as_ref() }.ok_or_else(|| null_pointer(what))
    }
}

impl<'a, T> BorrowPtr<'a, T> for *mut T {
    unsafe fn borrow_ptr(self, what: &str) -> Result<&'a T> {
        unsafe { self.cast_const().borrow_ptr(what) }
    }
}

impl<'a, T> BorrowMutPtr<'a, T> for *mut T {
    unsafe fn borrow_mut_ptr(self, what: &str) -> Result<&'a mut T> {
        unsafe { self.as_mut() }.ok_or_else(|| null_pointer(what))
    }

    unsafe fn own_ptr(self, what: &str) -> Result<Box<T>> {
        if self.is_null() {
            return Err(null_pointer(what));
        }
        Ok(unsafe { Box::from_raw(self) })
    }
}

/// # Safety
/// `ptr` must be null or a valid nul-terminated string.
pub(crate) unsafe fn cstr_to_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(null_pointer(what));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| RclError::invalid_argument(format!("{what} is not valid UTF-8")))
}

/// # Safety
/// `argv` must be null or hold `argc` string pointers.
pub(crate) unsafe fn args_from_argv(argc: c_int, argv: *const *const c_char) -> Result<Vec<String>> {
    if argc < 0 {
        return Err(RclError::invalid_argument(format!("argc is negative: {argc}")));
    }
    if argc == 0 {
        return Ok(Vec::new());
    }
    if argv.is_null() {
        return Err(null_pointer("argv"));
    }
    (0..argc as usize)
        .map(|i| unsafe { cstr_to_str(*argv.add(i), "argv element") }.map(str::to_string))
        .collect()
}

/// Hand a heap value to C.
pub(crate) fn into_raw<T>(value: Option<Box<T>>) -> *mut T {
    value.map_or(std::ptr::null_mut(), Box::into_raw)
}
