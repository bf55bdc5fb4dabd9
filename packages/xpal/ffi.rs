// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Pistonite

//! C-callable surface.
//!
//! Every `char*` returned from here is owned by the caller and must be
//! released with [`xpal_free_string`]. Handles are opaque pointers that are
//! released with their matching destroy/unload function exactly once.
//! Null inputs are rejected instead of dereferenced.

use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::ptr;

use crate::{Error, Mutex, Result, SharedLibrary, fs};

/// Copy a NUL-terminated string into a caller-owned allocation
#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_duplicate_string(src: *const c_char) -> *mut c_char {
    if src.is_null() {
        return ptr::null_mut();
    }
    // SAFETY: caller passes a valid NUL-terminated string
    let src = unsafe { CStr::from_ptr(src) };
    src.to_owned().into_raw()
}

/// Release a string returned by any function in this library
#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    // SAFETY: `s` came from `CString::into_raw` in this library and is
    // released exactly once
    drop(unsafe { CString::from_raw(s) });
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_file_exists(path: *const c_char) -> c_int {
    // SAFETY: forwarded from caller
    match unsafe { str_arg(path, "path") } {
        Ok(path) => fs::file_exists(path) as c_int,
        Err(_) => 0,
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_make_path_absolute(path: *const c_char) -> *mut c_char {
    // SAFETY: forwarded from caller
    let path = unsafe { str_arg(path, "path") };
    owned_string(path.and_then(fs::make_path_absolute))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_make_library_filename(name: *const c_char) -> *mut c_char {
    // SAFETY: forwarded from caller
    let name = unsafe { str_arg(name, "library name") };
    owned_string(name.and_then(fs::make_library_filename))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_make_library_name(path: *const c_char) -> *mut c_char {
    // SAFETY: forwarded from caller
    let path = unsafe { str_arg(path, "path") };
    owned_string(path.and_then(fs::make_library_name))
}

#[unsafe(no_mangle)]
pub extern "C" fn xpal_config_file_for_application() -> *mut c_char {
    owned_string(fs::config_file_for_application())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_combine_path_with_file(
    path: *const c_char,
    filename: *const c_char,
) -> *mut c_char {
    // SAFETY: forwarded from caller
    let path = unsafe { str_arg(path, "path") };
    // SAFETY: forwarded from caller
    let filename = unsafe { str_arg(filename, "file name") };
    let combined = path.and_then(|path| fs::combine_path_with_file(path, filename?));
    owned_string(combined)
}

#[unsafe(no_mangle)]
pub extern "C" fn xpal_create_mutex() -> *mut c_void {
    Box::into_raw(Box::new(Mutex::new())).cast()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_lock_mutex(mutex: *mut c_void) {
    // SAFETY: forwarded from caller
    let Some(mutex) = (unsafe { mutex_arg(mutex) }) else {
        cu::warn!("xpal_lock_mutex called with a null handle");
        return;
    };
    if let Err(e) = mutex.lock() {
        cu::warn!("xpal_lock_mutex: {e}");
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_unlock_mutex(mutex: *mut c_void) {
    // SAFETY: forwarded from caller
    let Some(mutex) = (unsafe { mutex_arg(mutex) }) else {
        cu::warn!("xpal_unlock_mutex called with a null handle");
        return;
    };
    if let Err(e) = mutex.unlock() {
        cu::warn!("xpal_unlock_mutex: {e}");
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_destroy_mutex(mutex: *mut c_void) {
    if mutex.is_null() {
        return;
    }
    // SAFETY: the handle came from `xpal_create_mutex` and is destroyed once
    let mutex = unsafe { *Box::from_raw(mutex.cast::<Mutex>()) };
    mutex.destroy();
}

/// Load a library. Exactly one of the returned handle and `*error_msg` is null
#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_load_shared_library(
    full_path: *const c_char,
    error_msg: *mut *mut c_char,
) -> *mut c_void {
    // SAFETY: forwarded from caller
    let loaded = unsafe { str_arg(full_path, "library path") }.and_then(SharedLibrary::load);
    let handle = match loaded {
        Ok(library) => Box::into_raw(Box::new(library)).cast(),
        Err(e) => {
            // SAFETY: forwarded from caller
            unsafe { set_error(error_msg, Some(e)) };
            return ptr::null_mut();
        }
    };
    // SAFETY: forwarded from caller
    unsafe { set_error(error_msg, None) };
    handle
}

/// Resolve a symbol. Exactly one of the returned address and `*error_msg` is null
#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_resolve_symbol(
    library: *mut c_void,
    symbol: *const c_char,
    error_msg: *mut *mut c_char,
) -> *mut c_void {
    // SAFETY: forwarded from caller
    let resolved = unsafe { library_arg(library) }.and_then(|library| {
        // SAFETY: forwarded from caller
        let name = unsafe { str_arg(symbol, "symbol name") }?;
        library.resolve(name).map(|s| s.as_ptr())
    });
    match resolved {
        Ok(address) => {
            // SAFETY: forwarded from caller
            unsafe { set_error(error_msg, None) };
            address
        }
        Err(e) => {
            // SAFETY: forwarded from caller
            unsafe { set_error(error_msg, Some(e)) };
            ptr::null_mut()
        }
    }
}

/// Unload a library. `*error_msg` is null on success
#[unsafe(no_mangle)]
pub unsafe extern "C" fn xpal_unload_shared_library(
    library: *mut c_void,
    error_msg: *mut *mut c_char,
) {
    let result = if library.is_null() {
        Err(Error::invalid_argument("library handle is null"))
    } else {
        // SAFETY: the handle came from `xpal_load_shared_library` and is
        // unloaded once
        let library = unsafe { *Box::from_raw(library.cast::<SharedLibrary>()) };
        library.unload()
    };
    // SAFETY: forwarded from caller
    unsafe { set_error(error_msg, result.err()) };
}

/// Read a string argument.
///
/// # Safety
/// `p` must be null or a valid NUL-terminated string that outlives `'a`
unsafe fn str_arg<'a>(p: *const c_char, what: &str) -> Result<&'a str> {
    if p.is_null() {
        return Err(Error::invalid_argument(format!("{what} is null")));
    }
    // SAFETY: guaranteed by caller
    let s = unsafe { CStr::from_ptr(p) };
    s.to_str()
        .map_err(|_| Error::invalid_argument(format!("{what} is not utf-8")))
}

/// # Safety
/// `p` must be null or a live handle from `xpal_create_mutex`
unsafe fn mutex_arg<'a>(p: *mut c_void) -> Option<&'a Mutex> {
    // SAFETY: guaranteed by caller
    unsafe { p.cast::<Mutex>().as_ref() }
}

/// # Safety
/// `p` must be null or a live handle from `xpal_load_shared_library`
unsafe fn library_arg<'a>(p: *mut c_void) -> Result<&'a SharedLibrary> {
    // SAFETY: guaranteed by caller
    unsafe { p.cast::<SharedLibrary>().as_ref() }
        .ok_or_else(|| Error::invalid_argument("library handle is null"))
}

fn owned_string(result: Result<String>) -> *mut c_char {
    match result.and_then(to_c_string) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            cu::debug!("returning null: {e}");
            ptr::null_mut()
        }
    }
}

fn to_c_string(s: String) -> Result<CString> {
    CString::new(s).map_err(|_| Error::invalid_argument("string contains a NUL byte"))
}

/// # Safety
/// `out` must be null or valid for a pointer write
unsafe fn set_error(out: *mut *mut c_char, error: Option<Error>) {
    if out.is_null() {
        return;
    }
    let message = match error {
        None => ptr::null_mut(),
        Some(e) => match CString::new(e.message().replace('\0', " ")) {
            Ok(s) => s.into_raw(),
            Err(_) => ptr::null_mut(),
        },
    };
    // SAFETY: guaranteed by caller
    unsafe { out.write(message) };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(s: *mut c_char) -> Option<String> {
        if s.is_null() {
            return None;
        }
        let out = unsafe { CStr::from_ptr(s) }.to_str().unwrap().to_string();
        unsafe { xpal_free_string(s) };
        Some(out)
    }

    #[test]
    fn duplicate_and_free() {
        let copy = unsafe { xpal_duplicate_string(c"hello".as_ptr()) };
        assert_eq!(take(copy).as_deref(), Some("hello"));
        assert!(unsafe { xpal_duplicate_string(ptr::null()) }.is_null());
        unsafe { xpal_free_string(ptr::null_mut()) };
    }

    #[test]
    fn combine_returns_owned_string() {
        let sep = crate::PlatformConfig::native().separator;
        let out = unsafe { xpal_combine_path_with_file(c"dir".as_ptr(), c"c.txt".as_ptr()) };
        assert_eq!(take(out), Some(format!("dir{sep}c.txt")));
        let out = unsafe { xpal_combine_path_with_file(c"dir".as_ptr(), ptr::null()) };
        assert!(out.is_null());
    }

    #[test]
    fn library_name_without_extension_is_null() {
        let out = unsafe { xpal_make_library_name(c"noext".as_ptr()) };
        assert!(out.is_null());
        let out = unsafe { xpal_make_library_name(c"/a/b/foo.so".as_ptr()) };
        assert_eq!(take(out).as_deref(), Some("foo"));
    }

    #[test]
    fn null_path_does_not_exist() {
        assert_eq!(unsafe { xpal_file_exists(ptr::null()) }, 0);
        assert_eq!(unsafe { xpal_file_exists(c".".as_ptr()) }, 1);
    }

    #[test]
    fn mutex_round_trip() {
        let mutex = xpal_create_mutex();
        assert!(!mutex.is_null());
        unsafe {
            xpal_lock_mutex(mutex);
            xpal_unlock_mutex(mutex);
            xpal_destroy_mutex(mutex);
            xpal_lock_mutex(ptr::null_mut());
            xpal_destroy_mutex(ptr::null_mut());
        }
    }

    #[test]
    fn path_functions_return_owned_strings() {
        let out = unsafe { xpal_make_path_absolute(c"foo.txt".as_ptr()) };
        assert_eq!(take(out), Some(fs::make_path_absolute("foo.txt").unwrap()));
        let suffix = crate::PlatformConfig::native().library_suffix;
        let out = unsafe { xpal_make_library_filename(c"plugin".as_ptr()) };
        assert_eq!(take(out), Some(format!("plugin{suffix}")));
        let out = xpal_config_file_for_application();
        assert_eq!(take(out), Some(fs::config_file_for_application().unwrap()));
    }

    #[test]
    fn path_functions_reject_null_and_empty() {
        assert!(unsafe { xpal_make_path_absolute(ptr::null()) }.is_null());
        assert!(unsafe { xpal_make_path_absolute(c"".as_ptr()) }.is_null());
        assert!(unsafe { xpal_make_library_filename(ptr::null()) }.is_null());
        assert!(unsafe { xpal_make_library_filename(c"".as_ptr()) }.is_null());
        assert!(unsafe { xpal_make_library_name(ptr::null()) }.is_null());
        assert!(unsafe { xpal_combine_path_with_file(ptr::null(), c"c.txt".as_ptr()) }.is_null());
    }

    #[test]
    fn unlock_misuse_keeps_mutex_usable() {
        let handle = xpal_create_mutex();
        unsafe {
            // not locked yet: logged, nothing changes
            xpal_unlock_mutex(handle);
            let mutex = mutex_arg(handle).unwrap();
            assert!(!mutex.is_locked());

            xpal_lock_mutex(handle);
            assert!(mutex.is_locked());
            // relocking from the owner is rejected instead of deadlocking
            xpal_lock_mutex(handle);
            assert!(mutex.is_locked());
            xpal_unlock_mutex(handle);
            assert!(!mutex.is_locked());

            xpal_unlock_mutex(ptr::null_mut());
            xpal_destroy_mutex(handle);
        }
    }

    #[test]
    fn load_failure_sets_message_only() {
        let mut error = ptr::null_mut();
        let handle =
            unsafe { xpal_load_shared_library(c"/no/such/library.so".as_ptr(), &mut error) };
        assert!(handle.is_null());
        let message = take(error).unwrap();
        assert!(message.starts_with("Could not load library"));
    }

    #[test]
    fn null_handles_report_errors() {
        let mut error = ptr::null_mut();
        let address =
            unsafe { xpal_resolve_symbol(ptr::null_mut(), c"malloc".as_ptr(), &mut error) };
        assert!(address.is_null());
        assert!(take(error).is_some());

        let mut error = ptr::null_mut();
        unsafe { xpal_unload_shared_library(ptr::null_mut(), &mut error) };
        assert!(take(error).is_some());
    }
}
