// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Pistonite

use std::ffi::{CString, c_void};
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::{Error, ErrorKind, Result};

static LOAD_FAILED: &str = "Could not load library";
static RESOLVE_FAILED: &str = "Could not load library function";
static UNLOAD_FAILED: &str = "Error unloading library";

/// A dynamic library loaded into the process.
///
/// The library stays loaded until [`SharedLibrary::unload`] consumes it,
/// or until it is dropped.
#[derive(Debug)]
pub struct SharedLibrary {
    library: libloading::Library,
    path: String,
}

impl SharedLibrary {
    /// Load the library at `path`.
    ///
    /// The OS search rules apply when `path` is a bare file name.
    pub fn load(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::invalid_argument("library path is empty"));
        }
        cu::debug!("loading library '{path}'");
        // SAFETY: loading runs the library's initializers. The caller picks
        // the library and is trusting its initialization code, same as the
        // native loader would.
        let library = unsafe { libloading::Library::new(path) }.map_err(|e| {
            Error::new(
                ErrorKind::LoadError,
                format!("{LOAD_FAILED} '{path}': {e}"),
            )
        })?;
        Ok(Self {
            library,
            path: path.to_string(),
        })
    }

    /// Path the library was loaded from, as given to [`SharedLibrary::load`]
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Look up the address of an exported symbol
    pub fn resolve(&self, name: &str) -> Result<Symbol<'_>> {
        if name.is_empty() {
            return Err(Error::invalid_argument("symbol name is empty"));
        }
        let c_name = CString::new(name).map_err(|_| {
            Error::invalid_argument(format!("symbol name '{name}' contains a NUL byte"))
        })?;
        let not_found = |detail: &dyn std::fmt::Display| {
            Error::new(
                ErrorKind::SymbolNotFound,
                format!("{RESOLVE_FAILED} '{name}' in '{}': {detail}", self.path),
            )
        };
        // SAFETY: the symbol is read as a raw address and never called or
        // dereferenced here. Its lifetime is tied to `self` through `Symbol`.
        let address = unsafe {
            self.library
                .get::<*mut c_void>(c_name.as_bytes_with_nul())
                .map(|symbol| *symbol)
        }
        .map_err(|e| not_found(&e))?;
        let Some(address) = NonNull::new(address) else {
            return Err(not_found(&"symbol resolved to null"));
        };
        cu::trace!("resolved '{name}' at {address:p}");
        Ok(Symbol {
            address,
            _library: PhantomData,
        })
    }

    /// Unload the library. The handle cannot be used afterwards
    pub fn unload(self) -> Result<()> {
        let Self { library, path } = self;
        cu::debug!("unloading library '{path}'");
        library.close().map_err(|e| {
            Error::new(
                ErrorKind::UnloadError,
                format!("{UNLOAD_FAILED} '{path}': {e}"),
            )
        })
    }
}

/// Address of a symbol, valid while its library is loaded
#[derive(Debug, Clone, Copy)]
pub struct Symbol<'lib> {
    address: NonNull<c_void>,
    _library: PhantomData<&'lib SharedLibrary>,
}

impl Symbol<'_> {
    #[inline]
    pub fn as_ptr(&self) -> *mut c_void {
        self.address.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_are_rejected() {
        let e = SharedLibrary::load("").unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn missing_library_fails_to_load() {
        let e = SharedLibrary::load("/definitely/not/here/libnothing.so").unwrap_err();
        assert_eq!(e.kind(), ErrorKind::LoadError);
        assert!(e.message().starts_with("Could not load library"));
    }
}
