// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Pistonite

//! Platform abstraction shim: path helpers, a process-wide mutex and a
//! shared library loader, with a C-callable surface in [`ffi`].

mod config;
pub use config::PlatformConfig;
mod error;
pub use error::{Error, ErrorKind, Result};
pub mod fs;
pub use fs::Paths;
mod library;
pub use library::{SharedLibrary, Symbol};
mod mutex;
pub use mutex::{Mutex, MutexGuard};

pub mod ffi;
