// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Pistonite

use std::fmt;

/// What went wrong, independent of the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Working directory or executable path could not be retrieved
    IoError,
    /// A shared library failed to load
    LoadError,
    /// A symbol lookup in a loaded library failed
    SymbolNotFound,
    /// A loaded library failed to unload
    UnloadError,
    /// An input was empty or otherwise unusable
    InvalidArgument,
    /// A constructed path is longer than the configured maximum
    PathTooLong,
    /// A library name or file name has the wrong shape
    InvalidName,
    /// A handle was used against its contract (e.g. unlock without lock)
    Misuse,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IoError => "io error",
            Self::LoadError => "load error",
            Self::SymbolNotFound => "symbol not found",
            Self::UnloadError => "unload error",
            Self::InvalidArgument => "invalid argument",
            Self::PathTooLong => "path too long",
            Self::InvalidName => "invalid name",
            Self::Misuse => "misuse",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every fallible operation in this crate.
///
/// The message is what the C surface hands back to the caller as the
/// error string, so it must stand on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IoError, message)
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub(crate) fn invalid_name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidName, message)
    }

    pub(crate) fn misuse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Misuse, message)
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_message_only() {
        let e = Error::new(ErrorKind::LoadError, "Could not load library");
        assert_eq!(e.to_string(), "Could not load library");
        assert_eq!(e.kind(), ErrorKind::LoadError);
    }

    #[test]
    fn kind_names() {
        assert_eq!(ErrorKind::PathTooLong.to_string(), "path too long");
        assert_eq!(ErrorKind::SymbolNotFound.as_str(), "symbol not found");
    }
}
