// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Pistonite

use std::path::{Path, PathBuf};

use crate::{Error, ErrorKind, PlatformConfig, Result};

/// Path helpers bound to one [`PlatformConfig`].
///
/// Every returned string is freshly allocated and owned by the caller.
/// Constructed paths are checked against `max_path`.
#[derive(Debug, Clone, Default)]
pub struct Paths {
    config: PlatformConfig,
}

impl Paths {
    pub fn new(config: PlatformConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Check if a file or directory exists at `path`
    pub fn file_exists(&self, path: &str) -> bool {
        !path.is_empty() && Path::new(path).exists()
    }

    /// Prefix a relative path with the current working directory.
    ///
    /// A path is considered absolute only if its first character is a
    /// separator. Anything else, including `C:\...`, is joined onto the
    /// working directory.
    pub fn make_path_absolute(&self, path: &str) -> Result<String> {
        let Some(first) = path.chars().next() else {
            return Err(Error::invalid_argument(
                "cannot make an empty path absolute",
            ));
        };
        if self.config.is_separator(first) {
            return Ok(path.to_string());
        }
        let cwd = std::env::current_dir()
            .map_err(|e| Error::io(format!("failed to get current directory: {e}")))?;
        let cwd = path_to_string(cwd)?;
        self.absolute_from(&cwd, path)
    }

    fn absolute_from(&self, cwd: &str, path: &str) -> Result<String> {
        cu::trace!("making '{path}' absolute against '{cwd}'");
        self.join(cwd, path)
    }

    /// Append the platform library suffix (and prefix, if configured) to `name`
    pub fn make_library_filename(&self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(Error::invalid_name("library name is empty"));
        }
        let mut out = String::with_capacity(
            self.config.library_prefix.len() + name.len() + self.config.library_suffix.len(),
        );
        out.push_str(&self.config.library_prefix);
        out.push_str(name);
        out.push_str(&self.config.library_suffix);
        self.check_len(out)
    }

    /// Get the bare module name from a library path.
    ///
    /// `/usr/lib/foo.so` gives `foo`. Only the text before the first `.` of
    /// the file name is kept, so `foo.so.1` also gives `foo`. A file name
    /// without any `.` is rejected.
    pub fn make_library_name(&self, path: &str) -> Result<String> {
        let base = path
            .rsplit(|c: char| self.config.is_separator(c))
            .next()
            .unwrap_or(path);
        let Some((stem, _)) = base.split_once('.') else {
            return Err(Error::invalid_name(format!(
                "library path '{path}' has no extension"
            )));
        };
        if stem.is_empty() {
            return Err(Error::invalid_name(format!(
                "library path '{path}' has an empty name"
            )));
        }
        Ok(stem.to_string())
    }

    /// Path of the config file next to the running executable
    pub fn config_file_for_application(&self) -> Result<String> {
        let exe = std::env::current_exe()
            .map_err(|e| Error::io(format!("failed to get executable path: {e}")))?;
        let mut out = path_to_string(exe)?;
        out.push_str(&self.config.config_suffix);
        cu::trace!("application config file: {out}");
        self.check_len(out)
    }

    /// Join `path` and `filename` with exactly one separator.
    ///
    /// An empty `path` gives `filename` back unchanged.
    pub fn combine_path_with_file(&self, path: &str, filename: &str) -> Result<String> {
        if filename.is_empty() {
            return Err(Error::invalid_argument("file name to combine is empty"));
        }
        if path.is_empty() {
            return self.check_len(filename.to_string());
        }
        self.join(path, filename)
    }

    fn join(&self, dir: &str, file: &str) -> Result<String> {
        let mut out = String::with_capacity(dir.len() + 1 + file.len());
        out.push_str(dir);
        if !dir.ends_with(|c: char| self.config.is_separator(c)) {
            out.push(self.config.separator);
        }
        out.push_str(file);
        self.check_len(out)
    }

    fn check_len(&self, path: String) -> Result<String> {
        if path.len() > self.config.max_path {
            return Err(Error::new(
                ErrorKind::PathTooLong,
                format!(
                    "path is {} bytes, longer than the maximum of {}",
                    path.len(),
                    self.config.max_path
                ),
            ));
        }
        Ok(path)
    }
}

fn path_to_string(path: PathBuf) -> Result<String> {
    path.into_os_string()
        .into_string()
        .map_err(|p| Error::io(format!("path is not utf-8: {}", p.to_string_lossy())))
}

/// [`Paths::file_exists`] with the native config
pub fn file_exists(path: &str) -> bool {
    Paths::default().file_exists(path)
}

/// [`Paths::make_path_absolute`] with the native config
pub fn make_path_absolute(path: &str) -> Result<String> {
    Paths::default().make_path_absolute(path)
}

/// [`Paths::make_library_filename`] with the native config
pub fn make_library_filename(name: &str) -> Result<String> {
    Paths::default().make_library_filename(name)
}

/// [`Paths::make_library_name`] with the native config
pub fn make_library_name(path: &str) -> Result<String> {
    Paths::default().make_library_name(path)
}

/// [`Paths::config_file_for_application`] with the native config
pub fn config_file_for_application() -> Result<String> {
    Paths::default().config_file_for_application()
}

/// [`Paths::combine_path_with_file`] with the native config
pub fn combine_path_with_file(path: &str, filename: &str) -> Result<String> {
    Paths::default().combine_path_with_file(path, filename)
}
