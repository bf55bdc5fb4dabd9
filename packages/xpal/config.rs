// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Pistonite

/// Platform-dependent constants used when building paths and library names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Directory separator
    pub separator: char,
    /// Prepended by `make_library_filename`. Empty unless opted in
    pub library_prefix: String,
    /// Appended by `make_library_filename`, including the dot
    pub library_suffix: String,
    /// Appended to the executable path for the application config file
    pub config_suffix: String,
    /// Maximum length in bytes of any path this crate constructs
    pub max_path: usize,
}

static CONFIG_SUFFIX: &str = ".config";

impl PlatformConfig {
    /// Configuration for the platform this crate is compiled for
    pub fn native() -> Self {
        #[cfg(windows)]
        {
            Self::new('\\', ".dll", 260)
        }
        #[cfg(target_os = "macos")]
        {
            Self::new('/', ".dylib", 1024)
        }
        #[cfg(not(any(windows, target_os = "macos")))]
        {
            Self::new('/', ".so", 4096)
        }
    }

    /// Unix layout: `/` separator and `.so` libraries
    pub fn posix() -> Self {
        Self::new('/', ".so", 4096)
    }

    fn new(separator: char, library_suffix: &str, max_path: usize) -> Self {
        Self {
            separator,
            library_prefix: String::new(),
            library_suffix: library_suffix.to_string(),
            config_suffix: CONFIG_SUFFIX.to_string(),
            max_path,
        }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_library_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.library_prefix = prefix.into();
        self
    }

    pub fn with_library_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.library_suffix = suffix.into();
        self
    }

    pub fn with_config_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config_suffix = suffix.into();
        self
    }

    pub fn with_max_path(mut self, max_path: usize) -> Self {
        self.max_path = max_path;
        self
    }

    /// Check if `c` separates directories under this config.
    ///
    /// `/` is always accepted, since Windows takes both.
    #[inline]
    pub fn is_separator(&self, c: char) -> bool {
        c == self.separator || c == '/'
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::native()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_layout() {
        let config = PlatformConfig::posix();
        assert_eq!(config.separator, '/');
        assert_eq!(config.library_suffix, ".so");
        assert_eq!(config.config_suffix, ".config");
        assert!(config.library_prefix.is_empty());
    }

    #[test]
    fn native_suffix_matches_target() {
        let config = PlatformConfig::default();
        if cfg!(windows) {
            assert_eq!(config.library_suffix, ".dll");
            assert_eq!(config.separator, '\\');
        } else if cfg!(target_os = "macos") {
            assert_eq!(config.library_suffix, ".dylib");
        } else {
            assert_eq!(config.library_suffix, ".so");
        }
    }

    #[test]
    fn builder_overrides() {
        let config = PlatformConfig::posix()
            .with_separator('\\')
            .with_library_prefix("lib")
            .with_library_suffix(".dll")
            .with_config_suffix(".ini")
            .with_max_path(8);
        assert_eq!(config.separator, '\\');
        assert_eq!(config.library_prefix, "lib");
        assert_eq!(config.library_suffix, ".dll");
        assert_eq!(config.config_suffix, ".ini");
        assert_eq!(config.max_path, 8);
        assert!(config.is_separator('/'));
        assert!(config.is_separator('\\'));
        assert!(!config.is_separator(':'));
    }
}
