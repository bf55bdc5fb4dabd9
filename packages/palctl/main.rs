// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Pistonite

use cu::pre::*;
use xpal::{Paths, PlatformConfig, SharedLibrary};

/// palctl - exercise the platform abstraction shim
#[derive(clap::Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Directory separator to use instead of the native one
    #[clap(long, global = true)]
    separator: Option<char>,

    /// Shared library suffix to use instead of the native one (e.g. `.so`)
    #[clap(long, global = true)]
    library_suffix: Option<String>,

    #[clap(flatten)]
    flags: cu::cli::Flags,
}

impl Cli {
    fn paths(&self) -> Paths {
        let mut config = PlatformConfig::native();
        if let Some(separator) = self.separator {
            config = config.with_separator(separator);
        }
        if let Some(suffix) = &self.library_suffix {
            config = config.with_library_suffix(suffix);
        }
        Paths::new(config)
    }
}

#[derive(clap::Subcommand)]
enum Command {
    /// Check if a file or directory exists. Fails if it doesn't
    Exists { path: String },
    /// Print the absolute form of a path
    Abs { path: String },
    /// Print the library file name for a bare library name
    LibFile { name: String },
    /// Print the bare library name of a library path
    LibName { path: String },
    /// Print the config file path of this executable
    ConfigFile,
    /// Join a directory and a file name
    Join { dir: String, file: String },
    /// Load a library, resolve symbols in it and unload it
    Load {
        path: String,
        /// Symbols to resolve
        symbols: Vec<String>,
    },
}

#[cu::cli(flags = "flags")]
fn main(cli: Cli) -> cu::Result<()> {
    let paths = cli.paths();
    cu::debug!("using {:?}", paths.config());
    match cli.command {
        Command::Exists { path } => {
            if !paths.file_exists(&path) {
                cu::bail!("'{path}' does not exist");
            }
            cu::info!("'{path}' exists");
        }
        Command::Abs { path } => {
            let out = cu::check!(
                paths.make_path_absolute(&path),
                "failed to make '{path}' absolute"
            )?;
            println!("{out}");
        }
        Command::LibFile { name } => {
            let out = cu::check!(
                paths.make_library_filename(&name),
                "failed to make library file name for '{name}'"
            )?;
            println!("{out}");
        }
        Command::LibName { path } => {
            let out = cu::check!(
                paths.make_library_name(&path),
                "failed to get library name from '{path}'"
            )?;
            println!("{out}");
        }
        Command::ConfigFile => {
            let out = cu::check!(
                paths.config_file_for_application(),
                "failed to get application config file"
            )?;
            println!("{out}");
        }
        Command::Join { dir, file } => {
            let out = cu::check!(
                paths.combine_path_with_file(&dir, &file),
                "failed to join '{dir}' and '{file}'"
            )?;
            println!("{out}");
        }
        Command::Load { path, symbols } => load(&path, &symbols)?,
    }
    Ok(())
}

fn load(path: &str, symbols: &[String]) -> cu::Result<()> {
    let library = cu::check!(SharedLibrary::load(path), "failed to load '{path}'")?;
    cu::info!("loaded '{}'", library.path());
    let mut missing = 0;
    for name in symbols {
        match library.resolve(name) {
            Ok(symbol) => println!("{name} {:p}", symbol.as_ptr()),
            Err(e) => {
                cu::error!("{e}");
                missing += 1;
            }
        }
    }
    cu::check!(library.unload(), "failed to unload '{path}'")?;
    if missing > 0 {
        cu::bail!("{missing} of {} symbols could not be resolved", symbols.len());
    }
    Ok(())
}
