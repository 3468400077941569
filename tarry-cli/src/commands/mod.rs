//! CLI command implementations.

pub mod begin;
pub mod check;
pub mod decode;
pub mod types;

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fmt;
use std::io::Read;
use std::path::Path;
use tarry_core::WaitSettings;

/// A persisted family the CLI can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Family {
    /// Wait declarations
    Wait,
    /// Activated waits
    Activated,
    /// Resumes
    Resume,
    /// Hints
    Hint,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wait => "wait",
            Self::Activated => "activated wait",
            Self::Resume => "resume",
            Self::Hint => "hint",
        })
    }
}

/// Read a file, or stdin when `input` is `-`.
pub fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .context("Failed to read stdin")?;
        return Ok(data);
    }

    let path = Path::new(input);
    if !path.exists() {
        anyhow::bail!("File not found: {}", input);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", input))
}

/// Settings from `path`, or the defaults.
pub fn load_settings(path: Option<&Path>) -> Result<WaitSettings> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading wait settings");
            WaitSettings::from_file(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))
        }
        None => Ok(WaitSettings::default()),
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", json);
    Ok(())
}
