//! Command-line configuration for the `imsz` binary.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use imsz::config::Config;
//!
//! let config = Config::parse();
//! for input in config.inputs() {
//!     println!("{}", input.label());
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `IMSZ_OUTPUT` - Output format, `text` or `json` (default: text)
//! - `RUST_LOG` - Log filter, overrides `--verbose`

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

// =============================================================================
// CLI Arguments
// =============================================================================

/// imsz - Print the format and pixel dimensions of images.
///
/// Only the image headers are read, so large files are cheap to probe.
#[derive(Parser, Debug, Clone)]
#[command(name = "imsz")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Image files to probe. `-` or no files reads standard input.
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, env = "IMSZ_OUTPUT")]
    pub output: OutputFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `path: FORMAT, W x H`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// One input to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Path(PathBuf),
}

impl Input {
    /// Name used when reporting results.
    pub fn label(&self) -> String {
        match self {
            Input::Stdin => STDIN_PATH.to_string(),
            Input::Path(path) => path.display().to_string(),
        }
    }
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        let stdin_count = self
            .files
            .iter()
            .filter(|path| path.as_os_str() == STDIN_PATH)
            .count();
        if stdin_count > 1 {
            return Err("standard input (-) can only be given once".to_string());
        }
        Ok(())
    }

    /// Inputs in command-line order.
    pub fn inputs(&self) -> Vec<Input> {
        if self.files.is_empty() {
            return vec![Input::Stdin];
        }
        self.files
            .iter()
            .map(|path| {
                if path.as_os_str() == STDIN_PATH {
                    Input::Stdin
                } else {
                    Input::Path(path.clone())
                }
            })
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
