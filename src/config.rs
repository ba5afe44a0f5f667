//! Configuration management for the parser and the `fivex-layers` binary.
//!
//! Handles:
//! - Printer configuration (rotation center, initial positioning mode) from TOML
//! - Command-line argument parsing
//! - Resolution order: CLI overrides > `--config` file > user config dir > defaults

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// File name looked up under the user config directory
const PRINTER_CONFIG_FILE: &str = "printer.toml";

/// Printer settings the parser depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub rotation_center_x: f64,
    pub rotation_center_y: f64,
    pub rotation_center_z: f64,
    /// Start in absolute (`G90`) mode
    pub abs_mode_initial: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            rotation_center_x: 0.0,
            rotation_center_y: 0.0,
            rotation_center_z: 0.0,
            abs_mode_initial: true,
        }
    }
}

impl ParserConfig {
    /// Rotation center as a vector
    pub fn pivot(&self) -> Vector3<f64> {
        Vector3::new(
            self.rotation_center_x,
            self.rotation_center_y,
            self.rotation_center_z,
        )
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid printer configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }
}

/// Command-line arguments for `fivex-layers`
#[derive(Debug, Parser)]
#[command(name = "fivex-layers")]
#[command(about = "Inspect layers and bed rotations of 5-axis G-code")]
#[command(version)]
pub struct Args {
    /// G-code file to parse
    pub file: PathBuf,

    /// Printer configuration file
    #[arg(long, help = "TOML file with rotation_center_x/y/z and abs_mode_initial")]
    pub config: Option<PathBuf>,

    /// Rotation center override
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        help = "Rotation center as X,Y,Z"
    )]
    pub rotation_center: Option<Vec<f64>>,

    /// Start in relative positioning mode
    #[arg(long)]
    pub relative: bool,

    /// Log level
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Print layer, path and rotation counts
    Summary,
    /// Dump the parse result as JSON
    Json {
        #[arg(long)]
        pretty: bool,
    },
    /// Print the reduced motion sequence as G-code
    Reduce,
    /// Print the world transform of every layer
    Transforms {
        /// Displayed rotation index, defaults to the final rotation
        #[arg(long)]
        active: Option<usize>,
    },
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub gcode_file: PathBuf,
    pub printer: ParserConfig,
    pub log_level: String,
    pub command: Command,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let user_file = dirs::config_dir().map(|d| d.join("fivex-gcode").join(PRINTER_CONFIG_FILE));
        Self::resolve(args, user_file.as_deref())
    }

    /// Like [`Config::from_args`] with an explicit user config file location
    pub fn resolve(args: Args, user_file: Option<&Path>) -> Result<Self> {
        let mut printer = match (&args.config, user_file) {
            (Some(path), _) => ParserConfig::from_file(path)?,
            (None, Some(path)) if path.is_file() => match ParserConfig::from_file(path) {
                Ok(printer) => printer,
                Err(e) => {
                    log::warn!("Ignoring user printer config: {:#}", e);
                    ParserConfig::default()
                }
            },
            _ => ParserConfig::default(),
        };

        if let Some(center) = &args.rotation_center {
            let [x, y, z] = center.as_slice() else {
                bail!(
                    "--rotation-center expects X,Y,Z, got {} values",
                    center.len()
                );
            };
            printer.rotation_center_x = *x;
            printer.rotation_center_y = *y;
            printer.rotation_center_z = *z;
        }
        if args.relative {
            printer.abs_mode_initial = false;
        }

        Ok(Config {
            gcode_file: args.file,
            printer,
            log_level: args.log_level,
            command: args.command.unwrap_or(Command::Summary),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.pivot(), Vector3::zeros());
        assert!(config.abs_mode_initial);
    }

    #[test]
    fn test_partial_toml() {
        let config = ParserConfig::from_toml_str("rotation_center_z = 12.5\n").unwrap();
        assert_eq!(config.pivot(), Vector3::new(0.0, 0.0, 12.5));
        assert!(config.abs_mode_initial);
    }

    #[test]
    fn test_bad_toml() {
        assert!(ParserConfig::from_toml_str("rotation_center_x = \"left\"").is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let args = Args::parse_from([
            "fivex-layers",
            "part.gcode",
            "--rotation-center",
            "-1,2.5,3",
            "--relative",
            "json",
            "--pretty",
        ]);
        let config = Config::resolve(args, None).unwrap();

        assert_eq!(config.gcode_file, PathBuf::from("part.gcode"));
        assert_eq!(config.printer.pivot(), Vector3::new(-1.0, 2.5, 3.0));
        assert!(!config.printer.abs_mode_initial);
        assert_eq!(config.command, Command::Json { pretty: true });
    }

    #[test]
    fn test_wrong_center_arity() {
        let args = Args::parse_from(["fivex-layers", "part.gcode", "--rotation-center", "1,2"]);
        assert!(Config::resolve(args, None).is_err());
    }

    #[test]
    fn test_default_command() {
        let args = Args::parse_from(["fivex-layers", "part.gcode"]);
        let config = Config::resolve(args, Some(Path::new("/nonexistent/printer.toml"))).unwrap();
        assert_eq!(config.command, Command::Summary);
        assert_eq!(config.printer, ParserConfig::default());
        assert_eq!(config.log_level, "info");
    }
}
