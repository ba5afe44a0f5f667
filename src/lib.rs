//! 5-axis G-code layer model
//!
//! Parses G-code for a printer with an inclinable rotary bed into layers of
//! paths plus a rotation table, and computes the transforms that place each
//! layer in the world frame for a displayed bed rotation.
//!
//! This library provides:
//! - Line tokenization and directive classification
//! - The modal five-axis positioning state and path assembly
//! - Rotation algebra and per-layer projection
//! - Printer configuration

pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod reader;
pub mod writer;

// Re-exports for clean public API
pub use config::ParserConfig;
pub use error::{ErrorKind, GcodeError, Result};
pub use geometry::{layer_transform, Projector};
pub use model::{Layer, ParseResult, Path, Point, Rotation, Telemetry};
pub use parser::{parse_line, ParsedLine};
pub use reader::{parse_file, parse_reader, parse_str, CancelToken};
pub use writer::to_gcode;
