//! Entry points for parsing whole programs.
//!
//! Input is a finite text; every function here drives a [`Parser`] line by
//! line and checks the optional [`CancelToken`] before each line.

use std::io::{BufRead, BufReader, ErrorKind as IoErrorKind};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;

use crate::config::ParserConfig;
use crate::error::{GcodeError, Result};
use crate::model::{Flow, ParseResult, Parser};

/// Shared abort signal, cheap to clone across threads
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

fn check_cancel(cancel: Option<&CancelToken>) -> Result<()> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(GcodeError::Cancelled),
        _ => Ok(()),
    }
}

/// Parse a complete program held in memory
pub fn parse_str(
    text: &str,
    config: &ParserConfig,
    cancel: Option<&CancelToken>,
) -> Result<ParseResult> {
    let mut parser = Parser::new(config);

    for line in text.lines() {
        check_cancel(cancel)?;
        if parser.feed_line(line)? == Flow::End {
            break;
        }
    }

    parser.finish()
}

/// Parse a program from any buffered reader.
///
/// Readers that report [`std::io::ErrorKind::UnexpectedEof`], such as a
/// truncated decompression stream, stop parsing as if the input had ended
/// there and the partial line is dropped. Other I/O failures and invalid
/// UTF-8 are reported as [`GcodeError::InvalidState`].
pub fn parse_reader<R: BufRead>(
    mut reader: R,
    config: &ParserConfig,
    cancel: Option<&CancelToken>,
) -> Result<ParseResult> {
    let mut parser = Parser::new(config);
    let mut buffer = String::new();

    loop {
        check_cancel(cancel)?;

        buffer.clear();
        match reader.read_line(&mut buffer) {
            Ok(0) => break,
            Ok(_) => {
                let line = buffer.trim_end_matches('\n').trim_end_matches('\r');
                if parser.feed_line(line)? == Flow::End {
                    break;
                }
            }
            Err(e) if e.kind() == IoErrorKind::UnexpectedEof => break,
            Err(e) => {
                return Err(GcodeError::InvalidState(format!(
                    "read failed after line {}: {}",
                    parser.line_number(),
                    e
                )));
            }
        }
    }

    parser.finish()
}

/// Parse a G-code file from disk
pub fn parse_file(
    path: &Path,
    config: &ParserConfig,
    cancel: Option<&CancelToken>,
) -> anyhow::Result<ParseResult> {
    log::debug!("Parsing {}", path.display());

    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let result = parse_reader(BufReader::new(file), config, cancel)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    log::debug!(
        "Parsed {}: {} layers, {} paths, {} rotations",
        path.display(),
        result.layers().len(),
        result.path_count(),
        result.rotations().len()
    );

    Ok(result)
}
