//! Directive classification
//!
//! A line carries at most one command and at most one comment marker. Both
//! are reported; the command is applied first.

use crate::error::{GcodeError, Result};
use crate::parser::ast::ParsedLine;

/// Meaning selected by a `T` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    /// `T0`
    #[default]
    Tool,
    /// `T1`
    Rotation,
    /// `T2`
    Incline,
}

/// Command token of a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `G0`
    Rapid,
    /// `G1`
    Interp,
    /// `G90`
    AbsolutePositioning,
    /// `G91`
    RelativePositioning,
    ToolSelect(Channel),
    /// Anything else, including blank lines
    Other,
}

/// Directive carried in a comment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marker {
    Layer(i64),
    Rotation,
    Incline,
    PrintTime(f64),
    Consumption(f64),
    End,
}

const LAYER_PREFIX: &str = "layer:";
const PRINT_TIME_PREFIX: &str = "estimated print time:";
const CONSUMPTION_PREFIX: &str = "estimated consumption material:";

/// Classified line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Directive {
    pub command: Command,
    pub marker: Option<Marker>,
}

pub fn classify(line: &ParsedLine<'_>, line_no: usize) -> Result<Directive> {
    let marker = match line.comment.as_deref() {
        Some(comment) => classify_comment(comment, line_no)?,
        None => None,
    };

    Ok(Directive {
        command: classify_command(line.command),
        marker,
    })
}

/// Command tokens are case-sensitive
pub fn classify_command(token: &str) -> Command {
    match token {
        "G0" => Command::Rapid,
        "G1" => Command::Interp,
        "G90" => Command::AbsolutePositioning,
        "G91" => Command::RelativePositioning,
        "T0" => Command::ToolSelect(Channel::Tool),
        "T1" => Command::ToolSelect(Channel::Rotation),
        "T2" => Command::ToolSelect(Channel::Incline),
        _ => Command::Other,
    }
}

/// Classify normalized (trimmed, lower-cased) comment text.
///
/// A malformed layer number is an error. Malformed telemetry is not: the
/// comment is simply not recognized.
fn classify_comment(comment: &str, line_no: usize) -> Result<Option<Marker>> {
    if let Some(rest) = comment.strip_prefix(LAYER_PREFIX) {
        let rest = rest.trim();
        return rest
            .parse::<i64>()
            .map(|n| Some(Marker::Layer(n)))
            .map_err(|_| GcodeError::InvalidNumber {
                line: line_no,
                token: format!("{}{}", LAYER_PREFIX, rest),
            });
    }

    let marker = match comment {
        "rotation" => Some(Marker::Rotation),
        "incline" => Some(Marker::Incline),
        _ if comment.starts_with(PRINT_TIME_PREFIX) => {
            parse_telemetry(&comment[PRINT_TIME_PREFIX.len()..]).map(Marker::PrintTime)
        }
        _ if comment.starts_with(CONSUMPTION_PREFIX) => {
            parse_telemetry(&comment[CONSUMPTION_PREFIX.len()..]).map(Marker::Consumption)
        }
        _ if comment.starts_with("end") => Some(Marker::End),
        _ => None,
    };

    Ok(marker)
}

fn parse_telemetry(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
