//! Path assembler
//!
//! The state machine that turns classified lines into paths, layers and the
//! rotation table.

use crate::config::ParserConfig;
use crate::error::{GcodeError, Result};
use crate::model::state::ParserState;
use crate::model::{Layer, ParseResult, Path, Point, Rotation, Telemetry};
use crate::parser::{self, Command, Marker, ParsedLine};

/// Whether the parser wants more input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// An end-of-program marker was seen; further lines are ignored
    End,
}

/// Incremental G-code parser.
///
/// Feed lines in order with [`Parser::feed_line`], then call
/// [`Parser::finish`] for the result.
#[derive(Debug, Clone)]
pub struct Parser {
    state: ParserState,
    current_path: Vec<Point>,
    current_layer_paths: Vec<Path>,
    layers: Vec<Layer>,
    rotations: Vec<Rotation>,
    lays2rots: Vec<usize>,
    telemetry: Telemetry,
    line_no: usize,
    ended: bool,
}

impl Parser {
    pub fn new(config: &ParserConfig) -> Self {
        let state = ParserState::new(config);
        Self {
            current_path: vec![state.modal_point()],
            state,
            current_layer_paths: Vec::new(),
            layers: Vec::new(),
            rotations: vec![Rotation::IDENTITY],
            lays2rots: Vec::new(),
            telemetry: Telemetry::default(),
            line_no: 0,
            ended: false,
        }
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Points of the path still being built
    pub fn current_path(&self) -> &[Point] {
        &self.current_path
    }

    pub fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }

    /// Number of lines fed so far
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    /// Process one line (without its line terminator)
    pub fn feed_line(&mut self, line: &str) -> Result<Flow> {
        if self.ended {
            return Ok(Flow::End);
        }
        self.line_no += 1;

        let parsed = parser::parse_line(line);
        if parsed.is_empty() {
            return Ok(Flow::Continue);
        }

        let directive = parser::classify(&parsed, self.line_no)?;
        self.apply_command(directive.command, &parsed)?;

        match directive.marker {
            Some(marker) => self.apply_marker(marker, &parsed),
            None => Ok(Flow::Continue),
        }
    }

    /// Flush everything and return the immutable result
    pub fn finish(mut self) -> Result<ParseResult> {
        self.finish_layer();

        let result = ParseResult::new(
            self.layers,
            self.rotations,
            self.lays2rots,
            self.telemetry,
        );
        check_invariants(&result)?;
        Ok(result)
    }

    fn apply_command(&mut self, command: Command, parsed: &ParsedLine<'_>) -> Result<()> {
        match command {
            Command::Rapid => {
                self.close_path();
                self.state.apply(&parsed.parameters, self.line_no)?;
                self.current_path = vec![self.state.modal_point()];
            }
            Command::Interp => {
                self.state.apply(&parsed.parameters, self.line_no)?;
                self.current_path.push(self.state.modal_point());
            }
            Command::AbsolutePositioning => self.state.set_absolute(true),
            Command::RelativePositioning => self.state.set_absolute(false),
            Command::ToolSelect(channel) => self.state.set_channel(channel),
            Command::Other => {}
        }
        Ok(())
    }

    fn apply_marker(&mut self, marker: Marker, parsed: &ParsedLine<'_>) -> Result<Flow> {
        match marker {
            Marker::Layer(n) => {
                // Flush first so the finished layer keeps its own number
                self.finish_layer();
                self.state.set_layer(n);
            }
            Marker::Rotation => {
                self.finish_layer();
                let z_rot = self.directive_value(parsed, "rotation")?;
                let x_rot = self.last_rotation().x_rot;
                self.rotations.push(Rotation::new(x_rot, z_rot));
                self.state.set_bed_angle(z_rot);
            }
            Marker::Incline => {
                self.finish_layer();
                let x_rot = self.directive_value(parsed, "incline")?;
                let z_rot = self.last_rotation().z_rot;
                self.rotations.push(Rotation::new(x_rot, z_rot));
                self.state.set_incline(x_rot);
            }
            Marker::PrintTime(seconds) => self.telemetry.print_time = Some(seconds),
            Marker::Consumption(mm) => self.telemetry.consumption = Some(mm),
            Marker::End => {
                self.ended = true;
                return Ok(Flow::End);
            }
        }
        Ok(Flow::Continue)
    }

    /// Move the in-progress path into the current layer if it is a real path
    fn close_path(&mut self) {
        let points = std::mem::take(&mut self.current_path);
        if let Ok(path) = Path::new(points) {
            self.current_layer_paths.push(path);
        }
    }

    /// Close the current path and layer.
    ///
    /// When the head is still inclined (`A != 0`) at the flush, the
    /// `(A, B)` pair is recorded as a new rotation so that a layer ending
    /// mid-incline is followed by an entry of its own, even without an
    /// explicit incline directive. The entry is skipped when the table already
    /// ends with exactly that rotation.
    fn finish_layer(&mut self) {
        self.close_path();
        self.current_path = vec![self.state.modal_point()];

        if !self.current_layer_paths.is_empty() {
            let paths = std::mem::take(&mut self.current_layer_paths);
            self.layers.push(Layer::new(self.state.current_layer(), paths));
            self.lays2rots.push(self.rotations.len() - 1);
        }

        let (a, b) = self.state.angles();
        if a != 0.0 {
            let tail = Rotation::new(a, b);
            if self.last_rotation() != tail {
                self.rotations.push(tail);
            }
        }
    }

    fn last_rotation(&self) -> Rotation {
        self.rotations
            .last()
            .copied()
            .unwrap_or(Rotation::IDENTITY)
    }

    fn directive_value(&self, parsed: &ParsedLine<'_>, directive: &str) -> Result<f64> {
        parsed
            .first_number(self.line_no)
            .unwrap_or_else(|| {
                Err(GcodeError::MissingValue {
                    line: self.line_no,
                    directive: directive.to_string(),
                })
            })
    }
}

fn check_invariants(result: &ParseResult) -> Result<()> {
    if result.rotations().first() != Some(&Rotation::IDENTITY) {
        return Err(GcodeError::InvalidState(
            "rotation table does not start at identity".to_string(),
        ));
    }
    if result.lays2rots().len() != result.layers().len() {
        return Err(GcodeError::InvalidState(format!(
            "{} layers but {} rotation indices",
            result.layers().len(),
            result.lays2rots().len()
        )));
    }
    if let Some(bad) = result
        .lays2rots()
        .iter()
        .find(|&&i| i >= result.rotations().len())
    {
        return Err(GcodeError::InvalidState(format!(
            "rotation index {} out of range",
            bad
        )));
    }
    if result.layers().iter().any(|l| l.paths().is_empty()) {
        return Err(GcodeError::InvalidState("empty layer".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(parser: &mut Parser, text: &str) {
        for line in text.lines() {
            parser.feed_line(line).unwrap();
        }
    }

    #[test]
    fn test_rapid_closes_path() {
        let mut parser = Parser::new(&ParserConfig::default());
        feed(&mut parser, "G1 X1\nG1 X2\nG0 X5\nG1 X6");
        assert_eq!(parser.current_path().len(), 2);
        assert_eq!(parser.current_path()[0].x, 5.0);

        let result = parser.finish().unwrap();
        let paths = result.layers()[0].paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].len(), 3);
    }

    #[test]
    fn test_rapid_alone_is_not_a_path() {
        let mut parser = Parser::new(&ParserConfig::default());
        feed(&mut parser, "G0 X1\nG0 X2\nG0 X3");
        let result = parser.finish().unwrap();
        assert!(result.layers().is_empty());
    }

    #[test]
    fn test_layer_marker_before_motion() {
        let mut parser = Parser::new(&ParserConfig::default());
        feed(&mut parser, ";LAYER:0\n;LAYER:1");
        assert_eq!(parser.state().current_layer(), 1);
        let result = parser.finish().unwrap();
        assert!(result.layers().is_empty());
        assert_eq!(result.rotations(), &[Rotation::IDENTITY]);
    }

    #[test]
    fn test_layer_numbers() {
        let mut parser = Parser::new(&ParserConfig::default());
        feed(&mut parser, ";LAYER:4\nG1 X1\n;LAYER:5\nG1 X2");
        let result = parser.finish().unwrap();
        let numbers: Vec<i64> = result.layers().iter().map(Layer::number).collect();
        assert_eq!(numbers, vec![4, 5]);
    }

    #[test]
    fn test_duplicate_rotation_is_kept() {
        let mut parser = Parser::new(&ParserConfig::default());
        feed(&mut parser, "G0 U0 ;rotation\nG0 U0 ;rotation");
        assert_eq!(parser.rotations().len(), 3);
    }

    #[test]
    fn test_rotation_without_value() {
        let mut parser = Parser::new(&ParserConfig::default());
        let err = parser.feed_line("G0 ;rotation").unwrap_err();
        assert_eq!(
            err,
            GcodeError::MissingValue {
                line: 1,
                directive: "rotation".to_string()
            }
        );
    }

    #[test]
    fn test_incline_tail_rotation() {
        let mut parser = Parser::new(&ParserConfig::default());
        feed(&mut parser, "G1 X1 A15\n;LAYER:1\nG1 X2\n;LAYER:2");
        let result = parser.finish().unwrap();

        // One entry for the inclined tail, no duplicates on later flushes
        assert_eq!(
            result.rotations(),
            &[Rotation::IDENTITY, Rotation::new(15.0, 0.0)]
        );
        assert_eq!(result.lays2rots(), &[0, 1]);
    }

    #[test]
    fn test_incline_directive_not_doubled() {
        let mut parser = Parser::new(&ParserConfig::default());
        feed(&mut parser, "G1 X1\nG0 V20 ;incline\nG1 X2\n;LAYER:1");
        let result = parser.finish().unwrap();
        assert_eq!(
            result.rotations(),
            &[Rotation::IDENTITY, Rotation::new(20.0, 0.0)]
        );
    }

    #[test]
    fn test_end_stops_parsing() {
        let mut parser = Parser::new(&ParserConfig::default());
        assert_eq!(parser.feed_line("G1 X1").unwrap(), Flow::Continue);
        assert_eq!(parser.feed_line(";End of program").unwrap(), Flow::End);
        assert_eq!(parser.feed_line("G1 X100").unwrap(), Flow::End);

        let result = parser.finish().unwrap();
        assert_eq!(result.layers()[0].paths()[0].points()[1].x, 1.0);
        assert_eq!(result.point_count(), 2);
    }

    #[test]
    fn test_tool_select() {
        let mut parser = Parser::new(&ParserConfig::default());
        feed(&mut parser, "T1");
        assert_eq!(parser.state().channel(), crate::parser::Channel::Rotation);
        feed(&mut parser, "T2");
        assert_eq!(parser.state().channel(), crate::parser::Channel::Incline);
        feed(&mut parser, "T0\nT9");
        assert_eq!(parser.state().channel(), crate::parser::Channel::Tool);
    }

    #[test]
    fn test_unknown_command_params_not_decoded() {
        let mut parser = Parser::new(&ParserConfig::default());
        assert!(parser.feed_line("G28 X Y").is_ok());
        assert!(parser.feed_line("M104 S2x0").is_ok());
        assert!(parser.feed_line("G1 Xbad").is_err());
    }
}
