//! Tokenized line types
//!
//! Parameter values stay textual here; they are only decoded when a command
//! actually consumes them, so unknown commands never raise numeric errors.

use crate::error::{GcodeError, Result};
use crate::parser::lexer::{Token, TokenKind};

/// Parameter letters understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    X,
    Y,
    Z,
    A,
    B,
    E,
    /// Rotary-bed angle, triggers the cylindrical conversion
    U,
    /// Companion value read by directives only
    V,
}

impl Letter {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' => Some(Letter::X),
            'Y' => Some(Letter::Y),
            'Z' => Some(Letter::Z),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'E' => Some(Letter::E),
            'U' => Some(Letter::U),
            'V' => Some(Letter::V),
            _ => None,
        }
    }
}

/// A parameter like "X10.5"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter<'a> {
    pub letter: Letter,
    /// Text after the letter
    pub value: &'a str,
    /// Whole token, kept for error messages
    pub raw: &'a str,
}

impl Parameter<'_> {
    /// Decode the value as a finite real number
    pub fn number(&self, line: usize) -> Result<f64> {
        match self.value.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(GcodeError::InvalidNumber {
                line,
                token: self.raw.to_string(),
            }),
        }
    }
}

/// One line of GCode after tokenization
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedLine<'a> {
    /// First word of the line, empty for blank and comment-only lines
    pub command: &'a str,
    /// Parameters with a recognized letter, in line order
    pub parameters: Vec<Parameter<'a>>,
    /// Comment text, trimmed and lower-cased
    pub comment: Option<String>,
}

impl ParsedLine<'_> {
    pub fn is_empty(&self) -> bool {
        self.command.is_empty() && self.comment.is_none()
    }

    /// First parameter of the line, decoded
    pub fn first_number(&self, line: usize) -> Option<Result<f64>> {
        self.parameters.first().map(|p| p.number(line))
    }
}

/// Convert tokens into a parsed line
pub fn tokens_to_parsed_line<'a>(tokens: &[Token<'a>]) -> ParsedLine<'a> {
    let mut parsed = ParsedLine::default();

    for token in tokens {
        match token.kind {
            TokenKind::Command => parsed.command = token.text,
            TokenKind::Parameter => {
                if let Some(param) = parse_parameter_token(token.text) {
                    parsed.parameters.push(param);
                }
            }
            TokenKind::Comment => parsed.comment = Some(token.text.trim().to_lowercase()),
        }
    }

    parsed
}

/// Split "X10.5" into its letter and value; unknown letters yield `None`
fn parse_parameter_token(text: &str) -> Option<Parameter<'_>> {
    let letter = Letter::from_char(text.chars().next()?)?;

    Some(Parameter {
        letter,
        value: &text[1..],
        raw: text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize_line;

    #[test]
    fn test_parse_parameter_token() {
        let param = parse_parameter_token("X10.5").unwrap();
        assert_eq!(param.letter, Letter::X);
        assert_eq!(param.value, "10.5");
        assert_eq!(param.number(1).unwrap(), 10.5);
    }

    #[test]
    fn test_unknown_letter_is_skipped() {
        assert!(parse_parameter_token("F1500").is_none());
        assert!(parse_parameter_token("x10").is_none());

        let parsed = tokens_to_parsed_line(&tokenize_line("G1 F1500 X1 S3"));
        assert_eq!(parsed.parameters.len(), 1);
        assert_eq!(parsed.parameters[0].letter, Letter::X);
    }

    #[test]
    fn test_bad_numbers() {
        for token in ["X", "X1.2.3", "Xabc", "Xinf", "XNaN"] {
            let param = parse_parameter_token(token).unwrap();
            let err = param.number(7).unwrap_err();
            assert_eq!(
                err,
                GcodeError::InvalidNumber {
                    line: 7,
                    token: token.to_string()
                }
            );
        }
    }

    #[test]
    fn test_comment_is_normalized() {
        let parsed = tokens_to_parsed_line(&tokenize_line("G0 V30 ;  Incline  "));
        assert_eq!(parsed.command, "G0");
        assert_eq!(parsed.comment.as_deref(), Some("incline"));
        assert_eq!(parsed.first_number(1).unwrap().unwrap(), 30.0);
    }

    #[test]
    fn test_empty_line() {
        let parsed = tokens_to_parsed_line(&tokenize_line("  "));
        assert!(parsed.is_empty());
        assert!(parsed.first_number(1).is_none());
    }
}
