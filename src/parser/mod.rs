//! GCode Parser
//!
//! Line-level tokenization and classification. Geometry and modal state live
//! in [`crate::model`].

pub mod ast;
pub mod directive;
pub mod lexer;

pub use ast::{Letter, Parameter, ParsedLine};
pub use directive::{classify, Channel, Command, Directive, Marker};
pub use lexer::{tokenize_line, Token, TokenKind};

/// Parse a single line of GCode into structured data
pub fn parse_line(line: &str) -> ParsedLine<'_> {
    let tokens = lexer::tokenize_line(line);
    ast::tokens_to_parsed_line(&tokens)
}
