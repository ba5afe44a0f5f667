//! GCode Lexer
//!
//! Splits a line into whitespace-separated words. The first word is the
//! command, the rest up to the first `;` are parameters, and everything after
//! that `;` is a comment.

/// Token types in GCode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// First word of the line, like "G1" or "T0"
    Command,
    /// Any later word, like "X10" or "U-90"
    Parameter,
    /// Text after the first semicolon, delimiter excluded
    Comment,
}

/// A token borrowing its text from the line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Tokenize a line of GCode
pub fn tokenize_line(line: &str) -> Vec<Token<'_>> {
    let (code, comment) = match line.find(';') {
        Some(idx) => (&line[..idx], Some(&line[idx + 1..])),
        None => (line, None),
    };

    let mut tokens: Vec<Token<'_>> = code
        .split_ascii_whitespace()
        .enumerate()
        .map(|(idx, text)| Token {
            kind: if idx == 0 {
                TokenKind::Command
            } else {
                TokenKind::Parameter
            },
            text,
        })
        .collect();

    if let Some(text) = comment {
        tokens.push(Token {
            kind: TokenKind::Comment,
            text,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_command() {
        let tokens = tokenize_line("G1 X10 Y20");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Command);
        assert_eq!(tokens[0].text, "G1");
        assert_eq!(tokens[1].kind, TokenKind::Parameter);
        assert_eq!(tokens[1].text, "X10");
        assert_eq!(tokens[2].kind, TokenKind::Parameter);
        assert_eq!(tokens[2].text, "Y20");
    }

    #[test]
    fn test_tokenize_with_semicolon_comment() {
        let tokens = tokenize_line("G0 U90 ;rotation");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert_eq!(tokens[2].text, "rotation");
    }

    #[test]
    fn test_semicolon_ends_parameters() {
        let tokens = tokenize_line("G1 X1;Y2 Z3");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "X1");
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert_eq!(tokens[2].text, "Y2 Z3");
    }

    #[test]
    fn test_tokenize_comment_only() {
        let tokens = tokenize_line(";LAYER:3");

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "LAYER:3");
    }

    #[test]
    fn test_tokenize_empty_line() {
        assert!(tokenize_line("   \t ").is_empty());
        assert!(tokenize_line("").is_empty());
    }

    #[test]
    fn test_signed_parameters() {
        let tokens = tokenize_line("G1 X10.5 Y-2.3 Z+1.0");

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].text, "X10.5");
        assert_eq!(tokens[2].text, "Y-2.3");
        assert_eq!(tokens[3].text, "Z+1.0");
    }
}
