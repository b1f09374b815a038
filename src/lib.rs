//! JavaScript parser producing a Babylon-compatible AST
//!
//! # Example
//!
//! ```
//! use jsparse::{parse, ParseOptions, SourceType};
//!
//! let options = ParseOptions { source_type: SourceType::Script };
//! let program = parse("let x = 1 + 2;", options).unwrap();
//! assert_eq!(program.body.len(), 1);
//! ```
//!
//! Parsing is all-or-nothing: the first syntax error aborts with a
//! [`SyntaxError`] carrying the offending line and column, and no
//! partial tree is produced. A finished [`ast::Program`] is immutable;
//! [`serialize::to_value`] renders it in the Babylon JSON shape and
//! [`printer::print`] re-emits equivalent source.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod serialize;

pub use ast::{Program, SourceType};
pub use error::{ErrorKind, SyntaxError};
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::Parser;

/// Options controlling a parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub source_type: SourceType,
}

/// Parse a complete source text into a [`Program`].
pub fn parse(source: &str, options: ParseOptions) -> Result<Program, SyntaxError> {
    Parser::new(source, options.source_type)?.parse_program()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_default_options() {
        let program = parse("a + b;", ParseOptions::default()).unwrap();
        assert_eq!(program.source_type, SourceType::Script);
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn module_options_enable_imports() {
        let options = ParseOptions {
            source_type: SourceType::Module,
        };
        let program = parse("import a from \"m\";", options).unwrap();
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn errors_carry_position() {
        let err = parse("let = 1;", ParseOptions::default()).unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.column > 1);
    }
}
