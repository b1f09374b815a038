//! The single error type produced by the lexer and parser.
//!
//! Parsing is all-or-nothing: the first malformed construct aborts the
//! parse and surfaces here. There is no recovery mode and no partial tree.

use thiserror::Error;

/// What went wrong, independent of the rendered message.
///
/// Callers that only report the error can ignore this; tests and tooling
/// match on it instead of comparing message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnterminatedString,
    UnterminatedTemplate,
    UnterminatedRegExp,
    UnterminatedComment,
    InvalidEscape,
    InvalidNumber,
    InvalidCharacter,
    UnexpectedToken,
    UnexpectedEof,
    PatternConversion,
    IllegalBreak,
    IllegalContinue,
    IllegalReturn,
    IllegalYield,
    IllegalAwait,
    StrictModeViolation,
    DuplicateParameter,
    DuplicateConstructor,
    DuplicateExportDefault,
    RestNotLast,
    MalformedTry,
    MalformedExport,
    NewlineAfterThrow,
    InvalidOptionalChain,
}

/// A fatal syntax error with its source position.
///
/// `line` and `column` are 1-based; `snippet` holds the offending source
/// line for display once attached via [`SyntaxError::with_snippet`].
#[derive(Debug, Clone, Error, PartialEq)]
#[error("SyntaxError: {message} at {line}:{column}")]
pub struct SyntaxError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub snippet: String,
}

impl SyntaxError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: u32, column: u32) -> Self {
        SyntaxError {
            kind,
            message: message.into(),
            line,
            column,
            snippet: String::new(),
        }
    }

    /// Attach the source line the error points into, for diagnostics.
    pub fn with_snippet(mut self, source: &str) -> Self {
        if let Some(text) = source.lines().nth(self.line.saturating_sub(1) as usize) {
            self.snippet = text.to_string();
        }
        self
    }
}
