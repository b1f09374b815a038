//! Lexer for JavaScript source code
//!
//! Converts source text into a stream of tokens. The lexer is a pull
//! model: the parser asks for one token at a time and, at the two points
//! where lexical analysis is ambiguous without syntactic context, tells
//! the lexer to rescan (`/` as a regular expression via
//! [`Lexer::rescan_as_regex`], `}` as a template continuation via
//! [`Lexer::rescan_template_continuation`]).

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{ErrorKind, SyntaxError};

/// Source span information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }
}

/// The resolved value of a numeric literal.
///
/// Integers that fit `i64` stay exact; everything else is stored as a
/// double. The raw source text travels alongside in the token, so no
/// information is lost either way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Integer(i64),
    Float(f64),
}

/// One text piece of a template literal.
///
/// `cooked` is `None` when the piece contains an escape sequence that is
/// only legal in tagged position (the raw text is always available).
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateChunk {
    pub raw: String,
    pub cooked: Option<String>,
}

/// Token types for JavaScript
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number { value: NumericValue, raw: String },
    String(String),
    RegExp { pattern: String, flags: String },
    True,
    False,
    Null,

    // Identifiers & Keywords
    Identifier(String),

    Let,
    Const,
    Var,
    Function,
    Return,
    If,
    Else,
    For,
    While,
    Do,
    Break,
    Continue,
    Switch,
    Case,
    Default,
    Try,
    Catch,
    Finally,
    Throw,
    New,
    This,
    Super,
    Class,
    Extends,
    Static,
    Import,
    Export,
    From,
    As,
    Typeof,
    Instanceof,
    In,
    Of,
    Void,
    Delete,
    Yield,
    Await,
    Async,
    Debugger,
    With,

    // Operators
    Plus,             // +
    Minus,            // -
    Star,             // *
    Slash,            // /
    Percent,          // %
    StarStar,         // **
    PlusPlus,         // ++
    MinusMinus,       // --
    Eq,               // =
    EqEq,             // ==
    EqEqEq,           // ===
    BangEq,           // !=
    BangEqEq,         // !==
    Lt,               // <
    LtEq,             // <=
    Gt,               // >
    GtEq,             // >=
    LtLt,             // <<
    GtGt,             // >>
    GtGtGt,           // >>>
    Amp,              // &
    AmpAmp,           // &&
    Pipe,             // |
    PipePipe,         // ||
    Caret,            // ^
    Tilde,            // ~
    Bang,             // !
    Question,         // ?
    QuestionQuestion, // ??
    QuestionDot,      // ?.

    // Assignment Operators
    PlusEq,             // +=
    MinusEq,            // -=
    StarEq,             // *=
    SlashEq,            // /=
    PercentEq,          // %=
    StarStarEq,         // **=
    AmpEq,              // &=
    PipeEq,             // |=
    CaretEq,            // ^=
    LtLtEq,             // <<=
    GtGtEq,             // >>=
    GtGtGtEq,           // >>>=
    AmpAmpEq,           // &&=
    PipePipeEq,         // ||=
    QuestionQuestionEq, // ??=

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Dot,       // .
    DotDotDot, // ...
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;
    Arrow,     // =>
    At,        // @
    Hash,      // #

    // Template literals
    TemplateHead(TemplateChunk),   // `...${
    TemplateMiddle(TemplateChunk), // }...${
    TemplateTail(TemplateChunk),   // }...`
    TemplateNoSub(TemplateChunk),  // `...` (no substitutions)

    Eof,
}

/// A token with its source location and the ASI flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator appeared between the previous token and this one.
    /// Automatic semicolon insertion and the restricted productions
    /// (`return`, `throw`, postfix `++`/`--`) consult this.
    pub newline_before: bool,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, newline_before: bool) -> Self {
        Self {
            kind,
            span,
            newline_before,
        }
    }

    pub fn eof(pos: usize, line: u32, column: u32, newline_before: bool) -> Self {
        Self {
            kind: TokenKind::Eof,
            span: Span::new(pos, pos, line, column),
            newline_before,
        }
    }
}

/// Lexer state checkpoint for backtracking
#[derive(Clone)]
pub struct LexerCheckpoint {
    current_pos: usize,
    line: u32,
    column: u32,
    start_pos: usize,
    start_line: u32,
    start_column: u32,
    saw_newline: bool,
}

/// Lexer for tokenizing JavaScript source code
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    /// Base offset added to char_indices positions (needed when resetting chars from middle of source)
    chars_base_offset: usize,
    current_pos: usize,
    line: u32,
    column: u32,
    start_pos: usize,
    start_line: u32,
    start_column: u32,
    /// Tracks if we just saw a newline (for ASI)
    saw_newline: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            chars_base_offset: 0,
            current_pos: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
            saw_newline: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Create a checkpoint of the current lexer state for backtracking
    pub fn checkpoint(&self) -> LexerCheckpoint {
        LexerCheckpoint {
            current_pos: self.current_pos,
            line: self.line,
            column: self.column,
            start_pos: self.start_pos,
            start_line: self.start_line,
            start_column: self.start_column,
            saw_newline: self.saw_newline,
        }
    }

    /// Restore the lexer state from a checkpoint
    pub fn restore(&mut self, checkpoint: LexerCheckpoint) {
        self.current_pos = checkpoint.current_pos;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
        self.start_pos = checkpoint.start_pos;
        self.start_line = checkpoint.start_line;
        self.start_column = checkpoint.start_column;
        self.saw_newline = checkpoint.saw_newline;
        // Create iterator directly from the checkpoint position (O(1) instead of O(n))
        self.chars_base_offset = checkpoint.current_pos;
        self.chars = self
            .source
            .get(checkpoint.current_pos..)
            .unwrap_or("")
            .char_indices()
            .peekable();
    }

    /// Reset the lexer to a specific position (from a Span) and rescan as
    /// a regular expression literal. Used when the parser determines that
    /// a `/` or `/=` token should start a regex instead.
    pub fn rescan_as_regex(&mut self, span: Span) -> Result<Token, SyntaxError> {
        self.current_pos = span.start;
        self.line = span.line;
        self.column = span.column;
        self.start_pos = span.start;
        self.start_line = span.line;
        self.start_column = span.column;

        self.chars_base_offset = span.start;
        self.chars = self
            .source
            .get(span.start..)
            .unwrap_or("")
            .char_indices()
            .peekable();

        self.scan_regex()
    }

    /// Rescan a `}` token as a template continuation. Resets the lexer to
    /// just after the `}` and scans up to the next `${` or the closing
    /// backtick.
    pub fn rescan_template_continuation(&mut self, rbrace_span: Span) -> Result<Token, SyntaxError> {
        let base_offset = rbrace_span.end;
        self.current_pos = base_offset;
        self.chars_base_offset = base_offset;
        self.line = rbrace_span.line;
        self.column = rbrace_span.column + 1;
        self.start_pos = rbrace_span.start;
        self.start_line = rbrace_span.line;
        self.start_column = rbrace_span.column;
        self.chars = self
            .source
            .get(base_offset..)
            .unwrap_or("")
            .char_indices()
            .peekable();

        let kind = self.scan_template_chunk(true)?;
        Ok(Token::new(kind, self.make_span(), false))
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace_and_comments()?;
        let newline_before = self.saw_newline;

        self.start_pos = self.current_pos;
        self.start_line = self.line;
        self.start_column = self.column;

        let Some((_pos, ch)) = self.advance() else {
            return Ok(Token::eof(
                self.current_pos,
                self.line,
                self.column,
                newline_before,
            ));
        };

        let kind = match ch {
            // Single character tokens
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '~' => TokenKind::Tilde,
            '@' => TokenKind::At,
            '#' => TokenKind::Hash,

            // Potentially multi-character tokens
            '.' => self.scan_dot()?,
            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '*' => self.scan_star(),
            '/' => self.scan_slash(),
            '%' => self.scan_percent(),
            '=' => self.scan_equals(),
            '!' => self.scan_bang(),
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_pipe(),
            '^' => self.scan_caret(),
            '?' => self.scan_question(),

            // String literals
            '"' | '\'' => self.scan_string(ch)?,

            // Template literals
            '`' => self.scan_template_chunk(false)?,

            // Numbers
            '0'..='9' => self.scan_number(ch)?,

            // Identifiers and keywords
            c if is_id_start(c) => self.scan_identifier(c),

            c => {
                return Err(self.error(
                    ErrorKind::InvalidCharacter,
                    format!("Unexpected character '{c}'"),
                ));
            }
        };

        Ok(Token::new(kind, self.make_span(), newline_before))
    }

    fn error(&self, kind: ErrorKind, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(kind, message, self.start_line, self.start_column)
            .with_snippet(self.source)
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            // Add base offset for absolute position (needed when chars is reset from middle of source)
            self.current_pos = self.chars_base_offset + pos + ch.len_utf8();
            // ECMAScript line terminators: LF, LS (U+2028), PS (U+2029)
            if ch == '\n' || ch == '\u{2028}' || ch == '\u{2029}' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn peek_next(&self) -> Option<char> {
        let slice = self.source.get(self.current_pos..)?;
        let mut iter = slice.char_indices();
        iter.next();
        iter.next().map(|(_, ch)| ch)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn make_span(&self) -> Span {
        Span::new(
            self.start_pos,
            self.current_pos,
            self.start_line,
            self.start_column,
        )
    }

    /// The raw source text of the token being scanned.
    fn raw_text(&self) -> String {
        self.source
            .get(self.start_pos..self.current_pos)
            .unwrap_or("")
            .to_string()
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), SyntaxError> {
        self.saw_newline = false;

        loop {
            match self.peek() {
                // ECMAScript whitespace: tab, VT, FF, space, NBSP, BOM
                // (\r is listed here since it does not trigger ASI on its own)
                Some(' ' | '\t' | '\r' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}') => {
                    self.advance();
                }
                // ECMAScript line terminators: LF, LS (U+2028), PS (U+2029)
                Some('\n' | '\u{2028}' | '\u{2029}') => {
                    self.saw_newline = true;
                    self.advance();
                }
                Some('/') => {
                    let next = self.peek_next();
                    if next == Some('/') {
                        self.advance(); // /
                        self.advance(); // /
                        while let Some(ch) = self.peek() {
                            if ch == '\n' || ch == '\u{2028}' || ch == '\u{2029}' {
                                break;
                            }
                            self.advance();
                        }
                    } else if next == Some('*') {
                        self.start_pos = self.current_pos;
                        self.start_line = self.line;
                        self.start_column = self.column;
                        self.advance(); // /
                        self.advance(); // *
                        loop {
                            match self.advance() {
                                Some((_, '*')) if self.peek() == Some('/') => {
                                    self.advance();
                                    break;
                                }
                                Some((_, '\n' | '\u{2028}' | '\u{2029}')) => {
                                    self.saw_newline = true;
                                }
                                Some(_) => {}
                                None => {
                                    return Err(self.error(
                                        ErrorKind::UnterminatedComment,
                                        "Unterminated block comment",
                                    ));
                                }
                            }
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn scan_dot(&mut self) -> Result<TokenKind, SyntaxError> {
        if self.peek() == Some('.') && self.peek_next() == Some('.') {
            self.advance();
            self.advance();
            Ok(TokenKind::DotDotDot)
        } else if matches!(self.peek(), Some('0'..='9')) {
            // .123 style number
            self.scan_number('.')
        } else {
            Ok(TokenKind::Dot)
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        if self.match_char('+') {
            TokenKind::PlusPlus
        } else if self.match_char('=') {
            TokenKind::PlusEq
        } else {
            TokenKind::Plus
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        if self.match_char('-') {
            TokenKind::MinusMinus
        } else if self.match_char('=') {
            TokenKind::MinusEq
        } else {
            TokenKind::Minus
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        if self.match_char('*') {
            if self.match_char('=') {
                TokenKind::StarStarEq
            } else {
                TokenKind::StarStar
            }
        } else if self.match_char('=') {
            TokenKind::StarEq
        } else {
            TokenKind::Star
        }
    }

    fn scan_slash(&mut self) -> TokenKind {
        if self.match_char('=') {
            TokenKind::SlashEq
        } else {
            TokenKind::Slash
        }
    }

    /// Scan a regular expression literal. The leading `/` must be the
    /// next unconsumed character.
    fn scan_regex(&mut self) -> Result<Token, SyntaxError> {
        // Consume the opening /
        self.advance();

        let mut pattern = String::new();
        let mut in_class = false; // inside character class [...]

        loop {
            match self.advance() {
                Some((_, '/')) if !in_class => break,
                Some((_, '[')) => {
                    in_class = true;
                    pattern.push('[');
                }
                Some((_, ']')) => {
                    in_class = false;
                    pattern.push(']');
                }
                Some((_, '\\')) => {
                    // Escape sequence - include both backslash and next char
                    pattern.push('\\');
                    match self.advance() {
                        Some((_, '\n' | '\u{2028}' | '\u{2029}')) | None => {
                            return Err(self.error(
                                ErrorKind::UnterminatedRegExp,
                                "Unterminated regular expression",
                            ));
                        }
                        Some((_, c)) => pattern.push(c),
                    }
                }
                Some((_, '\n' | '\u{2028}' | '\u{2029}')) | None => {
                    return Err(self.error(
                        ErrorKind::UnterminatedRegExp,
                        "Unterminated regular expression",
                    ));
                }
                Some((_, c)) => pattern.push(c),
            }
        }

        // Scan flags (g, i, m, s, u, y, d)
        let mut flags = String::new();
        while let Some(ch) = self.peek() {
            if is_id_continue(ch) {
                flags.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Ok(Token::new(
            TokenKind::RegExp { pattern, flags },
            self.make_span(),
            false,
        ))
    }

    fn scan_percent(&mut self) -> TokenKind {
        if self.match_char('=') {
            TokenKind::PercentEq
        } else {
            TokenKind::Percent
        }
    }

    fn scan_equals(&mut self) -> TokenKind {
        if self.match_char('=') {
            if self.match_char('=') {
                TokenKind::EqEqEq
            } else {
                TokenKind::EqEq
            }
        } else if self.match_char('>') {
            TokenKind::Arrow
        } else {
            TokenKind::Eq
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        if self.match_char('=') {
            if self.match_char('=') {
                TokenKind::BangEqEq
            } else {
                TokenKind::BangEq
            }
        } else {
            TokenKind::Bang
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        if self.match_char('<') {
            if self.match_char('=') {
                TokenKind::LtLtEq
            } else {
                TokenKind::LtLt
            }
        } else if self.match_char('=') {
            TokenKind::LtEq
        } else {
            TokenKind::Lt
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        if self.match_char('>') {
            if self.match_char('>') {
                if self.match_char('=') {
                    TokenKind::GtGtGtEq
                } else {
                    TokenKind::GtGtGt
                }
            } else if self.match_char('=') {
                TokenKind::GtGtEq
            } else {
                TokenKind::GtGt
            }
        } else if self.match_char('=') {
            TokenKind::GtEq
        } else {
            TokenKind::Gt
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        if self.match_char('&') {
            if self.match_char('=') {
                TokenKind::AmpAmpEq
            } else {
                TokenKind::AmpAmp
            }
        } else if self.match_char('=') {
            TokenKind::AmpEq
        } else {
            TokenKind::Amp
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        if self.match_char('|') {
            if self.match_char('=') {
                TokenKind::PipePipeEq
            } else {
                TokenKind::PipePipe
            }
        } else if self.match_char('=') {
            TokenKind::PipeEq
        } else {
            TokenKind::Pipe
        }
    }

    fn scan_caret(&mut self) -> TokenKind {
        if self.match_char('=') {
            TokenKind::CaretEq
        } else {
            TokenKind::Caret
        }
    }

    fn scan_question(&mut self) -> TokenKind {
        if self.match_char('?') {
            if self.match_char('=') {
                TokenKind::QuestionQuestionEq
            } else {
                TokenKind::QuestionQuestion
            }
        } else if self.peek() == Some('.') && !matches!(self.peek_next(), Some('0'..='9')) {
            // `?.5` is a conditional with a number, not optional chaining
            self.advance();
            TokenKind::QuestionDot
        } else {
            TokenKind::Question
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<TokenKind, SyntaxError> {
        let mut value = String::new();

        loop {
            match self.advance() {
                Some((_, c)) if c == quote => break,
                Some((_, '\\')) => match self.scan_escape_sequence()? {
                    Some(c) => value.push(c),
                    None => {} // line continuation
                },
                Some((_, '\n' | '\u{2028}' | '\u{2029}')) | None => {
                    return Err(
                        self.error(ErrorKind::UnterminatedString, "Unterminated string literal")
                    );
                }
                Some((_, c)) => value.push(c),
            }
        }

        Ok(TokenKind::String(value))
    }

    /// Scan the character(s) after a backslash in a string literal.
    /// Returns `None` for a line continuation (contributes nothing).
    fn scan_escape_sequence(&mut self) -> Result<Option<char>, SyntaxError> {
        match self.advance() {
            Some((_, 'n')) => Ok(Some('\n')),
            Some((_, 'r')) => Ok(Some('\r')),
            Some((_, 't')) => Ok(Some('\t')),
            Some((_, 'b')) => Ok(Some('\x08')),
            Some((_, 'f')) => Ok(Some('\x0C')),
            Some((_, 'v')) => Ok(Some('\x0B')),
            Some((_, '0')) if !matches!(self.peek(), Some('0'..='9')) => Ok(Some('\0')),
            Some((_, '0'..='7')) => Err(self.error(
                ErrorKind::InvalidEscape,
                "Octal escape sequences are not allowed",
            )),
            Some((_, 'x')) => {
                let code = self.scan_hex_escape(2)?;
                char::from_u32(code).map(Some).ok_or_else(|| {
                    self.error(ErrorKind::InvalidEscape, "Invalid hexadecimal escape")
                })
            }
            Some((_, 'u')) => {
                let code = self.scan_unicode_escape()?;
                char::from_u32(code)
                    .map(Some)
                    .ok_or_else(|| self.error(ErrorKind::InvalidEscape, "Invalid Unicode escape"))
            }
            // Line continuation
            Some((_, '\n' | '\u{2028}' | '\u{2029}')) => Ok(None),
            Some((_, '\r')) => {
                self.match_char('\n');
                Ok(None)
            }
            Some((_, c)) => Ok(Some(c)),
            None => Err(self.error(ErrorKind::UnterminatedString, "Unterminated string literal")),
        }
    }

    fn scan_hex_escape(&mut self, count: usize) -> Result<u32, SyntaxError> {
        let mut hex_str = String::new();
        for _ in 0..count {
            match self.peek() {
                Some(ch) if ch.is_ascii_hexdigit() => {
                    hex_str.push(ch);
                    self.advance();
                }
                _ => {
                    return Err(
                        self.error(ErrorKind::InvalidEscape, "Invalid hexadecimal escape")
                    );
                }
            }
        }
        u32::from_str_radix(&hex_str, 16)
            .map_err(|_| self.error(ErrorKind::InvalidEscape, "Invalid hexadecimal escape"))
    }

    /// Scan `\uNNNN` or `\u{N...}` after the `u` has been consumed.
    fn scan_unicode_escape(&mut self) -> Result<u32, SyntaxError> {
        if self.peek() == Some('{') {
            self.advance();
            let mut hex_str = String::new();
            loop {
                match self.peek() {
                    Some('}') => {
                        self.advance();
                        break;
                    }
                    Some(ch) if ch.is_ascii_hexdigit() => {
                        hex_str.push(ch);
                        self.advance();
                    }
                    _ => {
                        return Err(
                            self.error(ErrorKind::InvalidEscape, "Invalid Unicode escape")
                        );
                    }
                }
            }
            if hex_str.is_empty() || hex_str.len() > 6 {
                return Err(self.error(ErrorKind::InvalidEscape, "Invalid Unicode escape"));
            }
            u32::from_str_radix(&hex_str, 16)
                .map_err(|_| self.error(ErrorKind::InvalidEscape, "Invalid Unicode escape"))
        } else {
            self.scan_hex_escape(4)
        }
    }

    /// Scan one text piece of a template literal. When entered from `` ` ``
    /// the backtick has been consumed; when entered from a rescanned `}`
    /// the brace has. Produces Head/NoSub when opened by a backtick and
    /// Middle/Tail when continuing after a substitution.
    ///
    /// Escape errors inside a template do not abort the scan: the raw text
    /// is kept and `cooked` becomes `None`, which is what tagged templates
    /// observe.
    fn scan_template_chunk(&mut self, continuation: bool) -> Result<TokenKind, SyntaxError> {
        let mut raw = String::new();
        let mut cooked = Some(String::new());

        loop {
            match self.advance() {
                Some((_, '`')) => {
                    let chunk = TemplateChunk { raw, cooked };
                    return Ok(if continuation {
                        TokenKind::TemplateTail(chunk)
                    } else {
                        TokenKind::TemplateNoSub(chunk)
                    });
                }
                Some((_, '$')) if self.peek() == Some('{') => {
                    self.advance(); // consume {
                    let chunk = TemplateChunk { raw, cooked };
                    return Ok(if continuation {
                        TokenKind::TemplateMiddle(chunk)
                    } else {
                        TokenKind::TemplateHead(chunk)
                    });
                }
                Some((pos, '\\')) => {
                    let escape_start = self.chars_base_offset + pos;
                    match self.scan_escape_sequence() {
                        Ok(Some(c)) => {
                            if let Some(s) = cooked.as_mut() {
                                s.push(c);
                            }
                        }
                        Ok(None) => {}
                        Err(err) if err.kind == ErrorKind::InvalidEscape => {
                            cooked = None;
                        }
                        Err(err) => {
                            return Err(SyntaxError {
                                kind: ErrorKind::UnterminatedTemplate,
                                message: "Unterminated template literal".to_string(),
                                ..err
                            });
                        }
                    }
                    // Raw text keeps the escape sequence verbatim
                    raw.push_str(
                        self.source
                            .get(escape_start..self.current_pos)
                            .unwrap_or("\\"),
                    );
                }
                Some((_, c)) => {
                    raw.push(c);
                    if let Some(s) = cooked.as_mut() {
                        s.push(c);
                    }
                }
                None => {
                    return Err(self.error(
                        ErrorKind::UnterminatedTemplate,
                        "Unterminated template literal",
                    ));
                }
            }
        }
    }

    fn scan_number(&mut self, first: char) -> Result<TokenKind, SyntaxError> {
        let value = self.scan_number_value(first)?;

        // `3in x` is not a number followed by a keyword
        if matches!(self.peek(), Some(c) if is_id_start(c)) {
            return Err(self.error(
                ErrorKind::InvalidNumber,
                "Identifier cannot appear directly after a numeric literal",
            ));
        }

        Ok(TokenKind::Number {
            value,
            raw: self.raw_text(),
        })
    }

    fn scan_number_value(&mut self, first: char) -> Result<NumericValue, SyntaxError> {
        let mut num_str = String::new();

        if first == '0' {
            match self.peek() {
                Some('x' | 'X') => {
                    self.advance();
                    self.scan_radix_digits(&mut num_str, 16)?;
                    return self.radix_value(&num_str, 16);
                }
                Some('o' | 'O') => {
                    self.advance();
                    self.scan_radix_digits(&mut num_str, 8)?;
                    return self.radix_value(&num_str, 8);
                }
                Some('b' | 'B') => {
                    self.advance();
                    self.scan_radix_digits(&mut num_str, 2)?;
                    return self.radix_value(&num_str, 2);
                }
                Some('0'..='9') => {
                    // Legacy octal (0777) and 08/09 forms
                    return Err(self.error(
                        ErrorKind::InvalidNumber,
                        "Legacy octal literals are not allowed",
                    ));
                }
                _ => num_str.push(first),
            }
        } else if first != '.' {
            num_str.push(first);
        }

        // Integer part (skip if starting with decimal point)
        if first != '.' {
            self.scan_decimal_digits(&mut num_str);
        }

        let mut is_float = false;

        // Decimal part
        if first == '.' {
            is_float = true;
            num_str.push('.');
            self.scan_decimal_digits(&mut num_str);
        } else if self.peek() == Some('.') {
            // The first dot after a number is its decimal point, even
            // with no digits behind it: `1..toString()` is Number(1.)
            // followed by a member access.
            is_float = true;
            self.advance();
            num_str.push('.');
            self.scan_decimal_digits(&mut num_str);
        }

        // Exponent part
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            num_str.push('e');
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                if let Some((_, ch)) = self.advance() {
                    num_str.push(ch);
                }
            }
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(self.error(ErrorKind::InvalidNumber, "Missing exponent digits"));
            }
            self.scan_decimal_digits(&mut num_str);
        }

        if !is_float {
            if let Ok(int) = num_str.parse::<i64>() {
                return Ok(NumericValue::Integer(int));
            }
        }
        num_str
            .parse::<f64>()
            .map(NumericValue::Float)
            .map_err(|_| self.error(ErrorKind::InvalidNumber, "Invalid numeric literal"))
    }

    fn scan_decimal_digits(&mut self, num_str: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                if ch != '_' {
                    num_str.push(ch);
                }
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_radix_digits(&mut self, num_str: &mut String, radix: u32) -> Result<(), SyntaxError> {
        while let Some(ch) = self.peek() {
            if ch.is_digit(radix) || ch == '_' {
                if ch != '_' {
                    num_str.push(ch);
                }
                self.advance();
            } else {
                break;
            }
        }
        if num_str.is_empty() {
            return Err(self.error(ErrorKind::InvalidNumber, "Missing digits after radix prefix"));
        }
        Ok(())
    }

    fn radix_value(&self, digits: &str, radix: u32) -> Result<NumericValue, SyntaxError> {
        match i64::from_str_radix(digits, radix) {
            Ok(int) => Ok(NumericValue::Integer(int)),
            // Out of i64 range: fall back to a double, digit by digit
            Err(_) => {
                let mut value = 0f64;
                for ch in digits.chars() {
                    let digit = ch
                        .to_digit(radix)
                        .ok_or_else(|| self.error(ErrorKind::InvalidNumber, "Invalid digit"))?;
                    value = value * f64::from(radix) + f64::from(digit);
                }
                Ok(NumericValue::Float(value))
            }
        }
    }

    fn scan_identifier(&mut self, first: char) -> TokenKind {
        let mut name = String::new();
        name.push(first);

        while let Some(ch) = self.peek() {
            if is_id_continue(ch) {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match name.as_str() {
            // Literals
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,

            "let" => TokenKind::Let,
            "const" => TokenKind::Const,
            "var" => TokenKind::Var,
            "function" => TokenKind::Function,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "try" => TokenKind::Try,
            "catch" => TokenKind::Catch,
            "finally" => TokenKind::Finally,
            "throw" => TokenKind::Throw,
            "new" => TokenKind::New,
            "this" => TokenKind::This,
            "super" => TokenKind::Super,
            "class" => TokenKind::Class,
            "extends" => TokenKind::Extends,
            "static" => TokenKind::Static,
            "import" => TokenKind::Import,
            "export" => TokenKind::Export,
            "from" => TokenKind::From,
            "as" => TokenKind::As,
            "typeof" => TokenKind::Typeof,
            "instanceof" => TokenKind::Instanceof,
            "in" => TokenKind::In,
            "of" => TokenKind::Of,
            "void" => TokenKind::Void,
            "delete" => TokenKind::Delete,
            "yield" => TokenKind::Yield,
            "await" => TokenKind::Await,
            "async" => TokenKind::Async,
            "debugger" => TokenKind::Debugger,
            "with" => TokenKind::With,

            _ => TokenKind::Identifier(name),
        }
    }
}

/// Check if a character can start an identifier
fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_start(ch)
}

/// Check if a character can continue an identifier
fn is_id_continue(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_continue(ch)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[allow(clippy::unwrap_used)]
    fn lex(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut tokens = vec![];
        loop {
            let token = lexer.next_token().unwrap();
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push(token.kind);
        }
        tokens
    }

    fn int(value: i64, raw: &str) -> TokenKind {
        TokenKind::Number {
            value: NumericValue::Integer(value),
            raw: raw.to_string(),
        }
    }

    fn float(value: f64, raw: &str) -> TokenKind {
        TokenKind::Number {
            value: NumericValue::Float(value),
            raw: raw.to_string(),
        }
    }

    #[test]
    fn integer_and_float_split() {
        assert_eq!(lex("42"), vec![int(42, "42")]);
        assert_eq!(lex("3.14"), vec![float(3.14, "3.14")]);
        assert_eq!(lex("1e10"), vec![float(1e10, "1e10")]);
        assert_eq!(lex("0xff"), vec![int(255, "0xff")]);
        assert_eq!(lex("0b1010"), vec![int(10, "0b1010")]);
        assert_eq!(lex("0o17"), vec![int(15, "0o17")]);
        assert_eq!(lex("1_000_000"), vec![int(1_000_000, "1_000_000")]);
    }

    #[test]
    fn member_access_on_integer() {
        // The first dot joins the number; `1..toString` is the valid form
        assert_eq!(
            lex("1..toString"),
            vec![
                float(1.0, "1."),
                TokenKind::Dot,
                TokenKind::Identifier("toString".to_string()),
            ]
        );
        let mut lexer = Lexer::new("1.toString");
        let err = lexer.next_token();
        assert!(matches!(err, Err(e) if e.kind == ErrorKind::InvalidNumber));
    }

    #[test]
    fn legacy_octal_rejected() {
        let mut lexer = Lexer::new("0777");
        let err = lexer.next_token();
        assert!(matches!(err, Err(e) if e.kind == ErrorKind::InvalidNumber));
    }

    #[test]
    fn identifier_after_number_rejected() {
        let mut lexer = Lexer::new("3in");
        let err = lexer.next_token();
        assert!(matches!(err, Err(e) if e.kind == ErrorKind::InvalidNumber));
    }

    #[test]
    fn strings_and_escapes() {
        assert_eq!(
            lex(r#""hello""#),
            vec![TokenKind::String("hello".to_string())]
        );
        assert_eq!(
            lex(r#"'line\nbreak'"#),
            vec![TokenKind::String("line\nbreak".to_string())]
        );
        assert_eq!(
            lex(r#""A\u{1F600}""#),
            vec![TokenKind::String("A\u{1F600}".to_string())]
        );
    }

    #[test]
    fn unterminated_string() {
        let mut lexer = Lexer::new("\"abc\ndef\"");
        let err = lexer.next_token();
        assert!(matches!(err, Err(e) if e.kind == ErrorKind::UnterminatedString));
    }

    #[test]
    fn octal_escape_rejected() {
        let mut lexer = Lexer::new(r#""\07""#);
        let err = lexer.next_token();
        assert!(matches!(err, Err(e) if e.kind == ErrorKind::InvalidEscape));
    }

    #[test]
    fn multi_char_operators() {
        assert_eq!(
            lex("=== !== >>> **="),
            vec![
                TokenKind::EqEqEq,
                TokenKind::BangEqEq,
                TokenKind::GtGtGt,
                TokenKind::StarStarEq,
            ]
        );
        assert_eq!(lex("&&="), vec![TokenKind::AmpAmpEq]);
        assert_eq!(lex("??="), vec![TokenKind::QuestionQuestionEq]);
        assert_eq!(lex("?."), vec![TokenKind::QuestionDot]);
    }

    #[test]
    fn optional_chain_vs_conditional_with_number() {
        assert_eq!(
            lex("a ? .5 : 1"),
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::Question,
                float(0.5, ".5"),
                TokenKind::Colon,
                int(1, "1"),
            ]
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(
            lex("let const var with"),
            vec![
                TokenKind::Let,
                TokenKind::Const,
                TokenKind::Var,
                TokenKind::With
            ]
        );
    }

    #[test]
    fn unicode_identifiers() {
        assert_eq!(
            lex("café $x _y"),
            vec![
                TokenKind::Identifier("café".to_string()),
                TokenKind::Identifier("$x".to_string()),
                TokenKind::Identifier("_y".to_string()),
            ]
        );
    }

    #[test]
    fn newline_flag_after_line_terminator() {
        let mut lexer = Lexer::new("a\nb c");
        #[allow(clippy::unwrap_used)]
        {
            let a = lexer.next_token().unwrap();
            let b = lexer.next_token().unwrap();
            let c = lexer.next_token().unwrap();
            assert!(!a.newline_before);
            assert!(b.newline_before);
            assert!(!c.newline_before);
        }
    }

    #[test]
    fn newline_flag_through_block_comment() {
        let mut lexer = Lexer::new("a /* x\ny */ b");
        #[allow(clippy::unwrap_used)]
        {
            let _a = lexer.next_token().unwrap();
            let b = lexer.next_token().unwrap();
            assert!(b.newline_before);
        }
    }

    #[test]
    fn unterminated_block_comment() {
        let mut lexer = Lexer::new("/* never closed");
        let err = lexer.next_token();
        assert!(matches!(err, Err(e) if e.kind == ErrorKind::UnterminatedComment));
    }

    #[test]
    fn template_chunks() {
        assert_eq!(
            lex("`hello`"),
            vec![TokenKind::TemplateNoSub(TemplateChunk {
                raw: "hello".to_string(),
                cooked: Some("hello".to_string()),
            })]
        );
        assert_eq!(
            lex("`a${"),
            vec![TokenKind::TemplateHead(TemplateChunk {
                raw: "a".to_string(),
                cooked: Some("a".to_string()),
            })]
        );
    }

    #[test]
    fn template_raw_keeps_escapes() {
        assert_eq!(
            lex(r"`a\n`"),
            vec![TokenKind::TemplateNoSub(TemplateChunk {
                raw: "a\\n".to_string(),
                cooked: Some("a\n".to_string()),
            })]
        );
    }

    #[test]
    fn template_invalid_escape_cooks_to_none() {
        assert_eq!(
            lex(r"`\u{}`"),
            vec![TokenKind::TemplateNoSub(TemplateChunk {
                raw: "\\u{}".to_string(),
                cooked: None,
            })]
        );
    }

    #[test]
    fn rescan_slash_as_regex() {
        #[allow(clippy::unwrap_used)]
        {
            let mut lexer = Lexer::new("/[/]/i");
            let slash = lexer.next_token().unwrap();
            assert_eq!(slash.kind, TokenKind::Slash);
            let regex = lexer.rescan_as_regex(slash.span).unwrap();
            assert_eq!(
                regex.kind,
                TokenKind::RegExp {
                    pattern: "[/]".to_string(),
                    flags: "i".to_string(),
                }
            );
        }
    }

    #[test]
    fn unterminated_regex() {
        #[allow(clippy::unwrap_used)]
        {
            let mut lexer = Lexer::new("/abc");
            let slash = lexer.next_token().unwrap();
            let err = lexer.rescan_as_regex(slash.span);
            assert!(matches!(err, Err(e) if e.kind == ErrorKind::UnterminatedRegExp));
        }
    }

    #[test]
    fn checkpoint_restore_roundtrip() {
        #[allow(clippy::unwrap_used)]
        {
            let mut lexer = Lexer::new("a + b");
            let _a = lexer.next_token().unwrap();
            let cp = lexer.checkpoint();
            let plus = lexer.next_token().unwrap();
            assert_eq!(plus.kind, TokenKind::Plus);
            lexer.restore(cp);
            let plus_again = lexer.next_token().unwrap();
            assert_eq!(plus_again.kind, TokenKind::Plus);
        }
    }
}
