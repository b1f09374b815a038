//! Parser for JavaScript source code.
//!
//! Uses recursive descent with Pratt parsing for expressions. Parsing is
//! all-or-nothing: the first malformed construct aborts with a
//! [`SyntaxError`] and no partial tree is produced.

use std::collections::HashSet;
use std::mem;

use crate::ast::*;
use crate::error::{ErrorKind, SyntaxError};
use crate::lexer::{Lexer, Span, Token, TokenKind};

/// What the surrounding code permits at the point being parsed.
///
/// A fresh frame is installed on every function boundary: loops, switches
/// and labels do not cross into nested functions, while strict mode is
/// inherited and can only be turned on, never off.
#[derive(Debug, Clone, Default)]
struct ContextFrame {
    in_function: bool,
    in_generator: bool,
    in_async: bool,
    in_loop: bool,
    in_switch: bool,
    strict: bool,
    /// Suppresses the `in` operator while parsing a `for` head.
    no_in: bool,
    /// Visible label names, with whether each labels an iteration statement.
    labels: Vec<(String, bool)>,
}

/// A binary-level operator: either a plain binary operator or one of the
/// short-circuiting logical operators, which build a different node.
enum BinaryOperator {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

/// Parser for JavaScript source code
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: Token,
    context: ContextFrame,
    source_type: SourceType,
    seen_export_default: bool,
    /// Spans of expressions that were written inside grouping parens.
    /// No Parenthesized node exists, so this is how later checks learn
    /// that `(a ?? b) || c` was grouped.
    grouped: HashSet<(usize, usize)>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, source_type: SourceType) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        let context = ContextFrame {
            strict: source_type == SourceType::Module,
            // Top-level await is legal in modules.
            in_async: source_type == SourceType::Module,
            ..ContextFrame::default()
        };
        Ok(Self {
            lexer,
            current,
            previous: Token::eof(0, 1, 1, false),
            context,
            source_type,
            seen_export_default: false,
            grouped: HashSet::new(),
        })
    }

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let directives = self.parse_directive_prologue()?;
        if directives.iter().any(|d| d.value.value == "use strict") {
            self.context.strict = true;
        }

        let mut body = Vec::new();
        while !self.is_at_end() {
            body.push(self.parse_program_item()?);
        }

        let span = Span::new(0, self.lexer.source().len(), 1, 1);
        Ok(Program {
            body,
            directives,
            source_type: self.source_type,
            span,
        })
    }

    fn parse_program_item(&mut self) -> Result<ProgramItem, SyntaxError> {
        // `import(...)` is a dynamic import expression, not a declaration
        if self.check(&TokenKind::Import) && !self.peek_is(&TokenKind::LParen) {
            self.require_module()?;
            let decl = self.parse_import_declaration()?;
            return Ok(ProgramItem::ModuleDeclaration(ModuleDeclaration::Import(
                decl,
            )));
        }
        if self.check(&TokenKind::Export) {
            self.require_module()?;
            return Ok(ProgramItem::ModuleDeclaration(
                self.parse_export_declaration()?,
            ));
        }
        Ok(ProgramItem::Statement(self.parse_statement()?))
    }

    fn require_module(&self) -> Result<(), SyntaxError> {
        if self.source_type == SourceType::Module {
            Ok(())
        } else {
            Err(self.error(
                ErrorKind::UnexpectedToken,
                "'import' and 'export' may appear only with sourceType: module",
            ))
        }
    }

    /// Consume leading string-literal statements as directives.
    ///
    /// A string literal only counts when the whole statement is that
    /// literal; `"a".length;` or `"a" + b;` roll back and parse as
    /// ordinary expression statements.
    fn parse_directive_prologue(&mut self) -> Result<Vec<Directive>, SyntaxError> {
        let mut directives = Vec::new();

        while matches!(self.current.kind, TokenKind::String(_)) {
            let checkpoint = self.lexer.checkpoint();
            let saved_current = self.current.clone();
            let saved_previous = self.previous.clone();

            let start = self.current.span;
            let expr = self.parse_expression()?;
            if let Expression::String(lit) = &expr {
                if self.expect_semicolon().is_ok() {
                    directives.push(Directive {
                        value: DirectiveLiteral {
                            value: lit.value.clone(),
                            span: lit.span,
                        },
                        span: self.span_from(start),
                    });
                    continue;
                }
            }

            self.lexer.restore(checkpoint);
            self.current = saved_current;
            self.previous = saved_previous;
            break;
        }

        Ok(directives)
    }

    // ============ STATEMENTS ============

    fn parse_statement(&mut self) -> Result<Statement, SyntaxError> {
        // Decorators can only precede a class declaration
        if self.check(&TokenKind::At) {
            let decorators = self.parse_decorators()?;
            if !self.check(&TokenKind::Class) {
                return Err(self.error(
                    ErrorKind::UnexpectedToken,
                    "Decorators must be attached to a class declaration",
                ));
            }
            let mut decl = self.parse_class_declaration(true)?;
            decl.decorators = decorators;
            return Ok(Statement::ClassDeclaration(decl));
        }

        // Labeled statement: identifier followed by a colon
        if self.check_identifier() && self.peek_is(&TokenKind::Colon) {
            return self.parse_labeled_statement();
        }

        if self.check(&TokenKind::Async) && self.peek_is(&TokenKind::Function) {
            let start = self.current.span;
            self.advance()?;
            let mut decl = self.parse_function_declaration(true, true)?;
            decl.span = self.span_from(start);
            return Ok(Statement::FunctionDeclaration(decl));
        }

        match &self.current.kind {
            TokenKind::LBrace => {
                let block = self.parse_block_statement()?;
                Ok(Statement::Block(block))
            }
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let decl = self.parse_variable_declaration(false)?;
                self.expect_semicolon()?;
                Ok(Statement::VariableDeclaration(decl))
            }
            TokenKind::Function => {
                let decl = self.parse_function_declaration(false, true)?;
                Ok(Statement::FunctionDeclaration(decl))
            }
            TokenKind::Class => {
                let decl = self.parse_class_declaration(true)?;
                Ok(Statement::ClassDeclaration(decl))
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::With => self.parse_with_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::Semicolon => {
                let span = self.current.span;
                self.advance()?;
                Ok(Statement::Empty(span))
            }
            TokenKind::Debugger => {
                let start = self.current.span;
                self.advance()?;
                self.expect_semicolon()?;
                Ok(Statement::Debugger(self.span_from(start)))
            }
            _ => {
                let start = self.current.span;
                let expression = self.parse_expression()?;
                self.expect_semicolon()?;
                Ok(Statement::Expression(ExpressionStatement {
                    expression,
                    span: self.span_from(start),
                }))
            }
        }
    }

    fn parse_block_statement(&mut self) -> Result<BlockStatement, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::LBrace)?;

        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        self.require_token(&TokenKind::RBrace)?;
        Ok(BlockStatement {
            body,
            directives: Vec::new(),
            span: self.span_from(start),
        })
    }

    fn parse_labeled_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        let label = self.parse_identifier()?;
        self.require_token(&TokenKind::Colon)?;

        let labels_loop = self.label_targets_loop();
        self.context.labels.push((label.name.clone(), labels_loop));
        let body = self.parse_statement();
        self.context.labels.pop();
        let body = Box::new(body?);

        Ok(Statement::Labeled(LabeledStatement {
            label,
            body,
            span: self.span_from(start),
        }))
    }

    /// Whether the statement a label introduces is an iteration
    /// statement, looking through any further `name:` prefixes so that
    /// `a: b: for (;;) continue a;` sees `a` as a loop label.
    fn label_targets_loop(&mut self) -> bool {
        fn is_label_name(kind: &TokenKind) -> bool {
            matches!(
                kind,
                TokenKind::Identifier(_)
                    | TokenKind::From
                    | TokenKind::As
                    | TokenKind::Of
                    | TokenKind::Async
                    | TokenKind::Static
            )
        }

        if matches!(
            self.current.kind,
            TokenKind::For | TokenKind::While | TokenKind::Do
        ) {
            return true;
        }
        if !is_label_name(&self.current.kind) {
            return false;
        }

        // `current` may start another labeled statement; scan ahead
        // through `name :` pairs without consuming anything.
        let checkpoint = self.lexer.checkpoint();
        let mut targets_loop = false;
        loop {
            match self.lexer.next_token() {
                Ok(token) if token.kind == TokenKind::Colon => {}
                _ => break,
            }
            match self.lexer.next_token() {
                Ok(token) => match token.kind {
                    TokenKind::For | TokenKind::While | TokenKind::Do => {
                        targets_loop = true;
                        break;
                    }
                    kind if is_label_name(&kind) => {}
                    _ => break,
                },
                Err(_) => break,
            }
        }
        self.lexer.restore(checkpoint);
        targets_loop
    }

    fn parse_variable_declaration(
        &mut self,
        for_head: bool,
    ) -> Result<VariableDeclaration, SyntaxError> {
        let start = self.current.span;
        let kind = match self.current.kind {
            TokenKind::Var => VariableKind::Var,
            TokenKind::Let => VariableKind::Let,
            TokenKind::Const => VariableKind::Const,
            _ => return Err(self.unexpected_token("'var', 'let' or 'const'")),
        };
        self.advance()?;

        let mut declarations = Vec::new();
        loop {
            let decl_start = self.current.span;
            let id = self.parse_binding_pattern()?;

            let init = if self.match_token(&TokenKind::Eq)? {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };

            if init.is_none() && !for_head {
                if kind == VariableKind::Const {
                    return Err(self.error_at(
                        ErrorKind::UnexpectedToken,
                        "Missing initializer in const declaration",
                        decl_start,
                    ));
                }
                if !matches!(id, Pattern::Identifier(_)) {
                    return Err(self.error_at(
                        ErrorKind::UnexpectedToken,
                        "Missing initializer in destructuring declaration",
                        decl_start,
                    ));
                }
            }

            declarations.push(VariableDeclarator {
                id,
                init,
                span: self.span_from(decl_start),
            });

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(VariableDeclaration {
            kind,
            declarations,
            span: self.span_from(start),
        })
    }

    fn parse_if_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::If)?;
        self.require_token(&TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.require_token(&TokenKind::RParen)?;

        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.match_token(&TokenKind::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Statement::If(IfStatement {
            test,
            consequent,
            alternate,
            span: self.span_from(start),
        }))
    }

    fn parse_switch_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Switch)?;
        self.require_token(&TokenKind::LParen)?;
        let discriminant = self.parse_expression()?;
        self.require_token(&TokenKind::RParen)?;

        let saved = self.context.in_switch;
        self.context.in_switch = true;
        let cases = self.parse_switch_cases();
        self.context.in_switch = saved;

        Ok(Statement::Switch(SwitchStatement {
            discriminant,
            cases: cases?,
            span: self.span_from(start),
        }))
    }

    fn parse_switch_cases(&mut self) -> Result<Vec<SwitchCase>, SyntaxError> {
        self.require_token(&TokenKind::LBrace)?;

        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let start = self.current.span;
            let test = if self.match_token(&TokenKind::Case)? {
                Some(self.parse_expression()?)
            } else if self.check(&TokenKind::Default) {
                if seen_default {
                    return Err(self.error(
                        ErrorKind::UnexpectedToken,
                        "Multiple default clauses in switch statement",
                    ));
                }
                seen_default = true;
                self.advance()?;
                None
            } else {
                return Err(self.unexpected_token("'case' or 'default'"));
            };
            self.require_token(&TokenKind::Colon)?;

            let mut consequent = Vec::new();
            while !matches!(
                self.current.kind,
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
            ) {
                consequent.push(self.parse_statement()?);
            }

            cases.push(SwitchCase {
                test,
                consequent,
                span: self.span_from(start),
            });
        }

        self.require_token(&TokenKind::RBrace)?;
        Ok(cases)
    }

    fn parse_for_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::For)?;

        let await_ = if self.check(&TokenKind::Await) {
            if !self.context.in_async {
                return Err(self.error(
                    ErrorKind::IllegalAwait,
                    "'for await' is only allowed within async functions",
                ));
            }
            self.advance()?;
            true
        } else {
            false
        };

        self.require_token(&TokenKind::LParen)?;

        // Declaration head
        if matches!(
            self.current.kind,
            TokenKind::Var | TokenKind::Let | TokenKind::Const
        ) {
            self.context.no_in = true;
            let decl = self.parse_variable_declaration(true);
            self.context.no_in = false;
            let decl = decl?;

            if self.check(&TokenKind::In) || self.check(&TokenKind::Of) {
                let of = self.check(&TokenKind::Of);
                if decl.declarations.len() != 1 {
                    return Err(self.error_at(
                        ErrorKind::UnexpectedToken,
                        "Only a single declaration is allowed in a for-in/of loop head",
                        decl.span,
                    ));
                }
                if decl.declarations.iter().any(|d| d.init.is_some()) {
                    return Err(self.error_at(
                        ErrorKind::UnexpectedToken,
                        "The loop variable of a for-in/of loop cannot have an initializer",
                        decl.span,
                    ));
                }
                return self.parse_for_in_of_tail(start, ForHead::Variable(decl), of, await_);
            }

            if await_ {
                return Err(self.unexpected_token("'of'"));
            }
            self.require_token(&TokenKind::Semicolon)?;
            return self.parse_for_tail(start, Some(ForInit::Variable(decl)));
        }

        // Empty init
        if self.match_token(&TokenKind::Semicolon)? {
            if await_ {
                return Err(self.unexpected_token("'of'"));
            }
            return self.parse_for_tail(start, None);
        }

        // Expression head
        self.context.no_in = true;
        let expr = self.parse_expression();
        self.context.no_in = false;
        let expr = expr?;

        if self.check(&TokenKind::In) || self.check(&TokenKind::Of) {
            let of = self.check(&TokenKind::Of);
            let pattern = self.expression_to_pattern(expr)?;
            return self.parse_for_in_of_tail(start, ForHead::Pattern(pattern), of, await_);
        }

        if await_ {
            return Err(self.unexpected_token("'of'"));
        }
        self.require_token(&TokenKind::Semicolon)?;
        self.parse_for_tail(start, Some(ForInit::Expression(expr)))
    }

    /// The `test; update) body` part of a classic `for` loop.
    fn parse_for_tail(
        &mut self,
        start: Span,
        init: Option<ForInit>,
    ) -> Result<Statement, SyntaxError> {
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.require_token(&TokenKind::Semicolon)?;

        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.require_token(&TokenKind::RParen)?;

        let body = Box::new(self.parse_loop_body()?);
        Ok(Statement::For(ForStatement {
            init,
            test,
            update,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_for_in_of_tail(
        &mut self,
        start: Span,
        left: ForHead,
        of: bool,
        await_: bool,
    ) -> Result<Statement, SyntaxError> {
        if await_ && !of {
            return Err(self.unexpected_token("'of'"));
        }
        self.advance()?; // `in` or `of`

        let right = if of {
            self.parse_assignment_expression()?
        } else {
            self.parse_expression()?
        };
        self.require_token(&TokenKind::RParen)?;

        let body = Box::new(self.parse_loop_body()?);
        let span = self.span_from(start);
        if of {
            Ok(Statement::ForOf(ForOfStatement {
                left,
                right,
                body,
                await_,
                span,
            }))
        } else {
            Ok(Statement::ForIn(ForInStatement {
                left,
                right,
                body,
                span,
            }))
        }
    }

    fn parse_while_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::While)?;
        self.require_token(&TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.require_token(&TokenKind::RParen)?;

        let body = Box::new(self.parse_loop_body()?);
        Ok(Statement::While(WhileStatement {
            test,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_do_while_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Do)?;

        let body = Box::new(self.parse_loop_body()?);

        self.require_token(&TokenKind::While)?;
        self.require_token(&TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.require_token(&TokenKind::RParen)?;
        // The trailing semicolon is always optional after do-while
        self.match_token(&TokenKind::Semicolon)?;

        Ok(Statement::DoWhile(DoWhileStatement {
            body,
            test,
            span: self.span_from(start),
        }))
    }

    fn parse_loop_body(&mut self) -> Result<Statement, SyntaxError> {
        let saved = self.context.in_loop;
        self.context.in_loop = true;
        let body = self.parse_statement();
        self.context.in_loop = saved;
        body
    }

    fn parse_try_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Try)?;
        let block = self.parse_block_statement()?;

        let handler = if self.check(&TokenKind::Catch) {
            let catch_start = self.current.span;
            self.advance()?;
            let param = if self.match_token(&TokenKind::LParen)? {
                let pattern = self.parse_binding_pattern()?;
                self.require_token(&TokenKind::RParen)?;
                Some(pattern)
            } else {
                None
            };
            let body = self.parse_block_statement()?;
            Some(CatchClause {
                param,
                body,
                span: self.span_from(catch_start),
            })
        } else {
            None
        };

        let finalizer = if self.match_token(&TokenKind::Finally)? {
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.error(
                ErrorKind::MalformedTry,
                "Missing catch or finally after try",
            ));
        }

        Ok(Statement::Try(TryStatement {
            block,
            handler,
            finalizer,
            span: self.span_from(start),
        }))
    }

    fn parse_with_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        if self.context.strict {
            return Err(self.error(
                ErrorKind::StrictModeViolation,
                "'with' statements are not allowed in strict mode",
            ));
        }
        self.require_token(&TokenKind::With)?;
        self.require_token(&TokenKind::LParen)?;
        let object = self.parse_expression()?;
        self.require_token(&TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        Ok(Statement::With(WithStatement {
            object,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_return_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        if !self.context.in_function {
            return Err(self.error(ErrorKind::IllegalReturn, "'return' outside of function"));
        }
        self.advance()?;

        let argument = if self.current.newline_before
            || matches!(
                self.current.kind,
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
            ) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon()?;

        Ok(Statement::Return(ReturnStatement {
            argument,
            span: self.span_from(start),
        }))
    }

    fn parse_break_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        self.advance()?;

        let label = self.parse_jump_label()?;
        match &label {
            Some(label) => {
                if !self.context.labels.iter().any(|(name, _)| name == &label.name) {
                    return Err(self.error_at(
                        ErrorKind::IllegalBreak,
                        format!("Undefined label '{}'", label.name),
                        label.span,
                    ));
                }
            }
            None => {
                if !self.context.in_loop && !self.context.in_switch {
                    return Err(self.error_at(
                        ErrorKind::IllegalBreak,
                        "Illegal break statement",
                        start,
                    ));
                }
            }
        }
        self.expect_semicolon()?;

        Ok(Statement::Break(BreakStatement {
            label,
            span: self.span_from(start),
        }))
    }

    fn parse_continue_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        self.advance()?;

        let label = self.parse_jump_label()?;
        match &label {
            Some(label) => {
                if !self
                    .context
                    .labels
                    .iter()
                    .any(|(name, is_loop)| name == &label.name && *is_loop)
                {
                    return Err(self.error_at(
                        ErrorKind::IllegalContinue,
                        format!("'continue' label '{}' does not name a loop", label.name),
                        label.span,
                    ));
                }
            }
            None => {
                if !self.context.in_loop {
                    return Err(self.error_at(
                        ErrorKind::IllegalContinue,
                        "Illegal continue statement",
                        start,
                    ));
                }
            }
        }
        self.expect_semicolon()?;

        Ok(Statement::Continue(ContinueStatement {
            label,
            span: self.span_from(start),
        }))
    }

    /// Optional label after `break`/`continue`; a newline ends the
    /// statement first (restricted production).
    fn parse_jump_label(&mut self) -> Result<Option<Identifier>, SyntaxError> {
        if !self.current.newline_before && self.check_identifier() {
            Ok(Some(self.parse_identifier()?))
        } else {
            Ok(None)
        }
    }

    fn parse_throw_statement(&mut self) -> Result<Statement, SyntaxError> {
        let start = self.current.span;
        self.advance()?;

        if self.current.newline_before {
            return Err(self.error(ErrorKind::NewlineAfterThrow, "Illegal newline after throw"));
        }
        let argument = self.parse_expression()?;
        self.expect_semicolon()?;

        Ok(Statement::Throw(ThrowStatement {
            argument,
            span: self.span_from(start),
        }))
    }

    // ============ MODULES ============

    fn parse_import_declaration(&mut self) -> Result<ImportDeclaration, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Import)?;

        // Side-effect import: import "module";
        if matches!(self.current.kind, TokenKind::String(_)) {
            let source = self.parse_string_literal()?;
            self.expect_semicolon()?;
            return Ok(ImportDeclaration {
                specifiers: Vec::new(),
                source,
                span: self.span_from(start),
            });
        }

        let mut specifiers = Vec::new();

        if self.check_identifier() {
            let spec_start = self.current.span;
            let local = self.parse_identifier()?;
            specifiers.push(ImportSpecifier::Default(ImportDefaultSpecifier {
                local,
                span: self.span_from(spec_start),
            }));
            if self.match_token(&TokenKind::Comma)? {
                self.parse_non_default_import_specifiers(&mut specifiers)?;
            }
        } else {
            self.parse_non_default_import_specifiers(&mut specifiers)?;
        }

        self.require_token(&TokenKind::From)?;
        let source = self.parse_string_literal()?;
        self.expect_semicolon()?;

        Ok(ImportDeclaration {
            specifiers,
            source,
            span: self.span_from(start),
        })
    }

    /// `* as ns` or `{ a, b as c }` after `import` (or after `default,`).
    fn parse_non_default_import_specifiers(
        &mut self,
        specifiers: &mut Vec<ImportSpecifier>,
    ) -> Result<(), SyntaxError> {
        if self.check(&TokenKind::Star) {
            let spec_start = self.current.span;
            self.advance()?;
            self.require_token(&TokenKind::As)?;
            let local = self.parse_identifier()?;
            specifiers.push(ImportSpecifier::Namespace(ImportNamespaceSpecifier {
                local,
                span: self.span_from(spec_start),
            }));
            return Ok(());
        }

        self.require_token(&TokenKind::LBrace)?;
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let spec_start = self.current.span;
            // Any keyword is a valid module export name: { default as d }
            let imported = self.parse_identifier_name()?;
            let local = if self.match_token(&TokenKind::As)? {
                self.parse_identifier()?
            } else {
                imported.clone()
            };
            specifiers.push(ImportSpecifier::Named(ImportNamedSpecifier {
                local,
                imported,
                span: self.span_from(spec_start),
            }));

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.require_token(&TokenKind::RBrace)?;
        Ok(())
    }

    fn parse_export_declaration(&mut self) -> Result<ModuleDeclaration, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Export)?;

        // export * from "module";
        if self.match_token(&TokenKind::Star)? {
            self.require_token(&TokenKind::From)?;
            let source = self.parse_string_literal()?;
            self.expect_semicolon()?;
            return Ok(ModuleDeclaration::ExportAll(ExportAllDeclaration {
                source,
                span: self.span_from(start),
            }));
        }

        // export default ...
        if self.check(&TokenKind::Default) {
            if self.seen_export_default {
                return Err(self.error(
                    ErrorKind::DuplicateExportDefault,
                    "Only one default export is allowed per module",
                ));
            }
            self.seen_export_default = true;
            self.advance()?;

            let declaration = if self.check(&TokenKind::Function) {
                DefaultDeclaration::Function(self.parse_function_declaration(false, false)?)
            } else if self.check(&TokenKind::Async) && self.peek_is(&TokenKind::Function) {
                let fn_start = self.current.span;
                self.advance()?;
                let mut decl = self.parse_function_declaration(true, false)?;
                decl.span = self.span_from(fn_start);
                DefaultDeclaration::Function(decl)
            } else if self.check(&TokenKind::Class) || self.check(&TokenKind::At) {
                let decorators = self.parse_decorators()?;
                let mut decl = self.parse_class_declaration(false)?;
                decl.decorators = decorators;
                DefaultDeclaration::Class(decl)
            } else {
                let expr = self.parse_assignment_expression()?;
                self.expect_semicolon()?;
                DefaultDeclaration::Expression(Box::new(expr))
            };
            return Ok(ModuleDeclaration::ExportDefault(ExportDefaultDeclaration {
                declaration,
                span: self.span_from(start),
            }));
        }

        // export { a, b as c } [from "module"];
        if self.check(&TokenKind::LBrace) {
            let specifiers = self.parse_export_specifiers()?;
            let source = if self.match_token(&TokenKind::From)? {
                Some(self.parse_string_literal()?)
            } else {
                None
            };
            self.expect_semicolon()?;
            return Ok(ModuleDeclaration::ExportNamed(ExportNamedDeclaration {
                declaration: None,
                specifiers,
                source,
                span: self.span_from(start),
            }));
        }

        // export <declaration>
        let declaration = if matches!(
            self.current.kind,
            TokenKind::Var | TokenKind::Let | TokenKind::Const
        ) {
            let decl = self.parse_variable_declaration(false)?;
            self.expect_semicolon()?;
            Statement::VariableDeclaration(decl)
        } else if self.check(&TokenKind::Function) {
            Statement::FunctionDeclaration(self.parse_function_declaration(false, true)?)
        } else if self.check(&TokenKind::Async) && self.peek_is(&TokenKind::Function) {
            let fn_start = self.current.span;
            self.advance()?;
            let mut decl = self.parse_function_declaration(true, true)?;
            decl.span = self.span_from(fn_start);
            Statement::FunctionDeclaration(decl)
        } else if self.check(&TokenKind::Class) {
            Statement::ClassDeclaration(self.parse_class_declaration(true)?)
        } else {
            return Err(self.error(
                ErrorKind::MalformedExport,
                "Expected a declaration, '{', '*' or 'default' after 'export'",
            ));
        };

        Ok(ModuleDeclaration::ExportNamed(ExportNamedDeclaration {
            declaration: Some(Box::new(declaration)),
            specifiers: Vec::new(),
            source: None,
            span: self.span_from(start),
        }))
    }

    fn parse_export_specifiers(&mut self) -> Result<Vec<ExportSpecifier>, SyntaxError> {
        self.require_token(&TokenKind::LBrace)?;

        let mut specifiers = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let spec_start = self.current.span;
            let local = self.parse_identifier_name()?;
            let exported = if self.match_token(&TokenKind::As)? {
                self.parse_identifier_name()?
            } else {
                local.clone()
            };
            specifiers.push(ExportSpecifier {
                local,
                exported,
                span: self.span_from(spec_start),
            });

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.require_token(&TokenKind::RBrace)?;
        Ok(specifiers)
    }

    // ============ FUNCTIONS & CLASSES ============

    /// `function [*] [name] (params) { body }`, the `async` keyword (if
    /// any) having been consumed by the caller.
    fn parse_function_declaration(
        &mut self,
        is_async: bool,
        require_id: bool,
    ) -> Result<FunctionDeclaration, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Function)?;
        let generator = self.match_token(&TokenKind::Star)?;

        let id = if self.check_identifier() {
            Some(self.parse_identifier()?)
        } else if require_id {
            return Err(self.unexpected_token("function name"));
        } else {
            None
        };

        let (params, body) = self.parse_function_tail(generator, is_async)?;
        Ok(FunctionDeclaration {
            id,
            params,
            body,
            generator,
            async_: is_async,
            span: self.span_from(start),
        })
    }

    fn parse_function_expression(
        &mut self,
        start: Span,
        is_async: bool,
    ) -> Result<Expression, SyntaxError> {
        self.require_token(&TokenKind::Function)?;
        let generator = self.match_token(&TokenKind::Star)?;

        let id = if self.check_identifier() {
            Some(self.parse_identifier()?)
        } else {
            None
        };

        let (params, body) = self.parse_function_tail(generator, is_async)?;
        Ok(Expression::Function(FunctionExpression {
            id,
            params,
            body,
            generator,
            async_: is_async,
            span: self.span_from(start),
        }))
    }

    /// Parameter list plus body, run inside a fresh function context.
    fn parse_function_tail(
        &mut self,
        generator: bool,
        is_async: bool,
    ) -> Result<(Vec<Pattern>, BlockStatement), SyntaxError> {
        let params = self.parse_function_params()?;

        let saved = self.context.clone();
        self.context = ContextFrame {
            in_function: true,
            in_generator: generator,
            in_async: is_async,
            strict: saved.strict,
            ..ContextFrame::default()
        };
        let body = self.parse_function_body();
        self.context = saved;

        Ok((params, body?))
    }

    fn parse_function_params(&mut self) -> Result<Vec<Pattern>, SyntaxError> {
        self.require_token(&TokenKind::LParen)?;

        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            if self.check(&TokenKind::DotDotDot) {
                let rest_start = self.current.span;
                self.advance()?;
                let argument = Box::new(self.parse_binding_pattern()?);
                params.push(Pattern::Rest(RestElement {
                    argument,
                    span: self.span_from(rest_start),
                }));
                if self.check(&TokenKind::Comma) {
                    return Err(self.error(
                        ErrorKind::RestNotLast,
                        "Rest parameter must be the last parameter",
                    ));
                }
                break;
            }

            params.push(self.parse_binding_element()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.require_token(&TokenKind::RParen)?;

        let mut seen = HashSet::new();
        for param in &params {
            self.check_duplicate_params(param, &mut seen)?;
        }
        Ok(params)
    }

    fn check_duplicate_params(
        &self,
        pattern: &Pattern,
        seen: &mut HashSet<String>,
    ) -> Result<(), SyntaxError> {
        match pattern {
            Pattern::Identifier(id) => {
                if !seen.insert(id.name.clone()) {
                    return Err(self.error_at(
                        ErrorKind::DuplicateParameter,
                        format!("Duplicate parameter name '{}'", id.name),
                        id.span,
                    ));
                }
                Ok(())
            }
            Pattern::Object(obj) => {
                for property in &obj.properties {
                    match property {
                        ObjectPatternProperty::Property(p) => {
                            self.check_duplicate_params(&p.value, seen)?;
                        }
                        ObjectPatternProperty::Rest(r) => {
                            self.check_duplicate_params(&r.argument, seen)?;
                        }
                    }
                }
                Ok(())
            }
            Pattern::Array(arr) => {
                for element in arr.elements.iter().flatten() {
                    self.check_duplicate_params(element, seen)?;
                }
                Ok(())
            }
            Pattern::Rest(rest) => self.check_duplicate_params(&rest.argument, seen),
            Pattern::Assignment(assign) => self.check_duplicate_params(&assign.left, seen),
            Pattern::Member(_) => Ok(()),
        }
    }

    /// Function body block, with its own directive prologue.
    fn parse_function_body(&mut self) -> Result<BlockStatement, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::LBrace)?;

        let directives = self.parse_directive_prologue()?;
        if directives.iter().any(|d| d.value.value == "use strict") {
            self.context.strict = true;
        }

        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }
        self.require_token(&TokenKind::RBrace)?;

        Ok(BlockStatement {
            body,
            directives,
            span: self.span_from(start),
        })
    }

    fn parse_class_declaration(
        &mut self,
        require_id: bool,
    ) -> Result<ClassDeclaration, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Class)?;

        let id = if self.check_identifier() {
            Some(self.parse_identifier()?)
        } else if require_id {
            return Err(self.unexpected_token("class name"));
        } else {
            None
        };

        // Everything inside a class is strict-mode code
        let saved_strict = self.context.strict;
        self.context.strict = true;

        let result = self.parse_class_heritage_and_body();
        self.context.strict = saved_strict;
        let (super_class, body) = result?;

        Ok(ClassDeclaration {
            id,
            super_class,
            body,
            decorators: Vec::new(),
            span: self.span_from(start),
        })
    }

    #[allow(clippy::type_complexity)]
    fn parse_class_heritage_and_body(
        &mut self,
    ) -> Result<(Option<Box<Expression>>, ClassBody), SyntaxError> {
        let super_class = if self.match_token(&TokenKind::Extends)? {
            Some(Box::new(self.parse_left_hand_side_expression()?))
        } else {
            None
        };
        let body = self.parse_class_body()?;
        Ok((super_class, body))
    }

    fn parse_class_body(&mut self) -> Result<ClassBody, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::LBrace)?;

        let mut body = Vec::new();
        let mut seen_constructor = false;
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.match_token(&TokenKind::Semicolon)? {
                continue;
            }

            let member = self.parse_class_member()?;
            if let ClassMember::Method(method) = &member {
                if method.kind == ClassMethodKind::Constructor {
                    if seen_constructor {
                        return Err(self.error_at(
                            ErrorKind::DuplicateConstructor,
                            "Duplicate constructor in the same class",
                            method.span,
                        ));
                    }
                    seen_constructor = true;
                }
            }
            body.push(member);
        }

        self.require_token(&TokenKind::RBrace)?;
        Ok(ClassBody {
            body,
            span: self.span_from(start),
        })
    }

    fn parse_class_member(&mut self) -> Result<ClassMember, SyntaxError> {
        let start = self.current.span;
        let decorators = self.parse_decorators()?;

        // Each of `static`, `async`, `get` and `set` can itself be a
        // member name; they are modifiers only when a name follows.
        let static_ = self.check(&TokenKind::Static) && !self.peek_terminates_member_name();
        if static_ {
            self.advance()?;
        }

        let is_async = self.check(&TokenKind::Async) && !self.peek_terminates_member_name();
        if is_async {
            self.advance()?;
        }
        let generator = self.match_token(&TokenKind::Star)?;

        let accessor = if !is_async
            && !generator
            && (self.check_keyword("get") || self.check_keyword("set"))
            && !self.peek_terminates_member_name()
        {
            let kind = if self.check_keyword("get") {
                ClassMethodKind::Get
            } else {
                ClassMethodKind::Set
            };
            self.advance()?;
            Some(kind)
        } else {
            None
        };

        // Private member: #name
        if self.check(&TokenKind::Hash) {
            let hash_span = self.current.span;
            self.advance()?;
            let id = self.parse_identifier_name()?;
            let key_span = Span::new(hash_span.start, id.span.end, hash_span.line, hash_span.column);
            if id.name == "constructor" {
                return Err(self.error_at(
                    ErrorKind::UnexpectedToken,
                    "Classes cannot have a private member named '#constructor'",
                    key_span,
                ));
            }
            let key = PrivateName { id, span: key_span };

            if self.check(&TokenKind::LParen) {
                let kind = accessor.unwrap_or(ClassMethodKind::Method);
                let (params, body) = self.parse_function_tail(generator, is_async)?;
                self.check_accessor_params(kind.as_str(), &params, key.span)?;
                return Ok(ClassMember::PrivateMethod(ClassPrivateMethod {
                    key,
                    params,
                    body,
                    kind,
                    static_,
                    generator,
                    async_: is_async,
                    decorators,
                    span: self.span_from(start),
                }));
            }

            if accessor.is_some() || generator || is_async {
                return Err(self.unexpected_token("'('"));
            }
            let value = if self.match_token(&TokenKind::Eq)? {
                Some(self.allow_in(|p| p.parse_assignment_expression())?)
            } else {
                None
            };
            self.expect_semicolon()?;
            return Ok(ClassMember::PrivateProperty(ClassPrivateProperty {
                key,
                value,
                static_,
                span: self.span_from(start),
            }));
        }

        let (key, computed) = self.parse_property_key()?;

        if self.check(&TokenKind::LParen) {
            let kind = if let Some(kind) = accessor {
                kind
            } else if !static_ && !computed && Self::is_constructor_key(&key) {
                ClassMethodKind::Constructor
            } else {
                ClassMethodKind::Method
            };

            if kind == ClassMethodKind::Constructor && (generator || is_async) {
                return Err(self.error_at(
                    ErrorKind::UnexpectedToken,
                    "Class constructor cannot be a generator or async method",
                    key.span(),
                ));
            }

            let (params, body) = self.parse_function_tail(generator, is_async)?;
            self.check_accessor_params(kind.as_str(), &params, key.span())?;
            return Ok(ClassMember::Method(ClassMethod {
                key,
                params,
                body,
                kind,
                computed,
                static_,
                generator,
                async_: is_async,
                decorators,
                span: self.span_from(start),
            }));
        }

        // Class field
        if accessor.is_some() || generator || is_async {
            return Err(self.unexpected_token("'('"));
        }
        let value = if self.match_token(&TokenKind::Eq)? {
            Some(self.allow_in(|p| p.parse_assignment_expression())?)
        } else {
            None
        };
        self.expect_semicolon()?;
        Ok(ClassMember::Property(ClassProperty {
            key,
            value,
            computed,
            static_,
            decorators,
            span: self.span_from(start),
        }))
    }

    fn is_constructor_key(key: &PropertyKey) -> bool {
        match key {
            PropertyKey::Identifier(id) => id.name == "constructor",
            PropertyKey::String(s) => s.value == "constructor",
            _ => false,
        }
    }

    fn check_accessor_params(
        &self,
        kind: &str,
        params: &[Pattern],
        span: Span,
    ) -> Result<(), SyntaxError> {
        match kind {
            "get" if !params.is_empty() => Err(self.error_at(
                ErrorKind::UnexpectedToken,
                "Getter must not have any formal parameters",
                span,
            )),
            "set" if params.len() != 1 => Err(self.error_at(
                ErrorKind::UnexpectedToken,
                "Setter must have exactly one formal parameter",
                span,
            )),
            "set" if matches!(params.first(), Some(Pattern::Rest(_))) => Err(self.error_at(
                ErrorKind::UnexpectedToken,
                "Setter cannot have a rest parameter",
                span,
            )),
            _ => Ok(()),
        }
    }

    // ============ DECORATORS ============

    /// `@expression` where the expression is an identifier, member
    /// access, or call.
    fn parse_decorator(&mut self) -> Result<Decorator, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::At)?;
        let expression = self.parse_left_hand_side_expression()?;
        Ok(Decorator {
            expression,
            span: self.span_from(start),
        })
    }

    fn parse_decorators(&mut self) -> Result<Vec<Decorator>, SyntaxError> {
        let mut decorators = Vec::new();
        while self.check(&TokenKind::At) {
            decorators.push(self.parse_decorator()?);
        }
        Ok(decorators)
    }

    // ============ PATTERNS ============

    fn parse_binding_pattern(&mut self) -> Result<Pattern, SyntaxError> {
        match &self.current.kind {
            TokenKind::LBrace => self.parse_object_pattern(),
            TokenKind::LBracket => self.parse_array_pattern(),
            _ => Ok(Pattern::Identifier(self.parse_identifier()?)),
        }
    }

    /// A binding pattern with an optional `= default`.
    fn parse_binding_element(&mut self) -> Result<Pattern, SyntaxError> {
        let start = self.current.span;
        let pattern = self.parse_binding_pattern()?;

        if self.match_token(&TokenKind::Eq)? {
            let right = Box::new(self.parse_assignment_expression()?);
            return Ok(Pattern::Assignment(AssignmentPattern {
                left: Box::new(pattern),
                right,
                span: self.span_from(start),
            }));
        }
        Ok(pattern)
    }

    fn parse_object_pattern(&mut self) -> Result<Pattern, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::LBrace)?;

        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.check(&TokenKind::DotDotDot) {
                let rest_start = self.current.span;
                self.advance()?;
                // Object rest only binds a plain identifier
                let argument = Box::new(Pattern::Identifier(self.parse_identifier()?));
                properties.push(ObjectPatternProperty::Rest(RestElement {
                    argument,
                    span: self.span_from(rest_start),
                }));
                if self.check(&TokenKind::Comma) {
                    return Err(self.error(
                        ErrorKind::RestNotLast,
                        "Rest element must be last element",
                    ));
                }
                break;
            }

            let prop_start = self.current.span;
            let (key, computed) = self.parse_property_key()?;

            let (value, shorthand) = if self.match_token(&TokenKind::Colon)? {
                (self.parse_binding_element()?, false)
            } else {
                let id = match &key {
                    PropertyKey::Identifier(id) if !computed => id.clone(),
                    _ => return Err(self.unexpected_token("':'")),
                };
                let pattern = if self.match_token(&TokenKind::Eq)? {
                    let right = Box::new(self.parse_assignment_expression()?);
                    Pattern::Assignment(AssignmentPattern {
                        left: Box::new(Pattern::Identifier(id)),
                        right,
                        span: self.span_from(prop_start),
                    })
                } else {
                    Pattern::Identifier(id)
                };
                (pattern, true)
            };

            properties.push(ObjectPatternProperty::Property(AssignmentProperty {
                key,
                value: Box::new(value),
                computed,
                shorthand,
                span: self.span_from(prop_start),
            }));

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        self.require_token(&TokenKind::RBrace)?;
        Ok(Pattern::Object(ObjectPattern {
            properties,
            span: self.span_from(start),
        }))
    }

    fn parse_array_pattern(&mut self) -> Result<Pattern, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::LBracket)?;

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.is_at_end() {
            if self.match_token(&TokenKind::Comma)? {
                elements.push(None);
                continue;
            }

            if self.check(&TokenKind::DotDotDot) {
                let rest_start = self.current.span;
                self.advance()?;
                let argument = Box::new(self.parse_binding_pattern()?);
                elements.push(Some(Pattern::Rest(RestElement {
                    argument,
                    span: self.span_from(rest_start),
                })));
                if self.check(&TokenKind::Comma) {
                    return Err(self.error(
                        ErrorKind::RestNotLast,
                        "Rest element must be last element",
                    ));
                }
                break;
            }

            elements.push(Some(self.parse_binding_element()?));
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        self.require_token(&TokenKind::RBracket)?;
        Ok(Pattern::Array(ArrayPattern {
            elements,
            span: self.span_from(start),
        }))
    }

    /// Reinterpret an already-parsed expression as an assignment target.
    ///
    /// Covering grammar: `[a, b] = x` parses its left side as an array
    /// literal first; this converts it (or rejects it) once the `=` is
    /// seen.
    fn expression_to_pattern(&self, expr: Expression) -> Result<Pattern, SyntaxError> {
        match expr {
            Expression::Identifier(id) => Ok(Pattern::Identifier(id)),
            Expression::Member(member) => {
                if member.optional {
                    return Err(self.error_at(
                        ErrorKind::InvalidOptionalChain,
                        "Optional chain is not a valid assignment target",
                        member.span,
                    ));
                }
                Ok(Pattern::Member(member))
            }
            Expression::Array(arr) => {
                let total = arr.elements.len();
                let mut elements = Vec::with_capacity(total);
                for (index, element) in arr.elements.into_iter().enumerate() {
                    match element {
                        None => elements.push(None),
                        Some(ArrayElement::Expression(e)) => {
                            elements.push(Some(self.expression_to_pattern(e)?));
                        }
                        Some(ArrayElement::Spread(spread)) => {
                            if index + 1 != total {
                                return Err(self.error_at(
                                    ErrorKind::RestNotLast,
                                    "Rest element must be last element",
                                    spread.span,
                                ));
                            }
                            let argument =
                                Box::new(self.expression_to_pattern(*spread.argument)?);
                            elements.push(Some(Pattern::Rest(RestElement {
                                argument,
                                span: spread.span,
                            })));
                        }
                    }
                }
                Ok(Pattern::Array(ArrayPattern {
                    elements,
                    span: arr.span,
                }))
            }
            Expression::Object(obj) => {
                let total = obj.properties.len();
                let mut properties = Vec::with_capacity(total);
                for (index, member) in obj.properties.into_iter().enumerate() {
                    match member {
                        ObjectMember::Property(p) => {
                            let value = Box::new(self.expression_to_pattern(*p.value)?);
                            properties.push(ObjectPatternProperty::Property(AssignmentProperty {
                                key: p.key,
                                value,
                                computed: p.computed,
                                shorthand: p.shorthand,
                                span: p.span,
                            }));
                        }
                        ObjectMember::Spread(spread) => {
                            if index + 1 != total {
                                return Err(self.error_at(
                                    ErrorKind::RestNotLast,
                                    "Rest element must be last element",
                                    spread.span,
                                ));
                            }
                            let argument = self.expression_to_pattern(*spread.argument)?;
                            if !matches!(argument, Pattern::Identifier(_) | Pattern::Member(_)) {
                                return Err(self.error_at(
                                    ErrorKind::PatternConversion,
                                    "Invalid rest element in destructuring pattern",
                                    spread.span,
                                ));
                            }
                            properties.push(ObjectPatternProperty::Rest(RestElement {
                                argument: Box::new(argument),
                                span: spread.span,
                            }));
                        }
                        ObjectMember::Method(m) => {
                            return Err(self.error_at(
                                ErrorKind::PatternConversion,
                                "Object method is not a valid assignment target",
                                m.span,
                            ));
                        }
                    }
                }
                Ok(Pattern::Object(ObjectPattern {
                    properties,
                    span: obj.span,
                }))
            }
            Expression::Assignment(assign) => {
                if assign.operator != AssignmentOp::Assign {
                    return Err(self.error_at(
                        ErrorKind::PatternConversion,
                        "Compound assignment is not a valid destructuring default",
                        assign.span,
                    ));
                }
                let left = match assign.left {
                    AssignmentTarget::Pattern(pattern) => pattern,
                    AssignmentTarget::Expression(e) => self.expression_to_pattern(*e)?,
                };
                Ok(Pattern::Assignment(AssignmentPattern {
                    left: Box::new(left),
                    right: assign.right,
                    span: assign.span,
                }))
            }
            other => Err(self.error_at(
                ErrorKind::PatternConversion,
                "Invalid assignment target",
                other.span(),
            )),
        }
    }

    // ============ EXPRESSIONS ============

    /// Full expression, including comma sequences.
    fn parse_expression(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        let first = self.parse_assignment_expression()?;

        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }

        let mut expressions = vec![first];
        while self.match_token(&TokenKind::Comma)? {
            expressions.push(self.parse_assignment_expression()?);
        }

        Ok(Expression::Sequence(SequenceExpression {
            expressions,
            span: self.span_from(start),
        }))
    }

    fn parse_assignment_expression(&mut self) -> Result<Expression, SyntaxError> {
        if self.check(&TokenKind::Yield) {
            return self.parse_yield_expression();
        }

        let start = self.current.span;
        let expr = self.parse_conditional_expression()?;

        if let Some(operator) = self.current_assignment_op() {
            self.advance()?;
            let right = Box::new(self.parse_assignment_expression()?);

            // Plain `=` accepts destructuring patterns; the compound
            // operators only accept an identifier or member expression.
            let left = if operator == AssignmentOp::Assign {
                AssignmentTarget::Pattern(self.expression_to_pattern(expr)?)
            } else {
                match expr {
                    Expression::Identifier(_) | Expression::Member(_) => {
                        AssignmentTarget::Expression(Box::new(expr))
                    }
                    other => {
                        return Err(self.error_at(
                            ErrorKind::PatternConversion,
                            "Invalid left-hand side in assignment",
                            other.span(),
                        ));
                    }
                }
            };

            return Ok(Expression::Assignment(AssignmentExpression {
                operator,
                left,
                right,
                span: self.span_from(start),
            }));
        }

        Ok(expr)
    }

    fn parse_yield_expression(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        if !self.context.in_generator {
            return Err(self.error(
                ErrorKind::IllegalYield,
                "'yield' is only allowed within generator functions",
            ));
        }
        self.advance()?;

        let delegate = self.match_token(&TokenKind::Star)?;
        let argument = if delegate {
            Some(Box::new(self.parse_assignment_expression()?))
        } else if self.current.newline_before
            || matches!(
                self.current.kind,
                TokenKind::Semicolon
                    | TokenKind::RParen
                    | TokenKind::RBracket
                    | TokenKind::RBrace
                    | TokenKind::Comma
                    | TokenKind::Colon
                    | TokenKind::Eof
            ) {
            None
        } else {
            Some(Box::new(self.parse_assignment_expression()?))
        };

        Ok(Expression::Yield(YieldExpression {
            argument,
            delegate,
            span: self.span_from(start),
        }))
    }

    fn parse_conditional_expression(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        let test = self.parse_binary_expression(0)?;

        if self.match_token(&TokenKind::Question)? {
            // Between `?` and `:` the `in` operator is always allowed,
            // even inside a `for` head.
            let consequent = Box::new(self.allow_in(|p| p.parse_assignment_expression())?);
            self.require_token(&TokenKind::Colon)?;
            let alternate = Box::new(self.parse_assignment_expression()?);
            return Ok(Expression::Conditional(ConditionalExpression {
                test: Box::new(test),
                consequent,
                alternate,
                span: self.span_from(start),
            }));
        }

        Ok(test)
    }

    fn parse_binary_expression(&mut self, min_prec: u8) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        let mut left = self.parse_unary_expression()?;

        while let Some((op, prec)) = self.current_binary_op() {
            if prec < min_prec {
                break;
            }
            self.advance()?;

            // `**` is right-associative, everything else left
            let next_prec = if matches!(op, BinaryOperator::Binary(BinaryOp::Exp)) {
                prec
            } else {
                prec + 1
            };
            let right = self.parse_binary_expression(next_prec)?;
            let span = self.span_from(start);

            left = match op {
                BinaryOperator::Binary(operator) => Expression::Binary(BinaryExpression {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                    span,
                }),
                BinaryOperator::Logical(operator) => {
                    self.check_nullish_mixing(operator, &left)?;
                    self.check_nullish_mixing(operator, &right)?;
                    Expression::Logical(LogicalExpression {
                        operator,
                        left: Box::new(left),
                        right: Box::new(right),
                        span,
                    })
                }
            };
        }

        Ok(left)
    }

    /// `a ?? b || c` and friends need parentheses; an operand that is
    /// itself `&&`/`||` under `??` (or vice versa) is only legal when it
    /// was written parenthesized.
    fn check_nullish_mixing(
        &self,
        operator: LogicalOp,
        operand: &Expression,
    ) -> Result<(), SyntaxError> {
        if let Expression::Logical(inner) = operand {
            let mixed = (operator == LogicalOp::Nullish)
                != (inner.operator == LogicalOp::Nullish);
            if mixed && !self.grouped.contains(&(inner.span.start, inner.span.end)) {
                return Err(self.error_at(
                    ErrorKind::UnexpectedToken,
                    "Nullish coalescing operator cannot be mixed with '&&' or '||' without parentheses",
                    inner.span,
                ));
            }
        }
        Ok(())
    }

    fn parse_unary_expression(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;

        if let Some(operator) = self.current_unary_op() {
            self.advance()?;
            let argument = Box::new(self.parse_unary_expression()?);

            if operator == UnaryOp::Delete && self.context.strict {
                if let Expression::Identifier(id) = argument.as_ref() {
                    return Err(self.error_at(
                        ErrorKind::StrictModeViolation,
                        "Deleting a plain variable in strict mode",
                        id.span,
                    ));
                }
            }

            return Ok(Expression::Unary(UnaryExpression {
                operator,
                argument,
                span: self.span_from(start),
            }));
        }

        if let Some(operator) = self.current_update_op() {
            self.advance()?;
            let argument = self.parse_unary_expression()?;
            if !matches!(argument, Expression::Identifier(_) | Expression::Member(_)) {
                return Err(self.error_at(
                    ErrorKind::PatternConversion,
                    "Invalid left-hand side in prefix operation",
                    argument.span(),
                ));
            }
            return Ok(Expression::Update(UpdateExpression {
                operator,
                argument: Box::new(argument),
                prefix: true,
                span: self.span_from(start),
            }));
        }

        if self.check(&TokenKind::Await) {
            if !self.context.in_async {
                return Err(self.error(
                    ErrorKind::IllegalAwait,
                    "'await' is only allowed within async functions and at the top level of modules",
                ));
            }
            self.advance()?;
            let argument = Box::new(self.parse_unary_expression()?);
            return Ok(Expression::Await(AwaitExpression {
                argument,
                span: self.span_from(start),
            }));
        }

        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        let expr = self.parse_left_hand_side_expression()?;

        // Postfix ++/-- must be on the same line as its operand
        if !self.current.newline_before {
            if let Some(operator) = self.current_update_op() {
                if !matches!(expr, Expression::Identifier(_) | Expression::Member(_)) {
                    return Err(self.error_at(
                        ErrorKind::PatternConversion,
                        "Invalid left-hand side in postfix operation",
                        expr.span(),
                    ));
                }
                self.advance()?;
                return Ok(Expression::Update(UpdateExpression {
                    operator,
                    argument: Box::new(expr),
                    prefix: false,
                    span: self.span_from(start),
                }));
            }
        }

        Ok(expr)
    }

    fn parse_left_hand_side_expression(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;

        let mut expr = match &self.current.kind {
            TokenKind::New => self.parse_new_expression()?,
            TokenKind::Super => self.parse_super_prefix()?,
            TokenKind::Import => self.parse_import_call()?,
            _ => self.parse_primary_expression()?,
        };

        let mut in_optional_chain = false;
        loop {
            match &self.current.kind {
                TokenKind::Dot => {
                    self.advance()?;
                    let property = self.parse_member_property()?;
                    expr = Expression::Member(MemberExpression {
                        object: MemberObject::Expression(Box::new(expr)),
                        computed: false,
                        property,
                        optional: false,
                        span: self.span_from(start),
                    });
                }
                TokenKind::LBracket => {
                    self.advance()?;
                    let property = self.allow_in(|p| p.parse_expression())?;
                    self.require_token(&TokenKind::RBracket)?;
                    expr = Expression::Member(MemberExpression {
                        object: MemberObject::Expression(Box::new(expr)),
                        property: MemberProperty::Expression(Box::new(property)),
                        computed: true,
                        optional: false,
                        span: self.span_from(start),
                    });
                }
                TokenKind::LParen => {
                    let arguments = self.parse_call_arguments()?;
                    expr = Expression::Call(CallExpression {
                        callee: Callee::Expression(Box::new(expr)),
                        arguments,
                        optional: false,
                        span: self.span_from(start),
                    });
                }
                TokenKind::QuestionDot => {
                    self.advance()?;
                    in_optional_chain = true;

                    if self.check(&TokenKind::LParen) {
                        let arguments = self.parse_call_arguments()?;
                        expr = Expression::Call(CallExpression {
                            callee: Callee::Expression(Box::new(expr)),
                            arguments,
                            optional: true,
                            span: self.span_from(start),
                        });
                    } else if self.match_token(&TokenKind::LBracket)? {
                        let property = self.allow_in(|p| p.parse_expression())?;
                        self.require_token(&TokenKind::RBracket)?;
                        expr = Expression::Member(MemberExpression {
                            object: MemberObject::Expression(Box::new(expr)),
                            property: MemberProperty::Expression(Box::new(property)),
                            computed: true,
                            optional: true,
                            span: self.span_from(start),
                        });
                    } else {
                        let property = self.parse_member_property()?;
                        expr = Expression::Member(MemberExpression {
                            object: MemberObject::Expression(Box::new(expr)),
                            computed: false,
                            property,
                            optional: true,
                            span: self.span_from(start),
                        });
                    }
                }
                TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_) => {
                    if in_optional_chain {
                        return Err(self.error(
                            ErrorKind::InvalidOptionalChain,
                            "Tagged template literals are not allowed in an optional chain",
                        ));
                    }
                    let quasi = self.parse_template_literal_value()?;
                    expr = Expression::TaggedTemplate(TaggedTemplateExpression {
                        tag: Box::new(expr),
                        quasi,
                        span: self.span_from(start),
                    });
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Property after `.` or `?.`: an identifier name or `#private`.
    fn parse_member_property(&mut self) -> Result<MemberProperty, SyntaxError> {
        if self.check(&TokenKind::Hash) {
            let hash_span = self.current.span;
            self.advance()?;
            let id = self.parse_identifier_name()?;
            let span = Span::new(hash_span.start, id.span.end, hash_span.line, hash_span.column);
            return Ok(MemberProperty::PrivateName(PrivateName { id, span }));
        }
        // After a dot, any reserved word is a valid property name
        Ok(MemberProperty::Identifier(self.parse_identifier_name()?))
    }

    fn parse_new_expression(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::New)?;

        // new.target
        if self.match_token(&TokenKind::Dot)? {
            let property = self.parse_identifier_name()?;
            if property.name != "target" {
                return Err(self.error_at(
                    ErrorKind::UnexpectedToken,
                    format!("Unknown meta property 'new.{}'", property.name),
                    property.span,
                ));
            }
            let meta = Identifier {
                name: "new".to_string(),
                span: start,
            };
            return Ok(Expression::MetaProperty(MetaProperty {
                meta,
                property,
                span: self.span_from(start),
            }));
        }

        if self.check(&TokenKind::Import) {
            return Err(self.error(
                ErrorKind::UnexpectedToken,
                "'new' cannot be used with a dynamic import",
            ));
        }
        if self.check(&TokenKind::Super) {
            return Err(self.error(ErrorKind::UnexpectedToken, "'super' is not a constructor"));
        }

        let callee = Box::new(self.parse_member_expression_for_new()?);
        let arguments = if self.check(&TokenKind::LParen) {
            self.parse_call_arguments()?
        } else {
            Vec::new()
        };

        Ok(Expression::New(NewExpression {
            callee,
            arguments,
            optional: false,
            span: self.span_from(start),
        }))
    }

    /// The callee of `new`: member accesses bind to the callee, calls do
    /// not, and optional chains are forbidden.
    fn parse_member_expression_for_new(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        let mut expr = if self.check(&TokenKind::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };

        loop {
            match &self.current.kind {
                TokenKind::Dot => {
                    self.advance()?;
                    let property = self.parse_member_property()?;
                    expr = Expression::Member(MemberExpression {
                        object: MemberObject::Expression(Box::new(expr)),
                        computed: false,
                        property,
                        optional: false,
                        span: self.span_from(start),
                    });
                }
                TokenKind::LBracket => {
                    self.advance()?;
                    let property = self.allow_in(|p| p.parse_expression())?;
                    self.require_token(&TokenKind::RBracket)?;
                    expr = Expression::Member(MemberExpression {
                        object: MemberObject::Expression(Box::new(expr)),
                        property: MemberProperty::Expression(Box::new(property)),
                        computed: true,
                        optional: false,
                        span: self.span_from(start),
                    });
                }
                TokenKind::QuestionDot => {
                    return Err(self.error(
                        ErrorKind::InvalidOptionalChain,
                        "Optional chain cannot appear in the callee of new",
                    ));
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// `super(...)`, `super.x` or `super[x]`.
    fn parse_super_prefix(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Super)?;
        let sup = Super { span: start };

        if self.check(&TokenKind::LParen) {
            let arguments = self.parse_call_arguments()?;
            return Ok(Expression::Call(CallExpression {
                callee: Callee::Super(sup),
                arguments,
                optional: false,
                span: self.span_from(start),
            }));
        }
        if self.match_token(&TokenKind::Dot)? {
            let property = self.parse_identifier_name()?;
            return Ok(Expression::Member(MemberExpression {
                object: MemberObject::Super(sup),
                property: MemberProperty::Identifier(property),
                computed: false,
                optional: false,
                span: self.span_from(start),
            }));
        }
        if self.match_token(&TokenKind::LBracket)? {
            let property = self.allow_in(|p| p.parse_expression())?;
            self.require_token(&TokenKind::RBracket)?;
            return Ok(Expression::Member(MemberExpression {
                object: MemberObject::Super(sup),
                property: MemberProperty::Expression(Box::new(property)),
                computed: true,
                optional: false,
                span: self.span_from(start),
            }));
        }

        Err(self.unexpected_token("'(', '.' or '['"))
    }

    /// Dynamic import: `import(...)`. Bare `import` is not an expression.
    fn parse_import_call(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Import)?;
        if !self.check(&TokenKind::LParen) {
            return Err(self.unexpected_token("'('"));
        }

        let imp = Import { span: start };
        let arguments = self.parse_call_arguments()?;
        Ok(Expression::Call(CallExpression {
            callee: Callee::Import(imp),
            arguments,
            optional: false,
            span: self.span_from(start),
        }))
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Argument>, SyntaxError> {
        self.require_token(&TokenKind::LParen)?;

        let mut arguments = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            if self.check(&TokenKind::DotDotDot) {
                let spread_start = self.current.span;
                self.advance()?;
                let argument = Box::new(self.allow_in(|p| p.parse_assignment_expression())?);
                arguments.push(Argument::Spread(SpreadElement {
                    argument,
                    span: self.span_from(spread_start),
                }));
            } else {
                arguments.push(Argument::Expression(
                    self.allow_in(|p| p.parse_assignment_expression())?,
                ));
            }

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        self.require_token(&TokenKind::RParen)?;
        Ok(arguments)
    }

    fn parse_primary_expression(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;

        match &self.current.kind {
            TokenKind::Number { value, raw } => {
                let value = *value;
                let raw = raw.clone();
                self.advance()?;
                Ok(Expression::Numeric(NumericLiteral {
                    value,
                    raw,
                    span: start,
                }))
            }
            TokenKind::String(s) => {
                let value = s.clone();
                self.advance()?;
                Ok(Expression::String(StringLiteral { value, span: start }))
            }
            TokenKind::True => {
                self.advance()?;
                Ok(Expression::Boolean(BooleanLiteral {
                    value: true,
                    span: start,
                }))
            }
            TokenKind::False => {
                self.advance()?;
                Ok(Expression::Boolean(BooleanLiteral {
                    value: false,
                    span: start,
                }))
            }
            TokenKind::Null => {
                self.advance()?;
                Ok(Expression::Null(NullLiteral { span: start }))
            }
            TokenKind::This => {
                self.advance()?;
                Ok(Expression::This(ThisExpression { span: start }))
            }

            // A `/` where an expression is expected starts a regexp; the
            // lexer rescans from this position.
            TokenKind::Slash | TokenKind::SlashEq => {
                let token = self.lexer.rescan_as_regex(self.current.span)?;
                let TokenKind::RegExp { pattern, flags } = token.kind.clone() else {
                    return Err(self.unexpected_token("regular expression"));
                };
                let span = token.span;
                self.previous = token;
                self.current = self.lexer.next_token()?;
                Ok(Expression::RegExp(RegExpLiteral {
                    pattern,
                    flags,
                    span,
                }))
            }

            TokenKind::Identifier(_)
            | TokenKind::From
            | TokenKind::As
            | TokenKind::Of
            | TokenKind::Static => {
                let id = self.parse_identifier()?;

                // Single-parameter arrow function: id => body
                if self.check(&TokenKind::Arrow) && !self.current.newline_before {
                    return self.parse_arrow_function_from_params(
                        vec![Pattern::Identifier(id)],
                        start,
                        false,
                    );
                }
                Ok(Expression::Identifier(id))
            }

            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::LParen => self.parse_parenthesized_or_arrow(),
            TokenKind::Async => self.parse_async_expression(),
            TokenKind::Function => self.parse_function_expression(start, false),

            TokenKind::Class => {
                let decl = self.parse_class_declaration(false)?;
                Ok(Expression::Class(ClassExpression {
                    id: decl.id,
                    super_class: decl.super_class,
                    body: decl.body,
                    decorators: Vec::new(),
                    span: decl.span,
                }))
            }
            TokenKind::At => {
                let decorators = self.parse_decorators()?;
                if !self.check(&TokenKind::Class) {
                    return Err(self.error(
                        ErrorKind::UnexpectedToken,
                        "Decorators must be attached to a class",
                    ));
                }
                let decl = self.parse_class_declaration(false)?;
                Ok(Expression::Class(ClassExpression {
                    id: decl.id,
                    super_class: decl.super_class,
                    body: decl.body,
                    decorators,
                    span: self.span_from(start),
                }))
            }

            TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_) => {
                let template = self.parse_template_literal_value()?;
                Ok(Expression::Template(template))
            }

            _ => Err(self.unexpected_token("expression")),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::LBracket)?;

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.is_at_end() {
            if self.match_token(&TokenKind::Comma)? {
                elements.push(None);
                continue;
            }

            if self.check(&TokenKind::DotDotDot) {
                let spread_start = self.current.span;
                self.advance()?;
                let argument = Box::new(self.allow_in(|p| p.parse_assignment_expression())?);
                elements.push(Some(ArrayElement::Spread(SpreadElement {
                    argument,
                    span: self.span_from(spread_start),
                })));
            } else {
                elements.push(Some(ArrayElement::Expression(
                    self.allow_in(|p| p.parse_assignment_expression())?,
                )));
            }

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        self.require_token(&TokenKind::RBracket)?;
        Ok(Expression::Array(ArrayExpression {
            elements,
            span: self.span_from(start),
        }))
    }

    fn parse_object_literal(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::LBrace)?;

        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            properties.push(self.parse_object_member()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        self.require_token(&TokenKind::RBrace)?;
        Ok(Expression::Object(ObjectExpression {
            properties,
            span: self.span_from(start),
        }))
    }

    fn parse_object_member(&mut self) -> Result<ObjectMember, SyntaxError> {
        let start = self.current.span;

        if self.check(&TokenKind::DotDotDot) {
            self.advance()?;
            let argument = Box::new(self.allow_in(|p| p.parse_assignment_expression())?);
            return Ok(ObjectMember::Spread(SpreadElement {
                argument,
                span: self.span_from(start),
            }));
        }

        let is_async = self.check(&TokenKind::Async) && !self.peek_terminates_property_name();
        if is_async {
            self.advance()?;
        }
        let generator = self.match_token(&TokenKind::Star)?;

        let kind = if !is_async
            && !generator
            && (self.check_keyword("get") || self.check_keyword("set"))
            && !self.peek_terminates_property_name()
        {
            let kind = if self.check_keyword("get") {
                ObjectMethodKind::Get
            } else {
                ObjectMethodKind::Set
            };
            self.advance()?;
            kind
        } else {
            ObjectMethodKind::Method
        };

        let (key, computed) = self.parse_property_key()?;

        // Method shorthand
        if self.check(&TokenKind::LParen) {
            let (params, body) = self.parse_function_tail(generator, is_async)?;
            self.check_accessor_params(kind.as_str(), &params, key.span())?;
            return Ok(ObjectMember::Method(ObjectMethod {
                key,
                params,
                body,
                kind,
                computed,
                generator,
                async_: is_async,
                span: self.span_from(start),
            }));
        }

        if kind != ObjectMethodKind::Method || generator || is_async {
            return Err(self.unexpected_token("'('"));
        }

        if self.match_token(&TokenKind::Colon)? {
            let value = Box::new(self.allow_in(|p| p.parse_assignment_expression())?);
            return Ok(ObjectMember::Property(ObjectProperty {
                key,
                value,
                computed,
                shorthand: false,
                span: self.span_from(start),
            }));
        }

        // Shorthand: { a } is { a: a }
        let id = match &key {
            PropertyKey::Identifier(id) if !computed => id.clone(),
            _ => return Err(self.unexpected_token("':'")),
        };

        if self.match_token(&TokenKind::Eq)? {
            // `{ a = 1 }` only means something as a destructuring
            // target; the default survives pattern conversion.
            let right = Box::new(self.allow_in(|p| p.parse_assignment_expression())?);
            let span = self.span_from(start);
            let value = Expression::Assignment(AssignmentExpression {
                operator: AssignmentOp::Assign,
                left: AssignmentTarget::Pattern(Pattern::Identifier(id)),
                right,
                span,
            });
            return Ok(ObjectMember::Property(ObjectProperty {
                key,
                value: Box::new(value),
                computed: false,
                shorthand: true,
                span,
            }));
        }

        Ok(ObjectMember::Property(ObjectProperty {
            key,
            value: Box::new(Expression::Identifier(id)),
            computed: false,
            shorthand: true,
            span: self.span_from(start),
        }))
    }

    fn parse_property_key(&mut self) -> Result<(PropertyKey, bool), SyntaxError> {
        if self.match_token(&TokenKind::LBracket)? {
            let expr = self.allow_in(|p| p.parse_assignment_expression())?;
            self.require_token(&TokenKind::RBracket)?;
            return Ok((PropertyKey::Computed(Box::new(expr)), true));
        }

        match &self.current.kind {
            TokenKind::String(s) => {
                let lit = StringLiteral {
                    value: s.clone(),
                    span: self.current.span,
                };
                self.advance()?;
                Ok((PropertyKey::String(lit), false))
            }
            TokenKind::Number { value, raw } => {
                let lit = NumericLiteral {
                    value: *value,
                    raw: raw.clone(),
                    span: self.current.span,
                };
                self.advance()?;
                Ok((PropertyKey::Numeric(lit), false))
            }
            _ => {
                let id = self.parse_identifier_name()?;
                Ok((PropertyKey::Identifier(id), false))
            }
        }
    }

    fn parse_parenthesized_or_arrow(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;

        // Save state for potential rollback
        let checkpoint = self.lexer.checkpoint();
        let saved_current = self.current.clone();
        let saved_previous = self.previous.clone();

        // Try arrow parameters first; roll back when no `=>` follows.
        match self.try_parse_arrow_params() {
            Ok(params) if self.check(&TokenKind::Arrow) => {
                return self.parse_arrow_function_from_params(params, start, false);
            }
            _ => {
                self.lexer.restore(checkpoint);
                self.current = saved_current;
                self.previous = saved_previous;
            }
        }

        // Parenthesized expression
        self.require_token(&TokenKind::LParen)?;
        if self.check(&TokenKind::RParen) {
            return Err(self.unexpected_token("expression"));
        }
        let expr = self.allow_in(|p| p.parse_expression())?;
        self.require_token(&TokenKind::RParen)?;
        let span = expr.span();
        self.grouped.insert((span.start, span.end));
        Ok(expr)
    }

    fn try_parse_arrow_params(&mut self) -> Result<Vec<Pattern>, SyntaxError> {
        self.require_token(&TokenKind::LParen)?;

        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            if self.check(&TokenKind::DotDotDot) {
                let rest_start = self.current.span;
                self.advance()?;
                let argument = Box::new(self.parse_binding_pattern()?);
                params.push(Pattern::Rest(RestElement {
                    argument,
                    span: self.span_from(rest_start),
                }));
                if self.check(&TokenKind::Comma) {
                    return Err(self.error(
                        ErrorKind::RestNotLast,
                        "Rest parameter must be the last parameter",
                    ));
                }
                break;
            }

            params.push(self.parse_binding_element()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        self.require_token(&TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_arrow_function_from_params(
        &mut self,
        params: Vec<Pattern>,
        start: Span,
        is_async: bool,
    ) -> Result<Expression, SyntaxError> {
        let mut seen = HashSet::new();
        for param in &params {
            self.check_duplicate_params(param, &mut seen)?;
        }

        self.require_token(&TokenKind::Arrow)?;

        let saved = self.context.clone();
        // An arrow function is never a generator and has its own
        // async-ness; loops and labels do not cross in.
        self.context = ContextFrame {
            in_function: true,
            in_async: is_async,
            strict: saved.strict,
            ..ContextFrame::default()
        };
        let body = if self.check(&TokenKind::LBrace) {
            self.parse_function_body().map(ArrowBody::Block)
        } else {
            self.parse_assignment_expression()
                .map(|e| ArrowBody::Expression(Box::new(e)))
        };
        self.context = saved;

        Ok(Expression::ArrowFunction(ArrowFunctionExpression {
            params,
            body: body?,
            async_: is_async,
            span: self.span_from(start),
        }))
    }

    /// Disambiguate what follows the `async` keyword in expression
    /// position: a function expression, an arrow function, or a plain
    /// identifier named `async`.
    fn parse_async_expression(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.current.span;
        self.require_token(&TokenKind::Async)?;

        // `async => x` is a plain arrow whose parameter is named `async`
        if self.check(&TokenKind::Arrow) && !self.current.newline_before {
            let id = Identifier {
                name: "async".to_string(),
                span: start,
            };
            return self.parse_arrow_function_from_params(
                vec![Pattern::Identifier(id)],
                start,
                false,
            );
        }

        if self.check(&TokenKind::Function) && !self.current.newline_before {
            return self.parse_function_expression(start, true);
        }

        // async x => ...
        if self.check_identifier()
            && !self.current.newline_before
            && self.peek_is(&TokenKind::Arrow)
        {
            let id = self.parse_identifier()?;
            return self.parse_arrow_function_from_params(
                vec![Pattern::Identifier(id)],
                start,
                true,
            );
        }

        // async (...) => ..., or a call of a function named `async`
        if self.check(&TokenKind::LParen) && !self.current.newline_before {
            let checkpoint = self.lexer.checkpoint();
            let saved_current = self.current.clone();
            let saved_previous = self.previous.clone();

            match self.try_parse_arrow_params() {
                Ok(params) if self.check(&TokenKind::Arrow) => {
                    return self.parse_arrow_function_from_params(params, start, true);
                }
                _ => {
                    self.lexer.restore(checkpoint);
                    self.current = saved_current;
                    self.previous = saved_previous;
                }
            }
        }

        // Plain identifier; the caller's chain loop picks up `async(...)`
        Ok(Expression::Identifier(Identifier {
            name: "async".to_string(),
            span: start,
        }))
    }

    fn parse_template_literal_value(&mut self) -> Result<TemplateLiteral, SyntaxError> {
        let start = self.current.span;

        if let TokenKind::TemplateNoSub(chunk) = &self.current.kind {
            let chunk = chunk.clone();
            self.advance()?;
            return Ok(TemplateLiteral {
                quasis: vec![TemplateElement {
                    raw: chunk.raw,
                    cooked: chunk.cooked,
                    tail: true,
                    span: start,
                }],
                expressions: Vec::new(),
                span: self.span_from(start),
            });
        }

        let TokenKind::TemplateHead(chunk) = &self.current.kind else {
            return Err(self.unexpected_token("template literal"));
        };
        let head = chunk.clone();
        self.advance()?;

        let mut quasis = vec![TemplateElement {
            raw: head.raw,
            cooked: head.cooked,
            tail: false,
            span: start,
        }];
        let mut expressions = Vec::new();

        loop {
            expressions.push(self.allow_in(|p| p.parse_expression())?);

            // The `}` closing the substitution is rescanned as the start
            // of the next template piece.
            if !self.check(&TokenKind::RBrace) {
                return Err(self.unexpected_token("'}' in template literal"));
            }
            let cont = self.lexer.rescan_template_continuation(self.current.span)?;
            match &cont.kind {
                TokenKind::TemplateTail(chunk) => {
                    quasis.push(TemplateElement {
                        raw: chunk.raw.clone(),
                        cooked: chunk.cooked.clone(),
                        tail: true,
                        span: cont.span,
                    });
                    self.previous = cont;
                    self.current = self.lexer.next_token()?;
                    break;
                }
                TokenKind::TemplateMiddle(chunk) => {
                    quasis.push(TemplateElement {
                        raw: chunk.raw.clone(),
                        cooked: chunk.cooked.clone(),
                        tail: false,
                        span: cont.span,
                    });
                    self.previous = cont;
                    self.current = self.lexer.next_token()?;
                }
                _ => return Err(self.unexpected_token("template continuation")),
            }
        }

        Ok(TemplateLiteral {
            quasis,
            expressions,
            span: self.span_from(start),
        })
    }

    // ============ TOKEN HELPERS ============

    fn parse_identifier(&mut self) -> Result<Identifier, SyntaxError> {
        let span = self.current.span;
        let name = match &self.current.kind {
            TokenKind::Identifier(name) => name.clone(),
            // Contextual keywords are valid binding names
            TokenKind::From => "from".to_string(),
            TokenKind::As => "as".to_string(),
            TokenKind::Of => "of".to_string(),
            TokenKind::Async => "async".to_string(),
            TokenKind::Static => "static".to_string(),
            _ => return Err(self.unexpected_token("identifier")),
        };
        self.advance()?;
        Ok(Identifier { name, span })
    }

    /// Identifier or any keyword; reserved words are valid property
    /// names and module export names.
    fn parse_identifier_name(&mut self) -> Result<Identifier, SyntaxError> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            let span = self.current.span;
            self.advance()?;
            return Ok(Identifier { name, span });
        }

        let name = Self::keyword_name(&self.current.kind);
        if name.is_empty() {
            return Err(self.unexpected_token("identifier"));
        }
        let span = self.current.span;
        self.advance()?;
        Ok(Identifier {
            name: name.to_string(),
            span,
        })
    }

    fn keyword_name(kind: &TokenKind) -> &'static str {
        match kind {
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            TokenKind::Var => "var",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Default => "default",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::Throw => "throw",
            TokenKind::New => "new",
            TokenKind::This => "this",
            TokenKind::Super => "super",
            TokenKind::Class => "class",
            TokenKind::Extends => "extends",
            TokenKind::Static => "static",
            TokenKind::Import => "import",
            TokenKind::Export => "export",
            TokenKind::From => "from",
            TokenKind::As => "as",
            TokenKind::Typeof => "typeof",
            TokenKind::Instanceof => "instanceof",
            TokenKind::In => "in",
            TokenKind::Of => "of",
            TokenKind::Void => "void",
            TokenKind::Delete => "delete",
            TokenKind::Yield => "yield",
            TokenKind::Await => "await",
            TokenKind::Async => "async",
            TokenKind::Debugger => "debugger",
            TokenKind::With => "with",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            _ => "",
        }
    }

    fn parse_string_literal(&mut self) -> Result<StringLiteral, SyntaxError> {
        match &self.current.kind {
            TokenKind::String(s) => {
                let value = s.clone();
                let span = self.current.span;
                self.advance()?;
                Ok(StringLiteral { value, span })
            }
            _ => Err(self.unexpected_token("string")),
        }
    }

    /// Re-enable the `in` operator inside a bracketed subexpression of
    /// a `for` head: `for (let x = ("a" in b); x; )` is legal.
    fn allow_in<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        let saved = mem::replace(&mut self.context.no_in, false);
        let result = f(self);
        self.context.no_in = saved;
        result
    }

    fn advance(&mut self) -> Result<(), SyntaxError> {
        self.previous = mem::replace(&mut self.current, self.lexer.next_token()?);
        Ok(())
    }

    fn require_token(&mut self, kind: &TokenKind) -> Result<(), SyntaxError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected_token(&format!("{kind:?}")))
        }
    }

    fn expect_semicolon(&mut self) -> Result<(), SyntaxError> {
        if self.match_token(&TokenKind::Semicolon)? {
            return Ok(());
        }

        // ASI: accept at end of input, before }, or after a newline
        if self.is_at_end() || self.check(&TokenKind::RBrace) || self.current.newline_before {
            return Ok(());
        }

        Err(self.unexpected_token("';'"))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current.kind) == mem::discriminant(kind)
    }

    /// Look at the token after `current` without consuming anything.
    fn peek_is(&mut self, kind: &TokenKind) -> bool {
        let checkpoint = self.lexer.checkpoint();
        let matched = match self.lexer.next_token() {
            Ok(token) => mem::discriminant(&token.kind) == mem::discriminant(kind),
            Err(_) => false,
        };
        self.lexer.restore(checkpoint);
        matched
    }

    fn check_identifier(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Identifier(_)
                | TokenKind::From
                | TokenKind::As
                | TokenKind::Of
                | TokenKind::Async
                | TokenKind::Static
        )
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Identifier(s) if s == keyword)
    }

    fn match_token(&mut self, kind: &TokenKind) -> Result<bool, SyntaxError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn is_at_end(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    /// Whether the token after a would-be modifier (`static`, `async`,
    /// `get`, `set`) ends the member name, meaning the word was the name
    /// itself: `static = 1`, `get() {}`, `async;`.
    fn peek_terminates_member_name(&mut self) -> bool {
        let checkpoint = self.lexer.checkpoint();
        let terminated = match self.lexer.next_token() {
            Ok(token) => matches!(
                token.kind,
                TokenKind::LParen
                    | TokenKind::Eq
                    | TokenKind::Semicolon
                    | TokenKind::RBrace
                    | TokenKind::Eof
            ),
            Err(_) => true,
        };
        self.lexer.restore(checkpoint);
        terminated
    }

    /// Object-literal variant: `{ get: 1 }`, `{ async, b }` and
    /// `{ get() {} }` all use the word as the key itself.
    fn peek_terminates_property_name(&mut self) -> bool {
        let checkpoint = self.lexer.checkpoint();
        let terminated = match self.lexer.next_token() {
            Ok(token) => matches!(
                token.kind,
                TokenKind::LParen
                    | TokenKind::Colon
                    | TokenKind::Comma
                    | TokenKind::RBrace
                    | TokenKind::Eq
                    | TokenKind::Eof
            ),
            Err(_) => true,
        };
        self.lexer.restore(checkpoint);
        terminated
    }

    fn span_from(&self, start: Span) -> Span {
        Span::new(
            start.start,
            self.previous.span.end,
            start.line,
            start.column,
        )
    }

    fn error(&self, kind: ErrorKind, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(
            kind,
            message,
            self.current.span.line,
            self.current.span.column,
        )
        .with_snippet(self.lexer.source())
    }

    fn error_at(&self, kind: ErrorKind, message: impl Into<String>, span: Span) -> SyntaxError {
        SyntaxError::new(kind, message, span.line, span.column).with_snippet(self.lexer.source())
    }

    fn unexpected_token(&self, expected: &str) -> SyntaxError {
        let kind = if self.is_at_end() {
            ErrorKind::UnexpectedEof
        } else {
            ErrorKind::UnexpectedToken
        };
        self.error(
            kind,
            format!("Unexpected {:?}, expected {}", self.current.kind, expected),
        )
    }

    // ============ OPERATOR TABLES ============

    fn current_binary_op(&self) -> Option<(BinaryOperator, u8)> {
        match &self.current.kind {
            TokenKind::QuestionQuestion => Some((BinaryOperator::Logical(LogicalOp::Nullish), 4)),
            TokenKind::PipePipe => Some((BinaryOperator::Logical(LogicalOp::Or), 4)),
            TokenKind::AmpAmp => Some((BinaryOperator::Logical(LogicalOp::And), 5)),
            TokenKind::Pipe => Some((BinaryOperator::Binary(BinaryOp::BitOr), 6)),
            TokenKind::Caret => Some((BinaryOperator::Binary(BinaryOp::BitXor), 7)),
            TokenKind::Amp => Some((BinaryOperator::Binary(BinaryOp::BitAnd), 8)),
            TokenKind::EqEq => Some((BinaryOperator::Binary(BinaryOp::Eq), 9)),
            TokenKind::BangEq => Some((BinaryOperator::Binary(BinaryOp::NotEq), 9)),
            TokenKind::EqEqEq => Some((BinaryOperator::Binary(BinaryOp::StrictEq), 9)),
            TokenKind::BangEqEq => Some((BinaryOperator::Binary(BinaryOp::StrictNotEq), 9)),
            TokenKind::Lt => Some((BinaryOperator::Binary(BinaryOp::Lt), 10)),
            TokenKind::LtEq => Some((BinaryOperator::Binary(BinaryOp::LtEq), 10)),
            TokenKind::Gt => Some((BinaryOperator::Binary(BinaryOp::Gt), 10)),
            TokenKind::GtEq => Some((BinaryOperator::Binary(BinaryOp::GtEq), 10)),
            TokenKind::In if self.context.no_in => None,
            TokenKind::In => Some((BinaryOperator::Binary(BinaryOp::In), 10)),
            TokenKind::Instanceof => Some((BinaryOperator::Binary(BinaryOp::Instanceof), 10)),
            TokenKind::LtLt => Some((BinaryOperator::Binary(BinaryOp::LShift), 11)),
            TokenKind::GtGt => Some((BinaryOperator::Binary(BinaryOp::RShift), 11)),
            TokenKind::GtGtGt => Some((BinaryOperator::Binary(BinaryOp::URShift), 11)),
            TokenKind::Plus => Some((BinaryOperator::Binary(BinaryOp::Add), 12)),
            TokenKind::Minus => Some((BinaryOperator::Binary(BinaryOp::Sub), 12)),
            TokenKind::Star => Some((BinaryOperator::Binary(BinaryOp::Mul), 13)),
            TokenKind::Slash => Some((BinaryOperator::Binary(BinaryOp::Div), 13)),
            TokenKind::Percent => Some((BinaryOperator::Binary(BinaryOp::Mod), 13)),
            TokenKind::StarStar => Some((BinaryOperator::Binary(BinaryOp::Exp), 14)),
            _ => None,
        }
    }

    fn current_unary_op(&self) -> Option<UnaryOp> {
        match &self.current.kind {
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            _ => None,
        }
    }

    fn current_update_op(&self) -> Option<UpdateOp> {
        match &self.current.kind {
            TokenKind::PlusPlus => Some(UpdateOp::Increment),
            TokenKind::MinusMinus => Some(UpdateOp::Decrement),
            _ => None,
        }
    }

    fn current_assignment_op(&self) -> Option<AssignmentOp> {
        match &self.current.kind {
            TokenKind::Eq => Some(AssignmentOp::Assign),
            TokenKind::PlusEq => Some(AssignmentOp::AddAssign),
            TokenKind::MinusEq => Some(AssignmentOp::SubAssign),
            TokenKind::StarEq => Some(AssignmentOp::MulAssign),
            TokenKind::SlashEq => Some(AssignmentOp::DivAssign),
            TokenKind::PercentEq => Some(AssignmentOp::ModAssign),
            TokenKind::StarStarEq => Some(AssignmentOp::ExpAssign),
            TokenKind::AmpEq => Some(AssignmentOp::BitAndAssign),
            TokenKind::PipeEq => Some(AssignmentOp::BitOrAssign),
            TokenKind::CaretEq => Some(AssignmentOp::BitXorAssign),
            TokenKind::LtLtEq => Some(AssignmentOp::LShiftAssign),
            TokenKind::GtGtEq => Some(AssignmentOp::RShiftAssign),
            TokenKind::GtGtGtEq => Some(AssignmentOp::URShiftAssign),
            TokenKind::AmpAmpEq => Some(AssignmentOp::AndAssign),
            TokenKind::PipePipeEq => Some(AssignmentOp::OrAssign),
            TokenKind::QuestionQuestionEq => Some(AssignmentOp::NullishAssign),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source, SourceType::Script)
            .unwrap()
            .parse_program()
            .unwrap()
    }

    fn parse_module(source: &str) -> Program {
        Parser::new(source, SourceType::Module)
            .unwrap()
            .parse_program()
            .unwrap()
    }

    fn parse_err(source: &str) -> SyntaxError {
        Parser::new(source, SourceType::Script)
            .unwrap()
            .parse_program()
            .unwrap_err()
    }

    fn first_expression(program: &Program) -> &Expression {
        match program.body.first() {
            Some(ProgramItem::Statement(Statement::Expression(e))) => &e.expression,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn variable_declaration() {
        let program = parse("let x = 1;");
        assert_eq!(program.body.len(), 1);
        let Some(ProgramItem::Statement(Statement::VariableDeclaration(decl))) =
            program.body.first()
        else {
            panic!("expected variable declaration");
        };
        assert_eq!(decl.kind, VariableKind::Let);
        assert_eq!(decl.declarations.len(), 1);
    }

    #[test]
    fn const_requires_initializer() {
        let err = parse_err("const x;");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn binary_precedence() {
        let program = parse("1 + 2 * 3;");
        let Expression::Binary(add) = first_expression(&program) else {
            panic!("expected binary expression");
        };
        assert_eq!(add.operator, BinaryOp::Add);
        let Expression::Binary(mul) = add.right.as_ref() else {
            panic!("expected multiplication on the right");
        };
        assert_eq!(mul.operator, BinaryOp::Mul);
    }

    #[test]
    fn exponent_is_right_associative() {
        let program = parse("2 ** 3 ** 2;");
        let Expression::Binary(outer) = first_expression(&program) else {
            panic!("expected binary expression");
        };
        assert_eq!(outer.operator, BinaryOp::Exp);
        assert!(matches!(
            outer.right.as_ref(),
            Expression::Binary(inner) if inner.operator == BinaryOp::Exp
        ));
    }

    #[test]
    fn logical_operators_build_logical_nodes() {
        let program = parse("a && b || c;");
        let Expression::Logical(or) = first_expression(&program) else {
            panic!("expected logical expression");
        };
        assert_eq!(or.operator, LogicalOp::Or);
        assert!(matches!(
            or.left.as_ref(),
            Expression::Logical(and) if and.operator == LogicalOp::And
        ));
    }

    #[test]
    fn nullish_mixing_requires_parens() {
        let err = parse_err("a ?? b || c;");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        parse("(a ?? b) || c;");
        parse("a ?? (b || c);");
        // Parens around the whole mix do not disambiguate anything.
        let err = parse_err("(a ?? b || c);");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        let err = parse_err("f(a ?? b || c);");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn optional_chain_flags() {
        let program = parse("a?.b.c;");
        let Expression::Member(outer) = first_expression(&program) else {
            panic!("expected member expression");
        };
        assert!(!outer.optional);
        let MemberObject::Expression(inner) = &outer.object else {
            panic!("expected inner expression");
        };
        let Expression::Member(inner) = inner.as_ref() else {
            panic!("expected inner member expression");
        };
        assert!(inner.optional);
    }

    #[test]
    fn optional_call() {
        let program = parse("f?.(1);");
        let Expression::Call(call) = first_expression(&program) else {
            panic!("expected call expression");
        };
        assert!(call.optional);
        assert_eq!(call.arguments.len(), 1);
    }

    #[test]
    fn new_with_optional_chain_is_rejected() {
        let err = parse_err("new a?.b();");
        assert_eq!(err.kind, ErrorKind::InvalidOptionalChain);
    }

    #[test]
    fn destructuring_assignment() {
        let program = parse("[a, b] = x;");
        let Expression::Assignment(assign) = first_expression(&program) else {
            panic!("expected assignment");
        };
        assert!(matches!(
            &assign.left,
            AssignmentTarget::Pattern(Pattern::Array(_))
        ));
    }

    #[test]
    fn invalid_assignment_target() {
        let err = parse_err("[a + 1] = x;");
        assert_eq!(err.kind, ErrorKind::PatternConversion);
    }

    #[test]
    fn object_pattern_with_defaults_and_rest() {
        let program = parse("const {a, b = 2, ...rest} = obj;");
        let Some(ProgramItem::Statement(Statement::VariableDeclaration(decl))) =
            program.body.first()
        else {
            panic!("expected variable declaration");
        };
        let Some(VariableDeclarator {
            id: Pattern::Object(pattern),
            ..
        }) = decl.declarations.first()
        else {
            panic!("expected object pattern");
        };
        assert_eq!(pattern.properties.len(), 3);
        assert!(matches!(
            pattern.properties.last(),
            Some(ObjectPatternProperty::Rest(_))
        ));
    }

    #[test]
    fn rest_must_be_last() {
        let err = parse_err("function f(...rest, x) {}");
        assert_eq!(err.kind, ErrorKind::RestNotLast);
    }

    #[test]
    fn duplicate_parameters_rejected() {
        let err = parse_err("function f(a, a) {}");
        assert_eq!(err.kind, ErrorKind::DuplicateParameter);
    }

    #[test]
    fn try_requires_catch_or_finally() {
        let err = parse_err("try { x; }");
        assert_eq!(err.kind, ErrorKind::MalformedTry);
        parse("try { x; } finally {}");
        parse("try { x; } catch {}");
    }

    #[test]
    fn newline_after_throw() {
        let err = parse_err("throw\nx;");
        assert_eq!(err.kind, ErrorKind::NewlineAfterThrow);
    }

    #[test]
    fn postfix_update_stops_at_newline() {
        // ASI splits this into `a;` and a prefix `++b;`
        let program = parse("a\n++b;");
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn return_outside_function() {
        let err = parse_err("return 1;");
        assert_eq!(err.kind, ErrorKind::IllegalReturn);
    }

    #[test]
    fn break_outside_loop() {
        let err = parse_err("break;");
        assert_eq!(err.kind, ErrorKind::IllegalBreak);
    }

    #[test]
    fn labeled_continue_must_name_a_loop() {
        parse("outer: for (;;) { continue outer; }");
        parse("a: b: for (;;) { continue a; }");
        let err = parse_err("outer: { continue outer; }");
        assert_eq!(err.kind, ErrorKind::IllegalContinue);
        let err = parse_err("a: b: { continue a; }");
        assert_eq!(err.kind, ErrorKind::IllegalContinue);
    }

    #[test]
    fn duplicate_constructor() {
        let err = parse_err("class A { constructor() {} constructor() {} }");
        assert_eq!(err.kind, ErrorKind::DuplicateConstructor);
    }

    #[test]
    fn class_members() {
        let program = parse("class A { static x = 1; #y; get z() { return 1; } }");
        let Some(ProgramItem::Statement(Statement::ClassDeclaration(decl))) = program.body.first()
        else {
            panic!("expected class declaration");
        };
        assert_eq!(decl.body.body.len(), 3);
        assert!(matches!(
            decl.body.body.first(),
            Some(ClassMember::Property(p)) if p.static_
        ));
        assert!(matches!(
            decl.body.body.get(1),
            Some(ClassMember::PrivateProperty(_))
        ));
        assert!(matches!(
            decl.body.body.get(2),
            Some(ClassMember::Method(m)) if m.kind == ClassMethodKind::Get
        ));
    }

    #[test]
    fn directive_prologue() {
        let program = parse("\"use strict\";\n\"other\";\nx;");
        assert_eq!(program.directives.len(), 2);
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn directive_lookalike_is_an_expression() {
        let program = parse("\"use strict\".length;");
        assert!(program.directives.is_empty());
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn strict_mode_rejects_with() {
        let err = parse_err("\"use strict\"; with (a) {}");
        assert_eq!(err.kind, ErrorKind::StrictModeViolation);
    }

    #[test]
    fn arrow_functions() {
        let program = parse("const f = (a, b = 1, ...rest) => a + b;");
        assert_eq!(program.body.len(), 1);
        let program = parse("const g = x => x * 2;");
        assert_eq!(program.body.len(), 1);
        let program = parse("const h = () => ({});");
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn parenthesized_sequence_is_not_an_arrow() {
        let program = parse("(a, b);");
        assert!(matches!(first_expression(&program), Expression::Sequence(_)));
    }

    #[test]
    fn async_arrow_vs_call() {
        let program = parse("async (a) => a;");
        assert!(matches!(
            first_expression(&program),
            Expression::ArrowFunction(f) if f.async_
        ));
        let program = parse("async(a);");
        assert!(matches!(first_expression(&program), Expression::Call(_)));
        // `async` on its own is also a valid arrow parameter name.
        let program = parse("async => x;");
        let Expression::ArrowFunction(f) = first_expression(&program) else {
            panic!("expected arrow function");
        };
        assert!(!f.async_);
        assert!(matches!(
            f.params.first(),
            Some(Pattern::Identifier(id)) if id.name == "async"
        ));
    }

    #[test]
    fn await_only_in_async() {
        parse("async function f() { await g(); }");
        let err = parse_err("function f() { await g(); }");
        assert_eq!(err.kind, ErrorKind::IllegalAwait);
    }

    #[test]
    fn yield_only_in_generators() {
        parse("function* f() { yield 1; yield* g(); }");
        let err = parse_err("function f() { yield 1; }");
        assert_eq!(err.kind, ErrorKind::IllegalYield);
    }

    #[test]
    fn for_variants() {
        parse("for (let i = 0; i < 10; i++) {}");
        parse("for (const k in obj) {}");
        parse("for (const v of items) {}");
        parse("for (;;) break;");
        parse_module("async function f() { for await (const x of stream) {} }");
    }

    #[test]
    fn for_in_head_keeps_in_operator_out() {
        let program = parse("for (a in b) {}");
        assert!(matches!(
            program.body.first(),
            Some(ProgramItem::Statement(Statement::ForIn(_)))
        ));
        // `in` still works inside a parenthesized for-init
        parse("for (let x = (\"a\" in b); x; ) break;");
    }

    #[test]
    fn regex_after_operator() {
        let program = parse("const re = /ab+c/gi;");
        let Some(ProgramItem::Statement(Statement::VariableDeclaration(decl))) =
            program.body.first()
        else {
            panic!("expected variable declaration");
        };
        let Some(VariableDeclarator {
            init: Some(Expression::RegExp(re)),
            ..
        }) = decl.declarations.first()
        else {
            panic!("expected regexp initializer");
        };
        assert_eq!(re.pattern, "ab+c");
        assert_eq!(re.flags, "gi");
    }

    #[test]
    fn template_literals() {
        let program = parse("`a${b}c${d}e`;");
        let Expression::Template(template) = first_expression(&program) else {
            panic!("expected template literal");
        };
        assert_eq!(template.quasis.len(), 3);
        assert_eq!(template.expressions.len(), 2);
        assert!(template.quasis.last().is_some_and(|q| q.tail));
    }

    #[test]
    fn tagged_template() {
        let program = parse("tag`a${b}`;");
        assert!(matches!(
            first_expression(&program),
            Expression::TaggedTemplate(_)
        ));
    }

    #[test]
    fn new_target_meta_property() {
        let program = parse("function f() { return new.target; }");
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn dynamic_import_call() {
        let program = parse("import(\"./mod\");");
        let Expression::Call(call) = first_expression(&program) else {
            panic!("expected call expression");
        };
        assert!(matches!(call.callee, Callee::Import(_)));
    }

    #[test]
    fn import_export_require_module() {
        let err = parse_err("import x from \"m\";");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        parse_module("import x, { a as b } from \"m\";\nexport { b };");
    }

    #[test]
    fn export_forms() {
        let program = parse_module(
            "export const x = 1;\nexport default function () {}\nexport * from \"m\";",
        );
        assert_eq!(program.body.len(), 3);
    }

    #[test]
    fn duplicate_default_export() {
        let err = Parser::new("export default 1;\nexport default 2;", SourceType::Module)
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateExportDefault);
    }

    #[test]
    fn holes_in_array_literals() {
        let program = parse("[1, , 3];");
        let Expression::Array(arr) = first_expression(&program) else {
            panic!("expected array literal");
        };
        assert_eq!(arr.elements.len(), 3);
        assert!(arr.elements.get(1).is_some_and(Option::is_none));
    }

    #[test]
    fn object_literal_members() {
        let program = parse("({ a: 1, b, c() {}, get d() { return 1; }, ...e });");
        let Expression::Object(obj) = first_expression(&program) else {
            panic!("expected object literal");
        };
        assert_eq!(obj.properties.len(), 5);
        assert!(matches!(
            obj.properties.get(1),
            Some(ObjectMember::Property(p)) if p.shorthand
        ));
        assert!(matches!(
            obj.properties.get(3),
            Some(ObjectMember::Method(m)) if m.kind == ObjectMethodKind::Get
        ));
    }

    #[test]
    fn asi_inserts_semicolons() {
        let program = parse("let a = 1\nlet b = 2\na + b");
        assert_eq!(program.body.len(), 3);
    }
}
