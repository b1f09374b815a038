//! Source re-emission.
//!
//! Prints an AST back to JavaScript source. The output is not the
//! original text: formatting is normalized and parentheses are
//! re-derived from operator precedence, so parsing the printed source
//! yields a structurally identical tree.

use crate::ast::*;

/// Print a program as JavaScript source.
pub fn print(program: &Program) -> String {
    let mut printer = Printer::new();
    printer.write_program(program);
    printer.out
}

struct Printer {
    out: String,
    indent: usize,
}

// Precedence levels mirror the parser's table; a child whose level is
// below the minimum its position requires gets parenthesized.
const PREC_SEQUENCE: u8 = 1;
const PREC_ASSIGNMENT: u8 = 2;
const PREC_CONDITIONAL: u8 = 3;
const PREC_UNARY: u8 = 15;
const PREC_POSTFIX: u8 = 16;
const PREC_CALL: u8 = 18;
const PREC_MEMBER: u8 = 19;
const PREC_PRIMARY: u8 = 21;

impl Printer {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn pad(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn write_program(&mut self, program: &Program) {
        for directive in &program.directives {
            self.write_string_literal_value(&directive.value.value);
            self.out.push_str(";\n");
        }
        for item in &program.body {
            self.pad();
            match item {
                ProgramItem::Statement(stmt) => self.write_statement(stmt),
                ProgramItem::ModuleDeclaration(decl) => self.write_module_declaration(decl),
            }
            self.out.push('\n');
        }
    }

    // ============ STATEMENTS ============

    fn write_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::VariableDeclaration(decl) => {
                self.write_variable_declaration(decl);
                self.out.push(';');
            }
            Statement::FunctionDeclaration(decl) => self.write_function_declaration(decl),
            Statement::ClassDeclaration(decl) => self.write_class_declaration(decl),
            Statement::Block(block) => self.write_block(block),
            Statement::If(stmt) => self.write_if(stmt),
            Statement::Switch(stmt) => self.write_switch(stmt),
            Statement::For(stmt) => self.write_for(stmt),
            Statement::ForIn(stmt) => self.write_for_in(stmt),
            Statement::ForOf(stmt) => self.write_for_of(stmt),
            Statement::While(stmt) => {
                self.out.push_str("while (");
                self.write_expression(&stmt.test, 0);
                self.out.push(')');
                self.write_nested(&stmt.body);
            }
            Statement::DoWhile(stmt) => {
                self.out.push_str("do");
                self.write_nested(&stmt.body);
                self.out.push_str(" while (");
                self.write_expression(&stmt.test, 0);
                self.out.push_str(");");
            }
            Statement::Try(stmt) => self.write_try(stmt),
            Statement::With(stmt) => {
                self.out.push_str("with (");
                self.write_expression(&stmt.object, 0);
                self.out.push(')');
                self.write_nested(&stmt.body);
            }
            Statement::Return(stmt) => {
                self.out.push_str("return");
                if let Some(argument) = &stmt.argument {
                    self.out.push(' ');
                    self.write_expression(argument, 0);
                }
                self.out.push(';');
            }
            Statement::Break(stmt) => {
                self.out.push_str("break");
                if let Some(label) = &stmt.label {
                    self.out.push(' ');
                    self.out.push_str(&label.name);
                }
                self.out.push(';');
            }
            Statement::Continue(stmt) => {
                self.out.push_str("continue");
                if let Some(label) = &stmt.label {
                    self.out.push(' ');
                    self.out.push_str(&label.name);
                }
                self.out.push(';');
            }
            Statement::Throw(stmt) => {
                self.out.push_str("throw ");
                self.write_expression(&stmt.argument, 0);
                self.out.push(';');
            }
            Statement::Expression(stmt) => {
                // `{`, `function` and `class` would be misparsed as a
                // block or declaration at statement position.
                let parens = Self::statement_needs_parens(&stmt.expression);
                if parens {
                    self.out.push('(');
                }
                self.write_expression(&stmt.expression, 0);
                if parens {
                    self.out.push(')');
                }
                self.out.push(';');
            }
            Statement::Labeled(stmt) => {
                self.out.push_str(&stmt.label.name);
                self.out.push_str(": ");
                self.write_statement(&stmt.body);
            }
            Statement::Empty(_) => self.out.push(';'),
            Statement::Debugger(_) => self.out.push_str("debugger;"),
        }
    }

    /// Body of a control-flow statement: blocks attach on the same
    /// line, anything else goes inline after a space.
    fn write_nested(&mut self, stmt: &Statement) {
        self.out.push(' ');
        self.write_statement(stmt);
    }

    fn write_block(&mut self, block: &BlockStatement) {
        self.out.push('{');
        if block.directives.is_empty() && block.body.is_empty() {
            self.out.push('}');
            return;
        }
        self.out.push('\n');
        self.indent += 1;
        for directive in &block.directives {
            self.pad();
            self.write_string_literal_value(&directive.value.value);
            self.out.push_str(";\n");
        }
        for stmt in &block.body {
            self.pad();
            self.write_statement(stmt);
            self.out.push('\n');
        }
        self.indent -= 1;
        self.pad();
        self.out.push('}');
    }

    fn write_if(&mut self, stmt: &IfStatement) {
        self.out.push_str("if (");
        self.write_expression(&stmt.test, 0);
        self.out.push(')');

        // Braces keep a dangling `else` attached to this `if`.
        if stmt.alternate.is_some() && !matches!(stmt.consequent.as_ref(), Statement::Block(_)) {
            self.out.push_str(" { ");
            self.write_statement(&stmt.consequent);
            self.out.push_str(" }");
        } else {
            self.write_nested(&stmt.consequent);
        }

        if let Some(alternate) = &stmt.alternate {
            self.out.push_str(" else");
            self.write_nested(alternate);
        }
    }

    fn write_switch(&mut self, stmt: &SwitchStatement) {
        self.out.push_str("switch (");
        self.write_expression(&stmt.discriminant, 0);
        self.out.push_str(") {\n");
        self.indent += 1;
        for case in &stmt.cases {
            self.pad();
            match &case.test {
                Some(test) => {
                    self.out.push_str("case ");
                    self.write_expression(test, 0);
                    self.out.push(':');
                }
                None => self.out.push_str("default:"),
            }
            self.out.push('\n');
            self.indent += 1;
            for cons in &case.consequent {
                self.pad();
                self.write_statement(cons);
                self.out.push('\n');
            }
            self.indent -= 1;
        }
        self.indent -= 1;
        self.pad();
        self.out.push('}');
    }

    fn write_for(&mut self, stmt: &ForStatement) {
        self.out.push_str("for (");
        match &stmt.init {
            Some(ForInit::Variable(decl)) => self.write_variable_declaration(decl),
            Some(ForInit::Expression(expr)) => self.write_expression(expr, 0),
            None => {}
        }
        self.out.push(';');
        if let Some(test) = &stmt.test {
            self.out.push(' ');
            self.write_expression(test, 0);
        }
        self.out.push(';');
        if let Some(update) = &stmt.update {
            self.out.push(' ');
            self.write_expression(update, 0);
        }
        self.out.push(')');
        self.write_nested(&stmt.body);
    }

    fn write_for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::Variable(decl) => self.write_variable_declaration(decl),
            ForHead::Pattern(pattern) => self.write_pattern(pattern),
        }
    }

    fn write_for_in(&mut self, stmt: &ForInStatement) {
        self.out.push_str("for (");
        self.write_for_head(&stmt.left);
        self.out.push_str(" in ");
        self.write_expression(&stmt.right, 0);
        self.out.push(')');
        self.write_nested(&stmt.body);
    }

    fn write_for_of(&mut self, stmt: &ForOfStatement) {
        if stmt.await_ {
            self.out.push_str("for await (");
        } else {
            self.out.push_str("for (");
        }
        self.write_for_head(&stmt.left);
        self.out.push_str(" of ");
        self.write_expression(&stmt.right, PREC_ASSIGNMENT);
        self.out.push(')');
        self.write_nested(&stmt.body);
    }

    fn write_try(&mut self, stmt: &TryStatement) {
        self.out.push_str("try ");
        self.write_block(&stmt.block);
        if let Some(handler) = &stmt.handler {
            self.out.push_str(" catch ");
            if let Some(param) = &handler.param {
                self.out.push('(');
                self.write_pattern(param);
                self.out.push_str(") ");
            }
            self.write_block(&handler.body);
        }
        if let Some(finalizer) = &stmt.finalizer {
            self.out.push_str(" finally ");
            self.write_block(finalizer);
        }
    }

    fn write_variable_declaration(&mut self, decl: &VariableDeclaration) {
        self.out.push_str(decl.kind.as_str());
        self.out.push(' ');
        for (index, declarator) in decl.declarations.iter().enumerate() {
            if index > 0 {
                self.out.push_str(", ");
            }
            self.write_pattern(&declarator.id);
            if let Some(init) = &declarator.init {
                self.out.push_str(" = ");
                self.write_expression(init, PREC_ASSIGNMENT);
            }
        }
    }

    // ============ MODULES ============

    fn write_module_declaration(&mut self, decl: &ModuleDeclaration) {
        match decl {
            ModuleDeclaration::Import(import) => self.write_import(import),
            ModuleDeclaration::ExportNamed(export) => self.write_export_named(export),
            ModuleDeclaration::ExportDefault(export) => self.write_export_default(export),
            ModuleDeclaration::ExportAll(export) => {
                self.out.push_str("export * from ");
                self.write_string_literal_value(&export.source.value);
                self.out.push(';');
            }
        }
    }

    fn write_import(&mut self, decl: &ImportDeclaration) {
        self.out.push_str("import ");
        if decl.specifiers.is_empty() {
            self.write_string_literal_value(&decl.source.value);
            self.out.push(';');
            return;
        }

        let mut named_open = false;
        for (index, specifier) in decl.specifiers.iter().enumerate() {
            if index > 0 {
                self.out.push_str(", ");
            }
            match specifier {
                ImportSpecifier::Default(spec) => self.out.push_str(&spec.local.name),
                ImportSpecifier::Namespace(spec) => {
                    self.out.push_str("* as ");
                    self.out.push_str(&spec.local.name);
                }
                ImportSpecifier::Named(spec) => {
                    if !named_open {
                        self.out.push_str("{ ");
                        named_open = true;
                    }
                    self.out.push_str(&spec.imported.name);
                    if spec.local.name != spec.imported.name {
                        self.out.push_str(" as ");
                        self.out.push_str(&spec.local.name);
                    }
                }
            }
        }
        if named_open {
            self.out.push_str(" }");
        }

        self.out.push_str(" from ");
        self.write_string_literal_value(&decl.source.value);
        self.out.push(';');
    }

    fn write_export_named(&mut self, decl: &ExportNamedDeclaration) {
        self.out.push_str("export ");
        if let Some(declaration) = &decl.declaration {
            self.write_statement(declaration);
            return;
        }

        self.out.push_str("{ ");
        for (index, specifier) in decl.specifiers.iter().enumerate() {
            if index > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(&specifier.local.name);
            if specifier.exported.name != specifier.local.name {
                self.out.push_str(" as ");
                self.out.push_str(&specifier.exported.name);
            }
        }
        self.out.push_str(" }");

        if let Some(source) = &decl.source {
            self.out.push_str(" from ");
            self.write_string_literal_value(&source.value);
        }
        self.out.push(';');
    }

    fn write_export_default(&mut self, decl: &ExportDefaultDeclaration) {
        self.out.push_str("export default ");
        match &decl.declaration {
            DefaultDeclaration::Function(f) => self.write_function_declaration(f),
            DefaultDeclaration::Class(c) => self.write_class_declaration(c),
            DefaultDeclaration::Expression(expr) => {
                let parens = Self::statement_needs_parens(expr);
                if parens {
                    self.out.push('(');
                }
                self.write_expression(expr, PREC_ASSIGNMENT);
                if parens {
                    self.out.push(')');
                }
                self.out.push(';');
            }
        }
    }

    // ============ FUNCTIONS & CLASSES ============

    fn write_function_declaration(&mut self, decl: &FunctionDeclaration) {
        if decl.async_ {
            self.out.push_str("async ");
        }
        self.out.push_str("function");
        if decl.generator {
            self.out.push('*');
        }
        if let Some(id) = &decl.id {
            self.out.push(' ');
            self.out.push_str(&id.name);
        }
        self.write_params(&decl.params);
        self.out.push(' ');
        self.write_block(&decl.body);
    }

    fn write_params(&mut self, params: &[Pattern]) {
        self.out.push('(');
        for (index, param) in params.iter().enumerate() {
            if index > 0 {
                self.out.push_str(", ");
            }
            self.write_pattern(param);
        }
        self.out.push(')');
    }

    fn write_class_declaration(&mut self, decl: &ClassDeclaration) {
        for decorator in &decl.decorators {
            self.out.push('@');
            self.write_expression(&decorator.expression, PREC_CALL);
            self.out.push(' ');
        }
        self.out.push_str("class");
        if let Some(id) = &decl.id {
            self.out.push(' ');
            self.out.push_str(&id.name);
        }
        if let Some(super_class) = &decl.super_class {
            self.out.push_str(" extends ");
            self.write_expression(super_class, PREC_MEMBER);
        }
        self.out.push(' ');
        self.write_class_body(&decl.body);
    }

    fn write_class_body(&mut self, body: &ClassBody) {
        self.out.push('{');
        if body.body.is_empty() {
            self.out.push('}');
            return;
        }
        self.out.push('\n');
        self.indent += 1;
        for member in &body.body {
            self.pad();
            self.write_class_member(member);
            self.out.push('\n');
        }
        self.indent -= 1;
        self.pad();
        self.out.push('}');
    }

    fn write_method_prefix(&mut self, kind: &str, static_: bool, generator: bool, async_: bool) {
        if static_ {
            self.out.push_str("static ");
        }
        if async_ {
            self.out.push_str("async ");
        }
        if generator {
            self.out.push('*');
        }
        match kind {
            "get" => self.out.push_str("get "),
            "set" => self.out.push_str("set "),
            _ => {}
        }
    }

    fn write_class_member(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Method(method) => {
                for decorator in &method.decorators {
                    self.out.push('@');
                    self.write_expression(&decorator.expression, PREC_CALL);
                    self.out.push(' ');
                }
                self.write_method_prefix(
                    method.kind.as_str(),
                    method.static_,
                    method.generator,
                    method.async_,
                );
                self.write_property_key(&method.key, method.computed);
                self.write_params(&method.params);
                self.out.push(' ');
                self.write_block(&method.body);
            }
            ClassMember::PrivateMethod(method) => {
                for decorator in &method.decorators {
                    self.out.push('@');
                    self.write_expression(&decorator.expression, PREC_CALL);
                    self.out.push(' ');
                }
                self.write_method_prefix(
                    method.kind.as_str(),
                    method.static_,
                    method.generator,
                    method.async_,
                );
                self.out.push('#');
                self.out.push_str(&method.key.id.name);
                self.write_params(&method.params);
                self.out.push(' ');
                self.write_block(&method.body);
            }
            ClassMember::Property(property) => {
                for decorator in &property.decorators {
                    self.out.push('@');
                    self.write_expression(&decorator.expression, PREC_CALL);
                    self.out.push(' ');
                }
                if property.static_ {
                    self.out.push_str("static ");
                }
                self.write_property_key(&property.key, property.computed);
                if let Some(value) = &property.value {
                    self.out.push_str(" = ");
                    self.write_expression(value, PREC_ASSIGNMENT);
                }
                self.out.push(';');
            }
            ClassMember::PrivateProperty(property) => {
                if property.static_ {
                    self.out.push_str("static ");
                }
                self.out.push('#');
                self.out.push_str(&property.key.id.name);
                if let Some(value) = &property.value {
                    self.out.push_str(" = ");
                    self.write_expression(value, PREC_ASSIGNMENT);
                }
                self.out.push(';');
            }
        }
    }

    // ============ PATTERNS ============

    fn write_pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(id) => self.out.push_str(&id.name),
            Pattern::Object(obj) => {
                self.out.push_str("{ ");
                for (index, property) in obj.properties.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    match property {
                        ObjectPatternProperty::Property(p) => {
                            if p.shorthand {
                                self.write_pattern(&p.value);
                            } else {
                                self.write_property_key(&p.key, p.computed);
                                self.out.push_str(": ");
                                self.write_pattern(&p.value);
                            }
                        }
                        ObjectPatternProperty::Rest(rest) => {
                            self.out.push_str("...");
                            self.write_pattern(&rest.argument);
                        }
                    }
                }
                self.out.push_str(" }");
            }
            Pattern::Array(arr) => {
                self.out.push('[');
                for (index, element) in arr.elements.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    if let Some(element) = element {
                        self.write_pattern(element);
                    }
                }
                self.out.push(']');
            }
            Pattern::Rest(rest) => {
                self.out.push_str("...");
                self.write_pattern(&rest.argument);
            }
            Pattern::Assignment(assign) => {
                self.write_pattern(&assign.left);
                self.out.push_str(" = ");
                self.write_expression(&assign.right, PREC_ASSIGNMENT);
            }
            Pattern::Member(member) => self.write_member(member),
        }
    }

    // ============ EXPRESSIONS ============

    fn prec(expr: &Expression) -> u8 {
        match expr {
            Expression::Sequence(_) => PREC_SEQUENCE,
            Expression::Assignment(_)
            | Expression::ArrowFunction(_)
            | Expression::Yield(_) => PREC_ASSIGNMENT,
            Expression::Conditional(_) => PREC_CONDITIONAL,
            Expression::Logical(l) => match l.operator {
                LogicalOp::Or | LogicalOp::Nullish => 4,
                LogicalOp::And => 5,
            },
            Expression::Binary(b) => Self::binary_prec(b.operator),
            Expression::Unary(_) | Expression::Await(_) => PREC_UNARY,
            Expression::Update(u) => {
                if u.prefix {
                    PREC_UNARY
                } else {
                    PREC_POSTFIX
                }
            }
            Expression::Call(_) | Expression::TaggedTemplate(_) | Expression::New(_) => PREC_CALL,
            Expression::Member(_) => PREC_MEMBER,
            _ => PREC_PRIMARY,
        }
    }

    fn binary_prec(op: BinaryOp) -> u8 {
        match op {
            BinaryOp::BitOr => 6,
            BinaryOp::BitXor => 7,
            BinaryOp::BitAnd => 8,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 9,
            BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq
            | BinaryOp::In
            | BinaryOp::Instanceof => 10,
            BinaryOp::LShift | BinaryOp::RShift | BinaryOp::URShift => 11,
            BinaryOp::Add | BinaryOp::Sub => 12,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 13,
            BinaryOp::Exp => 14,
        }
    }

    fn write_expression(&mut self, expr: &Expression, min_prec: u8) {
        if Self::prec(expr) < min_prec {
            self.out.push('(');
            self.write_expression_inner(expr);
            self.out.push(')');
        } else {
            self.write_expression_inner(expr);
        }
    }

    fn write_expression_inner(&mut self, expr: &Expression) {
        match expr {
            Expression::Null(_) => self.out.push_str("null"),
            Expression::Boolean(lit) => {
                self.out.push_str(if lit.value { "true" } else { "false" });
            }
            Expression::Numeric(lit) => self.out.push_str(&lit.raw),
            Expression::String(lit) => self.write_string_literal_value(&lit.value),
            Expression::RegExp(lit) => {
                self.out.push('/');
                self.out.push_str(&lit.pattern);
                self.out.push('/');
                self.out.push_str(&lit.flags);
            }
            Expression::Identifier(id) => self.out.push_str(&id.name),
            Expression::This(_) => self.out.push_str("this"),
            Expression::MetaProperty(meta) => {
                self.out.push_str(&meta.meta.name);
                self.out.push('.');
                self.out.push_str(&meta.property.name);
            }

            Expression::Array(arr) => {
                self.out.push('[');
                for (index, element) in arr.elements.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    match element {
                        Some(ArrayElement::Expression(e)) => {
                            self.write_expression(e, PREC_ASSIGNMENT);
                        }
                        Some(ArrayElement::Spread(spread)) => {
                            self.out.push_str("...");
                            self.write_expression(&spread.argument, PREC_ASSIGNMENT);
                        }
                        // A trailing hole needs its comma to survive
                        None if index + 1 == arr.elements.len() => self.out.push(','),
                        None => {}
                    }
                }
                self.out.push(']');
            }

            Expression::Object(obj) => {
                if obj.properties.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push_str("{ ");
                for (index, member) in obj.properties.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_object_member(member);
                }
                self.out.push_str(" }");
            }

            Expression::Function(f) => {
                if f.async_ {
                    self.out.push_str("async ");
                }
                self.out.push_str("function");
                if f.generator {
                    self.out.push('*');
                }
                if let Some(id) = &f.id {
                    self.out.push(' ');
                    self.out.push_str(&id.name);
                }
                self.write_params(&f.params);
                self.out.push(' ');
                self.write_block(&f.body);
            }

            Expression::ArrowFunction(f) => {
                if f.async_ {
                    self.out.push_str("async ");
                }
                self.write_params(&f.params);
                self.out.push_str(" => ");
                match &f.body {
                    ArrowBody::Block(block) => self.write_block(block),
                    ArrowBody::Expression(body) => {
                        // An object body would read as a block
                        let parens = matches!(body.as_ref(), Expression::Object(_));
                        if parens {
                            self.out.push('(');
                        }
                        self.write_expression(body, PREC_ASSIGNMENT);
                        if parens {
                            self.out.push(')');
                        }
                    }
                }
            }

            Expression::Class(class) => {
                for decorator in &class.decorators {
                    self.out.push('@');
                    self.write_expression(&decorator.expression, PREC_CALL);
                    self.out.push(' ');
                }
                self.out.push_str("class");
                if let Some(id) = &class.id {
                    self.out.push(' ');
                    self.out.push_str(&id.name);
                }
                if let Some(super_class) = &class.super_class {
                    self.out.push_str(" extends ");
                    self.write_expression(super_class, PREC_MEMBER);
                }
                self.out.push(' ');
                self.write_class_body(&class.body);
            }

            Expression::Template(template) => self.write_template(template),
            Expression::TaggedTemplate(tagged) => {
                self.write_expression(&tagged.tag, PREC_CALL);
                self.write_template(&tagged.quasi);
            }

            Expression::Unary(unary) => {
                self.out.push_str(unary.operator.as_str());
                match unary.operator {
                    UnaryOp::Typeof | UnaryOp::Void | UnaryOp::Delete => self.out.push(' '),
                    _ => {}
                }
                self.write_expression(&unary.argument, PREC_POSTFIX);
            }
            Expression::Update(update) => {
                if update.prefix {
                    self.out.push_str(update.operator.as_str());
                    self.write_expression(&update.argument, PREC_POSTFIX);
                } else {
                    self.write_expression(&update.argument, PREC_POSTFIX);
                    self.out.push_str(update.operator.as_str());
                }
            }
            Expression::Await(await_) => {
                self.out.push_str("await ");
                self.write_expression(&await_.argument, PREC_POSTFIX);
            }

            Expression::Binary(binary) => {
                let prec = Self::binary_prec(binary.operator);
                // `**` is right-associative; its left operand needs the
                // bump instead of the right one.
                let (left_min, right_min) = if binary.operator == BinaryOp::Exp {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                self.write_expression(&binary.left, left_min);
                self.out.push(' ');
                self.out.push_str(binary.operator.as_str());
                self.out.push(' ');
                self.write_expression(&binary.right, right_min);
            }

            Expression::Logical(logical) => {
                let prec = Self::prec(expr);
                self.write_logical_operand(&logical.left, logical.operator, prec);
                self.out.push(' ');
                self.out.push_str(logical.operator.as_str());
                self.out.push(' ');
                self.write_logical_operand(&logical.right, logical.operator, prec + 1);
            }

            Expression::Conditional(cond) => {
                self.write_expression(&cond.test, PREC_CONDITIONAL + 1);
                self.out.push_str(" ? ");
                self.write_expression(&cond.consequent, PREC_ASSIGNMENT);
                self.out.push_str(" : ");
                self.write_expression(&cond.alternate, PREC_ASSIGNMENT);
            }

            Expression::Assignment(assign) => {
                match &assign.left {
                    AssignmentTarget::Pattern(pattern) => self.write_pattern(pattern),
                    AssignmentTarget::Expression(e) => self.write_expression(e, PREC_MEMBER),
                }
                self.out.push(' ');
                self.out.push_str(assign.operator.as_str());
                self.out.push(' ');
                self.write_expression(&assign.right, PREC_ASSIGNMENT);
            }

            Expression::Sequence(seq) => {
                for (index, e) in seq.expressions.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_expression(e, PREC_ASSIGNMENT);
                }
            }

            Expression::Yield(yield_) => {
                self.out.push_str("yield");
                if yield_.delegate {
                    self.out.push('*');
                }
                if let Some(argument) = &yield_.argument {
                    self.out.push(' ');
                    self.write_expression(argument, PREC_ASSIGNMENT);
                }
            }

            Expression::Member(member) => self.write_member(member),

            Expression::Call(call) => {
                match &call.callee {
                    Callee::Expression(callee) => self.write_expression(callee, PREC_CALL),
                    Callee::Super(_) => self.out.push_str("super"),
                    Callee::Import(_) => self.out.push_str("import"),
                }
                if call.optional {
                    self.out.push_str("?.");
                }
                self.write_arguments(&call.arguments);
            }

            Expression::New(new) => {
                self.out.push_str("new ");
                self.write_expression(&new.callee, PREC_MEMBER);
                self.write_arguments(&new.arguments);
            }
        }
    }

    /// `??` never mixes with `&&`/`||` unparenthesized, whatever the
    /// numeric levels say.
    fn write_logical_operand(&mut self, operand: &Expression, parent: LogicalOp, min_prec: u8) {
        if let Expression::Logical(inner) = operand {
            let mixed = (parent == LogicalOp::Nullish) != (inner.operator == LogicalOp::Nullish);
            if mixed {
                self.out.push('(');
                self.write_expression_inner(operand);
                self.out.push(')');
                return;
            }
        }
        self.write_expression(operand, min_prec);
    }

    fn write_member(&mut self, member: &MemberExpression) {
        match &member.object {
            MemberObject::Expression(object) => self.write_expression(object, PREC_CALL),
            MemberObject::Super(_) => self.out.push_str("super"),
        }
        if member.computed {
            if member.optional {
                self.out.push_str("?.");
            }
            self.out.push('[');
            match &member.property {
                MemberProperty::Expression(property) => self.write_expression(property, 0),
                MemberProperty::Identifier(id) => self.out.push_str(&id.name),
                MemberProperty::PrivateName(name) => {
                    self.out.push('#');
                    self.out.push_str(&name.id.name);
                }
            }
            self.out.push(']');
        } else {
            self.out.push_str(if member.optional { "?." } else { "." });
            match &member.property {
                MemberProperty::Identifier(id) => self.out.push_str(&id.name),
                MemberProperty::PrivateName(name) => {
                    self.out.push('#');
                    self.out.push_str(&name.id.name);
                }
                MemberProperty::Expression(property) => self.write_expression(property, 0),
            }
        }
    }

    fn write_arguments(&mut self, arguments: &[Argument]) {
        self.out.push('(');
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                self.out.push_str(", ");
            }
            match argument {
                Argument::Expression(e) => self.write_expression(e, PREC_ASSIGNMENT),
                Argument::Spread(spread) => {
                    self.out.push_str("...");
                    self.write_expression(&spread.argument, PREC_ASSIGNMENT);
                }
            }
        }
        self.out.push(')');
    }

    fn write_object_member(&mut self, member: &ObjectMember) {
        match member {
            ObjectMember::Property(property) => {
                if property.shorthand {
                    // `{ a }` or `{ a = 1 }`; the value already carries
                    // the whole form
                    self.write_expression(&property.value, PREC_ASSIGNMENT);
                } else {
                    self.write_property_key(&property.key, property.computed);
                    self.out.push_str(": ");
                    self.write_expression(&property.value, PREC_ASSIGNMENT);
                }
            }
            ObjectMember::Method(method) => {
                self.write_method_prefix(
                    method.kind.as_str(),
                    false,
                    method.generator,
                    method.async_,
                );
                self.write_property_key(&method.key, method.computed);
                self.write_params(&method.params);
                self.out.push(' ');
                self.write_block(&method.body);
            }
            ObjectMember::Spread(spread) => {
                self.out.push_str("...");
                self.write_expression(&spread.argument, PREC_ASSIGNMENT);
            }
        }
    }

    fn write_property_key(&mut self, key: &PropertyKey, computed: bool) {
        if computed {
            self.out.push('[');
            if let PropertyKey::Computed(expr) = key {
                self.write_expression(expr, PREC_ASSIGNMENT);
            }
            self.out.push(']');
            return;
        }
        match key {
            PropertyKey::Identifier(id) => self.out.push_str(&id.name),
            PropertyKey::String(lit) => self.write_string_literal_value(&lit.value),
            PropertyKey::Numeric(lit) => self.out.push_str(&lit.raw),
            PropertyKey::Computed(expr) => self.write_expression(expr, PREC_ASSIGNMENT),
        }
    }

    fn write_template(&mut self, template: &TemplateLiteral) {
        self.out.push('`');
        for (index, quasi) in template.quasis.iter().enumerate() {
            self.out.push_str(&quasi.raw);
            if let Some(expr) = template.expressions.get(index) {
                self.out.push_str("${");
                self.write_expression(expr, 0);
                self.out.push('}');
            }
        }
        self.out.push('`');
    }

    fn write_string_literal_value(&mut self, value: &str) {
        self.out.push('"');
        for c in value.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    self.out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    /// Whether an expression statement would be misparsed because its
    /// first token opens a block, function, or class.
    fn statement_needs_parens(expr: &Expression) -> bool {
        match expr {
            Expression::Object(_) | Expression::Function(_) | Expression::Class(_) => true,
            Expression::Assignment(assign) => match &assign.left {
                AssignmentTarget::Pattern(Pattern::Object(_)) => true,
                AssignmentTarget::Pattern(Pattern::Member(m)) => {
                    Self::member_needs_parens(m)
                }
                AssignmentTarget::Expression(e) => Self::statement_needs_parens(e),
                _ => false,
            },
            Expression::Binary(binary) => Self::statement_needs_parens(&binary.left),
            Expression::Logical(logical) => Self::statement_needs_parens(&logical.left),
            Expression::Conditional(cond) => Self::statement_needs_parens(&cond.test),
            Expression::Sequence(seq) => seq
                .expressions
                .first()
                .is_some_and(Self::statement_needs_parens),
            Expression::Member(member) => Self::member_needs_parens(member),
            Expression::Call(call) => match &call.callee {
                Callee::Expression(callee) => Self::statement_needs_parens(callee),
                _ => false,
            },
            Expression::TaggedTemplate(tagged) => Self::statement_needs_parens(&tagged.tag),
            Expression::Update(update) if !update.prefix => {
                Self::statement_needs_parens(&update.argument)
            }
            _ => false,
        }
    }

    fn member_needs_parens(member: &MemberExpression) -> bool {
        match &member.object {
            MemberObject::Expression(object) => Self::statement_needs_parens(object),
            MemberObject::Super(_) => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::serialize;

    fn roundtrip(source: &str, source_type: SourceType) {
        let program = Parser::new(source, source_type)
            .unwrap()
            .parse_program()
            .unwrap();
        let printed = print(&program);
        let reparsed = Parser::new(&printed, source_type)
            .unwrap()
            .parse_program()
            .unwrap();
        assert_eq!(
            serialize::to_value(&program).unwrap(),
            serialize::to_value(&reparsed).unwrap(),
            "printed source diverged: {printed}"
        );
    }

    #[test]
    fn precedence_parens_survive() {
        roundtrip("(1 + 2) * 3;", SourceType::Script);
        roundtrip("1 + 2 * 3;", SourceType::Script);
        roundtrip("2 ** 3 ** 2;", SourceType::Script);
        roundtrip("(2 ** 3) ** 2;", SourceType::Script);
    }

    #[test]
    fn nullish_parens_are_reinserted() {
        roundtrip("(a ?? b) || c;", SourceType::Script);
        roundtrip("a ?? (b || c);", SourceType::Script);
    }

    #[test]
    fn object_literal_statement_gets_parens() {
        roundtrip("({ a: 1 });", SourceType::Script);
        roundtrip("({ a } = obj);", SourceType::Script);
    }

    #[test]
    fn statements_roundtrip() {
        roundtrip(
            "for (let i = 0; i < 3; i++) { if (i % 2) continue; log(i); }",
            SourceType::Script,
        );
        roundtrip("try { f(); } catch (e) { g(e); } finally { h(); }", SourceType::Script);
        roundtrip("outer: while (a) { break outer; }", SourceType::Script);
        roundtrip("switch (x) { case 1: f(); break; default: g(); }", SourceType::Script);
    }

    #[test]
    fn functions_and_classes_roundtrip() {
        roundtrip(
            "class A extends B { static #count = 0; constructor(x) { super(x); } get x() { return 1; } }",
            SourceType::Script,
        );
        roundtrip("const f = async (a, b = 1, ...rest) => a + b;", SourceType::Script);
        roundtrip("function* gen() { yield* inner(); }", SourceType::Script);
    }

    #[test]
    fn modules_roundtrip() {
        roundtrip(
            "import d, { a as b } from \"m\";\nexport const x = 1;\nexport { x as y };\nexport default class {}\nexport * from \"n\";",
            SourceType::Module,
        );
    }

    #[test]
    fn templates_and_optional_chains_roundtrip() {
        roundtrip("tag`a${b + 1}c`;", SourceType::Script);
        roundtrip("a?.b?.[c]?.();", SourceType::Script);
        roundtrip("new (f())(1, ...rest);", SourceType::Script);
    }

    #[test]
    fn array_holes_survive() {
        roundtrip("[1, , 3];", SourceType::Script);
        roundtrip("[, ,];", SourceType::Script);
    }

    #[test]
    fn directives_are_printed_first() {
        let program = Parser::new("\"use strict\";\nlet x = 1;", SourceType::Script)
            .unwrap()
            .parse_program()
            .unwrap();
        let printed = print(&program);
        assert!(printed.starts_with("\"use strict\";"));
    }
}
