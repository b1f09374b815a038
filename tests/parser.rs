//! Tests for the parser
//!
//! End-to-end coverage through the public API: tree shapes, error
//! positions, the serialized Babylon form, and the print→reparse
//! round-trip.

#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

use jsparse::ast::*;
use jsparse::{parse, printer, serialize, ErrorKind, ParseOptions, SyntaxError};

fn script(source: &str) -> Program {
    parse(source, ParseOptions::default()).unwrap()
}

fn module(source: &str) -> Program {
    let options = ParseOptions {
        source_type: SourceType::Module,
    };
    parse(source, options).unwrap()
}

fn script_err(source: &str) -> SyntaxError {
    parse(source, ParseOptions::default()).unwrap_err()
}

fn expression(source: &str) -> Expression {
    let mut program = script(source);
    match program.body.pop() {
        Some(ProgramItem::Statement(Statement::Expression(stmt))) => stmt.expression,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[test]
fn test_precedence_shapes() {
    let Expression::Binary(add) = expression("1 + 2 * 3;") else {
        panic!("expected binary expression");
    };
    assert_eq!(add.operator, BinaryOp::Add);
    let Expression::Binary(mul) = *add.right else {
        panic!("expected multiplication on the right");
    };
    assert_eq!(mul.operator, BinaryOp::Mul);
    assert!(matches!(*mul.left, Expression::Numeric(ref n) if n.raw == "2"));
}

#[test]
fn test_exponent_right_associativity() {
    let Expression::Binary(outer) = expression("2 ** 3 ** 2;") else {
        panic!("expected binary expression");
    };
    assert_eq!(outer.operator, BinaryOp::Exp);
    assert!(matches!(*outer.left, Expression::Numeric(ref n) if n.raw == "2"));
    assert!(matches!(*outer.right, Expression::Binary(ref inner) if inner.operator == BinaryOp::Exp));
}

#[test]
fn test_assignment_right_associativity() {
    let Expression::Assignment(outer) = expression("a = b = 1;") else {
        panic!("expected assignment");
    };
    assert!(matches!(*outer.right, Expression::Assignment(_)));
}

#[test]
fn test_optional_chain_per_link_flags() {
    let Expression::Member(outer) = expression("a?.b.c;") else {
        panic!("expected member expression");
    };
    assert!(!outer.optional);
    let MemberObject::Expression(object) = outer.object else {
        panic!("expected expression object");
    };
    let Expression::Member(inner) = *object else {
        panic!("expected member expression");
    };
    assert!(inner.optional);
}

#[test]
fn test_pattern_conversion_failure_positions() {
    let err = script_err("[a + 1] = x;");
    assert_eq!(err.kind, ErrorKind::PatternConversion);
    assert_eq!(err.line, 1);

    let err = script_err("({ m() {} } = x);");
    assert_eq!(err.kind, ErrorKind::PatternConversion);
}

#[test]
fn test_destructuring_end_to_end() {
    let program = script("const {a, b = 2, ...rest} = obj;");
    let Some(ProgramItem::Statement(Statement::VariableDeclaration(decl))) =
        program.body.first()
    else {
        panic!("expected variable declaration");
    };
    assert_eq!(decl.kind, VariableKind::Const);
    let Some(VariableDeclarator {
        id: Pattern::Object(pattern),
        init: Some(_),
        ..
    }) = decl.declarations.first()
    else {
        panic!("expected destructuring declarator with initializer");
    };
    assert_eq!(pattern.properties.len(), 3);
    let Some(ObjectPatternProperty::Property(with_default)) = pattern.properties.get(1) else {
        panic!("expected plain property");
    };
    assert!(matches!(*with_default.value, Pattern::Assignment(_)));
    assert!(matches!(
        pattern.properties.get(2),
        Some(ObjectPatternProperty::Rest(_))
    ));
}

#[test]
fn test_directive_prologue_top_level_and_function() {
    let program = script("\"use strict\";\nfunction f() { \"use asm\"; return 1; }");
    assert_eq!(program.directives.len(), 1);
    let Some(ProgramItem::Statement(Statement::FunctionDeclaration(decl))) = program.body.first()
    else {
        panic!("expected function declaration");
    };
    assert_eq!(decl.body.directives.len(), 1);
    assert_eq!(decl.body.body.len(), 1);
}

#[test]
fn test_try_requires_catch_or_finally() {
    assert_eq!(script_err("try { f(); }").kind, ErrorKind::MalformedTry);
    script("try { f(); } catch { g(); }");
    script("try { f(); } finally { g(); }");
}

#[test]
fn test_constructor_uniqueness() {
    let err = script_err("class A { constructor() {} \"constructor\"() {} }");
    assert_eq!(err.kind, ErrorKind::DuplicateConstructor);
    script("class A { constructor() {} static constructor() {} }");
}

#[test]
fn test_export_default_uniqueness() {
    let options = ParseOptions {
        source_type: SourceType::Module,
    };
    let err = parse("export default 1;\nexport default 2;", options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateExportDefault);
}

#[test]
fn test_module_declarations_only_in_modules() {
    let err = script_err("export const x = 1;");
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    // dynamic import is an expression and works in scripts
    script("import(\"./m\");");
}

#[test]
fn test_error_positions_are_one_based() {
    let err = script_err("let x = ;\n");
    assert_eq!(err.line, 1);
    assert_eq!(err.column, 9);
    assert_eq!(err.snippet, "let x = ;");
}

#[test]
fn test_serialized_babylon_shape() {
    let value = serialize::to_value(&script("let x = 1;")).unwrap();
    assert_eq!(value["type"], "Program");
    assert_eq!(value["sourceType"], "script");
    let decl = &value["body"][0];
    assert_eq!(decl["type"], "VariableDeclaration");
    assert_eq!(decl["kind"], "let");
    assert_eq!(decl["declarations"][0]["type"], "VariableDeclarator");
    assert_eq!(decl["declarations"][0]["id"]["type"], "Identifier");
    assert_eq!(decl["declarations"][0]["id"]["name"], "x");
    assert_eq!(decl["declarations"][0]["init"]["type"], "NumericLiteral");

    // Call and new expressions carry the same field set.
    let value = serialize::to_value(&script("new F(1);")).unwrap();
    let expr = &value["body"][0]["expression"];
    assert_eq!(expr["type"], "NewExpression");
    assert_eq!(expr["callee"]["name"], "F");
    assert_eq!(expr["arguments"][0]["type"], "NumericLiteral");
    assert_eq!(expr["optional"], false);
}

#[test]
fn test_serialized_async_field_names() {
    let value = serialize::to_value(&script("async function f(a) {}")).unwrap();
    let decl = &value["body"][0];
    assert_eq!(decl["type"], "FunctionDeclaration");
    assert_eq!(decl["async"], true);
    assert_eq!(decl["generator"], false);
}

#[test]
fn test_print_reparse_round_trip() {
    let sources = [
        "let x = (1 + 2) * 3;",
        "const {a, b = 2, ...rest} = obj;",
        "class A extends B { #x = 1; static m() {} get y() { return this.#x; } }",
        "async function f() { for await (const x of xs) { await g(x); } }",
        "function* gen() { yield* other(); }",
        "a?.b?.[c]?.(d, ...e);",
        "label: for (let i = 0; i < 3; i++) { if (i) continue label; }",
        "const t = tag`x${1 + 2}y`;",
        "switch (v) { case 1: break; default: f(); }",
        "({ a, b: [c, , d], ...rest } = value);",
    ];
    for source in sources {
        let program = script(source);
        let printed = printer::print(&program);
        let reparsed = parse(&printed, ParseOptions::default()).unwrap();
        assert_eq!(
            serialize::to_value(&program).unwrap(),
            serialize::to_value(&reparsed).unwrap(),
            "round trip diverged for {source:?}: {printed}"
        );
    }
}

#[test]
fn test_module_round_trip() {
    let source = "import d, * as ns from \"m\";\nexport { d as renamed };\nexport default 1 + 2;";
    let program = module(source);
    let printed = printer::print(&program);
    let options = ParseOptions {
        source_type: SourceType::Module,
    };
    let reparsed = parse(&printed, options).unwrap();
    assert_eq!(
        serialize::to_value(&program).unwrap(),
        serialize::to_value(&reparsed).unwrap()
    );
}

#[test]
fn test_context_sensitive_keywords() {
    // `of`, `as`, `from`, `async` and `static` are ordinary identifiers
    // outside their grammatical positions
    script("let of = 1; let as = of; let from = as; let async = from; let static = async;");
    script("of = as + from;");
}

#[test]
fn test_newline_sensitivity() {
    assert_eq!(script_err("throw\n1;").kind, ErrorKind::NewlineAfterThrow);
    // return argument does not cross a newline
    let program = script("function f() { return\n1; }");
    let Some(ProgramItem::Statement(Statement::FunctionDeclaration(decl))) = program.body.first()
    else {
        panic!("expected function declaration");
    };
    assert!(matches!(
        decl.body.body.first(),
        Some(Statement::Return(r)) if r.argument.is_none()
    ));
}

#[test]
fn test_deeply_nested_expressions() {
    let mut source = String::new();
    for _ in 0..200 {
        source.push('(');
    }
    source.push('1');
    for _ in 0..200 {
        source.push(')');
    }
    source.push(';');
    let program = script(&source);
    assert!(matches!(
        program.body.first(),
        Some(ProgramItem::Statement(Statement::Expression(_)))
    ));
}
