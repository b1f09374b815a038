//! Boundary serialization into the external `type`-tagged record format.
//!
//! Every node serializes to a map whose `type` field names the node kind.
//! The tag is derived from the Rust type name by `serialize_node!`, so a
//! node kind has exactly one source of truth; the two places where the
//! external tag legitimately differs from the type name use the `as`
//! form of the macro. Spans are not serialized: two trees that differ
//! only in positions serialize identically.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::ast::*;

/// Serialize a program into a `serde_json` tree.
pub fn to_value(program: &Program) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(program)
}

/// Serialize a program into a JSON string.
pub fn to_string(program: &Program) -> Result<String, serde_json::Error> {
    serde_json::to_string(program)
}

/// Implements `Serialize` for a node struct: a map with a `type` tag
/// (the Rust type name unless overridden with `as`) followed by the
/// named fields.
macro_rules! serialize_node {
    ($ty:ident { $($field:ident => $name:literal),* $(,)? }) => {
        serialize_node!($ty as stringify!($ty), { $($field => $name),* });
    };
    ($ty:ident as $tag:expr, { $($field:ident => $name:literal),* $(,)? }) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", $tag)?;
                $(map.serialize_entry($name, &self.$field)?;)*
                map.end()
            }
        }
    };
}

/// Implements `Serialize` for a union enum by delegating to the payload.
macro_rules! serialize_union {
    ($ty:ident { $($variant:ident),* $(,)? }) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    $($ty::$variant(inner) => inner.serialize(serializer),)*
                }
            }
        }
    };
}

/// Implements `Serialize` for an operator-style enum via its `as_str`.
macro_rules! serialize_as_str {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.as_str())
                }
            }
        )*
    };
}

fn unit_node<S: Serializer>(serializer: S, tag: &str) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("type", tag)?;
    map.end()
}

serialize_as_str!(
    VariableKind,
    ClassMethodKind,
    ObjectMethodKind,
    UnaryOp,
    UpdateOp,
    BinaryOp,
    LogicalOp,
    AssignmentOp,
);

impl Serialize for SourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            SourceType::Script => "script",
            SourceType::Module => "module",
        })
    }
}

impl Serialize for NumericValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NumericValue::Integer(i) => serializer.serialize_i64(*i),
            NumericValue::Float(f) => serializer.serialize_f64(*f),
        }
    }
}

// ---- Program and directives ----

serialize_node!(Program {
    source_type => "sourceType",
    body => "body",
    directives => "directives",
});
serialize_node!(Directive { value => "value" });
serialize_node!(DirectiveLiteral { value => "value" });

serialize_union!(ProgramItem { Statement, ModuleDeclaration });

// ---- Statements ----

impl Serialize for Statement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Statement::VariableDeclaration(n) => n.serialize(serializer),
            Statement::FunctionDeclaration(n) => n.serialize(serializer),
            Statement::ClassDeclaration(n) => n.serialize(serializer),
            Statement::Block(n) => n.serialize(serializer),
            Statement::If(n) => n.serialize(serializer),
            Statement::Switch(n) => n.serialize(serializer),
            Statement::For(n) => n.serialize(serializer),
            Statement::ForIn(n) => n.serialize(serializer),
            Statement::ForOf(n) => n.serialize(serializer),
            Statement::While(n) => n.serialize(serializer),
            Statement::DoWhile(n) => n.serialize(serializer),
            Statement::Try(n) => n.serialize(serializer),
            Statement::With(n) => n.serialize(serializer),
            Statement::Return(n) => n.serialize(serializer),
            Statement::Break(n) => n.serialize(serializer),
            Statement::Continue(n) => n.serialize(serializer),
            Statement::Throw(n) => n.serialize(serializer),
            Statement::Expression(n) => n.serialize(serializer),
            Statement::Labeled(n) => n.serialize(serializer),
            Statement::Empty(_) => unit_node(serializer, "EmptyStatement"),
            Statement::Debugger(_) => unit_node(serializer, "DebuggerStatement"),
        }
    }
}

serialize_node!(ExpressionStatement { expression => "expression" });
serialize_node!(BlockStatement {
    body => "body",
    directives => "directives",
});
serialize_node!(VariableDeclaration {
    kind => "kind",
    declarations => "declarations",
});
serialize_node!(VariableDeclarator {
    id => "id",
    init => "init",
});
serialize_node!(FunctionDeclaration {
    id => "id",
    params => "params",
    body => "body",
    generator => "generator",
    async_ => "async",
});
serialize_node!(IfStatement {
    test => "test",
    consequent => "consequent",
    alternate => "alternate",
});
serialize_node!(SwitchStatement {
    discriminant => "discriminant",
    cases => "cases",
});
serialize_node!(SwitchCase {
    test => "test",
    consequent => "consequent",
});
serialize_node!(ForStatement {
    init => "init",
    test => "test",
    update => "update",
    body => "body",
});
serialize_node!(ForInStatement {
    left => "left",
    right => "right",
    body => "body",
});
serialize_node!(ForOfStatement {
    left => "left",
    right => "right",
    body => "body",
    await_ => "await",
});
serialize_node!(WhileStatement {
    test => "test",
    body => "body",
});
serialize_node!(DoWhileStatement {
    body => "body",
    test => "test",
});
serialize_node!(TryStatement {
    block => "block",
    handler => "handler",
    finalizer => "finalizer",
});
serialize_node!(CatchClause {
    param => "param",
    body => "body",
});
serialize_node!(WithStatement {
    object => "object",
    body => "body",
});
serialize_node!(ReturnStatement { argument => "argument" });
serialize_node!(BreakStatement { label => "label" });
serialize_node!(ContinueStatement { label => "label" });
serialize_node!(ThrowStatement { argument => "argument" });
serialize_node!(LabeledStatement {
    label => "label",
    body => "body",
});

serialize_union!(ForInit { Variable, Expression });
serialize_union!(ForHead { Variable, Pattern });

// ---- Classes ----

serialize_node!(ClassDeclaration {
    id => "id",
    super_class => "superClass",
    body => "body",
    decorators => "decorators",
});
serialize_node!(ClassExpression {
    id => "id",
    super_class => "superClass",
    body => "body",
    decorators => "decorators",
});
serialize_node!(ClassBody { body => "body" });
serialize_node!(ClassMethod {
    key => "key",
    params => "params",
    body => "body",
    kind => "kind",
    computed => "computed",
    static_ => "static",
    generator => "generator",
    async_ => "async",
    decorators => "decorators",
});
serialize_node!(ClassPrivateMethod {
    key => "key",
    params => "params",
    body => "body",
    kind => "kind",
    static_ => "static",
    generator => "generator",
    async_ => "async",
    decorators => "decorators",
});
serialize_node!(ClassProperty {
    key => "key",
    value => "value",
    computed => "computed",
    static_ => "static",
    decorators => "decorators",
});
serialize_node!(ClassPrivateProperty {
    key => "key",
    value => "value",
    static_ => "static",
});
serialize_node!(PrivateName { id => "id" });
serialize_node!(Decorator { expression => "expression" });

serialize_union!(ClassMember {
    Method,
    PrivateMethod,
    Property,
    PrivateProperty,
});

// ---- Modules ----

serialize_union!(ModuleDeclaration {
    Import,
    ExportNamed,
    ExportDefault,
    ExportAll,
});

serialize_node!(ImportDeclaration {
    specifiers => "specifiers",
    source => "source",
});
serialize_node!(ImportNamedSpecifier as "ImportSpecifier", {
    local => "local",
    imported => "imported",
});
serialize_node!(ImportDefaultSpecifier { local => "local" });
serialize_node!(ImportNamespaceSpecifier { local => "local" });
serialize_node!(ExportNamedDeclaration {
    declaration => "declaration",
    specifiers => "specifiers",
    source => "source",
});
serialize_node!(ExportSpecifier {
    local => "local",
    exported => "exported",
});
serialize_node!(ExportDefaultDeclaration { declaration => "declaration" });
serialize_node!(ExportAllDeclaration { source => "source" });

serialize_union!(ImportSpecifier {
    Named,
    Default,
    Namespace,
});
serialize_union!(DefaultDeclaration {
    Function,
    Class,
    Expression,
});

// ---- Expressions ----

serialize_union!(Expression {
    Null,
    Boolean,
    Numeric,
    String,
    RegExp,
    Array,
    Object,
    Function,
    ArrowFunction,
    Class,
    Template,
    TaggedTemplate,
    Identifier,
    This,
    MetaProperty,
    Unary,
    Update,
    Binary,
    Logical,
    Conditional,
    Assignment,
    Sequence,
    Member,
    Call,
    New,
    Yield,
    Await,
});

serialize_node!(Identifier { name => "name" });
serialize_node!(NullLiteral {});
serialize_node!(BooleanLiteral { value => "value" });
serialize_node!(NumericLiteral {
    value => "value",
    raw => "raw",
});
serialize_node!(StringLiteral { value => "value" });
serialize_node!(RegExpLiteral {
    pattern => "pattern",
    flags => "flags",
});
serialize_node!(ThisExpression {});
serialize_node!(MetaProperty {
    meta => "meta",
    property => "property",
});
serialize_node!(Super {});
serialize_node!(Import {});
serialize_node!(ArrayExpression { elements => "elements" });
serialize_node!(ObjectExpression { properties => "properties" });
serialize_node!(ObjectProperty {
    key => "key",
    value => "value",
    computed => "computed",
    shorthand => "shorthand",
});
serialize_node!(ObjectMethod {
    key => "key",
    params => "params",
    body => "body",
    kind => "kind",
    computed => "computed",
    generator => "generator",
    async_ => "async",
});
serialize_node!(FunctionExpression {
    id => "id",
    params => "params",
    body => "body",
    generator => "generator",
    async_ => "async",
});
serialize_node!(ArrowFunctionExpression {
    params => "params",
    body => "body",
    async_ => "async",
});
serialize_node!(TemplateLiteral {
    quasis => "quasis",
    expressions => "expressions",
});
serialize_node!(TaggedTemplateExpression {
    tag => "tag",
    quasi => "quasi",
});
serialize_node!(UnaryExpression {
    operator => "operator",
    argument => "argument",
});
serialize_node!(UpdateExpression {
    operator => "operator",
    argument => "argument",
    prefix => "prefix",
});
serialize_node!(BinaryExpression {
    operator => "operator",
    left => "left",
    right => "right",
});
serialize_node!(LogicalExpression {
    operator => "operator",
    left => "left",
    right => "right",
});
serialize_node!(ConditionalExpression {
    test => "test",
    consequent => "consequent",
    alternate => "alternate",
});
serialize_node!(AssignmentExpression {
    operator => "operator",
    left => "left",
    right => "right",
});
serialize_node!(SequenceExpression { expressions => "expressions" });
serialize_node!(MemberExpression {
    object => "object",
    property => "property",
    computed => "computed",
    optional => "optional",
});
serialize_node!(CallExpression {
    callee => "callee",
    arguments => "arguments",
    optional => "optional",
});
serialize_node!(NewExpression {
    callee => "callee",
    arguments => "arguments",
    optional => "optional",
});
serialize_node!(SpreadElement { argument => "argument" });
serialize_node!(YieldExpression {
    argument => "argument",
    delegate => "delegate",
});
serialize_node!(AwaitExpression { argument => "argument" });

// The external format nests raw/cooked under `value`.
impl Serialize for TemplateElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Value<'a> {
            raw: &'a str,
            cooked: Option<&'a str>,
        }
        impl Serialize for Value<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("raw", self.raw)?;
                map.serialize_entry("cooked", &self.cooked)?;
                map.end()
            }
        }

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "TemplateElement")?;
        map.serialize_entry(
            "value",
            &Value {
                raw: &self.raw,
                cooked: self.cooked.as_deref(),
            },
        )?;
        map.serialize_entry("tail", &self.tail)?;
        map.end()
    }
}

serialize_union!(ArrayElement { Expression, Spread });
serialize_union!(ObjectMember {
    Property,
    Method,
    Spread,
});
serialize_union!(PropertyKey {
    Identifier,
    String,
    Numeric,
    Computed,
});
serialize_union!(ArrowBody { Expression, Block });
serialize_union!(AssignmentTarget { Pattern, Expression });
serialize_union!(MemberObject { Expression, Super });
serialize_union!(MemberProperty {
    Identifier,
    PrivateName,
    Expression,
});
serialize_union!(Callee {
    Expression,
    Super,
    Import,
});
serialize_union!(Argument { Expression, Spread });

// ---- Patterns ----

serialize_union!(Pattern {
    Identifier,
    Object,
    Array,
    Rest,
    Assignment,
    Member,
});

serialize_node!(ObjectPattern { properties => "properties" });
serialize_node!(AssignmentProperty as "ObjectProperty", {
    key => "key",
    value => "value",
    computed => "computed",
    shorthand => "shorthand",
});
serialize_node!(ArrayPattern { elements => "elements" });
serialize_node!(RestElement { argument => "argument" });
serialize_node!(AssignmentPattern {
    left => "left",
    right => "right",
});

serialize_union!(ObjectPatternProperty { Property, Rest });

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;
    use serde_json::json;

    #[allow(clippy::unwrap_used)]
    #[test]
    fn type_tag_comes_from_type_name() {
        let ident = Identifier {
            name: "x".to_string(),
            span: Span::default(),
        };
        assert_eq!(
            serde_json::to_value(&ident).unwrap(),
            json!({"type": "Identifier", "name": "x"})
        );
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn spans_are_not_serialized() {
        let a = NullLiteral {
            span: Span::new(0, 4, 1, 1),
        };
        let b = NullLiteral {
            span: Span::new(10, 14, 2, 3),
        };
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn assignment_property_retags_as_object_property() {
        let prop = AssignmentProperty {
            key: PropertyKey::Identifier(Identifier {
                name: "a".to_string(),
                span: Span::default(),
            }),
            value: Box::new(Pattern::Identifier(Identifier {
                name: "a".to_string(),
                span: Span::default(),
            })),
            computed: false,
            shorthand: true,
            span: Span::default(),
        };
        let value = serde_json::to_value(&prop).unwrap();
        assert_eq!(value["type"], "ObjectProperty");
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn numeric_value_integer_vs_float() {
        let int = NumericLiteral {
            value: NumericValue::Integer(3),
            raw: "3".to_string(),
            span: Span::default(),
        };
        let float = NumericLiteral {
            value: NumericValue::Float(3.5),
            raw: "3.5".to_string(),
            span: Span::default(),
        };
        assert_eq!(
            serde_json::to_value(&int).unwrap(),
            json!({"type": "NumericLiteral", "value": 3, "raw": "3"})
        );
        assert_eq!(
            serde_json::to_value(&float).unwrap(),
            json!({"type": "NumericLiteral", "value": 3.5, "raw": "3.5"})
        );
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn template_element_nests_raw_and_cooked() {
        let quasi = TemplateElement {
            raw: "a\\n".to_string(),
            cooked: Some("a\n".to_string()),
            tail: true,
            span: Span::default(),
        };
        assert_eq!(
            serde_json::to_value(&quasi).unwrap(),
            json!({
                "type": "TemplateElement",
                "value": {"raw": "a\\n", "cooked": "a\n"},
                "tail": true,
            })
        );
    }
}
