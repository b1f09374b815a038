//! Abstract Syntax Tree types, mirroring the Babylon AST shape.
//!
//! Every node struct carries the record fields the external format
//! exposes, plus a [`Span`]. Where the external format calls for a union
//! narrower than "any expression" (a call callee, a member object, an
//! assignment target), the union is a dedicated enum so the illegal
//! combinations are unrepresentable.

use crate::lexer::Span;

pub use crate::lexer::NumericValue;

/// A complete program (script or module)
#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<ProgramItem>,
    pub directives: Vec<Directive>,
    pub source_type: SourceType,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceType {
    #[default]
    Script,
    Module,
}

/// A top-level item: module declarations are only legal here.
#[derive(Debug, Clone)]
pub enum ProgramItem {
    Statement(Statement),
    ModuleDeclaration(ModuleDeclaration),
}

impl ProgramItem {
    pub fn span(&self) -> Span {
        match self {
            ProgramItem::Statement(s) => s.span(),
            ProgramItem::ModuleDeclaration(m) => m.span(),
        }
    }
}

/// A `"use strict"`-style prologue entry.
#[derive(Debug, Clone)]
pub struct Directive {
    pub value: DirectiveLiteral,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DirectiveLiteral {
    pub value: String,
    pub span: Span,
}

// ============ STATEMENTS ============

#[derive(Debug, Clone)]
pub enum Statement {
    // Declarations
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    ClassDeclaration(ClassDeclaration),

    // Control Flow
    Block(BlockStatement),
    If(IfStatement),
    Switch(SwitchStatement),
    For(ForStatement),
    ForIn(ForInStatement),
    ForOf(ForOfStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    Try(TryStatement),
    With(WithStatement),

    // Jump
    Return(ReturnStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    Throw(ThrowStatement),

    // Other
    Expression(ExpressionStatement),
    Labeled(LabeledStatement),
    Empty(Span),
    Debugger(Span),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::VariableDeclaration(v) => v.span,
            Statement::FunctionDeclaration(f) => f.span,
            Statement::ClassDeclaration(c) => c.span,
            Statement::Block(b) => b.span,
            Statement::If(i) => i.span,
            Statement::Switch(s) => s.span,
            Statement::For(f) => f.span,
            Statement::ForIn(f) => f.span,
            Statement::ForOf(f) => f.span,
            Statement::While(w) => w.span,
            Statement::DoWhile(d) => d.span,
            Statement::Try(t) => t.span,
            Statement::With(w) => w.span,
            Statement::Return(r) => r.span,
            Statement::Break(b) => b.span,
            Statement::Continue(c) => c.span,
            Statement::Throw(t) => t.span,
            Statement::Expression(e) => e.span,
            Statement::Labeled(l) => l.span,
            Statement::Empty(s) | Statement::Debugger(s) => *s,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BlockStatement {
    pub body: Vec<Statement>,
    /// Populated only for function bodies; nested blocks have no prologue.
    pub directives: Vec<Directive>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone)]
pub struct VariableDeclarator {
    pub id: Pattern,
    pub init: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub generator: bool,
    pub async_: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassDeclaration {
    pub id: Option<Identifier>,
    pub super_class: Option<Box<Expression>>,
    pub body: ClassBody,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassBody {
    pub body: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ClassMember {
    Method(ClassMethod),
    PrivateMethod(ClassPrivateMethod),
    Property(ClassProperty),
    PrivateProperty(ClassPrivateProperty),
}

#[derive(Debug, Clone)]
pub struct ClassMethod {
    pub key: PropertyKey,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub kind: ClassMethodKind,
    pub computed: bool,
    pub static_: bool,
    pub generator: bool,
    pub async_: bool,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassMethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

impl ClassMethodKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassMethodKind::Constructor => "constructor",
            ClassMethodKind::Method => "method",
            ClassMethodKind::Get => "get",
            ClassMethodKind::Set => "set",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassPrivateMethod {
    pub key: PrivateName,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    /// Never `Constructor`; a private `#constructor` is rejected upstream.
    pub kind: ClassMethodKind,
    pub static_: bool,
    pub generator: bool,
    pub async_: bool,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassProperty {
    pub key: PropertyKey,
    pub value: Option<Expression>,
    pub computed: bool,
    pub static_: bool,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassPrivateProperty {
    pub key: PrivateName,
    pub value: Option<Expression>,
    pub static_: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct PrivateName {
    pub id: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Decorator {
    pub expression: Expression,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Box<Statement>,
    pub alternate: Option<Box<Statement>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SwitchStatement {
    pub discriminant: Expression,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub test: Option<Expression>, // None for default
    pub consequent: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForStatement {
    pub init: Option<ForInit>,
    pub test: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ForInit {
    Variable(VariableDeclaration),
    Expression(Expression),
}

#[derive(Debug, Clone)]
pub struct ForInStatement {
    pub left: ForHead,
    pub right: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForOfStatement {
    pub left: ForHead,
    pub right: Expression,
    pub body: Box<Statement>,
    pub await_: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ForHead {
    Variable(VariableDeclaration),
    Pattern(Pattern),
}

#[derive(Debug, Clone)]
pub struct WhileStatement {
    pub test: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DoWhileStatement {
    pub body: Box<Statement>,
    pub test: Expression,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TryStatement {
    pub block: BlockStatement,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStatement>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: BlockStatement,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WithStatement {
    pub object: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub argument: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BreakStatement {
    pub label: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ContinueStatement {
    pub label: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ThrowStatement {
    pub argument: Expression,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LabeledStatement {
    pub label: Identifier,
    pub body: Box<Statement>,
    pub span: Span,
}

// ============ MODULE DECLARATIONS ============

#[derive(Debug, Clone)]
pub enum ModuleDeclaration {
    Import(ImportDeclaration),
    ExportNamed(ExportNamedDeclaration),
    ExportDefault(ExportDefaultDeclaration),
    ExportAll(ExportAllDeclaration),
}

impl ModuleDeclaration {
    pub fn span(&self) -> Span {
        match self {
            ModuleDeclaration::Import(i) => i.span,
            ModuleDeclaration::ExportNamed(e) => e.span,
            ModuleDeclaration::ExportDefault(e) => e.span,
            ModuleDeclaration::ExportAll(e) => e.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportDeclaration {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: StringLiteral,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ImportSpecifier {
    /// `import { a as b } from "m"`
    Named(ImportNamedSpecifier),
    /// `import d from "m"`
    Default(ImportDefaultSpecifier),
    /// `import * as ns from "m"`
    Namespace(ImportNamespaceSpecifier),
}

#[derive(Debug, Clone)]
pub struct ImportNamedSpecifier {
    pub local: Identifier,
    pub imported: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ImportDefaultSpecifier {
    pub local: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ImportNamespaceSpecifier {
    pub local: Identifier,
    pub span: Span,
}

/// `export { a }`, `export { a } from "m"`, `export const x = 1`
///
/// Either `declaration` is present or `specifiers`/`source` are used,
/// never both.
#[derive(Debug, Clone)]
pub struct ExportNamedDeclaration {
    pub declaration: Option<Box<Statement>>,
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<StringLiteral>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ExportSpecifier {
    pub local: Identifier,
    pub exported: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ExportDefaultDeclaration {
    pub declaration: DefaultDeclaration,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum DefaultDeclaration {
    Function(FunctionDeclaration),
    Class(ClassDeclaration),
    Expression(Box<Expression>),
}

/// `export * from "m"`
#[derive(Debug, Clone)]
pub struct ExportAllDeclaration {
    pub source: StringLiteral,
    pub span: Span,
}

// ============ EXPRESSIONS ============

#[derive(Debug, Clone)]
pub enum Expression {
    // Literals
    Null(NullLiteral),
    Boolean(BooleanLiteral),
    Numeric(NumericLiteral),
    String(StringLiteral),
    RegExp(RegExpLiteral),
    Array(ArrayExpression),
    Object(ObjectExpression),
    Function(FunctionExpression),
    ArrowFunction(ArrowFunctionExpression),
    Class(ClassExpression),
    Template(TemplateLiteral),
    TaggedTemplate(TaggedTemplateExpression),

    // Identifiers
    Identifier(Identifier),
    This(ThisExpression),
    MetaProperty(MetaProperty),

    // Operations
    Unary(UnaryExpression),
    Update(UpdateExpression),
    Binary(BinaryExpression),
    Logical(LogicalExpression),
    Conditional(ConditionalExpression),
    Assignment(AssignmentExpression),
    Sequence(SequenceExpression),

    // Access
    Member(MemberExpression),
    Call(CallExpression),
    New(NewExpression),

    // Special
    Yield(YieldExpression),
    Await(AwaitExpression),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Null(n) => n.span,
            Expression::Boolean(b) => b.span,
            Expression::Numeric(n) => n.span,
            Expression::String(s) => s.span,
            Expression::RegExp(r) => r.span,
            Expression::Array(a) => a.span,
            Expression::Object(o) => o.span,
            Expression::Function(f) => f.span,
            Expression::ArrowFunction(a) => a.span,
            Expression::Class(c) => c.span,
            Expression::Template(t) => t.span,
            Expression::TaggedTemplate(t) => t.span,
            Expression::Identifier(i) => i.span,
            Expression::This(t) => t.span,
            Expression::MetaProperty(m) => m.span,
            Expression::Unary(u) => u.span,
            Expression::Update(u) => u.span,
            Expression::Binary(b) => b.span,
            Expression::Logical(l) => l.span,
            Expression::Conditional(c) => c.span,
            Expression::Assignment(a) => a.span,
            Expression::Sequence(s) => s.span,
            Expression::Member(m) => m.span,
            Expression::Call(c) => c.span,
            Expression::New(n) => n.span,
            Expression::Yield(y) => y.span,
            Expression::Await(a) => a.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct NullLiteral {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct NumericLiteral {
    pub value: NumericValue,
    pub raw: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct RegExpLiteral {
    pub pattern: String,
    pub flags: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ThisExpression {
    pub span: Span,
}

/// `new.target`
#[derive(Debug, Clone)]
pub struct MetaProperty {
    pub meta: Identifier,
    pub property: Identifier,
    pub span: Span,
}

/// `super`, legal only as a call callee or member object
#[derive(Debug, Clone)]
pub struct Super {
    pub span: Span,
}

/// `import`, legal only as a call callee (dynamic import)
#[derive(Debug, Clone)]
pub struct Import {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayExpression {
    /// `None` entries are holes (`[a, , b]`).
    pub elements: Vec<Option<ArrayElement>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ArrayElement {
    Expression(Expression),
    Spread(SpreadElement),
}

#[derive(Debug, Clone)]
pub struct ObjectExpression {
    pub properties: Vec<ObjectMember>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ObjectMember {
    Property(ObjectProperty),
    Method(ObjectMethod),
    Spread(SpreadElement),
}

#[derive(Debug, Clone)]
pub struct ObjectProperty {
    pub key: PropertyKey,
    pub value: Box<Expression>,
    pub computed: bool,
    pub shorthand: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ObjectMethod {
    pub key: PropertyKey,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub kind: ObjectMethodKind,
    pub computed: bool,
    pub generator: bool,
    pub async_: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectMethodKind {
    Method,
    Get,
    Set,
}

impl ObjectMethodKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectMethodKind::Method => "method",
            ObjectMethodKind::Get => "get",
            ObjectMethodKind::Set => "set",
        }
    }
}

#[derive(Debug, Clone)]
pub enum PropertyKey {
    Identifier(Identifier),
    String(StringLiteral),
    Numeric(NumericLiteral),
    Computed(Box<Expression>),
}

impl PropertyKey {
    pub fn span(&self) -> Span {
        match self {
            PropertyKey::Identifier(i) => i.span,
            PropertyKey::String(s) => s.span,
            PropertyKey::Numeric(n) => n.span,
            PropertyKey::Computed(e) => e.span(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionExpression {
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub generator: bool,
    pub async_: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrowFunctionExpression {
    pub params: Vec<Pattern>,
    pub body: ArrowBody,
    pub async_: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ArrowBody {
    Expression(Box<Expression>),
    Block(BlockStatement),
}

#[derive(Debug, Clone)]
pub struct ClassExpression {
    pub id: Option<Identifier>,
    pub super_class: Option<Box<Expression>>,
    pub body: ClassBody,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TemplateLiteral {
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TemplateElement {
    pub raw: String,
    /// `None` when the piece contains an escape only legal when tagged.
    pub cooked: Option<String>,
    pub tail: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TaggedTemplateExpression {
    pub tag: Box<Expression>,
    pub quasi: TemplateLiteral,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct UnaryExpression {
    pub operator: UnaryOp,
    pub argument: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,  // -
    Plus,   // +
    Not,    // !
    BitNot, // ~
    Typeof, // typeof
    Void,   // void
    Delete, // delete
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateExpression {
    pub operator: UpdateOp,
    pub argument: Box<Expression>,
    pub prefix: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment, // ++
    Decrement, // --
}

impl UpdateOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub operator: BinaryOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %
    Exp, // **

    // Comparison
    Eq,          // ==
    NotEq,       // !=
    StrictEq,    // ===
    StrictNotEq, // !==
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=

    // Bitwise
    BitAnd,  // &
    BitOr,   // |
    BitXor,  // ^
    LShift,  // <<
    RShift,  // >>
    URShift, // >>>

    // Other
    In,         // in
    Instanceof, // instanceof
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Exp => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::URShift => ">>>",
            BinaryOp::In => "in",
            BinaryOp::Instanceof => "instanceof",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogicalExpression {
    pub operator: LogicalOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,     // &&
    Or,      // ||
    Nullish, // ??
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::Nullish => "??",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConditionalExpression {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AssignmentExpression {
    pub operator: AssignmentOp,
    pub left: AssignmentTarget,
    pub right: Box<Expression>,
    pub span: Span,
}

/// The left side of an assignment.
///
/// Plain `=` carries a [`Pattern`] (reinterpreted from the parsed
/// expression); compound operators carry the identifier or member
/// expression as-is.
#[derive(Debug, Clone)]
pub enum AssignmentTarget {
    Pattern(Pattern),
    Expression(Box<Expression>),
}

impl AssignmentTarget {
    pub fn span(&self) -> Span {
        match self {
            AssignmentTarget::Pattern(p) => p.span(),
            AssignmentTarget::Expression(e) => e.span(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOp {
    Assign,        // =
    AddAssign,     // +=
    SubAssign,     // -=
    MulAssign,     // *=
    DivAssign,     // /=
    ModAssign,     // %=
    ExpAssign,     // **=
    BitAndAssign,  // &=
    BitOrAssign,   // |=
    BitXorAssign,  // ^=
    LShiftAssign,  // <<=
    RShiftAssign,  // >>=
    URShiftAssign, // >>>=
    AndAssign,     // &&=
    OrAssign,      // ||=
    NullishAssign, // ??=
}

impl AssignmentOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentOp::Assign => "=",
            AssignmentOp::AddAssign => "+=",
            AssignmentOp::SubAssign => "-=",
            AssignmentOp::MulAssign => "*=",
            AssignmentOp::DivAssign => "/=",
            AssignmentOp::ModAssign => "%=",
            AssignmentOp::ExpAssign => "**=",
            AssignmentOp::BitAndAssign => "&=",
            AssignmentOp::BitOrAssign => "|=",
            AssignmentOp::BitXorAssign => "^=",
            AssignmentOp::LShiftAssign => "<<=",
            AssignmentOp::RShiftAssign => ">>=",
            AssignmentOp::URShiftAssign => ">>>=",
            AssignmentOp::AndAssign => "&&=",
            AssignmentOp::OrAssign => "||=",
            AssignmentOp::NullishAssign => "??=",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SequenceExpression {
    pub expressions: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MemberExpression {
    pub object: MemberObject,
    pub property: MemberProperty,
    pub computed: bool,
    /// This link was written `?.`; later links in the same chain stay
    /// `false` even though they short-circuit with it.
    pub optional: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum MemberObject {
    Expression(Box<Expression>),
    Super(Super),
}

impl MemberObject {
    pub fn span(&self) -> Span {
        match self {
            MemberObject::Expression(e) => e.span(),
            MemberObject::Super(s) => s.span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum MemberProperty {
    Identifier(Identifier),
    PrivateName(PrivateName),
    Expression(Box<Expression>),
}

#[derive(Debug, Clone)]
pub struct CallExpression {
    pub callee: Callee,
    pub arguments: Vec<Argument>,
    /// The call was written `?.()`.
    pub optional: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Callee {
    Expression(Box<Expression>),
    Super(Super),
    Import(Import),
}

impl Callee {
    pub fn span(&self) -> Span {
        match self {
            Callee::Expression(e) => e.span(),
            Callee::Super(s) => s.span,
            Callee::Import(i) => i.span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Argument {
    Expression(Expression),
    Spread(SpreadElement),
}

/// `new` is its own node; its callee can be neither `super` nor `import`
/// and cannot contain an optional chain.
#[derive(Debug, Clone)]
pub struct NewExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Argument>,
    /// Always false: optional chains are rejected in a `new` callee.
    /// Carried so the node shape matches `CallExpression`.
    pub optional: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SpreadElement {
    pub argument: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct YieldExpression {
    pub argument: Option<Box<Expression>>,
    pub delegate: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AwaitExpression {
    pub argument: Box<Expression>,
    pub span: Span,
}

// ============ PATTERNS ============

#[derive(Debug, Clone)]
pub enum Pattern {
    Identifier(Identifier),
    Object(ObjectPattern),
    Array(ArrayPattern),
    Rest(RestElement),
    Assignment(AssignmentPattern),
    /// `[a.b] = x` assigns through a member expression; the node is
    /// pattern-typed here without changing shape.
    Member(MemberExpression),
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Identifier(i) => i.span,
            Pattern::Object(o) => o.span,
            Pattern::Array(a) => a.span,
            Pattern::Rest(r) => r.span,
            Pattern::Assignment(a) => a.span,
            Pattern::Member(m) => m.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternProperty>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ObjectPatternProperty {
    Property(AssignmentProperty),
    Rest(RestElement),
}

/// One `key: pattern` entry of an object pattern. Externally this is an
/// ObjectProperty whose value is pattern-typed.
#[derive(Debug, Clone)]
pub struct AssignmentProperty {
    pub key: PropertyKey,
    pub value: Box<Pattern>,
    pub computed: bool,
    pub shorthand: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayPattern {
    /// `None` entries are holes (`[, a]`).
    pub elements: Vec<Option<Pattern>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct RestElement {
    pub argument: Box<Pattern>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AssignmentPattern {
    pub left: Box<Pattern>,
    pub right: Box<Expression>,
    pub span: Span,
}
