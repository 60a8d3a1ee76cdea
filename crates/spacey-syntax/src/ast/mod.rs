//! Abstract Syntax Tree (AST) definitions for JavaScript.
//!
//! These structures are designed to be ESTree-compatible where possible.
//! Every node records the byte [`Span`] it was parsed from so consumers can
//! rewrite the original text in place. Parentheses do not produce nodes.

pub use crate::lexer::Span;

/// A complete JavaScript program (script or module).
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The statements in the program
    pub body: Vec<Statement>,
    /// The whole source
    pub span: Span,
}

/// An identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// The name of the identifier
    pub name: String,
    /// Source location
    pub span: Span,
}

/// A JavaScript statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Variable declaration (var, let, const)
    VariableDeclaration(VariableDeclaration),
    /// Function declaration
    FunctionDeclaration(Function),
    /// Class declaration
    ClassDeclaration(Class),
    /// Expression statement
    Expression(ExpressionStatement),
    /// Block statement { ... }
    Block(BlockStatement),
    /// If statement
    If(IfStatement),
    /// Switch statement
    Switch(SwitchStatement),
    /// While statement
    While(WhileStatement),
    /// Do-while statement
    DoWhile(DoWhileStatement),
    /// For statement
    For(ForStatement),
    /// For-in statement
    ForIn(ForInStatement),
    /// For-of statement
    ForOf(ForOfStatement),
    /// Return statement
    Return(ReturnStatement),
    /// Break statement (with optional label)
    Break(JumpStatement),
    /// Continue statement (with optional label)
    Continue(JumpStatement),
    /// Throw statement
    Throw(ThrowStatement),
    /// Try statement
    Try(TryStatement),
    /// With statement (sloppy mode only)
    With(WithStatement),
    /// Labeled statement
    Labeled(LabeledStatement),
    /// Debugger statement
    Debugger(Span),
    /// Empty statement (;)
    Empty(Span),
    /// `import ... from '...'`
    Import(ImportDeclaration),
    /// `export { ... }`, `export var ...`, `export function ...`
    ExportNamed(ExportNamedDeclaration),
    /// `export default ...`
    ExportDefault(ExportDefaultDeclaration),
    /// `export * from '...'`
    ExportAll(ExportAllDeclaration),
}

impl Statement {
    /// Source location of the whole statement.
    pub fn span(&self) -> Span {
        match self {
            Statement::VariableDeclaration(s) => s.span,
            Statement::FunctionDeclaration(s) => s.span,
            Statement::ClassDeclaration(s) => s.span,
            Statement::Expression(s) => s.span,
            Statement::Block(s) => s.span,
            Statement::If(s) => s.span,
            Statement::Switch(s) => s.span,
            Statement::While(s) => s.span,
            Statement::DoWhile(s) => s.span,
            Statement::For(s) => s.span,
            Statement::ForIn(s) => s.span,
            Statement::ForOf(s) => s.span,
            Statement::Return(s) => s.span,
            Statement::Break(s) | Statement::Continue(s) => s.span,
            Statement::Throw(s) => s.span,
            Statement::Try(s) => s.span,
            Statement::With(s) => s.span,
            Statement::Labeled(s) => s.span,
            Statement::Debugger(span) | Statement::Empty(span) => *span,
            Statement::Import(s) => s.span,
            Statement::ExportNamed(s) => s.span,
            Statement::ExportDefault(s) => s.span,
            Statement::ExportAll(s) => s.span,
        }
    }
}

/// Variable declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// var declaration
    Var,
    /// let declaration
    Let,
    /// const declaration
    Const,
}

/// A variable declaration statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// The kind of declaration
    pub kind: VariableKind,
    /// The declarators
    pub declarations: Vec<VariableDeclarator>,
    /// Source location
    pub span: Span,
}

/// A single variable declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// The binding being declared
    pub id: Pattern,
    /// Optional initializer expression
    pub init: Option<Expression>,
    /// Source location
    pub span: Span,
}

/// A function: declaration, expression, method body or accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// The function name (required for declarations)
    pub id: Option<Identifier>,
    /// The parameters
    pub params: Vec<Pattern>,
    /// The function body
    pub body: Vec<Statement>,
    /// Whether this is an async function
    pub is_async: bool,
    /// Whether this is a generator function
    pub is_generator: bool,
    /// Source location
    pub span: Span,
}

/// An expression statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    /// The expression
    pub expression: Expression,
    /// Source location, including the terminating semicolon if present
    pub span: Span,
}

/// A block statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    /// The statements in the block
    pub body: Vec<Statement>,
    /// Source location
    pub span: Span,
}

/// An if statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// The condition
    pub test: Expression,
    /// The then branch
    pub consequent: Box<Statement>,
    /// The optional else branch
    pub alternate: Option<Box<Statement>>,
    /// Source location
    pub span: Span,
}

/// A while statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    /// The condition
    pub test: Expression,
    /// The loop body
    pub body: Box<Statement>,
    /// Source location
    pub span: Span,
}

/// A for statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    /// The initializer
    pub init: Option<ForInit>,
    /// The condition
    pub test: Option<Expression>,
    /// The update expression
    pub update: Option<Expression>,
    /// The loop body
    pub body: Box<Statement>,
    /// Source location
    pub span: Span,
}

/// For loop initializer.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// Variable declaration
    Declaration(Box<VariableDeclaration>),
    /// Expression
    Expression(Expression),
}

/// A switch statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    /// The discriminant expression
    pub discriminant: Expression,
    /// The case clauses
    pub cases: Vec<SwitchCase>,
    /// Source location
    pub span: Span,
}

/// A switch case clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// The test expression (None for default)
    pub test: Option<Expression>,
    /// The consequent statements
    pub consequent: Vec<Statement>,
    /// Source location
    pub span: Span,
}

/// A do-while statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    /// The loop body
    pub body: Box<Statement>,
    /// The condition
    pub test: Expression,
    /// Source location
    pub span: Span,
}

/// A for-in statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForInStatement {
    /// The left-hand side
    pub left: ForInLeft,
    /// The object to iterate over
    pub right: Expression,
    /// The loop body
    pub body: Box<Statement>,
    /// Source location
    pub span: Span,
}

/// A for-of statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForOfStatement {
    /// The left-hand side
    pub left: ForInLeft,
    /// The iterable
    pub right: Expression,
    /// The loop body
    pub body: Box<Statement>,
    /// Whether this is an async for-of
    pub is_await: bool,
    /// Source location
    pub span: Span,
}

/// Left-hand side of for-in/for-of.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInLeft {
    /// Variable declaration
    Declaration(Box<VariableDeclaration>),
    /// Assignment target
    Pattern(Pattern),
}

/// A return statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    /// The return value
    pub argument: Option<Expression>,
    /// Source location
    pub span: Span,
}

/// A break or continue statement.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpStatement {
    /// Optional label
    pub label: Option<Identifier>,
    /// Source location
    pub span: Span,
}

/// A throw statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    /// The thrown expression
    pub argument: Expression,
    /// Source location
    pub span: Span,
}

/// A try statement.
#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    /// The try block
    pub block: BlockStatement,
    /// The catch clause
    pub handler: Option<CatchClause>,
    /// The finally block
    pub finalizer: Option<BlockStatement>,
    /// Source location
    pub span: Span,
}

/// A catch clause.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// The error parameter
    pub param: Option<Pattern>,
    /// The catch body
    pub body: BlockStatement,
    /// Source location
    pub span: Span,
}

/// A with statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WithStatement {
    /// The object expression
    pub object: Expression,
    /// The body statement
    pub body: Box<Statement>,
    /// Source location
    pub span: Span,
}

/// A labeled statement.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStatement {
    /// The label identifier
    pub label: Identifier,
    /// The labeled body
    pub body: Box<Statement>,
    /// Source location
    pub span: Span,
}

/// A class declaration or expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    /// The class name
    pub id: Option<Identifier>,
    /// The `extends` clause
    pub super_class: Option<Box<Expression>>,
    /// The class members
    pub body: Vec<ClassMember>,
    /// Source location
    pub span: Span,
}

/// A member of a class body.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Method, accessor or constructor
    Method(MethodDefinition),
    /// Field declaration
    Property(PropertyDefinition),
    /// `static { ... }`
    StaticBlock(BlockStatement),
}

/// Kind of a class method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// `constructor() {}`
    Constructor,
    /// Plain method
    Method,
    /// `get x() {}`
    Get,
    /// `set x(v) {}`
    Set,
}

/// A class method definition.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    /// The method name
    pub key: PropertyKey,
    /// The method function
    pub value: Function,
    /// The method kind
    pub kind: MethodKind,
    /// Whether the method is static
    pub is_static: bool,
    /// Source location
    pub span: Span,
}

/// A class field.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    /// The field name
    pub key: PropertyKey,
    /// The initializer
    pub value: Option<Expression>,
    /// Whether the field is static
    pub is_static: bool,
    /// Source location
    pub span: Span,
}

/// `import` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    /// Imported bindings (empty for side-effect imports)
    pub specifiers: Vec<ImportSpecifier>,
    /// The module specifier
    pub source: StringLiteral,
    /// Source location
    pub span: Span,
}

/// A single import binding.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// `import foo from 'module'`
    Default(Identifier),
    /// `import * as foo from 'module'`
    Namespace(Identifier),
    /// `import { foo as bar } from 'module'`
    Named {
        /// The exported name in the source module
        imported: Identifier,
        /// The local binding
        local: Identifier,
    },
}

impl ImportSpecifier {
    /// The local binding introduced by this specifier.
    pub fn local(&self) -> &Identifier {
        match self {
            ImportSpecifier::Default(local) | ImportSpecifier::Namespace(local) => local,
            ImportSpecifier::Named { local, .. } => local,
        }
    }
}

/// `export` with a declaration or a specifier list.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportNamedDeclaration {
    /// `export var x`, `export function f() {}`, `export class C {}`
    pub declaration: Option<Box<Statement>>,
    /// `export { a, b as c }`
    pub specifiers: Vec<ExportSpecifier>,
    /// `from '...'` for re-exports
    pub source: Option<StringLiteral>,
    /// Source location
    pub span: Span,
}

/// `local as exported` inside an export list.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    /// The local (or re-exported) name
    pub local: Identifier,
    /// The name seen by importers
    pub exported: Identifier,
    /// Source location
    pub span: Span,
}

/// `export default ...`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDefaultDeclaration {
    /// The exported value
    pub declaration: ExportDefaultKind,
    /// Source location
    pub span: Span,
}

/// What follows `export default`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDefaultKind {
    /// `export default function ...`
    Function(Function),
    /// `export default class ...`
    Class(Class),
    /// `export default <expr>;`
    Expression(Expression),
}

/// `export * from '...'` or `export * as ns from '...'`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportAllDeclaration {
    /// The namespace name, if any
    pub exported: Option<Identifier>,
    /// The module specifier
    pub source: StringLiteral,
    /// Source location
    pub span: Span,
}

/// A binding or assignment target.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `x`
    Identifier(Identifier),
    /// `{ a, b: c, ...rest }`
    Object(ObjectPattern),
    /// `[a, , b, ...rest]`
    Array(ArrayPattern),
    /// `x = default`
    Assignment(AssignmentPattern),
    /// `...rest`
    Rest(RestElement),
    /// Member expression target (assignment only)
    Expression(Box<Expression>),
}

impl Pattern {
    /// Source location of the pattern.
    pub fn span(&self) -> Span {
        match self {
            Pattern::Identifier(id) => id.span,
            Pattern::Object(p) => p.span,
            Pattern::Array(p) => p.span,
            Pattern::Assignment(p) => p.span,
            Pattern::Rest(p) => p.span,
            Pattern::Expression(e) => e.span(),
        }
    }

    /// Collects every name this pattern binds, in source order.
    pub fn bound_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Pattern::Identifier(id) => out.push(&id.name),
            Pattern::Object(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPatternMember::Property(property) => property.value.bound_names(out),
                        ObjectPatternMember::Rest(rest) => rest.argument.bound_names(out),
                    }
                }
            }
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    element.bound_names(out);
                }
            }
            Pattern::Assignment(assignment) => assignment.left.bound_names(out),
            Pattern::Rest(rest) => rest.argument.bound_names(out),
            Pattern::Expression(_) => {}
        }
    }
}

/// An object destructuring pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPattern {
    /// Properties, with an optional trailing rest element
    pub properties: Vec<ObjectPatternMember>,
    /// Source location
    pub span: Span,
}

/// An entry of an object pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPatternMember {
    /// `key: target`, `key`, `key = default`
    Property(PatternProperty),
    /// `...rest`
    Rest(RestElement),
}

/// A property inside an object pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternProperty {
    /// The property key
    pub key: PropertyKey,
    /// The target
    pub value: Pattern,
    /// Whether written as `{ a }`
    pub shorthand: bool,
    /// Source location
    pub span: Span,
}

/// An array destructuring pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPattern {
    /// Elements (None represents a hole)
    pub elements: Vec<Option<Pattern>>,
    /// Source location
    pub span: Span,
}

/// A pattern with a default value.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentPattern {
    /// The target
    pub left: Box<Pattern>,
    /// The default value
    pub right: Box<Expression>,
    /// Source location
    pub span: Span,
}

/// A rest element in a pattern or parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct RestElement {
    /// The target
    pub argument: Box<Pattern>,
    /// Source location
    pub span: Span,
}

/// A JavaScript expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal value
    Literal(Literal),
    /// Identifier reference
    Identifier(Identifier),
    /// `#x` as the left operand of `in`
    PrivateName(Identifier),
    /// this keyword
    This(Span),
    /// super keyword
    Super(Span),
    /// Array literal
    Array(ArrayExpression),
    /// Object literal
    Object(ObjectExpression),
    /// Template literal
    Template(TemplateLiteral),
    /// Tagged template
    TaggedTemplate(TaggedTemplateExpression),
    /// Binary and logical expressions
    Binary(BinaryExpression),
    /// Unary expression
    Unary(UnaryExpression),
    /// Assignment expression
    Assignment(AssignmentExpression),
    /// Call expression
    Call(CallExpression),
    /// Member access expression
    Member(MemberExpression),
    /// Conditional (ternary) expression
    Conditional(ConditionalExpression),
    /// Function expression
    Function(Box<Function>),
    /// Arrow function expression
    Arrow(Box<ArrowFunctionExpression>),
    /// Class expression
    Class(Box<Class>),
    /// new expression
    New(NewExpression),
    /// Update expression (++/--)
    Update(UpdateExpression),
    /// Sequence expression (comma operator)
    Sequence(SequenceExpression),
    /// Spread element in calls, arrays and objects
    Spread(SpreadElement),
    /// `await x`
    Await(AwaitExpression),
    /// `yield x`, `yield* x`
    Yield(YieldExpression),
    /// `new.target`, `import.meta`
    MetaProperty(MetaProperty),
    /// Dynamic `import(...)`
    Import(ImportExpression),
}

impl Expression {
    /// Source location of the expression.
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal(e) => e.span,
            Expression::Identifier(e) | Expression::PrivateName(e) => e.span,
            Expression::This(span) | Expression::Super(span) => *span,
            Expression::Array(e) => e.span,
            Expression::Object(e) => e.span,
            Expression::Template(e) => e.span,
            Expression::TaggedTemplate(e) => e.span,
            Expression::Binary(e) => e.span,
            Expression::Unary(e) => e.span,
            Expression::Assignment(e) => e.span,
            Expression::Call(e) => e.span,
            Expression::Member(e) => e.span,
            Expression::Conditional(e) => e.span,
            Expression::Function(e) => e.span,
            Expression::Arrow(e) => e.span,
            Expression::Class(e) => e.span,
            Expression::New(e) => e.span,
            Expression::Update(e) => e.span,
            Expression::Sequence(e) => e.span,
            Expression::Spread(e) => e.span,
            Expression::Await(e) => e.span,
            Expression::Yield(e) => e.span,
            Expression::MetaProperty(e) => e.span,
            Expression::Import(e) => e.span,
        }
    }

    /// Returns the identifier name if this is a bare identifier.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Expression::Identifier(id) => Some(&id.name),
            _ => None,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// The value
    pub value: LiteralValue,
    /// Source location
    pub span: Span,
}

/// The value of a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Boolean(bool),
    /// null literal
    Null,
    /// BigInt literal
    BigInt(String),
    /// Regular expression literal
    RegExp { pattern: String, flags: String },
}

/// A string literal used as a module specifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    /// The cooked value
    pub value: String,
    /// Source location, including quotes
    pub span: Span,
}

/// An array expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpression {
    /// The elements (None represents a hole)
    pub elements: Vec<Option<Expression>>,
    /// Source location
    pub span: Span,
}

/// An object expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpression {
    /// The properties
    pub properties: Vec<ObjectMember>,
    /// Source location
    pub span: Span,
}

/// An entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    /// `key: value`, shorthand, method or accessor
    Property(Property),
    /// `...spread`
    Spread(SpreadElement),
}

/// Kind of an object literal property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `key: value`, shorthand or method
    Init,
    /// `get key() {}`
    Get,
    /// `set key(v) {}`
    Set,
}

/// An object property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// The property key
    pub key: PropertyKey,
    /// The property value
    pub value: Expression,
    /// Init, getter or setter
    pub kind: PropertyKind,
    /// Whether written with method syntax
    pub method: bool,
    /// Whether this is shorthand syntax
    pub shorthand: bool,
    /// Source location
    pub span: Span,
}

/// A property key.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Identifier key (reserved words included)
    Identifier(Identifier),
    /// Literal key (numeric or string)
    Literal(Literal),
    /// Computed key
    Computed(Box<Expression>),
    /// Private name `#x` (class members only)
    PrivateName(Identifier),
}

/// A template literal.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteral {
    /// The cooked string chunks (always one more than `expressions`)
    pub quasis: Vec<String>,
    /// The substitutions
    pub expressions: Vec<Expression>,
    /// Source location
    pub span: Span,
}

/// A tagged template.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedTemplateExpression {
    /// The tag function
    pub tag: Box<Expression>,
    /// The template
    pub quasi: TemplateLiteral,
    /// Source location
    pub span: Span,
}

/// A binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// The operator
    pub operator: BinaryOperator,
    /// The left operand
    pub left: Box<Expression>,
    /// The right operand
    pub right: Box<Expression>,
    /// Source location
    pub span: Span,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    /// +
    Add,
    /// -
    Subtract,
    /// *
    Multiply,
    /// /
    Divide,
    /// %
    Modulo,
    /// **
    Exponent,
    // Comparison
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// ===
    StrictEqual,
    /// !==
    StrictNotEqual,
    /// <
    LessThan,
    /// <=
    LessThanEqual,
    /// >
    GreaterThan,
    /// >=
    GreaterThanEqual,
    // Logical
    /// &&
    LogicalAnd,
    /// ||
    LogicalOr,
    /// ??
    NullishCoalescing,
    // Bitwise
    /// &
    BitwiseAnd,
    /// |
    BitwiseOr,
    /// ^
    BitwiseXor,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// >>>
    UnsignedRightShift,
    // Other
    /// in
    In,
    /// instanceof
    InstanceOf,
}

/// A unary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    /// The operator
    pub operator: UnaryOperator,
    /// The operand
    pub argument: Box<Expression>,
    /// Source location
    pub span: Span,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// -
    Minus,
    /// +
    Plus,
    /// !
    LogicalNot,
    /// ~
    BitwiseNot,
    /// typeof
    Typeof,
    /// void
    Void,
    /// delete
    Delete,
}

/// An assignment expression.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    /// The operator
    pub operator: AssignmentOperator,
    /// The target
    pub left: Box<Pattern>,
    /// The right-hand side
    pub right: Box<Expression>,
    /// Source location
    pub span: Span,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// =
    Assign,
    /// +=
    AddAssign,
    /// -=
    SubtractAssign,
    /// *=
    MultiplyAssign,
    /// /=
    DivideAssign,
    /// %=
    ModuloAssign,
    /// **=
    ExponentAssign,
    /// <<=
    LeftShiftAssign,
    /// >>=
    RightShiftAssign,
    /// >>>=
    UnsignedRightShiftAssign,
    /// &=
    BitwiseAndAssign,
    /// |=
    BitwiseOrAssign,
    /// ^=
    BitwiseXorAssign,
    /// &&=
    LogicalAndAssign,
    /// ||=
    LogicalOrAssign,
    /// ??=
    NullishCoalescingAssign,
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// The function being called
    pub callee: Box<Expression>,
    /// The arguments
    pub arguments: Vec<Expression>,
    /// Whether called as `f?.()`
    pub optional: bool,
    /// Source location
    pub span: Span,
}

/// A member access expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    /// The object
    pub object: Box<Expression>,
    /// The property
    pub property: MemberProperty,
    /// Whether this is computed (bracket notation)
    pub computed: bool,
    /// Whether accessed as `a?.b`
    pub optional: bool,
    /// Source location
    pub span: Span,
}

/// Member property.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// Identifier property
    Identifier(Identifier),
    /// Private name `obj.#x`
    PrivateName(Identifier),
    /// Computed property expression
    Expression(Box<Expression>),
}

/// A conditional (ternary) expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    /// The condition
    pub test: Box<Expression>,
    /// The consequent (if true)
    pub consequent: Box<Expression>,
    /// The alternate (if false)
    pub alternate: Box<Expression>,
    /// Source location
    pub span: Span,
}

/// An arrow function expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunctionExpression {
    /// Parameters
    pub params: Vec<Pattern>,
    /// Body (expression or block)
    pub body: ArrowBody,
    /// Whether async
    pub is_async: bool,
    /// Source location
    pub span: Span,
}

/// Arrow function body.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// Expression body
    Expression(Box<Expression>),
    /// Block body
    Block(Vec<Statement>),
}

/// A new expression.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    /// The constructor
    pub callee: Box<Expression>,
    /// The arguments
    pub arguments: Vec<Expression>,
    /// Source location
    pub span: Span,
}

/// An update expression (++/--)
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    /// The operator
    pub operator: UpdateOperator,
    /// The operand
    pub argument: Box<Expression>,
    /// Whether prefix (++x) or postfix (x++)
    pub prefix: bool,
    /// Source location
    pub span: Span,
}

/// Update operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    /// ++
    Increment,
    /// --
    Decrement,
}

/// A sequence expression (comma operator).
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceExpression {
    /// The expressions
    pub expressions: Vec<Expression>,
    /// Source location
    pub span: Span,
}

/// `...argument`
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadElement {
    /// The spread value
    pub argument: Box<Expression>,
    /// Source location
    pub span: Span,
}

/// `await argument`
#[derive(Debug, Clone, PartialEq)]
pub struct AwaitExpression {
    /// The awaited value
    pub argument: Box<Expression>,
    /// Source location
    pub span: Span,
}

/// `yield argument`
#[derive(Debug, Clone, PartialEq)]
pub struct YieldExpression {
    /// The yielded value
    pub argument: Option<Box<Expression>>,
    /// Whether `yield*`
    pub delegate: bool,
    /// Source location
    pub span: Span,
}

/// `meta.property`
#[derive(Debug, Clone, PartialEq)]
pub struct MetaProperty {
    /// `new` or `import`
    pub meta: Identifier,
    /// `target` or `meta`
    pub property: Identifier,
    /// Source location
    pub span: Span,
}

/// `import(source)`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportExpression {
    /// The specifier expression
    pub source: Box<Expression>,
    /// Source location
    pub span: Span,
}
