//! Abstract Syntax Tree node definitions
//!
//! Every node owns its children and carries the [`SourceSpan`] it was parsed
//! from. Identifier nodes additionally carry the [`FieldId`] the resolver
//! bound them to.

use crate::scope::FieldId;
use core_types::SourceSpan;

/// Complete program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements
    pub body: Vec<Statement>,
    /// Source location
    pub span: SourceSpan,
}

/// An identifier, either a binding or a reference
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// Name as written (escapes decoded)
    pub name: String,
    /// Source location
    pub span: SourceSpan,
    /// Variable field this identifier resolved to
    pub field: Option<FieldId>,
}

impl Identifier {
    /// Create an unresolved identifier
    pub fn new(name: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            span,
            field: None,
        }
    }
}

/// JavaScript statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Variable declaration (let, const, var)
    VariableDeclaration {
        /// Declaration kind (let, const, var)
        kind: VariableKind,
        /// List of declarators
        declarations: Vec<VariableDeclarator>,
        /// Source location
        span: SourceSpan,
    },

    /// Function declaration
    FunctionDeclaration {
        /// The function; its `id` is always set
        function: Function,
        /// Source location
        span: SourceSpan,
    },

    /// Class declaration
    ClassDeclaration {
        /// The class; its `id` is always set
        class: Class,
        /// Source location
        span: SourceSpan,
    },

    /// Expression statement
    ExpressionStatement {
        /// The expression
        expression: Expression,
        /// Source location
        span: SourceSpan,
    },

    /// Return statement
    ReturnStatement {
        /// Return value
        argument: Option<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// If statement
    IfStatement {
        /// Condition
        test: Expression,
        /// Consequent
        consequent: Box<Statement>,
        /// Alternate
        alternate: Option<Box<Statement>>,
        /// Source location
        span: SourceSpan,
    },

    /// While loop
    WhileStatement {
        /// Loop condition
        test: Expression,
        /// Loop body
        body: Box<Statement>,
        /// Source location
        span: SourceSpan,
    },

    /// Do-while loop
    DoWhileStatement {
        /// Loop body
        body: Box<Statement>,
        /// Loop condition
        test: Expression,
        /// Source location
        span: SourceSpan,
    },

    /// For loop
    ForStatement {
        /// Initialization
        init: Option<ForInit>,
        /// Condition
        test: Option<Expression>,
        /// Update expression
        update: Option<Expression>,
        /// Loop body
        body: Box<Statement>,
        /// Source location
        span: SourceSpan,
    },

    /// For...in loop
    ForInStatement {
        /// Left side (declaration or target)
        left: ForInOfLeft,
        /// Object to iterate over
        right: Expression,
        /// Loop body
        body: Box<Statement>,
        /// Source location
        span: SourceSpan,
    },

    /// For...of loop
    ForOfStatement {
        /// Left side (declaration or target)
        left: ForInOfLeft,
        /// Iterable
        right: Expression,
        /// Loop body
        body: Box<Statement>,
        /// `for await`
        is_await: bool,
        /// Source location
        span: SourceSpan,
    },

    /// Block statement
    BlockStatement {
        /// Block body
        body: Vec<Statement>,
        /// Source location
        span: SourceSpan,
    },

    /// Empty statement
    EmptyStatement {
        /// Source location
        span: SourceSpan,
    },

    /// Break statement
    BreakStatement {
        /// Optional label
        label: Option<String>,
        /// Source location
        span: SourceSpan,
    },

    /// Continue statement
    ContinueStatement {
        /// Optional label
        label: Option<String>,
        /// Source location
        span: SourceSpan,
    },

    /// Throw statement
    ThrowStatement {
        /// Exception to throw
        argument: Expression,
        /// Source location
        span: SourceSpan,
    },

    /// Try statement
    TryStatement {
        /// Try block
        block: Vec<Statement>,
        /// Catch clause
        handler: Option<CatchClause>,
        /// Finally block
        finalizer: Option<Vec<Statement>>,
        /// Source location
        span: SourceSpan,
    },

    /// Switch statement
    SwitchStatement {
        /// Discriminant expression
        discriminant: Expression,
        /// Case clauses
        cases: Vec<SwitchCase>,
        /// Source location
        span: SourceSpan,
    },

    /// With statement
    WithStatement {
        /// Object expression
        object: Expression,
        /// Body statement
        body: Box<Statement>,
        /// Source location
        span: SourceSpan,
    },

    /// Debugger statement
    DebuggerStatement {
        /// Source location
        span: SourceSpan,
    },

    /// Labeled statement
    LabeledStatement {
        /// Label name
        label: String,
        /// Body statement
        body: Box<Statement>,
        /// Source location
        span: SourceSpan,
    },

    /// A `/*! ... */` comment kept in the output
    ImportantComment {
        /// Comment text including delimiters
        text: String,
        /// Source location
        span: SourceSpan,
    },
}

impl Statement {
    /// Source location of the statement
    pub fn span(&self) -> &SourceSpan {
        match self {
            Statement::VariableDeclaration { span, .. }
            | Statement::FunctionDeclaration { span, .. }
            | Statement::ClassDeclaration { span, .. }
            | Statement::ExpressionStatement { span, .. }
            | Statement::ReturnStatement { span, .. }
            | Statement::IfStatement { span, .. }
            | Statement::WhileStatement { span, .. }
            | Statement::DoWhileStatement { span, .. }
            | Statement::ForStatement { span, .. }
            | Statement::ForInStatement { span, .. }
            | Statement::ForOfStatement { span, .. }
            | Statement::BlockStatement { span, .. }
            | Statement::EmptyStatement { span }
            | Statement::BreakStatement { span, .. }
            | Statement::ContinueStatement { span, .. }
            | Statement::ThrowStatement { span, .. }
            | Statement::TryStatement { span, .. }
            | Statement::SwitchStatement { span, .. }
            | Statement::WithStatement { span, .. }
            | Statement::DebuggerStatement { span }
            | Statement::LabeledStatement { span, .. }
            | Statement::ImportantComment { span, .. } => span,
        }
    }
}

/// Switch case clause
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Test expression (None for default case)
    pub test: Option<Expression>,
    /// Consequent statements
    pub consequent: Vec<Statement>,
    /// Source location
    pub span: SourceSpan,
}

/// Catch clause
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// Parameter
    pub param: Option<Pattern>,
    /// Body
    pub body: Vec<Statement>,
    /// Source location
    pub span: SourceSpan,
}

/// Function shared by declarations, expressions and methods
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Name, if any
    pub id: Option<Identifier>,
    /// Parameters
    pub params: Vec<Pattern>,
    /// Body
    pub body: Vec<Statement>,
    /// Is async function
    pub is_async: bool,
    /// Is generator function
    pub is_generator: bool,
}

/// Class shared by declarations and expressions
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    /// Name, if any
    pub id: Option<Identifier>,
    /// Superclass expression
    pub super_class: Option<Box<Expression>>,
    /// Class body
    pub body: Vec<ClassElement>,
}

/// Class element
#[derive(Debug, Clone, PartialEq)]
pub enum ClassElement {
    /// Method, accessor or constructor
    Method {
        /// Method name
        key: PropertyKey,
        /// Method kind
        kind: MethodKind,
        /// Method function
        function: Function,
        /// Is static
        is_static: bool,
        /// Source location
        span: SourceSpan,
    },
    /// Field definition
    Property {
        /// Property key
        key: PropertyKey,
        /// Initial value
        value: Option<Expression>,
        /// Is static
        is_static: bool,
        /// Source location
        span: SourceSpan,
    },
    /// `static { ... }`
    StaticBlock {
        /// Block body
        body: Vec<Statement>,
        /// Source location
        span: SourceSpan,
    },
}

/// Method kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Regular method
    Method,
    /// Getter
    Get,
    /// Setter
    Set,
    /// Constructor
    Constructor,
}

/// JavaScript expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Identifier reference
    Identifier(Identifier),

    /// Literal value
    Literal {
        /// Literal value
        value: Literal,
        /// Source location
        span: SourceSpan,
    },

    /// Regular expression literal
    RegExp {
        /// Raw text including slashes and flags
        raw: String,
        /// Source location
        span: SourceSpan,
    },

    /// Template literal
    TemplateLiteral {
        /// Text pieces, one more than `expressions`
        quasis: Vec<TemplateElement>,
        /// Interpolated parts
        expressions: Vec<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// Tagged template
    TaggedTemplate {
        /// Tag function
        tag: Box<Expression>,
        /// Text pieces
        quasis: Vec<TemplateElement>,
        /// Interpolated parts
        expressions: Vec<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// Array literal
    ArrayExpression {
        /// Elements; `None` is a hole
        elements: Vec<Option<Expression>>,
        /// Source location
        span: SourceSpan,
    },

    /// Object literal
    ObjectExpression {
        /// Properties
        properties: Vec<ObjectProperty>,
        /// Source location
        span: SourceSpan,
    },

    /// Function expression
    FunctionExpression {
        /// The function
        function: Function,
        /// Source location
        span: SourceSpan,
    },

    /// Arrow function
    ArrowFunctionExpression {
        /// Parameters
        params: Vec<Pattern>,
        /// Body (expression or block)
        body: ArrowFunctionBody,
        /// Is async
        is_async: bool,
        /// Source location
        span: SourceSpan,
    },

    /// Class expression
    ClassExpression {
        /// The class
        class: Class,
        /// Source location
        span: SourceSpan,
    },

    /// Unary operation
    UnaryExpression {
        /// Operator
        operator: UnaryOperator,
        /// Operand
        argument: Box<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// Update expression (++, --)
    UpdateExpression {
        /// Operator
        operator: UpdateOperator,
        /// Operand
        argument: Box<Expression>,
        /// Is prefix operator
        prefix: bool,
        /// Source location
        span: SourceSpan,
    },

    /// Binary operation
    BinaryExpression {
        /// Left operand
        left: Box<Expression>,
        /// Operator
        operator: BinaryOperator,
        /// Right operand
        right: Box<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// Logical expression (&&, ||, ??)
    LogicalExpression {
        /// Left operand
        left: Box<Expression>,
        /// Operator
        operator: LogicalOperator,
        /// Right operand
        right: Box<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// Assignment expression
    AssignmentExpression {
        /// Left-hand side
        left: AssignmentTarget,
        /// Operator
        operator: AssignmentOperator,
        /// Right-hand side
        right: Box<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// Conditional expression (ternary)
    ConditionalExpression {
        /// Condition
        test: Box<Expression>,
        /// Consequent
        consequent: Box<Expression>,
        /// Alternate
        alternate: Box<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// Function call
    CallExpression {
        /// Function being called
        callee: Box<Expression>,
        /// Arguments
        arguments: Vec<Expression>,
        /// Optional call (`foo?.()`)
        optional: bool,
        /// Source location
        span: SourceSpan,
    },

    /// New expression
    NewExpression {
        /// Constructor
        callee: Box<Expression>,
        /// Arguments
        arguments: Vec<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// Member access (`obj.prop`, `obj[prop]`, `obj.#priv`)
    MemberExpression {
        /// Object
        object: Box<Expression>,
        /// Property. For non-computed access this is an identifier that is
        /// never resolved as a reference; private names keep their `#`.
        property: Box<Expression>,
        /// Is computed (bracket notation)
        computed: bool,
        /// Optional access (`obj?.prop`)
        optional: bool,
        /// Source location
        span: SourceSpan,
    },

    /// Sequence expression (comma-separated)
    SequenceExpression {
        /// Expressions
        expressions: Vec<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// `this`
    ThisExpression {
        /// Source location
        span: SourceSpan,
    },

    /// `super`
    SuperExpression {
        /// Source location
        span: SourceSpan,
    },

    /// Meta property (`new.target`)
    MetaProperty {
        /// Meta (`new`)
        meta: String,
        /// Property (`target`)
        property: String,
        /// Source location
        span: SourceSpan,
    },

    /// Await expression
    AwaitExpression {
        /// Argument
        argument: Box<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// Yield expression
    YieldExpression {
        /// Argument
        argument: Option<Box<Expression>>,
        /// Is delegated (`yield*`)
        delegate: bool,
        /// Source location
        span: SourceSpan,
    },

    /// Spread element in calls and arrays
    SpreadElement {
        /// Argument to spread
        argument: Box<Expression>,
        /// Source location
        span: SourceSpan,
    },

    /// Placeholder for an expression that could not be parsed
    Error {
        /// Source location
        span: SourceSpan,
    },
}

impl Expression {
    /// Source location of the expression
    pub fn span(&self) -> &SourceSpan {
        match self {
            Expression::Identifier(id) => &id.span,
            Expression::Literal { span, .. }
            | Expression::RegExp { span, .. }
            | Expression::TemplateLiteral { span, .. }
            | Expression::TaggedTemplate { span, .. }
            | Expression::ArrayExpression { span, .. }
            | Expression::ObjectExpression { span, .. }
            | Expression::FunctionExpression { span, .. }
            | Expression::ArrowFunctionExpression { span, .. }
            | Expression::ClassExpression { span, .. }
            | Expression::UnaryExpression { span, .. }
            | Expression::UpdateExpression { span, .. }
            | Expression::BinaryExpression { span, .. }
            | Expression::LogicalExpression { span, .. }
            | Expression::AssignmentExpression { span, .. }
            | Expression::ConditionalExpression { span, .. }
            | Expression::CallExpression { span, .. }
            | Expression::NewExpression { span, .. }
            | Expression::MemberExpression { span, .. }
            | Expression::SequenceExpression { span, .. }
            | Expression::ThisExpression { span }
            | Expression::SuperExpression { span }
            | Expression::MetaProperty { span, .. }
            | Expression::AwaitExpression { span, .. }
            | Expression::YieldExpression { span, .. }
            | Expression::SpreadElement { span, .. }
            | Expression::Error { span } => span,
        }
    }

    /// Node kind name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Identifier(_) => "identifier",
            Expression::Literal { value, .. } => match value {
                Literal::Number { .. } => "number",
                Literal::BigInt(_) => "bigint literal",
                Literal::String { .. } => "string",
                Literal::Boolean(_) => "boolean",
                Literal::Null => "null",
            },
            Expression::RegExp { .. } => "regular expression",
            Expression::TemplateLiteral { .. } => "template literal",
            Expression::TaggedTemplate { .. } => "tagged template",
            Expression::ArrayExpression { .. } => "array literal",
            Expression::ObjectExpression { .. } => "object literal",
            Expression::FunctionExpression { .. } => "function expression",
            Expression::ArrowFunctionExpression { .. } => "arrow function",
            Expression::ClassExpression { .. } => "class expression",
            Expression::UnaryExpression { .. } => "unary expression",
            Expression::UpdateExpression { .. } => "update expression",
            Expression::BinaryExpression { .. } => "binary expression",
            Expression::LogicalExpression { .. } => "logical expression",
            Expression::AssignmentExpression { .. } => "assignment",
            Expression::ConditionalExpression { .. } => "conditional expression",
            Expression::CallExpression { .. } => "call expression",
            Expression::NewExpression { .. } => "new expression",
            Expression::MemberExpression { .. } => "member expression",
            Expression::SequenceExpression { .. } => "sequence expression",
            Expression::ThisExpression { .. } => "this",
            Expression::SuperExpression { .. } => "super",
            Expression::MetaProperty { .. } => "meta property",
            Expression::AwaitExpression { .. } => "await expression",
            Expression::YieldExpression { .. } => "yield expression",
            Expression::SpreadElement { .. } => "spread element",
            Expression::Error { .. } => "invalid expression",
        }
    }
}

/// Variable declaration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// var declaration
    Var,
    /// let declaration
    Let,
    /// const declaration
    Const,
}

impl VariableKind {
    /// Keyword text
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

/// Variable declarator
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// Pattern (identifier or destructuring)
    pub id: Pattern,
    /// Initial value
    pub init: Option<Expression>,
    /// Source location
    pub span: SourceSpan,
}

/// Binding or assignment pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Simple identifier
    Identifier(Identifier),
    /// Object destructuring
    ObjectPattern {
        /// Properties
        properties: Vec<ObjectPatternProperty>,
        /// `...rest`
        rest: Option<Box<Pattern>>,
        /// Source location
        span: SourceSpan,
    },
    /// Array destructuring
    ArrayPattern {
        /// Elements; `None` is a hole
        elements: Vec<Option<Pattern>>,
        /// Source location
        span: SourceSpan,
    },
    /// Pattern with default value
    AssignmentPattern {
        /// Target
        left: Box<Pattern>,
        /// Default value
        right: Box<Expression>,
        /// Source location
        span: SourceSpan,
    },
    /// Rest element (`...rest`)
    RestElement {
        /// Target
        argument: Box<Pattern>,
        /// Source location
        span: SourceSpan,
    },
    /// Member expression target, only in destructuring assignment
    Expression(Box<Expression>),
}

impl Pattern {
    /// Source location of the pattern
    pub fn span(&self) -> &SourceSpan {
        match self {
            Pattern::Identifier(id) => &id.span,
            Pattern::ObjectPattern { span, .. }
            | Pattern::ArrayPattern { span, .. }
            | Pattern::AssignmentPattern { span, .. }
            | Pattern::RestElement { span, .. } => span,
            Pattern::Expression(expr) => expr.span(),
        }
    }
}

/// Object pattern property
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatternProperty {
    /// Key
    pub key: PropertyKey,
    /// Value pattern
    pub value: Pattern,
    /// Written as `{ a }` or `{ a = 1 }`
    pub shorthand: bool,
}

/// Literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Number
    Number {
        /// Numeric value
        value: f64,
        /// Source text
        raw: String,
    },
    /// BigInt, source text including the `n`
    BigInt(String),
    /// String
    String {
        /// Cooked value; `None` if it cannot be represented losslessly
        value: Option<String>,
        /// Source text including quotes
        raw: String,
    },
    /// Boolean
    Boolean(bool),
    /// Null
    Null,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition
    Add,
    /// Subtraction
    Sub,
    /// Multiplication
    Mul,
    /// Division
    Div,
    /// Modulo
    Mod,
    /// Exponentiation
    Exp,
    /// Equality
    Eq,
    /// Inequality
    NotEq,
    /// Strict equality
    StrictEq,
    /// Strict inequality
    StrictNotEq,
    /// Less than
    Lt,
    /// Less than or equal
    LtEq,
    /// Greater than
    Gt,
    /// Greater than or equal
    GtEq,
    /// Bitwise AND
    BitwiseAnd,
    /// Bitwise OR
    BitwiseOr,
    /// Bitwise XOR
    BitwiseXor,
    /// Left shift
    LeftShift,
    /// Right shift
    RightShift,
    /// Unsigned right shift
    UnsignedRightShift,
    /// Instanceof
    Instanceof,
    /// In
    In,
}

impl BinaryOperator {
    /// Operator text
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Exp => "**",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::StrictEq => "===",
            BinaryOperator::StrictNotEq => "!==",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::UnsignedRightShift => ">>>",
            BinaryOperator::Instanceof => "instanceof",
            BinaryOperator::In => "in",
        }
    }

    /// Binding power; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::BitwiseOr => 6,
            BinaryOperator::BitwiseXor => 7,
            BinaryOperator::BitwiseAnd => 8,
            BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::StrictEq
            | BinaryOperator::StrictNotEq => 9,
            BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq
            | BinaryOperator::Instanceof
            | BinaryOperator::In => 10,
            BinaryOperator::LeftShift
            | BinaryOperator::RightShift
            | BinaryOperator::UnsignedRightShift => 11,
            BinaryOperator::Add | BinaryOperator::Sub => 12,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 13,
            BinaryOperator::Exp => 14,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Negate
    Minus,
    /// Plus (type coercion)
    Plus,
    /// Logical NOT
    Not,
    /// Bitwise NOT
    BitwiseNot,
    /// Typeof
    Typeof,
    /// Void
    Void,
    /// Delete
    Delete,
}

impl UnaryOperator {
    /// Operator text
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::Typeof => "typeof",
            UnaryOperator::Void => "void",
            UnaryOperator::Delete => "delete",
        }
    }
}

/// Update operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    /// Increment
    Increment,
    /// Decrement
    Decrement,
}

impl UpdateOperator {
    /// Operator text
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOperator::Increment => "++",
            UpdateOperator::Decrement => "--",
        }
    }
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// Logical AND
    And,
    /// Logical OR
    Or,
    /// Nullish coalescing
    NullishCoalesce,
}

impl LogicalOperator {
    /// Operator text
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
            LogicalOperator::NullishCoalesce => "??",
        }
    }

    /// Binding power; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            LogicalOperator::NullishCoalesce => 3,
            LogicalOperator::Or => 4,
            LogicalOperator::And => 5,
        }
    }
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// Simple assignment (=)
    Assign,
    /// Addition assignment (+=)
    AddAssign,
    /// Subtraction assignment (-=)
    SubAssign,
    /// Multiplication assignment (*=)
    MulAssign,
    /// Division assignment (/=)
    DivAssign,
    /// Modulo assignment (%=)
    ModAssign,
    /// Exponentiation assignment (**=)
    ExpAssign,
    /// Bitwise AND assignment (&=)
    BitAndAssign,
    /// Bitwise OR assignment (|=)
    BitOrAssign,
    /// Bitwise XOR assignment (^=)
    BitXorAssign,
    /// Left shift assignment (<<=)
    LeftShiftAssign,
    /// Right shift assignment (>>=)
    RightShiftAssign,
    /// Unsigned right shift assignment (>>>=)
    UnsignedRightShiftAssign,
    /// Logical AND assignment (&&=)
    LogicalAndAssign,
    /// Logical OR assignment (||=)
    LogicalOrAssign,
    /// Nullish coalescing assignment (??=)
    NullishCoalesceAssign,
}

impl AssignmentOperator {
    /// Operator text
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentOperator::Assign => "=",
            AssignmentOperator::AddAssign => "+=",
            AssignmentOperator::SubAssign => "-=",
            AssignmentOperator::MulAssign => "*=",
            AssignmentOperator::DivAssign => "/=",
            AssignmentOperator::ModAssign => "%=",
            AssignmentOperator::ExpAssign => "**=",
            AssignmentOperator::BitAndAssign => "&=",
            AssignmentOperator::BitOrAssign => "|=",
            AssignmentOperator::BitXorAssign => "^=",
            AssignmentOperator::LeftShiftAssign => "<<=",
            AssignmentOperator::RightShiftAssign => ">>=",
            AssignmentOperator::UnsignedRightShiftAssign => ">>>=",
            AssignmentOperator::LogicalAndAssign => "&&=",
            AssignmentOperator::LogicalOrAssign => "||=",
            AssignmentOperator::NullishCoalesceAssign => "??=",
        }
    }
}

/// Assignment target
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentTarget {
    /// Simple identifier
    Identifier(Identifier),
    /// Member expression
    Member(Box<Expression>),
    /// Destructuring pattern
    Pattern(Pattern),
}

/// For loop initialization
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// Variable declaration
    VariableDeclaration {
        /// Kind
        kind: VariableKind,
        /// Declarations
        declarations: Vec<VariableDeclarator>,
    },
    /// Expression
    Expression(Expression),
}

/// Left side of for-in/for-of loop
#[derive(Debug, Clone, PartialEq)]
pub enum ForInOfLeft {
    /// Variable declaration (`let x`, `const x`, `var x`)
    VariableDeclaration {
        /// Kind
        kind: VariableKind,
        /// Binding pattern
        id: Pattern,
    },
    /// Existing variable, member or pattern
    Pattern(Pattern),
}

/// Object property
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectProperty {
    /// `key: value`, or shorthand `key`
    Property {
        /// Key
        key: PropertyKey,
        /// Value
        value: Expression,
        /// Written as `{ a }`
        shorthand: bool,
        /// Source location
        span: SourceSpan,
    },
    /// Method or accessor
    Method {
        /// Key
        key: PropertyKey,
        /// Method kind; never `Constructor`
        kind: MethodKind,
        /// Method function
        function: Function,
        /// Source location
        span: SourceSpan,
    },
    /// `...expr`
    Spread {
        /// Spread argument
        argument: Expression,
        /// Source location
        span: SourceSpan,
    },
}

/// Property key
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Identifier (or reserved word) key
    Identifier(String),
    /// String literal key
    String {
        /// Cooked value
        value: Option<String>,
        /// Source text including quotes
        raw: String,
    },
    /// Number literal key
    Number {
        /// Numeric value
        value: f64,
        /// Source text
        raw: String,
    },
    /// Computed key (`[expr]`)
    Computed(Box<Expression>),
    /// Private name, stored with its `#`
    Private(String),
}

/// Arrow function body
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowFunctionBody {
    /// Expression body
    Expression(Box<Expression>),
    /// Block body
    Block(Vec<Statement>),
}

/// Template literal element
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateElement {
    /// Raw text between delimiters
    pub raw: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: f64) -> Expression {
        Expression::Literal {
            value: Literal::Number {
                value,
                raw: value.to_string(),
            },
            span: SourceSpan::synthetic(),
        }
    }

    #[test]
    fn test_variable_declaration() {
        let decl = Statement::VariableDeclaration {
            kind: VariableKind::Let,
            declarations: vec![VariableDeclarator {
                id: Pattern::Identifier(Identifier::new("x", SourceSpan::synthetic())),
                init: Some(num(42.0)),
                span: SourceSpan::synthetic(),
            }],
            span: SourceSpan::new(None, 1, 1, 1, 11),
        };
        assert!(matches!(decl, Statement::VariableDeclaration { .. }));
        assert_eq!(decl.span().end_column, 11);
    }

    #[test]
    fn test_expression_span_and_kind() {
        let expr = Expression::BinaryExpression {
            left: Box::new(num(1.0)),
            operator: BinaryOperator::Add,
            right: Box::new(num(2.0)),
            span: SourceSpan::new(None, 3, 1, 3, 6),
        };
        assert_eq!(expr.span().start_line, 3);
        assert_eq!(expr.kind_name(), "binary expression");
    }

    #[test]
    fn test_operator_precedence_order() {
        assert!(BinaryOperator::Mul.precedence() > BinaryOperator::Add.precedence());
        assert!(BinaryOperator::Add.precedence() > BinaryOperator::Lt.precedence());
        assert!(BinaryOperator::BitwiseOr.precedence() > LogicalOperator::And.precedence());
        assert!(LogicalOperator::And.precedence() > LogicalOperator::Or.precedence());
    }

    #[test]
    fn test_identifier_starts_unresolved() {
        let id = Identifier::new("a", SourceSpan::synthetic());
        assert!(id.field.is_none());
    }
}
