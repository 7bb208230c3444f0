//! Syntax interface consumed by the declaration scanner
//!
//! The scanner never looks at tree-sitter nodes directly. A front end (see
//! [`javascript`]) lowers the concrete syntax tree into this owned, much
//! smaller tree: only the node kinds that can introduce or route names are
//! represented precisely, everything else collapses into
//! [`NodeKind::Unsupported`] with its lowered children kept for traversal.
//!
//! Every stage that walks these trees recursively stops at [`MAX_NESTING`],
//! so deeply nested input produces diagnostics instead of exhausting the stack.

pub mod javascript;

use crate::types::Range;

pub use javascript::JavaScriptSyntax;

/// Deepest nesting lowered, scanned, or organized; deeper subtrees are skipped
pub const MAX_NESTING: usize = 200;

/// A lowered syntax node with its source range
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: Range,
}

/// Every syntax form the scanner knows how to route
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        body: Vec<Node>,
    },
    Block {
        body: Vec<Node>,
    },
    /// `export ...`; the exported declaration or value
    Export {
        body: Vec<Node>,
    },
    Import,
    Empty,
    ExpressionStatement {
        expression: Box<Node>,
    },
    If {
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    Labeled {
        body: Box<Node>,
    },
    Break,
    Continue,
    Debugger,
    With {
        body: Box<Node>,
    },
    Switch {
        cases: Vec<Node>,
    },
    SwitchCase {
        body: Vec<Node>,
    },
    Return {
        argument: Option<Box<Node>>,
    },
    Try {
        block: Box<Node>,
        handler: Option<Box<Node>>,
        finalizer: Option<Box<Node>>,
    },
    Catch {
        body: Box<Node>,
    },
    Throw {
        argument: Box<Node>,
    },
    Loop {
        kind: LoopKind,
        body: Box<Node>,
    },
    FunctionDeclaration {
        name: Option<String>,
        body: Box<Node>,
    },
    /// Function expressions, arrow functions and generator expressions
    FunctionExpression {
        name: Option<String>,
        body: Box<Node>,
    },
    VariableDeclaration {
        declarators: Vec<VariableDeclarator>,
    },
    ClassDeclaration {
        name: Option<String>,
        members: Vec<ClassMember>,
    },
    ClassExpression {
        members: Vec<ClassMember>,
    },
    This,
    Array {
        elements: Vec<Node>,
    },
    Object {
        properties: Vec<Property>,
    },
    Sequence {
        expressions: Vec<Node>,
    },
    Unary {
        argument: Box<Node>,
    },
    Binary {
        left: Box<Node>,
        right: Box<Node>,
    },
    Logical {
        left: Box<Node>,
        right: Box<Node>,
    },
    Assignment {
        target: Box<Node>,
        value: Box<Node>,
    },
    Update,
    Conditional {
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    New {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    Call {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    /// `object.property` or `object[key]`
    ///
    /// `property` is `None` for computed access whose key is not a literal.
    Member {
        object: Box<Node>,
        property: Option<String>,
    },
    Identifier {
        name: String,
    },
    /// `value` holds the unquoted text of string and numeric literals
    Literal {
        value: Option<String>,
    },
    /// A node kind with no declaration rule, `kind` is the front end's name for it
    Unsupported {
        kind: String,
        children: Vec<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    While,
    DoWhile,
    For,
    ForIn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// `None` for destructuring patterns
    pub name: Option<String>,
    pub init: Option<Node>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// `None` for computed keys and spread elements
    pub key: Option<String>,
    pub value: Node,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub name: Option<String>,
    pub is_static: bool,
    pub value: Option<Node>,
    pub range: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Block,
    Line,
}

/// A comment as reported by the front end, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct RawComment {
    pub style: CommentStyle,
    /// Comment body without the `/*` `*/` or `//` delimiters
    pub text: String,
    pub range: Range,
    /// Source text preceding the comment opener on its starting line
    pub prefix: String,
}

/// A lowered source file: the program node plus every comment in it
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub program: Node,
    pub comments: Vec<RawComment>,
    /// Whether the front end had to recover from syntax errors
    pub has_errors: bool,
    /// Position of the first syntax error, if any
    pub first_error: Option<Range>,
}

impl Node {
    pub fn new(kind: NodeKind, range: Range) -> Self {
        Self { kind, range }
    }

    /// Name of the node kind, used in diagnostics
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            NodeKind::Program { .. } => "Program",
            NodeKind::Block { .. } => "Block",
            NodeKind::Export { .. } => "Export",
            NodeKind::Import => "Import",
            NodeKind::Empty => "Empty",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::If { .. } => "If",
            NodeKind::Labeled { .. } => "Labeled",
            NodeKind::Break => "Break",
            NodeKind::Continue => "Continue",
            NodeKind::Debugger => "Debugger",
            NodeKind::With { .. } => "With",
            NodeKind::Switch { .. } => "Switch",
            NodeKind::SwitchCase { .. } => "SwitchCase",
            NodeKind::Return { .. } => "Return",
            NodeKind::Try { .. } => "Try",
            NodeKind::Catch { .. } => "Catch",
            NodeKind::Throw { .. } => "Throw",
            NodeKind::Loop { .. } => "Loop",
            NodeKind::FunctionDeclaration { .. } => "FunctionDeclaration",
            NodeKind::FunctionExpression { .. } => "FunctionExpression",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::ClassDeclaration { .. } => "ClassDeclaration",
            NodeKind::ClassExpression { .. } => "ClassExpression",
            NodeKind::This => "This",
            NodeKind::Array { .. } => "Array",
            NodeKind::Object { .. } => "Object",
            NodeKind::Sequence { .. } => "Sequence",
            NodeKind::Unary { .. } => "Unary",
            NodeKind::Binary { .. } => "Binary",
            NodeKind::Logical { .. } => "Logical",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::Update => "Update",
            NodeKind::Conditional { .. } => "Conditional",
            NodeKind::New { .. } => "New",
            NodeKind::Call { .. } => "Call",
            NodeKind::Member { .. } => "Member",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::Unsupported { kind, .. } => kind,
        }
    }

    pub fn identifier(name: impl Into<String>, range: Range) -> Self {
        Self::new(NodeKind::Identifier { name: name.into() }, range)
    }
}
