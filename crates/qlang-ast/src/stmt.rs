//! Statement nodes for function bodies.

use qlang_core::Span;

use crate::decl::ValueSpec;
use crate::expr::Expr;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// Expression statement
    Expr(ExprStmt<'ast>),
    /// Local variable declaration: `var x int`
    Var(ValueSpec<'ast>),
    /// Nested block
    Block(Block<'ast>),
    /// Return statement
    Return(ReturnStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(s) => s.span,
            Self::Var(s) => s.span,
            Self::Block(s) => s.span,
            Self::Return(s) => s.span,
        }
    }
}

/// An expression evaluated for its effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    /// The expression
    pub expr: Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A `return` with zero or more results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    /// Returned values
    pub results: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A braced statement list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Block<'ast> {
    /// Statements in order
    pub stmts: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}
