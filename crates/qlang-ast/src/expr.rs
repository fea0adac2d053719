//! Expression nodes.
//!
//! Only the forms the front end inspects are modelled: names, selectors,
//! calls and literals.

use qlang_core::Span;

use crate::node::Ident;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Identifier reference
    Ident(Ident<'ast>),
    /// Literal value
    Literal(Literal<'ast>),
    /// Function call
    Call(&'ast CallExpr<'ast>),
    /// Selector: `x.sel`
    Selector(&'ast SelectorExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Ident(e) => e.span,
            Self::Literal(e) => e.span,
            Self::Call(e) => e.span,
            Self::Selector(e) => e.span,
        }
    }
}

/// Literal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    String,
}

/// A literal as written in source (unparsed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Literal<'ast> {
    /// Literal kind
    pub kind: LitKind,
    /// Source text
    pub value: &'ast str,
    /// Source location
    pub span: Span,
}

/// A call: `fun(args...)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// The callee
    pub func: Expr<'ast>,
    /// Arguments
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A selector: `x.sel`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorExpr<'ast> {
    /// Operand
    pub x: Expr<'ast>,
    /// Selected name
    pub sel: Ident<'ast>,
    /// Source location
    pub span: Span,
}
