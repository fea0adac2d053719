//! Top-level declaration nodes.
//!
//! Provides nodes for everything that can appear at file scope:
//! - Imports
//! - Functions and methods
//! - Type declarations (definitions and aliases)
//! - Constant and variable declarations

use qlang_core::Span;

use crate::expr::Expr;
use crate::node::Ident;
use crate::stmt::Block;
use crate::types::{FuncType, TypeExpr};

/// A top-level declaration in a file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decl<'ast> {
    /// `import (...)`
    Import(GenDecl<'ast, ImportSpec<'ast>>),
    /// `type (...)`
    Type(GenDecl<'ast, TypeSpec<'ast>>),
    /// `const (...)`
    Const(GenDecl<'ast, ValueSpec<'ast>>),
    /// `var (...)`
    Var(GenDecl<'ast, ValueSpec<'ast>>),
    /// Function or method declaration
    Func(FuncDecl<'ast>),
    /// Placeholder the parser leaves where a declaration failed to parse
    Bad(BadDecl),
}

impl<'ast> Decl<'ast> {
    /// Get the span of this declaration.
    pub fn span(&self) -> Span {
        match self {
            Self::Import(d) => d.span,
            Self::Type(d) => d.span,
            Self::Const(d) => d.span,
            Self::Var(d) => d.span,
            Self::Func(d) => d.span,
            Self::Bad(d) => d.span,
        }
    }
}

/// A grouped declaration: `import ( a; b )`, `var ( x int; y int )`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenDecl<'ast, S> {
    /// Specs in source order
    pub specs: &'ast [S],
    /// Source location
    pub span: Span,
}

/// One imported package.
///
/// Examples:
/// - `"strings"` binds `strings`
/// - `str "strings"` binds `str`
/// - `_ "net/http/pprof"` and `. "fmt"` use the blank and dot forms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportSpec<'ast> {
    /// Explicit local name
    pub name: Option<Ident<'ast>>,
    /// Package path, unquoted
    pub path: &'ast str,
    /// Source location
    pub span: Span,
}

/// One named type.
///
/// Examples:
/// - `type Point struct { ... }`
/// - `type Celsius = float64` (alias)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeSpec<'ast> {
    /// Type name
    pub name: Ident<'ast>,
    /// Whether this is an alias (`=`) rather than a new type
    pub alias: bool,
    /// Underlying type
    pub ty: TypeExpr<'ast>,
    /// Source location
    pub span: Span,
}

/// A constant or variable spec: `x, y int = 1, 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueSpec<'ast> {
    /// Declared names
    pub names: &'ast [Ident<'ast>],
    /// Declared type, if written
    pub ty: Option<TypeExpr<'ast>>,
    /// Initializers
    pub values: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A function or method declaration.
///
/// Examples:
/// - `func main() { }`
/// - `func (p *Point) Move(dx int) { }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuncDecl<'ast> {
    /// Receiver (methods only)
    pub recv: Option<Receiver<'ast>>,
    /// Function name
    pub name: Ident<'ast>,
    /// Signature
    pub ty: FuncType<'ast>,
    /// Body (None for externally implemented functions)
    pub body: Option<Block<'ast>>,
    /// Source location
    pub span: Span,
}

/// A method receiver: `(p *Point)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Receiver<'ast> {
    /// Receiver variable name (may be omitted)
    pub name: Option<Ident<'ast>>,
    /// Receiver base type name
    pub type_name: Ident<'ast>,
    /// Whether the receiver is a pointer
    pub pointer: bool,
}

/// A declaration that could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadDecl {
    /// Source location
    pub span: Span,
}
