//! Type expressions and function signatures.

use crate::node::Ident;

/// A type as written in source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeExpr<'ast> {
    /// A bare type name: `int`, `Point`
    Named(Ident<'ast>),
    /// A type from an imported package: `strings.Builder`
    Qualified {
        /// The import name
        package: Ident<'ast>,
        /// The type name inside that package
        name: Ident<'ast>,
    },
    /// Pointer to another type: `*Point`
    Pointer(&'ast TypeExpr<'ast>),
}

/// A parameter or result in a signature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field<'ast> {
    /// Name (None for unnamed results)
    pub name: Option<Ident<'ast>>,
    /// Declared type
    pub ty: TypeExpr<'ast>,
}

/// A function signature.
///
/// Example: `func(a int, b string) (int, error)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FuncType<'ast> {
    /// Parameters
    pub params: &'ast [Field<'ast>],
    /// Results
    pub results: &'ast [Field<'ast>],
}
