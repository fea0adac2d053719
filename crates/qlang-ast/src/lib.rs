//! Syntax tree for qlang packages.
//!
//! This crate provides the tree the front end consumes. Tokenizing and
//! parsing happen upstream; nodes are allocated in a `bumpalo` arena and
//! borrow from it for `'ast`.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use qlang_ast::AstBuilder;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let file = b.file("main.q", &[
//!     b.func("main", &[], &[b.call_stmt("helper")]),
//!     b.func("helper", &[], &[]),
//! ]);
//! let pkg = b.package("main", &[file]);
//! assert_eq!(pkg.files[0].decls.len(), 2);
//! ```

mod builder;
pub mod decl;
pub mod expr;
mod node;
pub mod stmt;
pub mod types;

pub use builder::AstBuilder;
pub use decl::*;
pub use expr::*;
pub use node::Ident;
pub use stmt::*;
pub use types::*;

use qlang_core::Span;

/// A package: every file that shares one package-level scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Package<'ast> {
    /// Package name (`main` for executables)
    pub name: &'ast str,
    /// Files in load order
    pub files: &'ast [File<'ast>],
}

/// One parsed source file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct File<'ast> {
    /// File name, for diagnostics
    pub name: &'ast str,
    /// Top-level declarations in source order
    pub decls: &'ast [Decl<'ast>],
    /// Source location
    pub span: Span,
}

impl<'ast> File<'ast> {
    /// Functions and methods declared in this file.
    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl<'ast>> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Func(f) => Some(f),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    #[test]
    fn file_funcs_skips_other_decls() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let file = b.file(
            "a.q",
            &[
                b.imports(&[b.import("strings")]),
                b.func("f", &[], &[]),
                b.type_def("T", b.named("int")),
                b.method("T", false, "M", &[]),
            ],
        );
        let names: Vec<_> = file.funcs().map(|f| f.name.name).collect();
        assert_eq!(names, ["f", "M"]);
    }

    #[test]
    fn decl_span_follows_variant() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let bad = b.bad_at(Span::new(7, 3));
        assert_eq!(bad.span(), Span::new(7, 3));
    }
}
