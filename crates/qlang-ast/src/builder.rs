//! Arena-backed construction helpers for syntax trees.
//!
//! Upstream parsers and tests build trees through [`AstBuilder`] so every
//! node lands in the same arena. Nodes built here carry default spans
//! unless a `*_at` variant is used.

use bumpalo::Bump;
use qlang_core::Span;

use crate::decl::{BadDecl, Decl, FuncDecl, GenDecl, ImportSpec, Receiver, TypeSpec, ValueSpec};
use crate::expr::{CallExpr, Expr, LitKind, Literal, SelectorExpr};
use crate::node::Ident;
use crate::stmt::{Block, ExprStmt, ReturnStmt, Stmt};
use crate::types::{Field, FuncType, TypeExpr};
use crate::{File, Package};

/// Allocates tree nodes in an arena.
#[derive(Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
}

impl<'ast> AstBuilder<'ast> {
    /// Create a builder over an arena.
    pub fn new(arena: &'ast Bump) -> Self {
        Self { arena }
    }

    /// The arena nodes are allocated in.
    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    fn str(&self, s: &str) -> &'ast str {
        self.arena.alloc_str(s)
    }

    fn slice<T: Copy>(&self, items: &[T]) -> &'ast [T] {
        self.arena.alloc_slice_copy(items)
    }

    // ==========================================================================
    // Names and types
    // ==========================================================================

    pub fn ident(&self, name: &str) -> Ident<'ast> {
        Ident::new(self.str(name), Span::default())
    }

    pub fn named(&self, name: &str) -> TypeExpr<'ast> {
        TypeExpr::Named(self.ident(name))
    }

    pub fn qualified(&self, package: &str, name: &str) -> TypeExpr<'ast> {
        TypeExpr::Qualified {
            package: self.ident(package),
            name: self.ident(name),
        }
    }

    pub fn pointer(&self, elem: TypeExpr<'ast>) -> TypeExpr<'ast> {
        TypeExpr::Pointer(self.arena.alloc(elem))
    }

    pub fn param(&self, name: &str, ty: TypeExpr<'ast>) -> Field<'ast> {
        Field {
            name: Some(self.ident(name)),
            ty,
        }
    }

    pub fn result(&self, ty: TypeExpr<'ast>) -> Field<'ast> {
        Field { name: None, ty }
    }

    pub fn signature(&self, params: &[Field<'ast>], results: &[Field<'ast>]) -> FuncType<'ast> {
        FuncType {
            params: self.slice(params),
            results: self.slice(results),
        }
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    pub fn name(&self, name: &str) -> Expr<'ast> {
        Expr::Ident(self.ident(name))
    }

    pub fn int(&self, text: &str) -> Expr<'ast> {
        self.literal(LitKind::Int, text)
    }

    pub fn string(&self, text: &str) -> Expr<'ast> {
        self.literal(LitKind::String, text)
    }

    fn literal(&self, kind: LitKind, text: &str) -> Expr<'ast> {
        Expr::Literal(Literal {
            kind,
            value: self.str(text),
            span: Span::default(),
        })
    }

    pub fn call(&self, func: Expr<'ast>, args: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::Call(self.arena.alloc(CallExpr {
            func,
            args: self.slice(args),
            span: func.span(),
        }))
    }

    pub fn select(&self, x: Expr<'ast>, sel: &str) -> Expr<'ast> {
        Expr::Selector(self.arena.alloc(SelectorExpr {
            x,
            sel: self.ident(sel),
            span: x.span(),
        }))
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    pub fn expr_stmt(&self, expr: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            expr,
            span: expr.span(),
        })
    }

    /// `name()` as a statement.
    pub fn call_stmt(&self, name: &str) -> Stmt<'ast> {
        self.expr_stmt(self.call(self.name(name), &[]))
    }

    /// `var name ty` as a statement.
    pub fn var_stmt(&self, name: &str, ty: TypeExpr<'ast>) -> Stmt<'ast> {
        Stmt::Var(self.value_spec(&[name], Some(ty), &[]))
    }

    pub fn ret(&self, results: &[Expr<'ast>]) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt {
            results: self.slice(results),
            span: Span::default(),
        })
    }

    pub fn block(&self, stmts: &[Stmt<'ast>]) -> Block<'ast> {
        Block {
            stmts: self.slice(stmts),
            span: Span::default(),
        }
    }

    pub fn block_stmt(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Block(self.block(stmts))
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// `func name(params) { body }`
    pub fn func(&self, name: &str, params: &[Field<'ast>], body: &[Stmt<'ast>]) -> Decl<'ast> {
        Decl::Func(self.func_decl(None, name, self.signature(params, &[]), Some(self.block(body))))
    }

    /// `func (r T) name() { body }`, or `(r *T)` when `pointer` is set.
    pub fn method(&self, recv_type: &str, pointer: bool, name: &str, body: &[Stmt<'ast>]) -> Decl<'ast> {
        let recv = Receiver {
            name: Some(self.ident("r")),
            type_name: self.ident(recv_type),
            pointer,
        };
        Decl::Func(self.func_decl(
            Some(recv),
            name,
            FuncType::default(),
            Some(self.block(body)),
        ))
    }

    pub fn func_decl(
        &self,
        recv: Option<Receiver<'ast>>,
        name: &str,
        ty: FuncType<'ast>,
        body: Option<Block<'ast>>,
    ) -> FuncDecl<'ast> {
        FuncDecl {
            recv,
            name: self.ident(name),
            ty,
            body,
            span: Span::default(),
        }
    }

    pub fn import(&self, path: &str) -> ImportSpec<'ast> {
        ImportSpec {
            name: None,
            path: self.str(path),
            span: Span::default(),
        }
    }

    pub fn import_as(&self, name: &str, path: &str) -> ImportSpec<'ast> {
        ImportSpec {
            name: Some(self.ident(name)),
            ..self.import(path)
        }
    }

    pub fn imports(&self, specs: &[ImportSpec<'ast>]) -> Decl<'ast> {
        Decl::Import(GenDecl {
            specs: self.slice(specs),
            span: Span::default(),
        })
    }

    /// `type name underlying`
    pub fn type_def(&self, name: &str, underlying: TypeExpr<'ast>) -> Decl<'ast> {
        self.type_spec(name, false, underlying)
    }

    /// `type name = target`
    pub fn type_alias(&self, name: &str, target: TypeExpr<'ast>) -> Decl<'ast> {
        self.type_spec(name, true, target)
    }

    fn type_spec(&self, name: &str, alias: bool, ty: TypeExpr<'ast>) -> Decl<'ast> {
        let spec = TypeSpec {
            name: self.ident(name),
            alias,
            ty,
            span: Span::default(),
        };
        Decl::Type(GenDecl {
            specs: self.slice(&[spec]),
            span: Span::default(),
        })
    }

    pub fn value_spec(
        &self,
        names: &[&str],
        ty: Option<TypeExpr<'ast>>,
        values: &[Expr<'ast>],
    ) -> ValueSpec<'ast> {
        let names: Vec<Ident<'ast>> = names.iter().map(|n| self.ident(n)).collect();
        ValueSpec {
            names: self.slice(&names),
            ty,
            values: self.slice(values),
            span: Span::default(),
        }
    }

    /// `var name ty`
    pub fn var(&self, name: &str, ty: TypeExpr<'ast>) -> Decl<'ast> {
        Decl::Var(GenDecl {
            specs: self.slice(&[self.value_spec(&[name], Some(ty), &[])]),
            span: Span::default(),
        })
    }

    /// `const name = value`
    pub fn constant(&self, name: &str, value: Expr<'ast>) -> Decl<'ast> {
        Decl::Const(GenDecl {
            specs: self.slice(&[self.value_spec(&[name], None, &[value])]),
            span: Span::default(),
        })
    }

    pub fn bad_at(&self, span: Span) -> Decl<'ast> {
        Decl::Bad(BadDecl { span })
    }

    // ==========================================================================
    // Files and packages
    // ==========================================================================

    pub fn file(&self, name: &str, decls: &[Decl<'ast>]) -> File<'ast> {
        File {
            name: self.str(name),
            decls: self.slice(decls),
            span: Span::default(),
        }
    }

    pub fn package(&self, name: &str, files: &[File<'ast>]) -> Package<'ast> {
        Package {
            name: self.str(name),
            files: self.slice(files),
        }
    }
}
