//! Body lowering.
//!
//! The package context treats lowering as an opaque step behind the
//! [`BodyLowering`] trait: it hands over a [`LowerTarget`] and expects code
//! for that body to have been emitted when the call returns. Lowering may
//! schedule more work through
//! [`PackageContext::mark_used`](crate::context::PackageContext::mark_used).
//!
//! [`FunctionCompiler`] is the reference lowering. It handles:
//!
//! - Opening the function scope and declaring receiver, parameters and
//!   named results
//! - `var` statements, nested blocks, expression statements and returns
//! - Calls to package functions, methods, builtins, imported packages and
//!   function values
//! - Adding an implicit `Return` when the body does not end with one
//!
//! Names inside a body resolve against the imports of the file the
//! function was declared in, whichever body caused it to be scheduled.

use qlang_ast::{Block, CallExpr, Expr, FuncType, Ident, LitKind, Literal, SelectorExpr, Stmt, ValueSpec};
use qlang_core::{
    CompileError, DataType, InternalError, Result, Span, SymbolKind, TypeHash, primitives,
};
use tracing::trace;

use crate::bytecode::OpCode;
use crate::context::{BlockCtx, PackageContext};
use crate::emit::Builtin;
use crate::file::FileId;
use crate::symbol::Symbol;

/// A body handed to lowering.
#[derive(Debug, Clone, Copy)]
pub struct LowerTarget<'ast> {
    pub name: &'ast str,
    pub hash: TypeHash,
    pub sig: FuncType<'ast>,
    /// None for functions implemented outside the package.
    pub body: Option<Block<'ast>>,
    /// File the function was declared in.
    pub file: FileId,
    /// Set for methods.
    pub recv: Option<RecvBinding<'ast>>,
}

/// Receiver of a method being lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecvBinding<'ast> {
    pub name: Option<&'ast str>,
    pub data_type: DataType,
}

/// Turns a function body into emitted code.
pub trait BodyLowering<'ast> {
    fn lower(&mut self, ctx: &mut PackageContext<'ast, '_>, target: &LowerTarget<'ast>) -> Result<()>;
}

// ============================================================================
// FunctionCompiler
// ============================================================================

/// Reference lowering onto the context's emitter.
#[derive(Debug, Default)]
pub struct FunctionCompiler {
    lowered: usize,
}

impl FunctionCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bodies lowered so far.
    pub fn lowered(&self) -> usize {
        self.lowered
    }
}

impl<'ast> BodyLowering<'ast> for FunctionCompiler {
    #[cfg_attr(feature = "profiling", profiling::function)]
    fn lower(&mut self, ctx: &mut PackageContext<'ast, '_>, target: &LowerTarget<'ast>) -> Result<()> {
        let Some(body) = target.body else {
            trace!(name = target.name, "no body");
            return Ok(());
        };
        self.lowered += 1;
        BodyCompiler { ctx }.compile(target, &body)
    }
}

/// A method picked by a selector.
struct MethodRef<'ast> {
    hash: TypeHash,
    file: FileId,
    sig: FuncType<'ast>,
}

/// Lowers one body. Every expression pushes its result types on the
/// context's infer stack; consumers pop them again.
struct BodyCompiler<'a, 'ast, 'out> {
    ctx: &'a mut PackageContext<'ast, 'out>,
}

impl<'a, 'ast, 'out> BodyCompiler<'a, 'ast, 'out> {
    fn compile(&mut self, target: &LowerTarget<'ast>, body: &Block<'ast>) -> Result<()> {
        self.ctx.emitter().begin_function(target.hash, target.name);
        let global = self.ctx.global_block(target.file);
        let blk = self.ctx.enter_block(global);

        let result = self.function_body(global, blk, target, body);

        self.ctx.leave_block(blk);
        if result.is_ok() {
            self.ctx.emitter().end_function();
        } else {
            self.ctx.emitter().abort_function();
        }
        result
    }

    fn function_body(
        &mut self,
        global: BlockCtx,
        blk: BlockCtx,
        target: &LowerTarget<'ast>,
        body: &Block<'ast>,
    ) -> Result<()> {
        if let Some(RecvBinding {
            name: Some(name),
            data_type,
        }) = target.recv.filter(|r| r.name != Some("_"))
        {
            self.ctx.declare_variable(blk, name, data_type)?;
        }

        // Parameter types resolve outside the function scope so a parameter
        // cannot shadow the type of the next one.
        for field in target.sig.params.iter().chain(target.sig.results) {
            let Some(name) = field.name.filter(|n| !n.is_blank()) else {
                continue;
            };
            let ty = self.ctx.data_type(global, &field.ty)?;
            self.ctx.declare_variable(blk, name.name, ty)?;
        }

        self.block(blk, body.stmts)?;
        if !matches!(body.stmts.last(), Some(Stmt::Return(_))) {
            self.emit(OpCode::Return, 0);
        }
        Ok(())
    }

    fn emit(&mut self, op: OpCode, operand: u64) {
        self.ctx.emitter().emit(op, operand);
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    fn block(&mut self, blk: BlockCtx, stmts: &[Stmt<'ast>]) -> Result<()> {
        for stmt in stmts {
            self.stmt(blk, stmt)?;
            debug_assert!(self.ctx.infer().is_empty(), "infer stack not balanced");
        }
        Ok(())
    }

    fn stmt(&mut self, blk: BlockCtx, stmt: &Stmt<'ast>) -> Result<()> {
        match stmt {
            Stmt::Expr(s) => {
                let n = self.expr(blk, &s.expr)?;
                for _ in 0..n {
                    self.emit(OpCode::Pop, 0);
                }
                self.ctx.infer().pop_n(n);
            }
            Stmt::Var(spec) => self.var_spec(blk, spec)?,
            Stmt::Block(b) => {
                let inner = self.ctx.enter_block(blk);
                let result = self.block(inner, b.stmts);
                self.ctx.leave_block(inner);
                result?;
            }
            Stmt::Return(r) => {
                for e in r.results {
                    self.value(blk, e)?;
                }
                self.ctx.infer().pop_n(r.results.len());
                self.emit(OpCode::Return, r.results.len() as u64);
            }
        }
        Ok(())
    }

    /// `var a, b T = x, y`. Initializers are evaluated before the names
    /// are bound.
    fn var_spec(&mut self, blk: BlockCtx, spec: &ValueSpec<'ast>) -> Result<()> {
        let first = spec.names.first().map_or("_", |n| n.name);
        if !spec.values.is_empty() && spec.values.len() != spec.names.len() {
            return Err(unsupported("multi-value initializer", first, spec.span));
        }

        for value in spec.values {
            self.value(blk, value)?;
        }
        let inferred = self.ctx.infer().pop_n(spec.values.len());
        let declared = match &spec.ty {
            Some(ty) => Some(self.ctx.data_type(blk, ty)?),
            None => None,
        };

        let mut targets = Vec::with_capacity(spec.names.len());
        for (i, name) in spec.names.iter().enumerate() {
            if name.is_blank() {
                targets.push(None);
                continue;
            }
            let Some(ty) = declared.or_else(|| inferred.get(i).copied()) else {
                return Err(unsupported("untyped variable", name.name, spec.span));
            };
            targets.push(Some(self.ctx.declare_variable(blk, name.name, ty)?));
        }

        if !spec.values.is_empty() {
            for target in targets.iter().rev() {
                match target {
                    Some(var) => self.emit(OpCode::StoreVar, var.addr.to_operand()),
                    None => self.emit(OpCode::Pop, 0),
                }
            }
        }
        Ok(())
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    /// Lower an expression, returning how many values it left.
    fn expr(&mut self, blk: BlockCtx, expr: &Expr<'ast>) -> Result<usize> {
        match expr {
            Expr::Literal(lit) => {
                self.literal(lit);
                Ok(1)
            }
            Expr::Ident(id) => self.ident(blk, id).map(|()| 1),
            Expr::Call(call) => self.call(blk, call),
            Expr::Selector(sel) => self.selector(blk, sel).map(|()| 1),
        }
    }

    /// Lower an expression that must produce exactly one value.
    fn value(&mut self, blk: BlockCtx, expr: &Expr<'ast>) -> Result<DataType> {
        let n = self.expr(blk, expr)?;
        if n == 1 {
            return Ok(self.ctx.infer().peek().copied().unwrap_or(DataType::VOID));
        }
        self.ctx.infer().pop_n(n);
        let feature = if n == 0 {
            "value of call without result"
        } else {
            "multi-value expression"
        };
        Err(unsupported(feature, expr_name(expr), expr.span()))
    }

    fn literal(&mut self, lit: &Literal<'ast>) {
        let ty = match lit.kind {
            LitKind::Int => primitives::INT,
            LitKind::Float => primitives::FLOAT64,
            LitKind::String => primitives::STRING,
        };
        let index = self.ctx.emitter().constant(lit.value);
        self.emit(OpCode::PushConst, index as u64);
        self.ctx.infer().push(DataType::simple(ty));
    }

    fn ident(&mut self, blk: BlockCtx, id: &Ident<'ast>) -> Result<()> {
        match self.ctx.resolve(blk, id.name) {
            Some(Symbol::Var(var)) => {
                self.emit(OpCode::LoadVar, var.addr.to_operand());
                self.ctx.infer().push(var.data_type);
                Ok(())
            }
            Some(Symbol::Func(fid)) => {
                self.ctx.mark_used(fid);
                let hash = self.ctx.func(fid).hash;
                self.emit(OpCode::LoadFunc, hash.as_u64());
                self.ctx.infer().push(DataType::simple(hash));
                Ok(())
            }
            Some(other) => Err(CompileError::kind_mismatch(
                id.name,
                SymbolKind::Variable,
                other.kind(),
            )),
            None => Err(match self.ctx.emitter().builtin(id.name) {
                Some(Builtin::Type(_)) => {
                    CompileError::kind_mismatch(id.name, SymbolKind::Variable, SymbolKind::Type)
                }
                Some(Builtin::Func { .. }) => {
                    CompileError::kind_mismatch(id.name, SymbolKind::Variable, SymbolKind::Function)
                }
                None => CompileError::not_found(id.name),
            }),
        }
    }

    /// `pkg.Name` or `x.Method` used as a value.
    fn selector(&mut self, blk: BlockCtx, sel: &SelectorExpr<'ast>) -> Result<()> {
        if let Some(path) = self.import_of(blk, &sel.x) {
            let hash = TypeHash::from_function(path, sel.sel.name);
            self.emit(OpCode::LoadExtern, hash.as_u64());
            self.ctx.infer().push(DataType::simple(hash));
            return Ok(());
        }
        let method = self.method_on(blk, &sel.x, sel.sel.name)?;
        self.emit(OpCode::LoadMethod, method.hash.as_u64());
        self.ctx.infer().push(DataType::simple(method.hash));
        Ok(())
    }

    fn call(&mut self, blk: BlockCtx, call: &CallExpr<'ast>) -> Result<usize> {
        match &call.func {
            Expr::Ident(id) => match self.ctx.resolve(blk, id.name) {
                Some(Symbol::Func(fid)) => {
                    self.args(blk, call.args)?;
                    self.ctx.mark_used(fid);
                    let f = self.ctx.func(fid);
                    let (hash, file, sig) = (f.hash, f.file, f.sig);
                    self.emit(OpCode::CallFunc, hash.as_u64());
                    self.results(file, &sig)
                }
                Some(Symbol::Type(tid)) => {
                    let ty = self.ctx.type_entry(tid).data_type();
                    self.conversion(blk, id, call, ty)
                }
                Some(Symbol::Var(_)) => self.indirect(blk, call),
                Some(other) => Err(CompileError::kind_mismatch(
                    id.name,
                    SymbolKind::Function,
                    other.kind(),
                )),
                None => match self.ctx.emitter().builtin(id.name) {
                    Some(Builtin::Func { hash, result }) => {
                        self.args(blk, call.args)?;
                        self.emit(OpCode::CallBuiltin, hash.as_u64());
                        if result.is_void() {
                            return Ok(0);
                        }
                        self.ctx.infer().push(result);
                        Ok(1)
                    }
                    Some(Builtin::Type(ty)) => self.conversion(blk, id, call, ty),
                    None => Err(CompileError::not_found(id.name)),
                },
            },
            Expr::Selector(sel) => {
                if let Some(path) = self.import_of(blk, &sel.x) {
                    self.args(blk, call.args)?;
                    let hash = TypeHash::from_function(path, sel.sel.name);
                    self.emit(OpCode::CallExtern, hash.as_u64());
                    // Signatures of other packages are not known here.
                    return Ok(0);
                }
                let method = self.method_on(blk, &sel.x, sel.sel.name)?;
                self.args(blk, call.args)?;
                self.emit(OpCode::CallMethod, method.hash.as_u64());
                self.results(method.file, &method.sig)
            }
            _ => self.indirect(blk, call),
        }
    }

    fn indirect(&mut self, blk: BlockCtx, call: &CallExpr<'ast>) -> Result<usize> {
        self.value(blk, &call.func)?;
        self.ctx.infer().pop();
        self.args(blk, call.args)?;
        self.emit(OpCode::CallIndirect, call.args.len() as u64);
        Ok(0)
    }

    fn conversion(
        &mut self,
        blk: BlockCtx,
        id: &Ident<'ast>,
        call: &CallExpr<'ast>,
        ty: DataType,
    ) -> Result<usize> {
        let [arg] = call.args else {
            return Err(unsupported("conversion with multiple operands", id.name, call.span));
        };
        self.value(blk, arg)?;
        self.ctx.infer().pop();
        self.ctx.infer().push(ty);
        Ok(1)
    }

    fn args(&mut self, blk: BlockCtx, args: &[Expr<'ast>]) -> Result<()> {
        for arg in args {
            self.value(blk, arg)?;
        }
        self.ctx.infer().pop_n(args.len());
        Ok(())
    }

    /// Push the declared result types of a callee. They resolve in the
    /// callee's own file.
    fn results(&mut self, file: FileId, sig: &FuncType<'ast>) -> Result<usize> {
        let global = self.ctx.global_block(file);
        for field in sig.results {
            let ty = self.ctx.data_type(global, &field.ty)?;
            self.ctx.infer().push(ty);
        }
        Ok(sig.results.len())
    }

    fn import_of(&self, blk: BlockCtx, x: &Expr<'ast>) -> Option<&'ast str> {
        match x {
            Expr::Ident(id) => match self.ctx.resolve(blk, id.name) {
                Some(Symbol::Import(path)) => Some(path),
                _ => None,
            },
            _ => None,
        }
    }

    /// Evaluate a receiver and schedule its method `name`.
    fn method_on(&mut self, blk: BlockCtx, x: &Expr<'ast>, name: &str) -> Result<MethodRef<'ast>> {
        let recv = self.value(blk, x)?;
        self.ctx.infer().pop();
        let Some(tid) = self.ctx.type_by_hash(recv.type_hash) else {
            return Err(CompileError::not_found(name));
        };
        self.ctx.mark_method_used(tid, name)?;
        let method = self
            .ctx
            .type_entry(tid)
            .method(name)
            .ok_or_else(|| CompileError::not_found(name))?;
        Ok(MethodRef {
            hash: method.hash,
            file: method.file,
            sig: method.sig,
        })
    }
}

fn unsupported(feature: &'static str, name: &str, span: Span) -> CompileError {
    InternalError::Unsupported {
        feature,
        name: name.into(),
        span,
    }
    .into()
}

fn expr_name<'ast>(expr: &Expr<'ast>) -> &'ast str {
    match expr {
        Expr::Ident(id) => id.name,
        Expr::Literal(lit) => lit.value,
        Expr::Call(call) => expr_name(&call.func),
        Expr::Selector(sel) => sel.sel.name,
    }
}
