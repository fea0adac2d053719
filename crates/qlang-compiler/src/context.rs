//! Package compilation context.
//!
//! [`PackageContext`] is the session object for one compilation run. It owns
//! every piece of mutable state the front end needs:
//!
//! ```text
//! PackageContext
//! ├── scopes    ScopeTree (root = package scope, shared by all files)
//! ├── files     one FileContext per loaded file (private import tables)
//! ├── funcs     FuncEntry table, indexed by FuncId
//! ├── types     TypeEntry table, indexed by TypeId (methods live here)
//! ├── scheduler worklist of bodies marked used
//! ├── infer     scratch type stack for body lowering
//! └── out       the emission backend
//! ```
//!
//! Lookups and declarations are addressed through a [`BlockCtx`]: the scope
//! where the operation starts plus the file that owns it. The file decides
//! which import table the package scope falls back to, so the same function
//! body always resolves names against the imports of the file it was
//! declared in.

use qlang_ast::{FuncDecl, TypeExpr};
use qlang_core::{CompileError, DataType, InternalError, Result, SymbolKind, TypeHash};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::emit::{Builtin, Emitter};
use crate::file::{FileContext, FileId};
use crate::function_compiler::{BodyLowering, LowerTarget, RecvBinding};
use crate::infer::InferStack;
use crate::options::CompilerOptions;
use crate::package::CompiledPackage;
use crate::scheduler::{Scheduler, WorkItem};
use crate::scope::{ScopeId, ScopeTree};
use crate::symbol::{
    FuncEntry, FuncFlags, FuncId, MethodEntry, Symbol, TypeEntry, TypeId, TypeState, Var,
};

/// Where a lookup or declaration happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCtx {
    /// Innermost scope.
    pub scope: ScopeId,
    /// File whose imports are visible.
    pub file: FileId,
}

/// State of a single package compilation.
pub struct PackageContext<'ast, 'out> {
    name: &'ast str,
    options: CompilerOptions,
    scopes: ScopeTree<'ast>,
    files: Vec<FileContext<'ast>>,
    funcs: Vec<FuncEntry<'ast>>,
    types: Vec<TypeEntry<'ast>>,
    types_by_hash: FxHashMap<TypeHash, TypeId>,
    scheduler: Scheduler<'ast>,
    infer: InferStack,
    out: &'out mut dyn Emitter,
}

impl<'ast, 'out> PackageContext<'ast, 'out> {
    /// Start a run for package `name`.
    pub fn new(name: &'ast str, options: CompilerOptions, out: &'out mut dyn Emitter) -> Self {
        Self {
            name,
            options,
            scopes: ScopeTree::new(),
            files: Vec::new(),
            funcs: Vec::new(),
            types: Vec::new(),
            types_by_hash: FxHashMap::default(),
            scheduler: Scheduler::new(),
            infer: InferStack::new(),
            out,
        }
    }

    pub fn name(&self) -> &'ast str {
        self.name
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    // ==========================================================================
    // Files and blocks
    // ==========================================================================

    /// Register a file and return its id. Its import table starts empty.
    pub fn add_file(&mut self, name: &'ast str) -> FileId {
        let id = FileId::new(self.files.len() as u32);
        self.files.push(FileContext::new(id, name));
        id
    }

    pub fn file(&self, id: FileId) -> &FileContext<'ast> {
        &self.files[id.index()]
    }

    pub fn file_mut(&mut self, id: FileId) -> &mut FileContext<'ast> {
        &mut self.files[id.index()]
    }

    pub fn files(&self) -> &[FileContext<'ast>] {
        &self.files
    }

    /// The package scope as seen from `file`.
    pub fn global_block(&self, file: FileId) -> BlockCtx {
        BlockCtx {
            scope: self.scopes.root(),
            file,
        }
    }

    #[inline]
    pub fn is_global(&self, blk: BlockCtx) -> bool {
        self.scopes.is_root(blk.scope)
    }

    pub fn scopes(&self) -> &ScopeTree<'ast> {
        &self.scopes
    }

    /// Open a nested scope. The emitter is nested with it so variables
    /// declared inside get the next depth.
    pub fn enter_block(&mut self, parent: BlockCtx) -> BlockCtx {
        let scope = self.scopes.push(parent.scope);
        self.out.nest();
        BlockCtx {
            scope,
            file: parent.file,
        }
    }

    /// Close a scope opened by [`enter_block`](Self::enter_block).
    pub fn leave_block(&mut self, blk: BlockCtx) {
        if self.scopes.pop(blk.scope).is_some() {
            self.out.unnest();
        }
    }

    pub fn emitter(&mut self) -> &mut (dyn Emitter + 'out) {
        &mut *self.out
    }

    /// Scratch type stack shared with body lowering.
    pub fn infer(&mut self) -> &mut InferStack {
        &mut self.infer
    }

    pub fn scheduler(&self) -> &Scheduler<'ast> {
        &self.scheduler
    }

    // ==========================================================================
    // Tables
    // ==========================================================================

    pub fn func(&self, id: FuncId) -> &FuncEntry<'ast> {
        &self.funcs[id.index()]
    }

    pub fn funcs(&self) -> &[FuncEntry<'ast>] {
        &self.funcs
    }

    pub fn type_entry(&self, id: TypeId) -> &TypeEntry<'ast> {
        &self.types[id.index()]
    }

    pub fn types(&self) -> &[TypeEntry<'ast>] {
        &self.types
    }

    /// The package type with this identity, if any.
    pub fn type_by_hash(&self, hash: TypeHash) -> Option<TypeId> {
        self.types_by_hash.get(&hash).copied()
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Whether `name` is bound directly in `blk`'s scope. For the package
    /// scope the file's imports count too.
    pub fn declares(&self, blk: BlockCtx, name: &str) -> bool {
        self.scopes.get(blk.scope).contains(name)
            || (self.is_global(blk) && self.file(blk.file).import_path(name).is_some())
    }

    /// Innermost binding of `name`, falling back to the file's imports.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(&self, blk: BlockCtx, name: &str) -> Option<Symbol<'ast>> {
        let sym = self
            .scopes
            .lookup(blk.scope, name)
            .or_else(|| self.file(blk.file).import_path(name).map(Symbol::Import));
        trace!(name, found = ?sym.map(|s| s.kind()), "resolve");
        sym
    }

    /// Binding of `name` in the package scope alone.
    pub fn lookup_global(&self, name: &str) -> Option<Symbol<'ast>> {
        self.scopes.get(self.scopes.root()).lookup(name)
    }

    pub fn resolve_var(&self, blk: BlockCtx, name: &str) -> Result<Var<'ast>> {
        match self.resolve(blk, name) {
            Some(Symbol::Var(var)) => Ok(var),
            other => Err(lookup_error(name, SymbolKind::Variable, other)),
        }
    }

    pub fn resolve_func(&self, blk: BlockCtx, name: &str) -> Result<FuncId> {
        match self.resolve(blk, name) {
            Some(Symbol::Func(id)) => Ok(id),
            other => Err(lookup_error(name, SymbolKind::Function, other)),
        }
    }

    pub fn resolve_type(&self, blk: BlockCtx, name: &str) -> Result<TypeId> {
        match self.resolve(blk, name) {
            Some(Symbol::Type(id)) => Ok(id),
            other => Err(lookup_error(name, SymbolKind::Type, other)),
        }
    }

    /// Resolve a written type. Package types shadow builtins.
    pub fn data_type(&self, blk: BlockCtx, ty: &TypeExpr<'ast>) -> Result<DataType> {
        match ty {
            TypeExpr::Named(ident) => match self.resolve(blk, ident.name) {
                Some(Symbol::Type(id)) => Ok(self.types[id.index()].data_type()),
                Some(other) => Err(CompileError::kind_mismatch(
                    ident.name,
                    SymbolKind::Type,
                    other.kind(),
                )),
                None => match self.out.builtin(ident.name) {
                    Some(Builtin::Type(dt)) => Ok(dt),
                    Some(Builtin::Func { .. }) => Err(CompileError::kind_mismatch(
                        ident.name,
                        SymbolKind::Type,
                        SymbolKind::Function,
                    )),
                    None => Err(CompileError::not_found(ident.name)),
                },
            },
            TypeExpr::Qualified { package, name } => match self.resolve(blk, package.name) {
                Some(Symbol::Import(path)) => {
                    Ok(DataType::simple(TypeHash::from_package_type(path, name.name)))
                }
                other => Err(lookup_error(package.name, SymbolKind::Import, other)),
            },
            TypeExpr::Pointer(elem) => Ok(self.data_type(blk, elem)?.pointer()),
        }
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// Bind a variable at the next free slot of `blk`'s scope.
    pub fn declare_variable(
        &mut self,
        blk: BlockCtx,
        name: &'ast str,
        data_type: DataType,
    ) -> Result<Var<'ast>> {
        if self.declares(blk, name) {
            return Err(redeclared(name));
        }
        let depth = self.out.nest_depth();
        let var = self.scopes.get_mut(blk.scope).push_var(name, data_type, depth);
        trace!(name, addr = %var.addr, "declared variable");
        Ok(var)
    }

    /// Register a package-level function.
    pub fn declare_function(&mut self, blk: BlockCtx, decl: &FuncDecl<'ast>) -> Result<FuncId> {
        let name = decl.name.name;
        if !self.is_global(blk) {
            return Err(InternalError::NotPackageScope { name: name.into() }.into());
        }
        if self.declares(blk, name) {
            return Err(redeclared(name));
        }

        let id = FuncId::new(self.funcs.len() as u32);
        self.funcs.push(FuncEntry::new(
            name,
            TypeHash::from_function(self.name, name),
            decl.ty,
            decl.body,
            blk.file,
        ));
        self.scopes.get_mut(blk.scope).insert(name, Symbol::Func(id));
        debug!(name, %id, file = %blk.file, "declared function");
        Ok(id)
    }

    /// Register a method on `type_name`, creating a provisional type if the
    /// type's own declaration has not been loaded yet.
    pub fn declare_method(
        &mut self,
        blk: BlockCtx,
        type_name: &'ast str,
        decl: &FuncDecl<'ast>,
    ) -> Result<()> {
        let method = decl.name.name;
        if !self.is_global(blk) {
            return Err(InternalError::NotPackageScope {
                name: method.into(),
            }
            .into());
        }

        let id = match self.resolve(blk, type_name) {
            Some(Symbol::Type(id)) => id,
            Some(other) => {
                return Err(InternalError::MethodOnNonType {
                    type_name: type_name.into(),
                    method: method.into(),
                    found: other.kind(),
                }
                .into());
            }
            None => {
                debug!(type_name, "provisional type");
                self.add_type(TypeEntry::provisional(self.name, type_name))
            }
        };

        let entry = &mut self.types[id.index()];
        if entry.alias {
            return Err(InternalError::MethodOnAlias {
                type_name: type_name.into(),
                method: method.into(),
            }
            .into());
        }
        if entry.methods.contains_key(method) {
            return Err(InternalError::DuplicateMethod {
                type_name: type_name.into(),
                method: method.into(),
            }
            .into());
        }

        let recv = decl.recv;
        entry.methods.insert(
            method,
            MethodEntry {
                name: method,
                hash: TypeHash::from_method(entry.hash, method),
                recv: recv.and_then(|r| r.name).map(|n| n.name),
                pointer: recv.is_some_and(|r| r.pointer),
                sig: decl.ty,
                body: decl.body,
                file: blk.file,
                flags: FuncFlags::empty(),
            },
        );
        debug!(type_name, method, file = %blk.file, "declared method");
        Ok(())
    }

    /// Register a named type, completing a provisional entry if one exists.
    pub fn declare_type(&mut self, blk: BlockCtx, name: &'ast str, alias: bool) -> Result<TypeId> {
        if !self.is_global(blk) {
            return Err(InternalError::NotPackageScope { name: name.into() }.into());
        }

        if let Some(Symbol::Type(id)) = self.scopes.get(blk.scope).lookup(name) {
            let entry = &mut self.types[id.index()];
            if entry.is_provisional() {
                if alias && !entry.methods.is_empty() {
                    let method = entry.methods.keys().min().copied().unwrap_or_default();
                    return Err(InternalError::MethodOnAlias {
                        type_name: name.into(),
                        method: method.into(),
                    }
                    .into());
                }
                entry.state = TypeState::Declared;
                entry.alias = alias;
                debug!(name, %id, methods = entry.methods.len(), "completed provisional type");
                return Ok(id);
            }
        }
        if self.declares(blk, name) {
            return Err(redeclared(name));
        }

        let id = self.add_type(TypeEntry::declared(self.name, name, alias));
        debug!(name, %id, alias, "declared type");
        Ok(id)
    }

    fn add_type(&mut self, entry: TypeEntry<'ast>) -> TypeId {
        let id = TypeId::new(self.types.len() as u32);
        let root = self.scopes.root();
        self.scopes.get_mut(root).insert(entry.name, Symbol::Type(id));
        self.types_by_hash.insert(entry.hash, id);
        self.types.push(entry);
        id
    }

    // ==========================================================================
    // Scheduling
    // ==========================================================================

    /// Mark a function as referenced. Returns true the first time only;
    /// that call is the one that queues the body.
    pub fn mark_used(&mut self, id: FuncId) -> bool {
        let entry = &mut self.funcs[id.index()];
        if entry.is_used() {
            return false;
        }
        entry.flags.insert(FuncFlags::USED);
        debug!(func = entry.name, "scheduled");
        self.scheduler.push(WorkItem::Func(id));
        true
    }

    /// Mark method `name` of type `ty` as referenced.
    pub fn mark_method_used(&mut self, ty: TypeId, name: &str) -> Result<bool> {
        let entry = &mut self.types[ty.index()];
        let type_name = entry.name;
        let Some(method) = entry.methods.get_mut(name) else {
            return Err(CompileError::not_found(format!("{type_name}.{name}")));
        };
        if method.is_used() {
            return Ok(false);
        }
        method.flags.insert(FuncFlags::USED);
        let method = method.name;
        debug!(type_name, method, "scheduled method");
        self.scheduler.push(WorkItem::Method(ty, method));
        Ok(true)
    }

    /// Lower queued bodies, most recently scheduled first, until nothing
    /// is left. Bodies may schedule more work while being lowered.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn drain(&mut self, lowering: &mut dyn BodyLowering<'ast>) -> Result<()> {
        while let Some(item) = self.scheduler.pop() {
            self.lower_item(item, lowering)?;
        }
        Ok(())
    }

    /// Lower one body now. Fails if it has already been lowered.
    pub fn lower_item(
        &mut self,
        item: WorkItem<'ast>,
        lowering: &mut dyn BodyLowering<'ast>,
    ) -> Result<()> {
        let target = self.begin_lowering(item)?;
        debug!(name = target.name, file = %target.file, "lowering");
        lowering.lower(self, &target)?;
        self.scheduler.record_lowered();
        Ok(())
    }

    fn begin_lowering(&mut self, item: WorkItem<'ast>) -> Result<LowerTarget<'ast>> {
        match item {
            WorkItem::Func(id) => {
                let f = &mut self.funcs[id.index()];
                if f.is_compiled() {
                    return Err(InternalError::AlreadyLowered { name: f.name.into() }.into());
                }
                f.flags.insert(FuncFlags::COMPILED);
                Ok(LowerTarget {
                    name: f.name,
                    hash: f.hash,
                    sig: f.sig,
                    body: f.body,
                    file: f.file,
                    recv: None,
                })
            }
            WorkItem::Method(ty, name) => {
                let entry = &mut self.types[ty.index()];
                let owner = entry.data_type();
                let type_name = entry.name;
                let Some(m) = entry.methods.get_mut(name) else {
                    return Err(CompileError::not_found(format!("{type_name}.{name}")));
                };
                if m.is_compiled() {
                    return Err(InternalError::AlreadyLowered {
                        name: format!("{type_name}.{name}"),
                    }
                    .into());
                }
                m.flags.insert(FuncFlags::COMPILED);
                Ok(LowerTarget {
                    name: m.name,
                    hash: m.hash,
                    sig: m.sig,
                    body: m.body,
                    file: m.file,
                    recv: Some(RecvBinding {
                        name: m.recv,
                        data_type: if m.pointer { owner.pointer() } else { owner },
                    }),
                })
            }
        }
    }

    // ==========================================================================
    // Snapshot
    // ==========================================================================

    /// Consume the run, keeping the package scope and the declaration tables.
    pub fn into_package(self) -> CompiledPackage<'ast> {
        let scheduled = self.scheduler.scheduled();
        let (syms, vars) = self.scopes.into_root().into_parts();
        CompiledPackage::new(
            self.name,
            vars,
            syms,
            self.funcs,
            self.types,
            self.files,
            scheduled,
        )
    }
}

fn redeclared(name: &str) -> CompileError {
    InternalError::Redeclared { name: name.into() }.into()
}

fn lookup_error(name: &str, expected: SymbolKind, found: Option<Symbol<'_>>) -> CompileError {
    match found {
        None => CompileError::not_found(name),
        Some(sym) => CompileError::kind_mismatch(name, expected, sym.kind()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::Builder;
    use bumpalo::Bump;
    use qlang_ast::{AstBuilder, Decl, FuncType};
    use qlang_core::primitives;

    fn int() -> DataType {
        DataType::simple(primitives::INT)
    }

    fn func<'a>(b: &AstBuilder<'a>, name: &str) -> FuncDecl<'a> {
        b.func_decl(None, name, FuncType::default(), Some(b.block(&[])))
    }

    #[test]
    fn redeclaring_a_variable_is_fatal() {
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let blk = ctx.global_block(file);

        ctx.declare_variable(blk, "x", int()).unwrap();
        assert!(ctx.declares(blk, "x"));
        let err = ctx.declare_variable(blk, "x", int()).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.name(), Some("x"));
    }

    #[test]
    fn function_and_variable_share_a_namespace() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let blk = ctx.global_block(file);

        ctx.declare_function(blk, &func(&b, "f")).unwrap();
        let err = ctx.declare_variable(blk, "f", int()).unwrap_err();
        assert!(matches!(err, CompileError::Internal(InternalError::Redeclared { .. })));
    }

    #[test]
    fn functions_only_at_package_scope() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let inner = ctx.enter_block(ctx.global_block(file));

        let err = ctx.declare_function(inner, &func(&b, "f")).unwrap_err();
        assert!(matches!(err, CompileError::Internal(InternalError::NotPackageScope { .. })));
    }

    #[test]
    fn variables_get_depth_of_enclosing_block() {
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let global = ctx.global_block(file);
        let g = ctx.declare_variable(global, "g", int()).unwrap();
        assert_eq!((g.addr.depth, g.addr.slot), (0, 0));

        let body = ctx.enter_block(global);
        let a = ctx.declare_variable(body, "a", int()).unwrap();
        let b = ctx.declare_variable(body, "b", int()).unwrap();
        assert_eq!((a.addr.depth, a.addr.slot), (1, 0));
        assert_eq!((b.addr.depth, b.addr.slot), (1, 1));
        ctx.leave_block(body);

        assert_eq!(ctx.emitter().nest_depth(), 0);
    }

    #[test]
    fn shadowing_resolves_innermost() {
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let global = ctx.global_block(file);
        let outer = ctx.declare_variable(global, "x", int()).unwrap();
        let inner_blk = ctx.enter_block(global);
        let inner = ctx
            .declare_variable(inner_blk, "x", DataType::simple(primitives::STRING))
            .unwrap();

        assert_eq!(ctx.resolve_var(inner_blk, "x").unwrap(), inner);
        assert_eq!(ctx.resolve_var(global, "x").unwrap(), outer);
        ctx.leave_block(inner_blk);
        assert_eq!(ctx.resolve_var(global, "x").unwrap(), outer);
    }

    #[test]
    fn imports_count_as_declared_only_at_package_scope() {
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        ctx.file_mut(file).import("strings", "strings");
        let global = ctx.global_block(file);
        let inner = ctx.enter_block(global);

        assert!(ctx.declares(global, "strings"));
        assert!(!ctx.declares(inner, "strings"));
        assert_eq!(ctx.resolve(inner, "strings"), Some(Symbol::Import("strings")));
        // shadowing an import inside a block is allowed
        ctx.declare_variable(inner, "strings", int()).unwrap();
        assert!(ctx.declare_variable(global, "strings", int()).is_err());
    }

    #[test]
    fn typed_lookups_report_kind() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let blk = ctx.global_block(file);
        ctx.declare_variable(blk, "v", int()).unwrap();
        ctx.declare_function(blk, &func(&b, "f")).unwrap();

        assert_eq!(
            ctx.resolve_func(blk, "v").unwrap_err(),
            CompileError::kind_mismatch("v", SymbolKind::Function, SymbolKind::Variable)
        );
        assert_eq!(
            ctx.resolve_type(blk, "f").unwrap_err(),
            CompileError::kind_mismatch("f", SymbolKind::Type, SymbolKind::Function)
        );
        assert_eq!(ctx.resolve_var(blk, "nope").unwrap_err(), CompileError::not_found("nope"));
    }

    #[test]
    fn method_before_type_is_unified() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let blk = ctx.global_block(file);

        let Decl::Func(m) = b.method("Point", true, "Move", &[]) else {
            unreachable!()
        };
        ctx.declare_method(blk, "Point", &m).unwrap();
        let provisional = ctx.resolve_type(blk, "Point").unwrap();
        assert!(ctx.type_entry(provisional).is_provisional());

        let declared = ctx.declare_type(blk, "Point", false).unwrap();
        assert_eq!(declared, provisional);
        let entry = ctx.type_entry(declared);
        assert!(!entry.is_provisional());
        assert!(entry.method("Move").is_some_and(|m| m.pointer));

        let err = ctx.declare_type(blk, "Point", false).unwrap_err();
        assert!(matches!(err, CompileError::Internal(InternalError::Redeclared { .. })));
    }

    #[test]
    fn duplicate_method_is_fatal() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let blk = ctx.global_block(file);
        let Decl::Func(m) = b.method("T", false, "M", &[]) else {
            unreachable!()
        };

        ctx.declare_method(blk, "T", &m).unwrap();
        let err = ctx.declare_method(blk, "T", &m).unwrap_err();
        assert!(matches!(err, CompileError::Internal(InternalError::DuplicateMethod { .. })));
    }

    #[test]
    fn same_method_name_on_two_types() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let blk = ctx.global_block(file);
        let Decl::Func(m) = b.method("A", false, "String", &[]) else {
            unreachable!()
        };

        ctx.declare_method(blk, "A", &m).unwrap();
        ctx.declare_method(blk, "B", &m).unwrap();
        assert_eq!(ctx.types().len(), 2);
    }

    #[test]
    fn method_on_alias_or_non_type_is_fatal() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let blk = ctx.global_block(file);
        let Decl::Func(m) = b.method("C", false, "M", &[]) else {
            unreachable!()
        };

        ctx.declare_type(blk, "C", true).unwrap();
        let err = ctx.declare_method(blk, "C", &m).unwrap_err();
        assert!(matches!(err, CompileError::Internal(InternalError::MethodOnAlias { .. })));

        ctx.declare_variable(blk, "v", int()).unwrap();
        let err = ctx.declare_method(blk, "v", &m).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Internal(InternalError::MethodOnNonType {
                found: SymbolKind::Variable,
                ..
            })
        ));
    }

    #[test]
    fn mark_used_enqueues_once() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let blk = ctx.global_block(file);
        let f = ctx.declare_function(blk, &func(&b, "f")).unwrap();

        assert!(ctx.mark_used(f));
        assert!(!ctx.mark_used(f));
        assert!(!ctx.mark_used(f));
        assert_eq!(ctx.scheduler().len(), 1);
        assert!(ctx.func(f).is_used());
    }

    #[test]
    fn data_type_prefers_package_types_over_builtins() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let blk = ctx.global_block(file);

        assert_eq!(ctx.data_type(blk, &b.named("int")).unwrap(), int());
        assert_eq!(
            ctx.data_type(blk, &b.pointer(b.named("int"))).unwrap(),
            int().pointer()
        );
        assert_eq!(
            ctx.data_type(blk, &b.named("len")).unwrap_err(),
            CompileError::kind_mismatch("len", SymbolKind::Type, SymbolKind::Function)
        );

        ctx.declare_type(blk, "Point", false).unwrap();
        assert_eq!(
            ctx.data_type(blk, &b.named("Point")).unwrap(),
            DataType::simple(TypeHash::from_package_type("p", "Point"))
        );
        assert_eq!(
            ctx.data_type(blk, &b.named("Missing")).unwrap_err(),
            CompileError::not_found("Missing")
        );
    }

    #[test]
    fn qualified_types_need_an_import() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut out = Builder::new();
        let mut ctx = PackageContext::new("p", CompilerOptions::default(), &mut out);
        let file = ctx.add_file("a.ql");
        let blk = ctx.global_block(file);

        let ty = b.qualified("bytes", "Buffer");
        assert_eq!(ctx.data_type(blk, &ty).unwrap_err(), CompileError::not_found("bytes"));
        ctx.file_mut(file).import("bytes", "std/bytes");
        assert_eq!(
            ctx.data_type(blk, &ty).unwrap(),
            DataType::simple(TypeHash::from_package_type("std/bytes", "Buffer"))
        );
    }
}
