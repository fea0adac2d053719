//! Package assembly.
//!
//! [`compile_package`] runs the whole pipeline for one package:
//!
//! ```text
//! PackageContext::new
//!   └─► load_file (every file, any order)
//!         └─► executable package?
//!               ├─ yes: resolve entry ─► mark_used ─► drain
//!               └─ no:  bodies stay dormant
//!                     └─► CompiledPackage (package scope snapshot)
//! ```
//!
//! The context is consumed on success and dropped on any error, so a failed
//! run never hands out a partially populated scope.

use qlang_ast::Package;
use qlang_core::{CompileError, Result, SymbolKind};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::context::PackageContext;
use crate::emit::{Builder, Emitter};
use crate::file::FileContext;
use crate::function_compiler::{BodyLowering, FunctionCompiler};
use crate::options::CompilerOptions;
use crate::passes::load_file;
use crate::symbol::{FuncEntry, FuncId, Symbol, TypeEntry, TypeId, Var};

/// Result of compiling a package: its global variables and symbol table.
#[derive(Debug)]
pub struct CompiledPackage<'ast> {
    name: &'ast str,
    vars: Vec<Var<'ast>>,
    syms: FxHashMap<&'ast str, Symbol<'ast>>,
    funcs: Vec<FuncEntry<'ast>>,
    types: Vec<TypeEntry<'ast>>,
    files: Vec<FileContext<'ast>>,
    scheduled: usize,
}

impl<'ast> CompiledPackage<'ast> {
    pub(crate) fn new(
        name: &'ast str,
        vars: Vec<Var<'ast>>,
        syms: FxHashMap<&'ast str, Symbol<'ast>>,
        funcs: Vec<FuncEntry<'ast>>,
        types: Vec<TypeEntry<'ast>>,
        files: Vec<FileContext<'ast>>,
        scheduled: usize,
    ) -> Self {
        Self {
            name,
            vars,
            syms,
            funcs,
            types,
            files,
            scheduled,
        }
    }

    pub fn name(&self) -> &'ast str {
        self.name
    }

    /// Package-level variables in slot order.
    pub fn global_vars(&self) -> &[Var<'ast>] {
        &self.vars
    }

    /// Binding of `name` in the package scope.
    pub fn symbol(&self, name: &str) -> Option<Symbol<'ast>> {
        self.syms.get(name).copied()
    }

    pub fn symbols(&self) -> impl Iterator<Item = (&'ast str, Symbol<'ast>)> + '_ {
        self.syms.iter().map(|(n, s)| (*n, *s))
    }

    pub fn func(&self, id: FuncId) -> &FuncEntry<'ast> {
        &self.funcs[id.index()]
    }

    pub fn funcs(&self) -> &[FuncEntry<'ast>] {
        &self.funcs
    }

    /// Package function called `name`.
    pub fn function(&self, name: &str) -> Option<&FuncEntry<'ast>> {
        match self.symbol(name)? {
            Symbol::Func(id) => Some(self.func(id)),
            _ => None,
        }
    }

    pub fn type_entry(&self, id: TypeId) -> &TypeEntry<'ast> {
        &self.types[id.index()]
    }

    pub fn types(&self) -> &[TypeEntry<'ast>] {
        &self.types
    }

    /// Package type called `name`.
    pub fn named_type(&self, name: &str) -> Option<&TypeEntry<'ast>> {
        match self.symbol(name)? {
            Symbol::Type(id) => Some(self.type_entry(id)),
            _ => None,
        }
    }

    /// Per-file import tables, in load order.
    pub fn files(&self) -> &[FileContext<'ast>] {
        &self.files
    }

    /// Functions whose bodies were lowered.
    pub fn lowered_functions(&self) -> impl Iterator<Item = &FuncEntry<'ast>> + '_ {
        self.funcs.iter().filter(|f| f.is_compiled())
    }

    /// Functions with a body that nothing marked used. For a library
    /// package this is every function: lowering them is left to whatever
    /// links packages together.
    pub fn dormant_functions(&self) -> impl Iterator<Item = &FuncEntry<'ast>> + '_ {
        self.funcs
            .iter()
            .filter(|f| f.body.is_some() && !f.is_used())
    }

    /// Bodies (functions and methods) queued for lowering during the run.
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }
}

/// Compile a package.
///
/// Executable packages (named [`CompilerOptions::entry_package`]) must
/// declare the entry function; everything reachable from it is lowered
/// exactly once. Other packages are only loaded.
#[tracing::instrument(skip_all, fields(package = package.name, files = package.files.len()))]
pub fn compile_package<'ast>(
    package: &Package<'ast>,
    out: &mut dyn Emitter,
    lowering: &mut dyn BodyLowering<'ast>,
    options: CompilerOptions,
) -> Result<CompiledPackage<'ast>> {
    let mut ctx = PackageContext::new(package.name, options, out);
    for file in package.files {
        load_file(&mut ctx, file)?;
    }
    assemble(ctx, lowering)
}

/// Finish a run whose files have all been loaded: compile the entry point
/// of an executable package and snapshot the package scope.
pub fn assemble<'ast>(
    mut ctx: PackageContext<'ast, '_>,
    lowering: &mut dyn BodyLowering<'ast>,
) -> Result<CompiledPackage<'ast>> {
    let name = ctx.name();
    if ctx.options().is_executable(name) {
        let entry = ctx.options().entry_function.clone();
        let id = match ctx.lookup_global(&entry) {
            Some(Symbol::Func(id)) => id,
            Some(other) => {
                return Err(CompileError::kind_mismatch(
                    entry,
                    SymbolKind::Function,
                    other.kind(),
                ));
            }
            None => {
                return Err(CompileError::EntryPointMissing {
                    package: name.into(),
                    function: entry,
                });
            }
        };
        ctx.mark_used(id);
        ctx.drain(lowering)?;
        debug!(lowered = ctx.scheduler().lowered(), "entry point compiled");
    } else {
        debug!(functions = ctx.funcs().len(), "library package, bodies left dormant");
    }

    Ok(ctx.into_package())
}

/// Compiles packages onto a recording [`Builder`] with the reference
/// lowering.
///
/// # Example
///
/// ```ignore
/// let mut builder = PackageBuilder::new();
/// let pkg = builder.build(&package)?;
/// assert!(builder.emitter().chunk("main").is_some());
/// ```
#[derive(Default)]
pub struct PackageBuilder {
    options: CompilerOptions,
    out: Builder,
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a preconfigured emitter, e.g. one with extra builtins.
    pub fn with_emitter(mut self, out: Builder) -> Self {
        self.out = out;
        self
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile one package. Code is appended to the builder's emitter; a
    /// failed build leaves the emitter as it was before the call.
    pub fn build<'ast>(&mut self, package: &Package<'ast>) -> Result<CompiledPackage<'ast>> {
        let mark = self.out.chunks().len();
        let result = compile_package(
            package,
            &mut self.out,
            &mut FunctionCompiler::new(),
            self.options.clone(),
        );
        if result.is_err() {
            self.out.truncate(mark);
        }
        result
    }

    pub fn emitter(&self) -> &Builder {
        &self.out
    }

    pub fn into_emitter(self) -> Builder {
        self.out
    }
}
