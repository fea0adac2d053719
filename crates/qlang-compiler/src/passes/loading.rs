//! Loading Pass - register every top-level declaration of a file.
//!
//! Walks a file's declarations in source order and routes them:
//!
//! ```text
//! Decl::Import ──► FileContext (private to the file)
//! Decl::Func   ──► package scope (function, or method on its receiver type)
//! Decl::Type   ──► package scope (completes provisional types)
//! Decl::Const  ──► accepted, not elaborated
//! Decl::Var    ──► accepted, not elaborated
//! Decl::Bad    ──► fatal
//! ```
//!
//! Files may be loaded in any order. Forward references work because no
//! body is looked at until every file has been loaded.

use qlang_ast::{Decl, File, FuncDecl, GenDecl, ImportSpec, TypeSpec, ValueSpec};
use qlang_core::{CompileError, InternalError, Result};
use tracing::debug;

use crate::context::{BlockCtx, PackageContext};
use crate::file::{FileId, import_base_name};

/// Counts of what a file contributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingOutput {
    pub file: FileId,
    pub imports: usize,
    pub functions: usize,
    pub methods: usize,
    pub types: usize,
    /// Const and var specs seen but not elaborated.
    pub skipped_values: usize,
}

/// Loads one file into a package context.
pub struct LoadingPass<'a, 'ast, 'out> {
    ctx: &'a mut PackageContext<'ast, 'out>,
    blk: BlockCtx,
    output: LoadingOutput,
}

impl<'a, 'ast, 'out> LoadingPass<'a, 'ast, 'out> {
    /// Register `name` as a new file and prepare to load it.
    pub fn new(ctx: &'a mut PackageContext<'ast, 'out>, name: &'ast str) -> Self {
        let file = ctx.add_file(name);
        let blk = ctx.global_block(file);
        Self {
            ctx,
            blk,
            output: LoadingOutput {
                file,
                imports: 0,
                functions: 0,
                methods: 0,
                types: 0,
                skipped_values: 0,
            },
        }
    }

    /// Load every declaration. Stops at the first error.
    pub fn run(mut self, decls: &[Decl<'ast>]) -> Result<LoadingOutput> {
        for decl in decls {
            self.visit_decl(decl)?;
        }
        Ok(self.output)
    }

    fn visit_decl(&mut self, decl: &Decl<'ast>) -> Result<()> {
        match decl {
            Decl::Import(d) => self.visit_imports(d),
            Decl::Func(f) => self.visit_func(f),
            Decl::Type(d) => self.visit_types(d),
            Decl::Const(d) | Decl::Var(d) => {
                self.visit_values(d);
                Ok(())
            }
            Decl::Bad(bad) => Err(InternalError::UnknownDecl { span: bad.span }.into()),
        }
    }

    // ==========================================================================
    // Imports
    // ==========================================================================

    fn visit_imports(&mut self, d: &GenDecl<'ast, ImportSpec<'ast>>) -> Result<()> {
        for spec in d.specs {
            self.visit_import(spec)?;
        }
        Ok(())
    }

    fn visit_import(&mut self, spec: &ImportSpec<'ast>) -> Result<()> {
        let name = match spec.name {
            Some(alias) => match alias.name {
                "_" => return Err(unsupported("blank import", spec.path, spec)),
                "." => return Err(unsupported("dot import", spec.path, spec)),
                name => name,
            },
            None => import_base_name(spec.path),
        };
        debug!(name, path = spec.path, "import");
        self.ctx.file_mut(self.blk.file).import(name, spec.path);
        self.output.imports += 1;
        Ok(())
    }

    // ==========================================================================
    // Functions and methods
    // ==========================================================================

    fn visit_func(&mut self, f: &FuncDecl<'ast>) -> Result<()> {
        let name = f.name.name;
        if let Some(recv) = &f.recv {
            self.ctx.declare_method(self.blk, recv.type_name.name, f)?;
            self.output.methods += 1;
        } else if name == self.ctx.options().init_function {
            return Err(InternalError::Unsupported {
                feature: "init function",
                name: name.into(),
                span: f.span,
            }
            .into());
        } else {
            self.ctx.declare_function(self.blk, f)?;
            self.output.functions += 1;
        }
        Ok(())
    }

    // ==========================================================================
    // Types, constants, variables
    // ==========================================================================

    fn visit_types(&mut self, d: &GenDecl<'ast, TypeSpec<'ast>>) -> Result<()> {
        for spec in d.specs {
            // Only the name and alias flag are recorded; the underlying
            // type is not elaborated yet.
            self.ctx.declare_type(self.blk, spec.name.name, spec.alias)?;
            self.output.types += 1;
        }
        Ok(())
    }

    fn visit_values(&mut self, d: &GenDecl<'ast, ValueSpec<'ast>>) {
        self.output.skipped_values += d.specs.len();
    }
}

fn unsupported(feature: &'static str, path: &str, spec: &ImportSpec<'_>) -> CompileError {
    InternalError::Unsupported {
        feature,
        name: path.into(),
        span: spec.span,
    }
    .into()
}

/// Load `file` into `ctx`, returning the id of its file context.
#[tracing::instrument(skip_all, fields(file = file.name))]
pub fn load_file<'ast>(ctx: &mut PackageContext<'ast, '_>, file: &File<'ast>) -> Result<FileId> {
    let output = LoadingPass::new(ctx, file.name).run(file.decls)?;
    debug!(
        functions = output.functions,
        methods = output.methods,
        types = output.types,
        imports = output.imports,
        "loaded file"
    );
    Ok(output.file)
}
