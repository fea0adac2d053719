//! qlang package front end.
//!
//! Turns a parsed package into a populated symbol table and lowers exactly
//! the functions reachable from `main`, each once.
//!
//! # Example
//!
//! ```ignore
//! use qlang::prelude::*;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let package = b.package("main", &[b.file("main.ql", &[
//!     b.func("main", &[], &[b.call_stmt("f")]),
//!     b.func("f", &[], &[]),
//! ])]);
//!
//! let compiled = qlang::compile(&package, CompilerOptions::default())?;
//! assert_eq!(compiled.code.len(), 2);
//! ```

pub use qlang_ast as ast;
pub use qlang_compiler as compiler;
pub use qlang_core as core;

pub use bumpalo::Bump;

use qlang_ast::Package;
use qlang_compiler::{Builder, Chunk, CompiledPackage, CompilerOptions, FunctionCompiler};
use qlang_core::Result;
use tracing::info;

/// Commonly used types.
pub mod prelude {
    pub use bumpalo::Bump;
    pub use qlang_ast::{AstBuilder, Decl, File, Package};
    pub use qlang_compiler::{
        Builder, CompiledPackage, CompilerOptions, Emitter, FunctionCompiler, OpCode,
        PackageBuilder, Symbol, compile_package,
    };
    pub use qlang_core::{CompileError, DataType, InternalError, Span, SymbolKind, TypeHash};
}

/// A compiled package together with the code emitted for it.
#[derive(Debug)]
pub struct Compiled<'ast> {
    pub package: CompiledPackage<'ast>,
    /// One chunk per lowered function or method, in lowering order.
    pub code: Vec<Chunk>,
}

/// Compile `package` with the default emitter and lowering.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile<'ast>(package: &Package<'ast>, options: CompilerOptions) -> Result<Compiled<'ast>> {
    let mut out = Builder::new();
    let mut lowering = FunctionCompiler::new();
    let compiled = qlang_compiler::compile_package(package, &mut out, &mut lowering, options)?;
    info!(
        package = compiled.name(),
        functions = compiled.funcs().len(),
        lowered = lowering.lowered(),
        "compiled package"
    );
    Ok(Compiled {
        package: compiled,
        code: out.into_chunks(),
    })
}
