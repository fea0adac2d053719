//! qlang Compiler
//!
//! Package front end: declaration loading, name resolution and demand-driven
//! lowering of function bodies.
//!
//! ## Architecture
//!
//! - **Loading**: every file's top-level declarations go into one package
//!   scope; imports go into a table private to the file
//! - **Scheduling**: a body is queued the first time something marks it
//!   used, and the queue is drained until no new work appears
//!
//! Only executable packages are lowered, starting from the entry function.
//!
//! ## Modules
//!
//! - [`bytecode`]: Instruction encoding (OpCode, Chunk)
//! - [`context`]: Package compilation session with the scope-chain API
//! - [`emit`]: Emission backend trait and the recording builder
//! - [`file`]: Per-file import tables
//! - [`function_compiler`]: Body lowering trait and reference lowering
//! - [`infer`]: Scratch expression-type stack
//! - [`options`]: Compiler options
//! - [`package`]: Package assembly and the compiled artifact
//! - [`passes`]: Declaration loading
//! - [`scheduler`]: Worklist of bodies to lower
//! - [`scope`]: Lexical scope tree
//! - [`symbol`]: Symbols, functions, types and methods

pub mod bytecode;
pub mod context;
pub mod emit;
pub mod file;
pub mod function_compiler;
pub mod infer;
pub mod options;
pub mod package;
pub mod passes;
pub mod scheduler;
pub mod scope;
pub mod symbol;

pub use bytecode::{Chunk, Instr, OpCode};
pub use context::{BlockCtx, PackageContext};
pub use emit::{Builder, Builtin, Emitter};
pub use file::{FileContext, FileId};
pub use function_compiler::{BodyLowering, FunctionCompiler, LowerTarget, RecvBinding};
pub use infer::InferStack;
pub use options::CompilerOptions;
pub use package::{CompiledPackage, PackageBuilder, assemble, compile_package};
pub use passes::{LoadingOutput, LoadingPass, load_file};
pub use scheduler::{Scheduler, WorkItem};
pub use scope::{ScopeData, ScopeId, ScopeTree};
pub use symbol::{
    FuncEntry, FuncFlags, FuncId, MethodEntry, Symbol, TypeEntry, TypeId, TypeState, Var, VarAddr,
};

// Re-export the error types from core for convenience
pub use qlang_core::{CompileError, InternalError, Result, SymbolKind};
