//! Emission backend.
//!
//! The front end talks to code generation only through the [`Emitter`]
//! trait: it asks for builtins by name, tracks the nesting depth used for
//! variable addressing, and appends instructions to the function currently
//! being lowered.
//!
//! [`Builder`] is the default backend. It records one [`Chunk`] per lowered
//! function and carries the builtin table of the empty namespace.
//!
//! # Example
//!
//! ```ignore
//! use qlang_compiler::emit::{Builder, Emitter};
//! use qlang_compiler::bytecode::OpCode;
//!
//! let mut out = Builder::new();
//! out.begin_function(hash, "main");
//! out.nest();
//! out.emit(OpCode::Return, 0);
//! out.unnest();
//! out.end_function();
//! assert_eq!(out.chunks().len(), 1);
//! ```

use qlang_core::{DataType, TypeHash, primitives};
use rustc_hash::FxHashMap;

use crate::bytecode::{Chunk, OpCode};

/// A symbol provided by the backend rather than declared in the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// A predeclared type such as `int`.
    Type(DataType),
    /// A predeclared function such as `println`.
    Func {
        /// Identity used in `CallBuiltin`.
        hash: TypeHash,
        /// Result type, `DataType::VOID` if none.
        result: DataType,
    },
}

/// Target of code generation.
pub trait Emitter {
    /// Look up a builtin in the empty namespace.
    fn builtin(&self, name: &str) -> Option<Builtin>;

    /// Current nesting level; variables declared now get this depth.
    fn nest_depth(&self) -> u32;

    /// Enter a nested frame.
    fn nest(&mut self);

    /// Leave the innermost frame.
    fn unnest(&mut self);

    /// Start emitting the body of a function.
    fn begin_function(&mut self, hash: TypeHash, name: &str);

    /// Finish the function started by the matching `begin_function`.
    fn end_function(&mut self);

    /// Discard the function started by the matching `begin_function`.
    /// Called instead of `end_function` when lowering fails.
    fn abort_function(&mut self);

    /// Append one instruction.
    fn emit(&mut self, op: OpCode, operand: u64);

    /// Intern a constant, returning its index for `PushConst`.
    fn constant(&mut self, text: &str) -> u32;
}

// ============================================================================
// Builder
// ============================================================================

/// Recording emitter: one chunk per function, in lowering order.
pub struct Builder {
    builtins: FxHashMap<&'static str, Builtin>,
    /// Functions being emitted, innermost last, with the depth to restore.
    open: Vec<(Chunk, u32)>,
    chunks: Vec<Chunk>,
    depth: u32,
}

impl Builder {
    /// Create a builder with the standard builtin table.
    pub fn new() -> Self {
        let mut builtins = FxHashMap::default();
        for (name, hash) in [
            ("bool", primitives::BOOL),
            ("int", primitives::INT),
            ("int64", primitives::INT64),
            ("uint", primitives::UINT),
            ("float64", primitives::FLOAT64),
            ("string", primitives::STRING),
        ] {
            builtins.insert(name, Builtin::Type(DataType::simple(hash)));
        }
        for (name, result) in [
            ("print", DataType::VOID),
            ("println", DataType::VOID),
            ("len", DataType::simple(primitives::INT)),
        ] {
            builtins.insert(
                name,
                Builtin::Func {
                    hash: TypeHash::from_function("", name),
                    result,
                },
            );
        }

        Self {
            builtins,
            open: Vec::new(),
            chunks: Vec::new(),
            depth: 0,
        }
    }

    /// Register an extra builtin, replacing any with the same name.
    pub fn with_builtin(mut self, name: &'static str, builtin: Builtin) -> Self {
        self.builtins.insert(name, builtin);
        self
    }

    /// Finished chunks in the order their functions were lowered.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The chunk emitted for the function named `name`.
    pub fn chunk(&self, name: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.name == name)
    }

    /// The chunk emitted for the function with identity `hash`.
    pub fn chunk_by_hash(&self, hash: TypeHash) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.hash == hash)
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }

    /// Drop finished chunks past the first `len`, and any function still
    /// open. Used to roll back a failed run.
    pub fn truncate(&mut self, len: usize) {
        self.chunks.truncate(len);
        if let Some((_, depth)) = self.open.first() {
            self.depth = *depth;
        }
        self.open.clear();
    }

    fn current(&mut self) -> Option<&mut Chunk> {
        debug_assert!(!self.open.is_empty(), "code emitted outside a function");
        self.open.last_mut().map(|(chunk, _)| chunk)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for Builder {
    fn builtin(&self, name: &str) -> Option<Builtin> {
        self.builtins.get(name).copied()
    }

    fn nest_depth(&self) -> u32 {
        self.depth
    }

    fn nest(&mut self) {
        self.depth += 1;
    }

    fn unnest(&mut self) {
        debug_assert!(self.depth > 0, "unnest at depth 0");
        self.depth = self.depth.saturating_sub(1);
    }

    fn begin_function(&mut self, hash: TypeHash, name: &str) {
        self.open.push((Chunk::new(hash, name), self.depth));
        self.depth = 0;
    }

    fn end_function(&mut self) {
        if let Some((chunk, depth)) = self.open.pop() {
            self.chunks.push(chunk);
            self.depth = depth;
        }
    }

    fn abort_function(&mut self) {
        if let Some((_, depth)) = self.open.pop() {
            self.depth = depth;
        }
    }

    fn emit(&mut self, op: OpCode, operand: u64) {
        if let Some(chunk) = self.current() {
            chunk.write(op, operand);
        }
    }

    fn constant(&mut self, text: &str) -> u32 {
        self.current().map_or(0, |chunk| chunk.add_constant(text))
    }
}
