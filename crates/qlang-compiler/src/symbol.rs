//! Symbols and the entries they point at.
//!
//! A scope maps names to [`Symbol`]s. Variables are stored inline; functions
//! and types live in tables owned by the package context and are referred to
//! by id, so a `Symbol` is a small `Copy` value.

use std::fmt;

use bitflags::bitflags;
use qlang_ast::{Block, FuncType};
use qlang_core::{DataType, SymbolKind, TypeHash};
use rustc_hash::FxHashMap;

use crate::file::FileId;

macro_rules! index_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

index_id!(
    /// Index of a function in the package's function table.
    FuncId,
    "func"
);
index_id!(
    /// Index of a type in the package's type table.
    TypeId,
    "type"
);

// ============================================================================
// Symbol
// ============================================================================

/// What a name is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol<'ast> {
    /// A variable with its storage address.
    Var(Var<'ast>),
    /// A package-level function.
    Func(FuncId),
    /// A named type (possibly provisional).
    Type(TypeId),
    /// An imported package path. Only produced by the import-table fallback.
    Import(&'ast str),
}

impl Symbol<'_> {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Var(_) => SymbolKind::Variable,
            Symbol::Func(_) => SymbolKind::Function,
            Symbol::Type(_) => SymbolKind::Type,
            Symbol::Import(_) => SymbolKind::Import,
        }
    }
}

/// Lexical storage address of a variable.
///
/// `depth` is the emitter's nesting level when the variable was declared,
/// `slot` its position in the declaring scope's variable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarAddr {
    pub depth: u32,
    pub slot: u32,
}

impl VarAddr {
    /// Pack into a single instruction operand: depth in the high half.
    #[inline]
    pub const fn to_operand(self) -> u64 {
        ((self.depth as u64) << 32) | self.slot as u64
    }

    #[inline]
    pub const fn from_operand(operand: u64) -> Self {
        Self {
            depth: (operand >> 32) as u32,
            slot: operand as u32,
        }
    }
}

impl fmt::Display for VarAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.depth, self.slot)
    }
}

/// A declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Var<'ast> {
    pub name: &'ast str,
    pub data_type: DataType,
    pub addr: VarAddr,
}

// ============================================================================
// Functions
// ============================================================================

bitflags! {
    /// Lifecycle of a function body.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FuncFlags: u8 {
        /// Referenced from lowered code; set once, never cleared.
        const USED = 1 << 0;
        /// Body has been handed to the lowering step.
        const COMPILED = 1 << 1;
    }
}

/// A package-level function awaiting (or past) lowering.
#[derive(Debug, Clone)]
pub struct FuncEntry<'ast> {
    pub name: &'ast str,
    /// Identity used by the emitter.
    pub hash: TypeHash,
    pub sig: FuncType<'ast>,
    /// None for functions implemented outside the package.
    pub body: Option<Block<'ast>>,
    /// File the function was declared in; its imports apply to the body.
    pub file: FileId,
    pub flags: FuncFlags,
}

impl<'ast> FuncEntry<'ast> {
    pub fn new(
        name: &'ast str,
        hash: TypeHash,
        sig: FuncType<'ast>,
        body: Option<Block<'ast>>,
        file: FileId,
    ) -> Self {
        Self {
            name,
            hash,
            sig,
            body,
            file,
            flags: FuncFlags::empty(),
        }
    }

    #[inline]
    pub fn is_used(&self) -> bool {
        self.flags.contains(FuncFlags::USED)
    }

    #[inline]
    pub fn is_compiled(&self) -> bool {
        self.flags.contains(FuncFlags::COMPILED)
    }
}

// ============================================================================
// Types and methods
// ============================================================================

/// Whether a type's own declaration has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeState {
    /// Created by a method declaration seen before the type itself.
    Provisional,
    /// The type declaration has been loaded.
    Declared,
}

/// A named type and its method set.
#[derive(Debug, Clone)]
pub struct TypeEntry<'ast> {
    pub name: &'ast str,
    pub hash: TypeHash,
    pub alias: bool,
    pub state: TypeState,
    pub methods: FxHashMap<&'ast str, MethodEntry<'ast>>,
}

impl<'ast> TypeEntry<'ast> {
    /// A placeholder for a type only known through its methods so far.
    pub fn provisional(package: &str, name: &'ast str) -> Self {
        Self {
            name,
            hash: TypeHash::from_package_type(package, name),
            alias: false,
            state: TypeState::Provisional,
            methods: FxHashMap::default(),
        }
    }

    pub fn declared(package: &str, name: &'ast str, alias: bool) -> Self {
        Self {
            alias,
            state: TypeState::Declared,
            ..Self::provisional(package, name)
        }
    }

    #[inline]
    pub fn is_provisional(&self) -> bool {
        self.state == TypeState::Provisional
    }

    pub fn method(&self, name: &str) -> Option<&MethodEntry<'ast>> {
        self.methods.get(name)
    }

    /// Value type of this named type.
    pub fn data_type(&self) -> DataType {
        DataType::simple(self.hash)
    }
}

/// A method declared on a named type.
#[derive(Debug, Clone)]
pub struct MethodEntry<'ast> {
    pub name: &'ast str,
    pub hash: TypeHash,
    /// Receiver variable name, if written.
    pub recv: Option<&'ast str>,
    /// `(p *T)` rather than `(p T)`.
    pub pointer: bool,
    pub sig: FuncType<'ast>,
    pub body: Option<Block<'ast>>,
    pub file: FileId,
    pub flags: FuncFlags,
}

impl<'ast> MethodEntry<'ast> {
    #[inline]
    pub fn is_used(&self) -> bool {
        self.flags.contains(FuncFlags::USED)
    }

    #[inline]
    pub fn is_compiled(&self) -> bool {
        self.flags.contains(FuncFlags::COMPILED)
    }
}
