//! Core types shared by the qlang front-end crates.
//!
//! - [`Span`]: source positions
//! - [`TypeHash`]: name-derived identity for types, functions and methods
//! - [`DataType`]: semantic type of variables and expressions
//! - [`CompileError`]: the error taxonomy for loading and assembly

mod data_type;
mod error;
mod span;
mod type_hash;

pub use data_type::DataType;
pub use error::{CompileError, InternalError, SymbolKind};
pub use span::Span;
pub use type_hash::{TypeHash, hash_constants, primitives};

/// Result type used throughout the front end.
pub type Result<T> = std::result::Result<T, CompileError>;
