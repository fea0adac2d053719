//! Compiler passes.
//!
//! - [`loading`]: populate the package scope and per-file import tables from
//!   every file's top-level declarations. No bodies are lowered here.
//!
//! Lowering is demand driven rather than a pass: see
//! [`PackageContext::drain`](crate::context::PackageContext::drain).

pub mod loading;

pub use loading::{LoadingOutput, LoadingPass, load_file};
