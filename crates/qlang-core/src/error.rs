//! Error types for the qlang front end.
//!
//! Two tiers share one result type:
//!
//! ```text
//! CompileError
//! ├── NotFound           - name unresolved in every scope and the import table
//! ├── KindMismatch       - name resolved to a symbol of the wrong kind
//! ├── EntryPointMissing  - executable package without its entry function
//! └── Internal(InternalError)
//!     ├── Redeclared, NotPackageScope
//!     ├── MethodOnNonType, MethodOnAlias, DuplicateMethod
//!     ├── Unsupported, UnknownDecl
//!     └── AlreadyLowered
//! ```
//!
//! The first three are ordinary user-facing outcomes. `Internal` errors are
//! invariant violations or unimplemented paths: they abort the compilation
//! run and are reported as internal compiler errors.

use std::fmt;

use thiserror::Error;

use crate::Span;

/// The kinds of symbol a name can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Function,
    Type,
    Import,
}

impl SymbolKind {
    /// Returns a human-readable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Function => "function",
            SymbolKind::Type => "type",
            SymbolKind::Import => "import",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Compile Errors
// ============================================================================

/// Errors produced while loading declarations and assembling a package.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The name is not bound in any enclosing scope or the file's imports.
    #[error("undefined: {name}")]
    NotFound {
        /// The unresolved name.
        name: String,
    },

    /// The name is bound, but to a different kind of symbol.
    #[error("'{name}': expected {expected}, found {found}")]
    KindMismatch {
        /// The resolved name.
        name: String,
        /// What the caller asked for.
        expected: SymbolKind,
        /// What the name is actually bound to.
        found: SymbolKind,
    },

    /// An executable package has no entry function.
    #[error("package {package}: {function} function not found")]
    EntryPointMissing {
        /// The package being built.
        package: String,
        /// The entry function that was looked for.
        function: String,
    },

    /// A fatal invariant violation; the run cannot continue.
    #[error("internal compiler error: {0}")]
    Internal(#[from] InternalError),
}

impl CompileError {
    /// Shorthand for a not-found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        CompileError::NotFound { name: name.into() }
    }

    /// Shorthand for a kind-mismatch error.
    pub fn kind_mismatch(name: impl Into<String>, expected: SymbolKind, found: SymbolKind) -> Self {
        CompileError::KindMismatch {
            name: name.into(),
            expected,
            found,
        }
    }

    /// Whether this error aborts compilation rather than reporting a user error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CompileError::Internal(_))
    }

    /// The name the error is about, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            CompileError::NotFound { name } | CompileError::KindMismatch { name, .. } => Some(name),
            CompileError::EntryPointMissing { function, .. } => Some(function),
            CompileError::Internal(e) => e.name(),
        }
    }
}

// ============================================================================
// Internal Errors
// ============================================================================

/// Invariant violations and deliberately unimplemented front-end paths.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InternalError {
    /// A name was declared twice in the same scope.
    #[error("symbol exists - {name}")]
    Redeclared {
        /// The duplicated name.
        name: String,
    },

    /// A declaration that is only valid at package scope appeared in a block.
    #[error("non package-scope declaration of {name}")]
    NotPackageScope {
        /// The declared name.
        name: String,
    },

    /// A method was declared on a name that is not a type.
    #[error("method {type_name}.{method}: {type_name} is a {found}, not a type")]
    MethodOnNonType {
        /// The receiver type name.
        type_name: String,
        /// The method name.
        method: String,
        /// What the receiver name is bound to.
        found: SymbolKind,
    },

    /// A method was declared on an alias type.
    #[error("method {type_name}.{method}: cannot define methods on alias {type_name}")]
    MethodOnAlias {
        /// The alias type name.
        type_name: String,
        /// The method name.
        method: String,
    },

    /// The same method was declared twice on one type.
    #[error("method exists - {type_name}.{method}")]
    DuplicateMethod {
        /// The receiver type name.
        type_name: String,
        /// The method name.
        method: String,
    },

    /// A front-end feature that is not implemented yet.
    #[error("at {span}: {feature} not implemented ({name})")]
    Unsupported {
        /// The missing feature.
        feature: &'static str,
        /// The name involved.
        name: String,
        /// Where the construct appeared.
        span: Span,
    },

    /// A declaration node the loader does not recognise.
    #[error("at {span}: unknown declaration")]
    UnknownDecl {
        /// Where the node appeared.
        span: Span,
    },

    /// A function body was handed to the lowering step a second time.
    #[error("function {name} lowered twice")]
    AlreadyLowered {
        /// The function name.
        name: String,
    },
}

impl InternalError {
    /// The name the error is about, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            InternalError::Redeclared { name }
            | InternalError::NotPackageScope { name }
            | InternalError::Unsupported { name, .. }
            | InternalError::AlreadyLowered { name } => Some(name),
            InternalError::MethodOnNonType { method, .. }
            | InternalError::MethodOnAlias { method, .. }
            | InternalError::DuplicateMethod { method, .. } => Some(method),
            InternalError::UnknownDecl { .. } => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
