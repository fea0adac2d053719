//! DataType - the semantic type attached to variables and expressions.
//!
//! Only the identity of the base type and whether it is reached through a
//! pointer are tracked; full type elaboration happens elsewhere.
//!
//! # Example
//!
//! ```
//! use qlang_core::{DataType, primitives};
//!
//! let int = DataType::simple(primitives::INT);
//! let ptr = int.pointer();
//! assert!(ptr.is_pointer);
//! assert_eq!(ptr.elem(), int);
//! ```

use std::fmt::{self, Display, Formatter};

use crate::TypeHash;
use crate::primitives;

/// A base type plus pointer indirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataType {
    /// The base type hash.
    pub type_hash: TypeHash,
    /// Whether the value is a pointer to the base type.
    pub is_pointer: bool,
}

impl DataType {
    /// Result type of expressions that produce no value.
    pub const VOID: DataType = DataType::simple(primitives::VOID);

    /// A plain value of the given base type.
    #[inline]
    pub const fn simple(type_hash: TypeHash) -> Self {
        Self {
            type_hash,
            is_pointer: false,
        }
    }

    /// A plain value of the builtin type with this name.
    #[inline]
    pub const fn named(name: &str) -> Self {
        Self::simple(TypeHash::from_name(name))
    }

    /// Pointer to this type.
    #[inline]
    pub const fn pointer(self) -> Self {
        Self {
            type_hash: self.type_hash,
            is_pointer: true,
        }
    }

    /// The pointed-to type; identity for non-pointers.
    #[inline]
    pub const fn elem(self) -> Self {
        Self::simple(self.type_hash)
    }

    /// Whether this is the no-value type.
    #[inline]
    pub fn is_void(&self) -> bool {
        self.type_hash == primitives::VOID && !self.is_pointer
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_pointer {
            write!(f, "*{}", self.type_hash)
        } else {
            write!(f, "{}", self.type_hash)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_matches_primitive() {
        assert_eq!(DataType::named("string"), DataType::simple(primitives::STRING));
    }

    #[test]
    fn pointer_round_trip() {
        let t = DataType::named("Point");
        assert!(!t.is_pointer);
        assert_ne!(t.pointer(), t);
        assert_eq!(t.pointer().elem(), t);
    }

    #[test]
    fn void_detection() {
        assert!(DataType::VOID.is_void());
        assert!(!DataType::VOID.pointer().is_void());
        assert!(!DataType::named("int").is_void());
    }
}
