//! Deterministic hash-based identity for types, functions and methods.
//!
//! A [`TypeHash`] is computed from names alone, so a function can be
//! referenced by hash before the declaration that defines it has been
//! loaded. The emission backend keys generated code by these hashes.
//!
//! # Examples
//!
//! ```
//! use qlang_core::TypeHash;
//!
//! let a = TypeHash::from_name("int");
//! assert_eq!(a, TypeHash::from_name("int"));
//!
//! // Functions are namespaced by package, methods by their receiver type.
//! let f = TypeHash::from_function("main", "run");
//! let m = TypeHash::from_method(TypeHash::from_package_type("main", "Point"), "run");
//! assert_ne!(f, m);
//! ```

use std::fmt;

use xxhash_rust::const_xxh64::xxh64;

/// Domain-specific mixing constants.
///
/// Keep a type, a function and a method that share a name from hashing to
/// the same value.
pub mod hash_constants {
    /// Separator constant for path components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for builtin type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for types declared in a package.
    pub const PACKAGE_TYPE: u64 = 0x91b2c4d8e3f60a17;

    /// Domain marker for package-level function hashes.
    pub const FUNCTION: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for method hashes.
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;
}

/// A deterministic 64-bit hash identifying a type, function, or method.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Hash of a builtin type name.
    #[inline]
    pub const fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Hash of a type declared in `package`, keyed by its import path.
    ///
    /// Never equal to a builtin's hash, even when the package declares a
    /// type named like one.
    #[inline]
    pub const fn from_package_type(package: &str, name: &str) -> Self {
        let pkg = xxh64(package.as_bytes(), 0);
        let name = xxh64(name.as_bytes(), 0);
        TypeHash(
            hash_constants::PACKAGE_TYPE ^ pkg.wrapping_mul(hash_constants::SEP).wrapping_add(name),
        )
    }

    /// Hash of a package-level function.
    ///
    /// The package name takes part so two packages can each own a `run`.
    #[inline]
    pub const fn from_function(package: &str, name: &str) -> Self {
        let pkg = xxh64(package.as_bytes(), 0);
        let name = xxh64(name.as_bytes(), 0);
        TypeHash(hash_constants::FUNCTION ^ pkg.wrapping_mul(hash_constants::SEP).wrapping_add(name))
    }

    /// Hash of a method on `owner`.
    #[inline]
    pub const fn from_method(owner: TypeHash, name: &str) -> Self {
        let name = xxh64(name.as_bytes(), 0);
        TypeHash(hash_constants::METHOD ^ owner.0.wrapping_mul(hash_constants::SEP).wrapping_add(name))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Hashes of the builtin types every package can name without declaring.
pub mod primitives {
    use super::TypeHash;

    pub const BOOL: TypeHash = TypeHash::from_name("bool");
    pub const INT: TypeHash = TypeHash::from_name("int");
    pub const INT64: TypeHash = TypeHash::from_name("int64");
    pub const UINT: TypeHash = TypeHash::from_name("uint");
    pub const FLOAT64: TypeHash = TypeHash::from_name("float64");
    pub const STRING: TypeHash = TypeHash::from_name("string");
    /// Result type of calls that produce nothing.
    pub const VOID: TypeHash = TypeHash::from_name("void");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_hash_determinism() {
        assert_eq!(TypeHash::from_name("Point"), TypeHash::from_name("Point"));
        assert_eq!(primitives::INT, TypeHash::from_name("int"));
    }

    #[test]
    fn type_hash_uniqueness() {
        let names = ["int", "int64", "float64", "string", "bool", "Point"];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(TypeHash::from_name(a), TypeHash::from_name(b), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn package_types_never_alias_builtins() {
        assert_ne!(TypeHash::from_package_type("main", "string"), primitives::STRING);
        assert_ne!(TypeHash::from_package_type("main", "int"), primitives::INT);
        assert_ne!(
            TypeHash::from_package_type("main", "Point"),
            TypeHash::from_package_type("geom", "Point")
        );
    }

    #[test]
    fn function_hash_includes_package() {
        assert_ne!(
            TypeHash::from_function("main", "run"),
            TypeHash::from_function("util", "run")
        );
        assert_ne!(
            TypeHash::from_function("main", "run"),
            TypeHash::from_function("main", "walk")
        );
    }

    #[test]
    fn method_hash_includes_owner() {
        let point = TypeHash::from_package_type("main", "Point");
        let rect = TypeHash::from_package_type("main", "Rect");
        assert_ne!(
            TypeHash::from_method(point, "Area"),
            TypeHash::from_method(rect, "Area")
        );
    }

    #[test]
    fn domains_do_not_collide() {
        let as_type = TypeHash::from_name("run");
        let as_func = TypeHash::from_function("", "run");
        let as_method = TypeHash::from_method(TypeHash::EMPTY, "run");
        assert_ne!(as_type, as_func);
        assert_ne!(as_func, as_method);
        assert_ne!(as_type, as_method);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(TypeHash(0x2a).to_string(), "0x000000000000002a");
        assert!(TypeHash::EMPTY.is_empty());
    }
}
