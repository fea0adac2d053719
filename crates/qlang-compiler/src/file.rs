//! Per-file compilation state.
//!
//! Every file gets its own import table. Imports never leak into other files
//! of the package, while everything else a file declares goes to the shared
//! package scope.

use std::fmt;

use rustc_hash::FxHashMap;

/// Index of a file in the package's file table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file_{}", self.0)
    }
}

/// Import table of one file.
#[derive(Debug, Clone)]
pub struct FileContext<'ast> {
    id: FileId,
    name: &'ast str,
    imports: FxHashMap<&'ast str, &'ast str>,
}

impl<'ast> FileContext<'ast> {
    pub fn new(id: FileId, name: &'ast str) -> Self {
        Self {
            id,
            name,
            imports: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &'ast str {
        self.name
    }

    /// Bind `name` to a package path. A later import of the same name wins.
    pub fn import(&mut self, name: &'ast str, path: &'ast str) {
        self.imports.insert(name, path);
    }

    /// Path bound to `name` in this file.
    pub fn import_path(&self, name: &str) -> Option<&'ast str> {
        self.imports.get(name).copied()
    }

    pub fn imports(&self) -> impl Iterator<Item = (&'ast str, &'ast str)> + '_ {
        self.imports.iter().map(|(n, p)| (*n, *p))
    }
}

/// Local name for an unaliased import: the last path segment.
pub fn import_base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_is_last_segment() {
        assert_eq!(import_base_name("strings"), "strings");
        assert_eq!(import_base_name("encoding/json"), "json");
        assert_eq!(import_base_name("github.com/x/y/"), "y");
    }

    #[test]
    fn imports_are_per_file() {
        let mut a = FileContext::new(FileId::new(0), "a.q");
        let b = FileContext::new(FileId::new(1), "b.q");
        a.import("json", "encoding/json");
        assert_eq!(a.import_path("json"), Some("encoding/json"));
        assert_eq!(b.import_path("json"), None);
    }
}
