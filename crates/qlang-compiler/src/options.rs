//! Compiler configuration.
//!
//! The naming conventions the front end keys behaviour on. Defaults follow
//! the language: a package named `main` is an executable whose entry point
//! is `func main()`, and `func init()` is the module initializer.

/// Options for a package build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Package name that marks an executable.
    pub entry_package: String,
    /// Entry function of an executable package.
    pub entry_function: String,
    /// Module initializer name (not supported yet).
    pub init_function: String,
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_package(mut self, name: impl Into<String>) -> Self {
        self.entry_package = name.into();
        self
    }

    pub fn with_entry_function(mut self, name: impl Into<String>) -> Self {
        self.entry_function = name.into();
        self
    }

    pub fn with_init_function(mut self, name: impl Into<String>) -> Self {
        self.init_function = name.into();
        self
    }

    /// Whether a package with this name is built as an executable.
    pub fn is_executable(&self, package: &str) -> bool {
        package == self.entry_package
    }
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            entry_package: "main".into(),
            entry_function: "main".into(),
            init_function: "init".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_language_conventions() {
        let opts = CompilerOptions::default();
        assert!(opts.is_executable("main"));
        assert!(!opts.is_executable("lib"));
        assert_eq!(opts.entry_function, "main");
        assert_eq!(opts.init_function, "init");
    }

    #[test]
    fn builder_setters() {
        let opts = CompilerOptions::new()
            .with_entry_package("app")
            .with_entry_function("start");
        assert!(opts.is_executable("app"));
        assert_eq!(opts.entry_function, "start");
    }
}
