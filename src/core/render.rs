//! Minimal Go source writer used by the stub and aggregate synthesizers.

use std::fmt::Write as _;

/// How a module is brought into scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Import {
    /// `. "path"`: exported names become visible unqualified.
    Anonymous { path: String },
    /// `alias "path"`: names are reached as `alias.Name`.
    Aliased { alias: String, path: String },
}

impl Import {
    fn render(&self) -> String {
        match self {
            Import::Anonymous { path } => format!(". \"{}\"", path),
            Import::Aliased { alias, path } => format!("{} \"{}\"", alias, path),
        }
    }
}

/// A package-level `var <name> <type>` without initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalVar {
    pub name: String,
    pub type_name: String,
}

impl GlobalVar {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A `package main` Go file that exists to pull symbols into a plugin build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoPluginSource {
    /// Text after `//go:generate `.
    pub build_directive: String,
    pub imports: Vec<Import>,
    pub globals: Vec<GlobalVar>,
}

impl GoPluginSource {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "//go:generate {}", self.build_directive);
        out.push('\n');
        out.push_str("package main\n\n");
        out.push_str("import (\n");
        for import in &self.imports {
            let _ = writeln!(out, "\t{}", import.render());
        }
        out.push_str(")\n\n");
        for var in &self.globals {
            let _ = writeln!(out, "var {} {}", var.name, var.type_name);
        }
        out
    }
}
