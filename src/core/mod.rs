//! Core generation engine.
//!
//! - `identifier`: `protoc-gen-go` casing
//! - `scanner`: package / key-message extraction
//! - `render`: Go source text for plugin files
//! - `stub`: per-file plugin stubs
//! - `aggregate`: the whole-tree plugin file
//! - `directive`: `go:generate` directive logs
//! - `mirror`: source tree discovery and linking
//! - `toolchain`: the final `go generate` run
//! - `context` / `generate`: configuration and the pipeline tying it together

pub mod aggregate;
pub mod context;
pub mod directive;
pub mod generate;
pub mod identifier;
pub mod mirror;
pub mod render;
pub mod scanner;
pub mod stub;
pub mod toolchain;

pub use context::GenerateContext;
pub use generate::{GenerateOptions, GenerateReport, ListedDefinition, generate, list_definitions};
