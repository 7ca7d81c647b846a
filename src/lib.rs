//! Protoplug - Go bindings and plugins for a tree of proto files
//!
//! Protoplug mirrors a tree of `.proto` files into a target tree, records the
//! `go:generate` directives `go generate` needs to build Go bindings for them,
//! and synthesizes Go plugin sources exporting each file's `_KEYS` message pair.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Scanning, identifier casing, synthesis and the generation pipeline
//! - `issues`: Diagnostics reported during a run

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
