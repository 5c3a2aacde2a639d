//! jdocgen: API documentation generator for annotated Go JSON-RPC handlers
//!
//! This crate generates documentation from a Go project by:
//! - Parsing every Go file with tree-sitter
//! - Reading `@Command`, `@Parameter`, `@Result`, `@Error` annotations from
//!   handler doc comments and project tags from file comments
//! - Cataloguing every struct declaration, generic ones included
//! - Resolving the structures reachable from each command's parameters and
//!   result, instantiating generics on demand
//! - Rendering a single Markdown (or JSON) document
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐
//! │ *.go structs    │    │ @Command docs    │
//! │ (tree-sitter)   │    │ (annotations)    │
//! └────────┬────────┘    └────────┬─────────┘
//!          ▼                      │
//!   ┌──────────────┐              │
//!   │   Catalog    │              │
//!   └──────┬───────┘              │
//!          └──────────┬───────────┘
//!                     ▼
//!              ┌──────────────┐
//!              │  TypeGraph   │  resolve + instantiate
//!              └──────┬───────┘
//!                     ▼
//!              ┌──────────────┐
//!              │Documentation │
//!              └──────┬───────┘
//!          ┌──────────┴──────────┐
//!          ▼                     ▼
//!    ┌──────────┐         ┌──────────┐
//!    │ Markdown │         │   JSON   │
//!    └──────────┘         └──────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use jdocgen::DocBuilder;
//!
//! DocBuilder::new("./server")
//!     .output("API_Documentation.md")
//!     .build()
//!     .expect("Failed to generate docs");
//! ```

// Core types
pub mod models;
pub mod type_ref;

// Resolution engine
pub mod catalog;
pub mod graph;
pub mod instantiate;
pub mod resolver;

// Parsing and utilities
pub mod annotations;
pub mod config;
pub mod diagnostics;
pub mod golang;
pub mod printer;

// Submodules
pub mod builder;
pub mod docgen;

// Re-exports for convenience
pub use catalog::{Catalog, CatalogBuilder};
pub use config::{JdocConfig, OutputFormat};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, DiagnosticsCollector, JdocError, JdocResult};
pub use graph::TypeGraph;
pub use instantiate::Instantiator;
pub use models::{
    ApiError, ApiFunction, ApiParameter, ApiResult, ImportTable, Location, ProjectInfo,
    StructDefinition, StructField, StructKey,
};
pub use resolver::{ResolutionMode, Resolver, Scope};
pub use type_ref::TypeRef;

// Terminal output
pub use printer::DiagnosticsPrinter;

// Builder API
pub use builder::{BuildOutput, DocBuilder};

// Documentation generation
pub use docgen::{
    DocGenerator, Documentation, MarkdownRenderer, ResolvedFunction, ResolvedStructure,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
