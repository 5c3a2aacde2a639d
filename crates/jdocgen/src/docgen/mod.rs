//! Documentation generation core
//!
//! This module runs the pipeline from a Go source tree to a rendered
//! document:
//! - scanning and parsing every Go file
//! - registering structures into the catalog
//! - assembling function records and project information
//! - collecting the reachable structures of every command
//! - rendering Markdown or JSON

mod generator;
mod markdown;

pub use generator::{Collection, DocGenerator};
pub use markdown::{anchor, escape_cell, MarkdownRenderer, JSON_RPC_SPEC_URL};

use crate::models::{ApiFunction, ProjectInfo, StructDefinition, StructKey};
use serde::Serialize;

/// A structure reachable from a command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedStructure {
    pub key: StructKey,
    pub definition: StructDefinition,
    /// Whether the definition was produced by generic instantiation
    pub synthesized: bool,
}

/// A command together with the structures its parameters and result reach
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFunction {
    #[serde(flatten)]
    pub function: ApiFunction,
    /// Pre-order, duplicate-free
    pub structures: Vec<ResolvedStructure>,
}

/// Fully resolved documentation of a project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Documentation {
    pub project: ProjectInfo,
    /// Sorted by command name
    pub functions: Vec<ResolvedFunction>,
}

impl Documentation {
    /// Number of distinct structures across all commands
    pub fn structure_count(&self) -> usize {
        let mut keys: Vec<&StructKey> = self
            .functions
            .iter()
            .flat_map(|f| f.structures.iter().map(|s| &s.key))
            .collect();
        keys.sort();
        keys.dedup();
        keys.len()
    }

    /// Look up a documented command
    pub fn function(&self, command: &str) -> Option<&ResolvedFunction> {
        self.functions.iter().find(|f| f.function.command == command)
    }
}

impl ResolvedFunction {
    /// Keys of the reachable structures, in order
    pub fn structure_keys(&self) -> Vec<String> {
        self.structures.iter().map(|s| s.key.to_string()).collect()
    }
}
