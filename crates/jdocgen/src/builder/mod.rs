//! Builder API for jdocgen
//!
//! This module provides the main builder API for generating documentation
//! from a Go project. The CLI is a thin layer over it.

mod doc_builder;

pub use doc_builder::{BuildOutput, DocBuilder};
