//! Go front end
//!
//! - [`scan`] finds the Go files of a project
//! - [`parse`] extracts packages, imports, structs and function doc comments
//! - [`imports`] maps import qualifiers to real package names

pub mod imports;
pub mod parse;
pub mod scan;

pub use imports::PackageIndex;
pub use parse::{parse_go_file, GoFile, GoFunction, GoImport, GoParser, GoStruct};
pub use scan::SourceScanner;
