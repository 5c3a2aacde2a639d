//! Data model shared by the Go front end, the resolution engine and the
//! renderers.
//!
//! Declared structures are identified by [`StructKey`] (declaring package and
//! name). Field types are kept as raw spellings and only resolved when a
//! documentation graph is collected, so forward references across files and
//! packages need no ordering during collection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Identity of a structure: declaring package and name.
///
/// Both components are compared exactly and case-sensitively. Synthesized
/// generic instantiations use the instantiated spelling as the name, e.g.
/// `Pagination[ReportItem]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructKey {
    pub package: String,
    pub name: String,
}

impl StructKey {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for StructKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.package, self.name)
        }
    }
}

/// Source location of a declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path, relative to the scanned root when known
    pub filename: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (0-indexed)
    pub col: usize,
}

impl Location {
    pub fn new(filename: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
            col,
        }
    }
}

/// Import aliases visible in one Go file: local qualifier → real package name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTable {
    aliases: BTreeMap<String, String>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `alias` refers to package `package`
    pub fn insert(&mut self, alias: impl Into<String>, package: impl Into<String>) {
        self.aliases.insert(alias.into(), package.into());
    }

    /// Builder-style [`ImportTable::insert`]
    pub fn with(mut self, alias: impl Into<String>, package: impl Into<String>) -> Self {
        self.insert(alias, package);
        self
    }

    /// Real package name for a qualifier, if the file imports it
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, p)| (a.as_str(), p.as_str()))
    }
}

impl<A: Into<String>, P: Into<String>> FromIterator<(A, P)> for ImportTable {
    fn from_iter<I: IntoIterator<Item = (A, P)>>(iter: I) -> Self {
        let mut table = ImportTable::new();
        for (alias, package) in iter {
            table.insert(alias, package);
        }
        table
    }
}

/// One field of a structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructField {
    /// Go field name
    pub name: String,
    /// Type exactly as written in source (whitespace normalized)
    #[serde(rename = "type")]
    pub raw_type: String,
    /// Doc comment and trailing comment text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Name used in JSON encoding
    pub json_name: String,
}

impl StructField {
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            json_name: name.clone(),
            name,
            raw_type: raw_type.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = json_name.into();
        self
    }
}

/// A structure declaration, or a synthesized generic instantiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub fields: Vec<StructField>,
    /// Ordered type parameter names; empty unless the declaration is generic
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    /// Import aliases of the declaring file, used to resolve field types
    #[serde(skip)]
    pub imports: Arc<ImportTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl StructDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            fields: Vec::new(),
            type_params: Vec::new(),
            imports: Arc::new(ImportTable::new()),
            location: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_field(mut self, field: StructField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_imports(mut self, imports: Arc<ImportTable>) -> Self {
        self.imports = imports;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

/// `@Parameter` of an API command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
    pub required: bool,
}

/// `@Result` of an API command; the name is always `result`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResult {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
}

/// `@Error` of an API command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub description: String,
}

/// A documented JSON-RPC command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFunction {
    pub command: String,
    pub description: String,
    pub parameters: Vec<ApiParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ApiResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional: Vec<String>,
    /// Go name of the annotated function
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub go_name: String,
    /// Declaring package
    pub package: String,
    /// Import aliases of the declaring file
    #[serde(skip)]
    pub imports: Arc<ImportTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ApiFunction {
    pub fn new(command: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: String::new(),
            parameters: Vec::new(),
            result: None,
            errors: Vec::new(),
            additional: Vec::new(),
            go_name: String::new(),
            package: package.into(),
            imports: Arc::new(ImportTable::new()),
            location: None,
        }
    }

    /// Raw type spellings of every parameter followed by the result
    pub fn referenced_types(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .map(|p| p.type_name.as_str())
            .chain(self.result.iter().map(|r| r.type_name.as_str()))
    }
}

/// Project-wide information shown at the top of the documentation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub title: String,
    pub version: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub license: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub contact: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub terms: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub repository: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub copyright: String,
}

impl ProjectInfo {
    /// Title, version and description are all present
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.version.is_empty() && !self.description.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_key_display() {
        assert_eq!(StructKey::new("models", "User").to_string(), "models.User");
        assert_eq!(StructKey::new("", "User").to_string(), "User");
    }

    #[test]
    fn test_struct_key_is_case_sensitive() {
        assert_ne!(
            StructKey::new("models", "User"),
            StructKey::new("models", "user")
        );
        assert_ne!(
            StructKey::new("Models", "User"),
            StructKey::new("models", "User")
        );
    }

    #[test]
    fn test_import_table() {
        let table: ImportTable = [("m", "models"), ("u", "utils")].into_iter().collect();
        assert_eq!(table.get("m"), Some("models"));
        assert_eq!(table.get("x"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_referenced_types_order() {
        let mut func = ApiFunction::new("getUser", "handlers");
        func.parameters.push(ApiParameter {
            name: "id".into(),
            type_name: "int".into(),
            description: String::new(),
            required: true,
        });
        func.result = Some(ApiResult {
            name: "result".into(),
            type_name: "models.User".into(),
            description: String::new(),
        });
        let types: Vec<_> = func.referenced_types().collect();
        assert_eq!(types, vec!["int", "models.User"]);
    }

    #[test]
    fn test_struct_definition_serializes_without_imports() {
        let def = StructDefinition::new("User")
            .with_field(StructField::new("ID", "int").with_json_name("id"))
            .with_imports(Arc::new(ImportTable::new().with("m", "models")));
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["name"], "User");
        assert_eq!(json["fields"][0]["type"], "int");
        assert_eq!(json["fields"][0]["jsonName"], "id");
        assert!(json.get("imports").is_none());
    }

    #[test]
    fn test_project_info_complete() {
        let mut info = ProjectInfo {
            title: "API".into(),
            version: "1.0".into(),
            ..Default::default()
        };
        assert!(!info.is_complete());
        info.description = "An API".into();
        assert!(info.is_complete());
    }
}
