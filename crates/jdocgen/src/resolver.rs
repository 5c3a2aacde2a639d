//! Reference resolution
//!
//! Maps a parsed [`TypeRef`] to the [`StructKey`] of a catalog entry, using
//! the package and import aliases of the place where the reference was
//! written:
//! - a qualified reference (`m.User`) uses the alias target when the file
//!   imports `m`, otherwise the qualifier text itself as the package name
//! - an unqualified reference (`User`) is looked up in the context package
//!
//! In [`ResolutionMode::Strict`] that is all. [`ResolutionMode::Permissive`]
//! additionally falls back to a search by bare name over every package.

use crate::catalog::Catalog;
use crate::diagnostics::{codes, Diagnostic, DiagnosticsCollector};
use crate::models::{ImportTable, StructKey};
use crate::type_ref::TypeRef;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How references that miss the exact lookup are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Only the scoped lookup is tried
    #[default]
    Strict,
    /// Fall back to the first package (in sorted order) declaring the name
    Permissive,
}

impl FromStr for ResolutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(ResolutionMode::Strict),
            "permissive" => Ok(ResolutionMode::Permissive),
            other => Err(format!(
                "unknown resolution mode '{}' (expected 'strict' or 'permissive')",
                other
            )),
        }
    }
}

/// Package and import aliases in effect where a reference is written
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub package: &'a str,
    pub imports: &'a ImportTable,
}

impl<'a> Scope<'a> {
    pub fn new(package: &'a str, imports: &'a ImportTable) -> Self {
        Self { package, imports }
    }
}

/// Resolves type references against a catalog
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'c> {
    catalog: &'c Catalog,
    mode: ResolutionMode,
}

impl<'c> Resolver<'c> {
    /// Create a strict resolver
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            mode: ResolutionMode::Strict,
        }
    }

    /// Set the resolution mode
    pub fn with_mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Key the reference would have under the scoping rules, whether or not
    /// it is declared. `None` for basic, opaque and malformed references.
    pub fn candidate_key(&self, type_ref: &TypeRef, scope: &Scope<'_>) -> Option<StructKey> {
        if !type_ref.is_resolvable() {
            return None;
        }
        let package = match &type_ref.qualifier {
            Some(qualifier) => scope.imports.get(qualifier).unwrap_or(qualifier.as_str()),
            None => scope.package,
        };
        Some(StructKey::new(package, type_ref.base_name.as_str()))
    }

    /// Resolve a reference to a declared structure.
    ///
    /// Basic and opaque references resolve to `None` silently. Malformed or
    /// undeclared references resolve to `None` and leave a diagnostic.
    pub fn resolve(
        &self,
        type_ref: &TypeRef,
        scope: &Scope<'_>,
        diagnostics: &mut DiagnosticsCollector,
    ) -> Option<StructKey> {
        if type_ref.malformed {
            diagnostics.add(
                Diagnostic::warning(format!("malformed type reference '{}'", type_ref))
                    .with_code(codes::MALFORMED_GENERIC),
            );
            return None;
        }

        let key = self.candidate_key(type_ref, scope)?;
        if self.catalog.contains(&key) {
            tracing::debug!(reference = %type_ref, key = %key, "resolved");
            return Some(key);
        }

        if self.mode == ResolutionMode::Permissive {
            if let Some(key) = self.resolve_by_name(type_ref, scope, diagnostics) {
                return Some(key);
            }
        }

        diagnostics.add(
            Diagnostic::warning(format!(
                "type '{}' not found in package '{}'; ensure it is imported or fully qualified",
                type_ref.qualified_name(),
                key.package
            ))
            .with_code(codes::UNRESOLVED_TYPE),
        );
        None
    }

    fn resolve_by_name(
        &self,
        type_ref: &TypeRef,
        scope: &Scope<'_>,
        diagnostics: &mut DiagnosticsCollector,
    ) -> Option<StructKey> {
        let packages = self.catalog.packages_declaring(&type_ref.base_name);
        let package = packages.first()?;
        if packages.len() > 1 {
            diagnostics.add(
                Diagnostic::warning(format!(
                    "type '{}' referenced from package '{}' is declared in {}; using '{}'",
                    type_ref.qualified_name(),
                    scope.package,
                    packages.join(", "),
                    package
                ))
                .with_code(codes::AMBIGUOUS_TYPE),
            );
        }
        let key = StructKey::new(package.as_str(), type_ref.base_name.as_str());
        tracing::debug!(reference = %type_ref, key = %key, "resolved by name");
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StructDefinition;

    fn catalog() -> Catalog {
        [
            (StructKey::new("models", "User"), StructDefinition::new("User")),
            (StructKey::new("models", "Stats"), StructDefinition::new("Stats")),
            (StructKey::new("handlers", "Stats"), StructDefinition::new("Stats")),
            (StructKey::new("reports", "Report"), StructDefinition::new("Report")),
            (StructKey::new("shared", "Report"), StructDefinition::new("Report")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_qualifier_precedence() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog);
        let imports = ImportTable::new().with("m", "models");
        let mut diags = DiagnosticsCollector::new();

        for package in ["handlers", "main", "models"] {
            let key = resolver.resolve(
                &TypeRef::parse("m.User"),
                &Scope::new(package, &imports),
                &mut diags,
            );
            assert_eq!(key, Some(StructKey::new("models", "User")));
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn test_qualifier_without_alias_is_package_name() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog);
        let imports = ImportTable::new();
        let mut diags = DiagnosticsCollector::new();

        let key = resolver.resolve(
            &TypeRef::parse("*models.User"),
            &Scope::new("handlers", &imports),
            &mut diags,
        );
        assert_eq!(key, Some(StructKey::new("models", "User")));
    }

    #[test]
    fn test_unqualified_uses_context_package() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog);
        let imports = ImportTable::new();
        let mut diags = DiagnosticsCollector::new();

        let key = resolver.resolve(
            &TypeRef::parse("Stats"),
            &Scope::new("handlers", &imports),
            &mut diags,
        );
        assert_eq!(key, Some(StructKey::new("handlers", "Stats")));
    }

    #[test]
    fn test_strict_does_not_search_other_packages() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog);
        let imports = ImportTable::new();
        let mut diags = DiagnosticsCollector::new();

        let key = resolver.resolve(
            &TypeRef::parse("User"),
            &Scope::new("handlers", &imports),
            &mut diags,
        );
        assert_eq!(key, None);
        assert_eq!(diags.with_code(codes::UNRESOLVED_TYPE).count(), 1);
    }

    #[test]
    fn test_permissive_falls_back_to_name_search() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog).with_mode(ResolutionMode::Permissive);
        let imports = ImportTable::new();
        let mut diags = DiagnosticsCollector::new();

        let key = resolver.resolve(
            &TypeRef::parse("User"),
            &Scope::new("handlers", &imports),
            &mut diags,
        );
        assert_eq!(key, Some(StructKey::new("models", "User")));
        assert!(diags.is_empty());

        let key = resolver.resolve(
            &TypeRef::parse("Report"),
            &Scope::new("handlers", &imports),
            &mut diags,
        );
        assert_eq!(key, Some(StructKey::new("reports", "Report")));
        assert_eq!(diags.with_code(codes::AMBIGUOUS_TYPE).count(), 1);
    }

    #[test]
    fn test_permissive_prefers_scoped_lookup() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog).with_mode(ResolutionMode::Permissive);
        let imports = ImportTable::new();
        let mut diags = DiagnosticsCollector::new();

        let key = resolver.resolve(
            &TypeRef::parse("Stats"),
            &Scope::new("models", &imports),
            &mut diags,
        );
        assert_eq!(key, Some(StructKey::new("models", "Stats")));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_basic_and_opaque_are_silent() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog);
        let imports = ImportTable::new();
        let mut diags = DiagnosticsCollector::new();

        for raw in ["int", "[]byte", "map[string]bool", "error", "interface{}"] {
            let key = resolver.resolve(
                &TypeRef::parse(raw),
                &Scope::new("models", &imports),
                &mut diags,
            );
            assert_eq!(key, None, "{}", raw);
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn test_malformed_records_diagnostic() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog);
        let imports = ImportTable::new();
        let mut diags = DiagnosticsCollector::new();

        let key = resolver.resolve(
            &TypeRef::parse("User[int"),
            &Scope::new("models", &imports),
            &mut diags,
        );
        assert_eq!(key, None);
        assert_eq!(diags.with_code(codes::MALFORMED_GENERIC).count(), 1);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("strict".parse::<ResolutionMode>(), Ok(ResolutionMode::Strict));
        assert_eq!(
            "Permissive".parse::<ResolutionMode>(),
            Ok(ResolutionMode::Permissive)
        );
        assert!("loose".parse::<ResolutionMode>().is_err());
    }
}
