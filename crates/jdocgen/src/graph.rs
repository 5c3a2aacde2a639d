//! Structure graph traversal
//!
//! Collects every structure reachable from a set of seed references (the
//! parameter and result types of one command), following field types
//! transitively. This module provides:
//! - Resolution plus instantiation of a single reference
//! - Depth-first collection with a visited set, so cycles terminate and each
//!   structure is emitted once, in first-discovered order

use crate::diagnostics::DiagnosticsCollector;
use crate::instantiate::Instantiator;
use crate::models::{ImportTable, StructDefinition, StructKey};
use crate::resolver::{Resolver, Scope};
use crate::type_ref::TypeRef;
use std::collections::HashSet;
use std::sync::Arc;

/// A reference waiting on the traversal stack, with the scope it was written in
struct Pending {
    type_ref: TypeRef,
    package: String,
    imports: Arc<ImportTable>,
}

/// Resolved view over the catalog plus the synthesized instantiations
///
/// One `TypeGraph` is shared by every command of a run so instantiations are
/// only synthesized once.
#[derive(Debug)]
pub struct TypeGraph<'c> {
    resolver: Resolver<'c>,
    instantiator: Instantiator,
}

impl<'c> TypeGraph<'c> {
    /// Create a graph over a resolver's catalog
    pub fn new(resolver: Resolver<'c>) -> Self {
        Self {
            resolver,
            instantiator: Instantiator::new(),
        }
    }

    pub fn resolver(&self) -> &Resolver<'c> {
        &self.resolver
    }

    pub fn instantiator(&self) -> &Instantiator {
        &self.instantiator
    }

    /// Definition for a key, synthesized instantiations first
    pub fn lookup(&self, key: &StructKey) -> Option<&StructDefinition> {
        self.instantiator
            .get(key)
            .or_else(|| self.resolver.catalog().lookup(key))
    }

    /// Whether the key names a synthesized instantiation
    pub fn is_synthesized(&self, key: &StructKey) -> bool {
        self.instantiator.contains(key)
    }

    /// Resolve a reference, instantiating it when it carries type arguments
    pub fn resolve_reference(
        &mut self,
        type_ref: &TypeRef,
        scope: &Scope<'_>,
        diagnostics: &mut DiagnosticsCollector,
    ) -> Option<StructKey> {
        let key = self.resolver.resolve(type_ref, scope, diagnostics)?;
        if type_ref.is_generic() {
            self.instantiator
                .instantiate(&self.resolver, &key, &type_ref.type_args, scope, diagnostics)
        } else {
            Some(key)
        }
    }

    /// Collect every structure reachable from `seeds`.
    ///
    /// The result has no duplicates and is in pre-order depth-first order.
    /// Fields are resolved in the scope of the structure that declares them.
    pub fn collect_graph(
        &mut self,
        seeds: &[TypeRef],
        scope: &Scope<'_>,
        diagnostics: &mut DiagnosticsCollector,
    ) -> Vec<StructKey> {
        let seed_imports = Arc::new(scope.imports.clone());
        let mut stack: Vec<Pending> = seeds
            .iter()
            .rev()
            .map(|type_ref| Pending {
                type_ref: type_ref.clone(),
                package: scope.package.to_string(),
                imports: seed_imports.clone(),
            })
            .collect();

        let mut visited: HashSet<StructKey> = HashSet::new();
        let mut order = Vec::new();

        while let Some(pending) = stack.pop() {
            let scope = Scope::new(&pending.package, &pending.imports);
            let Some(key) = self.resolve_reference(&pending.type_ref, &scope, diagnostics) else {
                continue;
            };
            if !visited.insert(key.clone()) {
                continue;
            }

            let Some(definition) = self.lookup(&key) else {
                continue;
            };
            for field in definition.fields.iter().rev() {
                stack.push(Pending {
                    type_ref: TypeRef::parse(&field.raw_type),
                    package: key.package.clone(),
                    imports: definition.imports.clone(),
                });
            }
            order.push(key);
        }

        order
    }
}
