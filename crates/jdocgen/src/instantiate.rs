//! Generic instantiation
//!
//! A reference such as `Pagination[ReportItem]` names a concrete structure
//! that is never declared in source. The [`Instantiator`] synthesizes it from
//! the generic declaration `Pagination[T]` by substituting each type
//! parameter with the display name of the corresponding argument, and
//! memoizes the result so every distinct instantiation exists exactly once.
//!
//! Argument display names are written relative to the generic's package:
//! `ReportItem` when the argument lives in the same package, `models.User`
//! otherwise. Substituted field types therefore resolve back to the same keys
//! when they are later looked up in the generic's own scope.

use crate::diagnostics::{codes, Diagnostic, DiagnosticsCollector};
use crate::models::{StructDefinition, StructField, StructKey};
use crate::resolver::{Resolver, Scope};
use crate::type_ref::TypeRef;
use indexmap::IndexMap;

/// Memo table of synthesized generic instantiations
#[derive(Debug, Default)]
pub struct Instantiator {
    synthesized: IndexMap<StructKey, StructDefinition>,
}

impl Instantiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthesized definition for a key
    pub fn get(&self, key: &StructKey) -> Option<&StructDefinition> {
        self.synthesized.get(key)
    }

    pub fn contains(&self, key: &StructKey) -> bool {
        self.synthesized.contains_key(key)
    }

    /// All synthesized definitions, in creation order
    pub fn iter(&self) -> impl Iterator<Item = (&StructKey, &StructDefinition)> {
        self.synthesized.iter()
    }

    pub fn len(&self) -> usize {
        self.synthesized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synthesized.is_empty()
    }

    /// Instantiate `generic` with `args`, written in `scope`.
    ///
    /// Non-generic declarations are returned unchanged. Returns `None` when
    /// the declaration is unknown or the argument count does not match its
    /// type parameters.
    pub fn instantiate(
        &mut self,
        resolver: &Resolver<'_>,
        generic: &StructKey,
        args: &[TypeRef],
        scope: &Scope<'_>,
        diagnostics: &mut DiagnosticsCollector,
    ) -> Option<StructKey> {
        let declaration = resolver.catalog().lookup(generic)?;
        if !declaration.is_generic() {
            return Some(generic.clone());
        }

        let displays: Vec<String> = args
            .iter()
            .map(|arg| self.argument_display(resolver, arg, &generic.package, scope, diagnostics))
            .collect();
        let key = StructKey::new(
            generic.package.as_str(),
            format!("{}[{}]", generic.name, displays.join(", ")),
        );

        if self.synthesized.contains_key(&key) {
            return Some(key);
        }

        if declaration.type_params.len() != args.len() {
            diagnostics.add(
                Diagnostic::warning(format!(
                    "'{}' declares {} type parameter(s) but was given {}",
                    generic,
                    declaration.type_params.len(),
                    args.len()
                ))
                .with_code(codes::ARITY_MISMATCH),
            );
            return None;
        }

        let fields = declaration
            .fields
            .iter()
            .map(|field| StructField {
                raw_type: substitute(&field.raw_type, &declaration.type_params, &displays),
                ..field.clone()
            })
            .collect();

        let definition = StructDefinition {
            name: key.name.clone(),
            description: declaration.description.clone(),
            fields,
            type_params: Vec::new(),
            imports: declaration.imports.clone(),
            location: declaration.location.clone(),
        };

        tracing::debug!(generic = %generic, key = %key, "synthesized instantiation");
        self.synthesized.insert(key.clone(), definition);
        Some(key)
    }

    /// Spelling of `arg` as seen from package `relative_to`
    fn argument_display(
        &mut self,
        resolver: &Resolver<'_>,
        arg: &TypeRef,
        relative_to: &str,
        scope: &Scope<'_>,
        diagnostics: &mut DiagnosticsCollector,
    ) -> String {
        if !arg.is_resolvable() {
            return arg.to_string();
        }
        let Some(key) = resolver.resolve(arg, scope, diagnostics) else {
            return arg.to_string();
        };

        let mut name = key.name.clone();
        if arg.is_generic() {
            self.instantiate(resolver, &key, &arg.type_args, scope, diagnostics);
            let inner: Vec<String> = arg
                .type_args
                .iter()
                .map(|a| self.argument_display(resolver, a, relative_to, scope, diagnostics))
                .collect();
            name = format!("{}[{}]", name, inner.join(", "));
        }

        if key.package == relative_to {
            format!("{}{}", arg.decorations, name)
        } else {
            format!("{}{}.{}", arg.decorations, key.package, name)
        }
    }
}

/// Replace whole identifier tokens of `raw` that name a type parameter.
///
/// All parameters are replaced in one pass. Identifiers directly after a `.`
/// are selectors (`pkg.T`) and are left alone.
pub fn substitute(raw: &str, params: &[String], args: &[String]) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();
    let mut prev: Option<char> = None;

    while let Some((start, c)) = chars.next() {
        if !is_ident_start(c) {
            out.push(c);
            prev = Some(c);
            continue;
        }

        let mut end = start + c.len_utf8();
        while let Some(&(i, next)) = chars.peek() {
            if !is_ident_continue(next) {
                break;
            }
            end = i + next.len_utf8();
            chars.next();
        }

        let ident = &raw[start..end];
        let replacement = match prev {
            Some('.') => None,
            _ => params
                .iter()
                .position(|p| p == ident)
                .and_then(|idx| args.get(idx)),
        };
        out.push_str(replacement.map(String::as_str).unwrap_or(ident));
        prev = ident.chars().last();
    }

    out
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
