//! Go source parsing with tree-sitter
//!
//! Extracts what documentation needs from one Go file: the package name,
//! the file doc comment, imports, struct declarations (with type parameters
//! and fields) and the doc comments of functions and methods. Bodies are
//! never inspected.

use crate::diagnostics::{JdocError, JdocResult};
use crate::models::StructField;
use crate::type_ref::TypeRef;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

lazy_static! {
    static ref JSON_TAG: Regex = Regex::new(r#"json:"([^"]*)""#).unwrap();
}

/// One import spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoImport {
    /// Explicit alias, including `_` and `.`
    pub alias: Option<String>,
    /// Import path without quotes
    pub path: String,
}

/// A struct type declaration
#[derive(Debug, Clone, PartialEq)]
pub struct GoStruct {
    pub name: String,
    /// Doc comment lines joined with spaces
    pub description: String,
    pub type_params: Vec<String>,
    pub fields: Vec<StructField>,
    pub line: usize,
    pub col: usize,
}

/// A function or method with a doc comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoFunction {
    pub name: String,
    /// Doc comment text, one comment line per line
    pub doc: String,
    pub line: usize,
    pub col: usize,
}

/// Everything extracted from one Go file
#[derive(Debug, Clone, PartialEq)]
pub struct GoFile {
    pub path: PathBuf,
    pub package: String,
    /// Comment directly above the package clause
    pub doc: String,
    pub imports: Vec<GoImport>,
    pub structs: Vec<GoStruct>,
    pub functions: Vec<GoFunction>,
}

/// Reusable Go parser
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Create a parser loaded with the Go grammar
    pub fn new() -> JdocResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| JdocError::other(format!("failed to load Go grammar: {}", e)))?;
        Ok(Self { parser })
    }

    /// Read and parse a file from disk
    pub fn parse_path(&mut self, path: &Path) -> JdocResult<GoFile> {
        let source = std::fs::read_to_string(path)?;
        self.parse(path, &source)
    }

    /// Parse Go source. Syntax errors are fatal.
    pub fn parse(&mut self, path: &Path, source: &str) -> JdocResult<GoFile> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| JdocError::parse(path, "parser returned no tree"))?;
        let root = tree.root_node();

        if root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            let pos = bad.start_position();
            return Err(JdocError::parse_at(
                path,
                "syntax error",
                pos.row + 1,
                pos.column,
            ));
        }

        let mut file = GoFile {
            path: path.to_path_buf(),
            package: String::new(),
            doc: String::new(),
            imports: Vec::new(),
            structs: Vec::new(),
            functions: Vec::new(),
        };

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "package_clause" => {
                    file.package = node
                        .named_child(0)
                        .map(|n| text(n, source).to_string())
                        .unwrap_or_default();
                    file.doc = leading_comments(node, source).join("\n");
                }
                "import_declaration" => collect_imports(node, source, &mut file.imports),
                "type_declaration" => collect_structs(node, source, &mut file.structs),
                "function_declaration" | "method_declaration" => {
                    let doc = leading_comments(node, source);
                    if doc.is_empty() {
                        continue;
                    }
                    let Some(name) = node.child_by_field_name("name") else {
                        continue;
                    };
                    let pos = node.start_position();
                    file.functions.push(GoFunction {
                        name: text(name, source).to_string(),
                        doc: doc.join("\n"),
                        line: pos.row + 1,
                        col: pos.column,
                    });
                }
                _ => {}
            }
        }

        if file.package.is_empty() {
            return Err(JdocError::parse(path, "missing package clause"));
        }

        Ok(file)
    }
}

/// Parse one file with a fresh parser
pub fn parse_go_file(path: &Path, source: &str) -> JdocResult<GoFile> {
    GoParser::new()?.parse(path, source)
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

fn collect_imports(decl: Node<'_>, source: &str, imports: &mut Vec<GoImport>) {
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => imports.extend(import_spec(child, source)),
            "import_spec_list" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() == "import_spec" {
                        imports.extend(import_spec(spec, source));
                    }
                }
            }
            _ => {}
        }
    }
}

fn import_spec(spec: Node<'_>, source: &str) -> Option<GoImport> {
    let path = spec.child_by_field_name("path")?;
    Some(GoImport {
        alias: spec
            .child_by_field_name("name")
            .map(|n| text(n, source).to_string()),
        path: text(path, source).trim_matches(|c| c == '"' || c == '`').to_string(),
    })
}

fn collect_structs(decl: Node<'_>, source: &str, structs: &mut Vec<GoStruct>) {
    let decl_doc = leading_comments(decl, source);
    let mut cursor = decl.walk();
    for spec in decl.named_children(&mut cursor) {
        if spec.kind() != "type_spec" {
            continue;
        }
        let (Some(name), Some(ty)) = (
            spec.child_by_field_name("name"),
            spec.child_by_field_name("type"),
        ) else {
            continue;
        };
        if ty.kind() != "struct_type" {
            continue;
        }

        let own_doc = leading_comments(spec, source);
        let doc = if own_doc.is_empty() { &decl_doc } else { &own_doc };
        let pos = spec.start_position();

        structs.push(GoStruct {
            name: text(name, source).to_string(),
            description: join_description(doc),
            type_params: spec
                .child_by_field_name("type_parameters")
                .map(|list| type_param_names(list, source))
                .unwrap_or_default(),
            fields: struct_fields(ty, source),
            line: pos.row + 1,
            col: pos.column,
        });
    }
}

fn type_param_names(list: Node<'_>, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor) {
        if !matches!(decl.kind(), "type_parameter_declaration" | "parameter_declaration") {
            continue;
        }
        let mut inner = decl.walk();
        names.extend(
            decl.children_by_field_name("name", &mut inner)
                .map(|n| text(n, source).to_string()),
        );
    }
    names
}

fn struct_fields(struct_type: Node<'_>, source: &str) -> Vec<StructField> {
    let mut fields = Vec::new();
    let mut cursor = struct_type.walk();
    let Some(list) = struct_type
        .named_children(&mut cursor)
        .find(|n| n.kind() == "field_declaration_list")
    else {
        return fields;
    };

    let mut list_cursor = list.walk();
    for decl in list.named_children(&mut list_cursor) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let Some(ty) = decl.child_by_field_name("type") else {
            continue;
        };

        let mut name_cursor = decl.walk();
        let names: Vec<String> = decl
            .children_by_field_name("name", &mut name_cursor)
            .map(|n| text(n, source).to_string())
            .collect();

        // Embedded fields keep a leading `*` that sits outside the type node.
        let raw_type = if names.is_empty() {
            normalize_type(&source[decl.start_byte()..ty.end_byte()])
        } else {
            normalize_type(text(ty, source))
        };
        let names = if names.is_empty() {
            vec![TypeRef::parse(&raw_type).base_name]
        } else {
            names
        };

        let mut description = leading_comments(decl, source);
        description.extend(trailing_comment(decl, source));
        let description = join_description(&description);

        let tag = decl
            .child_by_field_name("tag")
            .map(|t| text(t, source))
            .unwrap_or("");

        for name in names {
            fields.push(
                StructField::new(name.as_str(), raw_type.as_str())
                    .with_json_name(json_name(tag, &name))
                    .with_description(description.as_str()),
            );
        }
    }
    fields
}

/// JSON name from a struct tag, falling back to the Go field name
pub fn json_name(tag: &str, field_name: &str) -> String {
    JSON_TAG
        .captures(tag)
        .and_then(|caps| caps[1].split(',').next().map(str::to_string))
        .filter(|name| !name.is_empty() && name != "-")
        .unwrap_or_else(|| field_name.to_string())
}

/// Comment lines directly above `node`, with no blank line in between.
///
/// A comment on the same line as an earlier declaration belongs to that
/// declaration and stops the search.
fn leading_comments(node: Node<'_>, source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut next_row = node.start_position().row;
    let mut current = node.prev_named_sibling();

    while let Some(prev) = current {
        if prev.kind() != "comment" || prev.end_position().row + 1 < next_row {
            break;
        }
        let before = prev.prev_named_sibling();
        if let Some(before) = before {
            if before.kind() != "comment"
                && before.end_position().row == prev.start_position().row
            {
                break;
            }
        }
        let mut text_lines = comment_lines(text(prev, source));
        text_lines.append(&mut lines);
        lines = text_lines;
        next_row = prev.start_position().row;
        current = before;
    }

    lines
}

/// Comment starting on the last line of `node`
fn trailing_comment(node: Node<'_>, source: &str) -> Vec<String> {
    match node.next_named_sibling() {
        Some(next)
            if next.kind() == "comment"
                && next.start_position().row == node.end_position().row =>
        {
            comment_lines(text(next, source))
        }
        _ => Vec::new(),
    }
}

/// Strip comment markers, one entry per source line
fn comment_lines(comment: &str) -> Vec<String> {
    if let Some(line) = comment.strip_prefix("//") {
        return vec![line.trim().to_string()];
    }
    let body = comment
        .strip_prefix("/*")
        .and_then(|c| c.strip_suffix("*/"))
        .unwrap_or(comment);
    body.lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').unwrap_or(line).trim().to_string()
        })
        .collect()
}

fn join_description(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse whitespace in a type spelling: `map[string] *T` → `map[string]*T`,
/// `Pair[A,B]` → `Pair[A, B]`
pub fn normalize_type(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if let Some(last) = out.chars().last() {
            let space = match (last, c) {
                (',', _) => true,
                (_, ']' | ')' | ',' | '.') => false,
                ('[' | '(' | '*' | '.', _) => false,
                (']', _) => false,
                _ => pending_space,
            };
            if space {
                out.push(' ');
            }
        }
        out.push(c);
        pending_space = false;
    }
    out
}
