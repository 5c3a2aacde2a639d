//! Annotation grammar for Go doc comments
//!
//! API commands are documented with `@`-prefixed lines in the doc comment of
//! the handler function:
//!
//! ```text
//! // @Command getUser
//! // @Description Returns a user by id
//! // @Parameter id int The user id
//! // @Parameter verbose bool optional Include the profile
//! // @Result models.User The requested user
//! // @Error 404 User not found
//! // @Additional Rate limited to 10 requests per second
//! ```
//!
//! Project information uses case-insensitive global tags (`@title`,
//! `@version`, `@description`, `@author`, `@license`, `@contact`, `@terms`,
//! `@repository`, `@tags`, `@copyright`) in a file or function comment.

use crate::diagnostics::codes;
use crate::models::{ApiError, ApiFunction, ApiParameter, ApiResult, ProjectInfo};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One parsed function annotation line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Annotation {
    /// @Command name
    #[serde(rename_all = "camelCase")]
    Command { name: String },

    /// @Description text
    #[serde(rename_all = "camelCase")]
    Description { text: String },

    /// @Parameter name type [optional] description
    #[serde(rename_all = "camelCase")]
    Parameter {
        name: String,
        type_ref: String,
        optional: bool,
        doc: String,
    },

    /// @Result type description
    #[serde(rename_all = "camelCase")]
    Result { type_ref: String, doc: String },

    /// @Error code description
    #[serde(rename_all = "camelCase")]
    Error { code: i64, doc: String },

    /// @Additional text
    #[serde(rename_all = "camelCase")]
    Additional { text: String },

    /// Unknown/custom tag
    #[serde(rename_all = "camelCase")]
    Unrecognized { tag: String, value: String },
}

/// A function annotation line that does not follow its grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("missing command name in @Command annotation")]
    MissingCommandName,

    #[error("invalid @Parameter annotation, expected '@Parameter name type [optional] description'")]
    InvalidParameter,

    #[error("malformed @Result annotation, expected '@Result type description'")]
    MalformedResult,

    #[error("invalid @Error annotation, expected '@Error code description'")]
    InvalidError,

    #[error("@Error code must be a numeric literal, got '{0}'")]
    InvalidErrorCode(String),
}

impl Annotation {
    /// Parse one comment line. Returns `None` unless the line starts with `@`.
    pub fn parse(line: &str) -> Option<Result<Annotation, AnnotationError>> {
        let line = line.trim();
        if !line.starts_with('@') {
            return None;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let tag = parts[0];

        let annotation = match tag {
            "@Command" => match parts.get(1) {
                Some(name) => Ok(Annotation::Command {
                    name: name.to_string(),
                }),
                None => Err(AnnotationError::MissingCommandName),
            },
            "@Description" => Ok(Annotation::Description {
                text: rest_after_tag(line),
            }),
            "@Parameter" => parse_parameter(&parts),
            "@Result" => match take_type(&parts[1..]) {
                Some((type_ref, doc)) if !doc.is_empty() => Ok(Annotation::Result {
                    type_ref,
                    doc: doc.join(" "),
                }),
                _ => Err(AnnotationError::MalformedResult),
            },
            "@Error" => {
                if parts.len() < 3 {
                    Err(AnnotationError::InvalidError)
                } else {
                    parts[1]
                        .parse::<i64>()
                        .map(|code| Annotation::Error {
                            code,
                            doc: parts[2..].join(" "),
                        })
                        .map_err(|_| AnnotationError::InvalidErrorCode(parts[1].to_string()))
                }
            }
            "@Additional" => Ok(Annotation::Additional {
                text: rest_after_tag(line),
            }),
            _ => Ok(Annotation::Unrecognized {
                tag: tag.trim_start_matches('@').to_string(),
                value: rest_after_tag(line),
            }),
        };
        Some(annotation)
    }

    /// Check if this is the `@Command` annotation
    pub fn is_command(&self) -> bool {
        matches!(self, Annotation::Command { .. })
    }
}

fn parse_parameter(parts: &[&str]) -> Result<Annotation, AnnotationError> {
    if parts.len() < 3 {
        return Err(AnnotationError::InvalidParameter);
    }
    let (type_ref, mut doc_parts) =
        take_type(&parts[2..]).ok_or(AnnotationError::InvalidParameter)?;
    let optional = doc_parts
        .first()
        .is_some_and(|word| word.eq_ignore_ascii_case("optional"));
    if optional {
        doc_parts = &doc_parts[1..];
    }
    Ok(Annotation::Parameter {
        name: parts[1].to_string(),
        type_ref,
        optional,
        doc: doc_parts.join(" "),
    })
}

/// Split the leading type off `words`, rejoining words until its brackets
/// balance so that `Pair[A, B]` stays one type.
///
/// An unbalanced type keeps only its first word; `TypeRef::parse` reports it.
fn take_type<'a, 'b>(words: &'a [&'b str]) -> Option<(String, &'a [&'b str])> {
    let first = words.first()?;
    let mut depth = 0i32;
    for (i, word) in words.iter().enumerate() {
        depth += word
            .chars()
            .map(|c| match c {
                '[' | '(' | '{' => 1,
                ']' | ')' | '}' => -1,
                _ => 0,
            })
            .sum::<i32>();
        if depth <= 0 {
            return Some((words[..=i].join(" "), &words[i + 1..]));
        }
    }
    Some((first.to_string(), &words[1..]))
}

/// Text after the first whitespace-separated token
fn rest_after_tag(line: &str) -> String {
    line.split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

/// Parse every annotation line of a doc comment, with its 0-based line offset
pub fn parse_annotations(doc: &str) -> Vec<(usize, Result<Annotation, AnnotationError>)> {
    doc.lines()
        .enumerate()
        .filter_map(|(i, line)| Annotation::parse(line).map(|a| (i, a)))
        .collect()
}

/// Why an annotated function was left out of the documentation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionDocError {
    #[error("{error} (comment line {line})")]
    Annotation {
        #[source]
        error: AnnotationError,
        line: usize,
    },

    #[error("missing @Description annotation")]
    MissingDescription,

    #[error("multiple @Result annotations found; JSON-RPC allows a single result per function")]
    MultipleResults,
}

impl FunctionDocError {
    /// Diagnostic code reported for this error
    pub fn code(&self) -> &'static str {
        match self {
            FunctionDocError::Annotation { .. } => codes::INVALID_ANNOTATION,
            FunctionDocError::MissingDescription => codes::MISSING_DESCRIPTION,
            FunctionDocError::MultipleResults => codes::MULTIPLE_RESULTS,
        }
    }
}

/// Build an [`ApiFunction`] from a function doc comment.
///
/// Returns `Ok(None)` when the comment has no `@Command` line: the function
/// is not part of the API. Package, imports and location are left for the
/// caller to fill in.
pub fn parse_function_doc(doc: &str) -> Result<Option<ApiFunction>, FunctionDocError> {
    let annotations = parse_annotations(doc);
    let has_command = doc
        .lines()
        .any(|line| line.split_whitespace().next() == Some("@Command"));
    if !has_command {
        return Ok(None);
    }

    let mut function = ApiFunction::new("", "");
    let mut results = Vec::new();

    for (line, annotation) in annotations {
        let annotation =
            annotation.map_err(|error| FunctionDocError::Annotation { error, line: line + 1 })?;
        match annotation {
            Annotation::Command { name } => function.command = name,
            Annotation::Description { text } => function.description = text,
            Annotation::Parameter {
                name,
                type_ref,
                optional,
                doc,
            } => function.parameters.push(ApiParameter {
                name,
                type_name: type_ref,
                description: doc,
                required: !optional,
            }),
            Annotation::Result { type_ref, doc } => results.push(ApiResult {
                name: "result".to_string(),
                type_name: type_ref,
                description: doc,
            }),
            Annotation::Error { code, doc } => function.errors.push(ApiError {
                code,
                description: doc,
            }),
            Annotation::Additional { text } => function.additional.push(text),
            Annotation::Unrecognized { .. } => {}
        }
    }

    if results.len() > 1 {
        return Err(FunctionDocError::MultipleResults);
    }
    function.result = results.pop();

    if function.description.is_empty() {
        return Err(FunctionDocError::MissingDescription);
    }

    Ok(Some(function))
}

/// Why a comment does not carry usable project information
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectInfoError {
    #[error("missing value in {0} annotation")]
    MissingValue(String),

    #[error("missing {0} annotation")]
    MissingRequired(&'static str),
}

/// Whether any line of the comment carries a global project tag
pub fn has_global_tags(doc: &str) -> bool {
    doc.lines().any(|line| {
        global_tag(line)
            .map(|(tag, _)| GLOBAL_TAGS.contains(&tag.as_str()))
            .unwrap_or(false)
    })
}

const GLOBAL_TAGS: &[&str] = &[
    "@title",
    "@version",
    "@description",
    "@author",
    "@license",
    "@contact",
    "@terms",
    "@repository",
    "@tags",
    "@copyright",
];

fn global_tag(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if !line.starts_with('@') {
        return None;
    }
    let tag = line.split_whitespace().next()?.to_ascii_lowercase();
    Some((tag, rest_after_tag(line)))
}

/// Parse project information from a comment.
///
/// Tags are matched case-insensitively. Title, version and description are
/// required.
pub fn parse_project_info(doc: &str) -> Result<ProjectInfo, ProjectInfoError> {
    let mut info = ProjectInfo::default();

    for line in doc.lines() {
        let Some((tag, value)) = global_tag(line) else {
            continue;
        };
        let slot = match tag.as_str() {
            "@title" => &mut info.title,
            "@version" => &mut info.version,
            "@description" => {
                info.description = value;
                continue;
            }
            "@author" => &mut info.author,
            "@license" => &mut info.license,
            "@contact" => &mut info.contact,
            "@terms" => &mut info.terms,
            "@repository" => &mut info.repository,
            "@copyright" => &mut info.copyright,
            "@tags" => {
                if value.is_empty() {
                    return Err(ProjectInfoError::MissingValue(tag));
                }
                info.tags = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect();
                continue;
            }
            _ => continue,
        };
        if value.is_empty() {
            return Err(ProjectInfoError::MissingValue(tag));
        }
        *slot = value;
    }

    if info.title.is_empty() {
        return Err(ProjectInfoError::MissingRequired("@title"));
    }
    if info.version.is_empty() {
        return Err(ProjectInfoError::MissingRequired("@version"));
    }
    if info.description.is_empty() {
        return Err(ProjectInfoError::MissingRequired("@description"));
    }

    Ok(info)
}
