//! Markdown rendering
//!
//! Renders a [`Documentation`] as a single Markdown document: project
//! header, optional JSON-RPC 2.0 section, optional table of contents, then
//! one section per command with its parameters, result, reachable data
//! structures, errors and additional notes.

use super::{Documentation, ResolvedFunction, ResolvedStructure};
use crate::models::ProjectInfo;

/// Link to the JSON-RPC 2.0 specification
pub const JSON_RPC_SPEC_URL: &str = "https://www.jsonrpc.org/specification";

/// Markdown renderer for documentation
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    /// Whether to include the JSON-RPC 2.0 section
    pub include_rfc: bool,
    /// Whether to generate a table of contents
    pub generate_toc: bool,
    /// Minimum number of commands before a table of contents is added
    pub toc_threshold: usize,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            include_rfc: true,
            generate_toc: true,
            toc_threshold: 3,
        }
    }
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include the JSON-RPC 2.0 section
    pub fn with_rfc(mut self, include: bool) -> Self {
        self.include_rfc = include;
        self
    }

    /// Set whether to generate TOC
    pub fn with_toc(mut self, generate: bool) -> Self {
        self.generate_toc = generate;
        self
    }

    /// Render the whole document
    pub fn render(&self, doc: &Documentation) -> String {
        let mut md = self.render_header(&doc.project);

        if self.include_rfc {
            md.push_str("## JSON-RPC 2.0 Specification\n\n");
            md.push_str(&format!(
                "This API adheres to the [JSON-RPC 2.0 specification]({}).\n\n",
                JSON_RPC_SPEC_URL
            ));
        }

        if self.generate_toc && doc.functions.len() > self.toc_threshold {
            md.push_str("## Table of Contents\n\n");
            for func in &doc.functions {
                md.push_str(&format!(
                    "- [{}](#{})\n",
                    func.function.command,
                    anchor(&func.function.command)
                ));
            }
            md.push('\n');
        }

        for func in &doc.functions {
            md.push_str(&self.render_function(func));
        }

        md
    }

    /// Render the project information block
    pub fn render_header(&self, project: &ProjectInfo) -> String {
        let mut md = String::new();
        md.push_str(&format!("# {}\n\n", project.title));
        md.push_str(&format!("Version: {}\n\n", project.version));
        if !project.description.is_empty() {
            md.push_str(&format!("{}\n\n", project.description));
        }

        let labelled = [
            ("Author", &project.author),
            ("License", &project.license),
            ("Contact", &project.contact),
            ("Terms of Service", &project.terms),
            ("Repository", &project.repository),
        ];
        for (label, value) in labelled {
            if !value.is_empty() {
                md.push_str(&format!("**{}:** {}\n\n", label, value));
            }
        }
        if !project.tags.is_empty() {
            md.push_str(&format!("**Tags:** {}\n\n", project.tags.join(", ")));
        }
        if !project.copyright.is_empty() {
            md.push_str(&format!("**Copyright:** {}\n\n", project.copyright));
        }
        md
    }

    /// Render one command section
    pub fn render_function(&self, resolved: &ResolvedFunction) -> String {
        let func = &resolved.function;
        let mut md = format!("## {}\n\n", func.command);

        if !func.description.is_empty() {
            md.push_str(&format!("{}\n\n", func.description));
        }

        if !func.parameters.is_empty() {
            md.push_str("### Parameters:\n\n");
            md.push_str("| Name | Type | Description | Required |\n");
            md.push_str("|------|------|-------------|----------|\n");
            for param in &func.parameters {
                md.push_str(&table_row(&[
                    &param.name,
                    &param.type_name,
                    &param.description,
                    if param.required { "Yes" } else { "No" },
                ]));
            }
            md.push('\n');
        }

        if let Some(result) = &func.result {
            md.push_str("### Results:\n\n");
            md.push_str("| Name | Type | Description |\n");
            md.push_str("|------|------|-------------|\n");
            md.push_str(&table_row(&[
                &result.name,
                &result.type_name,
                &result.description,
            ]));
            md.push('\n');
        }

        if !resolved.structures.is_empty() {
            md.push_str("### Data Structures:\n\n");
            for structure in &resolved.structures {
                md.push_str(&self.render_structure(structure));
            }
        }

        if !func.errors.is_empty() {
            md.push_str("### Errors:\n\n");
            md.push_str("| Code | Description |\n");
            md.push_str("|------|-------------|\n");
            for error in &func.errors {
                md.push_str(&table_row(&[&error.code.to_string(), &error.description]));
            }
            md.push('\n');
        }

        if !func.additional.is_empty() {
            md.push_str("### Additional Information:\n\n");
            md.push_str(&func.additional.join("\n"));
            md.push_str("\n\n");
        }

        md.push_str("---\n\n");
        md
    }

    /// Render one data structure block
    pub fn render_structure(&self, structure: &ResolvedStructure) -> String {
        let def = &structure.definition;
        let mut md = format!("#### {}\n\n", structure.key);

        if !def.description.is_empty() {
            md.push_str(&format!("{}\n\n", def.description));
        }

        if def.fields.is_empty() {
            md.push_str("_No fields defined._\n\n");
            return md;
        }

        md.push_str("| Name | Type | Description | JSON Name |\n");
        md.push_str("|------|------|-------------|-----------|\n");
        for field in &def.fields {
            md.push_str(&table_row(&[
                &field.name,
                &field.raw_type,
                &field.description,
                &field.json_name,
            ]));
        }
        md.push('\n');
        md
    }
}

fn table_row(cells: &[&str]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    format!("| {} |\n", cells.join(" | "))
}

/// Escape pipe characters so a value stays inside its table cell
pub fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// GitHub-style heading anchor
pub fn anchor(heading: &str) -> String {
    heading
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ApiError, ApiParameter, ApiResult, StructDefinition, StructField, StructKey,
    };
    use crate::test::{mock_documentation, mock_function};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_anchor() {
        assert_eq!(anchor("getUser"), "getuser");
        assert_eq!(anchor("user.create"), "usercreate");
        assert_eq!(anchor("list_items"), "list_items");
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a | b"), "a \\| b");
    }

    #[test]
    fn test_render_header() {
        let project = ProjectInfo {
            title: "Inventory API".into(),
            version: "1.0.0".into(),
            description: "Stock management".into(),
            author: "Jane".into(),
            tags: vec!["stock".into(), "api".into()],
            ..Default::default()
        };
        let md = MarkdownRenderer::new().render_header(&project);
        assert_eq!(
            md,
            "# Inventory API\n\nVersion: 1.0.0\n\nStock management\n\n\
             **Author:** Jane\n\n**Tags:** stock, api\n\n"
        );
    }

    #[test]
    fn test_render_function() {
        let mut func = mock_function("getUser", "handlers");
        func.description = "Returns a user".into();
        func.parameters.push(ApiParameter {
            name: "id".into(),
            type_name: "int".into(),
            description: "The | id".into(),
            required: true,
        });
        func.result = Some(ApiResult {
            name: "result".into(),
            type_name: "models.User".into(),
            description: "The user".into(),
        });
        func.errors.push(ApiError {
            code: 404,
            description: "Not found".into(),
        });

        let resolved = ResolvedFunction {
            function: func,
            structures: vec![
                ResolvedStructure {
                    key: StructKey::new("models", "User"),
                    definition: StructDefinition::new("User")
                        .with_description("An account")
                        .with_field(StructField::new("ID", "int").with_json_name("id")),
                    synthesized: false,
                },
                ResolvedStructure {
                    key: StructKey::new("models", "Empty"),
                    definition: StructDefinition::new("Empty"),
                    synthesized: false,
                },
            ],
        };

        let md = MarkdownRenderer::new().render_function(&resolved);
        let expected = "## getUser\n\n\
            Returns a user\n\n\
            ### Parameters:\n\n\
            | Name | Type | Description | Required |\n\
            |------|------|-------------|----------|\n\
            | id | int | The \\| id | Yes |\n\n\
            ### Results:\n\n\
            | Name | Type | Description |\n\
            |------|------|-------------|\n\
            | result | models.User | The user |\n\n\
            ### Data Structures:\n\n\
            #### models.User\n\n\
            An account\n\n\
            | Name | Type | Description | JSON Name |\n\
            |------|------|-------------|-----------|\n\
            | ID | int |  | id |\n\n\
            #### models.Empty\n\n\
            _No fields defined._\n\n\
            ### Errors:\n\n\
            | Code | Description |\n\
            |------|-------------|\n\
            | 404 | Not found |\n\n\
            ---\n\n";
        assert_eq!(md, expected);
    }

    #[test]
    fn test_rfc_and_toc() {
        let doc = mock_documentation(&["a", "b", "c", "d"]);
        let md = MarkdownRenderer::new().render(&doc);
        assert!(md.contains("## JSON-RPC 2.0 Specification"));
        assert!(md.contains("## Table of Contents\n\n- [a](#a)\n"));

        let md = MarkdownRenderer::new().with_rfc(false).with_toc(false).render(&doc);
        assert!(!md.contains("JSON-RPC 2.0"));
        assert!(!md.contains("Table of Contents"));

        let small = mock_documentation(&["a", "b", "c"]);
        assert!(!MarkdownRenderer::new().render(&small).contains("Table of Contents"));
    }

    #[test]
    fn test_additional_information() {
        let mut func = mock_function("ping", "handlers");
        func.additional = vec!["Line one".into(), "Line two".into()];
        let md = MarkdownRenderer::new().render_function(&ResolvedFunction {
            function: func,
            structures: vec![],
        });
        assert!(md.contains("### Additional Information:\n\nLine one\nLine two\n\n---"));
    }
}
