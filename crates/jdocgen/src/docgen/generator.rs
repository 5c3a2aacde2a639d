//! DocGenerator - documentation pipeline orchestrator
//!
//! Coordinates scanning, parsing, catalog collection, resolution and output.

use super::{Documentation, MarkdownRenderer, ResolvedFunction, ResolvedStructure};
use crate::annotations::{has_global_tags, parse_function_doc, parse_project_info};
use crate::builder::BuildOutput;
use crate::catalog::{Catalog, CatalogBuilder};
use crate::config::{JdocConfig, OutputFormat};
use crate::diagnostics::{codes, Diagnostic, DiagnosticsCollector, JdocError, JdocResult};
use crate::golang::{GoFile, GoParser, PackageIndex, SourceScanner};
use crate::graph::TypeGraph;
use crate::models::{ApiFunction, Location, ProjectInfo, StructDefinition, StructKey};
use crate::resolver::{Resolver, Scope};
use crate::type_ref::TypeRef;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything gathered from the source tree before resolution
#[derive(Debug)]
pub struct Collection {
    pub catalog: Catalog,
    /// Function records in source order
    pub functions: Vec<ApiFunction>,
    /// Project information from the first comment carrying it
    pub project: Option<ProjectInfo>,
    /// Number of Go files parsed
    pub file_count: usize,
}

/// The main documentation generator
///
/// DocGenerator runs the whole pipeline:
/// 1. Scan the source tree for Go files
/// 2. Parse every file (syntax errors abort the run)
/// 3. Register structures and collect function records and project info
/// 4. Resolve the structures reachable from every command
/// 5. Render and write the output
pub struct DocGenerator {
    /// Configuration
    config: JdocConfig,
    /// Diagnostics collector
    diagnostics: DiagnosticsCollector,
}

impl DocGenerator {
    /// Create a new generator with the given configuration
    pub fn new(config: JdocConfig) -> Self {
        Self {
            config,
            diagnostics: DiagnosticsCollector::new(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &JdocConfig {
        &self.config
    }

    /// Get the diagnostics collector
    pub fn diagnostics(&self) -> &DiagnosticsCollector {
        &self.diagnostics
    }

    /// Scan, parse and collect the source tree
    pub fn collect(&mut self) -> JdocResult<Collection> {
        let root = self.config.source.dir.clone();
        let scanner = SourceScanner::new(&root)
            .with_exclude_dirs(self.config.source.exclude_dirs.clone())
            .with_tests(self.config.source.include_tests);

        let paths = scanner.find_go_files()?;
        let mut parser = GoParser::new()?;
        let files = paths
            .iter()
            .map(|path| parser.parse_path(path))
            .collect::<JdocResult<Vec<GoFile>>>()?;
        tracing::info!(root = %root.display(), files = files.len(), "parsed Go sources");

        let mut index = PackageIndex::new().with_module(scanner.module_path()?);
        for file in &files {
            let dir = file
                .path
                .parent()
                .map(|dir| relative_to(&root, dir))
                .unwrap_or_default();
            index.insert(&dir.to_string_lossy(), &file.package);
        }

        let mut builder = CatalogBuilder::new();
        let mut functions = Vec::new();

        for file in &files {
            let imports = Arc::new(index.import_table(&file.imports));
            let display = relative_to(&root, &file.path);

            for go_struct in &file.structs {
                let key = StructKey::new(&file.package, &go_struct.name);
                let mut definition = StructDefinition::new(&go_struct.name)
                    .with_description(&go_struct.description)
                    .with_type_params(go_struct.type_params.iter().cloned())
                    .with_imports(imports.clone())
                    .with_location(Location::new(
                        display.to_string_lossy(),
                        go_struct.line,
                        go_struct.col,
                    ));
                definition.fields = go_struct.fields.clone();

                if builder.register(key.clone(), definition).is_some() {
                    self.diagnostics.add(
                        Diagnostic::info(format!(
                            "structure '{}' declared more than once; the later declaration wins",
                            key
                        ))
                        .in_file(&display)
                        .at(go_struct.line, go_struct.col)
                        .with_code(codes::DUPLICATE_DECLARATION),
                    );
                }
            }

            for go_func in &file.functions {
                match parse_function_doc(&go_func.doc) {
                    Ok(Some(mut function)) => {
                        function.package = file.package.clone();
                        function.imports = imports.clone();
                        function.go_name = go_func.name.clone();
                        function.location = Some(Location::new(
                            display.to_string_lossy(),
                            go_func.line,
                            go_func.col,
                        ));
                        functions.push(function);
                    }
                    Ok(None) => {}
                    Err(e) => self.diagnostics.add(
                        Diagnostic::warning(format!(
                            "function '{}' skipped: {}",
                            go_func.name, e
                        ))
                        .in_file(&display)
                        .at(go_func.line, go_func.col)
                        .with_code(e.code()),
                    ),
                }
            }
        }

        let project = find_project_info(&root, &files);
        let catalog = builder.build();
        tracing::info!(
            structures = catalog.len(),
            commands = functions.len(),
            "collected catalog"
        );

        Ok(Collection {
            catalog,
            functions,
            project,
            file_count: files.len(),
        })
    }

    /// Resolve a collection into documentation
    pub fn resolve(&mut self, collection: Collection) -> JdocResult<Documentation> {
        let project = match collection.project {
            Some(project) => project,
            None => self
                .config
                .fallback_project()?
                .ok_or(JdocError::MissingProjectInfo)?,
        };

        let mut functions = collection.functions;
        functions.sort_by(|a, b| a.command.cmp(&b.command));

        let resolver = Resolver::new(&collection.catalog).with_mode(self.config.resolution.mode);
        let mut graph = TypeGraph::new(resolver);
        let mut resolved = Vec::with_capacity(functions.len());

        for function in functions {
            let seeds: Vec<TypeRef> = function.referenced_types().map(TypeRef::parse).collect();
            let scope = Scope::new(&function.package, &function.imports);
            let mut local = DiagnosticsCollector::new();
            let keys = graph.collect_graph(&seeds, &scope, &mut local);

            if let Some(location) = &function.location {
                local = local.located(&location.filename, location.line, location.col);
            }
            self.diagnostics.extend(local);

            let structures = keys
                .into_iter()
                .filter_map(|key| {
                    let definition = graph.lookup(&key)?.clone();
                    let synthesized = graph.is_synthesized(&key);
                    Some(ResolvedStructure {
                        key,
                        definition,
                        synthesized,
                    })
                })
                .collect();

            resolved.push(ResolvedFunction {
                function,
                structures,
            });
        }

        tracing::info!(
            commands = resolved.len(),
            instantiated = graph.instantiator().len(),
            "resolved documentation"
        );

        Ok(Documentation {
            project,
            functions: resolved,
        })
    }

    /// Collect and resolve in one step
    pub fn generate(&mut self) -> JdocResult<Documentation> {
        let collection = self.collect()?;
        self.resolve(collection)
    }

    /// Render documentation in the configured format
    pub fn render(&self, doc: &Documentation) -> JdocResult<String> {
        match self.config.output.format {
            OutputFormat::Markdown => Ok(MarkdownRenderer::new()
                .with_rfc(self.config.output.include_rfc)
                .with_toc(self.config.output.toc)
                .render(doc)),
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(doc)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    /// Run the pipeline and write the output file
    pub fn write(&mut self) -> JdocResult<BuildOutput> {
        let doc = self.generate()?;
        let rendered = self.render(&doc)?;

        let path = self.config.output.path.clone();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, rendered)?;
        tracing::info!(path = %path.display(), "wrote documentation");

        Ok(BuildOutput {
            output_path: path,
            format: self.config.output.format,
            command_count: doc.functions.len(),
            structure_count: doc.structure_count(),
            diagnostics: self.diagnostics.diagnostics().to_vec(),
        })
    }
}

/// First file comment, then first function comment, carrying complete
/// project information
fn find_project_info(root: &Path, files: &[GoFile]) -> Option<ProjectInfo> {
    let file_docs = files.iter().map(|f| (f, 1, f.doc.as_str()));
    let function_docs = files
        .iter()
        .flat_map(|f| f.functions.iter().map(move |func| (f, func.line, func.doc.as_str())));

    for (file, line, doc) in file_docs.chain(function_docs) {
        if !has_global_tags(doc) {
            continue;
        }
        match parse_project_info(doc) {
            Ok(info) => return Some(info),
            Err(e) => tracing::debug!(
                file = %relative_to(root, &file.path).display(),
                line,
                "ignoring project tags: {}",
                e
            ),
        }
    }
    None
}

/// `path` relative to `root` when it lies inside it
fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
