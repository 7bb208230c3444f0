//! Extraction pipeline
//!
//! Runs the stages for one source text, one file, or a batch of files. Each
//! file gets its own scope tree and document set; in a batch every file
//! yields its own result, so a failure never affects the others.

use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::{ExtractError, ExtractResult, ParseError, ParseResult};
use crate::parsing::{
    DeclarationEvent, Diagnostic, DocNode, Document, DocumentScope, DocumentSet, OrganizeOptions,
    ScopeTree, TagRegistry, default_registry, locate, organize, parse_document, scan,
    trim_comment,
};
use crate::syntax::{JavaScriptSyntax, RawComment};
use crate::types::ScopeId;

/// Per-run extraction options
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Module id; the root is named after it with a trailing `.js` removed
    pub id: Option<String>,
    pub tab_width: usize,
    pub strict_syntax: bool,
    pub report_orphans: bool,
    /// Extensions accepted by the file-level API, empty accepts everything
    pub extensions: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl ParseOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            id: None,
            tab_width: settings.tab_width,
            strict_syntax: settings.parsing.strict_syntax,
            report_orphans: settings.parsing.report_orphans,
            extensions: settings.extensions.clone(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }
}

/// The document tree of one module plus file-level diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ExtractOutput {
    pub tree: DocNode,
    /// Scanner gaps and recovered syntax errors
    pub diagnostics: Vec<Diagnostic>,
}

/// Name of the module scope for a module id
pub fn module_name(id: &str) -> &str {
    id.strip_suffix(".js").unwrap_or(id)
}

/// Reusable extractor; owns one tree-sitter parser
pub struct DocExtractor {
    syntax: JavaScriptSyntax,
    registry: TagRegistry,
}

impl DocExtractor {
    pub fn new() -> ParseResult<Self> {
        Self::with_registry(default_registry().clone())
    }

    pub fn with_registry(registry: TagRegistry) -> ParseResult<Self> {
        Ok(Self {
            syntax: JavaScriptSyntax::new()?,
            registry,
        })
    }

    /// Extract the document tree of one module's source text
    pub fn parse_module(&mut self, code: &str, options: &ParseOptions) -> ParseResult<ExtractOutput> {
        self.parse_module_in(code, &mut ScopeTree::new(), options)
    }

    /// Extract one module into a caller-supplied scope tree.
    ///
    /// Names already in `tree` resolve like declarations of the module, so a
    /// tree shared across calls or seeded with globals links documentation
    /// between them. Only documents from this call appear in the output.
    pub fn parse_module_in(
        &mut self,
        code: &str,
        tree: &mut ScopeTree,
        options: &ParseOptions,
    ) -> ParseResult<ExtractOutput> {
        let file = self.syntax.parse(code)?;
        let mut diagnostics = Vec::new();

        if let Some(range) = file.first_error.filter(|_| file.has_errors) {
            if options.strict_syntax {
                return Err(ParseError::SyntaxError {
                    line: range.start_line,
                    column: range.start_column,
                    reason: "unexpected or missing token".to_string(),
                });
            }
            tracing::debug!(
                "[extract] recovered from syntax error at line {}",
                range.start_line
            );
            diagnostics.push(Diagnostic::new(range, "Syntax error, extracted from the recovered tree"));
        }

        tree.clear_documents();
        let module = match options.id.as_deref() {
            Some(id) => {
                let root = tree.root();
                tree.lookup_or_create(root, Some(module_name(id)), None)
            }
            None => tree.root(),
        };

        let scanned = scan(&file.program, tree, module);
        diagnostics.extend(scanned.diagnostics);

        let documents = self.dispatch(&file.comments, &scanned.events, tree, module, options);

        let doc_tree = organize(
            tree,
            module,
            &documents,
            &OrganizeOptions {
                id: options.id.as_deref(),
                report_orphans: options.report_orphans,
            },
        );

        tracing::debug!(
            "[extract] {} declarations, {} documents, {} orphans",
            scanned.events.len(),
            documents.len(),
            documents.orphans().len()
        );

        Ok(ExtractOutput {
            tree: doc_tree,
            diagnostics,
        })
    }

    fn dispatch(
        &self,
        comments: &[RawComment],
        events: &[DeclarationEvent],
        tree: &mut ScopeTree,
        module: ScopeId,
        options: &ParseOptions,
    ) -> DocumentSet {
        let mut documents = DocumentSet::new();

        for located in locate(comments, events) {
            let text = trim_comment(
                &located.comment.text,
                &located.comment.prefix,
                options.tab_width,
            );
            let mut document = Document::new(located.line());
            let after = located.after.map(|index| events[index].scope);

            let binding = parse_document(
                &text,
                &mut document,
                DocumentScope {
                    tree: &mut *tree,
                    module,
                    after,
                },
                &self.registry,
            );
            documents.insert(document, binding, tree);
        }

        documents
    }

    /// Read and extract one file.
    ///
    /// Without an explicit id the file name becomes the module id.
    pub fn parse_file(&mut self, path: &Path, options: &ParseOptions) -> ExtractResult<ExtractOutput> {
        if !options.accepts(path) {
            return Err(ExtractError::UnsupportedFileType {
                path: path.to_path_buf(),
                extension: path
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                supported: options.extensions.join(", "),
            });
        }

        let code = std::fs::read_to_string(path).map_err(|source| ExtractError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let options = match &options.id {
            Some(_) => options.clone(),
            None => {
                let id = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned());
                ParseOptions {
                    id,
                    ..options.clone()
                }
            }
        };

        self.parse_module(&code, &options)
            .map_err(|source| ExtractError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Extract one module with the default tag registry
pub fn parse_module(code: &str, options: &ParseOptions) -> ParseResult<ExtractOutput> {
    DocExtractor::new()?.parse_module(code, options)
}

/// Extract many files in parallel, one parser per worker thread.
///
/// Results come back in input order. `options.id` is ignored so each file is
/// named after itself.
pub fn parse_files(
    paths: &[PathBuf],
    options: &ParseOptions,
    registry: &TagRegistry,
) -> Vec<(PathBuf, ExtractResult<ExtractOutput>)> {
    let options = ParseOptions {
        id: None,
        ..options.clone()
    };

    paths
        .par_iter()
        .map_init(
            || DocExtractor::with_registry(registry.clone()),
            |extractor, path| {
                let result = match extractor {
                    Ok(extractor) => extractor.parse_file(path, &options),
                    Err(err) => Err(ExtractError::Parse {
                        path: path.clone(),
                        source: ParseError::ParserInit {
                            language: "JavaScript".to_string(),
                            reason: err.to_string(),
                        },
                    }),
                };
                (path.clone(), result)
            },
        )
        .collect()
}
