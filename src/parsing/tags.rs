//! Tag handler registry
//!
//! This module provides the registry that routes `@tag` blocks to handlers:
//! - A process-wide default registry built once on first use
//! - Cheap clones so callers can add or replace handlers without
//!   touching the shared default
//! - Plain `fn` handlers that mutate the document and may bind it into the
//!   scope tree through [`TagContext::bind`]

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::author::Author;
use super::curly::parse_curly;
use super::document::{Document, Param, TypedText};
use super::quote;
use super::scope::ScopeTree;
use crate::types::ScopeId;

/// Handler for one tag; receives the text that followed the tag name
pub type TagHandler = fn(&str, &mut TagContext<'_>);

/// Everything a handler may touch while processing one document
pub struct TagContext<'a> {
    pub document: &'a mut Document,
    pub tree: &'a mut ScopeTree,
    /// Scope the module's own names live in
    pub module: ScopeId,
    binding: Option<ScopeId>,
}

impl<'a> TagContext<'a> {
    pub fn new(document: &'a mut Document, tree: &'a mut ScopeTree, module: ScopeId) -> Self {
        Self {
            document,
            tree,
            module,
            binding: None,
        }
    }

    /// Request an explicit binding; the document stops being positional
    pub fn bind(&mut self, scope: ScopeId) {
        self.binding = Some(scope);
        self.document.accounted = true;
    }

    pub fn binding(&self) -> Option<ScopeId> {
        self.binding
    }

    /// Resolve a path relative to the module scope
    pub fn lookup_path(&mut self, path: &str) -> ScopeId {
        self.tree.lookup_path(self.module, path)
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.document.errors.push(message.into());
    }
}

/// Mapping from tag name to handler
#[derive(Clone)]
pub struct TagRegistry {
    handlers: HashMap<String, TagHandler>,
}

impl std::fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        default_registry().clone()
    }
}

impl TagRegistry {
    /// A registry that recognizes nothing
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` for `tag`, returning the handler it replaced
    pub fn register(&mut self, tag: impl Into<String>, handler: TagHandler) -> Option<TagHandler> {
        self.handlers.insert(tag.into(), handler)
    }

    pub fn remove(&mut self, tag: &str) -> Option<TagHandler> {
        self.handlers.remove(tag)
    }

    pub fn get(&self, tag: &str) -> Option<TagHandler> {
        self.handlers.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Registered tag names, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("param", param);
        registry.register("params", params);
        registry.register("returns", returns);
        registry.register("return", returns);
        registry.register("throws", throws);
        registry.register("exception", throws);
        registry.register("example", example);
        registry.register("see", see);
        registry.register("name", name);
        registry.register("author", author);
        registry.register("contributor", contributor);
        registry.register("constructor", constructor);
        registry.register("deprecated", deprecated);
        registry.register("module", module);
        registry.register("fileoverview", module);
        registry.register("member", member);
        registry.register("lends", lends);
        registry.register("function", function);
        registry.register("private", private);
        registry.register("external", external);
        registry.register("requires", requires);
        registry
    }
}

static DEFAULT_REGISTRY: LazyLock<TagRegistry> = LazyLock::new(TagRegistry::with_defaults);

/// The built-in handlers
pub fn default_registry() -> &'static TagRegistry {
    &DEFAULT_REGISTRY
}

static PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)(?:\s+([\S\s]*))?$").expect("Invalid regex"));

fn one_line(text: &str) -> String {
    text.replace('\n', " ")
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Split a leading `{type}` off `text`
fn typed(text: &str, ctx: &mut TagContext<'_>) -> (Option<String>, String) {
    if text.starts_with('{') {
        let (value_type, rest) = parse_curly(text, &mut ctx.document.errors);
        (non_empty(&value_type), rest.trim().to_string())
    } else {
        (None, text.to_string())
    }
}

fn push_param(tag: &str, text: &str, variadic: bool, ctx: &mut TagContext<'_>) {
    let text = one_line(text);
    let (param_type, text) = typed(&text, ctx);

    let Some(captures) = PARAM.captures(&text) else {
        ctx.error(format!("Could not recognize `@{tag}` {}", quote(&text)));
        return;
    };

    ctx.document.params.push(Param {
        name: captures[1].to_string(),
        param_type,
        doc: captures.get(2).and_then(|doc| non_empty(doc.as_str())),
        variadic,
    });
}

fn param(text: &str, ctx: &mut TagContext<'_>) {
    push_param("param", text, false, ctx);
}

fn params(text: &str, ctx: &mut TagContext<'_>) {
    push_param("params", text, true, ctx);
}

fn typed_text(text: &str, ctx: &mut TagContext<'_>) -> TypedText {
    let text = one_line(text);
    let (value_type, doc) = typed(&text, ctx);
    TypedText {
        value_type,
        doc: non_empty(&doc),
    }
}

fn returns(text: &str, ctx: &mut TagContext<'_>) {
    let value = typed_text(text, ctx);
    ctx.document.returns = Some(value);
}

fn throws(text: &str, ctx: &mut TagContext<'_>) {
    let value = typed_text(text, ctx);
    ctx.document.throws.push(value);
}

fn example(text: &str, ctx: &mut TagContext<'_>) {
    ctx.document.examples.push(text.to_string());
}

fn see(text: &str, ctx: &mut TagContext<'_>) {
    if let Some(reference) = non_empty(text) {
        ctx.document.see.push(reference);
    }
}

fn name(text: &str, ctx: &mut TagContext<'_>) {
    match non_empty(text) {
        Some(name) => ctx.document.name = Some(name),
        None => ctx.error("`@name` tag had no name"),
    }
}

fn author(text: &str, ctx: &mut TagContext<'_>) {
    ctx.document.author = Some(Author::parse(&one_line(text)));
}

fn contributor(text: &str, ctx: &mut TagContext<'_>) {
    ctx.document.contributors.push(Author::parse(&one_line(text)));
}

fn superfluous(tag: &str, text: &str, ctx: &mut TagContext<'_>) {
    if !text.trim().is_empty() {
        ctx.error(format!("`@{tag}` tag had superfluous text"));
    }
}

fn constructor(text: &str, ctx: &mut TagContext<'_>) {
    superfluous("constructor", text, ctx);
    ctx.document.flags.constructor = true;
}

fn deprecated(text: &str, ctx: &mut TagContext<'_>) {
    superfluous("deprecated", text, ctx);
    ctx.document.flags.deprecated = true;
}

/// `@module` and `@fileoverview` document the module scope itself
fn module(text: &str, ctx: &mut TagContext<'_>) {
    superfluous("module", text, ctx);
    ctx.document.flags.module = true;
    ctx.document.doc_type = Some("module".to_string());
    let module = ctx.module;
    ctx.bind(module);
}

fn path_argument(tag: &str, text: &str, ctx: &mut TagContext<'_>) -> Option<ScopeId> {
    let path = text.trim();
    if path.is_empty() {
        ctx.error(format!("`@{tag}` tag requires a path"));
        return None;
    }
    Some(ctx.lookup_path(path))
}

fn member(text: &str, ctx: &mut TagContext<'_>) {
    if let Some(scope) = path_argument("member", text, ctx) {
        ctx.document.name = ctx.tree.get(scope).name.clone();
        ctx.bind(scope);
    }
}

fn lends(text: &str, ctx: &mut TagContext<'_>) {
    if let Some(scope) = path_argument("lends", text, ctx) {
        ctx.bind(scope);
    }
}

fn function(text: &str, ctx: &mut TagContext<'_>) {
    if ctx.document.js_type.is_none() {
        ctx.document.js_type = Some("Function".to_string());
    }
    if !text.trim().is_empty() {
        let scope = ctx.lookup_path(text);
        ctx.bind(scope);
    }
}

fn private(_text: &str, ctx: &mut TagContext<'_>) {
    ctx.document.flags.private = true;
    ctx.document.accounted = true;
}

fn external(_text: &str, ctx: &mut TagContext<'_>) {
    ctx.document.flags.external = true;
    ctx.document.accounted = true;
}

fn requires(text: &str, ctx: &mut TagContext<'_>) {
    if let Some(dependency) = non_empty(text) {
        ctx.document.requires.push(dependency);
    }
}
