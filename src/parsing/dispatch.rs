//! Tag dispatcher and document binding
//!
//! [`parse_document`] turns one trimmed comment into a [`Document`] and
//! reports where it wants to live. [`DocumentSet`] then applies the binding
//! policy against the scope tree:
//!
//! - explicit bindings (`@module`, `@member`, `@lends`, `@function <path>`)
//!   always take the slot, displacing any occupant
//! - positional bindings only fill empty slots
//! - anything left over is an orphan and is reported, never dropped silently

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use super::curly::parse_curly;
use super::document::Document;
use super::quote;
use super::scope::ScopeTree;
use super::tags::{TagContext, TagRegistry};
use crate::types::{DocumentId, ScopeId};

static TAG_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n *@").expect("Invalid regex"));
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\n+").expect("Invalid regex"));

/// Where a dispatched document asked to be attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Claimed by a binding tag
    Explicit(ScopeId),
    /// Nearest following declaration
    Positional(ScopeId),
    /// Accounted for by a hiding tag, never shown
    Hidden,
    /// No tag claimed it and no declaration follows it
    Unbound,
}

/// Scope information available while dispatching one document
pub struct DocumentScope<'a> {
    pub tree: &'a mut ScopeTree,
    pub module: ScopeId,
    /// Scope of the declaration following the comment
    pub after: Option<ScopeId>,
}

/// Split a tag block into its name and text.
///
/// Horizontal whitespace after the name is dropped, as is a newline right
/// after it, so multi-line bodies keep their indentation.
fn split_tag(block: &str) -> Option<(&str, &str)> {
    let end = block.find(char::is_whitespace).unwrap_or(block.len());
    if end == 0 {
        return None;
    }

    let rest = block[end..].trim_start_matches([' ', '\t']);
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    Some((&block[..end], rest.trim_end()))
}

/// Apply the `@tag` language in `text` to `document`.
///
/// Free text blocks become `doc`; a leading `{Type}` in it moves to
/// `js_type`. Unknown tags are recorded in `errors` and otherwise ignored.
pub fn parse_document(
    text: &str,
    document: &mut Document,
    scope: DocumentScope<'_>,
    registry: &TagRegistry,
) -> Binding {
    let DocumentScope {
        tree,
        module,
        after,
    } = scope;

    let separated = TAG_LINE.replace_all(text, "\n\n\n@");
    let mut docs = Vec::new();
    let mut ctx = TagContext::new(document, tree, module);

    for block in BLANK_LINES.split(&separated) {
        let Some(tags) = block.strip_prefix('@') else {
            docs.push(block);
            continue;
        };

        for tag_block in tags.split("\n@") {
            let Some((tag, tag_text)) = split_tag(tag_block) else {
                ctx.error(format!(
                    "Empty tag in {}",
                    quote(&format!("@{}", tag_block.trim()))
                ));
                continue;
            };

            match registry.get(tag) {
                Some(handler) => handler(tag_text, &mut ctx),
                None => ctx.error(format!("Did not recognize {} tag.", quote(tag))),
            }
        }
    }

    let explicit = ctx.binding();

    let body = docs.join("\n\n");
    let body = body.trim();
    if body.starts_with('{') {
        let (js_type, rest) = parse_curly(body, &mut document.errors);
        if !js_type.is_empty() {
            document.js_type = Some(js_type);
        }
        document.doc = rest.trim().to_string();
    } else {
        document.doc = body.to_string();
    }

    match (explicit, document.accounted, after) {
        (Some(scope), _, _) => Binding::Explicit(scope),
        (None, true, _) => Binding::Hidden,
        (None, false, Some(scope)) => Binding::Positional(scope),
        (None, false, None) => Binding::Unbound,
    }
}

/// Why a document did not make it into the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum OrphanReason {
    NoDeclaration,
    /// A positional binding found the slot already taken
    SlotTaken { target: String, occupant_line: u32 },
    /// An explicit binding replaced this document
    Displaced { target: String, by_line: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Orphan {
    pub document: DocumentId,
    pub line: u32,
    #[serde(flatten)]
    pub reason: OrphanReason,
}

impl fmt::Display for Orphan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            OrphanReason::NoDeclaration => write!(
                f,
                "Documentation at line {} is not followed by a declaration",
                self.line
            ),
            OrphanReason::SlotTaken {
                target,
                occupant_line,
            } => write!(
                f,
                "Documentation at line {} for `{target}` ignored, already documented at line {occupant_line}",
                self.line
            ),
            OrphanReason::Displaced { target, by_line } => write!(
                f,
                "Documentation at line {} for `{target}` displaced by line {by_line}",
                self.line
            ),
        }
    }
}

/// Documents of one file plus the ones that failed to bind
#[derive(Debug, Default)]
pub struct DocumentSet {
    documents: Vec<Document>,
    orphans: Vec<Orphan>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: DocumentId) -> &Document {
        &self.documents[id.index()]
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn orphans(&self) -> &[Orphan] {
        &self.orphans
    }

    fn orphan(&mut self, document: DocumentId, line: u32, reason: OrphanReason) {
        let orphan = Orphan {
            document,
            line,
            reason,
        };
        tracing::warn!("[dispatch] {orphan}");
        self.orphans.push(orphan);
    }

    /// Store `document` and attach it according to `binding`
    pub fn insert(
        &mut self,
        mut document: Document,
        binding: Binding,
        tree: &mut ScopeTree,
    ) -> DocumentId {
        let id = DocumentId::new(self.documents.len() as u32);
        let line = document.line;

        match binding {
            Binding::Explicit(scope) => {
                if let Some(previous) = tree.bind(scope, id) {
                    let target = tree.qualified_name(scope);
                    let previous_line = self.get(previous).line;
                    document.errors.push(format!(
                        "Replaced documentation for `{target}` from line {previous_line}"
                    ));
                    self.orphan(
                        previous,
                        previous_line,
                        OrphanReason::Displaced {
                            target,
                            by_line: line,
                        },
                    );
                }
            }
            Binding::Positional(scope) => match tree.get(scope).document {
                Some(occupant) => {
                    let target = tree.qualified_name(scope);
                    let occupant_line = self.get(occupant).line;
                    document.errors.push(format!(
                        "`{target}` is already documented at line {occupant_line}"
                    ));
                    self.orphan(
                        id,
                        line,
                        OrphanReason::SlotTaken {
                            target,
                            occupant_line,
                        },
                    );
                }
                None => {
                    tree.bind(scope, id);
                }
            },
            Binding::Hidden => {}
            Binding::Unbound => self.orphan(id, line, OrphanReason::NoDeclaration),
        }

        self.documents.push(document);
        id
    }
}
