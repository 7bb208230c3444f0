//! Tree organizer
//!
//! Folds the scope tree and its bound documents into the public document
//! tree. Undocumented scopes are transparent: whatever is documented below
//! them is hoisted into the nearest documented ancestor. Scopes nested deeper
//! than [`MAX_NESTING`] below the module are not folded.

use indexmap::IndexMap;
use serde::Serialize;

use super::dispatch::DocumentSet;
use super::document::Document;
use super::scope::ScopeTree;
use crate::syntax::MAX_NESTING;
use crate::types::ScopeId;

/// A node of the document tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Module id, set on the root only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub document: Document,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, DocNode>,
}

impl DocNode {
    pub fn child(&self, name: &str) -> Option<&DocNode> {
        self.children.get(name)
    }

    /// Follow a chain of child names
    pub fn descendant(&self, path: &[&str]) -> Option<&DocNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Drop `errors` from this node and every descendant
    pub fn strip_errors(&mut self) {
        self.document.errors.clear();
        for child in self.children.values_mut() {
            child.strip_errors();
        }
    }
}

pub struct OrganizeOptions<'a> {
    /// Module id for the root; also names it when the tree was scanned under it
    pub id: Option<&'a str>,
    /// Copy orphan diagnostics onto the root's `errors`
    pub report_orphans: bool,
}

/// Build the document tree rooted at `module`
pub fn organize(
    tree: &ScopeTree,
    module: ScopeId,
    documents: &DocumentSet,
    options: &OrganizeOptions<'_>,
) -> DocNode {
    let scope = tree.get(module);
    let document = scope
        .document
        .map(|id| documents.get(id).clone())
        .unwrap_or_default();

    let mut root = DocNode {
        name: scope.name.clone().or_else(|| document.name.clone()),
        id: options.id.map(str::to_string),
        document,
        children: IndexMap::new(),
    };
    root.document.doc_type = Some("module".to_string());

    fold_children(tree, module, documents, &mut root, 0);

    if options.report_orphans {
        root.document
            .errors
            .extend(documents.orphans().iter().map(ToString::to_string));
    }
    root
}

fn fold_children(
    tree: &ScopeTree,
    scope: ScopeId,
    documents: &DocumentSet,
    into: &mut DocNode,
    depth: usize,
) {
    if depth >= MAX_NESTING {
        if tree.get(scope).children().next().is_some() {
            let message = format!(
                "Scopes below `{}` nested deeper than {MAX_NESTING} levels ignored",
                tree.qualified_name(scope)
            );
            tracing::warn!("[organize] {message}");
            into.document.errors.push(message);
        }
        return;
    }

    for (scope_name, child) in tree.get(scope).children() {
        let Some(document_id) = tree.get(child).document else {
            fold_children(tree, child, documents, into, depth + 1);
            continue;
        };

        let document = documents.get(document_id).clone();
        let name = document
            .name
            .clone()
            .unwrap_or_else(|| scope_name.to_string());

        let mut node = DocNode {
            name: Some(name.clone()),
            id: None,
            document,
            children: IndexMap::new(),
        };
        fold_children(tree, child, documents, &mut node, depth + 1);

        if let Some(existing) = into.children.get(&name) {
            let message = format!(
                "Duplicate documentation for `{name}` at line {} ignored, first documented at line {}",
                node.document.line, existing.document.line
            );
            tracing::warn!("[organize] {message}");
            into.document.errors.push(message);
        } else {
            into.children.insert(name, node);
        }
    }
}
