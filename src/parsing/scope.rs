//! Scope tree: the hierarchical symbol table documents attach to
//!
//! Nodes live in an arena and point at their parent by [`ScopeId`]. A lookup
//! walks the parent chain, so a name bound on an ancestor is visible from every
//! descendant, but a miss always creates the child on the scope that asked.

use indexmap::IndexMap;

use crate::types::{DocumentId, Range, ScopeId};

/// Names that resolve to the scope itself instead of a child
const SELF_NAMES: &[&str] = &["exports", ""];

/// A position in the namespace hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeNode {
    /// `None` only for the synthetic root
    pub name: Option<String>,
    /// Where the name was first introduced, if it came from code
    pub range: Option<Range>,
    pub parent: Option<ScopeId>,
    children: IndexMap<String, ScopeId>,
    pub document: Option<DocumentId>,
}

impl ScopeNode {
    fn new(name: Option<String>, range: Option<Range>, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            range,
            parent,
            children: IndexMap::new(),
            document: None,
        }
    }

    /// Own bindings in insertion order
    pub fn children(&self) -> impl Iterator<Item = (&str, ScopeId)> + '_ {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Arena of [`ScopeNode`]s rooted at a synthetic, nameless node
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeTree {
    nodes: Vec<ScopeNode>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![ScopeNode::new(None, None, None)],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::new(0)
    }

    pub fn get(&self, id: ScopeId) -> &ScopeNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists
        false
    }

    /// Resolve `name` as seen from `scope` without creating anything.
    ///
    /// Own children are searched first, then each ancestor's children.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        if SELF_NAMES.contains(&name) {
            return Some(scope);
        }

        let mut current = Some(scope);
        while let Some(id) = current {
            let node = self.get(id);
            if let Some(found) = node.children.get(name) {
                return Some(*found);
            }
            current = node.parent;
        }
        None
    }

    /// Resolve `name` from `scope`, creating it under `scope` on a miss.
    ///
    /// An absent name, the empty name and `exports` all resolve to `scope`.
    /// Repeated calls with the same arguments return the same id.
    pub fn lookup_or_create(
        &mut self,
        scope: ScopeId,
        name: Option<&str>,
        range: Option<Range>,
    ) -> ScopeId {
        let Some(name) = name else {
            return scope;
        };
        if let Some(found) = self.lookup(scope, name) {
            return found;
        }

        let id = ScopeId::new(self.nodes.len() as u32);
        self.nodes
            .push(ScopeNode::new(Some(name.to_string()), range, Some(scope)));
        self.nodes[scope.index()]
            .children
            .insert(name.to_string(), id);
        id
    }

    /// Resolve a dotted path such as `Foo#bar` or `a.b.c` from `scope`.
    ///
    /// `#` is shorthand for `.prototype.`. Each segment keeps only the text
    /// after its last `:` and is trimmed. Missing names become placeholders.
    pub fn lookup_path(&mut self, scope: ScopeId, path: &str) -> ScopeId {
        let normalized = path.replace('#', ".prototype.");
        normalized.split('.').fold(scope, |current, segment| {
            let part = segment.rsplit(':').next().unwrap_or(segment).trim();
            self.lookup_or_create(current, Some(part), None)
        })
    }

    /// Attach a document, returning the previous occupant of the slot
    pub fn bind(&mut self, scope: ScopeId, document: DocumentId) -> Option<DocumentId> {
        self.nodes[scope.index()].document.replace(document)
    }

    /// Detach every document, keeping the names
    pub fn clear_documents(&mut self) {
        for node in &mut self.nodes {
            node.document = None;
        }
    }

    /// Dotted path from the root, used in diagnostics
    pub fn qualified_name(&self, scope: ScopeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let node = self.get(id);
            if let Some(name) = &node.name {
                parts.push(name.as_str());
            }
            current = node.parent;
        }
        parts.reverse();
        parts.join(".")
    }
}
