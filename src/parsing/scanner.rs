//! Declaration scanner
//!
//! Walks the lowered syntax tree in source order and records every point
//! where a name is bound. While walking it populates the [`ScopeTree`], so
//! nested declarations end up under the scope of the name that encloses them
//! (`var a = { b: { c: 1 } }` yields `a`, `a.b` and `a.b.c`).
//!
//! Nodes nested deeper than [`MAX_NESTING`] are reported and skipped.

use serde::Serialize;

use super::scope::ScopeTree;
use super::Diagnostic;
use crate::syntax::{ClassMember, MAX_NESTING, Node, NodeKind, Property, VariableDeclarator};
use crate::types::{Range, ScopeId};

/// A name being introduced by code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclarationEvent {
    pub name: Option<String>,
    pub range: Range,
    /// The scope node the name resolved to
    pub scope: ScopeId,
}

impl DeclarationEvent {
    pub fn line(&self) -> u32 {
        self.range.start_line
    }
}

/// Result of scanning one program
#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Events in source order, non-decreasing by start line
    pub events: Vec<DeclarationEvent>,
    /// Nodes the scanner had no rule for
    pub diagnostics: Vec<Diagnostic>,
}

pub struct DeclarationScanner<'t> {
    tree: &'t mut ScopeTree,
    output: ScanOutput,
    depth: usize,
}

impl<'t> DeclarationScanner<'t> {
    pub fn new(tree: &'t mut ScopeTree) -> Self {
        Self {
            tree,
            output: ScanOutput::default(),
            depth: 0,
        }
    }

    /// Scan `program` with `scope` as the enclosing namespace
    pub fn scan(mut self, program: &Node, scope: ScopeId) -> ScanOutput {
        self.visit(program, scope);
        self.output
    }

    fn emit(&mut self, name: Option<String>, range: Range, scope: ScopeId) {
        self.output
            .events
            .push(DeclarationEvent { name, range, scope });
    }

    fn visit_all(&mut self, nodes: &[Node], scope: ScopeId) {
        for node in nodes {
            self.visit(node, scope);
        }
    }

    fn visit(&mut self, node: &Node, scope: ScopeId) {
        if self.depth >= MAX_NESTING {
            tracing::debug!(
                "[scanner] stopped at '{}' on line {}, nested deeper than {MAX_NESTING} levels",
                node.kind_name(),
                node.range.start_line
            );
            self.output.diagnostics.push(Diagnostic::new(
                node.range,
                format!(
                    "Can't traverse {} nested deeper than {MAX_NESTING} levels",
                    node.kind_name()
                ),
            ));
            return;
        }

        self.depth += 1;
        self.visit_node(node, scope);
        self.depth -= 1;
    }

    fn visit_node(&mut self, node: &Node, scope: ScopeId) {
        match &node.kind {
            NodeKind::Program { body } | NodeKind::Block { body } | NodeKind::Export { body } => {
                self.visit_all(body, scope)
            }
            NodeKind::ExpressionStatement { expression } => self.visit(expression, scope),
            NodeKind::If {
                consequent,
                alternate,
            } => {
                self.visit(consequent, scope);
                if let Some(alternate) = alternate {
                    self.visit(alternate, scope);
                }
            }
            NodeKind::Conditional {
                consequent,
                alternate,
            } => {
                self.visit(consequent, scope);
                self.visit(alternate, scope);
            }
            NodeKind::Labeled { body }
            | NodeKind::With { body }
            | NodeKind::Loop { body, .. }
            | NodeKind::Catch { body } => self.visit(body, scope),
            NodeKind::Switch { cases } => self.visit_all(cases, scope),
            NodeKind::SwitchCase { body } => self.visit_all(body, scope),
            NodeKind::Return { argument } => {
                if let Some(argument) = argument {
                    self.visit(argument, scope);
                }
            }
            NodeKind::Throw { argument } | NodeKind::Unary { argument } => {
                self.visit(argument, scope)
            }
            NodeKind::Try {
                block,
                handler,
                finalizer,
            } => {
                self.visit(block, scope);
                if let Some(handler) = handler {
                    self.visit(handler, scope);
                }
                if let Some(finalizer) = finalizer {
                    self.visit(finalizer, scope);
                }
            }
            NodeKind::FunctionDeclaration { name, body } => {
                let inner = match name {
                    Some(name) => {
                        let inner = self
                            .tree
                            .lookup_or_create(scope, Some(name), Some(node.range));
                        self.emit(Some(name.clone()), node.range, inner);
                        inner
                    }
                    None => scope,
                };
                self.visit(body, inner);
            }
            NodeKind::FunctionExpression { body, .. } => self.visit(body, scope),
            NodeKind::VariableDeclaration { declarators } => {
                for declarator in declarators {
                    self.visit_declarator(declarator, scope);
                }
            }
            NodeKind::ClassDeclaration { name, members } => {
                let inner = match name {
                    Some(name) => {
                        let inner = self
                            .tree
                            .lookup_or_create(scope, Some(name), Some(node.range));
                        self.emit(Some(name.clone()), node.range, inner);
                        inner
                    }
                    None => scope,
                };
                self.visit_class_members(members, inner);
            }
            NodeKind::ClassExpression { members } => self.visit_class_members(members, scope),
            NodeKind::Object { properties } => {
                for property in properties {
                    self.visit_property(property, scope);
                }
            }
            NodeKind::Array { elements: nodes } | NodeKind::Sequence { expressions: nodes } => {
                self.visit_all(nodes, scope)
            }
            NodeKind::Binary { left, right } | NodeKind::Logical { left, right } => {
                self.visit(left, scope);
                self.visit(right, scope);
            }
            NodeKind::Assignment { target, value } => match self.resolve(target, scope) {
                Some(found) => {
                    let name = self.tree.get(found).name.clone();
                    self.emit(name, node.range, found);
                    self.visit(value, found);
                }
                None => self.visit(value, scope),
            },
            NodeKind::New { arguments, .. } => self.visit_all(arguments, scope),
            NodeKind::Call { callee, arguments } => {
                let inner = match self.resolve(callee, scope) {
                    Some(found) => found,
                    None => {
                        // `(function () { ... })()` and friends
                        self.visit(callee, scope);
                        scope
                    }
                };
                self.visit_all(arguments, inner);
            }
            NodeKind::Member { object, .. } => self.visit(object, scope),
            NodeKind::Identifier { .. }
            | NodeKind::Literal { .. }
            | NodeKind::This
            | NodeKind::Update
            | NodeKind::Empty
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Debugger
            | NodeKind::Import => {}
            NodeKind::Unsupported { kind, children } => {
                tracing::debug!(
                    "[scanner] no declaration rule for '{kind}' at line {}",
                    node.range.start_line
                );
                self.output.diagnostics.push(Diagnostic::new(
                    node.range,
                    format!("Can't traverse {kind}"),
                ));
                self.visit_all(children, scope);
            }
        }
    }

    fn visit_declarator(&mut self, declarator: &VariableDeclarator, scope: ScopeId) {
        let inner = match &declarator.name {
            Some(name) => {
                let inner = self
                    .tree
                    .lookup_or_create(scope, Some(name), Some(declarator.range));
                self.emit(Some(name.clone()), declarator.range, inner);
                inner
            }
            None => scope,
        };
        if let Some(init) = &declarator.init {
            self.visit(init, inner);
        }
    }

    fn visit_property(&mut self, property: &Property, scope: ScopeId) {
        let inner = match &property.key {
            Some(key) => {
                let inner = self
                    .tree
                    .lookup_or_create(scope, Some(key), Some(property.range));
                self.emit(Some(key.clone()), property.range, inner);
                inner
            }
            None => scope,
        };
        self.visit(&property.value, inner);
    }

    /// Static members bind on the class, instance members on its prototype
    fn visit_class_members(&mut self, members: &[ClassMember], class: ScopeId) {
        for member in members {
            let inner = match &member.name {
                Some(name) => {
                    let owner = if member.is_static {
                        class
                    } else {
                        self.tree.lookup_or_create(class, Some("prototype"), None)
                    };
                    let inner = self
                        .tree
                        .lookup_or_create(owner, Some(name), Some(member.range));
                    self.emit(Some(name.clone()), member.range, inner);
                    inner
                }
                None => class,
            };
            if let Some(value) = &member.value {
                self.visit(value, inner);
            }
        }
    }

    /// Resolve an assignment target or callee to a scope node.
    ///
    /// Intermediate names are created as needed; `this` and other
    /// expressions without a static name are unresolvable.
    fn resolve(&mut self, node: &Node, scope: ScopeId) -> Option<ScopeId> {
        match &node.kind {
            NodeKind::Identifier { name } => {
                Some(self.tree.lookup_or_create(scope, Some(name), Some(node.range)))
            }
            NodeKind::Literal { value } => {
                Some(
                    self.tree
                        .lookup_or_create(scope, value.as_deref(), Some(node.range)),
                )
            }
            NodeKind::Member { object, property } => {
                let object = self.resolve(object, scope)?;
                Some(
                    self.tree
                        .lookup_or_create(object, property.as_deref(), Some(node.range)),
                )
            }
            _ => None,
        }
    }
}

/// Scan `program` under `scope`, filling `tree`
pub fn scan(program: &Node, tree: &mut ScopeTree, scope: ScopeId) -> ScanOutput {
    DeclarationScanner::new(tree).scan(program, scope)
}
