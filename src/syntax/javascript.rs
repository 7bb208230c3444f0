//! JavaScript front end
//!
//! **Tree-sitter grammar**: tree-sitter-javascript 0.25 (ABI-15)
//!
//! Lowers the tree-sitter concrete syntax tree into [`crate::syntax::Node`] and
//! collects every `comment` node with the whitespace that precedes it on its
//! line. Both `function` and `function_expression` are accepted so the lowering
//! keeps working across grammar releases that renamed the node.
//!
//! Lowering stops at [`MAX_NESTING`] levels: a deeper node becomes an
//! [`NodeKind::Unsupported`] leaf named after its kind and nesting. Comment
//! collection walks the tree with a cursor, so it has no depth limit.

use super::{
    ClassMember, CommentStyle, LoopKind, MAX_NESTING, Node, NodeKind, Property, RawComment,
    SourceFile, VariableDeclarator,
};
use std::cell::Cell;
use crate::error::{ParseError, ParseResult};
use crate::types::Range;
use tree_sitter::{Language, Node as TsNode, Parser};

/// JavaScript parser producing the lowered syntax interface
pub struct JavaScriptSyntax {
    parser: Parser,
}

impl JavaScriptSyntax {
    /// Create a new JavaScript parser
    pub fn new() -> ParseResult<Self> {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_javascript::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| ParseError::ParserInit {
                language: "JavaScript".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { parser })
    }

    /// Parse JavaScript source text into a lowered [`SourceFile`]
    pub fn parse(&mut self, code: &str) -> ParseResult<SourceFile> {
        let tree = self
            .parser
            .parse(code, None)
            .ok_or(ParseError::NoTree)?;
        let root = tree.root_node();

        let lowering = Lowering {
            code,
            depth: Cell::new(0),
        };
        let program = lowering.lower_program(root);
        let comments = collect_comments(root, code);

        let first_error = if root.has_error() {
            first_error_range(root)
        } else {
            None
        };

        Ok(SourceFile {
            program,
            comments,
            has_errors: root.has_error(),
            first_error,
        })
    }
}

struct Lowering<'a> {
    code: &'a str,
    /// Number of `lower` calls on the stack
    depth: Cell<usize>,
}

impl<'a> Lowering<'a> {
    fn text(&self, node: TsNode) -> &'a str {
        &self.code[node.byte_range()]
    }

    fn range(node: TsNode) -> Range {
        Range::from_points(node.start_position(), node.end_position())
    }

    fn lower_program(&self, root: TsNode) -> Node {
        Node::new(
            NodeKind::Program {
                body: self.lower_children(root),
            },
            Self::range(root),
        )
    }

    /// Lower every named child except comments
    fn lower_children(&self, node: TsNode) -> Vec<Node> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .filter_map(|child| self.lower(child))
            .collect()
    }

    fn first_child(&self, node: TsNode) -> Option<Node> {
        self.lower_children(node).into_iter().next()
    }

    fn field(&self, node: TsNode, name: &str) -> Option<Node> {
        node.child_by_field_name(name)
            .and_then(|child| self.lower(child))
    }

    fn boxed_field(&self, node: TsNode, name: &str) -> Box<Node> {
        Box::new(
            self.field(node, name)
                .unwrap_or_else(|| Node::new(NodeKind::Empty, Self::range(node))),
        )
    }

    fn lower(&self, node: TsNode) -> Option<Node> {
        if !node.is_named() || node.kind() == "comment" {
            return None;
        }

        let depth = self.depth.get();
        if depth >= MAX_NESTING {
            tracing::debug!(
                "[lower] '{}' at line {} is nested deeper than {MAX_NESTING} levels",
                node.kind(),
                node.start_position().row + 1
            );
            return Some(Node::new(
                NodeKind::Unsupported {
                    kind: format!("{} nested deeper than {MAX_NESTING} levels", node.kind()),
                    children: Vec::new(),
                },
                Self::range(node),
            ));
        }

        self.depth.set(depth + 1);
        let lowered = self.lower_node(node);
        self.depth.set(depth);
        lowered
    }

    fn lower_node(&self, node: TsNode) -> Option<Node> {
        let range = Self::range(node);
        let kind = match node.kind() {
            "program" => NodeKind::Program {
                body: self.lower_children(node),
            },
            "statement_block" | "class_static_block" => NodeKind::Block {
                body: self.lower_children(node),
            },
            "export_statement" => {
                let body = ["declaration", "value"]
                    .iter()
                    .filter_map(|field| self.field(node, field))
                    .collect();
                NodeKind::Export { body }
            }
            "import_statement" => NodeKind::Import,
            "empty_statement" | "hash_bang_line" => NodeKind::Empty,
            "debugger_statement" => NodeKind::Debugger,
            "break_statement" => NodeKind::Break,
            "continue_statement" => NodeKind::Continue,
            "expression_statement" => match self.first_child(node) {
                Some(expression) => NodeKind::ExpressionStatement {
                    expression: Box::new(expression),
                },
                None => NodeKind::Empty,
            },
            "if_statement" => NodeKind::If {
                consequent: self.boxed_field(node, "consequence"),
                alternate: node
                    .child_by_field_name("alternative")
                    .and_then(|clause| self.first_child(clause))
                    .map(Box::new),
            },
            "labeled_statement" => NodeKind::Labeled {
                body: self.boxed_field(node, "body"),
            },
            "with_statement" => NodeKind::With {
                body: self.boxed_field(node, "body"),
            },
            "switch_statement" => {
                let cases = node
                    .child_by_field_name("body")
                    .map(|body| self.lower_children(body))
                    .unwrap_or_default();
                NodeKind::Switch { cases }
            }
            "switch_case" | "switch_default" => {
                let mut cursor = node.walk();
                let body = node
                    .children_by_field_name("body", &mut cursor)
                    .filter_map(|child| self.lower(child))
                    .collect();
                NodeKind::SwitchCase { body }
            }
            "return_statement" => NodeKind::Return {
                argument: self.first_child(node).map(Box::new),
            },
            "throw_statement" => NodeKind::Throw {
                argument: Box::new(
                    self.first_child(node)
                        .unwrap_or_else(|| Node::new(NodeKind::Empty, range)),
                ),
            },
            "try_statement" => NodeKind::Try {
                block: self.boxed_field(node, "body"),
                handler: self.field(node, "handler").map(Box::new),
                finalizer: node
                    .child_by_field_name("finalizer")
                    .and_then(|clause| self.field(clause, "body"))
                    .map(Box::new),
            },
            "catch_clause" => NodeKind::Catch {
                body: self.boxed_field(node, "body"),
            },
            "while_statement" => self.lower_loop(node, LoopKind::While),
            "do_statement" => self.lower_loop(node, LoopKind::DoWhile),
            "for_statement" => self.lower_loop(node, LoopKind::For),
            "for_in_statement" => self.lower_loop(node, LoopKind::ForIn),
            "function_declaration" | "generator_function_declaration" => {
                NodeKind::FunctionDeclaration {
                    name: self.name_field(node, "name"),
                    body: self.boxed_field(node, "body"),
                }
            }
            "function_expression" | "function" | "generator_function" | "arrow_function" => {
                NodeKind::FunctionExpression {
                    name: self.name_field(node, "name"),
                    body: self.boxed_field(node, "body"),
                }
            }
            "variable_declaration" | "lexical_declaration" => {
                let mut cursor = node.walk();
                let declarators = node
                    .named_children(&mut cursor)
                    .filter(|child| child.kind() == "variable_declarator")
                    .map(|declarator| self.lower_declarator(declarator))
                    .collect();
                NodeKind::VariableDeclaration { declarators }
            }
            "class_declaration" => NodeKind::ClassDeclaration {
                name: self.name_field(node, "name"),
                members: self.lower_class_body(node),
            },
            "class" => NodeKind::ClassExpression {
                members: self.lower_class_body(node),
            },
            "this" | "super" => NodeKind::This,
            "array" | "arguments" => NodeKind::Array {
                elements: self.lower_children(node),
            },
            "object" => NodeKind::Object {
                properties: self.lower_properties(node),
            },
            "sequence_expression" => NodeKind::Sequence {
                expressions: self.lower_children(node),
            },
            "parenthesized_expression"
            | "await_expression"
            | "yield_expression"
            | "spread_element" => {
                return self.first_child(node);
            }
            "unary_expression" => NodeKind::Unary {
                argument: self.boxed_field(node, "argument"),
            },
            "binary_expression" => {
                let left = self.boxed_field(node, "left");
                let right = self.boxed_field(node, "right");
                let operator = node
                    .child_by_field_name("operator")
                    .map(|op| self.text(op))
                    .unwrap_or_default();
                if matches!(operator, "&&" | "||" | "??") {
                    NodeKind::Logical { left, right }
                } else {
                    NodeKind::Binary { left, right }
                }
            }
            "augmented_assignment_expression" => NodeKind::Binary {
                left: self.boxed_field(node, "left"),
                right: self.boxed_field(node, "right"),
            },
            "assignment_expression" => NodeKind::Assignment {
                target: self.boxed_field(node, "left"),
                value: self.boxed_field(node, "right"),
            },
            "update_expression" => NodeKind::Update,
            "ternary_expression" => NodeKind::Conditional {
                consequent: self.boxed_field(node, "consequence"),
                alternate: self.boxed_field(node, "alternative"),
            },
            "new_expression" => NodeKind::New {
                callee: self.boxed_field(node, "constructor"),
                arguments: self.lower_arguments(node),
            },
            "call_expression" => NodeKind::Call {
                callee: self.boxed_field(node, "function"),
                arguments: self.lower_arguments(node),
            },
            "member_expression" => NodeKind::Member {
                object: self.boxed_field(node, "object"),
                property: node
                    .child_by_field_name("property")
                    .map(|property| self.text(property).to_string()),
            },
            "subscript_expression" => NodeKind::Member {
                object: self.boxed_field(node, "object"),
                property: node
                    .child_by_field_name("index")
                    .and_then(|index| self.literal_key(index)),
            },
            "identifier" | "property_identifier" | "shorthand_property_identifier" => {
                NodeKind::Identifier {
                    name: self.text(node).to_string(),
                }
            }
            "string" | "number" => NodeKind::Literal {
                value: self.literal_key(node),
            },
            "true" | "false" | "null" | "undefined" | "regex" | "template_string" => {
                NodeKind::Literal { value: None }
            }
            other => NodeKind::Unsupported {
                kind: other.to_string(),
                children: self.lower_children(node),
            },
        };

        Some(Node::new(kind, range))
    }

    fn lower_loop(&self, node: TsNode, kind: LoopKind) -> NodeKind {
        NodeKind::Loop {
            kind,
            body: self.boxed_field(node, "body"),
        }
    }

    fn lower_arguments(&self, node: TsNode) -> Vec<Node> {
        match node.child_by_field_name("arguments") {
            Some(arguments) if arguments.kind() == "arguments" => self.lower_children(arguments),
            _ => Vec::new(),
        }
    }

    fn lower_declarator(&self, declarator: TsNode) -> VariableDeclarator {
        let name = declarator
            .child_by_field_name("name")
            .filter(|name| name.kind() == "identifier")
            .map(|name| self.text(name).to_string());

        VariableDeclarator {
            name,
            init: self.field(declarator, "value"),
            range: Self::range(declarator),
        }
    }

    fn lower_properties(&self, object: TsNode) -> Vec<Property> {
        let mut cursor = object.walk();
        object
            .named_children(&mut cursor)
            .filter_map(|entry| {
                let range = Self::range(entry);
                match entry.kind() {
                    "pair" => {
                        let key = entry
                            .child_by_field_name("key")
                            .and_then(|key| self.property_key(key));
                        let value = self.field(entry, "value")?;
                        Some(Property { key, value, range })
                    }
                    "shorthand_property_identifier" => {
                        let name = self.text(entry).to_string();
                        Some(Property {
                            key: Some(name.clone()),
                            value: Node::identifier(name, range),
                            range,
                        })
                    }
                    "method_definition" => Some(Property {
                        key: entry
                            .child_by_field_name("name")
                            .and_then(|key| self.property_key(key)),
                        value: self.method_value(entry),
                        range,
                    }),
                    "spread_element" => Some(Property {
                        key: None,
                        value: self.first_child(entry)?,
                        range,
                    }),
                    _ => None,
                }
            })
            .collect()
    }

    fn lower_class_body(&self, class: TsNode) -> Vec<ClassMember> {
        let Some(body) = class.child_by_field_name("body") else {
            return Vec::new();
        };

        let mut cursor = body.walk();
        body.named_children(&mut cursor)
            .filter_map(|member| {
                let range = Self::range(member);
                match member.kind() {
                    "method_definition" => Some(ClassMember {
                        name: member
                            .child_by_field_name("name")
                            .and_then(|name| self.property_key(name)),
                        is_static: has_static_keyword(member),
                        value: Some(self.method_value(member)),
                        range,
                    }),
                    "field_definition" => Some(ClassMember {
                        name: member
                            .child_by_field_name("property")
                            .and_then(|name| self.property_key(name)),
                        is_static: has_static_keyword(member),
                        value: self.field(member, "value"),
                        range,
                    }),
                    "class_static_block" => Some(ClassMember {
                        name: None,
                        is_static: true,
                        value: self.lower(member),
                        range,
                    }),
                    _ => None,
                }
            })
            .collect()
    }

    fn method_value(&self, method: TsNode) -> Node {
        Node::new(
            NodeKind::FunctionExpression {
                name: None,
                body: self.boxed_field(method, "body"),
            },
            Self::range(method),
        )
    }

    fn name_field(&self, node: TsNode, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|name| self.text(name).to_string())
    }

    /// Name of an object or class key; computed keys only count when literal
    fn property_key(&self, key: TsNode) -> Option<String> {
        match key.kind() {
            "property_identifier" | "private_property_identifier" | "identifier" => {
                Some(self.text(key).to_string())
            }
            "string" | "number" => self.literal_key(key),
            "computed_property_name" => {
                let mut cursor = key.walk();
                let inner = key.named_children(&mut cursor).next()?;
                self.literal_key(inner)
            }
            _ => None,
        }
    }

    fn literal_key(&self, node: TsNode) -> Option<String> {
        match node.kind() {
            "string" => Some(unquote(self.text(node)).to_string()),
            "number" => Some(self.text(node).to_string()),
            _ => None,
        }
    }
}

fn has_static_keyword(member: TsNode) -> bool {
    let mut cursor = member.walk();
    let found = member
        .children(&mut cursor)
        .any(|child| child.kind() == "static");
    found
}

fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'')), Some(close)) if open == close && text.len() >= 2 => {
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}

/// Collect every comment node in source order
fn collect_comments(root: TsNode, code: &str) -> Vec<RawComment> {
    let mut comments = Vec::new();
    let mut cursor = root.walk();

    'walk: loop {
        let node = cursor.node();
        if node.kind() == "comment" {
            comments.push(raw_comment(node, code));
        } else if cursor.goto_first_child() {
            continue;
        }

        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    comments
}

fn raw_comment(node: TsNode, code: &str) -> RawComment {
    let raw = &code[node.byte_range()];
    let (style, text) = if let Some(body) = raw.strip_prefix("/*") {
        (
            CommentStyle::Block,
            body.strip_suffix("*/").unwrap_or(body),
        )
    } else {
        (
            CommentStyle::Line,
            raw.strip_prefix("//").unwrap_or(raw),
        )
    };

    let start = node.start_byte();
    let line_start = code[..start].rfind('\n').map_or(0, |i| i + 1);

    RawComment {
        style,
        text: text.to_string(),
        range: Range::from_points(node.start_position(), node.end_position()),
        prefix: code[line_start..start].to_string(),
    }
}

/// Follow the first child containing an error down to the error itself
fn first_error_range(root: TsNode) -> Option<Range> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(Range::from_points(node.start_position(), node.end_position()));
        }

        if !cursor.goto_first_child() {
            return None;
        }
        while !cursor.node().has_error() {
            if !cursor.goto_next_sibling() {
                return None;
            }
        }
    }
}
