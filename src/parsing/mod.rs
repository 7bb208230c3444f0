//! Documentation extraction stages
//!
//! The stages run in a fixed order, each consuming the previous one's output:
//! [`scanner`] → [`locator`] → [`trim`] → [`dispatch`] → [`organize`].

pub mod author;
pub mod curly;
pub mod dispatch;
pub mod document;
pub mod locator;
pub mod organize;
pub mod scanner;
pub mod scope;
pub mod tags;
pub mod trim;

use serde::Serialize;

use crate::types::Range;

pub use author::Author;
pub use curly::parse_curly;
pub use dispatch::{Binding, DocumentScope, DocumentSet, Orphan, OrphanReason, parse_document};
pub use document::{DocFlags, Document, Param, TypedText};
pub use locator::{LocatedComment, is_doc_comment, locate};
pub use organize::{DocNode, OrganizeOptions, organize};
pub use scanner::{DeclarationEvent, DeclarationScanner, ScanOutput, scan};
pub use scope::{ScopeNode, ScopeTree};
pub use tags::{TagContext, TagHandler, TagRegistry, default_registry};
pub use trim::{DEFAULT_TAB_WIDTH, expand_tabs, trim_comment, trim_margins};

/// A non-fatal problem found outside any single document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
}

impl Diagnostic {
    pub fn new(range: Range, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.range.start_line, self.range.start_column, self.message
        )
    }
}

/// Quote `text` the way JSON does, for diagnostics
pub(crate) fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("{text:?}"))
}
