//! Comment locator
//!
//! Pairs each documentation comment with the declarations around it. The
//! declaration list comes out of the scanner in source order, so a lower-bound
//! search on start lines finds the first declaration at or after the comment.

use super::scanner::DeclarationEvent;
use crate::syntax::{CommentStyle, RawComment};

/// A documentation comment with its neighbouring declarations
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedComment<'c> {
    pub comment: &'c RawComment,
    /// Index of the last declaration starting before the comment's line.
    ///
    /// Informational only: binding uses `after`. Kept for callers that
    /// inspect a comment's surroundings.
    pub before: Option<usize>,
    /// Index of the first declaration starting on or after the comment's line
    pub after: Option<usize>,
}

impl LocatedComment<'_> {
    pub fn line(&self) -> u32 {
        self.comment.range.start_line
    }
}

/// Block comments whose body starts with the `*` marker, `/**/` excluded
pub fn is_doc_comment(comment: &RawComment) -> bool {
    comment.style == CommentStyle::Block && comment.text.starts_with('*')
}

/// Locate every documentation comment against `events`
pub fn locate<'c>(comments: &'c [RawComment], events: &[DeclarationEvent]) -> Vec<LocatedComment<'c>> {
    debug_assert!(
        events.windows(2).all(|pair| pair[0].line() <= pair[1].line()),
        "declaration events must be in source order"
    );

    comments
        .iter()
        .filter(|comment| is_doc_comment(comment))
        .map(|comment| {
            let line = comment.range.start_line;
            let index = events.partition_point(|event| event.line() < line);
            LocatedComment {
                comment,
                before: index.checked_sub(1),
                after: (index < events.len()).then_some(index),
            }
        })
        .collect()
}
