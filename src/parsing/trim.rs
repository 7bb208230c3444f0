//! Comment trimmer
//!
//! Two margin conventions are normalized to the same text:
//!
//! ```text
//! /**
//!  * asterisk box
//!  */
//!
//! /**
//!     indentation
//! */
//! ```
//!
//! Margins are measured in columns, so tabs are expanded first.

use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_TAB_WIDTH: usize = 4;

/// `* `, ` *`, or up to three spaces, then one optional space
static COMMENT_MARGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\* | \*| ? ? ?)? ?").expect("Invalid regex"));

/// Replace tabs with spaces up to the next multiple of `tab_width`.
///
/// Columns are counted per line in characters.
pub fn expand_tabs(text: &str, tab_width: usize) -> String {
    let width = tab_width.max(1);
    let mut output = String::with_capacity(text.len());
    let mut column = 0;

    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = width - column % width;
                output.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' => {
                output.push(ch);
                column = 0;
            }
            _ => {
                output.push(ch);
                column += 1;
            }
        }
    }
    output
}

/// Strip up to `prefix_width` leading whitespace characters, then the comment margin
fn strip_margin(line: &str, prefix_width: usize) -> &str {
    let indent: usize = line
        .chars()
        .take(prefix_width)
        .take_while(|c| c.is_whitespace())
        .map(char::len_utf8)
        .sum();
    let line = &line[indent..];

    match COMMENT_MARGIN.find(line) {
        Some(margin) => &line[margin.end()..],
        None => line,
    }
}

/// Apply the per-line margin stage to every line of `text`
pub fn trim_margins(text: &str, prefix_width: usize) -> String {
    text.split('\n')
        .map(|line| strip_margin(line, prefix_width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalize a raw documentation comment body.
///
/// `text` is the comment without its `/*` and `*/` delimiters, so it starts
/// with the `*` doc marker. `prefix` is whatever preceded the opener on its
/// line; its width bounds how much indentation later lines lose. Every
/// retained line is right-trimmed and ends with `\n`.
pub fn trim_comment(text: &str, prefix: &str, tab_width: usize) -> String {
    let expanded = expand_tabs(text, tab_width);
    let prefix_width = expand_tabs(prefix, tab_width).chars().count();

    let mut parts = expanded.split('\n');
    let first_line = parts.next().unwrap_or_default();
    let mut marker = first_line.chars();
    marker.next();
    let first = marker.as_str().trim_start();

    let mut lines: Vec<&str> = Vec::new();
    if !first.is_empty() {
        lines.push(first);
    }
    lines.extend(parts.map(|line| strip_margin(line, prefix_width)));

    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    lines
        .iter()
        .map(|line| format!("{}\n", line.trim_end()))
        .collect()
}
