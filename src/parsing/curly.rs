//! Balanced-brace scanning for `{Type}` annotations

use super::quote;

/// Split `text`, which starts with `{`, into the enclosed annotation and
/// the remainder after its matching `}`.
///
/// Nested braces are kept in the enclosed text. An unmatched `{` appends a
/// diagnostic to `errors` and yields two empty strings. Text that does not
/// start with `{` has no annotation and is returned whole as the remainder.
pub fn parse_curly(text: &str, errors: &mut Vec<String>) -> (String, String) {
    let Some(body) = text.strip_prefix('{') else {
        return (String::new(), text.to_string());
    };

    match closing_brace(body) {
        Some(close) => (body[..close].to_string(), body[close + 1..].to_string()),
        None => {
            errors.push(format!("Unmatched `{{` in {}", quote(text)));
            (String::new(), String::new())
        }
    }
}

/// Byte offset of the `}` closing the brace that `text` follows
fn closing_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(offset),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}
