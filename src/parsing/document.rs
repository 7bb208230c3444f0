//! Documentation records built from comment tags

use serde::{Deserialize, Serialize};

use super::author::Author;

/// One documented parameter from `@param` or `@params`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub param_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub variadic: bool,
}

/// Optional `{type}` followed by prose, used by `@returns` and `@throws`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedText {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub value_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub doc: Option<String>,
}

/// Boolean markers set by flag tags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocFlags {
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub constructor: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub deprecated: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub module: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub private: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub external: bool,
}

/// Parsed contents of one documentation comment
///
/// Tag handlers fill it in progressively; the dispatcher finalizes `doc` and
/// `js_type` once every block has been seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Explicit name from `@name`, `@module` or `@member`
    #[serde(skip)]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub doc_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub js_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub params: Vec<Param>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub returns: Option<TypedText>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub throws: Vec<TypedText>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub see: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub requires: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub contributors: Vec<Author>,
    #[serde(default)]
    pub doc: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
    #[serde(flatten)]
    pub flags: DocFlags,
    /// 1-based line of the comment opener, 0 when synthesized
    #[serde(skip_serializing_if = "is_zero", default)]
    pub line: u32,
    /// Claimed by an explicit binding or hiding tag
    #[serde(skip)]
    pub accounted: bool,
}

fn is_zero(line: &u32) -> bool {
    *line == 0
}

impl Document {
    pub fn new(line: u32) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    /// Hidden documents are accounted for but never shown in the tree
    pub fn is_hidden(&self) -> bool {
        self.flags.private || self.flags.external
    }
}
