//! The main library module for scopedoc

pub mod config;
pub mod error;
pub mod extract;
pub mod io;
pub mod parsing;
pub mod syntax;
pub mod types;

// Explicit exports for better API clarity
pub use config::Settings;
pub use error::{ExtractError, ExtractResult, ParseError, ParseResult};
pub use extract::{DocExtractor, ExtractOutput, ParseOptions, parse_files, parse_module};
pub use parsing::{DocNode, Document, ScopeTree, TagRegistry};
pub use types::{DocumentId, Range, ScopeId};
