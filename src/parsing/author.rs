//! `Name (url) <email>` author strings

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([^(<]*) ?)?(?:\(([^)]*)\))? ?(?:<([^>]*)>)?").expect("Invalid regex")
});

/// An author or contributor credit; every component is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
}

impl Author {
    pub fn parse(text: &str) -> Self {
        let Some(captures) = AUTHOR.captures(text) else {
            return Self {
                name: text.trim().to_string(),
                ..Self::default()
            };
        };

        Self {
            name: captures
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
            url: captures.get(2).map(|m| m.as_str().to_string()),
            email: captures.get(3).map(|m| m.as_str().to_string()),
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.name.is_empty() {
            parts.push(self.name.clone());
        }
        if let Some(url) = self.url.as_deref().filter(|url| !url.is_empty()) {
            parts.push(format!("({url})"));
        }
        if let Some(email) = self.email.as_deref().filter(|email| !email.is_empty()) {
            parts.push(format!("<{email}>"));
        }
        write!(f, "{}", parts.join(" "))
    }
}
