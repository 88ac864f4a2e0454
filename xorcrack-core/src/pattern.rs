// File:    pattern.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: The configurable `prefix{body}` flag pattern used to accept candidate plaintexts.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// Characters allowed between the braces of a flag.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyClass {
    /// Any character except a closing brace.
    #[default]
    Loose,
    /// ASCII letters, digits and underscore.
    Word,
}

impl BodyClass {
    /// Returns whether `c` may appear in a flag body.
    #[must_use]
    pub const fn accepts(self, c: char) -> bool {
        match self {
            Self::Loose => c != '}',
            Self::Word => c.is_ascii_alphanumeric() || c == '_',
        }
    }
}

/// A flag of the form `<prefix>{<body>}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlagPattern {
    /// The literal text before the opening brace.
    pub prefix: String,
    /// The character class the body must consist of.
    #[serde(default)]
    pub body: BodyClass,
}

impl Default for FlagPattern {
    fn default() -> Self {
        Self::new("crypto", BodyClass::Loose)
    }
}

impl FlagPattern {
    /// Creates a pattern from a prefix and a body class.
    #[must_use]
    pub fn new(prefix: impl Into<String>, body: BodyClass) -> Self {
        Self {
            prefix: prefix.into(),
            body,
        }
    }

    /// Finds the leftmost flag in `text`.
    ///
    /// The body must contain at least one character and be terminated by `}`.
    #[must_use]
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        let opener = format!("{}{{", self.prefix);
        text.match_indices(&opener).find_map(|(start, _)| {
            let body_start = start + opener.len();
            let rest = &text[body_start..];
            let body_len = rest
                .char_indices()
                .find(|&(_, c)| !self.body.accepts(c))
                .map_or(rest.len(), |(i, _)| i);
            (body_len > 0 && rest[body_len..].starts_with('}'))
                .then(|| &text[start..=body_start + body_len])
        })
    }
}

impl std::fmt::Display for FlagPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = match self.body {
            BodyClass::Loose => "[^}]+",
            BodyClass::Word => "[A-Za-z0-9_]+",
        };
        write!(f, "{}{{{body}}}", self.prefix)
    }
}
