//! Custom element name validation.

use std::fmt;

use crate::error::{IgnitionError, Result};

/// Names the HTML standard reserves for SVG and MathML elements.
const RESERVED: [&str; 8] = [
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// A validated custom element name.
///
/// Only lowercase ASCII letters, digits, `.`, `_` and `-` are accepted, so a
/// `TagName` can be written into markup without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    pub fn parse(tag: &str) -> Result<Self> {
        let invalid = |reason| IgnitionError::RenderValidation {
            tag: tag.to_string(),
            reason,
        };

        match tag.chars().next() {
            None => return Err(invalid("name is empty")),
            Some(c) if !c.is_ascii_lowercase() => {
                return Err(invalid("name must start with a lowercase ASCII letter"));
            }
            Some(_) => {}
        }
        if !tag.contains('-') {
            return Err(invalid("name must contain a hyphen"));
        }
        if !tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'))
        {
            return Err(invalid(
                "name may only contain lowercase ASCII letters, digits, '-', '.' and '_'",
            ));
        }
        if RESERVED.contains(&tag) {
            return Err(invalid("name is reserved by SVG or MathML"));
        }

        Ok(Self(tag.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
