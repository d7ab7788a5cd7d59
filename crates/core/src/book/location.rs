//! Section locations in the `book$<bookId>$<sectionId>` fragment scheme.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const PREFIX: &str = "book";
const SEPARATOR: char = '$';

/// Error type for fragment parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("fragment must start with `book$`")]
    MissingPrefix,

    #[error("expected 3 `$`-separated parts, found {0}")]
    WrongArity(usize),

    #[error("empty {0}")]
    EmptyPart(&'static str),
}

/// A navigable location: which book, which section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SectionLocation {
    pub book_id: String,
    pub section_id: String,
}

impl SectionLocation {
    pub fn new(book_id: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self { book_id: book_id.into(), section_id: section_id.into() }
    }

    /// Parse a fragment such as `#book$leo-cdp$ch01-sec02`. The leading `#`
    /// is optional.
    pub fn parse(fragment: &str) -> Result<Self, LocationError> {
        let fragment = fragment.trim().trim_start_matches('#');
        let parts: Vec<&str> = fragment.split(SEPARATOR).collect();

        if parts.first() != Some(&PREFIX) {
            return Err(LocationError::MissingPrefix);
        }
        if parts.len() != 3 {
            return Err(LocationError::WrongArity(parts.len()));
        }
        if parts[1].is_empty() {
            return Err(LocationError::EmptyPart("book id"));
        }
        if parts[2].is_empty() {
            return Err(LocationError::EmptyPart("section id"));
        }

        Ok(Self::new(parts[1], parts[2]))
    }

    /// Fragment form without the leading `#`.
    pub fn to_fragment(&self) -> String {
        format!("{PREFIX}{SEPARATOR}{}{SEPARATOR}{}", self.book_id, self.section_id)
    }
}

impl fmt::Display for SectionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fragment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_hash() {
        let location = SectionLocation::parse("#book$leo-cdp$ch01-sec02").unwrap();
        assert_eq!(location, SectionLocation::new("leo-cdp", "ch01-sec02"));
    }

    #[test]
    fn test_parse_without_hash() {
        let location = SectionLocation::parse("book$leo-cdp$ch03-sec01").unwrap();
        assert_eq!(location.section_id, "ch03-sec01");
    }

    #[test]
    fn test_parse_wrong_prefix() {
        assert_eq!(SectionLocation::parse("#chapter$a$b"), Err(LocationError::MissingPrefix));
        assert_eq!(SectionLocation::parse(""), Err(LocationError::MissingPrefix));
    }

    #[test]
    fn test_parse_wrong_arity() {
        assert_eq!(SectionLocation::parse("book$leo-cdp"), Err(LocationError::WrongArity(2)));
        assert_eq!(SectionLocation::parse("book$a$b$c"), Err(LocationError::WrongArity(4)));
    }

    #[test]
    fn test_parse_empty_parts() {
        assert_eq!(SectionLocation::parse("book$$ch01"), Err(LocationError::EmptyPart("book id")));
        assert_eq!(SectionLocation::parse("book$leo$"), Err(LocationError::EmptyPart("section id")));
    }

    #[test]
    fn test_to_fragment() {
        let location = SectionLocation::new("leo-cdp", "ch01-sec01");
        assert_eq!(location.to_fragment(), "book$leo-cdp$ch01-sec01");
        assert_eq!(location.to_string(), "book$leo-cdp$ch01-sec01");
    }
}
