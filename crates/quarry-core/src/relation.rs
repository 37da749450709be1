//! Relation keys used when scanning related rows.

use std::fmt;

use crate::error::{Error, Result};

/// A `field:attribute` pair linking a related row to its parent.
///
/// `field` is the column on the related table and `attribute` the attribute
/// of the parent that holds the matching value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationKey {
    /// Column name on the related table.
    pub field: String,
    /// Attribute name on the parent.
    pub attribute: String,
}

impl RelationKey {
    /// Parses `"field:attribute"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] unless the input splits into exactly
    /// two non-empty parts.
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [field, attribute] if !field.is_empty() && !attribute.is_empty() => Ok(Self {
                field: (*field).to_string(),
                attribute: (*attribute).to_string(),
            }),
            [_, _] => Err(Error::malformed(input, "relation key has an empty part")),
            _ => Err(Error::malformed(
                input,
                format!("expected 'field:attribute', found {} part(s)", parts.len()),
            )),
        }
    }
}

impl fmt::Display for RelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relation_key() {
        let key = RelationKey::parse("uid:UserId").unwrap();
        assert_eq!(key.field, "uid");
        assert_eq!(key.attribute, "UserId");
        assert_eq!(key.to_string(), "uid:UserId");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let key = RelationKey::parse(" uid : UserId ").unwrap();
        assert_eq!(key.field, "uid");
        assert_eq!(key.attribute, "UserId");
    }

    #[test]
    fn test_malformed_relation_keys() {
        for input in ["uid", "a:b:c", ":UserId", "uid:", ""] {
            assert!(
                matches!(RelationKey::parse(input), Err(Error::MalformedInput { .. })),
                "{input} should be malformed"
            );
        }
    }
}
