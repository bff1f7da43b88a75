//! Named-object references used for statement ordering.

use serde::{Deserialize, Serialize};

/// A reference to a named schema object that must exist before a statement
/// can safely run: a schema, an object within it, and optionally a field of
/// that object (a table column).
///
/// Names are lowercased on construction so that dependency matching is
/// case-insensitive, like object matching elsewhere in the planner.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Schema name. Empty for unqualified references.
    pub schema: String,
    /// Object (table or domain) name. Empty for schema-level references.
    pub object: String,
    /// Field (column) name, if the reference is field-level.
    pub field: Option<String>,
}

impl Dependency {
    /// A dependency on a schema existing.
    #[must_use]
    pub fn on_schema(schema: &str) -> Self {
        Self {
            schema: schema.to_ascii_lowercase(),
            object: String::new(),
            field: None,
        }
    }

    /// A dependency on an object (table or domain) existing.
    #[must_use]
    pub fn on_object(schema: &str, object: &str) -> Self {
        Self {
            schema: schema.to_ascii_lowercase(),
            object: object.to_ascii_lowercase(),
            field: None,
        }
    }

    /// A dependency on a specific field of an object existing.
    #[must_use]
    pub fn on_field(schema: &str, object: &str, field: &str) -> Self {
        Self {
            schema: schema.to_ascii_lowercase(),
            object: object.to_ascii_lowercase(),
            field: Some(field.to_ascii_lowercase()),
        }
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.object.is_empty(), &self.field) {
            (true, _) => write!(f, "{}", self.schema),
            (false, None) => write!(f, "{}.{}", self.schema, self.object),
            (false, Some(field)) => write!(f, "{}.{}.{}", self.schema, self.object, field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_equality() {
        assert_eq!(
            Dependency::on_object("Public", "Users"),
            Dependency::on_object("public", "users")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Dependency::on_schema("public").to_string(), "public");
        assert_eq!(
            Dependency::on_field("public", "users", "id").to_string(),
            "public.users.id"
        );
    }
}
