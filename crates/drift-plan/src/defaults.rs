//! Default-value expression registry.
//!
//! Desired-schema documents may use logical names for column defaults
//! (`now`, `uuid`, ...) instead of spelling the SQL. The registry maps those
//! names to SQL expressions; anything it doesn't know passes through as
//! opaque SQL text. The registry is built once and passed explicitly into
//! the statement builders.

use std::collections::BTreeMap;

use drift_sql::Expr;

/// Maps logical default names to SQL expressions.
#[derive(Debug, Clone, Default)]
pub struct DefaultRegistry {
    generators: BTreeMap<String, String>,
}

impl DefaultRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the standard generator names.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("now", "CURRENT_TIMESTAMP");
        registry.register("today", "CURRENT_DATE");
        registry.register("uuid", "gen_random_uuid()");
        registry.register("true", "TRUE");
        registry.register("false", "FALSE");
        registry.register("null", "NULL");
        registry
    }

    /// Registers a generator, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, sql: impl Into<String>) {
        self.generators
            .insert(name.into().to_ascii_lowercase(), sql.into());
    }

    /// Resolves a default text to an expression: a registered generator's
    /// SQL, or the text itself as opaque SQL.
    #[must_use]
    pub fn resolve(&self, text: &str) -> Expr {
        match self.generators.get(&text.to_ascii_lowercase()) {
            Some(sql) => Expr::Literal(sql.clone()),
            None => Expr::Literal(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_generators() {
        let registry = DefaultRegistry::standard();
        assert_eq!(registry.resolve("now").render(), "CURRENT_TIMESTAMP");
        assert_eq!(registry.resolve("NOW").render(), "CURRENT_TIMESTAMP");
        assert_eq!(registry.resolve("uuid").render(), "gen_random_uuid()");
    }

    #[test]
    fn test_unknown_text_passes_through() {
        let registry = DefaultRegistry::standard();
        assert_eq!(registry.resolve("0").render(), "0");
        assert_eq!(registry.resolve("'pending'").render(), "'pending'");
    }

    #[test]
    fn test_registration_overrides() {
        let mut registry = DefaultRegistry::standard();
        registry.register("now", "clock_timestamp()");
        assert_eq!(registry.resolve("now").render(), "clock_timestamp()");
    }
}
