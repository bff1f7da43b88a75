//! Tunable matching parameters.
//!
//! The scoring constants the fuzzy matcher uses were inherited behavior;
//! they live here as plain configuration rather than hard-coded literals so
//! callers can tighten or loosen matching without touching the algorithm.

/// Weights and thresholds for fuzzy object matching.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// The top candidate is accepted when its score strictly exceeds
    /// `dominance` times the runner-up's score.
    pub dominance: i64,
    /// Domain score per usage site matching on (schema, table, column).
    pub domain_same_schema_usage: i64,
    /// Domain score per usage site matching on (table, column) only.
    pub domain_cross_schema_usage: i64,
    /// Column score for an identical resolved base type.
    pub column_type_weight: i64,
    /// Column score for an identical length parameter.
    pub column_length_weight: i64,
    /// Column score for identical nullability.
    pub column_not_null_weight: i64,
    /// Column score per overlapping constraint signature.
    pub column_constraint_weight: i64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            dominance: 2,
            domain_same_schema_usage: 2,
            domain_cross_schema_usage: 1,
            column_type_weight: 2,
            column_length_weight: 1,
            column_not_null_weight: 1,
            column_constraint_weight: 2,
        }
    }
}
