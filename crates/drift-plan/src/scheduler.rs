//! Dependency-aware statement ordering.
//!
//! Statements within one migration phase are reordered so that every
//! statement runs after whatever solves its dependencies. Statements never
//! move between phases; the scheduler runs once per phase.

use std::collections::BTreeSet;

use drift_sql::{Dependency, Statement};
use tracing::warn;

struct Bucket {
    deps: BTreeSet<Dependency>,
    statements: Vec<Statement>,
}

/// Orders `statements` so that dependencies are satisfied.
///
/// Statements are grouped into buckets by identical *effective* dependency
/// set, their dependencies intersected with everything some statement in
/// the input can solve. Dependencies on objects nothing here creates (they
/// already exist in the database) are dropped up front, so such statements
/// schedule immediately in their original order.
///
/// The fixpoint loop extracts every bucket whose set is empty, removes what
/// the extracted statements solve from the remaining buckets, and repeats.
/// Buckets that never empty (cyclic references) are appended at the end in
/// their original order; the cycle is logged, not treated as fatal, so that
/// legitimately self-referential schemas still produce a script.
#[must_use]
pub fn schedule(statements: Vec<Statement>) -> Vec<Statement> {
    let solvable: BTreeSet<Dependency> = statements
        .iter()
        .flat_map(Statement::solved)
        .collect();

    let mut buckets: Vec<Bucket> = Vec::new();
    for statement in statements {
        let deps: BTreeSet<Dependency> = statement
            .depended_on()
            .into_iter()
            .filter(|d| solvable.contains(d))
            .collect();
        match buckets.iter_mut().find(|b| b.deps == deps) {
            Some(bucket) => bucket.statements.push(statement),
            None => buckets.push(Bucket {
                deps,
                statements: vec![statement],
            }),
        }
    }

    let mut output = Vec::new();
    loop {
        let mut extracted = Vec::new();
        let mut remaining = Vec::new();
        for bucket in buckets {
            if bucket.deps.is_empty() {
                extracted.push(bucket);
            } else {
                remaining.push(bucket);
            }
        }
        buckets = remaining;

        if extracted.is_empty() {
            break;
        }

        let mut solved_now = BTreeSet::new();
        for bucket in extracted {
            for statement in bucket.statements {
                solved_now.extend(statement.solved());
                output.push(statement);
            }
        }
        for bucket in &mut buckets {
            bucket.deps.retain(|d| !solved_now.contains(d));
        }
    }

    for bucket in buckets {
        let unresolved: Vec<String> = bucket.deps.iter().map(Dependency::to_string).collect();
        warn!(
            dependencies = %unresolved.join(", "),
            "statement group has unresolvable dependencies (cycle?); emitting at end of phase"
        );
        output.extend(bucket.statements);
    }

    output
}
