//! The diff orchestrator.
//!
//! One `plan` call takes the actual snapshot and the desired model and
//! produces the three-phase migration plan: matching, statement synthesis,
//! then per-phase scheduling. The planner holds only configuration; all
//! per-run state lives in the matcher it spawns.

use drift_schema::{SchemaSet, Snapshot};
use drift_sql::Statement;
use tracing::info;

use crate::builders::{domain_statements, table_statements, Phased};
use crate::config::MatchConfig;
use crate::defaults::DefaultRegistry;
use crate::error::Result;
use crate::matcher::Matcher;
use crate::scheduler::schedule;

/// The ordered statements of one migration, split into phases.
#[derive(Debug, Default)]
pub struct Plan {
    /// Runs first: schema creation, renames, loosening.
    pub pre_install: Vec<Statement>,
    /// Runs second: object creation and additive changes.
    pub install: Vec<Statement>,
    /// Runs last: backfills, tightening, drops.
    pub after_install: Vec<Statement>,
}

impl Plan {
    /// True when no phase carries any statement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pre_install.is_empty() && self.install.is_empty() && self.after_install.is_empty()
    }

    /// Total statement count across all phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pre_install.len() + self.install.len() + self.after_install.len()
    }
}

/// Plans migrations from snapshot to desired model.
pub struct Planner {
    config: MatchConfig,
    defaults: DefaultRegistry,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    /// Creates a planner with default matching weights and the standard
    /// default-value registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MatchConfig::default(),
            defaults: DefaultRegistry::standard(),
        }
    }

    /// Creates a planner with explicit configuration.
    #[must_use]
    pub fn with_config(config: MatchConfig, defaults: DefaultRegistry) -> Self {
        Self { config, defaults }
    }

    /// Produces the migration plan that would bring a database in state
    /// `current` to the shape of `desired`.
    pub fn plan(&self, current: &Snapshot, desired: &SchemaSet) -> Result<Plan> {
        let mut phased = Phased::new();

        for schema in &desired.schemas {
            if current.get_schema(&schema.name).is_none() {
                phased.pre.push(Statement::CreateSchema {
                    name: schema.name.clone(),
                    if_not_exists: true,
                });
            }
        }

        let outcome = Matcher::new(&self.config, desired, current).run()?;
        for cmp in &outcome.domains {
            phased.merge(domain_statements(cmp, &self.defaults));
        }
        for cmp in &outcome.tables {
            phased.merge(table_statements(cmp, desired, &self.defaults)?);
        }

        let plan = Plan {
            pre_install: schedule(phased.pre),
            install: schedule(phased.install),
            after_install: schedule(phased.after),
        };
        info!(
            pre_install = plan.pre_install.len(),
            install = plan.install.len(),
            after_install = plan.after_install.len(),
            "planned migration"
        );
        Ok(plan)
    }
}
