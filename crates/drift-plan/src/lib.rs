//! Declarative schema migration planning.
//!
//! Diffs a desired relational schema against a snapshot of what a live
//! database actually contains and produces an ordered, dependency-safe
//! migration script in three phases: loosening changes before install,
//! creations at install, tightening and destructive changes after install.
//!
//! ```
//! use drift_plan::{write_script, Planner};
//! use drift_schema::{BaseType, Column, Schema, SchemaSet, Snapshot, Table, TypeSpec};
//!
//! let desired = SchemaSet::new().schema(
//!     Schema::new("shop").table(
//!         Table::new("users").column(Column::new("id", TypeSpec::new(BaseType::BigInt))),
//!     ),
//! );
//!
//! let plan = Planner::new().plan(&Snapshot::new(), &desired).unwrap();
//! let script = write_script(&plan);
//! assert!(script.contains("CREATE TABLE \"shop\".\"users\""));
//! ```

pub mod builders;
pub mod claims;
pub mod comparator;
pub mod config;
pub mod defaults;
pub mod error;
pub mod matcher;
pub mod planner;
pub mod scheduler;
pub mod script;

pub use builders::Phased;
pub use claims::{ClaimSet, ObjectKind};
pub use comparator::{ColumnComparator, DomainComparator, NamePair, TableComparator};
pub use config::MatchConfig;
pub use defaults::DefaultRegistry;
pub use error::{PlanError, Result};
pub use matcher::{MatchOutcome, Matcher};
pub use planner::{Plan, Planner};
pub use scheduler::schedule;
pub use script::write_script;
