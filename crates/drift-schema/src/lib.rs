//! Schema model and snapshot types for the drift migration planner.
//!
//! This crate holds the two trees the planner diffs:
//!
//! - the **desired model** ([`model::SchemaSet`]): an immutable tree of
//!   schemas, domains, tables, columns and constraints, loaded once from a
//!   declarative document and never mutated afterwards;
//! - the **actual-state snapshot** ([`snapshot::Snapshot`]): the result of
//!   introspecting a live database, structurally mirroring the desired model.
//!
//! Snapshot records carry no bookkeeping state; which actual objects have
//! been matched ("claimed") during a diff run is tracked externally by the
//! planner, so copying snapshot records is always safe.
//!
//! Document parsing lives in [`document`]: JSON per the declarative format,
//! with `$ref` path resolution and fail-fast validation. No partially-valid
//! model is ever returned.

pub mod document;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod types;

pub use document::{load_file, load_str, validate};
pub use error::{Result, SchemaError};
pub use model::{
    Column, ColumnType, Constraint, ConstraintKind, Domain, DomainRef, ForeignKeyRef, RefAction,
    ResolvedType, Schema, SchemaSet, Table, TableConstraint, TypeSpec,
};
pub use snapshot::{ColumnState, ConstraintState, DomainState, SchemaState, Snapshot, TableState};
pub use types::BaseType;
