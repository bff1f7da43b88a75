//! Statement and expression model for the drift migration planner.
//!
//! A closed set of node kinds representing the SQL the planner can emit.
//! Every node is immutable once constructed and knows three things:
//!
//! - how to render itself to text (`render`, pure and deterministic);
//! - which named objects it requires (`depended_on`);
//! - for statements, which named objects it makes available once it has
//!   run (`solved`; only CREATE statements solve anything).
//!
//! `render`, `depended_on` and `solved` are exhaustive matches over the node
//! kinds, so adding a kind without deciding its dependencies is a compile
//! error rather than a silent empty list.

pub mod dependency;
pub mod expr;
pub mod statement;

pub use dependency::Dependency;
pub use expr::{BinaryOp, ColumnRef, Expr, ObjectName, UnaryOp};
pub use statement::{
    ColumnChange, ColumnDef, ColumnSqlType, ConstraintDef, ConstraintSql, DomainAction, DomainDef,
    Select, Statement, TableAction, TypeDef,
};

/// Quotes an SQL identifier.
#[must_use]
pub fn quote(name: &str) -> String {
    format!("\"{}\"", name)
}
