//! Actual-state snapshot types.
//!
//! These mirror the desired model structurally, but describe what an
//! introspection of the live database reported. One snapshot is consumed per
//! diff run. Records here are plain data; match bookkeeping is owned by the
//! planner, not stored in the snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{ColumnType, ConstraintKind, DomainRef, SchemaSet};
use crate::types::BaseType;

/// An introspected domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainState {
    /// Domain name.
    pub name: String,
    /// Underlying base type.
    pub base: BaseType,
    /// Length parameter.
    pub length: Option<u32>,
    /// Precision parameter.
    pub precision: Option<u32>,
    /// Whether values reject NULL.
    pub not_null: bool,
    /// Default expression text.
    pub default: Option<String>,
    /// Check expression text.
    pub check: Option<String>,
}

/// An introspected column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnState {
    /// Column name.
    pub name: String,
    /// Underlying base type (domains resolved by introspection).
    pub base: BaseType,
    /// Length parameter.
    pub length: Option<u32>,
    /// Precision parameter.
    pub precision: Option<u32>,
    /// Whether the column rejects NULL.
    pub not_null: bool,
    /// Default expression text.
    pub default: Option<String>,
    /// The domain typing this column, if any.
    pub domain: Option<DomainRef>,
}

/// An introspected constraint, with the columns it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintState {
    /// Constraint name.
    pub name: String,
    /// Covered columns.
    pub columns: Vec<String>,
    /// Kind and parameters.
    pub kind: ConstraintKind,
}

/// An introspected table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    /// Table name.
    pub name: String,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnState>,
    /// Table constraints.
    pub constraints: Vec<ConstraintState>,
}

impl TableState {
    /// Gets a column by name, case-insensitively.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnState> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Finds a foreign key constraint aimed at the given target, regardless
    /// of its name. `target_schema` empty means "same schema as the table".
    #[must_use]
    pub fn foreign_key_to(
        &self,
        target_schema: &str,
        target_table: &str,
        target_column: &str,
    ) -> Option<&ConstraintState> {
        self.constraints.iter().find(|c| match &c.kind {
            ConstraintKind::ForeignKey(fk) => {
                let schema_matches = match fk.schema.as_deref() {
                    Some(s) => s.eq_ignore_ascii_case(target_schema),
                    None => true,
                };
                schema_matches
                    && fk.table.eq_ignore_ascii_case(target_table)
                    && fk.column.eq_ignore_ascii_case(target_column)
            }
            _ => false,
        })
    }
}

/// An introspected schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaState {
    /// Schema name.
    pub name: String,
    /// Domains by name.
    pub domains: BTreeMap<String, DomainState>,
    /// Tables by name.
    pub tables: BTreeMap<String, TableState>,
}

impl SchemaState {
    /// Creates an empty schema state.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domains: BTreeMap::new(),
            tables: BTreeMap::new(),
        }
    }
}

/// The complete snapshot: one introspection result per diff run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schemas by name.
    pub schemas: BTreeMap<String, SchemaState>,
}

impl Snapshot {
    /// Creates an empty snapshot (a freshly created database).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a schema by name, case-insensitively.
    #[must_use]
    pub fn get_schema(&self, name: &str) -> Option<&SchemaState> {
        self.schemas
            .values()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Keeps only the named schema. Pairs with `SchemaSet::filtered`.
    #[must_use]
    pub fn filtered(mut self, name: &str) -> Self {
        self.schemas
            .retain(|_, s| s.name.eq_ignore_ascii_case(name));
        self
    }

    /// Derives the snapshot a conforming database would introspect to.
    ///
    /// This is the desired model viewed through the introspection lens:
    /// domain references resolved to their underlying types, primary key
    /// coverage folded into column nullability, column- and table-level
    /// constraints merged into one list. Planning a model against its own
    /// reflection yields an empty plan.
    pub fn reflect(set: &SchemaSet) -> Result<Self> {
        let mut snapshot = Self::new();
        for schema in &set.schemas {
            let mut state = SchemaState::new(schema.name.clone());

            for domain in schema.domains.values() {
                state.domains.insert(
                    domain.name.clone(),
                    DomainState {
                        name: domain.name.clone(),
                        base: domain.base,
                        length: domain.length,
                        precision: domain.precision,
                        not_null: domain.not_null,
                        default: domain.default.clone(),
                        check: domain.check.clone(),
                    },
                );
            }

            for table in schema.tables.values() {
                let mut columns = Vec::new();
                let mut constraints = Vec::new();

                for column in &table.columns {
                    let resolved = set.resolve_column(&schema.name, &table.name, column)?;
                    let not_null = set.effective_not_null(&schema.name, table, column)?;
                    let domain = match &column.ty {
                        ColumnType::Domain(dref) => Some(DomainRef {
                            schema: Some(
                                dref.schema
                                    .clone()
                                    .unwrap_or_else(|| schema.name.clone()),
                            ),
                            name: dref.name.clone(),
                        }),
                        ColumnType::Inline(_) => None,
                    };
                    columns.push(ColumnState {
                        name: column.name.clone(),
                        base: resolved.base,
                        length: resolved.length,
                        precision: resolved.precision,
                        not_null,
                        default: resolved.default,
                        domain,
                    });

                    for constraint in &column.constraints {
                        constraints.push(ConstraintState {
                            name: constraint.name.clone(),
                            columns: vec![column.name.clone()],
                            kind: constraint.kind.clone(),
                        });
                    }
                }

                for tc in &table.constraints {
                    constraints.push(ConstraintState {
                        name: tc.constraint.name.clone(),
                        columns: tc.columns.clone(),
                        kind: tc.constraint.kind.clone(),
                    });
                }

                state.tables.insert(
                    table.name.clone(),
                    TableState {
                        name: table.name.clone(),
                        columns,
                        constraints,
                    },
                );
            }

            snapshot.schemas.insert(state.name.clone(), state);
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, Constraint, Domain, Schema, Table, TypeSpec};

    #[test]
    fn test_reflect_resolves_domains_and_pk() {
        let set = SchemaSet::new().schema(
            Schema::new("public")
                .domain(Domain::new("money", BaseType::Numeric).length(12).not_null())
                .table(
                    Table::new("prices")
                        .column(
                            Column::new("id", TypeSpec::new(BaseType::BigInt)).constraint(
                                Constraint {
                                    name: "prices_pkey".to_string(),
                                    kind: ConstraintKind::PrimaryKey,
                                },
                            ),
                        )
                        .column(Column::with_domain(
                            "amount",
                            DomainRef {
                                schema: None,
                                name: "money".to_string(),
                            },
                        )),
                ),
        );

        let snapshot = Snapshot::reflect(&set).unwrap();
        let table = snapshot
            .get_schema("public")
            .unwrap()
            .tables
            .get("prices")
            .unwrap();

        let id = table.get_column("id").unwrap();
        assert!(id.not_null); // implied by the primary key
        assert!(id.domain.is_none());

        let amount = table.get_column("amount").unwrap();
        assert_eq!(amount.base, BaseType::Numeric);
        assert_eq!(amount.length, Some(12));
        assert!(amount.not_null);
        assert_eq!(amount.domain.as_ref().unwrap().name, "money");

        assert_eq!(table.constraints.len(), 1);
        assert_eq!(table.constraints[0].name, "prices_pkey");
    }

    #[test]
    fn test_foreign_key_to_ignores_name() {
        let table = TableState {
            name: "orders".to_string(),
            columns: Vec::new(),
            constraints: vec![ConstraintState {
                name: "some_legacy_name".to_string(),
                columns: vec!["user_id".to_string()],
                kind: ConstraintKind::ForeignKey(crate::model::ForeignKeyRef {
                    schema: None,
                    table: "users".to_string(),
                    column: "id".to_string(),
                    on_delete: crate::model::RefAction::NoAction,
                    on_update: crate::model::RefAction::NoAction,
                }),
            }],
        };

        assert!(table.foreign_key_to("public", "users", "id").is_some());
        assert!(table.foreign_key_to("public", "users", "uuid").is_none());
    }
}
