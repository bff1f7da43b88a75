//! Statement synthesis from comparators.
//!
//! Each comparator is turned into phase-tagged statements. Phase placement
//! follows one rule of thumb: anything that loosens the schema or frees a
//! name runs before install, creations run at install, anything that
//! tightens the schema or needs data in place runs after install.
//!
//! Name discipline matters here. Renames run early in their phase, so
//! pre-install statements address objects by their current (actual) names
//! while install and after-install statements use the desired names.

use drift_schema::{
    Column, ColumnState, ColumnType, Constraint, ConstraintKind, Domain, SchemaSet, Table,
    TableState,
};
use drift_sql::{
    ColumnChange, ColumnDef, ColumnRef, ColumnSqlType, ConstraintDef, ConstraintSql, DomainAction,
    DomainDef, Expr, ObjectName, Select, Statement, TableAction, TypeDef,
};
use tracing::warn;

use crate::comparator::{ColumnComparator, DomainComparator, TableComparator};
use crate::defaults::DefaultRegistry;
use crate::error::Result;

/// Statements produced for one comparator, tagged by phase.
#[derive(Debug, Default)]
pub struct Phased {
    /// Runs before install: renames, drops of constraints, loosening.
    pub pre: Vec<Statement>,
    /// Runs at install: creations, additive table changes.
    pub install: Vec<Statement>,
    /// Runs after install: tightening, backfills, drops of objects.
    pub after: Vec<Statement>,
}

impl Phased {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends another set, phase by phase.
    pub fn merge(&mut self, other: Phased) {
        self.pre.extend(other.pre);
        self.install.extend(other.install);
        self.after.extend(other.after);
    }
}

/// Builds the statements for one domain comparator.
pub fn domain_statements(cmp: &DomainComparator, defaults: &DefaultRegistry) -> Phased {
    let mut out = Phased::new();
    match (&cmp.old, &cmp.new) {
        (None, Some(domain)) => {
            out.pre.push(Statement::CreateDomain {
                name: ObjectName::qualified(&cmp.schema, &domain.name),
                def: DomainDef {
                    ty: TypeDef::new(domain.base, domain.length, domain.precision),
                    not_null: domain.not_null,
                    default: domain.default.as_deref().map(|d| defaults.resolve(d)),
                    check: domain.check.clone().map(Expr::Literal),
                },
            });
        }
        (Some(_), None) => {
            out.after.push(Statement::DropDomain {
                name: ObjectName::qualified(&cmp.old_schema, &cmp.names.actual),
                if_exists: false,
            });
        }
        (Some(old), Some(domain)) => {
            alter_domain(cmp, old, domain, defaults, &mut out);
        }
        (None, None) => {}
    }
    out
}

fn alter_domain(
    cmp: &DomainComparator,
    old: &drift_schema::DomainState,
    domain: &Domain,
    defaults: &DefaultRegistry,
    out: &mut Phased,
) {
    // Rename first so every later clause can address the desired name.
    let mut name = ObjectName::qualified(&cmp.old_schema, &cmp.names.actual);
    if cmp.names.is_rename() {
        out.pre.push(Statement::AlterDomain {
            name: name.clone(),
            action: DomainAction::RenameTo(cmp.names.desired.clone()),
        });
        name = ObjectName::qualified(&cmp.old_schema, &cmp.names.desired);
    }
    if !cmp.old_schema.eq_ignore_ascii_case(&cmp.schema) {
        out.pre.push(Statement::AlterDomain {
            name: name.clone(),
            action: DomainAction::SetSchema(cmp.schema.clone()),
        });
        name = ObjectName::qualified(&cmp.schema, &name.name);
    }

    if old.base != domain.base || old.length != domain.length || old.precision != domain.precision
    {
        // There is no ALTER DOMAIN ... TYPE; changing the underlying type
        // needs a manual drop-and-recreate with column rewrites.
        warn!(
            domain = %name.render(),
            "domain base type differs from the desired one; not altered"
        );
    }
    if old.check != domain.check {
        warn!(
            domain = %name.render(),
            "domain check expression differs from the desired one; not altered"
        );
    }

    if old.default != domain.default {
        match &domain.default {
            Some(default) => out.pre.push(Statement::AlterDomain {
                name: name.clone(),
                action: DomainAction::SetDefault(defaults.resolve(default)),
            }),
            None => out.pre.push(Statement::AlterDomain {
                name: name.clone(),
                action: DomainAction::DropDefault,
            }),
        }
    }

    match (old.not_null, domain.not_null) {
        (false, true) => out.after.push(Statement::AlterDomain {
            name,
            action: DomainAction::SetNotNull,
        }),
        (true, false) => out.pre.push(Statement::AlterDomain {
            name,
            action: DomainAction::DropNotNull,
        }),
        _ => {}
    }
}

/// Builds the statements for one table comparator.
pub fn table_statements(
    cmp: &TableComparator,
    set: &SchemaSet,
    defaults: &DefaultRegistry,
) -> Result<Phased> {
    let mut out = Phased::new();
    match (&cmp.old, &cmp.new) {
        (None, Some(table)) => {
            out.install
                .push(create_table(&cmp.schema, table, set, defaults)?);
        }
        (Some(_), None) => {
            out.after.push(Statement::DropTable {
                name: ObjectName::qualified(&cmp.old_schema, &cmp.names.actual),
                if_exists: false,
            });
        }
        (Some(old), Some(table)) => {
            alter_table(cmp, old, table, set, defaults, &mut out)?;
        }
        (None, None) => {}
    }
    Ok(out)
}

/// Synthesizes a CREATE TABLE from the desired model: columns in source
/// order, column-level constraints first, then table-level ones.
fn create_table(
    schema: &str,
    table: &Table,
    set: &SchemaSet,
    defaults: &DefaultRegistry,
) -> Result<Statement> {
    let mut columns = Vec::new();
    let mut constraints = Vec::new();

    for column in &table.columns {
        columns.push(column_def(schema, column, defaults));
        for constraint in &column.constraints {
            constraints.push(constraint_def(
                schema,
                constraint,
                vec![column.name.clone()],
            ));
        }
    }
    for tc in &table.constraints {
        constraints.push(constraint_def(schema, &tc.constraint, tc.columns.clone()));
    }

    // Resolution errors (unknown domains) surface here rather than at
    // render time.
    for column in &table.columns {
        set.resolve_column(schema, &table.name, column)?;
    }

    Ok(Statement::CreateTable {
        name: ObjectName::qualified(schema, &table.name),
        columns,
        constraints,
        if_not_exists: false,
    })
}

fn column_def(schema: &str, column: &Column, defaults: &DefaultRegistry) -> ColumnDef {
    match &column.ty {
        ColumnType::Inline(spec) => ColumnDef {
            name: column.name.clone(),
            ty: ColumnSqlType::Type(TypeDef::new(spec.base, spec.length, spec.precision)),
            not_null: spec.not_null,
            default: spec.default.as_deref().map(|d| defaults.resolve(d)),
            check: spec.check.clone().map(Expr::Literal),
        },
        ColumnType::Domain(dref) => ColumnDef {
            name: column.name.clone(),
            ty: ColumnSqlType::Domain(ObjectName::qualified(
                dref.schema.as_deref().unwrap_or(schema),
                &dref.name,
            )),
            not_null: false,
            default: None,
            check: None,
        },
    }
}

fn constraint_def(schema: &str, constraint: &Constraint, columns: Vec<String>) -> ConstraintDef {
    let kind = match &constraint.kind {
        ConstraintKind::PrimaryKey => ConstraintSql::PrimaryKey { columns },
        ConstraintKind::Unique => ConstraintSql::Unique { columns },
        ConstraintKind::ForeignKey(fk) => ConstraintSql::ForeignKey {
            columns,
            target: ObjectName::qualified(fk.schema.as_deref().unwrap_or(schema), &fk.table),
            target_columns: vec![fk.column.clone()],
            on_delete: fk.on_delete,
            on_update: fk.on_update,
        },
        ConstraintKind::Check { expr } => ConstraintSql::Check {
            expr: Expr::Literal(expr.clone()),
        },
    };
    ConstraintDef {
        name: constraint.name.clone(),
        kind,
    }
}

fn alter_table(
    cmp: &TableComparator,
    old: &TableState,
    table: &Table,
    set: &SchemaSet,
    defaults: &DefaultRegistry,
    out: &mut Phased,
) -> Result<()> {
    // Pre-install statements run before the rename and must use the actual
    // names; install and after-install statements use the desired ones.
    let old_name = ObjectName::qualified(&cmp.old_schema, &cmp.names.actual);
    let new_name = ObjectName::qualified(&cmp.schema, &cmp.names.desired);

    if cmp.names.is_rename() {
        out.install.push(Statement::AlterTable {
            name: ObjectName::qualified(&cmp.old_schema, &cmp.names.actual),
            action: TableAction::RenameTo(cmp.names.desired.clone()),
        });
    }
    if !cmp.old_schema.eq_ignore_ascii_case(&cmp.schema) {
        out.install.push(Statement::AlterTable {
            name: ObjectName::qualified(&cmp.old_schema, &cmp.names.desired),
            action: TableAction::SetSchema(cmp.schema.clone()),
        });
    }

    for column in &cmp.columns {
        column_statements(cmp, old, table, column, &old_name, &new_name, set, defaults, out)?;
    }

    constraint_statements(cmp, old, table, &old_name, &new_name, out);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn column_statements(
    cmp: &TableComparator,
    old_table: &TableState,
    table: &Table,
    column: &ColumnComparator,
    old_name: &ObjectName,
    new_name: &ObjectName,
    set: &SchemaSet,
    defaults: &DefaultRegistry,
    out: &mut Phased,
) -> Result<()> {
    match (&column.old, &column.new) {
        (None, Some(desired)) => {
            add_column(cmp, old_table, table, desired, new_name, set, defaults, out)?;
        }
        (Some(_), None) => {
            out.after.push(Statement::AlterTable {
                name: new_name.clone(),
                action: TableAction::DropColumn(column.names.actual.clone()),
            });
        }
        (Some(actual), Some(desired)) => {
            if column.names.is_rename() {
                out.install.push(Statement::AlterTable {
                    name: new_name.clone(),
                    action: TableAction::RenameColumn {
                        from: column.names.actual.clone(),
                        to: column.names.desired.clone(),
                    },
                });
            }
            alter_column(cmp, table, column, actual, desired, old_name, new_name, set, defaults, out)?;
        }
        (None, None) => {}
    }
    Ok(())
}

/// Adds a new column to an existing (and therefore possibly populated)
/// table. A required column with no default cannot be added NOT NULL
/// outright; it is added nullable, backfilled where a foreign key gives
/// the data a provenance, and only then tightened.
#[allow(clippy::too_many_arguments)]
fn add_column(
    cmp: &TableComparator,
    old_table: &TableState,
    table: &Table,
    desired: &Column,
    new_name: &ObjectName,
    set: &SchemaSet,
    defaults: &DefaultRegistry,
    out: &mut Phased,
) -> Result<()> {
    let resolved = set.resolve_column(&cmp.schema, &table.name, desired)?;
    let not_null = set.effective_not_null(&cmp.schema, table, desired)?;
    let mut def = column_def(&cmp.schema, desired, defaults);

    if not_null && resolved.default.is_none() {
        def.not_null = false;
        out.install.push(Statement::AlterTable {
            name: new_name.clone(),
            action: TableAction::AddColumn(def),
        });

        if let Some(backfill) = backfill_update(cmp, old_table, table, desired, new_name) {
            out.after.push(backfill);
        } else {
            warn!(
                table = %new_name.render(),
                column = %desired.name,
                "required column has no backfill provenance; SET NOT NULL may fail on existing rows"
            );
        }
        out.after.push(Statement::AlterTable {
            name: new_name.clone(),
            action: TableAction::AlterColumn {
                column: desired.name.clone(),
                change: ColumnChange::SetNotNull,
            },
        });
    } else {
        out.install.push(Statement::AlterTable {
            name: new_name.clone(),
            action: TableAction::AddColumn(def),
        });
    }
    Ok(())
}

/// Builds the backfill for a required column whose desired foreign key has
/// a counterpart in the actual table aimed at the same target. The actual
/// constraint's own column carries the values to migrate from.
fn backfill_update(
    cmp: &TableComparator,
    old_table: &TableState,
    table: &Table,
    desired: &Column,
    new_name: &ObjectName,
) -> Option<Statement> {
    let (_, fk) = table.foreign_key_of(&desired.name)?;
    let target_schema = fk.schema.as_deref().unwrap_or(&cmp.schema);
    let counterpart = old_table.foreign_key_to(target_schema, &fk.table, &fk.column)?;
    let old_fk_column = counterpart.columns.first()?;

    let target = ObjectName::qualified(target_schema, &fk.table);
    let subquery = Select {
        columns: vec![Expr::Column(ColumnRef::bare(&fk.column))],
        from: target,
        where_clause: Some(Expr::eq(
            Expr::Column(ColumnRef::bare(&fk.column)),
            Expr::Column(ColumnRef::scoped(new_name.clone(), old_fk_column)),
        )),
    };
    Some(Statement::Update {
        table: new_name.clone(),
        assignments: vec![(desired.name.clone(), Expr::Subquery(Box::new(subquery)))],
        where_clause: None,
    })
}

#[allow(clippy::too_many_arguments)]
fn alter_column(
    cmp: &TableComparator,
    table: &Table,
    column: &ColumnComparator,
    actual: &ColumnState,
    desired: &Column,
    old_name: &ObjectName,
    new_name: &ObjectName,
    set: &SchemaSet,
    defaults: &DefaultRegistry,
    out: &mut Phased,
) -> Result<()> {
    let resolved = set.resolve_column(&cmp.schema, &table.name, desired)?;
    let not_null = set.effective_not_null(&cmp.schema, table, desired)?;

    if actual.base != resolved.base
        || actual.length != resolved.length
        || actual.precision != resolved.precision
    {
        out.install.push(Statement::AlterTable {
            name: new_name.clone(),
            action: TableAction::AlterColumn {
                column: column.names.desired.clone(),
                change: ColumnChange::SetType(TypeDef::new(
                    resolved.base,
                    resolved.length,
                    resolved.precision,
                )),
            },
        });
    }

    if actual.default != resolved.default {
        let change = match &resolved.default {
            Some(default) => ColumnChange::SetDefault(defaults.resolve(default)),
            None => ColumnChange::DropDefault,
        };
        out.pre.push(Statement::AlterTable {
            name: old_name.clone(),
            action: TableAction::AlterColumn {
                column: column.names.actual.clone(),
                change,
            },
        });
    }

    match (actual.not_null, not_null) {
        (false, true) => out.after.push(Statement::AlterTable {
            name: new_name.clone(),
            action: TableAction::AlterColumn {
                column: column.names.desired.clone(),
                change: ColumnChange::SetNotNull,
            },
        }),
        (true, false) => out.pre.push(Statement::AlterTable {
            name: old_name.clone(),
            action: TableAction::AlterColumn {
                column: column.names.actual.clone(),
                change: ColumnChange::DropNotNull,
            },
        }),
        _ => {}
    }
    Ok(())
}

/// Diffs the constraint sets of a matched table. Constraints are compared
/// by signature (kind, target, covered columns), never by name, so a
/// legacy-named constraint with the right shape is left alone. Actual
/// column names are mapped through the column renames first.
fn constraint_statements(
    cmp: &TableComparator,
    old: &TableState,
    table: &Table,
    old_name: &ObjectName,
    new_name: &ObjectName,
    out: &mut Phased,
) {
    let rename_map: Vec<(&str, &str)> = cmp
        .columns
        .iter()
        .filter(|c| c.names.is_rename())
        .map(|c| (c.names.actual.as_str(), c.names.desired.as_str()))
        .collect();
    let mapped = |name: &str| -> String {
        rename_map
            .iter()
            .find(|(from, _)| from.eq_ignore_ascii_case(name))
            .map_or_else(|| name.to_string(), |(_, to)| (*to).to_string())
    };

    let mut desired: Vec<(String, Vec<String>, &ConstraintKind)> = Vec::new();
    for column in &table.columns {
        for constraint in &column.constraints {
            desired.push((
                constraint.name.clone(),
                vec![column.name.clone()],
                &constraint.kind,
            ));
        }
    }
    for tc in &table.constraints {
        desired.push((tc.constraint.name.clone(), tc.columns.clone(), &tc.constraint.kind));
    }

    let desired_signatures: Vec<String> = desired
        .iter()
        .map(|(_, columns, kind)| diff_signature(kind, columns, &cmp.schema))
        .collect();
    let actual_signatures: Vec<String> = old
        .constraints
        .iter()
        .map(|c| {
            let columns: Vec<String> = c.columns.iter().map(|n| mapped(n)).collect();
            diff_signature(&c.kind, &columns, &cmp.old_schema)
        })
        .collect();

    for (state, signature) in old.constraints.iter().zip(&actual_signatures) {
        if !desired_signatures.contains(signature) {
            out.pre.push(Statement::AlterTable {
                name: old_name.clone(),
                action: TableAction::DropConstraint(state.name.clone()),
            });
        }
    }
    for ((name, columns, kind), signature) in desired.iter().zip(&desired_signatures) {
        if !actual_signatures.contains(signature) {
            let constraint = Constraint {
                name: name.clone(),
                kind: (*kind).clone(),
            };
            out.after.push(Statement::AlterTable {
                name: new_name.clone(),
                action: TableAction::AddConstraint(constraint_def(
                    &cmp.schema,
                    &constraint,
                    columns.clone(),
                )),
            });
        }
    }
}

fn diff_signature(kind: &ConstraintKind, columns: &[String], default_schema: &str) -> String {
    let mut sorted: Vec<String> = columns.iter().map(|c| c.to_ascii_lowercase()).collect();
    sorted.sort();
    let head = match kind {
        ConstraintKind::PrimaryKey => "primary key".to_string(),
        ConstraintKind::Unique => "unique".to_string(),
        ConstraintKind::ForeignKey(fk) => format!(
            "foreign key {}.{}.{} {} {}",
            fk.schema
                .as_deref()
                .unwrap_or(default_schema)
                .to_ascii_lowercase(),
            fk.table.to_ascii_lowercase(),
            fk.column.to_ascii_lowercase(),
            fk.on_delete.to_sql(),
            fk.on_update.to_sql()
        ),
        ConstraintKind::Check { expr } => format!("check {}", expr.trim().to_ascii_lowercase()),
    };
    format!("{head} ({})", sorted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::NamePair;
    use drift_schema::{BaseType, ForeignKeyRef, RefAction, Schema, Snapshot, TypeSpec};

    fn users_table() -> Table {
        Table::new("users")
            .column(Column::new("id", TypeSpec::new(BaseType::BigInt)).constraint(Constraint {
                name: "users_pkey".to_string(),
                kind: ConstraintKind::PrimaryKey,
            }))
            .column(Column::new("name", TypeSpec::new(BaseType::Text)))
    }

    fn orders_desired() -> Table {
        Table::new("orders")
            .column(Column::new("id", TypeSpec::new(BaseType::BigInt)).constraint(Constraint {
                name: "orders_pkey".to_string(),
                kind: ConstraintKind::PrimaryKey,
            }))
            .column(
                Column::new("owner_id", TypeSpec::new(BaseType::BigInt).not_null()).constraint(
                    Constraint {
                        name: "orders_owner_id_fkey".to_string(),
                        kind: ConstraintKind::ForeignKey(ForeignKeyRef {
                            schema: None,
                            table: "users".to_string(),
                            column: "id".to_string(),
                            on_delete: RefAction::NoAction,
                            on_update: RefAction::NoAction,
                        }),
                    },
                ),
            )
    }

    fn desired_set(tables: Vec<Table>) -> SchemaSet {
        let mut schema = Schema::new("public");
        for table in tables {
            schema = schema.table(table);
        }
        SchemaSet::new().schema(schema)
    }

    fn exact_comparator(
        actual: TableState,
        desired: Table,
        columns: Vec<ColumnComparator>,
    ) -> TableComparator {
        TableComparator {
            old_schema: "public".to_string(),
            schema: "public".to_string(),
            names: NamePair::exact(&desired.name),
            old: Some(actual),
            new: Some(desired),
            columns,
        }
    }

    #[test]
    fn test_create_table_lands_in_install() {
        let set = desired_set(vec![orders_desired()]);
        let cmp = TableComparator {
            old_schema: "public".to_string(),
            schema: "public".to_string(),
            names: NamePair::created("orders"),
            old: None,
            new: Some(orders_desired()),
            columns: Vec::new(),
        };

        let out = table_statements(&cmp, &set, &DefaultRegistry::standard()).unwrap();
        assert!(out.pre.is_empty());
        assert!(out.after.is_empty());
        assert_eq!(out.install.len(), 1);

        let sql = out.install[0].render();
        assert!(sql.starts_with("CREATE TABLE \"public\".\"orders\""));
        assert!(sql.contains("CONSTRAINT \"orders_owner_id_fkey\" FOREIGN KEY"));
    }

    #[test]
    fn test_required_column_fixup_with_provenance() {
        // Actual orders table has a legacy user_id FK column; the desired
        // model adds a NOT NULL owner_id with the same FK target.
        let actual_model = Table::new("orders")
            .column(Column::new("id", TypeSpec::new(BaseType::BigInt)).constraint(Constraint {
                name: "orders_pkey".to_string(),
                kind: ConstraintKind::PrimaryKey,
            }))
            .column(Column::new("user_id", TypeSpec::new(BaseType::Integer)))
            .constraint(
                vec!["user_id".to_string()],
                Constraint {
                    name: "legacy_orders_user_fk".to_string(),
                    kind: ConstraintKind::ForeignKey(ForeignKeyRef {
                        schema: None,
                        table: "users".to_string(),
                        column: "id".to_string(),
                        on_delete: RefAction::NoAction,
                        on_update: RefAction::NoAction,
                    }),
                },
            );
        let snapshot =
            Snapshot::reflect(&desired_set(vec![users_table(), actual_model])).unwrap();
        let actual = snapshot
            .get_schema("public")
            .unwrap()
            .tables
            .get("orders")
            .unwrap()
            .clone();

        let desired = orders_desired();
        let set = desired_set(vec![users_table(), desired.clone()]);
        let columns = vec![
            ColumnComparator {
                names: NamePair::exact("id"),
                old: actual.get_column("id").cloned(),
                new: desired.get_column("id").cloned(),
            },
            ColumnComparator {
                names: NamePair::created("owner_id"),
                old: None,
                new: desired.get_column("owner_id").cloned(),
            },
            ColumnComparator {
                names: NamePair::deleted("user_id"),
                old: actual.get_column("user_id").cloned(),
                new: None,
            },
        ];
        let cmp = exact_comparator(actual, desired, columns);

        let out = table_statements(&cmp, &set, &DefaultRegistry::standard()).unwrap();

        // The add itself must be nullable.
        let adds: Vec<&Statement> = out
            .install
            .iter()
            .filter(|s| s.render().contains("ADD COLUMN"))
            .collect();
        assert_eq!(adds.len(), 1);
        assert_eq!(
            adds[0].render(),
            "ALTER TABLE \"public\".\"orders\" ADD COLUMN \"owner_id\" BIGINT"
        );

        // Backfill from the legacy FK column, then tighten, in that order.
        let after: Vec<String> = out.after.iter().map(Statement::render).collect();
        let backfill = after
            .iter()
            .position(|s| s.starts_with("UPDATE \"public\".\"orders\""))
            .expect("backfill missing");
        assert!(after[backfill].contains("\"public\".\"orders\".\"user_id\""));
        let tighten = after
            .iter()
            .position(|s| s.contains("ALTER COLUMN \"owner_id\" SET NOT NULL"))
            .expect("set not null missing");
        assert!(backfill < tighten);
    }

    #[test]
    fn test_required_column_without_provenance_still_tightens() {
        let actual =
            Snapshot::reflect(&desired_set(vec![users_table()])).unwrap();
        let actual_users = actual
            .get_schema("public")
            .unwrap()
            .tables
            .get("users")
            .unwrap()
            .clone();

        let desired = users_table().column(Column::new(
            "email",
            TypeSpec::new(BaseType::Varchar).length(320).not_null(),
        ));
        let set = desired_set(vec![desired.clone()]);
        let columns = vec![ColumnComparator {
            names: NamePair::created("email"),
            old: None,
            new: desired.get_column("email").cloned(),
        }];
        let cmp = exact_comparator(actual_users, desired, columns);

        let out = table_statements(&cmp, &set, &DefaultRegistry::standard()).unwrap();
        assert!(out.install.iter().all(|s| !s.render().contains("NOT NULL")));
        assert_eq!(out.after.len(), 1);
        assert!(out.after[0]
            .render()
            .contains("ALTER COLUMN \"email\" SET NOT NULL"));
    }

    #[test]
    fn test_loosened_nullability_runs_pre_install_on_old_names() {
        // Actual table "people" (NOT NULL name) matched to desired
        // "persons" where the column is nullable. The DROP NOT NULL runs
        // before the rename, so it must use the old table name.
        let mut actual_model = users_table();
        actual_model.name = "people".to_string();
        actual_model.columns[1] = Column::new("name", TypeSpec::new(BaseType::Text).not_null());
        let snapshot = Snapshot::reflect(&desired_set(vec![actual_model])).unwrap();
        let actual = snapshot
            .get_schema("public")
            .unwrap()
            .tables
            .get("people")
            .unwrap()
            .clone();

        let mut desired = users_table();
        desired.name = "persons".to_string();
        let set = desired_set(vec![desired.clone()]);
        let columns = vec![
            ColumnComparator {
                names: NamePair::exact("id"),
                old: actual.get_column("id").cloned(),
                new: desired.get_column("id").cloned(),
            },
            ColumnComparator {
                names: NamePair::exact("name"),
                old: actual.get_column("name").cloned(),
                new: desired.get_column("name").cloned(),
            },
        ];
        let cmp = TableComparator {
            old_schema: "public".to_string(),
            schema: "public".to_string(),
            names: NamePair::pair("people", "persons"),
            old: Some(actual),
            new: Some(desired),
            columns,
        };

        let out = table_statements(&cmp, &set, &DefaultRegistry::standard()).unwrap();

        assert_eq!(out.pre.len(), 1);
        assert_eq!(
            out.pre[0].render(),
            "ALTER TABLE \"public\".\"people\" ALTER COLUMN \"name\" DROP NOT NULL"
        );
        assert_eq!(out.install.len(), 1);
        assert_eq!(
            out.install[0].render(),
            "ALTER TABLE \"public\".\"people\" RENAME TO \"persons\""
        );
        assert!(out.after.is_empty());
    }

    #[test]
    fn test_identical_table_produces_nothing() {
        let desired = orders_desired();
        let snapshot =
            Snapshot::reflect(&desired_set(vec![users_table(), desired.clone()])).unwrap();
        let actual = snapshot
            .get_schema("public")
            .unwrap()
            .tables
            .get("orders")
            .unwrap()
            .clone();

        let set = desired_set(vec![users_table(), desired.clone()]);
        let columns = desired
            .columns
            .iter()
            .map(|c| ColumnComparator {
                names: NamePair::exact(&c.name),
                old: actual.get_column(&c.name).cloned(),
                new: Some(c.clone()),
            })
            .collect();
        let cmp = exact_comparator(actual, desired, columns);

        let out = table_statements(&cmp, &set, &DefaultRegistry::standard()).unwrap();
        assert!(out.pre.is_empty(), "pre: {:?}", out.pre);
        assert!(out.install.is_empty(), "install: {:?}", out.install);
        assert!(out.after.is_empty(), "after: {:?}", out.after);
    }

    #[test]
    fn test_domain_create_and_tighten() {
        let created = DomainComparator {
            old_schema: "public".to_string(),
            schema: "public".to_string(),
            names: NamePair::created("email"),
            old: None,
            new: Some(
                Domain::new("email", BaseType::Varchar)
                    .length(320)
                    .check("VALUE <> ''"),
            ),
        };
        let out = domain_statements(&created, &DefaultRegistry::standard());
        assert_eq!(out.pre.len(), 1);
        assert_eq!(
            out.pre[0].render(),
            "CREATE DOMAIN \"public\".\"email\" AS VARCHAR(320) CHECK (VALUE <> '')"
        );

        let tightened = DomainComparator {
            old_schema: "public".to_string(),
            schema: "public".to_string(),
            names: NamePair::exact("email"),
            old: Some(drift_schema::DomainState {
                name: "email".to_string(),
                base: BaseType::Varchar,
                length: Some(320),
                precision: None,
                not_null: false,
                default: None,
                check: Some("VALUE <> ''".to_string()),
            }),
            new: Some(
                Domain::new("email", BaseType::Varchar)
                    .length(320)
                    .not_null()
                    .check("VALUE <> ''"),
            ),
        };
        let out = domain_statements(&tightened, &DefaultRegistry::standard());
        assert!(out.pre.is_empty());
        assert_eq!(out.after.len(), 1);
        assert_eq!(
            out.after[0].render(),
            "ALTER DOMAIN \"public\".\"email\" SET NOT NULL"
        );
    }

    #[test]
    fn test_constraint_diff_ignores_names_but_not_shape() {
        // Same FK shape under a legacy name: no statements. A desired
        // unique constraint with no counterpart: added after install.
        let actual_model = Table::new("orders")
            .column(Column::new("id", TypeSpec::new(BaseType::BigInt)).constraint(Constraint {
                name: "orders_pkey".to_string(),
                kind: ConstraintKind::PrimaryKey,
            }))
            .column(
                Column::new("owner_id", TypeSpec::new(BaseType::BigInt).not_null()).constraint(
                    Constraint {
                        name: "weird_legacy_name".to_string(),
                        kind: ConstraintKind::ForeignKey(ForeignKeyRef {
                            schema: None,
                            table: "users".to_string(),
                            column: "id".to_string(),
                            on_delete: RefAction::NoAction,
                            on_update: RefAction::NoAction,
                        }),
                    },
                ),
            );
        let snapshot =
            Snapshot::reflect(&desired_set(vec![users_table(), actual_model])).unwrap();
        let actual = snapshot
            .get_schema("public")
            .unwrap()
            .tables
            .get("orders")
            .unwrap()
            .clone();

        let desired = orders_desired().constraint(
            vec!["owner_id".to_string()],
            Constraint {
                name: "orders_owner_id_key".to_string(),
                kind: ConstraintKind::Unique,
            },
        );
        let set = desired_set(vec![users_table(), desired.clone()]);
        let columns = desired
            .columns
            .iter()
            .map(|c| ColumnComparator {
                names: NamePair::exact(&c.name),
                old: actual.get_column(&c.name).cloned(),
                new: Some(c.clone()),
            })
            .collect();
        let cmp = exact_comparator(actual, desired, columns);

        let out = table_statements(&cmp, &set, &DefaultRegistry::standard()).unwrap();
        assert!(out.pre.is_empty(), "pre: {:?}", out.pre);
        assert!(out.install.is_empty());
        assert_eq!(out.after.len(), 1);
        assert_eq!(
            out.after[0].render(),
            "ALTER TABLE \"public\".\"orders\" ADD CONSTRAINT \"orders_owner_id_key\" \
             UNIQUE (\"owner_id\")"
        );
    }
}
