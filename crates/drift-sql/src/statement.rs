//! Statement nodes and the descriptors they are assembled from.

use drift_schema::{BaseType, RefAction};
use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;
use crate::expr::{Expr, ObjectName};
use crate::quote;

/// A rendered data-type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Base type.
    pub base: BaseType,
    /// Length parameter.
    pub length: Option<u32>,
    /// Precision parameter.
    pub precision: Option<u32>,
}

impl TypeDef {
    /// Creates a type descriptor.
    #[must_use]
    pub fn new(base: BaseType, length: Option<u32>, precision: Option<u32>) -> Self {
        Self {
            base,
            length,
            precision,
        }
    }

    /// Renders the SQL type spelling.
    #[must_use]
    pub fn render(&self) -> String {
        self.base.sql_name(self.length, self.precision)
    }
}

/// A column's SQL type: a concrete type or a domain reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSqlType {
    /// Concrete base type.
    Type(TypeDef),
    /// Named domain.
    Domain(ObjectName),
}

impl ColumnSqlType {
    fn render(&self) -> String {
        match self {
            Self::Type(ty) => ty.render(),
            Self::Domain(name) => name.render(),
        }
    }

    fn depended_on(&self) -> Vec<Dependency> {
        match self {
            Self::Type(_) => Vec::new(),
            Self::Domain(name) => name.dependency().into_iter().collect(),
        }
    }
}

/// A column definition as it appears in CREATE TABLE / ADD COLUMN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column type.
    pub ty: ColumnSqlType,
    /// Whether to render NOT NULL.
    pub not_null: bool,
    /// Default expression.
    pub default: Option<Expr>,
    /// Check expression.
    pub check: Option<Expr>,
}

impl ColumnDef {
    /// Renders the column definition.
    #[must_use]
    pub fn render(&self) -> String {
        let mut parts = vec![quote(&self.name), self.ty.render()];
        if self.not_null {
            parts.push("NOT NULL".to_string());
        }
        if let Some(default) = &self.default {
            parts.push(format!("DEFAULT {}", default.render()));
        }
        if let Some(check) = &self.check {
            parts.push(format!("CHECK ({})", check.render()));
        }
        parts.join(" ")
    }

    /// The named objects this definition requires (its domain, plus
    /// anything its default or check expressions reference).
    #[must_use]
    pub fn depended_on(&self) -> Vec<Dependency> {
        let mut deps = self.ty.depended_on();
        if let Some(default) = &self.default {
            deps.extend(default.depended_on());
        }
        if let Some(check) = &self.check {
            deps.extend(check.depended_on());
        }
        deps
    }
}

/// Kind-specific parameters of a constraint descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstraintSql {
    /// Primary key over the given columns.
    PrimaryKey {
        /// Covered columns.
        columns: Vec<String>,
    },
    /// Unique over the given columns.
    Unique {
        /// Covered columns.
        columns: Vec<String>,
    },
    /// Foreign key.
    ForeignKey {
        /// Referencing columns.
        columns: Vec<String>,
        /// Target table.
        target: ObjectName,
        /// Target columns.
        target_columns: Vec<String>,
        /// ON DELETE action.
        on_delete: RefAction,
        /// ON UPDATE action.
        on_update: RefAction,
    },
    /// Check with an opaque expression.
    Check {
        /// The expression.
        expr: Expr,
    },
}

/// A named constraint descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDef {
    /// Constraint name.
    pub name: String,
    /// Kind and parameters.
    pub kind: ConstraintSql,
}

impl ConstraintDef {
    /// Renders the constraint descriptor.
    #[must_use]
    pub fn render(&self) -> String {
        let quoted_list = |columns: &[String]| {
            columns
                .iter()
                .map(|c| quote(c))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let body = match &self.kind {
            ConstraintSql::PrimaryKey { columns } => {
                format!("PRIMARY KEY ({})", quoted_list(columns))
            }
            ConstraintSql::Unique { columns } => format!("UNIQUE ({})", quoted_list(columns)),
            ConstraintSql::ForeignKey {
                columns,
                target,
                target_columns,
                on_delete,
                on_update,
            } => {
                let mut text = format!(
                    "FOREIGN KEY ({}) REFERENCES {} ({})",
                    quoted_list(columns),
                    target.render(),
                    quoted_list(target_columns)
                );
                if *on_delete != RefAction::NoAction {
                    text.push_str(&format!(" ON DELETE {}", on_delete.to_sql()));
                }
                if *on_update != RefAction::NoAction {
                    text.push_str(&format!(" ON UPDATE {}", on_update.to_sql()));
                }
                text
            }
            ConstraintSql::Check { expr } => format!("CHECK ({})", expr.render()),
        };
        format!("CONSTRAINT {} {}", quote(&self.name), body)
    }

    /// The named objects this constraint requires (a foreign key depends on
    /// its target table and columns).
    #[must_use]
    pub fn depended_on(&self) -> Vec<Dependency> {
        match &self.kind {
            ConstraintSql::PrimaryKey { .. } | ConstraintSql::Unique { .. } => Vec::new(),
            ConstraintSql::ForeignKey {
                target,
                target_columns,
                ..
            } => match &target.schema {
                Some(schema) => {
                    let mut deps = vec![Dependency::on_object(schema, &target.name)];
                    for column in target_columns {
                        deps.push(Dependency::on_field(schema, &target.name, column));
                    }
                    deps
                }
                None => Vec::new(),
            },
            ConstraintSql::Check { expr } => expr.depended_on(),
        }
    }
}

/// The body of a CREATE DOMAIN statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainDef {
    /// Underlying type.
    pub ty: TypeDef,
    /// Whether values reject NULL.
    pub not_null: bool,
    /// Default expression.
    pub default: Option<Expr>,
    /// Check expression.
    pub check: Option<Expr>,
}

/// Single-purpose ALTER DOMAIN clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainAction {
    /// Rename the domain.
    RenameTo(String),
    /// Move the domain to another schema.
    SetSchema(String),
    /// Set the default expression.
    SetDefault(Expr),
    /// Drop the default.
    DropDefault,
    /// Add the NOT NULL restriction.
    SetNotNull,
    /// Remove the NOT NULL restriction.
    DropNotNull,
}

/// Change applied to one column by ALTER TABLE ... ALTER COLUMN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnChange {
    /// Change the column type.
    SetType(TypeDef),
    /// Add the NOT NULL restriction.
    SetNotNull,
    /// Remove the NOT NULL restriction.
    DropNotNull,
    /// Set the default expression.
    SetDefault(Expr),
    /// Drop the default.
    DropDefault,
}

/// Single-purpose ALTER TABLE clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableAction {
    /// Rename the table.
    RenameTo(String),
    /// Move the table to another schema.
    SetSchema(String),
    /// Add a column.
    AddColumn(ColumnDef),
    /// Drop a column.
    DropColumn(String),
    /// Rename a column.
    RenameColumn {
        /// Current name.
        from: String,
        /// New name.
        to: String,
    },
    /// Alter one column.
    AlterColumn {
        /// Column name.
        column: String,
        /// The change.
        change: ColumnChange,
    },
    /// Add a table constraint.
    AddConstraint(ConstraintDef),
    /// Drop a table constraint.
    DropConstraint(String),
}

/// A SELECT usable standalone or as a scalar subquery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    /// Selected expressions.
    pub columns: Vec<Expr>,
    /// Source table.
    pub from: ObjectName,
    /// Optional WHERE clause.
    pub where_clause: Option<Expr>,
}

impl Select {
    /// Renders the query.
    #[must_use]
    pub fn render(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(Expr::render)
            .collect::<Vec<_>>()
            .join(", ");
        let mut text = format!("SELECT {} FROM {}", columns, self.from.render());
        if let Some(filter) = &self.where_clause {
            text.push_str(&format!(" WHERE {}", filter.render()));
        }
        text
    }

    /// The named objects this query requires.
    #[must_use]
    pub fn depended_on(&self) -> Vec<Dependency> {
        let mut deps: Vec<Dependency> = self.from.dependency().into_iter().collect();
        for column in &self.columns {
            deps.extend(column.depended_on());
        }
        if let Some(filter) = &self.where_clause {
            deps.extend(filter.depended_on());
        }
        deps
    }
}

/// A single migration statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Create a schema.
    CreateSchema {
        /// Schema name.
        name: String,
        /// Whether to render IF NOT EXISTS.
        if_not_exists: bool,
    },

    /// Create a domain.
    CreateDomain {
        /// Domain name.
        name: ObjectName,
        /// Domain body.
        def: DomainDef,
    },

    /// Alter a domain with a single clause.
    AlterDomain {
        /// Domain name.
        name: ObjectName,
        /// The clause.
        action: DomainAction,
    },

    /// Drop a domain.
    DropDomain {
        /// Domain name.
        name: ObjectName,
        /// Whether to render IF EXISTS.
        if_exists: bool,
    },

    /// Create a table.
    CreateTable {
        /// Table name.
        name: ObjectName,
        /// Column definitions, in source order.
        columns: Vec<ColumnDef>,
        /// Table constraints, in source order.
        constraints: Vec<ConstraintDef>,
        /// Whether to render IF NOT EXISTS.
        if_not_exists: bool,
    },

    /// Alter a table with a single clause.
    AlterTable {
        /// Table name.
        name: ObjectName,
        /// The clause.
        action: TableAction,
    },

    /// Drop a table.
    DropTable {
        /// Table name.
        name: ObjectName,
        /// Whether to render IF EXISTS.
        if_exists: bool,
    },

    /// Data backfill.
    Update {
        /// Target table.
        table: ObjectName,
        /// Column assignments, in order.
        assignments: Vec<(String, Expr)>,
        /// Optional WHERE clause.
        where_clause: Option<Expr>,
    },

    /// A standalone query.
    Select(Select),
}

impl Statement {
    /// Renders the statement, without the trailing semicolon.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::CreateSchema {
                name,
                if_not_exists,
            } => {
                let guard = if *if_not_exists { "IF NOT EXISTS " } else { "" };
                format!("CREATE SCHEMA {}{}", guard, quote(name))
            }

            Self::CreateDomain { name, def } => {
                let mut text = format!("CREATE DOMAIN {} AS {}", name.render(), def.ty.render());
                if let Some(default) = &def.default {
                    text.push_str(&format!(" DEFAULT {}", default.render()));
                }
                if def.not_null {
                    text.push_str(" NOT NULL");
                }
                if let Some(check) = &def.check {
                    text.push_str(&format!(" CHECK ({})", check.render()));
                }
                text
            }

            Self::AlterDomain { name, action } => {
                let clause = match action {
                    DomainAction::RenameTo(new_name) => format!("RENAME TO {}", quote(new_name)),
                    DomainAction::SetSchema(schema) => format!("SET SCHEMA {}", quote(schema)),
                    DomainAction::SetDefault(expr) => format!("SET DEFAULT {}", expr.render()),
                    DomainAction::DropDefault => "DROP DEFAULT".to_string(),
                    DomainAction::SetNotNull => "SET NOT NULL".to_string(),
                    DomainAction::DropNotNull => "DROP NOT NULL".to_string(),
                };
                format!("ALTER DOMAIN {} {}", name.render(), clause)
            }

            Self::DropDomain { name, if_exists } => {
                let guard = if *if_exists { "IF EXISTS " } else { "" };
                format!("DROP DOMAIN {}{}", guard, name.render())
            }

            Self::CreateTable {
                name,
                columns,
                constraints,
                if_not_exists,
            } => {
                let guard = if *if_not_exists { "IF NOT EXISTS " } else { "" };
                let mut items: Vec<String> = columns.iter().map(ColumnDef::render).collect();
                items.extend(constraints.iter().map(ConstraintDef::render));
                format!(
                    "CREATE TABLE {}{} ({})",
                    guard,
                    name.render(),
                    items.join(", ")
                )
            }

            Self::AlterTable { name, action } => {
                let clause = match action {
                    TableAction::RenameTo(new_name) => format!("RENAME TO {}", quote(new_name)),
                    TableAction::SetSchema(schema) => format!("SET SCHEMA {}", quote(schema)),
                    TableAction::AddColumn(column) => format!("ADD COLUMN {}", column.render()),
                    TableAction::DropColumn(column) => format!("DROP COLUMN {}", quote(column)),
                    TableAction::RenameColumn { from, to } => {
                        format!("RENAME COLUMN {} TO {}", quote(from), quote(to))
                    }
                    TableAction::AlterColumn { column, change } => {
                        let change_sql = match change {
                            ColumnChange::SetType(ty) => format!("TYPE {}", ty.render()),
                            ColumnChange::SetNotNull => "SET NOT NULL".to_string(),
                            ColumnChange::DropNotNull => "DROP NOT NULL".to_string(),
                            ColumnChange::SetDefault(expr) => {
                                format!("SET DEFAULT {}", expr.render())
                            }
                            ColumnChange::DropDefault => "DROP DEFAULT".to_string(),
                        };
                        format!("ALTER COLUMN {} {}", quote(column), change_sql)
                    }
                    TableAction::AddConstraint(constraint) => {
                        format!("ADD {}", constraint.render())
                    }
                    TableAction::DropConstraint(constraint) => {
                        format!("DROP CONSTRAINT {}", quote(constraint))
                    }
                };
                format!("ALTER TABLE {} {}", name.render(), clause)
            }

            Self::DropTable { name, if_exists } => {
                let guard = if *if_exists { "IF EXISTS " } else { "" };
                format!("DROP TABLE {}{}", guard, name.render())
            }

            Self::Update {
                table,
                assignments,
                where_clause,
            } => {
                let sets = assignments
                    .iter()
                    .map(|(column, expr)| format!("{} = {}", quote(column), expr.render()))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut text = format!("UPDATE {} SET {}", table.render(), sets);
                if let Some(filter) = where_clause {
                    text.push_str(&format!(" WHERE {}", filter.render()));
                }
                text
            }

            Self::Select(select) => select.render(),
        }
    }

    /// The named objects this statement requires.
    #[must_use]
    pub fn depended_on(&self) -> Vec<Dependency> {
        match self {
            Self::CreateSchema { .. } => Vec::new(),

            Self::CreateDomain { name, .. } => match &name.schema {
                Some(schema) => vec![Dependency::on_schema(schema)],
                None => Vec::new(),
            },

            Self::AlterDomain { name, .. } | Self::DropDomain { name, .. } => {
                name.dependency().into_iter().collect()
            }

            Self::CreateTable {
                name,
                columns,
                constraints,
                ..
            } => {
                let mut deps = Vec::new();
                if let Some(schema) = &name.schema {
                    deps.push(Dependency::on_schema(schema));
                }
                for column in columns {
                    deps.extend(column.depended_on());
                }
                for constraint in constraints {
                    deps.extend(constraint.depended_on());
                }
                deps
            }

            Self::AlterTable { name, action } => {
                let mut deps: Vec<Dependency> = name.dependency().into_iter().collect();
                match action {
                    TableAction::AddColumn(column) => deps.extend(column.depended_on()),
                    TableAction::AddConstraint(constraint) => {
                        deps.extend(constraint.depended_on());
                    }
                    TableAction::AlterColumn { change, .. } => {
                        if let ColumnChange::SetDefault(expr) = change {
                            deps.extend(expr.depended_on());
                        }
                    }
                    TableAction::RenameTo(_)
                    | TableAction::SetSchema(_)
                    | TableAction::DropColumn(_)
                    | TableAction::RenameColumn { .. }
                    | TableAction::DropConstraint(_) => {}
                }
                deps
            }

            Self::DropTable { name, .. } => name.dependency().into_iter().collect(),

            Self::Update {
                table,
                assignments,
                where_clause,
            } => {
                let mut deps: Vec<Dependency> = table.dependency().into_iter().collect();
                for (_, expr) in assignments {
                    deps.extend(expr.depended_on());
                }
                if let Some(filter) = where_clause {
                    deps.extend(filter.depended_on());
                }
                deps
            }

            Self::Select(select) => select.depended_on(),
        }
    }

    /// The named objects that become available once this statement has run.
    ///
    /// Only CREATE statements solve anything; alters and drops are
    /// conservative and solve nothing.
    #[must_use]
    pub fn solved(&self) -> Vec<Dependency> {
        match self {
            Self::CreateSchema { name, .. } => vec![Dependency::on_schema(name)],

            Self::CreateDomain { name, .. } => match &name.schema {
                Some(schema) => vec![Dependency::on_object(schema, &name.name)],
                None => Vec::new(),
            },

            Self::CreateTable { name, columns, .. } => match &name.schema {
                Some(schema) => {
                    let mut solved = vec![Dependency::on_object(schema, &name.name)];
                    for column in columns {
                        solved.push(Dependency::on_field(schema, &name.name, &column.name));
                    }
                    solved
                }
                None => Vec::new(),
            },

            Self::AlterDomain { .. }
            | Self::DropDomain { .. }
            | Self::AlterTable { .. }
            | Self::DropTable { .. }
            | Self::Update { .. }
            | Self::Select(_) => Vec::new(),
        }
    }
}
