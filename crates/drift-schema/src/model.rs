//! The desired schema model.
//!
//! An immutable tree describing what the database should look like: schemas
//! containing domains and tables, tables containing ordered columns and
//! constraints. Loaded once (see [`crate::document`]) and only queried
//! afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::types::BaseType;

/// Referential action for foreign keys (ON DELETE / ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefAction {
    /// No action (error if the referenced row goes away).
    #[default]
    NoAction,
    /// Restrict (checked immediately).
    Restrict,
    /// Cascade the change to referencing rows.
    Cascade,
    /// Set the referencing column to NULL.
    SetNull,
    /// Set the referencing column to its default.
    SetDefault,
}

impl RefAction {
    /// Returns the SQL representation of this action.
    #[must_use]
    pub fn to_sql(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A reference to a named domain, optionally schema-qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainRef {
    /// Schema the domain lives in; the referencing schema when absent.
    pub schema: Option<String>,
    /// Domain name.
    pub name: String,
}

/// Foreign key target and actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Target schema; the referencing schema when absent.
    pub schema: Option<String>,
    /// Target table.
    pub table: String,
    /// Target column.
    pub column: String,
    /// Action on delete.
    pub on_delete: RefAction,
    /// Action on update.
    pub on_update: RefAction,
}

/// Constraint kinds with their kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Primary key.
    PrimaryKey,
    /// Unique.
    Unique,
    /// Foreign key.
    ForeignKey(ForeignKeyRef),
    /// Check; the expression is opaque SQL text.
    Check {
        /// Raw check expression.
        expr: String,
    },
}

/// A named constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint name.
    pub name: String,
    /// Kind and parameters.
    pub kind: ConstraintKind,
}

/// A table-level constraint naming the columns it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConstraint {
    /// Covered columns, in declaration order.
    pub columns: Vec<String>,
    /// The constraint itself.
    pub constraint: Constraint,
}

/// Inline base-type descriptor for a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    /// Base type.
    pub base: BaseType,
    /// Length (varchar/char) or precision (numeric).
    pub length: Option<u32>,
    /// Scale for numeric types.
    pub precision: Option<u32>,
    /// Whether the column rejects NULL.
    pub not_null: bool,
    /// Default expression text (resolved by the planner's default registry).
    pub default: Option<String>,
    /// Check expression text, opaque.
    pub check: Option<String>,
}

impl TypeSpec {
    /// Creates a plain nullable type spec.
    #[must_use]
    pub fn new(base: BaseType) -> Self {
        Self {
            base,
            length: None,
            precision: None,
            not_null: false,
            default: None,
            check: None,
        }
    }

    /// Sets the length.
    #[must_use]
    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the precision.
    #[must_use]
    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Marks the type NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Sets the default expression text.
    #[must_use]
    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the check expression text.
    #[must_use]
    pub fn check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }
}

/// A column's type: inline spec or domain reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Inline base-type descriptor.
    Inline(TypeSpec),
    /// Reference to a named domain.
    Domain(DomainRef),
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Type reference.
    pub ty: ColumnType,
    /// Column-level constraints.
    pub constraints: Vec<Constraint>,
    /// Free-form tags.
    pub tags: Vec<String>,
}

impl Column {
    /// Creates a column with an inline type.
    #[must_use]
    pub fn new(name: impl Into<String>, spec: TypeSpec) -> Self {
        Self {
            name: name.into(),
            ty: ColumnType::Inline(spec),
            constraints: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Creates a column typed by a domain.
    #[must_use]
    pub fn with_domain(name: impl Into<String>, domain: DomainRef) -> Self {
        Self {
            name: name.into(),
            ty: ColumnType::Domain(domain),
            constraints: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Attaches a constraint.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Attaches a tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Returns this column's foreign key, if it has one at the column level.
    #[must_use]
    pub fn foreign_key(&self) -> Option<(&Constraint, &ForeignKeyRef)> {
        self.constraints.iter().find_map(|c| match &c.kind {
            ConstraintKind::ForeignKey(fk) => Some((c, fk)),
            _ => None,
        })
    }
}

/// A named, reusable base-type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
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
    /// Check expression text, opaque.
    pub check: Option<String>,
}

impl Domain {
    /// Creates a plain nullable domain.
    #[must_use]
    pub fn new(name: impl Into<String>, base: BaseType) -> Self {
        Self {
            name: name.into(),
            base,
            length: None,
            precision: None,
            not_null: false,
            default: None,
            check: None,
        }
    }

    /// Sets the length.
    #[must_use]
    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Marks the domain NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Sets the default expression text.
    #[must_use]
    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the check expression text.
    #[must_use]
    pub fn check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }
}

/// A table: ordered columns plus table-level constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns, in declaration order.
    pub columns: Vec<Column>,
    /// Table-level constraints.
    pub constraints: Vec<TableConstraint>,
    /// Optional description.
    pub description: Option<String>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
            description: None,
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a table-level constraint.
    #[must_use]
    pub fn constraint(mut self, columns: Vec<String>, constraint: Constraint) -> Self {
        self.constraints.push(TableConstraint {
            columns,
            constraint,
        });
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Gets a column by name, case-insensitively.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Returns the foreign key covering `column`, searching column-level
    /// constraints first and then table-level ones.
    #[must_use]
    pub fn foreign_key_of(&self, column: &str) -> Option<(&Constraint, &ForeignKeyRef)> {
        if let Some(col) = self.get_column(column) {
            if let Some(found) = col.foreign_key() {
                return Some(found);
            }
        }
        self.constraints
            .iter()
            .filter(|tc| tc.columns.iter().any(|c| c.eq_ignore_ascii_case(column)))
            .find_map(|tc| match &tc.constraint.kind {
                ConstraintKind::ForeignKey(fk) => Some((&tc.constraint, fk)),
                _ => None,
            })
    }

    /// Returns true if a primary key constraint covers `column`.
    #[must_use]
    pub fn primary_key_covers(&self, column: &str) -> bool {
        let column_level = self.get_column(column).is_some_and(|c| {
            c.constraints
                .iter()
                .any(|k| matches!(k.kind, ConstraintKind::PrimaryKey))
        });
        column_level
            || self.constraints.iter().any(|tc| {
                matches!(tc.constraint.kind, ConstraintKind::PrimaryKey)
                    && tc.columns.iter().any(|c| c.eq_ignore_ascii_case(column))
            })
    }
}

/// A schema: named maps of domains and tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name.
    pub name: String,
    /// Domains by name.
    pub domains: BTreeMap<String, Domain>,
    /// Tables by name.
    pub tables: BTreeMap<String, Table>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domains: BTreeMap::new(),
            tables: BTreeMap::new(),
        }
    }

    /// Adds a domain.
    #[must_use]
    pub fn domain(mut self, domain: Domain) -> Self {
        self.domains.insert(domain.name.clone(), domain);
        self
    }

    /// Adds a table.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }
}

/// The fully resolved type of a column (domain references followed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Underlying base type.
    pub base: BaseType,
    /// Length parameter.
    pub length: Option<u32>,
    /// Precision parameter.
    pub precision: Option<u32>,
    /// NOT NULL from the type spec or the domain.
    pub not_null: bool,
    /// Default expression text, if declared inline.
    pub default: Option<String>,
}

/// Root of the desired model: an ordered list of schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSet {
    /// Schemas in document order.
    pub schemas: Vec<Schema>,
}

impl SchemaSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema.
    #[must_use]
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Gets a schema by name, case-insensitively.
    #[must_use]
    pub fn get_schema(&self, name: &str) -> Option<&Schema> {
        self.schemas
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Keeps only the named schema. Used by the CLI's `--schema` filter.
    #[must_use]
    pub fn filtered(mut self, name: &str) -> Self {
        self.schemas.retain(|s| s.name.eq_ignore_ascii_case(name));
        self
    }

    /// Resolves a domain reference from within `default_schema`.
    #[must_use]
    pub fn resolve_domain(&self, default_schema: &str, dref: &DomainRef) -> Option<(&str, &Domain)> {
        let schema_name = dref.schema.as_deref().unwrap_or(default_schema);
        let schema = self.get_schema(schema_name)?;
        let domain = schema
            .domains
            .values()
            .find(|d| d.name.eq_ignore_ascii_case(&dref.name))?;
        Some((schema.name.as_str(), domain))
    }

    /// Resolves a column's type, following domain references.
    pub fn resolve_column(&self, default_schema: &str, table: &str, column: &Column) -> Result<ResolvedType> {
        match &column.ty {
            ColumnType::Inline(spec) => Ok(ResolvedType {
                base: spec.base,
                length: spec.length,
                precision: spec.precision,
                not_null: spec.not_null,
                default: spec.default.clone(),
            }),
            ColumnType::Domain(dref) => {
                let (_, domain) = self.resolve_domain(default_schema, dref).ok_or_else(|| {
                    SchemaError::UnknownType {
                        name: dref.name.clone(),
                        context: format!("column {}.{}", table, column.name),
                    }
                })?;
                Ok(ResolvedType {
                    base: domain.base,
                    length: domain.length,
                    precision: domain.precision,
                    not_null: domain.not_null,
                    default: None,
                })
            }
        }
    }

    /// Whether `column` in `table` is effectively NOT NULL: declared on its
    /// type, inherited from its domain, or implied by primary key coverage.
    pub fn effective_not_null(&self, schema: &str, table: &Table, column: &Column) -> Result<bool> {
        let resolved = self.resolve_column(schema, &table.name, column)?;
        Ok(resolved.not_null || table.primary_key_covers(&column.name))
    }

    /// Lists every (schema, table, column) site using the given domain.
    #[must_use]
    pub fn domain_usages(&self, domain_schema: &str, domain_name: &str) -> Vec<(&str, &str, &str)> {
        let mut usages = Vec::new();
        for schema in &self.schemas {
            for table in schema.tables.values() {
                for column in &table.columns {
                    if let ColumnType::Domain(dref) = &column.ty {
                        let target = dref.schema.as_deref().unwrap_or(schema.name.as_str());
                        if target.eq_ignore_ascii_case(domain_schema)
                            && dref.name.eq_ignore_ascii_case(domain_name)
                        {
                            usages.push((
                                schema.name.as_str(),
                                table.name.as_str(),
                                column.name.as_str(),
                            ));
                        }
                    }
                }
            }
        }
        usages
    }
}
