//! Desired-schema document loading.
//!
//! The document is JSON: a top-level `schemas` list, each schema holding
//! `domains` and `tables` maps. A column's `schema` field is either an inline
//! type descriptor or a `{"$ref": "#/schemas/<s>/tables/<t>/columns/<c>"}`
//! reference resolved by path-following within the same document.
//!
//! Loading is fail-fast: any unknown type, dangling reference or
//! contradictory constraint aborts with an error before a model is returned.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::model::{
    Column, ColumnType, Constraint, ConstraintKind, Domain, DomainRef, ForeignKeyRef, RefAction,
    Schema, SchemaSet, Table, TableConstraint, TypeSpec,
};
use crate::types::BaseType;

const MAX_REF_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
struct RawDocument {
    schemas: Vec<RawSchema>,
}

#[derive(Debug, Deserialize)]
struct RawSchema {
    name: String,
    #[serde(default)]
    domains: BTreeMap<String, RawDomain>,
    #[serde(default)]
    tables: BTreeMap<String, RawTable>,
}

#[derive(Debug, Deserialize)]
struct RawDomain {
    #[serde(rename = "type")]
    ty: String,
    length: Option<u32>,
    precision: Option<u32>,
    #[serde(default)]
    not_null: bool,
    default: Option<String>,
    check: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    #[serde(default)]
    columns: Vec<RawColumn>,
    #[serde(default)]
    constraints: Vec<RawTableConstraint>,
    description: Option<String>,
    /// Data-access descriptors consumed by the query generator, not by the
    /// planner. Accepted and ignored here.
    #[serde(default, rename = "api")]
    _api: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    name: String,
    schema: RawColumnSchema,
    #[serde(default)]
    constraints: Vec<RawConstraint>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawColumnSchema {
    Ref {
        #[serde(rename = "$ref")]
        target: String,
    },
    Inline(RawTypeSpec),
}

#[derive(Debug, Clone, Deserialize)]
struct RawTypeSpec {
    #[serde(rename = "type")]
    ty: String,
    length: Option<u32>,
    precision: Option<u32>,
    #[serde(default)]
    not_null: bool,
    default: Option<String>,
    check: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTableConstraint {
    columns: Vec<String>,
    constraint: RawConstraint,
}

#[derive(Debug, Clone, Deserialize)]
struct RawConstraint {
    name: Option<String>,
    #[serde(rename = "type")]
    ty: String,
    schema: Option<String>,
    table: Option<String>,
    column: Option<String>,
    on_delete: Option<RefAction>,
    on_update: Option<RefAction>,
    expr: Option<String>,
}

/// Loads and validates a schema document from a string.
pub fn load_str(text: &str) -> Result<SchemaSet> {
    let raw: RawDocument = serde_json::from_str(text)?;
    let set = build(&raw)?;
    validate(&set)?;
    debug!(schemas = set.schemas.len(), "schema document loaded");
    Ok(set)
}

/// Loads and validates a schema document from a file.
pub fn load_file(path: &Path) -> Result<SchemaSet> {
    let text = std::fs::read_to_string(path)?;
    load_str(&text)
}

fn build(raw: &RawDocument) -> Result<SchemaSet> {
    let mut set = SchemaSet::new();
    for raw_schema in &raw.schemas {
        let mut schema = Schema::new(raw_schema.name.clone());

        for (name, raw_domain) in &raw_schema.domains {
            let context = format!("domain {}.{}", raw_schema.name, name);
            let base = BaseType::parse(&raw_domain.ty, &context)?;
            schema.domains.insert(
                name.clone(),
                Domain {
                    name: name.clone(),
                    base,
                    length: raw_domain.length,
                    precision: raw_domain.precision,
                    not_null: raw_domain.not_null,
                    default: raw_domain.default.clone(),
                    check: raw_domain.check.clone(),
                },
            );
        }

        for (name, raw_table) in &raw_schema.tables {
            schema
                .tables
                .insert(name.clone(), build_table(raw, name, raw_table)?);
        }

        set.schemas.push(schema);
    }
    Ok(set)
}

fn build_table(raw: &RawDocument, name: &str, raw_table: &RawTable) -> Result<Table> {
    let mut table = Table::new(name);
    table.description = raw_table.description.clone();

    for raw_column in &raw_table.columns {
        let spec = resolve_column_schema(raw, &raw_column.schema, 0)?;
        let ty = column_type(&spec, name, &raw_column.name)?;

        let mut column = Column {
            name: raw_column.name.clone(),
            ty,
            constraints: Vec::new(),
            tags: raw_column.tags.clone(),
        };
        for raw_constraint in &raw_column.constraints {
            let context = format!("column {}.{}", name, raw_column.name);
            column.constraints.push(convert_constraint(
                raw_constraint,
                &context,
                name,
                &raw_column.name,
            )?);
        }
        table.columns.push(column);
    }

    for raw_tc in &raw_table.constraints {
        let first_column = raw_tc.columns.first().map_or("", String::as_str);
        let context = format!("table {}", name);
        table.constraints.push(TableConstraint {
            columns: raw_tc.columns.clone(),
            constraint: convert_constraint(&raw_tc.constraint, &context, name, first_column)?,
        });
    }

    Ok(table)
}

/// Follows `$ref` chains until an inline type spec is reached.
fn resolve_column_schema(
    raw: &RawDocument,
    schema: &RawColumnSchema,
    depth: usize,
) -> Result<RawTypeSpec> {
    match schema {
        RawColumnSchema::Inline(spec) => Ok(spec.clone()),
        RawColumnSchema::Ref { target } => {
            if depth >= MAX_REF_DEPTH {
                return Err(SchemaError::BadRef {
                    path: target.clone(),
                    reason: "reference chain too deep (possible cycle)".to_string(),
                });
            }
            let next = follow_ref(raw, target)?;
            resolve_column_schema(raw, next, depth + 1)
        }
    }
}

fn follow_ref<'a>(raw: &'a RawDocument, path: &str) -> Result<&'a RawColumnSchema> {
    let bad = |reason: &str| SchemaError::BadRef {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = path.trim_start_matches("#/").split('/').collect();
    match parts.as_slice() {
        ["schemas", schema, "tables", table, "columns", column] => {
            let raw_schema = raw
                .schemas
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(schema))
                .ok_or_else(|| bad("schema not found"))?;
            let raw_table = raw_schema
                .tables
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(table))
                .map(|(_, t)| t)
                .ok_or_else(|| bad("table not found"))?;
            let raw_column = raw_table
                .columns
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(column))
                .ok_or_else(|| bad("column not found"))?;
            Ok(&raw_column.schema)
        }
        _ => Err(bad(
            "expected path of the form #/schemas/<s>/tables/<t>/columns/<c>",
        )),
    }
}

/// A type name that isn't a base type is a domain reference, optionally
/// schema-qualified as `schema.domain`.
fn column_type(spec: &RawTypeSpec, table: &str, column: &str) -> Result<ColumnType> {
    if BaseType::is_known(&spec.ty) {
        let context = format!("column {}.{}", table, column);
        let base = BaseType::parse(&spec.ty, &context)?;
        return Ok(ColumnType::Inline(TypeSpec {
            base,
            length: spec.length,
            precision: spec.precision,
            not_null: spec.not_null,
            default: spec.default.clone(),
            check: spec.check.clone(),
        }));
    }

    let (schema, name) = match spec.ty.split_once('.') {
        Some((schema, name)) => (Some(schema.to_string()), name.to_string()),
        None => (None, spec.ty.clone()),
    };
    Ok(ColumnType::Domain(DomainRef { schema, name }))
}

fn convert_constraint(
    raw: &RawConstraint,
    context: &str,
    table: &str,
    column: &str,
) -> Result<Constraint> {
    let conflicting = |name: &str, message: &str| SchemaError::ConflictingConstraint {
        name: name.to_string(),
        context: context.to_string(),
        message: message.to_string(),
    };

    let has_target = raw.table.is_some() || raw.column.is_some() || raw.schema.is_some();

    match raw.ty.as_str() {
        "primary_key" => {
            let name = raw
                .name
                .clone()
                .unwrap_or_else(|| format!("{}_pkey", table));
            if has_target || raw.expr.is_some() {
                return Err(conflicting(
                    &name,
                    "primary key takes no target or expression parameters",
                ));
            }
            Ok(Constraint {
                name,
                kind: ConstraintKind::PrimaryKey,
            })
        }
        "unique" => {
            let name = raw
                .name
                .clone()
                .unwrap_or_else(|| format!("{}_{}_key", table, column));
            if has_target || raw.expr.is_some() {
                return Err(conflicting(
                    &name,
                    "unique takes no target or expression parameters",
                ));
            }
            Ok(Constraint {
                name,
                kind: ConstraintKind::Unique,
            })
        }
        "foreign_key" => {
            let name = raw
                .name
                .clone()
                .unwrap_or_else(|| format!("{}_{}_fkey", table, column));
            if raw.expr.is_some() {
                return Err(conflicting(
                    &name,
                    "foreign key cannot carry a check expression",
                ));
            }
            let target_table = raw.table.clone().ok_or_else(|| SchemaError::MissingField {
                name: name.clone(),
                context: context.to_string(),
                field: "table".to_string(),
            })?;
            let target_column = raw.column.clone().ok_or_else(|| SchemaError::MissingField {
                name: name.clone(),
                context: context.to_string(),
                field: "column".to_string(),
            })?;
            Ok(Constraint {
                name,
                kind: ConstraintKind::ForeignKey(ForeignKeyRef {
                    schema: raw.schema.clone(),
                    table: target_table,
                    column: target_column,
                    on_delete: raw.on_delete.unwrap_or_default(),
                    on_update: raw.on_update.unwrap_or_default(),
                }),
            })
        }
        "check" => {
            let name = raw
                .name
                .clone()
                .unwrap_or_else(|| format!("{}_{}_check", table, column));
            if has_target {
                return Err(conflicting(&name, "check takes no target parameters"));
            }
            let expr = raw.expr.clone().ok_or_else(|| SchemaError::MissingField {
                name: name.clone(),
                context: context.to_string(),
                field: "expr".to_string(),
            })?;
            Ok(Constraint {
                name,
                kind: ConstraintKind::Check { expr },
            })
        }
        other => Err(conflicting(
            raw.name.as_deref().unwrap_or("<unnamed>"),
            &format!("unknown constraint type '{}'", other),
        )),
    }
}

/// Semantic validation over a built model: domain references resolve,
/// column names are unique per table.
pub fn validate(set: &SchemaSet) -> Result<()> {
    for schema in &set.schemas {
        for table in schema.tables.values() {
            let mut seen = Vec::new();
            for column in &table.columns {
                let lower = column.name.to_ascii_lowercase();
                if seen.contains(&lower) {
                    return Err(SchemaError::DuplicateColumn {
                        table: table.name.clone(),
                        column: column.name.clone(),
                    });
                }
                seen.push(lower);

                // Forces domain resolution; fails on dangling references.
                set.resolve_column(&schema.name, &table.name, column)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r##"{
        "schemas": [
            {
                "name": "public",
                "domains": {
                    "email": { "type": "varchar", "length": 320, "not_null": true }
                },
                "tables": {
                    "users": {
                        "columns": [
                            {
                                "name": "id",
                                "schema": { "type": "bigint", "not_null": true },
                                "constraints": [ { "type": "primary_key" } ]
                            },
                            { "name": "email", "schema": { "type": "email" } },
                            {
                                "name": "backup_email",
                                "schema": { "$ref": "#/schemas/public/tables/users/columns/email" }
                            }
                        ],
                        "constraints": [
                            { "columns": ["email"], "constraint": { "type": "unique" } }
                        ]
                    }
                }
            }
        ]
    }"##;

    #[test]
    fn test_load_sample_document() {
        let set = load_str(SAMPLE).unwrap();
        let schema = set.get_schema("public").unwrap();
        assert_eq!(schema.domains.len(), 1);

        let users = schema.tables.get("users").unwrap();
        assert_eq!(users.columns.len(), 3);
        assert_eq!(users.columns[0].constraints[0].name, "users_pkey");
        assert_eq!(users.constraints[0].constraint.name, "users_email_key");

        // $ref resolved to the same domain reference as `email`
        assert_eq!(users.columns[2].ty, users.columns[1].ty);
    }

    #[test]
    fn test_unknown_domain_fails() {
        let doc = r#"{
            "schemas": [
                {
                    "name": "public",
                    "tables": {
                        "t": {
                            "columns": [
                                { "name": "a", "schema": { "type": "no_such_domain" } }
                            ]
                        }
                    }
                }
            ]
        }"#;

        let err = load_str(doc).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { .. }));
    }

    #[test]
    fn test_dangling_ref_fails() {
        let doc = r##"{
            "schemas": [
                {
                    "name": "public",
                    "tables": {
                        "t": {
                            "columns": [
                                { "name": "a", "schema": { "$ref": "#/schemas/public/tables/x/columns/y" } }
                            ]
                        }
                    }
                }
            ]
        }"##;

        let err = load_str(doc).unwrap_err();
        assert!(matches!(err, SchemaError::BadRef { .. }));
    }

    #[test]
    fn test_conflicting_constraint_fails() {
        let doc = r#"{
            "schemas": [
                {
                    "name": "public",
                    "tables": {
                        "t": {
                            "columns": [
                                {
                                    "name": "a",
                                    "schema": { "type": "bigint" },
                                    "constraints": [
                                        { "type": "foreign_key", "table": "u", "column": "id", "expr": "a > 0" }
                                    ]
                                }
                            ]
                        }
                    }
                }
            ]
        }"#;

        let err = load_str(doc).unwrap_err();
        assert!(matches!(err, SchemaError::ConflictingConstraint { .. }));
    }

    #[test]
    fn test_foreign_key_missing_column_fails() {
        let doc = r#"{
            "schemas": [
                {
                    "name": "public",
                    "tables": {
                        "t": {
                            "columns": [
                                {
                                    "name": "a",
                                    "schema": { "type": "bigint" },
                                    "constraints": [ { "type": "foreign_key", "table": "u" } ]
                                }
                            ]
                        }
                    }
                }
            ]
        }"#;

        let err = load_str(doc).unwrap_err();
        match err {
            SchemaError::MissingField { field, .. } => assert_eq!(field, "column"),
            other => panic!("Expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_column_fails() {
        let doc = r#"{
            "schemas": [
                {
                    "name": "public",
                    "tables": {
                        "t": {
                            "columns": [
                                { "name": "a", "schema": { "type": "bigint" } },
                                { "name": "A", "schema": { "type": "text" } }
                            ]
                        }
                    }
                }
            ]
        }"#;

        let err = load_str(doc).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let set = load_file(file.path()).unwrap();
        assert_eq!(set.schemas.len(), 1);
    }
}
