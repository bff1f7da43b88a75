//! Object matching between the actual snapshot and the desired model.
//!
//! Three passes per diff run. The exact pass pairs objects sharing a name.
//! The fuzzy pass scores the remaining unclaimed actual objects against each
//! still-unmatched desired object and pairs them when one candidate clearly
//! wins, which is how renames are detected. The deletion pass turns whatever
//! is still unclaimed into deletion comparators. Every actual object ends up
//! in at most one comparator; the [`ClaimSet`] enforces that.

use std::collections::BTreeSet;

use drift_schema::{
    Column, ColumnState, ConstraintKind, Domain, DomainState, Schema, SchemaSet, SchemaState,
    Snapshot, Table, TableState,
};
use tracing::debug;

use crate::claims::{ClaimSet, ObjectKind};
use crate::comparator::{ColumnComparator, DomainComparator, NamePair, TableComparator};
use crate::config::MatchConfig;
use crate::error::Result;

/// All comparators produced by a matching run.
#[derive(Debug, Default)]
pub struct MatchOutcome {
    /// Domain pairings, including creations and deletions.
    pub domains: Vec<DomainComparator>,
    /// Table pairings, including creations and deletions.
    pub tables: Vec<TableComparator>,
}

/// A scored fuzzy-match candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    key: String,
    score: i64,
}

/// Selects the winning candidate, if any.
///
/// Candidates are ranked by descending score, ties broken by descending key
/// so the result never depends on input order. The top candidate wins when
/// it is the only one with a positive score, or when its score strictly
/// exceeds `dominance` times the runner-up's.
fn pick(mut candidates: Vec<Candidate>, dominance: i64) -> Option<String> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score).then(b.key.cmp(&a.key)));
    match candidates.as_slice() {
        [] => None,
        [only] => (only.score > 0).then(|| only.key.clone()),
        [top, runner_up, rest @ ..] => {
            let positive =
                [top, runner_up].iter().filter(|c| c.score > 0).count() as i64
                    + rest.iter().filter(|c| c.score > 0).count() as i64;
            if positive == 1 && top.score > 0 {
                Some(top.key.clone())
            } else if top.score > dominance * runner_up.score {
                Some(top.key.clone())
            } else {
                None
            }
        }
    }
}

fn constraint_signature(kind: &ConstraintKind) -> String {
    match kind {
        ConstraintKind::PrimaryKey => "primary key".to_string(),
        ConstraintKind::Unique => "unique".to_string(),
        ConstraintKind::ForeignKey(fk) => format!(
            "foreign key {}.{}",
            fk.table.to_ascii_lowercase(),
            fk.column.to_ascii_lowercase()
        ),
        ConstraintKind::Check { expr } => {
            format!("check {}", expr.trim().to_ascii_lowercase())
        }
    }
}

/// Pairs actual objects with desired ones.
pub struct Matcher<'a> {
    config: &'a MatchConfig,
    desired: &'a SchemaSet,
    snapshot: &'a Snapshot,
    claims: ClaimSet,
}

impl<'a> Matcher<'a> {
    /// Creates a matcher over one snapshot and one desired model.
    #[must_use]
    pub fn new(config: &'a MatchConfig, desired: &'a SchemaSet, snapshot: &'a Snapshot) -> Self {
        Self {
            config,
            desired,
            snapshot,
            claims: ClaimSet::new(),
        }
    }

    /// Runs all three passes and consumes the matcher.
    pub fn run(mut self) -> Result<MatchOutcome> {
        let mut outcome = MatchOutcome::default();
        let mut postponed_domains = Vec::new();
        let mut postponed_tables = Vec::new();

        let desired = self.desired;
        for schema in &desired.schemas {
            self.exact_pass(schema, &mut outcome, &mut postponed_domains, &mut postponed_tables)?;
        }
        self.fuzzy_domain_pass(&postponed_domains, &mut outcome);
        self.fuzzy_table_pass(&postponed_tables, &mut outcome)?;
        self.deletion_pass(&mut outcome);
        Ok(outcome)
    }

    fn exact_pass(
        &mut self,
        schema: &'a Schema,
        outcome: &mut MatchOutcome,
        postponed_domains: &mut Vec<(&'a Schema, &'a Domain)>,
        postponed_tables: &mut Vec<(&'a Schema, &'a Table)>,
    ) -> Result<()> {
        let snapshot = self.snapshot;
        let state = snapshot.get_schema(&schema.name);

        for domain in schema.domains.values() {
            let actual = state.and_then(|s| find_domain(s, &domain.name));
            match actual {
                // The claim can already be taken when two desired names
                // differ only by case; the loser goes through the fuzzy
                // pass like any other unmatched object.
                Some(found) if self.claims.claim(&schema.name, ObjectKind::Domain, &found.name) => {
                    outcome.domains.push(DomainComparator {
                        old_schema: schema.name.clone(),
                        schema: schema.name.clone(),
                        names: NamePair::exact(&domain.name),
                        old: Some(found.clone()),
                        new: Some(domain.clone()),
                    });
                }
                _ => postponed_domains.push((schema, domain)),
            }
        }

        for table in schema.tables.values() {
            let actual = state.and_then(|s| find_table(s, &table.name));
            match actual {
                Some(found) if self.claims.claim(&schema.name, ObjectKind::Table, &found.name) => {
                    let columns = self.match_columns(schema, found, table)?;
                    outcome.tables.push(TableComparator {
                        old_schema: schema.name.clone(),
                        schema: schema.name.clone(),
                        names: NamePair::exact(&table.name),
                        old: Some(found.clone()),
                        new: Some(table.clone()),
                        columns,
                    });
                }
                _ => postponed_tables.push((schema, table)),
            }
        }
        Ok(())
    }

    fn fuzzy_domain_pass(&mut self, postponed: &[(&Schema, &Domain)], outcome: &mut MatchOutcome) {
        for &(schema, domain) in postponed {
            let snapshot = self.snapshot;
            let mut candidates = Vec::new();
            if let Some(state) = snapshot.get_schema(&schema.name) {
                for actual in state.domains.values() {
                    if self.claims.is_claimed(&schema.name, ObjectKind::Domain, &actual.name) {
                        continue;
                    }
                    if let Some(score) = self.score_domain(schema, actual, domain) {
                        candidates.push(Candidate {
                            key: actual.name.clone(),
                            score,
                        });
                    }
                }
            }

            match pick(candidates, self.config.dominance) {
                Some(winner) => {
                    debug!(
                        schema = %schema.name,
                        from = %winner,
                        to = %domain.name,
                        "fuzzy-matched domain"
                    );
                    self.claims.claim(&schema.name, ObjectKind::Domain, &winner);
                    let old = snapshot
                        .get_schema(&schema.name)
                        .and_then(|s| find_domain(s, &winner))
                        .cloned();
                    outcome.domains.push(DomainComparator {
                        old_schema: schema.name.clone(),
                        schema: schema.name.clone(),
                        names: NamePair::pair(winner, &domain.name),
                        old,
                        new: Some(domain.clone()),
                    });
                }
                None => outcome.domains.push(DomainComparator {
                    old_schema: schema.name.clone(),
                    schema: schema.name.clone(),
                    names: NamePair::created(&domain.name),
                    old: None,
                    new: Some(domain.clone()),
                }),
            }
        }
    }

    fn fuzzy_table_pass(
        &mut self,
        postponed: &[(&Schema, &Table)],
        outcome: &mut MatchOutcome,
    ) -> Result<()> {
        for &(schema, table) in postponed {
            let snapshot = self.snapshot;
            let mut candidates = Vec::new();
            if let Some(state) = snapshot.get_schema(&schema.name) {
                for actual in state.tables.values() {
                    if self.claims.is_claimed(&schema.name, ObjectKind::Table, &actual.name) {
                        continue;
                    }
                    candidates.push(Candidate {
                        key: actual.name.clone(),
                        score: score_table(actual, table),
                    });
                }
            }

            match pick(candidates, self.config.dominance) {
                Some(winner) => {
                    debug!(
                        schema = %schema.name,
                        from = %winner,
                        to = %table.name,
                        "fuzzy-matched table"
                    );
                    self.claims.claim(&schema.name, ObjectKind::Table, &winner);
                    let old = snapshot
                        .get_schema(&schema.name)
                        .and_then(|s| find_table(s, &winner))
                        .cloned();
                    let columns = match &old {
                        Some(actual) => self.match_columns(schema, actual, table)?,
                        None => Vec::new(),
                    };
                    outcome.tables.push(TableComparator {
                        old_schema: schema.name.clone(),
                        schema: schema.name.clone(),
                        names: NamePair::pair(winner, &table.name),
                        old,
                        new: Some(table.clone()),
                        columns,
                    });
                }
                None => outcome.tables.push(TableComparator {
                    old_schema: schema.name.clone(),
                    schema: schema.name.clone(),
                    names: NamePair::created(&table.name),
                    old: None,
                    new: Some(table.clone()),
                    columns: Vec::new(),
                }),
            }
        }
        Ok(())
    }

    /// Pairs the columns of one matched table: exact names first, then fuzzy
    /// scoring for the rest, then deletions for unclaimed actual columns.
    fn match_columns(
        &mut self,
        schema: &Schema,
        actual: &TableState,
        table: &Table,
    ) -> Result<Vec<ColumnComparator>> {
        let mut comparators = Vec::new();
        let mut postponed = Vec::new();

        for column in &table.columns {
            match actual.get_column(&column.name) {
                Some(found) => {
                    self.claims.claim(
                        &schema.name,
                        ObjectKind::Column,
                        &column_key(&actual.name, &found.name),
                    );
                    comparators.push(ColumnComparator {
                        names: NamePair::exact(&column.name),
                        old: Some(found.clone()),
                        new: Some(column.clone()),
                    });
                }
                None => postponed.push(column),
            }
        }

        for column in postponed {
            let mut candidates = Vec::new();
            for state in &actual.columns {
                let key = column_key(&actual.name, &state.name);
                if self.claims.is_claimed(&schema.name, ObjectKind::Column, &key) {
                    continue;
                }
                candidates.push(Candidate {
                    key: state.name.clone(),
                    score: self.score_column(schema, table, actual, state, column)?,
                });
            }

            match pick(candidates, self.config.dominance) {
                Some(winner) => {
                    debug!(
                        table = %actual.name,
                        from = %winner,
                        to = %column.name,
                        "fuzzy-matched column"
                    );
                    self.claims.claim(
                        &schema.name,
                        ObjectKind::Column,
                        &column_key(&actual.name, &winner),
                    );
                    comparators.push(ColumnComparator {
                        names: NamePair::pair(&winner, &column.name),
                        old: actual.get_column(&winner).cloned(),
                        new: Some(column.clone()),
                    });
                }
                None => comparators.push(ColumnComparator {
                    names: NamePair::created(&column.name),
                    old: None,
                    new: Some(column.clone()),
                }),
            }
        }

        for state in &actual.columns {
            let key = column_key(&actual.name, &state.name);
            if self.claims.is_claimed(&schema.name, ObjectKind::Column, &key) {
                continue;
            }
            self.claims.claim(&schema.name, ObjectKind::Column, &key);
            comparators.push(ColumnComparator {
                names: NamePair::deleted(&state.name),
                old: Some(state.clone()),
                new: None,
            });
        }

        Ok(comparators)
    }

    fn deletion_pass(&mut self, outcome: &mut MatchOutcome) {
        let desired = self.desired;
        let snapshot = self.snapshot;
        for schema in &desired.schemas {
            let Some(state) = snapshot.get_schema(&schema.name) else {
                continue;
            };
            for domain in state.domains.values() {
                if self.claims.claim(&schema.name, ObjectKind::Domain, &domain.name) {
                    outcome.domains.push(DomainComparator {
                        old_schema: schema.name.clone(),
                        schema: schema.name.clone(),
                        names: NamePair::deleted(&domain.name),
                        old: Some(domain.clone()),
                        new: None,
                    });
                }
            }
            for table in state.tables.values() {
                if self.claims.claim(&schema.name, ObjectKind::Table, &table.name) {
                    outcome.tables.push(TableComparator {
                        old_schema: schema.name.clone(),
                        schema: schema.name.clone(),
                        names: NamePair::deleted(&table.name),
                        old: Some(table.clone()),
                        new: None,
                        columns: Vec::new(),
                    });
                }
            }
        }
    }

    /// Scores an actual domain against a desired one. Disqualified (None)
    /// when base type or nullability differ; otherwise scored by how many of
    /// the actual domain's usage sites the desired domain also has.
    fn score_domain(
        &self,
        schema: &Schema,
        actual: &DomainState,
        desired: &Domain,
    ) -> Option<i64> {
        if actual.base != desired.base || actual.not_null != desired.not_null {
            return None;
        }
        let desired_usages = self.desired.domain_usages(&schema.name, &desired.name);
        let mut score = 0;
        for (a_schema, a_table, a_column) in self.snapshot_domain_usages(&schema.name, &actual.name)
        {
            for (d_schema, d_table, d_column) in &desired_usages {
                if a_table.eq_ignore_ascii_case(d_table) && a_column.eq_ignore_ascii_case(d_column)
                {
                    score += if a_schema.eq_ignore_ascii_case(d_schema) {
                        self.config.domain_same_schema_usage
                    } else {
                        self.config.domain_cross_schema_usage
                    };
                    break;
                }
            }
        }
        Some(score)
    }

    /// Lists every (schema, table, column) site in the snapshot typed by the
    /// given domain.
    fn snapshot_domain_usages(
        &self,
        domain_schema: &str,
        domain_name: &str,
    ) -> Vec<(&str, &str, &str)> {
        let mut usages = Vec::new();
        for state in self.snapshot.schemas.values() {
            for table in state.tables.values() {
                for column in &table.columns {
                    if let Some(dref) = &column.domain {
                        let target = dref.schema.as_deref().unwrap_or(state.name.as_str());
                        if target.eq_ignore_ascii_case(domain_schema)
                            && dref.name.eq_ignore_ascii_case(domain_name)
                        {
                            usages.push((
                                state.name.as_str(),
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

    fn score_column(
        &self,
        schema: &Schema,
        table: &Table,
        actual_table: &TableState,
        actual: &ColumnState,
        desired: &Column,
    ) -> Result<i64> {
        let resolved = self
            .desired
            .resolve_column(&schema.name, &table.name, desired)?;
        let desired_not_null = self.desired.effective_not_null(&schema.name, table, desired)?;

        let mut score = 0;
        if actual.base == resolved.base {
            score += self.config.column_type_weight;
        }
        if actual.length == resolved.length {
            score += self.config.column_length_weight;
        }
        if actual.not_null == desired_not_null {
            score += self.config.column_not_null_weight;
        }

        let actual_signatures: BTreeSet<String> = actual_table
            .constraints
            .iter()
            .filter(|c| c.columns.iter().any(|n| n.eq_ignore_ascii_case(&actual.name)))
            .map(|c| constraint_signature(&c.kind))
            .collect();
        let mut desired_signatures: BTreeSet<String> = desired
            .constraints
            .iter()
            .map(|c| constraint_signature(&c.kind))
            .collect();
        for tc in &table.constraints {
            if tc.columns.iter().any(|n| n.eq_ignore_ascii_case(&desired.name)) {
                desired_signatures.insert(constraint_signature(&tc.constraint.kind));
            }
        }
        score += actual_signatures.intersection(&desired_signatures).count() as i64
            * self.config.column_constraint_weight;

        Ok(score)
    }
}

fn score_table(actual: &TableState, desired: &Table) -> i64 {
    let mut score = 0;
    for column in &desired.columns {
        if actual.get_column(&column.name).is_some() {
            score += 1;
        } else {
            score -= 1;
        }
    }
    score
}

fn column_key(table: &str, column: &str) -> String {
    format!("{table}.{column}")
}

fn find_domain<'s>(state: &'s SchemaState, name: &str) -> Option<&'s DomainState> {
    state
        .domains
        .values()
        .find(|d| d.name.eq_ignore_ascii_case(name))
}

fn find_table<'s>(state: &'s SchemaState, name: &str) -> Option<&'s TableState> {
    state
        .tables
        .values()
        .find(|t| t.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_schema::{BaseType, Constraint, TypeSpec};

    fn pick_keys(pairs: &[(&str, i64)]) -> Option<String> {
        pick(
            pairs
                .iter()
                .map(|(key, score)| Candidate {
                    key: (*key).to_string(),
                    score: *score,
                })
                .collect(),
            2,
        )
    }

    #[test]
    fn test_pick_single_positive() {
        assert_eq!(pick_keys(&[("regions", 3)]), Some("regions".to_string()));
        assert_eq!(pick_keys(&[("regions", 0)]), None);
        assert_eq!(pick_keys(&[("regions", -2)]), None);
    }

    #[test]
    fn test_pick_requires_dominance() {
        assert_eq!(pick_keys(&[("a", 5), ("b", 4)]), None);
        assert_eq!(pick_keys(&[("a", 5), ("b", 2)]), Some("a".to_string()));
        assert_eq!(pick_keys(&[("a", 5), ("b", 1), ("c", 1)]), Some("a".to_string()));
    }

    #[test]
    fn test_pick_zero_dominates_negative() {
        // 0 > 2 * -3, so a lone zero-score candidate beats a negative one.
        assert_eq!(pick_keys(&[("a", 0), ("b", -3)]), Some("a".to_string()));
    }

    #[test]
    fn test_pick_tie_break_is_deterministic() {
        // Equal scores rank by descending key; neither dominates, so the
        // result is None, but ordering inside pick must not depend on input
        // order either way.
        assert_eq!(pick_keys(&[("a", 3), ("b", 3)]), None);
        assert_eq!(pick_keys(&[("b", 3), ("a", 3)]), None);
    }

    fn users_table() -> Table {
        Table::new("users")
            .column(Column::new("id", TypeSpec::new(BaseType::BigInt)).constraint(Constraint {
                name: "users_pkey".to_string(),
                kind: ConstraintKind::PrimaryKey,
            }))
            .column(Column::new("name", TypeSpec::new(BaseType::Text)))
    }

    fn regions_desired() -> Table {
        Table::new("geo_regions")
            .column(Column::new("id", TypeSpec::new(BaseType::BigInt)).constraint(Constraint {
                name: "geo_regions_pkey".to_string(),
                kind: ConstraintKind::PrimaryKey,
            }))
            .column(Column::new(
                "country_code",
                TypeSpec::new(BaseType::Varchar).length(2),
            ))
            .column(Column::new("name", TypeSpec::new(BaseType::Text)))
    }

    fn desired_set() -> SchemaSet {
        SchemaSet::new().schema(
            Schema::new("public")
                .table(users_table())
                .table(regions_desired()),
        )
    }

    fn actual_snapshot() -> Snapshot {
        // The live database still calls the table "regions".
        let mut renamed = regions_desired();
        renamed.name = "regions".to_string();
        let set = SchemaSet::new().schema(
            Schema::new("public")
                .table(users_table())
                .table(renamed),
        );
        Snapshot::reflect(&set).unwrap()
    }

    #[test]
    fn test_rename_detected_via_fuzzy_pass() {
        let config = MatchConfig::default();
        let desired = desired_set();
        let snapshot = actual_snapshot();

        let outcome = Matcher::new(&config, &desired, &snapshot).run().unwrap();

        let renamed: Vec<&TableComparator> = outcome
            .tables
            .iter()
            .filter(|t| t.names.is_rename())
            .collect();
        assert_eq!(renamed.len(), 1);
        assert_eq!(renamed[0].names.actual, "regions");
        assert_eq!(renamed[0].names.desired, "geo_regions");

        // Nothing should be reported deleted or created.
        assert!(outcome.tables.iter().all(|t| t.old.is_some() && t.new.is_some()));
    }

    #[test]
    fn test_each_actual_object_claimed_at_most_once() {
        let config = MatchConfig::default();
        let desired = desired_set();
        let snapshot = actual_snapshot();

        let outcome = Matcher::new(&config, &desired, &snapshot).run().unwrap();

        let mut seen = BTreeSet::new();
        for table in &outcome.tables {
            if !table.names.actual.is_empty() {
                assert!(seen.insert(table.names.actual.to_ascii_lowercase()));
            }
        }
    }

    #[test]
    fn test_case_colliding_desired_names_claim_the_actual_once() {
        // "users" and "Users" are distinct desired tables (map keys are
        // case-sensitive) but only one actual table exists. Exactly one of
        // them may claim it; the other degrades to a creation.
        let mut upper = users_table();
        upper.name = "Users".to_string();
        let desired = SchemaSet::new()
            .schema(Schema::new("public").table(users_table()).table(upper));

        let actual_set = SchemaSet::new().schema(Schema::new("public").table(users_table()));
        let snapshot = Snapshot::reflect(&actual_set).unwrap();
        let config = MatchConfig::default();

        let outcome = Matcher::new(&config, &desired, &snapshot).run().unwrap();

        let matched: Vec<&TableComparator> = outcome
            .tables
            .iter()
            .filter(|t| t.old.is_some() && t.new.is_some())
            .collect();
        assert_eq!(matched.len(), 1);
        assert!(matched[0].names.actual.eq_ignore_ascii_case("users"));

        let created = outcome
            .tables
            .iter()
            .filter(|t| t.old.is_none() && t.new.is_some())
            .count();
        assert_eq!(created, 1);

        // The actual table must never be reported deleted either.
        assert!(outcome.tables.iter().all(|t| t.new.is_some()));
    }

    #[test]
    fn test_ambiguous_candidates_are_not_matched() {
        // Two actual tables score identically against the desired one, so
        // the desired table must come out as a creation.
        let mut first = regions_desired();
        first.name = "regions_a".to_string();
        let mut second = regions_desired();
        second.name = "regions_b".to_string();
        let actual_set =
            SchemaSet::new().schema(Schema::new("public").table(first).table(second));
        let snapshot = Snapshot::reflect(&actual_set).unwrap();

        let desired = SchemaSet::new().schema(Schema::new("public").table(regions_desired()));
        let config = MatchConfig::default();

        let outcome = Matcher::new(&config, &desired, &snapshot).run().unwrap();

        let created: Vec<&TableComparator> = outcome
            .tables
            .iter()
            .filter(|t| t.old.is_none())
            .collect();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].names.desired, "geo_regions");

        let deleted = outcome.tables.iter().filter(|t| t.new.is_none()).count();
        assert_eq!(deleted, 2);
    }

    #[test]
    fn test_unclaimed_actuals_become_deletions() {
        let desired = SchemaSet::new().schema(Schema::new("public").table(users_table()));
        let snapshot = actual_snapshot();
        let config = MatchConfig::default();

        let outcome = Matcher::new(&config, &desired, &snapshot).run().unwrap();

        let deleted: Vec<&TableComparator> = outcome
            .tables
            .iter()
            .filter(|t| t.new.is_none())
            .collect();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].names.actual, "regions");
    }

    #[test]
    fn test_fuzzy_column_match_inside_exact_table() {
        // Same table name, one column renamed. The column must pair up
        // rather than produce a drop and an add.
        let mut desired_users = users_table();
        desired_users.columns[1].name = "full_name".to_string();
        let desired = SchemaSet::new().schema(Schema::new("public").table(desired_users));

        let actual_set = SchemaSet::new().schema(Schema::new("public").table(users_table()));
        let snapshot = Snapshot::reflect(&actual_set).unwrap();
        let config = MatchConfig::default();

        let outcome = Matcher::new(&config, &desired, &snapshot).run().unwrap();

        assert_eq!(outcome.tables.len(), 1);
        let renamed: Vec<&ColumnComparator> = outcome.tables[0]
            .columns
            .iter()
            .filter(|c| c.names.is_rename())
            .collect();
        assert_eq!(renamed.len(), 1);
        assert_eq!(renamed[0].names.actual, "name");
        assert_eq!(renamed[0].names.desired, "full_name");
    }

    #[test]
    fn test_domain_fuzzy_match_by_usage() {
        let desired = SchemaSet::new().schema(
            Schema::new("public")
                .domain(
                    drift_schema::Domain::new("email_address", BaseType::Varchar)
                        .length(320)
                        .not_null(),
                )
                .table(Table::new("users").column(Column::with_domain(
                    "email",
                    drift_schema::DomainRef {
                        schema: None,
                        name: "email_address".to_string(),
                    },
                ))),
        );

        let actual_set = SchemaSet::new().schema(
            Schema::new("public")
                .domain(
                    drift_schema::Domain::new("email", BaseType::Varchar)
                        .length(320)
                        .not_null(),
                )
                .table(Table::new("users").column(Column::with_domain(
                    "email",
                    drift_schema::DomainRef {
                        schema: None,
                        name: "email".to_string(),
                    },
                ))),
        );
        let snapshot = Snapshot::reflect(&actual_set).unwrap();
        let config = MatchConfig::default();

        let outcome = Matcher::new(&config, &desired, &snapshot).run().unwrap();

        let renamed: Vec<&DomainComparator> = outcome
            .domains
            .iter()
            .filter(|d| d.names.is_rename())
            .collect();
        assert_eq!(renamed.len(), 1);
        assert_eq!(renamed[0].names.actual, "email");
        assert_eq!(renamed[0].names.desired, "email_address");
    }
}
