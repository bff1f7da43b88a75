//! Comparator records: the pairing of an actual object with a desired one.
//!
//! Comparators are ephemeral: produced by the matcher and consumed by the
//! statement builders within a single diff run. An absent `old` side means
//! the object is new; an absent `new` side means it is being deleted.

use drift_schema::{Column, ColumnState, Domain, DomainState, Table, TableState};

/// The (actual, desired) name pairing for one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePair {
    /// Name in the actual schema. Empty for new objects.
    pub actual: String,
    /// Name in the desired schema. Empty for deleted objects.
    pub desired: String,
}

impl NamePair {
    /// Both sides carry the same name.
    #[must_use]
    pub fn exact(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            actual: name.clone(),
            desired: name,
        }
    }

    /// The object was matched under a different name.
    #[must_use]
    pub fn pair(actual: impl Into<String>, desired: impl Into<String>) -> Self {
        Self {
            actual: actual.into(),
            desired: desired.into(),
        }
    }

    /// The object only exists in the desired schema.
    #[must_use]
    pub fn created(desired: impl Into<String>) -> Self {
        Self {
            actual: String::new(),
            desired: desired.into(),
        }
    }

    /// The object only exists in the actual schema.
    #[must_use]
    pub fn deleted(actual: impl Into<String>) -> Self {
        Self {
            actual: actual.into(),
            desired: String::new(),
        }
    }

    /// True when both sides exist under different names.
    #[must_use]
    pub fn is_rename(&self) -> bool {
        !self.actual.is_empty()
            && !self.desired.is_empty()
            && !self.actual.eq_ignore_ascii_case(&self.desired)
    }
}

/// Pairing of an actual domain with a desired one.
#[derive(Debug, Clone)]
pub struct DomainComparator {
    /// Schema the actual domain lives in.
    pub old_schema: String,
    /// Schema the desired domain lives in.
    pub schema: String,
    /// Name pairing.
    pub names: NamePair,
    /// Actual shape, if the domain exists.
    pub old: Option<DomainState>,
    /// Desired shape, if the domain is kept.
    pub new: Option<Domain>,
}

/// Pairing of an actual column with a desired one.
#[derive(Debug, Clone)]
pub struct ColumnComparator {
    /// Name pairing.
    pub names: NamePair,
    /// Actual shape, if the column exists.
    pub old: Option<ColumnState>,
    /// Desired shape, if the column is kept.
    pub new: Option<Column>,
}

/// Pairing of an actual table with a desired one, with its nested column
/// comparators.
#[derive(Debug, Clone)]
pub struct TableComparator {
    /// Schema the actual table lives in.
    pub old_schema: String,
    /// Schema the desired table lives in.
    pub schema: String,
    /// Name pairing.
    pub names: NamePair,
    /// Actual shape, if the table exists.
    pub old: Option<TableState>,
    /// Desired shape, if the table is kept.
    pub new: Option<Table>,
    /// Column pairings: desired order first, then pure deletions.
    pub columns: Vec<ColumnComparator>,
}
