//! Expression nodes.

use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;
use crate::quote;
use crate::statement::Select;

/// A possibly schema-qualified object name (table or domain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectName {
    /// Schema name, if qualified.
    pub schema: Option<String>,
    /// Object name.
    pub name: String,
}

impl ObjectName {
    /// Creates a schema-qualified name.
    #[must_use]
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Creates an unqualified name.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Renders the quoted, dot-joined form.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", quote(schema), quote(&self.name)),
            None => quote(&self.name),
        }
    }

    /// The object-level dependency this name stands for, when qualified.
    #[must_use]
    pub fn dependency(&self) -> Option<Dependency> {
        self.schema
            .as_deref()
            .map(|schema| Dependency::on_object(schema, &self.name))
    }
}

/// A column selector, optionally qualified by a table name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    /// The table the column belongs to, if qualified.
    pub table: Option<ObjectName>,
    /// Column name.
    pub column: String,
}

impl ColumnRef {
    /// Creates an unqualified column reference.
    #[must_use]
    pub fn bare(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    /// Creates a table-qualified column reference.
    #[must_use]
    pub fn scoped(table: ObjectName, column: impl Into<String>) -> Self {
        Self {
            table: Some(table),
            column: column.into(),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Equality.
    Eq,
    /// Inequality.
    NotEq,
    /// Less than.
    Lt,
    /// Less than or equal.
    LtEq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    GtEq,
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// String concatenation.
    Concat,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Concat => "||",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Logical NOT.
    Not,
    /// Arithmetic negation.
    Neg,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Not => "NOT",
            Self::Neg => "-",
        }
    }
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Raw SQL text, rendered verbatim (check expressions, defaults).
    Literal(String),
    /// A quoted string literal.
    Text(String),
    /// A column selector.
    Column(ColumnRef),
    /// Unary operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// Binary operation.
    Binary {
        /// Left operand.
        lhs: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// A bracketed sub-block.
    Paren(Box<Expr>),
    /// A bracketed scalar subquery.
    Subquery(Box<Select>),
}

impl Expr {
    /// Convenience constructor for an equality comparison.
    #[must_use]
    pub fn eq(lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            lhs: Box::new(lhs),
            op: BinaryOp::Eq,
            rhs: Box::new(rhs),
        }
    }

    /// Renders the expression to SQL text.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Text(text) => format!("'{}'", text.replace('\'', "''")),
            Self::Column(column) => match &column.table {
                Some(table) => format!("{}.{}", table.render(), quote(&column.column)),
                None => quote(&column.column),
            },
            Self::Unary { op, operand } => format!("{} {}", op.as_str(), operand.render()),
            Self::Binary { lhs, op, rhs } => {
                format!("{} {} {}", lhs.render(), op.as_str(), rhs.render())
            }
            Self::Paren(inner) => format!("({})", inner.render()),
            Self::Subquery(select) => format!("({})", select.render()),
        }
    }

    /// The named objects this expression requires.
    #[must_use]
    pub fn depended_on(&self) -> Vec<Dependency> {
        match self {
            Self::Literal(_) | Self::Text(_) => Vec::new(),
            Self::Column(column) => match &column.table {
                Some(table) => match &table.schema {
                    Some(schema) => {
                        vec![Dependency::on_field(schema, &table.name, &column.column)]
                    }
                    None => Vec::new(),
                },
                None => Vec::new(),
            },
            Self::Unary { operand, .. } => operand.depended_on(),
            Self::Binary { lhs, rhs, .. } => {
                let mut deps = lhs.depended_on();
                deps.extend(rhs.depended_on());
                deps
            }
            Self::Paren(inner) => inner.depended_on(),
            Self::Subquery(select) => select.depended_on(),
        }
    }
}
