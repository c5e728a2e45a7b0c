use super::{Annotations, Expr};
use crate::schema::{Column, ColumnId};

use std::sync::Arc;

/// A reference to a column, optionally qualified by a table alias.
///
/// The same column can occur several times within one expression; each
/// occurrence carries its own [`Annotations`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprColumn {
    /// The referenced column
    pub column: ColumnId,

    /// Name of the table alias the column is selected through, if any
    pub alias: Option<Arc<str>>,

    pub annotations: Annotations,
}

impl Expr {
    pub fn column(column: impl Into<ExprColumn>) -> Self {
        column.into().into()
    }
}

impl ExprColumn {
    pub fn new(column: ColumnId) -> Self {
        ExprColumn {
            column,
            alias: None,
            annotations: Annotations::NONE,
        }
    }

    pub fn aliased(column: ColumnId, alias: impl Into<Arc<str>>) -> Self {
        ExprColumn {
            column,
            alias: Some(alias.into()),
            annotations: Annotations::NONE,
        }
    }

    /// Returns `true` if both occurrences reference the same column through
    /// the same alias, whatever their annotations.
    pub fn is_same_column(&self, other: &ExprColumn) -> bool {
        self.column == other.column && self.alias == other.alias
    }
}

impl From<ColumnId> for ExprColumn {
    fn from(value: ColumnId) -> Self {
        ExprColumn::new(value)
    }
}

impl From<&Column> for ExprColumn {
    fn from(value: &Column) -> Self {
        ExprColumn::new(value.id)
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Self::Column(value)
    }
}

impl From<ColumnId> for Expr {
    fn from(value: ColumnId) -> Self {
        Self::Column(value.into())
    }
}

impl From<&Column> for Expr {
    fn from(value: &Column) -> Self {
        Self::Column(value.into())
    }
}
