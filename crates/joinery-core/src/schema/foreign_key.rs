use super::{ColumnId, TableId};

/// A foreign key constraint declared on a table.
///
/// A composite constraint lists one [`ForeignKeyColumn`] per referencing
/// column; all of them point into the same target table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub id: ForeignKeyId,

    /// Referencing / referenced column pairs, in declaration order
    pub columns: Vec<ForeignKeyColumn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForeignKeyId {
    pub table: TableId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForeignKeyColumn {
    /// The referencing column, on the table declaring the constraint
    pub source: ColumnId,

    /// The referenced column
    pub target: ColumnId,
}

impl ForeignKey {
    pub fn target_table(&self) -> Option<TableId> {
        self.columns.first().map(|column| column.target.table)
    }

    pub fn source_columns(&self) -> impl ExactSizeIterator<Item = ColumnId> + '_ {
        self.columns.iter().map(|column| column.source)
    }

    /// Returns `true` if `source` references `target` through this constraint.
    pub fn references(&self, source: ColumnId, target: ColumnId) -> bool {
        self.columns
            .iter()
            .any(|column| column.source == source && column.target == target)
    }
}
