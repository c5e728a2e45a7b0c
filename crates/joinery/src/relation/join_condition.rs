use super::{ColumnPair, Direction};
use joinery_core::{
    schema::{ColumnId, Selectable},
    stmt::{Annotations, Expr},
};

use indexmap::IndexSet;

/// The resolved join of a relationship.
///
/// Every column occurrence in `primaryjoin` and `secondaryjoin` is annotated
/// with its role: `FOREIGN` for columns holding the foreign key value,
/// `REMOTE` for columns on the child (or secondary) side, `LOCAL` for columns
/// on the parent side.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinCondition {
    /// Display name of the relationship
    pub name: String,

    pub parent_selectable: Selectable,

    pub child_selectable: Selectable,

    pub parent_local_selectable: Selectable,

    pub child_local_selectable: Selectable,

    /// Join between parent and child, or parent and secondary
    pub primaryjoin: Expr,

    /// Join between child and secondary
    pub secondaryjoin: Option<Expr>,

    pub secondary: Option<Selectable>,

    pub direction: Direction,

    /// `(source, destination)` pairs: the destination column receives the
    /// value of the source column when an association is persisted.
    pub synchronize_pairs: Vec<ColumnPair>,

    pub secondary_synchronize_pairs: Vec<ColumnPair>,

    /// `(local, remote)` pairs, in join order
    pub local_remote_pairs: Vec<ColumnPair>,

    pub support_sync: bool,
}

impl JoinCondition {
    pub fn is_self_referential(&self) -> bool {
        self.parent_selectable == self.child_selectable
    }

    /// Columns annotated `REMOTE` in either join.
    pub fn remote_columns(&self) -> IndexSet<ColumnId> {
        self.columns_with(Annotations::REMOTE)
    }

    /// Columns annotated `LOCAL` in either join.
    pub fn local_columns(&self) -> IndexSet<ColumnId> {
        self.columns_with(Annotations::LOCAL)
    }

    /// Columns annotated `FOREIGN` in either join.
    pub fn foreign_key_columns(&self) -> IndexSet<ColumnId> {
        self.columns_with(Annotations::FOREIGN)
    }

    fn columns_with(&self, annotations: Annotations) -> IndexSet<ColumnId> {
        let mut columns = IndexSet::new();
        for join in [Some(&self.primaryjoin), self.secondaryjoin.as_ref()]
            .into_iter()
            .flatten()
        {
            join.for_each_column(|column| {
                if column.annotations.contains(annotations) {
                    columns.insert(column.column);
                }
            });
        }
        columns
    }

    /// Returns the primary join with the local and remote roles swapped,
    /// as needed by the reverse side of the relationship.
    pub fn primaryjoin_reverse_remote(&self) -> Expr {
        if !self.primaryjoin.has_annotation(Annotations::REMOTE) {
            return self
                .primaryjoin
                .deannotate(Annotations::LOCAL | Annotations::REMOTE);
        }

        let mut expr = self.primaryjoin.clone();
        expr.for_each_column_mut(|column| {
            let annotations = &mut column.annotations;
            if annotations.is_remote() {
                annotations.remove(Annotations::REMOTE);
                annotations.insert(Annotations::LOCAL);
            } else if annotations.is_local() {
                annotations.remove(Annotations::LOCAL);
                annotations.insert(Annotations::REMOTE);
            }
        });
        expr
    }

    /// The primary join stripped of `LOCAL` / `REMOTE`, keeping `FOREIGN`.
    pub fn primaryjoin_minus_local(&self) -> Expr {
        self.primaryjoin
            .deannotate(Annotations::LOCAL | Annotations::REMOTE)
    }

    /// The secondary join stripped of `LOCAL` / `REMOTE`, keeping `FOREIGN`.
    pub fn secondaryjoin_minus_local(&self) -> Option<Expr> {
        self.secondaryjoin
            .as_ref()
            .map(|expr| expr.deannotate(Annotations::LOCAL | Annotations::REMOTE))
    }
}
