use super::Resolver;
use joinery_core::{
    schema::{ColumnId, Selectable},
    stmt::{visit_mut, Annotations, Expr, ExprBinaryOp, ExprColumn},
    Catalog, Error, Result,
};

use indexmap::IndexSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Lhs,
    Rhs,
}

/// Calls `f` on every binary operation within `expr`, innermost first.
fn for_each_binary_mut(expr: &mut Expr, mut f: impl FnMut(&mut ExprBinaryOp)) {
    visit_mut::for_each_expr_mut(expr, |expr| {
        if let Expr::BinaryOp(binary) = expr {
            f(binary);
        }
    });
}

fn annotate_operand(operand: &mut Expr, annotations: Annotations) {
    if let Some(column) = operand.as_column_mut() {
        column.annotations.insert(annotations);
    }
}

impl Resolver<'_> {
    /// Marks the columns holding foreign key values.
    pub(super) fn annotate_fks(&mut self) {
        if self.has_annotation(Annotations::FOREIGN) {
            return;
        }

        let args = self.args;
        if !args.foreign_keys.is_empty() {
            self.annotate_columns(Annotations::FOREIGN, |column| {
                args.foreign_keys.contains(&column.column)
            });
        } else {
            self.annotate_present_fks();
        }

        if !self.has_annotation(Annotations::FOREIGN) {
            self.annotate_non_simple_fks();
        }
    }

    /// Marks, per comparison of two columns, the column referencing the
    /// other one. With a secondary table, its columns are foreign relative to
    /// anything outside of it.
    fn annotate_present_fks(&mut self) {
        let catalog = self.catalog;
        let secondary = self.secondary();

        for join in self.joins_mut() {
            for_each_binary_mut(join, |binary| {
                if binary.lhs.as_column().is_some_and(ExprColumn::is_foreign)
                    || binary.rhs.as_column().is_some_and(ExprColumn::is_foreign)
                {
                    return;
                }

                match is_foreign(catalog, secondary, &binary.lhs, &binary.rhs) {
                    Some(Operand::Lhs) => annotate_operand(&mut binary.lhs, Annotations::FOREIGN),
                    Some(Operand::Rhs) => annotate_operand(&mut binary.rhs, Annotations::FOREIGN),
                    None => {}
                }
            });
        }
    }

    /// Best effort for joins that compare computed expressions: nothing marks
    /// a foreign column, so the child side of each such comparison is
    /// treated as foreign.
    fn annotate_non_simple_fks(&mut self) {
        let args = self.args;
        if !args.support_sync
            || args.secondary.is_some()
            || self.is_self_referential()
            || self.parent().overlaps(self.child())
        {
            return;
        }

        let child = self.child();
        let mut annotated = false;

        for_each_binary_mut(&mut self.primaryjoin, |binary| {
            if !binary.op.is_comparison() || binary.is_simple() {
                return;
            }

            for operand in [&mut *binary.lhs, &mut *binary.rhs] {
                operand.for_each_column_mut(|column| {
                    if child.contains_column(column) {
                        column.annotations.insert(Annotations::FOREIGN);
                        annotated = true;
                    }
                });
            }
        });

        if annotated {
            self.warn_non_simple();
        }
    }

    /// Marks the columns on the remote side of the relationship.
    pub(super) fn annotate_remote(&mut self) -> Result<()> {
        if self.has_annotation(Annotations::REMOTE) {
            self.caller_remote = true;
            return Ok(());
        }

        let args = self.args;

        if let Some(secondary) = self.secondary() {
            self.annotate_columns(Annotations::REMOTE, |column| {
                secondary.contains_column(column)
            });
        } else if !args.local_remote_pairs.is_empty() || !args.remote_side.is_empty() {
            self.annotate_remote_from_args()?;
        } else if self.is_self_referential() {
            self.annotate_selfref(ExprColumn::is_foreign, false);
        } else if self.parent().overlaps(self.child()) {
            self.annotate_remote_with_overlap();
        } else {
            self.annotate_remote_distinct();
        }

        Ok(())
    }

    fn annotate_remote_from_args(&mut self) -> Result<()> {
        let args = self.args;

        let remote_side: IndexSet<ColumnId> = if !args.local_remote_pairs.is_empty() {
            if !args.remote_side.is_empty() {
                return Err(Error::invalid_relationship(
                    "remote_side argument is redundant against more detailed \
                     _local_remote_side argument.",
                ));
            }
            args.local_remote_pairs.iter().map(|(_, remote)| *remote).collect()
        } else {
            args.remote_side.clone()
        };

        if self.is_self_referential() {
            self.annotate_selfref(|column| remote_side.contains(&column.column), true);
        } else {
            self.annotate_columns(Annotations::REMOTE, |column| {
                remote_side.contains(&column.column)
            });
        }

        Ok(())
    }

    /// Self-referential joins: per comparison of two columns, the operands
    /// matching `is_remote` are remote. An operand equated with itself only
    /// counts once.
    fn annotate_selfref(&mut self, is_remote: impl Fn(&ExprColumn) -> bool, remote_side_given: bool) {
        let mut non_column = false;

        for_each_binary_mut(&mut self.primaryjoin, |binary| {
            let (Some(lhs), Some(rhs)) = (binary.lhs.as_column(), binary.rhs.as_column()) else {
                non_column = true;
                return;
            };

            let equated = lhs.is_same_column(rhs);
            let remote_lhs = is_remote(lhs);
            let remote_rhs = is_remote(rhs) && !equated;

            if remote_lhs {
                annotate_operand(&mut binary.lhs, Annotations::REMOTE);
            }
            if remote_rhs {
                annotate_operand(&mut binary.rhs, Annotations::REMOTE);
            }
        });

        if non_column && !remote_side_given {
            self.warn_non_simple();
        }
    }

    /// Parent and child share a table (joined inheritance): per comparison,
    /// a child column compared with a parent column is remote.
    fn annotate_remote_with_overlap(&mut self) {
        let parent = self.parent();
        let child = self.child();
        let mut non_column = false;

        for_each_binary_mut(&mut self.primaryjoin, |binary| {
            let (Some(lhs), Some(rhs)) = (binary.lhs.as_column(), binary.rhs.as_column()) else {
                non_column = true;
                return;
            };

            let remote_rhs = child.contains_column(rhs) && parent.contains_column(lhs);
            let remote_lhs = child.contains_column(lhs) && parent.contains_column(rhs);

            if remote_rhs {
                annotate_operand(&mut binary.rhs, Annotations::REMOTE);
            }
            if remote_lhs {
                annotate_operand(&mut binary.lhs, Annotations::REMOTE);
            }
        });

        if non_column {
            self.warn_non_simple();
        }
    }

    /// Distinct parent and child: child columns are remote unless they only
    /// belong to the parent's local selectable.
    fn annotate_remote_distinct(&mut self) {
        let args = self.args;
        let child = self.child();
        let parent_local = args.parent_local_selectable();
        let child_local = args.child_local_selectable();

        self.annotate_columns(Annotations::REMOTE, |column| {
            child.contains_column(column)
                && (!parent_local.contains_column(column) || child_local.contains_column(column))
        });
    }

    /// Marks the columns on the parent side that are not remote.
    pub(super) fn annotate_local(&mut self) {
        if self.primaryjoin.has_annotation(Annotations::LOCAL) {
            return;
        }

        let args = self.args;
        let parent = self.parent();
        let explicit: IndexSet<ColumnId> =
            args.local_remote_pairs.iter().map(|(local, _)| *local).collect();

        self.primaryjoin.for_each_column_mut(|column| {
            if column.is_remote() {
                return;
            }

            let local = if explicit.is_empty() {
                parent.contains_column(column)
            } else {
                explicit.contains(&column.column)
            };

            if local {
                column.annotations.insert(Annotations::LOCAL);
            }
        });
    }
}

/// Returns the operand holding the foreign key, if one can be told apart.
fn is_foreign(
    catalog: &Catalog,
    secondary: Option<&Selectable>,
    lhs: &Expr,
    rhs: &Expr,
) -> Option<Operand> {
    if let (Some(lhs), Some(rhs)) = (lhs.as_column(), rhs.as_column()) {
        if catalog.references(lhs.column, rhs.column) {
            return Some(Operand::Lhs);
        }
        if catalog.references(rhs.column, lhs.column) {
            return Some(Operand::Rhs);
        }
    }

    let secondary = secondary?;
    let in_secondary = |expr: &Expr| expr.as_column().is_some_and(|column| secondary.contains_column(column));

    match (in_secondary(lhs), in_secondary(rhs)) {
        (true, false) => Some(Operand::Lhs),
        (false, true) => Some(Operand::Rhs),
        _ => None,
    }
}
