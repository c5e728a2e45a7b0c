use super::Resolver;
use crate::relation::ColumnPair;
use joinery_core::stmt::{Expr, ExprColumn};

use indexmap::IndexSet;

impl Resolver<'_> {
    /// Collects the local/remote pairs of both joins and the synchronize
    /// pairs of their top-level equalities.
    pub(super) fn setup_pairs(&mut self) {
        let args = self.args;
        let mut local_remote_pairs = IndexSet::new();

        for join in self.joins() {
            for_each_column_product(join, &mut |lhs, rhs| {
                if rhs.is_remote() && !lhs.is_remote() && args.can_be_synced(lhs.column) {
                    local_remote_pairs.insert((lhs.column, rhs.column));
                } else if lhs.is_remote() && !rhs.is_remote() && args.can_be_synced(rhs.column) {
                    local_remote_pairs.insert((rhs.column, lhs.column));
                }
            });
        }

        self.local_remote_pairs = local_remote_pairs;
        self.synchronize_pairs = self.sync_pairs(&self.primaryjoin);
        self.secondary_synchronize_pairs = match &self.secondaryjoin {
            Some(secondaryjoin) => self.sync_pairs(secondaryjoin),
            None => vec![],
        };
    }

    /// `(source, foreign)` for each top-level conjunct comparing two columns
    /// for equality.
    fn sync_pairs(&self, join: &Expr) -> Vec<ColumnPair> {
        let mut pairs = vec![];

        for conjunct in join.conjuncts() {
            let Expr::BinaryOp(binary) = conjunct else {
                continue;
            };

            if !binary.op.is_eq() {
                continue;
            }

            let (Some(lhs), Some(rhs)) = (binary.lhs.as_column(), binary.rhs.as_column()) else {
                continue;
            };

            if !self.args.can_be_synced(lhs.column) || !self.args.can_be_synced(rhs.column) {
                continue;
            }

            if rhs.is_foreign() {
                pairs.push((lhs.column, rhs.column));
            } else if lhs.is_foreign() {
                pairs.push((rhs.column, lhs.column));
            }
        }

        pairs
    }
}

/// Calls `f` with every (left column, right column) combination of every
/// comparison in `expr`, left to right.
///
/// The columns of an operand are gathered through arithmetic, function calls
/// and boolean operators, but not through a nested comparison; that one is
/// visited on its own.
pub(super) fn for_each_column_product(expr: &Expr, f: &mut impl FnMut(&ExprColumn, &ExprColumn)) {
    leaves(expr, f);
}

fn leaves<'a>(expr: &'a Expr, f: &mut impl FnMut(&ExprColumn, &ExprColumn)) -> Vec<&'a ExprColumn> {
    let mut columns = vec![];

    match expr {
        Expr::BinaryOp(binary) if binary.op.is_comparison() => {
            let lhs = leaves(&binary.lhs, &mut *f);
            let rhs = leaves(&binary.rhs, &mut *f);

            for &l in &lhs {
                for &r in &rhs {
                    f(l, r);
                }
            }
        }
        Expr::BinaryOp(binary) => {
            columns.extend(leaves(&binary.lhs, &mut *f));
            columns.extend(leaves(&binary.rhs, &mut *f));
        }
        Expr::And(expr_and) => {
            for operand in expr_and {
                columns.extend(leaves(operand, &mut *f));
            }
        }
        Expr::Or(expr_or) => {
            for operand in expr_or {
                columns.extend(leaves(operand, &mut *f));
            }
        }
        Expr::Func(func) => {
            for arg in &func.args {
                columns.extend(leaves(arg, &mut *f));
            }
        }
        Expr::Column(column) => columns.push(column),
        Expr::BindParam(_) | Expr::Value(_) => {}
    }

    columns
}
