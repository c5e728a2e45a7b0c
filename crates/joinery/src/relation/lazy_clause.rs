use super::JoinCondition;
use joinery_core::{
    schema::ColumnId,
    stmt::{Expr, ExprColumn},
    Catalog,
};

use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// Criterion loading the related rows of one parent row.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyClause {
    /// The join with one side replaced by bind parameters
    pub criterion: Expr,

    /// Which column each bind parameter stands for
    pub bind_to_col: IndexMap<String, ColumnId>,

    /// Maps each column of the loaded side to the column it equals
    pub equated_columns: IndexMap<ColumnId, ColumnId>,
}

impl JoinCondition {
    /// Builds the criterion used to load the related rows of a parent row.
    ///
    /// Local columns are replaced by bind parameters named `param_1`,
    /// `param_2`, ... With `reverse_direction`, the remote side is bound
    /// instead, for loading from the child back to the parent.
    pub fn create_lazy_clause(&self, catalog: &Catalog, reverse_direction: bool) -> LazyClause {
        let has_secondary = self.direction.is_many_to_many();
        let mut lookup = IndexSet::new();
        let mut equated_columns = IndexMap::new();

        for &(local, remote) in &self.local_remote_pairs {
            if has_secondary {
                lookup.insert(local);
                equated_columns.insert(remote, local);
            } else if !reverse_direction {
                equated_columns.insert(remote, local);
            } else {
                equated_columns.insert(local, remote);
            }
        }

        let bind = |column: &ExprColumn| {
            if reverse_direction {
                if has_secondary {
                    lookup.contains(&column.column)
                } else {
                    column.is_remote()
                }
            } else {
                column.is_local()
            }
        };

        let mut binds = Binds::default();

        let mut criterion = self.primaryjoin.clone();
        if !has_secondary || !reverse_direction {
            binds.replace(catalog, &mut criterion, &bind);
        }

        if let Some(secondaryjoin) = &self.secondaryjoin {
            let mut secondaryjoin = secondaryjoin.clone();
            if reverse_direction {
                binds.replace(catalog, &mut secondaryjoin, &bind);
            }
            criterion = Expr::and(criterion, secondaryjoin);
        }

        LazyClause {
            criterion,
            bind_to_col: binds
                .params
                .into_iter()
                .map(|((column, _), name)| (name, column))
                .collect(),
            equated_columns,
        }
    }
}

/// One bind parameter per distinct column occurrence target.
#[derive(Default)]
struct Binds {
    params: IndexMap<(ColumnId, Option<Arc<str>>), String>,
}

impl Binds {
    fn replace(&mut self, catalog: &Catalog, expr: &mut Expr, bind: &impl Fn(&ExprColumn) -> bool) {
        joinery_core::stmt::visit_mut::for_each_expr_mut(expr, |expr| {
            let Expr::Column(column) = expr else {
                return;
            };

            if !bind(&*column) {
                return;
            }

            let next = self.params.len() + 1;
            let name = self
                .params
                .entry((column.column, column.alias.clone()))
                .or_insert_with(|| format!("param_{next}"))
                .clone();
            let ty = catalog.get_column(column.column).map(|column| column.ty);

            *expr = Expr::bind_param(name, ty);
        });
    }
}
