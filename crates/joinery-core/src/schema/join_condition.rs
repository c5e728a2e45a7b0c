use super::{Catalog, ColumnId, ForeignKeyColumn, ForeignKeyId, Selectable};
use crate::{
    stmt::{Expr, ExprColumn},
    Error, Result,
};

use indexmap::{IndexMap, IndexSet};

/// Column pairs found for one foreign key constraint: (referenced, referencing)
type Constraints = IndexMap<ForeignKeyId, Vec<(ExprColumn, ExprColumn)>>;

impl Catalog {
    /// Derives the join criterion between `a` and `b` from the foreign keys
    /// linking them.
    ///
    /// Foreign keys of `b` pointing into `a_subset` are considered first,
    /// then those pointing into `a`; foreign keys of `a` pointing into `b`
    /// are considered alongside. When `consider_as_foreign_keys` is not
    /// empty, only those referencing columns count.
    ///
    /// Returns one `referenced = referencing` comparison per column of the
    /// selected constraint, ANDed together.
    pub fn join_condition(
        &self,
        a: &Selectable,
        b: &Selectable,
        a_subset: Option<&Selectable>,
        consider_as_foreign_keys: &IndexSet<ColumnId>,
    ) -> Result<Expr> {
        let mut constraints = Constraints::new();

        for left in a_subset.into_iter().chain([a]) {
            self.scan_foreign_keys(left, b, consider_as_foreign_keys, &mut constraints);

            if left != b {
                self.scan_foreign_keys(b, left, consider_as_foreign_keys, &mut constraints);
            }

            if !constraints.is_empty() {
                break;
            }
        }

        if constraints.len() > 1 {
            trim_constraints(&mut constraints, consider_as_foreign_keys);
        }

        if constraints.len() > 1 {
            return Err(Error::ambiguous_foreign_keys(format!(
                "Can't determine join between '{}' and '{}'; tables have more than one foreign \
                 key constraint relationship between them. Please specify the 'onclause' of \
                 this join explicitly.",
                a.description(self),
                b.description(self)
            )));
        }

        let Some((_, pairs)) = constraints.pop() else {
            return Err(Error::no_foreign_keys(format!(
                "Can't find any foreign key relationships between '{}' and '{}'.",
                a.description(self),
                b.description(self)
            )));
        };

        Ok(Expr::and_from_vec(
            pairs
                .into_iter()
                .map(|(referenced, referencing)| Expr::eq(referenced, referencing))
                .collect(),
        ))
    }

    /// Collects foreign keys declared by `referencing` that point into
    /// `referenced`.
    fn scan_foreign_keys(
        &self,
        referenced: &Selectable,
        referencing: &Selectable,
        consider_as_foreign_keys: &IndexSet<ColumnId>,
        constraints: &mut Constraints,
    ) {
        let columns = referencing
            .tables()
            .into_iter()
            .flat_map(|table| self.foreign_key_columns(table));

        for (fk, ForeignKeyColumn { source, target }) in columns {
            if !consider_as_foreign_keys.is_empty() && !consider_as_foreign_keys.contains(&source) {
                continue;
            }

            let Some(target) = referenced.corresponding_column(&ExprColumn::new(target)) else {
                continue;
            };

            let Some(source) = referencing.corresponding_column(&ExprColumn::new(source)) else {
                continue;
            };

            constraints.entry(fk.id).or_default().push((target, source));
        }
    }
}

fn trim_constraints(constraints: &mut Constraints, consider_as_foreign_keys: &IndexSet<ColumnId>) {
    if !consider_as_foreign_keys.is_empty() {
        constraints.retain(|_, pairs| {
            let referencing: IndexSet<ColumnId> = pairs.iter().map(|(_, col)| col.column).collect();
            referencing == *consider_as_foreign_keys
        });
    }

    if constraints.len() > 1 {
        let mut seen: Vec<Vec<(ExprColumn, ExprColumn)>> = vec![];
        constraints.retain(|_, pairs| {
            if seen.contains(pairs) {
                false
            } else {
                seen.push(pairs.clone());
                true
            }
        });
    }
}
