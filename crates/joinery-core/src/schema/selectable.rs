use super::{AliasNames, Catalog, TableId};
use crate::stmt::{self, Expr, ExprColumn, VisitMut};

use std::sync::Arc;

/// Something rows can be selected from: a table, an alias of a table, or a
/// join of selectables.
///
/// Relationships are configured between selectables. Joined-table
/// inheritance shows up as a [`Join`] whose columns span several tables.
#[derive(Debug, Clone, PartialEq)]
pub enum Selectable {
    Table(TableId),
    Alias(TableAlias),
    Join(Box<Join>),
}

/// A named alias of a table, e.g. `lft AS pj`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableAlias {
    pub table: TableId,
    pub name: Arc<str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub left: Selectable,
    pub right: Selectable,

    /// The ON clause
    pub on: Expr,
}

impl Selectable {
    pub fn alias(table: impl Into<TableId>, name: impl Into<Arc<str>>) -> Selectable {
        Selectable::Alias(TableAlias {
            table: table.into(),
            name: name.into(),
        })
    }

    pub fn join(left: impl Into<Selectable>, right: impl Into<Selectable>, on: impl Into<Expr>) -> Selectable {
        Selectable::Join(Box::new(Join {
            left: left.into(),
            right: right.into(),
            on: on.into(),
        }))
    }

    /// Returns `true` if `column` is one of this selectable's exported
    /// columns. An aliased column is only contained by its alias.
    pub fn contains_column(&self, column: &ExprColumn) -> bool {
        match self {
            Selectable::Table(id) => column.alias.is_none() && column.column.table == *id,
            Selectable::Alias(alias) => {
                column.column.table == alias.table
                    && column.alias.as_deref() == Some(&*alias.name)
            }
            Selectable::Join(join) => {
                join.left.contains_column(column) || join.right.contains_column(column)
            }
        }
    }

    /// Returns `true` if the table (or alias) `column` comes from is part of
    /// this selectable. Unlike [`contains_column`](Self::contains_column), an
    /// alias derives the unaliased columns of its table.
    pub fn derives_column(&self, column: &ExprColumn) -> bool {
        match self {
            Selectable::Table(id) => column.alias.is_none() && column.column.table == *id,
            Selectable::Alias(alias) => {
                column.column.table == alias.table
                    && match &column.alias {
                        None => true,
                        Some(name) => *name == alias.name,
                    }
            }
            Selectable::Join(join) => {
                join.left.derives_column(column) || join.right.derives_column(column)
            }
        }
    }

    /// Returns this selectable's version of `column`: the same underlying
    /// column, qualified the way this selectable exports it. Annotations are
    /// carried over.
    pub fn corresponding_column(&self, column: &ExprColumn) -> Option<ExprColumn> {
        match self {
            Selectable::Table(id) if column.column.table == *id => Some(ExprColumn {
                alias: None,
                ..column.clone()
            }),
            Selectable::Alias(alias) if column.column.table == alias.table => Some(ExprColumn {
                alias: Some(alias.name.clone()),
                ..column.clone()
            }),
            Selectable::Join(join) => join
                .left
                .corresponding_column(column)
                .or_else(|| join.right.corresponding_column(column)),
            _ => None,
        }
    }

    /// All exported columns, in declaration order.
    pub fn columns(&self, catalog: &Catalog) -> Vec<ExprColumn> {
        let mut columns = vec![];
        self.collect_columns(catalog, &mut columns);
        columns
    }

    fn collect_columns(&self, catalog: &Catalog, dst: &mut Vec<ExprColumn>) {
        match self {
            Selectable::Table(id) => {
                if let Some(table) = catalog.get_table(*id) {
                    dst.extend(table.columns.iter().map(|column| ExprColumn::new(column.id)));
                }
            }
            Selectable::Alias(alias) => {
                if let Some(table) = catalog.get_table(alias.table) {
                    dst.extend(
                        table
                            .columns
                            .iter()
                            .map(|column| ExprColumn::aliased(column.id, alias.name.clone())),
                    );
                }
            }
            Selectable::Join(join) => {
                join.left.collect_columns(catalog, dst);
                join.right.collect_columns(catalog, dst);
            }
        }
    }

    /// The tables this selectable reads from, left to right, without
    /// duplicates.
    pub fn tables(&self) -> Vec<TableId> {
        let mut tables = vec![];
        for leaf in self.leaves() {
            let id = match leaf {
                Selectable::Table(id) => *id,
                Selectable::Alias(alias) => alias.table,
                Selectable::Join(_) => continue,
            };

            if !tables.contains(&id) {
                tables.push(id);
            }
        }
        tables
    }

    /// Returns `true` if both selectables share a table or alias at their
    /// surface. A table and an alias of it do not overlap.
    pub fn overlaps(&self, other: &Selectable) -> bool {
        let other = other.leaves();
        self.leaves().iter().any(|leaf| other.contains(leaf))
    }

    fn leaves(&self) -> Vec<&Selectable> {
        match self {
            Selectable::Join(join) => {
                let mut leaves = join.left.leaves();
                leaves.extend(join.right.leaves());
                leaves
            }
            _ => vec![self],
        }
    }

    /// Returns an anonymously named alias of this selectable, drawing the
    /// name from `aliases`. Joins are aliased flat: each side is aliased and
    /// the ON clause follows.
    pub fn anonymous_alias(&self, catalog: &Catalog, aliases: &mut AliasNames) -> Selectable {
        match self {
            Selectable::Table(id) => {
                let name = match catalog.get_table(*id) {
                    Some(table) => aliases.next(&table.name),
                    None => aliases.next("anon"),
                };
                Selectable::alias(*id, name)
            }
            Selectable::Alias(alias) => Selectable::alias(alias.table, aliases.next(&alias.name)),
            Selectable::Join(join) => {
                let left = join.left.anonymous_alias(catalog, aliases);
                let right = join.right.anonymous_alias(catalog, aliases);
                let mut on = join.on.clone();

                struct Realias<'a> {
                    left: &'a Selectable,
                    right: &'a Selectable,
                }

                impl VisitMut for Realias<'_> {
                    fn visit_expr_column_mut(&mut self, i: &mut ExprColumn) {
                        if let Some(column) = self
                            .left
                            .corresponding_column(i)
                            .or_else(|| self.right.corresponding_column(i))
                        {
                            *i = column;
                        }
                    }
                }

                stmt::visit_mut::visit_expr_mut(
                    &mut Realias {
                        left: &left,
                        right: &right,
                    },
                    &mut on,
                );

                Selectable::join(left, right, on)
            }
        }
    }

    /// Human readable name used in messages.
    pub fn description(&self, catalog: &Catalog) -> String {
        match self {
            Selectable::Table(id) => match catalog.get_table(*id) {
                Some(table) => table.name.clone(),
                None => format!("<dropped table {}>", id.0),
            },
            Selectable::Alias(alias) => alias.name.to_string(),
            Selectable::Join(join) => format!(
                "{} JOIN {}",
                join.left.description(catalog),
                join.right.description(catalog)
            ),
        }
    }
}

impl From<TableId> for Selectable {
    fn from(value: TableId) -> Self {
        Selectable::Table(value)
    }
}

impl From<&super::Table> for Selectable {
    fn from(value: &super::Table) -> Self {
        Selectable::Table(value.id)
    }
}

impl From<TableAlias> for Selectable {
    fn from(value: TableAlias) -> Self {
        Selectable::Alias(value)
    }
}
