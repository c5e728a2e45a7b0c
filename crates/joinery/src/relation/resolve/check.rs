use super::{column_name, Resolver};
use crate::relation::{DiagnosticKind, Direction};
use joinery_core::{
    schema::{ColumnId, Selectable},
    stmt::{Annotations, Expr},
    Error, Result,
};

use indexmap::IndexSet;

impl Resolver<'_> {
    /// Explicit joins must actually link the selectables they stand between.
    pub(super) fn check_join_columns(&self) -> Result<()> {
        let args = self.args;

        if args.primaryjoin.is_some() {
            let target = args.secondary.as_ref().unwrap_or(&args.child_selectable);
            self.check_join_covers(&self.primaryjoin, "primaryjoin", self.parent(), target)?;
        }

        if let (Some(_), Some(secondaryjoin), Some(secondary)) =
            (&args.secondaryjoin, &self.secondaryjoin, &args.secondary)
        {
            self.check_join_covers(secondaryjoin, "secondaryjoin", self.child(), secondary)?;
        }

        Ok(())
    }

    fn check_join_covers(
        &self,
        join: &Expr,
        label: &str,
        a: &Selectable,
        b: &Selectable,
    ) -> Result<()> {
        for side in [a, b] {
            let mut found = false;
            join.for_each_column(|column| found |= side.derives_column(column));

            if !found {
                return Err(Error::invalid_relationship(format!(
                    "Relationship {} specifies a {label} '{}' that references no columns of \
                     '{}'; the join condition must link '{}' and '{}'.",
                    self.name(),
                    self.sql(join),
                    side.description(self.catalog),
                    a.description(self.catalog),
                    b.description(self.catalog),
                )));
            }
        }

        Ok(())
    }

    /// The join must hold foreign key columns usable the way the relationship
    /// is configured.
    pub(super) fn check_foreign_cols(&mut self, primary: bool) -> Result<()> {
        let args = self.args;
        let join = if primary {
            &self.primaryjoin
        } else {
            match &self.secondaryjoin {
                Some(secondaryjoin) => secondaryjoin,
                None => return Ok(()),
            }
        };

        let has_foreign = join.has_annotation(Annotations::FOREIGN);
        let can_sync = if primary {
            !self.synchronize_pairs.is_empty()
        } else {
            !self.secondary_synchronize_pairs.is_empty()
        };

        if (args.support_sync && can_sync) || (!args.support_sync && has_foreign) {
            return Ok(());
        }

        let label = if primary { "primary" } else { "secondary" };
        let sql = self.sql(join);
        let name = self.name();

        if args.support_sync && has_foreign {
            let non_simple = join.conjuncts().into_iter().any(|conjunct| {
                let simple = matches!(conjunct, Expr::BinaryOp(binary) if binary.is_simple());
                !simple && conjunct.has_annotation(Annotations::FOREIGN)
            });

            if non_simple {
                if !self.caller_remote {
                    self.warn_non_simple();
                }
                return Ok(());
            }

            return Err(Error::invalid_relationship(format!(
                "Could not locate any simple equality expressions involving locally mapped \
                 foreign key columns for {label} join condition '{sql}' on relationship {name}.  \
                 Ensure that referencing columns are associated with a ForeignKey or \
                 ForeignKeyConstraint, or are annotated in the join condition with the foreign() \
                 annotation. To allow comparison operators other than '==', the relationship \
                 can be marked as viewonly=True."
            )));
        }

        if !args.foreign_keys.is_empty() {
            return Err(Error::invalid_relationship(format!(
                "Could not locate any relevant foreign key columns for {label} join condition \
                 '{sql}' on relationship {name} using manual 'foreign_keys' setting.  Do the \
                 columns in 'foreign_keys' represent all, and only, the 'foreign' columns in \
                 this join condition?"
            )));
        }

        if primary && args.secondary.is_none() {
            return Err(Error::invalid_relationship(format!(
                "Can't determine relationship direction for relationship '{name}' - foreign key \
                 columns are present in neither the parent nor the child's mapped tables.  \
                 Could not locate any relevant foreign key columns for primary join condition \
                 '{sql}' on relationship {name}.  Ensure that referencing columns are \
                 associated with a ForeignKey or ForeignKeyConstraint, or are annotated in the \
                 join condition with the foreign() annotation."
            )));
        }

        Err(Error::invalid_relationship(format!(
            "Could not locate any relevant foreign key columns for {label} join condition \
             '{sql}' on relationship {name}.  Ensure that referencing columns are associated \
             with a ForeignKey or ForeignKeyConstraint, or are annotated in the join condition \
             with the foreign() annotation."
        )))
    }

    pub(super) fn determine_direction(&self) -> Result<Direction> {
        if self.secondaryjoin.is_some() {
            return Ok(Direction::ManyToMany);
        }

        let parent = self.parent();
        let child = self.child();

        let mut onetomany_fk = false;
        let mut manytoone_fk = false;
        let mut onetomany_local = IndexSet::<ColumnId>::new();
        let mut manytoone_local = IndexSet::<ColumnId>::new();

        self.primaryjoin.for_each_column(|column| {
            if !column.is_foreign() {
                return;
            }

            onetomany_fk |= child.contains_column(column);
            manytoone_fk |= parent.contains_column(column);

            if column.is_remote() {
                onetomany_local.insert(column.column);
            } else {
                manytoone_local.insert(column.column);
            }
        });

        match (onetomany_fk, manytoone_fk) {
            (true, false) => Ok(Direction::OneToMany),
            (false, true) => Ok(Direction::ManyToOne),
            (true, true) => {
                // Drop columns equated with themselves, e.g. `t.version = t.version`
                if !onetomany_local.is_empty() && !manytoone_local.is_empty() {
                    let local_columns = self.columns_with(Annotations::LOCAL);
                    let self_equated: IndexSet<ColumnId> = self
                        .columns_with(Annotations::REMOTE)
                        .intersection(&local_columns)
                        .copied()
                        .collect();

                    onetomany_local.retain(|column| !self_equated.contains(column));
                    manytoone_local.retain(|column| !self_equated.contains(column));
                }

                match (onetomany_local.is_empty(), manytoone_local.is_empty()) {
                    (false, true) => Ok(Direction::OneToMany),
                    (true, false) => Ok(Direction::ManyToOne),
                    _ => Err(Error::invalid_relationship(format!(
                        "Can't determine relationship direction for relationship '{}' - \
                         foreign key columns within the join condition are present in both \
                         the parent and the child's mapped tables.  Ensure that only those \
                         columns referring to a parent column are marked as foreign, either \
                         via the foreign() annotation or via the foreign_keys argument.",
                        self.name()
                    ))),
                }
            }
            (false, false) => Err(Error::invalid_relationship(format!(
                "Can't determine relationship direction for relationship '{}' - foreign key \
                 columns are present in neither the parent nor the child's mapped tables",
                self.name()
            ))),
        }
    }

    fn columns_with(&self, annotations: Annotations) -> IndexSet<ColumnId> {
        let mut columns = IndexSet::new();
        for join in self.joins() {
            join.for_each_column(|column| {
                if column.annotations.contains(annotations) {
                    columns.insert(column.column);
                }
            });
        }
        columns
    }

    /// There must be something to join on, and the remote side should be
    /// part of the child.
    pub(super) fn check_remote_side(&mut self) -> Result<()> {
        if self.local_remote_pairs.is_empty() {
            return Err(Error::invalid_relationship(format!(
                "Relationship {} could not determine any unambiguous local/remote column pairs \
                 based on join condition and remote_side arguments.  Consider using the \
                 remote() annotation to accurately mark those elements of the join condition \
                 that are on the remote side of the relationship.",
                self.name()
            )));
        }

        let parent_tables = self.parent().tables();
        let child_tables = self.child().tables();

        let not_in_child: Vec<ColumnId> = self
            .local_remote_pairs
            .iter()
            .map(|(_, remote)| *remote)
            .filter(|remote| {
                parent_tables.contains(&remote.table) && !child_tables.contains(&remote.table)
            })
            .collect();

        for remote in not_in_child {
            let message = format!(
                "Expression {} is marked as a member of the 'remote' side of relationship {}, \
                 but it's not part of the child selectable '{}'.",
                column_name(self.catalog, remote),
                self.name(),
                self.child().description(self.catalog)
            );
            self.warn(DiagnosticKind::RemoteNotInChild, message);
        }

        Ok(())
    }
}
