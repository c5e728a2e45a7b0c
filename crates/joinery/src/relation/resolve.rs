mod annotate;
mod check;
mod pairs;

use super::{
    ColumnPair, Diagnostic, DiagnosticKind, Direction, JoinCondition, JoinConditionArgs,
};
use joinery_core::{
    schema::{ColumnId, Selectable},
    stmt::{Annotations, Expr, ExprColumn},
    Catalog, Error, Result,
};
use joinery_sql::Serializer;

use indexmap::IndexSet;

/// Working state while resolving a single relationship.
struct Resolver<'a> {
    catalog: &'a Catalog,
    args: &'a JoinConditionArgs,
    diagnostics: &'a mut Vec<Diagnostic>,

    primaryjoin: Expr,
    secondaryjoin: Option<Expr>,

    /// The caller marked the remote side with `remote()` annotations
    caller_remote: bool,

    /// The non-simple warning was already emitted
    warned_non_simple: bool,

    local_remote_pairs: IndexSet<ColumnPair>,
    synchronize_pairs: Vec<ColumnPair>,
    secondary_synchronize_pairs: Vec<ColumnPair>,
}

pub(super) fn resolve(
    catalog: &Catalog,
    args: &JoinConditionArgs,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<JoinCondition> {
    let (primaryjoin, secondaryjoin) = determine_joins(catalog, args)?;

    let mut resolver = Resolver {
        catalog,
        args,
        diagnostics,
        primaryjoin,
        secondaryjoin,
        caller_remote: false,
        warned_non_simple: false,
        local_remote_pairs: IndexSet::new(),
        synchronize_pairs: vec![],
        secondary_synchronize_pairs: vec![],
    };

    resolver.check_join_columns()?;
    resolver.annotate_fks();
    resolver.annotate_remote()?;
    resolver.annotate_local();
    resolver.setup_pairs();
    resolver.check_foreign_cols(true)?;
    if resolver.secondaryjoin.is_some() {
        resolver.check_foreign_cols(false)?;
    }
    let direction = resolver.determine_direction()?;
    resolver.check_remote_side()?;

    let join_condition = resolver.finish(direction);
    log_joins(catalog, &join_condition);
    Ok(join_condition)
}

/// Picks up the explicit joins, deriving the missing ones from foreign keys.
fn determine_joins(catalog: &Catalog, args: &JoinConditionArgs) -> Result<(Expr, Option<Expr>)> {
    if args.secondaryjoin.is_some() && args.secondary.is_none() {
        return Err(Error::invalid_relationship(format!(
            "Property {} specified with secondary join condition but no secondary argument",
            args.name
        )));
    }

    let fks = &args.foreign_keys;
    let wrap = |err: Error| relationship_join_error(catalog, args, err);

    match &args.secondary {
        Some(secondary) => {
            let secondaryjoin = match &args.secondaryjoin {
                Some(expr) => expr.clone(),
                None => catalog
                    .join_condition(
                        &args.child_selectable,
                        secondary,
                        Some(args.child_local_selectable()),
                        fks,
                    )
                    .map_err(wrap)?,
            };

            let primaryjoin = match &args.primaryjoin {
                Some(expr) => expr.clone(),
                None => catalog
                    .join_condition(
                        &args.parent_selectable,
                        secondary,
                        Some(args.parent_local_selectable()),
                        fks,
                    )
                    .map_err(wrap)?,
            };

            Ok((primaryjoin, Some(secondaryjoin)))
        }
        None => {
            let primaryjoin = match &args.primaryjoin {
                Some(expr) => expr.clone(),
                None => catalog
                    .join_condition(
                        &args.parent_selectable,
                        &args.child_selectable,
                        Some(args.parent_local_selectable()),
                        fks,
                    )
                    .map_err(wrap)?,
            };

            Ok((primaryjoin, None))
        }
    }
}

/// Re-raises a catalog level join error in terms of the relationship.
fn relationship_join_error(catalog: &Catalog, args: &JoinConditionArgs, err: Error) -> Error {
    let name = &args.name;
    let secondary = args.secondary.as_ref().map(|secondary| secondary.description(catalog));

    let outer = if err.is_no_foreign_keys() {
        Error::no_foreign_keys(match &secondary {
            Some(secondary) => format!(
                "Could not determine join condition between parent/child tables on \
                 relationship {name} - there are no foreign keys linking these tables via \
                 secondary table '{secondary}'.  Ensure that referencing columns are associated \
                 with a ForeignKey or ForeignKeyConstraint, or specify 'primaryjoin' and \
                 'secondaryjoin' expressions."
            ),
            None => format!(
                "Could not determine join condition between parent/child tables on \
                 relationship {name} - there are no foreign keys linking these tables.  Ensure \
                 that referencing columns are associated with a ForeignKey or \
                 ForeignKeyConstraint, or specify a 'primaryjoin' expression."
            ),
        })
    } else if err.is_ambiguous_foreign_keys() {
        Error::ambiguous_foreign_keys(match &secondary {
            Some(secondary) => format!(
                "Could not determine join condition between parent/child tables on \
                 relationship {name} - there are multiple foreign key paths linking the tables \
                 via secondary table '{secondary}'.  Specify the 'foreign_keys' argument, \
                 providing a list of those columns which should be counted as containing a \
                 foreign key reference from the secondary table to each of the parent and child \
                 tables."
            ),
            None => format!(
                "Could not determine join condition between parent/child tables on \
                 relationship {name} - there are multiple foreign key paths linking the tables.  \
                 Specify the 'foreign_keys' argument, providing a list of those columns which \
                 should be counted as containing a foreign key reference to the parent table."
            ),
        })
    } else {
        return err;
    };

    err.context(outer)
}

impl<'a> Resolver<'a> {
    fn name(&self) -> &'a str {
        &self.args.name
    }

    fn parent(&self) -> &'a Selectable {
        &self.args.parent_selectable
    }

    fn child(&self) -> &'a Selectable {
        &self.args.child_selectable
    }

    fn secondary(&self) -> Option<&'a Selectable> {
        self.args.secondary.as_ref()
    }

    fn is_self_referential(&self) -> bool {
        self.args.parent_selectable == self.args.child_selectable
    }

    fn joins(&self) -> impl Iterator<Item = &Expr> + '_ {
        std::iter::once(&self.primaryjoin).chain(self.secondaryjoin.as_ref())
    }

    fn joins_mut(&mut self) -> impl Iterator<Item = &mut Expr> + '_ {
        std::iter::once(&mut self.primaryjoin).chain(self.secondaryjoin.as_mut())
    }

    fn has_annotation(&self, annotations: Annotations) -> bool {
        self.joins().any(|join| join.has_annotation(annotations))
    }

    /// Adds `annotations` to every column occurrence matching `f`, in both
    /// joins.
    fn annotate_columns(
        &mut self,
        annotations: Annotations,
        mut f: impl FnMut(&ExprColumn) -> bool,
    ) {
        for join in self.joins_mut() {
            join.for_each_column_mut(|column| {
                if f(&*column) {
                    column.annotations.insert(annotations);
                }
            });
        }
    }

    fn sql(&self, expr: &Expr) -> String {
        Serializer::new(self.catalog).serialize(expr)
    }

    fn warn(&mut self, kind: DiagnosticKind, message: String) {
        tracing::warn!(relationship = %self.args.name, "{message}");
        self.diagnostics.push(Diagnostic {
            kind,
            relationship: self.args.name.clone(),
            message,
        });
    }

    fn warn_non_simple(&mut self) {
        if self.warned_non_simple {
            return;
        }
        self.warned_non_simple = true;

        let message = format!(
            "Non-simple column elements in primary join condition for property {} - consider \
             using remote() annotations to mark the remote side.",
            self.name()
        );
        self.warn(DiagnosticKind::NonSimpleJoin, message);
    }

    fn finish(self, direction: Direction) -> JoinCondition {
        let args = self.args;

        JoinCondition {
            name: args.name.clone(),
            parent_selectable: args.parent_selectable.clone(),
            child_selectable: args.child_selectable.clone(),
            parent_local_selectable: args.parent_local_selectable().clone(),
            child_local_selectable: args.child_local_selectable().clone(),
            primaryjoin: self.primaryjoin,
            secondaryjoin: self.secondaryjoin,
            secondary: args.secondary.clone(),
            direction,
            synchronize_pairs: self.synchronize_pairs,
            secondary_synchronize_pairs: self.secondary_synchronize_pairs,
            local_remote_pairs: self.local_remote_pairs.into_iter().collect(),
            support_sync: args.support_sync,
        }
    }
}

/// Renders a column as `table.column` for messages and logs.
pub(super) fn column_name(catalog: &Catalog, id: ColumnId) -> String {
    match (catalog.get_table(id.table), catalog.get_column(id)) {
        (Some(table), Some(column)) => format!("{}.{}", table.name, column.name),
        _ => format!("{id:?}"),
    }
}

fn pairs_to_string(catalog: &Catalog, pairs: &[ColumnPair]) -> String {
    pairs
        .iter()
        .map(|(l, r)| format!("({} => {})", column_name(catalog, *l), column_name(catalog, *r)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn log_joins(catalog: &Catalog, join_condition: &JoinCondition) {
    let serializer = Serializer::new(catalog);
    let relationship = join_condition.name.as_str();

    tracing::debug!(
        relationship,
        "setup primary join {}",
        serializer.serialize(&join_condition.primaryjoin)
    );
    if let Some(secondaryjoin) = &join_condition.secondaryjoin {
        tracing::debug!(
            relationship,
            "setup secondary join {}",
            serializer.serialize(secondaryjoin)
        );
    }
    tracing::debug!(
        relationship,
        "synchronize pairs [{}]",
        pairs_to_string(catalog, &join_condition.synchronize_pairs)
    );
    tracing::debug!(
        relationship,
        "secondary synchronize pairs [{}]",
        pairs_to_string(catalog, &join_condition.secondary_synchronize_pairs)
    );
    tracing::debug!(
        relationship,
        "local/remote pairs [{}]",
        pairs_to_string(catalog, &join_condition.local_remote_pairs)
    );
    tracing::debug!(
        relationship,
        "remote columns [{}]",
        join_condition
            .remote_columns()
            .into_iter()
            .map(|id| column_name(catalog, id))
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::debug!(
        relationship,
        "relationship direction {}",
        join_condition.direction
    );
}
