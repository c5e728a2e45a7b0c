use super::{ColumnPair, Diagnostic, JoinCondition};
use joinery_core::{
    schema::{ColumnId, Selectable},
    stmt::Expr,
    Catalog, Result,
};

use indexmap::IndexSet;
use std::{fmt, sync::Arc};

/// Predicate deciding whether a column may take part in a local/remote pair.
pub type CanBeSynced = Arc<dyn Fn(ColumnId) -> bool + Send + Sync>;

/// Everything needed to resolve one relationship.
///
/// This is the owned form of [`JoinConditionBuilder`]; it is what a
/// [`Registry`](super::Registry) keeps so a relationship can be rebuilt after
/// the catalog changes.
#[derive(Clone)]
pub struct JoinConditionArgs {
    /// Display name used in messages, e.g. `"User.todos"`
    pub name: String,

    pub parent_selectable: Selectable,

    pub child_selectable: Selectable,

    /// Defaults to `parent_selectable`
    pub parent_local_selectable: Option<Selectable>,

    /// Defaults to `child_selectable`
    pub child_local_selectable: Option<Selectable>,

    /// Explicit join between parent and child (or parent and secondary).
    /// Derived from foreign keys when `None`.
    pub primaryjoin: Option<Expr>,

    /// Association table of a many-to-many relationship
    pub secondary: Option<Selectable>,

    /// Explicit join between child and secondary
    pub secondaryjoin: Option<Expr>,

    /// Columns to treat as holding the foreign key, overriding the catalog
    pub foreign_keys: IndexSet<ColumnId>,

    /// Columns on the remote side of the relationship
    pub remote_side: IndexSet<ColumnId>,

    /// Explicit `(local, remote)` pairs
    pub local_remote_pairs: Vec<ColumnPair>,

    /// When `false`, the join does not need to be synchronizable (view-only
    /// relationships) and non-simple comparisons are accepted silently.
    pub support_sync: bool,

    pub can_be_synced: Option<CanBeSynced>,
}

/// Builds a [`JoinCondition`].
///
/// Created by [`JoinCondition::builder`].
pub struct JoinConditionBuilder<'a> {
    catalog: &'a Catalog,
    args: JoinConditionArgs,
}

impl JoinConditionArgs {
    pub fn new(
        name: impl Into<String>,
        parent_selectable: impl Into<Selectable>,
        child_selectable: impl Into<Selectable>,
    ) -> JoinConditionArgs {
        JoinConditionArgs {
            name: name.into(),
            parent_selectable: parent_selectable.into(),
            child_selectable: child_selectable.into(),
            parent_local_selectable: None,
            child_local_selectable: None,
            primaryjoin: None,
            secondary: None,
            secondaryjoin: None,
            foreign_keys: IndexSet::new(),
            remote_side: IndexSet::new(),
            local_remote_pairs: vec![],
            support_sync: true,
            can_be_synced: None,
        }
    }

    pub fn parent_local_selectable(&self) -> &Selectable {
        self.parent_local_selectable
            .as_ref()
            .unwrap_or(&self.parent_selectable)
    }

    pub fn child_local_selectable(&self) -> &Selectable {
        self.child_local_selectable
            .as_ref()
            .unwrap_or(&self.child_selectable)
    }

    pub(crate) fn can_be_synced(&self, column: ColumnId) -> bool {
        self.can_be_synced
            .as_ref()
            .map(|f| f(column))
            .unwrap_or(true)
    }

    pub fn build(&self, catalog: &Catalog, diagnostics: &mut Vec<Diagnostic>) -> Result<JoinCondition> {
        super::resolve::resolve(catalog, self, diagnostics)
    }
}

impl fmt::Debug for JoinConditionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinConditionArgs")
            .field("name", &self.name)
            .field("parent_selectable", &self.parent_selectable)
            .field("child_selectable", &self.child_selectable)
            .field("parent_local_selectable", &self.parent_local_selectable)
            .field("child_local_selectable", &self.child_local_selectable)
            .field("primaryjoin", &self.primaryjoin)
            .field("secondary", &self.secondary)
            .field("secondaryjoin", &self.secondaryjoin)
            .field("foreign_keys", &self.foreign_keys)
            .field("remote_side", &self.remote_side)
            .field("local_remote_pairs", &self.local_remote_pairs)
            .field("support_sync", &self.support_sync)
            .field("can_be_synced", &self.can_be_synced.is_some())
            .finish()
    }
}

impl JoinCondition {
    pub fn builder(
        catalog: &Catalog,
        parent_selectable: impl Into<Selectable>,
        child_selectable: impl Into<Selectable>,
    ) -> JoinConditionBuilder<'_> {
        let parent_selectable = parent_selectable.into();
        let child_selectable = child_selectable.into();
        let name = format!(
            "{}.{}",
            parent_selectable.description(catalog),
            child_selectable.description(catalog)
        );

        JoinConditionBuilder {
            catalog,
            args: JoinConditionArgs::new(name, parent_selectable, child_selectable),
        }
    }
}

impl JoinConditionBuilder<'_> {
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.args.name = name.into();
        self
    }

    pub fn parent_local_selectable(&mut self, selectable: impl Into<Selectable>) -> &mut Self {
        self.args.parent_local_selectable = Some(selectable.into());
        self
    }

    pub fn child_local_selectable(&mut self, selectable: impl Into<Selectable>) -> &mut Self {
        self.args.child_local_selectable = Some(selectable.into());
        self
    }

    pub fn primaryjoin(&mut self, expr: impl Into<Expr>) -> &mut Self {
        self.args.primaryjoin = Some(expr.into());
        self
    }

    pub fn secondary(&mut self, selectable: impl Into<Selectable>) -> &mut Self {
        self.args.secondary = Some(selectable.into());
        self
    }

    pub fn secondaryjoin(&mut self, expr: impl Into<Expr>) -> &mut Self {
        self.args.secondaryjoin = Some(expr.into());
        self
    }

    pub fn foreign_keys(&mut self, columns: impl IntoIterator<Item = ColumnId>) -> &mut Self {
        self.args.foreign_keys.extend(columns);
        self
    }

    pub fn remote_side(&mut self, columns: impl IntoIterator<Item = ColumnId>) -> &mut Self {
        self.args.remote_side.extend(columns);
        self
    }

    pub fn local_remote_pairs(&mut self, pairs: impl IntoIterator<Item = ColumnPair>) -> &mut Self {
        self.args.local_remote_pairs.extend(pairs);
        self
    }

    pub fn support_sync(&mut self, support_sync: bool) -> &mut Self {
        self.args.support_sync = support_sync;
        self
    }

    pub fn can_be_synced(
        &mut self,
        f: impl Fn(ColumnId) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.args.can_be_synced = Some(Arc::new(f));
        self
    }

    /// Returns the owned arguments, e.g. to hand to a
    /// [`Registry`](super::Registry).
    pub fn args(&self) -> &JoinConditionArgs {
        &self.args
    }

    pub fn into_args(self) -> JoinConditionArgs {
        self.args
    }

    pub fn build(&self, diagnostics: &mut Vec<Diagnostic>) -> Result<JoinCondition> {
        self.args.build(self.catalog, diagnostics)
    }
}
