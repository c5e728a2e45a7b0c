use super::{ClauseAdapter, Direction, JoinCondition};
use joinery_core::{
    schema::{AliasNames, Selectable},
    stmt::{Annotations, Expr},
    Catalog,
};

/// The joins of a relationship, restated against the selectables of a
/// particular query.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinTargets {
    pub primaryjoin: Expr,
    pub secondaryjoin: Option<Expr>,

    /// The secondary table, anonymously aliased when the joins were
    pub secondary: Option<Selectable>,

    /// Adapts further criteria to the aliased selectables, if any
    pub target_adapter: Option<ClauseAdapter>,

    pub dest_selectable: Selectable,
    pub direction: Direction,
}

impl JoinCondition {
    /// Returns the joins needed to go from `source` to `dest`.
    ///
    /// When `aliased` is set, `dest` (and `source`, if given) are aliases of
    /// the child (and parent) selectables: remote columns are rewritten
    /// against `dest`, local columns against `source`, and the secondary
    /// table is replaced by an anonymous alias named from `aliases`.
    /// Annotations are preserved. Sharing `aliases` across the joins of one
    /// query keeps the secondary aliases distinct.
    ///
    /// `single_crit` is an extra criterion, typically a discriminator
    /// check, added to the join that reaches `dest`.
    pub fn join_targets(
        &self,
        catalog: &Catalog,
        aliases: &mut AliasNames,
        source: Option<&Selectable>,
        dest: &Selectable,
        aliased: bool,
        single_crit: Option<Expr>,
    ) -> JoinTargets {
        let mut primaryjoin = self.primaryjoin.clone();
        let mut secondaryjoin = self.secondaryjoin.clone();
        let mut secondary = self.secondary.clone();

        if let Some(single_crit) = single_crit {
            match secondaryjoin {
                Some(expr) => secondaryjoin = Some(Expr::and(expr, single_crit)),
                None => primaryjoin = Expr::and(primaryjoin, single_crit),
            }
        }

        let mut target_adapter = None;

        if aliased {
            match &secondary {
                Some(sec) => {
                    let sec_alias = sec.anonymous_alias(catalog, aliases);

                    let mut primary_aliasizer =
                        ClauseAdapter::new(sec_alias.clone()).exclude(Annotations::LOCAL);
                    let secondary_aliasizer =
                        ClauseAdapter::new(dest.clone()).chain(primary_aliasizer.clone());

                    if let Some(source) = source {
                        primary_aliasizer =
                            primary_aliasizer.chain(ClauseAdapter::new(source.clone()));
                    }

                    secondaryjoin = secondaryjoin.map(|expr| secondary_aliasizer.adapt(&expr));
                    primaryjoin = primary_aliasizer.adapt(&primaryjoin);
                    secondary = Some(sec_alias);
                    target_adapter = Some(secondary_aliasizer);
                }
                None => {
                    let mut primary_aliasizer =
                        ClauseAdapter::new(dest.clone()).exclude(Annotations::LOCAL);

                    if let Some(source) = source {
                        primary_aliasizer = primary_aliasizer.chain(
                            ClauseAdapter::new(source.clone()).exclude(Annotations::REMOTE),
                        );
                    }

                    primaryjoin = primary_aliasizer.adapt(&primaryjoin);
                    target_adapter = Some(primary_aliasizer);
                }
            }

            if let Some(adapter) = &mut target_adapter {
                adapter.clear_exclude();
            }
        }

        JoinTargets {
            primaryjoin,
            secondaryjoin,
            secondary,
            target_adapter,
            dest_selectable: dest.clone(),
            direction: self.direction,
        }
    }
}
