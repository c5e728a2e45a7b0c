#![allow(dead_code)]

use joinery::{
    relation::{Diagnostic, JoinCondition, JoinConditionBuilder},
    schema::{ColumnId, Selectable, TableId, Type},
    stmt::{self, Expr},
    Catalog, Error, Result, Serializer,
};

use indexmap::IndexSet;

/// Relationship name used by every fixture
pub const NAME: &str = "Whatever.foo";

pub struct Fixtures {
    pub catalog: Catalog,
}

impl Fixtures {
    pub fn new() -> Fixtures {
        let mut catalog = Catalog::new();
        declare_tables(&mut catalog).unwrap();
        Fixtures { catalog }
    }

    pub fn table(&self, name: &str) -> TableId {
        self.catalog
            .table_by_name(name)
            .unwrap_or_else(|| panic!("no table `{name}`"))
            .id
    }

    /// Looks up a column by `table.column`.
    pub fn col(&self, path: &str) -> ColumnId {
        let (table, column) = path.split_once('.').unwrap();
        self.catalog
            .table_by_name(table)
            .and_then(|table| table.column_by_name(column))
            .unwrap_or_else(|| panic!("no column `{path}`"))
            .id
    }

    pub fn c(&self, path: &str) -> Expr {
        Expr::column(self.col(path))
    }

    pub fn cols<const N: usize>(&self, paths: [&str; N]) -> IndexSet<ColumnId> {
        paths.into_iter().map(|path| self.col(path)).collect()
    }

    pub fn pairs<const N: usize>(&self, pairs: [(&str, &str); N]) -> Vec<(ColumnId, ColumnId)> {
        pairs
            .into_iter()
            .map(|(l, r)| (self.col(l), self.col(r)))
            .collect()
    }

    pub fn sql(&self, expr: &Expr) -> String {
        Serializer::new(&self.catalog).serialize(expr)
    }

    /// `a JOIN b ON a.x = b.y`
    pub fn join(&self, left: &str, right: &str, on: (&str, &str)) -> Selectable {
        Selectable::join(
            self.table(left),
            self.table(right),
            Expr::eq(self.c(on.0), self.c(on.1)),
        )
    }

    pub fn join_condition(
        &self,
        parent: impl Into<Selectable>,
        child: impl Into<Selectable>,
    ) -> JoinConditionBuilder<'_> {
        let mut builder = JoinCondition::builder(&self.catalog, parent, child);
        builder.name(NAME);
        builder
    }

    pub fn o2m(&self) -> JoinConditionBuilder<'_> {
        self.join_condition(self.table("lft"), self.table("rgt"))
    }

    pub fn m2o(&self) -> JoinConditionBuilder<'_> {
        self.join_condition(self.table("rgt"), self.table("lft"))
    }

    pub fn o2m_selfref(&self) -> JoinConditionBuilder<'_> {
        self.join_condition(self.table("selfref"), self.table("selfref"))
    }

    pub fn m2o_selfref(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.o2m_selfref();
        builder.remote_side([self.col("selfref.id")]);
        builder
    }

    pub fn o2m_composite_selfref(&self) -> JoinConditionBuilder<'_> {
        self.join_condition(
            self.table("composite_selfref"),
            self.table("composite_selfref"),
        )
    }

    pub fn m2o_composite_selfref(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.o2m_composite_selfref();
        builder.remote_side([
            self.col("composite_selfref.id"),
            self.col("composite_selfref.group_id"),
        ]);
        builder
    }

    /// `group_id = foo(group_id) AND parent_id = id`
    fn composite_selfref_func_join(&self) -> Expr {
        Expr::and(
            Expr::eq(
                self.c("composite_selfref.group_id"),
                Expr::func("foo", [self.c("composite_selfref.group_id")]),
            ),
            Expr::eq(
                self.c("composite_selfref.parent_id"),
                self.c("composite_selfref.id"),
            ),
        )
    }

    pub fn o2m_composite_selfref_func(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.o2m_composite_selfref();
        builder.primaryjoin(self.composite_selfref_func_join());
        builder
    }

    pub fn o2m_composite_selfref_func_remote_side(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.o2m_composite_selfref_func();
        builder.remote_side([self.col("composite_selfref.parent_id")]);
        builder
    }

    pub fn o2m_composite_selfref_func_annotated(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.o2m_composite_selfref();
        builder.primaryjoin(Expr::and(
            Expr::eq(
                stmt::remote(self.c("composite_selfref.group_id")),
                Expr::func("foo", [self.c("composite_selfref.group_id")]),
            ),
            Expr::eq(
                stmt::remote(self.c("composite_selfref.parent_id")),
                self.c("composite_selfref.id"),
            ),
        ));
        builder
    }

    pub fn m2m(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.join_condition(self.table("m2mlft"), self.table("m2mrgt"));
        builder.secondary(self.table("m2msecondary"));
        builder
    }

    /// The reverse side of [`m2m`](Self::m2m), configured from its joins.
    pub fn m2m_backref(&self, forward: &JoinCondition) -> JoinConditionBuilder<'_> {
        let mut builder = self.join_condition(self.table("m2mrgt"), self.table("m2mlft"));
        builder
            .secondary(self.table("m2msecondary"))
            .primaryjoin(forward.secondaryjoin_minus_local().unwrap())
            .secondaryjoin(forward.primaryjoin_minus_local());
        builder
    }

    /// `lft.x + lft.y = rgt.x * rgt.y`
    pub fn compound_join(&self, rhs: impl FnOnce(Expr) -> Expr) -> Expr {
        Expr::eq(
            Expr::add(self.c("lft.x"), self.c("lft.y")),
            rhs(Expr::mul(self.c("rgt.x"), self.c("rgt.y"))),
        )
    }

    pub fn compound_expression_1(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.o2m();
        builder.primaryjoin(self.compound_join(|rhs| stmt::remote(stmt::foreign(rhs))));
        builder
    }

    pub fn compound_expression_2(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.o2m();
        builder.primaryjoin(self.compound_join(|rhs| stmt::foreign(rhs)));
        builder
    }

    pub fn compound_expression_1_non_annotated(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.o2m();
        builder.primaryjoin(self.compound_join(|rhs| rhs));
        builder
    }

    pub fn base_to_joined_sub(&self) -> JoinConditionBuilder<'_> {
        let right = self.join("base_w_sub_rel", "rel_sub", ("base_w_sub_rel.id", "rel_sub.id"));
        let mut builder = self.join_condition(self.table("base_w_sub_rel"), right);
        builder
            .parent_local_selectable(self.table("base_w_sub_rel"))
            .child_local_selectable(self.table("rel_sub"))
            .primaryjoin(Expr::eq(self.c("base_w_sub_rel.sub_id"), self.c("rel_sub.id")));
        builder
    }

    pub fn o2m_joined_sub_to_base(&self) -> JoinConditionBuilder<'_> {
        let left = self.join("base", "sub_w_base_rel", ("base.id", "sub_w_base_rel.id"));
        let mut builder = self.join_condition(left, self.table("base"));
        builder
            .parent_local_selectable(self.table("sub_w_base_rel"))
            .child_local_selectable(self.table("base"))
            .primaryjoin(Expr::eq(self.c("sub_w_base_rel.base_id"), self.c("base.id")));
        builder
    }

    pub fn m2o_joined_sub_to_sub_on_base(&self) -> JoinConditionBuilder<'_> {
        let left = self.join("base", "sub", ("base.id", "sub.id"));
        let right = self.join("base", "sub_w_base_rel", ("base.id", "sub_w_base_rel.id"));
        let mut builder = self.join_condition(left, right);
        builder
            .parent_local_selectable(self.table("sub"))
            .child_local_selectable(self.table("sub_w_base_rel"))
            .primaryjoin(Expr::eq(self.c("sub_w_base_rel.base_id"), self.c("base.id")));
        builder
    }

    pub fn o2m_joined_sub_to_sub(&self) -> JoinConditionBuilder<'_> {
        let left = self.join("base", "sub", ("base.id", "sub.id"));
        let right = self.join("base", "sub_w_sub_rel", ("base.id", "sub_w_sub_rel.id"));
        let mut builder = self.join_condition(left, right);
        builder
            .parent_local_selectable(self.table("sub"))
            .child_local_selectable(self.table("sub_w_sub_rel"))
            .primaryjoin(Expr::eq(self.c("sub.id"), self.c("sub_w_sub_rel.sub_id")));
        builder
    }

    pub fn m2o_sub_to_joined_sub(&self) -> JoinConditionBuilder<'_> {
        let right = self.join("base", "right_w_base_rel", ("base.id", "right_w_base_rel.id"));
        let mut builder = self.join_condition(self.table("right_w_base_rel"), right);
        builder
            .parent_local_selectable(self.table("right_w_base_rel"))
            .child_local_selectable(self.table("right_w_base_rel"));
        builder
    }

    pub fn m2o_sub_to_joined_sub_func(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.m2o_sub_to_joined_sub();
        builder.primaryjoin(Expr::eq(
            self.c("right_w_base_rel.base_id"),
            Expr::func("foo", [self.c("base.id")]),
        ));
        builder
    }

    pub fn o2o_joined_sub_to_base(&self) -> JoinConditionBuilder<'_> {
        let left = self.join("base", "sub", ("base.id", "sub.id"));
        self.join_condition(left, self.table("sub"))
    }

    pub fn o2m_to_annotated_func(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.o2m();
        builder.primaryjoin(Expr::eq(
            self.c("lft.id"),
            stmt::foreign(Expr::func("foo", [self.c("rgt.lid")])),
        ));
        builder
    }

    pub fn o2m_to_oldstyle_func(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.o2m();
        builder
            .primaryjoin(Expr::eq(
                self.c("lft.id"),
                Expr::func("foo", [self.c("rgt.lid")]),
            ))
            .foreign_keys([self.col("rgt.lid")]);
        builder
    }

    pub fn overlapping_composite_fks(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.join_condition(
            self.table("composite_target"),
            self.table("composite_multi_ref"),
        );
        builder.foreign_keys([
            self.col("composite_multi_ref.uid2"),
            self.col("composite_multi_ref.oid"),
        ]);
        builder
    }

    pub fn overlapping_three_tables(&self) -> JoinConditionBuilder<'_> {
        let three_tab_c = self.table("three_tab_c");
        let mut builder = self.join_condition(self.table("three_tab_a"), self.table("three_tab_b"));
        builder
            .support_sync(false)
            .can_be_synced(move |column| column.table != three_tab_c)
            .primaryjoin(Expr::and_from_vec(vec![
                Expr::eq(self.c("three_tab_a.id"), self.c("three_tab_b.aid")),
                Expr::eq(self.c("three_tab_c.bid"), self.c("three_tab_b.id")),
                Expr::eq(self.c("three_tab_c.aid"), self.c("three_tab_a.id")),
            ]));
        builder
    }

    /// `lft.id = rgt.lid AND lft.x = 5`
    pub fn o2m_o_side_none(&self) -> JoinConditionBuilder<'_> {
        let mut builder = self.o2m();
        builder.primaryjoin(Expr::and(
            Expr::eq(self.c("lft.id"), self.c("rgt.lid")),
            Expr::eq(self.c("lft.x"), 5_i64),
        ));
        builder
    }

    pub fn purely_single_o2m(&self) -> JoinConditionBuilder<'_> {
        let table = self.table("purely_single_col");
        let mut builder = self.join_condition(table, table);
        builder.support_sync(false).primaryjoin(Expr::like(
            self.c("purely_single_col.path"),
            stmt::remote(stmt::foreign(Expr::concat(
                self.c("purely_single_col.path"),
                "%",
            ))),
        ));
        builder
    }

    pub fn purely_single_m2o(&self) -> JoinConditionBuilder<'_> {
        let table = self.table("purely_single_col");
        let mut builder = self.join_condition(table, table);
        builder.support_sync(false).primaryjoin(Expr::like(
            stmt::remote(self.c("purely_single_col.path")),
            stmt::foreign(Expr::concat(self.c("purely_single_col.path"), "%")),
        ));
        builder
    }

    /// `sid = sid OR sid = sid`, the second occurrence of each comparison
    /// being the remote one.
    pub fn remote_local_multiple_ref(&self) -> JoinConditionBuilder<'_> {
        let local = || self.c("selfref.sid");
        let remote = || stmt::foreign(stmt::remote(self.c("selfref.sid")));

        let mut builder = self.o2m_selfref();
        builder.support_sync(false).primaryjoin(Expr::or(
            Expr::eq(local(), remote()),
            Expr::eq(remote(), local()),
        ));
        builder
    }
}

pub fn build(builder: &JoinConditionBuilder<'_>) -> (JoinCondition, Vec<Diagnostic>) {
    let mut diagnostics = vec![];
    let join_condition = builder.build(&mut diagnostics).unwrap();
    (join_condition, diagnostics)
}

pub fn build_err(builder: &JoinConditionBuilder<'_>) -> (Error, Vec<Diagnostic>) {
    let mut diagnostics = vec![];
    let err = builder.build(&mut diagnostics).unwrap_err();
    (err, diagnostics)
}

fn declare_tables(catalog: &mut Catalog) -> Result<()> {
    catalog
        .create_table("lft")
        .primary_key("id", Type::Integer)
        .column("x", Type::Integer)
        .column("y", Type::Integer)
        .build()?;

    catalog
        .create_table("rgt")
        .primary_key("id", Type::Integer)
        .column("lid", Type::Integer)
        .column("x", Type::Integer)
        .column("y", Type::Integer)
        .foreign_key(&["lid"], "lft", &["id"])
        .build()?;

    catalog
        .create_table("rgt_multi_fk")
        .primary_key("id", Type::Integer)
        .column("lid1", Type::Integer)
        .column("lid2", Type::Integer)
        .foreign_key(&["lid1"], "lft", &["id"])
        .foreign_key(&["lid2"], "lft", &["id"])
        .build()?;

    catalog
        .create_table("selfref")
        .primary_key("id", Type::Integer)
        .column("sid", Type::Integer)
        .foreign_key(&["sid"], "selfref", &["id"])
        .build()?;

    catalog
        .create_table("composite_selfref")
        .primary_key("id", Type::Integer)
        .primary_key("group_id", Type::Integer)
        .column("parent_id", Type::Integer)
        .foreign_key(
            &["parent_id", "group_id"],
            "composite_selfref",
            &["id", "group_id"],
        )
        .build()?;

    catalog
        .create_table("m2mlft")
        .primary_key("id", Type::Integer)
        .build()?;

    catalog
        .create_table("m2mrgt")
        .primary_key("id", Type::Integer)
        .build()?;

    catalog
        .create_table("m2msecondary")
        .primary_key("lid", Type::Integer)
        .primary_key("rid", Type::Integer)
        .foreign_key(&["lid"], "m2mlft", &["id"])
        .foreign_key(&["rid"], "m2mrgt", &["id"])
        .build()?;

    catalog
        .create_table("m2msecondary_no_fks")
        .primary_key("lid", Type::Integer)
        .primary_key("rid", Type::Integer)
        .build()?;

    catalog
        .create_table("m2msecondary_ambig_fks")
        .primary_key("lid1", Type::Integer)
        .primary_key("rid1", Type::Integer)
        .primary_key("lid2", Type::Integer)
        .primary_key("rid2", Type::Integer)
        .foreign_key(&["lid1"], "m2mlft", &["id"])
        .foreign_key(&["rid1"], "m2mrgt", &["id"])
        .foreign_key(&["lid2"], "m2mlft", &["id"])
        .foreign_key(&["rid2"], "m2mrgt", &["id"])
        .build()?;

    let base_w_sub_rel = catalog
        .create_table("base_w_sub_rel")
        .primary_key("id", Type::Integer)
        .column("sub_id", Type::Integer)
        .build()?;

    catalog
        .create_table("rel_sub")
        .primary_key("id", Type::Integer)
        .foreign_key(&["id"], "base_w_sub_rel", &["id"])
        .build()?;

    catalog.add_foreign_key(base_w_sub_rel, &["sub_id"], "rel_sub", &["id"])?;

    catalog
        .create_table("base")
        .primary_key("id", Type::Integer)
        .column("flag", Type::Boolean)
        .build()?;

    catalog
        .create_table("sub")
        .primary_key("id", Type::Integer)
        .foreign_key(&["id"], "base", &["id"])
        .build()?;

    catalog
        .create_table("sub_w_base_rel")
        .primary_key("id", Type::Integer)
        .column("base_id", Type::Integer)
        .foreign_key(&["id"], "base", &["id"])
        .foreign_key(&["base_id"], "base", &["id"])
        .build()?;

    catalog
        .create_table("sub_w_sub_rel")
        .primary_key("id", Type::Integer)
        .column("sub_id", Type::Integer)
        .foreign_key(&["id"], "base", &["id"])
        .foreign_key(&["sub_id"], "sub", &["id"])
        .build()?;

    catalog
        .create_table("right_w_base_rel")
        .primary_key("id", Type::Integer)
        .column("base_id", Type::Integer)
        .foreign_key(&["base_id"], "base", &["id"])
        .build()?;

    catalog
        .create_table("three_tab_a")
        .primary_key("id", Type::Integer)
        .build()?;

    catalog
        .create_table("three_tab_b")
        .primary_key("id", Type::Integer)
        .column("aid", Type::Integer)
        .foreign_key(&["aid"], "three_tab_a", &["id"])
        .build()?;

    catalog
        .create_table("three_tab_c")
        .primary_key("id", Type::Integer)
        .column("aid", Type::Integer)
        .column("bid", Type::Integer)
        .foreign_key(&["aid"], "three_tab_a", &["id"])
        .foreign_key(&["bid"], "three_tab_b", &["id"])
        .build()?;

    catalog
        .create_table("composite_target")
        .primary_key("uid", Type::Integer)
        .primary_key("oid", Type::Integer)
        .build()?;

    catalog
        .create_table("composite_multi_ref")
        .column("uid1", Type::Integer)
        .column("uid2", Type::Integer)
        .column("oid", Type::Integer)
        .foreign_key(&["uid1", "oid"], "composite_target", &["uid", "oid"])
        .foreign_key(&["uid2", "oid"], "composite_target", &["uid", "oid"])
        .build()?;

    catalog
        .create_table("purely_single_col")
        .column("path", Type::Text)
        .build()?;

    Ok(())
}
