use joinery_core::schema::{ColumnId, Selectable, TableId, Type};
use joinery_core::stmt::Expr;
use joinery_core::Catalog;
use pretty_assertions::assert_eq;

use indexmap::IndexSet;

struct Schema {
    catalog: Catalog,
    parent: TableId,
    child: TableId,
    multi: TableId,
    orphan: TableId,
    composite: TableId,
}

fn schema() -> Schema {
    let mut catalog = Catalog::new();

    let parent = catalog
        .create_table("parent")
        .primary_key("id", Type::Integer)
        .build()
        .unwrap();

    let child = catalog
        .create_table("child")
        .primary_key("id", Type::Integer)
        .column("parent_id", Type::Integer)
        .foreign_key(&["parent_id"], "parent", &["id"])
        .build()
        .unwrap();

    let multi = catalog
        .create_table("multi")
        .primary_key("id", Type::Integer)
        .column("a_id", Type::Integer)
        .column("b_id", Type::Integer)
        .foreign_key(&["a_id"], "parent", &["id"])
        .foreign_key(&["b_id"], "parent", &["id"])
        .build()
        .unwrap();

    let orphan = catalog
        .create_table("orphan")
        .primary_key("id", Type::Integer)
        .build()
        .unwrap();

    let composite = catalog
        .create_table("composite")
        .primary_key("id", Type::Integer)
        .primary_key("version", Type::Integer)
        .column("prev_id", Type::Integer)
        .foreign_key(&["prev_id", "version"], "composite", &["id", "version"])
        .build()
        .unwrap();

    Schema {
        catalog,
        parent,
        child,
        multi,
        orphan,
        composite,
    }
}

impl Schema {
    fn col(&self, table: TableId, name: &str) -> ColumnId {
        self.catalog.table(table).column_by_name(name).unwrap().id
    }

    fn join(&self, a: TableId, b: TableId, fks: &[ColumnId]) -> joinery_core::Result<Expr> {
        let fks: IndexSet<ColumnId> = fks.iter().copied().collect();
        self.catalog
            .join_condition(&a.into(), &b.into(), None, &fks)
    }
}

#[test]
fn single_foreign_key() {
    let s = schema();
    let expected = Expr::eq(s.col(s.parent, "id"), s.col(s.child, "parent_id"));

    assert_eq!(s.join(s.parent, s.child, &[]).unwrap(), expected);
    // Direction of the search does not matter
    assert_eq!(s.join(s.child, s.parent, &[]).unwrap(), expected);
}

#[test]
fn composite_foreign_key_ands_columns() {
    let s = schema();
    // Ordered by referencing column
    let expected = Expr::and(
        Expr::eq(s.col(s.composite, "version"), s.col(s.composite, "version")),
        Expr::eq(s.col(s.composite, "id"), s.col(s.composite, "prev_id")),
    );

    assert_eq!(s.join(s.composite, s.composite, &[]).unwrap(), expected);
}

#[test]
fn ambiguous() {
    let s = schema();
    let err = s.join(s.parent, s.multi, &[]).unwrap_err();

    assert!(err.is_ambiguous_foreign_keys());
    assert_eq!(
        err.to_string(),
        "Can't determine join between 'parent' and 'multi'; tables have more than one foreign \
         key constraint relationship between them. Please specify the 'onclause' of this join \
         explicitly."
    );
}

#[test]
fn consider_as_foreign_keys_disambiguates() {
    let s = schema();
    let b_id = s.col(s.multi, "b_id");

    assert_eq!(
        s.join(s.parent, s.multi, &[b_id]).unwrap(),
        Expr::eq(s.col(s.parent, "id"), b_id)
    );
}

#[test]
fn no_foreign_keys() {
    let s = schema();
    let err = s.join(s.parent, s.orphan, &[]).unwrap_err();

    assert!(err.is_no_foreign_keys());
    assert_eq!(
        err.to_string(),
        "Can't find any foreign key relationships between 'parent' and 'orphan'."
    );
}

#[test]
fn consider_as_foreign_keys_excludes_everything_else() {
    let s = schema();
    let unrelated = s.col(s.multi, "a_id");

    let err = s.join(s.parent, s.child, &[unrelated]).unwrap_err();
    assert!(err.is_no_foreign_keys());
}

#[test]
fn subset_is_searched_first() {
    let s = schema();
    let joined = Selectable::join(
        s.orphan,
        s.parent,
        Expr::eq(s.col(s.orphan, "id"), s.col(s.parent, "id")),
    );

    let expr = s
        .catalog
        .join_condition(&joined, &s.child.into(), Some(&s.parent.into()), &IndexSet::new())
        .unwrap();

    assert_eq!(expr, Expr::eq(s.col(s.parent, "id"), s.col(s.child, "parent_id")));
}

#[test]
fn aliased_selectables_qualify_columns() {
    let s = schema();
    let alias = Selectable::alias(s.child, "c1");

    let expr = s
        .catalog
        .join_condition(&s.parent.into(), &alias, None, &IndexSet::new())
        .unwrap();

    let mut aliases = vec![];
    expr.for_each_column(|column| aliases.push(column.alias.as_deref().map(str::to_string)));
    assert_eq!(aliases, [None, Some("c1".to_string())]);
}
