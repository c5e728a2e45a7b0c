use joinery_core::schema::{ColumnId, TableId, Type};
use joinery_core::Catalog;
use pretty_assertions::assert_eq;

fn catalog() -> Catalog {
    let mut catalog = Catalog::new();

    catalog
        .create_table("users")
        .primary_key("id", Type::Integer)
        .column("name", Type::Text)
        .not_null()
        .column("email", Type::Text)
        .build()
        .unwrap();

    catalog
        .create_table("todos")
        .primary_key("id", Type::Integer)
        .column("user_id", Type::Integer)
        .column("title", Type::Text)
        .foreign_key(&["user_id"], "users", &["id"])
        .build()
        .unwrap();

    catalog
}

fn col(catalog: &Catalog, table: &str, column: &str) -> ColumnId {
    catalog
        .table_by_name(table)
        .and_then(|table| table.column_by_name(column))
        .unwrap()
        .id
}

// --- tables ---

#[test]
fn build_registers_columns_in_order() {
    let catalog = catalog();
    let users = catalog.table_by_name("users").unwrap();

    assert_eq!(users.id, TableId(0));
    assert_eq!(
        users.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        ["id", "name", "email"]
    );
    assert_eq!(users.columns[1].id, ColumnId { table: users.id, index: 1 });
}

#[test]
fn nullability_and_primary_key() {
    let catalog = catalog();
    let users = catalog.table_by_name("users").unwrap();

    assert!(!users.columns[0].nullable);
    assert!(users.columns[0].primary_key);
    assert!(!users.columns[1].nullable);
    assert!(users.columns[2].nullable);

    assert_eq!(
        users
            .primary_key_columns()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>(),
        ["id"]
    );
}

#[test]
fn lookups() {
    let catalog = catalog();
    let user_id = col(&catalog, "todos", "user_id");

    assert_eq!(catalog.column(user_id).name, "user_id");
    assert_eq!(catalog.table(user_id.table).name, "todos");
    assert!(catalog.table_by_name("missing").is_none());
    assert!(catalog.get_table(TableId(42)).is_none());
    assert!(catalog
        .get_column(ColumnId { table: TableId(0), index: 42 })
        .is_none());
}

#[test]
fn duplicate_table_name() {
    let mut catalog = catalog();
    let err = catalog
        .create_table("users")
        .primary_key("id", Type::Integer)
        .build()
        .unwrap_err();

    assert!(err.is_invalid_schema());
    assert_eq!(err.to_string(), "invalid schema: duplicate table name `users`");
}

#[test]
fn duplicate_column_name() {
    let mut catalog = Catalog::new();
    let err = catalog
        .create_table("t")
        .primary_key("id", Type::Integer)
        .column("id", Type::Text)
        .build()
        .unwrap_err();

    assert!(err.is_invalid_schema());
    assert_eq!(
        err.to_string(),
        "invalid schema: duplicate column name `id` in table `t`"
    );
}

#[test]
fn drop_table_leaves_a_hole() {
    let mut catalog = catalog();
    let users = catalog.table_by_name("users").unwrap().id;

    let dropped = catalog.drop_table(users).unwrap();
    assert_eq!(dropped.name, "users");
    assert!(catalog.get_table(users).is_none());
    assert!(catalog.drop_table(users).is_none());

    // Ids are not reused
    let id = catalog
        .create_table("users")
        .primary_key("id", Type::Integer)
        .build()
        .unwrap();
    assert_eq!(id, TableId(2));
}

// --- foreign keys ---

#[test]
fn foreign_key_references() {
    let catalog = catalog();
    let user_id = col(&catalog, "todos", "user_id");
    let users_id = col(&catalog, "users", "id");

    assert!(catalog.references(user_id, users_id));
    assert!(!catalog.references(users_id, user_id));

    let fks = catalog.foreign_keys(user_id.table);
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].target_table(), Some(users_id.table));
    assert_eq!(fks[0].source_columns().collect::<Vec<_>>(), [user_id]);
}

#[test]
fn references_into_dropped_table() {
    let mut catalog = catalog();
    let user_id = col(&catalog, "todos", "user_id");
    let users_id = col(&catalog, "users", "id");

    catalog.drop_table(users_id.table);

    assert!(!catalog.references(user_id, users_id));
}

#[test]
fn self_referential_foreign_key() {
    let mut catalog = Catalog::new();
    let tree = catalog
        .create_table("tree")
        .primary_key("id", Type::Integer)
        .column("parent_id", Type::Integer)
        .foreign_key(&["parent_id"], "tree", &["id"])
        .build()
        .unwrap();

    let id = col(&catalog, "tree", "id");
    let parent_id = col(&catalog, "tree", "parent_id");

    assert!(catalog.references(parent_id, id));
    assert_eq!(catalog.foreign_keys(tree)[0].target_table(), Some(tree));
}

#[test]
fn foreign_key_column_count_mismatch() {
    let mut catalog = catalog();
    let err = catalog
        .create_table("bad")
        .column("a", Type::Integer)
        .foreign_key(&["a"], "users", &["id", "name"])
        .build()
        .unwrap_err();

    assert!(err.is_invalid_schema());
    assert_eq!(
        err.to_string(),
        "invalid schema: foreign key on `bad` lists 1 column(s) referencing 2 column(s) of `users`"
    );
}

#[test]
fn foreign_key_unknown_table() {
    let mut catalog = catalog();
    let err = catalog
        .create_table("bad")
        .column("a", Type::Integer)
        .foreign_key(&["a"], "nope", &["id"])
        .build()
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid schema: foreign key on `bad` references unknown table `nope`"
    );
    assert!(catalog.table_by_name("bad").is_none());
}

#[test]
fn foreign_key_unknown_columns() {
    let mut catalog = catalog();

    let err = catalog
        .create_table("bad")
        .column("a", Type::Integer)
        .foreign_key(&["b"], "users", &["id"])
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid schema: foreign key column `b` is not a column of `bad`"
    );

    let err = catalog
        .create_table("bad")
        .column("a", Type::Integer)
        .foreign_key(&["a"], "users", &["nope"])
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid schema: foreign key on `bad` references unknown column `users.nope`"
    );
}

#[test]
fn add_foreign_key_closes_a_cycle() {
    let mut catalog = Catalog::new();
    let a = catalog
        .create_table("a")
        .primary_key("id", Type::Integer)
        .column("b_id", Type::Integer)
        .build()
        .unwrap();
    catalog
        .create_table("b")
        .primary_key("id", Type::Integer)
        .column("a_id", Type::Integer)
        .foreign_key(&["a_id"], "a", &["id"])
        .build()
        .unwrap();

    let fk = catalog.add_foreign_key(a, &["b_id"], "b", &["id"]).unwrap();

    assert_eq!(fk.table, a);
    assert_eq!(fk.index, 0);
    assert!(catalog.references(col(&catalog, "a", "b_id"), col(&catalog, "b", "id")));
    assert!(catalog.references(col(&catalog, "b", "a_id"), col(&catalog, "a", "id")));
}

#[test]
fn add_foreign_key_errors() {
    let mut catalog = catalog();
    let todos = catalog.table_by_name("todos").unwrap().id;

    let err = catalog
        .add_foreign_key(todos, &["title"], "nope", &["id"])
        .unwrap_err();
    assert!(err.is_invalid_schema());
    assert_eq!(catalog.foreign_keys(todos).len(), 1);

    let users = catalog.table_by_name("users").unwrap().id;
    catalog.drop_table(users);

    let err = catalog
        .add_foreign_key(users, &["id"], "todos", &["id"])
        .unwrap_err();
    assert!(err.is_invalid_schema());
}
