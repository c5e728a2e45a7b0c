use super::{
    Catalog, Column, ColumnId, ForeignKey, ForeignKeyColumn, ForeignKeyId, PrimaryKey, Table,
    TableId, Type,
};
use crate::{Error, Result};

/// Declares a table's columns and foreign keys before registering it in a
/// [`Catalog`].
///
/// ```
/// # use joinery_core::{Catalog, schema::Type};
/// let mut catalog = Catalog::new();
///
/// catalog
///     .create_table("lft")
///     .primary_key("id", Type::Integer)
///     .column("x", Type::Integer)
///     .build()
///     .unwrap();
///
/// catalog
///     .create_table("rgt")
///     .primary_key("id", Type::Integer)
///     .column("lid", Type::Integer)
///     .foreign_key(&["lid"], "lft", &["id"])
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct TableBuilder<'a> {
    catalog: &'a mut Catalog,
    name: String,
    columns: Vec<ColumnDef>,
    foreign_keys: Vec<ForeignKeyDef>,
}

#[derive(Debug)]
struct ColumnDef {
    name: String,
    ty: Type,
    nullable: bool,
    primary_key: bool,
}

#[derive(Debug)]
pub(super) struct ForeignKeyDef {
    columns: Vec<String>,
    target_table: String,
    target_columns: Vec<String>,
}

impl ForeignKeyDef {
    pub(super) fn new(columns: &[&str], target_table: &str, target_columns: &[&str]) -> ForeignKeyDef {
        ForeignKeyDef {
            columns: columns.iter().map(|name| name.to_string()).collect(),
            target_table: target_table.to_string(),
            target_columns: target_columns.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl<'a> TableBuilder<'a> {
    pub(super) fn new(catalog: &'a mut Catalog, name: String) -> TableBuilder<'a> {
        TableBuilder {
            catalog,
            name,
            columns: vec![],
            foreign_keys: vec![],
        }
    }

    /// Adds a nullable column.
    pub fn column(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            ty,
            nullable: true,
            primary_key: false,
        });
        self
    }

    /// Adds a non-nullable column that is part of the primary key.
    pub fn primary_key(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            ty,
            nullable: false,
            primary_key: true,
        });
        self
    }

    /// Marks the most recently added column as not nullable.
    pub fn not_null(mut self) -> Self {
        if let Some(column) = self.columns.last_mut() {
            column.nullable = false;
        }
        self
    }

    /// Declares a (possibly composite) foreign key constraint.
    ///
    /// `target_table` may name the table being built, for self-referential
    /// constraints.
    pub fn foreign_key(mut self, columns: &[&str], target_table: &str, target_columns: &[&str]) -> Self {
        self.foreign_keys
            .push(ForeignKeyDef::new(columns, target_table, target_columns));
        self
    }

    /// Validates the declaration and registers the table.
    pub fn build(self) -> Result<TableId> {
        if self.catalog.table_by_name(&self.name).is_some() {
            return Err(Error::invalid_schema(format!(
                "duplicate table name `{}`",
                self.name
            )));
        }

        let id = self.catalog.next_table_id();

        let mut table = Table {
            id,
            name: self.name,
            columns: vec![],
            primary_key: PrimaryKey::default(),
            foreign_keys: vec![],
        };

        for (index, def) in self.columns.into_iter().enumerate() {
            if table.column_by_name(&def.name).is_some() {
                return Err(Error::invalid_schema(format!(
                    "duplicate column name `{}` in table `{}`",
                    def.name, table.name
                )));
            }

            let column_id = ColumnId { table: id, index };

            if def.primary_key {
                table.primary_key.columns.push(column_id);
            }

            table.columns.push(Column {
                id: column_id,
                name: def.name,
                ty: def.ty,
                nullable: def.nullable,
                primary_key: def.primary_key,
            });
        }

        for (index, def) in self.foreign_keys.into_iter().enumerate() {
            let fk = resolve_foreign_key(self.catalog, &table, index, def)?;
            table.foreign_keys.push(fk);
        }

        Ok(self.catalog.insert(table))
    }
}

pub(super) fn resolve_foreign_key(
    catalog: &Catalog,
    table: &Table,
    index: usize,
    def: ForeignKeyDef,
) -> Result<ForeignKey> {
    if def.columns.is_empty() || def.columns.len() != def.target_columns.len() {
        return Err(Error::invalid_schema(format!(
            "foreign key on `{}` lists {} column(s) referencing {} column(s) of `{}`",
            table.name,
            def.columns.len(),
            def.target_columns.len(),
            def.target_table
        )));
    }

    let target = if def.target_table == table.name {
        table
    } else {
        catalog.table_by_name(&def.target_table).ok_or_else(|| {
            Error::invalid_schema(format!(
                "foreign key on `{}` references unknown table `{}`",
                table.name, def.target_table
            ))
        })?
    };

    let mut columns = vec![];

    for (source, target_column) in def.columns.iter().zip(&def.target_columns) {
        let source = table.column_by_name(source).ok_or_else(|| {
            Error::invalid_schema(format!(
                "foreign key column `{}` is not a column of `{}`",
                source, table.name
            ))
        })?;

        let target_column = target.column_by_name(target_column).ok_or_else(|| {
            Error::invalid_schema(format!(
                "foreign key on `{}` references unknown column `{}.{}`",
                table.name, target.name, target_column
            ))
        })?;

        columns.push(ForeignKeyColumn {
            source: source.id,
            target: target_column.id,
        });
    }

    Ok(ForeignKey {
        id: ForeignKeyId {
            table: table.id,
            index,
        },
        columns,
    })
}
