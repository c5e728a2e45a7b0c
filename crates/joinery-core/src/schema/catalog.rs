use super::{
    table_builder::{self, ForeignKeyDef},
    Column, ColumnId, ForeignKey, ForeignKeyColumn, ForeignKeyId, Table, TableBuilder, TableId,
};
use crate::{Error, Result};

/// Caller-owned registry of tables.
///
/// Tables live in an arena and are addressed by [`TableId`]. Dropping a table
/// empties its slot; the slot is never reused, so stale handles fail lookups
/// instead of silently pointing at a different table.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    tables: Vec<Option<Table>>,
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog::default()
    }

    /// Starts declaring a new table. The table is registered when
    /// [`TableBuilder::build`] succeeds.
    pub fn create_table(&mut self, name: impl Into<String>) -> TableBuilder<'_> {
        TableBuilder::new(self, name.into())
    }

    /// Removes a table from the catalog, returning it.
    ///
    /// Foreign keys on other tables that point into the dropped table stay
    /// declared but no longer match anything during join detection.
    pub fn drop_table(&mut self, id: TableId) -> Option<Table> {
        self.tables.get_mut(id.0).and_then(Option::take)
    }

    pub fn table(&self, id: impl Into<TableId>) -> &Table {
        self.get_table(id).expect("invalid table ID")
    }

    pub fn get_table(&self, id: impl Into<TableId>) -> Option<&Table> {
        self.tables.get(id.into().0).and_then(Option::as_ref)
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables().find(|table| table.name == name)
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        let id = id.into();
        self.table(id.table)
            .columns
            .get(id.index)
            .expect("invalid column ID")
    }

    pub fn get_column(&self, id: impl Into<ColumnId>) -> Option<&Column> {
        let id = id.into();
        self.get_table(id.table)?.columns.get(id.index)
    }

    /// Iterates over the live tables, in registration order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> + '_ {
        self.tables.iter().flatten()
    }

    /// Declares a foreign key on a table that is already registered, e.g. to
    /// close a cycle of references between two tables.
    pub fn add_foreign_key(
        &mut self,
        table: TableId,
        columns: &[&str],
        target_table: &str,
        target_columns: &[&str],
    ) -> Result<ForeignKeyId> {
        let Some(source) = self.get_table(table) else {
            return Err(Error::invalid_schema(format!(
                "cannot add a foreign key to dropped table {table:?}"
            )));
        };

        let def = ForeignKeyDef::new(columns, target_table, target_columns);
        let fk = table_builder::resolve_foreign_key(self, source, source.foreign_keys.len(), def)?;
        let id = fk.id;

        if let Some(Some(source)) = self.tables.get_mut(table.0) {
            source.foreign_keys.push(fk);
        }

        Ok(id)
    }

    /// Returns the foreign key constraints declared on `table`. A dropped
    /// table has none.
    pub fn foreign_keys(&self, table: TableId) -> &[ForeignKey] {
        self.get_table(table)
            .map(|table| &table.foreign_keys[..])
            .unwrap_or(&[])
    }

    /// Returns `true` if `source` carries a foreign key reference to `target`.
    pub fn references(&self, source: ColumnId, target: ColumnId) -> bool {
        if self.get_table(target.table).is_none() {
            return false;
        }

        self.foreign_keys(source.table)
            .iter()
            .any(|fk| fk.references(source, target))
    }

    /// All foreign key columns declared on `table`, ordered by the position
    /// of the referencing column.
    pub(crate) fn foreign_key_columns(
        &self,
        table: TableId,
    ) -> Vec<(&ForeignKey, ForeignKeyColumn)> {
        let mut columns: Vec<_> = self
            .foreign_keys(table)
            .iter()
            .flat_map(|fk| fk.columns.iter().map(move |column| (fk, *column)))
            .collect();

        // Stable, so columns shared by two constraints keep declaration order.
        columns.sort_by_key(|(_, column)| column.source);
        columns
    }

    pub(super) fn next_table_id(&self) -> TableId {
        TableId(self.tables.len())
    }

    pub(super) fn insert(&mut self, table: Table) -> TableId {
        let id = table.id;
        debug_assert_eq!(id, self.next_table_id());
        self.tables.push(Some(table));
        id
    }
}
