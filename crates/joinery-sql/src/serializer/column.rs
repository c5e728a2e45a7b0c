use super::{Formatter, ToSql};

use joinery_core::stmt::ExprColumn;

impl ToSql for &ExprColumn {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let catalog = f.serializer.catalog;

        let Some(column) = catalog.get_column(self.column) else {
            // Dropped table; keep the output readable.
            let name = format!("<column {}/{}>", self.column.table.0, self.column.index);
            fmt!(f, &name);
            return;
        };

        match &self.alias {
            Some(alias) => fmt!(f, &**alias),
            None => fmt!(f, &catalog.table(self.column.table).name),
        }

        let name = column.name.as_str();
        fmt!(f, "." name);
    }
}
