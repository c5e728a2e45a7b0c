#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod column;
mod expr;

use joinery_core::{schema::Catalog, stmt::Expr};

/// Renders expressions as generic SQL text.
///
/// Columns are qualified by their table name, or by their alias when
/// selected through one. Bind parameters render as `:name`.
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'a> {
    /// Catalog used to resolve table and column names
    catalog: &'a Catalog,
}

struct Formatter<'a> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,
}

impl<'a> Serializer<'a> {
    pub fn new(catalog: &'a Catalog) -> Serializer<'a> {
        Serializer { catalog }
    }

    pub fn serialize(&self, expr: &Expr) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
        };

        expr.to_sql(&mut fmt);
        ret
    }
}
