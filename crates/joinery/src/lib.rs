pub mod relation;
pub use relation::{Diagnostic, Direction, JoinCondition, Registry};

pub use joinery_core::{bail, err, schema, stmt, Catalog, Error, Result};
pub use joinery_sql::Serializer;
