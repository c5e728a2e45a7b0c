mod alias_names;
pub use alias_names::AliasNames;

mod catalog;
pub use catalog::Catalog;

mod column;
pub use column::{Column, ColumnId};

mod foreign_key;
pub use foreign_key::{ForeignKey, ForeignKeyColumn, ForeignKeyId};

mod join_condition;

mod pk;
pub use pk::PrimaryKey;

mod selectable;
pub use selectable::{Join, Selectable, TableAlias};

mod table;
pub use table::{Table, TableId};

mod table_builder;
pub use table_builder::TableBuilder;

mod ty;
pub use ty::Type;
