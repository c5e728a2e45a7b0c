mod adapter;
pub use adapter::ClauseAdapter;

mod args;
pub use args::{CanBeSynced, JoinConditionArgs, JoinConditionBuilder};

mod diagnostic;
pub use diagnostic::{Diagnostic, DiagnosticKind};

mod direction;
pub use direction::Direction;

mod join_condition;
pub use join_condition::JoinCondition;

mod join_targets;
pub use join_targets::JoinTargets;

mod lazy_clause;
pub use lazy_clause::LazyClause;

mod registry;
pub use registry::{Registry, RelationshipId};

mod resolve;

use joinery_core::schema::ColumnId;

/// A pair of columns, e.g. `(local, remote)` or `(source, destination)`.
pub type ColumnPair = (ColumnId, ColumnId);
