use std::fmt;

/// A non-fatal problem found while resolving a relationship.
///
/// Resolution continues after a diagnostic is recorded; the resulting
/// [`JoinCondition`](super::JoinCondition) may be degraded (for example,
/// missing synchronize pairs for a comparison it could not interpret).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// Display name of the relationship being resolved
    pub relationship: String,

    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The join condition compares expressions other than bare columns and
    /// nothing marks which side is remote.
    NonSimpleJoin,

    /// A remote column belongs to the parent rather than the child.
    RemoteNotInChild,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
