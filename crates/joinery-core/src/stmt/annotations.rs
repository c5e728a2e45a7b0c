use super::{Expr, ExprColumn};

use std::{fmt, ops};

/// Markers attached to a column occurrence within a join condition.
///
/// Annotations never change what an expression evaluates to. They record
/// which side of a relationship a column is on (`LOCAL` / `REMOTE`) and
/// whether it holds the foreign key value (`FOREIGN`).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Annotations(u8);

impl Annotations {
    pub const NONE: Annotations = Annotations(0);
    pub const FOREIGN: Annotations = Annotations(1 << 0);
    pub const REMOTE: Annotations = Annotations(1 << 1);
    pub const LOCAL: Annotations = Annotations(1 << 2);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every marker in `other` is set.
    pub fn contains(self, other: Annotations) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any marker in `other` is set.
    pub fn intersects(self, other: Annotations) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Annotations) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Annotations) {
        self.0 &= !other.0;
    }

    pub fn is_foreign(self) -> bool {
        self.contains(Annotations::FOREIGN)
    }

    pub fn is_remote(self) -> bool {
        self.contains(Annotations::REMOTE)
    }

    pub fn is_local(self) -> bool {
        self.contains(Annotations::LOCAL)
    }
}

impl ops::BitOr for Annotations {
    type Output = Annotations;

    fn bitor(self, rhs: Annotations) -> Annotations {
        Annotations(self.0 | rhs.0)
    }
}

impl fmt::Debug for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Annotations::FOREIGN, "foreign"),
            (Annotations::REMOTE, "remote"),
            (Annotations::LOCAL, "local"),
        ];

        f.write_str("Annotations(")?;
        let mut s = "";
        for (flag, name) in names {
            if self.contains(flag) {
                write!(f, "{s}{name}")?;
                s = " | ";
            }
        }
        f.write_str(")")
    }
}

/// Marks every column within `expr` as being on the remote side of the
/// relationship.
pub fn remote(expr: impl Into<Expr>) -> Expr {
    expr.into().annotate(Annotations::REMOTE)
}

/// Marks every column within `expr` as holding a foreign key value.
pub fn foreign(expr: impl Into<Expr>) -> Expr {
    expr.into().annotate(Annotations::FOREIGN)
}

impl Expr {
    /// See [`remote`].
    pub fn remote(expr: impl Into<Expr>) -> Expr {
        remote(expr)
    }

    /// See [`foreign`].
    pub fn foreign(expr: impl Into<Expr>) -> Expr {
        foreign(expr)
    }

    /// Returns a copy of `self` with `annotations` added to every column
    /// occurrence.
    pub fn annotate(mut self, annotations: Annotations) -> Expr {
        self.for_each_column_mut(|column| column.annotations.insert(annotations));
        self
    }

    /// Returns a copy of `self` with `annotations` removed from every column
    /// occurrence.
    pub fn deannotate(&self, annotations: Annotations) -> Expr {
        let mut expr = self.clone();
        expr.for_each_column_mut(|column| column.annotations.remove(annotations));
        expr
    }

    /// Returns `true` if any column occurrence carries one of `annotations`.
    pub fn has_annotation(&self, annotations: Annotations) -> bool {
        let mut found = false;
        self.for_each_column(|column| found |= column.annotations.intersects(annotations));
        found
    }
}

impl ExprColumn {
    pub fn is_foreign(&self) -> bool {
        self.annotations.is_foreign()
    }

    pub fn is_remote(&self) -> bool {
        self.annotations.is_remote()
    }

    pub fn is_local(&self) -> bool {
        self.annotations.is_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_independent() {
        let mut annotations = Annotations::FOREIGN | Annotations::REMOTE;
        assert!(annotations.is_foreign());
        assert!(annotations.is_remote());
        assert!(!annotations.is_local());

        annotations.remove(Annotations::REMOTE);
        assert!(annotations.is_foreign());
        assert!(!annotations.is_remote());

        annotations.insert(Annotations::LOCAL);
        assert!(annotations.contains(Annotations::FOREIGN | Annotations::LOCAL));
        assert!(!annotations.contains(Annotations::FOREIGN | Annotations::REMOTE));
        assert!(annotations.intersects(Annotations::FOREIGN | Annotations::REMOTE));
    }

    #[test]
    fn annotating_leaves_the_input_untouched() {
        use crate::schema::{ColumnId, TableId};

        let column = ColumnId {
            table: TableId(0),
            index: 0,
        };
        let expr = Expr::eq(column, 1_i64);
        let annotated = Expr::remote(expr.clone());

        assert!(annotated.has_annotation(Annotations::REMOTE));
        assert!(!expr.has_annotation(Annotations::REMOTE));
        assert_eq!(annotated.deannotate(Annotations::REMOTE), expr);
    }

    #[test]
    fn debug_lists_set_flags() {
        assert_eq!(format!("{:?}", Annotations::NONE), "Annotations()");
        assert_eq!(
            format!("{:?}", Annotations::FOREIGN | Annotations::LOCAL),
            "Annotations(foreign | local)"
        );
    }
}
