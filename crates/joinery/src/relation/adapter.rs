use joinery_core::{
    schema::Selectable,
    stmt::{Annotations, Expr, ExprColumn},
};

/// Rewrites column references so they point at a different selectable,
/// typically an alias of the table they come from.
///
/// Adapters chain: each column is offered to every adapter in turn and the
/// first one with a corresponding column wins. An adapter can exclude
/// columns carrying some annotations, leaving them to the rest of the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseAdapter {
    selectable: Selectable,

    /// Columns with any of these annotations are skipped by this adapter
    exclude: Annotations,

    next: Option<Box<ClauseAdapter>>,
}

impl ClauseAdapter {
    pub fn new(selectable: impl Into<Selectable>) -> ClauseAdapter {
        ClauseAdapter {
            selectable: selectable.into(),
            exclude: Annotations::NONE,
            next: None,
        }
    }

    pub fn exclude(mut self, annotations: Annotations) -> ClauseAdapter {
        self.exclude = annotations;
        self
    }

    /// Appends `next` to the end of the chain.
    pub fn chain(mut self, next: ClauseAdapter) -> ClauseAdapter {
        self.next = Some(Box::new(match self.next.take() {
            Some(tail) => tail.chain(next),
            None => next,
        }));
        self
    }

    pub fn selectable(&self) -> &Selectable {
        &self.selectable
    }

    pub(crate) fn clear_exclude(&mut self) {
        self.exclude = Annotations::NONE;
    }

    /// Returns the adapted version of `column`, or `None` if no adapter in
    /// the chain applies.
    pub fn adapt_column(&self, column: &ExprColumn) -> Option<ExprColumn> {
        let mut adapter = Some(self);

        while let Some(current) = adapter {
            if !column.annotations.intersects(current.exclude) {
                if let Some(adapted) = current.selectable.corresponding_column(column) {
                    return Some(adapted);
                }
            }
            adapter = current.next.as_deref();
        }

        None
    }

    /// Returns a copy of `expr` with every adaptable column rewritten.
    pub fn adapt(&self, expr: &Expr) -> Expr {
        let mut expr = expr.clone();
        expr.for_each_column_mut(|column| {
            if let Some(adapted) = self.adapt_column(column) {
                *column = adapted;
            }
        });
        expr
    }
}
