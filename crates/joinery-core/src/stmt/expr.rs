use super::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of boolean expressions
    And(ExprAnd),

    /// Binary expression: comparison, arithmetic or concatenation
    BinaryOp(ExprBinaryOp),

    /// A named bind parameter, filled in when the statement is executed
    BindParam(ExprBindParam),

    /// References a column of a table or of a table alias
    Column(ExprColumn),

    /// Function call
    Func(ExprFunc),

    /// OR a set of boolean expressions
    Or(ExprOr),

    /// Evaluates to a constant value
    Value(Value),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// Returns true if the expression is the `true` boolean expression
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(true)))
    }

    /// Returns the column if the expression is a bare column reference.
    pub fn as_column(&self) -> Option<&ExprColumn> {
        match self {
            Self::Column(column) => Some(column),
            _ => None,
        }
    }

    pub fn as_column_mut(&mut self) -> Option<&mut ExprColumn> {
        match self {
            Self::Column(column) => Some(column),
            _ => None,
        }
    }

    /// Returns true if the expression is a comparison (`=`, `<`, `LIKE`, ...)
    pub fn is_comparison(&self) -> bool {
        matches!(self, Self::BinaryOp(expr) if expr.op.is_comparison())
    }

    /// Splits the expression into its top-level conjuncts. Nested ANDs are
    /// flattened; anything else is a single conjunct.
    pub fn conjuncts(&self) -> Vec<&Expr> {
        let mut conjuncts = vec![];
        self.collect_conjuncts(&mut conjuncts);
        conjuncts
    }

    fn collect_conjuncts<'a>(&'a self, dst: &mut Vec<&'a Expr>) {
        match self {
            Self::And(expr_and) => {
                for operand in expr_and {
                    operand.collect_conjuncts(dst);
                }
            }
            _ => dst.push(self),
        }
    }

    /// Calls `f` on every column occurrence, left to right.
    pub fn for_each_column(&self, mut f: impl FnMut(&ExprColumn)) {
        visit::for_each_expr(self, |expr| {
            if let Self::Column(column) = expr {
                f(column);
            }
        });
    }

    /// Calls `f` on every column occurrence, left to right, allowing it to be
    /// modified in place.
    pub fn for_each_column_mut(&mut self, mut f: impl FnMut(&mut ExprColumn)) {
        visit_mut::for_each_expr_mut(self, |expr| {
            if let Self::Column(column) = expr {
                f(column);
            }
        });
    }
}

impl Node for Expr {
    fn visit<V: Visit>(&self, mut visit: V) {
        visit.visit_expr(self);
    }

    fn visit_mut<V: VisitMut>(&mut self, mut visit: V) {
        visit.visit_expr_mut(self);
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(Value::I64(value))
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}
