use super::Expr;

/// A SQL function call, e.g. `foo(a, b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunc {
    pub name: String,
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn func(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        ExprFunc {
            name: name.into(),
            args: args.into_iter().collect(),
        }
        .into()
    }
}

impl From<ExprFunc> for Expr {
    fn from(value: ExprFunc) -> Self {
        Self::Func(value)
    }
}
