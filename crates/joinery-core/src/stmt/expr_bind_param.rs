use super::Expr;
use crate::schema::Type;

/// A named placeholder whose value is supplied at execution time.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprBindParam {
    pub name: String,

    /// Type of the column the parameter stands in for
    pub ty: Option<Type>,
}

impl Expr {
    pub fn bind_param(name: impl Into<String>, ty: Option<Type>) -> Self {
        ExprBindParam {
            name: name.into(),
            ty,
        }
        .into()
    }

    pub fn is_bind_param(&self) -> bool {
        matches!(self, Self::BindParam(_))
    }
}

impl From<ExprBindParam> for Expr {
    fn from(value: ExprBindParam) -> Self {
        Self::BindParam(value)
    }
}
