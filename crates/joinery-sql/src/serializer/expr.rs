use super::{Comma, Delimited, Formatter, ToSql};

use joinery_core::stmt::{self, BinaryOp};

impl ToSql for &stmt::Expr {
    fn to_sql(self, f: &mut Formatter<'_>) {
        use stmt::Expr::*;

        match self {
            And(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Operand::of_and), " AND "));
            }
            Or(expr) => {
                fmt!(f, Delimited(&expr.operands, " OR "));
            }
            BinaryOp(expr) => {
                let lhs = Operand::of_binary_op(&expr.lhs, expr.op, false);
                let rhs = Operand::of_binary_op(&expr.rhs, expr.op, true);
                let op = expr.op.to_string();

                fmt!(f, lhs " " op.as_str() " " rhs);
            }
            BindParam(expr) => {
                fmt!(f, ":" expr.name.as_str());
            }
            Column(expr) => {
                fmt!(f, expr);
            }
            Func(expr) => {
                fmt!(f, expr.name.as_str() "(" Comma(&expr.args) ")");
            }
            Value(value) => {
                let value = value.to_string();
                fmt!(f, &value);
            }
        }
    }
}

/// An expression nested within another, parenthesized when it binds looser
/// than its parent.
struct Operand<'a> {
    expr: &'a stmt::Expr,
    parens: bool,
}

impl<'a> Operand<'a> {
    fn of_and(expr: &'a stmt::Expr) -> Operand<'a> {
        Operand {
            expr,
            parens: matches!(expr, stmt::Expr::Or(_)),
        }
    }

    fn of_binary_op(expr: &'a stmt::Expr, parent: BinaryOp, rhs: bool) -> Operand<'a> {
        let parens = match expr {
            stmt::Expr::And(_) | stmt::Expr::Or(_) => true,
            stmt::Expr::BinaryOp(child) if rhs => child.op.precedence() <= parent.precedence(),
            stmt::Expr::BinaryOp(child) => child.op.precedence() < parent.precedence(),
            _ => false,
        };

        Operand { expr, parens }
    }
}

impl ToSql for Operand<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if self.parens {
            fmt!(f, "(" self.expr ")");
        } else {
            fmt!(f, self.expr);
        }
    }
}
