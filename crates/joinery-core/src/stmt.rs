mod annotations;
pub use annotations::{foreign, remote, Annotations};

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_bind_param;
pub use expr_bind_param::ExprBindParam;

mod expr_column;
pub use expr_column::ExprColumn;

mod expr_func;
pub use expr_func::ExprFunc;

mod expr_or;
pub use expr_or::ExprOr;

mod node;
pub use node::Node;

mod op_binary;
pub use op_binary::BinaryOp;

mod value;
pub use value::Value;

pub mod visit;
pub use visit::Visit;

pub mod visit_mut;
pub use visit_mut::VisitMut;
