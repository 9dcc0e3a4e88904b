pub mod ast;
pub mod cli;
pub mod diagnostic;
pub mod emit;
pub mod format;
pub mod interpreter;
pub mod json;
pub mod value;

pub use ast::{BinaryOp, Expr, ExprKind};
pub use interpreter::{Binding, Environment, EvalError, Interpreter, RunError};
pub use value::{Closure, Value};
