pub mod environment;
pub mod error;
pub mod evaluator;

pub use environment::{Binding, Environment};
pub use error::EvalError;
pub use evaluator::{parse_and_run, parse_and_run_with_diagnostics, Interpreter, RunError};
