use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use crate::ast::{BinaryOp, Expr, ExprKind};
use crate::diagnostic::{Diagnostic, Span};
use crate::format;
use crate::json::{self, DecodeError};
use crate::value::{Closure, Value};

use super::environment::{Binding, Environment};
use super::error::EvalError;

/// The tree walker.
///
/// Owns nothing but the sink print effects are written to; all evaluation
/// state lives in the environments threaded through
/// [`evaluate`](Interpreter::evaluate). Evaluation is a single depth-first
/// recursion, so whatever reaches the sink is in program order.
pub struct Interpreter<W = io::Stdout> {
    out: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// An interpreter writing print effects to `out` instead of stdout.
    pub fn with_output(out: W) -> Self {
        Self { out }
    }

    /// Consumes the interpreter and hands back the sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Evaluates a whole program: the root expression in an empty
    /// environment.
    pub fn run(&mut self, root: &Expr) -> Result<Value, EvalError> {
        self.evaluate(root, &Environment::new())
    }

    pub fn evaluate(&mut self, expr: &Expr, env: &Environment) -> Result<Value, EvalError> {
        match &expr.kind {
            ExprKind::Int(n) => Ok(Value::Int(*n)),

            ExprKind::Let { name, value, next } => {
                // The bound expression goes into the environment as-is; it
                // is not evaluated until a `Var` references it.
                let extended = env.extend(name.clone(), Binding::Expr(value.clone()));
                self.evaluate(next, &extended)
            }

            ExprKind::Function { params, body } => Ok(Value::Closure(Rc::new(Closure {
                params: params.clone(),
                body: body.clone(),
                env: env.clone(),
            }))),

            ExprKind::Print { value } => {
                let value = self.evaluate(value, env)?;
                let _ = writeln!(self.out, "{}", format::display_value(&value));
                Ok(Value::Unit)
            }

            ExprKind::Var { name } => match env.lookup(name) {
                Some(binding) => self.force(binding, env),
                None => Err(EvalError::unbound_variable(name.as_ref(), expr.span)),
            },

            ExprKind::Call { callee, args } => {
                let callee_value = self.evaluate(callee, env)?;
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.evaluate(arg, env)?);
                }
                match callee_value {
                    Value::Closure(closure) => self.apply(&closure, arg_values, expr.span),
                    other => Err(EvalError::not_callable(other.kind(), callee.span)),
                }
            }

            ExprKind::Binary { lhs, op, rhs } => {
                let lhs_value = self.evaluate(lhs, env)?;
                let rhs_value = self.evaluate(rhs, env)?;
                apply_binary(*op, lhs_value, rhs_value, expr.span)
            }

            ExprKind::If {
                condition,
                then,
                otherwise,
            } => {
                let truthy = match self.evaluate(condition, env)? {
                    Value::Bool(b) => b,
                    Value::Int(n) => n != 0,
                    other => {
                        return Err(EvalError::type_mismatch(
                            format!("cannot branch on a {} condition", other.kind()),
                            condition.span,
                        ))
                    }
                };
                if truthy {
                    self.evaluate(then, env)
                } else {
                    self.evaluate(otherwise, env)
                }
            }
        }
    }

    /// Resolves a binding to a value: a deferred expression is evaluated in
    /// the environment current at the point of reference, a finished value
    /// passes through unchanged.
    pub fn force(&mut self, binding: &Binding, env: &Environment) -> Result<Value, EvalError> {
        match binding {
            Binding::Expr(expr) => self.evaluate(expr, env),
            Binding::Value(value) => Ok(value.clone()),
        }
    }

    fn apply(
        &mut self,
        closure: &Closure,
        args: Vec<Value>,
        call_span: Span,
    ) -> Result<Value, EvalError> {
        if closure.params.len() != args.len() {
            return Err(EvalError::wrong_arity(
                closure.params.len(),
                args.len(),
                call_span,
            ));
        }
        let mut env = closure.env.clone();
        for (param, arg) in closure.params.iter().zip(args) {
            env = env.extend(param.clone(), Binding::Value(arg));
        }
        self.evaluate(&closure.body, &env)
    }
}

fn apply_binary(op: BinaryOp, lhs: Value, rhs: Value, span: Span) -> Result<Value, EvalError> {
    match op {
        // Differing kinds compare unequal rather than erroring.
        BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
        // Bitwise, not short-circuit: both operands are already evaluated.
        BinaryOp::Or => match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a | b)),
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a | b)),
            (a, b) => Err(EvalError::type_mismatch(
                format!(
                    "`||` needs two ints or two bools, got {} and {}",
                    a.kind(),
                    b.kind()
                ),
                span,
            )),
        },
        BinaryOp::Add => {
            let (a, b) = int_operands(op, &lhs, &rhs, span)?;
            Ok(Value::Int(a + b))
        }
        BinaryOp::Sub => {
            let (a, b) = int_operands(op, &lhs, &rhs, span)?;
            Ok(Value::Int(a - b))
        }
        BinaryOp::Lt => {
            let (a, b) = int_operands(op, &lhs, &rhs, span)?;
            Ok(Value::Bool(a < b))
        }
        BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Rem
        | BinaryOp::Neq
        | BinaryOp::Gt
        | BinaryOp::Lte
        | BinaryOp::Gte
        | BinaryOp::And => Err(EvalError::unsupported_operator(op, span)),
    }
}

fn int_operands(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    span: Span,
) -> Result<(i64, i64), EvalError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok((*a, *b)),
        (a, b) => Err(EvalError::type_mismatch(
            format!(
                "`{}` needs two ints, got {} and {}",
                op.symbol(),
                a.kind(),
                b.kind()
            ),
            span,
        )),
    }
}

/// Failure surfaced by [`parse_and_run`]: the program either failed to
/// decode or failed to evaluate.
#[derive(Debug)]
pub enum RunError {
    Decode(DecodeError),
    Eval(EvalError),
}

impl RunError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RunError::Decode(error) => error.to_diagnostic(),
            RunError::Eval(error) => error.to_diagnostic(),
        }
    }
}

impl From<DecodeError> for RunError {
    fn from(error: DecodeError) -> Self {
        RunError::Decode(error)
    }
}

impl From<EvalError> for RunError {
    fn from(error: EvalError) -> Self {
        RunError::Eval(error)
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Decode(error) => write!(f, "{}", error),
            RunError::Eval(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Decode(error) => Some(error),
            RunError::Eval(error) => Some(error),
        }
    }
}

/// Decodes `text` and evaluates it, with print effects going to stdout.
pub fn parse_and_run(text: &str) -> Result<Value, RunError> {
    let program = json::parse_program(text)?;
    let mut interpreter = Interpreter::new();
    interpreter
        .run(&program.expression)
        .map_err(RunError::from)
}

/// As [`parse_and_run`], but failures arrive ready for rendering.
pub fn parse_and_run_with_diagnostics(text: &str) -> Result<Value, Vec<Diagnostic>> {
    parse_and_run(text).map_err(|error| vec![error.to_diagnostic()])
}
