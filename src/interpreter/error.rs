use crate::ast::BinaryOp;
use crate::diagnostic::{Diagnostic, Label, Span};

/// Terminal evaluation failures. None are recoverable inside the language;
/// each aborts the whole evaluation and is surfaced by the entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    UnboundVariable { name: String, span: Span },
    NotCallable { found: &'static str, span: Span },
    UnsupportedOperator { op: BinaryOp, span: Span },
    TypeMismatch { message: String, span: Span },
    WrongArity { expected: usize, given: usize, span: Span },
}

impl EvalError {
    pub fn unbound_variable(name: impl Into<String>, span: Span) -> Self {
        Self::UnboundVariable {
            name: name.into(),
            span,
        }
    }

    pub fn not_callable(found: &'static str, span: Span) -> Self {
        Self::NotCallable { found, span }
    }

    pub fn unsupported_operator(op: BinaryOp, span: Span) -> Self {
        Self::UnsupportedOperator { op, span }
    }

    pub fn type_mismatch(message: impl Into<String>, span: Span) -> Self {
        Self::TypeMismatch {
            message: message.into(),
            span,
        }
    }

    pub fn wrong_arity(expected: usize, given: usize, span: Span) -> Self {
        Self::WrongArity {
            expected,
            given,
            span,
        }
    }

    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            Self::UnboundVariable { span, .. } => *span,
            Self::NotCallable { span, .. } => *span,
            Self::UnsupportedOperator { span, .. } => *span,
            Self::TypeMismatch { span, .. } => *span,
            Self::WrongArity { span, .. } => *span,
        }
    }

    /// Convert to a diagnostic for rendering
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::UnboundVariable { name, span } => {
                Diagnostic::error(format!("unbound variable `{}`", name))
                    .with_code("E0201")
                    .with_label(Label::primary(*span, "not bound at this point"))
            }
            Self::NotCallable { found, span } => {
                Diagnostic::error(format!("cannot call a value of kind {}", found))
                    .with_code("E0202")
                    .with_label(Label::primary(*span, "called here"))
                    .with_help("only functions can be called")
            }
            Self::UnsupportedOperator { op, span } => {
                Diagnostic::error(format!("unsupported operator `{}`", op.symbol()))
                    .with_code("E0203")
                    .with_label(Label::primary(*span, "not evaluable"))
                    .with_help("supported operators are `==`, `||`, `-`, `+` and `<`")
            }
            Self::TypeMismatch { message, span } => {
                Diagnostic::error(format!("type mismatch: {}", message))
                    .with_code("E0204")
                    .with_label(Label::primary(*span, ""))
            }
            Self::WrongArity {
                expected,
                given,
                span,
            } => Diagnostic::error("wrong number of arguments")
                .with_code("E0205")
                .with_label(Label::primary(
                    *span,
                    format!("expected {} argument(s), got {}", expected, given),
                )),
        }
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::UnboundVariable { name, .. } => {
                write!(f, "Unbound variable: {}", name)
            }
            EvalError::NotCallable { found, .. } => write!(f, "Not callable: {}", found),
            EvalError::UnsupportedOperator { op, .. } => {
                write!(f, "Unsupported operator: {}", op)
            }
            EvalError::TypeMismatch { message, .. } => write!(f, "Type mismatch: {}", message),
            EvalError::WrongArity {
                expected, given, ..
            } => write!(
                f,
                "Wrong arity: expected {} argument(s), got {}",
                expected, given
            ),
        }
    }
}

impl std::error::Error for EvalError {}
