//! Decoding of serialized programs.
//!
//! A program is a JSON document shaped `{"name": …, "expression": <node>}`.
//! Every node object carries a `"kind"` tag, kind-specific fields, and an
//! optional `"location"` (`{"start", "end", "filename"}`, byte offsets into
//! the surface source the tree was parsed from). Name-ish fields accept
//! both the `{"text": …}` object form and a bare string.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use serde_json::Value as Json;

use crate::ast::{BinaryOp, Expr, ExprKind};
use crate::diagnostic::{Diagnostic, Label, Span};

/// A decoded program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Name of the surface source the tree was parsed from, when recorded.
    pub name: Option<String>,
    pub expression: Expr,
}

/// Failures turning JSON text into a program tree. The evaluator assumes a
/// well-formed tree; everything malformed stops here.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    Syntax(String),
    MissingField {
        field: &'static str,
        kind: String,
        span: Span,
    },
    WrongType {
        field: &'static str,
        expected: &'static str,
        span: Span,
    },
    UnknownNode {
        kind: String,
        span: Span,
    },
    UnknownOperator {
        op: String,
        span: Span,
    },
}

impl DecodeError {
    pub fn missing_field(field: &'static str, kind: impl Into<String>, span: Span) -> Self {
        Self::MissingField {
            field,
            kind: kind.into(),
            span,
        }
    }

    pub fn wrong_type(field: &'static str, expected: &'static str, span: Span) -> Self {
        Self::WrongType {
            field,
            expected,
            span,
        }
    }

    pub fn unknown_node(kind: impl Into<String>, span: Span) -> Self {
        Self::UnknownNode {
            kind: kind.into(),
            span,
        }
    }

    pub fn unknown_operator(op: impl Into<String>, span: Span) -> Self {
        Self::UnknownOperator {
            op: op.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Syntax(_) => Span::dummy(),
            Self::MissingField { span, .. } => *span,
            Self::WrongType { span, .. } => *span,
            Self::UnknownNode { span, .. } => *span,
            Self::UnknownOperator { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Syntax(message) => {
                Diagnostic::error(format!("invalid program JSON: {}", message)).with_code("E0101")
            }
            Self::MissingField { field, kind, span } => {
                Diagnostic::error(format!("`{}` node is missing field `{}`", kind, field))
                    .with_code("E0102")
                    .with_label(Label::primary(*span, "in this node"))
            }
            Self::WrongType {
                field,
                expected,
                span,
            } => Diagnostic::error(format!("field `{}` should be {}", field, expected))
                .with_code("E0103")
                .with_label(Label::primary(*span, "in this node")),
            Self::UnknownNode { kind, span } => {
                Diagnostic::error(format!("unknown node kind `{}`", kind))
                    .with_code("E0104")
                    .with_label(Label::primary(*span, "not a recognized node"))
            }
            Self::UnknownOperator { op, span } => {
                Diagnostic::error(format!("unknown operator tag `{}`", op))
                    .with_code("E0105")
                    .with_label(Label::primary(*span, "in this node"))
            }
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Syntax(message) => write!(f, "Invalid program JSON: {}", message),
            DecodeError::MissingField { field, kind, .. } => {
                write!(f, "Missing field `{}` on `{}` node", field, kind)
            }
            DecodeError::WrongType {
                field, expected, ..
            } => write!(f, "Field `{}` should be {}", field, expected),
            DecodeError::UnknownNode { kind, .. } => write!(f, "Unknown node kind `{}`", kind),
            DecodeError::UnknownOperator { op, .. } => {
                write!(f, "Unknown operator tag `{}`", op)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

pub fn parse_program(text: &str) -> Result<Program, DecodeError> {
    let document: Json =
        serde_json::from_str(text).map_err(|e| DecodeError::Syntax(e.to_string()))?;
    let name = document
        .get("name")
        .and_then(Json::as_str)
        .map(str::to_string);
    let expression = document
        .get("expression")
        .ok_or_else(|| DecodeError::missing_field("expression", "program", Span::dummy()))?;
    Ok(Program {
        name,
        expression: decode_expr(expression)?,
    })
}

pub fn parse_program_file(path: &Path) -> Result<Program, DecodeError> {
    let text = std::fs::read_to_string(path).map_err(|e| DecodeError::Syntax(e.to_string()))?;
    parse_program(&text)
}

pub fn decode_expr(node: &Json) -> Result<Expr, DecodeError> {
    let object = match node.as_object() {
        Some(object) => object,
        None => return Err(DecodeError::wrong_type("node", "an object", Span::dummy())),
    };
    let span = decode_span(object.get("location"));
    let kind = object
        .get("kind")
        .and_then(Json::as_str)
        .ok_or_else(|| DecodeError::missing_field("kind", "node", span))?;

    let field = |name: &'static str| {
        object
            .get(name)
            .ok_or_else(|| DecodeError::missing_field(name, kind, span))
    };

    match kind {
        "Let" => Ok(Expr::new(
            ExprKind::Let {
                name: decode_name(field("name")?, span)?,
                value: Rc::new(decode_expr(field("value")?)?),
                next: Box::new(decode_expr(field("next")?)?),
            },
            span,
        )),
        "Function" => {
            let params = field("parameters")?
                .as_array()
                .ok_or_else(|| DecodeError::wrong_type("parameters", "an array", span))?
                .iter()
                .map(|param| decode_name(param, span))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::new(
                ExprKind::Function {
                    params,
                    body: Rc::new(decode_expr(field("value")?)?),
                },
                span,
            ))
        }
        "Print" => Ok(Expr::new(
            ExprKind::Print {
                value: Box::new(decode_expr(field("value")?)?),
            },
            span,
        )),
        "Call" => {
            let args = field("arguments")?
                .as_array()
                .ok_or_else(|| DecodeError::wrong_type("arguments", "an array", span))?
                .iter()
                .map(decode_expr)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::new(
                ExprKind::Call {
                    callee: Box::new(decode_expr(field("callee")?)?),
                    args,
                },
                span,
            ))
        }
        "Var" => Ok(Expr::new(
            ExprKind::Var {
                name: field("text")?
                    .as_str()
                    .map(Rc::from)
                    .ok_or_else(|| DecodeError::wrong_type("text", "a string", span))?,
            },
            span,
        )),
        "Int" => Ok(Expr::new(
            ExprKind::Int(
                field("value")?
                    .as_i64()
                    .ok_or_else(|| DecodeError::wrong_type("value", "an integer", span))?,
            ),
            span,
        )),
        "Binary" => {
            let op = field("op")?
                .as_str()
                .ok_or_else(|| DecodeError::wrong_type("op", "a string", span))?;
            Ok(Expr::new(
                ExprKind::Binary {
                    lhs: Box::new(decode_expr(field("lhs")?)?),
                    op: decode_op(op, span)?,
                    rhs: Box::new(decode_expr(field("rhs")?)?),
                },
                span,
            ))
        }
        "If" => Ok(Expr::new(
            ExprKind::If {
                condition: Box::new(decode_expr(field("condition")?)?),
                then: Box::new(decode_expr(field("then")?)?),
                otherwise: Box::new(decode_expr(field("otherwise")?)?),
            },
            span,
        )),
        other => Err(DecodeError::unknown_node(other, span)),
    }
}

fn decode_name(node: &Json, span: Span) -> Result<Rc<str>, DecodeError> {
    if let Some(text) = node.as_str() {
        return Ok(Rc::from(text));
    }
    node.get("text")
        .and_then(Json::as_str)
        .map(Rc::from)
        .ok_or_else(|| DecodeError::missing_field("text", "name", span))
}

fn decode_span(location: Option<&Json>) -> Span {
    match location {
        Some(location) => {
            let start = location
                .get("start")
                .and_then(Json::as_u64)
                .unwrap_or(0) as usize;
            let end = location
                .get("end")
                .and_then(Json::as_u64)
                .map(|n| n as usize)
                .unwrap_or(start);
            Span::new(start, end)
        }
        None => Span::dummy(),
    }
}

fn decode_op(op: &str, span: Span) -> Result<BinaryOp, DecodeError> {
    match op {
        "Add" => Ok(BinaryOp::Add),
        "Sub" => Ok(BinaryOp::Sub),
        "Mul" => Ok(BinaryOp::Mul),
        "Div" => Ok(BinaryOp::Div),
        "Rem" => Ok(BinaryOp::Rem),
        "Eq" => Ok(BinaryOp::Eq),
        "Neq" => Ok(BinaryOp::Neq),
        "Lt" => Ok(BinaryOp::Lt),
        "Gt" => Ok(BinaryOp::Gt),
        "Lte" => Ok(BinaryOp::Lte),
        "Gte" => Ok(BinaryOp::Gte),
        "And" => Ok(BinaryOp::And),
        "Or" => Ok(BinaryOp::Or),
        other => Err(DecodeError::unknown_operator(other, span)),
    }
}
