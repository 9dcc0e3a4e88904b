use std::fmt;
use std::rc::Rc;

use crate::diagnostic::Span;

/// Binary operator tags as they appear in serialized programs.
///
/// The decoder accepts the full alphabet so that a well-formed tree always
/// decodes; the evaluator supports only `Eq`, `Or`, `Sub`, `Add` and `Lt`
/// and rejects the rest at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
}

impl BinaryOp {
    /// The tag used in the serialized form.
    pub fn tag(&self) -> &'static str {
        match self {
            BinaryOp::Add => "Add",
            BinaryOp::Sub => "Sub",
            BinaryOp::Mul => "Mul",
            BinaryOp::Div => "Div",
            BinaryOp::Rem => "Rem",
            BinaryOp::Eq => "Eq",
            BinaryOp::Neq => "Neq",
            BinaryOp::Lt => "Lt",
            BinaryOp::Gt => "Gt",
            BinaryOp::Lte => "Lte",
            BinaryOp::Gte => "Gte",
            BinaryOp::And => "And",
            BinaryOp::Or => "Or",
        }
    }

    /// The infix symbol used when emitting surface syntax.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Lte => "<=",
            BinaryOp::Gte => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One node of the immutable program tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// A node without a source location, for programmatic construction.
    pub fn bare(kind: ExprKind) -> Self {
        Self::new(kind, Span::dummy())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `let name = value; next`. The value expression is bound unevaluated;
    /// it is shared into the environment, hence the `Rc`.
    Let {
        name: Rc<str>,
        value: Rc<Expr>,
        next: Box<Expr>,
    },
    /// A function literal. The body is shared with every closure the
    /// literal produces.
    Function { params: Vec<Rc<str>>, body: Rc<Expr> },
    Print { value: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Var { name: Rc<str> },
    Int(i64),
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}
