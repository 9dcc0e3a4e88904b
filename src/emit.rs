//! Rendering a decoded tree back into surface syntax.
//!
//! The inverse direction of [`crate::json`]: useful for inspecting what a
//! serialized program actually says without reading raw JSON.

use crate::ast::{Expr, ExprKind};

const INDENT: &str = "  ";

pub fn emit_source(expr: &Expr) -> String {
    let mut out = String::new();
    emit(expr, 0, &mut out);
    out.push('\n');
    out
}

fn emit(expr: &Expr, depth: usize, out: &mut String) {
    match &expr.kind {
        ExprKind::Let { name, value, next } => {
            out.push_str("let ");
            out.push_str(name);
            out.push_str(" = ");
            emit(value, depth, out);
            out.push_str(";\n");
            indent(depth, out);
            emit(next, depth, out);
        }
        ExprKind::Function { params, body } => {
            let params = params.iter().map(|p| p.as_ref()).collect::<Vec<&str>>();
            out.push_str(&format!("fn ({}) => {{\n", params.join(", ")));
            indent(depth + 1, out);
            emit(body, depth + 1, out);
            out.push('\n');
            indent(depth, out);
            out.push('}');
        }
        ExprKind::Print { value } => {
            out.push_str("print(");
            emit(value, depth, out);
            out.push(')');
        }
        ExprKind::Call { callee, args } => {
            emit(callee, depth, out);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                emit(arg, depth, out);
            }
            out.push(')');
        }
        ExprKind::Var { name } => out.push_str(name),
        ExprKind::Int(n) => out.push_str(&n.to_string()),
        ExprKind::Binary { lhs, op, rhs } => {
            emit_operand(lhs, depth, out);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            emit_operand(rhs, depth, out);
        }
        ExprKind::If {
            condition,
            then,
            otherwise,
        } => {
            out.push_str("if (");
            emit(condition, depth, out);
            out.push_str(") {\n");
            indent(depth + 1, out);
            emit(then, depth + 1, out);
            out.push('\n');
            indent(depth, out);
            out.push_str("} else {\n");
            indent(depth + 1, out);
            emit(otherwise, depth + 1, out);
            out.push('\n');
            indent(depth, out);
            out.push('}');
        }
    }
}

// Nested operator chains keep their grouping explicit.
fn emit_operand(expr: &Expr, depth: usize, out: &mut String) {
    if matches!(expr.kind, ExprKind::Binary { .. }) {
        out.push('(');
        emit(expr, depth, out);
        out.push(')');
    } else {
        emit(expr, depth, out);
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ast::BinaryOp;

    fn int(n: i64) -> Expr {
        Expr::bare(ExprKind::Int(n))
    }

    fn var(name: &str) -> Expr {
        Expr::bare(ExprKind::Var { name: name.into() })
    }

    #[test]
    fn test_emit_let_chain() {
        let expr = Expr::bare(ExprKind::Let {
            name: "x".into(),
            value: Rc::new(int(5)),
            next: Box::new(var("x")),
        });
        assert_eq!(emit_source(&expr), "let x = 5;\nx\n");
    }

    #[test]
    fn test_emit_function_and_call() {
        let body = Expr::bare(ExprKind::Binary {
            lhs: Box::new(var("a")),
            op: BinaryOp::Add,
            rhs: Box::new(var("b")),
        });
        let expr = Expr::bare(ExprKind::Let {
            name: "add".into(),
            value: Rc::new(Expr::bare(ExprKind::Function {
                params: vec!["a".into(), "b".into()],
                body: Rc::new(body),
            })),
            next: Box::new(Expr::bare(ExprKind::Call {
                callee: Box::new(var("add")),
                args: vec![int(1), int(2)],
            })),
        });
        let source = emit_source(&expr);
        assert!(source.starts_with("let add = fn (a, b) => {\n"));
        assert!(source.contains("  a + b\n"));
        assert!(source.contains("add(1, 2)"));
    }

    #[test]
    fn test_emit_groups_nested_operators() {
        let inner = Expr::bare(ExprKind::Binary {
            lhs: Box::new(int(1)),
            op: BinaryOp::Add,
            rhs: Box::new(int(2)),
        });
        let expr = Expr::bare(ExprKind::Binary {
            lhs: Box::new(inner),
            op: BinaryOp::Lt,
            rhs: Box::new(int(4)),
        });
        assert_eq!(emit_source(&expr), "(1 + 2) < 4\n");
    }

    #[test]
    fn test_emit_if_print() {
        let expr = Expr::bare(ExprKind::If {
            condition: Box::new(var("c")),
            then: Box::new(Expr::bare(ExprKind::Print {
                value: Box::new(int(1)),
            })),
            otherwise: Box::new(int(0)),
        });
        assert_eq!(
            emit_source(&expr),
            "if (c) {\n  print(1)\n} else {\n  0\n}\n"
        );
    }
}
