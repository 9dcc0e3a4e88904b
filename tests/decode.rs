//! Decoder coverage: node kinds, field shapes, locations, failures.

mod common;

use common::*;
use twig::diagnostic::Span;
use twig::json::{parse_program, parse_program_file, DecodeError};
use twig::{BinaryOp, ExprKind};

// =============================================================================
// WELL-FORMED PROGRAMS
// =============================================================================

#[test]
fn test_decode_program_name() {
    let decoded = parse_program(&program(&int(1))).unwrap();
    assert_eq!(decoded.name.as_deref(), Some("test.src"));
}

#[test]
fn test_decode_program_without_name() {
    let decoded = parse_program(r#"{"expression":{"kind":"Int","value":7}}"#).unwrap();
    assert_eq!(decoded.name, None);
    assert_eq!(decoded.expression.kind, ExprKind::Int(7));
}

#[test]
fn test_decode_let_with_object_name() {
    let decoded = parse_program(&program(&let_("x", &int(5), &var("x")))).unwrap();
    match decoded.expression.kind {
        ExprKind::Let { name, value, next } => {
            assert_eq!(name.as_ref(), "x");
            assert_eq!(value.kind, ExprKind::Int(5));
            assert_eq!(
                next.kind,
                ExprKind::Var {
                    name: "x".into()
                }
            );
        }
        other => panic!("expected Let, got {:?}", other),
    }
}

#[test]
fn test_decode_accepts_bare_string_names() {
    let source = r#"{"expression":{
        "kind": "Let",
        "name": "x",
        "value": {"kind": "Function", "parameters": ["a", "b"], "value": {"kind": "Var", "text": "a"}},
        "next": {"kind": "Var", "text": "x"}
    }}"#;
    let decoded = parse_program(source).unwrap();
    match decoded.expression.kind {
        ExprKind::Let { name, value, .. } => {
            assert_eq!(name.as_ref(), "x");
            match &value.kind {
                ExprKind::Function { params, .. } => {
                    let params: Vec<&str> = params.iter().map(|p| p.as_ref()).collect();
                    assert_eq!(params, ["a", "b"]);
                }
                other => panic!("expected Function, got {:?}", other),
            }
        }
        other => panic!("expected Let, got {:?}", other),
    }
}

#[test]
fn test_decode_call_arguments_in_order() {
    let decoded = parse_program(&program(&call(&var("f"), &[&int(1), &int(2)]))).unwrap();
    match decoded.expression.kind {
        ExprKind::Call { args, .. } => {
            assert_eq!(args.len(), 2);
            assert_eq!(args[0].kind, ExprKind::Int(1));
            assert_eq!(args[1].kind, ExprKind::Int(2));
        }
        other => panic!("expected Call, got {:?}", other),
    }
}

#[test]
fn test_decode_if_branches() {
    let decoded = parse_program(&program(&if_(&int(1), &int(2), &int(3)))).unwrap();
    match decoded.expression.kind {
        ExprKind::If {
            condition,
            then,
            otherwise,
        } => {
            assert_eq!(condition.kind, ExprKind::Int(1));
            assert_eq!(then.kind, ExprKind::Int(2));
            assert_eq!(otherwise.kind, ExprKind::Int(3));
        }
        other => panic!("expected If, got {:?}", other),
    }
}

#[test]
fn test_decode_every_operator_tag() {
    for (tag, op) in [
        ("Add", BinaryOp::Add),
        ("Sub", BinaryOp::Sub),
        ("Mul", BinaryOp::Mul),
        ("Div", BinaryOp::Div),
        ("Rem", BinaryOp::Rem),
        ("Eq", BinaryOp::Eq),
        ("Neq", BinaryOp::Neq),
        ("Lt", BinaryOp::Lt),
        ("Gt", BinaryOp::Gt),
        ("Lte", BinaryOp::Lte),
        ("Gte", BinaryOp::Gte),
        ("And", BinaryOp::And),
        ("Or", BinaryOp::Or),
    ] {
        let decoded = parse_program(&program(&binary(&int(1), tag, &int(2)))).unwrap();
        match decoded.expression.kind {
            ExprKind::Binary { op: decoded_op, .. } => assert_eq!(decoded_op, op),
            other => panic!("expected Binary, got {:?}", other),
        }
    }
}

#[test]
fn test_decode_location_into_span() {
    let source = r#"{"expression":{
        "kind": "Int",
        "value": 5,
        "location": { "start": 4, "end": 5, "filename": "demo.src" }
    }}"#;
    let decoded = parse_program(source).unwrap();
    assert_eq!(decoded.expression.span, Span::new(4, 5));
}

#[test]
fn test_decode_missing_location_is_dummy_span() {
    let decoded = parse_program(&program(&int(5))).unwrap();
    assert!(decoded.expression.span.is_dummy());
}

#[test]
fn test_decode_from_file() {
    let path = std::env::temp_dir().join(format!("twig_decode_{}.json", std::process::id()));
    std::fs::write(&path, program(&int(9))).unwrap();

    let decoded = parse_program_file(&path).unwrap();
    assert_eq!(decoded.expression.kind, ExprKind::Int(9));

    std::fs::remove_file(&path).ok();
}

// =============================================================================
// MALFORMED INPUT
// =============================================================================

#[test]
fn test_invalid_json_is_a_syntax_error() {
    assert!(matches!(
        parse_program("not json"),
        Err(DecodeError::Syntax(_))
    ));
}

#[test]
fn test_missing_expression_field() {
    let error = parse_program(r#"{"name":"p"}"#).unwrap_err();
    assert!(matches!(
        error,
        DecodeError::MissingField {
            field: "expression",
            ..
        }
    ));
}

#[test]
fn test_missing_kind_tag() {
    let error = parse_program(r#"{"expression":{"value":1}}"#).unwrap_err();
    assert!(matches!(error, DecodeError::MissingField { field: "kind", .. }));
}

#[test]
fn test_missing_node_field() {
    // A Let without its continuation.
    let source = r#"{"expression":{
        "kind": "Let",
        "name": {"text": "x"},
        "value": {"kind": "Int", "value": 1}
    }}"#;
    let error = parse_program(source).unwrap_err();
    match &error {
        DecodeError::MissingField { field, kind, .. } => {
            assert_eq!(*field, "next");
            assert_eq!(kind, "Let");
        }
        other => panic!("expected MissingField, got {:?}", other),
    }
    assert_eq!(error.to_string(), "Missing field `next` on `Let` node");
}

#[test]
fn test_unknown_node_kind() {
    let error = parse_program(r#"{"expression":{"kind":"Str","value":"hi"}}"#).unwrap_err();
    match &error {
        DecodeError::UnknownNode { kind, .. } => assert_eq!(kind, "Str"),
        other => panic!("expected UnknownNode, got {:?}", other),
    }
    assert_eq!(error.to_diagnostic().code.as_deref(), Some("E0104"));
}

#[test]
fn test_unknown_operator_tag() {
    let error = parse_program(&program(&binary(&int(1), "Xor", &int(2)))).unwrap_err();
    assert!(matches!(
        error,
        DecodeError::UnknownOperator { ref op, .. } if op == "Xor"
    ));
}

#[test]
fn test_non_integer_int_value() {
    let error = parse_program(r#"{"expression":{"kind":"Int","value":"five"}}"#).unwrap_err();
    assert!(matches!(
        error,
        DecodeError::WrongType { field: "value", .. }
    ));
}

#[test]
fn test_non_array_parameters() {
    let source = r#"{"expression":{
        "kind": "Function",
        "parameters": "a",
        "value": {"kind": "Int", "value": 1}
    }}"#;
    let error = parse_program(source).unwrap_err();
    assert!(matches!(
        error,
        DecodeError::WrongType {
            field: "parameters",
            ..
        }
    ));
}

#[test]
fn test_non_object_node() {
    let error = parse_program(r#"{"expression": 5}"#).unwrap_err();
    assert!(matches!(error, DecodeError::WrongType { field: "node", .. }));
}

#[test]
fn test_decode_error_carries_node_span() {
    let source = r#"{"expression":{
        "kind": "Quux",
        "location": { "start": 3, "end": 8, "filename": "demo.src" }
    }}"#;
    let error = parse_program(source).unwrap_err();
    assert_eq!(error.span(), Span::new(3, 8));
}
