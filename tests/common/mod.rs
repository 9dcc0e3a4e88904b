//! Shared builders for serialized test programs.
#![allow(dead_code)]

use twig::interpreter::{Interpreter, RunError};
use twig::json;
use twig::Value;

/// Wraps an expression node into a full program document.
pub fn program(expression: &str) -> String {
    format!(r#"{{"name":"test.src","expression":{}}}"#, expression)
}

pub fn int(n: i64) -> String {
    format!(r#"{{"kind":"Int","value":{}}}"#, n)
}

pub fn var(name: &str) -> String {
    format!(r#"{{"kind":"Var","text":"{}"}}"#, name)
}

pub fn binary(lhs: &str, op: &str, rhs: &str) -> String {
    format!(
        r#"{{"kind":"Binary","lhs":{},"op":"{}","rhs":{}}}"#,
        lhs, op, rhs
    )
}

pub fn let_(name: &str, value: &str, next: &str) -> String {
    format!(
        r#"{{"kind":"Let","name":{{"text":"{}"}},"value":{},"next":{}}}"#,
        name, value, next
    )
}

pub fn function(params: &[&str], body: &str) -> String {
    let params = params
        .iter()
        .map(|p| format!(r#"{{"text":"{}"}}"#, p))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"{{"kind":"Function","parameters":[{}],"value":{}}}"#,
        params, body
    )
}

pub fn call(callee: &str, args: &[&str]) -> String {
    format!(
        r#"{{"kind":"Call","callee":{},"arguments":[{}]}}"#,
        callee,
        args.join(",")
    )
}

pub fn print(value: &str) -> String {
    format!(r#"{{"kind":"Print","value":{}}}"#, value)
}

pub fn if_(condition: &str, then: &str, otherwise: &str) -> String {
    format!(
        r#"{{"kind":"If","condition":{},"then":{},"otherwise":{}}}"#,
        condition, then, otherwise
    )
}

/// Runs a program with print output captured; returns the result and what
/// was printed.
pub fn run_capture(text: &str) -> (Result<Value, RunError>, String) {
    let program = match json::parse_program(text) {
        Ok(program) => program,
        Err(error) => return (Err(RunError::from(error)), String::new()),
    };
    let mut interpreter = Interpreter::with_output(Vec::new());
    let result = interpreter.run(&program.expression).map_err(RunError::from);
    let output = String::from_utf8(interpreter.into_output()).expect("print output is utf-8");
    (result, output)
}
