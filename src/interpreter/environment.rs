use std::rc::Rc;

use crate::ast::Expr;
use crate::value::Value;

/// What a name resolves to.
///
/// `let` binds the expression itself, and every `Var` reference re-evaluates
/// it in the environment current at the reference; function application
/// binds already-evaluated argument values. The deferred form carries the
/// language's recursion story: a `let`-bound function can name itself
/// because the binding is in place before the body ever runs.
#[derive(Debug, Clone)]
pub enum Binding {
    Expr(Rc<Expr>),
    Value(Value),
}

/// Persistent mapping from variable name to [`Binding`].
///
/// A chain of reference-counted single-binding frames. `extend` prepends a
/// frame and leaves the receiver untouched, so closures holding an older
/// view never observe later bindings. Lookup walks innermost-first, which
/// makes shadowing fall out of the representation. There is no removal.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    head: Option<Rc<Frame>>,
}

#[derive(Debug)]
struct Frame {
    name: Rc<str>,
    binding: Binding,
    next: Option<Rc<Frame>>,
}

impl Environment {
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Returns a new environment with `name` bound on top of `self`.
    pub fn extend(&self, name: Rc<str>, binding: Binding) -> Environment {
        Environment {
            head: Some(Rc::new(Frame {
                name,
                binding,
                next: self.head.clone(),
            })),
        }
    }

    /// Innermost binding for `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        let mut frame = self.head.as_deref();
        while let Some(current) = frame {
            if current.name.as_ref() == name {
                return Some(&current.binding);
            }
            frame = current.next.as_deref();
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}
