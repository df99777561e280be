//! The `Value` enum and its factory methods.

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use vex_ir::Expression;

use crate::Shared;

/// A runtime value.
///
/// Numbers, floats, and strings are plain value types. Lists, dictionaries,
/// and blobs are `Shared` handles with reference semantics. Funcrefs are
/// immutable once built, so a plain `Rc` suffices.
///
/// Construct container values through the factory methods (`Value::list`,
/// `Value::dictionary`, `Value::blob`); `Shared::new` is crate-private.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(i64),
    Float(f64),
    String(String),
    List(Shared<Vec<Value>>),
    Dictionary(Shared<IndexMap<String, Value>>),
    Funcref(Rc<FuncrefData>),
    Blob(Shared<Vec<u8>>),
}

/// What a funcref ultimately calls.
#[derive(Clone, Debug, PartialEq)]
pub enum FuncrefKind {
    /// A built-in function, resolved by name at call time.
    Builtin,
    /// A `{args -> expr}` lambda.
    Lambda(Rc<LambdaBody>),
}

/// A funcref: a callable plus optional bound arguments and dict.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncrefData {
    /// Display name: the function name, or `<lambda>N` for lambdas.
    pub name: String,
    pub kind: FuncrefKind,
    /// Arguments bound by `function(f, [args])`, prepended at call time.
    pub arglist: Vec<Value>,
    /// Dictionary bound by `function(f, dict)`, exposed as `self`.
    pub dict: Option<Shared<IndexMap<String, Value>>>,
}

/// A lambda body together with the scopes visible where it was written.
///
/// The captured scopes are an eager snapshot taken at evaluation of the
/// lambda expression, innermost last. Invocation pushes them back onto the
/// scope stack under the argument scope, so free variables resolve to the
/// values they had at capture time.
#[derive(Clone, Debug, PartialEq)]
pub struct LambdaBody {
    pub params: Vec<String>,
    pub body: Expression,
    pub captured: Vec<FxHashMap<String, Value>>,
}

impl Value {
    /// Vim's boolean convention: 1 for true, 0 for false.
    #[inline]
    pub fn bool(b: bool) -> Value {
        Value::Number(i64::from(b))
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Shared::new(items))
    }

    #[inline]
    pub fn dictionary(entries: IndexMap<String, Value>) -> Value {
        Value::Dictionary(Shared::new(entries))
    }

    #[inline]
    pub fn blob(bytes: Vec<u8>) -> Value {
        Value::Blob(Shared::new(bytes))
    }

    #[inline]
    pub fn funcref(data: FuncrefData) -> Value {
        Value::Funcref(Rc::new(data))
    }

    /// The tag `type()` reports.
    pub fn type_tag(&self) -> i64 {
        match self {
            Value::Number(_) => 0,
            Value::String(_) => 1,
            Value::Funcref(_) => 2,
            Value::List(_) => 3,
            Value::Dictionary(_) => 4,
            Value::Float(_) => 5,
            Value::Blob(_) => 10,
        }
    }

    /// Human-readable type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Dictionary(_) => "Dictionary",
            Value::Funcref(_) => "Funcref",
            Value::Blob(_) => "Blob",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn containers_alias_through_clone() {
        let a = Value::list(vec![Value::Number(1)]);
        let b = a.clone();
        if let Value::List(items) = &b {
            items.borrow_mut().push(Value::Number(2));
        }
        let Value::List(items) = &a else {
            panic!("expected list");
        };
        assert_eq!(items.borrow().len(), 2);
    }

    #[test]
    fn type_tags() {
        assert_eq!(Value::Number(0).type_tag(), 0);
        assert_eq!(Value::string("").type_tag(), 1);
        assert_eq!(Value::list(vec![]).type_tag(), 3);
        assert_eq!(Value::dictionary(IndexMap::new()).type_tag(), 4);
        assert_eq!(Value::Float(0.0).type_tag(), 5);
        assert_eq!(Value::blob(vec![]).type_tag(), 10);
    }

    #[test]
    fn bool_maps_to_number() {
        assert_eq!(Value::bool(true), Value::Number(1));
        assert_eq!(Value::bool(false), Value::Number(0));
    }
}
