//! Builtins that don't fit the other groups: funcref construction, dynamic
//! evaluation, registers, and introspection.

use std::time::{SystemTime, UNIX_EPOCH};

use vex_error::{VimError, VimResult};
use vex_host::EditorContext;
use vex_value::{FuncrefData, FuncrefKind, Value};

use crate::EvaluationContext;

pub(super) fn call(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let Value::List(arglist) = &args[1] else {
        return Err(VimError::ListRequired);
    };
    let call_args = arglist.borrow().clone();
    if let Some(dict) = args.get(2) {
        // The dict form is accepted but `self` is not yet wired through.
        dict.expect_dict()?;
    }
    match &args[0] {
        Value::Funcref(data) => ectx.call_funcref(data, call_args, editor),
        other => {
            let name = other.to_vim_string()?;
            ectx.call_function(&name, call_args, editor)
        }
    }
}

pub(super) fn empty(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let is_empty = match &args[0] {
        Value::Number(n) => *n == 0,
        Value::Float(f) => *f == 0.0,
        Value::String(s) => s.is_empty(),
        Value::List(items) => items.borrow().is_empty(),
        Value::Dictionary(entries) => entries.borrow().is_empty(),
        Value::Blob(bytes) => bytes.borrow().is_empty(),
        Value::Funcref(_) => false,
    };
    Ok(Value::bool(is_empty))
}

pub(super) fn eval(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let input = args[0].to_vim_string()?;
    ectx.evaluate_str_with(&input, editor)
}

pub(super) fn function(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let name = args[0].to_vim_string()?;
    let (arglist, dict) = match args.get(1) {
        Some(Value::List(items)) => {
            let dict = match args.get(2) {
                Some(dict) => match dict {
                    Value::Dictionary(entries) => Some(entries.clone()),
                    _ => return Err(VimError::ExpectedADict),
                },
                None => None,
            };
            (items.borrow().clone(), dict)
        }
        Some(Value::Dictionary(entries)) => {
            if args.get(2).is_some() {
                return Err(VimError::SecondArgumentOfFunction);
            }
            (Vec::new(), Some(entries.clone()))
        }
        Some(_) => return Err(VimError::SecondArgumentOfFunction),
        None => (Vec::new(), None),
    };
    Ok(Value::funcref(FuncrefData {
        name,
        kind: FuncrefKind::Builtin,
        arglist,
        dict,
    }))
}

pub(super) fn getreg(
    _: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let register = match args.first() {
        Some(name) => name.to_vim_string()?.chars().next().unwrap_or('"'),
        None => '"',
    };
    let contents = editor.get_register(register).unwrap_or_default();
    Ok(Value::string(contents))
}

pub(super) fn setreg(
    _: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let Some(register) = args[0].to_vim_string()?.chars().next() else {
        return Err(VimError::InvalidArgument474);
    };
    let contents = match &args[1] {
        Value::List(items) => {
            let lines = items
                .borrow()
                .iter()
                .map(Value::to_vim_string)
                .collect::<VimResult<Vec<_>>>()?;
            lines.join("\n")
        }
        other => other.to_vim_string()?,
    };
    editor.set_register(register, &contents);
    Ok(Value::Number(0))
}

pub(super) fn has(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let feature = args[0].to_vim_string()?;
    Ok(Value::bool(matches!(feature.as_str(), "eval" | "float")))
}

pub(super) fn len(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let len = match &args[0] {
        // The length of a number is the count of its decimal digits.
        Value::Number(n) => n.to_string().len(),
        Value::String(s) => s.chars().count(),
        Value::List(items) => items.borrow().len(),
        Value::Dictionary(entries) => entries.borrow().len(),
        Value::Blob(bytes) => bytes.borrow().len(),
        _ => return Err(VimError::InvalidTypeForLen),
    };
    Ok(Value::Number(len as i64))
}

pub(super) fn localtime(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    _: Vec<Value>,
) -> VimResult<Value> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() as i64);
    Ok(Value::Number(seconds))
}

pub(super) fn type_of(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::Number(args[0].type_tag()))
}
