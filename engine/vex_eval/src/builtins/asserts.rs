//! `assert_*()` builtins.
//!
//! Assertions never raise: a failure appends a message to `v:errors` and the
//! function returns 1, while a pass returns 0.

use std::mem;

use vex_error::VimResult;
use vex_host::EditorContext;
use vex_ir::ComparisonOp;
use vex_value::Value;

use crate::{ops, EvaluationContext};

fn passed() -> VimResult<Value> {
    Ok(Value::Number(0))
}

fn failed(ectx: &mut EvaluationContext, message: String) -> VimResult<Value> {
    ectx.record_assertion_failure(message);
    Ok(Value::Number(1))
}

fn custom_message(args: &[Value], idx: usize) -> VimResult<Option<String>> {
    match args.get(idx) {
        Some(message) => Ok(Some(message.to_vim_string()?)),
        None => Ok(None),
    }
}

pub(super) fn assert_beeps(
    ectx: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    _: Vec<Value>,
) -> VimResult<Value> {
    failed(ectx, String::from("command did not beep"))
}

pub(super) fn assert_nobeep(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    _: Vec<Value>,
) -> VimResult<Value> {
    passed()
}

pub(super) fn assert_equal(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let (expected, actual) = (&args[0], &args[1]);
    let config = editor.config();
    let equal = mem::discriminant(expected) == mem::discriminant(actual)
        && ops::compare(ComparisonOp::Equal, true, expected, actual, &config)?;
    if equal {
        return passed();
    }
    let message = custom_message(&args, 2)?.unwrap_or_else(|| {
        format!(
            "Expected {} but got {}",
            expected.display_string(),
            actual.display_string()
        )
    });
    failed(ectx, message)
}

pub(super) fn assert_notequal(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let config = editor.config();
    if ops::compare(ComparisonOp::NotEqual, true, &args[0], &args[1], &config)? {
        return passed();
    }
    let message = custom_message(&args, 2)?
        .unwrap_or_else(|| format!("Expected not equal to {}", args[0].display_string()));
    failed(ectx, message)
}

pub(super) fn assert_true(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let config = editor.config();
    if ops::compare(
        ComparisonOp::NotEqual,
        true,
        &Value::bool(false),
        &args[0],
        &config,
    )? {
        return passed();
    }
    let message = custom_message(&args, 1)?
        .unwrap_or_else(|| format!("Expected True but got {}", args[0].display_string()));
    failed(ectx, message)
}

pub(super) fn assert_false(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let config = editor.config();
    if ops::compare(
        ComparisonOp::Equal,
        true,
        &Value::bool(false),
        &args[0],
        &config,
    )? {
        return passed();
    }
    let message = custom_message(&args, 1)?
        .unwrap_or_else(|| format!("Expected False but got {}", args[0].display_string()));
    failed(ectx, message)
}

pub(super) fn assert_inrange(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let (lower, upper, actual) = (&args[0], &args[1], &args[2]);
    let config = editor.config();
    let in_range = ops::compare(ComparisonOp::GreaterOrEqual, true, actual, lower, &config)?
        && ops::compare(ComparisonOp::LessOrEqual, true, actual, upper, &config)?;
    if in_range {
        return passed();
    }
    let message = custom_message(&args, 3)?.unwrap_or_else(|| {
        format!(
            "Expected range {} - {} but got {}",
            lower.display_string(),
            upper.display_string(),
            actual.display_string()
        )
    });
    failed(ectx, message)
}

pub(super) fn assert_match(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let (pattern, actual) = (&args[0], &args[1]);
    let config = editor.config();
    if ops::compare(ComparisonOp::Matches, true, actual, pattern, &config)? {
        return passed();
    }
    let message = custom_message(&args, 2)?.unwrap_or(format!(
        "Pattern '{}' does not match '{}'",
        pattern.to_vim_string()?,
        actual.to_vim_string()?
    ));
    failed(ectx, message)
}

pub(super) fn assert_notmatch(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let (pattern, actual) = (&args[0], &args[1]);
    let config = editor.config();
    if ops::compare(ComparisonOp::NotMatches, true, actual, pattern, &config)? {
        return passed();
    }
    let message = custom_message(&args, 2)?.unwrap_or(format!(
        "Pattern '{}' does match '{}'",
        pattern.to_vim_string()?,
        actual.to_vim_string()?
    ));
    failed(ectx, message)
}

pub(super) fn assert_report(
    ectx: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let message = args[0].to_vim_string()?;
    failed(ectx, message)
}
