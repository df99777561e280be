//! Float math and bitwise builtins.

use vex_error::VimResult;
use vex_host::EditorContext;
use vex_value::Value;

use crate::EvaluationContext;

macro_rules! float_builtin {
    ($name:ident, $method:ident) => {
        pub(super) fn $name(
            _: &mut EvaluationContext,
            _: &mut dyn EditorContext,
            _: &str,
            args: Vec<Value>,
        ) -> VimResult<Value> {
            Ok(Value::Float(args[0].to_float()?.$method()))
        }
    };
}

float_builtin!(abs, abs);
float_builtin!(acos, acos);
float_builtin!(asin, asin);
float_builtin!(ceil, ceil);
float_builtin!(cos, cos);
float_builtin!(cosh, cosh);
float_builtin!(exp, exp);
float_builtin!(floor, floor);
float_builtin!(log, ln);
float_builtin!(log10, log10);
// f64::round rounds halfway cases away from zero, which is Vim's rule
float_builtin!(round, round);
float_builtin!(sin, sin);
float_builtin!(sinh, sinh);
float_builtin!(sqrt, sqrt);
float_builtin!(tan, tan);
float_builtin!(tanh, tanh);
float_builtin!(trunc, trunc);

pub(super) fn atan2(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::Float(args[0].to_float()?.atan2(args[1].to_float()?)))
}

pub(super) fn pow(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::Float(args[0].to_float()?.powf(args[1].to_float()?)))
}

pub(super) fn fmod(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::Float(args[0].to_float()? % args[1].to_float()?))
}

pub(super) fn isinf(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let x = args[0].to_float()?;
    Ok(Value::Number(if x == f64::INFINITY {
        1
    } else if x == f64::NEG_INFINITY {
        -1
    } else {
        0
    }))
}

pub(super) fn isnan(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::bool(args[0].to_float()?.is_nan()))
}

pub(super) fn bit_and(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::Number(args[0].to_int()? & args[1].to_int()?))
}

pub(super) fn bit_or(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::Number(args[0].to_int()? | args[1].to_int()?))
}

pub(super) fn bit_xor(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::Number(args[0].to_int()? ^ args[1].to_int()?))
}

pub(super) fn bit_invert(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::Number(!args[0].to_int()?))
}
