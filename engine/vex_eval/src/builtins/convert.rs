//! Type and representation conversions, including JSON.

use indexmap::IndexMap;
use vex_error::{VimError, VimResult};
use vex_host::EditorContext;
use vex_ir::numeric;
use vex_value::Value;

use crate::EvaluationContext;

pub(super) fn float2nr(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let f = args[0].to_float()?;
    let n = if f.is_nan() {
        0
    } else if f >= i64::MAX as f64 {
        i64::MAX
    } else if f <= i64::MIN as f64 {
        i64::MIN
    } else {
        f.trunc() as i64
    };
    Ok(Value::Number(n))
}

pub(super) fn str2float(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let s = args[0].to_vim_string()?;
    Ok(Value::Float(numeric::parse_float_exact(&s).unwrap_or(0.0)))
}

pub(super) fn str2list(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let s = args[0].to_vim_string()?;
    let codepoints = s
        .chars()
        .map(|c| Value::Number(i64::from(c as u32)))
        .collect();
    Ok(Value::list(codepoints))
}

pub(super) fn str2nr(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let s = args[0].to_vim_string()?;
    let base = match args.get(1) {
        Some(base) => base.to_int()?,
        None => 10,
    };
    if !matches!(base, 2 | 8 | 10 | 16) {
        return Err(VimError::InvalidArgument474);
    }

    let trimmed = s.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits = match base {
        16 => strip_radix_prefix(rest, &["0x", "0X"]),
        8 => strip_radix_prefix(rest, &["0o", "0O"]),
        2 => strip_radix_prefix(rest, &["0b", "0B"]),
        _ => rest,
    };

    let mut value = 0i64;
    let mut seen = false;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(base as u32) else {
            break;
        };
        seen = true;
        value = value
            .wrapping_mul(base)
            .wrapping_add(i64::from(digit));
    }
    Ok(Value::Number(if seen { sign * value } else { 0 }))
}

fn strip_radix_prefix<'a>(s: &'a str, prefixes: &[&str]) -> &'a str {
    for prefix in prefixes {
        if let Some(rest) = s.strip_prefix(prefix) {
            return rest;
        }
    }
    s
}

pub(super) fn string(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::string(args[0].display_string()))
}

pub(super) fn json_encode(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    fn to_json(value: &Value) -> VimResult<serde_json::Value> {
        Ok(match value {
            Value::Number(n) => serde_json::Value::from(*n),
            Value::Float(f) => {
                // JSON has no representation for NaN or infinity.
                serde_json::Number::from_f64(*f)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(
                items.borrow().iter().map(to_json).collect::<VimResult<_>>()?,
            ),
            Value::Dictionary(entries) => {
                let mut object = serde_json::Map::new();
                for (key, value) in entries.borrow().iter() {
                    object.insert(key.clone(), to_json(value)?);
                }
                serde_json::Value::Object(object)
            }
            Value::Blob(bytes) => serde_json::Value::Array(
                bytes
                    .borrow()
                    .iter()
                    .map(|byte| serde_json::Value::from(i64::from(*byte)))
                    .collect(),
            ),
            Value::Funcref(_) => return Err(VimError::InvalidArgument474),
        })
    }

    let json = to_json(&args[0])?;
    let encoded = serde_json::to_string(&json)
        .map_err(|err| VimError::InvalidArgument475(err.to_string()))?;
    Ok(Value::string(encoded))
}

pub(super) fn json_decode(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Number(0),
            serde_json::Value::Bool(b) => Value::bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Number(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::list(items.into_iter().map(from_json).collect())
            }
            serde_json::Value::Object(object) => {
                let entries: IndexMap<String, Value> = object
                    .into_iter()
                    .map(|(key, value)| (key, from_json(value)))
                    .collect();
                Value::dictionary(entries)
            }
        }
    }

    let text = args[0].to_vim_string()?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .map_err(|err| VimError::InvalidArgument475(err.to_string()))?;
    Ok(from_json(json))
}
