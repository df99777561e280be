//! Operator semantics: unary, binary, comparison, indexing, and slicing.

use std::cmp::Ordering;
use std::mem;
use std::rc::Rc;

use vex_error::{VimError, VimResult};
use vex_host::{EditorConfig, SearchDirection};
use vex_ir::{BinaryOp, ComparisonOp, UnaryOp};
use vex_pattern::{Pattern, PatternParseOptions};
use vex_value::{FuncrefData, Value};

pub(crate) fn unary(op: UnaryOp, operand: &Value) -> VimResult<Value> {
    match operand {
        Value::Float(x) => Ok(Value::Float(match op {
            UnaryOp::Not => {
                if *x == 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            UnaryOp::Minus => -x,
            UnaryOp::Plus => *x,
        })),
        other => {
            let x = other.to_int()?;
            Ok(Value::Number(match op {
                UnaryOp::Not => i64::from(x == 0),
                UnaryOp::Minus => x.wrapping_neg(),
                UnaryOp::Plus => x,
            }))
        }
    }
}

pub(crate) fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> VimResult<Value> {
    match op {
        BinaryOp::Add => {
            if let (Value::List(a), Value::List(b)) = (&lhs, &rhs) {
                let mut items = a.borrow().clone();
                items.extend(b.borrow().iter().cloned());
                return Ok(Value::list(items));
            }
            arithmetic(lhs, rhs, |x, y| x + y, i64::wrapping_add)
        }
        BinaryOp::Subtract => arithmetic(lhs, rhs, |x, y| x - y, i64::wrapping_sub),
        BinaryOp::Multiply => arithmetic(lhs, rhs, |x, y| x * y, i64::wrapping_mul),
        BinaryOp::Divide => arithmetic(lhs, rhs, |x, y| x / y, divide),
        BinaryOp::Modulo => {
            if matches!(lhs, Value::Float(_)) || matches!(rhs, Value::Float(_)) {
                return Err(VimError::CannotUseModuloWithFloat);
            }
            let (x, y) = (lhs.to_int()?, rhs.to_int()?);
            // x % 0 is 0, not an error
            Ok(Value::Number(if y == 0 { 0 } else { x.wrapping_rem(y) }))
        }
        BinaryOp::Concat => Ok(Value::String(format!(
            "{}{}",
            lhs.to_vim_string()?,
            rhs.to_vim_string()?
        ))),
        BinaryOp::And => Ok(Value::bool(lhs.to_int()? != 0 && rhs.to_int()? != 0)),
        BinaryOp::Or => Ok(Value::bool(lhs.to_int()? != 0 || rhs.to_int()? != 0)),
    }
}

/// If either side is a Float the result is a Float; string operands go
/// through the Number coercion first, never the Float one.
fn arithmetic(
    lhs: Value,
    rhs: Value,
    float_op: fn(f64, f64) -> f64,
    int_op: fn(i64, i64) -> i64,
) -> VimResult<Value> {
    let float_result = matches!(lhs, Value::Float(_)) || matches!(rhs, Value::Float(_));
    let lhs = match lhs {
        Value::String(_) => Value::Number(lhs.to_int()?),
        other => other,
    };
    let rhs = match rhs {
        Value::String(_) => Value::Number(rhs.to_int()?),
        other => other,
    };
    if float_result {
        Ok(Value::Float(float_op(lhs.to_float()?, rhs.to_float()?)))
    } else {
        Ok(Value::Number(int_op(lhs.to_int()?, rhs.to_int()?)))
    }
}

/// Integer division by zero saturates instead of trapping.
fn divide(x: i64, y: i64) -> i64 {
    if y == 0 {
        match x.cmp(&0) {
            Ordering::Greater => i64::MAX,
            Ordering::Less => i64::MIN,
            Ordering::Equal => 0,
        }
    } else {
        x.wrapping_div(y)
    }
}

/// The four primitive comparisons the ten surface operators reduce to.
#[derive(Clone, Copy, Debug)]
enum BasicCmp {
    Equal,
    Greater,
    Matches,
    Is,
}

pub(crate) fn compare(
    op: ComparisonOp,
    match_case: bool,
    lhs: &Value,
    rhs: &Value,
    config: &EditorConfig,
) -> VimResult<bool> {
    match op {
        ComparisonOp::Equal => basic(BasicCmp::Equal, match_case, lhs, rhs, true, config),
        ComparisonOp::NotEqual => {
            Ok(!basic(BasicCmp::Equal, match_case, lhs, rhs, true, config)?)
        }
        ComparisonOp::Greater => basic(BasicCmp::Greater, match_case, lhs, rhs, true, config),
        ComparisonOp::GreaterOrEqual => {
            Ok(basic(BasicCmp::Greater, match_case, lhs, rhs, true, config)?
                || basic(BasicCmp::Equal, match_case, lhs, rhs, true, config)?)
        }
        ComparisonOp::Less => basic(BasicCmp::Greater, match_case, rhs, lhs, true, config),
        ComparisonOp::LessOrEqual => {
            Ok(!basic(BasicCmp::Greater, match_case, lhs, rhs, true, config)?)
        }
        ComparisonOp::Matches => basic(BasicCmp::Matches, match_case, lhs, rhs, true, config),
        ComparisonOp::NotMatches => {
            Ok(!basic(BasicCmp::Matches, match_case, lhs, rhs, true, config)?)
        }
        ComparisonOp::Is => basic(BasicCmp::Is, match_case, lhs, rhs, true, config),
        ComparisonOp::IsNot => Ok(!basic(BasicCmp::Is, match_case, lhs, rhs, true, config)?),
    }
}

fn basic(
    op: BasicCmp,
    match_case: bool,
    lhs: &Value,
    rhs: &Value,
    top_level: bool,
    config: &EditorConfig,
) -> VimResult<bool> {
    if matches!(op, BasicCmp::Is) && mem::discriminant(lhs) != mem::discriminant(rhs) {
        return Ok(false);
    }

    match (lhs, rhs) {
        (Value::List(a), Value::List(b)) => match op {
            BasicCmp::Equal => {
                let (a, b) = (a.borrow(), b.borrow());
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (left, right) in a.iter().zip(b.iter()) {
                    if !basic(BasicCmp::Equal, match_case, left, right, false, config)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            BasicCmp::Is => Ok(vex_value::Shared::ptr_eq(a, b)),
            _ => Err(VimError::InvalidOperationForList),
        },
        (Value::List(_), _) | (_, Value::List(_)) => Err(VimError::CanOnlyCompareListWithList),
        (Value::Dictionary(a), Value::Dictionary(b)) => match op {
            BasicCmp::Equal => {
                let (a, b) = (a.borrow(), b.borrow());
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (key, left) in a.iter() {
                    let Some(right) = b.get(key) else {
                        return Ok(false);
                    };
                    if !basic(BasicCmp::Equal, match_case, left, right, false, config)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            BasicCmp::Is => Ok(vex_value::Shared::ptr_eq(a, b)),
            _ => Err(VimError::InvalidOperationForDictionary),
        },
        (Value::Dictionary(_), _) | (_, Value::Dictionary(_)) => {
            Err(VimError::CanOnlyCompareDictionaryWithDictionary)
        }
        (Value::Funcref(a), Value::Funcref(b)) => match op {
            BasicCmp::Equal => Ok(a.name == b.name && same_bound_dict(a, b)),
            BasicCmp::Is => Ok(Rc::ptr_eq(a, b)),
            _ => Err(VimError::InvalidOperationForFuncrefs),
        },
        (Value::Funcref(_), _) | (_, Value::Funcref(_)) => Ok(false),
        (Value::Blob(a), Value::Blob(b)) => match op {
            BasicCmp::Equal => Ok(*a.borrow() == *b.borrow()),
            BasicCmp::Is => Ok(vex_value::Shared::ptr_eq(a, b)),
            _ => Err(VimError::InvalidOperationForBlob),
        },
        (Value::Blob(_), _) | (_, Value::Blob(_)) => Err(VimError::CanOnlyCompareBlobWithBlob),
        _ => scalar(op, match_case, lhs, rhs, top_level, config),
    }
}

fn same_bound_dict(a: &FuncrefData, b: &FuncrefData) -> bool {
    match (&a.dict, &b.dict) {
        (None, None) => true,
        (Some(x), Some(y)) => vex_value::Shared::ptr_eq(x, y),
        _ => false,
    }
}

/// Number/Float/String comparison. Strings compared to a Number at top level
/// are coerced to Numbers; one level inside a container they are not, so
/// `4 == '4'` but `[4] != ['4']`.
fn scalar(
    op: BasicCmp,
    match_case: bool,
    lhs: &Value,
    rhs: &Value,
    top_level: bool,
    config: &EditorConfig,
) -> VimResult<bool> {
    if matches!(lhs, Value::Float(_)) || matches!(rhs, Value::Float(_)) {
        let (x, y) = (lhs.to_float()?, rhs.to_float()?);
        return Ok(match op {
            BasicCmp::Equal | BasicCmp::Is => x == y,
            BasicCmp::Greater => x > y,
            BasicCmp::Matches => return Err(VimError::UsingFloatAsAString),
        });
    }

    if matches!(lhs, Value::Number(_)) || matches!(rhs, Value::Number(_)) {
        if !top_level {
            // nested mixed types are simply unequal
            return match (lhs, rhs) {
                (Value::Number(x), Value::Number(y)) => Ok(match op {
                    BasicCmp::Equal | BasicCmp::Is => x == y,
                    BasicCmp::Greater => x > y,
                    BasicCmp::Matches => regex_match(&x.to_string(), &y.to_string(), config)?,
                }),
                _ => Ok(false),
            };
        }
        let (x, y) = (lhs.to_int()?, rhs.to_int()?);
        return Ok(match op {
            BasicCmp::Equal | BasicCmp::Is => x == y,
            BasicCmp::Greater => x > y,
            BasicCmp::Matches => regex_match(&x.to_string(), &y.to_string(), config)?,
        });
    }

    let (mut x, mut y) = (lhs.to_vim_string()?, rhs.to_vim_string()?);
    if !match_case {
        x = x.to_lowercase();
        y = y.to_lowercase();
    }
    Ok(match op {
        BasicCmp::Equal | BasicCmp::Is => x == y,
        BasicCmp::Greater => x > y,
        BasicCmp::Matches => regex_match(&x, &y, config)?,
    })
}

fn regex_match(text: &str, pattern: &str, config: &EditorConfig) -> VimResult<bool> {
    let (pattern, _) = Pattern::parse(
        pattern,
        PatternParseOptions::delimited(SearchDirection::Forward, '/'),
        config,
    )?;
    Ok(pattern.is_match(text))
}

/// `sequence[index]`. Strings index to a one-character string (empty when
/// out of range), lists and blobs wrap negative indices and error when out
/// of range, dictionaries index by stringified key.
pub(crate) fn index(sequence: &Value, index: &Value) -> VimResult<Value> {
    match sequence {
        Value::String(_) | Value::Number(_) | Value::Float(_) => {
            let idx = index.to_int()?;
            let text = sequence.to_vim_string()?;
            if idx < 0 {
                return Ok(Value::string(""));
            }
            Ok(Value::string(
                text.chars()
                    .nth(idx as usize)
                    .map(String::from)
                    .unwrap_or_default(),
            ))
        }
        Value::List(items) => {
            let items = items.borrow();
            let idx = wrap_index(index.to_int()?, items.len());
            match usize::try_from(idx).ok().and_then(|i| items.get(i)) {
                Some(item) => Ok(item.clone()),
                None => Err(VimError::ListIndexOutOfRange(idx)),
            }
        }
        Value::Dictionary(entries) => {
            let key = index.to_vim_string()?;
            let value = entries.borrow().get(&key).cloned();
            value.ok_or(VimError::KeyNotPresentInDictionary(key))
        }
        Value::Funcref(_) => Err(VimError::CannotIndexAFuncref),
        Value::Blob(bytes) => {
            let bytes = bytes.borrow();
            let idx = wrap_index(index.to_int()?, bytes.len());
            match usize::try_from(idx).ok().and_then(|i| bytes.get(i)) {
                Some(byte) => Ok(Value::Number(i64::from(*byte))),
                None => Err(VimError::ListIndexOutOfRange(idx)),
            }
        }
    }
}

/// `sequence[start : end]`, both bounds inclusive. Negative bounds wrap,
/// out-of-range bounds clamp, and an end before the start yields an empty
/// result.
pub(crate) fn slice(sequence: &Value, start: &Value, end: &Value) -> VimResult<Value> {
    let start = start.to_int()?;
    let end = end.to_int()?;
    match sequence {
        Value::String(_) | Value::Number(_) | Value::Float(_) => {
            let chars: Vec<char> = sequence.to_vim_string()?.chars().collect();
            Ok(Value::String(
                slice_items(&chars, start, end).into_iter().collect(),
            ))
        }
        Value::List(items) => Ok(Value::list(slice_items(&items.borrow(), start, end))),
        Value::Dictionary(_) => Err(VimError::CannotSliceADictionary),
        Value::Funcref(_) => Err(VimError::CannotIndexAFuncref),
        Value::Blob(bytes) => Ok(Value::blob(slice_items(&bytes.borrow(), start, end))),
    }
}

fn slice_items<T: Clone>(items: &[T], start: i64, end: i64) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    let len = items.len() as i64;
    let start = if start < 0 { start.rem_euclid(len) } else { start };
    let end = if end < 0 { end.rem_euclid(len) } else { end.min(len - 1) };
    if end < start || start >= len {
        return Vec::new();
    }
    items[start as usize..=end as usize].to_vec()
}

pub(crate) fn wrap_index(idx: i64, len: usize) -> i64 {
    if idx < 0 {
        idx + len as i64
    } else {
        idx
    }
}
