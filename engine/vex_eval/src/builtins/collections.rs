//! List and dictionary builtins.

use std::cmp::Ordering;
use std::rc::Rc;

use indexmap::IndexMap;
use vex_error::{VimError, VimResult};
use vex_host::EditorContext;
use vex_ir::{ComparisonOp, Expression};
use vex_value::{FuncrefData, Value};

use crate::context::{Variable, VariableStore};
use crate::{ops, EvaluationContext};

pub(super) fn add(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    match &args[0] {
        Value::Blob(bytes) => {
            let byte = (args[1].to_int()? & 0xff) as u8;
            bytes.borrow_mut().push(byte);
            Ok(args[0].clone())
        }
        other => {
            let items = other.expect_list()?;
            items.borrow_mut().push(args[1].clone());
            Ok(args[0].clone())
        }
    }
}

pub(super) fn copy(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(match &args[0] {
        Value::List(items) => Value::list(items.borrow().clone()),
        Value::Dictionary(entries) => Value::dictionary(entries.borrow().clone()),
        other => other.clone(),
    })
}

pub(super) fn deepcopy(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    fn deep(value: &Value) -> Value {
        match value {
            Value::List(items) => Value::list(items.borrow().iter().map(deep).collect()),
            Value::Dictionary(entries) => Value::dictionary(
                entries
                    .borrow()
                    .iter()
                    .map(|(key, value)| (key.clone(), deep(value)))
                    .collect(),
            ),
            Value::Blob(bytes) => Value::blob(bytes.borrow().clone()),
            other => other.clone(),
        }
    }
    Ok(deep(&args[0]))
}

pub(super) fn count(
    _: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    name: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let match_case = match args.get(2) {
        Some(ic) => ic.to_int()? == 0,
        None => true,
    };
    let start = match args.get(3) {
        Some(start) => {
            let Value::List(items) = &args[0] else {
                return Err(VimError::InvalidArgument474);
            };
            let len = items.borrow().len();
            let idx = start.to_int()?;
            if idx >= len as i64 {
                return Err(VimError::ListIndexOutOfRange(idx));
            }
            Some(ops::wrap_index(idx, len).max(0) as usize)
        }
        None => None,
    };

    let config = editor.config();
    let mut count = 0i64;
    match &args[0] {
        Value::String(haystack) => {
            let needle = args[1].to_vim_string()?;
            if !needle.is_empty() {
                let (haystack, needle) = if match_case {
                    (haystack.clone(), needle)
                } else {
                    (haystack.to_lowercase(), needle.to_lowercase())
                };
                count = haystack.matches(needle.as_str()).count() as i64;
            }
        }
        Value::List(items) => {
            let items = items.borrow().clone();
            for item in items.iter().skip(start.unwrap_or(0)) {
                if ops::compare(ComparisonOp::Equal, match_case, item, &args[1], &config)? {
                    count += 1;
                }
            }
        }
        Value::Dictionary(entries) => {
            let values: Vec<Value> = entries.borrow().values().cloned().collect();
            for value in &values {
                if ops::compare(ComparisonOp::Equal, match_case, value, &args[1], &config)? {
                    count += 1;
                }
            }
        }
        _ => return Err(VimError::ArgumentMustBeAListOrDictionary(name.to_string())),
    }
    Ok(Value::Number(count))
}

pub(super) fn extend(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    name: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    match (&args[0], &args[1]) {
        (Value::List(target), Value::List(additions)) => {
            let additions = additions.borrow().clone();
            let len = target.borrow().len();
            let insert_at = match args.get(2) {
                Some(idx) => {
                    let idx = ops::wrap_index(idx.to_int()?, len);
                    if idx < 0 || idx as usize > len {
                        return Err(VimError::ListIndexOutOfRange(idx));
                    }
                    idx as usize
                }
                None => len,
            };
            target.borrow_mut().splice(insert_at..insert_at, additions);
            Ok(args[0].clone())
        }
        (Value::Dictionary(target), Value::Dictionary(additions)) => {
            let mode = match args.get(2) {
                Some(mode) => mode.to_vim_string()?,
                None => String::from("force"),
            };
            if !matches!(mode.as_str(), "force" | "keep" | "error") {
                return Err(VimError::InvalidArgument475(mode));
            }
            let additions = additions.borrow().clone();
            let mut target = target.borrow_mut();
            for (key, value) in additions {
                match mode.as_str() {
                    "keep" => {
                        target.entry(key).or_insert(value);
                    }
                    "error" if target.contains_key(&key) => {
                        return Err(VimError::DuplicateKeyInDictionary(key));
                    }
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
            drop(target);
            Ok(args[0].clone())
        }
        _ => Err(VimError::ArgumentMustBeAListOrDictionary(name.to_string())),
    }
}

/// `map()`/`filter()` callbacks: a funcref called with (key, value), or a
/// string expression evaluated with `v:key`/`v:val` in scope.
enum Callback {
    Funcref(Rc<FuncrefData>),
    Expr(Expression),
}

impl Callback {
    fn parse(value: &Value) -> VimResult<Callback> {
        match value {
            Value::Funcref(data) => Ok(Callback::Funcref(data.clone())),
            other => Ok(Callback::Expr(vex_parse::parse(&other.to_vim_string()?)?)),
        }
    }

    fn apply(
        &self,
        ectx: &mut EvaluationContext,
        editor: &mut dyn EditorContext,
        key: Value,
        value: Value,
    ) -> VimResult<Value> {
        match self {
            Callback::Funcref(data) => ectx.call_funcref(data, vec![key, value], editor),
            Callback::Expr(expr) => {
                let mut scope = VariableStore::default();
                scope.insert(String::from("v:key"), Variable::new(key));
                scope.insert(String::from("v:val"), Variable::new(value));
                ectx.push_scope(scope);
                let result = ectx.evaluate_with(expr, editor);
                ectx.pop_scope();
                result
            }
        }
    }
}

pub(super) fn map(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    name: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let callback = Callback::parse(&args[1])?;
    match &args[0] {
        Value::List(handle) => {
            let items = handle.borrow().clone();
            let mut mapped = Vec::with_capacity(items.len());
            for (idx, item) in items.into_iter().enumerate() {
                mapped.push(callback.apply(ectx, editor, Value::Number(idx as i64), item)?);
            }
            if name == "map" {
                *handle.borrow_mut() = mapped;
                Ok(args[0].clone())
            } else {
                Ok(Value::list(mapped))
            }
        }
        Value::Dictionary(handle) => {
            let entries = handle.borrow().clone();
            let mut mapped = IndexMap::with_capacity(entries.len());
            for (key, value) in entries {
                let new = callback.apply(ectx, editor, Value::string(key.clone()), value)?;
                mapped.insert(key, new);
            }
            if name == "map" {
                *handle.borrow_mut() = mapped;
                Ok(args[0].clone())
            } else {
                Ok(Value::dictionary(mapped))
            }
        }
        _ => Err(VimError::ArgumentMustBeAListOrDictionary(name.to_string())),
    }
}

pub(super) fn filter(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    name: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let callback = Callback::parse(&args[1])?;
    match &args[0] {
        Value::List(handle) => {
            let items = handle.borrow().clone();
            let mut kept = Vec::new();
            for (idx, item) in items.into_iter().enumerate() {
                let keep = callback
                    .apply(ectx, editor, Value::Number(idx as i64), item.clone())?
                    .to_int()?
                    != 0;
                if keep {
                    kept.push(item);
                }
            }
            *handle.borrow_mut() = kept;
            Ok(args[0].clone())
        }
        Value::Dictionary(handle) => {
            let entries = handle.borrow().clone();
            let mut kept = IndexMap::new();
            for (key, value) in entries {
                let keep = callback
                    .apply(ectx, editor, Value::string(key.clone()), value.clone())?
                    .to_int()?
                    != 0;
                if keep {
                    kept.insert(key, value);
                }
            }
            *handle.borrow_mut() = kept;
            Ok(args[0].clone())
        }
        _ => Err(VimError::ArgumentMustBeAListOrDictionary(name.to_string())),
    }
}

pub(super) fn flatten(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    name: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let Value::List(handle) = &args[0] else {
        return Err(VimError::ArgumentMustBeAList(name.to_string()));
    };
    let depth = match args.get(1) {
        Some(depth) => depth.to_int()?,
        None => i64::MAX,
    };
    if depth < 0 {
        return Err(VimError::MaxDepthMustBeANonNegativeNumber);
    }

    let mut items = handle.borrow().clone();
    let mut level = 0;
    while level < depth {
        let mut flattened = Vec::with_capacity(items.len());
        let mut found_list = false;
        for item in items {
            match item {
                Value::List(inner) => {
                    found_list = true;
                    flattened.extend(inner.borrow().iter().cloned());
                }
                other => flattened.push(other),
            }
        }
        items = flattened;
        if !found_list {
            break;
        }
        level += 1;
    }

    if name == "flatten" {
        *handle.borrow_mut() = items;
        Ok(args[0].clone())
    } else {
        Ok(Value::list(items))
    }
}

pub(super) fn get(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let default = |fallback: i64| args.get(2).cloned().unwrap_or(Value::Number(fallback));
    match &args[0] {
        Value::List(items) => {
            let items = items.borrow();
            let idx = ops::wrap_index(args[1].to_int()?, items.len());
            Ok(usize::try_from(idx)
                .ok()
                .and_then(|i| items.get(i).cloned())
                .unwrap_or_else(|| default(0)))
        }
        Value::Blob(bytes) => {
            let bytes = bytes.borrow();
            let idx = ops::wrap_index(args[1].to_int()?, bytes.len());
            Ok(usize::try_from(idx)
                .ok()
                .and_then(|i| bytes.get(i))
                .map(|byte| Value::Number(i64::from(*byte)))
                .unwrap_or_else(|| default(-1)))
        }
        Value::Dictionary(entries) => {
            let key = args[1].to_vim_string()?;
            let value = entries.borrow().get(&key).cloned();
            Ok(value.unwrap_or_else(|| default(0)))
        }
        _ => Ok(default(0)),
    }
}

pub(super) fn has_key(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let entries = args[0].expect_dict()?;
    let key = args[1].to_vim_string()?;
    let present = entries.borrow().contains_key(&key);
    Ok(Value::bool(present))
}

pub(super) fn index(
    _: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let Value::List(items) = &args[0] else {
        return Err(VimError::ListOrBlobRequired);
    };
    let items = items.borrow().clone();
    let start = match args.get(2) {
        Some(start) => ops::wrap_index(start.to_int()?, items.len()).max(0) as usize,
        None => 0,
    };
    let match_case = match args.get(3) {
        Some(ic) => ic.to_int()? == 0,
        None => true,
    };
    let config = editor.config();
    for (idx, item) in items.iter().enumerate().skip(start) {
        if ops::compare(ComparisonOp::Equal, match_case, item, &args[1], &config)? {
            return Ok(Value::Number(idx as i64));
        }
    }
    Ok(Value::Number(-1))
}

pub(super) fn insert(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let idx = match args.get(2) {
        Some(idx) => idx.to_int()?,
        None => 0,
    };
    match &args[0] {
        Value::Blob(bytes) => {
            let len = bytes.borrow().len();
            let idx = ops::wrap_index(idx, len);
            if idx < 0 || idx as usize > len {
                return Err(VimError::InvalidArgument475(idx.to_string()));
            }
            let byte = (args[1].to_int()? & 0xff) as u8;
            bytes.borrow_mut().insert(idx as usize, byte);
            Ok(args[0].clone())
        }
        other => {
            let items = other.expect_list()?;
            let len = items.borrow().len();
            let idx = ops::wrap_index(idx, len);
            if idx < 0 || idx as usize > len {
                return Err(VimError::ListIndexOutOfRange(idx));
            }
            items.borrow_mut().insert(idx as usize, args[1].clone());
            Ok(args[0].clone())
        }
    }
}

pub(super) fn items(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let entries = args[0].expect_dict()?;
    let pairs = entries
        .borrow()
        .iter()
        .map(|(key, value)| Value::list(vec![Value::string(key.clone()), value.clone()]))
        .collect();
    Ok(Value::list(pairs))
}

pub(super) fn keys(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let entries = args[0].expect_dict()?;
    let keys = entries
        .borrow()
        .keys()
        .map(|key| Value::string(key.clone()))
        .collect();
    Ok(Value::list(keys))
}

pub(super) fn values(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let entries = args[0].expect_dict()?;
    let values = entries.borrow().values().cloned().collect();
    Ok(Value::list(values))
}

pub(super) fn join(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let items = args[0].expect_list()?;
    let separator = match args.get(1) {
        Some(sep) => sep.to_vim_string()?,
        None => String::new(),
    };
    let parts = items
        .borrow()
        .iter()
        .map(Value::to_vim_string)
        .collect::<VimResult<Vec<_>>>()?;
    Ok(Value::string(parts.join(&separator)))
}

pub(super) fn max(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    name: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    extremum(name, &args[0], i64::max)
}

pub(super) fn min(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    name: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    extremum(name, &args[0], i64::min)
}

fn extremum(name: &str, collection: &Value, pick: fn(i64, i64) -> i64) -> VimResult<Value> {
    let values: Vec<Value> = match collection {
        Value::List(items) => items.borrow().clone(),
        Value::Dictionary(entries) => entries.borrow().values().cloned().collect(),
        _ => return Err(VimError::ArgumentMustBeAListOrDictionary(name.to_string())),
    };
    let mut best: Option<i64> = None;
    for value in &values {
        let n = value.to_int()?;
        best = Some(match best {
            Some(current) => pick(current, n),
            None => n,
        });
    }
    Ok(Value::Number(best.unwrap_or(0)))
}

pub(super) fn range(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let (start, end) = match args.get(1) {
        Some(end) => (args[0].to_int()?, end.to_int()?),
        None => (0, args[0].to_int()? - 1),
    };
    let step = match args.get(2) {
        Some(step) => step.to_int()?,
        None => 1,
    };
    if step == 0 {
        return Err(VimError::StrideIsZero);
    }
    if (step > 0) != (start < end) && (start - end).abs() > 1 {
        return Err(VimError::StartPastEnd);
    }
    let mut items = Vec::new();
    let mut i = start;
    while if step > 0 { i <= end } else { i >= end } {
        items.push(Value::Number(i));
        let Some(next) = i.checked_add(step) else {
            break;
        };
        i = next;
    }
    Ok(Value::list(items))
}

pub(super) fn reduce(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let items = args[0].expect_list()?;
    let items = items.borrow().clone();
    let mut iter = items.into_iter();
    let mut accumulator = match args.get(2) {
        Some(initial) => initial.clone(),
        None => iter.next().ok_or(VimError::InvalidArgument474)?,
    };
    for item in iter {
        accumulator = match &args[1] {
            Value::Funcref(data) => ectx.call_funcref(data, vec![accumulator, item], editor)?,
            other => {
                let name = other.to_vim_string()?;
                ectx.call_function(&name, vec![accumulator, item], editor)?
            }
        };
    }
    Ok(accumulator)
}

pub(super) fn remove(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    match &args[0] {
        Value::List(items) => {
            let len = items.borrow().len();
            let idx = ops::wrap_index(args[1].to_int()?, len);
            if idx < 0 || idx as usize >= len {
                return Err(VimError::ListIndexOutOfRange(idx));
            }
            match args.get(2) {
                None => Ok(items.borrow_mut().remove(idx as usize)),
                Some(end) => {
                    let end = ops::wrap_index(end.to_int()?, len);
                    if end < idx || end as usize >= len {
                        return Err(VimError::ListIndexOutOfRange(end));
                    }
                    let removed: Vec<Value> = items
                        .borrow_mut()
                        .drain(idx as usize..=end as usize)
                        .collect();
                    Ok(Value::list(removed))
                }
            }
        }
        Value::Dictionary(entries) => {
            let key = args[1].to_vim_string()?;
            let removed = entries.borrow_mut().shift_remove(&key);
            Ok(removed.unwrap_or(Value::Number(0)))
        }
        _ => Ok(Value::Number(0)),
    }
}

pub(super) fn repeat(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let times = args[1].to_int()?.max(0) as usize;
    match &args[0] {
        Value::List(items) => {
            let items = items.borrow();
            let mut repeated = Vec::with_capacity(items.len() * times);
            for _ in 0..times {
                repeated.extend(items.iter().cloned());
            }
            Ok(Value::list(repeated))
        }
        other => Ok(Value::string(other.to_vim_string()?.repeat(times))),
    }
}

pub(super) fn reverse(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    match &args[0] {
        Value::List(items) => {
            items.borrow_mut().reverse();
            Ok(args[0].clone())
        }
        Value::Blob(bytes) => {
            bytes.borrow_mut().reverse();
            Ok(args[0].clone())
        }
        _ => Ok(Value::Number(0)),
    }
}

pub(super) fn sort(
    ectx: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    name: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let Value::List(handle) = &args[0] else {
        return Err(VimError::ArgumentMustBeAList(name.to_string()));
    };

    enum Comparator {
        Display,
        IgnoreCase,
        Funcref(Rc<FuncrefData>),
    }
    let comparator = match args.get(1) {
        None => Comparator::Display,
        Some(Value::Number(1)) => Comparator::IgnoreCase,
        Some(Value::String(s)) if s == "1" || s == "i" => Comparator::IgnoreCase,
        Some(Value::Funcref(data)) => Comparator::Funcref(data.clone()),
        Some(_) => return Err(VimError::InvalidArgument474),
    };

    let mut items = handle.borrow().clone();
    let mut failure: Option<VimError> = None;
    items.sort_by(|a, b| match &comparator {
        Comparator::Display => a.display_string().cmp(&b.display_string()),
        Comparator::IgnoreCase => a
            .display_string()
            .to_lowercase()
            .cmp(&b.display_string().to_lowercase()),
        Comparator::Funcref(data) => {
            if failure.is_some() {
                return Ordering::Equal;
            }
            match ectx
                .call_funcref(data, vec![a.clone(), b.clone()], editor)
                .and_then(|v| v.to_int())
            {
                Ok(n) => n.cmp(&0),
                Err(err) => {
                    failure = Some(err);
                    Ordering::Equal
                }
            }
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }

    *handle.borrow_mut() = items;
    Ok(args[0].clone())
}

pub(super) fn split(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let text = args[0].to_vim_string()?;
    let keepempty = match args.get(2) {
        Some(keep) => keep.to_int()? != 0,
        None => false,
    };
    let separator = match args.get(1) {
        Some(sep) => {
            let sep = sep.to_vim_string()?;
            if sep.is_empty() {
                None
            } else {
                Some(sep)
            }
        }
        None => None,
    };

    let mut parts: Vec<String> = match &separator {
        Some(sep) => text.split(sep.as_str()).map(String::from).collect(),
        None => split_whitespace_runs(&text),
    };
    if !keepempty {
        if parts.first().is_some_and(String::is_empty) {
            parts.remove(0);
        }
        if parts.last().is_some_and(String::is_empty) {
            parts.pop();
        }
    }
    Ok(Value::list(parts.into_iter().map(Value::String).collect()))
}

/// Split on runs of whitespace, keeping the leading/trailing empty pieces
/// that `keepempty` preserves.
fn split_whitespace_runs(text: &str) -> Vec<String> {
    let mut parts = vec![String::new()];
    let mut in_whitespace = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                parts.push(String::new());
                in_whitespace = true;
            }
        } else {
            in_whitespace = false;
            if let Some(last) = parts.last_mut() {
                last.push(c);
            }
        }
    }
    parts
}

pub(super) fn uniq(
    _: &mut EvaluationContext,
    editor: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let Value::List(handle) = &args[0] else {
        return Err(VimError::ArgumentMustBeAList(String::from("uniq")));
    };
    let items = handle.borrow().clone();
    let config = editor.config();
    let mut deduped: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        let duplicate = match deduped.last() {
            Some(prev) => ops::compare(ComparisonOp::Equal, true, prev, &item, &config)?,
            None => false,
        };
        if !duplicate {
            deduped.push(item);
        }
    }
    *handle.borrow_mut() = deduped;
    Ok(args[0].clone())
}
