//! String builtins.
//!
//! Indices and lengths here are in characters, not bytes, matching how Vim
//! counts positions within a string.

use vex_error::{VimError, VimResult};
use vex_host::EditorContext;
use vex_value::Value;

use crate::EvaluationContext;

pub(super) fn gettext(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    // No translation catalog; the message is returned untranslated.
    Ok(Value::string(args[0].to_vim_string()?))
}

pub(super) fn stridx(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let haystack = args[0].to_vim_string()?;
    let needle = args[1].to_vim_string()?;
    let start = match args.get(2) {
        Some(start) => start.to_int()?.max(0) as usize,
        None => 0,
    };

    let byte_start = match haystack.char_indices().nth(start) {
        Some((byte, _)) => byte,
        None if start == 0 => 0,
        None => return Ok(Value::Number(-1)),
    };
    let found = haystack[byte_start..]
        .find(&needle)
        .map(|offset| haystack[..byte_start + offset].chars().count() as i64);
    Ok(Value::Number(found.unwrap_or(-1)))
}

pub(super) fn strlen(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let s = args[0].to_vim_string()?;
    Ok(Value::Number(s.chars().count() as i64))
}

pub(super) fn strpart(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let source = args[0].to_vim_string()?;
    let total = source.chars().count() as i64;
    let start = args[1].to_int()?.max(0);
    let len = match args.get(2) {
        Some(len) => len.to_int()?,
        None => total - start,
    };
    if len <= 0 || start >= total {
        return Ok(Value::string(""));
    }
    let part: String = source
        .chars()
        .skip(start as usize)
        .take(len as usize)
        .collect();
    Ok(Value::string(part))
}

pub(super) fn tolower(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::string(args[0].to_vim_string()?.to_lowercase()))
}

pub(super) fn toupper(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    Ok(Value::string(args[0].to_vim_string()?.to_uppercase()))
}

pub(super) fn tr(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let source = args[0].to_vim_string()?;
    let from = args[1].to_vim_string()?;
    let to = args[2].to_vim_string()?;
    let from_chars: Vec<char> = from.chars().collect();
    let to_chars: Vec<char> = to.chars().collect();
    if from_chars.len() != to_chars.len() {
        return Err(VimError::InvalidArgument475(from));
    }
    let translated: String = source
        .chars()
        .map(|c| match from_chars.iter().position(|&f| f == c) {
            Some(idx) => to_chars[idx],
            None => c,
        })
        .collect();
    Ok(Value::string(translated))
}

pub(super) fn trim(
    _: &mut EvaluationContext,
    _: &mut dyn EditorContext,
    _: &str,
    args: Vec<Value>,
) -> VimResult<Value> {
    let source = args[0].to_vim_string()?;
    let mask: Vec<char> = match args.get(1) {
        Some(mask) => mask.to_vim_string()?.chars().collect(),
        None => Vec::new(),
    };
    let direction = match args.get(2) {
        Some(dir) => {
            let dir = dir.to_int()?;
            if !(0..=2).contains(&dir) {
                return Err(VimError::InvalidArgument475(dir.to_string()));
            }
            dir
        }
        None => 0,
    };

    let in_mask = |c: char| {
        if mask.is_empty() {
            c.is_whitespace()
        } else {
            mask.contains(&c)
        }
    };
    let trimmed = match direction {
        1 => source.trim_start_matches(in_mask),
        2 => source.trim_end_matches(in_mask),
        _ => source.trim_matches(in_mask),
    };
    Ok(Value::string(trimmed))
}
