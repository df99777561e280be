//! Canonical value rendering, as `:echo` and `string()` produce it.

use std::fmt::Write as _;

use crate::{FuncrefData, Value};

impl Value {
    /// Render for display. Top-level strings are bare; strings nested inside
    /// containers are single-quoted with embedded quotes doubled.
    pub fn display_string(&self) -> String {
        display(self, true)
    }
}

fn display(value: &Value, top_level: bool) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::Float(f) => format_float(*f),
        Value::String(s) => {
            if top_level {
                s.clone()
            } else {
                quote(s)
            }
        }
        Value::List(items) => {
            let rendered: Vec<String> = items.borrow().iter().map(|v| display(v, false)).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Dictionary(entries) => {
            let rendered: Vec<String> = entries
                .borrow()
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), display(v, false)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
        Value::Funcref(data) => display_funcref(data),
        Value::Blob(bytes) => {
            let mut out = String::from("0z");
            for byte in bytes.borrow().iter() {
                let _ = write!(out, "{byte:02X}");
            }
            out
        }
    }
}

/// A bare funcref renders as its name; bound arguments and dict render as
/// the `function()` call that would rebuild it.
fn display_funcref(data: &FuncrefData) -> String {
    let dict = data
        .dict
        .as_ref()
        .map(|d| display(&Value::Dictionary(d.clone()), false));
    if data.arglist.is_empty() {
        match dict {
            Some(dict) => format!("function({}, {dict})", quote(&data.name)),
            None => data.name.clone(),
        }
    } else {
        let arglist = display(&Value::list(data.arglist.clone()), false);
        match dict {
            Some(dict) => format!("function({}, {arglist}, {dict})", quote(&data.name)),
            None => format!("function({}, {arglist})", quote(&data.name)),
        }
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Floats print with up to six fractional digits, trailing zeros trimmed,
/// always keeping at least one digit after the point: `2.0`, `-0.2`, `3.14`.
// TODO: large magnitudes should switch to exponent notation like Vim's 1.0e20.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return String::from("nan");
    }
    if f.is_infinite() {
        return String::from(if f > 0.0 { "inf" } else { "-inf" });
    }
    let mut s = format!("{f:.6}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.push('0');
    }
    s
}
