//! Implicit coercions between value types.

use indexmap::IndexMap;
use vex_error::{VimError, VimResult};
use vex_ir::numeric;

use crate::{Shared, Value};

impl Value {
    /// Coerce to a Number, as arithmetic and conditions do.
    ///
    /// Strings parse a leading number literal (any base) and fall back to 0;
    /// floats and containers refuse with the matching type error.
    pub fn to_int(&self) -> VimResult<i64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Float(_) => Err(VimError::UsingAFloatAsANumber),
            Value::String(s) => Ok(numeric::parse_number_prefix(s).map_or(0, |(v, _)| v)),
            Value::List(_) => Err(VimError::UsingAListAsANumber),
            Value::Dictionary(_) => Err(VimError::UsingADictionaryAsANumber),
            Value::Funcref(_) => Err(VimError::UsingAFuncrefAsANumber),
            Value::Blob(_) => Err(VimError::UsingABlobAsANumber),
        }
    }

    /// Coerce to a Float for the math builtins. Only Numbers widen; strings
    /// do not.
    pub fn to_float(&self) -> VimResult<f64> {
        match self {
            Value::Number(n) => Ok(*n as f64),
            Value::Float(f) => Ok(*f),
            _ => Err(VimError::NumberOrFloatRequired),
        }
    }

    /// Coerce to a String, as `.` concatenation and string builtins do.
    /// Numbers format in decimal; blobs render as `0z` hex; everything else
    /// refuses.
    pub fn to_vim_string(&self) -> VimResult<String> {
        match self {
            Value::Number(n) => Ok(n.to_string()),
            Value::Float(_) => Err(VimError::UsingFloatAsAString),
            Value::String(s) => Ok(s.clone()),
            Value::List(_) => Err(VimError::UsingListAsAString),
            Value::Dictionary(_) => Err(VimError::UsingDictionaryAsAString),
            Value::Funcref(_) => Err(VimError::UsingFuncrefAsAString),
            Value::Blob(_) => Ok(self.display_string()),
        }
    }

    /// The list handle, or E714.
    pub fn expect_list(&self) -> VimResult<Shared<Vec<Value>>> {
        match self {
            Value::List(items) => Ok(items.clone()),
            _ => Err(VimError::ListRequired),
        }
    }

    /// The dictionary handle, or E715.
    pub fn expect_dict(&self) -> VimResult<Shared<IndexMap<String, Value>>> {
        match self {
            Value::Dictionary(entries) => Ok(entries.clone()),
            _ => Err(VimError::DictionaryRequired),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_to_int_parses_a_leading_literal() {
        assert_eq!(Value::string("42").to_int(), Ok(42));
        assert_eq!(Value::string("0xff").to_int(), Ok(255));
        assert_eq!(Value::string("4abc").to_int(), Ok(4));
        assert_eq!(Value::string("abc").to_int(), Ok(0));
        assert_eq!(Value::string("").to_int(), Ok(0));
    }

    #[test]
    fn float_does_not_narrow_to_int() {
        assert_eq!(
            Value::Float(1.5).to_int(),
            Err(VimError::UsingAFloatAsANumber)
        );
    }

    #[test]
    fn string_does_not_widen_to_float() {
        assert_eq!(
            Value::string("1.5").to_float(),
            Err(VimError::NumberOrFloatRequired)
        );
        assert_eq!(Value::Number(2).to_float(), Ok(2.0));
    }

    #[test]
    fn to_string_rules() {
        assert_eq!(Value::Number(-3).to_vim_string(), Ok(String::from("-3")));
        assert_eq!(
            Value::Float(1.5).to_vim_string(),
            Err(VimError::UsingFloatAsAString)
        );
        assert_eq!(
            Value::blob(vec![0x61]).to_vim_string(),
            Ok(String::from("0z61"))
        );
        assert_eq!(
            Value::list(vec![]).to_vim_string(),
            Err(VimError::UsingListAsAString)
        );
    }
}
