//! The builtin function registry.
//!
//! Dispatch is a flat name table: each entry carries its arity bounds and an
//! invoke function. `call_function` enforces the bounds centrally, so the
//! implementations can index into their arguments freely.

mod asserts;
mod collections;
mod convert;
mod math;
mod misc;
mod strings;

use vex_error::VimResult;
use vex_host::EditorContext;
use vex_value::Value;

use crate::EvaluationContext;

pub(crate) type InvokeFn =
    fn(&mut EvaluationContext, &mut dyn EditorContext, &str, Vec<Value>) -> VimResult<Value>;

pub(crate) struct Builtin {
    pub(crate) min_args: usize,
    pub(crate) max_args: usize,
    pub(crate) invoke: InvokeFn,
}

const fn builtin(min_args: usize, max_args: usize, invoke: InvokeFn) -> Builtin {
    Builtin {
        min_args,
        max_args,
        invoke,
    }
}

/// Every builtin, sorted by name for binary search.
static BUILTINS: &[(&str, Builtin)] = &[
    ("abs", builtin(1, 1, math::abs)),
    ("acos", builtin(1, 1, math::acos)),
    ("add", builtin(2, 2, collections::add)),
    ("and", builtin(2, 2, math::bit_and)),
    ("asin", builtin(1, 1, math::asin)),
    ("assert_beeps", builtin(1, 1, asserts::assert_beeps)),
    ("assert_equal", builtin(2, 3, asserts::assert_equal)),
    ("assert_false", builtin(1, 2, asserts::assert_false)),
    ("assert_inrange", builtin(3, 4, asserts::assert_inrange)),
    ("assert_match", builtin(2, 3, asserts::assert_match)),
    ("assert_nobeep", builtin(1, 1, asserts::assert_nobeep)),
    ("assert_notequal", builtin(2, 3, asserts::assert_notequal)),
    ("assert_notmatch", builtin(2, 3, asserts::assert_notmatch)),
    ("assert_report", builtin(1, 1, asserts::assert_report)),
    ("assert_true", builtin(1, 2, asserts::assert_true)),
    ("atan2", builtin(2, 2, math::atan2)),
    ("call", builtin(2, 3, misc::call)),
    ("ceil", builtin(1, 1, math::ceil)),
    ("copy", builtin(1, 1, collections::copy)),
    ("cos", builtin(1, 1, math::cos)),
    ("cosh", builtin(1, 1, math::cosh)),
    ("count", builtin(2, 4, collections::count)),
    ("deepcopy", builtin(1, 1, collections::deepcopy)),
    ("empty", builtin(1, 1, misc::empty)),
    ("eval", builtin(1, 1, misc::eval)),
    ("exp", builtin(1, 1, math::exp)),
    ("extend", builtin(2, 3, collections::extend)),
    ("filter", builtin(2, 2, collections::filter)),
    ("flatten", builtin(1, 2, collections::flatten)),
    ("flattennew", builtin(1, 2, collections::flatten)),
    ("float2nr", builtin(1, 1, convert::float2nr)),
    ("floor", builtin(1, 1, math::floor)),
    ("fmod", builtin(2, 2, math::fmod)),
    ("function", builtin(1, 3, misc::function)),
    ("get", builtin(2, 3, collections::get)),
    ("getreg", builtin(0, 1, misc::getreg)),
    ("gettext", builtin(1, 1, strings::gettext)),
    ("has", builtin(1, 1, misc::has)),
    ("has_key", builtin(2, 2, collections::has_key)),
    ("index", builtin(2, 4, collections::index)),
    ("insert", builtin(2, 3, collections::insert)),
    ("invert", builtin(1, 1, math::bit_invert)),
    ("isinf", builtin(1, 1, math::isinf)),
    ("isnan", builtin(1, 1, math::isnan)),
    ("items", builtin(1, 1, collections::items)),
    ("join", builtin(1, 2, collections::join)),
    ("json_decode", builtin(1, 1, convert::json_decode)),
    ("json_encode", builtin(1, 1, convert::json_encode)),
    ("keys", builtin(1, 1, collections::keys)),
    ("len", builtin(1, 1, misc::len)),
    ("localtime", builtin(0, 0, misc::localtime)),
    ("log", builtin(1, 1, math::log)),
    ("log10", builtin(1, 1, math::log10)),
    ("map", builtin(2, 2, collections::map)),
    ("mapnew", builtin(2, 2, collections::map)),
    ("max", builtin(1, 1, collections::max)),
    ("min", builtin(1, 1, collections::min)),
    ("or", builtin(2, 2, math::bit_or)),
    ("pow", builtin(2, 2, math::pow)),
    ("range", builtin(1, 3, collections::range)),
    ("reduce", builtin(2, 3, collections::reduce)),
    ("remove", builtin(2, 3, collections::remove)),
    ("repeat", builtin(2, 2, collections::repeat)),
    ("reverse", builtin(1, 1, collections::reverse)),
    ("round", builtin(1, 1, math::round)),
    ("setreg", builtin(2, 3, misc::setreg)),
    ("sin", builtin(1, 1, math::sin)),
    ("sinh", builtin(1, 1, math::sinh)),
    ("sort", builtin(1, 3, collections::sort)),
    ("split", builtin(1, 3, collections::split)),
    ("sqrt", builtin(1, 1, math::sqrt)),
    ("str2float", builtin(1, 2, convert::str2float)),
    ("str2list", builtin(1, 2, convert::str2list)),
    ("str2nr", builtin(1, 2, convert::str2nr)),
    ("stridx", builtin(2, 3, strings::stridx)),
    ("string", builtin(1, 1, convert::string)),
    ("strlen", builtin(1, 1, strings::strlen)),
    ("strpart", builtin(2, 4, strings::strpart)),
    ("tan", builtin(1, 1, math::tan)),
    ("tanh", builtin(1, 1, math::tanh)),
    ("tolower", builtin(1, 1, strings::tolower)),
    ("toupper", builtin(1, 1, strings::toupper)),
    ("tr", builtin(3, 3, strings::tr)),
    ("trim", builtin(1, 3, strings::trim)),
    ("trunc", builtin(1, 1, math::trunc)),
    ("type", builtin(1, 1, misc::type_of)),
    ("uniq", builtin(1, 3, collections::uniq)),
    ("values", builtin(1, 1, collections::values)),
    ("xor", builtin(2, 2, math::bit_xor)),
];

pub(crate) fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS
        .binary_search_by(|(entry, _)| (*entry).cmp(name))
        .ok()
        .map(|idx| &BUILTINS[idx].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        for pair in BUILTINS.windows(2) {
            assert!(
                pair[0].0 < pair[1].0,
                "{} is out of order with {}",
                pair[0].0,
                pair[1].0
            );
        }
    }

    #[test]
    fn lookup_finds_known_names_only() {
        assert!(lookup("abs").is_some());
        assert!(lookup("xor").is_some());
        assert!(lookup("frobnicate").is_none());
    }
}
