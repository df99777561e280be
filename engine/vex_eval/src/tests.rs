use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vex_error::VimError;
use vex_host::{EditorConfig, ScratchBuffer};
use vex_value::Value;

use crate::EvaluationContext;

fn eval(input: &str) -> Result<Value, VimError> {
    EvaluationContext::new().evaluate_str(input)
}

/// Evaluate and render the result the way `:echo` would.
fn shows(input: &str) -> String {
    eval(input).unwrap().display_string()
}

#[test]
fn integer_arithmetic() {
    assert_eq!(eval("2 + 3 * 4"), Ok(Value::Number(14)));
    assert_eq!(eval("(2 + 3) * 4"), Ok(Value::Number(20)));
    assert_eq!(eval("7 - 10"), Ok(Value::Number(-3)));
    assert_eq!(eval("5 / 2"), Ok(Value::Number(2)));
    assert_eq!(eval("7 % 3"), Ok(Value::Number(1)));
}

#[test]
fn division_by_zero_saturates() {
    assert_eq!(eval("1 / 0"), Ok(Value::Number(i64::MAX)));
    assert_eq!(eval("-1 / 0"), Ok(Value::Number(i64::MIN)));
    assert_eq!(eval("0 / 0"), Ok(Value::Number(0)));
    // modulo by zero is simply zero
    assert_eq!(eval("7 % 0"), Ok(Value::Number(0)));
}

#[test]
fn float_arithmetic_promotes() {
    assert_eq!(shows("5 / 2.0"), "2.5");
    assert_eq!(shows("1.5 + 1"), "2.5");
    assert_eq!(eval("2.5 % 2"), Err(VimError::CannotUseModuloWithFloat));
}

#[test]
fn string_operands_coerce_to_numbers() {
    assert_eq!(eval("'3' + '4'"), Ok(Value::Number(7)));
    assert_eq!(eval("'3x' + 1"), Ok(Value::Number(4)));
    assert_eq!(eval("'x' + 1"), Ok(Value::Number(1)));
}

#[test]
fn concatenation() {
    assert_eq!(eval("'a' . 'b'"), Ok(Value::string("ab")));
    assert_eq!(eval("1 . 2"), Ok(Value::string("12")));
    assert_eq!(eval("'v' .. 1"), Ok(Value::string("v1")));
    assert_eq!(eval("1.5 . 'x'"), Err(VimError::UsingFloatAsAString));
}

#[test]
fn logical_operators_are_eager() {
    assert_eq!(eval("1 && 0"), Ok(Value::Number(0)));
    assert_eq!(eval("1 || 0"), Ok(Value::Number(1)));
    // both sides always evaluate, so a failing side is an error even when
    // the other side would decide the result
    assert!(eval("1 || nosuchvar").is_err());
}

#[test]
fn unary_operators() {
    assert_eq!(eval("!'0'"), Ok(Value::Number(1)));
    assert_eq!(eval("!!7"), Ok(Value::Number(1)));
    assert_eq!(eval("--3"), Ok(Value::Number(3)));
    assert_eq!(shows("-1.5"), "-1.5");
}

#[test]
fn ternary() {
    assert_eq!(eval("1 ? 'a' : 'b'"), Ok(Value::string("a")));
    assert_eq!(eval("0 ? 'a' : 'b'"), Ok(Value::string("b")));
}

#[test]
fn comparison_coerces_only_at_top_level() {
    assert_eq!(eval("4 == '4'"), Ok(Value::Number(1)));
    assert_eq!(eval("[4] == ['4']"), Ok(Value::Number(0)));
    assert_eq!(eval("[1, [2, '3']] == [1, [2, '3']]"), Ok(Value::Number(1)));
}

#[test]
fn comparison_case_modifiers() {
    assert_eq!(eval("'abc' ==# 'Abc'"), Ok(Value::Number(0)));
    assert_eq!(eval("'abc' ==? 'Abc'"), Ok(Value::Number(1)));
    assert_eq!(eval("'abc' <? 'ABD'"), Ok(Value::Number(1)));
}

#[test]
fn unmodified_comparison_follows_ignorecase() {
    let mut ctx = EvaluationContext::new();
    let mut buffer = ScratchBuffer::from_text("").with_config(EditorConfig {
        ignorecase: true,
        ..EditorConfig::default()
    });
    let result = ctx.evaluate_str_with("'abc' == 'ABC'", &mut buffer);
    assert_eq!(result, Ok(Value::Number(1)));
    let result = ctx.evaluate_str_with("'abc' ==# 'ABC'", &mut buffer);
    assert_eq!(result, Ok(Value::Number(0)));
}

#[test]
fn string_comparison_is_lexicographic() {
    assert_eq!(eval("'2' > '10'"), Ok(Value::Number(1)));
    assert_eq!(eval("2 > 10"), Ok(Value::Number(0)));
}

#[test]
fn is_compares_identity() {
    assert_eq!(eval("[1] == [1]"), Ok(Value::Number(1)));
    assert_eq!(eval("[1] is [1]"), Ok(Value::Number(0)));
    assert_eq!(eval("[1] isnot [1]"), Ok(Value::Number(1)));
}

#[test]
fn regex_match_operator() {
    assert_eq!(eval("'foobar' =~ 'oo.a'"), Ok(Value::Number(1)));
    assert_eq!(eval("'foobar' !~ 'baz'"), Ok(Value::Number(1)));
    assert_eq!(eval("'FOO' =~# 'foo'"), Ok(Value::Number(0)));
    assert_eq!(eval("'FOO' =~? 'foo'"), Ok(Value::Number(1)));
}

#[test]
fn indexing() {
    assert_eq!(eval("[1, 2, 3][1]"), Ok(Value::Number(2)));
    assert_eq!(eval("[1, 2, 3][-1]"), Ok(Value::Number(3)));
    assert_eq!(eval("'hello'[1]"), Ok(Value::string("e")));
    assert_eq!(eval("'hello'[-1]"), Ok(Value::string("")));
    assert_eq!(eval("[1][5]"), Err(VimError::ListIndexOutOfRange(5)));
}

#[test]
fn slicing() {
    assert_eq!(shows("[1, 2, 3, 4][1:2]"), "[2, 3]");
    assert_eq!(shows("[1, 2, 3, 4][2:]"), "[3, 4]");
    assert_eq!(shows("[1, 2, 3, 4][:1]"), "[1, 2]");
    assert_eq!(eval("'hello'[1:-2]"), Ok(Value::string("ell")));
    assert_eq!(shows("[1, 2][3:4]"), "[]");
}

#[test]
fn dictionary_entries() {
    assert_eq!(eval("{'a': 1, 'b': 2}.b"), Ok(Value::Number(2)));
    assert_eq!(eval("#{a: 1}['a']"), Ok(Value::Number(1)));
    assert_eq!(
        eval("{'a': 1}.missing"),
        Err(VimError::KeyNotPresentInDictionary(String::from("missing")))
    );
    assert_eq!(
        eval("{'a': 1, 'a': 2}"),
        Err(VimError::DuplicateKeyInDictionary(String::from("a")))
    );
}

#[test]
fn lambdas_capture_their_scope() {
    assert_eq!(eval("{x -> x + 1}(2)"), Ok(Value::Number(3)));
    assert_eq!(eval("{x -> {y -> x + y}}(10)(5)"), Ok(Value::Number(15)));
    assert_eq!(shows("{x -> x}"), "<lambda>1");
}

#[test]
fn method_call_syntax() {
    assert_eq!(eval("[1, 2, 3]->len()"), Ok(Value::Number(3)));
    assert_eq!(shows("[3, 1, 2]->sort()->reverse()"), "[3, 2, 1]");
}

#[test]
fn function_builds_funcrefs() {
    assert_eq!(shows("function('abs')(-3)"), "3.0");
    assert_eq!(shows("call(function('min', [[4, 2]]), [])"), "2");
    assert_eq!(shows("function('abs', [-4])"), "function('abs', [-4])");
    assert_eq!(
        eval("function('abs', 1)"),
        Err(VimError::SecondArgumentOfFunction)
    );
    assert!(matches!(eval("42(1)"), Err(VimError::InvalidExpression(_))));
}

#[test]
fn unknown_function_and_arity() {
    assert_eq!(
        eval("nosuchfn(1)"),
        Err(VimError::UnknownFunction(String::from("nosuchfn")))
    );
    assert_eq!(
        eval("abs()"),
        Err(VimError::NotEnoughArgs(String::from("abs")))
    );
    assert_eq!(
        eval("abs(1, 2)"),
        Err(VimError::TooManyArgs(String::from("abs")))
    );
}

#[test]
fn map_and_filter() {
    assert_eq!(shows("map([1, 2, 3], 'v:val * 2')"), "[2, 4, 6]");
    assert_eq!(shows("map([1, 2], {i, v -> i + v})"), "[1, 3]");
    assert_eq!(shows("filter([1, 2, 3, 4], 'v:val % 2 == 0')"), "[2, 4]");
    assert_eq!(shows("map({'a': 1, 'b': 2}, 'v:val + 1')"), "{'a': 2, 'b': 3}");
    // map() mutates, mapnew() leaves the original alone
    let mut ctx = EvaluationContext::new();
    ctx.set_variable(None, "l", Value::list(vec![Value::Number(1)]), false)
        .unwrap();
    ctx.evaluate_str("mapnew(l, 'v:val + 1')").unwrap();
    assert_eq!(ctx.evaluate_str("l"), Ok(Value::list(vec![Value::Number(1)])));
}

#[test]
fn reduce_folds() {
    assert_eq!(eval("reduce([1, 2, 3], {a, b -> a + b})"), Ok(Value::Number(6)));
    assert_eq!(
        eval("reduce([1, 2, 3], {a, b -> a + b}, 10)"),
        Ok(Value::Number(16))
    );
    assert_eq!(eval("reduce([], 'add')"), Err(VimError::InvalidArgument474));
}

#[test]
fn sort_variants() {
    assert_eq!(shows("sort([4, 2, 1, 3, 5])"), "[1, 2, 3, 4, 5]");
    // ignore-case sort is stable
    assert_eq!(
        shows("sort(['A', 'c', 'B', 'a', 'C', 'b'], 'i')"),
        "['A', 'a', 'B', 'b', 'c', 'C']"
    );
    assert_eq!(shows("sort([1, 3, 2], {a, b -> b - a})"), "[3, 2, 1]");
    assert_eq!(eval("sort([1], 2.5)"), Err(VimError::InvalidArgument474));
}

#[test]
fn range_builtin() {
    assert_eq!(shows("range(4)"), "[0, 1, 2, 3]");
    assert_eq!(shows("range(2, 9, 3)"), "[2, 5, 8]");
    assert_eq!(shows("range(2, -2, -1)"), "[2, 1, 0, -1, -2]");
    assert_eq!(eval("range(1, 10, 0)"), Err(VimError::StrideIsZero));
    assert_eq!(eval("range(2, 0)"), Err(VimError::StartPastEnd));
}

#[test]
fn list_mutators() {
    assert_eq!(shows("add([1, 2], 3)"), "[1, 2, 3]");
    assert_eq!(shows("insert([2, 3], 1)"), "[1, 2, 3]");
    assert_eq!(shows("extend([1], [2, 3])"), "[1, 2, 3]");
    assert_eq!(shows("extend([1, 4], [2, 3], 1)"), "[1, 2, 3, 4]");
    assert_eq!(shows("remove([1, 2, 3], 1, 2)"), "[2, 3]");
    assert_eq!(shows("uniq([1, 1, 2, 2, 1])"), "[1, 2, 1]");
    assert_eq!(shows("repeat([1, 'a'], 2)"), "[1, 'a', 1, 'a']");
    assert_eq!(shows("repeat([1], 0)"), "[]");
    assert_eq!(eval("repeat('ab', 3)"), Ok(Value::string("ababab")));
    assert_eq!(shows("flatten([1, [2, [3]]], 1)"), "[1, 2, [3]]");
    assert_eq!(shows("flatten([1, [2, [3]]])"), "[1, 2, 3]");
}

#[test]
fn dict_builtins() {
    assert_eq!(shows("keys({'a': 1, 'b': 2})"), "['a', 'b']");
    assert_eq!(shows("items(#{a: 1})"), "[['a', 1]]");
    assert_eq!(eval("has_key({'a': 1}, 'a')"), Ok(Value::Number(1)));
    assert_eq!(
        eval("extend({'a': 1}, {'a': 2}, 'error')"),
        Err(VimError::DuplicateKeyInDictionary(String::from("a")))
    );
    assert_eq!(shows("extend({'a': 1}, {'a': 2}, 'keep')"), "{'a': 1}");
    assert_eq!(eval("max({'a': 3, 'b': 7})"), Ok(Value::Number(7)));
}

#[test]
fn get_with_defaults() {
    assert_eq!(eval("get([1, 2], -1)"), Ok(Value::Number(2)));
    assert_eq!(eval("get([1, 2], 5, 'x')"), Ok(Value::string("x")));
    assert_eq!(eval("get({'a': 1}, 'b')"), Ok(Value::Number(0)));
    assert_eq!(eval("get(0zAB, 1)"), Ok(Value::Number(-1)));
}

#[test]
fn count_occurrences() {
    assert_eq!(eval("count([1, 2, 1, 1], 1)"), Ok(Value::Number(3)));
    assert_eq!(eval("count('ababa', 'a')"), Ok(Value::Number(3)));
    assert_eq!(eval("count('aAa', 'a', 1)"), Ok(Value::Number(3)));
    assert_eq!(eval("count([1, 2, 1], 1, 0, 1)"), Ok(Value::Number(1)));
}

#[test]
fn copies_are_shallow_or_deep() {
    let mut ctx = EvaluationContext::new();
    let inner = Value::list(vec![Value::Number(1)]);
    let outer = Value::list(vec![inner.clone()]);
    ctx.set_variable(None, "l", outer, false).unwrap();
    // a shallow copy shares the nested list, a deep copy does not
    assert_eq!(ctx.evaluate_str("copy(l)[0] is l[0]"), Ok(Value::Number(1)));
    assert_eq!(ctx.evaluate_str("deepcopy(l)[0] is l[0]"), Ok(Value::Number(0)));
    assert_eq!(ctx.evaluate_str("deepcopy(l)"), Ok(Value::list(vec![inner])));
}

#[test]
fn string_builtins() {
    assert_eq!(eval("strlen('héllo')"), Ok(Value::Number(5)));
    assert_eq!(eval("len('héllo')"), Ok(Value::Number(5)));
    assert_eq!(eval("len(120)"), Ok(Value::Number(3)));
    assert_eq!(eval("stridx('hello', 'l')"), Ok(Value::Number(2)));
    assert_eq!(eval("stridx('hello', 'l', 4)"), Ok(Value::Number(-1)));
    assert_eq!(eval("strpart('hello', 1, 3)"), Ok(Value::string("ell")));
    assert_eq!(eval("toupper('abç')"), Ok(Value::string("ABÇ")));
    assert_eq!(eval("tr('hello', 'el', 'ip')"), Ok(Value::string("hippo")));
    assert_eq!(
        eval("tr('x', 'ab', 'c')"),
        Err(VimError::InvalidArgument475(String::from("ab")))
    );
    assert_eq!(eval("trim('  x  ')"), Ok(Value::string("x")));
    assert_eq!(eval("trim('xxaxx', 'x', 1)"), Ok(Value::string("axx")));
}

#[test]
fn split_and_join() {
    assert_eq!(shows("split('a b  c')"), "['a', 'b', 'c']");
    assert_eq!(shows("split('a,b,,c', ',')"), "['a', 'b', '', 'c']");
    assert_eq!(shows("split(',a,', ',', 1)"), "['', 'a', '']");
    assert_eq!(eval("join(['a', 'b'], '-')"), Ok(Value::string("a-b")));
    assert_eq!(eval("join([1, 2])"), Ok(Value::string("12")));
}

#[test]
fn conversions() {
    assert_eq!(eval("float2nr(-20.7)"), Ok(Value::Number(-20)));
    assert_eq!(shows("str2float('1.25')"), "1.25");
    assert_eq!(shows("str2float('5')"), "0.0");
    assert_eq!(eval("str2nr('0xff', 16)"), Ok(Value::Number(255)));
    assert_eq!(eval("str2nr('11', 2)"), Ok(Value::Number(3)));
    assert_eq!(eval("str2nr('-42')"), Ok(Value::Number(-42)));
    assert_eq!(eval("str2nr('9abc')"), Ok(Value::Number(9)));
    assert_eq!(shows("str2list('ab')"), "[97, 98]");
    assert_eq!(eval("string([1, 'a'])"), Ok(Value::string("[1, 'a']")));
}

#[test]
fn eval_inverts_string() {
    assert_eq!(shows("eval(string([1, {'k': 'v'}]))"), "[1, {'k': 'v'}]");
    assert_eq!(eval("eval('2 + 2')"), Ok(Value::Number(4)));
}

#[test]
fn json_round_trip() {
    assert_eq!(
        eval("json_encode([1, 'a', {'k': 2.5}])"),
        Ok(Value::string(r#"[1,"a",{"k":2.5}]"#))
    );
    // null and booleans decode as numbers; key order is preserved
    assert_eq!(
        shows(r#"json_decode('{"b": 2, "a": [null, true]}')"#),
        "{'b': 2, 'a': [0, 1]}"
    );
    assert!(eval("json_encode(function('abs'))").is_err());
}

#[test]
fn math_builtins() {
    assert_eq!(shows("abs(-3)"), "3.0");
    assert_eq!(shows("floor(2.7)"), "2.0");
    assert_eq!(shows("round(2.5)"), "3.0");
    assert_eq!(shows("round(-2.5)"), "-3.0");
    assert_eq!(shows("fmod(-4.2, 1.0)"), "-0.2");
    assert_eq!(shows("pow(2, 10)"), "1024.0");
    assert_eq!(eval("and(12, 10)"), Ok(Value::Number(8)));
    assert_eq!(eval("xor(12, 10)"), Ok(Value::Number(6)));
    assert_eq!(eval("invert(0)"), Ok(Value::Number(-1)));
    assert_eq!(eval("isnan(sqrt(-1.0))"), Ok(Value::Number(1)));
    assert_eq!(eval("isinf(pow(10.0, 400))"), Ok(Value::Number(1)));
}

#[test]
fn blobs() {
    assert_eq!(eval("0zAB12[0]"), Ok(Value::Number(0xab)));
    assert_eq!(shows("add(0z01, 255)"), "0z01FF");
    assert_eq!(shows("0zAB12CD[1:]"), "0z12CD");
    assert_eq!(eval("len(0zAB12)"), Ok(Value::Number(2)));
    assert_eq!(eval("type(0zAB) == v:t_blob"), Ok(Value::Number(1)));
}

#[test]
fn empty_builtin() {
    assert_eq!(eval("empty([])"), Ok(Value::Number(1)));
    assert_eq!(eval("empty('0')"), Ok(Value::Number(0)));
    assert_eq!(eval("empty(0.0)"), Ok(Value::Number(1)));
    assert_eq!(eval("empty(function('abs'))"), Ok(Value::Number(0)));
}

#[test]
fn vim_variables() {
    assert_eq!(eval("v:true"), Ok(Value::Number(1)));
    assert_eq!(eval("v:t_float"), Ok(Value::Number(5)));
    assert_eq!(eval("v:t_blob"), Ok(Value::Number(10)));
    assert_eq!(eval("v:numbermax"), Ok(Value::Number(i64::MAX)));
    assert_eq!(
        eval("v:nosuch"),
        Err(VimError::UndefinedVariable(String::from("v:nosuch")))
    );
}

#[test]
fn options_read_from_the_editor() {
    assert_eq!(eval("&ignorecase"), Ok(Value::Number(0)));
    assert_eq!(eval("&unrelated"), Ok(Value::string("")));
    let mut ctx = EvaluationContext::new();
    let mut buffer = ScratchBuffer::from_text("").with_config(EditorConfig {
        smartcase: true,
        ..EditorConfig::default()
    });
    assert_eq!(ctx.evaluate_str_with("&scs", &mut buffer), Ok(Value::Number(1)));
}

#[test]
fn variables_resolve_through_globals() {
    let mut ctx = EvaluationContext::new();
    ctx.set_variable(None, "x", Value::Number(7), false).unwrap();
    assert_eq!(ctx.evaluate_str("x + 1"), Ok(Value::Number(8)));
    assert_eq!(ctx.evaluate_str("g:x"), Ok(Value::Number(7)));
    assert_eq!(
        ctx.evaluate_str("b:x"),
        Err(VimError::UndefinedVariable(String::from("b:x")))
    );
    assert_eq!(
        eval("nosuchvar"),
        Err(VimError::UndefinedVariable(String::from("nosuchvar")))
    );
}

#[test]
fn locked_variables_refuse_assignment() {
    let mut ctx = EvaluationContext::new();
    ctx.set_variable(None, "c", Value::Number(1), true).unwrap();
    assert_eq!(
        ctx.set_variable(None, "c", Value::Number(2), false),
        Err(VimError::ValueIsLocked(String::from("c")))
    );
    ctx.set_variable(None, "x", Value::Number(1), false).unwrap();
    assert_eq!(
        ctx.set_variable(None, "x", Value::Number(2), true),
        Err(VimError::CannotModifyExistingVariable)
    );
}

#[test]
fn funcref_variables_must_be_capitalized() {
    let mut ctx = EvaluationContext::new();
    let fref = ctx.evaluate_str("function('abs')").unwrap();
    assert_eq!(
        ctx.set_variable(None, "f", fref.clone(), false),
        Err(VimError::FuncrefVariableNameMustStartWithACapital(
            String::from("f")
        ))
    );
    ctx.set_variable(None, "F", fref, false).unwrap();
    assert_eq!(ctx.evaluate_str("F(-2)"), Ok(Value::Float(2.0)));
}

#[test]
fn assertions_accumulate_in_errors() {
    let mut ctx = EvaluationContext::new();
    assert_eq!(ctx.evaluate_str("assert_true(1)"), Ok(Value::Number(0)));
    assert_eq!(ctx.evaluate_str("assert_equal(1, 2)"), Ok(Value::Number(1)));
    assert_eq!(ctx.evaluate_str("assert_false('0')"), Ok(Value::Number(0)));
    assert_eq!(
        ctx.evaluate_str("assert_match('^a', 'banana', 'no match')"),
        Ok(Value::Number(1))
    );
    assert_eq!(ctx.errors(), ["Expected 1 but got 2", "no match"]);
    assert_eq!(ctx.evaluate_str("len(v:errors)"), Ok(Value::Number(2)));
}

#[test]
fn assert_equal_requires_same_type() {
    let mut ctx = EvaluationContext::new();
    // 4 == '4' coerces, but assert_equal() also checks the type
    assert_eq!(ctx.evaluate_str("assert_equal(4, '4')"), Ok(Value::Number(1)));
    assert_eq!(ctx.errors(), ["Expected 4 but got 4"]);
}

#[test]
fn registers_round_trip_through_the_editor() {
    let mut ctx = EvaluationContext::new();
    let mut buffer = ScratchBuffer::from_text("");
    ctx.evaluate_str_with("setreg('a', ['x', 'y'])", &mut buffer)
        .unwrap();
    assert_eq!(
        ctx.evaluate_str_with("getreg('a')", &mut buffer),
        Ok(Value::string("x\ny"))
    );
    assert_eq!(
        ctx.evaluate_str_with("getreg('q')", &mut buffer),
        Ok(Value::string(""))
    );
}

#[test]
fn has_reports_compiled_features() {
    assert_eq!(eval("has('eval')"), Ok(Value::Number(1)));
    assert_eq!(eval("has('float')"), Ok(Value::Number(1)));
    assert_eq!(eval("has('clipboard')"), Ok(Value::Number(0)));
}

proptest! {
    #[test]
    fn decimal_literals_evaluate_to_themselves(n in 0i64..1_000_000_000) {
        prop_assert_eq!(eval(&n.to_string()).unwrap(), Value::Number(n));
    }

    #[test]
    fn negation_round_trips(n in -1_000_000i64..1_000_000) {
        prop_assert_eq!(eval(&format!("-({n})")).unwrap(), Value::Number(-n));
    }

    #[test]
    fn range_length_matches_count(n in 0i64..100) {
        let items = eval(&format!("range({n})")).unwrap().expect_list().unwrap();
        prop_assert_eq!(items.borrow().len() as i64, n);
    }
}
