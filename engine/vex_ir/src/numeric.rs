//! The numeric-literal surface grammar.
//!
//! Shared by the expression parser (literal tokens) and the evaluator
//! (string-to-number coercion uses the same grammar as a prefix scan, so
//! `"0xff" + 1` is 256 and `"junk" + 1` is 1).
//!
//! Bases: `0b`/`0B` binary, `0x`/`0X` hex, leading-zero octal, else decimal.
//! The octal form is only taken when every digit is 0–7; a digit string like
//! `012345678` contains an 8 and therefore parses as decimal. This ambiguity
//! is Vim-compatible and deliberately preserved.

/// Parse a number literal at the start of `s`.
///
/// Returns the value and the number of bytes consumed. An optional leading
/// `+`/`-` sign is accepted. Returns `None` when `s` does not start with a
/// number at all (a bare sign does not count).
pub fn parse_number_prefix(s: &str) -> Option<(i64, usize)> {
    let bytes = s.as_bytes();
    let (sign, start) = match bytes.first() {
        Some(b'-') => (-1i64, 1),
        Some(b'+') => (1i64, 1),
        _ => (1i64, 0),
    };
    let rest = &s[start..];

    let (magnitude, digits_len) = parse_unsigned_prefix(rest)?;
    Some((sign.wrapping_mul(magnitude), start + digits_len))
}

/// Unsigned body of a number literal; no sign handling.
fn parse_unsigned_prefix(s: &str) -> Option<(i64, usize)> {
    let bytes = s.as_bytes();

    // 0b / 0B binary, if at least one binary digit follows.
    if bytes.len() > 2 && bytes[0] == b'0' && (bytes[1] | 0x20) == b'b' {
        let digits: usize = bytes[2..]
            .iter()
            .take_while(|b| matches!(b, b'0' | b'1'))
            .count();
        if digits > 0 {
            let val = radix_value(&s[2..2 + digits], 2);
            return Some((val, 2 + digits));
        }
    }

    // 0x / 0X hexadecimal, if at least one hex digit follows.
    if bytes.len() > 2 && bytes[0] == b'0' && (bytes[1] | 0x20) == b'x' {
        let digits: usize = bytes[2..]
            .iter()
            .take_while(|b| b.is_ascii_hexdigit())
            .count();
        if digits > 0 {
            let val = radix_value(&s[2..2 + digits], 16);
            return Some((val, 2 + digits));
        }
    }

    // Decimal, or octal when there is a leading zero and no digit 8/9.
    let digits: usize = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let text = &s[..digits];
    let radix = if text.starts_with('0') && text.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        8
    } else {
        10
    };
    Some((radix_value(text, radix), digits))
}

/// Wrapping base conversion; Vim numbers silently wrap at 64 bits.
fn radix_value(digits: &str, radix: i64) -> i64 {
    let mut val: i64 = 0;
    for b in digits.bytes() {
        let d = match b {
            b'0'..=b'9' => i64::from(b - b'0'),
            b'a'..=b'f' => i64::from(b - b'a' + 10),
            b'A'..=b'F' => i64::from(b - b'A' + 10),
            _ => 0,
        };
        val = val.wrapping_mul(radix).wrapping_add(d);
    }
    val
}

/// Parse `s` as a float literal: digits, `.`, digits, optional `e`/`E`
/// exponent with optional sign. The entire string must match.
///
/// This mirrors `str2float()`'s acceptance: `"1.5"` and `"1.5e-2"` parse,
/// `"12"` (no dot) and `"1.5 trailing"` do not.
pub fn parse_float_exact(s: &str) -> Option<f64> {
    let (value, len) = parse_float_prefix(s)?;
    (len == s.len()).then_some(value)
}

/// Parse a float literal at the start of `s`, returning value and length.
pub fn parse_float_prefix(s: &str) -> Option<(f64, usize)> {
    let bytes = s.as_bytes();
    let int_digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if int_digits == 0 || bytes.get(int_digits) != Some(&b'.') {
        return None;
    }
    let frac_start = int_digits + 1;
    let frac_digits = bytes[frac_start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if frac_digits == 0 {
        return None;
    }
    let mut end = frac_start + frac_digits;

    // Optional exponent: e/E, optional sign, at least one digit. If the tail
    // does not complete, the float ends before the `e`.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().map(|v| (v, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decimal_and_signed() {
        assert_eq!(parse_number_prefix("42"), Some((42, 2)));
        assert_eq!(parse_number_prefix("-42"), Some((-42, 3)));
        assert_eq!(parse_number_prefix("+7 rest"), Some((7, 2)));
        assert_eq!(parse_number_prefix("abc"), None);
        assert_eq!(parse_number_prefix("-"), None);
    }

    #[test]
    fn hex_and_binary() {
        assert_eq!(parse_number_prefix("0xff"), Some((255, 4)));
        assert_eq!(parse_number_prefix("0XFF"), Some((255, 4)));
        assert_eq!(parse_number_prefix("0b01111"), Some((15, 7)));
        // `0x` with no hex digit falls back to the leading zero.
        assert_eq!(parse_number_prefix("0xg"), Some((0, 1)));
        assert_eq!(parse_number_prefix("0b2"), Some((0, 1)));
    }

    #[test]
    fn octal_unless_it_contains_8_or_9() {
        assert_eq!(parse_number_prefix("012345"), Some((5349, 6)));
        assert_eq!(parse_number_prefix("012345678"), Some((12_345_678, 9)));
        assert_eq!(parse_number_prefix("0"), Some((0, 1)));
    }

    #[test]
    fn prefix_stops_at_non_digit() {
        assert_eq!(parse_number_prefix("4abc"), Some((4, 1)));
        assert_eq!(parse_number_prefix("17,18"), Some((17, 2)));
    }

    #[test]
    fn float_exact() {
        assert_eq!(parse_float_exact("1.5"), Some(1.5));
        assert_eq!(parse_float_exact("1.5e2"), Some(150.0));
        assert_eq!(parse_float_exact("1.5E-2"), Some(0.015));
        assert_eq!(parse_float_exact("12"), None);
        assert_eq!(parse_float_exact("1."), None);
        assert_eq!(parse_float_exact("1.5 "), None);
    }

    #[test]
    fn float_prefix_without_exponent_tail() {
        // `1.5e` has no exponent digits, so the float ends at the `5`.
        assert_eq!(parse_float_prefix("1.5e"), Some((1.5, 3)));
        assert_eq!(parse_float_prefix("3.25rest"), Some((3.25, 4)));
    }
}
