//! Normalization of decimal text.
//!
//! Decimal fields keep exact decimal text instead of a binary float, so
//! equal quantities must serialize identically for change detection and
//! store-level comparison to work. The canonical form has an optional
//! leading `-`, no leading zeros on the integer part, no trailing zeros
//! on the fraction, and no exponent. Zero is always `0`, never `-0`.

/// Largest exponent magnitude the normalizer will expand into digits.
const MAX_EXPONENT: i64 = 4096;

/// Parses decimal text and rewrites it in canonical form.
///
/// Returns `None` when the input is not decimal text (or its exponent is
/// beyond [`MAX_EXPONENT`]).
pub(crate) fn normalize(input: &str) -> Option<String> {
    let s = input.trim();
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'+') => {
            pos += 1;
            false
        }
        Some(b'-') => {
            pos += 1;
            true
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        frac_digits = &s[frac_start..pos];
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent: i64 = 0;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        pos += 1;
        let exp_negative = match bytes.get(pos) {
            Some(b'+') => {
                pos += 1;
                false
            }
            Some(b'-') => {
                pos += 1;
                true
            }
            _ => false,
        };
        let exp_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if exp_start == pos {
            return None;
        }
        let magnitude: i64 = s[exp_start..pos].parse().ok()?;
        if magnitude > MAX_EXPONENT {
            return None;
        }
        exponent = if exp_negative { -magnitude } else { magnitude };
    }

    if pos != bytes.len() {
        return None;
    }

    let digits = format!("{int_digits}{frac_digits}");
    if digits.bytes().all(|b| b == b'0') {
        return Some("0".to_string());
    }

    // Position of the decimal point within the digit run after the
    // exponent shift. May fall outside the run on either side.
    let point = int_digits.len() as i64 + exponent;

    let (raw_int, raw_frac) = if point <= 0 {
        let pad = "0".repeat(point.unsigned_abs() as usize);
        ("0".to_string(), format!("{pad}{digits}"))
    } else if point as usize >= digits.len() {
        let pad = "0".repeat(point as usize - digits.len());
        (format!("{digits}{pad}"), String::new())
    } else {
        let (head, tail) = digits.split_at(point as usize);
        (head.to_string(), tail.to_string())
    };

    let integer_part = {
        let trimmed = raw_int.trim_start_matches('0');
        if trimmed.is_empty() { "0" } else { trimmed }
    };
    let fraction_part = raw_frac.trim_end_matches('0');

    let mut out = String::with_capacity(integer_part.len() + fraction_part.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(integer_part);
    if !fraction_part.is_empty() {
        out.push('.');
        out.push_str(fraction_part);
    }
    Some(out)
}
