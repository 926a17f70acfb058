//! Text-to-number coercion for cell values.
//!
//! Two flavours are used by the evaluator:
//!
//! - [`strict_number`]: the whole (trimmed) text must be numeric. Empty text is
//!   `0`. Used when reading cells for `SUM`/`AVERAGE` ranges.
//! - [`leading_number`]: the longest numeric prefix wins (`"12px"` -> `12`).
//!   Used for bare cell references.

use regex::Regex;
use std::sync::OnceLock;

fn decimal_re() -> &'static Regex {
    static DECIMAL_RE: OnceLock<Regex> = OnceLock::new();
    DECIMAL_RE.get_or_init(|| {
        Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$")
            .expect("decimal literal regex must compile")
    })
}

fn leading_re() -> &'static Regex {
    static LEADING_RE: OnceLock<Regex> = OnceLock::new();
    LEADING_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(Infinity|([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?)")
            .expect("leading number regex must compile")
    })
}

/// Parse the entire text as a number. Returns `None` for non-numeric text.
pub fn strict_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    if let Some(n) = radix_integer(trimmed) {
        return Some(n);
    }

    if decimal_re().is_match(trimmed) {
        return trimmed.parse::<f64>().ok();
    }

    None
}

/// Parse the longest numeric prefix of the text (after leading whitespace).
pub fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let m = leading_re().find(trimmed)?;
    let literal = m.as_str();
    match literal.trim_start_matches(['+', '-']) {
        "Infinity" if literal.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => literal.parse::<f64>().ok(),
    }
}

/// `0x`/`0o`/`0b` prefixed unsigned integers.
fn radix_integer(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    text[2..].chars().try_fold(0f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}
