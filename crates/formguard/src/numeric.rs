//! Numeric string recognition.
//!
//! Accepts an optional sign, digits with an optional decimal point, and an
//! optional exponent: `"42"`, `"-3.5"`, `".5"`, `"7."`, `"1e3"`, `"+2.5E-4"`.
//! Surrounding whitespace is rejected; callers trim first.

/// A parsed number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer literal that fits in `i64`
    Integer(i64),
    /// Everything else: decimals, exponents, out-of-range integers
    Float(f64),
}

impl Number {
    /// The number as `f64`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

/// Check whether `input` is a numeric string.
pub fn is_numeric(input: &str) -> bool {
    scan(input).is_some()
}

/// Parse a numeric string.
///
/// Integer literals that overflow `i64` come back as [`Number::Float`] so
/// the caller can decide how to report the overflow.
pub fn parse_number(input: &str) -> Option<Number> {
    let shape = scan(input)?;
    if shape.is_integral() {
        if let Ok(i) = input.parse::<i64>() {
            return Some(Number::Integer(i));
        }
    }
    input.parse::<f64>().ok().map(Number::Float)
}

/// Outcome of truncating a number toward zero into `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncated {
    /// The truncated value fits.
    Integer(i64),
    /// The truncated value is above `i64::MAX`.
    Overflow,
    /// The truncated value is below `i64::MIN`, or the input was NaN.
    Invalid,
}

// i64::MAX has 19 digits.
const I64_DIGITS: usize = 19;

// 2^63; every f64 at or above this is outside i64.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Truncate a numeric string toward zero into `i64`, or `None` if it is
/// not numeric.
///
/// Works on the decimal digits directly, so long literals and exponent
/// forms are exact: `"9223372036854775807.0"` fits and
/// `"-9223372036854775809"` does not.
pub fn truncate_to_i64(input: &str) -> Option<Truncated> {
    let shape = scan(input)?;

    let exponent = match shape.exponent {
        None => 0,
        Some(e) => e.parse::<i64>().unwrap_or(if e.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }),
    };
    let scale = exponent.saturating_sub(shape.fraction.len() as i64);

    let mut digits = String::with_capacity(shape.whole.len() + shape.fraction.len());
    digits.push_str(shape.whole);
    digits.push_str(shape.fraction);
    let significant = digits.trim_start_matches('0');

    let whole_digits = if significant.is_empty() {
        0
    } else if scale >= 0 {
        significant.len() as u64 + scale as u64
    } else {
        (significant.len() as u64).saturating_sub(scale.unsigned_abs())
    };

    let out_of_range = if shape.negative {
        Truncated::Invalid
    } else {
        Truncated::Overflow
    };
    if whole_digits > I64_DIGITS as u64 {
        return Some(out_of_range);
    }
    if whole_digits == 0 {
        return Some(Truncated::Integer(0));
    }

    // At most 19 digits from here, so the scale is small.
    let mut whole = String::with_capacity(I64_DIGITS);
    if scale >= 0 {
        whole.push_str(significant);
        whole.extend(std::iter::repeat('0').take(scale as usize));
    } else {
        whole.push_str(&significant[..whole_digits as usize]);
    }

    let magnitude: i128 = whole.parse().ok()?;
    let value = if shape.negative { -magnitude } else { magnitude };
    Some(match i64::try_from(value) {
        Ok(i) => Truncated::Integer(i),
        Err(_) => out_of_range,
    })
}

/// Truncate an `f64` toward zero into `i64`.
pub fn truncate_f64(value: f64) -> Truncated {
    if value.is_nan() || value < -I64_UPPER {
        Truncated::Invalid
    } else if value >= I64_UPPER {
        Truncated::Overflow
    } else {
        Truncated::Integer(value.trunc() as i64)
    }
}

struct Shape<'a> {
    negative: bool,
    whole: &'a str,
    fraction: &'a str,
    has_point: bool,
    exponent: Option<&'a str>,
}

impl Shape<'_> {
    fn is_integral(&self) -> bool {
        !self.has_point && self.exponent.is_none()
    }
}

fn scan(input: &str) -> Option<Shape<'_>> {
    let bytes = input.as_bytes();
    let mut i = 0;

    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let whole_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let whole = &input[whole_start..i];

    let mut fraction = "";
    let mut has_point = false;
    if i < bytes.len() && bytes[i] == b'.' {
        has_point = true;
        i += 1;
        let fraction_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        fraction = &input[fraction_start..i];
    }

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut exponent = None;
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        let exp_start = i;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits_start {
            return None;
        }
        exponent = Some(&input[exp_start..i]);
    }

    if i != bytes.len() {
        return None;
    }

    Some(Shape {
        negative,
        whole,
        fraction,
        has_point,
        exponent,
    })
}
