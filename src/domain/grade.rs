//! Fixed-point grade with two decimal places.
//!
//! [`Grade`] stores hundredths in an `i32`, so `8.50` is `850`. Grades are
//! limited to four significant digits (two before and two after the point),
//! matching a `NUMERIC(4, 2)` column. Parsing goes through text so that
//! `8.5` from JSON never passes through binary floating point on its way
//! into the store.

use std::fmt;
use std::str::FromStr;

/// Number of digits allowed after the decimal point.
pub const DECIMAL_PLACES: usize = 2;

/// Number of digits allowed before the decimal point.
pub const MAX_WHOLE_DIGITS: usize = 2;

/// Total significant digits allowed.
pub const MAX_DIGITS: usize = DECIMAL_PLACES + MAX_WHOLE_DIGITS;

const MAX_HUNDREDTHS: u64 = 9_999;

/// Reasons a grade can be rejected. The messages are the ones returned to
/// API clients in the field-error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GradeError {
    /// Not a decimal number at all.
    #[error("A valid number is required.")]
    Invalid,
    /// More significant digits than the column holds.
    #[error("Ensure that there are no more than 4 digits in total.")]
    TooManyDigits,
    /// More than two fractional digits.
    #[error("Ensure that there are no more than 2 decimal places.")]
    TooManyDecimalPlaces,
    /// More than two digits before the decimal point.
    #[error("Ensure that there are no more than 2 digits before the decimal point.")]
    TooManyWholeDigits,
}

/// A student's average grade, exact to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Grade(i32);

impl Grade {
    /// Builds a grade from hundredths. Returns `None` when the value needs
    /// more than four digits.
    #[must_use]
    pub fn from_hundredths(hundredths: i64) -> Option<Self> {
        if hundredths.unsigned_abs() > MAX_HUNDREDTHS {
            return None;
        }
        i32::try_from(hundredths).ok().map(Self)
    }

    /// Returns the grade in hundredths.
    #[must_use]
    pub const fn hundredths(self) -> i32 {
        self.0
    }

    /// Arithmetic mean of grades whose sum (in hundredths) is `sum` over
    /// `count` values, rounded to two decimals with ties away from zero.
    ///
    /// Returns `None` for an empty set.
    #[must_use]
    pub fn mean(sum: i64, count: u64) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let sum = i128::from(sum);
        let count = i128::from(count);
        let magnitude = (2 * sum.abs() + count) / (2 * count);
        let rounded = if sum < 0 { -magnitude } else { magnitude };
        i64::try_from(rounded).ok().and_then(Self::from_hundredths)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Grade {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = DecimalParts::split(s)?;
        if parts.whole.len() + parts.frac.len() > MAX_DIGITS {
            return Err(GradeError::TooManyDigits);
        }
        if parts.frac.len() > DECIMAL_PLACES {
            return Err(GradeError::TooManyDecimalPlaces);
        }
        if parts.whole.len() > MAX_WHOLE_DIGITS {
            return Err(GradeError::TooManyWholeDigits);
        }
        let hundredths = parts.hundredths()?;
        Self::from_hundredths(hundredths).ok_or(GradeError::TooManyWholeDigits)
    }
}

/// Parses an arbitrary decimal with at most two fractional digits into
/// hundredths. Used for sums, which may exceed the range of a single grade.
///
/// # Errors
///
/// Returns [`GradeError::Invalid`] on malformed or overflowing input and
/// [`GradeError::TooManyDecimalPlaces`] when more than two fractional
/// digits are significant.
pub fn parse_hundredths(text: &str) -> Result<i64, GradeError> {
    let parts = DecimalParts::split(text)?;
    if parts.frac.len() > DECIMAL_PLACES {
        return Err(GradeError::TooManyDecimalPlaces);
    }
    parts.hundredths()
}

/// Sign, whole digits without leading zeros and fractional digits without
/// trailing zeros.
struct DecimalParts<'a> {
    negative: bool,
    whole: &'a str,
    frac: &'a str,
}

impl<'a> DecimalParts<'a> {
    fn split(text: &'a str) -> Result<Self, GradeError> {
        let text = text.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(GradeError::Invalid);
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) {
            return Err(GradeError::Invalid);
        }
        Ok(Self {
            negative,
            whole: whole.trim_start_matches('0'),
            frac: frac.trim_end_matches('0'),
        })
    }

    fn hundredths(&self) -> Result<i64, GradeError> {
        let whole: i64 = if self.whole.is_empty() {
            0
        } else {
            self.whole.parse().map_err(|_| GradeError::Invalid)?
        };
        let cents = self
            .frac
            .bytes()
            .zip([10_i64, 1])
            .map(|(digit, weight)| i64::from(digit - b'0') * weight)
            .sum::<i64>();
        let magnitude = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(cents))
            .ok_or(GradeError::Invalid)?;
        Ok(if self.negative { -magnitude } else { magnitude })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn grade(s: &str) -> Grade {
        let Ok(g) = s.parse() else {
            panic!("{s} should parse");
        };
        g
    }

    #[test]
    fn parses_and_formats_two_decimals() {
        assert_eq!(grade("8.5").hundredths(), 850);
        assert_eq!(grade("8.5").to_string(), "8.50");
        assert_eq!(grade("10").to_string(), "10.00");
        assert_eq!(grade("99.99").hundredths(), 9_999);
        assert_eq!(grade(".5").to_string(), "0.50");
        assert_eq!(grade("-0.5").to_string(), "-0.50");
    }

    #[test]
    fn ignores_insignificant_zeros() {
        assert_eq!(grade("08.500"), grade("8.5"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!("100".parse::<Grade>(), Err(GradeError::TooManyWholeDigits));
        assert_eq!("8.555".parse::<Grade>(), Err(GradeError::TooManyDecimalPlaces));
        assert_eq!("123.45".parse::<Grade>(), Err(GradeError::TooManyDigits));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", ".", "abc", "8,5", "1e3", "NaN", "--1"] {
            assert_eq!(bad.parse::<Grade>(), Err(GradeError::Invalid), "{bad}");
        }
    }

    #[test]
    fn mean_rounds_half_away_from_zero() {
        assert_eq!(Grade::mean(2_700, 3), Some(grade("9.00")));
        // 8.005 -> 8.01
        assert_eq!(Grade::mean(1_601, 2), Some(grade("8.01")));
        // 48.02 / 3 = 16.0066..
        assert_eq!(Grade::mean(4_802, 3), Some(grade("16.01")));
        assert_eq!(Grade::mean(-1_601, 2), Some(grade("-8.01")));
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(Grade::mean(0, 0), None);
    }

    #[test]
    fn parse_hundredths_accepts_large_sums() {
        assert_eq!(parse_hundredths("12345.67"), Ok(1_234_567));
        assert_eq!(parse_hundredths("0"), Ok(0));
        assert_eq!(parse_hundredths("1.234"), Err(GradeError::TooManyDecimalPlaces));
    }
}
