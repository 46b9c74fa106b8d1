//! Type-safe student identifier.
//!
//! [`StudentId`] is a newtype wrapper around the `i64` primary key assigned
//! by the store, so student ids cannot be confused with ages or counts.

use std::fmt;
use std::str::FromStr;

/// Unique identifier of a student record.
///
/// Assigned by the store on insert, strictly increasing, never reused and
/// immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentId(i64);

impl StudentId {
    /// Wraps a raw primary key.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw primary key.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StudentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_path_segment() {
        let Ok(id) = "42".parse::<StudentId>() else {
            panic!("valid id");
        };
        assert_eq!(id.get(), 42);
    }

    #[test]
    fn rejects_non_numeric_segment() {
        assert!("abc".parse::<StudentId>().is_err());
        assert!("".parse::<StudentId>().is_err());
    }

    #[test]
    fn orders_by_raw_value() {
        assert!(StudentId::new(1) < StudentId::new(2));
    }
}
