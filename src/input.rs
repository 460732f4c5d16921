//! Validated quote input.
//!
//! Caller-supplied `miles` and `weight` are checked once here; everything past
//! this boundary works with finite, non-negative values only.

use crate::error::{QuoteError, Result};

/// A validated `(miles, weight)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteInput {
    miles: f64,
    weight: f64,
}

impl QuoteInput {
    /// Validates numeric input.
    ///
    /// # Errors
    ///
    /// [`QuoteError::InvalidInputType`] if either value is NaN or infinite,
    /// [`QuoteError::InvalidInputRange`] if either is negative.
    pub fn new(miles: f64, weight: f64) -> Result<Self> {
        Ok(Self {
            miles: check("miles", miles)?,
            weight: check("weight", weight)?,
        })
    }

    /// Validates textual input, as received from a command line or query string.
    ///
    /// Text that is not a number is an [`QuoteError::InvalidInputType`].
    pub fn parse(miles: &str, weight: &str) -> Result<Self> {
        Self::new(parse_field("miles", miles)?, parse_field("weight", weight)?)
    }

    pub fn miles(&self) -> f64 {
        self.miles
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Weight expressed in hundredweight units (`weight / 100`).
    pub fn hundredweight(&self) -> f64 {
        self.weight / 100.0
    }
}

fn parse_field(name: &str, raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        QuoteError::InvalidInputType(format!("{name} must be a finite number. Received: {raw}"))
    })
}

fn check(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(QuoteError::InvalidInputType(format!(
            "{name} must be a finite number. Received: {value}"
        )));
    }

    if value < 0.0 {
        return Err(QuoteError::InvalidInputRange(format!(
            "{name} must be non-negative. Received: {value}"
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_valid_input() {
        let input = QuoteInput::new(412.0, 7200.0).unwrap();
        assert_eq!(input.miles(), 412.0);
        assert_eq!(input.weight(), 7200.0);
        assert_eq!(input.hundredweight(), 72.0);
    }

    #[test]
    fn test_zero_is_valid() {
        assert!(QuoteInput::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_negative_is_range_error() {
        let err = QuoteInput::new(-1.0, 100.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInputRange);
        assert!(err.to_string().starts_with("miles"));

        let err = QuoteInput::new(1.0, -0.5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInputRange);
        assert!(err.to_string().starts_with("weight"));
    }

    #[test]
    fn test_non_finite_is_type_error() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = QuoteInput::new(bad, 100.0).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInputType);
        }
    }

    #[test]
    fn test_parse_text() {
        let input = QuoteInput::parse(" 30 ", "2100").unwrap();
        assert_eq!(input.miles(), 30.0);

        assert_eq!(
            QuoteInput::parse("x", "100").unwrap_err().kind(),
            ErrorKind::InvalidInputType
        );
        assert_eq!(
            QuoteInput::parse("", "100").unwrap_err().kind(),
            ErrorKind::InvalidInputType
        );
        assert_eq!(
            QuoteInput::parse("-1", "100").unwrap_err().kind(),
            ErrorKind::InvalidInputRange
        );
        assert_eq!(
            QuoteInput::parse("10", "NaN").unwrap_err().kind(),
            ErrorKind::InvalidInputType
        );
    }
}
