//! Field checks applied before a record is stored.
//!
//! Each check returns [`Error::Validation`] naming the offending field, which
//! callers surface as a single message.

use chrono::NaiveTime;
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::sync::LazyLock;

use crate::constants::money;
use crate::error::{Error, Result};

/// Loose email shape: something@something.tld
#[allow(clippy::expect_used)]
static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex: RE_EMAIL")
});

/// Reject empty or whitespace-only values.
pub fn required(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "is required"));
    }
    Ok(())
}

/// Accept a money amount in whole cents, above zero and at most
/// [`money::MAX_AMOUNT`].
pub fn positive_amount(field: &'static str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::validation(field, format!("must be greater than zero, got {amount}")));
    }
    if amount > money::MAX_AMOUNT {
        return Err(Error::validation(field, format!("must not exceed {}, got {amount}", money::MAX_AMOUNT)));
    }
    let exact = Decimal::from_f64(amount)
        .ok_or_else(|| Error::validation(field, format!("{amount} is not a money amount")))?;
    if exact.normalize().scale() > money::DECIMAL_PLACES {
        return Err(Error::validation(field, format!("must be in whole cents, got {amount}")));
    }
    Ok(())
}

/// Check a basic email shape.
pub fn email(field: &'static str, value: &str) -> Result<()> {
    required(field, value)?;
    if !RE_EMAIL.is_match(value.trim()) {
        return Err(Error::validation(field, format!("'{value}' is not a valid email address")));
    }
    Ok(())
}

/// An end time must come strictly after the start time.
pub fn time_range(start: NaiveTime, end: NaiveTime) -> Result<()> {
    if end <= start {
        return Err(Error::validation(
            "endTime",
            format!("must be after start time ({} >= {})", start.format("%H:%M"), end.format("%H:%M")),
        ));
    }
    Ok(())
}

/// Parse a `HH:MM` (or `HH:MM:SS`) time string.
pub fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| Error::validation(field, format!("'{value}' is not a time (expected HH:MM)")))
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(field: &'static str, value: &str) -> Result<chrono::NaiveDate> {
    let value = value.trim();
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::validation(field, format!("'{value}' is not a date (expected YYYY-MM-DD)")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_required() {
        assert!(required("title", "Easter").is_ok());
        assert!(required("title", "   ").is_err());
    }

    #[test]
    fn test_positive_amount() {
        assert!(positive_amount("amount", 10.5).is_ok());
        assert!(positive_amount("amount", 0.0).is_err());
        assert!(positive_amount("amount", -3.0).is_err());
        assert!(positive_amount("amount", f64::NAN).is_err());
    }

    #[test]
    fn test_amount_must_be_whole_cents() {
        assert!(positive_amount("amount", 0.01).is_ok());
        assert!(positive_amount("amount", 19.99).is_ok());
        assert!(positive_amount("amount", 0.004).is_err());
        assert!(positive_amount("amount", 12.345).is_err());
    }

    #[test]
    fn test_amount_has_an_upper_bound() {
        assert!(positive_amount("amount", money::MAX_AMOUNT).is_ok());
        assert!(positive_amount("amount", 5e28).is_err());
        assert!(positive_amount("amount", 1e30).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(email("email", "pastor@church.org").is_ok());
        assert!(email("email", "pastor@church").is_err());
        assert!(email("email", "no spaces@church.org").is_err());
        assert!(email("email", "").is_err());
    }

    #[test]
    fn test_time_range_ordering() {
        let nine = parse_time("startTime", "09:00").unwrap();
        let eleven = parse_time("endTime", "11:00").unwrap();
        assert!(time_range(nine, eleven).is_ok());
        assert!(time_range(eleven, nine).is_err());
        assert!(time_range(nine, nine).is_err());
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert!(parse_time("startTime", "9am").is_err());
        assert_eq!(parse_time("startTime", "18:30:00").unwrap().format("%H:%M").to_string(), "18:30");
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("date", "2026-04-05").unwrap();
        assert_eq!(date.to_string(), "2026-04-05");
        assert!(parse_date("date", "04/05/2026").is_err());
    }
}
