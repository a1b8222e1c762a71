use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Entity-level checks. Implementations must not touch the store.
pub trait Validate {
    fn validate(&self) -> AppResult<()>;
}

/// Names of the fields that are absent or blank after trimming.
pub fn missing_fields<'a>(fields: &[(&'a str, Option<&str>)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect()
}

pub fn require(fields: &[(&str, Option<&str>)]) -> AppResult<()> {
    let missing = missing_fields(fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Empty or absent emails pass; anything else has to look like one.
pub fn check_email(field: &str, value: Option<&str>) -> AppResult<()> {
    match value.map(str::trim) {
        None | Some("") => Ok(()),
        Some(v) if is_valid_email(v) => Ok(()),
        Some(_) => Err(AppError::validation(format!(
            "{field} must be a valid email address"
        ))),
    }
}

/// Money and salary fields arrive as text; they must parse to a finite,
/// non-negative number.
pub fn check_amount(field: &str, value: &str) -> AppResult<f64> {
    let parsed = value
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| AppError::validation(format!("{field} must be a number")))?;

    if !parsed.is_finite() || parsed < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(parsed)
}

pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if start > end {
        return Err(AppError::validation(
            "startDate cannot be after endDate".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_absent_fields_are_missing() {
        let missing = missing_fields(&[
            ("firstName", Some("Ada")),
            ("lastName", Some("   ")),
            ("department", None),
            ("position", Some("Analyst")),
        ]);
        assert_eq!(missing, vec!["lastName", "department"]);
    }

    #[test]
    fn require_lists_every_missing_field() {
        let err = require(&[("salary", Some("")), ("dateHired", None)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: salary, dateHired"
        );
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@mail.co.uk"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.com"));
        assert!(!is_valid_email("@x.com"));
    }

    #[test]
    fn optional_email_may_be_blank() {
        assert!(check_email("email", None).is_ok());
        assert!(check_email("email", Some("  ")).is_ok());
        assert!(check_email("email", Some("nope")).is_err());
    }

    #[test]
    fn amounts() {
        assert_eq!(check_amount("salary", "50000").unwrap(), 50000.0);
        assert_eq!(check_amount("salary", " 1,250.50 ").unwrap(), 1250.5);
        assert!(check_amount("salary", "-5").is_err());
        assert!(check_amount("salary", "lots").is_err());
        assert!(check_amount("salary", "NaN").is_err());
    }

    #[test]
    fn date_range_is_inclusive() {
        let day = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
        assert!(check_date_range(day(1), day(1)).is_ok());
        assert!(check_date_range(day(1), day(4)).is_ok());
        assert!(check_date_range(day(4), day(1)).is_err());
    }
}
