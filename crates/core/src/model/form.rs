//! Shared coercions for raw form input.

use chrono::NaiveDate;

/// Calendar date format used by every date field (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Outcome of coercing a numeric form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Positive {
    Missing,
    Value(u32),
    Invalid,
}

/// Coerces a raw numeric field, accepting only integers > 0.
pub(crate) fn parse_positive(raw: Option<&str>) -> Positive {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Positive::Missing;
    };
    match raw.parse::<i64>() {
        Ok(v) if v > 0 => u32::try_from(v).map_or(Positive::Invalid, Positive::Value),
        _ => Positive::Invalid,
    }
}

/// Outcome of coercing an optional date field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateInput {
    Missing,
    Value(NaiveDate),
    Invalid,
}

pub(crate) fn parse_date(raw: Option<&str>) -> DateInput {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DateInput::Missing;
    };
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_or(DateInput::Invalid, DateInput::Value)
}

/// Loose structural email check: `local@domain.tld`, no whitespace.
#[must_use]
pub fn is_valid_email(raw: &str) -> bool {
    let email = raw.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_positive_rejects_zero_and_negatives() {
        assert_eq!(parse_positive(Some("0")), Positive::Invalid);
        assert_eq!(parse_positive(Some("-3")), Positive::Invalid);
        assert_eq!(parse_positive(Some("abc")), Positive::Invalid);
        assert_eq!(parse_positive(Some(" 12 ")), Positive::Value(12));
        assert_eq!(parse_positive(Some("   ")), Positive::Missing);
        assert_eq!(parse_positive(None), Positive::Missing);
    }

    #[test]
    fn parse_date_requires_iso_calendar_date() {
        assert_eq!(
            parse_date(Some("2024-02-29")),
            DateInput::Value(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(parse_date(Some("2023-02-29")), DateInput::Invalid);
        assert_eq!(parse_date(Some("29/02/2024")), DateInput::Invalid);
        assert_eq!(parse_date(Some("")), DateInput::Missing);
    }

    #[test]
    fn email_check_matches_common_shapes() {
        assert!(is_valid_email("reader@example.com"));
        assert!(is_valid_email("  a.b+c@mail.example.org "));
        assert!(!is_valid_email("reader@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("reader example@x.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn normalize_optional_drops_blank_values() {
        assert_eq!(normalize_optional(Some("  hi ".into())), Some("hi".into()));
        assert_eq!(normalize_optional(Some("   ".into())), None);
        assert_eq!(normalize_optional(None), None);
    }
}
