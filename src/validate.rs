use chrono::NaiveDate;

use crate::error::TaskError;
use crate::model::{Category, Priority};

/// Trim a title and reject it if nothing is left.
pub fn validate_title(title: &str) -> Result<String, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(title.to_string())
}

/// Parse a due date typed by the user.
///
/// Surrounding whitespace is ignored and an empty string means "no date".
/// Anything else must be exactly `YYYY-MM-DD` and name a real calendar day.
pub fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, TaskError> {
    let s = input.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let invalid = || TaskError::InvalidDate(s.to_string());
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| invalid())
}

pub fn parse_category(input: &str) -> Result<Category, TaskError> {
    Category::parse(input.trim()).ok_or_else(|| TaskError::UnknownCategory(input.to_string()))
}

pub fn parse_priority(input: &str) -> Result<Priority, TaskError> {
    Priority::parse(input.trim()).ok_or_else(|| TaskError::UnknownPriority(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_dates() {
        assert_eq!(
            parse_due_date("2026-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 15)
        );
        assert_eq!(
            parse_due_date("  2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn empty_date_is_none() {
        assert_eq!(parse_due_date("").unwrap(), None);
        assert_eq!(parse_due_date("   ").unwrap(), None);
    }

    #[test]
    fn invalid_dates() {
        assert!(parse_due_date("2026-02-30").is_err());
        assert!(parse_due_date("2026-1-5").is_err());
        assert!(parse_due_date("2026/01/05").is_err());
        assert!(parse_due_date("20260105").is_err());
        assert!(parse_due_date("tomorrow").is_err());
        assert!(parse_due_date("2025-02-29").is_err());
    }

    #[test]
    fn titles() {
        assert_eq!(validate_title("  write STAR story ").unwrap(), "write STAR story");
        assert_eq!(validate_title("   "), Err(TaskError::EmptyTitle));
    }

    #[test]
    fn category_and_priority_input() {
        assert_eq!(parse_category(" 면접").unwrap(), Category::Interview);
        assert_eq!(parse_priority("HIGH").unwrap(), Priority::High);
        assert!(parse_category("hobby").is_err());
        assert!(parse_priority("urgent").is_err());
    }
}
