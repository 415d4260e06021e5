//! Sheet dates are day-first text (`DD/MM/YYYY`); some rows carry ISO dates.

use chrono::{Datelike, NaiveDate};

/// Sentinel used for missing or unparseable dates: never "today", never "this month".
pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Parses `DD/MM/YYYY`, falling back to ISO `YYYY-MM-DD` (with or without a time part).
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() == 3 {
        let day = parts[0].trim().parse::<u32>().ok()?;
        let month = parts[1].trim().parse::<u32>().ok()?;
        let year = parts[2].trim().parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn parse_date_or_epoch(raw: Option<&str>) -> NaiveDate {
    raw.and_then(parse_day_first).unwrap_or_else(epoch)
}

pub fn is_same_day(date: NaiveDate, today: NaiveDate) -> bool {
    date == today
}

pub fn is_same_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month()
}

/// Default issue date for a new order form.
pub fn today_day_first(today: NaiveDate) -> String {
    today.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_day_first() {
        assert_eq!(parse_day_first("05/03/2025"), Some(date(2025, 3, 5)));
        assert_eq!(parse_day_first("5/3/2025"), Some(date(2025, 3, 5)));
        assert_eq!(parse_day_first("2025-03-05"), Some(date(2025, 3, 5)));
        assert_eq!(parse_day_first("2025-03-05T10:00:00Z"), Some(date(2025, 3, 5)));
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_day_first(""), None);
        assert_eq!(parse_day_first("31/02/2025"), None);
        assert_eq!(parse_day_first("amanhã"), None);
        assert_eq!(parse_date_or_epoch(Some("??")), epoch());
        assert_eq!(parse_date_or_epoch(None), epoch());
    }

    #[test]
    fn test_month_membership() {
        let today = date(2025, 3, 20);
        assert!(is_same_month(date(2025, 3, 1), today));
        assert!(!is_same_month(date(2024, 3, 1), today));
        assert!(is_same_day(date(2025, 3, 20), today));
        assert!(!is_same_day(epoch(), today));
    }

    #[test]
    fn test_today_day_first() {
        assert_eq!(today_day_first(date(2025, 1, 7)), "07/01/2025");
    }
}
