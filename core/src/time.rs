//! Human-friendly due date input.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};

use crate::error::{Error, Result};

/// Parses `today`, `tomorrow`, `+Nd`, `+Nw`, a weekday name, `YYYY-MM-DD` or
/// `YYYY-MM-DD HH:MM`. Date-only forms resolve to 23:59:59 local time.
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>> {
    parse_due_date_on(input, Local::now().date_naive())
}

pub fn parse_due_date_on(input: &str, today: NaiveDate) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let lower = input.to_lowercase();

    match lower.as_str() {
        "" => return Err(Error::invalid("Empty due date")),
        "today" | "tod" => return end_of_day(today),
        "tomorrow" | "tom" => return end_of_day(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = lower.strip_prefix('+') {
        let date = today
            .checked_add_signed(parse_offset(rest)?)
            .ok_or_else(|| Error::invalid("Relative date out of range"))?;
        return end_of_day(date);
    }

    if let Some(weekday) = parse_weekday(&lower) {
        let current = today.weekday().num_days_from_monday() as i64;
        let target = weekday.num_days_from_monday() as i64;
        let mut ahead = target - current;
        if ahead <= 0 {
            ahead += 7;
        }
        return end_of_day(today + Duration::days(ahead));
    }

    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return to_utc(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return end_of_day(date);
    }

    Err(Error::invalid(format!("Could not parse date: {}", input)))
}

fn parse_offset(rest: &str) -> Result<Duration> {
    let unit_at = rest
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| Error::invalid(format!("Missing unit in '+{}'", rest)))?;
    let (num, unit) = rest.split_at(unit_at);
    let count: i64 = num
        .parse()
        .map_err(|_| Error::invalid(format!("Invalid relative date '+{}'", rest)))?;

    let span = match unit {
        "d" => Duration::try_days(count),
        "w" => Duration::try_weeks(count),
        _ => return Err(Error::invalid(format!("Unknown unit in relative date: {}", unit))),
    };
    span.ok_or_else(|| Error::invalid("Relative date out of range"))
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn end_of_day(date: NaiveDate) -> Result<DateTime<Utc>> {
    let dt = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| Error::invalid(format!("Invalid date: {}", date)))?;
    to_utc(dt)
}

fn to_utc(dt: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&dt)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| Error::invalid(format!("{} does not exist in local time", dt)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-05-13 is a Wednesday.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 13).unwrap()
    }

    fn local_day(dt: DateTime<Utc>) -> NaiveDate {
        DateTime::<Local>::from(dt).date_naive()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(local_day(parse_due_date_on("today", today()).unwrap()), today());
        assert_eq!(
            local_day(parse_due_date_on("Tomorrow", today()).unwrap()),
            NaiveDate::from_ymd_opt(2026, 5, 14).unwrap()
        );
    }

    #[test]
    fn test_relative_offsets() {
        assert_eq!(
            local_day(parse_due_date_on("+3d", today()).unwrap()),
            NaiveDate::from_ymd_opt(2026, 5, 16).unwrap()
        );
        assert_eq!(
            local_day(parse_due_date_on("+2w", today()).unwrap()),
            NaiveDate::from_ymd_opt(2026, 5, 27).unwrap()
        );
        assert!(parse_due_date_on("+3m", today()).is_err());
        assert!(parse_due_date_on("+d", today()).is_err());
        assert!(parse_due_date_on("+12", today()).is_err());
    }

    #[test]
    fn test_relative_offset_out_of_range_is_error() {
        for input in ["+999999999d", "+99999999999999999w", "+99999999999999999999d"] {
            let err = parse_due_date_on(input, today()).unwrap_err();
            assert!(matches!(err, Error::InvalidTaskData(_)), "{}", input);
        }
    }

    #[test]
    fn test_weekday_is_next_occurrence() {
        assert_eq!(
            local_day(parse_due_date_on("fri", today()).unwrap()),
            NaiveDate::from_ymd_opt(2026, 5, 15).unwrap()
        );
        // Same weekday means a week from today.
        assert_eq!(
            local_day(parse_due_date_on("wednesday", today()).unwrap()),
            NaiveDate::from_ymd_opt(2026, 5, 20).unwrap()
        );
    }

    #[test]
    fn test_absolute_formats() {
        let date_only = parse_due_date_on("2026-12-31", today()).unwrap();
        assert_eq!(local_day(date_only), NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());

        let with_time = parse_due_date_on("2026-12-31 09:30", today()).unwrap();
        assert_eq!(
            DateTime::<Local>::from(with_time).format("%H:%M").to_string(),
            "09:30"
        );

        assert!(parse_due_date_on("31/12/2026", today()).is_err());
        assert!(parse_due_date_on("", today()).is_err());
    }
}
