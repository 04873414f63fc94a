// date.rs - Absolute and relative date resolution

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, Months, NaiveDate, TimeZone, Utc, Weekday,
};
use regex::Regex;
use std::sync::OnceLock;

use crate::error::DateError;

/// Resolved point in time. Absolute inputs keep their explicit offset,
/// everything else is expressed in UTC.
pub type Timestamp = DateTime<FixedOffset>;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parse `text` relative to the current wall-clock time.
///
/// The clock is read on every call.
pub fn parse_date_now(text: &str) -> Result<Timestamp, DateError> {
    parse_date(text, Utc::now())
}

/// Parse `text` into an absolute timestamp.
///
/// Absolute forms are tried first, in order: `YYYY-MM-DD`, `YYYY/MM/DD`,
/// RFC3339, `YYYY`, `YYYY-MM` and `Month Dayth Year`. Relative expressions
/// (`last year`, `last monday`, `10 days ago`, ...) are anchored to `now`.
pub fn parse_date(text: &str, now: DateTime<Utc>) -> Result<Timestamp, DateError> {
    let trimmed = text.trim();
    parse_absolute(trimmed)
        .or_else(|| parse_relative(trimmed, now))
        .ok_or_else(|| DateError::new(text))
}

fn parse_absolute(text: &str) -> Option<Timestamp> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return midnight_utc(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y/%m/%d") {
        return midnight_utc(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime);
    }
    if let Some(caps) = year_regex().captures(text) {
        let year = caps[1].parse().ok()?;
        return midnight_utc(NaiveDate::from_ymd_opt(year, 1, 1)?);
    }
    if let Some(caps) = year_month_regex().captures(text) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        return midnight_utc(NaiveDate::from_ymd_opt(year, month, 1)?);
    }
    if let Some(caps) = natural_regex().captures(text) {
        let month = month_from_name(&caps[1])?;
        let day = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        return midnight_utc(NaiveDate::from_ymd_opt(year, month, day)?);
    }
    None
}

fn parse_relative(text: &str, now: DateTime<Utc>) -> Option<Timestamp> {
    let normalized = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if let Some(unit) = normalized.strip_prefix("last ") {
        let resolved = match unit {
            "year" => now.checked_sub_months(Months::new(12))?,
            "month" => now.checked_sub_months(Months::new(1))?,
            "hour" => now.checked_sub_signed(Duration::try_hours(1)?)?,
            "week" => return previous_weekday(now, Weekday::Mon),
            day => return previous_weekday(now, day.parse::<Weekday>().ok()?),
        };
        return Some(resolved.fixed_offset());
    }

    let caps = ago_regex().captures(&normalized)?;
    let amount: u32 = caps[1].parse().ok()?;
    let resolved = match &caps[2] {
        "hour" => now.checked_sub_signed(Duration::try_hours(amount.into())?)?,
        "day" => now.checked_sub_signed(Duration::try_days(amount.into())?)?,
        "week" => now.checked_sub_signed(Duration::try_weeks(amount.into())?)?,
        "month" => now.checked_sub_months(Months::new(amount))?,
        "year" => now.checked_sub_months(Months::new(amount.checked_mul(12)?))?,
        _ => return None,
    };
    Some(resolved.fixed_offset())
}

/// Most recent `weekday` strictly before the day of `now`, at midnight.
fn previous_weekday(now: DateTime<Utc>, weekday: Weekday) -> Option<Timestamp> {
    let today = now.date_naive();
    let mut back = (today.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
    if back == 0 {
        back = 7;
    }
    midnight_utc(today.checked_sub_days(Days::new(back.into()))?)
}

fn midnight_utc(date: NaiveDate) -> Option<Timestamp> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive).fixed_offset())
}

fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|month| month.starts_with(name.as_str()))
        .map(|idx| idx as u32 + 1)
}

fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})$").expect("valid year regex"))
}

fn year_month_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{1,2})$").expect("valid year-month regex"))
}

fn natural_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})$")
            .expect("valid natural date regex")
    })
}

fn ago_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+) (hour|day|week|month|year)s? ago$").expect("valid relative regex")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().fixed_offset()
    }

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_date_table() {
        let plus_one = FixedOffset::east_opt(3600).unwrap();
        let minus_one = FixedOffset::west_opt(3600).unwrap();
        let cases = vec![
            ("2018-01-01", utc(2018, 1, 1, 0)),
            ("2018/01/01", utc(2018, 1, 1, 0)),
            ("January 1st 2018", utc(2018, 1, 1, 0)),
            ("2018-01-01T00:00:00+00:00", utc(2018, 1, 1, 0)),
            (
                "2018-01-01T00:00:00+01:00",
                plus_one.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap(),
            ),
            (
                "2018-01-01T00:00:00-01:00",
                minus_one.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap(),
            ),
            ("2018", utc(2018, 1, 1, 0)),
            ("2018-01", utc(2018, 1, 1, 0)),
            ("last year", utc(2017, 1, 1, 0)),
            ("last hour", utc(2017, 12, 31, 23)),
            ("last month", utc(2017, 12, 1, 0)),
            ("last week", utc(2017, 12, 25, 0)),
            ("last monday", utc(2017, 12, 25, 0)),
            ("10 days ago", utc(2017, 12, 22, 0)),
        ];

        for (text, expected) in cases {
            let result = parse_date(text, reference())
                .unwrap_or_else(|e| panic!("failed to parse '{}': {}", text, e));
            assert_eq!(result, expected, "wrong result for '{}'", text);
        }
    }

    #[test]
    fn test_rfc3339_keeps_offset() {
        let result = parse_date("2018-01-01T00:00:00+01:00", reference()).unwrap();
        assert_eq!(result.offset().local_minus_utc(), 3600);
        assert_eq!(result.with_timezone(&Utc), utc(2017, 12, 31, 23));
    }

    #[test]
    fn test_natural_forms() {
        assert_eq!(parse_date("Jan 5th, 2019", reference()).unwrap(), utc(2019, 1, 5, 0));
        assert_eq!(parse_date("march 22nd 2020", reference()).unwrap(), utc(2020, 3, 22, 0));
        assert_eq!(parse_date("Sept 3 2021", reference()).unwrap(), utc(2021, 9, 3, 0));
        assert!(parse_date("February 30th 2020", reference()).is_err());
        assert!(parse_date("Ju 3 2021", reference()).is_err());
    }

    #[test]
    fn test_last_weekday_midweek() {
        // Wednesday
        let now = Utc.with_ymd_and_hms(2018, 1, 3, 15, 30, 0).unwrap();
        assert_eq!(parse_date("last monday", now).unwrap(), utc(2018, 1, 1, 0));
        assert_eq!(parse_date("last week", now).unwrap(), utc(2018, 1, 1, 0));
        assert_eq!(parse_date("last wednesday", now).unwrap(), utc(2017, 12, 27, 0));
        assert_eq!(parse_date("Last  Friday", now).unwrap(), utc(2017, 12, 29, 0));
    }

    #[test]
    fn test_calendar_units_clamp_month_length() {
        let now = Utc.with_ymd_and_hms(2020, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(parse_date("last month", now).unwrap(), utc(2020, 2, 29, 12));
        assert_eq!(parse_date("1 month ago", now).unwrap(), utc(2020, 2, 29, 12));

        let leap_day = Utc.with_ymd_and_hms(2020, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(parse_date("last year", leap_day).unwrap(), utc(2019, 2, 28, 0));
        assert_eq!(parse_date("4 years ago", leap_day).unwrap(), utc(2016, 2, 29, 0));
    }

    #[test]
    fn test_exact_duration_units() {
        let now = reference();
        assert_eq!(parse_date("3 hours ago", now).unwrap(), utc(2017, 12, 31, 21));
        assert_eq!(parse_date("1 day ago", now).unwrap(), utc(2017, 12, 31, 0));
        assert_eq!(parse_date("2 weeks ago", now).unwrap(), utc(2017, 12, 18, 0));
        assert_eq!(parse_date("0 days ago", now).unwrap(), utc(2018, 1, 1, 0));
    }

    #[test]
    fn test_unparseable_input() {
        let err = parse_date("22#@!", reference()).unwrap_err();
        assert_eq!(err.text, "22#@!");
        assert!(err.to_string().contains("22#@!"));

        assert!(parse_date("", reference()).is_err());
        assert!(parse_date("last decade", reference()).is_err());
        assert!(parse_date("ten days ago", reference()).is_err());
        assert!(parse_date("2018-13-01", reference()).is_err());
        assert!(parse_date("99999999999 days ago", reference()).is_err());
    }

    #[test]
    fn test_parse_date_now_reads_clock() {
        let before = Utc::now();
        let result = parse_date_now("0 hours ago").unwrap();
        let after = Utc::now();
        assert!(result >= before.fixed_offset());
        assert!(result <= after.fixed_offset());
    }
}
