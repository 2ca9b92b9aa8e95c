use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The bucket size used when summing sales over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    /// ISO weeks, keyed by their Monday.
    Week,
    /// Calendar months, keyed by their first day.
    Month,
}

impl Granularity {
    /// Returns the first date of the period that contains `date`.
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Granularity::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Returns the first date of the period following the one starting at `start`.
    ///
    /// `start` must already be a period start as returned by [`Granularity::period_start`].
    pub fn next_period(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Day => start.succ_opt(),
            Granularity::Week => start.checked_add_signed(Duration::weeks(1)),
            Granularity::Month => {
                let (year, month) = if start.month() == 12 {
                    (start.year() + 1, 1)
                } else {
                    (start.year(), start.month() + 1)
                };
                NaiveDate::from_ymd_opt(year, month, 1)
            }
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" | "d" => Ok(Granularity::Day),
            "week" | "weekly" | "w" => Ok(Granularity::Week),
            "month" | "monthly" | "m" => Ok(Granularity::Month),
            other => Err(format!("unknown granularity '{}', expected day, week or month", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-03-14 is a Thursday.
        assert_eq!(Granularity::Week.period_start(date(2024, 3, 14)), date(2024, 3, 11));
        assert_eq!(Granularity::Week.period_start(date(2024, 3, 11)), date(2024, 3, 11));
        assert_eq!(Granularity::Week.period_start(date(2024, 3, 17)), date(2024, 3, 11));
    }

    #[test]
    fn month_rolls_over_year_end() {
        assert_eq!(Granularity::Month.period_start(date(2023, 12, 31)), date(2023, 12, 1));
        assert_eq!(Granularity::Month.next_period(date(2023, 12, 1)), Some(date(2024, 1, 1)));
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("Daily".parse::<Granularity>(), Ok(Granularity::Day));
        assert_eq!("m".parse::<Granularity>(), Ok(Granularity::Month));
        assert!("hourly".parse::<Granularity>().is_err());
    }
}
