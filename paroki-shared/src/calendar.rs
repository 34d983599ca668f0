/// Parish-local dates
///
/// Schedules are stored as naive dates and times in the parish's own
/// timezone. "Today" therefore has to be computed in that timezone rather
/// than in UTC, otherwise a Mass at 07:00 WITA would flip to the archive
/// eight hours early.
///
/// This module also resolves the report range presets (this week, month,
/// year, or a custom span) into concrete inclusive date ranges.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Indonesian timezones used in schedule displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParishTimezone {
    /// Western Indonesia, UTC+7
    Wib,

    /// Central Indonesia, UTC+8
    Wita,

    /// Eastern Indonesia, UTC+9
    Wit,
}

impl ParishTimezone {
    pub fn utc_offset_hours(&self) -> i32 {
        match self {
            ParishTimezone::Wib => 7,
            ParishTimezone::Wita => 8,
            ParishTimezone::Wit => 9,
        }
    }

    /// Display label ("WITA")
    pub fn label(&self) -> &'static str {
        match self {
            ParishTimezone::Wib => "WIB",
            ParishTimezone::Wita => "WITA",
            ParishTimezone::Wit => "WIT",
        }
    }

    /// Local calendar date of `instant`
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        (instant + Duration::hours(i64::from(self.utc_offset_hours()))).date_naive()
    }

    /// Local calendar date right now
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }
}

impl fmt::Display for ParishTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ParishTimezone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WIB" | "ASIA/JAKARTA" => Ok(ParishTimezone::Wib),
            "WITA" | "ASIA/MAKASSAR" => Ok(ParishTimezone::Wita),
            "WIT" | "ASIA/JAYAPURA" => Ok(ParishTimezone::Wit),
            other => Err(format!("unknown parish timezone: {}", other)),
        }
    }
}

/// Which side of today a schedule listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleFilter {
    /// `date >= today`, soonest first
    #[default]
    Upcoming,

    /// `date < today`, most recent first
    Archive,
}

impl ScheduleFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleFilter::Upcoming => "upcoming",
            ScheduleFilter::Archive => "archive",
        }
    }

    /// Whether an item dated `date` belongs in this listing
    pub fn includes(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            ScheduleFilter::Upcoming => date >= today,
            ScheduleFilter::Archive => date < today,
        }
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Result<Self, DateRangeError> {
        let start = date.with_day(1).ok_or(DateRangeError::OutOfRange)?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or(DateRangeError::OutOfRange)?;
        Ok(Self { start, end })
    }

    /// Monday through Sunday of the week containing `date`
    pub fn week_of(date: NaiveDate) -> Result<Self, DateRangeError> {
        let back = i64::from(date.weekday().num_days_from_monday());
        let start = date
            .checked_sub_signed(Duration::days(back))
            .ok_or(DateRangeError::OutOfRange)?;
        let end = start
            .checked_add_signed(Duration::days(6))
            .ok_or(DateRangeError::OutOfRange)?;
        Ok(Self { start, end })
    }

    /// January 1st through December 31st of the year containing `date`
    pub fn year_of(date: NaiveDate) -> Result<Self, DateRangeError> {
        let start = NaiveDate::from_ymd_opt(date.year(), 1, 1).ok_or(DateRangeError::OutOfRange)?;
        let end = NaiveDate::from_ymd_opt(date.year(), 12, 31).ok_or(DateRangeError::OutOfRange)?;
        Ok(Self { start, end })
    }

    /// "1 Maret 2025 - 31 Maret 2025"
    pub fn describe(&self) -> String {
        format!("{} - {}", format_long_date(self.start), format_long_date(self.end))
    }
}

/// Report range presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePreset {
    Week,
    #[default]
    Month,
    Year,
    Custom,
}

impl RangePreset {
    /// Resolves the preset relative to `today`
    ///
    /// `start`/`end` are only read for `Custom`, where both are required and
    /// must be in order.
    pub fn resolve(
        &self,
        today: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DateRange, DateRangeError> {
        match self {
            RangePreset::Week => DateRange::week_of(today),
            RangePreset::Month => DateRange::month_of(today),
            RangePreset::Year => DateRange::year_of(today),
            RangePreset::Custom => {
                let start = start.ok_or(DateRangeError::MissingStart)?;
                let end = end.ok_or(DateRangeError::MissingEnd)?;
                if start > end {
                    return Err(DateRangeError::Inverted { start, end });
                }
                Ok(DateRange { start, end })
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangePreset::Week => "Minggu Ini",
            RangePreset::Month => "Bulan Ini",
            RangePreset::Year => "Tahun Ini",
            RangePreset::Custom => "Periode Khusus",
        }
    }
}

/// Error type for range resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateRangeError {
    #[error("start date is required for a custom range")]
    MissingStart,

    #[error("end date is required for a custom range")]
    MissingEnd,

    #[error("start date {start} is after end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },

    #[error("date is outside the supported calendar range")]
    OutOfRange,
}

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const WEEKDAYS_ID: [&str; 7] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"];

/// Indonesian long date, e.g. "5 Maret 2025"
pub fn format_long_date(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), MONTHS_ID[date.month0() as usize], date.year())
}

/// Indonesian weekday name, e.g. "Minggu"
pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAYS_ID[date.weekday().num_days_from_monday() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_timezone_parsing() {
        assert_eq!("wita".parse::<ParishTimezone>().unwrap(), ParishTimezone::Wita);
        assert_eq!("Asia/Jayapura".parse::<ParishTimezone>().unwrap(), ParishTimezone::Wit);
        assert!("PST".parse::<ParishTimezone>().is_err());
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 17:30 UTC is already the next day in WITA (UTC+8)
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 17, 30, 0).unwrap();
        assert_eq!(ParishTimezone::Wita.date_of(instant), date(2025, 3, 2));
        assert_eq!(ParishTimezone::Wib.date_of(instant), date(2025, 3, 2));

        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 15, 30, 0).unwrap();
        assert_eq!(ParishTimezone::Wib.date_of(instant), date(2025, 3, 1));
    }

    #[test]
    fn test_schedule_filter_boundaries() {
        let today = date(2025, 3, 10);
        assert!(ScheduleFilter::Upcoming.includes(today, today));
        assert!(!ScheduleFilter::Archive.includes(today, today));
        assert!(ScheduleFilter::Archive.includes(date(2025, 3, 9), today));
        assert!(!ScheduleFilter::Upcoming.includes(date(2025, 3, 9), today));
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2025-03-13 is a Thursday
        let range = RangePreset::Week.resolve(date(2025, 3, 13), None, None).unwrap();
        assert_eq!(range.start, date(2025, 3, 10));
        assert_eq!(range.end, date(2025, 3, 16));

        // Sunday belongs to the week that started six days earlier
        let range = RangePreset::Week.resolve(date(2025, 3, 16), None, None).unwrap();
        assert_eq!(range.start, date(2025, 3, 10));
    }

    #[test]
    fn test_month_range_handles_leap_february() {
        let range = RangePreset::Month.resolve(date(2024, 2, 14), None, None).unwrap();
        assert_eq!(range.start, date(2024, 2, 1));
        assert_eq!(range.end, date(2024, 2, 29));

        let range = DateRange::month_of(date(2025, 12, 31)).unwrap();
        assert_eq!(range.end, date(2025, 12, 31));
    }

    #[test]
    fn test_year_range() {
        let range = RangePreset::Year.resolve(date(2025, 6, 1), None, None).unwrap();
        assert_eq!(range.start, date(2025, 1, 1));
        assert_eq!(range.end, date(2025, 12, 31));
    }

    #[test]
    fn test_custom_range_validation() {
        let today = date(2025, 1, 1);
        assert_eq!(
            RangePreset::Custom.resolve(today, None, Some(today)),
            Err(DateRangeError::MissingStart)
        );
        assert_eq!(
            RangePreset::Custom.resolve(today, Some(today), None),
            Err(DateRangeError::MissingEnd)
        );
        assert!(matches!(
            RangePreset::Custom.resolve(today, Some(date(2025, 2, 1)), Some(date(2025, 1, 1))),
            Err(DateRangeError::Inverted { .. })
        ));

        let range = RangePreset::Custom
            .resolve(today, Some(date(2025, 1, 5)), Some(date(2025, 1, 5)))
            .unwrap();
        assert!(range.contains(date(2025, 1, 5)));
        assert!(!range.contains(date(2025, 1, 6)));
    }

    #[test]
    fn test_indonesian_formatting() {
        assert_eq!(format_long_date(date(2025, 3, 5)), "5 Maret 2025");
        assert_eq!(weekday_name(date(2025, 3, 16)), "Minggu");
        assert_eq!(
            DateRange { start: date(2025, 3, 1), end: date(2025, 3, 31) }.describe(),
            "1 Maret 2025 - 31 Maret 2025"
        );
    }
}
