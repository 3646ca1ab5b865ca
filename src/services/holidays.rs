use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{Holiday, HolidayType};

/// Fixed-date public holidays seeded for a year with none configured
const DEFAULT_HOLIDAYS: &[(u32, u32, &str, HolidayType)] = &[
    (1, 1, "New Year's Day", HolidayType::Optional),
    (1, 26, "Republic Day", HolidayType::Mandatory),
    (5, 1, "Labour Day", HolidayType::Optional),
    (8, 15, "Independence Day", HolidayType::Mandatory),
    (10, 2, "Gandhi Jayanti", HolidayType::Mandatory),
    (12, 25, "Christmas Day", HolidayType::Mandatory),
];

pub fn default_holidays(year: i32, now: DateTime<Utc>) -> Vec<Holiday> {
    DEFAULT_HOLIDAYS
        .iter()
        .filter_map(|(month, day, name, kind)| {
            NaiveDate::from_ymd_opt(year, *month, *day).map(|date| Holiday::new(date, *name, *kind, now))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_dated_in_the_requested_year() {
        let holidays = default_holidays(2026, Utc::now());
        assert_eq!(holidays.len(), DEFAULT_HOLIDAYS.len());
        assert!(holidays.iter().all(|h| h.date.format("%Y").to_string() == "2026"));
        assert!(holidays.iter().any(|h| h.name == "Independence Day" && h.holiday_type == HolidayType::Mandatory));
    }
}
