// src/calendar.rs
//
// Calendar labeling: every date of the target year becomes exactly one
// LabeledDay. Weekend membership wins over a holiday-table entry, so a
// holiday landing on a weekend is recorded as Weekend and its name dropped.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::holidays::HolidayTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    Workday,
    Holiday,
    Weekend,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabeledDay {
    pub day: NaiveDate,
    pub kind: DayKind,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CalendarConfig {
    pub year: i32,
    /// Weekday indices treated as weekend, Monday = 0 .. Sunday = 6.
    pub weekend_days: Vec<u32>,
}

/// Yield each date within the calendar year, Jan 1 through Dec 31.
pub fn iter_year_days(year: i32) -> impl Iterator<Item = NaiveDate> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid year start");
    let end = NaiveDate::from_ymd_opt(year, 12, 31).expect("valid year end");
    start.iter_days().take_while(move |day| *day <= end)
}

/// Label every day of the requested year with weekend and holiday metadata.
pub fn build_calendar(config: &CalendarConfig, holidays: &HolidayTable) -> Vec<LabeledDay> {
    let mut result = Vec::with_capacity(366);
    for current in iter_year_days(config.year) {
        let weekday = current.weekday().num_days_from_monday();
        if config.weekend_days.contains(&weekday) {
            result.push(LabeledDay {
                day: current,
                kind: DayKind::Weekend,
                name: None,
            });
            continue;
        }
        match holidays.get(&current) {
            Some(name) => result.push(LabeledDay {
                day: current,
                kind: DayKind::Holiday,
                name: Some(name.clone()),
            }),
            None => result.push(LabeledDay {
                day: current,
                kind: DayKind::Workday,
                name: None,
            }),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::fallback_holidays;

    fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("Invalid date string format: {}", date_str))
    }

    fn sat_sun() -> Vec<u32> {
        vec![5, 6]
    }

    #[test]
    fn covers_every_day_of_a_leap_year() {
        let calendar = build_calendar(
            &CalendarConfig {
                year: 2024,
                weekend_days: sat_sun(),
            },
            &HolidayTable::new(),
        );
        assert_eq!(calendar.len(), 366);
        assert_eq!(calendar.first().map(|day| day.day), Some(d("2024-01-01")));
        assert_eq!(calendar.last().map(|day| day.day), Some(d("2024-12-31")));
    }

    #[test]
    fn labels_known_holidays() {
        let holidays = fallback_holidays("US", Some("US-CA"), 2024);
        let calendar = build_calendar(
            &CalendarConfig {
                year: 2024,
                weekend_days: sat_sun(),
            },
            &holidays,
        );
        // July 4, 2024 is a Thursday.
        let fourth = calendar
            .iter()
            .find(|day| day.day == d("2024-07-04"))
            .expect("July 4 present");
        assert_eq!(fourth.kind, DayKind::Holiday);
        assert_eq!(fourth.name.as_deref(), Some("Independence Day"));
    }

    #[test]
    fn weekend_wins_over_holiday_entry() {
        // Put a holiday on a Saturday; the day must stay Weekend with no name.
        let mut holidays = HolidayTable::new();
        holidays.insert(d("2024-01-06"), "Saturday Holiday".to_string());
        let calendar = build_calendar(
            &CalendarConfig {
                year: 2024,
                weekend_days: sat_sun(),
            },
            &holidays,
        );
        let day = calendar
            .iter()
            .find(|day| day.day == d("2024-01-06"))
            .expect("Jan 6 present");
        assert_eq!(day.kind, DayKind::Weekend);
        assert_eq!(day.name, None);
    }

    #[test]
    fn empty_holiday_table_yields_only_workdays_and_weekends() {
        let calendar = build_calendar(
            &CalendarConfig {
                year: 2024,
                weekend_days: sat_sun(),
            },
            &HolidayTable::new(),
        );
        assert!(calendar.iter().all(|day| day.kind != DayKind::Holiday));
        let weekends = calendar
            .iter()
            .filter(|day| day.kind == DayKind::Weekend)
            .count();
        // 2024 has 52 Saturdays and 52 Sundays.
        assert_eq!(weekends, 104);
    }

    #[test]
    fn custom_weekend_set_is_respected() {
        // Friday/Saturday weekend: Jan 5, 2024 is a Friday.
        let calendar = build_calendar(
            &CalendarConfig {
                year: 2024,
                weekend_days: vec![4, 5],
            },
            &HolidayTable::new(),
        );
        let friday = calendar
            .iter()
            .find(|day| day.day == d("2024-01-05"))
            .expect("Jan 5 present");
        assert_eq!(friday.kind, DayKind::Weekend);
        let sunday = calendar
            .iter()
            .find(|day| day.day == d("2024-01-07"))
            .expect("Jan 7 present");
        assert_eq!(sunday.kind, DayKind::Workday);
    }
}
