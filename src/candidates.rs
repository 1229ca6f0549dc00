// src/candidates.rs
//
// Candidate window generation: seed (start, end) pairs around holidays,
// Saturdays, and holiday pairs, then filter and partition them into
// CandidateWindow values ready for scoring and selection.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Duration, NaiveDate};

use crate::calendar::{DayKind, LabeledDay};

/// Radius in calendar days for windows seeded on a holiday.
pub const WINDOW_RADIUS: i64 = 7;
/// Radius for windows seeded on the Saturday of each weekend.
pub const WEEKEND_RADIUS: i64 = 4;
/// Maximum gap for bridging two holidays into one window.
pub const DOUBLE_HOLIDAY_MAX_GAP: i64 = 14;
/// Windows spanning fewer days than this are not worth a block.
pub const MIN_PAYOFF_DAYS: usize = 4;

/// Saturday in the Monday = 0 weekday indexing used throughout.
const SATURDAY_INDEX: u32 = 5;

/// A contiguous off-work window. The three date collections partition the
/// window: pto_needed == workdays.len() and
/// off_streak == holidays.len() + weekends.len() + workdays.len().
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub pto_needed: u32,
    pub off_streak: u32,
    pub holidays: Vec<NaiveDate>,
    pub weekends: Vec<NaiveDate>,
    pub workdays: Vec<NaiveDate>,
}

impl CandidateWindow {
    pub fn overlaps(&self, other: &CandidateWindow) -> bool {
        !(self.end < other.start || self.start > other.end)
    }
}

/// Constraints applied when selecting viable candidate windows. Length
/// bounds of zero count as unset.
#[derive(Debug, Clone, Default)]
pub struct CandidateConstraints {
    pub blackout_ranges: Vec<(NaiveDate, NaiveDate)>,
    pub min_block_len: Option<u32>,
    pub max_block_len: Option<u32>,
}

impl CandidateConstraints {
    pub fn allows_range(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let len = (end - start).num_days() + 1;
        if let Some(min) = self.min_block_len {
            if min > 0 && len < i64::from(min) {
                return false;
            }
        }
        if let Some(max) = self.max_block_len {
            if max > 0 && len > i64::from(max) {
                return false;
            }
        }
        !self
            .blackout_ranges
            .iter()
            .any(|&(blackout_start, blackout_end)| {
                overlaps_range(start, end, blackout_start, blackout_end)
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CandidateConfig {
    pub constraints: CandidateConstraints,
}

/// Two inclusive ranges overlap unless one ends strictly before the other
/// starts.
pub fn overlaps_range(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    !(a_end < b_start || a_start > b_end)
}

fn expand_range(center: NaiveDate, radius: i64, year: i32) -> (NaiveDate, NaiveDate) {
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid year start");
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).expect("valid year end");
    let start = (center - Duration::days(radius)).max(year_start);
    let end = (center + Duration::days(radius)).min(year_end);
    (start, end)
}

fn window_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// Produce the deduplicated, filtered, canonically sorted candidate windows
/// for the labeled calendar.
pub fn generate_candidates(days: &[LabeledDay], config: &CandidateConfig) -> Vec<CandidateWindow> {
    let Some(first) = days.first() else {
        return Vec::new();
    };
    let year = first.day.year();

    let by_date: HashMap<NaiveDate, &LabeledDay> =
        days.iter().map(|info| (info.day, info)).collect();
    let mut holidays: Vec<NaiveDate> = days
        .iter()
        .filter(|info| info.kind == DayKind::Holiday)
        .map(|info| info.day)
        .collect();
    holidays.sort();
    let weekends: Vec<NaiveDate> = days
        .iter()
        .filter(|info| info.kind == DayKind::Weekend)
        .map(|info| info.day)
        .collect();

    // BTreeSet both dedupes seed pairs and fixes their visit order.
    let mut windows: BTreeSet<(NaiveDate, NaiveDate)> = BTreeSet::new();

    for &holiday in &holidays {
        windows.insert(expand_range(holiday, WINDOW_RADIUS, year));
    }

    for &weekend_day in &weekends {
        // Only the Saturday anchors a window; Friday/Sunday would seed
        // near-duplicate ranges.
        if weekend_day.weekday().num_days_from_monday() == SATURDAY_INDEX {
            windows.insert(expand_range(weekend_day, WEEKEND_RADIUS, year));
        }
    }

    for (idx, &first_holiday) in holidays.iter().enumerate() {
        for &second_holiday in &holidays[idx + 1..] {
            if (second_holiday - first_holiday).num_days() <= DOUBLE_HOLIDAY_MAX_GAP {
                windows.insert((first_holiday, second_holiday));
            } else {
                // Holidays are sorted, later pairs only get wider.
                break;
            }
        }
    }

    let mut candidates: Vec<CandidateWindow> = Vec::new();
    for &(start, end) in &windows {
        if !config.constraints.allows_range(start, end) {
            continue;
        }
        let span = window_days(start, end);
        if span.len() < MIN_PAYOFF_DAYS {
            continue;
        }
        let mut holidays_in_window: Vec<NaiveDate> = Vec::new();
        let mut weekends_in_window: Vec<NaiveDate> = Vec::new();
        let mut workdays_in_window: Vec<NaiveDate> = Vec::new();
        for day in &span {
            let Some(info) = by_date.get(day) else {
                continue;
            };
            match info.kind {
                DayKind::Weekend => weekends_in_window.push(*day),
                DayKind::Holiday => holidays_in_window.push(*day),
                DayKind::Workday => workdays_in_window.push(*day),
            }
        }
        let pto_needed = workdays_in_window.len();
        if pto_needed == span.len() {
            // No existing weekend or holiday inside; zero leverage.
            continue;
        }
        candidates.push(CandidateWindow {
            start,
            end,
            pto_needed: pto_needed as u32,
            off_streak: span.len() as u32,
            holidays: holidays_in_window,
            weekends: weekends_in_window,
            workdays: workdays_in_window,
        });
    }

    candidates.sort_by_key(|c| (c.end, c.start, c.pto_needed, c.off_streak));
    candidates
}
