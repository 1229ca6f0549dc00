// src/ics.rs
//
// ICS export: one all-day VEVENT per plan block. DTEND is exclusive in the
// format, so it lands one day after the block's inclusive end.

use chrono::{Duration, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use uuid::Uuid;

use crate::plan::PlanBlock;

#[derive(Error, Debug)]
pub enum IcsError {
    #[error("unrecognized timezone label '{0}'")]
    UnknownTimezone(String),
}

fn format_event(block: &PlanBlock, tz: &Tz) -> String {
    let dtstamp = Utc::now()
        .with_timezone(tz)
        .format("%Y%m%dT%H%M%SZ")
        .to_string();
    let uid = format!("max-days-off-{}@maxdaysoff", Uuid::new_v4());
    let dtstart = block.start.format("%Y%m%d").to_string();
    let dtend = (block.end + Duration::days(1)).format("%Y%m%d").to_string();

    let mut description_lines: Vec<String> = vec!["PTO days:".to_string()];
    description_lines.extend(block.pto.iter().map(|day| day.to_string()));
    if !block.holidays.is_empty() {
        description_lines.push("Holidays:".to_string());
        description_lines.extend(block.holidays.iter().map(|day| day.to_string()));
    }
    // Literal "\n" escapes per the ICS TEXT grammar.
    let description = description_lines.join("\\n");

    [
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", uid),
        format!("DTSTAMP:{}", dtstamp),
        format!("DTSTART;VALUE=DATE:{}", dtstart),
        format!("DTEND;VALUE=DATE:{}", dtend),
        "SUMMARY:OOO — Break".to_string(),
        "CATEGORIES:PTO,OutOfOffice".to_string(),
        format!("DESCRIPTION:{}", description),
        "END:VEVENT".to_string(),
    ]
    .join("\r\n")
}

/// Render the full VCALENDAR document for the given blocks.
pub fn build_ics_document(
    title: &str,
    timezone: &str,
    blocks: &[PlanBlock],
) -> Result<String, IcsError> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| IcsError::UnknownTimezone(timezone.to_string()))?;
    let events = blocks
        .iter()
        .map(|block| format_event(block, &tz))
        .collect::<Vec<String>>()
        .join("\r\n");
    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//MaxDaysOff//Max Days Off//EN".to_string(),
        format!("X-WR-CALNAME:{}", title),
        events,
        "END:VCALENDAR".to_string(),
    ];
    Ok(lines.join("\r\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("Invalid date string format: {}", date_str))
    }

    fn may_block() -> PlanBlock {
        PlanBlock {
            start: d("2024-05-01"),
            end: d("2024-05-05"),
            days_off: 5,
            pto: vec![d("2024-05-02"), d("2024-05-03")],
            holidays: vec![d("2024-05-01")],
            weekends: vec![d("2024-05-04"), d("2024-05-05")],
            explain: "Test block".to_string(),
        }
    }

    #[test]
    fn single_block_produces_one_all_day_event() {
        let payload =
            build_ics_document("Test", "America/Toronto", &[may_block()]).expect("valid document");
        assert_eq!(payload.matches("BEGIN:VEVENT").count(), 1);
        assert!(payload.contains("DTSTART;VALUE=DATE:20240501"));
        // Exclusive end: inclusive block end plus one day.
        assert!(payload.contains("DTEND;VALUE=DATE:20240506"));
        assert!(payload.contains(
            "DESCRIPTION:PTO days:\\n2024-05-02\\n2024-05-03\\nHolidays:\\n2024-05-01"
        ));
        assert!(payload.contains("UID:max-days-off-"));
    }

    #[test]
    fn document_contains_summary_and_calendar_name() {
        let payload =
            build_ics_document("Test", "America/Toronto", &[may_block()]).expect("valid document");
        assert!(payload.as_bytes()
            .windows("SUMMARY:OOO \u{2014} Break".len())
            .any(|chunk| chunk == "SUMMARY:OOO \u{2014} Break".as_bytes()));
        assert!(payload.contains("X-WR-CALNAME:Test"));
        assert!(payload.starts_with("BEGIN:VCALENDAR"));
        assert!(payload.ends_with("END:VCALENDAR"));
    }

    #[test]
    fn holiday_free_block_omits_holiday_section() {
        let mut block = may_block();
        block.holidays.clear();
        let payload = build_ics_document("Test", "UTC", &[block]).expect("valid document");
        assert!(!payload.contains("Holidays:"));
        assert!(payload.contains("DESCRIPTION:PTO days:\\n2024-05-02\\n2024-05-03"));
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let err = build_ics_document("Test", "Mars/Olympus", &[may_block()])
            .expect_err("bogus timezone must fail");
        assert!(matches!(err, IcsError::UnknownTimezone(_)));
    }
}
