// src/holidays.rs
//
// Holiday lookup: a live public-holidays HTTP source with a static fallback
// table. The rest of the pipeline only ever sees a date -> name table and an
// empty table is a valid outcome (no holidays recognized for the locale).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub type HolidayTable = HashMap<NaiveDate, String>;

#[derive(Error, Debug)]
pub enum HolidayError {
    #[error("holiday request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("holiday endpoint returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid holiday API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// Upstream supplier of a holiday table for one country/region/year.
#[async_trait]
pub trait HolidaySource: Send + Sync {
    async fn fetch(
        &self,
        country: &str,
        region: Option<&str>,
        year: i32,
    ) -> Result<HolidayTable, HolidayError>;
}

/// One record of the public-holidays JSON feed. `counties` is null for
/// nationwide holidays, otherwise it lists `COUNTRY-REGION` codes.
#[derive(Debug, Deserialize)]
struct PublicHolidayRecord {
    date: NaiveDate,
    name: String,
    #[serde(default)]
    counties: Option<Vec<String>>,
}

fn record_applies(record: &PublicHolidayRecord, region: Option<&str>) -> bool {
    match (&record.counties, region) {
        (None, _) => true,
        (Some(counties), Some(region)) => counties.iter().any(|county| county == region),
        (Some(_), None) => false,
    }
}

/// Client for a Nager.Date-style `PublicHolidays/{year}/{country}` endpoint.
pub struct NagerClient {
    client: Client,
    base_url: Url,
}

impl NagerClient {
    pub fn new(base_url: &str) -> Result<Self, HolidayError> {
        // Url::join drops the last path segment unless the base ends in '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Ok(Self {
            client: Client::new(),
            base_url: Url::parse(&normalized)?,
        })
    }
}

#[async_trait]
impl HolidaySource for NagerClient {
    async fn fetch(
        &self,
        country: &str,
        region: Option<&str>,
        year: i32,
    ) -> Result<HolidayTable, HolidayError> {
        let url = self
            .base_url
            .join(&format!("api/v3/PublicHolidays/{}/{}", year, country))?;
        debug!("Fetching holidays from {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(HolidayError::Status(response.status()));
        }
        let records: Vec<PublicHolidayRecord> = response.json().await?;
        let table: HolidayTable = records
            .into_iter()
            .filter(|record| record_applies(record, region))
            .map(|record| (record.date, record.name))
            .collect();
        debug!(
            "Holiday source returned {} entries for {}/{:?} {}",
            table.len(),
            country,
            region,
            year
        );
        Ok(table)
    }
}

// Static fallback calendars, keyed by (country, region, year). Month/day
// pairs keep the table free of fallible date construction.
type FallbackEntries = &'static [(u32, u32, &'static str)];

const CA_ON_2024: FallbackEntries = &[
    (1, 1, "New Year's Day"),
    (2, 19, "Family Day"),
    (3, 29, "Good Friday"),
    (5, 20, "Victoria Day"),
    (7, 1, "Canada Day"),
    (9, 2, "Labour Day"),
    (10, 14, "Thanksgiving"),
    (12, 25, "Christmas Day"),
    (12, 26, "Boxing Day"),
];

const US_CA_2024: FallbackEntries = &[
    (1, 1, "New Year's Day"),
    (5, 27, "Memorial Day"),
    (7, 4, "Independence Day"),
    (9, 2, "Labor Day"),
    (11, 28, "Thanksgiving Day"),
    (12, 25, "Christmas Day"),
];

const GB_ENG_2024: FallbackEntries = &[
    (1, 1, "New Year's Day"),
    (4, 1, "Easter Monday"),
    (5, 6, "Early May Bank Holiday"),
    (12, 25, "Christmas Day"),
    (12, 26, "Boxing Day"),
];

const AU_NSW_2024: FallbackEntries = &[
    (1, 1, "New Year's Day"),
    (1, 26, "Australia Day"),
    (4, 25, "ANZAC Day"),
    (12, 25, "Christmas Day"),
    (12, 26, "Boxing Day"),
];

static FALLBACK_HOLIDAYS: Lazy<HashMap<(String, String, i32), FallbackEntries>> =
    Lazy::new(|| {
        [
            (("CA", "CA-ON", 2024), CA_ON_2024),
            (("US", "US-CA", 2024), US_CA_2024),
            (("GB", "GB-ENG", 2024), GB_ENG_2024),
            (("AU", "AU-NSW", 2024), AU_NSW_2024),
        ]
        .into_iter()
        .map(|((country, region, year), entries)| {
            ((country.to_string(), region.to_string(), year), entries)
        })
        .collect()
    });

/// Look up the static fallback table. Unknown locale/year combinations
/// resolve to an empty table, which downstream treats as "no holidays".
pub fn fallback_holidays(country: &str, region: Option<&str>, year: i32) -> HolidayTable {
    let Some(region) = region else {
        return HolidayTable::new();
    };
    let key = (country.to_string(), region.to_string(), year);
    let Some(entries) = FALLBACK_HOLIDAYS.get(&key) else {
        return HolidayTable::new();
    };
    entries
        .iter()
        .filter_map(|&(month, day, name)| {
            NaiveDate::from_ymd_opt(year, month, day).map(|date| (date, name.to_string()))
        })
        .collect()
}

/// Facade the handlers use: prefer the live source, degrade to the fallback
/// table when it is unavailable. Never fails.
pub struct HolidayProvider {
    source: Arc<dyn HolidaySource>,
}

impl HolidayProvider {
    pub fn new(source: Arc<dyn HolidaySource>) -> Self {
        Self { source }
    }

    pub async fn get_holidays(
        &self,
        country: &str,
        region: Option<&str>,
        year: i32,
    ) -> HolidayTable {
        match self.source.fetch(country, region, year).await {
            Ok(table) => table,
            Err(err) => {
                warn!(
                    "Holiday source unavailable for {}/{:?} {}: {}. Using fallback table.",
                    country, region, year, err
                );
                fallback_holidays(country, region, year)
            }
        }
    }
}
