// src/api.rs
//
// HTTP surface: request/response types, input validation with the
// structured error envelope, and the handlers that drive the planning
// pipeline. Marshaling only; the domain lives in the sibling modules.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calendar::{build_calendar, CalendarConfig};
use crate::candidates::{generate_candidates, CandidateConfig, CandidateConstraints};
use crate::holidays::HolidayProvider;
use crate::ics::build_ics_document;
use crate::locale::normalize_locale;
use crate::plan::{plan_from_candidate, Plan, PlanBlock};
use crate::scoring::{Goal, PlanPreference, PreferenceConfig};
use crate::selection::{select_plans, SelectionConfig};
use crate::AppState;

/// Ranked plans kept from the selector.
const PLAN_RESULT_LIMIT: usize = 5;
/// How many of those are primary; the rest are alternates.
const PRIMARY_PLAN_COUNT: usize = 3;

const YEAR_MIN: i32 = 1900;
const YEAR_MAX: i32 = 2100;
const BLOCKS_MAX_CEILING: i32 = 5;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    InvalidInput { message: String, hint: String },
}

impl ApiError {
    pub fn invalid_input(message: impl Into<String>, hint: impl Into<String>) -> Self {
        ApiError::InvalidInput {
            message: message.into(),
            hint: hint.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidInput { message, hint } => {
                warn!("Rejecting request: {}", message);
                let body = Json(json!({
                    "error": {
                        "code": "INVALID_INPUT",
                        "message": message,
                        "hint": hint,
                    }
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

fn weekday_index(code: &str) -> Option<u32> {
    match code {
        "MON" => Some(0),
        "TUE" => Some(1),
        "WED" => Some(2),
        "THU" => Some(3),
        "FRI" => Some(4),
        "SAT" => Some(5),
        "SUN" => Some(6),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceInput {
    #[serde(default)]
    pub reserve_pto: i32,
    #[serde(default)]
    pub season_spread: bool,
    #[serde(default)]
    pub prefer_months: Vec<i32>,
    #[serde(default)]
    pub avoid_months: Vec<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintInput {
    /// Inclusive ranges in `YYYY-MM-DD..YYYY-MM-DD` form.
    #[serde(default)]
    pub blackouts: Vec<String>,
    #[serde(default)]
    pub min_block_len: Option<u32>,
    #[serde(default)]
    pub max_block_len: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub year: i32,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    pub timezone: String,
    pub pto_total: i32,
    pub blocks_max: i32,
    pub weekend: Vec<String>,
    pub goal: String,
    #[serde(default)]
    pub prefs: PreferenceInput,
    #[serde(default)]
    pub constraints: ConstraintInput,
}

impl PlanRequest {
    /// Scalar validation; also normalizes weekend codes in place (upper
    /// case, deduplicated, sorted) so the response echoes canonical input.
    pub fn validate(&mut self) -> Result<(), ApiError> {
        if self.year < YEAR_MIN || self.year > YEAR_MAX {
            return Err(ApiError::invalid_input(
                "year out of supported range",
                format!("Use a year between {} and {}", YEAR_MIN, YEAR_MAX),
            ));
        }
        if self.blocks_max < 1 || self.blocks_max > BLOCKS_MAX_CEILING {
            return Err(ApiError::invalid_input(
                format!("blocks_max must be between 1 and {}", BLOCKS_MAX_CEILING),
                "Request between one and five blocks",
            ));
        }
        if self.pto_total < 0 {
            return Err(ApiError::invalid_input(
                "pto_total must be non-negative",
                "Provide the PTO budget as a day count",
            ));
        }
        for &month in self
            .prefs
            .prefer_months
            .iter()
            .chain(self.prefs.avoid_months.iter())
        {
            if !(1..=12).contains(&month) {
                return Err(ApiError::invalid_input(
                    format!("month value {} out of range", month),
                    "Month values must be between 1 and 12",
                ));
            }
        }
        let mut normalized: Vec<String> = Vec::with_capacity(self.weekend.len());
        for day in &self.weekend {
            let code = day.to_uppercase();
            if weekday_index(&code).is_none() {
                return Err(ApiError::invalid_input(
                    format!("unknown weekday '{}'", day),
                    "Use three-letter codes MON..SUN",
                ));
            }
            normalized.push(code);
        }
        normalized.sort();
        normalized.dedup();
        self.weekend = normalized;
        if Goal::from_code(&self.goal).is_none() {
            return Err(ApiError::invalid_input(
                format!("unknown goal '{}'", self.goal),
                "Use 'max_total' or 'max_longest'",
            ));
        }
        Ok(())
    }

    pub fn weekend_indices(&self) -> Vec<u32> {
        self.weekend
            .iter()
            .filter_map(|code| weekday_index(code))
            .collect()
    }

    pub fn blackout_ranges(&self) -> Result<Vec<(NaiveDate, NaiveDate)>, ApiError> {
        let mut ranges = Vec::with_capacity(self.constraints.blackouts.len());
        for item in &self.constraints.blackouts {
            let Some((start_str, end_str)) = item.split_once("..") else {
                return Err(ApiError::invalid_input(
                    format!("malformed blackout range '{}'", item),
                    "Blackout ranges must use the 'YYYY-MM-DD..YYYY-MM-DD' form",
                ));
            };
            let parse = |value: &str| {
                NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                    ApiError::invalid_input(
                        format!("unparseable blackout date '{}'", value.trim()),
                        "Blackout dates must be ISO formatted",
                    )
                })
            };
            let start = parse(start_str)?;
            let end = parse(end_str)?;
            if end < start {
                return Err(ApiError::invalid_input(
                    format!("blackout range '{}' ends before it starts", item),
                    "Blackout end must not precede the start",
                ));
            }
            ranges.push((start, end));
        }
        Ok(ranges)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    /// Echo of the validated request.
    pub params: PlanRequest,
    pub plans: Vec<Plan>,
    pub alternates: Vec<Plan>,
}

/// Validate the request and run the full planning pipeline.
pub async fn compute_plan(
    provider: &HolidayProvider,
    mut request: PlanRequest,
) -> Result<PlanResponse, ApiError> {
    request.validate()?;
    let blackouts = request.blackout_ranges()?;
    let goal = Goal::from_code(&request.goal)
        .ok_or_else(|| ApiError::invalid_input("unknown goal", "Use 'max_total' or 'max_longest'"))?;

    let reserve = request.prefs.reserve_pto;
    if reserve > request.pto_total {
        return Err(ApiError::invalid_input(
            "Reserve exceeds PTO total",
            "Reduce reserve PTO or increase total",
        ));
    }
    let available_pto = (request.pto_total - reserve).max(0) as u32;

    let locale = normalize_locale(&request.country, request.region.as_deref());
    info!(
        "Computing plan: year={}, locale={}/{:?}, budget={} PTO, blocks_max={}",
        request.year, locale.country, locale.region, available_pto, request.blocks_max
    );

    let holiday_table = provider
        .get_holidays(&locale.country, locale.region.as_deref(), request.year)
        .await;
    let calendar = build_calendar(
        &CalendarConfig {
            year: request.year,
            weekend_days: request.weekend_indices(),
        },
        &holiday_table,
    );

    let constraints = CandidateConstraints {
        blackout_ranges: blackouts,
        min_block_len: request.constraints.min_block_len.filter(|&len| len > 0),
        max_block_len: request.constraints.max_block_len.filter(|&len| len > 0),
    };
    let candidates = generate_candidates(&calendar, &CandidateConfig { constraints });
    debug!("Generated {} candidate windows", candidates.len());
    if candidates.is_empty() {
        return Ok(PlanResponse {
            params: request,
            plans: Vec::new(),
            alternates: Vec::new(),
        });
    }

    let prefs = PreferenceConfig {
        prefer_months: request
            .prefs
            .prefer_months
            .iter()
            .map(|&month| month as u32)
            .collect(),
        avoid_months: request
            .prefs
            .avoid_months
            .iter()
            .map(|&month| month as u32)
            .collect(),
        ..PreferenceConfig::default()
    };
    let plan_prefs = PlanPreference {
        goal,
        season_spread: request.prefs.season_spread,
    };
    let selection = select_plans(
        &candidates,
        &SelectionConfig {
            budget: available_pto,
            blocks_max: request.blocks_max as usize,
            top_k: PLAN_RESULT_LIMIT,
            prefs,
            plan_prefs,
        },
    );
    debug!("Selector returned {} ranked plans", selection.len());

    let mut plans: Vec<Plan> = selection.iter().map(plan_from_candidate).collect();
    let alternates = if plans.len() > PRIMARY_PLAN_COUNT {
        plans.split_off(PRIMARY_PLAN_COUNT)
    } else {
        Vec::new()
    };
    Ok(PlanResponse {
        params: request,
        plans,
        alternates,
    })
}

#[derive(Debug, Deserialize)]
pub struct HolidayQuery {
    pub year: i32,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub name: String,
    pub observed: bool,
}

#[derive(Debug, Serialize)]
pub struct HolidayListResponse {
    pub year: i32,
    pub country: String,
    pub region: Option<String>,
    pub timezone: Option<String>,
    pub holidays: Vec<HolidayEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub timezone: String,
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<PlanBlock>,
}

pub async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

pub async fn handle_holidays(
    State(state): State<AppState>,
    Query(query): Query<HolidayQuery>,
) -> Result<Json<HolidayListResponse>, ApiError> {
    if query.year < YEAR_MIN || query.year > YEAR_MAX {
        return Err(ApiError::invalid_input(
            "year out of supported range",
            format!("Use a year between {} and {}", YEAR_MIN, YEAR_MAX),
        ));
    }
    let locale = normalize_locale(&query.country, query.region.as_deref());
    let table = state
        .holiday_provider
        .get_holidays(&locale.country, locale.region.as_deref(), query.year)
        .await;
    let mut entries: Vec<(NaiveDate, String)> = table.into_iter().collect();
    entries.sort();
    let holidays = entries
        .into_iter()
        .map(|(date, name)| HolidayEntry {
            date,
            name,
            observed: true,
        })
        .collect();
    Ok(Json(HolidayListResponse {
        year: query.year,
        country: locale.country,
        region: locale.region,
        timezone: query.timezone,
        holidays,
    }))
}

pub async fn handle_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let response = compute_plan(&state.holiday_provider, request).await?;
    Ok(Json(response))
}

pub async fn handle_export_ics(
    Json(request): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let document = build_ics_document(&request.title, &request.timezone, &request.blocks)
        .map_err(|err| {
            ApiError::invalid_input(
                err.to_string(),
                "Use an IANA timezone label like 'America/Toronto'",
            )
        })?;
    info!(
        "Exported ICS document '{}' with {} blocks",
        request.title,
        request.blocks.len()
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"max-days-off.ics\"",
            ),
        ],
        document,
    )
        .into_response())
}
