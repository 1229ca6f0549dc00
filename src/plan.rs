// src/plan.rs
//
// Finalized plan values returned to callers. Built once from selector
// states at response time; immutable afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::candidates::CandidateWindow;
use crate::selection::PlanCandidate;

/// One contiguous off-work block of a finalized plan. The block also feeds
/// the ICS export, so it deserializes as well as serializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanBlock {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days_off: u32,
    #[serde(default)]
    pub pto: Vec<NaiveDate>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    #[serde(default)]
    pub weekends: Vec<NaiveDate>,
    #[serde(default)]
    pub explain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub score: f64,
    pub pto_used: u32,
    pub blocks: Vec<PlanBlock>,
}

fn build_plan_block(window: &CandidateWindow) -> PlanBlock {
    let explanation = format!(
        "{} to {} — {} days off using {} PTO",
        window.start, window.end, window.off_streak, window.pto_needed
    );
    let mut pto = window.workdays.clone();
    pto.sort();
    let mut holidays = window.holidays.clone();
    holidays.sort();
    let mut weekends = window.weekends.clone();
    weekends.sort();
    PlanBlock {
        start: window.start,
        end: window.end,
        days_off: window.off_streak,
        pto,
        holidays,
        weekends,
        explain: explanation,
    }
}

/// Turn a selector state into the response-facing plan value.
pub fn plan_from_candidate(candidate: &PlanCandidate) -> Plan {
    Plan {
        score: candidate.score,
        pto_used: candidate.pto_used,
        blocks: candidate.windows.iter().map(build_plan_block).collect(),
    }
}
