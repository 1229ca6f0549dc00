// src/selection.rs
//
// Plan selection: incremental enumeration of non-overlapping window
// combinations under a PTO budget and block ceiling, with map-keyed state
// deduplication and a deterministic final ordering.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::candidates::CandidateWindow;
use crate::scoring::{plan_score, score_candidate, PlanPreference, PreferenceConfig};

/// Identity of a chosen window inside a state key.
pub type WindowKey = (NaiveDate, NaiveDate);

/// State key: ordered chosen-window identifiers plus cumulative PTO. Two
/// states sharing a key are interchangeable and only the better score
/// survives.
type StateKey = (Vec<WindowKey>, u32);

/// A partial (or final) plan assembled by the selector. Windows are kept in
/// chronological order; base_scores line up with them index for index.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCandidate {
    pub windows: Vec<CandidateWindow>,
    pub base_scores: Vec<f64>,
    pub pto_used: u32,
    pub score: f64,
}

impl PlanCandidate {
    fn empty() -> Self {
        Self {
            windows: Vec::new(),
            base_scores: Vec::new(),
            pto_used: 0,
            score: 0.0,
        }
    }

    pub fn summary(&self) -> Vec<WindowKey> {
        self.windows
            .iter()
            .map(|window| (window.start, window.end))
            .collect()
    }

    fn total_days_off(&self) -> u32 {
        self.windows.iter().map(|window| window.off_streak).sum()
    }
}

#[derive(Debug, Clone)]
pub struct SelectionConfig {
    pub budget: u32,
    pub blocks_max: usize,
    pub top_k: usize,
    pub prefs: PreferenceConfig,
    pub plan_prefs: PlanPreference,
}

/// Return the top plans abiding by the PTO budget and block limits, best
/// first. Candidates must already be in canonical generator order.
pub fn select_plans(candidates: &[CandidateWindow], config: &SelectionConfig) -> Vec<PlanCandidate> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let scored: Vec<f64> = candidates
        .iter()
        .map(|candidate| score_candidate(candidate, &config.prefs))
        .collect();

    let mut states: HashMap<StateKey, PlanCandidate> = HashMap::new();
    states.insert((Vec::new(), 0), PlanCandidate::empty());

    for (candidate, base_score) in candidates.iter().zip(scored.iter().copied()) {
        // Snapshot first: a candidate must never chain onto a state created
        // during its own pass.
        let snapshot: Vec<PlanCandidate> = states.values().cloned().collect();
        for state in snapshot {
            if let Some(last) = state.windows.last() {
                // Non-overlap requires the previous block to end strictly
                // before this one starts.
                if last.end >= candidate.start {
                    continue;
                }
            }
            let total_pto = state.pto_used + candidate.pto_needed;
            if total_pto > config.budget {
                continue;
            }
            if state.windows.len() + 1 > config.blocks_max {
                continue;
            }

            let mut windows = state.windows;
            windows.push(candidate.clone());
            let mut base_scores = state.base_scores;
            base_scores.push(base_score);
            let score = plan_score(&windows, &config.plan_prefs, &base_scores);

            let key: StateKey = (
                windows
                    .iter()
                    .map(|window| (window.start, window.end))
                    .collect(),
                total_pto,
            );
            let improves = match states.get(&key) {
                None => true,
                Some(existing) => score > existing.score,
            };
            if improves {
                states.insert(
                    key,
                    PlanCandidate {
                        windows,
                        base_scores,
                        pto_used: total_pto,
                        score,
                    },
                );
            }
        }
    }

    let mut plans: Vec<PlanCandidate> = states
        .into_values()
        .filter(|state| !state.windows.is_empty())
        .collect();
    plans.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.total_days_off().cmp(&a.total_days_off()))
            .then_with(|| a.summary().cmp(&b.summary()))
    });
    plans.truncate(config.top_k);
    plans
}
