// src/scoring.rs
//
// Scoring: a base score per candidate window plus plan-level adjustments
// (longest-block bonus, cross-quarter spread bonus).

use std::collections::HashSet;

use chrono::Datelike;

use crate::candidates::CandidateWindow;

/// Primary optimization goals supported by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    MaxTotal,
    MaxLongest,
}

impl Goal {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "max_total" => Some(Goal::MaxTotal),
            "max_longest" => Some(Goal::MaxLongest),
            _ => None,
        }
    }
}

/// Preferences that influence scoring of individual windows.
#[derive(Debug, Clone)]
pub struct PreferenceConfig {
    /// Penalty applied per PTO day consumed.
    pub penalty_lambda: f64,
    pub prefer_months: HashSet<u32>,
    pub avoid_months: HashSet<u32>,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            penalty_lambda: 0.25,
            prefer_months: HashSet::new(),
            avoid_months: HashSet::new(),
        }
    }
}

impl PreferenceConfig {
    pub fn month_weight(&self, month: u32) -> f64 {
        if self.prefer_months.contains(&month) {
            1.0
        } else if self.avoid_months.contains(&month) {
            -1.0
        } else {
            0.0
        }
    }
}

/// Plan-level knobs used when selecting final windows.
#[derive(Debug, Clone, Copy)]
pub struct PlanPreference {
    pub goal: Goal,
    pub season_spread: bool,
}

/// Base score for a single candidate window: streak length minus the PTO
/// penalty, plus month weighting over the PTO days and a density bonus.
pub fn score_candidate(window: &CandidateWindow, prefs: &PreferenceConfig) -> f64 {
    let base = f64::from(window.off_streak);
    let penalty = prefs.penalty_lambda * f64::from(window.pto_needed);
    let month_values: f64 = window
        .workdays
        .iter()
        .map(|day| prefs.month_weight(day.month()))
        .sum();
    let density_bonus = f64::from(window.off_streak) / f64::from(window.pto_needed.max(1));
    base - penalty + 0.1 * month_values + 0.05 * density_bonus
}

/// Reward plans whose windows start in distinct quarters.
pub fn seasonal_bonus(windows: &[CandidateWindow]) -> f64 {
    if windows.is_empty() {
        return 0.0;
    }
    let quarters: HashSet<u32> = windows
        .iter()
        .map(|window| (window.start.month() - 1) / 3 + 1)
        .collect();
    1.5 * (quarters.len() as f64 - 1.0)
}

/// Aggregate plan score from the per-window base scores.
pub fn plan_score(windows: &[CandidateWindow], prefs: &PlanPreference, base_scores: &[f64]) -> f64 {
    let mut total: f64 = base_scores.iter().sum();
    if prefs.goal == Goal::MaxLongest {
        if let Some(longest) = windows.iter().map(|window| window.off_streak).max() {
            total += f64::from(longest) * 0.1;
        }
    }
    if prefs.season_spread {
        total += seasonal_bonus(windows);
    }
    total
}
