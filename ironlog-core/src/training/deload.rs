//! Deload cycle: when a lighter session is due, and what it looks like.

use serde::{Deserialize, Serialize};

use crate::db::models::{ExerciseSet, Settings};
use crate::training::load::{calculate_weight, round_to_step};

/// True when the workout has accumulated enough sessions since its last
/// deload for the configured cycle.
pub fn is_deload_due(counter: i32, settings: &Settings) -> bool {
    settings.deload_enabled
        && settings.deload_every_sessions > 0
        && counter >= settings.deload_every_sessions
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    AwaitingDeload,
}

impl SessionState {
    pub fn of(counter: i32, settings: &Settings) -> Self {
        if is_deload_due(counter, settings) {
            SessionState::AwaitingDeload
        } else {
            SessionState::Active
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionFinish {
    Regular,
    Deload,
}

impl SessionFinish {
    pub fn next_counter(self, counter: i32) -> i32 {
        match self {
            SessionFinish::Regular => counter.saturating_add(1),
            SessionFinish::Deload => 0,
        }
    }
}

/// How a deload session lightens the regular prescription.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeloadPolicy {
    /// Load reduction in percent of the regular prescription.
    pub load_reduction: f64,
    /// Reps in reserve prescribed for every deload set.
    pub rir: i32,
}

impl Default for DeloadPolicy {
    fn default() -> Self {
        DeloadPolicy {
            load_reduction: 10.0,
            rir: 4,
        }
    }
}

impl DeloadPolicy {
    fn factor(&self) -> f64 {
        (1.0 - self.load_reduction / 100.0).clamp(0.0, 1.0)
    }

    /// The deload counterpart of `set`. Ids, set number and reps are kept.
    pub fn apply(&self, set: &ExerciseSet, one_rep_max: Option<f64>, step: f64) -> ExerciseSet {
        let factor = self.factor();
        let scaled = round_to_step(set.weight * factor, step);

        let (percentage, weight) = if set.percentage > 0.0 {
            let reduced = ((set.percentage * factor) * 100.0).round() / 100.0;
            let weight = match one_rep_max {
                Some(orm) if orm > 0.0 => calculate_weight(orm, reduced, step),
                _ => scaled,
            };
            (reduced, weight)
        } else {
            (0.0, scaled)
        };

        ExerciseSet {
            weight,
            percentage,
            rir: self.rir,
            ..set.clone()
        }
    }
}
